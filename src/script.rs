//! Line-oriented command scripts that drive a [`TaskListController`].
//!
//! One command per line, `#` starts a comment. Arguments are split on
//! whitespace; double quotes group words and accept `\"` and `\\` escapes.
//!
//! ```text
//! add "Buy milk" "two litres"
//! status 0 completed
//! filter Not Completed
//! show
//! ```

use std::io::Write;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};

use crate::controller::TaskListController;
use crate::error::TaskListError;
use crate::models::{StatusFilter, TaskId, TaskStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add { name: String, description: String },
    Edit(usize),
    Name(String),
    Desc(String),
    Save,
    Cancel,
    Status(usize, TaskStatus),
    Toggle(usize),
    Delete(usize),
    Filter(StatusFilter),
    Show,
}

/// Split a line into arguments, honouring double quotes.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
            }
            '\\' if in_quotes => match chars.next() {
                Some(escaped @ ('"' | '\\')) => current.push(escaped),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => bail!("dangling escape at end of line"),
            },
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_quotes {
        bail!("unterminated quote");
    }
    if in_token {
        args.push(current);
    }
    Ok(args)
}

fn parse_index(arg: Option<&String>, cmd: &str) -> Result<usize> {
    let arg = arg.ok_or_else(|| anyhow!("'{}' needs a task index", cmd))?;
    arg.parse::<usize>()
        .with_context(|| format!("'{}' is not a valid task index", arg))
}

fn expect_args(args: &[String], min: usize, max: usize, usage: &str) -> Result<()> {
    if args.len() < min || args.len() > max {
        bail!("usage: {}", usage);
    }
    Ok(())
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let tokens = tokenize(line)?;
        let (cmd, args) = tokens
            .split_first()
            .ok_or_else(|| anyhow!("empty command"))?;

        let command = match cmd.to_lowercase().as_str() {
            "add" => {
                expect_args(args, 1, 2, "add NAME [DESCRIPTION]")?;
                Command::Add {
                    name: args[0].clone(),
                    description: args.get(1).cloned().unwrap_or_default(),
                }
            }
            "edit" => {
                expect_args(args, 1, 1, "edit INDEX")?;
                Command::Edit(parse_index(args.first(), "edit")?)
            }
            "name" => {
                expect_args(args, 1, 1, "name TEXT")?;
                Command::Name(args[0].clone())
            }
            "desc" | "description" => {
                expect_args(args, 0, 1, "desc [TEXT]")?;
                Command::Desc(args.first().cloned().unwrap_or_default())
            }
            "save" => {
                expect_args(args, 0, 0, "save")?;
                Command::Save
            }
            "cancel" => {
                expect_args(args, 0, 0, "cancel")?;
                Command::Cancel
            }
            "status" => {
                if args.len() < 2 {
                    bail!("usage: status INDEX STATUS");
                }
                let index = parse_index(args.first(), "status")?;
                Command::Status(index, args[1..].join(" ").parse::<TaskStatus>()?)
            }
            "toggle" => {
                expect_args(args, 1, 1, "toggle INDEX")?;
                Command::Toggle(parse_index(args.first(), "toggle")?)
            }
            "delete" | "rm" => {
                expect_args(args, 1, 1, "delete INDEX")?;
                Command::Delete(parse_index(args.first(), "delete")?)
            }
            "filter" => {
                if args.is_empty() {
                    bail!("usage: filter All|Completed|Not Completed");
                }
                Command::Filter(args.join(" ").parse::<StatusFilter>()?)
            }
            "show" | "list" => {
                expect_args(args, 0, 0, "show")?;
                Command::Show
            }
            other => bail!("unknown command '{}'", other),
        };
        Ok(command)
    }
}

/// Outcome of a script run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub executed: usize,
    /// Errors that were skipped in keep-going mode, already prefixed with
    /// their line number.
    pub errors: Vec<String>,
}

pub struct ScriptRunner<W: Write> {
    controller: TaskListController,
    out: W,
    keep_going: bool,
}

impl<W: Write> ScriptRunner<W> {
    pub fn new(controller: TaskListController, out: W) -> Self {
        ScriptRunner {
            controller,
            out,
            keep_going: false,
        }
    }

    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    pub fn controller(&self) -> &TaskListController {
        &self.controller
    }

    pub fn into_parts(self) -> (TaskListController, W) {
        (self.controller, self.out)
    }

    /// Execute every command in `source`, then print the visible tasks.
    pub fn run(&mut self, source: &str) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for (i, raw) in source.lines().enumerate() {
            let line_no = i + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let result = line
                .parse::<Command>()
                .and_then(|cmd| self.apply(cmd));
            match result {
                Ok(()) => summary.executed += 1,
                Err(err) if self.keep_going => {
                    let msg = format!("line {}: {:#}", line_no, err);
                    log::warn!("{}", msg);
                    summary.errors.push(msg);
                }
                Err(err) => return Err(err.context(format!("line {}: {}", line_no, line))),
            }
        }

        self.show()?;
        Ok(summary)
    }

    pub fn apply(&mut self, cmd: Command) -> Result<()> {
        log::debug!("script command: {:?}", cmd);
        let ctl = &mut self.controller;
        match cmd {
            Command::Add { name, description } => {
                ctl.add_task(&name, &description)?;
            }
            Command::Edit(index) => ctl.begin_edit(index)?,
            Command::Name(text) => ctl.update_staged_name(text)?,
            Command::Desc(text) => ctl.update_staged_description(text)?,
            Command::Save => {
                ctl.save_edit()?;
            }
            Command::Cancel => {
                if !ctl.cancel_edit() {
                    log::debug!("cancel with no edit in progress");
                }
            }
            Command::Status(index, status) => {
                let id = task_id_at(ctl, index)?;
                ctl.set_status(id, status);
            }
            Command::Toggle(index) => {
                let id = task_id_at(ctl, index)?;
                ctl.toggle_status(id);
            }
            Command::Delete(index) => {
                ctl.delete_task(index)?;
            }
            Command::Filter(filter) => ctl.set_filter(filter),
            Command::Show => self.show()?,
        }
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        write_visible(&mut self.out, &self.controller)?;
        Ok(())
    }
}

fn task_id_at(ctl: &TaskListController, index: usize) -> Result<TaskId> {
    let task = ctl.get(index).ok_or(TaskListError::IndexOutOfRange {
        index,
        len: ctl.len(),
    })?;
    Ok(task.id)
}

/// Print the filtered view, one task per row, using sequence indices.
pub fn write_visible<W: Write>(out: &mut W, ctl: &TaskListController) -> std::io::Result<()> {
    let rows: Vec<_> = ctl.visible_indexed().collect();
    writeln!(
        out,
        "Filter: {} ({} of {} tasks)",
        ctl.filter(),
        rows.len(),
        ctl.len()
    )?;
    for (index, task) in rows {
        let mark = if task.completed { "[x]" } else { "[ ]" };
        let mut line = format!("{} {} {}", mark, index, task.name);
        if !task.description.is_empty() {
            line.push_str(": ");
            line.push_str(&task.description);
        }
        if ctl.is_editing(index) {
            line.push_str(" (editing)");
        }
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
