use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};

use crate::controller::TaskListController;
use crate::editor::LineEditor;
use crate::error::TaskListError;
use crate::models::{Change, Field, InputMode, StatusFilter, Task, TaskStatus};

const HINTS: &str = "a: add | e/Enter: edit | space: toggle | c/n: status | d: delete | f/Tab: filter | q: quit";

pub struct App {
    pub controller: TaskListController,
    /// Selection over the visible (filtered) rows, not the full sequence.
    pub list_state: ListState,
    pub mode: InputMode,
    pub input: LineEditor,
    pub should_quit: bool,
    pub status_message: Option<String>,
    resume_mode: Option<InputMode>,
    changes: Rc<RefCell<Vec<Change>>>,
}

impl App {
    pub fn new(mut controller: TaskListController) -> Self {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        controller.subscribe(move |change| sink.borrow_mut().push(change.clone()));

        let mut app = App {
            controller,
            list_state: ListState::default(),
            mode: InputMode::Normal,
            input: LineEditor::default(),
            should_quit: false,
            status_message: None,
            resume_mode: None,
            changes,
        };
        app.clamp_selection();
        app
    }

    pub fn visible_len(&self) -> usize {
        self.controller.visible_indexed().count()
    }

    /// Index in the full task sequence of the selected visible row.
    pub fn selected_index(&self) -> Option<usize> {
        let row = self.list_state.selected()?;
        self.controller.visible_indexed().nth(row).map(|(i, _)| i)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected_index().and_then(|i| self.controller.get(i))
    }

    /// Keep the selection on an existing visible row.
    pub fn clamp_selection(&mut self) {
        let len = self.visible_len();
        let selected = match self.list_state.selected() {
            _ if len == 0 => None,
            Some(i) if i >= len => Some(len - 1),
            Some(i) => Some(i),
            None => Some(0),
        };
        self.list_state.select(selected);
    }

    pub fn next_item(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous_item(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    fn select_sequence_index(&mut self, index: usize) {
        if let Some(row) = self
            .controller
            .visible_indexed()
            .position(|(i, _)| i == index)
        {
            self.list_state.select(Some(row));
        }
    }

    /// Apply queued controller notifications to view state.
    fn drain_changes(&mut self) {
        let changes: Vec<Change> = self.changes.borrow_mut().drain(..).collect();
        for change in changes {
            let message = match &change {
                Change::Added { id, index } => {
                    self.select_sequence_index(*index);
                    Some(format!("Added task {}", id))
                }
                Change::Edited { id, .. } => Some(format!("Saved task {}", id)),
                Change::StatusChanged { id, completed } => {
                    let status = if *completed {
                        TaskStatus::Completed
                    } else {
                        TaskStatus::NotCompleted
                    };
                    Some(format!("Task {} marked {}", id, status))
                }
                Change::Deleted { id, .. } => Some(format!("Deleted task {}", id)),
                Change::EditCancelled { .. } => Some("Edit cancelled".to_string()),
                Change::FilterChanged(filter) => Some(format!("Showing: {}", filter)),
                Change::EditStarted { .. } => None,
            };
            if message.is_some() {
                self.status_message = message;
            }
        }
        self.clamp_selection();
    }

    fn show_notice(&mut self, err: TaskListError, resume: InputMode) {
        log::info!("notice: {}", err);
        self.resume_mode = Some(resume);
        self.mode = InputMode::Notice(err.to_string());
    }

    fn dismiss_notice(&mut self) {
        self.mode = self.resume_mode.take().unwrap_or(InputMode::Normal);
    }

    pub fn start_add(&mut self) {
        self.mode = InputMode::Adding(Field::Name);
        let name = self.controller.draft().name.clone();
        self.input.set(name);
    }

    pub fn start_edit(&mut self) {
        let Some(index) = self.selected_index() else {
            return;
        };
        match self.controller.begin_edit(index) {
            Ok(()) => {
                self.mode = InputMode::Editing(Field::Name);
                let staged = self
                    .controller
                    .edit_buffer()
                    .map(|buf| buf.staged_name.clone())
                    .unwrap_or_default();
                self.input.set(staged);
            }
            Err(err) => self.show_notice(err, InputMode::Normal),
        }
    }

    /// Push the line editor's content into the draft or staged field it edits.
    fn sync_input(&mut self) -> Result<()> {
        let value = self.input.value().to_string();
        match self.mode {
            InputMode::Adding(Field::Name) => self.controller.set_draft_name(value),
            InputMode::Adding(Field::Description) => self.controller.set_draft_description(value),
            InputMode::Editing(Field::Name) => self.controller.update_staged_name(value)?,
            InputMode::Editing(Field::Description) => {
                self.controller.update_staged_description(value)?
            }
            _ => {}
        }
        Ok(())
    }

    fn field_value(&self, mode: &InputMode) -> String {
        match mode {
            InputMode::Adding(Field::Name) => self.controller.draft().name.clone(),
            InputMode::Adding(Field::Description) => self.controller.draft().description.clone(),
            InputMode::Editing(field) => self
                .controller
                .edit_buffer()
                .map(|buf| match field {
                    Field::Name => buf.staged_name.clone(),
                    Field::Description => buf.staged_description.clone(),
                })
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn focus_field(&mut self, mode: InputMode) -> Result<()> {
        self.sync_input()?;
        let value = self.field_value(&mode);
        self.input.set(value);
        self.mode = mode;
        Ok(())
    }

    fn submit_add(&mut self) -> Result<()> {
        self.sync_input()?;
        match self.controller.submit_draft() {
            Ok(_) => {
                self.input.clear();
                self.mode = InputMode::Normal;
            }
            Err(err) => {
                self.show_notice(err, InputMode::Adding(Field::Name));
                let name = self.controller.draft().name.clone();
                self.input.set(name);
            }
        }
        Ok(())
    }

    fn submit_edit(&mut self, field: Field) -> Result<()> {
        self.sync_input()?;
        match self.controller.save_edit() {
            Ok(_) => {
                self.input.clear();
                self.mode = InputMode::Normal;
            }
            Err(TaskListError::Validation) => {
                self.show_notice(TaskListError::Validation, InputMode::Editing(field));
            }
            Err(err) => self.show_notice(err, InputMode::Normal),
        }
        Ok(())
    }

    fn set_selected_status(&mut self, status: Option<TaskStatus>) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let id = task.id;
        match status {
            Some(status) => self.controller.set_status(id, status),
            None => self.controller.toggle_status(id),
        };
    }

    fn delete_selected(&mut self) {
        if let Some(index) = self.selected_index() {
            if let Err(err) = self.controller.delete_task(index) {
                self.show_notice(err, InputMode::Normal);
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Result<()> {
        if modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        match self.mode.clone() {
            InputMode::Notice(_) => self.dismiss_notice(),
            InputMode::Normal => {
                // A change message lasts until the next key press.
                self.status_message = None;
                self.handle_normal_key(key);
            }
            InputMode::FilterSelect => self.handle_filter_key(key),
            InputMode::Adding(field) => self.handle_form_key(key, InputMode::Adding(field))?,
            InputMode::Editing(field) => self.handle_form_key(key, InputMode::Editing(field))?,
        }

        self.drain_changes();
        Ok(())
    }

    fn handle_normal_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.next_item(),
            KeyCode::Up | KeyCode::Char('k') => self.previous_item(),
            KeyCode::Char('a') => self.start_add(),
            KeyCode::Char('e') | KeyCode::Enter => self.start_edit(),
            KeyCode::Char(' ') => self.set_selected_status(None),
            KeyCode::Char('c') => self.set_selected_status(Some(TaskStatus::Completed)),
            KeyCode::Char('n') => self.set_selected_status(Some(TaskStatus::NotCompleted)),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('f') => self.mode = InputMode::FilterSelect,
            KeyCode::Tab => {
                let next = self.controller.filter().cycle();
                self.controller.set_filter(next);
            }
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, key: KeyCode) {
        let choice = match key {
            KeyCode::Char('1') => Some(StatusFilter::All),
            KeyCode::Char('2') => Some(StatusFilter::Completed),
            KeyCode::Char('3') => Some(StatusFilter::NotCompleted),
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                None
            }
            _ => None,
        };
        if let Some(filter) = choice {
            self.controller.set_filter(filter);
            self.mode = InputMode::Normal;
        }
    }

    fn handle_form_key(&mut self, key: KeyCode, mode: InputMode) -> Result<()> {
        let (field, adding) = match mode {
            InputMode::Adding(field) => (field, true),
            InputMode::Editing(field) => (field, false),
            _ => return Ok(()),
        };
        let switch_to = |f: Field| {
            if adding {
                InputMode::Adding(f)
            } else {
                InputMode::Editing(f)
            }
        };

        match key {
            KeyCode::Esc => {
                if adding {
                    // Draft is kept for the next `a`.
                    self.sync_input()?;
                } else {
                    self.controller.cancel_edit();
                }
                self.input.clear();
                self.mode = InputMode::Normal;
            }
            KeyCode::Tab | KeyCode::BackTab => self.focus_field(switch_to(field.other()))?,
            KeyCode::Enter => match (adding, field) {
                (true, Field::Name) => self.focus_field(switch_to(Field::Description))?,
                (true, Field::Description) => self.submit_add()?,
                (false, field) => self.submit_edit(field)?,
            },
            KeyCode::Char(c) => {
                self.input.insert_char(c);
                self.sync_input()?;
            }
            KeyCode::Backspace => {
                self.input.delete_char();
                self.sync_input()?;
            }
            KeyCode::Delete => {
                self.input.delete_forward();
                self.sync_input()?;
            }
            KeyCode::Left => self.input.move_cursor_left(),
            KeyCode::Right => self.input.move_cursor_right(),
            KeyCode::Home => self.input.move_to_start_of_line(),
            KeyCode::End => self.input.move_to_end_of_line(),
            _ => {}
        }
        Ok(())
    }
}

pub fn run_tui(controller: TaskListController) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(controller);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    log::info!("terminal ui started");
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key.code, key.modifiers)?;
            }
        }

        if app.should_quit {
            break;
        }
    }
    log::info!("terminal ui closed with {} tasks", app.controller.len());
    Ok(())
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    let titles: Vec<Line> = StatusFilter::ALL
        .iter()
        .map(|filter| Line::from(filter.label()))
        .collect();
    let selected_tab = StatusFilter::ALL
        .iter()
        .position(|filter| *filter == app.controller.filter())
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("My Todos - Status Filter"))
        .select(selected_tab)
        .style(Style::default().fg(Color::Cyan))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::Black),
        );
    f.render_widget(tabs, chunks[0]);

    render_tasks(f, app, chunks[1]);

    let footer_text = app.status_message.clone().unwrap_or_else(|| HINTS.to_string());
    let footer = Paragraph::new(footer_text)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray));
    f.render_widget(footer, chunks[2]);

    match &app.mode {
        InputMode::Adding(field) => render_form(f, app, "Add Todo", *field),
        InputMode::Editing(field) => render_form(f, app, "Edit Todo", *field),
        InputMode::FilterSelect => {
            let popup_area = centered_rect(50, 30, f.area());
            let block = Block::default()
                .title("Status Filter")
                .borders(Borders::ALL)
                .style(Style::default().bg(Color::DarkGray));
            let content = Paragraph::new(
                "Select filter:\n\n1. All\n2. Completed\n3. Not Completed\n\nPress ESC to cancel",
            )
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::White));
            f.render_widget(Clear, popup_area);
            f.render_widget(content, popup_area);
        }
        InputMode::Notice(message) => {
            let popup_area = centered_rect(50, 20, f.area());
            let block = Block::default()
                .title("Notice")
                .borders(Borders::ALL)
                .style(Style::default().bg(Color::Red));
            let content = Paragraph::new(format!("{}\n\nPress any key to continue", message))
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: false })
                .style(Style::default().fg(Color::White));
            f.render_widget(Clear, popup_area);
            f.render_widget(content, popup_area);
        }
        InputMode::Normal => {}
    }
}

// Helper function to create centered rectangles for popups
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn status_span(completed: bool) -> Span<'static> {
    if completed {
        Span::styled("[x] ", Style::default().fg(Color::Green))
    } else {
        Span::styled("[ ] ", Style::default().fg(Color::Blue))
    }
}

fn render_tasks(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(area);

    let edit = app.controller.edit_buffer();
    let items: Vec<ListItem> = app
        .controller
        .visible_indexed()
        .map(|(index, task)| {
            let line = match edit {
                Some(buf) if buf.target_index == index => Line::from(vec![
                    status_span(task.completed),
                    Span::styled(
                        format!("{} (editing)", buf.staged_name),
                        Style::default().fg(Color::Yellow),
                    ),
                ]),
                _ => Line::from(vec![
                    status_span(task.completed),
                    Span::styled(task.name.clone(), Style::default().fg(Color::White)),
                ]),
            };
            ListItem::new(vec![line])
        })
        .collect();

    let title = format!(
        "Todos ({} of {})",
        items.len(),
        app.controller.len()
    );
    let tasks_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .bg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    f.render_stateful_widget(tasks_list, chunks[0], &mut app.list_state);

    let info_text = match app.selected_task() {
        Some(task) => format!(
            "Name: {}\nDescription: {}\nStatus: {}\nCreated: {}\n\nControls:\n• Enter: Edit task\n• space: Toggle status\n• d: Delete\n• f: Filter\n• q: Quit",
            task.name,
            task.description,
            task.status(),
            task.created_at.format("%Y-%m-%d %H:%M:%S")
        ),
        None => "No task selected\n\nControls:\n• a: Add task\n• ↑/↓: Navigate\n• f: Filter\n• q: Quit".to_string(),
    };

    let info_paragraph = Paragraph::new(info_text)
        .block(Block::default().borders(Borders::ALL).title("Task Info"))
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White));
    f.render_widget(info_paragraph, chunks[1]);
}

fn input_line<'a>(label: &'a str, value: &'a str, active: Option<&'a LineEditor>) -> Line<'a> {
    let label_style = Style::default().fg(Color::Cyan);
    let text_style = Style::default().fg(Color::White);
    let Some(editor) = active else {
        return Line::from(vec![
            Span::styled(label, label_style),
            Span::styled(value, text_style),
        ]);
    };

    let (before, at, after) = editor.split_at_cursor();
    let cursor = at.map(String::from).unwrap_or_else(|| " ".to_string());
    Line::from(vec![
        Span::styled(label, label_style.add_modifier(Modifier::BOLD)),
        Span::styled(before, text_style),
        Span::styled(cursor, Style::default().bg(Color::Cyan).fg(Color::Black)),
        Span::styled(after, text_style),
    ])
}

fn render_form(f: &mut Frame, app: &App, title: &str, field: Field) {
    let popup_area = centered_rect(60, 30, f.area());

    let (name, description) = match app.controller.edit_buffer() {
        Some(buf) if matches!(app.mode, InputMode::Editing(_)) => {
            (buf.staged_name.as_str(), buf.staged_description.as_str())
        }
        _ => (
            app.controller.draft().name.as_str(),
            app.controller.draft().description.as_str(),
        ),
    };

    let (name_editor, desc_editor) = match field {
        Field::Name => (Some(&app.input), None),
        Field::Description => (None, Some(&app.input)),
    };

    let lines = vec![
        input_line("Name: ", name, name_editor),
        input_line("Description: ", description, desc_editor),
        Line::from(""),
        Line::from("Enter: next/save | Tab: switch field | ESC: cancel"),
    ];

    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::DarkGray));
    let content = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(content, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn app_with(names: &[&str]) -> App {
        let mut ctl = TaskListController::new();
        for name in names {
            ctl.add_task(name, "").unwrap();
        }
        App::new(ctl)
    }

    fn screen(app: &mut App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_add_task_through_form() {
        let mut app = app_with(&[]);
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Buy milk");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "2L");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, InputMode::Normal);
        let task = app.controller.get(0).unwrap();
        assert_eq!(task.name, "Buy milk");
        assert_eq!(task.description, "2L");
        assert_eq!(app.selected_index(), Some(0));
        assert!(app.controller.draft().name.is_empty());
    }

    #[test]
    fn test_blank_name_shows_notice_and_returns_to_form() {
        let mut app = app_with(&[]);
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "  ");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "desc");
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.mode, InputMode::Notice(ref m) if m == "Please enter the task name."));
        assert!(app.controller.is_empty());

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.mode, InputMode::Adding(Field::Name));
        assert_eq!(app.controller.draft().description, "desc");
    }

    #[test]
    fn test_escape_keeps_draft() {
        let mut app = app_with(&[]);
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "half");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.controller.draft().name, "half");

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.input.value(), "half");
    }

    #[test]
    fn test_edit_save_and_cancel() {
        let mut app = app_with(&["a", "b"]);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('e'));
        assert!(app.controller.is_editing(1));
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "B");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.controller.get(1).unwrap().name, "B");
        assert_eq!(app.mode, InputMode::Normal);

        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "zzz");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.controller.get(1).unwrap().name, "B");
        assert!(app.controller.edit_buffer().is_none());
    }

    #[test]
    fn test_edit_description_via_tab() {
        let mut app = app_with(&["a"]);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.mode, InputMode::Editing(Field::Description));
        type_text(&mut app, "details");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.input.value(), "a");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.controller.get(0).unwrap().description, "details");
    }

    #[test]
    fn test_selection_maps_through_filter() {
        let mut app = app_with(&["a", "b", "c"]);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('c'));
        assert!(app.controller.get(2).unwrap().completed);

        press(&mut app, KeyCode::Char('f'));
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.controller.filter(), StatusFilter::Completed);
        assert_eq!(app.visible_len(), 1);
        assert_eq!(app.selected_index(), Some(2));

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.controller.len(), 2);
        assert_eq!(app.list_state.selected(), None);
    }

    #[test]
    fn test_toggle_and_tab_cycles_filter() {
        let mut app = app_with(&["a"]);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.controller.get(0).unwrap().completed);
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.controller.get(0).unwrap().completed);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.controller.filter(), StatusFilter::Completed);
        assert_eq!(app.status_message.as_deref(), Some("Showing: Completed"));
    }

    #[test]
    fn test_footer_returns_to_hints_after_next_key() {
        let mut app = app_with(&["a", "b"]);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.status_message.as_deref(), Some("Task #1 marked Completed"));
        assert!(!screen(&mut app).contains("a: add"));

        press(&mut app, KeyCode::Down);
        assert_eq!(app.status_message, None);
        assert!(screen(&mut app).contains("a: add | e/Enter: edit"));
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app_with(&["a", "b"]);
        assert_eq!(app.list_state.selected(), Some(0));
        press(&mut app, KeyCode::Up);
        assert_eq!(app.list_state.selected(), Some(1));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app_with(&[]);
        press(&mut app, KeyCode::Char('a'));
        app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_render_lists_tasks_and_editing_row() {
        let mut app = app_with(&["Buy milk", "Walk dog"]);
        let text = screen(&mut app);
        assert!(text.contains("Buy milk"));
        assert!(text.contains("Todos (2 of 2)"));

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "!");
        let text = screen(&mut app);
        assert!(text.contains("Walk dog! (editing)"));
        assert!(text.contains("Edit Todo"));
    }

    #[test]
    fn test_render_notice() {
        let mut app = app_with(&[]);
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        let text = screen(&mut app);
        assert!(text.contains("Please enter the task name."));
    }
}
