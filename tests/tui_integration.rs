use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use tasklist::models::InputMode;
use tasklist::ui::{ui, App};
use tasklist::{StatusFilter, TaskListController};

fn render(app: &mut App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|f| ui(f, app)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

fn keys(app: &mut App, codes: &[KeyCode]) {
    for code in codes {
        app.handle_key(*code, KeyModifiers::NONE).unwrap();
    }
}

#[test]
fn test_filter_popup_changes_rendered_rows() {
    let mut ctl = TaskListController::new();
    ctl.add_task("Buy milk", "").unwrap();
    ctl.add_task("Walk dog", "around the park").unwrap();
    let mut app = App::new(ctl);

    keys(&mut app, &[KeyCode::Down, KeyCode::Char('c'), KeyCode::Char('f')]);
    assert_eq!(app.mode, InputMode::FilterSelect);
    assert!(render(&mut app).contains("3. Not Completed"));

    keys(&mut app, &[KeyCode::Char('3')]);
    assert_eq!(app.controller.filter(), StatusFilter::NotCompleted);
    let screen = render(&mut app);
    assert!(screen.contains("Buy milk"));
    assert!(!screen.contains("Walk dog"));
    assert!(screen.contains("Todos (1 of 2)"));
}

#[test]
fn test_detail_panel_shows_selected_task() {
    let mut ctl = TaskListController::new();
    ctl.add_task("Walk dog", "around the park").unwrap();
    let mut app = App::new(ctl);

    let screen = render(&mut app);
    assert!(screen.contains("Description: around the park"));
    assert!(screen.contains("Status: Not Completed"));
}

#[test]
fn test_empty_list_hint() {
    let mut app = App::new(TaskListController::new());
    assert!(render(&mut app).contains("No task selected"));
    assert_eq!(app.selected_index(), None);
}
