use super::*;
use crate::chat::ChatReply;
use crate::config::Config;
use crate::issue::{FieldValue, Issue};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;

const WIDTH: u16 = 100;
const HEIGHT: u16 = 30;

fn loaded(count: usize) -> App {
    let mut app = App::new(Config::default());
    app.finish_load(Ok((0..count)
        .map(|n| Issue {
            key: Some(FieldValue::from(format!("ISSUE-{}", n).as_str())),
            severity: Some(FieldValue::from("MAJOR")),
            ..Issue::default()
        })
        .collect()));
    app
}

fn render(app: &mut App) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).expect("terminal");
    terminal.draw(|frame| draw(frame, app)).expect("draw");
    terminal.backend().buffer().clone()
}

fn rows(buffer: &Buffer) -> Vec<String> {
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect()
        })
        .collect()
}

/// Row and column of the first cell where `needle` starts.
fn locate(buffer: &Buffer, needle: &str) -> Option<(u16, u16)> {
    rows(buffer).iter().enumerate().find_map(|(y, row)| {
        let byte = row.find(needle)?;
        let x = row[..byte].chars().count();
        Some((u16::try_from(x).ok()?, u16::try_from(y).ok()?))
    })
}

fn click(app: &mut App, column: u16, row: u16) {
    app.on_mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    });
}

fn press(app: &mut App, code: KeyCode) {
    app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn current_index(app: &App) -> usize {
    app.card().expect("card").pagination.index
}

#[test]
fn footer_shows_pagination_between_buttons() {
    let mut app = loaded(3);
    let buffer = render(&mut app);

    let (next_x, footer_y) = locate(&buffer, "[Next").expect("next button");
    let (prev_x, prev_y) = locate(&buffer, "[◀ Prev]").expect("prev button");
    assert_eq!(prev_y, footer_y);
    assert!(prev_x < next_x);
    let footer = &rows(&buffer)[usize::from(footer_y)];
    assert!(footer.contains("Issue 1 of 3"));
}

#[test]
fn disabled_footer_buttons_ignore_clicks() {
    let mut app = loaded(3);
    let buffer = render(&mut app);
    let (prev_x, footer_y) = locate(&buffer, "[◀ Prev]").expect("prev button");
    click(&mut app, prev_x + 1, footer_y);
    assert_eq!(current_index(&app), 0);

    let (next_x, _) = locate(&buffer, "[Next").expect("next button");
    click(&mut app, next_x + 1, footer_y);
    assert_eq!(current_index(&app), 1);

    app.last_issue();
    let buffer = render(&mut app);
    let (next_x, footer_y) = locate(&buffer, "[Next").expect("next button");
    assert!(rows(&buffer)[usize::from(footer_y)].contains("Issue 3 of 3"));
    click(&mut app, next_x + 1, footer_y);
    assert_eq!(current_index(&app), 2);

    let (prev_x, _) = locate(&buffer, "[◀ Prev]").expect("prev button");
    click(&mut app, prev_x + 1, footer_y);
    assert_eq!(current_index(&app), 1);
}

#[test]
fn section_title_click_follows_scrolled_rows() {
    let mut app = loaded(1);
    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char('j'));
    let buffer = render(&mut app);

    let label = app.keybinds().label(Action::ToggleSection(SectionId::Location)).to_string();
    let (x, y) = locate(&buffer, &format!("Location  {}", label)).expect("location title");
    let before = app.sections().is_expanded(SectionId::Location);
    click(&mut app, x, y);
    assert_eq!(app.sections().is_expanded(SectionId::Location), !before);
}

#[test]
fn chat_keeps_the_end_of_a_long_reply_visible() {
    let mut app = loaded(1);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Char('q'));
    press(&mut app, KeyCode::Enter);
    let mut reply = vec!["abcdefghijklmnopqrst"; 24].join(" ");
    reply.push_str(" ZZZEND");
    app.finish_chat(Ok(ChatReply::Answer(reply)));

    let buffer = render(&mut app);

    assert!(locate(&buffer, "ZZZEND").is_some());
}

#[test]
fn chat_scrolls_back_to_earlier_lines() {
    let mut app = loaded(1);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Char('q'));
    press(&mut app, KeyCode::Enter);
    let reply = (0..40)
        .map(|n| format!("line{:02}", n))
        .collect::<Vec<_>>()
        .join("\n\n");
    app.finish_chat(Ok(ChatReply::Answer(reply)));

    let buffer = render(&mut app);
    assert!(locate(&buffer, "line39").is_some());
    assert!(locate(&buffer, "line00").is_none());

    for _ in 0..20 {
        press(&mut app, KeyCode::PageUp);
    }
    let buffer = render(&mut app);
    assert!(locate(&buffer, "line00").is_some());
    assert!(locate(&buffer, "line39").is_none());
}
