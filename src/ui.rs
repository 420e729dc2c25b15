use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::app::{App, Focus, MouseTarget};
use crate::card::{Card, CardField, FieldDisplay};
use crate::chat::ChatSender;
use crate::keybinds::{Action, BINDING_SPECS};
use crate::markdown;
use crate::sections::SectionId;
use crate::theme::{ThemePalette, resolve_theme};

mod ui_card;
mod ui_chat;
mod ui_shared;
mod ui_status_overlay;

use ui_shared::*;

const STACKED_WIDTH: u16 = 100;

pub fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let theme = resolve_theme(app.theme_name());
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg_app)), area);
    app.clear_mouse_regions();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let direction = if area.width < STACKED_WIDTH {
        Direction::Vertical
    } else {
        Direction::Horizontal
    };
    let panes = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[0]);

    ui_card::draw_card(frame, app, panes[0], theme);
    ui_chat::draw_chat(frame, app, panes[1], theme);
    ui_status_overlay::draw_status(frame, app, rows[1], theme);

    if app.help_overlay_visible() {
        ui_status_overlay::draw_help_overlay(frame, app, area, theme);
    }
}

#[cfg(test)]
mod tests;
