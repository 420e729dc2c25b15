use super::*;

const INPUT_HEIGHT: u16 = 3;
const THINKING: &str = "Thinking...";

pub(super) fn draw_chat(frame: &mut Frame<'_>, app: &mut App, area: Rect, theme: &ThemePalette) {
    let focused = app.focus() == Focus::Chat;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(INPUT_HEIGHT)])
        .split(area);

    draw_transcript(frame, app, rows[0], focused, theme);
    draw_input(frame, app, rows[1], focused, theme);
}

fn draw_transcript(
    frame: &mut Frame<'_>,
    app: &mut App,
    area: Rect,
    focused: bool,
    theme: &ThemePalette,
) {
    let block = panel_block_with_border("Assistant", focus_border(focused, theme), theme);
    let inner = block.inner(area).inner(Margin {
        vertical: 0,
        horizontal: 1,
    });
    frame.render_widget(block, area);
    register_mouse_region(app, MouseTarget::ChatPane, area);

    let lines = transcript_lines(app, theme);
    if lines.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Ask a question about the issue on screen.",
                Style::default().fg(theme.text_muted),
            )))
            .wrap(Wrap { trim: false }),
            inner,
        );
        return;
    }

    let width = inner.width as usize;
    let lines = lines
        .iter()
        .flat_map(|line| wrap_line(line, width))
        .collect::<Vec<_>>();
    let max_scroll = lines.len().saturating_sub(inner.height as usize);
    let max_scroll = u16::try_from(max_scroll).unwrap_or(u16::MAX);
    app.chat_mut().clamp_scroll(max_scroll);
    let scroll = max_scroll.saturating_sub(app.chat().scroll_from_bottom());

    frame.render_widget(
        Paragraph::new(Text::from(lines)).scroll((scroll, 0)),
        inner,
    );
}

fn transcript_lines(app: &App, theme: &ThemePalette) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in app.chat().transcript() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        let color = match message.sender {
            ChatSender::User => theme.accent_primary,
            ChatSender::Bot => theme.accent_success,
            ChatSender::Error => theme.accent_danger,
        };
        lines.push(Line::from(Span::styled(
            message.sender.label(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        match message.sender {
            ChatSender::Bot => lines.extend(markdown::render(&message.content, theme)),
            ChatSender::User => lines.extend(
                message
                    .content
                    .lines()
                    .map(|line| Line::from(Span::raw(line.to_string()))),
            ),
            ChatSender::Error => lines.extend(message.content.lines().map(|line| {
                Line::from(Span::styled(
                    line.to_string(),
                    Style::default().fg(theme.accent_danger),
                ))
            })),
        }
    }

    if app.chat().is_thinking() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            THINKING,
            Style::default()
                .fg(theme.text_muted)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    lines
}

fn draw_input(frame: &mut Frame<'_>, app: &mut App, area: Rect, focused: bool, theme: &ThemePalette) {
    let title = if app.current_issue().is_some() {
        "Ask about this issue"
    } else {
        "Ask"
    };
    let block = panel_block_with_border(title, focus_border(focused, theme), theme);
    let inner = block.inner(area).inner(Margin {
        vertical: 0,
        horizontal: 1,
    });
    frame.render_widget(block, area);
    register_mouse_region(app, MouseTarget::ChatInput, area);

    let input = app.chat().input();
    let width = inner.width as usize;
    let input_len = input.chars().count();
    let visible = if width > 0 && input_len >= width {
        input.chars().skip(input_len + 1 - width).collect::<String>()
    } else {
        input.to_string()
    };

    let line = if input.is_empty() && !focused {
        Line::from(Span::styled(
            format!(
                "press {} to type, enter to send",
                app.keybinds().label(Action::FocusChat)
            ),
            Style::default().fg(theme.text_muted),
        ))
    } else {
        Line::from(Span::styled(visible.clone(), Style::default().fg(theme.text_primary)))
    };
    frame.render_widget(Paragraph::new(line), inner);

    if focused && inner.width > 0 {
        let offset = u16::try_from(visible.chars().count()).unwrap_or(u16::MAX);
        let cursor_x = inner.x.saturating_add(offset).min(inner.x + inner.width - 1);
        frame.set_cursor_position((cursor_x, inner.y));
    }
}
