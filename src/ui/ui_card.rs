use super::*;

const PREV_LABEL: &str = "[◀ Prev]";
const NEXT_LABEL: &str = "[Next ▶]";

/// Card lines plus the row of every section title, so clicks can be mapped
/// back after scrolling.
struct CardLines {
    lines: Vec<Line<'static>>,
    titles: Vec<(usize, SectionId)>,
}

pub(super) fn draw_card(frame: &mut Frame<'_>, app: &mut App, area: Rect, theme: &ThemePalette) {
    let focused = app.focus() == Focus::Card;
    let block = panel_block_with_border("Issue", focus_border(focused, theme), theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    register_mouse_region(app, MouseTarget::CardPane, area);

    let content = inner.inner(Margin {
        vertical: 0,
        horizontal: 1,
    });
    let Some(card) = app.card().cloned() else {
        let message = app.load_state().placeholder().unwrap_or_default();
        let color = if message.starts_with("Error") {
            theme.accent_danger
        } else {
            theme.text_muted
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(message, Style::default().fg(color))))
                .wrap(Wrap { trim: false }),
            content,
        );
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(content);
    let body = rows[0];

    let card_lines = card_lines(&card, app, theme, body.width as usize);
    let max_scroll = card_lines.lines.len().saturating_sub(body.height as usize);
    app.clamp_card_scroll(u16::try_from(max_scroll).unwrap_or(u16::MAX));
    let scroll = app.card_scroll();

    frame.render_widget(
        Paragraph::new(Text::from(card_lines.lines)).scroll((scroll, 0)),
        body,
    );
    for (line, section) in card_lines.titles {
        register_inline_button(
            app,
            body,
            scroll,
            line,
            0,
            body.width,
            MouseTarget::SectionTitle(section),
        );
    }

    draw_footer(frame, app, &card, rows[1], theme);
}

fn card_lines(card: &Card, app: &App, theme: &ThemePalette, width: usize) -> CardLines {
    let mut lines = Vec::new();
    let mut titles = Vec::new();

    let badge_color = theme.severity_color(&card.severity.level);
    let key = card.field_text(CardField::Key);
    let badge = format!(" {} ", card.severity.label);
    let key_width = width.saturating_sub(badge.chars().count() + 1);
    lines.push(Line::from(vec![
        Span::styled(
            badge,
            Style::default()
                .fg(theme.bg_app)
                .bg(badge_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            ellipsize(&key, key_width),
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::BOLD),
        ),
    ]));

    for section in SectionId::ALL {
        lines.push(Line::from(""));
        titles.push((lines.len(), section));
        let expanded = app.sections().is_expanded(section);
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", app.sections().icon(section)),
                Style::default().fg(theme.accent_subtle),
            ),
            Span::styled(
                section.title().to_string(),
                Style::default()
                    .fg(theme.accent_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", app.keybinds().label(Action::ToggleSection(section))),
                Style::default().fg(theme.border_panel),
            ),
        ]));
        if !expanded {
            continue;
        }
        for field in CardField::in_section(section) {
            if let Some(display) = card.field(field) {
                lines.extend(field_lines(field, display, theme, width));
            }
        }
    }

    CardLines { lines, titles }
}

fn field_lines(
    field: CardField,
    display: &FieldDisplay,
    theme: &ThemePalette,
    width: usize,
) -> Vec<Line<'static>> {
    let value_style = match display {
        FieldDisplay::Placeholder(_) => Style::default()
            .fg(theme.text_muted)
            .add_modifier(Modifier::ITALIC),
        _ => Style::default().fg(theme.text_primary),
    };

    if let FieldDisplay::Tags(tags) = display {
        let mut spans = vec![Span::raw("  ")];
        for (index, tag) in tags.iter().enumerate() {
            if index > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(
                format!(" {} ", tag),
                Style::default().fg(theme.text_primary).bg(theme.bg_panel_alt),
            ));
        }
        return vec![Line::from(spans)];
    }

    let indent = "  ";
    if field.is_standalone() {
        return display
            .plain_lines()
            .iter()
            .flat_map(|line| wrap_text(line, width.saturating_sub(indent.len())))
            .map(|line| Line::from(Span::styled(format!("{}{}", indent, line), value_style)))
            .collect();
    }

    let label = format!("{}{}: ", indent, field.label());
    let label_width = label.chars().count();
    let mut out = Vec::new();
    for (index, value) in display.plain_lines().iter().enumerate() {
        let wrapped = wrap_text(value, width.saturating_sub(label_width));
        for (part_index, part) in wrapped.into_iter().enumerate() {
            let prefix = if index == 0 && part_index == 0 {
                Span::styled(label.clone(), Style::default().fg(theme.text_muted))
            } else {
                Span::raw(" ".repeat(label_width))
            };
            out.push(Line::from(vec![prefix, Span::styled(part, value_style)]));
        }
    }
    out
}

fn draw_footer(frame: &mut Frame<'_>, app: &mut App, card: &Card, area: Rect, theme: &ThemePalette) {
    let pagination = card.pagination;
    let text = pagination.text();
    let button_style = |disabled: bool| {
        if disabled {
            Style::default().fg(theme.border_panel)
        } else {
            Style::default()
                .fg(theme.accent_primary)
                .add_modifier(Modifier::BOLD)
        }
    };

    let prev_width = PREV_LABEL.chars().count() as u16;
    let next_width = NEXT_LABEL.chars().count() as u16;
    let text_width = text.chars().count() as u16;
    let gap = area
        .width
        .saturating_sub(prev_width + next_width + text_width)
        / 2;

    let line = Line::from(vec![
        Span::styled(PREV_LABEL, button_style(pagination.prev_disabled())),
        Span::raw(" ".repeat(gap as usize)),
        Span::styled(text, Style::default().fg(theme.text_muted)),
        Span::raw(" ".repeat(gap as usize)),
        Span::styled(NEXT_LABEL, button_style(pagination.next_disabled())),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    if !pagination.prev_disabled() {
        app.register_mouse_region(MouseTarget::PrevButton, area.x, area.y, prev_width, 1);
    }
    if !pagination.next_disabled() {
        let x = area
            .x
            .saturating_add(prev_width)
            .saturating_add(gap.saturating_mul(2))
            .saturating_add(text_width);
        app.register_mouse_region(MouseTarget::NextButton, x, area.y, next_width, 1);
    }
}
