use super::*;

use crate::loader::LoadState;

pub(super) fn draw_status(frame: &mut Frame<'_>, app: &App, area: Rect, theme: &ThemePalette) {
    frame.render_widget(Clear, area);

    let (mode, mode_color) = mode_meta(app, theme);
    let (load, load_color) = load_meta(app.load_state(), theme);
    let status = app.status();
    let status_text = if status.is_empty() { "ready" } else { status };

    let mut spans = vec![
        Span::styled(
            format!("{:^8}", mode),
            Style::default()
                .fg(theme.bg_app)
                .bg(mode_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format!("[{}]", load),
            Style::default().fg(load_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(status_text.to_string(), Style::default().fg(theme.text_primary)),
    ];
    if let Some(card) = app.card() {
        spans.push(Span::styled(" • ", Style::default().fg(theme.border_panel)));
        spans.push(Span::styled(
            card.pagination.text(),
            Style::default().fg(theme.text_muted),
        ));
    }
    spans.push(Span::styled(" • ", Style::default().fg(theme.border_panel)));
    spans.push(Span::styled(
        format!("{} help", app.keybinds().label(Action::Help)),
        Style::default().fg(theme.text_muted),
    ));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.bg_panel_alt)),
        area,
    );
}

pub(super) fn draw_help_overlay(frame: &mut Frame<'_>, app: &App, area: Rect, theme: &ThemePalette) {
    let popup = centered_rect(70, 80, area);
    frame.render_widget(Clear, popup);
    let shell = popup_block("Keyboard Help", theme);
    let inner = shell.inner(popup).inner(Margin {
        vertical: 1,
        horizontal: 1,
    });
    frame.render_widget(shell, popup);

    let mut lines = vec![Line::from(Span::styled(
        "Card",
        Style::default()
            .fg(theme.accent_subtle)
            .add_modifier(Modifier::BOLD),
    ))];
    let key_width = BINDING_SPECS
        .iter()
        .map(|spec| app.keybinds().label(spec.action).chars().count())
        .max()
        .unwrap_or(0);
    for spec in BINDING_SPECS {
        lines.push(help_row(
            app.keybinds().label(spec.action),
            spec.description,
            key_width,
            theme,
        ));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Chat input",
        Style::default()
            .fg(theme.accent_subtle)
            .add_modifier(Modifier::BOLD),
    )));
    for (key, description) in [
        ("enter", "Send message"),
        ("esc/tab", "Back to card"),
        ("ctrl+u", "Clear input"),
        ("up/down", "Scroll transcript"),
    ] {
        lines.push(help_row(key, description, key_width, theme));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Click a section title to fold it. Press ? or esc to close.",
        Style::default()
            .fg(theme.accent_success)
            .add_modifier(Modifier::BOLD),
    )));

    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .style(Style::default().bg(theme.bg_popup))
            .wrap(Wrap { trim: false }),
        inner,
    );
}

fn help_row(key: &str, description: &str, width: usize, theme: &ThemePalette) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {:<width$} ", key, width = width),
            Style::default()
                .fg(theme.bg_app)
                .bg(theme.accent_subtle)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(description.to_string(), Style::default().fg(theme.text_primary)),
    ])
}

fn mode_meta(app: &App, theme: &ThemePalette) -> (&'static str, Color) {
    if app.help_overlay_visible() {
        return ("HELP", theme.accent_subtle);
    }
    match app.focus() {
        Focus::Card => ("CARD", theme.accent_primary),
        Focus::Chat => ("CHAT", theme.accent_success),
    }
}

fn load_meta(state: &LoadState, theme: &ThemePalette) -> (&'static str, Color) {
    match state {
        LoadState::Loading => ("loading", theme.accent_subtle),
        LoadState::Loaded => ("loaded", theme.accent_success),
        LoadState::Empty => ("empty", theme.text_muted),
        LoadState::Failed(_) => ("error", theme.accent_danger),
    }
}
