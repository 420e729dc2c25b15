use super::*;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub(super) fn popup_block<'a>(title: &'a str, theme: &ThemePalette) -> Block<'a> {
    Block::default()
        .title(Line::from(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(theme.border_popup)
                .add_modifier(Modifier::BOLD),
        )))
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .style(Style::default().bg(theme.bg_popup).fg(theme.text_primary))
        .border_style(Style::default().fg(theme.border_popup))
}

pub(super) fn panel_block_with_border<'a>(
    title: &'a str,
    border: Color,
    theme: &ThemePalette,
) -> Block<'a> {
    let focused = border == theme.border_focus;
    let title_color = if focused {
        theme.border_focus
    } else {
        theme.accent_primary
    };
    let border_type = if focused {
        BorderType::Thick
    } else {
        BorderType::Rounded
    };
    Block::default()
        .title(Line::from(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(title_color)
                .add_modifier(Modifier::BOLD),
        )))
        .borders(Borders::ALL)
        .border_type(border_type)
        .style(Style::default().bg(theme.bg_panel).fg(theme.text_primary))
        .border_style(Style::default().fg(border))
}

pub(super) fn focus_border(focused: bool, theme: &ThemePalette) -> Color {
    if focused {
        theme.border_focus
    } else {
        theme.border_panel
    }
}

pub(super) fn register_mouse_region(app: &mut App, target: MouseTarget, area: Rect) {
    app.register_mouse_region(target, area.x, area.y, area.width, area.height);
}

/// Registers a one-row target at `line` of a scrolled paragraph, skipping it
/// when the line is outside the visible window.
pub(super) fn register_inline_button(
    app: &mut App,
    area: Rect,
    scroll: u16,
    line: usize,
    x_offset: u16,
    width: u16,
    target: MouseTarget,
) {
    if area.width == 0 || area.height == 0 || width == 0 {
        return;
    }
    let Ok(line) = u16::try_from(line) else {
        return;
    };
    if line < scroll {
        return;
    }
    let y = area.y.saturating_add(line - scroll);
    if y >= area.y.saturating_add(area.height) {
        return;
    }
    let max_width = area.width.saturating_sub(x_offset);
    if max_width == 0 {
        return;
    }
    let x = area.x.saturating_add(x_offset);
    app.register_mouse_region(target, x, y, width.min(max_width), 1);
}

/// One terminal cell run: a character and the style it is drawn with.
type Cell = (char, Style);

fn cell_width(cells: &[Cell]) -> usize {
    cells
        .iter()
        .map(|(ch, _)| UnicodeWidthChar::width(*ch).unwrap_or(0))
        .sum()
}

/// Length of the longest prefix that fits in `width` columns. Always at least
/// one cell so an over-wide character still makes progress.
fn fitting_prefix(cells: &[Cell], width: usize) -> usize {
    let mut used = 0usize;
    for (index, (ch, _)) in cells.iter().enumerate() {
        used += UnicodeWidthChar::width(*ch).unwrap_or(0);
        if used > width {
            return index.max(1);
        }
    }
    cells.len()
}

/// Greedy word wrap on display width. Words wider than `width` are split.
fn wrap_cells(cells: &[Cell], width: usize) -> Vec<Vec<Cell>> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut row: Vec<Cell> = Vec::new();
    let mut row_width = 0usize;
    for word in cells.split(|(ch, _)| *ch == ' ') {
        let mut word = word;
        let mut word_width = cell_width(word);
        let gap = usize::from(row_width > 0);
        if row_width + gap + word_width <= width {
            if gap == 1 {
                let style = word.first().map(|(_, style)| *style).unwrap_or_default();
                row.push((' ', style));
            }
            row.extend_from_slice(word);
            row_width += gap + word_width;
            continue;
        }
        if row_width > 0 {
            rows.push(std::mem::take(&mut row));
        }
        while word_width > width {
            let split = fitting_prefix(word, width);
            rows.push(word[..split].to_vec());
            word_width -= cell_width(&word[..split]);
            word = &word[split..];
        }
        row = word.to_vec();
        row_width = word_width;
    }
    rows.push(row);
    rows
}

pub(super) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    text.split('\n')
        .flat_map(|raw| {
            let cells = raw.chars().map(|ch| (ch, Style::default())).collect::<Vec<_>>();
            wrap_cells(&cells, width)
        })
        .map(|row| row.into_iter().map(|(ch, _)| ch).collect())
        .collect()
}

/// Wraps a styled line into rows of at most `width` columns, keeping span
/// styles, so the row count is exact for scrolling.
pub(super) fn wrap_line(line: &Line<'_>, width: usize) -> Vec<Line<'static>> {
    let cells = line
        .spans
        .iter()
        .flat_map(|span| {
            let style = line.style.patch(span.style);
            span.content.chars().map(move |ch| (ch, style))
        })
        .collect::<Vec<_>>();

    wrap_cells(&cells, width)
        .into_iter()
        .map(|row| {
            let mut spans: Vec<Span<'static>> = Vec::new();
            let mut text = String::new();
            let mut current: Option<Style> = None;
            for (ch, style) in row {
                if current.is_some_and(|active| active != style) {
                    spans.push(Span::styled(std::mem::take(&mut text), current.unwrap_or_default()));
                }
                current = Some(style);
                text.push(ch);
            }
            if let Some(style) = current {
                spans.push(Span::styled(text, style));
            }
            Line::from(spans)
        })
        .collect()
}

pub(super) fn ellipsize(input: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if UnicodeWidthStr::width(input) <= max {
        return input.to_string();
    }
    let mut out = String::new();
    let mut used = 0usize;
    for ch in input.chars() {
        let width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + width > max - 1 {
            break;
        }
        used += width;
        out.push(ch);
    }
    out.push('…');
    out
}

pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::{ellipsize, wrap_line, wrap_text};
    use ratatui::style::{Modifier, Style};
    use ratatui::text::{Line, Span};

    #[test]
    fn wrap_text_breaks_on_words() {
        assert_eq!(
            wrap_text("alpha beta gamma", 10),
            vec!["alpha beta".to_string(), "gamma".to_string()]
        );
    }

    #[test]
    fn wrap_text_splits_long_words_and_keeps_blank_lines() {
        assert_eq!(
            wrap_text("abcdefghij\n\nx", 4),
            vec!["abcd", "efgh", "ij", "", "x"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn ellipsize_marks_truncation() {
        assert_eq!(ellipsize("src/main.rs", 6), "src/m…");
        assert_eq!(ellipsize("short", 10), "short");
    }

    #[test]
    fn wrap_text_measures_display_width() {
        assert_eq!(
            wrap_text("漢字漢字 ab", 4),
            vec!["漢字".to_string(), "漢字".to_string(), "ab".to_string()]
        );
        assert_eq!(ellipsize("漢字漢字", 5), "漢字…");
    }

    #[test]
    fn wrap_line_keeps_span_styles() {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let line = Line::from(vec![Span::raw("plain text "), Span::styled("bold words", bold)]);

        let rows = wrap_line(&line, 10);

        let texts = rows.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(texts, vec!["plain text", "bold words"]);
        assert!(rows[1].spans.iter().all(|span| span.style == bold));
        assert!(rows[0].spans.iter().all(|span| span.style == Style::default()));
    }

    #[test]
    fn wrap_line_splits_long_words() {
        let rows = wrap_line(&Line::from("abcdefghij"), 4);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].to_string(), "ij");
    }
}
