use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::theme::ThemePalette;

/// Renders assistant markdown into styled terminal lines.
///
/// Raw HTML inside the markdown is shown as literal text, never interpreted.
/// Link targets are collected and listed after the body as `[n] url`.
pub fn render(input: &str, theme: &ThemePalette) -> Vec<Line<'static>> {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS;
    let mut writer = MarkdownWriter::new(theme);
    for event in Parser::new_ext(input, options) {
        writer.handle(event);
    }
    writer.finish()
}

struct MarkdownWriter<'t> {
    theme: &'t ThemePalette,
    lines: Vec<Vec<Span<'static>>>,
    styles: Vec<Style>,
    links: Vec<String>,
    pending_link: Option<usize>,
    list_depth: usize,
    quote_depth: usize,
    table_cell: usize,
}

impl<'t> MarkdownWriter<'t> {
    fn new(theme: &'t ThemePalette) -> Self {
        Self {
            theme,
            lines: vec![Vec::new()],
            styles: vec![Style::default().fg(theme.text_primary)],
            links: Vec::new(),
            pending_link: None,
            list_depth: 0,
            quote_depth: 0,
            table_cell: 0,
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(text.as_ref()),
            Event::Code(code) => {
                let style = Style::default()
                    .fg(self.theme.accent_subtle)
                    .bg(self.theme.bg_panel_alt);
                self.span(Span::styled(code.into_string(), style));
            }
            Event::Html(html) | Event::InlineHtml(html) => self.text(html.as_ref()),
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => self.break_line(),
            Event::Rule => {
                self.blank_line();
                self.span(Span::styled(
                    "─".repeat(32),
                    Style::default().fg(self.theme.border_panel),
                ));
                self.break_line();
            }
            Event::TaskListMarker(done) => self.text(if done { "[x] " } else { "[ ] " }),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph if self.list_depth > 0 => {}
            Tag::Paragraph => self.blank_line(),
            Tag::Heading { level, .. } => {
                self.blank_line();
                let style = self.heading_style(level);
                self.styles.push(style);
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::BlockQuote(_) => {
                self.quote_depth += 1;
                self.break_line();
            }
            Tag::List(_) => {
                self.list_depth += 1;
                self.break_line();
            }
            Tag::Item => {
                self.break_line();
                let indent = "  ".repeat(self.list_depth.saturating_sub(1));
                self.span(Span::styled(
                    format!("{}• ", indent),
                    Style::default().fg(self.theme.accent_primary),
                ));
            }
            Tag::CodeBlock(_) => {
                self.blank_line();
                self.push_style(
                    Style::default()
                        .fg(self.theme.accent_success)
                        .bg(self.theme.bg_panel_alt),
                );
            }
            Tag::Link { dest_url, .. } => {
                self.links.push(dest_url.to_string());
                self.pending_link = Some(self.links.len());
                self.push_style(
                    Style::default()
                        .fg(self.theme.accent_subtle)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            Tag::Table(_) => {
                self.blank_line();
                self.table_cell = 0;
            }
            Tag::TableHead => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::TableRow => {
                self.break_line();
                self.table_cell = 0;
            }
            Tag::TableCell => {
                if self.table_cell > 0 {
                    self.span(Span::styled(
                        " │ ",
                        Style::default().fg(self.theme.border_panel),
                    ));
                }
                self.table_cell += 1;
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.break_line(),
            TagEnd::Heading(_) => {
                self.pop_style();
                self.break_line();
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::BlockQuote(_) => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.break_line();
            }
            TagEnd::List(_) => {
                self.list_depth = self.list_depth.saturating_sub(1);
                self.break_line();
            }
            TagEnd::CodeBlock => {
                self.pop_style();
                self.break_line();
            }
            TagEnd::Link => {
                self.pop_style();
                if let Some(index) = self.pending_link.take() {
                    self.span(Span::styled(
                        format!("[{}]", index),
                        Style::default().fg(self.theme.text_muted),
                    ));
                }
            }
            TagEnd::TableHead => {
                self.pop_style();
                self.table_cell = 0;
            }
            TagEnd::Table => self.break_line(),
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        if !self.links.is_empty() {
            self.blank_line();
            let muted = Style::default().fg(self.theme.text_muted);
            for (index, link) in std::mem::take(&mut self.links).into_iter().enumerate() {
                self.span(Span::styled(format!("[{}] {}", index + 1, link), muted));
                self.new_line();
            }
        }
        while self.lines.len() > 1 && self.lines.first().is_some_and(Vec::is_empty) {
            self.lines.remove(0);
        }
        while self.lines.len() > 1 && self.lines.last().is_some_and(Vec::is_empty) {
            self.lines.pop();
        }
        self.lines.into_iter().map(Line::from).collect()
    }

    fn heading_style(&self, level: HeadingLevel) -> Style {
        let color = match level {
            HeadingLevel::H1 => self.theme.accent_primary,
            HeadingLevel::H2 => self.theme.accent_subtle,
            _ => self.theme.text_primary,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    fn blank_line(&mut self) {
        if self.lines.last().is_some_and(|line| !line.is_empty()) {
            self.break_line();
        }
        if self.lines.len() > 1 && !self.lines[self.lines.len() - 2].is_empty() {
            self.lines.push(Vec::new());
        }
    }

    fn break_line(&mut self) {
        if self.lines.last().is_some_and(|line| line.is_empty()) && self.quote_depth == 0 {
            return;
        }
        self.new_line();
    }

    fn new_line(&mut self) {
        self.lines.push(Vec::new());
        if self.quote_depth > 0 {
            self.span(Span::styled(
                "│ ".repeat(self.quote_depth),
                Style::default().fg(self.theme.text_muted),
            ));
        }
    }

    fn push_style(&mut self, style: Style) {
        let merged = self.current_style().patch(style);
        self.styles.push(merged);
    }

    fn pop_style(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    fn current_style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn text(&mut self, text: &str) {
        let style = self.current_style();
        for (index, part) in text.split('\n').enumerate() {
            if index > 0 {
                self.new_line();
            }
            if !part.is_empty() {
                self.span(Span::styled(part.to_string(), style));
            }
        }
    }

    fn span(&mut self, span: Span<'static>) {
        match self.lines.last_mut() {
            Some(line) => line.push(span),
            None => self.lines.push(vec![span]),
        }
    }
}

/// Reduces an HTML answer to markdown-flavoured plain text.
///
/// Tags are dropped (block tags become line breaks, list items bullets, `pre`
/// blocks fenced code) and the common entities are decoded.
pub fn html_to_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find('<') {
        out.push_str(&decode_entities(&rest[..start]));
        let Some(end) = rest[start..].find('>') else {
            out.push_str(&decode_entities(&rest[start..]));
            rest = "";
            break;
        };
        let replacement = tag_replacement(&rest[start + 1..start + end]);
        if out.ends_with('\n') {
            out.push_str(replacement.strip_prefix('\n').unwrap_or(replacement));
        } else {
            out.push_str(replacement);
        }
        rest = &rest[start + end + 1..];
    }
    out.push_str(&decode_entities(rest));
    collapse_blank_lines(&out)
}

fn tag_replacement(tag: &str) -> &'static str {
    let closing = tag.starts_with('/');
    let name = tag
        .trim_start_matches('/')
        .split(|ch: char| ch.is_whitespace() || ch == '/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match (name.as_str(), closing) {
        ("br", _) => "\n",
        ("hr", _) => "\n\n---\n\n",
        ("li", false) => "\n- ",
        ("pre", _) => "\n```\n",
        ("h1", false) => "\n\n# ",
        ("h2", false) => "\n\n## ",
        ("h3", false) => "\n\n### ",
        ("h4" | "h5" | "h6", false) => "\n\n#### ",
        ("tr", true) => "\n",
        ("td" | "th", true) => " | ",
        ("strong" | "b", _) => "**",
        ("p" | "div" | "ul" | "ol" | "table" | "blockquote", _) => "\n\n",
        ("h1" | "h2" | "h3" | "h4" | "h5" | "h6", true) => "\n\n",
        _ => "",
    }
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        let decoded = candidate.find(';').filter(|end| *end <= 10).and_then(|end| {
            let entity = &candidate[1..end];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" | "#39" => Some('\''),
                "nbsp" => Some(' '),
                _ => entity
                    .strip_prefix("#x")
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            }?;
            Some((ch, end))
        });
        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &candidate[end + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn collapse_blank_lines(text: &str) -> String {
    let mut lines = Vec::new();
    let mut blank_run = 0usize;
    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
            lines.push("");
            continue;
        }
        blank_run = 0;
        lines.push(line);
    }
    lines.join("\n").trim().to_string()
}
