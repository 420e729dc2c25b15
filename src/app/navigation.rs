use super::*;

impl App {
    /// Renders the card at `index`. Out-of-range requests are ignored and
    /// leave the current card in place.
    pub fn show_card(&mut self, index: usize) -> bool {
        let Some(issue) = self.issues.get(index) else {
            return false;
        };
        let card = Card::render(issue, index, self.issues.len());
        debug!(
            index,
            key = issue.key_text().as_deref().unwrap_or("-"),
            badge = %card.severity.tag(),
            "showing card"
        );
        self.card = Some(card);
        self.current = index;
        self.card_scroll = 0;
        true
    }

    pub fn next_issue(&mut self) -> bool {
        self.show_card(self.current.saturating_add(1))
    }

    pub fn prev_issue(&mut self) -> bool {
        match self.current.checked_sub(1) {
            Some(index) => self.show_card(index),
            None => false,
        }
    }

    pub fn first_issue(&mut self) -> bool {
        self.show_card(0)
    }

    pub fn last_issue(&mut self) -> bool {
        match self.issues.len().checked_sub(1) {
            Some(index) => self.show_card(index),
            None => false,
        }
    }

    pub fn toggle_section(&mut self, section: SectionId) {
        let expanded = self.sections.toggle(section);
        let state = if expanded { "expanded" } else { "collapsed" };
        self.status = format!("{} {}", section.title(), state);
    }

    pub fn set_all_sections(&mut self, expanded: bool) {
        self.sections.set_all(expanded);
        self.status = if expanded {
            "all sections expanded".to_string()
        } else {
            "all sections collapsed".to_string()
        };
    }

    pub fn scroll_card_down(&mut self, lines: u16) {
        self.card_scroll = self.card_scroll.saturating_add(lines);
    }

    pub fn scroll_card_up(&mut self, lines: u16) {
        self.card_scroll = self.card_scroll.saturating_sub(lines);
    }

    /// Called by the renderer once the wrapped card height is known.
    pub fn clamp_card_scroll(&mut self, max: u16) {
        self.card_scroll = self.card_scroll.min(max);
    }

    pub fn focus_chat(&mut self) {
        self.focus = Focus::Chat;
    }

    pub fn focus_card(&mut self) {
        self.focus = Focus::Card;
    }

    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    /// Sends the typed chat message with the displayed issue as context.
    pub fn send_message(&mut self) {
        let current = self.card.as_ref().and_then(|_| self.issues.get(self.current));
        let Some(request) = self.chat.begin_send(current) else {
            return;
        };
        self.status = "waiting for assistant...".to_string();
        self.action = Some(AppAction::SendChat(request));
    }
}
