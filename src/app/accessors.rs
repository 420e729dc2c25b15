use super::*;

impl App {
    pub fn keybinds(&self) -> &Keybinds {
        &self.keybinds
    }

    pub fn current_issue(&self) -> Option<&Issue> {
        self.card.as_ref()?;
        self.issues.get(self.current)
    }

    pub fn card(&self) -> Option<&Card> {
        self.card.as_ref()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn sections(&self) -> &SectionToggles {
        &self.sections
    }

    pub fn chat(&self) -> &ChatPanel {
        &self.chat
    }

    pub fn chat_mut(&mut self) -> &mut ChatPanel {
        &mut self.chat
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn help_overlay_visible(&self) -> bool {
        self.help_visible
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn card_scroll(&self) -> u16 {
        self.card_scroll
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn theme_name(&self) -> Option<&str> {
        self.config.theme.as_deref()
    }
}
