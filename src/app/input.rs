use super::*;

const SCROLL_STEP: u16 = 1;
const PAGE_STEP: u16 = 10;

impl App {
    pub fn on_key(&mut self, key: KeyEvent) {
        if self.help_visible {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?' | 'q')) {
                self.help_visible = false;
            }
            return;
        }

        match self.focus {
            Focus::Chat => self.on_chat_key(key),
            Focus::Card => self.on_card_key(key),
        }
    }

    fn on_card_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('d') => return self.scroll_card_down(PAGE_STEP),
                KeyCode::Char('u') => return self.scroll_card_up(PAGE_STEP),
                _ => {}
            }
        }
        match key.code {
            KeyCode::PageDown => return self.scroll_card_down(PAGE_STEP),
            KeyCode::PageUp => return self.scroll_card_up(PAGE_STEP),
            _ => {}
        }

        let Some(action) = self.keybinds.action_for(key) else {
            return;
        };
        self.apply(action);
    }

    pub(super) fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.request_quit(),
            Action::NextIssue => {
                self.next_issue();
            }
            Action::PrevIssue => {
                self.prev_issue();
            }
            Action::FirstIssue => {
                self.first_issue();
            }
            Action::LastIssue => {
                self.last_issue();
            }
            Action::ScrollDown => self.scroll_card_down(SCROLL_STEP),
            Action::ScrollUp => self.scroll_card_up(SCROLL_STEP),
            Action::ToggleSection(section) => self.toggle_section(section),
            Action::ExpandAll => self.set_all_sections(true),
            Action::CollapseAll => self.set_all_sections(false),
            Action::FocusChat => self.focus_chat(),
            Action::Help => self.toggle_help(),
        }
    }

    fn on_chat_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.request_quit(),
                KeyCode::Char('u') => self.chat.clear_input(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Tab | KeyCode::BackTab => self.focus_card(),
            KeyCode::Enter => self.send_message(),
            KeyCode::Backspace => self.chat.backspace(),
            KeyCode::Up => self.chat.scroll_up(SCROLL_STEP),
            KeyCode::Down => self.chat.scroll_down(SCROLL_STEP),
            KeyCode::PageUp => self.chat.scroll_up(PAGE_STEP),
            KeyCode::PageDown => self.chat.scroll_down(PAGE_STEP),
            KeyCode::Char(ch) => self.chat.push_char(ch),
            _ => {}
        }
    }
}
