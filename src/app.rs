use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tracing::debug;

use crate::card::Card;
use crate::chat::{ChatPanel, ChatReply, ChatRequest};
use crate::config::Config;
use crate::issue::Issue;
use crate::keybinds::{Action, Keybinds};
use crate::loader::LoadState;
use crate::sections::{SectionId, SectionToggles};

mod accessors;
mod input;
mod navigation;
mod navigation_mouse;

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    SendChat(ChatRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseTarget {
    SectionTitle(SectionId),
    PrevButton,
    NextButton,
    CardPane,
    ChatPane,
    ChatInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MouseRegion {
    target: MouseTarget,
    x: u16,
    y: u16,
    width: u16,
    height: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Card,
    Chat,
}

pub struct App {
    config: Config,
    keybinds: Keybinds,
    issues: Vec<Issue>,
    current: usize,
    card: Option<Card>,
    load_state: LoadState,
    sections: SectionToggles,
    chat: ChatPanel,
    focus: Focus,
    help_visible: bool,
    status: String,
    card_scroll: u16,
    mouse_regions: Vec<MouseRegion>,
    action: Option<AppAction>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            keybinds: Keybinds::from_overrides(&config.keys),
            sections: SectionToggles::new(config.sections),
            config,
            issues: Vec::new(),
            current: 0,
            card: None,
            load_state: LoadState::Loading,
            chat: ChatPanel::default(),
            focus: Focus::Card,
            help_visible: false,
            status: "Loading issues...".to_string(),
            card_scroll: 0,
            mouse_regions: Vec::new(),
            action: None,
            should_quit: false,
        }
    }

    /// Installs the result of a data load and shows the first card.
    pub fn finish_load(&mut self, outcome: Result<Vec<Issue>, String>) {
        self.load_state = LoadState::from_outcome(&outcome);
        self.status = match &self.load_state {
            LoadState::Failed(message) => format!("load failed: {}", message),
            LoadState::Empty => "no issues".to_string(),
            _ => String::new(),
        };
        self.issues = outcome.unwrap_or_default();
        self.current = 0;
        self.card = None;
        if !self.issues.is_empty() {
            self.show_card(0);
            self.status = format!("{} issues", self.issues.len());
        }
    }

    pub fn finish_chat(&mut self, outcome: Result<ChatReply, String>) {
        if let Err(error) = &outcome {
            self.status = format!("chat failed: {}", error);
        }
        self.chat.finish(outcome);
    }

    pub fn take_action(&mut self) -> Option<AppAction> {
        self.action.take()
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }
}
