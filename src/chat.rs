use serde::{Deserialize, Serialize};

use crate::issue::Issue;
use crate::markdown::html_to_text;

pub const TRANSPORT_ERROR: &str = "Sorry, I encountered an error.";
const EMPTY_RESPONSE: &str = "empty response";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatSender {
    User,
    Bot,
    Error,
}

impl ChatSender {
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Bot => "Assistant",
            Self::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: ChatSender,
    pub content: String,
}

/// Body of the chat request. `csv_data` holds the displayed issue, or nothing
/// when no issues are loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(rename = "csvData")]
    pub csv_data: Vec<Issue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub original_markdown: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    /// Markdown source of the answer.
    Answer(String),
    Rejected(String),
}

impl ChatResponse {
    pub fn into_reply(self) -> ChatReply {
        if let Some(error) = self.error.filter(|text| !text.is_empty()) {
            return ChatReply::Rejected(error);
        }
        if let Some(markdown) = self.original_markdown.filter(|text| !text.trim().is_empty()) {
            return ChatReply::Answer(markdown);
        }
        match self.response {
            Some(html) => ChatReply::Answer(html_to_text(&html)),
            None => ChatReply::Rejected(EMPTY_RESPONSE.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChatPanel {
    input: String,
    transcript: Vec<ChatMessage>,
    thinking: bool,
    scroll_from_bottom: u16,
}

impl ChatPanel {
    pub fn input(&self) -> &str {
        self.input.as_str()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    pub fn push_char(&mut self, ch: char) {
        self.input.push(ch);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Starts a send of the typed message.
    ///
    /// Returns `None` without touching the transcript when the input is blank
    /// or a reply is still pending.
    pub fn begin_send(&mut self, current: Option<&Issue>) -> Option<ChatRequest> {
        if self.thinking {
            return None;
        }
        let message = self.input.trim().to_string();
        if message.is_empty() {
            return None;
        }

        self.push(ChatSender::User, message.clone());
        self.input.clear();
        self.thinking = true;
        Some(ChatRequest {
            message,
            csv_data: current.cloned().into_iter().collect(),
        })
    }

    /// Records the outcome of a send. `Err` carries a transport failure.
    pub fn finish(&mut self, outcome: Result<ChatReply, String>) {
        match outcome {
            Ok(ChatReply::Answer(text)) => self.push(ChatSender::Bot, text),
            Ok(ChatReply::Rejected(error)) => {
                self.push(ChatSender::Error, format!("Error: {}", error))
            }
            Err(_) => self.push(ChatSender::Error, TRANSPORT_ERROR.to_string()),
        }
        self.thinking = false;
    }

    pub fn scroll_from_bottom(&self) -> u16 {
        self.scroll_from_bottom
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    pub fn clamp_scroll(&mut self, max: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.min(max);
    }

    fn push(&mut self, sender: ChatSender, content: String) {
        self.transcript.push(ChatMessage { sender, content });
        self.scroll_from_bottom = 0;
    }
}
