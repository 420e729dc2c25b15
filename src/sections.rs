use serde::{Deserialize, Serialize};

const SECTION_COUNT: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    KeyInformation,
    Location,
    Message,
    Flows,
    CleanCode,
    TechnicalDetails,
    Tags,
}

impl SectionId {
    pub const ALL: [SectionId; SECTION_COUNT] = [
        Self::KeyInformation,
        Self::Location,
        Self::Message,
        Self::Flows,
        Self::CleanCode,
        Self::TechnicalDetails,
        Self::Tags,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::KeyInformation => "Key Information",
            Self::Location => "Location",
            Self::Message => "Message",
            Self::Flows => "Flows",
            Self::CleanCode => "Clean Code",
            Self::TechnicalDetails => "Technical Details",
            Self::Tags => "Tags",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|section| *section == self)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionDefault {
    #[default]
    Expanded,
    Collapsed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionToggles {
    expanded: [bool; SECTION_COUNT],
}

impl SectionToggles {
    pub fn new(default: SectionDefault) -> Self {
        Self {
            expanded: [default == SectionDefault::Expanded; SECTION_COUNT],
        }
    }

    pub fn is_expanded(&self, section: SectionId) -> bool {
        self.expanded[section.index()]
    }

    /// Flips the section and returns its new state.
    pub fn toggle(&mut self, section: SectionId) -> bool {
        let slot = &mut self.expanded[section.index()];
        *slot = !*slot;
        *slot
    }

    pub fn set_all(&mut self, expanded: bool) {
        self.expanded = [expanded; SECTION_COUNT];
    }

    pub fn icon(&self, section: SectionId) -> &'static str {
        if self.is_expanded(section) { "▾" } else { "▸" }
    }
}

impl Default for SectionToggles {
    fn default() -> Self {
        Self::new(SectionDefault::default())
    }
}
