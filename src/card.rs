use crate::format::{
    self, FlowView, FlowsDisplay, ImpactView, ImpactsDisplay, NO_FLOWS, NO_IMPACTS, NO_MESSAGE,
    NO_TAGS, NOT_SPECIFIED,
};
use crate::issue::{FieldValue, Issue};
use crate::sections::SectionId;

const DEFAULT_SEVERITY_LEVEL: &str = "INFO";
const UNKNOWN_SEVERITY: &str = "Unknown";

/// Every value shown on a card, keyed by meaning rather than by where it is
/// drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardField {
    Key,
    Rule,
    Type,
    Status,
    IssueStatus,
    Component,
    Project,
    ProjectName,
    Organization,
    Line,
    Hash,
    TextRange,
    Message,
    Flows,
    CleanCodeAttribute,
    CleanCodeAttributeCategory,
    Impacts,
    Effort,
    Debt,
    Author,
    CreationDate,
    UpdateDate,
    Tags,
}

impl CardField {
    pub const ALL: [CardField; 23] = [
        Self::Key,
        Self::Rule,
        Self::Type,
        Self::Status,
        Self::IssueStatus,
        Self::Component,
        Self::Project,
        Self::ProjectName,
        Self::Organization,
        Self::Line,
        Self::Hash,
        Self::TextRange,
        Self::Message,
        Self::Flows,
        Self::CleanCodeAttribute,
        Self::CleanCodeAttributeCategory,
        Self::Impacts,
        Self::Effort,
        Self::Debt,
        Self::Author,
        Self::CreationDate,
        Self::UpdateDate,
        Self::Tags,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Key => "Key",
            Self::Rule => "Rule",
            Self::Type => "Type",
            Self::Status => "Status",
            Self::IssueStatus => "Issue Status",
            Self::Component => "Component",
            Self::Project => "Project",
            Self::ProjectName => "Project Name",
            Self::Organization => "Organization",
            Self::Line => "Line",
            Self::Hash => "Hash",
            Self::TextRange => "Text Range",
            Self::Message => "Message",
            Self::Flows => "Flows",
            Self::CleanCodeAttribute => "Clean Code Attribute",
            Self::CleanCodeAttributeCategory => "Attribute Category",
            Self::Impacts => "Impacts",
            Self::Effort => "Effort",
            Self::Debt => "Debt",
            Self::Author => "Author",
            Self::CreationDate => "Created",
            Self::UpdateDate => "Updated",
            Self::Tags => "Tags",
        }
    }

    pub fn section(self) -> SectionId {
        match self {
            Self::Key | Self::Rule | Self::Type | Self::Status | Self::IssueStatus => {
                SectionId::KeyInformation
            }
            Self::Component
            | Self::Project
            | Self::ProjectName
            | Self::Organization
            | Self::Line
            | Self::Hash
            | Self::TextRange => SectionId::Location,
            Self::Message => SectionId::Message,
            Self::Flows => SectionId::Flows,
            Self::CleanCodeAttribute | Self::CleanCodeAttributeCategory | Self::Impacts => {
                SectionId::CleanCode
            }
            Self::Effort | Self::Debt | Self::Author | Self::CreationDate | Self::UpdateDate => {
                SectionId::TechnicalDetails
            }
            Self::Tags => SectionId::Tags,
        }
    }

    /// Sections whose single field fills the section body, drawn without a
    /// label column.
    pub fn is_standalone(self) -> bool {
        matches!(self, Self::Message | Self::Flows | Self::Tags)
    }

    pub fn in_section(section: SectionId) -> impl Iterator<Item = CardField> {
        Self::ALL
            .into_iter()
            .filter(move |field| field.section() == section)
    }

    fn scalar(self, issue: &Issue) -> Option<&FieldValue> {
        match self {
            Self::Key => issue.key.as_ref(),
            Self::Rule => issue.rule.as_ref(),
            Self::Type => issue.issue_type.as_ref(),
            Self::Status => issue.status.as_ref(),
            Self::IssueStatus => issue.issue_status.as_ref(),
            Self::Component => issue.component.as_ref(),
            Self::Project => issue.project.as_ref(),
            Self::ProjectName => issue.project_name.as_ref(),
            Self::Organization => issue.organization.as_ref(),
            Self::Line => issue.line.as_ref(),
            Self::Hash => issue.hash.as_ref(),
            Self::Message => issue.message.as_ref(),
            Self::CleanCodeAttribute => issue.clean_code_attribute.as_ref(),
            Self::CleanCodeAttributeCategory => issue.clean_code_attribute_category.as_ref(),
            Self::Effort => issue.effort.as_ref(),
            Self::Debt => issue.debt.as_ref(),
            Self::Author => issue.author.as_ref(),
            Self::CreationDate => issue.creation_date.as_ref(),
            Self::UpdateDate => issue.update_date.as_ref(),
            Self::Tags => issue.tags.as_ref(),
            Self::TextRange | Self::Flows | Self::Impacts => None,
        }
    }

    fn display(self, issue: &Issue) -> FieldDisplay {
        match self {
            Self::TextRange => text_or_placeholder(format::format_text_range(
                issue.text_range.as_ref(),
            )),
            Self::CreationDate | Self::UpdateDate => {
                text_or_placeholder(format::format_date(self.scalar(issue)))
            }
            Self::Flows => match format::format_flows(issue.flows.as_ref()) {
                FlowsDisplay::Missing => FieldDisplay::Placeholder(NO_FLOWS),
                FlowsDisplay::Invalid(message) => FieldDisplay::Text(message),
                FlowsDisplay::Flows(flows) => FieldDisplay::Flows(flows),
            },
            Self::Impacts => match format::format_impacts(issue.impacts.as_ref()) {
                ImpactsDisplay::Missing => FieldDisplay::Placeholder(NO_IMPACTS),
                ImpactsDisplay::Raw(raw) => FieldDisplay::Text(raw),
                ImpactsDisplay::Impacts(impacts) => FieldDisplay::Impacts(impacts),
            },
            Self::Tags => {
                let tags = format::format_tags(self.scalar(issue));
                if tags.is_empty() {
                    FieldDisplay::Placeholder(NO_TAGS)
                } else {
                    FieldDisplay::Tags(tags)
                }
            }
            Self::Message => self
                .scalar(issue)
                .and_then(FieldValue::display)
                .map(FieldDisplay::Text)
                .unwrap_or(FieldDisplay::Placeholder(NO_MESSAGE)),
            _ => self
                .scalar(issue)
                .and_then(FieldValue::display)
                .map(FieldDisplay::Text)
                .unwrap_or(FieldDisplay::Placeholder(NOT_SPECIFIED)),
        }
    }
}

fn text_or_placeholder(text: String) -> FieldDisplay {
    if text == NOT_SPECIFIED {
        return FieldDisplay::Placeholder(NOT_SPECIFIED);
    }
    FieldDisplay::Text(text)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldDisplay {
    Text(String),
    Placeholder(&'static str),
    Flows(Vec<FlowView>),
    Impacts(Vec<ImpactView>),
    Tags(Vec<String>),
}

impl FieldDisplay {
    pub fn plain_lines(&self) -> Vec<String> {
        match self {
            Self::Text(text) => text.lines().map(ToString::to_string).collect(),
            Self::Placeholder(text) => vec![(*text).to_string()],
            Self::Flows(flows) => FlowsDisplay::Flows(flows.clone()).lines(),
            Self::Impacts(impacts) => ImpactsDisplay::Impacts(impacts.clone()).lines(),
            Self::Tags(tags) => vec![
                tags.iter()
                    .map(|tag| format!("[{}]", tag))
                    .collect::<Vec<String>>()
                    .join(" "),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityBadge {
    pub label: String,
    pub level: String,
}

impl SeverityBadge {
    pub fn from_issue(issue: &Issue) -> Self {
        let severity = issue.severity_text();
        Self {
            label: severity
                .clone()
                .unwrap_or_else(|| UNKNOWN_SEVERITY.to_string()),
            level: severity
                .map(|value| value.to_uppercase())
                .unwrap_or_else(|| DEFAULT_SEVERITY_LEVEL.to_string()),
        }
    }

    pub fn tag(&self) -> String {
        format!("severity-{}", self.level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub index: usize,
    pub total: usize,
}

impl Pagination {
    pub fn text(&self) -> String {
        format!("Issue {} of {}", self.index + 1, self.total)
    }

    pub fn prev_disabled(&self) -> bool {
        self.index == 0
    }

    pub fn next_disabled(&self) -> bool {
        self.index + 1 >= self.total
    }
}

/// A fully formatted issue, ready to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub fields: Vec<(CardField, FieldDisplay)>,
    pub severity: SeverityBadge,
    pub pagination: Pagination,
}

impl Card {
    pub fn render(issue: &Issue, index: usize, total: usize) -> Self {
        Self {
            fields: CardField::ALL
                .into_iter()
                .map(|field| (field, field.display(issue)))
                .collect(),
            severity: SeverityBadge::from_issue(issue),
            pagination: Pagination { index, total },
        }
    }

    pub fn field(&self, field: CardField) -> Option<&FieldDisplay> {
        self.fields
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, display)| display)
    }

    pub fn field_text(&self, field: CardField) -> String {
        self.field(field)
            .map(|display| display.plain_lines().join("\n"))
            .unwrap_or_default()
    }

    /// Plain-text rendering for non-interactive output.
    pub fn plain_text(&self) -> String {
        let mut out = vec![
            format!("[{}] {}", self.severity.label, self.field_text(CardField::Key)),
            self.pagination.text(),
        ];
        for section in SectionId::ALL {
            out.push(String::new());
            out.push(format!("== {} ==", section.title()));
            for field in CardField::in_section(section) {
                let lines = self.field(field).map(FieldDisplay::plain_lines).unwrap_or_default();
                if field.is_standalone() {
                    out.extend(lines);
                    continue;
                }
                let mut lines = lines.into_iter();
                out.push(format!(
                    "{}: {}",
                    field.label(),
                    lines.next().unwrap_or_default()
                ));
                out.extend(lines.map(|line| format!("  {}", line)));
            }
        }
        out.join("\n")
    }
}
