use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::api::IssueApi;
use crate::issue::{Issue, parse_issue_list};

pub const EMPTY_MESSAGE: &str = "No data found in the issue export.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueSource {
    Server,
    File(PathBuf),
}

impl IssueSource {
    pub fn from_file(file: Option<PathBuf>) -> Self {
        match file {
            Some(path) => Self::File(path),
            None => Self::Server,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Empty,
    Failed(String),
}

impl LoadState {
    pub fn from_outcome(outcome: &Result<Vec<Issue>, String>) -> Self {
        match outcome {
            Ok(issues) if issues.is_empty() => Self::Empty,
            Ok(_) => Self::Loaded,
            Err(message) => Self::Failed(message.clone()),
        }
    }

    /// Text shown in place of the card while no issue is on screen.
    pub fn placeholder(&self) -> Option<String> {
        match self {
            Self::Loading => Some("Loading issues...".to_string()),
            Self::Loaded => None,
            Self::Empty => Some(EMPTY_MESSAGE.to_string()),
            Self::Failed(message) => Some(format!("Error loading data: {}", message)),
        }
    }
}

pub async fn load_issues(source: &IssueSource, api: &dyn IssueApi) -> Result<Vec<Issue>> {
    let issues = match source {
        IssueSource::Server => api.list_issues().await?,
        IssueSource::File(path) => read_issue_file(path)?,
    };
    info!(count = issues.len(), "issues loaded");
    Ok(issues)
}

pub fn read_issue_file(path: &Path) -> Result<Vec<Issue>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_issue_list(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::{IssueSource, LoadState, load_issues, read_issue_file};
    use crate::api::IssueApi;
    use crate::chat::{ChatRequest, ChatResponse};
    use crate::issue::{FieldValue, Issue};
    use anyhow::{Result, anyhow, bail};
    use async_trait::async_trait;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeApi {
        issues: Option<Vec<Issue>>,
        calls: AtomicUsize,
    }

    impl FakeApi {
        fn new(issues: Option<Vec<Issue>>) -> Self {
            Self {
                issues,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl IssueApi for FakeApi {
        async fn list_issues(&self) -> Result<Vec<Issue>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.issues {
                Some(issues) => Ok(issues.clone()),
                None => bail!("server returned 500 Internal Server Error: No CSV file available"),
            }
        }

        async fn chat(&self, _request: &ChatRequest) -> Result<ChatResponse> {
            Err(anyhow!("chat not expected"))
        }
    }

    fn issue(key: &str) -> Issue {
        Issue {
            key: Some(FieldValue::from(key)),
            ..Issue::default()
        }
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("issuedeck-{}-{}", std::process::id(), name));
        fs::write(&path, contents).expect("write temp file");
        path
    }

    #[tokio::test]
    async fn server_source_uses_api() {
        let api = FakeApi::new(Some(vec![issue("A-1"), issue("A-2")]));
        let issues = load_issues(&IssueSource::Server, &api).await.expect("load");
        assert_eq!(issues.len(), 2);
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn server_error_surfaces_message() {
        let api = FakeApi::new(None);
        let outcome = load_issues(&IssueSource::Server, &api)
            .await
            .map_err(|error| error.to_string());
        let state = LoadState::from_outcome(&outcome);
        let placeholder = state.placeholder().expect("placeholder");
        assert!(placeholder.starts_with("Error loading data: "));
        assert!(placeholder.contains("No CSV file available"));
    }

    #[tokio::test]
    async fn file_source_skips_api() {
        let path = temp_file("issues.json", r#"[{"key":"F-1","severity":"MAJOR"}]"#);
        let api = FakeApi::new(Some(Vec::new()));
        let issues = load_issues(&IssueSource::File(path.clone()), &api)
            .await
            .expect("load");
        let _ = fs::remove_file(&path);

        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
        assert_eq!(issues[0].key_text().as_deref(), Some("F-1"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = temp_file("broken.json", "{not json");
        let result = read_issue_file(&path);
        let _ = fs::remove_file(&path);
        assert!(result.is_err());
        assert!(read_issue_file(std::path::Path::new("/nonexistent/issues.json")).is_err());
    }

    #[test]
    fn load_state_maps_outcomes() {
        assert_eq!(LoadState::from_outcome(&Ok(Vec::new())), LoadState::Empty);
        assert_eq!(
            LoadState::Empty.placeholder().as_deref(),
            Some("No data found in the issue export.")
        );
        assert_eq!(LoadState::from_outcome(&Ok(vec![issue("A")])), LoadState::Loaded);
        assert_eq!(LoadState::Loaded.placeholder(), None);
        assert_eq!(
            LoadState::Loading.placeholder().as_deref(),
            Some("Loading issues...")
        );
    }
}
