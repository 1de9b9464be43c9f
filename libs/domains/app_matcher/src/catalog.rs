//! Known application catalog

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{MatcherError, MatcherResult};
use crate::models::KnownApplication;

const BUILTIN_APPLICATIONS: &str = include_str!("../data/known_applications.json");

/// Parse and validate a JSON array of applications
pub fn parse_applications(json: &str) -> MatcherResult<Vec<KnownApplication>> {
    let applications: Vec<KnownApplication> = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    for app in &applications {
        if app.id.trim().is_empty() || app.name.trim().is_empty() {
            return Err(MatcherError::InvalidCatalog(format!(
                "application '{}' needs a non-empty id and name",
                app.id
            )));
        }
        if !seen.insert(app.id.to_lowercase()) {
            return Err(MatcherError::InvalidCatalog(format!(
                "duplicate application id '{}'",
                app.id
            )));
        }
    }

    info!(applications = applications.len(), "Loaded application catalog");
    Ok(applications)
}

pub fn builtin_applications() -> MatcherResult<Vec<KnownApplication>> {
    parse_applications(BUILTIN_APPLICATIONS)
}

pub fn load_applications(path: impl AsRef<Path>) -> MatcherResult<Vec<KnownApplication>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| MatcherError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_applications(&json)
}

/// Where the application list comes from
#[cfg_attr(test, mockall::automock)]
pub trait ApplicationSource: Send + Sync {
    fn load(&self) -> MatcherResult<Vec<KnownApplication>>;

    fn describe(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinApplications;

impl ApplicationSource for BuiltinApplications {
    fn load(&self) -> MatcherResult<Vec<KnownApplication>> {
        builtin_applications()
    }

    fn describe(&self) -> String {
        "builtin".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct FileApplications {
    path: PathBuf,
}

impl FileApplications {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ApplicationSource for FileApplications {
    fn load(&self) -> MatcherResult<Vec<KnownApplication>> {
        load_applications(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_applications() {
        let apps = builtin_applications().unwrap();
        assert!(apps.len() >= 15);
        let gitlab = apps.iter().find(|a| a.id == "gitlab").unwrap();
        assert!(gitlab.components.contains("postgresql"));
        assert!(gitlab.system_requirements.small.is_some());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[{"id": "jira", "name": "Jira"}, {"id": "JIRA", "name": "Jira again"}]"#;
        assert!(matches!(
            parse_applications(json),
            Err(MatcherError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_empty_name_rejected() {
        let json = r#"[{"id": "x", "name": " "}]"#;
        assert!(matches!(
            parse_applications(json),
            Err(MatcherError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_mock_application_source() {
        let mut source = MockApplicationSource::new();
        source.expect_load().times(1).returning(|| Ok(Vec::new()));
        source.expect_describe().return_const("mock".to_string());

        assert!(source.load().unwrap().is_empty());
        assert_eq!(source.describe(), "mock");
    }
}
