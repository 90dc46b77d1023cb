//! Remote repository profile: where the replica lives and how to reach it.

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Remote repository configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Account or organization owning the repository
    #[serde(default)]
    pub owner: Option<String>,

    /// Repository name
    #[serde(default)]
    pub repository: Option<String>,

    /// Personal access token (usually supplied through the environment)
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// Branch to read and write; the repository default when unset
    #[serde(default)]
    pub branch: Option<String>,

    /// REST API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Create repositories as private
    #[serde(default = "default_true")]
    pub private: bool,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            owner: None,
            repository: None,
            token: None,
            branch: None,
            api_base_url: default_api_base_url(),
            private: true,
        }
    }
}

impl RemoteConfig {
    /// Validate the remote profile; every missing field is reported.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.owner.as_deref().map_or(true, |s| s.trim().is_empty()) {
            errors.push("remote.owner is not set".to_string());
        }
        if self
            .repository
            .as_deref()
            .map_or(true, |s| s.trim().is_empty())
        {
            errors.push("remote.repository is not set".to_string());
        }
        if self.token.as_deref().map_or(true, |s| s.trim().is_empty()) {
            errors.push(
                "no access token (set VAULTSYNC_TOKEN or GITHUB_TOKEN, or remote.token)"
                    .to_string(),
            );
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            errors.push(format!(
                "remote.api_base_url must be an http(s) URL, got '{}'",
                self.api_base_url
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_incomplete() {
        let errors = RemoteConfig::default().validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_complete_profile_validates() {
        let config = RemoteConfig {
            owner: Some("octo".to_string()),
            repository: Some("vault".to_string()),
            token: Some("ghp_x".to_string()),
            ..RemoteConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_base_url() {
        let config = RemoteConfig {
            owner: Some("octo".to_string()),
            repository: Some("vault".to_string()),
            token: Some("ghp_x".to_string()),
            api_base_url: "api.github.com".to_string(),
            ..RemoteConfig::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("api_base_url"));
    }
}
