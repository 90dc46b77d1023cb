//! GitHub-hosted remote store
//!
//! Talks to the REST contents, commits and git blobs endpoints. File content
//! travels base64-encoded; blob `sha` values are the object ids and drive
//! optimistic concurrency on writes.

use crate::error::SyncError;
use crate::remote::profile::RemoteConfig;
use crate::remote::{RemoteItem, RemoteObject, RemoteStore};
use crate::tree::content;
use crate::types::EntryKind;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const GITHUB_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const GITHUB_HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const GITHUB_API_VERSION: &str = "2022-11-28";
const EMPTY_REPOSITORY_MESSAGE: &str = "This repository is empty.";

// Contents API request/response structures
#[derive(Deserialize)]
struct ContentItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    sha: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    size: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Listing(Vec<ContentItem>),
    Single(ContentItem),
}

#[derive(Serialize)]
struct PutContentRequest<'a> {
    message: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

#[derive(Serialize)]
struct DeleteContentRequest<'a> {
    message: String,
    sha: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

#[derive(Deserialize)]
struct PutContentResponse {
    content: PutContentInfo,
}

#[derive(Deserialize)]
struct PutContentInfo {
    sha: String,
}

#[derive(Deserialize)]
struct BlobResponse {
    content: String,
    encoding: String,
}

#[derive(Deserialize)]
struct CommitItem {
    commit: CommitDetail,
}

#[derive(Deserialize)]
struct CommitDetail {
    committer: Option<Signature>,
    author: Option<Signature>,
}

#[derive(Deserialize)]
struct Signature {
    date: DateTime<Utc>,
}

#[derive(Serialize)]
struct CreateRepositoryRequest<'a> {
    name: &'a str,
    private: bool,
    auto_init: bool,
    description: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

// Helper function to map transport errors to SyncError
fn map_http_error(error: reqwest::Error) -> SyncError {
    if error.is_timeout() {
        SyncError::RemoteRequestFailed(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        SyncError::RemoteRequestFailed(format!("Connection error: {}", error))
    } else if error.is_decode() {
        SyncError::RemoteError(format!("Failed to parse response: {}", error))
    } else {
        SyncError::RemoteError(format!("HTTP error: {}", error))
    }
}

// Helper function to map an unsuccessful status to SyncError
fn map_status(status: StatusCode, message: &str) -> SyncError {
    match status.as_u16() {
        401 => SyncError::RemoteAuthFailed(format!("Authentication failed: {}", message)),
        403 if message.to_ascii_lowercase().contains("rate limit") => {
            SyncError::RemoteRateLimit(format!("Rate limit exceeded: {}", message))
        }
        403 => SyncError::RemoteAuthFailed(format!("Forbidden: {}", message)),
        429 => SyncError::RemoteRateLimit(format!("Rate limit exceeded: {}", message)),
        404 => SyncError::RemoteNotFound(message.to_string()),
        409 | 422 => SyncError::RemoteRejected(message.to_string()),
        _ => SyncError::RemoteRequestFailed(format!(
            "Request failed with status {}: {}",
            status, message
        )),
    }
}

async fn error_message(response: Response) -> String {
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.message)
        .unwrap_or(text)
}

fn build_github_http_client(token: &str) -> Result<Client, SyncError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(
        "X-GitHub-Api-Version",
        HeaderValue::from_static(GITHUB_API_VERSION),
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("vaultsync/", env!("CARGO_PKG_VERSION"))),
    );
    let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| SyncError::ConfigError("access token contains invalid characters".into()))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    Client::builder()
        .default_headers(headers)
        .connect_timeout(GITHUB_HTTP_CONNECT_TIMEOUT)
        .timeout(GITHUB_HTTP_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| SyncError::RemoteError(format!("Failed to create HTTP client: {}", e)))
}

/// GitHub repository used as the remote replica
pub struct GitHubStore {
    client: Client,
    api_base: Url,
    owner: String,
    repository: String,
    branch: Option<String>,
    private: bool,
}

impl GitHubStore {
    /// Build a store from a validated remote profile
    pub fn from_config(config: &RemoteConfig) -> Result<Self, SyncError> {
        config
            .validate()
            .map_err(|errors| SyncError::ConfigError(errors.join("; ")))?;

        // validate() guarantees presence
        let owner = config.owner.clone().unwrap_or_default();
        let repository = config.repository.clone().unwrap_or_default();
        let token = config.token.clone().unwrap_or_default();

        let api_base = Url::parse(&config.api_base_url).map_err(|e| {
            SyncError::ConfigError(format!("invalid remote.api_base_url: {}", e))
        })?;

        Ok(Self {
            client: build_github_http_client(&token)?,
            api_base,
            owner,
            repository,
            branch: config.branch.clone(),
            private: config.private,
        })
    }

    fn url<'a, I>(&self, segments: I) -> Result<Url, SyncError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| SyncError::ConfigError("remote.api_base_url cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn contents_url(&self, path: &str, with_ref: bool) -> Result<Url, SyncError> {
        let mut url = self.url(
            ["repos", self.owner.as_str(), self.repository.as_str(), "contents"]
                .into_iter()
                .chain(path.split('/').filter(|s| !s.is_empty())),
        )?;
        if with_ref {
            if let Some(branch) = &self.branch {
                url.query_pairs_mut().append_pair("ref", branch);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, SyncError> {
        request.send().await.map_err(map_http_error)
    }

    async fn fetch_blob(&self, sha: &str) -> Result<Vec<u8>, SyncError> {
        let url = self.url([
            "repos",
            self.owner.as_str(),
            self.repository.as_str(),
            "git",
            "blobs",
            sha,
        ])?;
        let response = self.send(self.request(Method::GET, url)).await?;
        if !response.status().is_success() {
            let status = response.status();
            return Err(map_status(status, &error_message(response).await));
        }
        let blob: BlobResponse = response.json().await.map_err(map_http_error)?;
        if blob.encoding != "base64" {
            return Err(SyncError::RemoteError(format!(
                "unexpected blob encoding '{}'",
                blob.encoding
            )));
        }
        content::decode(&blob.content)
            .map_err(|e| SyncError::RemoteError(format!("invalid base64 from remote: {}", e)))
    }
}

#[async_trait]
impl RemoteStore for GitHubStore {
    async fn list_children(&self, path: &str) -> Result<Option<Vec<RemoteItem>>, SyncError> {
        let url = self.contents_url(path, true)?;
        let response = self.send(self.request(Method::GET, url)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            let message = error_message(response).await;
            // A missing repository is an error; an empty one or a missing
            // subdirectory is plain absence.
            if path.is_empty() && message != EMPTY_REPOSITORY_MESSAGE {
                return Err(SyncError::RemoteNotFound(format!(
                    "{}/{}: {}",
                    self.owner, self.repository, message
                )));
            }
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            return Err(map_status(status, &error_message(response).await));
        }

        let listing = match response.json::<ContentsResponse>().await.map_err(map_http_error)? {
            ContentsResponse::Listing(items) => items,
            ContentsResponse::Single(item) => {
                return Err(SyncError::RemoteError(format!(
                    "'{}' is a {}, not a directory",
                    item.path, item.kind
                )))
            }
        };

        let items = listing
            .into_iter()
            .filter_map(|item| {
                let kind = match item.kind.as_str() {
                    "file" => EntryKind::File,
                    "dir" => EntryKind::Directory,
                    // symlinks and submodules are not synchronized
                    _ => return None,
                };
                Some(RemoteItem {
                    path: item.path,
                    kind,
                    object_id: item.sha,
                })
            })
            .collect();
        Ok(Some(items))
    }

    async fn get_object(&self, path: &str) -> Result<Option<RemoteObject>, SyncError> {
        let url = self.contents_url(path, true)?;
        let response = self.send(self.request(Method::GET, url)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            return Err(map_status(status, &error_message(response).await));
        }

        let item = match response.json::<ContentsResponse>().await.map_err(map_http_error)? {
            ContentsResponse::Single(item) => item,
            ContentsResponse::Listing(_) => {
                return Err(SyncError::RemoteError(format!(
                    "'{}' is a directory, not a file",
                    path
                )))
            }
        };

        // Files over 1 MB come back without inline content
        let inline = item
            .content
            .as_deref()
            .filter(|_| item.encoding.as_deref() == Some("base64"));
        let bytes = match inline {
            Some(encoded) if !(encoded.is_empty() && item.size > 0) => content::decode(encoded)
                .map_err(|e| {
                    SyncError::RemoteError(format!("invalid base64 from remote: {}", e))
                })?,
            _ => self.fetch_blob(&item.sha).await?,
        };

        Ok(Some(RemoteObject {
            content: bytes,
            object_id: item.sha,
        }))
    }

    async fn put_object(
        &self,
        path: &str,
        content: &[u8],
        base_object_id: Option<&str>,
    ) -> Result<String, SyncError> {
        let url = self.contents_url(path, false)?;
        let body = PutContentRequest {
            message: format!("vaultsync: update {}", path),
            content: content::encode(content),
            sha: base_object_id,
            branch: self.branch.as_deref(),
        };
        let response = self
            .send(self.request(Method::PUT, url).json(&body))
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(map_status(status, &error_message(response).await));
        }

        let created: PutContentResponse = response.json().await.map_err(map_http_error)?;
        debug!(path, sha = %created.content.sha, "Uploaded object");
        Ok(created.content.sha)
    }

    async fn delete_object(&self, path: &str, object_id: &str) -> Result<(), SyncError> {
        let url = self.contents_url(path, false)?;
        let body = DeleteContentRequest {
            message: format!("vaultsync: delete {}", path),
            sha: object_id,
            branch: self.branch.as_deref(),
        };
        let response = self
            .send(self.request(Method::DELETE, url).json(&body))
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(map_status(status, &error_message(response).await));
        }
        debug!(path, sha = object_id, "Deleted object");
        Ok(())
    }

    async fn last_change_time(&self, path: &str) -> Result<Option<DateTime<Utc>>, SyncError> {
        let mut url = self.url([
            "repos",
            self.owner.as_str(),
            self.repository.as_str(),
            "commits",
        ])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("path", path);
            query.append_pair("per_page", "1");
            if let Some(branch) = &self.branch {
                query.append_pair("sha", branch);
            }
        }
        let response = self.send(self.request(Method::GET, url)).await?;

        // 409: repository has no commits yet
        if response.status() == StatusCode::CONFLICT {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            return Err(map_status(status, &error_message(response).await));
        }

        let commits: Vec<CommitItem> = response.json().await.map_err(map_http_error)?;
        Ok(commits.into_iter().next().and_then(|item| {
            item.commit
                .committer
                .or(item.commit.author)
                .map(|signature| signature.date)
        }))
    }

    async fn create_repository(&self, name: &str) -> Result<(), SyncError> {
        let url = self.url(["user", "repos"])?;
        let body = CreateRepositoryRequest {
            name,
            private: self.private,
            auto_init: false,
            description: "Synchronized by vaultsync",
        };
        let response = self
            .send(self.request(Method::POST, url).json(&body))
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(map_status(status, &error_message(response).await));
        }
        Ok(())
    }

    async fn delete_repository(&self, name: &str) -> Result<(), SyncError> {
        let url = self.url(["repos", self.owner.as_str(), name])?;
        let response = self.send(self.request(Method::DELETE, url)).await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(map_status(status, &error_message(response).await));
        }
        Ok(())
    }

    async fn repository_exists(&self, name: &str) -> Result<bool, SyncError> {
        let url = self.url(["repos", self.owner.as_str(), name])?;
        let response = self.send(self.request(Method::GET, url)).await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(map_status(status, &error_message(response).await)),
        }
    }

    fn describe(&self) -> String {
        match &self.branch {
            Some(branch) => format!("{}/{}@{}", self.owner, self.repository, branch),
            None => format!("{}/{}", self.owner, self.repository),
        }
    }
}
