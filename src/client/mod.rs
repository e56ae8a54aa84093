//! Typed client for the faculty directory API, plus the small amount of
//! state the directory view keeps between calls.

use crate::domain::deletion::DeletionScope;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Shown when the service could not be reached or answered with something
/// unreadable. Override with [`FacultyDirectory::with_fallback_message`].
pub const DEFAULT_FALLBACK_MESSAGE: &str = "Could not reach the server. Please try again.";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Server {
        status: StatusCode,
        message: String,
        /// Present when a deletion failed part-way.
        report: Option<DeletionReport>,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unreadable response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid server URL: {0}")]
    Url(String),
}

impl ClientError {
    /// Message to show the user: the server's own message when there is one.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Server { message, .. } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedCounts {
    pub departments: u64,
    pub majors: u64,
    pub lecturer_assignments: u64,
    pub cnbm_designations: u64,
    pub records: u64,
    pub accounts: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionReport {
    pub success: bool,
    pub message: String,
    pub faculty: String,
    pub scope: String,
    pub removed: RemovedCounts,
    #[serde(default)]
    pub failed_stage: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultySummary {
    pub name: String,
    pub departments: u64,
    pub majors: u64,
    pub lecturer_assignments: u64,
    pub cnbm_designations: u64,
    pub lecturers: u64,
    pub accounts: u64,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: String,
}

#[derive(Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl DirectoryClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::Url(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Url(format!("{} cannot be a base URL", base_url)));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            token: token.to_string(),
        })
    }

    /// URL of the faculty collection, or of one faculty when `faculty` is
    /// given. The name is percent-encoded as a single path segment.
    pub fn faculty_url(&self, faculty: Option<&str>) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ClientError::Url(self.base_url.to_string()))?;
            segments.pop_if_empty().extend(["api", "v1", "faculties"]);
            if let Some(faculty) = faculty {
                segments.push(faculty);
            }
        }
        Ok(url)
    }

    pub async fn list_faculties(&self) -> Result<Vec<String>, ClientError> {
        let url = self.faculty_url(None)?;
        let envelope: DataEnvelope<Vec<String>> = self.send_json(self.http.get(url)).await?;
        Ok(envelope.data)
    }

    pub async fn faculty_summary(&self, faculty: &str) -> Result<FacultySummary, ClientError> {
        let url = self.faculty_url(Some(faculty))?;
        let envelope: DataEnvelope<FacultySummary> = self.send_json(self.http.get(url)).await?;
        Ok(envelope.data)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_faculty(
        &self,
        faculty: &str,
        scope: DeletionScope,
    ) -> Result<DeletionReport, ClientError> {
        let mut url = self.faculty_url(Some(faculty))?;
        url.query_pairs_mut().append_pair(
            "deleteAccounts",
            if scope.purges_accounts() { "true" } else { "false" },
        );

        let response = self
            .http
            .delete(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        let report = serde_json::from_str::<DeletionReport>(&body).ok();
        let message = match &report {
            Some(report) => report.message.clone(),
            None => error_message(&body),
        };
        Err(ClientError::Server {
            status,
            message,
            report,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = req.bearer_auth(&self.token).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Server {
                status,
                message: error_message(&body),
                report: None,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<MessageBody>(body)
        .map(|b| b.message)
        .unwrap_or_default()
}

/// What the directory view should tell the user after a delete attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteFeedback {
    Deleted {
        message: String,
        report: DeletionReport,
    },
    Failed {
        message: String,
        report: Option<DeletionReport>,
    },
}

/// Directory view state: the faculty list, refreshed after successful deletes.
pub struct FacultyDirectory {
    client: DirectoryClient,
    faculties: Vec<String>,
    fallback_message: String,
}

impl FacultyDirectory {
    pub fn new(client: DirectoryClient) -> Self {
        Self {
            client,
            faculties: Vec::new(),
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
        }
    }

    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    pub fn faculties(&self) -> &[String] {
        &self.faculties
    }

    /// Re-fetches the list. On error the previous list is kept.
    pub async fn refresh(&mut self) -> Result<&[String], ClientError> {
        self.faculties = self.client.list_faculties().await?;
        Ok(&self.faculties)
    }

    pub async fn delete(&mut self, faculty: &str, scope: DeletionScope) -> DeleteFeedback {
        match self.client.delete_faculty(faculty, scope).await {
            Ok(report) => {
                if let Err(e) = self.refresh().await {
                    tracing::warn!("faculty list refresh after delete failed: {}", e);
                }
                DeleteFeedback::Deleted {
                    message: report.message.clone(),
                    report,
                }
            }
            Err(e) => {
                tracing::warn!(faculty, "faculty delete failed: {}", e);
                let message = e.user_message(&self.fallback_message);
                let report = match e {
                    ClientError::Server { report, .. } => report,
                    _ => None,
                };
                DeleteFeedback::Failed { message, report }
            }
        }
    }
}
