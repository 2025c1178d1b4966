//! HTTP client for the errata web service.

use crate::errors::IssueError;
use serde_json::{Map, Value};
use url::Url;

const LOG_TARGET: &str = " transport";

/// Default base URL of the errata web service.
pub const DEFAULT_SERVICE_URL: &str = "https://errata.es-doc.org/";

/// Username and token pair used for authenticated actions.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub token: String,
}

/// Client for the errata web service endpoints.
#[derive(Debug, Clone)]
pub struct WsClient {
    client: reqwest::Client,
    base_url: Url,
}

impl WsClient {
    /// Create a new client for the service at `base_url`.
    pub fn new(base_url: &str) -> crate::Result<Self> {
        let base_url = Url::parse(base_url)?;
        let client = reqwest::Client::builder().user_agent("esgissue").build()?;
        Ok(Self { client, base_url })
    }

    /// The service base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Check that the errata service is up by probing its base URL.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::ServerDown`] on a connection failure or any
    /// non-200 response.
    pub async fn heartbeat(&self) -> Result<(), IssueError> {
        let response = self
            .client
            .get(self.base_url.clone())
            .send()
            .await
            .map_err(|e| IssueError::ServerDown { detail: e.to_string() })?;
        let status = response.status();
        if status.as_u16() == 200 {
            Ok(())
        } else {
            Err(IssueError::ServerDown {
                detail: format!("HTTP {}", status.as_u16()),
            })
        }
    }

    /// Create a new issue from the ordered, compacted payload.
    ///
    /// # Errors
    ///
    /// Returns the classified transport failure on any non-success status.
    pub async fn create(&self, payload: &Map<String, Value>, creds: &Credentials) -> Result<Value, IssueError> {
        self.post_issue("1/issue/create", payload, creds).await
    }

    /// Update an existing issue from the ordered, compacted payload.
    ///
    /// # Errors
    ///
    /// Returns the classified transport failure on any non-success status.
    pub async fn update(&self, payload: &Map<String, Value>, creds: &Credentials) -> Result<Value, IssueError> {
        self.post_issue("1/issue/update", payload, creds).await
    }

    /// Close the issue identified by `uid` with the resolved status.
    ///
    /// # Errors
    ///
    /// Returns the classified transport failure on any non-success status.
    pub async fn close(&self, uid: &str, status: &str, creds: &Credentials) -> Result<(), IssueError> {
        let url = self.endpoint("1/issue/close")?;
        log::debug!(target: LOG_TARGET, "POST {url} uid={uid} status={status}");
        let response = self
            .client
            .post(url)
            .query(&[("uid", uid), ("status", status)])
            .basic_auth(&creds.username, Some(&creds.token))
            .send()
            .await
            .map_err(request_failed)?;
        let _ = Self::check(response).await?;
        Ok(())
    }

    /// Retrieve the issue identified by `uid`.
    ///
    /// # Errors
    ///
    /// Returns the classified transport failure on any non-success status.
    pub async fn retrieve(&self, uid: &str) -> Result<Value, IssueError> {
        let url = self.endpoint("1/issue/retrieve")?;
        log::debug!(target: LOG_TARGET, "GET {url} uid={uid}");
        let response = self
            .client
            .get(url)
            .query(&[("uid", uid)])
            .send()
            .await
            .map_err(request_failed)?;
        let response = Self::check(response).await?;
        response
            .json()
            .await
            .map_err(|e| IssueError::Internal(ohno::app_err!("decoding retrieve response: {e}")))
    }

    /// Check whether the credentials authorize posting for `team`.
    ///
    /// Returns `true` when the service accepts the credentials for the team
    /// and `false` when it refuses them (HTTP 403).
    ///
    /// # Errors
    ///
    /// Returns the classified transport failure on any other non-success
    /// status.
    pub async fn credtest(&self, creds: &Credentials, team: &str) -> Result<bool, IssueError> {
        let url = self.endpoint("1/issue/credtest")?;
        let response = self
            .client
            .get(url)
            .query(&[("team", &team.to_lowercase())])
            .basic_auth(&creds.username, Some(&creds.token))
            .send()
            .await
            .map_err(request_failed)?;
        match response.status().as_u16() {
            200 => Ok(true),
            403 => Ok(false),
            _ => {
                let _ = Self::check(response).await?;
                Ok(false)
            }
        }
    }

    async fn post_issue(
        &self,
        path: &str,
        payload: &Map<String, Value>,
        creds: &Credentials,
    ) -> Result<Value, IssueError> {
        let url = self.endpoint(path)?;
        log::debug!(target: LOG_TARGET, "POST {url}");
        let response = self
            .client
            .post(url)
            .json(payload)
            .basic_auth(&creds.username, Some(&creds.token))
            .send()
            .await
            .map_err(request_failed)?;
        let response = Self::check(response).await?;
        response
            .json()
            .await
            .map_err(|e| IssueError::Internal(ohno::app_err!("decoding service response: {e}")))
    }

    /// Classify a response: 401 and 403 are surfaced as authentication and
    /// authorization failures, any other non-success as a request failure.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, IssueError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let status = status.as_u16();
        log::error!(target: LOG_TARGET, "errata service returned HTTP {status}");
        match status {
            401 => Err(IssueError::Authentication { status }),
            403 => Err(IssueError::Authorization { status }),
            _ => Err(IssueError::WsRequestFailed { status }),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, IssueError> {
        self.base_url
            .join(path)
            .map_err(|e| IssueError::Internal(ohno::app_err!("building service URL for '{path}': {e}")))
    }
}

/// A request that never reached the service is a request failure with no
/// HTTP status to report.
fn request_failed(e: reqwest::Error) -> IssueError {
    IssueError::ServerDown { detail: e.to_string() }
}
