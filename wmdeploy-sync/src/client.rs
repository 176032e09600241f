//! Remote scripts API client and the create-or-update protocol.
//!
//! ## Upsert - per-script state machine
//!
//! 1. `POST <base>/w/<workspace>/scripts/create`
//!    - 2xx → **Created**
//!    - 400 whose body mentions "already exists" → step 2
//!    - anything else → **Failed** (status + body), no update attempted
//! 2. `POST <base>/w/<workspace>/scripts/update/<encoded path>`
//!    - 2xx → **Updated**
//!    - anything else → **Failed** (status + body)
//!
//! Each step sends exactly one request. Nothing is retried.

use std::time::Duration;

use wmdeploy_core::{DeployConfig, RemotePath, UploadPayload};

use crate::error::{Stage, SyncError};

/// Phrase the server puts in the body when a create hits an existing path.
pub const ALREADY_EXISTS: &str = "already exists";

/// Only this status, with [`ALREADY_EXISTS`] in the body, means the path is taken.
pub const CONFLICT_STATUS: u16 = 400;

// ---------------------------------------------------------------------------
// Transport seam
// ---------------------------------------------------------------------------

/// Status and body of an HTTP response, whatever the status class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A request that produced no HTTP response (DNS, refused, timeout, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub message: String,
}

/// Sends one authenticated JSON `POST`.
///
/// Non-2xx statuses are *responses*, not errors; only failures to get a
/// response at all are `Err`.
pub trait Transport {
    fn post_json(
        &self,
        url: &str,
        token: &str,
        body: &UploadPayload,
    ) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_json(
        &self,
        url: &str,
        token: &str,
        body: &UploadPayload,
    ) -> Result<HttpResponse, TransportError> {
        (**self).post_json(url, token, body)
    }
}

/// Blocking transport backed by a `ureq` agent.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// `timeout` of `None` keeps ureq's defaults.
    pub fn new(timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            agent: builder.build(),
        }
    }

    pub fn from_config(config: &DeployConfig) -> Self {
        Self::new(config.timeout_secs.map(Duration::from_secs))
    }
}

impl Transport for UreqTransport {
    fn post_json(
        &self,
        url: &str,
        token: &str,
        body: &UploadPayload,
    ) -> Result<HttpResponse, TransportError> {
        let result = self
            .agent
            .post(url)
            .set("Authorization", &format!("Bearer {token}"))
            .set("Content-Type", "application/json")
            .send_json(body);

        match result {
            Ok(response) | Err(ureq::Error::Status(_, response)) => read_response(response),
            Err(ureq::Error::Transport(t)) => Err(TransportError {
                message: t.to_string(),
            }),
        }
    }
}

fn read_response(response: ureq::Response) -> Result<HttpResponse, TransportError> {
    let status = response.status();
    let body = response.into_string().map_err(|e| TransportError {
        message: format!("reading response body: {e}"),
    })?;
    Ok(HttpResponse { status, body })
}

// ---------------------------------------------------------------------------
// Response classification
// ---------------------------------------------------------------------------

/// How a create response steers the protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateResponse {
    Created,
    /// The path is taken; switch to update.
    Conflict,
    Rejected { status: u16, body: String },
}

/// Classify the create response.
///
/// The API has no structured conflict code, so a conflict is a
/// [`CONFLICT_STATUS`] response whose body contains [`ALREADY_EXISTS`],
/// compared case-insensitively. Any other failure status is a rejection.
pub fn classify_create_response(response: &HttpResponse) -> CreateResponse {
    if response.is_success() {
        return CreateResponse::Created;
    }
    if response.status == CONFLICT_STATUS
        && response.body.to_lowercase().contains(ALREADY_EXISTS)
    {
        return CreateResponse::Conflict;
    }
    CreateResponse::Rejected {
        status: response.status,
        body: response.body.clone(),
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Result of a successful upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Scripts endpoints of one workspace.
pub struct ScriptsClient<T: Transport> {
    transport: T,
    base_url: String,
    workspace: String,
    token: String,
}

impl<T: Transport> ScriptsClient<T> {
    pub fn new(
        transport: T,
        base_url: impl Into<String>,
        workspace: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            workspace: workspace.into(),
            token: token.into(),
        }
    }

    /// Build from the run configuration. Fails when no token is configured.
    pub fn from_config(config: &DeployConfig, transport: T) -> Result<Self, SyncError> {
        let token = config.require_token()?;
        Ok(Self::new(
            transport,
            config.base_url.clone(),
            config.workspace.clone(),
            token,
        ))
    }

    pub fn create_url(&self) -> String {
        format!("{}/w/{}/scripts/create", self.base_url, self.workspace)
    }

    pub fn update_url(&self, path: &RemotePath) -> String {
        format!(
            "{}/w/{}/scripts/update/{}",
            self.base_url,
            self.workspace,
            encode_uri_component(path.as_str())
        )
    }

    /// Make the remote script at `payload.path` match `payload`.
    pub fn upsert(&self, payload: &UploadPayload) -> Result<UpsertOutcome, SyncError> {
        let create_url = self.create_url();
        let response = self.send(&create_url, payload)?;

        match classify_create_response(&response) {
            CreateResponse::Created => Ok(UpsertOutcome::Created),
            CreateResponse::Rejected { status, body } => Err(SyncError::Rejected {
                path: payload.path.clone(),
                stage: Stage::Create,
                status,
                body,
            }),
            CreateResponse::Conflict => {
                tracing::debug!("{} already exists, updating", payload.path);
                let update_url = self.update_url(&payload.path);
                let response = self.send(&update_url, payload)?;
                if response.is_success() {
                    Ok(UpsertOutcome::Updated)
                } else {
                    Err(SyncError::Rejected {
                        path: payload.path.clone(),
                        stage: Stage::Update,
                        status: response.status,
                        body: response.body,
                    })
                }
            }
        }
    }

    fn send(&self, url: &str, payload: &UploadPayload) -> Result<HttpResponse, SyncError> {
        self.transport
            .post_json(url, &self.token, payload)
            .map_err(|e| SyncError::Transport {
                url: url.to_string(),
                message: e.message,
            })
    }
}

/// Percent-encode everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`, the
/// same set JavaScript's `encodeURIComponent` keeps. `/` becomes `%2F`.
pub fn encode_uri_component(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => result.push(byte as char),
            _ => result.push_str(&format!("%{byte:02X}")),
        }
    }
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
