// API client module: contains a small blocking HTTP client that talks to
// the labeling server. It is intentionally small and synchronous; one
// folder and one image at a time is all the sync ever does.

use anyhow::{Context, Result};
use reqwest::blocking::{multipart, Client};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use crate::config::SyncConfig;

/// Title under which the ML backend is registered on every project.
pub const BACKEND_TITLE: &str = "SAM";

/// Outcome of an image import attempt that reached the server. A transport
/// failure (no response at all) is an `Err` from [`LabelService::import_image`]
/// instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Server answered 201 Created.
    Uploaded,
    /// Server answered with any other status; the body is kept for the log.
    Rejected { status: u16, body: String },
}

/// Everything the sync orchestrator needs from the labeling server. A trait
/// so the orchestrator can be exercised against a recording fake in tests.
pub trait LabelService {
    /// Create an annotation project and return its id.
    fn create_project(&self, title: &str, label_config: &str) -> Result<u64>;
    /// Register the interactive ML backend on a project, returning the
    /// backend id.
    fn register_backend(&self, project_id: u64) -> Result<u64>;
    /// Upload one image into a project via the import endpoint.
    fn import_image(&self, project_id: u64, image: &Path) -> Result<ImportOutcome>;
}

/// Blocking client for the labeling server. Holds the reqwest client, the
/// server and backend base URLs, and the API token.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    server_url: String,
    backend_url: String,
    api_key: String,
}

/// Payload for project creation. `label_config` is the opaque labeling UI
/// markup read from the configured file.
#[derive(Serialize, Debug)]
struct CreateProjectRequest<'a> {
    title: &'a str,
    label_config: &'a str,
}

/// Payload for ML backend registration.
#[derive(Serialize, Debug)]
struct RegisterBackendRequest<'a> {
    url: &'a str,
    project: u64,
    is_interactive: bool,
    title: &'a str,
}

/// The only field we need back from creation endpoints. The server returns
/// a larger JSON object; serde ignores the rest.
#[derive(Deserialize, Debug)]
struct CreatedResponse {
    id: u64,
}

impl ApiClient {
    /// Build a client from the sync configuration.
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            server_url: config.server_url.clone(),
            backend_url: config.backend_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Helper to build the Authorization header map. The server expects
    /// `Token <key>`, not `Bearer`.
    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let val = format!("Token {}", self.api_key);
        let val = HeaderValue::from_str(&val).context("API key is not a valid header value")?;
        headers.insert(AUTHORIZATION, val);
        Ok(headers)
    }

    /// Create a project by POSTing to /api/projects. Returns the numeric
    /// project id, or an error carrying the server response body.
    pub fn create_project(&self, title: &str, label_config: &str) -> Result<u64> {
        let url = format!("{}/api/projects", &self.server_url);
        let res = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(&CreateProjectRequest {
                title,
                label_config,
            })
            .send()
            .context("Failed to send project creation request")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            anyhow::bail!("Project creation failed: {} - {}", status, txt);
        }
        let created: CreatedResponse = res.json().context("Parsing project creation response")?;
        Ok(created.id)
    }

    /// Register the interactive ML backend on a project via /api/ml.
    pub fn register_backend(&self, project_id: u64) -> Result<u64> {
        let url = format!("{}/api/ml", &self.server_url);
        let res = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(&RegisterBackendRequest {
                url: &self.backend_url,
                project: project_id,
                is_interactive: true,
                title: BACKEND_TITLE,
            })
            .send()
            .context("Failed to send backend registration request")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            anyhow::bail!("Backend registration failed: {} - {}", status, txt);
        }
        let created: CreatedResponse = res.json().context("Parsing backend registration response")?;
        Ok(created.id)
    }

    /// Upload one image into a project using multipart/form-data on the
    /// import endpoint. The server signals success with 201; any other
    /// status is reported as a `Rejected` outcome rather than an error so
    /// the caller can log it and keep going.
    pub fn import_image(&self, project_id: u64, image: &Path) -> Result<ImportOutcome> {
        let url = format!("{}/api/projects/{}/import", &self.server_url, project_id);

        let file = File::open(image)
            .with_context(|| format!("Failed to open image file {}", image.display()))?;
        let file_name = image
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("image")
            .to_string();

        let part = multipart::Part::reader(file)
            .file_name(file_name)
            .mime_str(image_mime(image))
            .context("Building multipart image part")?;
        let form = multipart::Form::new().part("file", part);

        let res = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .multipart(form)
            .send()
            .context("Failed to send import request")?;

        let status = res.status().as_u16();
        if status == 201 {
            Ok(ImportOutcome::Uploaded)
        } else {
            let body = res.text().unwrap_or_else(|_| "".into());
            Ok(ImportOutcome::Rejected { status, body })
        }
    }
}

impl LabelService for ApiClient {
    fn create_project(&self, title: &str, label_config: &str) -> Result<u64> {
        ApiClient::create_project(self, title, label_config)
    }

    fn register_backend(&self, project_id: u64) -> Result<u64> {
        ApiClient::register_backend(self, project_id)
    }

    fn import_image(&self, project_id: u64, image: &Path) -> Result<ImportOutcome> {
        ApiClient::import_image(self, project_id, image)
    }
}

/// Mime type from the extension. The folder scan only lets the four image
/// extensions through, so jpeg is a safe fallback.
fn image_mime(image: &Path) -> &'static str {
    let ext = image
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}
