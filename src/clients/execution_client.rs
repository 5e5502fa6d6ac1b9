use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::models::{ExecuteRequest, ExecuteResponse, LanguageInfo};

/// Languages offered by default, with the runtime version used when the
/// caller does not pick one.
pub const LANGUAGE_VERSIONS: &[(&str, &str)] = &[
    ("javascript", "18.15.0"),
    ("typescript", "5.0.3"),
    ("python", "3.10.0"),
    ("java", "15.0.2"),
    ("csharp", "6.12.0"),
    ("php", "8.2.3"),
];

pub fn default_version(language: &str) -> Option<&'static str> {
    LANGUAGE_VERSIONS
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, version)| *version)
}

pub fn supported_languages() -> Vec<LanguageInfo> {
    LANGUAGE_VERSIONS
        .iter()
        .map(|(name, version)| LanguageInfo {
            language_name: name.to_string(),
            language_version: version.to_string(),
        })
        .collect()
}

#[derive(Debug)]
pub enum ExecutionError {
    UnsupportedLanguage(String),
    Transport(reqwest::Error),
    Status(u16, String),
    Decode(reqwest::Error),
}

impl std::fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionError::UnsupportedLanguage(lang) => write!(f, "Unsupported language '{}'", lang),
            ExecutionError::Transport(e) => write!(f, "Execution service unreachable: {}", e),
            ExecutionError::Status(code, body) => write!(f, "Execution service returned {}: {}", code, body),
            ExecutionError::Decode(e) => write!(f, "Invalid execution service response: {}", e),
        }
    }
}

impl std::error::Error for ExecutionError {}

#[derive(Debug, Serialize)]
struct PistonFile<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct PistonRequest<'a> {
    language: &'a str,
    version: &'a str,
    files: Vec<PistonFile<'a>>,
}

#[derive(Debug, Deserialize)]
struct PistonRun {
    #[serde(default)]
    stdout: String,
    #[serde(default)]
    stderr: String,
    #[serde(default)]
    output: String,
}

#[derive(Debug, Deserialize)]
struct PistonResponse {
    run: PistonRun,
}

/// Client for a Piston-compatible code execution service.
#[derive(Debug, Clone)]
pub struct ExecutionClient {
    client: Client,
    base_url: String,
}

impl ExecutionClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, ExecutionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ExecutionError::Transport)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn execute(&self, req: &ExecuteRequest) -> Result<ExecuteResponse, ExecutionError> {
        let version = match req.language_version.as_deref() {
            Some(version) => version,
            None => default_version(&req.language_name)
                .ok_or_else(|| ExecutionError::UnsupportedLanguage(req.language_name.clone()))?,
        };

        let body = PistonRequest {
            language: &req.language_name,
            version,
            files: vec![PistonFile { content: &req.source_code }],
        };

        let url = format!("{}/execute", self.base_url);
        debug!("Executing {} {} via {}", req.language_name, version, url);

        let response = self.client.post(&url)
            .json(&body)
            .send().await
            .map_err(ExecutionError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("Execution service returned {} for {}", status, req.language_name);
            return Err(ExecutionError::Status(status.as_u16(), text));
        }

        let piston: PistonResponse = response.json().await.map_err(ExecutionError::Decode)?;
        Ok(ExecuteResponse {
            stdout: piston.run.stdout,
            stderr: piston.run.stderr,
            combined_output: piston.run.output,
        })
    }
}
