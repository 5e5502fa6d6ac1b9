use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request to run a piece of source code
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub language_name: String,
    /// Falls back to the default version of the language when absent
    pub language_version: Option<String>,
    pub source_code: String,
}

/// Output of an execution run
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResponse {
    pub stdout: String,
    pub stderr: String,
    pub combined_output: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfo {
    pub language_name: String,
    pub language_version: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct LanguagesResponse {
    pub languages: Vec<LanguageInfo>,
}
