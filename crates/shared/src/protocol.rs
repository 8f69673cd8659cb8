use serde::{Deserialize, Serialize};

use crate::error::ResponseStatus;

/// Backend endpoint paths, relative to the configured server URL.
pub const GENERATE_SOW_PATH: &str = "/generate-sow";
pub const CHAT_PATH: &str = "/chat";
pub const LIKE_SOW_PATH: &str = "/like-sow";
pub const RENDERED_SOW_PATH: &str = "/static/Generated_SOW_final.docx";

/// Fixed local filename the rendered artifact is saved under.
pub const RENDERED_SOW_FILENAME: &str = "Generated_SOW_final.docx";

/// Successful body of both the generate and the chat-refine operations.
///
/// `message` is always the complete markdown document; a refine response is
/// an authoritative replacement, never a diff. `sow_json` and `file_name`
/// are backend-side extras the client carries along but does not interpret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SowDocumentResponse {
    pub status: ResponseStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sow_json: Option<serde_json::Value>,
    #[serde(
        rename = "fileName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRefineRequest {
    pub message: String,
    pub context: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeSowRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeSowResponse {
    pub status: ResponseStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
}
