use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::CredentialError;

/// Input of the `getMediaUploadUrl` query field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProgramMediaInput {
    pub section_id: Uuid,
    /// Declared MIME type of the file; must be one of the supported media types
    pub content_type: String,
    pub file_name: String,
}

/// Presigned POST handed back to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaUploadUrl {
    pub url: String,
    /// JSON object text holding the form fields to send with the upload
    pub fields: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MediaUploadError {
    #[error("Section with id {0} not found")]
    SectionNotFound(Uuid),

    #[error("Module with id {0} not found")]
    ModuleNotFound(Uuid),

    #[error("Program with id {0} not found")]
    ProgramNotFound(Uuid),

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Hierarchy lookup failed: {0}")]
    Lookup(#[from] sqlx::Error),

    #[error("Upload credential request failed: {0}")]
    Credential(#[from] CredentialError),

    #[error("Failed to serialize upload fields: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MediaUploadError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SectionNotFound(_) | Self::ModuleNotFound(_) | Self::ProgramNotFound(_)
        )
    }
}
