//! Media upload URLs for program content
//!
//! `getMediaUploadUrl` takes a section id and walks the content hierarchy
//! (section -> module -> program) to find the program title, which, together
//! with the content type, fixes where the file lands in the bucket:
//!
//! ```text
//! programs/{program.title}/{prefix(content_type)}{file_name}
//! ```
//!
//! The resolver then asks the [`CredentialIssuer`] for a presigned POST scoped
//! to exactly that key and content type.

use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use crate::db::{ProgramModuleRepository, ProgramModuleSectionRepository, ProgramRepository};
use crate::models::Program;
use crate::storage::{object_key, CredentialIssuer, MediaContentType, UploadRequest};
use crate::types::{GetProgramMediaInput, MediaUploadError, MediaUploadUrl};

#[cfg(test)]
pub(crate) mod testing;

pub const DEFAULT_REGION: &str = "us-east-2";
pub const DEFAULT_EXPIRATION_SECS: u64 = 3600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    pub bucket: String,
    pub region: String,
    pub expires_in_secs: u64,
}

impl UploadSettings {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: DEFAULT_REGION.to_string(),
            expires_in_secs: DEFAULT_EXPIRATION_SECS,
        }
    }
}

pub struct MediaUploadUrlResolver {
    sections: Arc<dyn ProgramModuleSectionRepository>,
    modules: Arc<dyn ProgramModuleRepository>,
    programs: Arc<dyn ProgramRepository>,
    issuer: Arc<dyn CredentialIssuer>,
    settings: UploadSettings,
}

impl MediaUploadUrlResolver {
    pub fn new(
        sections: Arc<dyn ProgramModuleSectionRepository>,
        modules: Arc<dyn ProgramModuleRepository>,
        programs: Arc<dyn ProgramRepository>,
        issuer: Arc<dyn CredentialIssuer>,
        settings: UploadSettings,
    ) -> Self {
        Self {
            sections,
            modules,
            programs,
            issuer,
            settings,
        }
    }

    pub fn settings(&self) -> &UploadSettings {
        &self.settings
    }

    /// Issue a presigned POST for uploading `input.file_name` into the
    /// section's program folder.
    pub async fn get_media_upload_url(
        &self,
        input: &GetProgramMediaInput,
    ) -> Result<MediaUploadUrl, MediaUploadError> {
        let (content_type, key) = self.object_key_for(input).await?;

        info!(
            content_type = %content_type,
            "Generating presigned url for {} in bucket {}",
            key, self.settings.bucket
        );

        let request = UploadRequest {
            bucket: self.settings.bucket.clone(),
            key,
            content_type: content_type.to_string(),
            expires_in_secs: self.settings.expires_in_secs,
            region: self.settings.region.clone(),
        };

        let post = self.issuer.issue(&request).await.inspect_err(|e| {
            error!(key = %request.key, bucket = %request.bucket, error = ?e, "Presigned POST request failed");
        })?;

        let fields = serde_json::to_string(&post.fields).inspect_err(|e| {
            error!(key = %request.key, error = ?e, "Failed to serialize presigned POST fields");
        })?;

        Ok(MediaUploadUrl {
            url: post.url,
            fields,
        })
    }

    /// Resolve the object key an upload for `input` would target, without
    /// issuing a credential.
    pub async fn object_key_for(
        &self,
        input: &GetProgramMediaInput,
    ) -> Result<(MediaContentType, String), MediaUploadError> {
        // Content type is checked first so unsupported uploads never hit the database
        let content_type = input.content_type.parse::<MediaContentType>().inspect_err(|_| {
            error!(section_id = %input.section_id, content_type = %input.content_type, "Unsupported content type");
        })?;

        let program = self.resolve_program(input.section_id).await?;
        let key = object_key(&program.title, content_type, &input.file_name);

        Ok((content_type, key))
    }

    async fn resolve_program(&self, section_id: Uuid) -> Result<Program, MediaUploadError> {
        let section = self
            .sections
            .get_program_module_section(section_id)
            .await
            .inspect_err(|e| error!(section_id = %section_id, error = ?e, "Section lookup failed"))?
            .ok_or_else(|| {
                error!(section_id = %section_id, "Section not found");
                MediaUploadError::SectionNotFound(section_id)
            })?;

        let module_id = section.program_module_id;
        let module = self
            .modules
            .get_program_module(module_id)
            .await
            .inspect_err(|e| error!(module_id = %module_id, error = ?e, "Module lookup failed"))?
            .ok_or_else(|| {
                error!(section_id = %section_id, module_id = %module_id, "Module not found");
                MediaUploadError::ModuleNotFound(module_id)
            })?;

        let program_id = module.program_id;
        self.programs
            .get_program(program_id)
            .await
            .inspect_err(|e| error!(program_id = %program_id, error = ?e, "Program lookup failed"))?
            .ok_or_else(|| {
                error!(module_id = %module_id, program_id = %program_id, "Program not found");
                MediaUploadError::ProgramNotFound(program_id)
            })
    }
}
