// In-memory collaborators for resolver and route tests

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use super::{MediaUploadUrlResolver, UploadSettings};
use crate::db::{ProgramModuleRepository, ProgramModuleSectionRepository, ProgramRepository};
use crate::models::{Program, ProgramModule, ProgramModuleSection};
use crate::storage::{CredentialError, CredentialIssuer, PresignedPost, UploadRequest};

pub const SECTION_ID: Uuid = Uuid::from_u128(0x5f2b8c3e_7a41_4d8e_9c0a_1b2c3d4e5f60);
pub const MODULE_ID: Uuid = Uuid::from_u128(0x0c1d2e3f_4a5b_4c6d_8e7f_8091a2b3c4d5);
pub const PROGRAM_ID: Uuid = Uuid::from_u128(0x9a8b7c6d_5e4f_4a3b_9c2d_1e0f12345678);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Section(Uuid),
    Module(Uuid),
    Program(Uuid),
}

#[derive(Default)]
pub struct InMemoryHierarchy {
    sections: HashMap<Uuid, ProgramModuleSection>,
    modules: HashMap<Uuid, ProgramModule>,
    programs: HashMap<Uuid, Program>,
    fail: bool,
    lookups: Mutex<Vec<Lookup>>,
}

impl InMemoryHierarchy {
    /// Section -> module -> "Intro to Biology"
    pub fn biology() -> Self {
        Self::default()
            .with_program(PROGRAM_ID, "Intro to Biology")
            .with_module(MODULE_ID, PROGRAM_ID)
            .with_section(SECTION_ID, MODULE_ID)
    }

    pub fn with_program(mut self, id: Uuid, title: &str) -> Self {
        self.programs.insert(
            id,
            Program {
                id,
                title: title.to_string(),
            },
        );
        self
    }

    pub fn with_module(mut self, id: Uuid, program_id: Uuid) -> Self {
        self.modules.insert(
            id,
            ProgramModule {
                id,
                program_id,
                title: "Cells".to_string(),
            },
        );
        self
    }

    pub fn with_section(mut self, id: Uuid, program_module_id: Uuid) -> Self {
        self.sections.insert(
            id,
            ProgramModuleSection {
                id,
                program_module_id,
                title: "Course materials".to_string(),
            },
        );
        self
    }

    /// Every lookup fails as if the database were unreachable
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn lookups(&self) -> Vec<Lookup> {
        self.lookups.lock().unwrap().clone()
    }

    fn record(&self, lookup: Lookup) -> Result<(), sqlx::Error> {
        self.lookups.lock().unwrap().push(lookup);
        if self.fail {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }
}

#[async_trait]
impl ProgramModuleSectionRepository for InMemoryHierarchy {
    async fn get_program_module_section(
        &self,
        section_id: Uuid,
    ) -> Result<Option<ProgramModuleSection>, sqlx::Error> {
        self.record(Lookup::Section(section_id))?;
        Ok(self.sections.get(&section_id).cloned())
    }
}

#[async_trait]
impl ProgramModuleRepository for InMemoryHierarchy {
    async fn get_program_module(&self, module_id: Uuid) -> Result<Option<ProgramModule>, sqlx::Error> {
        self.record(Lookup::Module(module_id))?;
        Ok(self.modules.get(&module_id).cloned())
    }
}

#[async_trait]
impl ProgramRepository for InMemoryHierarchy {
    async fn get_program(&self, program_id: Uuid) -> Result<Option<Program>, sqlx::Error> {
        self.record(Lookup::Program(program_id))?;
        Ok(self.programs.get(&program_id).cloned())
    }
}

/// Records every request and answers with an unsigned post
#[derive(Default)]
pub struct RecordingIssuer {
    requests: Mutex<Vec<UploadRequest>>,
}

impl RecordingIssuer {
    pub fn requests(&self) -> Vec<UploadRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CredentialIssuer for RecordingIssuer {
    async fn issue(&self, request: &UploadRequest) -> Result<PresignedPost, CredentialError> {
        self.requests.lock().unwrap().push(request.clone());

        let mut fields = BTreeMap::new();
        fields.insert("Content-Type".to_string(), request.content_type.clone());
        fields.insert("key".to_string(), request.key.clone());
        Ok(PresignedPost {
            url: format!("https://s3.test/{}", request.bucket),
            fields,
        })
    }
}

pub struct FailingIssuer;

#[async_trait]
impl CredentialIssuer for FailingIssuer {
    async fn issue(&self, _request: &UploadRequest) -> Result<PresignedPost, CredentialError> {
        Err(CredentialError::MissingCredentials)
    }
}

pub fn resolver_with(
    hierarchy: Arc<InMemoryHierarchy>,
    issuer: Arc<dyn CredentialIssuer>,
) -> MediaUploadUrlResolver {
    MediaUploadUrlResolver::new(
        hierarchy.clone(),
        hierarchy.clone(),
        hierarchy,
        issuer,
        UploadSettings::new("program-media"),
    )
}
