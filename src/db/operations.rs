use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Program, ProgramModule, ProgramModuleSection};

#[async_trait]
pub trait ProgramModuleSectionRepository: Send + Sync {
    async fn get_program_module_section(
        &self,
        section_id: Uuid,
    ) -> Result<Option<ProgramModuleSection>, sqlx::Error>;
}

#[async_trait]
pub trait ProgramModuleRepository: Send + Sync {
    async fn get_program_module(&self, module_id: Uuid) -> Result<Option<ProgramModule>, sqlx::Error>;
}

#[async_trait]
pub trait ProgramRepository: Send + Sync {
    async fn get_program(&self, program_id: Uuid) -> Result<Option<Program>, sqlx::Error>;
}

/// Postgres-backed lookups for the whole content hierarchy
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgramModuleSectionRepository for PgRepository {
    async fn get_program_module_section(
        &self,
        section_id: Uuid,
    ) -> Result<Option<ProgramModuleSection>, sqlx::Error> {
        sqlx::query_as::<_, ProgramModuleSection>(
            "SELECT id, program_module_id, title FROM program_module_sections WHERE id = $1",
        )
        .bind(section_id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[async_trait]
impl ProgramModuleRepository for PgRepository {
    async fn get_program_module(&self, module_id: Uuid) -> Result<Option<ProgramModule>, sqlx::Error> {
        sqlx::query_as::<_, ProgramModule>(
            "SELECT id, program_id, title FROM program_modules WHERE id = $1",
        )
        .bind(module_id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[async_trait]
impl ProgramRepository for PgRepository {
    async fn get_program(&self, program_id: Uuid) -> Result<Option<Program>, sqlx::Error> {
        sqlx::query_as::<_, Program>("SELECT id, title FROM programs WHERE id = $1")
            .bind(program_id)
            .fetch_optional(&self.pool)
            .await
    }
}
