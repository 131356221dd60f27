use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

use crate::media::{UploadSettings, DEFAULT_EXPIRATION_SECS, DEFAULT_REGION};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub bucket_name: String,
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, R2, ...)
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub upload_expiration_secs: u64,
}

impl StorageConfig {
    pub fn upload_settings(&self) -> UploadSettings {
        UploadSettings {
            bucket: self.bucket_name.clone(),
            region: self.region.clone(),
            expires_in_secs: self.upload_expiration_secs,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()?,
                min_connections: env::var("DB_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()?,
            },
            storage: StorageConfig {
                bucket_name: env::var("AWS_BUCKET_NAME")
                    .context("AWS_BUCKET_NAME must be set")?,
                region: env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string()),
                endpoint: env::var("S3_ENDPOINT").ok(),
                access_key_id: env::var("AWS_ACCESS_KEY_ID").ok(),
                secret_access_key: env::var("AWS_SECRET_ACCESS_KEY").ok(),
                session_token: env::var("AWS_SESSION_TOKEN").ok(),
                upload_expiration_secs: match env::var("UPLOAD_URL_EXPIRATION_SECS") {
                    Ok(value) => value.parse()?,
                    Err(_) => DEFAULT_EXPIRATION_SECS,
                },
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_settings_from_storage_config() {
        let storage = StorageConfig {
            bucket_name: "program-media".to_string(),
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            upload_expiration_secs: DEFAULT_EXPIRATION_SECS,
        };

        let settings = storage.upload_settings();
        assert_eq!(settings.bucket, "program-media");
        assert_eq!(settings.region, "us-east-2");
        assert_eq!(settings.expires_in_secs, 3600);
    }
}
