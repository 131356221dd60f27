//! Presigned POST issuing for S3-compatible object stores
//!
//! A presigned POST is a browser-style form upload: the client sends a
//! `multipart/form-data` POST to `url` with every entry of `fields` followed by
//! the file itself. The `policy` field is a base64 JSON document listing what
//! the upload may contain, signed with AWS Signature Version 4 by `rust-s3`.
//!
//! # Policy conditions
//! - `Content-Type` must equal the declared content type
//! - `key` must equal the target object
//! - `bucket` and the `x-amz-*` signing fields are added by `presign_post`
//!
//! Issuing a credential does not contact S3 and creates nothing in the bucket.
//! Temporary credentials (STS, instance profile) are refreshed before signing.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, PostPolicy, PostPolicyField, PostPolicyValue, Region};
use thiserror::Error;
use tracing::debug;

use crate::config::StorageConfig;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("AWS credentials are not configured")]
    MissingCredentials,

    #[error("AWS credentials expired and could not be refreshed")]
    ExpiredCredentials,

    #[error("Failed to load AWS credentials: {0}")]
    CredentialsLoad(String),

    #[error("Failed to refresh AWS credentials: {0}")]
    CredentialsRefresh(String),

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Invalid expiration: {0} seconds")]
    InvalidExpiration(u64),

    #[error("Failed to presign upload policy: {0}")]
    Presign(#[from] S3Error),
}

/// Everything needed to scope a single upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub expires_in_secs: u64,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedPost {
    pub url: String,
    pub fields: BTreeMap<String, String>,
}

/// Mints scoped upload credentials
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    async fn issue(&self, request: &UploadRequest) -> Result<PresignedPost, CredentialError>;
}

/// Presigns POST policies through `rust-s3`, addressing buckets path-style.
///
/// One `Bucket` is kept per (bucket, region) so refreshed credentials are
/// shared by every later request against it.
pub struct S3PostIssuer {
    credentials: Credentials,
    endpoint: Option<String>,
    buckets: Mutex<HashMap<(String, String), Bucket>>,
}

impl S3PostIssuer {
    pub fn new(credentials: Credentials, endpoint: Option<String>) -> Self {
        Self {
            credentials,
            endpoint,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Use the configured keys, falling back to the default AWS credential chain
    pub fn from_config(config: &StorageConfig) -> Result<Self, CredentialError> {
        let credentials = Credentials::new(
            config.access_key_id.as_deref(),
            config.secret_access_key.as_deref(),
            None,
            config.session_token.as_deref(),
            None,
        )
        .map_err(|e| CredentialError::CredentialsLoad(e.to_string()))?;

        Ok(Self::new(credentials, config.endpoint.clone()))
    }

    fn region_for(&self, name: &str) -> Result<Region, CredentialError> {
        if let Some(endpoint) = &self.endpoint {
            return Ok(Region::Custom {
                region: name.to_string(),
                endpoint: endpoint.clone(),
            });
        }

        // Unknown names parse as Region::Custom; without an endpoint they are typos
        match name.parse::<Region>() {
            Ok(Region::Custom { .. }) | Err(_) => {
                Err(CredentialError::InvalidRegion(name.to_string()))
            }
            Ok(region) => Ok(region),
        }
    }

    fn bucket_for(&self, request: &UploadRequest) -> Result<Bucket, CredentialError> {
        let mut buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());
        let cache_key = (request.bucket.clone(), request.region.clone());
        if let Some(bucket) = buckets.get(&cache_key) {
            return Ok(bucket.clone());
        }

        let region = self.region_for(&request.region)?;
        let bucket = Bucket::new(&request.bucket, region, self.credentials.clone())?.with_path_style();
        buckets.insert(cache_key, bucket.clone());
        Ok(bucket)
    }
}

#[async_trait]
impl CredentialIssuer for S3PostIssuer {
    async fn issue(&self, request: &UploadRequest) -> Result<PresignedPost, CredentialError> {
        let expires_in = u32::try_from(request.expires_in_secs)
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(CredentialError::InvalidExpiration(request.expires_in_secs))?;

        let bucket = self.bucket_for(request)?;

        bucket
            .credentials_refresh()
            .await
            .map_err(|e| CredentialError::CredentialsRefresh(e.to_string()))?;
        ensure_usable(&bucket.credentials().await?, chrono::Utc::now().timestamp())?;

        let policy = PostPolicy::new(expires_in)
            .condition(
                PostPolicyField::ContentType,
                PostPolicyValue::Exact(Cow::from(request.content_type.as_str())),
            )?
            .condition(
                PostPolicyField::Key,
                PostPolicyValue::Exact(Cow::from(request.key.as_str())),
            )?;

        let post = bucket.presign_post(policy).await?;
        debug!(url = %post.url, fields = post.fields.len(), "Presigned POST issued");

        Ok(PresignedPost {
            url: post.url,
            fields: post
                .fields
                .into_iter()
                // boto3 names the policy field in lower case; clients read it that way
                .map(|(name, value)| match name.as_str() {
                    "Policy" => ("policy".to_string(), value),
                    _ => (name, value),
                })
                .collect(),
        })
    }
}

/// Reject credentials that cannot sign: missing keys, or an expiry at or before `now`
fn ensure_usable(credentials: &Credentials, now: i64) -> Result<(), CredentialError> {
    if credentials.access_key.is_none() || credentials.secret_key.is_none() {
        return Err(CredentialError::MissingCredentials);
    }
    match credentials.expiration {
        Some(expiration) if expiration.0.unix_timestamp() <= now => {
            Err(CredentialError::ExpiredCredentials)
        }
        _ => Ok(()),
    }
}
