// Storage layer (S3-compatible): object keys and presigned upload credentials

pub mod content;
pub mod s3_client;

pub use content::*;
pub use s3_client::*;
