//! Object storage provider factories.

mod s3;

pub use s3::{S3Credentials, S3Provider};
