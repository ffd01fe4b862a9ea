//! Error and upload descriptor types.

pub mod error;
pub mod upload_info;

pub use error::{Error, Result};
pub use upload_info::UploadInfo;
