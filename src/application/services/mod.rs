pub mod storage_service;
pub mod upload_policy;

pub use storage_service::{FileReader, StorageService};
pub use upload_policy::UploadPolicy;
