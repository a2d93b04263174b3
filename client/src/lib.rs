//! Kudu Client Library
//!
//! Typed access to the Kudu REST API of Azure App Service scm sites:
//! remote commands, the virtual file system, app settings, zip deployment
//! and run-from-zip deployment with post-deployment validation.

pub mod config;
pub mod deploy;
pub mod encoding;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod utils;
pub mod vfs;

pub use config::KuduClientSettings;
pub use deploy::run_from_zip::{ZipRunOptions, DEFAULT_VALIDATION_PATH};
pub use encoding::TextEncoding;
pub use errors::KuduError;
pub use http::client::KuduClient;
pub use vfs::path::RemotePath;
