//! Remote virtual file system paths

pub mod path;

pub use path::RemotePath;
