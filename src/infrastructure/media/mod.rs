//! Byte source adapters

mod file;
mod remote;

pub use file::FileSource;
pub use remote::RemoteUrlSource;
