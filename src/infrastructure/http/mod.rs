//! Low-level HTTP building blocks

pub mod multipart;
pub mod tus;

pub use multipart::{BoundaryToken, MultipartForm};
pub use tus::{TusClient, UploadError, CHUNK_SIZE};
