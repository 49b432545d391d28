//! Local media handling for uploads.

mod chunk;

pub use chunk::{split_file, FileChunk};
