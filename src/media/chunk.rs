//! Local file parts for chunked uploads.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::error::UploadError;

/// One part of a large media file, in upload order.
///
/// A part is either a whole file on disk or a byte range of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChunk {
    path: PathBuf,
    segment: Option<Segment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    offset: u64,
    len: u64,
}

impl FileChunk {
    /// A part made of an entire file.
    pub fn whole(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            segment: None,
        }
    }

    /// A part made of `len` bytes of `path` starting at `offset`.
    pub fn segment(path: impl Into<PathBuf>, offset: u64, len: u64) -> Self {
        Self {
            path: path.into(),
            segment: Some(Segment { offset, len }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the part in bytes.
    pub async fn size(&self) -> Result<u64, UploadError> {
        match self.segment {
            Some(segment) => Ok(segment.len),
            None => tokio::fs::metadata(&self.path)
                .await
                .map(|meta| meta.len())
                .map_err(|source| self.io_error(source)),
        }
    }

    /// Bytes of the part.
    pub async fn read(&self) -> Result<Vec<u8>, UploadError> {
        match self.segment {
            None => tokio::fs::read(&self.path)
                .await
                .map_err(|source| self.io_error(source)),
            Some(segment) => {
                let mut file = tokio::fs::File::open(&self.path)
                    .await
                    .map_err(|source| self.io_error(source))?;
                file.seek(SeekFrom::Start(segment.offset))
                    .await
                    .map_err(|source| self.io_error(source))?;
                let mut buffer = vec![0u8; segment.len as usize];
                file.read_exact(&mut buffer)
                    .await
                    .map_err(|source| self.io_error(source))?;
                Ok(buffer)
            }
        }
    }

    fn io_error(&self, source: std::io::Error) -> UploadError {
        UploadError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Split `path` into contiguous parts of at most `chunk_size` bytes.
///
/// An empty file yields no parts.
pub async fn split_file(path: impl AsRef<Path>, chunk_size: u64) -> Result<Vec<FileChunk>, UploadError> {
    let path = path.as_ref();
    if chunk_size == 0 {
        return Err(UploadError::invalid("Chunk size must be greater than zero"));
    }

    let file_size = tokio::fs::metadata(path)
        .await
        .map_err(|source| UploadError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    let mut chunks = Vec::with_capacity(file_size.div_ceil(chunk_size) as usize);
    let mut offset = 0;
    while offset < file_size {
        let len = chunk_size.min(file_size - offset);
        chunks.push(FileChunk::segment(path, offset, len));
        offset += len;
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file_with(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_whole_file_chunk() {
        let file = temp_file_with(b"hello world");
        let chunk = FileChunk::whole(file.path());

        assert_eq!(chunk.size().await.unwrap(), 11);
        assert_eq!(chunk.read().await.unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn test_split_file_segments() {
        let file = temp_file_with(b"0123456789");
        let chunks = split_file(file.path(), 4).await.unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].read().await.unwrap(), b"0123");
        assert_eq!(chunks[1].read().await.unwrap(), b"4567");
        assert_eq!(chunks[2].read().await.unwrap(), b"89");
        assert_eq!(chunks[2].size().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_split_empty_file() {
        let file = temp_file_with(b"");
        assert!(split_file(file.path(), 4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_split_rejects_zero_chunk_size() {
        let file = temp_file_with(b"abc");
        let err = split_file(file.path(), 0).await.unwrap_err();
        assert!(matches!(err, UploadError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let chunk = FileChunk::whole("/nonexistent/snapads/part-1");
        let err = chunk.size().await.unwrap_err();
        assert!(matches!(err, UploadError::Io { .. }));
    }
}
