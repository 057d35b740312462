//! Local filesystem reader.

use crate::BoxFuture;

use super::{ReadError, SourceReader};

/// Reads references as paths on the local filesystem using async I/O.
///
/// Missing files, permission errors and non-UTF-8 content all surface as
/// [`ReadError::Io`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileReader;

impl SourceReader for LocalFileReader {
    fn name(&self) -> &str {
        "local"
    }

    fn read_text<'a>(&'a self, reference: &'a str) -> BoxFuture<'a, Result<String, ReadError>> {
        Box::pin(async move {
            tokio::fs::read_to_string(reference)
                .await
                .map_err(|source| ReadError::Io {
                    reference: reference.to_string(),
                    source,
                })
        })
    }
}
