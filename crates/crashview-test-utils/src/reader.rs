//! In-memory [`SourceReader`] for pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crashview_core::{BoxFuture, ReadError, SourceReader};

/// Serves sources from a map and records every reference it was asked for.
///
/// Unknown references fail with a `NotFound` I/O error.
#[derive(Default)]
pub struct MemoryReader {
    files: HashMap<String, String>,
    attempts: Mutex<Vec<String>>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, reference: &str, content: &str) -> Self {
        self.files.insert(reference.to_string(), content.to_string());
        self
    }

    /// References requested so far, in call order.
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

impl SourceReader for MemoryReader {
    fn name(&self) -> &str {
        "memory"
    }

    fn read_text<'a>(&'a self, reference: &'a str) -> BoxFuture<'a, Result<String, ReadError>> {
        Box::pin(async move {
            if let Ok(mut attempts) = self.attempts.lock() {
                attempts.push(reference.to_string());
            }
            self.files
                .get(reference)
                .cloned()
                .ok_or_else(|| ReadError::Io {
                    reference: reference.to_string(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                })
        })
    }
}
