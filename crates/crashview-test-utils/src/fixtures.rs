//! On-disk source fixtures.

use std::path::PathBuf;

use tempfile::TempDir;

/// A temp directory of source files, deleted on drop.
pub struct SourceFixture {
    dir: TempDir,
}

impl SourceFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Write `content` to `name` and return its absolute path as a string.
    pub async fn write(&self, name: &str, content: &str) -> String {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .expect("failed to create fixture dir");
        }
        tokio::fs::write(&path, content)
            .await
            .expect("failed to write fixture");
        path.to_string_lossy().into_owned()
    }

    /// Write a file whose lines read `line 1`, `line 2`, ... `line N`.
    pub async fn numbered(&self, name: &str, lines: usize) -> String {
        self.write(name, &numbered_source(lines)).await
    }

    /// A path inside the fixture that does not exist.
    pub fn missing(&self, name: &str) -> String {
        self.dir.path().join(name).to_string_lossy().into_owned()
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }
}

impl Default for SourceFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// `line 1\nline 2\n...line N`.
pub fn numbered_source(lines: usize) -> String {
    (1..=lines)
        .map(|i| format!("line {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}
