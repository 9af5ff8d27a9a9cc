//! Test helpers: access to the test data, and a context providing a scratch directory.

use anyhow::Context;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use test_context::AsyncTestContext;

/// A test context, providing a temporary directory which is removed after the test.
pub struct OvalContext {
    tmp: TempDir,
}

impl OvalContext {
    pub fn new() -> anyhow::Result<Self> {
        let tmp = tempfile::Builder::new()
            .prefix("ovaljson-test-")
            .tempdir()
            .context("creating temporary directory")?;
        log::debug!("Using temporary directory: {}", tmp.path().display());
        Ok(Self { tmp })
    }

    /// The temporary directory.
    pub fn dir(&self) -> &Path {
        self.tmp.path()
    }

    /// A path inside the temporary directory.
    pub fn path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.tmp.path().join(name)
    }

    /// Load a document from the test data.
    pub fn document_bytes(&self, path: impl AsRef<Path>) -> anyhow::Result<Vec<u8>> {
        document_bytes(path)
    }
}

impl AsyncTestContext for OvalContext {
    #[allow(clippy::expect_used)]
    async fn setup() -> Self {
        Self::new().expect("initializing the test context")
    }

    async fn teardown(self) {
        if let Err(err) = self.tmp.close() {
            log::warn!("Failed to remove temporary directory: {err}");
        }
    }
}

/// The absolute path of a file in the test data directory (`etc/test-data`).
pub fn absolute(path: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
    let workspace_root: PathBuf = Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(1)
        .context("unable to determine workspace root")?
        .into();
    let test_data = workspace_root.join("etc").join("test-data");
    Ok(test_data.join(path))
}

/// Load the content of a file from the test data directory.
pub fn document_bytes(path: impl AsRef<Path>) -> anyhow::Result<Vec<u8>> {
    let path = absolute(path)?;
    std::fs::read(&path).with_context(|| format!("reading test document: {}", path.display()))
}
