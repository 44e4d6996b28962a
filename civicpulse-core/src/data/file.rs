//! Local-directory transport, the offline stand-in for the static file host.

use super::provider::{SourceTransport, TransportError};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Reads resources from files under a root directory.
///
/// `"/data/vahan.csv"` resolves to `<root>/data/vahan.csv`. Paths that try to
/// climb out of the root are reported as not found.
#[derive(Debug, Clone)]
pub struct FileTransport {
    root: PathBuf,
}

impl FileTransport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(resolved)
    }
}

#[async_trait]
impl SourceTransport for FileTransport {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, path: &str) -> Result<String, TransportError> {
        let not_found = || TransportError::NotFound {
            path: path.to_string(),
        };
        let full = self.resolve(path).ok_or_else(not_found)?;
        match tokio::fs::read_to_string(&full).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(not_found()),
            Err(e) => Err(TransportError::Io {
                path: path.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_file_under_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join("data/aqi.csv"), "state,aqi_value\nGoa,42\n").unwrap();

        let t = FileTransport::new(dir.path());
        let text = t.get("/data/aqi.csv").await.unwrap();
        assert!(text.starts_with("state,aqi_value"));
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let t = FileTransport::new(dir.path());
        assert_eq!(
            t.get("/data/missing.csv").await,
            Err(TransportError::NotFound {
                path: "/data/missing.csv".into()
            })
        );
    }

    #[tokio::test]
    async fn parent_components_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let t = FileTransport::new(dir.path().join("root"));
        assert!(matches!(
            t.get("/../secret.csv").await,
            Err(TransportError::NotFound { .. })
        ));
    }
}
