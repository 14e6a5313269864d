use anyhow::{Result, bail};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Image blobs referenced by staff records. Records only hold the filename;
/// the bytes live here.
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    pub async fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `bytes` under a fresh name and returns that name.
    pub async fn save(&self, bytes: &[u8], extension: &str) -> Result<String> {
        let extension = sanitize_extension(extension);
        let name = format!("{}.{}", uuid::Uuid::new_v4().simple(), extension);
        tokio::fs::write(self.dir.join(&name), bytes).await?;
        debug!("Stored photo {} ({} bytes)", name, bytes.len());
        Ok(name)
    }

    /// `Ok(None)` for names that do not exist or could escape the directory.
    pub async fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let Some(path) = self.path_for(name) else {
            return Ok(None);
        };
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn remove(&self, name: &str) -> Result<()> {
        let Some(path) = self.path_for(name) else {
            bail!("invalid photo name: {name}");
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes each file, logging failures instead of returning them.
    pub async fn remove_all<'a>(&self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            if let Err(e) = self.remove(name).await {
                warn!("Failed to remove photo {}: {}", name, e);
            }
        }
    }

    pub fn path_for(&self, name: &str) -> Option<PathBuf> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        valid.then(|| self.dir.join(name))
    }
}

fn sanitize_extension(extension: &str) -> String {
    let ext: String = extension
        .trim_start_matches('.')
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(8)
        .collect::<String>()
        .to_ascii_lowercase();
    if ext.is_empty() { "png".to_string() } else { ext }
}

/// File extension for an upload, from its filename or else its content type.
pub fn extension_for(file_name: Option<&str>, content_type: Option<&str>) -> String {
    let from_name = file_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .map(sanitize_extension);
    if let Some(ext) = from_name {
        return ext;
    }
    content_type
        .and_then(|ct| mime_guess::get_mime_extensions_str(ct))
        .and_then(|exts| exts.first())
        .map(|e| sanitize_extension(e))
        .unwrap_or_else(|| "png".to_string())
}
