use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::{ClientError, ClientResult};

/// Bucket-style object storage addressed by `/`-separated keys.
pub trait ObjectStore {
    fn list(&self, prefix: &str) -> ClientResult<Vec<String>>;

    fn get(&self, key: &str) -> ClientResult<Vec<u8>>;

    fn put(&self, key: &str, content: &[u8]) -> ClientResult<()>;
}

#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Option<PathBuf> {
        let relative = Path::new(key);
        let is_plain = !key.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !is_plain {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl ObjectStore for FsObjectStore {
    fn list(&self, prefix: &str) -> ClientResult<Vec<String>> {
        if !self.root.is_dir() {
            return Err(ClientError::storage_unavailable(
                &self.root,
                "storage root is not a directory",
            ));
        }

        let mut keys = Vec::new();
        collect_keys(&self.root, "", &mut keys)
            .map_err(|error| ClientError::storage_unavailable(&self.root, &error.to_string()))?;
        keys.retain(|key| key.starts_with(prefix));
        keys.sort();
        Ok(keys)
    }

    fn get(&self, key: &str) -> ClientResult<Vec<u8>> {
        let path = self
            .path_for(key)
            .ok_or_else(|| ClientError::source_read_failed(key, "key is not a plain relative path"))?;
        fs::read(&path).map_err(|error| ClientError::source_read_failed(key, &error.to_string()))
    }

    fn put(&self, key: &str, content: &[u8]) -> ClientResult<()> {
        let path = self
            .path_for(key)
            .ok_or_else(|| ClientError::source_write_failed(key, "key is not a plain relative path"))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|error| ClientError::source_write_failed(key, &error.to_string()))?;
        }
        fs::write(&path, content)
            .map_err(|error| ClientError::source_write_failed(key, &error.to_string()))
    }
}

fn collect_keys(dir: &Path, key_prefix: &str, keys: &mut Vec<String>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        let key = format!("{key_prefix}{name}");
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_keys(&entry.path(), &format!("{key}/"), keys)?;
        } else if file_type.is_file() {
            keys.push(key);
        }
    }
    Ok(())
}
