//! Local backend: one JSON document per collection in the platform data dir.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

use crate::store::Backend;

pub struct JsonFileBackend {
    base_dir: PathBuf,
}

impl JsonFileBackend {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("studyquest");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    fn file_path(&self, collection: &str) -> PathBuf {
        self.base_dir.join(format!("{collection}.json"))
    }
}

impl Backend for JsonFileBackend {
    fn get(&self, collection: &str) -> Result<Option<String>> {
        let path = self.file_path(collection);
        if path.exists() {
            Ok(Some(fs::read_to_string(&path)?))
        } else {
            Ok(None)
        }
    }

    /// Atomic write: stage to `.tmp`, fsync, rename over the original. A
    /// crash mid-write leaves either the old document or the new one.
    fn put(&self, collection: &str, payload: &str) -> Result<()> {
        let path = self.file_path(collection);
        let tmp_path = path.with_extension("json.tmp");

        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(payload.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn delete(&self, collection: &str) -> Result<()> {
        let path = self.file_path(collection);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn label(&self) -> &'static str {
        "local"
    }
}
