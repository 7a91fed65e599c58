//! Typed persistence layer over whichever backend was selected at startup.
//!
//! Loads never fail: missing, unreadable or malformed payloads come back as
//! defaults with a warning, so a corrupt document from an old version can
//! never wedge the app.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::store::schema::{
    DailyChallengesData, EXPORT_VERSION, ExportData, ProgressData, SavedItemsData, StudyGuideData,
    collections,
};
use crate::store::{Backend, StoreError};

pub struct Store {
    backend: Box<dyn Backend>,
}

impl Store {
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    pub fn backend_label(&self) -> &'static str {
        self.backend.label()
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, collection: &str) -> T {
        match self.backend.get(collection) {
            Ok(Some(payload)) => match serde_json::from_str(&payload) {
                Ok(value) => value,
                Err(err) => {
                    warn!(collection, %err, "malformed persisted state, using defaults");
                    T::default()
                }
            },
            Ok(None) => T::default(),
            Err(err) => {
                warn!(collection, %err, "failed to load persisted state, using defaults");
                T::default()
            }
        }
    }

    fn save<T: Serialize>(&self, collection: &str, value: &T) -> Result<()> {
        let payload = serde_json::to_string_pretty(value)?;
        self.backend
            .put(collection, &payload)
            .with_context(|| format!("saving collection {collection}"))
    }

    pub fn load_progress(&self) -> ProgressData {
        let data: ProgressData = self.load_or_default(collections::PROGRESS);
        if data.needs_reset() {
            warn!(
                version = data.schema_version,
                "stale progress schema, resetting to defaults"
            );
            return ProgressData::default();
        }
        data
    }

    pub fn save_progress(&self, data: &ProgressData) -> Result<()> {
        self.save(collections::PROGRESS, data)
    }

    pub fn load_daily_challenges(&self) -> DailyChallengesData {
        self.load_or_default(collections::DAILY_CHALLENGES)
    }

    pub fn save_daily_challenges(&self, data: &DailyChallengesData) -> Result<()> {
        self.save(collections::DAILY_CHALLENGES, data)
    }

    pub fn load_study_guide(&self) -> StudyGuideData {
        self.load_or_default(collections::STUDY_GUIDE)
    }

    pub fn save_study_guide(&self, data: &StudyGuideData) -> Result<()> {
        self.save(collections::STUDY_GUIDE, data)
    }

    pub fn load_saved_items(&self) -> SavedItemsData {
        self.load_or_default(collections::SAVED_ITEMS)
    }

    pub fn save_saved_items(&self, data: &SavedItemsData) -> Result<()> {
        self.save(collections::SAVED_ITEMS, data)
    }

    pub fn delete_all(&self) -> Result<()> {
        for collection in collections::ALL {
            self.backend.delete(collection)?;
        }
        Ok(())
    }

    /// Bundle every collection for backup or migration.
    pub fn export_all(&self) -> ExportData {
        ExportData {
            studyquest_export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            progress: self.load_progress(),
            daily_challenges: self.load_daily_challenges(),
            study_guide: self.load_study_guide(),
            saved_items: self.load_saved_items(),
        }
    }

    /// Write an export back through the backend. Each collection write is
    /// atomic on its own; a failure part-way leaves collections either old
    /// or new, never torn.
    pub fn import_all(&self, data: &ExportData) -> Result<()> {
        if data.studyquest_export_version != EXPORT_VERSION {
            return Err(StoreError::UnsupportedExportVersion {
                found: data.studyquest_export_version,
                expected: EXPORT_VERSION,
            }
            .into());
        }

        self.save_progress(&data.progress)?;
        self.save_daily_challenges(&data.daily_challenges)?;
        self.save_study_guide(&data.study_guide)?;
        self.save_saved_items(&data.saved_items)?;
        Ok(())
    }
}
