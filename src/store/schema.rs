//! Persisted collection layouts, versioned per collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::daily::ChallengeLedger;
use crate::engine::progress::ProgressRecord;

const SCHEMA_VERSION: u32 = 1;

/// Collection names: one JSON document (or remote row) each.
pub mod collections {
    pub const PROGRESS: &str = "progress";
    pub const DAILY_CHALLENGES: &str = "daily_challenges";
    pub const STUDY_GUIDE: &str = "study_guide";
    pub const SAVED_ITEMS: &str = "saved_items";

    pub const ALL: &[&str] = &[PROGRESS, DAILY_CHALLENGES, STUDY_GUIDE, SAVED_ITEMS];
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressData {
    pub schema_version: u32,
    pub record: ProgressRecord,
}

impl Default for ProgressData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            record: ProgressRecord::default(),
        }
    }
}

impl ProgressData {
    /// Stale schema versions reset to defaults rather than failing the load.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DailyChallengesData {
    pub schema_version: u32,
    pub ledger: ChallengeLedger,
}

impl Default for DailyChallengesData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            ledger: ChallengeLedger::default(),
        }
    }
}

/// Study-guide completion: which item ids are done. The completion
/// percentage derives from this against the configured guide size.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StudyGuideData {
    pub schema_version: u32,
    pub completed_items: std::collections::BTreeSet<String>,
}

impl Default for StudyGuideData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            completed_items: std::collections::BTreeSet::new(),
        }
    }
}

impl StudyGuideData {
    pub fn percent_complete(&self, total_items: u32) -> f64 {
        if total_items == 0 {
            return 0.0;
        }
        (self.completed_items.len() as f64 / f64::from(total_items) * 100.0).clamp(0.0, 100.0)
    }
}

// --- Saved content ---

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SavedKind {
    Question,
    Topic,
    Flashcard,
}

impl SavedKind {
    pub fn to_key(self) -> &'static str {
        match self {
            SavedKind::Question => "question",
            SavedKind::Topic => "topic",
            SavedKind::Flashcard => "flashcard",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "question" => Some(SavedKind::Question),
            "topic" => Some(SavedKind::Topic),
            "flashcard" => Some(SavedKind::Flashcard),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedItem {
    pub id: String,
    pub title: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedItemsData {
    pub schema_version: u32,
    pub questions: Vec<SavedItem>,
    pub topics: Vec<SavedItem>,
    pub flashcards: Vec<SavedItem>,
}

impl Default for SavedItemsData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            questions: Vec::new(),
            topics: Vec::new(),
            flashcards: Vec::new(),
        }
    }
}

impl SavedItemsData {
    pub fn list(&self, kind: SavedKind) -> &[SavedItem] {
        match kind {
            SavedKind::Question => &self.questions,
            SavedKind::Topic => &self.topics,
            SavedKind::Flashcard => &self.flashcards,
        }
    }

    pub fn list_mut(&mut self, kind: SavedKind) -> &mut Vec<SavedItem> {
        match kind {
            SavedKind::Question => &mut self.questions,
            SavedKind::Topic => &mut self.topics,
            SavedKind::Flashcard => &mut self.flashcards,
        }
    }
}

// --- Export ---

pub const EXPORT_VERSION: u32 = 1;

/// Everything one device persists, bundled for backup or migration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub studyquest_export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub progress: ProgressData,
    pub daily_challenges: DailyChallengesData,
    pub study_guide: StudyGuideData,
    pub saved_items: SavedItemsData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_data_round_trip() {
        let data = ProgressData::default();
        let json = serde_json::to_string(&data).unwrap();
        let back: ProgressData = serde_json::from_str(&json).unwrap();
        assert!(!back.needs_reset());
        assert_eq!(back.record.level, 1);
    }

    #[test]
    fn test_stale_schema_needs_reset() {
        let mut data = ProgressData::default();
        data.schema_version = 99;
        assert!(data.needs_reset());
    }

    #[test]
    fn test_study_guide_percent() {
        let mut guide = StudyGuideData::default();
        assert_eq!(guide.percent_complete(20), 0.0);
        for i in 0..10 {
            guide.completed_items.insert(format!("item-{i}"));
        }
        assert!((guide.percent_complete(20) - 50.0).abs() < f64::EPSILON);
        assert_eq!(guide.percent_complete(0), 0.0);
        // More done than the configured total clamps at 100
        assert!((guide.percent_complete(5) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_saved_kind_round_trip() {
        for kind in [SavedKind::Question, SavedKind::Topic, SavedKind::Flashcard] {
            assert_eq!(SavedKind::from_key(kind.to_key()), Some(kind));
        }
        assert_eq!(SavedKind::from_key("note"), None);
    }
}
