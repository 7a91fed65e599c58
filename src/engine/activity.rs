//! Activity kinds, their counters and fixed XP values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// --- Counter Kind ---

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CounterKind {
    FlashcardsCompleted,
    QuestionsViewed,
    StudyGuideItemsCompleted,
    LessonsCompleted,
    ToolsUsed,
    Logins,
    StudyMinutes,
}

impl CounterKind {
    pub fn to_key(self) -> &'static str {
        match self {
            CounterKind::FlashcardsCompleted => "flashcards_completed",
            CounterKind::QuestionsViewed => "questions_viewed",
            CounterKind::StudyGuideItemsCompleted => "study_guide_items_completed",
            CounterKind::LessonsCompleted => "lessons_completed",
            CounterKind::ToolsUsed => "tools_used",
            CounterKind::Logins => "logins",
            CounterKind::StudyMinutes => "study_minutes",
        }
    }

    #[allow(dead_code)] // Used by tests and library consumers
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "flashcards_completed" => Some(CounterKind::FlashcardsCompleted),
            "questions_viewed" => Some(CounterKind::QuestionsViewed),
            "study_guide_items_completed" => Some(CounterKind::StudyGuideItemsCompleted),
            "lessons_completed" => Some(CounterKind::LessonsCompleted),
            "tools_used" => Some(CounterKind::ToolsUsed),
            "logins" => Some(CounterKind::Logins),
            "study_minutes" => Some(CounterKind::StudyMinutes),
            _ => None,
        }
    }

    pub fn all() -> &'static [CounterKind] {
        &[
            CounterKind::FlashcardsCompleted,
            CounterKind::QuestionsViewed,
            CounterKind::StudyGuideItemsCompleted,
            CounterKind::LessonsCompleted,
            CounterKind::ToolsUsed,
            CounterKind::Logins,
            CounterKind::StudyMinutes,
        ]
    }
}

// --- Activity Kind ---

/// One named user action. Each kind bumps exactly one counter and carries a
/// fixed XP value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityKind {
    FlashcardCompleted,
    FlashcardCorrect,
    QuestionViewed,
    StudyGuideItemCompleted,
    LessonCompleted,
    ToolUsed,
    DailyLogin,
}

impl ActivityKind {
    pub fn counter(self) -> CounterKind {
        match self {
            ActivityKind::FlashcardCompleted | ActivityKind::FlashcardCorrect => {
                CounterKind::FlashcardsCompleted
            }
            ActivityKind::QuestionViewed => CounterKind::QuestionsViewed,
            ActivityKind::StudyGuideItemCompleted => CounterKind::StudyGuideItemsCompleted,
            ActivityKind::LessonCompleted => CounterKind::LessonsCompleted,
            ActivityKind::ToolUsed => CounterKind::ToolsUsed,
            ActivityKind::DailyLogin => CounterKind::Logins,
        }
    }

    pub fn xp(self) -> u32 {
        match self {
            ActivityKind::FlashcardCompleted => 5,
            ActivityKind::FlashcardCorrect => 10,
            ActivityKind::QuestionViewed => 2,
            ActivityKind::StudyGuideItemCompleted => 3,
            ActivityKind::LessonCompleted => 15,
            ActivityKind::ToolUsed => 5,
            ActivityKind::DailyLogin => 25,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::FlashcardCompleted => "flashcard",
            ActivityKind::FlashcardCorrect => "flashcard_correct",
            ActivityKind::QuestionViewed => "question",
            ActivityKind::StudyGuideItemCompleted => "study_guide_item",
            ActivityKind::LessonCompleted => "lesson",
            ActivityKind::ToolUsed => "tool",
            ActivityKind::DailyLogin => "login",
        }
    }
}

// --- Counters ---

/// Lifetime per-category tallies. Keys from newer schema versions are kept
/// as-is so a downgrade doesn't drop them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityCounters {
    counts: HashMap<String, u32>,
}

impl ActivityCounters {
    pub fn get(&self, kind: CounterKind) -> u32 {
        self.counts.get(kind.to_key()).copied().unwrap_or(0)
    }

    pub fn bump(&mut self, kind: CounterKind) {
        self.add(kind, 1);
    }

    pub fn add(&mut self, kind: CounterKind, amount: u32) {
        *self.counts.entry(kind.to_key().to_string()).or_insert(0) += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_key_round_trip() {
        for &kind in CounterKind::all() {
            assert_eq!(CounterKind::from_key(kind.to_key()), Some(kind));
        }
        assert_eq!(CounterKind::from_key("bogus"), None);
    }

    #[test]
    fn test_activity_xp_values() {
        assert_eq!(ActivityKind::FlashcardCompleted.xp(), 5);
        assert_eq!(ActivityKind::FlashcardCorrect.xp(), 10);
        assert_eq!(ActivityKind::QuestionViewed.xp(), 2);
        assert_eq!(ActivityKind::StudyGuideItemCompleted.xp(), 3);
        assert_eq!(ActivityKind::LessonCompleted.xp(), 15);
        assert_eq!(ActivityKind::ToolUsed.xp(), 5);
        assert_eq!(ActivityKind::DailyLogin.xp(), 25);
    }

    #[test]
    fn test_both_flashcard_kinds_share_a_counter() {
        assert_eq!(
            ActivityKind::FlashcardCompleted.counter(),
            ActivityKind::FlashcardCorrect.counter()
        );
    }

    #[test]
    fn test_counters_bump_and_get() {
        let mut counters = ActivityCounters::default();
        assert_eq!(counters.get(CounterKind::QuestionsViewed), 0);
        counters.bump(CounterKind::QuestionsViewed);
        counters.bump(CounterKind::QuestionsViewed);
        assert_eq!(counters.get(CounterKind::QuestionsViewed), 2);
    }

    #[test]
    fn test_counters_preserve_unknown_keys() {
        let json = r#"{"flashcards_completed": 3, "future_counter": 9}"#;
        let mut counters: ActivityCounters = serde_json::from_str(json).unwrap();
        counters.bump(CounterKind::FlashcardsCompleted);
        let out = serde_json::to_string(&counters).unwrap();
        assert!(out.contains("future_counter"));
        assert_eq!(counters.get(CounterKind::FlashcardsCompleted), 4);
    }
}
