//! Achievement definitions and the single-pass evaluator.
//!
//! The table is fixed at build time and iterated in definition order, so
//! unlock order is deterministic. Requirements are independent of each other;
//! order only matters for stable test output.

use crate::engine::activity::CounterKind;
use crate::engine::progress::ProgressRecord;

// --- Requirements ---

/// What must be true of the candidate record for an achievement to unlock.
/// Comparisons are `>= threshold`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Requirement {
    Counter { counter: CounterKind, threshold: u32 },
    Streak(u32),
    Level(u32),
    TotalXp(u32),
    StudyGuidePercent(u8),
}

impl Requirement {
    fn satisfied(&self, record: &ProgressRecord, study_guide_percent: f64) -> bool {
        match *self {
            Requirement::Counter { counter, threshold } => record.counters.get(counter) >= threshold,
            Requirement::Streak(days) => record.streak_days >= days,
            Requirement::Level(level) => record.level >= level,
            Requirement::TotalXp(amount) => record.total_experience_points >= amount,
            Requirement::StudyGuidePercent(percent) => study_guide_percent >= f64::from(percent),
        }
    }
}

// --- Definitions ---

#[derive(Clone, Debug)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub reward_xp: u32,
    /// `None` means the achievement can only be granted externally; none
    /// currently are, so such entries never auto-unlock.
    pub requirement: Option<Requirement>,
}

impl AchievementDef {
    const fn new(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        icon: &'static str,
        reward_xp: u32,
    ) -> Self {
        Self {
            id,
            name,
            description,
            icon,
            reward_xp,
            requirement: None,
        }
    }

    const fn requires(mut self, requirement: Requirement) -> Self {
        self.requirement = Some(requirement);
        self
    }
}

const fn counter(counter: CounterKind, threshold: u32) -> Requirement {
    Requirement::Counter { counter, threshold }
}

pub const ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef::new("first_step", "First Step", "Complete your first flashcard", "🎴", 10)
        .requires(counter(CounterKind::FlashcardsCompleted, 1)),
    AchievementDef::new("card_collector", "Card Collector", "Complete 25 flashcards", "🃏", 25)
        .requires(counter(CounterKind::FlashcardsCompleted, 25)),
    AchievementDef::new("flashcard_master", "Flashcard Master", "Complete 100 flashcards", "🏆", 100)
        .requires(counter(CounterKind::FlashcardsCompleted, 100)),
    AchievementDef::new("curious_mind", "Curious Mind", "View 10 questions", "❓", 20)
        .requires(counter(CounterKind::QuestionsViewed, 10)),
    AchievementDef::new("question_hunter", "Question Hunter", "View 50 questions", "🔍", 50)
        .requires(counter(CounterKind::QuestionsViewed, 50)),
    AchievementDef::new("first_lesson", "Off the Blocks", "Complete your first lesson", "📖", 15)
        .requires(counter(CounterKind::LessonsCompleted, 1)),
    AchievementDef::new("dedicated_student", "Dedicated Student", "Complete 10 lessons", "🎓", 50)
        .requires(counter(CounterKind::LessonsCompleted, 10)),
    AchievementDef::new("toolsmith", "Toolsmith", "Use a study tool", "🔧", 5)
        .requires(counter(CounterKind::ToolsUsed, 1)),
    AchievementDef::new("tool_explorer", "Tool Explorer", "Use study tools 10 times", "🧰", 25)
        .requires(counter(CounterKind::ToolsUsed, 10)),
    AchievementDef::new("streak_3", "Warming Up", "Keep a 3-day study streak", "🔥", 30)
        .requires(Requirement::Streak(3)),
    AchievementDef::new("streak_7", "Weekly Warrior", "Keep a 7-day study streak", "⚡", 75)
        .requires(Requirement::Streak(7)),
    AchievementDef::new("streak_30", "Monthly Maven", "Keep a 30-day study streak", "🌟", 300)
        .requires(Requirement::Streak(30)),
    AchievementDef::new("level_5", "Climbing", "Reach level 5", "⛰️", 50)
        .requires(Requirement::Level(5)),
    AchievementDef::new("level_10", "Scholar", "Reach level 10", "🦉", 100)
        .requires(Requirement::Level(10)),
    AchievementDef::new("xp_1000", "Seasoned Scholar", "Earn 1,000 lifetime XP", "💎", 100)
        .requires(Requirement::TotalXp(1000)),
    AchievementDef::new("guide_halfway", "Halfway There", "Finish half the study guide", "🗺️", 50)
        .requires(Requirement::StudyGuidePercent(50)),
    AchievementDef::new("guide_complete", "Guide Complete", "Finish the whole study guide", "🏁", 150)
        .requires(Requirement::StudyGuidePercent(100)),
];

#[allow(dead_code)] // Used by tests and library consumers
pub fn find(id: &str) -> Option<&'static AchievementDef> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Return the achievements newly satisfied by `record`, in definition order.
///
/// Runs once per award; an achievement reward that itself crosses a further
/// threshold is not caught until the next award (single-pass evaluation).
pub fn evaluate(record: &ProgressRecord, study_guide_percent: f64) -> Vec<&'static AchievementDef> {
    ACHIEVEMENTS
        .iter()
        .filter(|def| !record.has_achievement(def.id))
        .filter(|def| {
            def.requirement
                .as_ref()
                .is_some_and(|req| req.satisfied(record, study_guide_percent))
        })
        .collect()
}
