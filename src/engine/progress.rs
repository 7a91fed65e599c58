//! The authoritative mutable record for one user and its transition rules.
//!
//! All mutation goes through `award_experience` or the per-activity wrapper;
//! the record is never edited field-by-field from outside the engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::achievements::{self, AchievementDef};
use crate::engine::activity::{ActivityCounters, ActivityKind, CounterKind};
use crate::engine::leveling::level_for_xp;
use crate::engine::streak::update_streak;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub experience_points: u32,
    /// Lifetime tally; never decremented. Equal to `experience_points` as
    /// long as nothing spends XP.
    pub total_experience_points: u32,
    /// Derived: always `level_for_xp(experience_points)` after a mutation.
    pub level: u32,
    pub streak_days: u32,
    pub best_streak: u32,
    pub last_activity_date: Option<String>,
    /// Append-only within a session; ids are never removed.
    pub unlocked_achievements: Vec<String>,
    pub counters: ActivityCounters,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            experience_points: 0,
            total_experience_points: 0,
            level: 1,
            streak_days: 0,
            best_streak: 0,
            last_activity_date: None,
            unlocked_achievements: Vec::new(),
            counters: ActivityCounters::default(),
        }
    }
}

/// A level boundary crossed by one award. UI celebration only; not persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelUp {
    pub from: u32,
    pub to: u32,
}

/// What one `award_experience` call changed.
#[derive(Clone, Debug, Default)]
pub struct AwardOutcome {
    /// Base amount plus any achievement rewards rolled in.
    pub awarded: u32,
    pub leveled_up: Option<LevelUp>,
    pub unlocked: Vec<&'static AchievementDef>,
}

impl AwardOutcome {
    /// Fold a follow-up award (e.g. a daily-challenge reward granted in the
    /// same user action) into this outcome so level-up fires at most once.
    pub fn merge(&mut self, other: AwardOutcome) {
        self.awarded += other.awarded;
        self.unlocked.extend(other.unlocked);
        self.leveled_up = match (self.leveled_up, other.leveled_up) {
            (Some(a), Some(b)) => Some(LevelUp { from: a.from, to: b.to }),
            (a, b) => a.or(b),
        };
    }
}

impl ProgressRecord {
    pub fn has_achievement(&self, id: &str) -> bool {
        self.unlocked_achievements.iter().any(|a| a == id)
    }

    pub fn last_activity(&self) -> Option<NaiveDate> {
        self.last_activity_date
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
    }

    /// Award XP and run the full transition pipeline: streak, level, then a
    /// single achievement pass whose rewards are rolled in before the caller
    /// persists the record.
    pub fn award_experience(
        &mut self,
        amount: u32,
        source: &str,
        today: NaiveDate,
        study_guide_percent: f64,
    ) -> AwardOutcome {
        let pre_level = level_for_xp(self.experience_points);

        self.experience_points += amount;
        self.total_experience_points += amount;

        self.streak_days = update_streak(self.last_activity(), today, self.streak_days);
        self.best_streak = self.best_streak.max(self.streak_days);
        self.last_activity_date = Some(today.format(DATE_FORMAT).to_string());

        self.level = level_for_xp(self.experience_points);

        // Single pass: a reward that crosses a further threshold is caught on
        // the next award, not this one.
        let unlocked = achievements::evaluate(self, study_guide_percent);
        let mut bonus = 0;
        for def in &unlocked {
            self.unlocked_achievements.push(def.id.to_string());
            bonus += def.reward_xp;
            debug!(achievement = def.id, reward = def.reward_xp, source, "achievement unlocked");
        }
        if bonus > 0 {
            self.experience_points += bonus;
            self.total_experience_points += bonus;
            self.level = level_for_xp(self.experience_points);
        }

        let leveled_up = (self.level > pre_level).then_some(LevelUp {
            from: pre_level,
            to: self.level,
        });
        if let Some(lv) = leveled_up {
            debug!(from = lv.from, to = lv.to, source, "level up");
        }

        AwardOutcome {
            awarded: amount + bonus,
            leveled_up,
            unlocked,
        }
    }

    /// Bump the activity's counter by one, then award its fixed XP value.
    pub fn record_activity(
        &mut self,
        kind: ActivityKind,
        today: NaiveDate,
        study_guide_percent: f64,
    ) -> AwardOutcome {
        self.counters.bump(kind.counter());
        self.award_experience(kind.xp(), kind.as_str(), today, study_guide_percent)
    }

    /// Study minutes come from an external clock collaborator; they feed the
    /// daily study-time challenge but carry no XP of their own.
    pub fn add_study_minutes(&mut self, minutes: u32) {
        self.counters.add(CounterKind::StudyMinutes, minutes);
    }
}
