//! Daily challenges: a small second ledger, reset at midnight, independent of
//! the permanent progress record.
//!
//! Progress is measured against a counter snapshot taken when the ledger
//! opens for a new day, so lifetime tallies never satisfy a day's goal.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::activity::{ActivityCounters, CounterKind};
use crate::engine::progress::DATE_FORMAT;

// --- Static Definitions ---

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Goal {
    Counter { counter: CounterKind, target: u32 },
    DistinctTools { target: u32 },
}

impl Goal {
    pub fn target(self) -> u32 {
        match self {
            Goal::Counter { target, .. } | Goal::DistinctTools { target } => target,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChallengeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub reward_xp: u32,
    pub goal: Goal,
}

pub const CHALLENGES: &[ChallengeDef] = &[
    ChallengeDef {
        id: "daily_flashcards",
        name: "Getting Started",
        description: "Complete 5 flashcards today",
        reward_xp: 50,
        goal: Goal::Counter {
            counter: CounterKind::FlashcardsCompleted,
            target: 5,
        },
    },
    ChallengeDef {
        id: "daily_questions",
        name: "Question Spree",
        description: "View 10 questions today",
        reward_xp: 50,
        goal: Goal::Counter {
            counter: CounterKind::QuestionsViewed,
            target: 10,
        },
    },
    ChallengeDef {
        id: "daily_study_time",
        name: "Deep Focus",
        description: "Study for 30 minutes today",
        reward_xp: 75,
        goal: Goal::Counter {
            counter: CounterKind::StudyMinutes,
            target: 30,
        },
    },
    ChallengeDef {
        id: "daily_tool_variety",
        name: "Toolbox Tour",
        description: "Use 3 different study tools today",
        reward_xp: 50,
        goal: Goal::DistinctTools { target: 3 },
    },
];

#[allow(dead_code)] // Used by tests and library consumers
pub fn find(id: &str) -> Option<&'static ChallengeDef> {
    CHALLENGES.iter().find(|c| c.id == id)
}

// --- Persisted Ledger ---

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChallengeState {
    pub completed: bool,
    pub progress: u32,
}

/// One calendar day's challenge bookkeeping. A ledger whose `date` is not
/// today is discarded and rebuilt before any read.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChallengeLedger {
    pub date: String,
    pub states: BTreeMap<String, ChallengeState>,
    /// Counter values at the moment the ledger opened; today's progress is
    /// measured from here.
    pub baseline: ActivityCounters,
    pub tools_today: BTreeSet<String>,
}

impl ChallengeLedger {
    pub fn open_for(today: NaiveDate, counters: &ActivityCounters) -> Self {
        Self {
            date: today.format(DATE_FORMAT).to_string(),
            states: BTreeMap::new(),
            baseline: counters.clone(),
            tools_today: BTreeSet::new(),
        }
    }

    pub fn is_for(&self, today: NaiveDate) -> bool {
        self.date == today.format(DATE_FORMAT).to_string()
    }

    /// Replace a stale ledger with a fresh one baselined on `counters`.
    /// Call before mutating any counter for today's first activity.
    pub fn roll_over(&mut self, today: NaiveDate, counters: &ActivityCounters) {
        if !self.is_for(today) {
            *self = Self::open_for(today, counters);
        }
    }

    /// Note a tool use for the distinct-tools goal. Only meaningful after
    /// `roll_over` for today.
    pub fn note_tool(&mut self, name: &str) {
        self.tools_today.insert(name.to_string());
    }

    pub fn state(&self, id: &str) -> ChallengeState {
        self.states.get(id).cloned().unwrap_or_default()
    }

    fn progress_for(&self, goal: Goal, counters: &ActivityCounters) -> u32 {
        match goal {
            Goal::Counter { counter, target: _ } => {
                counters.get(counter).saturating_sub(self.baseline.get(counter))
            }
            Goal::DistinctTools { .. } => self.tools_today.len() as u32,
        }
    }

    /// Recompute every challenge's progress and return the defs that just
    /// crossed their threshold. The caller awards each returned def's
    /// `reward_xp`; a completed challenge never re-triggers within its day.
    pub fn record_progress(
        &mut self,
        counters: &ActivityCounters,
        today: NaiveDate,
    ) -> Vec<&'static ChallengeDef> {
        self.roll_over(today, counters);

        let mut newly_completed = Vec::new();
        for def in CHALLENGES {
            let progress = self.progress_for(def.goal, counters);
            let state = self.states.entry(def.id.to_string()).or_default();
            state.progress = progress.min(def.goal.target());
            if !state.completed && progress >= def.goal.target() {
                state.completed = true;
                newly_completed.push(def);
            }
        }
        newly_completed
    }
}
