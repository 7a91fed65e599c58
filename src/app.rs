//! Composition root: owns the progress record, the daily ledger, the saved
//! collections and the store selected at startup. The UI (here, the CLI)
//! mutates state only through the named operations below.

use anyhow::Result;
use chrono::{Local, NaiveDate, Utc};
use tracing::warn;

use crate::config::Config;
use crate::engine::activity::ActivityKind;
use crate::engine::daily::ChallengeLedger;
use crate::engine::progress::{AwardOutcome, ProgressRecord};
use crate::event::{EventBus, ProgressEvent};
use crate::store::schema::{
    DailyChallengesData, ExportData, ProgressData, SavedItem, SavedItemsData, SavedKind,
    StudyGuideData,
};
use crate::store::{self, Store};

pub struct App {
    pub config: Config,
    store: Store,
    pub record: ProgressRecord,
    pub daily: ChallengeLedger,
    pub study_guide: StudyGuideData,
    pub saved: SavedItemsData,
    pub events: EventBus,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let backend = store::backend_from_config(&config)?;
        Ok(Self::with_store(config, Store::new(backend)))
    }

    /// Build against an already-constructed store (tests inject a temp-dir
    /// backend here).
    pub fn with_store(config: Config, store: Store) -> Self {
        let record = store.load_progress().record;
        let daily = store.load_daily_challenges().ledger;
        let study_guide = store.load_study_guide();
        let saved = store.load_saved_items();
        Self {
            config,
            store,
            record,
            daily,
            study_guide,
            saved,
            events: EventBus::new(),
        }
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn backend_label(&self) -> &'static str {
        self.store.backend_label()
    }

    pub fn study_guide_percent(&self) -> f64 {
        self.study_guide
            .percent_complete(self.config.study_guide_total_items)
    }

    // --- Named operations ---

    pub fn complete_flashcard(&mut self, correct: bool) -> AwardOutcome {
        let kind = if correct {
            ActivityKind::FlashcardCorrect
        } else {
            ActivityKind::FlashcardCompleted
        };
        self.run_activity(kind)
    }

    pub fn view_question(&mut self) -> AwardOutcome {
        self.run_activity(ActivityKind::QuestionViewed)
    }

    pub fn complete_lesson(&mut self) -> AwardOutcome {
        self.run_activity(ActivityKind::LessonCompleted)
    }

    pub fn daily_login(&mut self) -> AwardOutcome {
        self.run_activity(ActivityKind::DailyLogin)
    }

    pub fn use_tool(&mut self, name: &str) -> AwardOutcome {
        let today = Self::today();
        self.daily.roll_over(today, &self.record.counters);
        self.daily.note_tool(name);
        self.run_activity_on(ActivityKind::ToolUsed, today)
    }

    /// Completing an already-done guide item is a no-op: the counter and the
    /// XP are awarded once per item.
    pub fn complete_study_guide_item(&mut self, item_id: &str) -> AwardOutcome {
        if !self.study_guide.completed_items.insert(item_id.to_string()) {
            return AwardOutcome::default();
        }
        if let Err(err) = self.store.save_study_guide(&self.study_guide) {
            warn!(%err, "study guide write failed, keeping in-memory state");
        }
        self.run_activity(ActivityKind::StudyGuideItemCompleted)
    }

    /// Minutes come from an external timer; they feed the daily study-time
    /// challenge but award no XP of their own.
    pub fn add_study_minutes(&mut self, minutes: u32) -> AwardOutcome {
        let today = Self::today();
        self.daily.roll_over(today, &self.record.counters);
        self.record.add_study_minutes(minutes);
        let mut outcome = AwardOutcome::default();
        self.settle_daily(&mut outcome, today);
        self.persist();
        self.publish(&outcome);
        outcome
    }

    /// The general mutation entry point; the per-activity operations funnel
    /// through this with their fixed amounts.
    pub fn award_experience(&mut self, amount: u32, source: &str) -> AwardOutcome {
        let today = Self::today();
        self.daily.roll_over(today, &self.record.counters);
        let mut outcome =
            self.record
                .award_experience(amount, source, today, self.study_guide_percent());
        self.settle_daily(&mut outcome, today);
        self.persist();
        self.publish(&outcome);
        outcome
    }

    fn run_activity(&mut self, kind: ActivityKind) -> AwardOutcome {
        let today = Self::today();
        // Roll the ledger before the counter bump so a new day's baseline
        // excludes this activity.
        self.daily.roll_over(today, &self.record.counters);
        self.run_activity_on(kind, today)
    }

    fn run_activity_on(&mut self, kind: ActivityKind, today: NaiveDate) -> AwardOutcome {
        let mut outcome = self
            .record
            .record_activity(kind, today, self.study_guide_percent());
        self.settle_daily(&mut outcome, today);
        self.persist();
        self.publish(&outcome);
        outcome
    }

    /// Run the daily tracker and award any newly completed challenge's
    /// reward through the normal award pipeline.
    fn settle_daily(&mut self, outcome: &mut AwardOutcome, today: NaiveDate) {
        let completed = self.daily.record_progress(&self.record.counters, today);
        for def in completed {
            self.events.publish(ProgressEvent::ChallengeCompleted {
                id: def.id,
                name: def.name,
                reward_xp: def.reward_xp,
            });
            let extra =
                self.record
                    .award_experience(def.reward_xp, def.id, today, self.study_guide_percent());
            outcome.merge(extra);
        }
    }

    fn publish(&mut self, outcome: &AwardOutcome) {
        for def in &outcome.unlocked {
            self.events.publish(ProgressEvent::AchievementUnlocked {
                id: def.id,
                name: def.name,
                reward_xp: def.reward_xp,
            });
        }
        if let Some(lv) = outcome.leveled_up {
            self.events.publish(ProgressEvent::LevelUp {
                from: lv.from,
                to: lv.to,
            });
        }
        self.events.publish(ProgressEvent::ProgressUpdated {
            experience_points: self.record.experience_points,
            level: self.record.level,
            streak_days: self.record.streak_days,
        });
    }

    /// Fire-and-forget durable write: a failure is logged and swallowed, the
    /// in-memory record stays the source of truth for the session.
    fn persist(&self) {
        let progress = ProgressData {
            record: self.record.clone(),
            ..Default::default()
        };
        if let Err(err) = self.store.save_progress(&progress) {
            warn!(%err, backend = self.store.backend_label(), "progress write failed, keeping in-memory state");
        }
        let daily = DailyChallengesData {
            ledger: self.daily.clone(),
            ..Default::default()
        };
        if let Err(err) = self.store.save_daily_challenges(&daily) {
            warn!(%err, "daily challenge write failed, keeping in-memory state");
        }
    }

    // --- Saved content ---

    pub fn save_item(&mut self, kind: SavedKind, id: &str, title: &str) -> bool {
        let list = self.saved.list_mut(kind);
        if list.iter().any(|item| item.id == id) {
            return false;
        }
        list.push(SavedItem {
            id: id.to_string(),
            title: title.to_string(),
            added_at: Utc::now(),
        });
        if let Err(err) = self.store.save_saved_items(&self.saved) {
            warn!(%err, "saved items write failed, keeping in-memory state");
        }
        self.events.publish(ProgressEvent::ItemSaved {
            kind: kind.to_key(),
            id: id.to_string(),
        });
        true
    }

    pub fn remove_item(&mut self, kind: SavedKind, id: &str) -> bool {
        let list = self.saved.list_mut(kind);
        let before = list.len();
        list.retain(|item| item.id != id);
        if list.len() == before {
            return false;
        }
        if let Err(err) = self.store.save_saved_items(&self.saved) {
            warn!(%err, "saved items write failed, keeping in-memory state");
        }
        true
    }

    // --- Maintenance ---

    pub fn export_all(&self) -> ExportData {
        self.store.export_all()
    }

    pub fn import_all(&mut self, data: &ExportData) -> Result<()> {
        self.store.import_all(data)?;
        self.record = self.store.load_progress().record;
        self.daily = self.store.load_daily_challenges().ledger;
        self.study_guide = self.store.load_study_guide();
        self.saved = self.store.load_saved_items();
        Ok(())
    }

    pub fn reset_progress(&mut self) {
        self.record = ProgressRecord::default();
        self.daily = ChallengeLedger::default();
        self.study_guide = StudyGuideData::default();
        self.saved = SavedItemsData::default();
        if let Err(err) = self.store.delete_all() {
            warn!(%err, "failed to delete persisted collections during reset");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::activity::CounterKind;
    use crate::store::json_store::JsonFileBackend;
    use tempfile::TempDir;

    fn make_test_app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::with_base_dir(dir.path().to_path_buf()).unwrap();
        let app = App::with_store(Config::default(), Store::new(Box::new(backend)));
        (dir, app)
    }

    #[test]
    fn test_fresh_app_starts_at_defaults() {
        let (_dir, app) = make_test_app();
        assert_eq!(app.record.experience_points, 0);
        assert_eq!(app.record.level, 1);
        assert_eq!(app.record.streak_days, 0);
    }

    #[test]
    fn test_flashcard_awards_and_persists() {
        let (dir, mut app) = make_test_app();
        let outcome = app.complete_flashcard(false);
        assert_eq!(outcome.awarded, 15); // 5 + First Step's 10
        assert_eq!(app.record.counters.get(CounterKind::FlashcardsCompleted), 1);

        // A fresh App over the same dir sees the persisted record.
        let backend = JsonFileBackend::with_base_dir(dir.path().to_path_buf()).unwrap();
        let reloaded = App::with_store(Config::default(), Store::new(Box::new(backend)));
        assert_eq!(reloaded.record.experience_points, 15);
    }

    #[test]
    fn test_correct_flashcard_awards_more() {
        let (_dir, mut app) = make_test_app();
        app.complete_flashcard(false);
        let outcome = app.complete_flashcard(true);
        assert_eq!(outcome.awarded, 10);
    }

    #[test]
    fn test_study_guide_item_awards_once() {
        let (_dir, mut app) = make_test_app();
        let outcome = app.complete_study_guide_item("arrays-101");
        assert_eq!(outcome.awarded, 3);
        assert_eq!(
            app.record.counters.get(CounterKind::StudyGuideItemsCompleted),
            1
        );

        let outcome = app.complete_study_guide_item("arrays-101");
        assert_eq!(outcome.awarded, 0);
        assert_eq!(
            app.record.counters.get(CounterKind::StudyGuideItemsCompleted),
            1
        );
    }

    #[test]
    fn test_study_guide_percent_feeds_achievements() {
        let (_dir, mut app) = make_test_app();
        app.config.study_guide_total_items = 2;
        app.complete_study_guide_item("a");
        assert!((app.study_guide_percent() - 50.0).abs() < f64::EPSILON);
        assert!(app.record.has_achievement("guide_halfway"));

        app.complete_study_guide_item("b");
        assert!(app.record.has_achievement("guide_complete"));
    }

    #[test]
    fn test_distinct_tools_complete_daily_challenge() {
        let (_dir, mut app) = make_test_app();
        app.use_tool("pomodoro");
        app.use_tool("pomodoro");
        app.use_tool("notes");
        assert!(!app.daily.state("daily_tool_variety").completed);

        let outcome = app.use_tool("whiteboard");
        assert!(app.daily.state("daily_tool_variety").completed);
        // 5 for the tool + 50 challenge reward
        assert_eq!(outcome.awarded, 55);
    }

    #[test]
    fn test_study_minutes_award_no_base_xp() {
        let (_dir, mut app) = make_test_app();
        let outcome = app.add_study_minutes(29);
        assert_eq!(outcome.awarded, 0);
        assert_eq!(app.record.experience_points, 0);

        let outcome = app.add_study_minutes(1);
        assert_eq!(outcome.awarded, 75); // Deep Focus reward only
        assert_eq!(app.record.experience_points, 75);
    }

    #[test]
    fn test_save_and_remove_item() {
        let (_dir, mut app) = make_test_app();
        assert!(app.save_item(SavedKind::Topic, "btrees", "B-Trees"));
        assert!(!app.save_item(SavedKind::Topic, "btrees", "B-Trees again"));
        assert_eq!(app.saved.list(SavedKind::Topic).len(), 1);

        assert!(app.remove_item(SavedKind::Topic, "btrees"));
        assert!(!app.remove_item(SavedKind::Topic, "btrees"));
        assert!(app.saved.list(SavedKind::Topic).is_empty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let (dir, mut app) = make_test_app();
        app.complete_flashcard(false);
        app.save_item(SavedKind::Question, "q1", "Two Sum");
        app.reset_progress();

        assert_eq!(app.record.experience_points, 0);
        assert!(app.saved.questions.is_empty());

        let backend = JsonFileBackend::with_base_dir(dir.path().to_path_buf()).unwrap();
        let reloaded = App::with_store(Config::default(), Store::new(Box::new(backend)));
        assert_eq!(reloaded.record.experience_points, 0);
    }

    #[test]
    fn test_events_published_on_award() {
        let (_dir, mut app) = make_test_app();
        let rx = app.events.subscribe();
        app.complete_flashcard(false);

        let events: Vec<_> = rx.try_iter().collect();
        assert!(events.iter().any(|e| matches!(
            e,
            ProgressEvent::AchievementUnlocked { id: "first_step", .. }
        )));
        assert!(events
            .iter()
            .any(|e| matches!(e, ProgressEvent::ProgressUpdated { .. })));
    }
}
