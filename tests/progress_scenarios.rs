use tempfile::TempDir;

use studyquest::app::App;
use studyquest::config::Config;
use studyquest::engine::activity::CounterKind;
use studyquest::event::ProgressEvent;
use studyquest::store::Store;
use studyquest::store::json_store::JsonFileBackend;

fn make_test_app() -> (TempDir, App) {
    let dir = TempDir::new().unwrap();
    let backend = JsonFileBackend::with_base_dir(dir.path().to_path_buf()).unwrap();
    let app = App::with_store(Config::default(), Store::new(Box::new(backend)));
    (dir, app)
}

/// Fresh record, five flashcards in one day: 5 XP each, the First Step
/// achievement's 10 on the first card, and the Getting Started daily
/// challenge's 50 once the fifth card crosses the threshold.
#[test]
fn five_flashcards_in_a_day_total_85_xp() {
    let (_dir, mut app) = make_test_app();
    let rx = app.events.subscribe();

    let first = app.complete_flashcard(false);
    assert_eq!(first.unlocked.len(), 1);
    assert_eq!(first.unlocked[0].id, "first_step");
    assert_eq!(app.record.experience_points, 15);

    for _ in 0..3 {
        app.complete_flashcard(false);
    }
    assert_eq!(app.record.experience_points, 30);
    assert!(!app.daily.state("daily_flashcards").completed);

    app.complete_flashcard(false);
    assert_eq!(app.record.counters.get(CounterKind::FlashcardsCompleted), 5);
    assert!(app.daily.state("daily_flashcards").completed);
    assert_eq!(app.record.experience_points, 85);
    assert_eq!(app.record.total_experience_points, 85);

    let events: Vec<_> = rx.try_iter().collect();
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, ProgressEvent::ChallengeCompleted { id: "daily_flashcards", .. }))
            .count(),
        1
    );
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, ProgressEvent::AchievementUnlocked { id: "first_step", .. }))
            .count(),
        1
    );
}

/// Awards of [40, 40, 40] cross level 1 -> 2 exactly once, after the third
/// call.
#[test]
fn level_up_signal_fires_exactly_once_across_three_awards() {
    let (_dir, mut app) = make_test_app();
    let rx = app.events.subscribe();

    app.award_experience(40, "test");
    app.award_experience(40, "test");
    let level_ups_so_far = rx
        .try_iter()
        .filter(|e| matches!(e, ProgressEvent::LevelUp { .. }))
        .count();
    assert_eq!(level_ups_so_far, 0);

    app.award_experience(40, "test");
    let level_ups: Vec<_> = rx
        .try_iter()
        .filter(|e| matches!(e, ProgressEvent::LevelUp { .. }))
        .collect();
    assert_eq!(level_ups, vec![ProgressEvent::LevelUp { from: 1, to: 2 }]);

    assert_eq!(app.record.experience_points, 120);
    assert_eq!(app.record.level, 2);
}

/// A crashed or concurrent writer can leave garbage; the next session starts
/// from defaults instead of failing.
#[test]
fn corrupt_progress_file_loads_as_fresh_record() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("progress.json"), "definitely not json").unwrap();

    let backend = JsonFileBackend::with_base_dir(dir.path().to_path_buf()).unwrap();
    let app = App::with_store(Config::default(), Store::new(Box::new(backend)));
    assert_eq!(app.record.experience_points, 0);
    assert_eq!(app.record.level, 1);
}

/// Export on one device, import on another: the second device continues from
/// the first's state.
#[test]
fn export_import_moves_state_between_stores() {
    let (_dir, mut app) = make_test_app();
    app.complete_flashcard(false);
    app.save_item(
        studyquest::store::schema::SavedKind::Topic,
        "heaps",
        "Binary Heaps",
    );
    let export = app.export_all();

    let (_dir2, mut other) = make_test_app();
    other.import_all(&export).unwrap();
    assert_eq!(other.record.experience_points, app.record.experience_points);
    assert!(other.record.has_achievement("first_step"));
    assert_eq!(
        other
            .saved
            .list(studyquest::store::schema::SavedKind::Topic)
            .len(),
        1
    );
}

/// The daily ledger and the permanent record are independent: wiping the
/// ledger date does not touch XP, and challenge completion state does not
/// survive into a new day while the record does.
#[test]
fn daily_ledger_is_independent_of_progress_record() {
    let (_dir, mut app) = make_test_app();
    for _ in 0..5 {
        app.complete_flashcard(false);
    }
    let xp = app.record.experience_points;
    assert!(app.daily.state("daily_flashcards").completed);

    // Simulate yesterday's ledger surviving on disk.
    let yesterday = chrono::Local::now().date_naive() - chrono::Days::new(1);
    app.daily.date = yesterday.format("%Y-%m-%d").to_string();

    let outcome = app.view_question();
    assert!(!app.daily.state("daily_flashcards").completed);
    assert_eq!(app.daily.state("daily_flashcards").progress, 0);
    assert_eq!(app.record.experience_points, xp + outcome.awarded);
}
