mod app;
mod config;
mod engine;
mod event;
mod store;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use app::App;
use config::Config;
use engine::achievements::ACHIEVEMENTS;
use engine::daily::CHALLENGES;
use engine::leveling;
use engine::progress::AwardOutcome;
use store::schema::SavedKind;

#[derive(Parser)]
#[command(name = "studyquest", version, about = "Gamified study progress tracker")]
struct Cli {
    #[arg(long, help = "Sync to this remote table URL instead of local files")]
    remote_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record a completed flashcard
    Flashcard {
        #[arg(long, help = "The card was answered correctly")]
        correct: bool,
    },
    /// Record a viewed question
    Question,
    /// Record a completed lesson
    Lesson,
    /// Mark a study-guide item as done
    Guide { item_id: String },
    /// Record a study-tool use
    Tool { name: String },
    /// Add study minutes from an external timer
    Minutes { count: u32 },
    /// Record today's login
    Login,
    /// Show XP, level, streak and counters
    Stats,
    /// List achievements and their unlock state
    Achievements,
    /// Show today's challenges
    Challenges,
    /// Save a question/topic/flashcard for later
    Save {
        kind: String,
        id: String,
        title: String,
    },
    /// List saved items
    Saved,
    /// Remove a saved item
    Unsave { kind: String, id: String },
    /// Write all persisted data to a JSON file
    Export { path: PathBuf },
    /// Restore persisted data from an export file
    Import { path: PathBuf },
    /// Wipe all progress and saved data
    Reset {
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(url) = cli.remote_url {
        config.remote_enabled = true;
        config.remote_base_url = url;
    }

    let mut app = App::new(config)?;

    match cli.command {
        Command::Flashcard { correct } => {
            let outcome = app.complete_flashcard(correct);
            print_outcome(&app, &outcome);
        }
        Command::Question => {
            let outcome = app.view_question();
            print_outcome(&app, &outcome);
        }
        Command::Lesson => {
            let outcome = app.complete_lesson();
            print_outcome(&app, &outcome);
        }
        Command::Guide { item_id } => {
            let outcome = app.complete_study_guide_item(&item_id);
            if outcome.awarded == 0 {
                println!("{item_id} was already done");
            } else {
                print_outcome(&app, &outcome);
            }
        }
        Command::Tool { name } => {
            let outcome = app.use_tool(&name);
            print_outcome(&app, &outcome);
        }
        Command::Minutes { count } => {
            let outcome = app.add_study_minutes(count);
            print_outcome(&app, &outcome);
        }
        Command::Login => {
            let outcome = app.daily_login();
            print_outcome(&app, &outcome);
        }
        Command::Stats => print_stats(&app),
        Command::Achievements => print_achievements(&app),
        Command::Challenges => print_challenges(&mut app),
        Command::Save { kind, id, title } => {
            let kind = parse_saved_kind(&kind)?;
            if app.save_item(kind, &id, &title) {
                println!("Saved {} {id}", kind.to_key());
            } else {
                println!("{} {id} is already saved", kind.to_key());
            }
        }
        Command::Saved => print_saved(&app),
        Command::Unsave { kind, id } => {
            let kind = parse_saved_kind(&kind)?;
            if app.remove_item(kind, &id) {
                println!("Removed {} {id}", kind.to_key());
            } else {
                println!("No saved {} with id {id}", kind.to_key());
            }
        }
        Command::Export { path } => {
            let export = app.export_all();
            let json = serde_json::to_string_pretty(&export)?;
            fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
        Command::Import { path } => {
            let json =
                fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            let export = serde_json::from_str(&json)
                .with_context(|| format!("parsing {}", path.display()))?;
            app.import_all(&export)?;
            println!("Imported from {}", path.display());
        }
        Command::Reset { yes } => {
            if !yes {
                println!("This wipes all progress. Re-run with --yes to confirm.");
                return Ok(());
            }
            app.reset_progress();
            println!("Progress reset");
        }
    }

    Ok(())
}

fn parse_saved_kind(kind: &str) -> Result<SavedKind> {
    SavedKind::from_key(kind)
        .with_context(|| format!("unknown kind {kind:?} (expected question, topic or flashcard)"))
}

fn print_outcome(app: &App, outcome: &AwardOutcome) {
    if outcome.awarded > 0 {
        println!("+{} XP", outcome.awarded);
    }
    for def in &outcome.unlocked {
        println!("{} Achievement unlocked: {} (+{} XP)", def.icon, def.name, def.reward_xp);
    }
    if let Some(lv) = outcome.leveled_up {
        println!("Level up! {} -> {}", lv.from, lv.to);
    }
    let progress = leveling::progress_for_xp(app.record.experience_points);
    println!(
        "Level {} | {}/{} XP | {} day streak",
        progress.level, progress.xp_into_level, progress.xp_needed_for_level, app.record.streak_days
    );
}

fn print_stats(app: &App) {
    let record = &app.record;
    let progress = leveling::progress_for_xp(record.experience_points);
    println!("Level {} ({}% to next)", progress.level, progress.percent);
    println!("XP: {} (lifetime {})", record.experience_points, record.total_experience_points);
    println!(
        "Streak: {} days (best {})",
        record.streak_days, record.best_streak
    );
    println!("Study guide: {:.0}% complete", app.study_guide_percent());
    println!("Storage: {}", app.backend_label());
    println!();
    println!("Counters:");
    for &kind in engine::activity::CounterKind::all() {
        println!("  {:<28} {}", kind.to_key(), record.counters.get(kind));
    }
}

fn print_achievements(app: &App) {
    let unlocked = app.record.unlocked_achievements.len();
    println!("{unlocked}/{} unlocked", ACHIEVEMENTS.len());
    for def in ACHIEVEMENTS {
        let mark = if app.record.has_achievement(def.id) {
            "[x]"
        } else {
            "[ ]"
        };
        println!("{mark} {} {:<18} {}", def.icon, def.name, def.description);
    }
}

fn print_challenges(app: &mut App) {
    // Touch nothing but the ledger date: show today's state even if the
    // stored ledger is from yesterday.
    let today = chrono::Local::now().date_naive();
    app.daily.roll_over(today, &app.record.counters);
    println!("Challenges for {}", app.daily.date);
    for def in CHALLENGES {
        let state = app.daily.state(def.id);
        let mark = if state.completed { "[x]" } else { "[ ]" };
        println!(
            "{mark} {:<16} {}/{} (+{} XP) - {}",
            def.name,
            state.progress,
            def.goal.target(),
            def.reward_xp,
            def.description
        );
    }
}

fn print_saved(app: &App) {
    for (label, kind) in [
        ("Questions", SavedKind::Question),
        ("Topics", SavedKind::Topic),
        ("Flashcards", SavedKind::Flashcard),
    ] {
        let items = app.saved.list(kind);
        println!("{label} ({}):", items.len());
        for item in items {
            println!("  {:<24} {}", item.id, item.title);
        }
    }
}
