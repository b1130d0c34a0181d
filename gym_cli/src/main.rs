use clap::{Parser, Subcommand};
use gym_core::feedback::{FeedbackSink, Notification, SoundCue};
use gym_core::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "gym-buddy")]
#[command(about = "Strength workout session tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override the timer tick length in milliseconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the workout plans
    Plans,

    /// Start a plan, or resume it if it is already active
    Start {
        /// Plan id (see `plans`)
        template: String,
    },

    /// Show the current workout (default)
    Status,

    /// List every active workout
    Active,

    /// Mark a set done, or undo it
    Toggle {
        exercise: String,

        /// Set number, starting at 1
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        set: u32,

        /// Count down the rest period before returning
        #[arg(long)]
        wait: bool,
    },

    /// Record the weight actually lifted for a set
    Weight {
        exercise: String,

        /// Set number, starting at 1
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        set: u32,

        #[arg(value_parser = parse_weight)]
        weight: f64,
    },

    /// Record the reps actually done for a set
    Reps {
        exercise: String,

        /// Set number, starting at 1
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        set: u32,

        reps: u32,
    },

    /// Run a rest countdown
    Rest { seconds: u32 },

    /// Finish the current workout and log it to history
    Finish,

    /// Abandon the current workout without logging it
    Cancel,

    /// Discard an active workout's progress
    Reset { template: String },

    /// Make a finished workout current again
    Repeat { history_id: String },

    /// List finished workouts
    History {
        /// Write completed sets to a CSV file, replacing it if it exists
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Delete every finished workout
    ClearHistory,

    /// Show or change preferences
    Prefs {
        #[arg(long, value_parser = parse_view)]
        view: Option<ViewKind>,

        #[arg(long, value_parser = parse_theme)]
        theme: Option<Theme>,
    },
}

fn parse_weight(s: &str) -> std::result::Result<f64, String> {
    let weight: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if !weight.is_finite() {
        return Err(format!("'{}' is not a finite weight", s));
    }
    Ok(weight)
}

fn parse_view(s: &str) -> std::result::Result<ViewKind, String> {
    ViewKind::parse(s).ok_or_else(|| format!("unknown view '{}' (activity, plan, workout)", s))
}

fn parse_theme(s: &str) -> std::result::Result<Theme, String> {
    Theme::parse(s).ok_or_else(|| format!("unknown theme '{}' (light, dark)", s))
}

/// Feedback on a terminal: bell for sounds, notifications on stderr
struct TerminalSink;

impl FeedbackSink for TerminalSink {
    fn vibrate(&mut self, pattern: &[u32]) -> Result<()> {
        tracing::debug!("No vibration on a terminal ({:?})", pattern);
        Ok(())
    }

    fn play_sound(&mut self, cue: SoundCue) -> Result<()> {
        let mut err = io::stderr();
        match cue {
            SoundCue::Beep => write!(err, "\x07")?,
            SoundCue::Success => write!(err, "\x07\x07")?,
        }
        err.flush()?;
        Ok(())
    }

    fn notify(&mut self, notification: &Notification) -> Result<()> {
        eprintln!("{} {}", notification.title, notification.body);
        Ok(())
    }
}

fn main() -> Result<()> {
    // Initialize logging
    gym_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(tick_ms) = cli.tick_ms {
        config.timers.tick_ms = tick_ms;
    }
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());

    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    let command = cli.command.unwrap_or(Commands::Status);
    if let Commands::Prefs { view, theme } = command {
        return cmd_prefs(&data_dir, view, theme);
    }

    let mut runner = open_runner(&data_dir, &config);

    match command {
        Commands::Plans => cmd_plans(catalog, &runner),
        Commands::Start { template } => cmd_start(&mut runner, catalog, &template),
        Commands::Status => cmd_status(&runner),
        Commands::Active => cmd_active(&runner),
        Commands::Toggle {
            exercise,
            set,
            wait,
        } => cmd_toggle(&mut runner, &exercise, set, wait),
        Commands::Weight {
            exercise,
            set,
            weight,
        } => {
            let outcome = runner.update_weight(&exercise, set_index(set), weight);
            report_set_update(&runner, outcome, &exercise, set);
            Ok(())
        }
        Commands::Reps {
            exercise,
            set,
            reps,
        } => {
            let outcome = runner
                .store_mut()
                .update_set(&exercise, set_index(set), &SetUpdate::reps(reps));
            report_set_update(&runner, outcome, &exercise, set);
            Ok(())
        }
        Commands::Rest { seconds } => {
            runner.timers_mut().start_rest(seconds);
            run_rest(&mut runner)
        }
        Commands::Finish => cmd_finish(&mut runner),
        Commands::Cancel => {
            match runner.cancel() {
                Outcome::Applied => println!("Workout cancelled."),
                Outcome::NoTarget => eprintln!("No workout in progress."),
            }
            Ok(())
        }
        Commands::Reset { template } => {
            match runner.store_mut().reset_workout(&template) {
                Outcome::Applied => println!("✓ Reset {}", template),
                Outcome::NoTarget => eprintln!("'{}' is not active.", template),
            }
            Ok(())
        }
        Commands::Repeat { history_id } => {
            match runner.restore(&history_id) {
                Outcome::Applied => {
                    println!("✓ Restored {}", history_id);
                    cmd_status(&runner)?;
                }
                Outcome::NoTarget => eprintln!("No history entry '{}'.", history_id),
            }
            Ok(())
        }
        Commands::History { export } => cmd_history(&runner, export.as_deref()),
        Commands::ClearHistory => {
            let count = runner.store().workout_history().len();
            runner.store_mut().clear_history();
            println!("✓ Cleared {} workouts from history", count);
            Ok(())
        }
        Commands::Prefs { .. } => Ok(()),
    }
}

fn open_runner(data_dir: &Path, config: &Config) -> WorkoutRunner {
    let persistence = Persistence::new(FileStore::new(data_dir))
        .with_policy(config.persistence.write_policy());
    let store = SessionStore::open(persistence);
    WorkoutRunner::new(
        store,
        TimerDeck::new(config.timers.interval()),
        FeedbackDispatcher::new(TerminalSink, config.feedback.clone()),
    )
}

fn set_index(set: u32) -> usize {
    set.saturating_sub(1) as usize
}

fn cmd_plans(catalog: &Catalog, runner: &WorkoutRunner) -> Result<()> {
    for template in &catalog.workouts {
        let marker = if runner.store().active_workouts().contains_key(&template.id) {
            " (active)"
        } else {
            ""
        };
        println!("{}{}", template.id, marker);
        println!("  {} - {}", template.name, template.description);
        for ex in &template.exercises {
            println!(
                "  {:<10} {} x{} @ {} {}, rest {}",
                ex.id,
                ex.name,
                ex.reps,
                ex.weight,
                ex.weight_unit,
                format_clock(u64::from(ex.rest_seconds))
            );
        }
        println!();
    }
    Ok(())
}

fn cmd_start(runner: &mut WorkoutRunner, catalog: &Catalog, template_id: &str) -> Result<()> {
    let Some(template) = catalog.get(template_id) else {
        return Err(Error::Other(format!("Unknown workout plan '{}'", template_id)));
    };

    let resuming = runner.store().active_workouts().contains_key(template_id);
    runner.start(template);

    if resuming {
        println!("✓ Resumed {}", template.name);
    } else {
        println!("✓ Started {}", template.name);
    }
    cmd_status(runner)
}

fn cmd_status(runner: &WorkoutRunner) -> Result<()> {
    let Some(workout) = runner.store().current_workout() else {
        println!("No workout in progress.");
        return Ok(());
    };

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", workout.name);
    println!("╰─────────────────────────────────────────╯");
    if let Some(start) = runner.store().start_time() {
        let elapsed = (chrono::Utc::now() - start).num_seconds().max(0) as u64;
        println!("  Elapsed: {}", format_clock(elapsed));
    }
    println!(
        "  Progress: {}/{} sets ({}%)",
        completed_sets(workout),
        total_sets(workout),
        completion_percentage(workout)
    );
    println!("  Volume: {}", total_volume(workout));
    println!();

    for ex in &workout.exercises {
        let done = if is_exercise_complete(ex) { " ✓" } else { "" };
        println!(
            "  {} [{}] {}/{}{}",
            ex.name,
            ex.id,
            exercise_completed_count(ex),
            ex.sets,
            done
        );
        for (idx, set) in ex.set_details.iter().enumerate() {
            let mark = if set.is_completed { "x" } else { " " };
            println!(
                "    [{}] {}  {} {} x {}",
                mark,
                idx + 1,
                set.actual_weight,
                ex.weight_unit,
                set.reps
            );
        }
    }
    println!();
    Ok(())
}

fn cmd_active(runner: &WorkoutRunner) -> Result<()> {
    let active = runner.store().active_workouts();
    if active.is_empty() {
        println!("No active workouts.");
        return Ok(());
    }

    let current = runner.store().state().current_workout_id();
    for (id, workout) in active {
        let marker = if current == Some(id.as_str()) { "*" } else { " " };
        println!(
            "{} {}  {}  {}%",
            marker,
            id,
            workout.name,
            completion_percentage(workout)
        );
    }
    Ok(())
}

fn cmd_toggle(runner: &mut WorkoutRunner, exercise: &str, set: u32, wait: bool) -> Result<()> {
    let outcome = runner.toggle_set(exercise, set_index(set));
    report_set_update(runner, outcome, exercise, set);

    let time_left = runner.timers().rest().time_left();
    if outcome.is_applied() && runner.timers().rest().is_resting() {
        if wait {
            return run_rest(runner);
        }
        println!("Rest {} before the next set", format_clock(u64::from(time_left)));
    }
    Ok(())
}

fn report_set_update(runner: &WorkoutRunner, outcome: Outcome, exercise: &str, set: u32) {
    if outcome == Outcome::NoTarget {
        eprintln!("No set {} on '{}' in the current workout.", set, exercise);
        return;
    }

    if let Some(record) = runner
        .store()
        .current_workout()
        .and_then(|w| w.set(exercise, set_index(set)))
    {
        let mark = if record.is_completed { "done" } else { "open" };
        println!(
            "✓ {} set {}: {} x {} ({})",
            exercise, set, record.actual_weight, record.reps, mark
        );
    }
}

/// Count the running rest period down to zero
fn run_rest(runner: &mut WorkoutRunner) -> Result<()> {
    if !runner.timers().rest().is_resting() {
        println!("No rest needed.");
        return Ok(());
    }

    let poll = runner.timers().interval() * 2;
    println!("Rest {}", format_clock(u64::from(runner.timers().rest().time_left())));
    while runner.timers().rest().is_resting() {
        if runner.timers().live_sources() == 0 {
            return Err(Error::Other("rest timer has no tick source".into()));
        }
        for event in runner.wait(poll) {
            if let TimerEvent::RestTick { remaining } = event {
                println!("Rest {}", format_clock(u64::from(remaining)));
            }
        }
    }
    println!("✓ Rest complete");
    Ok(())
}

fn cmd_finish(runner: &mut WorkoutRunner) -> Result<()> {
    if runner.finish() == Outcome::NoTarget {
        eprintln!("No workout in progress.");
        return Ok(());
    }

    if let Some(finished) = runner.store().workout_history().last() {
        let summary = HistorySummary::from(finished);
        println!("✓ Workout logged as {}", summary.id);
        println!(
            "  {}/{} sets ({}%), volume {}",
            summary.completed_sets,
            summary.total_sets,
            summary.completion_percentage,
            summary.volume
        );
    }
    Ok(())
}

fn cmd_history(runner: &WorkoutRunner, export: Option<&Path>) -> Result<()> {
    let history = runner.store().workout_history();

    if let Some(csv_path) = export {
        let rows = export_history_csv(history, csv_path)?;
        println!("✓ Exported {} sets to {}", rows, csv_path.display());
        return Ok(());
    }

    if history.is_empty() {
        println!("No finished workouts.");
        return Ok(());
    }

    for summary in summarize_history(history) {
        let when = summary
            .completed_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{}  {}  {}  {}/{} sets ({}%)  volume {}",
            summary.id,
            when,
            summary.name,
            summary.completed_sets,
            summary.total_sets,
            summary.completion_percentage,
            summary.volume
        );
    }
    Ok(())
}

fn cmd_prefs(data_dir: &Path, view: Option<ViewKind>, theme: Option<Theme>) -> Result<()> {
    let mut store = FileStore::new(data_dir);
    let mut prefs = AppPreferences::load(&store);

    if view.is_some() || theme.is_some() {
        prefs.view = view.unwrap_or(prefs.view);
        prefs.theme = theme.unwrap_or(prefs.theme);
        prefs.save(&mut store)?;
    }

    println!("view: {}", prefs.view);
    println!("theme: {}", prefs.theme);
    Ok(())
}
