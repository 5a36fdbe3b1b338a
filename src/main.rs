use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use staffquiz::app::{GameController, StdinInput, TrainingController, render_game, render_training};
use staffquiz::audio::{AudioDriver, ToneCache, synthesize, write_wav};
use staffquiz::config::AppConfig;
use staffquiz::game::{GameSession, SessionOptions, TrainingSession};
use staffquiz::model::{Clef, ClefMode, Note, NoteName};
use staffquiz::stats::StatisticsStore;
use staffquiz::traits::{AudioSink, NullAudio, SystemTimeProvider};
use staffquiz::util::init_logging;

#[derive(Parser, Debug)]
#[command(name = "staffquiz", about = "Read the note on the staff, hear it, name it")]
struct Args {
    /// Path to the config JSON file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the statistics JSON file (overrides the config).
    #[arg(long, global = true)]
    stats: Option<PathBuf>,

    /// Also write logs to a daily file in this directory.
    #[arg(long, global = true, env = "STAFFQUIZ_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Debug-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Timed game (the default).
    Play {
        #[arg(long, value_enum)]
        clef: Option<ClefArg>,
        /// Start with sound off.
        #[arg(long)]
        mute: bool,
    },
    /// Free practice without score or timer.
    Train {
        #[arg(long, value_enum, default_value = "treble")]
        clef: ClefArg,
    },
    /// Print saved statistics.
    Stats,
    /// Render a note's tone to a WAV file.
    Tone {
        /// Note label (Do, Ré/Re, Mi, Fa, Sol, La, Si).
        note: String,
        #[arg(long, value_enum, default_value = "treble")]
        clef: ClefArg,
        /// Length in seconds.
        #[arg(long)]
        duration: Option<f64>,
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ClefArg {
    Treble,
    Bass,
    Mixed,
}

impl ClefArg {
    fn mode(self) -> ClefMode {
        match self {
            ClefArg::Treble => ClefMode::Treble,
            ClefArg::Bass => ClefMode::Bass,
            ClefArg::Mixed => ClefMode::Mixed,
        }
    }

    fn clef(self) -> Clef {
        match self {
            ClefArg::Bass => Clef::Bass,
            ClefArg::Treble | ClefArg::Mixed => Clef::Treble,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_dir.as_deref(), args.verbose)?;

    let config_path = args.config.clone().unwrap_or_else(AppConfig::default_path);
    let mut config = AppConfig::load_from(&config_path)?;
    if let Some(stats) = &args.stats {
        config.stats_path = Some(stats.clone());
    }

    match args.command.unwrap_or(Command::Play {
        clef: None,
        mute: false,
    }) {
        Command::Play { clef, mute } => {
            if let Some(clef) = clef {
                config.clef_mode = clef.mode();
            }
            if mute {
                config.sound_enabled = false;
            }
            play(&config)
        }
        Command::Train { clef } => train(&config, clef.clef()),
        Command::Stats => print_stats(&config.stats_store()),
        Command::Tone {
            note,
            clef,
            duration,
            out,
        } => render_tone(&note, clef.clef(), duration.unwrap_or(config.tone_duration_secs), out),
    }
}

/// kira output, or a silent sink when no device can be opened.
fn open_audio() -> Box<dyn AudioSink> {
    match AudioDriver::new() {
        Ok(driver) => Box::new(driver),
        Err(e) => {
            warn!("Audio unavailable, continuing without sound: {e:#}");
            Box::new(NullAudio)
        }
    }
}

fn flush_stdout() {
    if let Err(e) = io::stdout().flush() {
        warn!("Failed to flush output: {e}");
    }
}

fn play(config: &AppConfig) -> Result<()> {
    let tones = ToneCache::with_duration(config.tone_duration_secs);
    info!("{} tones rendered", tones.len());

    let session = GameSession::new(
        &tones,
        open_audio(),
        SystemTimeProvider::new(),
        config.stats_store(),
        SessionOptions {
            clef_mode: config.clef_mode,
            sound_enabled: config.sound_enabled,
        },
    );
    let mut controller = GameController::new(session);

    let stdin = io::stdin();
    let mut input = StdinInput::new(stdin.lock(), io::stdout());
    controller.run(&mut input, |snapshot| {
        print!("{}", render_game(snapshot));
        flush_stdout();
    });

    let stats = controller.finish();
    println!(
        "\nGame over. High score {}, {} sessions played.",
        stats.high_score, stats.sessions_played
    );
    Ok(())
}

fn train(config: &AppConfig, clef: Clef) -> Result<()> {
    let tones = ToneCache::with_duration(config.tone_duration_secs);
    let mut controller = TrainingController::new(TrainingSession::new(&tones, open_audio(), clef));

    let stdin = io::stdin();
    let mut input = StdinInput::new(stdin.lock(), io::stdout());
    controller.run(&mut input, |clef, note, sound| {
        print!("{}", render_training(clef, note, sound));
        flush_stdout();
    });
    Ok(())
}

fn print_stats(store: &StatisticsStore) -> Result<()> {
    let stats = store
        .try_load()
        .with_context(|| format!("Failed to read statistics: {}", store.path().display()))?
        .unwrap_or_default();

    println!("Statistics ({})", store.path().display());
    println!("  High score:      {}", stats.high_score);
    println!("  Sessions played: {}", stats.sessions_played);
    println!("  Notes answered:  {}", stats.total_notes_answered);
    println!("  Correct answers: {}", stats.correct_answers);
    if let Some(accuracy) = stats.accuracy() {
        println!("  Accuracy:        {:.0}%", accuracy * 100.0);
    }
    println!();
    for &name in NoteName::all() {
        let note = stats.note(name);
        match note.success_rate() {
            Some(rate) => println!(
                "  {:<4} {:>4} / {:<4} {:>5.0}%",
                name.label(),
                note.successes,
                note.rounds(),
                rate * 100.0
            ),
            None => println!("  {:<4}    -", name.label()),
        }
    }
    if let Some((name, rate)) = stats.weakest_note() {
        println!("\nWeakest note: {name} ({:.0}%)", rate * 100.0);
    }
    Ok(())
}

fn render_tone(label: &str, clef: Clef, duration_secs: f64, out: PathBuf) -> Result<()> {
    let Some(name) = NoteName::from_label(label) else {
        bail!("Unknown note: {label}");
    };
    let note = Note::new(name, clef);
    let tone = synthesize(note.frequency_hz(), duration_secs);
    write_wav(&out, &tone)?;
    info!(
        path = %out.display(),
        "{} on {} clef, {:.2} Hz, {} frames",
        name,
        clef.label(),
        note.frequency_hz(),
        tone.len()
    );
    Ok(())
}
