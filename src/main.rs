//! mnemo - spaced repetition scheduling CLI.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use mnemo::cli::close::CloseCommand;
use mnemo::cli::quiz_cmd::{QuizCommand, QuizOptions};
use mnemo::cli::review_cmd::{ReviewCommand, ReviewOptions};
use mnemo::cli::start::{StartCommand, StartOptions};
use mnemo::cli::stats::StatsCommand;
use mnemo::config::Config;
use mnemo::service::StudyService;
use mnemo::storage::FileStudyStore;

/// mnemo - spaced repetition scheduling CLI
#[derive(Parser)]
#[command(name = "mnemo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a study session
    Start {
        /// User the session belongs to
        user: String,
        /// Restrict the session to one deck
        #[arg(long)]
        deck: Option<String>,
        /// Practice mode: no scheduling or progress changes
        #[arg(long)]
        practice: bool,
        /// Show answers first
        #[arg(long)]
        reversed: bool,
        /// Explicit session id (generated when omitted)
        #[arg(long)]
        session_id: Option<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// Submit a review rating for a card
    Review {
        /// Card to review
        card_id: String,
        /// Session the review belongs to
        #[arg(long)]
        session_id: String,
        /// Recall rating: 1 (again) to 4 (easy)
        rating: i64,
        /// Seconds spent on the card
        #[arg(long, default_value = "0")]
        time_taken: i64,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// Close a study session
    Close {
        /// Session to close
        session_id: String,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// Build a multiple-choice question for a card
    Quiz {
        /// Card to quiz
        card_id: String,
        /// Number of wrong answers (configured default when omitted)
        #[arg(long)]
        distractors: Option<usize>,
        /// Quiz back-to-front
        #[arg(long)]
        reversed: bool,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// Show a user's progress and companion
    Stats {
        /// User to report on
        user: String,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("mnemo error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let now = chrono::Utc::now();

    match cli.command {
        Commands::Start {
            user,
            deck,
            practice,
            reversed,
            session_id,
            json,
        } => {
            let store = FileStudyStore::new()?;
            let options = StartOptions {
                deck_id: deck,
                practice,
                reversed,
                session_id,
            };
            let output = StartCommand::new(store).run(&user, &options, now);
            print_output(json, &output, output.format_text())?;
            Ok(success_to_exit_code(output.success))
        }
        Commands::Review {
            card_id,
            session_id,
            rating,
            time_taken,
            json,
        } => {
            let config = Config::load();
            let store = FileStudyStore::new()?;
            let cmd = ReviewCommand::new(store, StudyService::from_config(&config));
            let options = ReviewOptions {
                time_taken_secs: time_taken,
            };
            let output = cmd.run(&card_id, &session_id, rating, &options, now);
            print_output(json, &output, output.format_text())?;
            Ok(success_to_exit_code(output.success))
        }
        Commands::Close { session_id, json } => {
            let config = Config::load();
            let store = FileStudyStore::new()?;
            let cmd = CloseCommand::new(store, StudyService::from_config(&config));
            let output = cmd.run(&session_id, now);
            print_output(json, &output, output.format_text())?;
            Ok(success_to_exit_code(output.success))
        }
        Commands::Quiz {
            card_id,
            distractors,
            reversed,
            json,
        } => {
            let config = Config::load();
            let store = FileStudyStore::new()?;
            let cmd = QuizCommand::new(store, config.quiz.distractor_count);
            let options = QuizOptions {
                distractor_count: distractors,
                reversed,
            };
            let mut rng = StdRng::from_os_rng();
            let output = cmd.run(&card_id, &options, &mut rng);
            print_output(json, &output, output.format_text())?;
            Ok(success_to_exit_code(output.success))
        }
        Commands::Stats { user, json } => {
            let store = FileStudyStore::new()?;
            let output = StatsCommand::new(store).run(&user);
            print_output(json, &output, output.format_text())?;
            Ok(success_to_exit_code(output.success))
        }
    }
}

/// Print a command output as JSON or text.
fn print_output<T: serde::Serialize>(
    json: bool,
    output: &T,
    text: String,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(output)?);
    } else {
        println!("{}", text);
    }
    Ok(())
}

/// Convert a success boolean to an exit code.
fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
