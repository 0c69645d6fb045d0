//! `sessionnotes add --client <name> [--date YYYY-MM-DD] --notes <text> [--duration <min>]`

use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;

use sessionnotes_core::{parse_session_date, SessionNoteDraft};
use sessionnotes_sync::SubmissionError;

use crate::session::{self, Session};

const DEFAULT_DURATION_MINUTES: i32 = 60;

/// Validate and store a new session note.
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Client the session was held with.
    #[arg(long)]
    pub client: String,

    /// Session date as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    pub date: Option<String>,

    /// Session notes, at most 500 characters.
    #[arg(long)]
    pub notes: String,

    /// Session length in minutes (1-300).
    #[arg(long, default_value_t = DEFAULT_DURATION_MINUTES, allow_negative_numbers = true)]
    pub duration: i32,
}

impl AddArgs {
    pub fn run(self) -> Result<()> {
        let session_date = match self.date.as_deref() {
            Some(raw) => parse_session_date(raw)?,
            None => chrono::Local::now().date_naive(),
        };
        let draft = SessionNoteDraft {
            client_name: self.client,
            session_date,
            notes: self.notes,
            duration_minutes: self.duration,
        };

        let client_config = session::load_config()?;
        let submitted = session::block_on(async {
            let session = Session::connect(&client_config)?;
            let submitted = session.pipeline.submit(draft).await;
            session.close().await;
            Ok::<_, anyhow::Error>(submitted)
        })??;

        match submitted {
            Ok(note) => {
                println!("{} Session note added successfully!", "✓".green().bold());
                println!(
                    "  {} | {} | {} min | id {}",
                    note.session_date, note.client_name, note.duration_minutes, note.id
                );
                Ok(())
            }
            Err(err) => Err(describe_failure(err)),
        }
    }
}

/// Turn a failed submission into the message shown to the user.
fn describe_failure(err: SubmissionError) -> anyhow::Error {
    match err {
        SubmissionError::Invalid(invalid) => {
            for violation in &invalid.violations {
                eprintln!("  {} {}", "✗".red().bold(), violation);
            }
            anyhow!(
                "session note is invalid ({} field(s) rejected)",
                invalid.violations.len()
            )
        }
        SubmissionError::Rejected { message } => {
            anyhow!("the validation service rejected this note: {message}")
        }
        err @ SubmissionError::ValidatorUnavailable { .. } => anyhow::Error::new(err),
        err => anyhow::Error::new(err).context("session note was not saved"),
    }
}
