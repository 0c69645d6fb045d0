//! `sessionnotes delete <id> [--yes]`

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use sessionnotes_core::{NoteId, SessionNote};
use sessionnotes_sync::DeleteOutcome;

use crate::session::{self, Session};

/// Delete a session note after confirmation.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Id of the note to delete (see `sessionnotes list`).
    pub id: String,

    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl DeleteArgs {
    pub fn run(self) -> Result<()> {
        let client_config = session::load_config()?;
        let id = NoteId::from(self.id);
        let assume_yes = self.yes;

        let outcome = session::block_on(async {
            let session = Session::connect(&client_config)?;
            let outcome = delete_with_confirmation(&session, &id, assume_yes).await;
            session.close().await;
            outcome
        })??;

        match outcome {
            Some(DeleteOutcome::Deleted(id)) => {
                println!("{} Deleted session note {id}", "✓".green().bold());
            }
            Some(DeleteOutcome::NothingSelected | DeleteOutcome::AlreadyInFlight) => {
                bail!("nothing was deleted");
            }
            None => println!("Cancelled."),
        }
        Ok(())
    }
}

async fn delete_with_confirmation(
    session: &Session,
    id: &NoteId,
    assume_yes: bool,
) -> Result<Option<DeleteOutcome>> {
    session
        .store
        .load()
        .await
        .context("failed to load session notes")?;
    let Some(target) = session.deletion.request_delete(id).await else {
        bail!("no session note with id '{id}'");
    };

    if !assume_yes && !prompt_confirmation(&target)? {
        session.deletion.cancel().await;
        return Ok(None);
    }

    let outcome = session
        .deletion
        .confirm_delete()
        .await
        .with_context(|| format!("failed to delete session note '{id}'"))?;
    Ok(Some(outcome))
}

fn prompt_confirmation(target: &SessionNote) -> Result<bool> {
    print!(
        "Delete the session note for {} on {}? This cannot be undone. [y/N] ",
        target.client_name.bold(),
        target.session_date
    );
    io::stdout().flush().context("failed to write prompt")?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
