//! `sessionnotes list`

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use sessionnotes_core::SessionNote;

use crate::session::{self, Session};

const NOTES_PREVIEW_CHARS: usize = 40;

/// Arguments for `sessionnotes list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub fn run(self) -> Result<()> {
        let client_config = session::load_config()?;
        let notes = session::block_on(async {
            let session = Session::connect(&client_config)?;
            let loaded = session.store.load().await;
            session.close().await;
            loaded.context("failed to load session notes")
        })??;

        if self.json {
            print_json(&notes)?;
        } else {
            print_table(notes);
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct NoteJson<'a> {
    id: &'a str,
    client_name: &'a str,
    session_date: String,
    notes: &'a str,
    duration_minutes: i32,
    created_at: String,
}

#[derive(Tabled)]
struct NoteRow {
    #[tabled(rename = "date")]
    date: String,
    #[tabled(rename = "client")]
    client: String,
    #[tabled(rename = "duration")]
    duration: String,
    #[tabled(rename = "notes")]
    notes: String,
    #[tabled(rename = "id")]
    id: String,
}

fn print_json(notes: &[SessionNote]) -> Result<()> {
    let payload: Vec<NoteJson<'_>> = notes
        .iter()
        .map(|n| NoteJson {
            id: n.id.as_str(),
            client_name: &n.client_name,
            session_date: n.session_date.to_string(),
            notes: &n.notes,
            duration_minutes: n.duration_minutes,
            created_at: n.created_at.to_rfc3339(),
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize notes JSON")?
    );
    Ok(())
}

fn print_table(notes: Vec<SessionNote>) {
    if notes.is_empty() {
        println!("No session notes yet. Add one with 'sessionnotes add'.");
        return;
    }

    println!("{} session notes", notes.len().to_string().bold());
    let rows: Vec<NoteRow> = notes
        .into_iter()
        .map(|n| NoteRow {
            date: n.session_date.format("%b %-d, %Y").to_string(),
            client: n.client_name,
            duration: format!("{} min", n.duration_minutes),
            notes: preview(&n.notes, NOTES_PREVIEW_CHARS),
            id: n.id.0,
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

/// First line of `text`, cut to `max` characters with an ellipsis.
fn preview(text: &str, max: usize) -> String {
    let first_line = text.lines().next().unwrap_or_default().trim();
    let multi_line = text.trim().lines().count() > 1;
    if first_line.chars().count() <= max && !multi_line {
        return first_line.to_string();
    }
    let cut: String = first_line.chars().take(max).collect();
    format!("{}…", cut.trim_end())
}
