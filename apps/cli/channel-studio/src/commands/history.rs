use crate::cli::HistoryAction;
use crate::error::CliError;
use crate::state::AppState;

use models::HistoryItem;

use std::io::{BufRead, Write};

use log::info;

pub async fn run(state: &AppState, action: &HistoryAction) -> Result<(), CliError> {
    match action {
        HistoryAction::List => {
            let items = state.studio().get_history().await;
            if items.is_empty() {
                println!("No generations yet");
            }
            for item in &items {
                println!("{}", format_item(item));
            }
            Ok(())
        }
        HistoryAction::Clear { yes } => {
            if !*yes && !confirm_clear()? {
                println!("History kept");
                return Ok(());
            }
            state.studio().clear_history().await?;
            info!("History cleared by user");
            println!("History cleared");
            Ok(())
        }
    }
}

/// `<created>  <kind>  <prompt>  <file>` on one line.
pub fn format_item(item: &HistoryItem) -> String {
    format!(
        "{}  {:<11}  {}  {}",
        item.created_at().format("%Y-%m-%d %H:%M"),
        item.kind(),
        item.prompt(),
        item.artifact_ref()
    )
}

/// Only an explicit yes counts.
pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn confirm_clear() -> Result<bool, CliError> {
    print!("Delete all history entries? [y/N] ");
    std::io::stdout()
        .flush()
        .map_err(|e| CliError::app(format!("Failed to write prompt: {e}")))?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| CliError::app(format!("Failed to read answer: {e}")))?;

    Ok(is_confirmation(&answer))
}
