//! Commands that keep markers in step with file changes.

use std::error::Error;

use waymark::{EditOutcome, LineEdit};

use crate::{
    cli::{EditArgs, ReanchorArgs},
    output::{OutputFormat, print_table},
    session::Session,
};

/// Run the `edit` command against every open workspace
pub fn apply(
    session: &mut Session,
    args: &EditArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let edit = LineEdit::new(args.start, args.end, args.inserted);
    let mut outcomes = Vec::new();
    for key in session.keys() {
        let outcome = session.registry_mut().apply_edit(&key, &args.file, edit)?;
        outcomes.push((key, outcome));
    }
    report(&outcomes, format)
}

/// Run the `reanchor` command against every open workspace
pub async fn reanchor(
    session: &mut Session,
    args: &ReanchorArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let contents = tokio::fs::read_to_string(&args.file).await?;
    let lines: Vec<&str> = contents.lines().collect();
    let mut outcomes = Vec::new();
    for key in session.keys() {
        let outcome = session.registry_mut().reanchor(&key, &args.file, &lines)?;
        outcomes.push((key, outcome));
    }
    report(&outcomes, format)
}

fn report(outcomes: &[(String, EditOutcome)], format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Human => {
            let mut rows = Vec::new();
            for (key, outcome) in outcomes {
                let labelled = [
                    ("shifted", &outcome.shifted),
                    ("removed", &outcome.removed),
                    ("refreshed", &outcome.refreshed),
                    ("unanchored", &outcome.unanchored),
                ];
                for (label, paths) in labelled {
                    for path in paths {
                        rows.push(vec![key.clone(), path.clone(), label.to_string()]);
                    }
                }
            }
            if rows.is_empty() {
                println!("No markers affected.");
            }
            print_table(&["WORKSPACE", "PATH", "RESULT"], &rows);
        }
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = outcomes
                .iter()
                .map(|(key, outcome)| {
                    serde_json::json!({
                        "workspace": key,
                        "shifted": outcome.shifted,
                        "removed": outcome.removed,
                        "refreshed": outcome.refreshed,
                        "unanchored": outcome.unanchored,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string(&entries)?);
        }
    }
    Ok(())
}
