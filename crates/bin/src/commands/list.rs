//! The `list` command.

use std::error::Error;

use waymark::Namespace;

use crate::{
    cli::ListArgs,
    output::{OutputFormat, print_table},
    session::Session,
    view::TreeItems,
};

/// Run the `list` command.
///
/// Without a path every workspace is listed; with one, only that subtree of the
/// primary workspace.
pub fn run(session: &Session, args: &ListArgs, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    let keys = if args.path.is_empty() {
        session.keys()
    } else {
        vec![session.primary()]
    };

    let mut listings = Vec::with_capacity(keys.len());
    for key in keys {
        let namespace = session.namespace(&key)?;
        let paths: Vec<String> = namespace
            .list_subtree(&args.path)?
            .into_iter()
            .filter(|path| !path.is_empty())
            .collect();
        listings.push((key, namespace, paths));
    }

    match format {
        OutputFormat::Human => {
            for (key, namespace, paths) in &listings {
                println!("{key} (active: /{})", namespace.active_group());
                if paths.is_empty() {
                    println!("No bookmarks.");
                    continue;
                }
                let rows: Vec<Vec<String>> =
                    paths.iter().map(|path| row(namespace, path)).collect();
                print_table(&["PATH", "KIND", "LOCATION", "ID"], &rows);
            }
        }
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = listings
                .iter()
                .map(|(key, namespace, paths)| {
                    serde_json::json!({
                        "workspace": key,
                        "active": namespace.active_group(),
                        "nodes": paths.iter().map(|path| entry(namespace, path)).collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string(&entries)?);
        }
    }
    Ok(())
}

fn row(namespace: &Namespace<TreeItems>, path: &str) -> Vec<String> {
    let Some(node) = namespace.query(path) else {
        return vec![path.to_string()];
    };
    let location = node
        .anchor()
        .map(|anchor| format!("{}:{}", anchor.file_path, anchor.line))
        .unwrap_or_default();
    let id = namespace
        .payload(path)
        .map(|item| item.short_id())
        .unwrap_or_default();
    vec![path.to_string(), node.kind().to_string(), location, id]
}

fn entry(namespace: &Namespace<TreeItems>, path: &str) -> serde_json::Value {
    let Some(node) = namespace.query(path) else {
        return serde_json::Value::Null;
    };
    serde_json::json!({
        "path": path,
        "kind": node.kind(),
        "color": node.color(),
        "anchor": node.anchor(),
        "id": namespace.payload(path).map(|item| item.id),
    })
}
