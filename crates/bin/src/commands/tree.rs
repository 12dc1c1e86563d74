//! Commands that change the shape of a bookmark tree.

use std::error::Error;

use waymark::{Anchor, Node, NodeKind, OrderingStrategy, node::path};

use crate::{
    cli::{ConvertArgs, GroupArgs, MarkArgs, MoveArgs, PathArgs, RenameArgs},
    output::{OutputFormat, print_change},
    session::Session,
};

/// Run the `group` command
pub fn group(
    session: &mut Session,
    args: &GroupArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let key = session.primary();
    let (parent, name) = path::split_parent(&args.path);
    let created = session
        .registry_mut()
        .insert(&key, Node::group(name, args.color.as_str()), parent)?;
    print_change(format, "created", &key, &created)
}

/// Run the `mark` command
pub fn mark(
    session: &mut Session,
    args: &MarkArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let key = session.primary();
    let (parent, name) = if args.path.contains(waymark::constants::SEPARATOR) {
        let (parent, name) = path::split_parent(&args.path);
        (parent.to_string(), name)
    } else {
        let active = session.namespace(&key)?.active_group().to_string();
        (active, args.path.as_str())
    };

    let anchor = &args.anchor;
    let node = Node::marker(
        name,
        Anchor::new(anchor.file.as_str(), anchor.line, anchor.col).with_text(anchor.text.as_str()),
    );
    let created = session.registry_mut().insert(&key, node, &parent)?;
    print_change(format, "created", &key, &created)
}

/// Run the `rm` command
pub fn remove(
    session: &mut Session,
    args: &PathArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let key = session.primary();
    session.registry_mut().delete(&key, &args.path)?;
    print_change(format, "deleted", &key, &args.path)
}

/// Run the `rename` command
pub fn rename(
    session: &mut Session,
    args: &RenameArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let key = session.primary();
    let renamed = session
        .registry_mut()
        .rename(&key, &args.path, &args.name)?;
    print_change(format, "renamed", &key, &renamed)
}

/// Run the `mv` command
pub async fn move_node(
    session: &mut Session,
    args: &MoveArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let from = session.primary();
    let to = match &args.to_workspace {
        Some(workspace) => session.open_workspace(workspace).await?,
        None => from.clone(),
    };
    let strategy = args
        .index
        .map_or(OrderingStrategy::Append, OrderingStrategy::AtIndex);

    let moved = session
        .registry_mut()
        .move_across(&from, &args.path, &to, &args.group, strategy)?;
    print_change(format, "moved", &to, &moved)
}

/// Run the `convert` command
pub fn convert(
    session: &mut Session,
    args: &ConvertArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let key = session.primary();
    let target = NodeKind::from(args.kind);
    let current = session
        .namespace(&key)?
        .query(&args.path)
        .map(|node| node.kind());

    let changed = match (current, target, &args.file, args.line) {
        (Some(NodeKind::Group), NodeKind::GroupMarker, Some(file), Some(line)) => {
            let anchor = Anchor::new(file.as_str(), line, args.col).with_text(args.text.as_str());
            session
                .registry_mut()
                .anchor_group(&key, &args.path, anchor)?;
            true
        }
        (Some(NodeKind::Group), NodeKind::GroupMarker, _, _) => {
            return Err("converting a group to a group-marker needs --file and --line".into());
        }
        _ => session
            .registry_mut()
            .transform(&key, &args.path, target)?,
    };

    if changed {
        print_change(format, "converted", &key, &args.path)
    } else {
        print_change(format, "unchanged", &key, &args.path)
    }
}

/// Run the `activate` command
pub fn activate(
    session: &mut Session,
    args: &PathArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let key = session.primary();
    let changed = session.registry_mut().activate(&key, &args.path)?;
    let active = session.namespace(&key)?.active_group().to_string();
    if !changed && active != args.path {
        tracing::warn!("'{}' is not a group; active group unchanged", args.path);
    }
    print_change(format, "active", &key, &active)
}
