//! CLI argument definitions for the Waymark binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use waymark::{NodeKind, SortPolicy};

/// Ordering of group children
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Sort {
    /// Groups first, then markers, each by name
    GroupFirst,
    /// By name only
    Plain,
    /// Keep insertion and move order
    Manual,
}

impl From<Sort> for SortPolicy {
    fn from(sort: Sort) -> Self {
        match sort {
            Sort::GroupFirst => SortPolicy::GroupFirst,
            Sort::Plain => SortPolicy::Plain,
            Sort::Manual => SortPolicy::Manual,
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Human,
    Json,
}

/// Node kind accepted by `convert`
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Kind {
    Group,
    Marker,
    GroupMarker,
}

impl From<Kind> for NodeKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Group => NodeKind::Group,
            Kind::Marker => NodeKind::Marker,
            Kind::GroupMarker => NodeKind::GroupMarker,
        }
    }
}

/// Hierarchical code bookmarks that keep their place
#[derive(Parser, Debug)]
#[command(name = "waymark")]
#[command(about = "Waymark: hierarchical code bookmarks that keep their place")]
#[command(version)]
pub struct Cli {
    /// Workspace folders, each with its own bookmark tree. The first one is
    /// the target of commands that take a path.
    #[arg(
        short = 'w',
        long = "workspace",
        env = "WAYMARK_WORKSPACES",
        value_delimiter = ',',
        default_value = ".",
        global = true
    )]
    pub workspaces: Vec<PathBuf>,

    /// Ordering of group children
    #[arg(long, value_enum, default_value = "group-first", env = "WAYMARK_SORT", global = true)]
    pub sort: Sort,

    /// Output format
    #[arg(long, value_enum, default_value = "human", global = true)]
    pub format: Format,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List bookmarks of every workspace
    List(ListArgs),
    /// Create a group
    Group(GroupArgs),
    /// Create a marker
    Mark(MarkArgs),
    /// Delete a node and everything beneath it
    Rm(PathArgs),
    /// Rename a node
    Rename(RenameArgs),
    /// Move a node to another group, possibly in another workspace
    Mv(MoveArgs),
    /// Change the kind of a node
    Convert(ConvertArgs),
    /// Make a group the default target of new markers
    Activate(PathArgs),
    /// Shift markers after a change to a file
    Edit(EditArgs),
    /// Re-anchor the markers of a file against its current content
    Reanchor(ReanchorArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Subtree to list (defaults to the whole tree)
    #[arg(default_value = "")]
    pub path: String,
}

#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Full path of the node
    pub path: String,
}

/// Where a marker points.
#[derive(clap::Args, Debug)]
pub struct AnchorArgs {
    /// File the marker points into
    #[arg(long)]
    pub file: String,

    /// Line number
    #[arg(long)]
    pub line: u32,

    /// Column number
    #[arg(long, default_value_t = 0)]
    pub col: u32,

    /// Text of the line, used to re-anchor after external changes
    #[arg(long, default_value = "")]
    pub text: String,
}

#[derive(clap::Args, Debug)]
pub struct GroupArgs {
    /// Full path of the new group
    pub path: String,

    /// Display color
    #[arg(long, default_value = "")]
    pub color: String,
}

#[derive(clap::Args, Debug)]
pub struct MarkArgs {
    /// Full path of the new marker; a bare name goes into the active group
    pub path: String,

    #[command(flatten)]
    pub anchor: AnchorArgs,
}

#[derive(clap::Args, Debug)]
pub struct RenameArgs {
    /// Full path of the node
    pub path: String,

    /// New name
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct MoveArgs {
    /// Full path of the node to move
    pub path: String,

    /// Destination group ("" for the root)
    pub group: String,

    /// Position among the destination's children (manual ordering only)
    #[arg(long)]
    pub index: Option<usize>,

    /// Destination workspace, if different from the first one
    #[arg(long)]
    pub to_workspace: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// Full path of the node
    pub path: String,

    /// Target kind
    #[arg(value_enum)]
    pub kind: Kind,

    /// File to anchor a group to (group to group-marker only)
    #[arg(long, requires = "line")]
    pub file: Option<String>,

    /// Line to anchor a group to
    #[arg(long, requires = "file")]
    pub line: Option<u32>,

    #[arg(long, default_value_t = 0)]
    pub col: u32,

    #[arg(long, default_value = "")]
    pub text: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// File that changed
    #[arg(long)]
    pub file: String,

    /// First line of the replaced range
    #[arg(long)]
    pub start: u32,

    /// Last line of the replaced range
    #[arg(long)]
    pub end: u32,

    /// Line breaks in the inserted text
    #[arg(long, default_value_t = 0)]
    pub inserted: u32,
}

#[derive(clap::Args, Debug)]
pub struct ReanchorArgs {
    /// File to read; markers are matched by this exact path
    #[arg(long)]
    pub file: String,
}
