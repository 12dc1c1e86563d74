//! Constants used throughout the Waymark library.
//!
//! This module provides central definitions for the path syntax, the persisted
//! file name and configuration defaults.

/// Separator between the segments of a full path.
pub const SEPARATOR: char = '/';

/// Full path of every namespace root.
pub const ROOT_PATH: &str = "";

/// File name used for a namespace document inside its workspace folder.
pub const DOCUMENT_FILE: &str = ".waymark.json";

/// Default number of lines searched in each direction when re-anchoring a marker.
pub const DEFAULT_REANCHOR_RADIUS: u32 = 50;
