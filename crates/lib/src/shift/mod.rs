//! Keeping marker lines in step with document edits.
//!
//! An editor reports each change to a document as a [`LineEdit`]: the line span
//! that was replaced and how many line breaks the replacement text contains.
//! [`Namespace::apply_edit`] translates that into marker updates for the file:
//!
//! * A single-line edit (`start_line == end_line`) pushes every marker strictly
//!   below `start_line` down by `inserted_newlines`. A marker on `start_line`
//!   itself stays put.
//! * A multi-line edit deletes markers strictly inside the replaced span (their
//!   line may no longer exist) and shifts markers from `end_line` on by
//!   `inserted_newlines - (end_line - start_line)`.
//!
//! Afterwards any markers of the file that now share a line are reduced to the
//! first one in index order. A later group-marker that still has children loses
//! only its coordinates and becomes a plain group, so its children survive.
//!
//! [`Namespace::reanchor`] handles the other direction: the file changed while
//! nobody was watching, and markers are matched back to their saved line text.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Result,
    index::Presenter,
    namespace::Namespace,
    node::{NodeId, NodeKind, path},
};

/// One document change, expressed in lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineEdit {
    /// First line touched by the replaced range.
    pub start_line: u32,
    /// Last line touched by the replaced range.
    pub end_line: u32,
    /// Number of line breaks in the inserted text.
    pub inserted_newlines: u32,
}

/// What an edit does to a marker on a given line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineFate {
    Keep,
    Shift(i64),
    Remove,
}

impl LineEdit {
    pub fn new(start_line: u32, end_line: u32, inserted_newlines: u32) -> Self {
        Self {
            start_line,
            end_line,
            inserted_newlines,
        }
    }

    /// An edit confined to `line` that inserted `newlines` line breaks.
    pub fn insertion(line: u32, newlines: u32) -> Self {
        Self::new(line, line, newlines)
    }

    /// Orders the range so that `start_line <= end_line`.
    pub fn normalized(self) -> Self {
        if self.start_line <= self.end_line {
            self
        } else {
            Self::new(self.end_line, self.start_line, self.inserted_newlines)
        }
    }

    pub fn is_single_line(&self) -> bool {
        self.start_line == self.end_line
    }

    pub(crate) fn fate(&self, line: u32) -> LineFate {
        let edit = self.normalized();
        let inserted = i64::from(edit.inserted_newlines);
        if edit.is_single_line() {
            if line > edit.start_line && inserted != 0 {
                return LineFate::Shift(inserted);
            }
            return LineFate::Keep;
        }

        if line > edit.start_line && line < edit.end_line {
            return LineFate::Remove;
        }
        let delta = inserted - i64::from(edit.end_line - edit.start_line);
        if line >= edit.end_line && delta != 0 {
            LineFate::Shift(delta)
        } else {
            LineFate::Keep
        }
    }
}

/// Paths touched by an edit or re-anchoring pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOutcome {
    /// Markers whose line changed.
    pub shifted: Vec<String>,
    /// Nodes deleted, either inside a replaced span or as line collisions.
    pub removed: Vec<String>,
    /// Markers that kept their line but took the document's text as their snapshot.
    pub refreshed: Vec<String>,
    /// Group-markers turned into plain groups because their line was taken.
    pub unanchored: Vec<String>,
}

impl EditOutcome {
    pub fn is_empty(&self) -> bool {
        self.shifted.is_empty()
            && self.removed.is_empty()
            && self.refreshed.is_empty()
            && self.unanchored.is_empty()
    }

    fn merge(&mut self, other: EditOutcome) {
        self.shifted.extend(other.shifted);
        self.removed.extend(other.removed);
        self.refreshed.extend(other.refreshed);
        self.unanchored.extend(other.unanchored);
    }

    /// Drops repeated paths and paths that were deleted afterwards.
    fn settle(&mut self) {
        let removed = &self.removed;
        let gone = |p: &String| removed.iter().any(|r| path::is_within(p, r));
        let mut seen = HashSet::new();
        self.shifted.retain(|p| !gone(p) && seen.insert(p.clone()));
        seen.clear();
        self.refreshed.retain(|p| !gone(p) && seen.insert(p.clone()));
        seen.clear();
        self.unanchored.retain(|p| !gone(p) && seen.insert(p.clone()));
        // An unanchored group is no longer a marker of the file.
        let unanchored = &self.unanchored;
        self.shifted.retain(|p| !unanchored.contains(p));
        self.refreshed.retain(|p| !unanchored.contains(p));
    }
}

fn shift_line(line: u32, delta: i64) -> u32 {
    (i64::from(line) + delta).clamp(0, i64::from(u32::MAX)) as u32
}

/// Closest line to `origin` within `radius` whose text equals `text`.
///
/// Lines above the origin win ties.
fn nearest_match<S: AsRef<str>>(lines: &[S], text: &str, origin: u32, radius: u32) -> Option<u32> {
    let matches = |line: i64| {
        usize::try_from(line)
            .ok()
            .and_then(|idx| lines.get(idx))
            .is_some_and(|candidate| candidate.as_ref() == text)
    };
    let origin = i64::from(origin);
    (1..=i64::from(radius))
        .find_map(|distance| {
            [origin - distance, origin + distance]
                .into_iter()
                .find(|line| matches(*line))
        })
        .and_then(|line| u32::try_from(line).ok())
}

impl<R: Presenter> Namespace<R> {
    /// Applies one document edit to the markers of `file`.
    pub fn apply_edit(&mut self, file: &str, edit: LineEdit) -> Result<EditOutcome> {
        let mut outcome = EditOutcome::default();
        let mut doomed = Vec::new();

        for (key, id) in self.marker_entries(file) {
            let line = match self.node(id)?.anchor() {
                Some(anchor) => anchor.line,
                None => continue,
            };
            match edit.fate(line) {
                LineFate::Keep => {}
                LineFate::Remove => doomed.push(key),
                LineFate::Shift(delta) => {
                    if let Some(anchor) = self.node_mut(id)?.anchor_mut() {
                        anchor.line = shift_line(anchor.line, delta);
                    }
                    outcome.shifted.push(key);
                }
            }
        }

        self.remove_paths(doomed, &mut outcome)?;
        self.remove_collisions(file, &mut outcome)?;
        outcome.settle();
        debug!(
            file,
            ?edit,
            shifted = outcome.shifted.len(),
            removed = outcome.removed.len(),
            "Applied edit"
        );
        Ok(outcome)
    }

    /// Applies a batch of edits to `file` in order.
    ///
    /// Each edit sees the coordinates left by the previous one, and collisions
    /// are resolved after every edit.
    pub fn apply_edits(&mut self, file: &str, edits: &[LineEdit]) -> Result<EditOutcome> {
        let mut outcome = EditOutcome::default();
        for edit in edits {
            outcome.merge(self.apply_edit(file, *edit)?);
        }
        outcome.settle();
        Ok(outcome)
    }

    /// Re-anchors the markers of `file` against its current content.
    ///
    /// A marker whose saved line text no longer matches its line moves to the
    /// nearest line within the configured radius holding that text. Markers
    /// without a match keep their line, clamped to the document, and adopt the
    /// line's current text.
    pub fn reanchor<S: AsRef<str>>(&mut self, file: &str, lines: &[S]) -> Result<EditOutcome> {
        let radius = self.config.reanchor_radius;
        let last_line = u32::try_from(lines.len().saturating_sub(1)).unwrap_or(u32::MAX);
        let mut outcome = EditOutcome::default();

        for (key, id) in self.marker_entries(file) {
            let anchor = match self.node(id)?.anchor() {
                Some(anchor) => anchor.clone(),
                None => continue,
            };
            let current = usize::try_from(anchor.line)
                .ok()
                .and_then(|idx| lines.get(idx))
                .map(|text| text.as_ref());
            if current == Some(anchor.line_text.as_str()) {
                continue;
            }

            let found = if anchor.line_text.is_empty() {
                None
            } else {
                nearest_match(lines, &anchor.line_text, anchor.line, radius)
            };
            let Some(target) = self.node_mut(id)?.anchor_mut() else {
                continue;
            };
            match found {
                Some(line) => {
                    target.line = line;
                    outcome.shifted.push(key);
                }
                None => {
                    target.line = target.line.min(last_line);
                    target.line_text = usize::try_from(target.line)
                        .ok()
                        .and_then(|idx| lines.get(idx))
                        .map(|text| text.as_ref().to_string())
                        .unwrap_or_default();
                    outcome.refreshed.push(key);
                }
            }
        }

        self.remove_collisions(file, &mut outcome)?;
        outcome.settle();
        debug!(
            file,
            shifted = outcome.shifted.len(),
            refreshed = outcome.refreshed.len(),
            removed = outcome.removed.len(),
            "Re-anchored markers"
        );
        Ok(outcome)
    }

    fn marker_entries(&self, file: &str) -> Vec<(String, NodeId)> {
        self.paths
            .markers_in(&self.tree, file)
            .map(|(key, id)| (key.to_string(), id))
            .collect()
    }

    fn remove_collisions(&mut self, file: &str, outcome: &mut EditOutcome) -> Result<()> {
        for key in self.paths.find_line_collisions(&self.tree, file) {
            let Some(id) = self.paths.get(&key) else {
                continue;
            };
            // Deleting a populated group would take markers that won their line with it.
            if self.node(id)?.children().is_empty() {
                self.delete(&key)?;
                outcome.removed.push(key);
            } else {
                self.transform(&key, NodeKind::Group)?;
                outcome.unanchored.push(key);
            }
        }
        Ok(())
    }

    fn remove_paths(&mut self, paths: Vec<String>, outcome: &mut EditOutcome) -> Result<()> {
        for key in paths {
            // An earlier removal may already have taken this path with its group.
            if self.paths.exists(&key) {
                self.delete(&key)?;
                outcome.removed.push(key);
            }
        }
        Ok(())
    }
}
