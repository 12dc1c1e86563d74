mod edits;
mod reanchor;
