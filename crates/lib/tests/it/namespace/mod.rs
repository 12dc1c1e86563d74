mod structure;
mod transform;
