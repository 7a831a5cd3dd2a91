//! Storage layer - append-only persistence of approved drafts

mod archive;

pub use archive::{DraftArchive, DraftRecord};
