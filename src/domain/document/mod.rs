//! Documentation passages used to ground answers

mod entity;

pub use entity::{documents_from_value, Document, ScoredDocument};
