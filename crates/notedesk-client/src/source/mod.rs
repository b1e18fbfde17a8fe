//! The note source abstraction consumed by the console's cache layer.

mod traits;

pub use traits::{NoteSource, SourceFactory};
