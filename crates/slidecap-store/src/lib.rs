//! Caption state store for the presentation host.
//!
//! This crate owns the subtitle/closed-caption display state shared across
//! the host UI: a fixed set of named cells with get/set semantics, two of
//! which are transparently mirrored to durable client-side key-value
//! storage so they survive a restart.

mod state;
mod storage;

pub use crate::state::{CC_DISPLAY_KEY, CaptionState, SharedCaptionState, TTS_LANG_KEY};
pub use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
