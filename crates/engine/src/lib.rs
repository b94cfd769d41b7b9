//! Incremental background decoration engine.
//!
//! Derives background-highlight ranges for a text buffer (indentation bands,
//! cursor-tied emphasis, symbols, irregular spacing, trailing whitespace and
//! blank-line runs) and keeps them in sync with edits and cursor movement.
//!
//! The host drives an [`EngineContext`] through its entry points and supplies
//! three collaborators via [`HostIo`]: an [`EditorHost`] to read editor
//! snapshots, a [`RenderSink`] that draws buckets, and a [`Timer`] that arms
//! debounce timers and later hands tokens back to [`EngineContext::on_timer`].

pub mod cache;
pub mod config;
mod context;
pub mod decoration;
pub mod differ;
pub mod error;
pub mod host;
pub mod ids;
pub mod indent;
pub mod plan;
pub mod scheduler;
pub mod text;
pub mod timer;

#[cfg(test)]
mod test_support;

pub use cache::{DocumentCache, EditorState, TokenSet};
pub use config::{ActiveScope, ClipMode, Config, EmphasisMode, IndentSetting, OverLimitNotice, Options, OverviewLane};
pub use context::EngineContext;
pub use decoration::{BucketStyle, Category, DecorationDescriptor, DecorationEntry, EntrySpan};
pub use error::{ConfigError, PlanError};
pub use host::{BucketHandle, EditorHost, EditorView, HostIo, RenderSink};
pub use ids::{DocumentId, EditorId};
pub use indent::IndentModel;
pub use scheduler::TimerToken;
pub use timer::{DeadlineQueue, Timer};
