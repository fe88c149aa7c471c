//! Thread selection and payload building.
//!
//! [`SelectionEngine`] picks one unprocessed, popular enough thread through a
//! direct id, relevance ranking or the configured sort order, then
//! [`build_payload`] turns it into the story or comment payload handed to the
//! video pipeline.

pub mod engine;
pub mod filter;
pub mod input;
pub mod payload;
pub mod subreddit;
pub mod text;
pub mod tracker;

mod tests;

pub use engine::{choose_strategy, SelectionEngine, Strategy};
pub use filter::ReplyFilter;
pub use input::{two_factor_code, StdinPrompt};
pub use payload::build_payload;
pub use subreddit::resolve_subreddit;
pub use text::{Sanitizer, SentenceSplitter};
pub use tracker::{is_eligible, UndoneTracker};
