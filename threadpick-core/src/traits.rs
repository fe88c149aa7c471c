//! Seams between the selection pipeline and its collaborators.

use crate::error::CoreError;
use crate::types::{
    Candidate, CommentNode, RankedListing, RedditPost, SortOrder, TimeWindow,
};

/// Where threads and their replies come from.
pub trait ThreadSource {
    async fn fetch_by_id(&self, id: &str) -> Result<RedditPost, CoreError>;

    async fn fetch_listing(
        &self,
        subreddit: &str,
        sort: SortOrder,
        limit: u32,
    ) -> Result<Vec<RedditPost>, CoreError>;

    async fn fetch_top(
        &self,
        subreddit: &str,
        window: TimeWindow,
        limit: u32,
    ) -> Result<Vec<RedditPost>, CoreError>;

    /// Top-level replies in the order the service ranks them.
    async fn fetch_replies(&self, thread_id: &str) -> Result<Vec<CommentNode>, CoreError>;
}

/// Reorders a listing by similarity to a set of keywords.
pub trait RelevanceRanker {
    fn rank(
        &self,
        listing: Vec<RedditPost>,
        keywords: &[String],
    ) -> Result<RankedListing, CoreError>;
}

/// Picks the first thread of a listing that has not been used yet.
pub trait SeenTracker {
    async fn first_unprocessed(
        &self,
        listing: Vec<RedditPost>,
        subreddit: &str,
        scores: Option<Vec<f32>>,
    ) -> Result<Option<Candidate>, CoreError>;
}

/// Read side of the "already processed" store.
pub trait ProcessedStore {
    async fn is_processed(&self, thread_id: &str) -> Result<bool, CoreError>;
}

pub trait TextSanitizer {
    /// May return an empty string when nothing speakable is left.
    fn sanitize(&self, text: &str) -> String;
}

pub trait NarrationParser {
    fn parse(&self, text: &str) -> Vec<String>;
}

/// Interactive questions (two-factor code, subreddit name).
pub trait InputProvider {
    fn prompt(&self, message: &str) -> Result<String, CoreError>;
}

