use serde::{Deserialize, Serialize};
use std::fmt;

pub const REDDIT_WEB_BASE: &str = "https://reddit.com";

/// A Reddit submission as seen by the selection pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct RedditPost {
    pub id: String,
    pub title: String,
    pub permalink: String,
    pub selftext: String,
    pub score: i64,
    /// Fraction of upvotes, 0.0 to 1.0.
    pub upvote_ratio: f64,
    pub num_comments: u64,
    pub over_18: bool,
    pub stickied: bool,
    pub is_self: bool,
}

impl RedditPost {
    pub fn thread_url(&self) -> String {
        format!("{}{}", REDDIT_WEB_BASE, self.permalink)
    }

    pub fn upvote_percentage(&self) -> f64 {
        self.upvote_ratio * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalState {
    Normal,
    Removed,
    Deleted,
}

impl RemovalState {
    pub const REMOVED_MARKER: &'static str = "[removed]";
    pub const DELETED_MARKER: &'static str = "[deleted]";

    pub fn from_body(body: &str) -> Self {
        match body {
            Self::REMOVED_MARKER => RemovalState::Removed,
            Self::DELETED_MARKER => RemovalState::Deleted,
            _ => RemovalState::Normal,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RedditComment {
    pub id: String,
    pub body: String,
    pub permalink: String,
    pub score: i64,
    /// `None` when the author account was deleted.
    pub author: Option<String>,
    pub stickied: bool,
}

impl RedditComment {
    pub fn removal_state(&self) -> RemovalState {
        RemovalState::from_body(&self.body)
    }
}

/// One entry of a thread's top-level reply listing.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentNode {
    Comment(RedditComment),
    /// "Load more comments" placeholder.
    More { count: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Hot,
    New,
    Top,
    Rising,
    Controversial,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Hot => "hot",
            SortOrder::New => "new",
            SortOrder::Top => "top",
            SortOrder::Rising => "rising",
            SortOrder::Controversial => "controversial",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time windows used for `top` listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeWindow {
    Hour,
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Hour => "hour",
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
            TimeWindow::All => "all",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A listing reordered by relevance, with one score per post.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedListing {
    posts: Vec<RedditPost>,
    scores: Vec<f32>,
}

impl RankedListing {
    /// Returns `None` when the two sequences are not index-aligned.
    pub fn new(posts: Vec<RedditPost>, scores: Vec<f32>) -> Option<Self> {
        if posts.len() != scores.len() {
            return None;
        }
        Some(Self { posts, scores })
    }

    pub fn posts(&self) -> &[RedditPost] {
        &self.posts
    }

    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn into_parts(self) -> (Vec<RedditPost>, Vec<f32>) {
        (self.posts, self.scores)
    }
}

/// A thread picked from a listing, with its similarity score when the
/// listing was relevance-ranked.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub post: RedditPost,
    pub similarity: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadComment {
    pub comment_body: String,
    pub comment_url: String,
    pub comment_id: String,
}

impl From<&RedditComment> for PayloadComment {
    fn from(comment: &RedditComment) -> Self {
        Self {
            comment_body: comment.body.clone(),
            comment_url: comment.permalink.clone(),
            comment_id: comment.id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StoryText {
    Raw(String),
    Narration(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PayloadContent {
    Story { post: StoryText },
    Comments { comments: Vec<PayloadComment> },
}

/// The content handed to the downstream video pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadPayload {
    pub thread_url: String,
    pub thread_title: String,
    pub thread_id: String,
    pub is_nsfw: bool,
    #[serde(flatten)]
    pub content: PayloadContent,
}

impl ThreadPayload {
    pub fn comments(&self) -> &[PayloadComment] {
        match &self.content {
            PayloadContent::Comments { comments } => comments,
            PayloadContent::Story { .. } => &[],
        }
    }

    pub fn story(&self) -> Option<&StoryText> {
        match &self.content {
            PayloadContent::Story { post } => Some(post),
            PayloadContent::Comments { .. } => None,
        }
    }
}
