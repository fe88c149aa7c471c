use crate::payload::build_payload;
use threadpick_core::{
    Candidate, CoreError, NarrationParser, ProcessedStore, RelevanceRanker, SeenTracker,
    SelectionConfig, SelectionError, SortOrder, TextSanitizer, ThreadPayload, ThreadSource,
};
use tracing::{info, warn};

/// Threads fetched for relevance ranking.
pub const RELEVANCE_LISTING_LIMIT: u32 = 50;
/// Threads fetched for plain sort-order selection.
pub const ORDERED_LISTING_LIMIT: u32 = 25;

/// How a selection attempt finds its thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy<'a> {
    /// A thread id given by the caller or configured on its own.
    Direct(&'a str),
    /// Hot threads reordered by similarity to these keywords.
    Relevance(&'a [String]),
    /// Threads in the configured sort order.
    Ordered(SortOrder),
}

/// Picks the strategy for one attempt. A queued id wins over the configured
/// one, and relevance ranking wins over plain ordering.
pub fn choose_strategy<'a>(queued_id: Option<&'a str>, config: &'a SelectionConfig) -> Strategy<'a> {
    if let Some(id) = queued_id.or_else(|| config.single_post_id()) {
        return Strategy::Direct(id);
    }
    match &config.relevance {
        Some(relevance) => Strategy::Relevance(&relevance.keywords),
        None => Strategy::Ordered(config.sort_order),
    }
}

pub struct SelectionEngine<'a, Src, Trk, St> {
    config: &'a SelectionConfig,
    subreddit: String,
    source: &'a Src,
    tracker: &'a Trk,
    store: &'a St,
    ranker: Option<&'a dyn RelevanceRanker>,
    sanitizer: &'a dyn TextSanitizer,
    narrator: &'a dyn NarrationParser,
}

impl<'a, Src, Trk, St> SelectionEngine<'a, Src, Trk, St>
where
    Src: ThreadSource,
    Trk: SeenTracker,
    St: ProcessedStore,
{
    pub fn new(
        config: &'a SelectionConfig,
        subreddit: impl Into<String>,
        source: &'a Src,
        tracker: &'a Trk,
        store: &'a St,
        sanitizer: &'a dyn TextSanitizer,
        narrator: &'a dyn NarrationParser,
    ) -> Self {
        Self {
            config,
            subreddit: subreddit.into(),
            source,
            tracker,
            store,
            ranker: None,
            sanitizer,
            narrator,
        }
    }

    pub fn with_ranker(mut self, ranker: &'a dyn RelevanceRanker) -> Self {
        self.ranker = Some(ranker);
        self
    }

    pub fn subreddit(&self) -> &str {
        &self.subreddit
    }

    /// Selects a thread and builds its payload.
    pub async fn run(&self, queued_id: Option<&str>) -> Result<ThreadPayload, CoreError> {
        let candidate = self.select(queued_id).await?;
        build_payload(
            &candidate.post,
            self.config,
            self.source,
            self.sanitizer,
            self.narrator,
        )
        .await
    }

    /// Runs selection attempts until one yields a usable thread.
    ///
    /// "No candidate", "already processed" and "below minimum upvotes" all
    /// restart from strategy dispatch. A thread without replies in comment
    /// mode ends the run.
    pub async fn select(&self, queued_id: Option<&str>) -> Result<Candidate, CoreError> {
        let min_upvotes = self.config.min_upvotes;

        for attempt in 1..=self.config.max_attempts {
            let strategy = choose_strategy(queued_id, self.config);
            let direct = matches!(strategy, Strategy::Direct(_));

            let Some(candidate) = self.find_candidate(strategy).await? else {
                warn!("No unprocessed thread found (attempt {}), restarting selection", attempt);
                continue;
            };
            let post = &candidate.post;

            if post.num_comments == 0 && !self.config.mode.is_story() {
                info!("No comments found. Skipping.");
                return Err(SelectionError::NoComments {
                    thread_id: post.id.clone(),
                }
                .into());
            }

            if self.store.is_processed(&post.id).await? {
                if !direct {
                    warn!("Thread {} was already processed, restarting selection", post.id);
                    continue;
                }
                warn!("Thread {} was already processed, using it as requested", post.id);
            }

            announce(&candidate);

            if post.score < min_upvotes {
                if direct {
                    return Err(SelectionError::DirectThreadRejected {
                        thread_id: post.id.clone(),
                        score: post.score,
                        minimum: min_upvotes,
                    }
                    .into());
                }
                warn!(
                    "Thread has {} upvotes which is below the minimum threshold of {}. Skipping.",
                    post.score, min_upvotes
                );
                continue;
            }

            return Ok(candidate);
        }

        Err(SelectionError::AttemptsExhausted {
            attempts: self.config.max_attempts,
        }
        .into())
    }

    async fn find_candidate(&self, strategy: Strategy<'_>) -> Result<Option<Candidate>, CoreError> {
        match strategy {
            Strategy::Direct(id) => {
                let post = self.source.fetch_by_id(id).await?;
                Ok(Some(Candidate {
                    post,
                    similarity: None,
                }))
            }
            Strategy::Relevance(keywords) => {
                let ranker = self.ranker.ok_or_else(|| CoreError::Internal {
                    message: "relevance ranking is enabled but no ranker was provided".to_string(),
                })?;
                info!(
                    "Sorting threads by similarity to the given keywords: {}",
                    keywords.join(", ")
                );
                let listing = self
                    .source
                    .fetch_listing(&self.subreddit, SortOrder::Hot, RELEVANCE_LISTING_LIMIT)
                    .await?;
                let (posts, scores) = ranker.rank(listing, keywords)?.into_parts();
                self.tracker
                    .first_unprocessed(posts, &self.subreddit, Some(scores))
                    .await
            }
            Strategy::Ordered(sort) => {
                let listing = self
                    .source
                    .fetch_listing(&self.subreddit, sort, ORDERED_LISTING_LIMIT)
                    .await?;
                self.tracker
                    .first_unprocessed(listing, &self.subreddit, None)
                    .await
            }
        }
    }
}

fn announce(candidate: &Candidate) {
    let post = &candidate.post;
    info!("Video will be: {}", post.title);
    info!("Thread url is: {}", post.thread_url());
    info!("Thread has {} upvotes", post.score);
    info!("Thread has a upvote ratio of {}%", post.upvote_percentage());
    info!("Thread has {} comments", post.num_comments);
    if let Some(similarity) = candidate.similarity.filter(|s| *s != 0.0) {
        info!(
            "Thread has a similarity score up to {}%",
            (similarity * 100.0).round()
        );
    }
}
