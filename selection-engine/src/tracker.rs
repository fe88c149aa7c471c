use threadpick_core::{
    Candidate, ContentMode, CoreError, ProcessedStore, RedditPost, SeenTracker, SelectionConfig,
    ThreadSource, TimeWindow,
};
use tracing::{debug, info};

/// Story text shorter than this is not worth narrating.
pub const MIN_STORY_LENGTH: usize = 30;

/// Threads fetched per `top` window once the main listing is used up.
pub const TOP_ESCALATION_LIMIT: u32 = 50;

/// Order in which `top` windows are tried after the main listing.
pub const TOP_ESCALATION_WINDOWS: [TimeWindow; 6] = [
    TimeWindow::Day,
    TimeWindow::Hour,
    TimeWindow::Month,
    TimeWindow::Week,
    TimeWindow::Year,
    TimeWindow::All,
];

/// Finds the first usable thread that the processed store has not seen.
pub struct UndoneTracker<'a, St, Src> {
    store: &'a St,
    source: &'a Src,
    config: &'a SelectionConfig,
}

impl<'a, St, Src> UndoneTracker<'a, St, Src>
where
    St: ProcessedStore,
    Src: ThreadSource,
{
    pub fn new(store: &'a St, source: &'a Src, config: &'a SelectionConfig) -> Self {
        Self {
            store,
            source,
            config,
        }
    }

    async fn first_in(&self, listing: &[RedditPost]) -> Result<Option<usize>, CoreError> {
        for (index, post) in listing.iter().enumerate() {
            if !is_eligible(post, self.config) {
                continue;
            }
            if self.store.is_processed(&post.id).await? {
                debug!("Thread {} was already processed", post.id);
                continue;
            }
            return Ok(Some(index));
        }
        Ok(None)
    }
}

impl<St, Src> SeenTracker for UndoneTracker<'_, St, Src>
where
    St: ProcessedStore,
    Src: ThreadSource,
{
    async fn first_unprocessed(
        &self,
        mut listing: Vec<RedditPost>,
        subreddit: &str,
        scores: Option<Vec<f32>>,
    ) -> Result<Option<Candidate>, CoreError> {
        if let Some(index) = self.first_in(&listing).await? {
            let similarity = scores.and_then(|s| s.get(index).copied());
            return Ok(Some(Candidate {
                post: listing.swap_remove(index),
                similarity,
            }));
        }

        for window in TOP_ESCALATION_WINDOWS {
            info!(
                "No usable thread in the listing, trying top threads for time filter '{}'",
                window
            );
            let mut top = self
                .source
                .fetch_top(subreddit, window, TOP_ESCALATION_LIMIT)
                .await?;
            if let Some(index) = self.first_in(&top).await? {
                return Ok(Some(Candidate {
                    post: top.swap_remove(index),
                    similarity: None,
                }));
            }
        }

        info!("All threads in r/{} have been processed", subreddit);
        Ok(None)
    }
}

/// Whether a thread fits the configured content mode and safety settings,
/// independent of whether it was processed before.
pub fn is_eligible(post: &RedditPost, config: &SelectionConfig) -> bool {
    if post.stickied || (post.over_18 && !config.allow_nsfw) {
        return false;
    }
    match config.mode {
        ContentMode::Comments => post.num_comments > config.min_comments,
        ContentMode::Story(_) => {
            let length = post.selftext.chars().count();
            post.is_self && (MIN_STORY_LENGTH..=config.story_max_length).contains(&length)
        }
    }
}
