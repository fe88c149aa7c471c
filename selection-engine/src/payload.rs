use crate::filter::ReplyFilter;
use threadpick_core::{
    ContentMode, CoreError, NarrationMode, NarrationParser, PayloadContent, RedditPost,
    SelectionConfig, StoryText, TextSanitizer, ThreadPayload, ThreadSource,
};
use tracing::{debug, info};

/// Builds the payload for a thread that already passed selection.
///
/// Story mode uses the body text, either as posted or split into narration
/// sentences. Comment mode fetches the top-level replies and keeps the ones
/// the [`ReplyFilter`] accepts.
pub async fn build_payload<S: ThreadSource>(
    post: &RedditPost,
    config: &SelectionConfig,
    source: &S,
    sanitizer: &dyn TextSanitizer,
    narrator: &dyn NarrationParser,
) -> Result<ThreadPayload, CoreError> {
    let content = match config.mode {
        ContentMode::Story(NarrationMode::Sentences) => PayloadContent::Story {
            post: StoryText::Narration(narrator.parse(&post.selftext)),
        },
        ContentMode::Story(NarrationMode::Raw) => PayloadContent::Story {
            post: StoryText::Raw(post.selftext.clone()),
        },
        ContentMode::Comments => {
            let replies = source.fetch_replies(&post.id).await?;
            let comments = ReplyFilter::from_config(config, sanitizer).apply(&replies);
            debug!(
                "Kept {} of {} replies for thread {}",
                comments.len(),
                replies.len(),
                post.id
            );
            PayloadContent::Comments { comments }
        }
    };

    info!("Received subreddit threads successfully");
    Ok(ThreadPayload {
        thread_url: post.thread_url(),
        thread_title: post.title.clone(),
        thread_id: post.id.clone(),
        is_nsfw: post.over_18,
        content,
    })
}
