use threadpick_core::{strip_subreddit_prefix, CoreError, InputProvider, DEFAULT_SUBREDDIT};
use tracing::info;

/// The subreddit to pull threads from.
///
/// A configured name is used as is. Otherwise the user is asked, and an
/// empty answer falls back to r/askreddit. `a+b` multi-subreddits pass
/// through untouched.
pub fn resolve_subreddit(
    configured: Option<&str>,
    input: &dyn InputProvider,
) -> Result<String, CoreError> {
    if let Some(name) = configured {
        info!("Using subreddit: r/{} from TOML config", name);
        return Ok(name.to_string());
    }

    let answer = input.prompt("What subreddit would you like to pull from? ")?;
    let name = strip_subreddit_prefix(answer.trim()).replace("r/", "");
    if name.trim().is_empty() {
        info!("Subreddit not defined. Using AskReddit.");
        return Ok(DEFAULT_SUBREDDIT.to_string());
    }
    Ok(name.trim().to_string())
}
