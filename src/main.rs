mod cli;

use clap::Parser;
use cli::{Cli, Command};
use database::Database;
use embedding_engine::EmbeddingEngine;
use reddit_client::{RedditClient, RedditOAuth2Config};
use selection_engine::{
    resolve_subreddit, two_factor_code, Sanitizer, SelectionEngine, SentenceSplitter,
    StdinPrompt, UndoneTracker,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use threadpick_core::{
    split_post_ids, CoreError, ErrorExt, ErrorReporter, SelectionError, Settings,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USER_AGENT: &str = concat!("threadpick/", env!("CARGO_PKG_VERSION"));

/// Exit status when the chosen thread has no comments to build a payload from.
const EXIT_NO_COMMENTS: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("threadpick=info,selection_engine=info,reddit_client=info")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Select { post_id, output } => select(&cli.config, post_id, output).await,
        Command::MarkDone {
            id,
            subreddit,
            title,
        } => mark_done(&cli.config, &id, &subreddit, &title).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(CoreError::Selection(SelectionError::NoComments { .. })) => {
            ExitCode::from(EXIT_NO_COMMENTS)
        }
        Err(e) if e.is_authentication_failure() => {
            eprintln!("{}", e.user_friendly_message());
            ExitCode::FAILURE
        }
        Err(e) => {
            ErrorReporter.report_error(&e);
            eprintln!("{}", e.user_friendly_message());
            ExitCode::FAILURE
        }
    }
}

async fn open_database(settings: &Settings) -> Result<Database, CoreError> {
    let mut db = Database::new(settings.settings.database_url.clone());
    db.connect().await?;
    db.run_migrations().await?;
    Ok(db)
}

async fn select(
    config_path: &Path,
    post_id: Option<String>,
    output: Option<PathBuf>,
) -> Result<(), CoreError> {
    let settings = Settings::load(config_path)?;
    let config = settings.selection_config()?;
    let credentials = settings.credentials()?;
    let input = StdinPrompt;

    let mut oauth = RedditOAuth2Config::from_credentials(&credentials, USER_AGENT.to_string());
    if credentials.two_factor {
        oauth = oauth.with_two_factor_code(&two_factor_code(&input)?);
    }

    info!("Logging into Reddit.");
    let client = RedditClient::new(oauth)?;
    client.authenticate().await?;

    let db = open_database(&settings).await?;
    let subreddit = resolve_subreddit(config.subreddit.as_deref(), &input)?;

    let ranker = match &config.relevance {
        Some(relevance) => {
            let mut model = EmbeddingEngine::new(relevance.model_dir.clone());
            model.load_model()?;
            Some(model)
        }
        None => None,
    };

    let sanitizer = Sanitizer::new(config.no_emojis);
    let narrator = SentenceSplitter::new(sanitizer);
    let tracker = UndoneTracker::new(&db, &client, &config);
    let mut engine = SelectionEngine::new(
        &config, subreddit, &client, &tracker, &db, &sanitizer, &narrator,
    );
    if let Some(ranker) = &ranker {
        engine = engine.with_ranker(ranker);
    }

    // Several configured ids are queued one run each; a single one is
    // handled by the engine's own strategy choice.
    let queued: Vec<String> = match post_id {
        Some(raw) => split_post_ids(&raw),
        None if config.post_ids.len() > 1 => config.post_ids.clone(),
        None => Vec::new(),
    };

    let mut out: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    info!("Getting subreddit threads from r/{}...", engine.subreddit());
    if queued.is_empty() {
        let payload = engine.run(None).await?;
        serde_json::to_writer(&mut out, &payload)?;
        writeln!(out)?;
    } else {
        for (index, id) in queued.iter().enumerate() {
            info!("Processing queued thread {} of {}: {}", index + 1, queued.len(), id);
            let payload = engine.run(Some(id.as_str())).await?;
            serde_json::to_writer(&mut out, &payload)?;
            writeln!(out)?;
        }
    }
    out.flush()?;

    db.close().await;
    Ok(())
}

async fn mark_done(
    config_path: &Path,
    id: &str,
    subreddit: &str,
    title: &str,
) -> Result<(), CoreError> {
    let settings = Settings::load(config_path)?;
    let db = open_database(&settings).await?;
    db.mark_processed(id, subreddit, title).await?;
    info!("Marked thread {} as processed", id);
    db.close().await;
    Ok(())
}
