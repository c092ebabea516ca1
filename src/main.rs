use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pawtraits_core::{AppConfig, AppState, DeferredOutcome, Post, deferred_load};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use url::Url;

#[derive(Parser)]
#[command(name = "pawtraits")]
#[command(about = "Pawtraits simulated feed client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory containing bundled content (posts.json, details-*.json, images)
    #[arg(long, env = "PAWTRAITS_CONTENT_DIR")]
    content_dir: Option<PathBuf>,

    /// Directory where preferences (liked posts) are stored
    #[arg(long, env = "PAWTRAITS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Disable simulated network latency
    #[arg(long)]
    no_delays: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "JSON_LOGS")]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print the feed
    Feed,
    /// Open a post, loading its comments with deferred navigation
    Details { post_id: String },
    /// Like a post
    Like { post_id: String },
    /// Remove a like from a post
    Unlike { post_id: String },
    /// Load an image by URL
    Image { url: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    pawtraits_core::shared::logging::init_logging(&cli.log_level, cli.json_logs);

    let mut config = AppConfig::from_env();
    if let Some(dir) = cli.content_dir {
        config.content.content_dir = dir;
    }
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }
    if cli.no_delays {
        config.latency.enabled = false;
    }

    info!("Starting Pawtraits client v{}", env!("CARGO_PKG_VERSION"));
    let state = AppState::initialize(config)
        .await
        .context("Failed to initialize application state")?;
    let token = CancellationToken::new();

    match cli.command {
        Commands::Feed => {
            let posts = state.client.fetch_posts(0, &token).await?;
            for post in &posts {
                print_post(post);
            }
        }
        Commands::Details { post_id } => {
            let post = find_post(&state, &post_id).await?;
            let client = state.client.clone();
            let load_token = token.clone();
            let outcome = deferred_load(
                post,
                state.config.latency.deferred_navigation(),
                &token,
                |post| async move { client.fetch_details(&post, &load_token).await },
            )
            .await;

            match outcome {
                DeferredOutcome::Loaded(post) => {
                    print_post(&post);
                    for comment in post.comments.iter().flatten() {
                        println!("  @{}: {}", comment.username, comment.text);
                    }
                }
                DeferredOutcome::Fallback(post) | DeferredOutcome::TimedOut(post) => {
                    print_post(&post);
                    println!("  (loading {} comments...)", post.number_of_comments);
                }
                DeferredOutcome::Abandoned => warn!("Navigation to {post_id} abandoned"),
            }
        }
        Commands::Like { post_id } => {
            let post = find_post(&state, &post_id).await?;
            let pending = state.likes.toggle(&post, true, token.clone());
            print_post(&pending.tentative);
            if let Err(err) = pending.settle().await {
                warn!("Like for {post_id} was not applied: {err}");
            }
        }
        Commands::Unlike { post_id } => {
            let post = find_post(&state, &post_id).await?;
            let pending = state.likes.toggle(&post, false, token.clone());
            print_post(&pending.tentative);
            if let Err(err) = pending.settle().await {
                warn!("Unlike for {post_id} was not applied: {err}");
            }
        }
        Commands::Image { url } => {
            let url = Url::parse(&url).context("Invalid image URL")?;
            match state.client.load_image(&url, &token).await {
                Ok(image) => println!(
                    "{} {}x{} {} ({} bytes)",
                    image.name,
                    image.size.width,
                    image.size.height,
                    image.format,
                    image.byte_len()
                ),
                Err(err) => warn!("Showing placeholder for {url}: {err}"),
            }
        }
    }

    Ok(())
}

async fn find_post(state: &AppState, post_id: &str) -> Result<Post> {
    state
        .store
        .load_posts()
        .await
        .into_iter()
        .find(|post| post.id == post_id)
        .with_context(|| format!("Post {post_id} not found"))
}

fn print_post(post: &Post) {
    println!(
        "{} @{} {} {} comments{}",
        post.id,
        post.author.username,
        post.created_at.format("%Y-%m-%d"),
        post.number_of_comments,
        if post.is_liked { " ♥" } else { "" }
    );
    if let Some(description) = &post.description {
        println!("  {description}");
    }
}
