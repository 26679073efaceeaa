use std::sync::Arc;

use {
    anyhow::bail,
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    postpilot_config::AppConfig,
    postpilot_extract::Extractor,
    postpilot_generate::{ContentMode, Mood, Orchestrator, TrendingCategory, VariantCount},
    postpilot_providers::Providers,
};

#[derive(Parser)]
#[command(name = "postpilot", about = "PostPilot — social content studio server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        #[arg(long, default_value_t = 3001)]
        port: u16,
    },
    /// Validate configuration and report what is set up.
    Check,
    /// Generate content for a topic from the command line.
    Generate {
        #[arg(short, long)]
        topic: String,
        /// Content mode: default, twitter_threads, or instagram.
        #[arg(long, default_value = "default")]
        mode: String,
        /// Voice preset: professional, casual, humorous, or inspirational.
        #[arg(long, default_value = "professional")]
        mood: String,
    },
    /// Fetch trending topic suggestions.
    Trending {
        /// Category (Business, Tech, Sports, ...).
        #[arg(long)]
        category: String,
        /// Two-letter country code.
        #[arg(long, default_value = "us")]
        country: String,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

fn build_orchestrator(config: &AppConfig) -> anyhow::Result<Orchestrator> {
    let client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()?;
    let providers = Arc::new(Providers::from_config(config, client.clone()));
    let extractor = Arc::new(Extractor::new(client, providers.serper()));
    Ok(Orchestrator::new(providers, extractor))
}

fn parse_mode(raw: &str) -> anyhow::Result<ContentMode> {
    match raw {
        "default" => Ok(ContentMode::Default),
        "twitter_threads" => Ok(ContentMode::TwitterThreads),
        "instagram" => Ok(ContentMode::Instagram),
        other => bail!("unknown mode: {other}"),
    }
}

fn parse_mood(raw: &str) -> anyhow::Result<Mood> {
    match raw {
        "professional" => Ok(Mood::Professional),
        "casual" => Ok(Mood::Casual),
        "humorous" => Ok(Mood::Humorous),
        "inspirational" => Ok(Mood::Inspirational),
        other => bail!("unknown mood: {other}"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "postpilot starting");

    let config = AppConfig::from_env()?;

    match cli.command {
        Commands::Serve { bind, port } => {
            postpilot_gateway::start_gateway(&bind, port, config).await
        },
        Commands::Check => {
            let client = reqwest::Client::new();
            let providers = Providers::from_config(&config, client);
            println!("app url:    {}", config.app_url);
            println!("production: {}", config.production);
            println!("providers:  {}", providers.summary());
            println!(
                "twitter:    {}",
                if config.twitter.is_some() {
                    "configured"
                } else {
                    "not configured"
                }
            );
            Ok(())
        },
        Commands::Generate { topic, mode, mood } => {
            let orchestrator = build_orchestrator(&config)?;
            let set = orchestrator
                .generate_content(
                    &topic,
                    parse_mode(&mode)?,
                    parse_mood(&mood)?,
                    VariantCount::Random,
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&set)?);
            Ok(())
        },
        Commands::Trending { category, country } => {
            let Some(category) = TrendingCategory::parse(&category) else {
                bail!(
                    "unsupported category: choose one of {}",
                    TrendingCategory::ALL
                        .iter()
                        .map(|c| c.label())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            };
            let orchestrator = build_orchestrator(&config)?;
            let topics = orchestrator.trending(category, Some(&country)).await;
            for (i, topic) in topics.iter().enumerate() {
                println!("{:2}. {}\n    {}", i + 1, topic.title, topic.summary);
            }
            Ok(())
        },
    }
}
