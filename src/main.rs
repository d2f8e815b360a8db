use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use furigana_rs::config::Config;
use furigana_rs::renderer::{MarkupFormat, Renderer};
use furigana_rs::segmenter::LinderaSegmenter;
use furigana_rs::service::{Service, INIT_FAILED_MESSAGE};

#[derive(Parser)]
#[command(name = "furigana", about = "Annotate Japanese text with furigana markup")]
struct Cli {
    /// Input text file (reads stdin when omitted)
    input: Option<PathBuf>,
    /// Path to a furigana.toml configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output markup, overriding the configuration
    #[arg(long, value_enum)]
    format: Option<MarkupFormat>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_from_default(),
    };
    if let Some(format) = cli.format {
        config.render.format = format;
    }

    let service = Service::new(Renderer::new(&config.render));
    tracing::info!("{}", service.trigger().label);

    if let Err(e) = service
        .initialize(LinderaSegmenter::build_async(config.dictionary.clone()))
        .await
    {
        eprintln!("{}", INIT_FAILED_MESSAGE);
        return Err(e.into());
    }
    tracing::info!("{}", service.trigger().label);

    let text = match &cli.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let text = text.strip_suffix('\n').unwrap_or(&text);
    println!("{}", service.convert(text));

    Ok(())
}
