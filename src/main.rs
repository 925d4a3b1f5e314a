use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, bail};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use wishcache::application::{ResolveImagesUseCase, ResolveRequest};
use wishcache::infrastructure::{
    AppConfig, CliArgs, Command, ConfigLoader, ConfigSource, HttpImageDownloader, ImageCache,
    LocalFileStorage,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<(AppConfig, ConfigSource)> {
    let (mut config, source) = ConfigLoader::new(args.config.as_deref())?.load()?;
    config.merge_with_args(args);
    Ok((config, source))
}

fn create_use_case(config: &AppConfig) -> Result<ResolveImagesUseCase> {
    let storage = Arc::new(LocalFileStorage::new());
    let fetcher = Arc::new(HttpImageDownloader::new(&config.downloader_config())?);
    let cache = Arc::new(ImageCache::new(storage, fetcher, config.cache_layout()));

    info!(root = %cache.layout().root().display(), "Image cache ready");
    Ok(ResolveImagesUseCase::new(
        cache,
        config.max_concurrent_resolves,
    ))
}

fn request(url: String, owner: Option<String>) -> ResolveRequest {
    let request = ResolveRequest::new(url);
    match owner {
        Some(owner) => request.owned_by(owner),
        None => request,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let (config, source) = load_config(&args)?;
    init_logging(&config)?;
    source.report();

    info!(version = wishcache::VERSION, "Starting wishcache");
    let use_case = create_use_case(&config)?;

    match args.command {
        Command::Resolve { urls, owner } => {
            if owner.is_some() && urls.len() > 1 {
                bail!("--owner can only be used with a single URL");
            }
            let requests = urls
                .into_iter()
                .map(|url| request(url, owner.clone()))
                .collect();
            for resolution in use_case.execute_batch(requests).await {
                println!("{}\t{}", resolution.outcome, resolution.handle);
            }
        }
        Command::Lookup { url, owner } => match use_case.lookup(&request(url, owner)).await {
            Some(path) => println!("{}", path.display()),
            None => std::process::exit(1),
        },
        Command::Refresh { url, owner } => {
            let path = use_case.refresh(&request(url, owner)).await?;
            println!("{}", path.display());
        }
        Command::List => {
            for (key, entry) in use_case.entries().await {
                println!(
                    "{key}\t{}\t{}\t{}\t{}",
                    entry.usage_count,
                    entry.last_accessed.to_rfc3339(),
                    entry.source_url,
                    entry.local_path.display()
                );
            }
        }
    }

    Ok(())
}
