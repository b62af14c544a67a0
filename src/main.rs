use clap::Parser;
use sourcerefs::adapters::jar::DirectoryContainer;
use sourcerefs::config::file::FileConfig;
use sourcerefs::config::CliConfig;
use sourcerefs::server::{self, AppState};
use sourcerefs::utils::{logger, validation::Validate};
use sourcerefs::{FinderRegistry, SourceReferenceEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    logger::init(config.verbose);

    if let Some(path) = config.config.clone() {
        config.merge_file(FileConfig::load(&path)?);
    }
    config.validate()?;

    tracing::info!("Starting sourcerefs");
    if config.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    let container = DirectoryContainer::open(&config.bundle_dir)?;
    tracing::info!(
        "Loaded {} bundles from {}",
        container.len(),
        config.bundle_dir.display()
    );

    let engine = SourceReferenceEngine::new(FinderRegistry::with_defaults())
        .with_policy(config.missing_key_policy);
    let app = server::router(AppState::new(engine, container));

    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    tracing::info!("Listening on {}", config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
