use clap::Parser;
use pubsync::app::cli::{finish, load_config, or_exit};
use pubsync::core::ConfigProvider;
use pubsync::utils::logger;
use pubsync::{CitationsPipeline, CliConfig, HttpScholarClient, LocalStorage, SyncEngine};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting pubsync citation report");

    let config = load_config(&cli);
    let user_id = or_exit(config.resolve_scholar_user_id());
    let source = or_exit(HttpScholarClient::new(
        &config.scholar.base_url,
        config.listing_timeout(),
        config.detail_timeout(),
    ));

    let storage = LocalStorage::new(config.paths.base_dir.clone());
    let pipeline = CitationsPipeline::new(storage, config, source, user_id);

    finish(SyncEngine::new(pipeline).run().await);
}
