use clap::Parser;
use pubsync::app::cli::{finish, load_config, or_exit};
use pubsync::core::ConfigProvider;
use pubsync::utils::logger;
use pubsync::{CliConfig, LocalStorage, OrcidClient, OrcidSyncPipeline, SyncEngine};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting pubsync (ORCID)");

    let config = load_config(&cli);
    let orcid_id = or_exit(config.require_orcid_id()).to_string();
    let client = or_exit(OrcidClient::new(
        &config.orcid.base_url,
        &orcid_id,
        config.listing_timeout(),
        config.detail_timeout(),
    ));

    let storage = LocalStorage::new(config.paths.base_dir.clone());
    let pipeline = OrcidSyncPipeline::new(storage, config, client);

    finish(SyncEngine::new(pipeline).run().await);
}
