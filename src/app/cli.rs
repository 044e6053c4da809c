//! Startup and shutdown shared by the binaries.

use crate::config::{cli::CliConfig, SyncConfig};
use crate::domain::model::SyncSummary;
use crate::utils::error::{Result, SyncError};
use crate::utils::validation::Validate;

fn report_failure(stage: &str, e: &SyncError) {
    tracing::error!(
        "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
        stage,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());
}

/// 載入並驗證設定，失敗時以 exit code 1 結束
pub fn load_config(cli: &CliConfig) -> SyncConfig {
    let config = cli.load_sync_config().and_then(|config| {
        config.validate()?;
        Ok(config)
    });

    match config {
        Ok(config) => {
            tracing::debug!("Sync config: {:?}", config);
            config
        }
        Err(e) => {
            report_failure("Configuration validation", &e);
            std::process::exit(1);
        }
    }
}

/// Exit with the error's code on failure; a run that adds nothing is
/// still a success.
pub fn finish(result: Result<SyncSummary>) {
    match result {
        Ok(summary) => {
            tracing::info!(
                "✅ Sync completed: {} added, {} skipped",
                summary.added,
                summary.skipped
            );
        }
        Err(e) => {
            report_failure("Sync", &e);
            std::process::exit(e.exit_code());
        }
    }
}

/// Setup steps after configuration (client construction, user id lookup)
/// exit the same way a failed run does.
pub fn or_exit<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            report_failure("Setup", &e);
            std::process::exit(e.exit_code());
        }
    }
}
