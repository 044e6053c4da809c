use super::SyncConfig;
use crate::utils::error::Result;
use clap::Parser;

/// Flags shared by every binary; all of them are optional.
#[derive(Debug, Clone, Parser)]
#[command(about = "Sync publication metadata into local bibliography and CV files")]
pub struct CliConfig {
    /// Path to the TOML settings file (defaults to ./pubsync.toml when present)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory the data files are resolved against
    #[arg(long)]
    pub base_dir: Option<String>,

    /// Override the ORCID iD from the settings file
    #[arg(long)]
    pub orcid_id: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 載入設定檔後套用命令列覆蓋
    pub fn load_sync_config(&self) -> Result<SyncConfig> {
        let mut config = SyncConfig::load(self.config.as_deref())?;

        if let Some(base_dir) = &self.base_dir {
            tracing::debug!("base_dir overridden to: {}", base_dir);
            config.paths.base_dir = base_dir.clone();
        }
        if let Some(orcid_id) = &self.orcid_id {
            tracing::debug!("orcid.id overridden to: {}", orcid_id);
            config.orcid.id = Some(orcid_id.clone());
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_no_flags_parse() {
        let cli = CliConfig::try_parse_from(["pubsync"]).unwrap();
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_overrides_apply_on_top_of_settings_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[orcid]\nid = \"0000-0002-1825-0097\"\n[paths]\nbase_dir = \"site\"\n")
            .unwrap();

        let path = temp_file.path().to_str().unwrap().to_string();
        let cli = CliConfig::try_parse_from([
            "orcid-sync",
            "--config",
            path.as_str(),
            "--orcid-id",
            "0000-0001-5109-3700",
        ])
        .unwrap();

        let config = cli.load_sync_config().unwrap();
        assert_eq!(config.orcid.id.as_deref(), Some("0000-0001-5109-3700"));
        assert_eq!(config.paths.base_dir, "site");
    }
}
