#[cfg(feature = "cli")]
pub mod cli;
pub mod socials;

use crate::domain::ports::{BibMode, ConfigProvider};
use crate::utils::error::{Result, SyncError};
use crate::utils::validation::{self, Validate};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "pubsync.toml";
pub const DEFAULT_ORCID_BASE_URL: &str = "https://pub.orcid.org/v3.0";
pub const DEFAULT_SCHOLAR_BASE_URL: &str = "http://localhost:8000";

/// 整個執行期間唯一的設定物件，在 main 建立後往下傳遞
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub paths: PathsConfig,
    pub scholar: ScholarConfig,
    pub orcid: OrcidConfig,
    pub defaults: DefaultsConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub base_dir: String,
    pub socials_file: String,
    pub bib_file: String,
    pub cv_file: String,
    pub citations_file: Option<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_dir: ".".to_string(),
            socials_file: "_data/socials.yml".to_string(),
            bib_file: "_bibliography/papers.bib".to_string(),
            cv_file: "_data/cv.yml".to_string(),
            citations_file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScholarConfig {
    pub base_url: String,
    /// 直接指定時不再讀取 socials 檔
    pub user_id: Option<String>,
}

impl Default for ScholarConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SCHOLAR_BASE_URL.to_string(),
            user_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrcidConfig {
    pub id: Option<String>,
    pub base_url: String,
    pub bib_mode: BibMode,
    pub key_prefix: String,
}

impl Default for OrcidConfig {
    fn default() -> Self {
        Self {
            id: None,
            base_url: DEFAULT_ORCID_BASE_URL.to_string(),
            bib_mode: BibMode::Overwrite,
            key_prefix: "Ref".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub author: String,
    pub fallback_year: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            author: "Unknown Author".to_string(),
            fallback_year: chrono::Local::now().year().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub listing_timeout_seconds: u64,
    pub detail_timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listing_timeout_seconds: 20,
            detail_timeout_seconds: 15,
        }
    }
}

impl SyncConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SyncError::config(format!("Cannot read settings file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// 指定的設定檔不存在時報錯；未指定且預設檔不存在時使用預設值
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => {
                tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                Ok(Self::default())
            }
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SyncError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ORCID_ID})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| SyncError::config(format!("Invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// ORCID 流程必須有 iD
    pub fn require_orcid_id(&self) -> Result<&str> {
        let id = validation::validate_required_field("orcid.id", &self.orcid.id)?;
        validation::validate_orcid_id("orcid.id", id)?;
        Ok(id)
    }

    /// Scholar user id: the settings file wins, otherwise the socials file.
    pub fn resolve_scholar_user_id(&self) -> Result<String> {
        match self.scholar.user_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id.to_string()),
            _ => {
                let socials = Path::new(&self.paths.base_dir).join(&self.paths.socials_file);
                socials::load_scholar_user_id(socials)
            }
        }
    }
}

impl ConfigProvider for SyncConfig {
    fn bib_file(&self) -> &str {
        &self.paths.bib_file
    }

    fn cv_file(&self) -> &str {
        &self.paths.cv_file
    }

    fn citations_file(&self) -> Option<&str> {
        self.paths.citations_file.as_deref()
    }

    fn default_author(&self) -> &str {
        &self.defaults.author
    }

    fn key_prefix(&self) -> &str {
        &self.orcid.key_prefix
    }

    fn fallback_year(&self) -> &str {
        &self.defaults.fallback_year
    }

    fn bib_mode(&self) -> BibMode {
        self.orcid.bib_mode
    }

    fn listing_timeout(&self) -> Duration {
        Duration::from_secs(self.http.listing_timeout_seconds)
    }

    fn detail_timeout(&self) -> Duration {
        Duration::from_secs(self.http.detail_timeout_seconds)
    }
}

impl Validate for SyncConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("paths.base_dir", &self.paths.base_dir)?;
        validation::validate_path("paths.socials_file", &self.paths.socials_file)?;
        validation::validate_path("paths.bib_file", &self.paths.bib_file)?;
        validation::validate_file_extension("paths.bib_file", &self.paths.bib_file, &["bib"])?;
        validation::validate_path("paths.cv_file", &self.paths.cv_file)?;
        validation::validate_file_extension("paths.cv_file", &self.paths.cv_file, &["yml", "yaml"])?;
        if let Some(citations) = &self.paths.citations_file {
            validation::validate_file_extension("paths.citations_file", citations, &["json"])?;
        }

        validation::validate_url("scholar.base_url", &self.scholar.base_url)?;
        validation::validate_url("orcid.base_url", &self.orcid.base_url)?;
        if let Some(id) = &self.orcid.id {
            validation::validate_orcid_id("orcid.id", id)?;
        }
        validation::validate_non_empty_string("orcid.key_prefix", &self.orcid.key_prefix)?;
        validation::validate_non_empty_string("defaults.author", &self.defaults.author)?;
        validation::validate_non_empty_string("defaults.fallback_year", &self.defaults.fallback_year)?;

        validation::validate_positive_number(
            "http.listing_timeout_seconds",
            self.http.listing_timeout_seconds,
            1,
        )?;
        validation::validate_positive_number(
            "http.detail_timeout_seconds",
            self.http.detail_timeout_seconds,
            1,
        )?;

        Ok(())
    }
}
