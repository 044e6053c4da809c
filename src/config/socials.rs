use crate::utils::error::{Result, SyncError};
use std::path::Path;

pub const SCHOLAR_USER_ID_KEY: &str = "scholar_userid";

/// 從 socials YAML 讀取 Google Scholar user id；檔案或鍵缺少時直接失敗
pub fn load_scholar_user_id<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SyncError::config(format!(
            "Configuration file {} not found.",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    scholar_user_id_from_str(&content).map_err(|e| match e {
        SyncError::MissingConfigError { .. } => SyncError::config(format!(
            "No '{}' found in {}.",
            SCHOLAR_USER_ID_KEY,
            path.display()
        )),
        other => other,
    })
}

pub fn scholar_user_id_from_str(content: &str) -> Result<String> {
    let document: serde_yaml::Value = serde_yaml::from_str(content)?;

    let user_id = match document.get(SCHOLAR_USER_ID_KEY) {
        Some(serde_yaml::Value::String(s)) => s.trim().to_string(),
        Some(serde_yaml::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    if user_id.is_empty() {
        return Err(SyncError::MissingConfigError {
            field: SCHOLAR_USER_ID_KEY.to_string(),
        });
    }
    Ok(user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_scholar_user_id() {
        let yaml = "github_username: someone\nscholar_userid: NfwzqKoAAAAJ\n";
        assert_eq!(scholar_user_id_from_str(yaml).unwrap(), "NfwzqKoAAAAJ");
    }

    #[test]
    fn test_missing_or_empty_key() {
        assert!(matches!(
            scholar_user_id_from_str("github_username: someone\n"),
            Err(SyncError::MissingConfigError { .. })
        ));
        assert!(matches!(
            scholar_user_id_from_str("scholar_userid: ''\n"),
            Err(SyncError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_scholar_user_id(temp_dir.path().join("socials.yml"));

        match result {
            Err(SyncError::ConfigError { message }) => assert!(message.contains("not found")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_key_in_file_names_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("socials.yml");
        std::fs::write(&path, "twitter_username: someone\n").unwrap();

        match load_scholar_user_id(&path) {
            Err(SyncError::ConfigError { message }) => {
                assert!(message.contains("scholar_userid"));
                assert!(message.contains("socials.yml"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
