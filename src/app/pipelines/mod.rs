pub mod citations_pipeline;
pub mod orcid_pipeline;
pub mod scholar_pipeline;

#[cfg(test)]
pub(crate) mod test_support;

use crate::domain::ports::Storage;
use crate::utils::error::{Result, SyncError};

/// 檔案不存在時回傳 None
pub(crate) async fn read_text<S: Storage>(storage: &S, path: &str) -> Result<Option<String>> {
    if !storage.exists(path).await {
        return Ok(None);
    }
    let bytes = storage.read_file(path).await?;
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

/// Like `read_text`, but rejects non-UTF-8 content instead of replacing
/// it, for files that are rewritten from what was read.
pub(crate) async fn read_utf8<S: Storage>(storage: &S, path: &str) -> Result<Option<String>> {
    if !storage.exists(path).await {
        return Ok(None);
    }
    let bytes = storage.read_file(path).await?;
    String::from_utf8(bytes)
        .map(Some)
        .map_err(|e| SyncError::processing(format!("{} is not valid UTF-8: {}", path, e)))
}

/// Append each entry followed by a blank line; a newline is inserted first
/// when the existing file does not end with one.
pub(crate) async fn append_entries<S: Storage>(
    storage: &S,
    path: &str,
    entries: &[String],
) -> Result<()> {
    let mut data = String::new();
    if let Some(existing) = read_text(storage, path).await? {
        if !existing.is_empty() && !existing.ends_with('\n') {
            data.push('\n');
        }
    }
    for entry in entries {
        data.push_str(entry);
        data.push_str("\n\n");
    }

    storage.append_file(path, data.as_bytes()).await
}
