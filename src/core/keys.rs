//! Entry keys for bibliography blocks. Both forms are pure functions of
//! their inputs.

use crate::utils::text::{first_word, strip_non_alphanumeric};

/// `<firstAuthorToken><year>`, lowercased, e.g. `smith2023`.
pub fn author_year_key(authors: &[String], year: &str) -> String {
    let token = authors
        .first()
        .and_then(|author| first_word(author))
        .map(strip_non_alphanumeric)
        .filter(|token| !token.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    format!("{}{}", token, strip_non_alphanumeric(year)).to_lowercase()
}

/// `<Prefix>_<year>_<FirstTitleWord>`, e.g. `Tran_2025_SAWMonoDETR`.
pub fn prefixed_title_key(prefix: &str, year: &str, title: &str) -> String {
    // 第一個去除符號後仍有內容的詞
    let word = title
        .split_whitespace()
        .map(strip_non_alphanumeric)
        .find(|word| !word.is_empty())
        .unwrap_or_else(|| "Untitled".to_string());

    format!("{}_{}_{}", prefix, year, word)
}
