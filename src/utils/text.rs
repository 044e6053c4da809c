/// Collapse every whitespace run to a single space and trim both ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `None` for missing or blank values, otherwise the cleaned text.
pub fn non_empty(text: Option<&str>) -> Option<String> {
    text.map(clean_text).filter(|s| !s.is_empty())
}

pub fn strip_non_alphanumeric(text: &str) -> String {
    text.chars().filter(|c| c.is_alphanumeric()).collect()
}

/// 取第一個以空白分隔的詞
pub fn first_word(text: &str) -> Option<&str> {
    text.split_whitespace().next()
}

/// Case-folded form used for title comparison.
pub fn fold_title(title: &str) -> String {
    clean_text(title).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  Deep\n\tLearning   for  X "), "Deep Learning for X");
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text(" \n "), "");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  a  b ")), Some("a b".to_string()));
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_strip_non_alphanumeric() {
        assert_eq!(strip_non_alphanumeric("SAW-MonoDETR:"), "SAWMonoDETR");
        assert_eq!(strip_non_alphanumeric("Smith,"), "Smith");
        assert_eq!(strip_non_alphanumeric("Über"), "Über");
    }

    #[test]
    fn test_fold_title() {
        assert_eq!(fold_title(" Test  Paper 1"), "test paper 1");
    }
}
