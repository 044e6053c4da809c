//! Existing-title detection for the bibliography store.
//!
//! This is a line scan, not a parse: any line holding both `title` and `=`
//! contributes its right-hand side. Entries whose title spans lines or sits
//! on the same line as other fields are missed, which can let a duplicate
//! through. That lossiness is accepted.

use crate::utils::text::fold_title;
use std::collections::HashSet;

const TRIM_CHARS: &[char] = &['{', '}', ',', '"', ' ', '\t', '\r'];

/// Stored lines and candidate titles go through the same trim and fold, so
/// a title with outer braces or quotes still matches the line it produced.
fn title_key(title: &str) -> String {
    fold_title(title.trim_matches(TRIM_CHARS))
}

#[derive(Debug, Clone, Default)]
pub struct TitleIndex {
    titles: HashSet<String>,
}

impl TitleIndex {
    pub fn from_bibliography(content: &str) -> Self {
        let titles = content
            .lines()
            .filter(|line| line.contains("title") && line.contains('='))
            .filter_map(|line| line.split_once('='))
            .map(|(_, rhs)| title_key(rhs))
            .filter(|title| !title.is_empty())
            .collect();

        Self { titles }
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(&title_key(title))
    }

    /// 回傳 false 表示標題已存在
    pub fn insert(&mut self, title: &str) -> bool {
        self.titles.insert(title_key(title))
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
