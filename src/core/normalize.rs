//! Flattening of Scholar and ORCID records into `PublicationRecord`, and
//! rendering of the bibliography entries built from them.

use crate::core::bibtex;
use crate::core::keys::{author_year_key, prefixed_title_key};
use crate::domain::model::{CvPublication, PublicationRecord};
use crate::utils::error::Result;
use crate::utils::text::{clean_text, non_empty};
use serde_json::Value;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNTITLED: &str = "Untitled";
pub const DEFAULT_VENUE: &str = "Journal/Conference";
pub const UNKNOWN_RELEASE_DATE: &str = "N/A";
pub const ORCID_SUMMARY: &str = "Source: ORCID";

fn value_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}

/// 字串或數字欄位，清理空白後非空才回傳
fn text_at(value: &Value, path: &[&str]) -> Option<String> {
    match value_at(value, path)? {
        Value::String(s) => non_empty(Some(s)),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn split_authors(authors: &str) -> Vec<String> {
    authors
        .split(" and ")
        .map(clean_text)
        .filter(|name| !name.is_empty())
        .collect()
}

/// `author_pub_id` as used by scholarly, or a plain `pub_id`.
pub fn scholar_publication_id(publication: &Value) -> Option<String> {
    text_at(publication, &["author_pub_id"]).or_else(|| text_at(publication, &["pub_id"]))
}

pub fn normalize_scholar(publication: &Value, default_author: &str) -> PublicationRecord {
    let authors = text_at(publication, &["bib", "author"])
        .map(|authors| split_authors(&authors))
        .filter(|authors| !authors.is_empty())
        .unwrap_or_else(|| vec![clean_text(default_author)]);

    PublicationRecord {
        title: text_at(publication, &["bib", "title"]).unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        authors,
        year: text_at(publication, &["bib", "pub_year"]),
        venue: text_at(publication, &["bib", "journal"])
            .or_else(|| text_at(publication, &["bib", "conference"])),
        volume: text_at(publication, &["bib", "volume"]),
        pages: text_at(publication, &["bib", "pages"]),
        external_id: text_at(publication, &["pub_url"]),
        citations: publication.get("num_citations").and_then(Value::as_u64),
        source_id: scholar_publication_id(publication),
    }
}

pub fn orcid_put_code(summary: &Value) -> Option<String> {
    text_at(summary, &["put-code"])
}

fn orcid_contributors(detail: &Value) -> Vec<String> {
    value_at(detail, &["contributors", "contributor"])
        .and_then(Value::as_array)
        .map(|contributors| {
            contributors
                .iter()
                .filter_map(|c| text_at(c, &["credit-name", "value"]))
                .collect()
        })
        .unwrap_or_default()
}

/// 優先取 DOI，其次是作品 URL
fn orcid_external_id(summary: &Value, detail: &Value) -> Option<String> {
    let doi = |source: &Value| {
        value_at(source, &["external-ids", "external-id"])
            .and_then(Value::as_array)?
            .iter()
            .find(|id| {
                text_at(id, &["external-id-type"])
                    .map(|t| t.eq_ignore_ascii_case("doi"))
                    .unwrap_or(false)
            })
            .and_then(|id| text_at(id, &["external-id-value"]))
    };

    doi(summary)
        .or_else(|| doi(detail))
        .or_else(|| text_at(summary, &["url", "value"]))
        .or_else(|| text_at(detail, &["url", "value"]))
}

pub fn normalize_orcid(summary: &Value, detail: &Value, default_author: &str) -> PublicationRecord {
    let mut authors = orcid_contributors(detail);
    if authors.is_empty() {
        authors.push(clean_text(default_author));
    }

    PublicationRecord {
        title: text_at(summary, &["title", "title", "value"]).unwrap_or_else(|| UNTITLED.to_string()),
        authors,
        year: text_at(summary, &["publication-date", "year", "value"]),
        venue: text_at(summary, &["journal-title", "value"]),
        volume: None,
        pages: None,
        external_id: orcid_external_id(summary, detail),
        citations: None,
        source_id: orcid_put_code(summary),
    }
}

/// The work's own citation text, when ORCID tags it as BibTeX.
pub fn orcid_citation(detail: &Value) -> Option<String> {
    let citation = detail.get("citation")?;
    let is_bibtex = text_at(citation, &["citation-type"])
        .map(|t| t.eq_ignore_ascii_case("bibtex"))
        .unwrap_or(false);
    if !is_bibtex {
        return None;
    }

    match citation.get("citation-value")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Fixed `@article` template for Scholar publications.
pub fn scholar_entry(record: &PublicationRecord) -> String {
    let year = record.year_label();
    let key = author_year_key(&record.authors, year);

    let mut entry = format!("@article{{{},\n", key);
    entry.push_str(&format!("  title={{{}}},\n", record.title));
    entry.push_str(&format!("  author={{{}}},\n", record.author_field()));
    entry.push_str(&format!("  year={{{}}},\n", year));

    let optional = [
        ("journal", &record.venue),
        ("volume", &record.volume),
        ("pages", &record.pages),
        ("doi", &record.external_id),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            entry.push_str(&format!("  {}={{{}}},\n", name, value));
        }
    }

    entry.push('}');
    entry
}

/// 沒有現成 BibTeX 時的基本框架，之後仍會經過 pretty_format 重新命名 key
pub fn orcid_fallback_entry(record: &PublicationRecord, fallback_year: &str) -> String {
    let mut fields = vec![
        format!("  title={{{}}}", record.title),
        format!("  author={{{}}}", record.author_field()),
        format!(
            "  journal={{{}}}",
            record.venue.as_deref().unwrap_or(DEFAULT_VENUE)
        ),
        format!("  year={{{}}}", record.year.as_deref().unwrap_or(fallback_year)),
    ];
    if let Some(doi) = &record.external_id {
        fields.push(format!("  doi={{{}}}", doi));
    }

    format!("@article{{tmp,\n{}\n}}", fields.join(",\n"))
}

fn entry_year(entry: &bibtex::BibEntry) -> Option<String> {
    let text = entry.field("year")?.text.trim();
    let digits: String = text.chars().take(4).collect();
    (digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit())).then_some(digits)
}

/// Rekey `raw` as `<prefix>_<year>_<FirstTitleWord>` and lay its fields out
/// one per line.
pub fn pretty_format(raw: &str, title: &str, prefix: &str, fallback_year: &str) -> Result<String> {
    let entry = bibtex::parse_entry(raw)?;
    let year = entry_year(&entry).unwrap_or_else(|| fallback_year.to_string());
    let key = prefixed_title_key(prefix, &year, title);

    Ok(bibtex::format_entry(&entry, &key))
}

/// `pretty_format`, falling back to the raw text when it cannot be parsed.
pub fn render_orcid_entry(raw: &str, title: &str, prefix: &str, fallback_year: &str) -> String {
    match pretty_format(raw, title, prefix, fallback_year) {
        Ok(pretty) => pretty,
        Err(e) => {
            tracing::warn!("⚠️ Keeping raw citation for '{}': {}", title, e);
            raw.to_string()
        }
    }
}

pub fn cv_entry(record: &PublicationRecord) -> CvPublication {
    CvPublication {
        title: record.title.clone(),
        authors: record.authors.clone(),
        publisher: record
            .venue
            .clone()
            .unwrap_or_else(|| DEFAULT_VENUE.to_string()),
        release_date: record
            .year
            .clone()
            .unwrap_or_else(|| UNKNOWN_RELEASE_DATE.to_string()),
        summary: ORCID_SUMMARY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_scholar_full_record() {
        let publication = json!({
            "author_pub_id": "NfwzqKoAAAAJ:u5HHmVD_uO8C",
            "num_citations": 12,
            "pub_url": "https://doi.org/10.1000/xyz",
            "bib": {
                "title": "  Graph   Networks ",
                "author": "Jane Smith and Bo Li",
                "pub_year": 2023,
                "journal": "Nature",
                "volume": "12",
                "pages": "1--10"
            }
        });

        let record = normalize_scholar(&publication, "Unknown Author");

        assert_eq!(record.title, "Graph Networks");
        assert_eq!(record.authors, vec!["Jane Smith", "Bo Li"]);
        assert_eq!(record.year.as_deref(), Some("2023"));
        assert_eq!(record.venue.as_deref(), Some("Nature"));
        assert_eq!(record.citations, Some(12));
        assert_eq!(record.source_id.as_deref(), Some("NfwzqKoAAAAJ:u5HHmVD_uO8C"));
    }

    #[test]
    fn test_normalize_scholar_fallbacks() {
        let record = normalize_scholar(&json!({"bib": {}}), "Tran, Quan");

        assert_eq!(record.title, UNKNOWN_TITLE);
        assert_eq!(record.authors, vec!["Tran, Quan"]);
        assert_eq!(record.year_label(), "Unknown");
        assert_eq!(record.citations, None);

        let entry = scholar_entry(&record);
        assert!(entry.starts_with("@article{tranunknown,\n"));
        assert!(entry.contains("  title={Unknown Title},\n"));
        assert!(entry.contains("  year={Unknown},\n"));
        assert!(!entry.contains("journal="));
    }

    #[test]
    fn test_scholar_entry_template() {
        let record = normalize_scholar(
            &json!({
                "pub_url": "https://example.org/p",
                "bib": {"title": "Test Paper 1", "author": "Jane Smith", "pub_year": "2023", "journal": "JMLR"}
            }),
            "Unknown Author",
        );

        assert_eq!(
            scholar_entry(&record),
            "@article{jane2023,\n  title={Test Paper 1},\n  author={Jane Smith},\n  year={2023},\n  journal={JMLR},\n  doi={https://example.org/p},\n}"
        );
    }

    #[test]
    fn test_normalize_orcid() {
        let summary = json!({
            "put-code": 123456,
            "title": {"title": {"value": "SAW-MonoDETR:  Sparse\nAttention"}},
            "publication-date": {"year": {"value": "2025"}, "month": null},
            "journal-title": {"value": "IEEE Access"},
            "external-ids": {"external-id": [
                {"external-id-type": "eid", "external-id-value": "2-s2.0-1"},
                {"external-id-type": "doi", "external-id-value": "10.1109/ACCESS.2025.1"}
            ]}
        });
        let detail = json!({
            "contributors": {"contributor": [
                {"credit-name": {"value": "Quan Tran"}},
                {"credit-name": null},
                {"credit-name": {"value": "An Nguyen"}}
            ]}
        });

        let record = normalize_orcid(&summary, &detail, "Tran, Quan");

        assert_eq!(record.title, "SAW-MonoDETR: Sparse Attention");
        assert_eq!(record.authors, vec!["Quan Tran", "An Nguyen"]);
        assert_eq!(record.year.as_deref(), Some("2025"));
        assert_eq!(record.venue.as_deref(), Some("IEEE Access"));
        assert_eq!(record.external_id.as_deref(), Some("10.1109/ACCESS.2025.1"));
        assert_eq!(record.source_id.as_deref(), Some("123456"));
    }

    #[test]
    fn test_normalize_orcid_fallbacks() {
        let summary = json!({"title": null, "publication-date": null, "journal-title": null});
        let record = normalize_orcid(&summary, &json!({}), "Tran, Quan");

        assert_eq!(record.title, UNTITLED);
        assert_eq!(record.authors, vec!["Tran, Quan"]);
        assert_eq!(record.year, None);

        let cv = cv_entry(&record);
        assert_eq!(cv.publisher, DEFAULT_VENUE);
        assert_eq!(cv.release_date, UNKNOWN_RELEASE_DATE);
        assert_eq!(cv.summary, "Source: ORCID");

        let raw = orcid_fallback_entry(&record, "2024");
        assert!(raw.contains("  journal={Journal/Conference}"));
        assert!(raw.contains("  year={2024}"));
    }

    #[test]
    fn test_orcid_citation_requires_bibtex_type() {
        let bibtex = json!({"citation": {"citation-type": "BIBTEX", "citation-value": "  @article{x, title={T}}\n"}});
        assert_eq!(orcid_citation(&bibtex).as_deref(), Some("@article{x, title={T}}"));

        let ris = json!({"citation": {"citation-type": "ris", "citation-value": "TY  - JOUR"}});
        assert_eq!(orcid_citation(&ris), None);
        assert_eq!(orcid_citation(&json!({"citation": null})), None);
    }

    #[test]
    fn test_pretty_format_rekeys_entry() {
        let raw = "@inproceedings{Tran_2025, title={SAW-MonoDETR: Sparse Attention}, Author={Tran, Quan and Nguyen, An}, year = {2025}, booktitle={ICCV}}";

        let pretty = pretty_format(raw, "SAW-MonoDETR: Sparse Attention", "Tran", "2024").unwrap();

        assert_eq!(
            pretty,
            "@inproceedings{Tran_2025_SAWMonoDETR,\n  title        = {SAW-MonoDETR: Sparse Attention},\n  author       = {Tran, Quan and Nguyen, An},\n  year         = {2025},\n  booktitle    = {ICCV}\n}"
        );
    }

    #[test]
    fn test_pretty_format_uses_fallback_year() {
        let pretty = pretty_format("@misc{k, title={Notes}}", "Notes", "Ref", "2024").unwrap();
        assert!(pretty.starts_with("@misc{Ref_2024_Notes,"));
    }

    #[test]
    fn test_render_falls_back_to_raw_text() {
        let raw = "TY  - JOUR\nTI  - Not BibTeX";
        assert_eq!(render_orcid_entry(raw, "Not BibTeX", "Ref", "2024"), raw);
    }
}
