//! `cv.sections.Publications` replacement.
//!
//! The document is parsed once to check its shape, but the new list is
//! spliced in at the line level so every other line keeps its original
//! formatting, comments and quoting.

use crate::domain::model::CvPublication;
use crate::utils::error::{Result, SyncError};

const PUBLICATIONS_KEY: &str = "Publications";

fn release_year(release_date: &str) -> Option<i32> {
    let digits: String = release_date.trim().chars().take(4).collect();
    if digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}

/// Newest first; stable, entries without a usable year go last.
pub fn sort_by_release_desc(publications: &mut [CvPublication]) {
    publications.sort_by(|a, b| release_year(&b.release_date).cmp(&release_year(&a.release_date)));
}

#[derive(Debug, Clone, Copy)]
struct KeyLine {
    line: usize,
    indent: usize,
    /// byte offset just past the key's `:`
    key_end: usize,
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn is_content(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}

fn is_sequence_item(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed == "-" || trimmed.starts_with("- ")
}

/// `key:` / `"key":` / `'key':` at the start of the trimmed line.
fn match_key(line: &str, key: &str) -> Option<usize> {
    let indent = indent_of(line);
    let rest = &line[indent..];

    let after = [format!("{}:", key), format!("\"{}\":", key), format!("'{}':", key)]
        .into_iter()
        .find(|candidate| rest.starts_with(candidate.as_str()))?;

    let tail = &rest[after.len()..];
    if tail.is_empty() || tail.starts_with(char::is_whitespace) {
        Some(indent + after.len())
    } else {
        None
    }
}

/// Text after a key's `:` with any trailing comment removed.
fn inline_value(line: &str, key_end: usize) -> &str {
    let tail = &line[key_end..];
    let tail = match tail.find(" #") {
        Some(pos) => &tail[..pos],
        None => tail,
    };
    tail.trim()
}

/// End (exclusive) of the block owned by the key on `start`, trailing
/// blank and comment lines excluded.
fn block_end(lines: &[&str], start: usize, indent: usize) -> usize {
    let mut end = start + 1;
    for (i, line) in lines.iter().enumerate().skip(start + 1) {
        if !is_content(line) {
            continue;
        }
        let line_indent = indent_of(line);
        if line_indent > indent || (line_indent == indent && is_sequence_item(line)) {
            end = i + 1;
        } else {
            break;
        }
    }
    end
}

fn find_key(lines: &[&str], from: usize, to: usize, indent: usize, key: &str) -> Option<KeyLine> {
    (from..to)
        .filter(|&i| is_content(lines[i]) && indent_of(lines[i]) == indent)
        .find_map(|i| {
            match_key(lines[i], key).map(|key_end| KeyLine {
                line: i,
                indent,
                key_end,
            })
        })
}

fn child_indent(lines: &[&str], parent: KeyLine, end: usize) -> Option<usize> {
    (parent.line + 1..end)
        .find(|&i| is_content(lines[i]))
        .map(|i| indent_of(lines[i]))
        .filter(|&indent| indent > parent.indent)
}

fn find_child(lines: &[&str], parent: KeyLine, key: &str) -> Result<(KeyLine, usize)> {
    let end = block_end(lines, parent.line, parent.indent);
    let indent = child_indent(lines, parent, end).ok_or_else(|| {
        SyncError::processing(format!("CV key '{}' has no nested block", key))
    })?;
    let child = find_key(lines, parent.line + 1, end, indent, key).ok_or_else(|| {
        SyncError::processing(format!("CV layout not supported: cannot locate '{}'", key))
    })?;
    Ok((child, end))
}

fn render_list(header: &str, item_indent: usize, publications: &[CvPublication]) -> Result<Vec<String>> {
    if publications.is_empty() {
        return Ok(vec![format!("{} []", header)]);
    }

    let yaml = serde_yaml::to_string(publications)?;
    let pad = " ".repeat(item_indent);

    let mut rendered = vec![header.to_string()];
    rendered.extend(yaml.lines().map(|line| format!("{}{}", pad, line)));
    Ok(rendered)
}

fn publications_count(document: &str) -> Option<usize> {
    let parsed: serde_yaml::Value = serde_yaml::from_str(document).ok()?;
    let list = parsed.get("cv")?.get("sections")?.get(PUBLICATIONS_KEY)?;
    match list {
        serde_yaml::Value::Sequence(items) => Some(items.len()),
        _ => None,
    }
}

/// Replace `cv.sections.Publications` in `document` with `publications`,
/// inserting the key at the end of `sections` when absent.
pub fn replace_publications(document: &str, publications: &[CvPublication]) -> Result<String> {
    let parsed: serde_yaml::Value = serde_yaml::from_str(document)?;
    let has_sections = parsed
        .get("cv")
        .and_then(|cv| cv.get("sections"))
        .map(serde_yaml::Value::is_mapping)
        .unwrap_or(false);
    if !has_sections {
        return Err(SyncError::processing("CV document has no cv.sections mapping"));
    }

    let lines: Vec<&str> = document.split('\n').collect();

    let cv = find_key(&lines, 0, lines.len(), 0, "cv")
        .ok_or_else(|| SyncError::processing("CV layout not supported: cannot locate 'cv'"))?;
    let (sections, _) = find_child(&lines, cv, "sections")?;

    // `sections: {}` 展開成區塊；其他 flow 寫法不支援
    let inline = inline_value(lines[sections.line], sections.key_end);
    if inline == "{}" {
        let indent = sections.indent + 2;
        let header = format!("{}{}:", " ".repeat(indent), PUBLICATIONS_KEY);
        let mut output: Vec<String> = lines[..sections.line].iter().map(|l| l.to_string()).collect();
        output.push(lines[sections.line][..sections.key_end].to_string());
        output.extend(render_list(&header, indent + 2, publications)?);
        output.extend(lines[sections.line + 1..].iter().map(|l| l.to_string()));
        return verified(output.join("\n"), publications.len());
    }
    if !inline.is_empty() {
        return Err(SyncError::processing(
            "CV layout not supported: cv.sections is written as an inline flow mapping",
        ));
    }

    let sections_end = block_end(&lines, sections.line, sections.indent);

    let (replace_from, replace_to, rendered) =
        match child_indent(&lines, sections, sections_end).and_then(|indent| {
            find_key(&lines, sections.line + 1, sections_end, indent, PUBLICATIONS_KEY)
        }) {
            Some(existing) => {
                let end = block_end(&lines, existing.line, existing.indent);
                // 沿用原本清單的縮排風格
                let item_indent = (existing.line + 1..end)
                    .find(|&i| is_content(lines[i]))
                    .map(|i| indent_of(lines[i]))
                    .unwrap_or(existing.indent + 2);
                let header = &lines[existing.line][..existing.key_end];
                (existing.line, end, render_list(header, item_indent, publications)?)
            }
            None => {
                let indent =
                    child_indent(&lines, sections, sections_end).unwrap_or(sections.indent + 2);
                let header = format!("{}{}:", " ".repeat(indent), PUBLICATIONS_KEY);
                (
                    sections_end,
                    sections_end,
                    render_list(&header, indent + 2, publications)?,
                )
            }
        };

    let mut output: Vec<String> = Vec::with_capacity(lines.len() + rendered.len());
    output.extend(lines[..replace_from].iter().map(|line| line.to_string()));
    output.extend(rendered);
    output.extend(lines[replace_to..].iter().map(|line| line.to_string()));
    verified(output.join("\n"), publications.len())
}

fn verified(updated: String, expected: usize) -> Result<String> {
    if publications_count(&updated) != Some(expected) {
        return Err(SyncError::processing(
            "Updated CV document does not contain the new publications list",
        ));
    }
    Ok(updated)
}
