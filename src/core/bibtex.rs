//! `nom` reader for `@type{key, field = value, ...}` blocks.
//!
//! Values keep their source text (`raw`) so a reformatted entry reproduces
//! braces, quotes and `#` concatenations exactly; `text` is the value with
//! a single outer brace or quote pair removed.

use crate::utils::error::{Result, SyncError};
use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{anychar, char, multispace0},
    combinator::recognize,
    multi::many0,
    sequence::{delimited, pair},
    IResult,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibField {
    pub name: String,
    pub raw: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry {
    pub entry_type: String,
    pub key: String,
    pub fields: Vec<BibField>,
}

impl BibEntry {
    /// Field lookup, case-insensitive on the field name.
    pub fn field(&self, name: &str) -> Option<&BibField> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
    }
}

/// Parse the first entry in `input`; anything before the first `@` is ignored.
pub fn parse_entry(input: &str) -> Result<BibEntry> {
    let start = input.find('@').ok_or_else(|| SyncError::BibParseError {
        position: 0,
        message: "no '@' entry marker found".to_string(),
    })?;

    let source = &input[start..];
    match entry(source) {
        Ok((_, entry)) => Ok(entry),
        Err(e) => Err(parse_error(source, start, e)),
    }
}

/// Re-emit `entry` under `key`, one field per line with aligned names.
pub fn format_entry(entry: &BibEntry, key: &str) -> String {
    let fields = entry
        .fields
        .iter()
        .map(|field| format!("  {:<12} = {}", field.name.to_lowercase(), field.raw))
        .collect::<Vec<_>>()
        .join(",\n");

    if fields.is_empty() {
        format!("@{}{{{},\n}}", entry.entry_type, key)
    } else {
        format!("@{}{{{},\n{}\n}}", entry.entry_type, key, fields)
    }
}

fn parse_error(source: &str, offset: usize, err: nom::Err<nom::error::Error<&str>>) -> SyncError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let near = if e.input.is_empty() {
                "end of input".to_string()
            } else {
                format!("{:?}", e.input.chars().take(16).collect::<String>())
            };
            SyncError::BibParseError {
                position: offset + source.len() - e.input.len(),
                message: format!("{} near {}", e.code.description(), near),
            }
        }
        nom::Err::Incomplete(_) => SyncError::BibParseError {
            position: offset + source.len(),
            message: "unexpected end of input".to_string(),
        },
    }
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || "_-:.+".contains(c))(input)
}

// entry := '@' type ('{' | '(') key [',' fields] ('}' | ')')
fn entry(input: &str) -> IResult<&str, BibEntry> {
    let (rest, _) = char('@')(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, entry_type) = identifier(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, open) = alt((char('{'), char('(')))(rest)?;
    let close = if open == '{' { '}' } else { ')' };

    let (rest, _) = multispace0(rest)?;
    let (rest, key) = take_while(|c: char| c != ',' && c != close && !c.is_whitespace())(rest)?;
    let (rest, _) = multispace0(rest)?;

    let mut entry = BibEntry {
        entry_type: entry_type.to_string(),
        key: key.to_string(),
        fields: Vec::new(),
    };

    if let Ok((rest, _)) = char::<&str, nom::error::Error<&str>>(close)(rest) {
        return Ok((rest, entry));
    }
    let (rest, _) = char(',')(rest)?;

    let (rest, fields) = fields(rest, close)?;
    entry.fields = fields;
    Ok((rest, entry))
}

// fields := (field (',' field)* [','])? close
fn fields(input: &str, close: char) -> IResult<&str, Vec<BibField>> {
    let mut fields = Vec::new();
    let mut remaining = input;

    loop {
        let (rest, _) = multispace0(remaining)?;
        if let Some(rest) = rest.strip_prefix(close) {
            return Ok((rest, fields));
        }

        let (rest, field) = field(rest, close)?;
        fields.push(field);

        let (rest, _) = multispace0(rest)?;
        let (rest, separator) = alt((char(','), char(close)))(rest)?;
        if separator == close {
            return Ok((rest, fields));
        }
        remaining = rest;
    }
}

// field := name '=' value
fn field(input: &str, close: char) -> IResult<&str, BibField> {
    let (rest, name) = identifier(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, (raw, text)) = value(rest, close)?;

    Ok((
        rest,
        BibField {
            name: name.to_string(),
            raw,
            text,
        },
    ))
}

/// One braced, quoted or bare value piece.
fn piece(input: &str, close: char) -> IResult<&str, &str> {
    alt((
        braced,
        quoted,
        take_while1(move |c: char| !c.is_whitespace() && !",#\"{}".contains(c) && c != close),
    ))(input)
}

// value := piece ('#' piece)*
fn value(input: &str, close: char) -> IResult<&str, (String, String)> {
    let (mut rest, first) = piece(input, close)?;
    let mut pieces = 1;

    loop {
        let (after, _) = multispace0(rest)?;
        let Some(next) = after.strip_prefix('#') else {
            let raw = &input[..input.len() - rest.len()];
            let text = if pieces == 1 && (first.starts_with('{') || first.starts_with('"')) {
                &first[1..first.len() - 1]
            } else {
                raw
            };
            return Ok((rest, (raw.to_string(), text.to_string())));
        };

        let (next, _) = multispace0(next)?;
        let (next, _) = piece(next, close)?;
        pieces += 1;
        rest = next;
    }
}

fn escaped(input: &str) -> IResult<&str, &str> {
    recognize(pair(char('\\'), anychar))(input)
}

/// `{...}` with nested braces; returns the slice including delimiters.
fn braced(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char('{'),
        many0(alt((
            take_while1(|c: char| c != '{' && c != '}' && c != '\\'),
            escaped,
            braced,
        ))),
        char('}'),
    ))(input)
}

/// `"..."`; quotes inside braces do not terminate the value.
fn quoted(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char('"'),
        many0(alt((
            take_while1(|c: char| c != '"' && c != '{' && c != '\\'),
            escaped,
            braced,
        ))),
        char('"'),
    ))(input)
}
