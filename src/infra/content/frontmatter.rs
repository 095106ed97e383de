//! Front-matter extraction from YAML (`---`) or TOML (`+++`) blocks.
//!
//! The YAML side only understands flat `key: value` lines, which is all the
//! content schema uses; nested mappings and list items are skipped.

use std::borrow::Cow;
use std::iter::Peekable;

use serde::Deserialize;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrontMatterError {
    #[error("invalid TOML front-matter: {0}")]
    Toml(String),
    #[error("invalid `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Parsed front-matter fields used by the content schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub published_at: Option<OffsetDateTime>,
    pub draft: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTomlFrontMatter {
    title: Option<String>,
    description: Option<String>,
    #[serde(rename = "publishedAt", alias = "published_at")]
    published_at: Option<toml::Value>,
    draft: Option<bool>,
}

#[derive(Clone, Copy)]
enum Syntax {
    Yaml,
    Toml,
}

/// Split `content` into front-matter and body.
///
/// Returns the parsed front-matter (default when no block is present) and the
/// body following the closing delimiter line, unmodified.
pub fn parse_front_matter(content: &str) -> Result<(FrontMatter, &str), FrontMatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    match detect_block(content) {
        Some((Syntax::Yaml, block, body)) => Ok((parse_yaml_like(block)?, body)),
        Some((Syntax::Toml, block, body)) => Ok((parse_toml(block)?, body)),
        None => Ok((FrontMatter::default(), content)),
    }
}

/// Parse a `publishedAt` value: RFC 3339, a local date-time, or a bare date.
///
/// Values without an offset are taken as UTC. The date and time may be
/// separated by `T` or a single space.
pub fn parse_published_at(value: &str) -> Result<OffsetDateTime, FrontMatterError> {
    let original = value.trim();
    // YAML also allows a space between the date and the time.
    let spaced;
    let value = if original.as_bytes().get(10) == Some(&b' ') {
        spaced = format!("{}T{}", &original[..10], original[11..].trim_start());
        spaced.as_str()
    } else {
        original
    };

    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        return Ok(parsed);
    }
    if let Ok(parsed) = PrimitiveDateTime::parse(
        value,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return Ok(parsed.assume_utc());
    }
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map(|date| date.midnight().assume_utc())
        .map_err(|err| FrontMatterError::InvalidField {
            field: "publishedAt",
            reason: format!("`{original}` is not a date: {err}"),
        })
}

fn detect_block(content: &str) -> Option<(Syntax, &str, &str)> {
    for (marker, syntax) in [("---", Syntax::Yaml), ("+++", Syntax::Toml)] {
        let Some(first_line_end) = content.find('\n') else {
            continue;
        };
        if content[..first_line_end].trim_end() != marker {
            continue;
        }

        let rest = &content[first_line_end + 1..];
        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.trim_end() == marker {
                return Some((syntax, &rest[..offset], &rest[offset + line.len()..]));
            }
            offset += line.len();
        }
    }

    None
}

fn parse_yaml_like(block: &str) -> Result<FrontMatter, FrontMatterError> {
    let mut meta = FrontMatter::default();
    let mut lines = block.lines().peekable();

    while let Some(line) = lines.next() {
        // Indented lines belong to nested mappings or lists.
        if line.starts_with([' ', '\t', '-']) {
            continue;
        }
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, raw)) = line.split_once(':') else {
            continue;
        };
        let raw = strip_comment(raw.trim());
        let value = match BlockStyle::from_indicator(raw) {
            Some(style) => Cow::Owned(style.collect(&mut lines)),
            None => unquote(raw),
        };
        let value: &str = &value;

        match key.trim() {
            "title" => meta.title = non_empty(value),
            "description" => meta.description = non_empty(value),
            "publishedAt" | "published_at" => {
                meta.published_at = match non_empty(value) {
                    Some(value) => Some(parse_published_at(&value)?),
                    None => None,
                };
            }
            "draft" => meta.draft = parse_bool("draft", value)?,
            _ => {}
        }
    }

    Ok(meta)
}

/// `|` keeps line breaks, `>` folds them into spaces. Chomping and
/// indentation indicators are accepted; values are trimmed afterwards anyway.
#[derive(Clone, Copy)]
enum BlockStyle {
    Literal,
    Folded,
}

impl BlockStyle {
    fn from_indicator(value: &str) -> Option<Self> {
        let mut chars = value.chars();
        let style = match chars.next()? {
            '|' => BlockStyle::Literal,
            '>' => BlockStyle::Folded,
            _ => return None,
        };
        chars
            .all(|ch| matches!(ch, '+' | '-' | '1'..='9'))
            .then_some(style)
    }

    /// Consume the indented (or blank) lines that form the block body.
    fn collect<'a, I>(self, lines: &mut Peekable<I>) -> String
    where
        I: Iterator<Item = &'a str>,
    {
        let mut body = Vec::new();
        while let Some(line) = lines.next_if(|line| {
            line.trim().is_empty() || line.starts_with([' ', '\t'])
        }) {
            body.push(line);
        }

        let indent = body
            .iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.len() - line.trim_start().len())
            .min()
            .unwrap_or(0);
        let body = body
            .iter()
            .map(|line| line.get(indent..).unwrap_or("").trim_end());

        match self {
            BlockStyle::Literal => body.collect::<Vec<_>>().join("\n"),
            BlockStyle::Folded => {
                let mut folded = String::new();
                for line in body {
                    if line.is_empty() {
                        folded.push('\n');
                    } else {
                        if !folded.is_empty() && !folded.ends_with('\n') {
                            folded.push(' ');
                        }
                        folded.push_str(line);
                    }
                }
                folded
            }
        }
    }
}

/// Cut a trailing ` # comment`, ignoring `#` inside quoted scalars.
fn strip_comment(value: &str) -> &str {
    let mut quote = None;
    let mut escaped = false;
    let mut after_space = true;

    for (idx, ch) in value.char_indices() {
        match quote {
            Some('"') if escaped => escaped = false,
            Some('"') if ch == '\\' => escaped = true,
            Some(open) if ch == open => quote = None,
            Some(_) => {}
            None if ch == '#' && after_space => return value[..idx].trim_end(),
            None if idx == 0 && matches!(ch, '"' | '\'') => quote = Some(ch),
            None => {}
        }
        after_space = ch.is_whitespace();
    }

    value
}

fn parse_toml(block: &str) -> Result<FrontMatter, FrontMatterError> {
    let raw: RawTomlFrontMatter =
        toml::from_str(block).map_err(|err| FrontMatterError::Toml(err.to_string()))?;

    let published_at = match raw.published_at {
        None => None,
        Some(toml::Value::Datetime(datetime)) => Some(parse_published_at(&datetime.to_string())?),
        Some(toml::Value::String(text)) => Some(parse_published_at(&text)?),
        Some(other) => {
            return Err(FrontMatterError::InvalidField {
                field: "publishedAt",
                reason: format!("expected a date, found {}", other.type_str()),
            });
        }
    };

    Ok(FrontMatter {
        title: raw.title.and_then(|t| non_empty(&t)),
        description: raw.description.and_then(|d| non_empty(&d)),
        published_at,
        draft: raw.draft.unwrap_or(false),
    })
}

/// Strip matching quotes, undoing `''` in single-quoted and `\"`/`\\` in
/// double-quoted scalars.
fn unquote(value: &str) -> Cow<'_, str> {
    if value.len() >= 2 {
        if let Some(inner) = value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')) {
            return Cow::Owned(inner.replace("''", "'"));
        }
        if let Some(inner) = value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
            let mut out = String::with_capacity(inner.len());
            let mut chars = inner.chars();
            while let Some(ch) = chars.next() {
                match (ch, chars.clone().next()) {
                    ('\\', Some(next @ ('"' | '\\'))) => {
                        out.push(next);
                        chars.next();
                    }
                    _ => out.push(ch),
                }
            }
            return Cow::Owned(out);
        }
    }
    Cow::Borrowed(value)
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_bool(field: &'static str, value: &str) -> Result<bool, FrontMatterError> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") || value.is_empty() {
        Ok(false)
    } else {
        Err(FrontMatterError::InvalidField {
            field,
            reason: format!("expected `true` or `false`, found `{value}`"),
        })
    }
}
