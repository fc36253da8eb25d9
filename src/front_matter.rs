use std::{collections::HashMap, path::Path};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

use crate::error::{CardError, Result};

const KEY_TITLE: &str = "title";
const KEY_AUTHOR: &str = "author";
const KEY_CATEGORIES: &str = "categories";
const KEY_TAGS: &str = "tags";
const KEY_LASTMOD: &str = "lastmod";
const KEY_DATE: &str = "date";

/// The parts of a Hugo content header that end up on a card.
#[derive(Clone, Debug, PartialEq)]
pub struct FrontMatter {
    pub title: String,
    pub author: String,
    pub category: String,
    pub tags: Vec<String>,
    /// `lastmod`, else `date`, else the time of parsing.
    pub date: DateTime<FixedOffset>,
}

/// Reads the front matter of a Hugo content file.
pub fn read_front_matter(path: &Path) -> Result<FrontMatter> {
    let content = std::fs::read_to_string(path).map_err(|e| CardError::io(path, e))?;
    parse_front_matter(&content, chrono::Local::now().fixed_offset())
}

/// Parses YAML (`---`) or TOML (`+++`) front matter.
///
/// `now` is used when the header carries no date.
pub fn parse_front_matter(content: &str, now: DateTime<FixedOffset>) -> Result<FrontMatter> {
    let fields = match split_header(content)? {
        Some((Format::Yaml, header)) => yaml_fields(header)?,
        Some((Format::Toml, header)) => toml_fields(header)?,
        None => HashMap::new(),
    };

    let title = match fields.get(KEY_TITLE) {
        Some(Field::Text(title)) if !title.is_empty() => title.clone(),
        Some(Field::Text(_)) | None => return Err(CardError::FrontMatterMissing(KEY_TITLE)),
        Some(other) => return Err(invalid(KEY_TITLE, "string", other)),
    };
    let author = first_item(&fields, KEY_AUTHOR)?;
    let category = first_item(&fields, KEY_CATEGORIES)?;

    let tags: Vec<String> = match fields.get(KEY_TAGS) {
        Some(Field::List(items)) => items.iter().filter(|t| !t.is_empty()).map(|t| title_case(t)).collect(),
        Some(Field::Text(tag)) if !tag.is_empty() => vec![title_case(tag)],
        Some(other @ Field::Other(_)) => return Err(invalid(KEY_TAGS, "string array", other)),
        _ => Vec::new(),
    };
    if tags.is_empty() {
        return Err(CardError::FrontMatterMissing(KEY_TAGS));
    }

    let date = match [KEY_LASTMOD, KEY_DATE]
        .into_iter()
        .find_map(|key| fields.get(key).map(|field| (key, field)))
    {
        Some((key, Field::Text(raw))) => parse_date(key, raw, now.offset())?,
        Some((key, other)) => return Err(invalid(key, "date", other)),
        None => now,
    };

    Ok(FrontMatter {
        title,
        author,
        category,
        tags,
        date,
    })
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Format {
    Yaml,
    Toml,
}

/// Flattened front-matter value. Scalars become text.
#[derive(Clone, Debug, PartialEq)]
enum Field {
    Text(String),
    List(Vec<String>),
    Other(&'static str),
}

/// Returns the header between the opening and closing fence, if any.
fn split_header(content: &str) -> Result<Option<(Format, &str)>> {
    let content = content.trim_start_matches('\u{feff}');
    let mut lines = content.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return Ok(None);
    };
    let (format, fence) = match first.trim_end() {
        "---" => (Format::Yaml, "---"),
        "+++" => (Format::Toml, "+++"),
        _ => return Ok(None),
    };

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end() == fence {
            return Ok(Some((format, &content[start..offset])));
        }
        offset += line.len();
    }

    Err(CardError::FrontMatterInvalid {
        key: "front matter",
        want: "a closed header",
        detail: format!("missing closing {fence:?}"),
    })
}

fn yaml_fields(header: &str) -> Result<HashMap<String, Field>> {
    use serde_yaml::Value;

    fn scalar(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    let value: Value = serde_yaml::from_str(header).map_err(|e| CardError::FrontMatterInvalid {
        key: "front matter",
        want: "YAML",
        detail: e.to_string(),
    })?;

    let mapping = match value {
        Value::Mapping(mapping) => mapping,
        Value::Null => return Ok(HashMap::new()),
        _ => {
            return Err(CardError::FrontMatterInvalid {
                key: "front matter",
                want: "YAML mapping",
                detail: "header is not a key/value mapping".into(),
            });
        }
    };

    let mut fields = HashMap::new();
    for (key, value) in &mapping {
        let Some(key) = key.as_str() else { continue };
        let field = match value {
            Value::Sequence(items) => Field::List(items.iter().filter_map(scalar).collect()),
            Value::Mapping(_) => Field::Other("mapping"),
            Value::Null => continue,
            other => match scalar(other) {
                Some(text) => Field::Text(text),
                None => Field::Other("tagged value"),
            },
        };
        fields.insert(key.to_string(), field);
    }
    Ok(fields)
}

fn toml_fields(header: &str) -> Result<HashMap<String, Field>> {
    use toml::Value;

    fn scalar(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Boolean(b) => Some(b.to_string()),
            Value::Datetime(dt) => Some(dt.to_string()),
            _ => None,
        }
    }

    let table: toml::Table = header.parse().map_err(|e: toml::de::Error| {
        CardError::FrontMatterInvalid {
            key: "front matter",
            want: "TOML",
            detail: e.to_string(),
        }
    })?;

    let mut fields = HashMap::new();
    for (key, value) in &table {
        let field = match value {
            Value::Array(items) => Field::List(items.iter().filter_map(scalar).collect()),
            Value::Table(_) => Field::Other("table"),
            other => match scalar(other) {
                Some(text) => Field::Text(text),
                None => Field::Other("value"),
            },
        };
        fields.insert(key.clone(), field);
    }
    Ok(fields)
}

/// First non-empty entry of a string or a string array.
fn first_item(fields: &HashMap<String, Field>, key: &'static str) -> Result<String> {
    let item = match fields.get(key) {
        Some(Field::Text(text)) => Some(text),
        Some(Field::List(items)) => items.first(),
        Some(other) => return Err(invalid(key, "string array", other)),
        None => None,
    };

    match item {
        Some(item) if !item.is_empty() => Ok(item.clone()),
        _ => Err(CardError::FrontMatterMissing(key)),
    }
}

fn parse_date(key: &'static str, raw: &str, offset: &FixedOffset) -> Result<DateTime<FixedOffset>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(date);
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(|date| date.and_hms_opt(0, 0, 0).unwrap_or_default())
        })
        .map_err(|e| CardError::FrontMatterInvalid {
            key,
            want: "date",
            detail: format!("{raw:?}: {e}"),
        })?;

    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| CardError::FrontMatterInvalid {
            key,
            want: "date",
            detail: format!("{raw:?} is ambiguous"),
        })
}

fn invalid(key: &'static str, want: &'static str, got: &Field) -> CardError {
    let got = match got {
        Field::Text(_) => "string",
        Field::List(_) => "array",
        Field::Other(kind) => *kind,
    };
    CardError::FrontMatterInvalid {
        key,
        want,
        detail: format!("got {got}"),
    }
}

/// Capitalizes every word unless the tag is already all uppercase.
fn title_case(tag: &str) -> String {
    if tag.chars().all(char::is_uppercase) {
        return tag.to_string();
    }

    let mut out = String::with_capacity(tag.len());
    let mut at_word_start = true;
    for ch in tag.chars() {
        if at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = !(ch.is_alphanumeric() || ch == '_');
    }
    out
}
