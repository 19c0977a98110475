//! Generic page-text helpers shared by every site parser.

use scraper::Html;
use serde_json::Value;
use tracing::instrument;

use crate::consts;

/// A parsed HTML page.
///
/// The parsed document is not `Send`; pull the strings you need out of it
/// before awaiting anything.
#[derive(Debug)]
pub struct Page {
    document: Html,
}
impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// The document `<title>`, with runs of whitespace collapsed.
    pub fn title(&self) -> Option<String> {
        self.document
            .select(&consts::TITLE_SELECTOR)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .filter(|s| !s.is_empty())
    }

    /// The raw text of the embedded `__NEXT_DATA__` JSON script, untouched.
    pub fn payload(&self) -> Option<String> {
        self.document
            .select(&consts::NEXT_DATA_SELECTOR)
            .next()
            .map(|el| el.text().collect::<String>())
            .filter(|s| !s.trim().is_empty())
    }
}

/// Extracts the HTML `<title>` of a page.
///
/// # Examples
///
/// ```rust
/// use mwatch_extract::page::html_title;
/// let html = "<html><head><title>\n  第39話 /\n  ダンジョン  </title></head></html>";
/// assert_eq!(html_title(html).as_deref(), Some("第39話 / ダンジョン"));
/// assert_eq!(html_title("<p>no title</p>"), None);
/// ```
#[instrument(level = "trace", skip(html), fields(html_size = html.len()))]
pub fn html_title(html: &str) -> Option<String> {
    Page::parse(html).title()
}

/// Extracts the raw text of the embedded JSON payload script.
#[instrument(level = "trace", skip(html), fields(html_size = html.len()))]
pub fn embedded_payload(html: &str) -> Option<String> {
    Page::parse(html).payload()
}

/// Depth-first search for the first non-blank string stored under any of
/// `keys`, anywhere in an arbitrarily nested JSON value.
///
/// At each object the direct children are checked before descending, so a
/// shallow match always beats a deeper one in the same object.
///
/// # Examples
///
/// ```rust
/// use mwatch_extract::page::find_first;
/// let value = serde_json::json!({"a": [{"b": {"title": "  deep  "}}], "name": ""});
/// assert_eq!(find_first(&value, &["name", "title"]), Some("deep"));
/// ```
pub fn find_first<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    match value {
        Value::Object(map) => {
            let direct = map.iter().find_map(|(key, value)| match value {
                Value::String(s) if keys.contains(&key.as_str()) && !s.trim().is_empty() => Some(s.trim()),
                _ => None,
            });
            direct.or_else(|| map.values().find_map(|child| find_first(child, keys)))
        },
        Value::Array(items) => items.iter().find_map(|item| find_first(item, keys)),
        _ => None,
    }
}

/// Depth-first search for the first value stored under `key`, at any depth.
pub fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(key).or_else(|| map.values().find_map(|child| find_key(child, key))),
        Value::Array(items) => items.iter().find_map(|item| find_key(item, key)),
        _ => None,
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
