//! Redirect site: each reader page points at the next readable episode.

use tracing::instrument;

use super::Titles;
use crate::consts;

/// Finds the "next readable episode" pointer in the raw page text.
///
/// The pointer usually sits in an inline JSON blob, but also appears inside
/// HTML attributes where the quotes are entity-escaped; both are tried.
///
/// ```rust
/// use mwatch_extract::sites::redirect::next_readable;
/// let html = r#"<script>{"nextReadableProductUri":"https://comic-action.com/episode/2"}</script>"#;
/// assert_eq!(next_readable(html).as_deref(), Some("https://comic-action.com/episode/2"));
/// ```
#[instrument(level = "trace", skip(html), fields(html_size = html.len()))]
pub fn next_readable(html: &str) -> Option<String> {
    [&*consts::NEXT_POINTER_REGEX, &*consts::NEXT_POINTER_ESCAPED_REGEX]
        .into_iter()
        .find_map(|re| re.captures(html)?.get(1).map(|m| m.as_str().to_string()))
}

/// Parses a reader page title of the form
/// `第39話 / ダンジョンの中のひと - 双見酔 | webアクション`.
///
/// With fewer than two `/`-separated parts before the `|`, neither title can
/// be read.
pub fn parse_title(title: &str) -> Titles {
    let main = title.split('|').next().unwrap_or_default().trim();
    let parts: Vec<&str> = main.split('/').map(str::trim).collect();
    match parts.as_slice() {
        [episode, rest, ..] => Titles::new(rest.split('-').next(), Some(*episode)),
        _ => Titles::default(),
    }
}
