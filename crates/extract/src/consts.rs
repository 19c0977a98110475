use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

const SAFE_END: &str = "(?:$|\\?|#|/)";

pub(crate) const CATALOG_BASE: &str = "https://comic-walker.com";
pub(crate) const FEED_BASE: &str = "https://kakuyomu.jp";

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Source identification. Each publisher is first recognised by its host and
// path shape; the identifiers are then pulled out with a stricter pattern so
// that a recognised-but-mangled URL is reported as unparsable, not unsupported.
regex!(CATALOG_EPISODE_URL_REGEX, r"^https?://(?:www\.)?comic-walker\.com/detail/([^/?#]*)/episodes/");
regex!(SERIES_CODE_REGEX, r"^[A-Za-z0-9]+_[A-Za-z0-9]+_S$");
regex!(REDIRECT_EPISODE_URL_REGEX, r"^https?://(?:www\.)?comic-action\.com/episode/[^/?#]+");
regex!(FEED_EPISODE_PATH_REGEX, r"^https?://(?:www\.)?kakuyomu\.jp/works/[^?#]*/episodes/");
regex!(
    FEED_EPISODE_URL_REGEX,
    format!(r"^https?://(?:www\.)?kakuyomu\.jp/works/(\d+)/episodes/(\d+){}", SAFE_END).as_str()
);

// Page text.
selector!(TITLE_SELECTOR, "title");
selector!(NEXT_DATA_SELECTOR, r#"script#__NEXT_DATA__"#);

// Catalog site: episode codes look like `KC_0039130008900011_E`.
regex!(GENERIC_EPISODE_CODE_REGEX, r"[A-Z]{2}_\d+_E");
regex!(CATALOG_TITLE_REGEX, r"^【([^】]+)】\s*(.+)$");

// Redirect site: the reader page embeds a pointer to the next readable episode,
// sometimes inside an HTML attribute where the quotes are entity-escaped.
regex!(NEXT_POINTER_REGEX, r#"nextReadableProductUri"\s*:\s*"(https?://[^"]+)""#);
regex!(NEXT_POINTER_ESCAPED_REGEX, r"nextReadableProductUri&quot;\s*:\s*&quot;(https?://[^&]+)&quot;");

// Feed site: `"Episode:822139844009936710":{...,"id":"822139844009936710","title":"...","publishedAt":"2026-01-27T08:00:03Z"}`
regex!(
    FEED_EPISODE_REGEX,
    r#""Episode:(\d+)"\s*:\s*\{[^}]*?"id"\s*:\s*"(\d+)"[^}]*?"title"\s*:\s*"((?:[^"\\]|\\.)+)"[^}]*?"publishedAt"\s*:\s*"([^"]+)""#
);
