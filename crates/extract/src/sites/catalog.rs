//! Catalog site: series pages embed every episode code in a JSON payload.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use exn::OptionExt;
use regex::{Regex, escape as regex_escape};
use tracing::instrument;

use super::Titles;
use crate::consts;
use crate::error::{ErrorKind, Result};

/// Series page URL for a series code.
pub fn series_url(series_code: &str) -> String {
    format!("{}/detail/{series_code}", consts::CATALOG_BASE)
}

/// Reader URL for a specific episode of a series.
pub fn episode_url(series_code: &str, episode_code: &str) -> String {
    format!("{}/detail/{series_code}/episodes/{episode_code}?episodeType=latest", consts::CATALOG_BASE)
}

/// The part of a series code that every one of its episode codes starts with:
/// the series code minus its trailing `_S`.
///
/// ```rust
/// use mwatch_extract::sites::catalog::episode_prefix;
/// assert_eq!(episode_prefix("KC_003913_S"), "KC_003913");
/// ```
pub fn episode_prefix(series_code: &str) -> &str {
    let cut = series_code.char_indices().rev().nth(1).map(|(i, _)| i).unwrap_or(0);
    &series_code[..cut]
}

/// Collects every episode code mentioned in the raw payload text.
///
/// Codes belonging to the series (`<prefix><digits>_E`) are preferred; only if
/// there are none does the looser `<AA>_<digits>_E` grammar apply.
pub fn episode_codes(payload: &str, series_code: &str) -> BTreeSet<String> {
    let prefix = episode_prefix(series_code);
    let own: BTreeSet<String> = Regex::new(&format!(r"{}\d+_E", regex_escape(prefix)))
        .map(|re| re.find_iter(payload).map(|m| m.as_str().to_string()).collect())
        .unwrap_or_default();
    if !own.is_empty() {
        return own;
    }
    consts::GENERIC_EPISODE_CODE_REGEX.find_iter(payload).map(|m| m.as_str().to_string()).collect()
}

/// Picks the newest episode code mentioned in the payload.
///
/// Codes are ranked by the number that follows the series prefix. Codes that
/// don't carry the prefix rank below every code that does, and are ordered
/// among themselves by their text so the choice is stable.
///
/// # Errors
///
/// [`ErrorKind::MissingField`] if the payload mentions no episode codes.
#[instrument(level = "trace", skip(payload), fields(payload_size = payload.len()))]
pub fn latest_episode_code(payload: &str, series_code: &str) -> Result<String> {
    let prefix = episode_prefix(series_code);
    episode_codes(payload, series_code)
        .into_iter()
        .max_by(|a, b| compare_codes(a, b, prefix))
        .ok_or_raise(|| ErrorKind::MissingField("episode codes"))
}

fn compare_codes(a: &str, b: &str, prefix: &str) -> Ordering {
    sequence(a, prefix).cmp(&sequence(b, prefix)).then_with(|| a.cmp(b))
}

/// The numeric part after the prefix, as a comparable `(significant digits,
/// digits)` pair so that arbitrarily long numbers never overflow.
fn sequence<'a>(code: &'a str, prefix: &str) -> Option<(usize, &'a str)> {
    let digits = code.strip_prefix(prefix)?.strip_suffix("_E")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let significant = digits.trim_start_matches('0');
    Some((significant.len(), significant))
}

/// Parses a catalog page title.
///
/// Episode pages look like `【第61話】作品名｜サイト名`, series pages like
/// `作品名｜サイト名`.
///
/// ```rust
/// use mwatch_extract::sites::catalog::parse_title;
/// let titles = parse_title("【第61話】航宙軍士官、冒険者になる｜カドコミ (コミックウォーカー)");
/// assert_eq!(titles.series.as_deref(), Some("航宙軍士官、冒険者になる"));
/// assert_eq!(titles.episode.as_deref(), Some("第61話"));
/// ```
pub fn parse_title(title: &str) -> Titles {
    let left = title.split('｜').next().unwrap_or_default().trim();
    match consts::CATALOG_TITLE_REGEX.captures(left) {
        Some(captures) => Titles::new(
            captures.get(2).map(|m| m.as_str()),
            captures.get(1).map(|m| m.as_str()),
        ),
        None => Titles::new(Some(left), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_selects_greatest_suffix() {
        let payload = r#"{"episodes":[{"code":"KC_0039130008900005_E"},{"code":"KC_0039130008900011_E"},{"code":"KC_0039130000900099_E"}]}"#;
        assert_eq!(latest_episode_code(payload, "KC_003913_S").unwrap(), "KC_0039130008900011_E");
    }

    #[test]
    fn test_longer_suffix_wins_without_overflow() {
        let payload = "KC_003913999999999999999999999999_E KC_0039131_E";
        assert_eq!(latest_episode_code(payload, "KC_003913_S").unwrap(), "KC_003913999999999999999999999999_E");
    }

    #[test]
    fn test_falls_back_to_generic_codes() {
        let payload = r#"["KC_0012340000100011_E","KC_0012340000200011_E"]"#;
        let codes = episode_codes(payload, "KC_003913_S");
        assert_eq!(codes.len(), 2);
        // Neither carries the series prefix, so the text decides.
        assert_eq!(latest_episode_code(payload, "KC_003913_S").unwrap(), "KC_0012340000200011_E");
    }

    #[test]
    fn test_own_codes_shadow_generic_codes() {
        let payload = r#"["KC_9999990000100011_E","KC_0039130000100011_E"]"#;
        let codes = episode_codes(payload, "KC_003913_S");
        assert_eq!(codes.into_iter().collect::<Vec<_>>(), vec!["KC_0039130000100011_E".to_string()]);
    }

    #[test]
    fn test_no_codes() {
        let err = latest_episode_code(r#"{"props":{}}"#, "KC_003913_S").unwrap_err();
        assert_eq!(*err, ErrorKind::MissingField("episode codes"));
    }

    #[rstest]
    #[case(
        "【第61話】航宙軍士官、冒険者になる｜カドコミ (コミックウォーカー)",
        Some("航宙軍士官、冒険者になる"),
        Some("第61話")
    )]
    #[case("蜘蛛ですが、なにか？｜カドコミ (コミックウォーカー)", Some("蜘蛛ですが、なにか？"), None)]
    #[case("No bar and no bracket", Some("No bar and no bracket"), None)]
    #[case("【第1話】 Spaced ｜site", Some("Spaced"), Some("第1話"))]
    #[case("｜only site", None, None)]
    fn test_parse_title(#[case] title: &str, #[case] series: Option<&str>, #[case] episode: Option<&str>) {
        let titles = parse_title(title);
        assert_eq!(titles.series.as_deref(), series);
        assert_eq!(titles.episode.as_deref(), episode);
    }

    #[test]
    fn test_urls() {
        assert_eq!(series_url("KC_003913_S"), "https://comic-walker.com/detail/KC_003913_S");
        assert_eq!(
            episode_url("KC_003913_S", "KC_0039130008900011_E"),
            "https://comic-walker.com/detail/KC_003913_S/episodes/KC_0039130008900011_E?episodeType=latest"
        );
    }
}
