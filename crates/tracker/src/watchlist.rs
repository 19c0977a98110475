//! The watchlist: one URL per line.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs;
use std::path::Path;
use tracing::{debug, instrument};

/// Extract URLs from watchlist text. Lines are trimmed; blank lines and lines
/// starting with `#` are skipped.
///
/// ```rust
/// use mwatch_tracker::watchlist;
/// let urls = watchlist::parse("# manga\n  https://example.com/a  \n\nhttps://example.com/b\n");
/// assert_eq!(urls, ["https://example.com/a", "https://example.com/b"]);
/// ```
pub fn parse(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Read and [`parse`] a watchlist file.
///
/// # Errors
///
/// [`ErrorKind::Watchlist`] if the file cannot be read as UTF-8 text.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn read(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).or_raise(|| ErrorKind::Watchlist(path.to_path_buf()))?;
    let urls = parse(&text);
    debug!(count = urls.len(), "read watchlist");
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", &[])]
    #[case("\n\n   \n", &[])]
    #[case("# only a comment\n", &[])]
    #[case("https://a.test/1\r\nhttps://a.test/2\r\n", &["https://a.test/1", "https://a.test/2"])]
    #[case("  #indented comment\n\thttps://a.test/1\t\n", &["https://a.test/1"])]
    #[case("https://a.test/1#fragment", &["https://a.test/1#fragment"])]
    fn test_parse(#[case] text: &str, #[case] expected: &[&str]) {
        assert_eq!(parse(text), expected);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("urls.txt");
        let err = read(&path).unwrap_err();
        assert_eq!(*err, ErrorKind::Watchlist(path));
    }

    #[test]
    fn test_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("urls.txt");
        fs::write(&path, "https://a.test/1\n# https://a.test/2\n").unwrap();
        assert_eq!(read(&path).unwrap(), ["https://a.test/1"]);
    }
}
