//! Publisher-specific parsing.
//!
//! Everything in here is pure: callers fetch the pages, these modules make
//! sense of them.

pub mod catalog;
pub mod feed;
pub mod redirect;

/// Series and episode titles as read from a page `<title>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Titles {
    pub series: Option<String>,
    pub episode: Option<String>,
}
impl Titles {
    pub(crate) fn new(series: Option<&str>, episode: Option<&str>) -> Self {
        Self {
            series: non_empty(series),
            episode: non_empty(episode),
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}
