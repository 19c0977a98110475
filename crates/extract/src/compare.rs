//! Episode identity comparison

use crate::models::LatestEpisode;

impl LatestEpisode {
    /// Whether two snapshots of the same work refer to the same episode.
    ///
    /// Codes are compared when both sides have one; otherwise the URLs are.
    /// Symmetric by construction. Only meaningful between snapshots of the
    /// same tracked work.
    pub fn is_same_episode(&self, other: &Self) -> bool {
        match (self.code(), other.code()) {
            (Some(a), Some(b)) => a == b,
            _ => self.url == other.url,
        }
    }

    fn code(&self) -> Option<&str> {
        self.episode_code.as_deref().filter(|c| !c.is_empty())
    }
}
