mod episode;

pub use self::episode::{LatestEpisode, PAGE_TITLE, PUBLISHED_AT, SERIES};
