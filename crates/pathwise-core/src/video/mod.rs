//! Video lookup: search, verification, and the YouTube backend.
//!
//! ```text
//! VideoLookup --search/verify/verify_batch--> Arc<dyn VideoBackend>
//!                                                  |
//!                                          YouTubeClient (HTTP)
//! ```

pub mod backend;
pub mod duration;
pub mod lookup;
pub mod url;
pub mod youtube;

pub use backend::{
    ContentDetails, LookupError, SearchHit, SearchHitId, SearchSnippet, Statistics, VideoBackend,
    VideoItem, VideoSnippet, VideoStatus,
};
pub use duration::format_duration;
pub use lookup::{BatchVerification, MAX_IDS_PER_REQUEST, VideoLookup, VideoVerification};
pub use url::{extract_video_id, thumbnail_url, thumbnail_url_hq, watch_url};
pub use youtube::{YouTubeClient, YouTubeConfig};
