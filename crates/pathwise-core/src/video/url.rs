//! YouTube URL helpers.
//!
//! Watch and thumbnail URLs are built locally from the video id with fixed
//! templates; nothing here touches the network.

use std::sync::LazyLock;

use regex::Regex;

/// Standard-quality thumbnail (480x360), available for practically every video.
const THUMBNAIL_TEMPLATE: &str = "https://i.ytimg.com/vi/{id}/hqdefault.jpg";
/// Full-resolution thumbnail (1280x720). Preferred, but not every video has one.
const THUMBNAIL_HQ_TEMPLATE: &str = "https://i.ytimg.com/vi/{id}/maxresdefault.jpg";

static URL_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#/]+)")
            .expect("static regex"),
        Regex::new(r"youtube\.com/watch\?.*?\bv=([^&\n?#]+)").expect("static regex"),
    ]
});

static BARE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("static regex"));

/// Extract the video id from a watch, short, or embed URL, or a bare id.
///
/// Returns `None` when the reference matches none of the known forms.
pub fn extract_video_id(reference: &str) -> Option<String> {
    let reference = reference.trim();
    for pattern in URL_PATTERNS.iter() {
        if let Some(id) = pattern.captures(reference).and_then(|c| c.get(1)) {
            return Some(id.as_str().to_string());
        }
    }
    if BARE_ID.is_match(reference) {
        return Some(reference.to_string());
    }
    None
}

/// Canonical watch URL for a video id.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// Standard-quality thumbnail URL for a video id.
pub fn thumbnail_url(video_id: &str) -> String {
    THUMBNAIL_TEMPLATE.replace("{id}", video_id)
}

/// Highest-resolution thumbnail URL for a video id. May 404 for older uploads.
pub fn thumbnail_url_hq(video_id: &str) -> String {
    THUMBNAIL_HQ_TEMPLATE.replace("{id}", video_id)
}
