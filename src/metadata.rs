use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Record kept for every cached media item. Owned by the cache; callers only
/// ever see clones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub media_id: String,
    pub source_url: String,
    pub local_path: PathBuf,
    pub session_id: Option<String>,
    pub content_type: Option<String>,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

/// Coarse classification used to route an item to the external extraction
/// collaborators (OCR, PDF text, transcription, audio demux). The transforms
/// themselves live outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Pdf,
    Audio,
    Video,
    Other,
}

impl MediaMetadata {
    pub fn new(media_id: String, source_url: String, local_path: PathBuf) -> Self {
        Self {
            media_id,
            source_url,
            local_path,
            session_id: None,
            content_type: None,
            size_bytes: 0,
            created_at: Utc::now(),
        }
    }

    pub fn with_session(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }

    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = size_bytes;
        self
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.created_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>, max_age_hours: u64) -> bool {
        let hours = i64::try_from(max_age_hours).unwrap_or(i64::MAX);
        match Duration::try_hours(hours) {
            Some(max_age) => self.age(now) > max_age,
            // Threshold beyond any representable age: nothing expires.
            None => false,
        }
    }

    pub fn kind(&self) -> MediaKind {
        let content_type = match &self.content_type {
            Some(ct) => ct.as_str(),
            None => return MediaKind::Other,
        };
        if content_type.starts_with("image/") {
            MediaKind::Image
        } else if content_type == "application/pdf" {
            MediaKind::Pdf
        } else if content_type.starts_with("audio/") {
            MediaKind::Audio
        } else if content_type.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MediaMetadata {
        MediaMetadata::new(
            "id-1".into(),
            "https://example.com/a.png".into(),
            PathBuf::from("/tmp/a.png"),
        )
    }

    #[test]
    fn test_expiry_threshold() {
        let meta = record();
        let now = meta.created_at;
        assert!(!meta.is_expired(now, 24));
        assert!(!meta.is_expired(now + Duration::hours(24), 24));
        assert!(meta.is_expired(now + Duration::hours(25), 24));
        // max_age_hours = 0 expires anything with a positive age.
        assert!(meta.is_expired(now + Duration::seconds(1), 0));
    }

    #[test]
    fn test_huge_max_age_never_expires() {
        let meta = record();
        let now = meta.created_at + Duration::days(365);
        assert!(!meta.is_expired(now, u64::MAX));
        assert!(!meta.is_expired(now, i64::MAX as u64 + 1));
        assert!(!meta.is_expired(now, i64::MAX as u64));
    }

    #[test]
    fn test_kind_classification() {
        let mut meta = record();
        assert_eq!(meta.kind(), MediaKind::Other);

        for (ct, kind) in [
            ("image/png", MediaKind::Image),
            ("application/pdf", MediaKind::Pdf),
            ("audio/mpeg", MediaKind::Audio),
            ("video/mp4", MediaKind::Video),
            ("text/html", MediaKind::Other),
        ] {
            meta.content_type = Some(ct.to_string());
            assert_eq!(meta.kind(), kind);
        }
    }

    #[test]
    fn test_index_round_trip() {
        let meta = record()
            .with_session(Some("sess1".into()))
            .with_content_type(Some("image/png".into()))
            .with_size(42);
        let json = serde_json::to_string(&meta).unwrap();
        let back: MediaMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back.media_id, meta.media_id);
        assert_eq!(back.session_id, meta.session_id);
        assert_eq!(back.size_bytes, 42);
        assert_eq!(back.created_at, meta.created_at);
    }
}
