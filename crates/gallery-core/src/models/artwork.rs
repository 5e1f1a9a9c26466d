//! Artwork records as returned by the list, search, and detail endpoints.

use crate::media::{ImageResolver, ImageSource};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Fallback shown when an artwork has no artist line.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Fallback shown when an artwork has no date line.
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// Summary record used in list and search pages.
///
/// Identity is `id` alone: equality and hashing ignore every other field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtworkSummary {
    pub id: i64,
    pub title: String,
    #[serde(default, rename = "artist_display")]
    pub artist_display_raw: Option<String>,
    #[serde(default, rename = "date_display")]
    pub date_display_raw: Option<String>,
    #[serde(default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<ThumbnailRef>,
}

impl ArtworkSummary {
    /// Create a bare summary with only the required fields set.
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            artist_display_raw: None,
            date_display_raw: None,
            image_id: None,
            thumbnail: None,
        }
    }

    /// First line of the artist display text.
    ///
    /// The API packs nationality and life dates onto following lines.
    pub fn artist_name(&self) -> &str {
        self.artist_display_raw
            .as_deref()
            .and_then(|s| s.lines().next())
            .unwrap_or(UNKNOWN_ARTIST)
    }

    pub fn display_year(&self) -> &str {
        self.date_display_raw.as_deref().unwrap_or(UNKNOWN_DATE)
    }

    /// Whether the date display text contains `year`.
    pub fn matches_year(&self, year: &str) -> bool {
        self.date_display_raw
            .as_deref()
            .is_some_and(|date| date.contains(year))
    }

    /// Where this artwork's image should come from.
    pub fn image_source(&self, resolver: &ImageResolver) -> ImageSource {
        resolver.resolve(self)
    }
}

impl PartialEq for ArtworkSummary {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ArtworkSummary {}

impl Hash for ArtworkSummary {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Thumbnail metadata attached to an artwork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailRef {
    /// Low-quality placeholder, normally a `data:image/...;base64,` URI.
    #[serde(default, rename = "lqip")]
    pub inline_data_uri: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// Full record for a single artwork, fetched lazily by id.
///
/// Never merged back into list entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtworkDetail {
    #[serde(flatten)]
    pub summary: ArtworkSummary,
    #[serde(default)]
    pub medium_display: Option<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub credit_line: Option<String>,
    #[serde(default)]
    pub publication_history: Option<String>,
    #[serde(default)]
    pub exhibition_history: Option<String>,
    #[serde(default)]
    pub provenance_text: Option<String>,
    #[serde(default)]
    pub artist_id: Option<i64>,
    #[serde(default)]
    pub artist_title: Option<String>,
}

impl ArtworkDetail {
    /// Detail record carrying only the summary fields.
    pub fn from_summary(summary: ArtworkSummary) -> Self {
        Self {
            summary,
            medium_display: None,
            dimensions: None,
            credit_line: None,
            publication_history: None,
            exhibition_history: None,
            provenance_text: None,
            artist_id: None,
            artist_title: None,
        }
    }

    pub fn id(&self) -> i64 {
        self.summary.id
    }
}

impl PartialEq for ArtworkDetail {
    fn eq(&self, other: &Self) -> bool {
        self.summary == other.summary
    }
}

impl Eq for ArtworkDetail {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_is_id_only() {
        let mut a = ArtworkSummary::new(7, "Nighthawks");
        let mut b = ArtworkSummary::new(7, "Different title");
        a.image_id = Some("abc".into());
        b.date_display_raw = Some("1942".into());
        assert_eq!(a, b);

        let set: HashSet<_> = [a, b, ArtworkSummary::new(8, "Other")].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_artist_name_first_line() {
        let mut art = ArtworkSummary::new(1, "x");
        assert_eq!(art.artist_name(), UNKNOWN_ARTIST);

        art.artist_display_raw = Some("Edward Hopper\nAmerican, 1882-1967".into());
        assert_eq!(art.artist_name(), "Edward Hopper");
    }

    #[test]
    fn test_matches_year() {
        let mut art = ArtworkSummary::new(1, "x");
        assert!(!art.matches_year("1942"));
        assert_eq!(art.display_year(), UNKNOWN_DATE);

        art.date_display_raw = Some("c. 1942".into());
        assert!(art.matches_year("1942"));
        assert!(art.matches_year("19"));
        assert!(!art.matches_year("1850"));
    }

    #[test]
    fn test_decode_summary_from_api_json() {
        let json = r#"{
            "id": 111628,
            "title": "Nighthawks",
            "artist_display": "Edward Hopper\nAmerican, 1882-1967",
            "date_display": "1942",
            "image_id": "831a05de-d3f6-f4fa-a460-23008dd58dda",
            "thumbnail": {
                "lqip": "data:image/gif;base64,R0lGODlhBAAFAPQAAA==",
                "width": 5000,
                "height": 2708,
                "alt_text": "Painting of a corner diner at night."
            }
        }"#;

        let art: ArtworkSummary = serde_json::from_str(json).unwrap();
        assert_eq!(art.id, 111628);
        assert_eq!(art.date_display_raw.as_deref(), Some("1942"));
        let thumb = art.thumbnail.unwrap();
        assert!(thumb.inline_data_uri.unwrap().starts_with("data:image/gif"));
        assert_eq!(thumb.width, Some(5000));
    }

    #[test]
    fn test_decode_summary_with_nulls() {
        let json = r#"{"id": 3, "title": "Untitled", "artist_display": null, "thumbnail": null}"#;
        let art: ArtworkSummary = serde_json::from_str(json).unwrap();
        assert!(art.artist_display_raw.is_none());
        assert!(art.thumbnail.is_none());
        assert!(art.image_id.is_none());
    }

    #[test]
    fn test_decode_detail_flattens_summary() {
        let json = r#"{
            "id": 27992,
            "title": "A Sunday on La Grande Jatte",
            "image_id": "2d484387-2509-5e8e-2c43-22f9981972eb",
            "medium_display": "Oil on canvas",
            "credit_line": "Helen Birch Bartlett Memorial Collection",
            "artist_id": 40610,
            "artist_title": "Georges Seurat"
        }"#;

        let detail: ArtworkDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.id(), 27992);
        assert_eq!(detail.summary.title, "A Sunday on La Grande Jatte");
        assert_eq!(detail.medium_display.as_deref(), Some("Oil on canvas"));
        assert_eq!(detail.artist_id, Some(40610));
        assert!(detail.provenance_text.is_none());
    }
}
