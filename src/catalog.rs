// Gallery items as delivered by the data service, with the placeholder fallback
// that keeps the sequence renderable when the collection is empty.

use serde::{Deserialize, Serialize};

use crate::error::SpotlightResult;

pub const PLACEHOLDER_CAPTION: &str = "No Images";
pub const PLACEHOLDER_IMAGE: &str = "https://picsum.photos/800/600";
/// Caption used when a record arrives without one.
pub const DEFAULT_CAPTION: &str = "Gallery Image";
/// Shown behind the sequence when no hero image is configured.
pub const FALLBACK_HERO_IMAGE: &str = "https://picsum.photos/1920/1080";

/// One item of the choreography. Immutable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub caption: String,
    pub image_url: String,
}

impl GalleryItem {
    pub fn new(caption: impl Into<String>, image_url: impl Into<String>) -> Self {
        GalleryItem {
            caption: caption.into(),
            image_url: image_url.into(),
        }
    }

    pub fn placeholder() -> Self {
        GalleryItem::new(PLACEHOLDER_CAPTION, PLACEHOLDER_IMAGE)
    }
}

/// A gallery row as returned by `GET /api/gallery`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryRecord {
    #[serde(default)]
    pub id: Option<String>,
    /// Nullable in the gallery table; a row without an image is skipped.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

/// Parse the data service's gallery collection.
pub fn parse_records(json: &str) -> SpotlightResult<Vec<GalleryRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Map records to items. Records without an image are skipped.
pub fn items_from_records(records: &[GalleryRecord]) -> Vec<GalleryItem> {
    records
        .iter()
        .filter_map(|record| {
            let url = record.url.as_deref().map(str::trim).unwrap_or_default();
            if url.is_empty() {
                tracing::warn!(id = ?record.id, "skipping gallery record without an image url");
                return None;
            }
            let caption = record
                .caption
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_CAPTION);
            Some(GalleryItem::new(caption, url))
        })
        .collect()
}

/// Guarantee at least one item.
pub fn with_placeholder(mut items: Vec<GalleryItem>) -> Vec<GalleryItem> {
    if items.is_empty() {
        tracing::debug!("gallery is empty, using placeholder item");
        items.push(GalleryItem::placeholder());
    }
    items
}

/// Image behind the whole sequence.
pub fn hero_image(hero_images: &[String]) -> &str {
    hero_images
        .iter()
        .map(|url| url.trim())
        .find(|url| !url.is_empty())
        .unwrap_or(FALLBACK_HERO_IMAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_map_to_items() {
        let records = parse_records(
            r#"[
                {"id":"1","url":"https://picsum.photos/800/600?random=20","caption":"Beautiful Sunset"},
                {"id":"2","url":"https://picsum.photos/800/600?random=21","caption":""},
                {"id":"3","url":"  ","caption":"Broken"}
            ]"#,
        )
        .unwrap();
        let items = items_from_records(&records);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].caption, "Beautiful Sunset");
        assert_eq!(items[1].caption, DEFAULT_CAPTION);
    }

    #[test]
    fn null_url_skips_only_that_record() {
        let records = parse_records(
            r#"[
                {"id":"1","url":"https://picsum.photos/800/600?random=20","caption":"Beautiful Sunset"},
                {"id":"2","url":null,"caption":"Broken upload"},
                {"id":"3","url":"https://picsum.photos/800/600?random=22","caption":null}
            ]"#,
        )
        .unwrap();
        let items = items_from_records(&records);
        assert_eq!(
            items,
            vec![
                GalleryItem::new("Beautiful Sunset", "https://picsum.photos/800/600?random=20"),
                GalleryItem::new(DEFAULT_CAPTION, "https://picsum.photos/800/600?random=22"),
            ]
        );
    }

    #[test]
    fn empty_gallery_gets_placeholder() {
        let items = with_placeholder(Vec::new());
        assert_eq!(items, vec![GalleryItem::placeholder()]);
    }

    #[test]
    fn non_empty_gallery_is_untouched() {
        let items = with_placeholder(vec![GalleryItem::new("Safari Jeep", "https://img/3.jpg")]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].caption, "Safari Jeep");
    }

    #[test]
    fn hero_falls_back() {
        assert_eq!(hero_image(&[]), FALLBACK_HERO_IMAGE);
        assert_eq!(hero_image(&["".to_string()]), FALLBACK_HERO_IMAGE);
        assert_eq!(
            hero_image(&["https://img/hero.jpg".to_string()]),
            "https://img/hero.jpg"
        );
    }

    #[test]
    fn malformed_collection_is_an_error() {
        assert!(parse_records("{not json").is_err());
    }
}
