//! Wire types for the content API's listing responses.
//!
//! The upstream schema is loose: beyond the identifier/title/author/score
//! every field is optional and absence is meaningful, not an error. All
//! fields default so that a structurally odd payload deserializes to a
//! sparse entry instead of failing the whole listing.

use serde::Deserialize;
use std::collections::HashMap;

/// Top-level envelope of `GET .../hot.json`.
#[derive(Debug, Default, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub data: Option<ListingData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<ListingChild>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingChild {
    #[serde(default)]
    pub data: RawListingEntry,
}

/// One post record. Owned by the transport resolver for the duration of a
/// single extraction call; never retained.
#[derive(Debug, Default, Deserialize)]
pub struct RawListingEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub ups: i64,
    #[serde(default)]
    pub post_hint: Option<String>,
    #[serde(default)]
    pub is_video: Option<bool>,
    #[serde(default)]
    pub media: Option<EntryMedia>,
    #[serde(default)]
    pub preview: Option<EntryPreview>,
    #[serde(default)]
    pub url_overridden_by_dest: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub is_gallery: Option<bool>,
    #[serde(default)]
    pub gallery_data: Option<GalleryData>,
    #[serde(default)]
    pub media_metadata: Option<HashMap<String, GalleryMedia>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EntryMedia {
    #[serde(default)]
    pub reddit_video: Option<RedditVideo>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RedditVideo {
    #[serde(default)]
    pub fallback_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EntryPreview {
    #[serde(default)]
    pub images: Vec<PreviewImage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PreviewImage {
    #[serde(default)]
    pub source: Option<PreviewSource>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PreviewSource {
    #[serde(default)]
    pub url: Option<String>,
}

/// Ordered member list of a gallery post.
#[derive(Debug, Default, Deserialize)]
pub struct GalleryData {
    #[serde(default)]
    pub items: Vec<GalleryItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GalleryItem {
    #[serde(default)]
    pub media_id: String,
}

/// Per-member media lookup, keyed by `media_id`.
#[derive(Debug, Default, Deserialize)]
pub struct GalleryMedia {
    #[serde(default)]
    pub s: Option<GallerySource>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GallerySource {
    #[serde(default)]
    pub u: Option<String>,
}

impl Listing {
    /// Flatten the envelope into its entries. A malformed or absent
    /// structure yields zero entries.
    pub fn into_entries(self) -> Vec<RawListingEntry> {
        self.data
            .map(|d| d.children.into_iter().map(|c| c.data).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_entries_deserialize_with_defaults() {
        let entry: RawListingEntry = serde_json::from_str(r#"{"id":"a1"}"#).unwrap();
        assert_eq!(entry.id, "a1");
        assert_eq!(entry.ups, 0);
        assert!(entry.media.is_none());
        assert!(entry.media_metadata.is_none());
    }

    #[test]
    fn missing_structure_yields_zero_entries() {
        let listing: Listing = serde_json::from_str(r#"{"kind":"Listing"}"#).unwrap();
        assert!(listing.into_entries().is_empty());

        let listing: Listing = serde_json::from_str(r#"{"data":{}}"#).unwrap();
        assert!(listing.into_entries().is_empty());
    }
}
