//! Maps one raw listing entry to zero or more renderable media items.
//!
//! The classification rules run in strict priority order and the first
//! matching rule wins; two rules can both structurally match the same
//! entry, so the order is load-bearing. Entries with no extractable media
//! (text posts, unsupported link types) yield nothing and are not errors.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::listing::RawListingEntry;
use crate::normalize::{
    decode_html_entities, gifv_to_mp4, has_animated_image_ext, has_static_image_ext,
    has_video_ext,
};

const PERMALINK_BASE: &str = "https://reddit.com";
const HOSTED_VIDEO_HINT: &str = "hosted:video";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => f.pad("image"),
            MediaKind::Video => f.pad("video"),
        }
    }
}

/// One renderable unit of the feed. Created here, immutable afterwards.
/// The `url` of an emitted item is never empty: the extractor discards
/// instead of emitting an unresolvable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub title: String,
    pub collection: String,
    pub permalink: String,
    pub kind: MediaKind,
    pub url: String,
    pub thumb: Option<String>,
    pub author: String,
    pub ups: i64,
}

/// Extract media items from one entry. Pure and deterministic: identical
/// input and flag always yield the identical sequence.
pub fn extract_media(entry: &RawListingEntry, data_saver: bool) -> Vec<MediaItem> {
    let preview = preview_url(entry);

    // Rule 1: direct video.
    if entry.is_video.unwrap_or(false) {
        if let Some(url) = fallback_video_url(entry) {
            return vec![item(entry, entry.id.clone(), MediaKind::Video, url, preview)];
        }
    }

    // Rule 2: gallery. Member index reflects the position in the original
    // member list, so skipped members leave gaps in the id suffixes.
    if entry.is_gallery.unwrap_or(false) {
        if let (Some(gallery), Some(lookup)) =
            (entry.gallery_data.as_ref(), entry.media_metadata.as_ref())
        {
            if !gallery.items.is_empty() {
                let mut out = Vec::new();
                for (idx, member) in gallery.items.iter().enumerate() {
                    let Some(raw) = lookup
                        .get(&member.media_id)
                        .and_then(|m| m.s.as_ref())
                        .and_then(|s| s.u.as_deref())
                    else {
                        continue;
                    };
                    let url = gifv_to_mp4(&decode_html_entities(raw));
                    if url.is_empty() {
                        continue;
                    }
                    let kind = if has_video_ext(&url) {
                        MediaKind::Video
                    } else {
                        MediaKind::Image
                    };
                    out.push(item(
                        entry,
                        format!("{}-{}", entry.id, idx),
                        kind,
                        url,
                        preview.clone(),
                    ));
                }
                return out;
            }
        }
    }

    // Rule 3: destination URL fallback.
    let raw_url = entry
        .url_overridden_by_dest
        .as_deref()
        .filter(|u| !u.is_empty())
        .or(entry.url.as_deref())
        .unwrap_or_default();
    let media_url = gifv_to_mp4(&decode_html_entities(raw_url));

    if !media_url.is_empty() {
        let hosted_video = entry.post_hint.as_deref() == Some(HOSTED_VIDEO_HINT);
        if has_video_ext(&media_url) || hosted_video {
            return vec![item(entry, entry.id.clone(), MediaKind::Video, media_url, preview)];
        }

        if has_animated_image_ext(&media_url) {
            let url = match (&preview, data_saver) {
                (Some(p), true) => p.clone(),
                _ => media_url,
            };
            return vec![item(entry, entry.id.clone(), MediaKind::Image, url, preview)];
        }

        if has_static_image_ext(&media_url) {
            return vec![item(entry, entry.id.clone(), MediaKind::Image, media_url, preview)];
        }
    }

    // Rule 4: preview-only fallback.
    if let Some(p) = preview {
        return vec![item(entry, entry.id.clone(), MediaKind::Image, p.clone(), Some(p))];
    }

    Vec::new()
}

/// The decoded preview-image URL, if the entry carries a non-empty one.
fn preview_url(entry: &RawListingEntry) -> Option<String> {
    let raw = entry
        .preview
        .as_ref()?
        .images
        .first()?
        .source
        .as_ref()?
        .url
        .as_deref()?;
    Some(decode_html_entities(raw)).filter(|u| !u.is_empty())
}

fn fallback_video_url(entry: &RawListingEntry) -> Option<String> {
    entry
        .media
        .as_ref()?
        .reddit_video
        .as_ref()?
        .fallback_url
        .clone()
        .filter(|u| !u.is_empty())
}

fn item(
    entry: &RawListingEntry,
    id: String,
    kind: MediaKind,
    url: String,
    thumb: Option<String>,
) -> MediaItem {
    MediaItem {
        id,
        title: entry.title.clone(),
        collection: entry.subreddit.clone(),
        permalink: format!("{}{}", PERMALINK_BASE, entry.permalink),
        kind,
        url,
        thumb,
        author: entry.author.clone(),
        ups: entry.ups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(json: &str) -> RawListingEntry {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn direct_video_wins_and_decodes_the_thumb() {
        let e = entry(
            r#"{"id":"a1","title":"t","subreddit":"pics","permalink":"/r/pics/a1","author":"u",
                "ups":7,"is_video":true,
                "media":{"reddit_video":{"fallback_url":"https://v.redd.it/a1/DASH_480.mp4"}},
                "preview":{"images":[{"source":{"url":"https://preview&amp;x.jpg"}}]}}"#,
        );
        let items = extract_media(&e, false);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, MediaKind::Video);
        assert_eq!(items[0].url, "https://v.redd.it/a1/DASH_480.mp4");
        assert_eq!(items[0].thumb.as_deref(), Some("https://preview&x.jpg"));
        assert_eq!(items[0].permalink, "https://reddit.com/r/pics/a1");
    }

    #[test]
    fn video_flag_without_fallback_url_falls_through() {
        let e = entry(
            r#"{"id":"a2","is_video":true,
                "url_overridden_by_dest":"https://i.example.com/x.png"}"#,
        );
        let items = extract_media(&e, false);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, MediaKind::Image);
        assert_eq!(items[0].url, "https://i.example.com/x.png");
    }

    #[test]
    fn gallery_preserves_member_order_and_original_indices() {
        let e = entry(
            r#"{"id":"g1","is_gallery":true,
                "gallery_data":{"items":[
                    {"media_id":"m0"},{"media_id":"missing"},{"media_id":"m2"}]},
                "media_metadata":{
                    "m0":{"s":{"u":"https://i.example.com/first.jpg"}},
                    "m2":{"s":{"u":"https://i.example.com/third.gifv"}}}}"#,
        );
        let items = extract_media(&e, false);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "g1-0");
        assert_eq!(items[0].kind, MediaKind::Image);
        // The skipped member keeps its slot: the third member is still -2.
        assert_eq!(items[1].id, "g1-2");
        assert_eq!(items[1].url, "https://i.example.com/third.mp4");
        assert_eq!(items[1].kind, MediaKind::Video);
    }

    #[test]
    fn gallery_flag_without_members_falls_through_to_url() {
        let e = entry(
            r#"{"id":"g2","is_gallery":true,"gallery_data":{"items":[]},
                "media_metadata":{},
                "url":"https://i.example.com/x.webp"}"#,
        );
        let items = extract_media(&e, false);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "g2");
        assert_eq!(items[0].url, "https://i.example.com/x.webp");
    }

    #[test]
    fn gifv_destination_is_classified_as_video() {
        let e = entry(r#"{"id":"a3","url_overridden_by_dest":"https://i.imgur.com/x.gifv"}"#);
        let items = extract_media(&e, false);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, MediaKind::Video);
        assert_eq!(items[0].url, "https://i.imgur.com/x.mp4");
    }

    #[test]
    fn hosted_video_hint_forces_video() {
        let e = entry(
            r#"{"id":"a4","post_hint":"hosted:video",
                "url":"https://example.com/watch?v=123"}"#,
        );
        let items = extract_media(&e, false);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, MediaKind::Video);
        assert_eq!(items[0].url, "https://example.com/watch?v=123");
    }

    #[test]
    fn data_saver_swaps_gif_for_preview() {
        let json = r#"{"id":"a5","url":"https://i.example.com/big.gif",
            "preview":{"images":[{"source":{"url":"https://i.example.com/small.jpg"}}]}}"#;
        let saver = extract_media(&entry(json), true);
        assert_eq!(saver[0].url, "https://i.example.com/small.jpg");
        assert_eq!(saver[0].kind, MediaKind::Image);

        let full = extract_media(&entry(json), false);
        assert_eq!(full[0].url, "https://i.example.com/big.gif");
        assert_eq!(full[0].thumb.as_deref(), Some("https://i.example.com/small.jpg"));
    }

    #[test]
    fn gif_without_preview_keeps_original_even_in_saver_mode() {
        let e = entry(r#"{"id":"a6","url":"https://i.example.com/only.gif"}"#);
        let items = extract_media(&e, true);
        assert_eq!(items[0].url, "https://i.example.com/only.gif");
    }

    #[test]
    fn preview_only_entries_fall_back_to_the_preview() {
        let e = entry(
            r#"{"id":"a7","url":"https://example.com/article",
                "preview":{"images":[{"source":{"url":"https://i.example.com/p.jpg"}}]}}"#,
        );
        let items = extract_media(&e, false);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, MediaKind::Image);
        assert_eq!(items[0].url, "https://i.example.com/p.jpg");
        assert_eq!(items[0].thumb.as_deref(), Some("https://i.example.com/p.jpg"));
    }

    #[test]
    fn text_posts_yield_nothing() {
        let e = entry(r#"{"id":"a8","title":"just text","url":"https://example.com/article"}"#);
        assert!(extract_media(&e, false).is_empty());
    }

    #[test]
    fn no_item_is_ever_emitted_with_an_empty_url() {
        // hosted:video hint but no usable destination and no preview.
        let e = entry(r#"{"id":"a9","post_hint":"hosted:video"}"#);
        assert!(extract_media(&e, false).is_empty());
    }

    #[test]
    fn extraction_is_deterministic() {
        let json = r#"{"id":"g3","is_gallery":true,
            "gallery_data":{"items":[{"media_id":"a"},{"media_id":"b"}]},
            "media_metadata":{
                "a":{"s":{"u":"https://i.example.com/a.png"}},
                "b":{"s":{"u":"https://i.example.com/b.png"}}}}"#;
        let first = extract_media(&entry(json), true);
        let second = extract_media(&entry(json), true);
        assert_eq!(first, second);
    }
}
