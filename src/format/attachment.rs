use serde::Serialize;
use serde_json::Value;

use crate::api::models::{ImageSize, RawAttachment};

/// Normalized attachment.
///
/// Non-image media keep only the passthrough fields; images also carry the
/// display fields in [`ImageDetails`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub media_type: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<Value>,
    pub url: Option<String>,
    #[serde(flatten)]
    pub image: Option<ImageDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDetails {
    /// e.g. `photo.jpg (204800, 1920×1080px)`
    pub name_and_size: String,
    pub src: Option<String>,
    pub src_set: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl From<&RawAttachment> for Attachment {
    fn from(attachment: &RawAttachment) -> Self {
        if !attachment.is_image() {
            return Self {
                id: attachment.id.clone(),
                media_type: attachment.media_type.clone(),
                file_name: attachment.file_name.clone(),
                file_size: attachment.file_size.clone(),
                url: attachment.url.clone(),
                image: None,
            };
        }

        let sizes = &attachment.image_sizes;
        let thumbnail = sizes.t.as_ref();
        let original = sizes.o.as_ref();

        let url = variant_url(original)
            .or(attachment.url.as_deref())
            .map(ToString::to_string);
        let src = variant_url(thumbnail)
            .or(attachment.thumbnail_url.as_deref())
            .map(ToString::to_string);

        let image = ImageDetails {
            name_and_size: name_and_size(attachment),
            src,
            src_set: src_set(attachment),
            width: dimension(thumbnail, original, |s| s.w),
            height: dimension(thumbnail, original, |s| s.h),
        };

        Self {
            id: attachment.id.clone(),
            media_type: attachment.media_type.clone(),
            file_name: attachment.file_name.clone(),
            file_size: attachment.file_size.clone(),
            url,
            image: Some(image),
        }
    }
}

/// Format a raw attachment; `None` in, `None` out.
#[must_use]
pub fn format_attachment(attachment: Option<&RawAttachment>) -> Option<Attachment> {
    attachment.map(Attachment::from)
}

/// Pick the `srcSet` hint for a thumbnail displayed at 1x.
///
/// A real 2x thumbnail wins. Otherwise the original serves as the 2x source
/// only when it is at most twice as wide as the thumbnail.
fn src_set(attachment: &RawAttachment) -> Option<String> {
    let sizes = &attachment.image_sizes;

    if let Some(url) = variant_url(sizes.t2.as_ref()) {
        return Some(format!("{url} 2x"));
    }

    let original_width = sizes.o.as_ref().and_then(|o| o.w)?;
    let thumbnail_width = sizes.t.as_ref().and_then(|t| t.w)?;
    if original_width > thumbnail_width.saturating_mul(2) {
        return None;
    }

    let url = variant_url(sizes.o.as_ref()).or(attachment.url.as_deref())?;
    Some(format!("{url} 2x"))
}

/// URL of a size variant. An empty string counts as no URL.
fn variant_url(size: Option<&ImageSize>) -> Option<&str> {
    size.and_then(|s| s.url.as_deref()).filter(|url| !url.is_empty())
}

/// Thumbnail dimension, then original, skipping zeros.
fn dimension(
    thumbnail: Option<&ImageSize>,
    original: Option<&ImageSize>,
    pick: impl Fn(&ImageSize) -> Option<i64>,
) -> Option<i64> {
    thumbnail
        .and_then(&pick)
        .filter(|&v| v != 0)
        .or_else(|| original.and_then(&pick).filter(|&v| v != 0))
}

fn name_and_size(attachment: &RawAttachment) -> String {
    let file_name = attachment.file_name.as_deref().unwrap_or_default();
    let file_size = match &attachment.file_size {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    match &attachment.image_sizes.o {
        Some(original) => format!(
            "{file_name} ({file_size}, {}×{}px)",
            display_dimension(original.w),
            display_dimension(original.h),
        ),
        None => format!("{file_name} ({file_size})"),
    }
}

fn display_dimension(value: Option<i64>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawAttachment {
        serde_json::from_value(value).unwrap()
    }

    fn image(sizes: Value) -> RawAttachment {
        raw(json!({
            "id": "a1",
            "mediaType": "image",
            "fileName": "photo.jpg",
            "fileSize": "204800",
            "url": "https://media/a1.jpg",
            "thumbnailUrl": "https://media/thumb/a1.jpg",
            "imageSizes": sizes
        }))
    }

    #[test]
    fn test_non_image_is_passthrough() {
        let attachment = raw(json!({
            "id": "a2",
            "mediaType": "audio",
            "fileName": "song.mp3",
            "fileSize": 3_000_000,
            "url": "https://media/a2.mp3",
            "thumbnailUrl": "https://media/thumb/a2.jpg",
            "imageSizes": { "o": { "w": 10, "h": 10 } }
        }));

        assert_eq!(
            serde_json::to_value(format_attachment(Some(&attachment)).unwrap()).unwrap(),
            json!({
                "id": "a2",
                "mediaType": "audio",
                "fileName": "song.mp3",
                "fileSize": 3_000_000,
                "url": "https://media/a2.mp3"
            })
        );
    }

    #[test]
    fn test_true_2x_thumbnail_wins() {
        let attachment = image(json!({
            "t": { "w": "100", "h": "80", "url": "https://media/t/a1.jpg" },
            "t2": { "w": "200", "h": "160", "url": "https://media/t2/a1.jpg" },
            "o": { "w": "4000", "h": "3200", "url": "https://media/o/a1.jpg" }
        }));
        let formatted = Attachment::from(&attachment);
        let image = formatted.image.unwrap();

        assert_eq!(image.src_set.as_deref(), Some("https://media/t2/a1.jpg 2x"));
        assert_eq!(image.src.as_deref(), Some("https://media/t/a1.jpg"));
        assert_eq!(formatted.url.as_deref(), Some("https://media/o/a1.jpg"));
    }

    #[test]
    fn test_small_original_used_as_2x() {
        let attachment = image(json!({
            "t": { "w": "90", "h": "80", "url": "https://media/t/a1.jpg" },
            "o": { "w": "150", "h": "120", "url": "https://media/o/a1.jpg" }
        }));
        let image = Attachment::from(&attachment).image.unwrap();
        assert_eq!(image.src_set.as_deref(), Some("https://media/o/a1.jpg 2x"));
    }

    #[test]
    fn test_original_exactly_twice_thumbnail() {
        let attachment = image(json!({
            "t": { "w": 100, "h": 80 },
            "o": { "w": 200, "h": 160 }
        }));
        let image = Attachment::from(&attachment).image.unwrap();
        // No URL on the original: falls back to the attachment URL
        assert_eq!(image.src_set.as_deref(), Some("https://media/a1.jpg 2x"));
    }

    #[test]
    fn test_empty_variant_urls_fall_back() {
        let attachment = image(json!({
            "t": { "w": 100, "h": 80, "url": "" },
            "t2": { "w": 200, "h": 160, "url": "" },
            "o": { "w": 150, "h": 120, "url": "" }
        }));
        let formatted = Attachment::from(&attachment);
        let image = formatted.image.unwrap();

        assert_eq!(formatted.url.as_deref(), Some("https://media/a1.jpg"));
        assert_eq!(image.src.as_deref(), Some("https://media/thumb/a1.jpg"));
        assert_eq!(image.src_set.as_deref(), Some("https://media/a1.jpg 2x"));
    }

    #[test]
    fn test_large_original_gets_no_src_set() {
        let attachment = image(json!({
            "t": { "w": "100", "h": "80", "url": "https://media/t/a1.jpg" },
            "o": { "w": "1000", "h": "800", "url": "https://media/o/a1.jpg" }
        }));
        let image = Attachment::from(&attachment).image.unwrap();
        assert_eq!(image.src_set, None);
        assert_eq!(
            serde_json::to_value(&image).unwrap()["srcSet"],
            Value::Null
        );
    }

    #[test]
    fn test_missing_sizes_do_not_panic() {
        let attachment = image(json!({}));
        let formatted = Attachment::from(&attachment);
        let image = formatted.image.unwrap();

        assert_eq!(image.src_set, None);
        assert_eq!(image.width, None);
        assert_eq!(image.height, None);
        assert_eq!(image.src.as_deref(), Some("https://media/thumb/a1.jpg"));
        assert_eq!(image.name_and_size, "photo.jpg (204800)");
        assert_eq!(formatted.url.as_deref(), Some("https://media/a1.jpg"));
    }

    #[test]
    fn test_dimensions_fall_back_to_original() {
        let attachment = image(json!({
            "o": { "w": "640", "h": "480", "url": "https://media/o/a1.jpg" }
        }));
        let image = Attachment::from(&attachment).image.unwrap();

        assert_eq!(image.width, Some(640));
        assert_eq!(image.height, Some(480));
        assert_eq!(image.name_and_size, "photo.jpg (204800, 640×480px)");
    }

    #[test]
    fn test_dimensions_prefer_thumbnail() {
        let attachment = image(json!({
            "t": { "w": 100, "h": 75 },
            "o": { "w": 640, "h": 480 }
        }));
        let image = Attachment::from(&attachment).image.unwrap();
        assert_eq!((image.width, image.height), (Some(100), Some(75)));
    }

    #[test]
    fn test_none_is_none() {
        assert_eq!(format_attachment(None), None);
    }
}
