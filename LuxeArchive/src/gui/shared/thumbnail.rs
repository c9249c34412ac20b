//! Thumbnail loading and display
//!
//! Images are fetched and decoded on the rayon pool and handed back to the
//! UI thread already cropped to the slot they are shown in.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Arc;

use floem::ext_event::create_ext_action;
use floem::reactive::Scope;
use floem::prelude::*;
use floem::text::Weight;
use image::imageops::FilterType;

use super::raw_img::raw_img;
use super::theme::colors;

/// RGBA pixels ready for [`raw_img`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub cache_key: u64,
}

/// Where a thumbnail is read from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ThumbSource {
    Remote(String),
    Local(PathBuf),
}

#[derive(Clone)]
enum ThumbState {
    Loading,
    Ready(Arc<DecodedImage>),
    Failed,
}

/// Texture cache key for one source at one slot size
pub fn cache_key(source: &ThumbSource, width: u32, height: u32) -> u64 {
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    (width, height).hash(&mut hasher);
    hasher.finish()
}

/// Decode an encoded image and crop-scale it to exactly `width` x `height`
pub fn decode_thumbnail(
    bytes: &[u8],
    width: u32,
    height: u32,
    cache_key: u64,
) -> Result<DecodedImage, image::ImageError> {
    let img = image::load_from_memory(bytes)?;
    let fitted = img.resize_to_fill(width, height, FilterType::Triangle).to_rgba8();
    Ok(DecodedImage {
        width: fitted.width(),
        height: fitted.height(),
        rgba: fitted.into_raw(),
        cache_key,
    })
}

fn load(source: &ThumbSource, width: u32, height: u32) -> Result<DecodedImage, String> {
    let bytes = match source {
        ThumbSource::Remote(url) => luxevault::media::fetch_bytes(url).map_err(|e| e.to_string())?,
        ThumbSource::Local(path) => std::fs::read(path).map_err(|e| e.to_string())?,
    };
    decode_thumbnail(&bytes, width, height, cache_key(source, width, height)).map_err(|e| e.to_string())
}

/// Thumbnail slot. Shows `placeholder` while loading, without a source, and
/// after a failed load; `on_failed` runs once when a load fails.
pub fn thumbnail_view(
    source: Option<ThumbSource>,
    width: u32,
    height: u32,
    placeholder: &'static str,
    on_failed: impl Fn() + 'static,
) -> impl IntoView {
    let state = RwSignal::new(ThumbState::Loading);

    match source {
        Some(source) => {
            let send = create_ext_action(Scope::new(), move |result: Result<DecodedImage, String>| {
                match result {
                    Ok(img) => state.set(ThumbState::Ready(Arc::new(img))),
                    Err(e) => {
                        tracing::debug!("Thumbnail failed: {}", e);
                        state.set(ThumbState::Failed);
                        on_failed();
                    }
                }
            });
            rayon::spawn(move || {
                send(load(&source, width, height));
            });
        }
        None => state.set(ThumbState::Failed),
    }

    dyn_container(
        move || state.get(),
        move |current| match current {
            ThumbState::Ready(img) => raw_img(&img).into_any(),
            ThumbState::Loading => placeholder_view("", width, height).into_any(),
            ThumbState::Failed => placeholder_view(placeholder, width, height).into_any(),
        },
    )
    .style(move |s| {
        s.width(f64::from(width))
            .height(f64::from(height))
            .border_radius(12.0)
            .background(colors().bg_muted)
    })
}

fn placeholder_view(text: &'static str, width: u32, height: u32) -> impl IntoView {
    container(label(move || text.to_string()).style(|s| {
        s.font_size(9.0)
            .font_weight(Weight::BOLD)
            .color(colors().text_muted)
    }))
    .style(move |s| {
        s.width(f64::from(width))
            .height(f64::from(height))
            .items_center()
            .justify_center()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn encoded_png(width: u32, height: u32) -> Vec<u8> {
        let buffer = ImageBuffer::from_pixel(width, height, Rgba([200u8, 20, 20, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(buffer)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_crops_to_slot() {
        let decoded = decode_thumbnail(&encoded_png(16, 8), 4, 4, 7).unwrap();

        assert_eq!((decoded.width, decoded.height), (4, 4));
        assert_eq!(decoded.rgba.len(), 4 * 4 * 4);
        assert_eq!(decoded.cache_key, 7);
        assert_eq!(&decoded.rgba[..4], &[200, 20, 20, 255]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_thumbnail(b"not an image", 4, 4, 0).is_err());
    }

    #[test]
    fn test_cache_key_depends_on_size() {
        let source = ThumbSource::Remote("https://res.cloudinary.com/demo/image/upload/a.png".into());
        assert_eq!(cache_key(&source, 64, 64), cache_key(&source, 64, 64));
        assert_ne!(cache_key(&source, 64, 64), cache_key(&source, 128, 64));
    }
}
