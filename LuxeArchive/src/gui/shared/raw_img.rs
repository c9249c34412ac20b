//! Image view over decoded RGBA pixels

use std::sync::Arc;

use floem::peniko::{self, Blob};
use floem::prelude::*;
use floem::{View, ViewId, taffy};
use floem_reactive::create_effect;
use floem_renderer::Renderer;

use super::thumbnail::DecodedImage;

/// Draws a [`DecodedImage`] at its pixel size.
///
/// The texture cache is keyed by `cache_key`, so two views showing the same
/// thumbnail share one upload.
pub struct RawImg {
    id: ViewId,
    img: Option<peniko::Image>,
    content_node: Option<taffy::tree::NodeId>,
    cache_key: u64,
}

pub fn raw_img(image: &DecodedImage) -> RawImg {
    let blob = Blob::new(Arc::new(image.rgba.clone().into_boxed_slice()));
    let peniko_image = peniko::Image::new(blob, peniko::Format::Rgba8, image.width, image.height);
    let cache_key = image.cache_key;

    let id = ViewId::new();
    create_effect(move |_| {
        id.update_state(peniko_image.clone());
    });
    RawImg {
        id,
        img: None,
        content_node: None,
        cache_key,
    }
}

impl View for RawImg {
    fn id(&self) -> ViewId {
        self.id
    }

    fn debug_name(&self) -> std::borrow::Cow<'static, str> {
        "RawImg".into()
    }

    fn update(&mut self, _cx: &mut floem::context::UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(img) = state.downcast::<peniko::Image>() {
            self.img = Some(*img);
            self.id.request_layout();
        }
    }

    fn layout(&mut self, cx: &mut floem::context::LayoutCx) -> taffy::tree::NodeId {
        let id = self.id;
        let (width, height) = self
            .img
            .as_ref()
            .map_or((0, 0), |img| (img.width, img.height));
        let content_node = *self.content_node.get_or_insert_with(|| id.new_taffy_node());

        cx.layout_node(id, true, |_cx| {
            let style = floem::style::Style::new()
                .width(f64::from(width).px())
                .height(f64::from(height).px())
                .to_taffy_style();
            id.set_taffy_style(content_node, style);

            vec![content_node]
        })
    }

    fn paint(&mut self, cx: &mut floem::context::PaintCx) {
        if let Some(ref img) = self.img {
            let rect = self.id.get_content_rect();
            let hash_bytes = self.cache_key.to_le_bytes();
            cx.draw_img(
                floem_renderer::Img {
                    img: img.clone(),
                    hash: &hash_bytes,
                },
                rect,
            );
        }
    }
}
