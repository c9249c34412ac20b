//! One asset card in the storefront grid

use floem::prelude::*;
use floem::text::Weight;
use luxevault::catalog::CardView;
use luxevault::record::THUMBNAIL_PLACEHOLDER;

use crate::gui::shared::theme::caption_style;
use crate::gui::shared::{ThumbSource, colors, thumbnail_view};
use crate::gui::state::StorefrontState;

const CARD_WIDTH: u32 = 240;
const IMAGE_HEIGHT: u32 = 240;

pub fn asset_card(state: StorefrontState, card: CardView) -> impl IntoView {
    let catalog = state.catalog;
    let failed_key = card.key.clone();
    let open_key = card.key.clone();
    let name = card.name.clone();
    let reference = format!("Ref: {}", card.reference);

    v_stack((
        thumbnail_view(
            card.thumbnail.url().map(|url| ThumbSource::Remote(url.to_string())),
            CARD_WIDTH,
            IMAGE_HEIGHT,
            THUMBNAIL_PLACEHOLDER,
            move || catalog.update(|c| c.mark_thumbnail_failed(&failed_key)),
        ),
        label(move || name.clone()).style(|s| {
            s.font_size(14.0)
                .font_weight(Weight::BOLD)
                .color(colors().text_primary)
                .margin_top(12.0)
                .max_width(f64::from(CARD_WIDTH))
        }),
        label(move || reference.clone()).style(caption_style),
    ))
    .style(|s| {
        let c = colors();
        s.width(f64::from(CARD_WIDTH) + 24.0)
            .padding(12.0)
            .gap(4.0)
            .background(c.bg_surface)
            .border(1.0)
            .border_color(c.border)
            .border_radius(16.0)
            .cursor(floem::style::CursorStyle::Pointer)
            .hover(|s| s.border_color(c.text_muted))
    })
    .on_click_stop(move |_| state.open_detail(&open_key))
}
