//! Detail overlay for the selected asset

use floem::event::{Event, EventListener};
use floem::keyboard::{Key, NamedKey};
use floem::prelude::*;
use floem::text::Weight;
use floem_reactive::create_memo;
use luxevault::catalog::CARD_REF_LEN;
use luxevault::record::{AssetRecord, THUMBNAIL_PLACEHOLDER};

use crate::gui::preview::launch_viewer;
use crate::gui::shared::theme::{caption_style, overlay_style, primary_button_style, secondary_button_style};
use crate::gui::shared::{ThumbSource, colors, thumbnail_view};
use crate::gui::state::StorefrontState;

pub fn detail_overlay(state: StorefrontState) -> impl IntoView {
    let catalog = state.catalog;
    let state_selected = state.clone();
    // Snapshots that leave the selection alone must not rebuild the panel
    let selected_key = create_memo(move |_| state_selected.selected_key());

    dyn_container(
        move || selected_key.get(),
        move |key| match key.and_then(|_| state.selected_untracked()) {
            Some(record) => detail_panel(state.clone(), record).into_any(),
            None => empty().into_any(),
        },
    )
    .style(move |s| {
        if catalog.with(|c| c.selected().is_some()) {
            overlay_style(s)
        } else {
            s.display(floem::style::Display::None)
        }
    })
}

fn detail_panel(state: StorefrontState, record: AssetRecord) -> impl IntoView {
    let status = state.detail_status;
    let downloading = state.downloading;
    let name = record.name.clone();
    let reference = format!("Ref: {}", record.short_ref(CARD_REF_LEN));
    let thumbnail = record.thumbnail();

    let state_view = state.clone();
    let record_view = record.clone();
    let state_download = state.clone();
    let state_close = state.clone();
    let state_key = state;

    v_stack((
        thumbnail_view(
            thumbnail.url().map(|url| ThumbSource::Remote(url.to_string())),
            480,
            320,
            THUMBNAIL_PLACEHOLDER,
            || {},
        ),
        label(move || name.clone()).style(|s| {
            s.font_size(22.0)
                .font_weight(Weight::BOLD)
                .color(colors().text_primary)
                .margin_top(16.0)
        }),
        label(move || reference.clone()).style(caption_style),
        label(|| "High-Fidelity Spatial Archive").style(caption_style),
        h_stack((
            button("Open 3D Viewer")
                .style(primary_button_style)
                .action(move || match launch_viewer(&record_view) {
                    Ok(()) => state_view.detail_status.set("Viewer opened".to_string()),
                    Err(e) => state_view.detail_status.set(e),
                }),
            button("Download")
                .style(secondary_button_style)
                .disabled(move || downloading.get())
                .action(move || state_download.download(&record)),
            empty().style(|s| s.flex_grow(1.0)),
            button("Close Visualization")
                .style(secondary_button_style)
                .action(move || state_close.close_detail()),
        ))
        .style(|s| s.width_full().gap(8.0).margin_top(16.0)),
        label(move || status.get()).style(|s| s.font_size(11.0).color(colors().text_secondary)),
    ))
    .style(|s| {
        let c = colors();
        s.padding(28.0)
            .gap(4.0)
            .background(c.bg_surface)
            .border_radius(24.0)
            .width(540.0)
    })
    .keyboard_navigable()
    .on_event_stop(EventListener::KeyDown, move |e| {
        if let Event::KeyDown(key_event) = e {
            if key_event.key.logical_key == Key::Named(NamedKey::Escape) {
                state_key.close_detail();
            }
        }
    })
    .on_click_stop(|_| {})
}
