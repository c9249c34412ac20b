//! "Vault Content" inventory with per-row purge

use floem::prelude::*;
use floem::text::Weight;
use luxevault::catalog::{EMPTY_INVENTORY, InventoryRow};

use crate::gui::shared::theme::{caption_style, secondary_button_style};
use crate::gui::shared::{ThumbSource, colors, thumbnail_view};
use crate::gui::state::{AdminState, AppState};

const ROW_THUMB: u32 = 80;

pub fn inventory_list(app: AppState, state: AdminState) -> impl IntoView {
    let catalog = state.catalog;

    v_stack((
        h_stack((
            label(|| "Vault Content").style(|s| {
                s.font_size(20.0)
                    .font_weight(Weight::BOLD)
                    .color(colors().text_primary)
            }),
            empty().style(|s| s.flex_grow(1.0)),
            label(move || catalog.with(|c| c.count_label())).style(caption_style),
        ))
        .style(|s| s.width_full().items_center().margin_bottom(12.0)),
        rows(app, state),
    ))
    .style(|s| s.flex_grow(1.0).flex_basis(0.0).min_width(0.0).height_full())
}

fn rows(app: AppState, state: AdminState) -> impl IntoView {
    let catalog = state.catalog;

    dyn_container(
        move || catalog.with(|c| c.is_empty()),
        move |is_empty| {
            if is_empty {
                container(label(|| EMPTY_INVENTORY).style(|s| {
                    s.font_size(11.0)
                        .font_weight(Weight::BOLD)
                        .color(colors().text_muted)
                }))
                .style(|s| s.width_full().padding(48.0).justify_center())
                .into_any()
            } else {
                let (app, state) = (app.clone(), state.clone());
                scroll(
                    dyn_stack(
                        move || catalog.with(|c| c.inventory()),
                        |row| (row.key.clone(), row.thumbnail.clone()),
                        move |row| inventory_row(app.clone(), state.clone(), row),
                    )
                    .style(|s| s.flex_col().width_full().gap(12.0)),
                )
                .style(|s| s.width_full().height_full())
                .into_any()
            }
        },
    )
    .style(|s| s.width_full().flex_grow(1.0).flex_basis(0.0).min_height(0.0))
}

fn inventory_row(app: AppState, state: AdminState, row: InventoryRow) -> impl IntoView {
    let catalog = state.catalog;
    let failed_key = row.key.clone();
    let purge_key = row.key.clone();
    let name = row.name.clone();
    let id = format!("ID: {}", row.short_id);

    h_stack((
        thumbnail_view(
            row.thumbnail.url().map(|url| ThumbSource::Remote(url.to_string())),
            ROW_THUMB,
            ROW_THUMB,
            "Null",
            move || catalog.update(|c| c.mark_thumbnail_failed(&failed_key)),
        ),
        v_stack((
            label(move || name.clone()).style(|s| {
                s.font_size(14.0)
                    .font_weight(Weight::BOLD)
                    .color(colors().text_primary)
            }),
            label(move || id.clone()).style(caption_style),
        ))
        .style(|s| s.gap(4.0).flex_grow(1.0).min_width(0.0)),
        button("Purge")
            .style(|s| secondary_button_style(s).color(colors().error))
            .action(move || state.purge(&app, purge_key.clone())),
    ))
    .style(|s| {
        let c = colors();
        s.width_full()
            .items_center()
            .gap(16.0)
            .padding(12.0)
            .background(c.bg_surface)
            .border(1.0)
            .border_color(c.border)
            .border_radius(16.0)
    })
}
