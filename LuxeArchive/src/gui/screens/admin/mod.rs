//! Admin screen: upload form and inventory

mod form;
mod inventory;

use floem::prelude::*;
use floem::text::Weight;
use luxevault::session::Route;

use crate::gui::shared::theme::{caption_style, primary_button_style, secondary_button_style};
use crate::gui::shared::{colors, watch_catalog};
use crate::gui::state::{AdminState, AppState};

use form::upload_form;
use inventory::inventory_list;

pub fn admin_screen(app: AppState) -> impl IntoView {
    let mounted_at = app.epoch.get_untracked();
    let app_for_feed = app.clone();
    let catalog = watch_catalog(&app.store, move || app_for_feed.is_current(mounted_at));
    let state = AdminState::new(catalog);

    v_stack((
        header(app.clone(), state.clone()),
        h_stack((upload_form(app.clone(), state.clone()), inventory_list(app, state)))
            .style(|s| {
                s.width_full()
                    .flex_grow(1.0)
                    .flex_basis(0.0)
                    .min_height(0.0)
                    .gap(32.0)
                    .padding(32.0)
            }),
    ))
    .style(|s| s.width_full().height_full().background(colors().bg_base))
}

fn header(app: AppState, state: AdminState) -> impl IntoView {
    let app_back = app.clone();

    h_stack((
        v_stack((
            label(|| "SYSTEM PANEL").style(|s| {
                s.font_size(18.0)
                    .font_weight(Weight::BOLD)
                    .color(colors().text_primary)
            }),
            label(|| "Authorized Control Center").style(caption_style),
        ))
        .style(|s| s.gap(4.0)),
        empty().style(|s| s.flex_grow(1.0)),
        button("Logout")
            .style(|s| secondary_button_style(s).margin_right(8.0))
            .action(move || state.logout(&app)),
        button("Back to Archive")
            .style(primary_button_style)
            .action(move || app_back.navigate(Route::Storefront)),
    ))
    .style(|s| {
        s.width_full()
            .items_center()
            .padding_horiz(32.0)
            .padding_vert(20.0)
            .border_bottom(1.0)
            .border_color(colors().border)
    })
}
