//! Storefront: the public grid of catalog assets

mod card;
mod detail;
mod login;

use floem::prelude::*;
use floem::text::Weight;
use luxevault::catalog::EMPTY_STOREFRONT;

use crate::gui::shared::theme::{caption_style, secondary_button_style};
use crate::gui::shared::{colors, watch_catalog};
use crate::gui::state::{AppState, StorefrontState};

use card::asset_card;
use detail::detail_overlay;
use login::login_overlay;

pub fn storefront_screen(app: AppState) -> impl IntoView {
    let mounted_at = app.epoch.get_untracked();
    let app_for_feed = app.clone();
    let catalog = watch_catalog(&app.store, move || app_for_feed.is_current(mounted_at));
    let state = StorefrontState::new(catalog);

    v_stack((
        header(app.clone(), state.clone()),
        asset_grid(state.clone()),
        detail_overlay(state.clone()),
        login_overlay(app, state),
    ))
    .style(|s| s.width_full().height_full().background(colors().bg_base))
}

fn header(app: AppState, state: StorefrontState) -> impl IntoView {
    let catalog = state.catalog;

    h_stack((
        v_stack((
            label(|| "The Archive").style(|s| {
                s.font_size(18.0)
                    .font_weight(Weight::BOLD)
                    .color(colors().text_primary)
            }),
            label(|| "Curating spatial excellence. High-fidelity volumes only.").style(caption_style),
        ))
        .style(|s| s.gap(4.0)),
        empty().style(|s| s.flex_grow(1.0)),
        label(move || catalog.with(|c| c.count_label()))
            .style(|s| caption_style(s).margin_right(16.0)),
        // Screens remount on every navigation, so reading the flag once is enough
        button(if app.session.is_authorized() {
            "Authorized Access"
        } else {
            "System Administration"
        })
        .style(secondary_button_style)
        .action(move || state.request_admin(&app)),
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

fn asset_grid(state: StorefrontState) -> impl IntoView {
    let catalog = state.catalog;

    dyn_container(
        move || catalog.with(|c| c.is_empty()),
        move |is_empty| {
            if is_empty {
                container(label(|| EMPTY_STOREFRONT).style(|s| {
                    s.font_size(11.0)
                        .font_weight(Weight::BOLD)
                        .color(colors().text_muted)
                }))
                .style(|s| s.width_full().height_full().items_center().justify_center())
                .into_any()
            } else {
                let state = state.clone();
                scroll(
                    dyn_stack(
                        move || catalog.with(|c| c.cards()),
                        |card| (card.key.clone(), card.thumbnail.clone()),
                        move |card| asset_card(state.clone(), card),
                    )
                    .style(|s| {
                        s.width_full()
                            .flex_direction(floem::style::FlexDirection::Row)
                            .flex_wrap(floem::style::FlexWrap::Wrap)
                            .gap(24.0)
                            .padding(32.0)
                    }),
                )
                .style(|s| s.width_full().height_full())
                .into_any()
            }
        },
    )
    .style(|s| s.width_full().flex_grow(1.0).flex_basis(0.0).min_height(0.0))
}
