//! Login modal guarding the admin screen

use floem::event::{Event, EventListener};
use floem::keyboard::{Key, NamedKey};
use floem::prelude::*;
use floem::text::Weight;

use crate::gui::shared::colors;
use crate::gui::shared::theme::{caption_style, input_style, overlay_style, primary_button_style, secondary_button_style};
use crate::gui::state::{AppState, StorefrontState};

pub fn login_overlay(app: AppState, state: StorefrontState) -> impl IntoView {
    let open = state.login_open;

    dyn_container(
        move || open.get(),
        move |is_open| {
            if is_open {
                login_panel(app.clone(), state.clone()).into_any()
            } else {
                empty().into_any()
            }
        },
    )
    .style(move |s| {
        if open.get() {
            overlay_style(s)
        } else {
            s.display(floem::style::Display::None)
        }
    })
}

fn login_panel(app: AppState, state: StorefrontState) -> impl IntoView {
    let identifier = state.login_identifier;
    let passcode = state.login_passcode;
    let error = state.login_error;

    let (app_submit, state_submit) = (app.clone(), state.clone());
    let (app_key, state_key) = (app, state.clone());
    let state_cancel = state;

    v_stack((
        label(|| "Access").style(|s| {
            s.font_size(20.0)
                .font_weight(Weight::BOLD)
                .color(colors().text_primary)
        }),
        label(|| "Vault Synchronization").style(caption_style),
        label(|| "Identifier").style(|s| caption_style(s).margin_top(12.0)),
        {
            let input = text_input(identifier)
                .placeholder("vault@archive.luxe")
                .style(input_style);
            input.id().request_focus();
            input
        },
        label(|| "Passcode").style(|s| caption_style(s).margin_top(8.0)),
        text_input(passcode).placeholder("Passcode").style(input_style),
        label(move || error.get().unwrap_or_default()).style(move |s| {
            let s = s.font_size(11.0).color(colors().error);
            if error.with(Option::is_some) {
                s
            } else {
                s.display(floem::style::Display::None)
            }
        }),
        h_stack((
            button("Authenticate")
                .style(primary_button_style)
                .action(move || state_submit.submit_login(&app_submit)),
            button("Cancel")
                .style(secondary_button_style)
                .action(move || state_cancel.close_login()),
        ))
        .style(|s| s.gap(8.0).margin_top(16.0)),
    ))
    .style(|s| {
        s.padding(32.0)
            .gap(6.0)
            .width(380.0)
            .background(colors().bg_surface)
            .border_radius(24.0)
    })
    .on_event_stop(EventListener::KeyDown, move |e| {
        if let Event::KeyDown(key_event) = e {
            match &key_event.key.logical_key {
                Key::Named(NamedKey::Enter) => state_key.submit_login(&app_key),
                Key::Named(NamedKey::Escape) => state_key.close_login(),
                _ => {}
            }
        }
    })
    .on_click_stop(|_| {})
}
