//! "Sync New Asset" upload form

use floem::prelude::*;
use floem::text::Weight;

use crate::gui::shared::theme::{caption_style, input_style, primary_button_style, secondary_button_style};
use crate::gui::shared::{ThumbSource, colors, thumbnail_view};
use crate::gui::state::{AdminState, AppState, StatusMessage};

const PREVIEW_SIZE: u32 = 160;

pub fn upload_form(app: AppState, state: AdminState) -> impl IntoView {
    let submitting = state.submitting;
    let stage = state.stage;

    let (state_model, state_model_label) = (state.clone(), state.clone());
    let (state_thumb, state_thumb_label) = (state.clone(), state.clone());
    let state_submit = state.clone();

    v_stack((
        label(|| "Sync New Asset").style(|s| {
            s.font_size(20.0)
                .font_weight(Weight::BOLD)
                .color(colors().text_primary)
                .margin_bottom(12.0)
        }),
        // Name
        label(|| "Asset Title").style(caption_style),
        text_input(state.name)
            .placeholder("e.g. Chronos Edition")
            .style(input_style),
        // Model
        label(|| "3D Data (.glb)").style(|s| caption_style(s).margin_top(12.0)),
        h_stack((
            button("Select Binary Model")
                .style(secondary_button_style)
                .disabled(move || submitting.get())
                .action(move || state_model.choose_model()),
            label(move || state_model_label.model_label())
                .style(|s| s.font_size(11.0).color(colors().text_secondary)),
        ))
        .style(|s| s.items_center().gap(12.0)),
        // Thumbnail
        label(|| "Thumbnail Preview").style(|s| caption_style(s).margin_top(12.0)),
        h_stack((
            thumbnail_preview(state.clone()),
            v_stack((
                button("Upload Cover Art")
                    .style(secondary_button_style)
                    .disabled(move || submitting.get())
                    .action(move || state_thumb.choose_thumbnail()),
                label(move || state_thumb_label.thumbnail_label())
                    .style(|s| s.font_size(11.0).color(colors().text_secondary)),
            ))
            .style(|s| s.gap(8.0)),
        ))
        .style(|s| s.items_center().gap(16.0)),
        // Submit
        button(label(move || {
            if submitting.get() {
                "Syncing...".to_string()
            } else {
                "Authorize Sync".to_string()
            }
        }))
        .style(|s| primary_button_style(s).width_full().margin_top(20.0))
        .disabled(move || submitting.get())
        .action(move || state_submit.submit(&app)),
        label(move || stage.get()).style(move |s| {
            let s = s.font_size(10.0).color(colors().text_muted);
            if submitting.get() {
                s
            } else {
                s.display(floem::style::Display::None)
            }
        }),
        status_line(state),
    ))
    .style(|s| {
        let c = colors();
        s.width_pct(40.0)
            .gap(6.0)
            .padding(28.0)
            .background(c.bg_surface)
            .border(1.0)
            .border_color(c.border)
            .border_radius(24.0)
    })
}

fn thumbnail_preview(state: AdminState) -> impl IntoView {
    let path = state.thumbnail_path;

    dyn_container(
        move || path.get(),
        move |current| {
            thumbnail_view(
                current.map(ThumbSource::Local),
                PREVIEW_SIZE,
                PREVIEW_SIZE,
                "No Preview",
                || {},
            )
            .into_any()
        },
    )
}

fn status_line(state: AdminState) -> impl IntoView {
    let status = state.status;

    label(move || match status.get() {
        Some(StatusMessage::Success(text) | StatusMessage::Error(text)) => text,
        None => String::new(),
    })
    .style(move |s| {
        let c = colors();
        let s = s.font_size(11.0).margin_top(8.0).padding(10.0).border_radius(8.0);
        match status.get() {
            Some(StatusMessage::Success(_)) => s.color(c.success).background(c.bg_muted),
            Some(StatusMessage::Error(_)) => s.color(c.error).background(c.error_bg),
            None => s.display(floem::style::Display::None),
        }
    })
}
