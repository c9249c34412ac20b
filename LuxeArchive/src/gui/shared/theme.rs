//! Showroom palette and common style helpers

use floem::prelude::*;
use floem::style::Style;
use floem::text::Weight;

/// Color palette for the showroom
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    // Backgrounds
    pub bg_base: Color,
    pub bg_surface: Color,
    pub bg_muted: Color,
    pub backdrop: Color,

    // Text
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub text_inverse: Color,

    // Borders
    pub border: Color,

    // Accents
    pub accent: Color,
    pub accent_hover: Color,
    pub success: Color,
    pub error: Color,
    pub error_bg: Color,
}

impl ThemeColors {
    pub const fn showroom() -> Self {
        Self {
            bg_base: Color::rgb8(250, 250, 248),
            bg_surface: Color::WHITE,
            bg_muted: Color::rgb8(242, 242, 240),
            backdrop: Color::rgba8(0, 0, 0, 100),

            text_primary: Color::rgb8(10, 10, 10),
            text_secondary: Color::rgb8(90, 90, 90),
            text_muted: Color::rgb8(160, 160, 160),
            text_inverse: Color::WHITE,

            border: Color::rgb8(230, 230, 228),

            accent: Color::rgb8(10, 10, 10),
            accent_hover: Color::rgb8(60, 60, 60),
            success: Color::rgb8(46, 125, 50),
            error: Color::rgb8(211, 47, 47),
            error_bg: Color::rgb8(253, 236, 236),
        }
    }
}

/// Active palette
pub fn colors() -> ThemeColors {
    ThemeColors::showroom()
}

/// Uppercase micro-label used for headings and captions
pub fn caption_style(s: Style) -> Style {
    let c = colors();
    s.font_size(10.0)
        .font_weight(Weight::BOLD)
        .color(c.text_muted)
}

/// Solid black action button
pub fn primary_button_style(s: Style) -> Style {
    let c = colors();
    s.padding_horiz(20.0)
        .padding_vert(10.0)
        .background(c.accent)
        .color(c.text_inverse)
        .font_size(11.0)
        .font_weight(Weight::BOLD)
        .border_radius(20.0)
        .hover(|s| s.background(c.accent_hover))
        .disabled(|s| s.background(c.text_muted))
}

/// Outlined secondary button
pub fn secondary_button_style(s: Style) -> Style {
    let c = colors();
    s.padding_horiz(16.0)
        .padding_vert(8.0)
        .background(c.bg_surface)
        .color(c.text_primary)
        .font_size(11.0)
        .border(1.0)
        .border_color(c.border)
        .border_radius(20.0)
        .hover(|s| s.background(c.bg_muted))
}

/// Text field inside forms and the login modal
pub fn input_style(s: Style) -> Style {
    let c = colors();
    s.width_full()
        .padding(10.0)
        .border(1.0)
        .border_radius(8.0)
        .border_color(c.border)
        .background(c.bg_surface)
        .font_size(13.0)
}

/// Full-window dimmed overlay for modals
pub fn overlay_style(s: Style) -> Style {
    s.position(floem::style::Position::Absolute)
        .inset_top(0.0)
        .inset_left(0.0)
        .inset_bottom(0.0)
        .inset_right(0.0)
        .items_center()
        .justify_center()
        .background(colors().backdrop)
        .z_index(100)
}
