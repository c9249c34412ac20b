//! Luxe Archive GUI
//!
//! A floem application with two screens:
//! - Storefront: live grid of archived assets, detail view and admin login
//! - Admin: upload form (model + thumbnail) and inventory with purge
//!
//! The 3D view of an asset runs in the separate `luxe-viewer` process.

pub mod preview;
pub mod screens;
pub mod shared;
pub mod state;

use floem::Application;
use floem::event::EventListener;
use floem::prelude::*;
use floem::window::WindowConfig;
use luxevault::session::Route;

use preview::kill_preview_process;
use screens::{admin_screen, storefront_screen};
use state::AppState;

/// Run the Luxe Archive GUI application
pub fn run_app() {
    Application::new()
        .window(
            move |_| app_view(),
            Some(
                WindowConfig::default()
                    .size((1280.0, 860.0))
                    .title("Luxe Archive"),
            ),
        )
        .run();
}

fn app_view() -> impl IntoView {
    let app = AppState::new();
    let route = app.route;

    dyn_container(
        move || route.get(),
        move |requested| {
            let app = app.clone();
            match app.session.resolve(requested) {
                Route::Storefront => storefront_screen(app).into_any(),
                Route::Admin => admin_screen(app).into_any(),
            }
        },
    )
    .style(|s| s.width_full().height_full())
    .window_title(|| "Luxe Archive".to_string())
    .on_event(EventListener::WindowClosed, move |_| {
        kill_preview_process();
        // quit_app() leaves the background fetch threads running
        std::process::exit(0);
    })
}
