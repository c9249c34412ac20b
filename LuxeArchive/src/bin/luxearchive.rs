//! Luxe Archive storefront and admin application

fn main() {
    tracing_subscriber::fmt::init();
    luxearchive::gui::run_app();
}
