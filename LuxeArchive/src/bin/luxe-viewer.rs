//! Standalone 3D asset viewer
//!
//! Usage: luxe-viewer <path-or-url> [--title <name>]

use clap::Parser;

fn main() {
    let args = luxearchive::viewer::ViewerArgs::parse();
    luxearchive::viewer::run(args);
}
