//! CLI command for previewing normalization of a local model

use std::path::Path;

use crate::cli::progress::{LOOKING_GLASS, print_step};
use crate::config::VaultConfig;
use crate::gltf_import::load_scene;
use crate::normalize::{Bounds, NormalizeSettings, normalize};

fn describe(bounds: Option<&Bounds>) -> String {
    match bounds {
        Some(b) => {
            let size = b.size();
            let center = b.center();
            format!(
                "size {:.3} x {:.3} x {:.3}, center ({:.3}, {:.3}, {:.3})",
                size.x, size.y, size.z, center.x, center.y, center.z
            )
        }
        None => "no meshes".to_string(),
    }
}

pub fn execute(file: &Path, target_size: Option<f32>) -> anyhow::Result<()> {
    let config = VaultConfig::load();
    let mut settings = NormalizeSettings::from_config(&config);
    if let Some(target) = target_size {
        settings.target_size = target;
    }

    print_step(1, 1, &LOOKING_GLASS, &format!("Reading {}...", file.display()));
    let mut scene = load_scene(file)?;
    let report = normalize(&mut scene, &settings);

    println!("Scene:   {}", scene.name);
    println!("Meshes:  {}", report.mesh_count);
    println!("Before:  {}", describe(report.bounds_before.as_ref()));
    println!("Scale:   {:.5}", report.scale);
    println!(
        "Offset:  ({:.3}, {:.3}, {:.3})",
        report.offset.x, report.offset.y, report.offset.z
    );
    println!("After:   {}", describe(report.bounds_after.as_ref()));
    Ok(())
}
