//! glTF scene import
//!
//! Builds a [`SceneNode`] tree from a `.glb`/`.gltf` file. Only the document
//! is parsed: primitive bounds come from the POSITION accessor min/max, so
//! vertex buffers are never decoded.
//!
//! Documents that require a mesh compression extension (Draco, meshopt) are
//! rejected with [`Error::UnsupportedCompression`] before parsing.

use std::fs;
use std::io::Read;
use std::path::Path;

use glam::{Quat, Vec3};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::normalize::{Bounds, MaterialParams, MeshPart, NodeTransform, SceneNode};

/// Required extensions that neither this importer nor the viewer can decode
pub const UNSUPPORTED_EXTENSIONS: &[&str] = &["KHR_draco_mesh_compression", "EXT_meshopt_compression"];

const GLB_MAGIC: &[u8; 4] = b"glTF";
const JSON_CHUNK: &[u8; 4] = b"JSON";

#[derive(Deserialize, Default)]
struct RequiredExtensions {
    #[serde(default, rename = "extensionsRequired")]
    extensions_required: Vec<String>,
}

/// Load the default scene (or the first one) of a glTF/GLB file.
///
/// # Errors
/// Returns an error if the file cannot be read, needs an unsupported
/// compression extension, fails to parse, or holds no scene.
pub fn load_scene(path: impl AsRef<Path>) -> Result<SceneNode> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    ensure_decodable(data.as_slice())?;
    let gltf = gltf::Gltf::from_slice(&data)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "scene".to_string());
    build_scene(&gltf.document, name)
}

/// Load from in-memory GLB or glTF JSON bytes.
///
/// # Errors
/// Returns an error if the data needs an unsupported compression extension,
/// fails to parse, or holds no scene.
pub fn load_scene_from_slice(data: &[u8]) -> Result<SceneNode> {
    ensure_decodable(data)?;
    let gltf = gltf::Gltf::from_slice(data)?;
    build_scene(&gltf.document, "scene".to_string())
}

/// Required extensions of a GLB/glTF stream that cannot be decoded here.
///
/// Only the GLB header and JSON chunk are read.
pub fn unsupported_extensions(reader: impl Read) -> Result<Vec<String>> {
    let json = read_document_json(reader)?;
    let doc: RequiredExtensions = serde_json::from_slice(&json).map_err(|e| Error::GltfLoadFailed {
        message: format!("invalid glTF JSON: {e}"),
    })?;
    Ok(doc
        .extensions_required
        .into_iter()
        .filter(|ext| UNSUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .collect())
}

/// Fail with [`Error::UnsupportedCompression`] for the first undecodable
/// required extension.
pub fn ensure_decodable(reader: impl Read) -> Result<()> {
    match unsupported_extensions(reader)?.into_iter().next() {
        Some(extension) => Err(Error::UnsupportedCompression { extension }),
        None => Ok(()),
    }
}

/// JSON text of a glTF document, or the JSON chunk of a GLB container
fn read_document_json(mut reader: impl Read) -> Result<Vec<u8>> {
    let truncated = |e: std::io::Error| Error::GltfLoadFailed {
        message: format!("truncated glTF data: {e}"),
    };

    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic).map_err(truncated)?;
    if &magic != GLB_MAGIC {
        let mut json = magic.to_vec();
        reader.read_to_end(&mut json).map_err(truncated)?;
        return Ok(json);
    }

    // version, total length, then the first chunk's length and type
    let mut header = [0u8; 16];
    reader.read_exact(&mut header).map_err(truncated)?;
    if &header[12..16] != JSON_CHUNK {
        return Err(Error::GltfLoadFailed {
            message: "GLB does not start with a JSON chunk".to_string(),
        });
    }
    let chunk_len = u32::from_le_bytes([header[8], header[9], header[10], header[11]]);

    let mut json = Vec::new();
    reader
        .take(u64::from(chunk_len))
        .read_to_end(&mut json)
        .map_err(truncated)?;
    Ok(json)
}

fn build_scene(document: &gltf::Document, fallback_name: String) -> Result<SceneNode> {
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| Error::GltfLoadFailed {
            message: "file contains no scene".to_string(),
        })?;

    let name = scene.name().map_or(fallback_name, str::to_string);
    let mut root = SceneNode::new(name);
    for node in scene.nodes() {
        root.children.push(convert_node(&node));
    }

    tracing::debug!(
        "Imported scene '{}' with {} meshes",
        root.name,
        root.mesh_count()
    );
    Ok(root)
}

fn convert_node(node: &gltf::Node) -> SceneNode {
    let (translation, rotation, scale) = node.transform().decomposed();
    let mut out = SceneNode::new(node.name().unwrap_or("node")).with_transform(NodeTransform {
        translation: Vec3::from_array(translation),
        rotation: Quat::from_array(rotation),
        scale: Vec3::from_array(scale),
    });

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            let bb = primitive.bounding_box();
            let bounds = Bounds::new(Vec3::from_array(bb.min), Vec3::from_array(bb.max));
            out.meshes.push(MeshPart::new(bounds, vec![material_params(&primitive.material())]));
        }
    }

    for child in node.children() {
        out.children.push(convert_node(&child));
    }
    out
}

fn material_params(material: &gltf::Material) -> MaterialParams {
    let pbr = material.pbr_metallic_roughness();
    MaterialParams {
        env_intensity: 1.0,
        roughness: pbr.roughness_factor(),
        metalness: pbr.metallic_factor(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{MeshHierarchy, NormalizeSettings, normalize};
    use pretty_assertions::assert_eq;

    const WATCH: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "name": "Chronos", "nodes": [0] } ],
        "nodes": [
            { "name": "Case", "translation": [1.0, 2.0, 3.0], "scale": [2.0, 2.0, 2.0], "mesh": 0, "children": [1] },
            { "name": "Crown", "translation": [0.0, 5.0, 0.0], "mesh": 0 }
        ],
        "meshes": [ { "primitives": [ { "attributes": { "POSITION": 0 }, "material": 0 } ] } ],
        "materials": [ { "pbrMetallicRoughness": { "metallicFactor": 0.9, "roughnessFactor": 0.1 } } ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3", "min": [-1.0, -1.0, -1.0], "max": [1.0, 1.0, 1.0] }
        ],
        "bufferViews": [ { "buffer": 0, "byteLength": 36 } ],
        "buffers": [
            { "byteLength": 36, "uri": "data:application/octet-stream;base64,AACAvwAAgL8AAIC/AACAPwAAgD8AAIA/AAAAAAAAAAAAAAAA" }
        ]
    }"#;

    const DRACO_REQUIRED: &str = r#"{
        "asset": { "version": "2.0" },
        "extensionsUsed": ["KHR_draco_mesh_compression"],
        "extensionsRequired": ["KHR_draco_mesh_compression"],
        "scenes": [ { "nodes": [] } ]
    }"#;

    /// Wrap a JSON document in a GLB container with a 4-byte aligned chunk
    fn glb(json: &str) -> Vec<u8> {
        let mut chunk = json.as_bytes().to_vec();
        while chunk.len() % 4 != 0 {
            chunk.push(b' ');
        }
        let chunk_len = u32::try_from(chunk.len()).unwrap();
        let mut out = Vec::new();
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&(12 + 8 + chunk_len).to_le_bytes());
        out.extend_from_slice(&chunk_len.to_le_bytes());
        out.extend_from_slice(b"JSON");
        out.extend_from_slice(&chunk);
        out
    }

    #[test]
    fn test_builds_node_tree() {
        let scene = load_scene_from_slice(WATCH.as_bytes()).unwrap();
        assert_eq!(scene.name, "Chronos");
        assert_eq!(scene.children.len(), 1);

        let case = &scene.children[0];
        assert_eq!(case.name, "Case");
        assert_eq!(case.transform.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(case.children[0].name, "Crown");
        assert_eq!(scene.mesh_count(), 2);

        let material = case.meshes[0].materials[0];
        assert!((material.metalness - 0.9).abs() < 1e-6);
        assert!((material.roughness - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_world_bounds_follow_node_transforms() {
        let scene = load_scene_from_slice(WATCH.as_bytes()).unwrap();
        let bounds = scene.world_bounds().unwrap();
        // Case spans y in [0, 4]; the Crown inherits its scale and reaches y = 14
        assert_eq!(bounds.min, Vec3::new(-1.0, 0.0, 1.0));
        assert_eq!(bounds.max, Vec3::new(3.0, 14.0, 5.0));
    }

    #[test]
    fn test_imported_scene_normalizes() {
        let mut scene = load_scene_from_slice(WATCH.as_bytes()).unwrap();
        normalize(&mut scene, &NormalizeSettings::default());
        let bounds = scene.world_bounds().unwrap();
        assert!((bounds.max_extent() - 2.8).abs() < 1e-4);
    }

    #[test]
    fn test_garbage_is_a_load_error() {
        let err = load_scene_from_slice(b"not a model").unwrap_err();
        assert!(matches!(err, Error::GltfLoadFailed { .. }));
    }

    #[test]
    fn test_glb_container_imports() {
        let scene = load_scene_from_slice(&glb(WATCH)).unwrap();
        assert_eq!(scene.mesh_count(), 2);
    }

    #[test]
    fn test_draco_document_is_rejected_by_name() {
        let err = load_scene_from_slice(DRACO_REQUIRED.as_bytes()).unwrap_err();
        match err {
            Error::UnsupportedCompression { extension } => {
                assert_eq!(extension, "KHR_draco_mesh_compression");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_compression_is_found_in_glb_header() {
        let found = unsupported_extensions(glb(DRACO_REQUIRED).as_slice()).unwrap();
        assert_eq!(found, vec!["KHR_draco_mesh_compression".to_string()]);
        assert!(ensure_decodable(glb(WATCH).as_slice()).is_ok());
    }

    #[test]
    fn test_used_only_extension_is_decodable() {
        let json = r#"{"asset":{"version":"2.0"},"extensionsUsed":["KHR_draco_mesh_compression"]}"#;
        assert!(unsupported_extensions(json.as_bytes()).unwrap().is_empty());
    }
}
