//! Centering and scaling of mesh hierarchies
//!
//! Every model is brought to a canonical size and position regardless of
//! the units it was authored in:
//!
//! 1. reset the root transform
//! 2. enable shadows on every mesh and tune its materials
//! 3. scale uniformly so the largest world extent equals the target length
//! 4. translate so the scaled bounding box is centered on the origin
//!
//! Only root transform and material parameters change; vertex data is never
//! touched. A degenerate (zero-size or empty) box keeps scale 1.

use glam::{Mat4, Quat, Vec3};

use crate::config::VaultConfig;

// ============================================================================
// Bounds
// ============================================================================

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    /// Smallest box containing every point, or `None` when there are none
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self { min: first, max: first }, |b, p| b.including(p)))
    }

    pub fn including(self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest of the three extents
    pub fn max_extent(&self) -> f32 {
        self.size().max_element()
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Box enclosing this box after an arbitrary affine transform
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let corners = self.corners().map(|c| matrix.transform_point3(c));
        let mut out = Self {
            min: corners[0],
            max: corners[0],
        };
        for corner in &corners[1..] {
            out = out.including(*corner);
        }
        out
    }
}

// ============================================================================
// Materials
// ============================================================================

/// Tunable parameters of one standard (metallic/roughness) material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialParams {
    /// Environment-map reflection strength
    pub env_intensity: f32,
    pub roughness: f32,
    pub metalness: f32,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            env_intensity: 1.0,
            roughness: 1.0,
            metalness: 1.0,
        }
    }
}

// ============================================================================
// Settings and results
// ============================================================================

/// Fixed length the largest extent maps to
pub const DEFAULT_TARGET_SIZE: f32 = 2.8;

/// Environment intensity applied to every standard material
pub const DEFAULT_ENV_INTENSITY: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeSettings {
    pub target_size: f32,
    pub env_intensity: f32,
    /// Roughness is raised to at least this value
    pub min_roughness: f32,
    /// Metalness is lowered to at most this value
    pub max_metalness: f32,
}

impl Default for NormalizeSettings {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            env_intensity: DEFAULT_ENV_INTENSITY,
            min_roughness: 0.0,
            max_metalness: 1.0,
        }
    }
}

impl NormalizeSettings {
    /// Settings for `config`; a target size that is not finite and positive
    /// falls back to [`DEFAULT_TARGET_SIZE`]
    pub fn from_config(config: &VaultConfig) -> Self {
        let target_size = if config.target_size.is_finite() && config.target_size > 0.0 {
            config.target_size
        } else {
            tracing::warn!(
                "Ignoring target_size {} from config, using {}",
                config.target_size,
                DEFAULT_TARGET_SIZE
            );
            DEFAULT_TARGET_SIZE
        };
        Self {
            target_size,
            ..Self::default()
        }
    }

    /// Apply the material adjustments to one material
    pub fn tune(&self, material: &mut MaterialParams) {
        material.env_intensity = self.env_intensity;
        material.roughness = material.roughness.max(self.min_roughness);
        material.metalness = material.metalness.min(self.max_metalness);
    }
}

/// Uniform scale and root offset that normalize a box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeFit {
    pub scale: f32,
    pub offset: Vec3,
}

impl NormalizeFit {
    /// Fit for a box measured with the root at identity.
    ///
    /// Scaling about the origin moves the center to `center * scale`, so the
    /// offset that recenters it is the negated scaled center.
    pub fn from_bounds(bounds: &Bounds, target_size: f32) -> Self {
        let scale = guarded_scale(bounds.max_extent(), target_size);
        Self {
            scale,
            offset: -bounds.center() * scale,
        }
    }

    /// Root transform equivalent to this fit
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), Quat::IDENTITY, self.offset)
    }
}

/// `target / extent`, or 1 when the extent is zero or not finite
fn guarded_scale(extent: f32, target_size: f32) -> f32 {
    if extent.is_finite() && extent > f32::EPSILON {
        target_size / extent
    } else {
        1.0
    }
}

/// What a normalization pass did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeReport {
    pub scale: f32,
    /// Root translation after centering
    pub offset: Vec3,
    pub bounds_before: Option<Bounds>,
    pub bounds_after: Option<Bounds>,
    /// Meshes visited
    pub mesh_count: usize,
}

// ============================================================================
// Hierarchy abstraction
// ============================================================================

/// A scene graph the normalizer can operate on
pub trait MeshHierarchy {
    /// Scale 1, translation 0, rotation identity on the root
    fn reset_root(&mut self);

    /// Enable shadow casting and receiving on every mesh and pass each of its
    /// standard materials to `tune`. Returns the number of meshes visited.
    fn prepare_meshes(&mut self, tune: &mut dyn FnMut(&mut MaterialParams)) -> usize;

    /// World-space box around every mesh, `None` without meshes
    fn world_bounds(&self) -> Option<Bounds>;

    fn set_root_scale(&mut self, scale: f32);

    fn translate_root(&mut self, offset: Vec3);
}

/// Normalize a hierarchy in place
pub fn normalize<H: MeshHierarchy + ?Sized>(hierarchy: &mut H, settings: &NormalizeSettings) -> NormalizeReport {
    hierarchy.reset_root();
    let mesh_count = hierarchy.prepare_meshes(&mut |material| settings.tune(material));

    let bounds_before = hierarchy.world_bounds();
    let scale = bounds_before
        .map(|b| guarded_scale(b.max_extent(), settings.target_size))
        .unwrap_or(1.0);
    hierarchy.set_root_scale(scale);

    let offset = match hierarchy.world_bounds() {
        Some(scaled) => {
            let offset = -scaled.center();
            hierarchy.translate_root(offset);
            offset
        }
        None => Vec3::ZERO,
    };

    let bounds_after = hierarchy.world_bounds();
    tracing::debug!(
        "Normalized {} meshes: scale {:.4}, offset {:?}",
        mesh_count,
        scale,
        offset
    );

    NormalizeReport {
        scale,
        offset,
        bounds_before,
        bounds_after,
        mesh_count,
    }
}

// ============================================================================
// SceneNode
// ============================================================================

/// Local transform of a scene node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl NodeTransform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Geometry attached to a scene node
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPart {
    /// Bounds in the node's local space
    pub local_bounds: Bounds,
    pub materials: Vec<MaterialParams>,
    pub cast_shadows: bool,
    pub receive_shadows: bool,
}

impl MeshPart {
    pub fn new(local_bounds: Bounds, materials: Vec<MaterialParams>) -> Self {
        Self {
            local_bounds,
            materials,
            cast_shadows: false,
            receive_shadows: false,
        }
    }
}

/// Owned scene tree; the node it is called on is the root
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub transform: NodeTransform,
    pub meshes: Vec<MeshPart>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_transform(mut self, transform: NodeTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshPart) -> Self {
        self.meshes.push(mesh);
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first visit of every mesh with its world matrix
    pub fn visit_meshes(&self, visit: &mut dyn FnMut(&MeshPart, &Mat4)) {
        self.visit_with_parent(&Mat4::IDENTITY, visit);
    }

    fn visit_with_parent(&self, parent: &Mat4, visit: &mut dyn FnMut(&MeshPart, &Mat4)) {
        let world = *parent * self.transform.matrix();
        for mesh in &self.meshes {
            visit(mesh, &world);
        }
        for child in &self.children {
            child.visit_with_parent(&world, visit);
        }
    }

    fn visit_meshes_mut(&mut self, visit: &mut dyn FnMut(&mut MeshPart)) {
        for mesh in &mut self.meshes {
            visit(mesh);
        }
        for child in &mut self.children {
            child.visit_meshes_mut(visit);
        }
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len() + self.children.iter().map(SceneNode::mesh_count).sum::<usize>()
    }
}

impl MeshHierarchy for SceneNode {
    fn reset_root(&mut self) {
        self.transform = NodeTransform::IDENTITY;
    }

    fn prepare_meshes(&mut self, tune: &mut dyn FnMut(&mut MaterialParams)) -> usize {
        let mut count = 0;
        self.visit_meshes_mut(&mut |mesh| {
            mesh.cast_shadows = true;
            mesh.receive_shadows = true;
            mesh.materials.iter_mut().for_each(&mut *tune);
            count += 1;
        });
        count
    }

    fn world_bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        self.visit_meshes(&mut |mesh, world| {
            let b = mesh.local_bounds.transformed(world);
            bounds = Some(bounds.map_or(b, |acc| acc.union(b)));
        });
        bounds
    }

    fn set_root_scale(&mut self, scale: f32) {
        self.transform.scale = Vec3::splat(scale);
    }

    fn translate_root(&mut self, offset: Vec3) {
        self.transform.translation += offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_config_target_size_must_be_positive() {
        for bad in [0.0, -3.0, f32::NAN, f32::INFINITY] {
            let config = VaultConfig {
                target_size: bad,
                ..VaultConfig::default()
            };
            let settings = NormalizeSettings::from_config(&config);
            assert!((settings.target_size - DEFAULT_TARGET_SIZE).abs() < EPS);
        }

        let config = VaultConfig {
            target_size: 4.0,
            ..VaultConfig::default()
        };
        let mut scene = SceneNode::new("root");
        scene.meshes.push(unit_mesh(Vec3::ZERO, Vec3::splat(2.0)));
        let report = normalize(&mut scene, &NormalizeSettings::from_config(&config));
        assert!((report.scale - 2.0).abs() < EPS);
    }

    fn unit_mesh(min: Vec3, max: Vec3) -> MeshPart {
        MeshPart::new(Bounds::new(min, max), vec![MaterialParams::default()])
    }

    fn off_center_scene() -> SceneNode {
        SceneNode::new("root")
            .with_transform(NodeTransform {
                translation: Vec3::new(9.0, 9.0, 9.0),
                rotation: Quat::from_rotation_y(1.0),
                scale: Vec3::splat(7.0),
            })
            .with_child(
                SceneNode::new("body")
                    .with_transform(NodeTransform {
                        translation: Vec3::new(40.0, 10.0, -5.0),
                        ..NodeTransform::IDENTITY
                    })
                    .with_mesh(unit_mesh(Vec3::new(-10.0, 0.0, -2.0), Vec3::new(10.0, 6.0, 2.0))),
            )
            .with_child(
                SceneNode::new("strap")
                    .with_transform(NodeTransform {
                        scale: Vec3::splat(0.5),
                        ..NodeTransform::IDENTITY
                    })
                    .with_mesh(unit_mesh(Vec3::ZERO, Vec3::new(4.0, 4.0, 4.0))),
            )
    }

    #[test]
    fn test_largest_extent_matches_target_and_centered() {
        let mut scene = off_center_scene();
        let report = normalize(&mut scene, &NormalizeSettings::default());

        let after = scene.world_bounds().unwrap();
        assert!((after.max_extent() - DEFAULT_TARGET_SIZE).abs() < EPS);
        assert!(after.center().length() < EPS);
        assert_eq!(report.mesh_count, 2);
        assert_eq!(report.bounds_after, Some(after));
    }

    #[test]
    fn test_root_rotation_is_reset() {
        let mut scene = off_center_scene();
        normalize(&mut scene, &NormalizeSettings::default());
        assert_eq!(scene.transform.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_fit_matches_iterative_pass() {
        let mut scene = off_center_scene();
        scene.reset_root();
        let bounds = scene.world_bounds().unwrap();
        let fit = NormalizeFit::from_bounds(&bounds, DEFAULT_TARGET_SIZE);

        let report = normalize(&mut scene, &NormalizeSettings::default());
        assert!((fit.scale - report.scale).abs() < EPS);
        assert!((fit.offset - report.offset).length() < EPS);
    }

    #[test]
    fn test_zero_extent_keeps_scale_one() {
        let point = Vec3::new(3.0, -1.0, 2.0);
        let mut scene = SceneNode::new("root").with_mesh(unit_mesh(point, point));
        let report = normalize(&mut scene, &NormalizeSettings::default());

        assert_eq!(report.scale, 1.0);
        assert_eq!(scene.transform.scale, Vec3::ONE);
        assert!(scene.world_bounds().unwrap().center().length() < EPS);
    }

    #[test]
    fn test_empty_hierarchy_is_untouched() {
        let mut scene = SceneNode::new("root").with_child(SceneNode::new("empty"));
        let report = normalize(&mut scene, &NormalizeSettings::default());
        assert_eq!(report.scale, 1.0);
        assert_eq!(report.offset, Vec3::ZERO);
        assert_eq!(scene.transform, NodeTransform::IDENTITY);
    }

    #[test]
    fn test_non_finite_extent_falls_back() {
        let bounds = Bounds::new(Vec3::ZERO, Vec3::new(f32::INFINITY, 1.0, 1.0));
        assert_eq!(NormalizeFit::from_bounds(&bounds, 2.8).scale, 1.0);
    }

    #[test]
    fn test_meshes_get_shadows_and_tuned_materials() {
        let mut scene = SceneNode::new("root").with_mesh(MeshPart::new(
            Bounds::new(Vec3::ZERO, Vec3::ONE),
            vec![MaterialParams {
                env_intensity: 1.0,
                roughness: 0.05,
                metalness: 0.95,
            }],
        ));
        let settings = NormalizeSettings {
            min_roughness: 0.2,
            max_metalness: 0.8,
            ..NormalizeSettings::default()
        };
        normalize(&mut scene, &settings);

        let mesh = &scene.meshes[0];
        assert!(mesh.cast_shadows && mesh.receive_shadows);
        assert_eq!(
            mesh.materials[0],
            MaterialParams {
                env_intensity: DEFAULT_ENV_INTENSITY,
                roughness: 0.2,
                metalness: 0.8,
            }
        );
    }

    #[test]
    fn test_transformed_bounds_cover_rotation() {
        let b = Bounds::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let rotated = b.transformed(&Mat4::from_rotation_z(std::f32::consts::FRAC_PI_4));
        assert!((rotated.max.x - std::f32::consts::SQRT_2).abs() < EPS);
    }
}
