//! Normalizing the spawned glTF scene with the vault's hierarchy math

use bevy::camera::primitives::MeshAabb;
use bevy::light::{NotShadowCaster, NotShadowReceiver};
use bevy::prelude::*;
use bevy::scene::SceneInstance;
use luxevault::glam::{Mat4 as VaultMat4, Quat as VaultQuat, Vec3 as VaultVec3};
use luxevault::normalize::{Bounds, MaterialParams, MeshHierarchy, NormalizeSettings, normalize};

use crate::viewer::types::{GroundShadow, ModelLoad, ModelRoot};

/// `StandardMaterial::reflectance` at an environment intensity of 1
const BASE_REFLECTANCE: f32 = 0.5;

/// Settings the viewer normalizes with
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ViewerNormalize(pub NormalizeSettings);

struct SpawnedMesh {
    entity: Entity,
    local_bounds: Bounds,
    /// Mesh transform relative to the model root
    to_root: VaultMat4,
    material: Option<Handle<StandardMaterial>>,
}

/// Snapshot of a spawned model, normalized in place and then written back
pub struct SpawnedModel<'a> {
    meshes: Vec<SpawnedMesh>,
    materials: &'a mut Assets<StandardMaterial>,
    scale: f32,
    translation: VaultVec3,
    shadowed: Vec<Entity>,
}

impl<'a> SpawnedModel<'a> {
    pub fn new(materials: &'a mut Assets<StandardMaterial>) -> Self {
        Self {
            meshes: Vec::new(),
            materials,
            scale: 1.0,
            translation: VaultVec3::ZERO,
            shadowed: Vec::new(),
        }
    }

    pub fn push_mesh(
        &mut self,
        entity: Entity,
        local_bounds: Bounds,
        to_root: Mat4,
        material: Option<Handle<StandardMaterial>>,
    ) {
        self.meshes.push(SpawnedMesh {
            entity,
            local_bounds,
            to_root: VaultMat4::from_cols_array(&to_root.to_cols_array()),
            material,
        });
    }

    /// Root transform after normalization
    pub fn root_transform(&self) -> Transform {
        Transform::from_translation(Vec3::from_array(self.translation.to_array()))
            .with_scale(Vec3::splat(self.scale))
    }

    /// Mesh entities whose shadow flags were enabled
    pub fn shadowed(&self) -> &[Entity] {
        &self.shadowed
    }

    fn root_matrix(&self) -> VaultMat4 {
        VaultMat4::from_scale_rotation_translation(
            VaultVec3::splat(self.scale),
            VaultQuat::IDENTITY,
            self.translation,
        )
    }
}

fn material_params(material: &StandardMaterial) -> MaterialParams {
    MaterialParams {
        env_intensity: material.reflectance / BASE_REFLECTANCE,
        roughness: material.perceptual_roughness,
        metalness: material.metallic,
    }
}

fn apply_params(material: &mut StandardMaterial, params: &MaterialParams) {
    material.reflectance = (params.env_intensity * BASE_REFLECTANCE).clamp(0.0, 1.0);
    material.perceptual_roughness = params.roughness;
    material.metallic = params.metalness;
}

impl MeshHierarchy for SpawnedModel<'_> {
    fn reset_root(&mut self) {
        self.scale = 1.0;
        self.translation = VaultVec3::ZERO;
    }

    fn prepare_meshes(&mut self, tune: &mut dyn FnMut(&mut MaterialParams)) -> usize {
        for mesh in &self.meshes {
            self.shadowed.push(mesh.entity);
            let Some(handle) = &mesh.material else {
                continue;
            };
            if let Some(material) = self.materials.get_mut(handle) {
                let mut params = material_params(material);
                tune(&mut params);
                apply_params(material, &params);
            }
        }
        self.meshes.len()
    }

    fn world_bounds(&self) -> Option<Bounds> {
        let root = self.root_matrix();
        self.meshes
            .iter()
            .map(|mesh| mesh.local_bounds.transformed(&(root * mesh.to_root)))
            .reduce(Bounds::union)
    }

    fn set_root_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    fn translate_root(&mut self, offset: VaultVec3) {
        self.translation += offset;
    }
}

/// Normalize the model once its scene instance has spawned
pub fn normalize_spawned_model(
    mut commands: Commands,
    mut load: ResMut<ModelLoad>,
    settings: Res<ViewerNormalize>,
    scene_spawner: Res<SceneSpawner>,
    mut roots: Query<(&GlobalTransform, &mut Transform, Option<&SceneInstance>), With<ModelRoot>>,
    mesh_query: Query<
        (Entity, &GlobalTransform, &Mesh3d, Option<&MeshMaterial3d<StandardMaterial>>),
        Without<GroundShadow>,
    >,
    meshes: Res<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if *load != ModelLoad::Spawned {
        return;
    }
    let Ok((root_global, mut root_transform, instance)) = roots.single_mut() else {
        return;
    };
    let Some(instance) = instance else {
        return; // Scene not instantiated yet
    };
    if !scene_spawner.instance_is_ready(**instance) {
        return;
    }

    let to_root = root_global.affine().inverse();
    let mut model = SpawnedModel::new(&mut materials);
    for (entity, global, mesh_handle, material) in &mesh_query {
        let Some(aabb) = meshes.get(&mesh_handle.0).and_then(MeshAabb::compute_aabb) else {
            continue;
        };
        let min = Vec3::from(aabb.min());
        let max = Vec3::from(aabb.max());
        model.push_mesh(
            entity,
            Bounds::new(
                VaultVec3::from_array(min.to_array()),
                VaultVec3::from_array(max.to_array()),
            ),
            Mat4::from(to_root * global.affine()),
            material.map(|m| m.0.clone()),
        );
    }

    let report = normalize(&mut model, &settings.0);
    *root_transform = model.root_transform();
    for &entity in model.shadowed() {
        commands
            .entity(entity)
            .remove::<(NotShadowCaster, NotShadowReceiver)>();
    }

    info!(
        "Model ready: {} meshes, scale {:.4}",
        report.mesh_count, report.scale
    );
    *load = ModelLoad::Ready;
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn bounds(min: [f32; 3], max: [f32; 3]) -> Bounds {
        Bounds::new(VaultVec3::from_array(min), VaultVec3::from_array(max))
    }

    #[test]
    fn test_spawned_model_is_centered_and_scaled() {
        let mut materials = Assets::<StandardMaterial>::default();
        let shared = materials.add(StandardMaterial {
            perceptual_roughness: 0.4,
            metallic: 0.9,
            ..default()
        });

        let mut model = SpawnedModel::new(&mut materials);
        model.push_mesh(
            Entity::PLACEHOLDER,
            bounds([-1.0, 0.0, -1.0], [1.0, 10.0, 1.0]),
            Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)),
            Some(shared.clone()),
        );

        let report = normalize(&mut model, &NormalizeSettings::default());
        assert!((report.scale - 0.28).abs() < EPS);
        assert_eq!(report.mesh_count, 1);
        assert_eq!(model.shadowed().len(), 1);

        let after = report.bounds_after.expect("bounds after normalizing");
        assert!(after.center().length() < EPS);
        assert!((after.max_extent() - 2.8).abs() < EPS);

        let root = model.root_transform();
        assert!((root.scale.x - 0.28).abs() < EPS);
        assert!((root.translation.x + 1.4).abs() < EPS);

        let material = materials.get(&shared).expect("material kept");
        assert!((material.reflectance - 0.75).abs() < EPS);
        assert!((material.perceptual_roughness - 0.4).abs() < EPS);
        assert!((material.metallic - 0.9).abs() < EPS);
    }

    #[test]
    fn test_model_without_meshes_keeps_unit_scale() {
        let mut materials = Assets::<StandardMaterial>::default();
        let mut model = SpawnedModel::new(&mut materials);

        let report = normalize(&mut model, &NormalizeSettings::default());
        assert!((report.scale - 1.0).abs() < EPS);
        assert!(report.bounds_after.is_none());
        assert_eq!(model.root_transform(), Transform::IDENTITY);
    }
}
