//! Frame Plan
//!
//! CPU-side list of what to draw this frame, grouped by pipeline. The scene
//! fills it; the renderer uploads every instance into one buffer and replays
//! the batches in order: opaque, transparent, lamps.

use super::uniforms::InstanceRaw;

/// Handle to a mesh uploaded with [`super::Renderer::add_mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub usize);

/// Handle to a texture uploaded with [`super::Renderer::add_texture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// Instances of one mesh sharing one texture, drawn with a single call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBatch {
    pub mesh: MeshId,
    /// `None` draws with a plain white texture (tint only)
    pub texture: Option<TextureId>,
    pub instances: Vec<InstanceRaw>,
}

/// Draw batches for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FramePlan {
    pub opaque: Vec<DrawBatch>,
    /// Back-to-front; batch order is draw order
    pub transparent: Vec<DrawBatch>,
    pub lamps: Vec<DrawBatch>,
}

impl FramePlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty every list, keeping allocations.
    pub fn clear(&mut self) {
        self.opaque.clear();
        self.transparent.clear();
        self.lamps.clear();
    }

    /// Add an opaque instance. Order is irrelevant, so it joins any batch with
    /// the same mesh and texture.
    pub fn push_opaque(&mut self, mesh: MeshId, texture: Option<TextureId>, instance: InstanceRaw) {
        push_grouped(&mut self.opaque, mesh, texture, instance);
    }

    /// Add a blended instance. Callers push in back-to-front order; only a
    /// run of consecutive instances with the same mesh and texture is merged.
    pub fn push_transparent(
        &mut self,
        mesh: MeshId,
        texture: Option<TextureId>,
        instance: InstanceRaw,
    ) {
        match self.transparent.last_mut() {
            Some(last) if last.mesh == mesh && last.texture == texture => {
                last.instances.push(instance)
            }
            _ => self.transparent.push(DrawBatch {
                mesh,
                texture,
                instances: vec![instance],
            }),
        }
    }

    /// Add an unlit gizmo instance.
    pub fn push_lamp(&mut self, mesh: MeshId, instance: InstanceRaw) {
        push_grouped(&mut self.lamps, mesh, None, instance);
    }

    /// Total instances across all lists.
    pub fn instance_count(&self) -> usize {
        self.batches().map(|b| b.instances.len()).sum()
    }

    /// Every batch in draw order.
    pub fn batches(&self) -> impl Iterator<Item = &DrawBatch> {
        self.opaque
            .iter()
            .chain(self.transparent.iter())
            .chain(self.lamps.iter())
    }
}

fn push_grouped(
    batches: &mut Vec<DrawBatch>,
    mesh: MeshId,
    texture: Option<TextureId>,
    instance: InstanceRaw,
) {
    if let Some(batch) = batches
        .iter_mut()
        .find(|b| b.mesh == mesh && b.texture == texture)
    {
        batch.instances.push(instance);
    } else {
        batches.push(DrawBatch {
            mesh,
            texture,
            instances: vec![instance],
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3, Vec4};

    fn at(x: f32) -> InstanceRaw {
        InstanceRaw::new(Mat4::from_translation(Vec3::new(x, 0.0, 0.0)), Vec4::ONE)
    }

    #[test]
    fn test_opaque_groups_by_mesh_and_texture() {
        let mut plan = FramePlan::new();
        plan.push_opaque(MeshId(0), Some(TextureId(1)), at(0.0));
        plan.push_opaque(MeshId(0), Some(TextureId(2)), at(1.0));
        plan.push_opaque(MeshId(0), Some(TextureId(1)), at(2.0));

        assert_eq!(plan.opaque.len(), 2);
        assert_eq!(plan.opaque[0].instances.len(), 2);
        assert_eq!(plan.instance_count(), 3);
    }

    #[test]
    fn test_transparent_keeps_push_order() {
        let mut plan = FramePlan::new();
        plan.push_transparent(MeshId(0), None, at(0.0));
        plan.push_transparent(MeshId(1), None, at(1.0));
        plan.push_transparent(MeshId(0), None, at(2.0));
        plan.push_transparent(MeshId(0), None, at(3.0));

        let xs: Vec<Vec<f32>> = plan
            .transparent
            .iter()
            .map(|b| b.instances.iter().map(|i| i.model[3][0]).collect())
            .collect();
        assert_eq!(xs, vec![vec![0.0], vec![1.0], vec![2.0, 3.0]]);
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut plan = FramePlan::new();
        plan.push_lamp(MeshId(0), at(0.0));
        plan.push_opaque(MeshId(0), None, at(0.0));
        plan.clear();
        assert_eq!(plan.instance_count(), 0);
        assert_eq!(plan.batches().count(), 0);
    }
}
