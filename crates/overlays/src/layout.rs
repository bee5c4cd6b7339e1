//! std140-compatible overlay records.
//!
//! `vec3` + `float` pairs share one 16-byte row, so every struct here is a
//! multiple of 16 bytes and arrays of them need no extra stride padding.
//! Callers work in f64; values are narrowed when written.

use foundation::math::{LinearTransform2d, Vec3};

use crate::records::UniformRecord;

/// Dashed ring drawn on the terrain around `world_origin`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CircleUniform {
    pub world_origin: [f32; 3],
    pub radius: f32,
    pub color: [f32; 3],
    pub _pad0: f32,
}

impl CircleUniform {
    pub fn set_world_origin(&mut self, origin: Vec3) {
        self.world_origin = origin.as_f32();
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius as f32;
    }
}

impl UniformRecord for CircleUniform {
    const KIND: &'static str = "circle";
}

/// Offscreen shape buffer sampled onto the terrain, as `(x.a, x.b, y.a, y.b)`
/// of the world→texel transform. The sampler is bound separately.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShapeUniform {
    pub world_to_frame: [f32; 4],
}

impl From<LinearTransform2d> for ShapeUniform {
    fn from(t: LinearTransform2d) -> Self {
        Self {
            world_to_frame: [t.x.a as f32, t.x.b as f32, t.y.a as f32, t.y.b as f32],
        }
    }
}

impl UniformRecord for ShapeUniform {
    const KIND: &'static str = "shape";
}

/// A pool's backing array lent out for one draw, plus the loop bound the
/// shader reads.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UniformBlock<'a, U> {
    pub records: &'a [U],
    pub count: u32,
}

impl<U: bytemuck::Pod> UniformBlock<'_, U> {
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.records)
    }
}
