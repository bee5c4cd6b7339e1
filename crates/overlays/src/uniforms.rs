use foundation::TextureHandle;
use foundation::math::{Geoposition, LinearTransform2d, Vec3};
use tracing::{debug, warn};

use crate::config::UniformConfig;
use crate::error::PoolError;
use crate::identity::DrawableIdentity;
use crate::layout::{CircleUniform, ShapeUniform, UniformBlock};
use crate::pool::UniformPool;
use crate::records::UniformRecord;

/// Overlay state shared by every terrain material.
///
/// Only this type mutates the pools; the renderer borrows their backing
/// arrays for one draw.
#[derive(Debug, Clone)]
pub struct ShaderUniforms {
    circles: UniformPool<CircleUniform>,
    shapes: UniformPool<ShapeUniform>,
    /// Shape buffer samplers, indexed by shape slot.
    samplers: Vec<Option<TextureHandle>>,
}

impl Default for ShaderUniforms {
    fn default() -> Self {
        Self::new(&UniformConfig::default())
    }
}

impl ShaderUniforms {
    pub fn new(config: &UniformConfig) -> Self {
        Self {
            circles: UniformPool::new(config.circle_capacity),
            shapes: UniformPool::new(config.shape_capacity),
            samplers: vec![None; config.shape_capacity],
        }
    }

    pub fn circles(&self) -> &UniformPool<CircleUniform> {
        &self.circles
    }

    pub fn shapes(&self) -> &UniformPool<ShapeUniform> {
        &self.shapes
    }

    pub fn create_circle(&mut self) -> Result<DrawableIdentity, PoolError> {
        let created = self.circles.create();
        log_create(&created, self.circles.active_count());
        created
    }

    pub fn circle(&self, identity: DrawableIdentity) -> Result<&CircleUniform, PoolError> {
        self.circles.get(identity)
    }

    pub fn update_circle_geoposition(
        &mut self,
        identity: DrawableIdentity,
        geoposition: &Geoposition,
    ) -> Result<(), PoolError> {
        self.update_circle_origin(identity, geoposition.world_position())
    }

    pub fn update_circle_origin(&mut self, identity: DrawableIdentity, origin: Vec3) -> Result<(), PoolError> {
        self.circles.update(identity, |c| c.set_world_origin(origin))
    }

    pub fn update_circle_radius(&mut self, identity: DrawableIdentity, radius: f64) -> Result<(), PoolError> {
        self.circles.update(identity, |c| c.set_radius(radius))
    }

    pub fn update_circle_color(&mut self, identity: DrawableIdentity, color: [f32; 3]) -> Result<(), PoolError> {
        self.circles.update(identity, |c| c.color = color)
    }

    pub fn remove_circle(&mut self, identity: DrawableIdentity) -> Result<(), PoolError> {
        self.circles.remove(identity)?;
        debug!(%identity, active = self.circles.active_count(), "circle removed");
        Ok(())
    }

    pub fn create_shape(&mut self) -> Result<DrawableIdentity, PoolError> {
        let created = self.shapes.create();
        log_create(&created, self.shapes.active_count());
        created
    }

    pub fn shape(&self, identity: DrawableIdentity) -> Result<&ShapeUniform, PoolError> {
        self.shapes.get(identity)
    }

    pub fn update_shape_transform(
        &mut self,
        identity: DrawableIdentity,
        transform: LinearTransform2d,
    ) -> Result<(), PoolError> {
        self.shapes.update(identity, |s| *s = transform.into())
    }

    pub fn update_shape_sampler(
        &mut self,
        identity: DrawableIdentity,
        sampler: TextureHandle,
    ) -> Result<(), PoolError> {
        let slot = self.shape_slot(identity)?;
        self.samplers[slot] = Some(sampler);
        Ok(())
    }

    pub fn shape_sampler(&self, identity: DrawableIdentity) -> Result<Option<TextureHandle>, PoolError> {
        Ok(self.samplers[self.shape_slot(identity)?])
    }

    pub fn remove_shape(&mut self, identity: DrawableIdentity) -> Result<(), PoolError> {
        let slot = self.shape_slot(identity)?;
        let last = self.shapes.active_count() - 1;
        self.shapes.remove(identity)?;
        // Follow the pool's swap-with-last.
        self.samplers.swap(slot, last);
        self.samplers[last] = None;
        debug!(%identity, active = self.shapes.active_count(), "shape removed");
        Ok(())
    }

    pub fn circle_block(&self) -> UniformBlock<'_, CircleUniform> {
        self.circles.block()
    }

    pub fn shape_block(&self) -> UniformBlock<'_, ShapeUniform> {
        self.shapes.block()
    }

    /// Samplers of the active shapes, in slot order.
    pub fn shape_samplers(&self) -> &[Option<TextureHandle>] {
        &self.samplers[..self.shapes.active_count()]
    }

    fn shape_slot(&self, identity: DrawableIdentity) -> Result<usize, PoolError> {
        self.shapes.slot_of(identity).ok_or(PoolError::UnknownIdentity {
            kind: ShapeUniform::KIND,
            identity,
        })
    }
}

fn log_create(created: &Result<DrawableIdentity, PoolError>, active: usize) {
    match created {
        Ok(identity) => debug!(%identity, active, "drawable created"),
        Err(err) => warn!(error = %err, "drawable rejected"),
    }
}

#[cfg(test)]
mod tests {
    use super::ShaderUniforms;
    use crate::config::UniformConfig;
    use crate::error::PoolError;
    use crate::layout::{CircleUniform, ShapeUniform};
    use crate::records::UniformRecord;
    use foundation::TextureHandle;
    use foundation::math::{Geoposition, LinearFunction, LinearTransform2d};
    use pretty_assertions::assert_eq;

    fn uniforms(circles: usize) -> ShaderUniforms {
        ShaderUniforms::new(&UniformConfig {
            circle_capacity: circles,
            shape_capacity: 2,
        })
    }

    #[test]
    fn removing_first_of_two_circles_compacts_to_slot_zero() {
        let mut u = uniforms(2);
        let first = u.create_circle().unwrap();
        let second = u.create_circle().unwrap();
        u.update_circle_radius(first, 500.0).unwrap();
        u.update_circle_radius(second, 250.0).unwrap();

        u.remove_circle(first).unwrap();
        assert_eq!(u.circles().active_count(), 1);
        assert_eq!(u.circles().slot_of(second), Some(0));
        assert_eq!(u.circle(second).unwrap().radius, 250.0);

        let block = u.circle_block();
        assert_eq!(block.count, 1);
        assert_eq!(block.records[0].radius, 250.0);
        assert_eq!(block.records[1], CircleUniform::blank());
    }

    #[test]
    fn blocks_borrow_the_pool_storage() {
        let mut u = uniforms(2);
        let id = u.create_circle().unwrap();
        u.update_circle_radius(id, 500.0).unwrap();

        let block = u.circle_block();
        assert_eq!(block.records.as_ptr(), u.circles().records().as_ptr());
        assert_eq!(block.records.len(), 2);
        assert_eq!(block.records[0].radius, 500.0);
        assert_eq!(
            block.as_bytes().as_ptr(),
            u.circles().records().as_ptr().cast::<u8>()
        );

        u.update_circle_radius(id, 750.0).unwrap();
        assert_eq!(u.circle_block().records[0].radius, 750.0);
        assert_eq!(
            u.shape_block().records.as_ptr(),
            u.shapes().records().as_ptr()
        );
    }

    #[test]
    fn circle_fields_update_independently() {
        let mut u = uniforms(4);
        let id = u.create_circle().unwrap();
        let place = Geoposition::new(58.25, 23.58);
        u.update_circle_geoposition(id, &place).unwrap();
        u.update_circle_radius(id, 1200.0).unwrap();
        u.update_circle_color(id, [1.0, 0.0, 0.0]).unwrap();

        let c = u.circle(id).unwrap();
        assert_eq!(c.world_origin, place.world_position().as_f32());
        assert_eq!(c.radius, 1200.0);
        assert_eq!(c.color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn capacity_and_stale_identity_errors_surface() {
        let mut u = uniforms(1);
        let id = u.create_circle().unwrap();
        assert!(matches!(
            u.create_circle(),
            Err(PoolError::CapacityExceeded { kind: "circle", .. })
        ));
        u.remove_circle(id).unwrap();
        assert!(matches!(
            u.update_circle_radius(id, 1.0),
            Err(PoolError::UnknownIdentity { kind: "circle", .. })
        ));
    }

    #[test]
    fn shapes_carry_transform_and_sampler() {
        let mut u = uniforms(1);
        let shape = u.create_shape().unwrap();
        let t = LinearTransform2d::new(LinearFunction::new(1.0, 0.0), LinearFunction::new(0.5, 0.5));
        u.update_shape_transform(shape, t).unwrap();
        u.update_shape_sampler(shape, TextureHandle(7)).unwrap();

        assert_eq!(*u.shape(shape).unwrap(), ShapeUniform::from(t));
        assert_eq!(u.shape_samplers(), &[Some(TextureHandle(7))]);
        assert_eq!(u.shape_block().records[0].world_to_frame, [1.0, 0.0, 0.5, 0.5]);

        u.remove_shape(shape).unwrap();
        assert!(u.shape_samplers().is_empty());
        assert_eq!(u.shape_block().count, 0);
        assert!(matches!(
            u.shape_sampler(shape),
            Err(PoolError::UnknownIdentity { kind: "shape", .. })
        ));
    }

    #[test]
    fn samplers_follow_their_shape_when_slots_compact() {
        let mut u = uniforms(1);
        let first = u.create_shape().unwrap();
        let second = u.create_shape().unwrap();
        u.update_shape_sampler(first, TextureHandle(1)).unwrap();
        u.update_shape_sampler(second, TextureHandle(2)).unwrap();

        u.remove_shape(first).unwrap();
        assert_eq!(u.shapes().slot_of(second), Some(0));
        assert_eq!(u.shape_sampler(second), Ok(Some(TextureHandle(2))));
        assert_eq!(u.shape_samplers(), &[Some(TextureHandle(2))]);

        let third = u.create_shape().unwrap();
        assert_eq!(u.shape_sampler(third), Ok(None));
    }
}
