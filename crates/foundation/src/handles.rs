/// Generational handle: `(index, generation)`.
///
/// A handle stays valid only while the slot it points at keeps the same
/// generation. Freeing a slot bumps its generation, so stale handles resolve
/// to nothing instead of aliasing the next occupant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(u32, u32);

impl Handle {
    pub fn new(index: u32, generation: u32) -> Self {
        Handle(index, generation)
    }

    pub fn index(self) -> u32 {
        self.0
    }

    pub fn generation(self) -> u32 {
        self.1
    }
}

/// Opaque geometry resource owned by the rendering backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeometryHandle(pub u64);

/// Opaque texture (or render-target texture) owned by the rendering backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureHandle(pub u64);
