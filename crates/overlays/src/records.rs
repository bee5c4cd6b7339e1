/// A record that lives in one slot of a fixed-size uniform array.
///
/// Records are the shader layout itself, so the pool's backing array is what
/// gets bound.
pub trait UniformRecord: bytemuck::Pod {
    /// Name used in errors and logs.
    const KIND: &'static str;

    /// Content of an unused slot. The shader never reads past the active count,
    /// but blank slots keep stale data out of captures and debuggers.
    fn blank() -> Self {
        <Self as bytemuck::Zeroable>::zeroed()
    }
}
