use serde::{Deserialize, Serialize};

/// Sizes of the shader-side uniform arrays. Must match the shader declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniformConfig {
    pub circle_capacity: usize,
    pub shape_capacity: usize,
}

impl Default for UniformConfig {
    fn default() -> Self {
        Self {
            circle_capacity: 32,
            shape_capacity: 8,
        }
    }
}
