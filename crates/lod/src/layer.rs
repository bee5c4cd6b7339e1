use std::fmt;

/// The two data layers a node loads.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TileLayer {
    Color,
    Height,
}

impl fmt::Display for TileLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileLayer::Color => f.write_str("color"),
            TileLayer::Height => f.write_str("height"),
        }
    }
}

/// Load lifecycle of one layer of one node.
///
/// Idle → Loading → Loaded | Failed. Re-initialising a node moves every
/// required layer back to `Loading`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LayerState {
    #[default]
    Idle,
    Loading {
        since_frame: u64,
    },
    Loaded,
    Failed,
}

impl LayerState {
    pub fn is_loaded(self) -> bool {
        matches!(self, LayerState::Loaded)
    }

    pub fn is_loading(self) -> bool {
        matches!(self, LayerState::Loading { .. })
    }
}
