/// Adapter description types - physical or virtual GPUs exposed by the platform

/// Adapter category reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    /// Dedicated GPU
    Discrete,
    /// GPU sharing memory with the CPU
    Integrated,
    /// GPU exposed through a virtualization layer
    Virtual,
    /// Software rasterizer (WARP, lavapipe, SwiftShader)
    Software,
    /// Anything else
    Other,
}

/// Identifies one adapter
///
/// Selected once at startup and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterDesc {
    /// Backend enumeration index
    pub index: u32,
    /// Human-readable device name
    pub name: String,
    /// Adapter category
    pub kind: AdapterKind,
    /// Device-local memory in bytes
    pub dedicated_video_memory: u64,
}

impl AdapterDesc {
    /// Whether this is a software/fallback adapter
    pub fn is_software(&self) -> bool {
        self.kind == AdapterKind::Software
    }
}

/// Adapter enumeration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuPreference {
    /// Backend enumeration order
    Unspecified,
    /// High-performance adapters first
    HighPerformance,
}

/// Minimum device capability level
///
/// Expressed as the graphics API version the device must support. Backends
/// add their own requirements (timeline fences, dynamic rendering, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FeatureLevel {
    pub major: u32,
    pub minor: u32,
}

impl FeatureLevel {
    /// Level required by the presentation pipeline
    pub const REQUIRED: FeatureLevel = FeatureLevel { major: 1, minor: 3 };
}
