/// Application configuration
///
/// One `Config` describes the window, the adapter policy and the backend
/// debug options. It is built once at startup (usually from the command line)
/// and read by the surface, the presentation pipeline and the GPU backend.

/// Who drives rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTrigger {
    /// The application loop renders once after every pump step
    Loop,
    /// The surface renders from its paint/redraw notification
    Paint,
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Window title
    pub title: String,
    /// Name of the window class registered for the surface
    pub window_class: String,
    /// Client area width in pixels (immutable after construction)
    pub width: u32,
    /// Client area height in pixels (immutable after construction)
    pub height: u32,
    /// Use the software rasterizer adapter instead of a hardware one
    pub use_warp_device: bool,
    /// Enumerate adapters with high-performance GPUs first
    pub high_performance_adapter: bool,
    /// Enable validation/debug layers
    pub enable_validation: bool,
    /// Color used to clear the back buffer each frame
    pub clear_color: [f32; 4],
    /// Frame loop driver
    pub render_trigger: RenderTrigger,
    /// Application name
    pub app_name: String,
    /// Application version (major, minor, patch)
    pub app_version: (u32, u32, u32),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Hello World".to_string(),
            window_class: "SwapframeWindowClass".to_string(),
            width: 800,
            height: 600,
            use_warp_device: false,
            high_performance_adapter: true,
            enable_validation: cfg!(debug_assertions),
            clear_color: [0.0, 0.2, 0.4, 1.0],
            render_trigger: RenderTrigger::Loop,
            app_name: "Swapframe Application".to_string(),
            app_version: (1, 0, 0),
        }
    }
}

impl Config {
    /// Build a default configuration and apply command-line switches
    ///
    /// Recognised switches (case-insensitive): `-warp`, `/warp`, `--warp`.
    /// Anything else is ignored, including the program name.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();
        config.apply_args(args);
        config
    }

    /// Apply command-line switches on top of this configuration
    pub fn apply_args<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            let arg = arg.as_ref();
            let switch = arg
                .strip_prefix("--")
                .or_else(|| arg.strip_prefix('-'))
                .or_else(|| arg.strip_prefix('/'));
            if let Some(switch) = switch {
                if switch.eq_ignore_ascii_case("warp") {
                    self.use_warp_device = true;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
