//! Swapframe demo - a window presenting a triangle over a cleared background
//!
//! Switches:
//! - `-warp` / `--warp`: use the software rasterizer adapter
//! - `--paint`: render from the window's redraw notification instead of the loop
//! - `--log=<severity>`: minimum log severity (trace, debug, info, warn, error)

mod shader;
mod triangle;

use swapframe_engine::swapframe::{
    Application, Config, Engine, InputSink, KeyCode, RenderTrigger, Result, Simulation,
};
use swapframe_engine::swapframe::log::LogSeverity;
use swapframe_engine::swapframe::presentation::PresentationPipeline;
use swapframe_engine::swapframe::surface::{Surface, WinitPlatform};
use swapframe_engine::{engine_debug, engine_error, engine_info, engine_warn};
use swapframe_engine_renderer_vulkan::swapframe::{print_validation_stats_report, VulkanFactory};

use triangle::TriangleContent;

/// Logs key presses and counts frames
#[derive(Default)]
struct KeyLogger {
    frames: u64,
}

impl InputSink for KeyLogger {
    fn on_key_down(&mut self, code: KeyCode) {
        engine_info!("swapframe::demo", "Key down 0x{:02X}", code);
    }

    fn on_key_up(&mut self, code: KeyCode) {
        engine_debug!("swapframe::demo", "Key up 0x{:02X}", code);
    }
}

impl Simulation for KeyLogger {
    fn on_update(&mut self) {
        self.frames += 1;
    }

    fn on_destroy(&mut self) {
        engine_info!("swapframe::demo", "Simulated {} frame(s)", self.frames);
    }
}

fn run(config: &Config) -> Result<()> {
    let surface = Surface::new(config, Box::new(WinitPlatform::new()?))?;
    let factory = VulkanFactory::new(config)?;
    let pipeline = PresentationPipeline::new(config, Box::new(factory), Box::new(TriangleContent));

    let mut app = Application::new(config, surface, pipeline, KeyLogger::default());
    app.initialize()?;
    let result = app.run();
    app.destroy()?;
    result
}

fn main() -> std::process::ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut config = Config::from_args(&args);
    config.title = "Swapframe Demo".to_string();
    config.app_name = "Swapframe Demo".to_string();
    for arg in &args {
        if arg.eq_ignore_ascii_case("--paint") {
            config.render_trigger = RenderTrigger::Paint;
        } else if let Some(level) = arg.strip_prefix("--log=") {
            match level.parse::<LogSeverity>() {
                Ok(severity) => Engine::set_min_severity(severity),
                Err(e) => engine_warn!("swapframe::demo", "{}, keeping {:?}", e, Engine::min_severity()),
            }
        }
    }

    let result = run(&config);
    if config.enable_validation {
        print_validation_stats_report();
    }

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            engine_error!("swapframe::demo", "{}", e);
            std::process::ExitCode::FAILURE
        }
    }
}
