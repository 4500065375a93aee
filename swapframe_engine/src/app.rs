/// Application shell - runs the pump / update / render loop

use std::cell::RefCell;
use std::rc::Rc;
use crate::config::{Config, RenderTrigger};
use crate::error::{Error, Result};
use crate::input::InputSink;
use crate::presentation::PresentationPipeline;
use crate::surface::{PumpResult, Surface};
use crate::{engine_error, engine_info, engine_warn};

/// Application-level logic driven by the shell
///
/// Receives keyboard input through `InputSink` and is updated once per frame,
/// right before rendering.
pub trait Simulation: InputSink {
    /// Called once after the window and the GPU are ready
    fn on_init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Advance the simulation by one frame
    fn on_update(&mut self) {}

    /// Called once before the GPU objects are released
    fn on_destroy(&mut self) {}
}

/// Per-frame work shared with the paint callback
struct FrameDriver {
    simulation: Rc<RefCell<dyn Simulation>>,
    pipeline: PresentationPipeline,
}

impl FrameDriver {
    fn frame(&mut self) -> Result<()> {
        self.simulation.borrow_mut().on_update();
        self.pipeline.render()
    }
}

/// Lifecycle: `new` -> `initialize` -> `run` (or repeated `step`) -> `destroy`
///
/// # Example
///
/// ```no_run
/// # use swapframe_engine::swapframe::{Application, Config, Result, Simulation};
/// # use swapframe_engine::swapframe::presentation::PresentationPipeline;
/// # use swapframe_engine::swapframe::surface::Surface;
/// # fn demo<S: Simulation + 'static>(config: &Config, surface: Surface, pipeline: PresentationPipeline, sim: S) -> Result<()> {
/// let mut app = Application::new(config, surface, pipeline, sim);
/// app.initialize()?;
/// app.run()?;
/// app.destroy()?;
/// # Ok(())
/// # }
/// ```
pub struct Application {
    driver: Rc<RefCell<FrameDriver>>,
    input: Rc<RefCell<dyn InputSink>>,
    /// Dropped after the driver so the window outlives the swap chain
    surface: Surface,
    trigger: RenderTrigger,
    initialized: bool,
    destroyed: bool,
}

impl Application {
    pub fn new<S: Simulation + 'static>(
        config: &Config,
        surface: Surface,
        pipeline: PresentationPipeline,
        simulation: S,
    ) -> Self {
        let simulation = Rc::new(RefCell::new(simulation));
        let input: Rc<RefCell<dyn InputSink>> = simulation.clone();
        Self {
            driver: Rc::new(RefCell::new(FrameDriver {
                simulation,
                pipeline,
            })),
            input,
            surface,
            trigger: config.render_trigger,
            initialized: false,
            destroyed: false,
        }
    }

    /// Create the window and the GPU objects, then wire input and paint
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            engine_warn!("swapframe::Application", "initialize() unexpectedly called multiple times");
            return Ok(());
        }
        if self.destroyed {
            return Err(Error::InitializationFailed("application was destroyed".to_string()));
        }

        self.surface.initialize()?;
        {
            let mut driver = self.driver.borrow_mut();
            driver.pipeline.initialize(&self.surface)?;
            driver.simulation.borrow_mut().on_init()?;
        }

        self.surface.set_input_sink(self.input.clone());
        if self.trigger == RenderTrigger::Paint {
            let driver = self.driver.clone();
            self.surface
                .set_render_callback(Box::new(move || driver.borrow_mut().frame()));
            self.surface.request_redraw();
        }

        self.initialized = true;
        Ok(())
    }

    /// One loop iteration: pump, then update and render (loop trigger) or
    /// request the next paint (paint trigger)
    pub fn step(&mut self) -> Result<PumpResult> {
        if !self.initialized || self.destroyed {
            return Err(Error::InvalidResource("step() called outside of initialize()..destroy()".to_string()));
        }

        if self.surface.pump_step()? == PumpResult::Closed {
            return Ok(PumpResult::Closed);
        }

        match self.trigger {
            RenderTrigger::Loop => self.driver.borrow_mut().frame()?,
            RenderTrigger::Paint => self.surface.request_redraw(),
        }
        Ok(PumpResult::Continue)
    }

    /// Loop until the window is closed
    pub fn run(&mut self) -> Result<()> {
        engine_info!("swapframe::Application", "Entering frame loop ({:?} trigger)", self.trigger);
        let mut frames: u64 = 0;
        while self.step()? == PumpResult::Continue {
            frames += 1;
        }
        engine_info!("swapframe::Application", "Window closed after {} frames", frames);
        Ok(())
    }

    /// Unwire the window, notify the simulation and shut the pipeline down
    pub fn destroy(&mut self) -> Result<()> {
        if !self.initialized || self.destroyed {
            return Ok(());
        }
        self.destroyed = true;

        self.surface.clear_render_callback();
        self.surface.clear_input_sink();

        let mut driver = self.driver.borrow_mut();
        driver.simulation.borrow_mut().on_destroy();
        driver.pipeline.shutdown()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Run `f` with the presentation pipeline
    pub fn with_pipeline<R>(&self, f: impl FnOnce(&PresentationPipeline) -> R) -> R {
        f(&self.driver.borrow().pipeline)
    }
}

impl Drop for Application {
    fn drop(&mut self) {
        if let Err(e) = self.destroy() {
            engine_error!("swapframe::Application", "Shutdown failed: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
