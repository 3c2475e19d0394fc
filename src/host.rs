//! Fixed timestep frame driver
//!
//! Turns variable browser frame times into whole simulation ticks. The
//! platform loop calls [`FrameDriver::on_frame`] from its animation-frame
//! callback and paints [`FrameDriver::frame`] afterwards. Once stopped, the
//! driver never ticks again, so a late callback after teardown is harmless.

use glam::Vec2;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::render::Frame;
use crate::sim::{GameEvent, GamePhase, InputEvent, Simulation};

/// Where a pointer listener is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenOn {
    /// The game's own canvas
    Surface,
    /// The whole window, so a release off the canvas still ends a drag
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Press,
    Move,
    Release,
}

impl PointerAction {
    /// Input for a DOM pointer event, `position` in canvas pixels if known
    pub fn input(self, position: Option<Vec2>) -> Option<InputEvent> {
        match self {
            PointerAction::Press => position.map(InputEvent::PointerDown),
            PointerAction::Move => position.map(InputEvent::PointerMove),
            PointerAction::Release => Some(InputEvent::PointerUp),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerBinding {
    /// DOM event name
    pub kind: &'static str,
    pub on: ListenOn,
    pub action: PointerAction,
}

/// Pointer listeners every real-time game host registers
pub const POINTER_BINDINGS: [PointerBinding; 6] = [
    PointerBinding { kind: "mousedown", on: ListenOn::Surface, action: PointerAction::Press },
    PointerBinding { kind: "touchstart", on: ListenOn::Surface, action: PointerAction::Press },
    PointerBinding { kind: "mousemove", on: ListenOn::Surface, action: PointerAction::Move },
    PointerBinding { kind: "touchmove", on: ListenOn::Surface, action: PointerAction::Move },
    PointerBinding { kind: "mouseup", on: ListenOn::Window, action: PointerAction::Release },
    PointerBinding { kind: "touchend", on: ListenOn::Window, action: PointerAction::Release },
];

/// Elements whose key presses are typing, not game input (`Element.tagName`)
pub fn is_form_field(tag_name: &str) -> bool {
    matches!(
        tag_name.to_ascii_uppercase().as_str(),
        "INPUT" | "TEXTAREA" | "SELECT"
    )
}

pub struct FrameDriver<S: Simulation> {
    sim: S,
    accumulator: f32,
    last_time: Option<f64>,
    running: bool,
    ticks: u64,
}

impl<S: Simulation> FrameDriver<S> {
    pub fn new(sim: S) -> Self {
        Self {
            sim,
            accumulator: 0.0,
            last_time: None,
            running: true,
            ticks: 0,
        }
    }

    pub fn sim(&self) -> &S {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut S {
        &mut self.sim
    }

    /// Animation-frame entry point, `time_ms` as given by the browser.
    pub fn on_frame(&mut self, time_ms: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => ((time_ms - last) / 1000.0) as f32,
            None => SIM_DT,
        };
        self.last_time = Some(time_ms);
        self.advance(dt)
    }

    /// Run as many ticks as `dt` seconds cover. Returns the number run.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.running {
            return 0;
        }
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.sim.tick();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        self.ticks += substeps as u64;
        substeps
    }

    /// Forward input to the game; dropped once stopped.
    pub fn input(&mut self, event: InputEvent) {
        if self.running {
            self.sim.handle(event);
        }
    }

    pub fn frame(&self) -> Frame {
        self.sim.frame()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.sim.drain_events()
    }

    pub fn phase(&self) -> GamePhase {
        self.sim.phase()
    }

    /// Total ticks run since creation or the last restart
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Stop ticking for good. Idempotent.
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("Frame driver stopped after {} ticks", self.ticks);
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Fresh session on the same driver
    pub fn restart(&mut self) {
        self.sim.reset();
        self.accumulator = 0.0;
        self.last_time = None;
        self.ticks = 0;
        self.running = true;
    }
}
