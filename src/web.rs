//! Browser host
//!
//! Paints frames on a 2D canvas, drives real-time games from
//! `requestAnimationFrame` and relays pointer and key input. Every callback a
//! host registers is owned by that host: closing or dropping it cancels the
//! pending frame and removes its listeners.

use std::cell::{Cell as StdCell, RefCell};
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Element, Event, EventTarget, HtmlCanvasElement, KeyboardEvent,
    MouseEvent, TouchEvent, Window,
};

use crate::bus::EventBus;
use crate::checkers::{Cell, CheckersGame, ClickOutcome};
use crate::collection::{CollectedItem, Inventory};
use crate::error::HostError;
use crate::host::{FrameDriver, ListenOn, POINTER_BINDINGS, is_form_field};
use crate::journey::Journey;
use crate::persistence::{KeyValueStore, LocalStorageStore, MemoryStore};
use crate::render::{self, CHECKERS_CELL, DrawCommand, Frame};
use crate::sim::{
    GameEvent, InputEvent, Key, RunnerGame, ShooterGame, Simulation, SlingshotGame,
};
use crate::tuning::Tuning;

const UNAVAILABLE: &str = "Game unavailable";

/// An event listener, removed from its target on drop
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, HostError> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            .map_err(|_| HostError::Callback(kind))?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

fn window() -> Result<Window, HostError> {
    web_sys::window().ok_or(HostError::NoWindow)
}

/// A canvas and its 2D context
struct Surface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Surface {
    fn find(canvas_id: &str) -> Result<Self, HostError> {
        let document = window()?.document().ok_or(HostError::NoWindow)?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or_else(|| HostError::NoCanvas(canvas_id.to_string()))?;
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok());
        match ctx {
            Some(ctx) => Ok(Self { canvas, ctx }),
            None => {
                let _ = canvas.set_attribute("data-state", "unavailable");
                canvas.set_text_content(Some(UNAVAILABLE));
                Err(HostError::NoContext)
            }
        }
    }

    fn paint(&self, frame: &Frame) {
        let (w, h) = (frame.width as u32, frame.height as u32);
        if self.canvas.width() != w || self.canvas.height() != h {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
        }
        let ctx = &self.ctx;
        for command in &frame.commands {
            match command {
                DrawCommand::Clear(color) => {
                    ctx.set_fill_style_str(&color.css());
                    ctx.fill_rect(0.0, 0.0, frame.width as f64, frame.height as f64);
                }
                DrawCommand::Rect { rect, color } => {
                    ctx.set_fill_style_str(&color.css());
                    ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
                }
                DrawCommand::StrokeRect { rect, color, width } => {
                    ctx.set_stroke_style_str(&color.css());
                    ctx.set_line_width(*width as f64);
                    ctx.stroke_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
                }
                DrawCommand::Circle {
                    center,
                    radius,
                    color,
                } => {
                    ctx.set_fill_style_str(&color.css());
                    ctx.begin_path();
                    let _ = ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU);
                    ctx.fill();
                }
                DrawCommand::Line {
                    from,
                    to,
                    color,
                    width,
                } => {
                    ctx.set_stroke_style_str(&color.css());
                    ctx.set_line_width(*width as f64);
                    ctx.begin_path();
                    ctx.move_to(from.x as f64, from.y as f64);
                    ctx.line_to(to.x as f64, to.y as f64);
                    ctx.stroke();
                }
                DrawCommand::Text {
                    pos,
                    text,
                    size,
                    color,
                } => {
                    ctx.set_fill_style_str(&color.css());
                    ctx.set_font(&format!("{size}px sans-serif"));
                    ctx.set_text_align("center");
                    let _ = ctx.fill_text(text, pos.x as f64, pos.y as f64);
                }
            }
        }
    }

    /// Client coordinates -> canvas pixels, accounting for CSS scaling
    fn to_canvas(&self, client_x: f64, client_y: f64) -> Vec2 {
        let rect = self.canvas.get_bounding_client_rect();
        let sx = if rect.width() > 0.0 {
            self.canvas.width() as f64 / rect.width()
        } else {
            1.0
        };
        let sy = if rect.height() > 0.0 {
            self.canvas.height() as f64 / rect.height()
        } else {
            1.0
        };
        Vec2::new(
            ((client_x - rect.left()) * sx) as f32,
            ((client_y - rect.top()) * sy) as f32,
        )
    }

    fn event_position(&self, event: &Event) -> Option<Vec2> {
        if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            return Some(self.to_canvas(mouse.client_x() as f64, mouse.client_y() as f64));
        }
        let touch = event
            .dyn_ref::<TouchEvent>()
            .and_then(|t| t.changed_touches().get(0))?;
        Some(self.to_canvas(touch.client_x() as f64, touch.client_y() as f64))
    }
}

/// Key presses aimed at a form field belong to the page
fn typing_target(event: &Event) -> bool {
    event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .is_some_and(|el| is_form_field(&el.tag_name()))
}

type EventSink = Rc<RefCell<Option<Box<dyn FnMut(GameEvent)>>>>;
type AwardBus = Rc<RefCell<Option<EventBus<CollectedItem>>>>;

struct Session {
    driver: FrameDriver<Box<dyn Simulation>>,
    surface: Surface,
}

/// A real-time game bound to a canvas
pub struct CanvasHost {
    session: Rc<RefCell<Session>>,
    sink: EventSink,
    awards: AwardBus,
    window: Window,
    frame_callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    frame_id: Rc<StdCell<Option<i32>>>,
    listeners: Vec<Listener>,
}

impl CanvasHost {
    /// Attach `sim` to the canvas with id `canvas_id` and start its loop.
    pub fn mount(canvas_id: &str, sim: Box<dyn Simulation>) -> Result<Self, HostError> {
        let window = window()?;
        let surface = Surface::find(canvas_id)?;
        let canvas: EventTarget = surface.canvas.clone().into();
        let session = Rc::new(RefCell::new(Session {
            driver: FrameDriver::new(sim),
            surface,
        }));
        let sink: EventSink = Rc::new(RefCell::new(None));
        let awards: AwardBus = Rc::new(RefCell::new(None));

        let handles_keys = session.borrow().driver.sim().handles_keys();
        let window_target: EventTarget = window.clone().into();
        let mut listeners = Vec::new();
        for binding in POINTER_BINDINGS {
            let target = match binding.on {
                ListenOn::Surface => &canvas,
                ListenOn::Window => &window_target,
            };
            let session = Rc::clone(&session);
            listeners.push(Listener::attach(target, binding.kind, move |event: Event| {
                let Ok(mut s) = session.try_borrow_mut() else {
                    return;
                };
                let position = s.surface.event_position(&event);
                if let Some(input) = binding.action.input(position) {
                    if binding.on == ListenOn::Surface && event.type_().starts_with("touch") {
                        event.prevent_default();
                    }
                    s.driver.input(input);
                }
            })?);
        }

        if handles_keys {
            let session = Rc::clone(&session);
            listeners.push(Listener::attach(&window_target, "keydown", move |event: Event| {
                if typing_target(&event) {
                    return;
                }
                let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|k| Key::from_dom(&k.key()))
                else {
                    return;
                };
                if key == Key::Other {
                    return;
                }
                event.prevent_default();
                if let Ok(mut s) = session.try_borrow_mut() {
                    s.driver.input(InputEvent::Key(key));
                }
            })?);
        }

        let frame_callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> =
            Rc::new(RefCell::new(None));
        let frame_id = Rc::new(StdCell::new(None));
        {
            let weak_session = Rc::downgrade(&session);
            let weak_callback = Rc::downgrade(&frame_callback);
            let sink = Rc::clone(&sink);
            let awards = Rc::clone(&awards);
            let frame_id = Rc::clone(&frame_id);
            let window = window.clone();
            *frame_callback.borrow_mut() = Some(Closure::new(move |time: f64| {
                frame_id.set(None);
                let Some(session) = weak_session.upgrade() else {
                    return;
                };
                let events = {
                    let Ok(mut s) = session.try_borrow_mut() else {
                        return;
                    };
                    if !s.driver.is_running() {
                        return;
                    }
                    s.driver.on_frame(time);
                    s.surface.paint(&s.driver.frame());
                    s.driver.drain_events()
                };
                if let Ok(bus) = awards.try_borrow() {
                    if let Some(bus) = bus.as_ref() {
                        for event in &events {
                            if let GameEvent::ItemAwarded(item) = event {
                                bus.publish(item);
                            }
                        }
                    }
                }
                if let Ok(mut sink) = sink.try_borrow_mut() {
                    if let Some(sink) = sink.as_mut() {
                        for event in events {
                            sink(event);
                        }
                    }
                }
                let Some(callback) = weak_callback.upgrade() else {
                    return;
                };
                if session.borrow().driver.is_running() {
                    if let Some(cb) = callback.borrow().as_ref() {
                        frame_id.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
                    }
                }
            }));
        }

        let host = Self {
            session,
            sink,
            awards,
            window,
            frame_callback,
            frame_id,
            listeners,
        };
        host.schedule()?;
        log::info!("Game mounted on #{canvas_id}");
        Ok(host)
    }

    fn schedule(&self) -> Result<(), HostError> {
        let slot = self.frame_callback.borrow();
        let Some(cb) = slot.as_ref() else {
            return Ok(());
        };
        let id = self
            .window
            .request_animation_frame(cb.as_ref().unchecked_ref())
            .map_err(|_| HostError::Callback("requestAnimationFrame"))?;
        self.frame_id.set(Some(id));
        Ok(())
    }

    /// Receive coarse game events (score, phase) after each frame.
    pub fn on_event(&self, handler: impl FnMut(GameEvent) + 'static) {
        *self.sink.borrow_mut() = Some(Box::new(handler));
    }

    /// Publish collectibles this game awards on `bus`.
    pub fn award_to(&self, bus: EventBus<CollectedItem>) {
        *self.awards.borrow_mut() = Some(bus);
    }

    pub fn is_running(&self) -> bool {
        self.session
            .try_borrow()
            .map(|s| s.driver.is_running())
            .unwrap_or(false)
    }

    /// Start a new round on the same canvas.
    pub fn restart(&self) -> Result<(), HostError> {
        if let Ok(mut s) = self.session.try_borrow_mut() {
            s.driver.restart();
        }
        if self.frame_id.get().is_none() && self.frame_callback.borrow().is_some() {
            self.schedule()?;
        }
        Ok(())
    }

    /// Stop the loop, cancel the pending frame and remove every listener.
    /// Idempotent. The frame closure itself lives until the host is dropped,
    /// since `close` may run from inside it.
    pub fn close(&mut self) {
        if let Some(id) = self.frame_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        if let Ok(mut s) = self.session.try_borrow_mut() {
            s.driver.stop();
        }
        self.listeners.clear();
        if let Ok(mut sink) = self.sink.try_borrow_mut() {
            sink.take();
        }
        if let Ok(mut awards) = self.awards.try_borrow_mut() {
            awards.take();
        }
    }
}

impl Drop for CanvasHost {
    fn drop(&mut self) {
        self.close();
        if let Ok(mut callback) = self.frame_callback.try_borrow_mut() {
            callback.take();
        }
    }
}

/// Checkers bound to a canvas; repaints after each click
pub struct CheckersHost {
    game: Rc<RefCell<CheckersGame>>,
    surface: Rc<Surface>,
    listeners: Vec<Listener>,
}

impl CheckersHost {
    pub fn mount(canvas_id: &str) -> Result<Self, HostError> {
        let surface = Rc::new(Surface::find(canvas_id)?);
        let game = Rc::new(RefCell::new(CheckersGame::new()));
        surface.paint(&render::checkers_frame(&game.borrow()));

        let target: EventTarget = surface.canvas.clone().into();
        let click = {
            let game = Rc::clone(&game);
            let surface = Rc::clone(&surface);
            Listener::attach(&target, "click", move |event: Event| {
                let Some(pos) = surface.event_position(&event) else {
                    return;
                };
                let (row, col) = ((pos.y / CHECKERS_CELL) as i32, (pos.x / CHECKERS_CELL) as i32);
                let cell = u8::try_from(row)
                    .ok()
                    .zip(u8::try_from(col).ok())
                    .and_then(|(r, c)| Cell::new(r, c));
                let Some(cell) = cell else {
                    return;
                };
                let Ok(mut game) = game.try_borrow_mut() else {
                    return;
                };
                if let ClickOutcome::Moved(record) = game.click(cell) {
                    log::debug!("{} moved {} -> {}", record.player, record.mv.from, record.mv.to);
                }
                surface.paint(&render::checkers_frame(&game));
            })?
        };

        log::info!("Checkers mounted on #{canvas_id}");
        Ok(Self {
            game,
            surface,
            listeners: vec![click],
        })
    }

    pub fn reset(&self) {
        if let Ok(mut game) = self.game.try_borrow_mut() {
            game.reset();
            self.surface.paint(&render::checkers_frame(&game));
        }
    }

    pub fn close(&mut self) {
        self.listeners.clear();
    }
}

fn open_store() -> Rc<dyn KeyValueStore> {
    match LocalStorageStore::open() {
        Ok(store) => Rc::new(store),
        Err(e) => {
            log::warn!("{e}; progress will not be saved");
            Rc::new(MemoryStore::new())
        }
    }
}

enum Mounted {
    Canvas(CanvasHost),
    Checkers(CheckersHost),
}

/// A mounted mini-game, handed to the page
#[wasm_bindgen]
pub struct ArcadeGame {
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl ArcadeGame {
    /// Forward game events to `callback` as JSON strings.
    pub fn on_event(&self, callback: js_sys::Function) {
        if let Some(Mounted::Canvas(host)) = &self.mounted {
            host.on_event(move |event| {
                if let Ok(json) = serde_json::to_string(&event) {
                    let _ = callback.call1(&JsValue::NULL, &JsValue::from_str(&json));
                }
            });
        }
    }

    /// Send awarded collectibles to the passport's inventory.
    pub fn link_passport(&self, passport: &Passport) {
        if let Some(Mounted::Canvas(host)) = &self.mounted {
            host.award_to(passport.bus.clone());
        }
    }

    pub fn restart(&self) {
        match &self.mounted {
            Some(Mounted::Canvas(host)) => {
                if let Err(e) = host.restart() {
                    log::warn!("Restart failed: {e}");
                }
            }
            Some(Mounted::Checkers(host)) => host.reset(),
            None => {}
        }
    }

    pub fn is_running(&self) -> bool {
        match &self.mounted {
            Some(Mounted::Canvas(host)) => host.is_running(),
            Some(Mounted::Checkers(_)) => true,
            None => false,
        }
    }

    /// Tear the game down; the canvas is left as is.
    pub fn close(&mut self) {
        match self.mounted.take() {
            Some(Mounted::Canvas(mut host)) => host.close(),
            Some(Mounted::Checkers(mut host)) => host.close(),
            None => {}
        }
    }
}

/// Mount one of `slingshot`, `runner`, `shooter` or `checkers` on a canvas.
#[wasm_bindgen]
pub fn mount_game(canvas_id: &str, kind: &str, seed: u32) -> Result<ArcadeGame, JsValue> {
    let tuning = Tuning::load(&*open_store());
    let seed = seed as u64;
    let mounted = match kind {
        "checkers" => CheckersHost::mount(canvas_id).map(Mounted::Checkers),
        "slingshot" => {
            CanvasHost::mount(canvas_id, Box::new(SlingshotGame::new(tuning.slingshot))).map(Mounted::Canvas)
        }
        "runner" => {
            CanvasHost::mount(canvas_id, Box::new(RunnerGame::new(tuning.runner, seed))).map(Mounted::Canvas)
        }
        "shooter" => {
            CanvasHost::mount(canvas_id, Box::new(ShooterGame::new(tuning.shooter, seed))).map(Mounted::Canvas)
        }
        other => return Err(JsValue::from_str(&format!("unknown game `{other}`"))),
    };
    match mounted {
        Ok(mounted) => Ok(ArcadeGame {
            mounted: Some(mounted),
        }),
        Err(e) => {
            log::warn!("Cannot start {kind}: {e}");
            Err(JsValue::from_str(&e.to_string()))
        }
    }
}

/// Collectibles and growth path progress for the page shell
#[wasm_bindgen]
pub struct Passport {
    bus: EventBus<CollectedItem>,
    inventory: Inventory,
    journey: Journey,
}

#[wasm_bindgen]
impl Passport {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Passport {
        let store = open_store();
        let bus = EventBus::new();
        let inventory = Inventory::attach(&bus, Rc::clone(&store));
        let journey = Journey::load(store);
        Passport {
            bus,
            inventory,
            journey,
        }
    }

    /// Award an item described as JSON `{id, name, icon, description}`.
    pub fn collect(&self, item_json: &str) -> bool {
        match serde_json::from_str::<CollectedItem>(item_json) {
            Ok(item) => self.bus.publish(&item) > 0,
            Err(e) => {
                log::warn!("Ignoring malformed item: {e}");
                false
            }
        }
    }

    pub fn items_json(&self) -> String {
        serde_json::to_string(&self.inventory.items()).unwrap_or_else(|_| "[]".into())
    }

    /// The current toast, as JSON, if one is showing
    pub fn notification_json(&self) -> Option<String> {
        self.inventory
            .notification()
            .and_then(|n| serde_json::to_string(&n.item).ok())
    }

    pub fn tick(&self, elapsed_ms: u32) {
        self.inventory.tick(elapsed_ms);
    }

    pub fn start_journey(&mut self, name: &str) -> bool {
        self.journey.start(name)
    }

    /// Take the next step; publishes the reward when the path is finished.
    pub fn advance_journey(&mut self) -> u32 {
        if let Some(reward) = self.journey.advance() {
            self.bus.publish(&reward);
        }
        self.journey.step()
    }

    pub fn reset_journey(&mut self) {
        self.journey.reset();
    }

    pub fn character_json(&self) -> String {
        serde_json::to_string(self.journey.character()).unwrap_or_else(|_| "{}".into())
    }
}

impl Default for Passport {
    fn default() -> Self {
        Self::new()
    }
}
