//! Hamim Arcade entry point
//!
//! On the web this only installs logging; the page mounts games through the
//! exported `mount_game` and `Passport` API. Natively it plays a short
//! scripted session of every game headlessly and logs the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Hamim Arcade loaded");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Hamim Arcade (native) starting headless demo");
    headless::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::rc::Rc;

    use glam::Vec2;
    use hamim_arcade::bus::EventBus;
    use hamim_arcade::checkers::CheckersGame;
    use hamim_arcade::collection::Inventory;
    use hamim_arcade::consts::SIM_DT;
    use hamim_arcade::host::FrameDriver;
    use hamim_arcade::journey::{Journey, STEPS};
    use hamim_arcade::persistence::{KeyValueStore, MemoryStore};
    use hamim_arcade::sim::{
        GameEvent, GamePhase, InputEvent, Key, ProjectileState, RunnerGame, ShooterGame, Simulation,
        SlingshotGame,
    };
    use hamim_arcade::{CollectedItem, Tuning};

    /// Upper bound on simulated frames per game
    const FRAME_LIMIT: u32 = 60 * 120;

    pub fn run() {
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::new());
        let tuning = Tuning::load(&*store);
        let bus = EventBus::<CollectedItem>::new();
        let inventory = Inventory::attach(&bus, Rc::clone(&store));

        slingshot(&tuning, &bus);
        runner(&tuning, &bus);
        shooter(&tuning, &bus);
        checkers();
        journey(store, &bus);
        println!(
            "collected: {:?}",
            inventory.items().iter().map(|i| &i.id).collect::<Vec<_>>()
        );
    }

    fn play<S: Simulation>(
        name: &str,
        driver: &mut FrameDriver<S>,
        bus: &EventBus<CollectedItem>,
        mut script: impl FnMut(u32, &mut FrameDriver<S>),
    ) {
        let mut frames = 0;
        while driver.phase() == GamePhase::Playing && frames < FRAME_LIMIT {
            script(frames, driver);
            driver.advance(SIM_DT);
            for event in driver.drain_events() {
                log::debug!("{name}: {event:?}");
                if let GameEvent::ItemAwarded(item) = event {
                    bus.publish(&item);
                }
            }
            frames += 1;
        }
        driver.stop();
        println!("{name}: {:?} after {} ticks", driver.phase(), driver.ticks());
    }

    fn slingshot(tuning: &Tuning, bus: &EventBus<CollectedItem>) {
        let mut driver = FrameDriver::new(SlingshotGame::new(tuning.slingshot.clone()));
        let anchor = tuning.slingshot.anchor;
        // Pull straight back and down, then let go; repeat whenever the shot is reset
        play("slingshot", &mut driver, bus, |_, d| {
            if d.sim().projectile.state == ProjectileState::Idle {
                d.input(InputEvent::PointerDown(anchor));
                d.input(InputEvent::PointerMove(anchor + Vec2::new(-60.0, 25.0)));
                d.input(InputEvent::PointerUp);
            }
        });
        println!("slingshot: score {}", driver.sim().score);
    }

    fn runner(tuning: &Tuning, bus: &EventBus<CollectedItem>) {
        let mut driver = FrameDriver::new(RunnerGame::new(tuning.runner.clone(), 42));
        play("runner", &mut driver, bus, |_, d| {
            let t = &d.sim().tuning;
            let player_right = t.player_x + t.hitbox_width;
            let danger = d
                .sim()
                .obstacles
                .iter()
                .any(|o| o.x > player_right && o.x - player_right < 40.0);
            if danger {
                d.input(InputEvent::Key(Key::Jump));
            }
        });
        println!("runner: score {}", driver.sim().score);
    }

    fn shooter(tuning: &Tuning, bus: &EventBus<CollectedItem>) {
        let mut driver = FrameDriver::new(ShooterGame::new(tuning.shooter.clone(), 42));
        play("shooter", &mut driver, bus, |frame, d| {
            let target = d.sim().enemies.iter().map(|e| e.x).next();
            if let Some(x) = target {
                let px = d.sim().player_x;
                if x < px - 5.0 {
                    d.input(InputEvent::Key(Key::Left));
                } else if x > px + 5.0 {
                    d.input(InputEvent::Key(Key::Right));
                }
            }
            if frame % 15 == 0 {
                d.input(InputEvent::Key(Key::Fire));
            }
        });
        println!("shooter: score {}", driver.sim().score);
    }

    fn checkers() {
        let mut game = CheckersGame::new();
        for (row, col) in [(5, 0), (4, 1), (2, 3), (3, 2)] {
            match game.click_at(row, col) {
                Ok(outcome) => log::debug!("checkers: ({row}, {col}) -> {outcome:?}"),
                Err(e) => log::warn!("checkers: {e}"),
            }
        }
        println!(
            "checkers: {} moves played, {} to move",
            game.move_count, game.turn
        );
    }

    fn journey(store: Rc<dyn KeyValueStore>, bus: &EventBus<CollectedItem>) {
        let mut journey = Journey::load(store);
        journey.start("Demo");
        for _ in 0..STEPS.len() {
            if let Some(reward) = journey.advance() {
                bus.publish(&reward);
            }
        }
        println!("journey: {:?} at step {}", journey.phase(), journey.step());
    }
}
