//! End-to-end sessions through the public API

use std::rc::Rc;

use glam::Vec2;
use hamim_arcade::bus::EventBus;
use hamim_arcade::checkers::{Cell, CheckersGame, ClickOutcome, Piece, Player, legal_destinations};
use hamim_arcade::collection::Inventory;
use hamim_arcade::consts::SIM_DT;
use hamim_arcade::host::FrameDriver;
use hamim_arcade::journey::{Journey, JourneyPhase};
use hamim_arcade::persistence::{KeyValueStore, MemoryStore};
use hamim_arcade::sim::{
    GameEvent, GamePhase, InputEvent, ProjectileState, SlingshotGame, victory_reward,
};
use hamim_arcade::{CollectedItem, Tuning};

fn cell(row: u8, col: u8) -> Cell {
    Cell::new(row, col).unwrap()
}

#[test]
fn checkers_forced_jump_scenario() {
    let mut game = CheckersGame::new();
    assert!(legal_destinations(&game.board, cell(5, 0)).contains(&cell(4, 1)));

    game.board.set(cell(4, 1), Some(Piece::man(Player::Black)));
    assert_eq!(legal_destinations(&game.board, cell(5, 0)), vec![cell(3, 2)]);

    assert_eq!(game.click(cell(5, 0)), ClickOutcome::Selected(cell(5, 0)));
    // A cell that is not a destination leaves the turn alone
    game.click(cell(4, 1));
    assert_eq!(game.turn, Player::Red);

    game.click(cell(5, 0));
    match game.click(cell(3, 2)) {
        ClickOutcome::Moved(record) => assert_eq!(record.captured, Some(cell(4, 1))),
        other => panic!("expected a move, got {other:?}"),
    }
    assert!(game.board.is_empty(cell(4, 1)));
    assert!(game.board.is_empty(cell(5, 0)));
    assert_eq!(game.board.get(cell(3, 2)), Some(Piece::man(Player::Red)));
    assert_eq!(game.turn, Player::Black);
}

#[test]
fn drag_launches_opposite_direction() {
    let mut game = SlingshotGame::default();
    let anchor = game.tuning.anchor;
    assert!(game.pointer_down(anchor));
    game.pointer_move(anchor + Vec2::new(-30.0, -30.0));
    game.pointer_up();
    assert_eq!(game.projectile.state, ProjectileState::Flying);
    assert_eq!(game.projectile.vel, Vec2::new(7.5, 7.5));
}

#[test]
fn slingshot_session_ends_in_exactly_one_outcome() {
    let mut driver = FrameDriver::new(SlingshotGame::default());
    let anchor = driver.sim().tuning.anchor;
    let mut ammo_seen = vec![driver.sim().ammo];

    for _ in 0..10_000 {
        let sim = driver.sim();
        let settled = sim.projectile.state == ProjectileState::Idle;
        if settled && sim.phase.is_terminal() {
            break;
        }
        if settled {
            driver.input(InputEvent::PointerDown(anchor));
            driver.input(InputEvent::PointerMove(anchor + Vec2::new(-60.0, 20.0)));
            driver.input(InputEvent::PointerUp);
        }
        driver.advance(SIM_DT);
        for event in driver.drain_events() {
            if let GameEvent::AmmoChanged(ammo) = event {
                assert_eq!(ammo + 1, *ammo_seen.last().unwrap());
                ammo_seen.push(ammo);
            }
        }
    }

    let sim = driver.sim();
    match sim.phase {
        GamePhase::Won => assert_eq!(sim.enemies_alive(), 0),
        GamePhase::Lost => {
            assert_eq!(sim.ammo, 0);
            assert!(sim.enemies_alive() > 0);
        }
        GamePhase::Playing => panic!("session never finished"),
    }
    assert!(ammo_seen.len() >= 2);
}

#[test]
fn slingshot_victory_reaches_the_inventory() {
    let store = Rc::new(MemoryStore::new());
    let bus = EventBus::<CollectedItem>::new();
    let inventory = Inventory::attach(&bus, store.clone());

    let mut game = SlingshotGame::default();
    let anchor = game.tuning.anchor;
    for enemy in game.enemies.iter_mut().skip(1) {
        enemy.alive = false;
    }
    // The last enemy sits right under a dropped shot
    game.enemies[0].pos = anchor + Vec2::new(0.0, 30.0);

    let mut driver = FrameDriver::new(game);
    driver.input(InputEvent::PointerDown(anchor));
    driver.input(InputEvent::PointerUp);
    let mut awarded = 0;
    for _ in 0..600 {
        driver.advance(SIM_DT);
        for event in driver.drain_events() {
            if let GameEvent::ItemAwarded(item) = event {
                awarded += 1;
                bus.publish(&item);
            }
        }
    }

    assert_eq!(driver.phase(), GamePhase::Won);
    assert_eq!(awarded, 1);
    assert!(inventory.contains(&victory_reward().id));
    assert_eq!(
        inventory.notification().map(|n| n.item.id),
        Some(victory_reward().id)
    );
}

#[test]
fn stopped_driver_never_ticks() {
    let mut driver = FrameDriver::new(SlingshotGame::default());
    driver.stop();
    for _ in 0..10 {
        assert_eq!(driver.on_frame(16.0), 0);
    }
    assert_eq!(driver.sim().time_ticks, 0);
}

#[test]
fn finishing_the_journey_fills_the_passport() {
    let store = Rc::new(MemoryStore::new());
    let bus = EventBus::<CollectedItem>::new();
    let inventory = Inventory::attach(&bus, store.clone());
    let mut journey = Journey::load(store.clone());

    assert!(journey.start("Hamid"));
    let mut rewards = Vec::new();
    while journey.phase() == JourneyPhase::Playing {
        if let Some(item) = journey.advance() {
            rewards.push(item);
        }
    }
    assert_eq!(rewards.len(), 1);
    for reward in &rewards {
        assert_eq!(bus.publish(reward), 1);
    }
    assert!(inventory.contains("item-tasbih"));
    assert!(inventory.notification().is_some());

    // A second page load sees both the finished path and the item
    drop(inventory);
    let bus = EventBus::<CollectedItem>::new();
    let reloaded = Inventory::attach(&bus, store.clone());
    assert!(reloaded.contains("item-tasbih"));
    assert!(reloaded.notification().is_none());
    assert_eq!(Journey::load(store).phase(), JourneyPhase::Completed);
}

#[test]
fn tuning_overrides_reach_the_game() {
    let store = MemoryStore::new();
    store
        .set(Tuning::STORAGE_KEY, r#"{ "slingshot": { "ammo": 1 } }"#)
        .unwrap();
    let tuning = Tuning::load(&store);
    let game = SlingshotGame::new(tuning.slingshot);
    assert_eq!(game.ammo, 1);
    assert_eq!(game.enemies.len(), 4);
}
