//! State -> frame builders, one per game

use glam::Vec2;

use super::{Color, Frame};
use crate::checkers::{BOARD_SIZE, Cell, CheckersGame, Player};
use crate::sim::runner::RunnerGame;
use crate::sim::shooter::ShooterGame;
use crate::sim::slingshot::SlingshotGame;
use crate::sim::{GamePhase, ProjectileState, Rect};

/// Side of one checkers square in pixels
pub const CHECKERS_CELL: f32 = 40.0;

const SKY: Color = Color::hex(0x87ceeb);
const GRASS: Color = Color::hex(0x4caf50);
const BUILDING: Color = Color::hex(0xfce7f3);
const BUILDING_EDGE: Color = Color::hex(0xfbcfe8);
const BAND: Color = Color::hex(0x3e2723);
const PROJECTILE: Color = Color::hex(0x6b7280);
const ENEMY: Color = Color::hex(0x78716c);
const DANGER: Color = Color::hex(0xef4444);
const HUD: Color = Color::hex(0x111827);

fn phase_banner(frame: &mut Frame, phase: GamePhase, color: Color) {
    let message = match phase {
        GamePhase::Playing => return,
        GamePhase::Won => "Victory!",
        GamePhase::Lost => "Game over",
    };
    let center = Vec2::new(frame.width / 2.0, frame.height / 2.0);
    frame.text(center, message, 28.0, color);
}

/// Slingshot scene: sky, ground, buildings, launcher, targets and HUD
pub fn slingshot_frame(game: &SlingshotGame) -> Frame {
    let t = &game.tuning;
    let mut frame = Frame::new(t.width, t.height);
    frame.clear(SKY);
    frame.rect(Rect::new(0.0, t.ground_y, t.width, t.height - t.ground_y), GRASS);

    for building in &game.buildings {
        frame.rect(*building, BUILDING);
        frame.stroke_rect(*building, BUILDING_EDGE, 2.0);
    }

    // Launcher car under the anchor
    frame.rect(Rect::new(40.0, t.ground_y - 50.0, 60.0, 30.0), DANGER);
    frame.circle(Vec2::new(55.0, t.ground_y - 20.0), 8.0, Color::hex(0x333333));
    frame.circle(Vec2::new(85.0, t.ground_y - 20.0), 8.0, Color::hex(0x333333));

    let p = &game.projectile;
    let dragging = p.state == ProjectileState::Dragging;
    if dragging {
        frame.line(t.anchor - Vec2::new(10.0, 0.0), p.pos, BAND, 3.0);
    }
    if p.state != ProjectileState::Hit {
        frame.circle(p.pos, p.radius, PROJECTILE);
    }
    if dragging {
        frame.line(t.anchor + Vec2::new(10.0, 0.0), p.pos, BAND, 3.0);
    }

    for enemy in game.enemies.iter().filter(|e| e.alive) {
        frame.circle(enemy.pos, enemy.radius, ENEMY);
    }

    frame.text(
        Vec2::new(t.width / 2.0, 24.0),
        format!("Score {}   Shots {}", game.score, game.ammo),
        16.0,
        HUD,
    );
    phase_banner(
        &mut frame,
        game.phase,
        if game.phase == GamePhase::Won { Color::hex(0x16a34a) } else { DANGER },
    );
    frame
}

/// Runner scene: ground line, player square, obstacles
pub fn runner_frame(game: &RunnerGame) -> Frame {
    let t = &game.tuning;
    let mut frame = Frame::new(t.width, t.height);
    frame.clear(Color::hex(0xf3f4f6));
    frame.rect(Rect::new(0.0, t.ground_y, t.width, 2.0), Color::hex(0x555555));
    frame.rect(
        Rect::new(t.player_x, game.player_top(), t.player_size, t.player_size),
        Color::hex(0x3b82f6),
    );
    for obstacle in &game.obstacles {
        frame.rect(game.obstacle_rect(obstacle), DANGER);
    }
    frame.text(
        Vec2::new(t.width - 40.0, 20.0),
        game.score.to_string(),
        14.0,
        HUD,
    );
    phase_banner(&mut frame, game.phase, DANGER);
    frame
}

/// Shooter scene: tank, bullets, falling enemies
pub fn shooter_frame(game: &ShooterGame) -> Frame {
    let t = &game.tuning;
    let mut frame = Frame::new(t.width, t.height);
    frame.clear(Color::hex(0x0f172a));

    let tank = Color::hex(0x22c55e);
    frame.rect(Rect::new(game.player_x - 10.0, t.player_y, 20.0, 20.0), tank);
    frame.rect(Rect::new(game.player_x - 2.0, t.muzzle_y, 4.0, t.player_y - t.muzzle_y), tank);

    for bullet in &game.bullets {
        frame.rect(Rect::new(bullet.x - 2.0, bullet.y, 4.0, 6.0), Color::hex(0xfbbf24));
    }
    for enemy in &game.enemies {
        frame.rect(Rect::new(enemy.x - 10.0, enemy.y, 20.0, 20.0), DANGER);
    }

    frame.text(Vec2::new(40.0, 20.0), game.score.to_string(), 14.0, Color::WHITE);
    phase_banner(&mut frame, game.phase, DANGER);
    frame
}

/// Checkers board with selection and legal-destination highlights
pub fn checkers_frame(game: &CheckersGame) -> Frame {
    let side = CHECKERS_CELL * BOARD_SIZE as f32;
    let mut frame = Frame::new(side, side);
    frame.clear(Color::hex(0x78350f));

    let cell_rect = |cell: Cell| {
        Rect::new(
            cell.col() as f32 * CHECKERS_CELL,
            cell.row() as f32 * CHECKERS_CELL,
            CHECKERS_CELL,
            CHECKERS_CELL,
        )
    };
    let cell_center = |cell: Cell| {
        Vec2::new(
            (cell.col() as f32 + 0.5) * CHECKERS_CELL,
            (cell.row() as f32 + 0.5) * CHECKERS_CELL,
        )
    };

    for row in 0..BOARD_SIZE as u8 {
        for col in 0..BOARD_SIZE as u8 {
            if let Some(cell) = Cell::new(row, col) {
                let color = if cell.is_dark() {
                    Color::hex(0x92400e)
                } else {
                    Color::hex(0xfde68a)
                };
                frame.rect(cell_rect(cell), color);
            }
        }
    }

    let highlighted = game.highlighted();
    for &cell in &highlighted {
        frame.stroke_rect(cell_rect(cell), Color::hex(0x4ade80), 4.0);
        frame.circle(cell_center(cell), 6.0, Color::hex(0x22c55e).with_alpha(128));
    }

    let selected = game.selection.as_ref().map(|s| s.cell);
    let radius = CHECKERS_CELL * 0.4;
    for (cell, piece) in game.board.occupied() {
        let center = cell_center(cell);
        let (fill, edge) = match piece.owner {
            Player::Red => (Color::hex(0xdc2626), Color::hex(0x991b1b)),
            Player::Black => (Color::hex(0x111827), Color::BLACK),
        };
        let ring = if selected == Some(cell) {
            Some(Color::WHITE)
        } else if piece.is_king {
            Some(Color::hex(0xfacc15))
        } else {
            None
        };
        if let Some(ring) = ring {
            frame.circle(center, radius + 3.0, ring);
        }
        frame.circle(center, radius, edge);
        frame.circle(center, radius - 2.0, fill);
        if piece.is_king {
            frame.text(center + Vec2::new(0.0, 5.0), "K", 14.0, Color::hex(0xfacc15));
        }
    }
    frame
}
