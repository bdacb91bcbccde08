//! Tile platformer.
//!
//! A fixed ASCII level (see `level`), gravity physics, patrolling enemies,
//! collectibles and a goal tile. Solid collision is resolved in two passes,
//! x before y, so the player slides along walls without corner-catching.
//! The camera follows horizontally with smoothing.

use crate::assets;
use crate::audio::AudioPlayer;
use crate::camera::Camera;
use crate::collision::{self, aabb_intersect, VerticalHit};
use crate::context::{self, Character, GameContext};
use crate::entity::{Entity, EntityKind, GRAVITY};
use crate::gui::OutcomeBanner;
use crate::level::{Level, Solid, SolidKind, LEVEL, TILE_SIZE};
use crate::minigames::MiniGameExit;
use crate::text::draw_text;
use sdl2::event::Event;
use sdl2::keyboard::{Keycode, Scancode};
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::{Canvas, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;
use std::time::Duration;

const RUN_SPEED: f32 = 160.0;
const JUMP_IMPULSE: f32 = 640.0;
const ENEMY_SPEED: f32 = 60.0;
const PLAYER_WIDTH: u32 = 22;
const PLAYER_HEIGHT: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformPhase {
    Playing,
    Won,
    Lost,
}

/// Held-direction input sampled once per frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveInput {
    pub left: bool,
    pub right: bool,
}

pub struct PatrolEnemy {
    pub entity: Entity,
    min_x: f32,
    max_x: f32,
    direction: f32,
}

pub struct PlatformerGame {
    level: Level,
    viewport_width: u32,
    pub player: Entity,
    pub enemies: Vec<PatrolEnemy>,
    pub collectibles: Vec<Entity>,
    pub collected: u32,
    pub phase: PlatformPhase,
    pub camera: Camera,
}

impl PlatformerGame {
    pub fn new(level: Level, viewport_width: u32) -> Self {
        let camera = Camera::new(level.pixel_width, viewport_width);
        let mut game = PlatformerGame {
            player: Entity::new(EntityKind::Platformer, 0.0, 0.0, PLAYER_WIDTH, PLAYER_HEIGHT),
            enemies: Vec::new(),
            collectibles: Vec::new(),
            collected: 0,
            phase: PlatformPhase::Playing,
            camera,
            viewport_width,
            level,
        };
        game.reset();
        game
    }

    /// Rebuilds all mutable state from the immutable parsed level.
    pub fn reset(&mut self) {
        let (sx, sy) = self.level.player_spawn;
        self.player = Entity::new(EntityKind::Platformer, sx, sy, PLAYER_WIDTH, PLAYER_HEIGHT);
        self.player.airborne = true;

        self.enemies = self
            .level
            .enemies
            .iter()
            .map(|spawn| {
                let entity = Entity::new(
                    EntityKind::Enemy,
                    spawn.x,
                    spawn.y + (TILE_SIZE - 28) as f32,
                    26,
                    28,
                );
                PatrolEnemy {
                    min_x: spawn.min_x,
                    max_x: spawn.max_x + TILE_SIZE as f32 - entity.width as f32,
                    entity,
                    direction: 1.0,
                }
            })
            .collect();

        self.collectibles = self.level.collectibles.clone();
        self.collected = 0;
        self.phase = PlatformPhase::Playing;
        self.camera = Camera::new(self.level.pixel_width, self.viewport_width);
    }

    pub fn goal(&self) -> Option<Rect> {
        self.level.goal
    }

    pub fn solids(&self) -> &[Solid] {
        &self.level.solids
    }

    pub fn jump(&mut self) -> bool {
        self.phase == PlatformPhase::Playing && self.player.jump(JUMP_IMPULSE)
    }

    pub fn update(&mut self, dt: f32, input: MoveInput) {
        if self.phase != PlatformPhase::Playing {
            return;
        }

        self.move_player(dt, input);
        self.move_enemies(dt);
        self.resolve_contacts();

        self.camera.follow(self.player.center_x());

        if self.player.y > self.level.pixel_height as f32 {
            self.phase = PlatformPhase::Lost;
        }
    }

    /// Horizontal pass first, then the vertical pass. Platforms only take
    /// part in the vertical pass, and only against a downward crossing of
    /// their top edge.
    fn move_player(&mut self, dt: f32, input: MoveInput) {
        self.player.vx = match (input.left, input.right) {
            (true, false) => -RUN_SPEED,
            (false, true) => RUN_SPEED,
            _ => 0.0,
        };

        let dx = self.player.vx * dt;
        self.player.x += dx;
        let mut rect = self.player.rect();
        let pre_resolve_x = rect.x();
        for solid in &self.level.solids {
            if solid.kind == SolidKind::Block {
                collision::resolve_x(&mut rect, dx, &solid.rect);
            }
        }
        // Snap only when a solid actually pushed back, so sub-pixel
        // movement is not truncated away every frame
        if rect.x() != pre_resolve_x {
            self.player.x = rect.x() as f32;
        }

        let prev_bottom = self.player.bottom();
        self.player.vy += GRAVITY * dt;
        let dy = self.player.vy * dt;
        self.player.y += dy;

        let mut rect = self.player.rect();
        let pre_resolve_y = rect.y();
        for solid in &self.level.solids {
            let applies = match solid.kind {
                SolidKind::Block => true,
                // Catch a downward crossing of the top edge (with a little
                // slack for sub-pixel drift while standing); anything
                // arriving from below or the side passes through
                SolidKind::Platform => dy > 0.0 && prev_bottom <= solid.rect.y() as f32 + 1.5,
            };
            if !applies {
                continue;
            }
            match collision::resolve_y(&mut rect, dy, &solid.rect) {
                VerticalHit::Floor | VerticalHit::Ceiling => self.player.vy = 0.0,
                VerticalHit::None => {}
            }
        }
        if rect.y() != pre_resolve_y {
            self.player.y = rect.y() as f32;
        }

        // Grounded means something supports the box one pixel down
        let probe = Rect::new(rect.x(), rect.y() + 1, rect.width(), rect.height());
        self.player.airborne = !self.level.solids.iter().any(|solid| {
            let supports = match solid.kind {
                SolidKind::Block => true,
                SolidKind::Platform => self.player.bottom() <= solid.rect.y() as f32 + 1.5,
            };
            supports && aabb_intersect(&probe, &solid.rect)
        });
        if !self.player.airborne {
            self.player.vy = self.player.vy.min(0.0);
        }
    }

    fn move_enemies(&mut self, dt: f32) {
        for enemy in &mut self.enemies {
            enemy.entity.x += enemy.direction * ENEMY_SPEED * dt;
            if enemy.entity.x <= enemy.min_x {
                enemy.entity.x = enemy.min_x;
                enemy.direction = 1.0;
            } else if enemy.entity.x >= enemy.max_x {
                enemy.entity.x = enemy.max_x;
                enemy.direction = -1.0;
            }
        }
    }

    fn resolve_contacts(&mut self) {
        let player_rect = self.player.rect();

        let before = self.collectibles.len();
        self.collectibles
            .retain(|item| !aabb_intersect(&player_rect, &item.rect()));
        self.collected += (before - self.collectibles.len()) as u32;

        if self
            .enemies
            .iter()
            .any(|enemy| aabb_intersect(&player_rect, &enemy.entity.rect()))
        {
            self.phase = PlatformPhase::Lost;
            return;
        }

        if let Some(goal) = self.level.goal {
            if aabb_intersect(&player_rect, &goal) {
                self.phase = PlatformPhase::Won;
            }
        }
    }
}

pub fn run(
    canvas: &mut Canvas<Window>,
    event_pump: &mut EventPump,
    texture_creator: &TextureCreator<WindowContext>,
    audio: &mut AudioPlayer,
    ctx: &GameContext,
    character: &Character,
) -> Result<MiniGameExit, String> {
    let background = assets::load_sprite_sized(
        texture_creator,
        &assets::background_path("village"),
        ctx.width,
        ctx.height,
        context::SKY,
    );
    let player_sprite = assets::load_sprite(
        texture_creator,
        &assets::face_path(character.id),
        PLAYER_HEIGHT,
        Color::RGB(0, 0, 255),
    );
    let enemy_sprite = assets::load_sprite(
        texture_creator,
        &assets::sprite_path("oni"),
        28,
        Color::RGB(170, 30, 30),
    );
    let goal_sprite = assets::load_sprite(
        texture_creator,
        &assets::sprite_path("book"),
        TILE_SIZE,
        context::GOLD,
    );

    let mut game = PlatformerGame::new(Level::parse(LEVEL), ctx.width);
    let banner = OutcomeBanner::new();
    audio.play_music("platformer");

    loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => {
                    audio.stop_music();
                    return Ok(MiniGameExit::Quit);
                }
                Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => {
                    audio.stop_music();
                    return Ok(MiniGameExit::ReturnToHub);
                }
                Event::KeyDown {
                    keycode: Some(Keycode::Space | Keycode::Up | Keycode::W),
                    ..
                } => match game.phase {
                    PlatformPhase::Playing => {
                        if game.jump() {
                            audio.play_sound("jump");
                        }
                    }
                    PlatformPhase::Won | PlatformPhase::Lost => game.reset(),
                },
                _ => {}
            }
        }

        let keyboard = event_pump.keyboard_state();
        let input = MoveInput {
            left: keyboard.is_scancode_pressed(Scancode::Left)
                || keyboard.is_scancode_pressed(Scancode::A),
            right: keyboard.is_scancode_pressed(Scancode::Right)
                || keyboard.is_scancode_pressed(Scancode::D),
        };
        game.update(1.0 / 60.0, input);

        background.render(canvas, 0, 0)?;

        let camera = &game.camera;
        for solid in game.solids() {
            let color = match solid.kind {
                SolidKind::Block => Color::RGB(70, 70, 85),
                SolidKind::Platform => Color::RGB(140, 95, 50),
            };
            canvas.set_draw_color(color);
            canvas.fill_rect(Rect::new(
                camera.apply(solid.rect.x() as f32),
                solid.rect.y(),
                solid.rect.width(),
                solid.rect.height(),
            ))?;
        }

        canvas.set_draw_color(context::GOLD);
        for item in &game.collectibles {
            canvas.fill_rect(Rect::new(
                camera.apply(item.x),
                item.y as i32,
                item.width,
                item.height,
            ))?;
        }

        if let Some(goal) = game.goal() {
            goal_sprite.render(canvas, camera.apply(goal.x() as f32), goal.y())?;
        }
        for enemy in &game.enemies {
            enemy_sprite.render(canvas, camera.apply(enemy.entity.x), enemy.entity.y as i32)?;
        }
        player_sprite.render(canvas, camera.apply(game.player.x), game.player.y as i32)?;

        let hud = format!("SCROLLS {}", game.collected);
        draw_text(canvas, &hud, 16, 16, context::PAPER, 2)?;

        match game.phase {
            PlatformPhase::Won => banner.render(
                canvas,
                "YOU GOT THE BOOK!",
                context::GOLD,
                "SPACE TO PLAY AGAIN",
                "ESC FOR THE HUB",
            )?,
            PlatformPhase::Lost => banner.render(
                canvas,
                "CAUGHT!",
                Color::RGB(255, 80, 80),
                "SPACE TO TRY AGAIN",
                "ESC FOR THE HUB",
            )?,
            PlatformPhase::Playing => {}
        }

        canvas.present();
        std::thread::sleep(Duration::new(0, 1_000_000_000u32 / 60));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn walled_box() -> PlatformerGame {
        // Player in a pit with walls either side
        PlatformerGame::new(
            Level::parse(&[
                "#      #", //
                "# P    #",
                "########",
            ]),
            640,
        )
    }

    fn settle(game: &mut PlatformerGame) {
        for _ in 0..60 {
            game.update(DT, MoveInput::default());
        }
    }

    #[test]
    fn test_player_lands_and_stays_grounded() {
        let mut game = walled_box();
        settle(&mut game);

        assert!(!game.player.airborne);
        assert_eq!(game.player.vy, 0.0);
        assert!((game.player.bottom() - (2 * TILE_SIZE) as f32).abs() < 1.5);
    }

    #[test]
    fn test_wall_resolution_never_overlaps() {
        let mut game = walled_box();
        settle(&mut game);

        // Push right into the wall for two seconds
        for _ in 0..120 {
            game.update(
                DT,
                MoveInput {
                    left: false,
                    right: true,
                },
            );
            let player_rect = game.player.rect();
            for solid in game.solids() {
                assert!(!aabb_intersect(&player_rect, &solid.rect));
            }
        }
        // Flush against the wall's left face
        assert_eq!(
            game.player.x as i32 + PLAYER_WIDTH as i32,
            (7 * TILE_SIZE) as i32
        );
    }

    #[test]
    fn test_jump_only_from_ground() {
        let mut game = walled_box();
        settle(&mut game);

        assert!(game.jump());
        game.update(DT, MoveInput::default());
        assert!(game.player.airborne);
        assert!(!game.jump());
    }

    #[test]
    fn test_platform_catches_fall_but_not_rise() {
        let mut game = PlatformerGame::new(
            Level::parse(&[
                "P   ", //
                "    ",
                " == ",
                "####",
            ]),
            640,
        );

        // Start above the platform and fall onto it
        settle(&mut game);
        let platform_top = (2 * TILE_SIZE) as f32;
        let floor_top = (3 * TILE_SIZE) as f32;
        // Player spawned at column 0, which has no platform: lands on floor
        assert!((game.player.bottom() - floor_top).abs() < 1.5);

        // Teleport above the platform and fall again
        game.player.x = (TILE_SIZE + 4) as f32;
        game.player.y = 0.0;
        game.player.vy = 0.0;
        game.player.airborne = true;
        settle(&mut game);
        assert!((game.player.bottom() - platform_top).abs() < 1.5);

        // Jumping up through it does not bonk: clear the platform band
        assert!(game.jump());
        let mut max_rise = game.player.y;
        for _ in 0..20 {
            game.update(DT, MoveInput::default());
            max_rise = max_rise.min(game.player.y);
        }
        assert!(max_rise < platform_top - 20.0);
    }

    #[test]
    fn test_enemy_patrols_between_bounds() {
        let mut game = PlatformerGame::new(
            Level::parse(&[
                "P  #E  #", //
                "########",
            ]),
            640,
        );
        let enemy_min = game.enemies[0].min_x;
        let enemy_max = game.enemies[0].max_x;
        assert_eq!(enemy_min, (4 * TILE_SIZE) as f32);

        let mut seen_left = false;
        let mut seen_right = false;
        for _ in 0..2000 {
            game.move_enemies(DT);
            let x = game.enemies[0].entity.x;
            assert!(x >= enemy_min - 0.001 && x <= enemy_max + 0.001);
            if x == enemy_min {
                seen_left = true;
            }
            if x == enemy_max {
                seen_right = true;
            }
        }
        assert!(seen_left && seen_right);
    }

    #[test]
    fn test_collectible_picked_up_once() {
        let mut game = PlatformerGame::new(
            Level::parse(&[
                "Po ", //
                "###",
            ]),
            640,
        );
        settle(&mut game);

        for _ in 0..60 {
            game.update(
                DT,
                MoveInput {
                    left: false,
                    right: true,
                },
            );
        }
        assert_eq!(game.collected, 1);
        assert!(game.collectibles.is_empty());
    }

    #[test]
    fn test_enemy_contact_loses() {
        let mut game = PlatformerGame::new(
            Level::parse(&[
                "PE ", //
                "###",
            ]),
            640,
        );
        // The patrol reaches back to the player's column within a few seconds
        for _ in 0..300 {
            game.update(DT, MoveInput::default());
            if game.phase == PlatformPhase::Lost {
                break;
            }
        }
        assert_eq!(game.phase, PlatformPhase::Lost);
    }

    #[test]
    fn test_goal_contact_wins() {
        let mut game = PlatformerGame::new(
            Level::parse(&[
                "P G", //
                "###",
            ]),
            640,
        );
        for _ in 0..120 {
            game.update(
                DT,
                MoveInput {
                    left: false,
                    right: true,
                },
            );
        }
        assert_eq!(game.phase, PlatformPhase::Won);
    }

    #[test]
    fn test_falling_out_of_the_level_loses() {
        let mut game = PlatformerGame::new(
            Level::parse(&[
                "P  ", //
                "#  ",
            ]),
            640,
        );
        for _ in 0..300 {
            game.update(
                DT,
                MoveInput {
                    left: false,
                    right: true,
                },
            );
        }
        assert_eq!(game.phase, PlatformPhase::Lost);
    }

    #[test]
    fn test_reset_restores_everything() {
        let mut game = PlatformerGame::new(
            Level::parse(&[
                "Po G", //
                "####",
            ]),
            640,
        );
        for _ in 0..240 {
            game.update(
                DT,
                MoveInput {
                    left: false,
                    right: true,
                },
            );
        }
        assert_eq!(game.phase, PlatformPhase::Won);
        assert_eq!(game.collected, 1);

        game.reset();
        assert_eq!(game.phase, PlatformPhase::Playing);
        assert_eq!(game.collected, 0);
        assert_eq!(game.collectibles.len(), 1);
        assert_eq!(game.player.x, game.level.player_spawn.0);
    }
}
