//! Side-scrolling runner.
//!
//! The player runs in place near the left edge; obstacles scroll in from
//! the right at constant speed. Space jumps (grounded only). Survive until
//! the score counter reaches its target. Collision is pixel-mask based, and
//! gate obstacles only collide with their top bar, so ducking under the
//! arch is a fair dodge.

use crate::assets;
use crate::audio::AudioPlayer;
use crate::collision::PixelMask;
use crate::context::{self, Character, GameContext};
use crate::entity::{Entity, EntityKind};
use crate::gui::OutcomeBanner;
use crate::minigames::MiniGameExit;
use crate::text::draw_text;
use rand::Rng;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::rect::Rect;
use sdl2::render::{Canvas, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;
use std::time::Duration;

const SPAWN_INTERVAL: f32 = 1.4;
const TARGET_SCORE: u32 = 3000;
/// Fraction of a gate's height that actually collides (the crossbar).
const GATE_HIT_BAND: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerPhase {
    Playing,
    GameOver,
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Tall arch; only the top bar is solid.
    Gate,
    /// Small round roller; fully solid.
    Tumbler,
}

/// Size and collision mask shared by every obstacle of one kind.
#[derive(Clone)]
pub struct ObstacleTemplate {
    pub width: u32,
    pub height: u32,
    pub mask: PixelMask,
}

pub struct Obstacle {
    pub kind: ObstacleKind,
    pub entity: Entity,
}

pub struct RunnerGame {
    width: u32,
    ground_y: f32,
    pub player: Entity,
    player_mask: PixelMask,
    gate: ObstacleTemplate,
    tumbler: ObstacleTemplate,
    pub obstacles: Vec<Obstacle>,
    clock: f32,
    next_spawn_at: f32,
    pub score: u32,
    pub phase: RunnerPhase,
    jump_impulse: f32,
    scroll_speed: f32,
}

impl RunnerGame {
    pub fn new(
        width: u32,
        height: u32,
        ground_y: f32,
        player_width: u32,
        player_height: u32,
        player_mask: PixelMask,
        gate: ObstacleTemplate,
        tumbler: ObstacleTemplate,
    ) -> Self {
        let mut player = Entity::new(
            EntityKind::Runner,
            width as f32 * 0.1,
            0.0,
            player_width,
            player_height,
        );
        player.y = ground_y - player_height as f32;

        RunnerGame {
            width,
            ground_y,
            player,
            player_mask,
            gate,
            tumbler,
            obstacles: Vec::new(),
            clock: 0.0,
            next_spawn_at: SPAWN_INTERVAL,
            score: 0,
            phase: RunnerPhase::Playing,
            jump_impulse: height as f32 * 2.28,
            scroll_speed: width as f32 * 0.78,
        }
    }

    /// Re-initializes all mutable state for a restart in place.
    pub fn reset(&mut self) {
        self.obstacles.clear();
        self.clock = 0.0;
        self.next_spawn_at = SPAWN_INTERVAL;
        self.score = 0;
        self.phase = RunnerPhase::Playing;
        self.player.y = self.ground_y - self.player.height as f32;
        self.player.vy = 0.0;
        self.player.airborne = false;
    }

    /// Returns whether the impulse was applied (grounded and playing).
    pub fn jump(&mut self) -> bool {
        self.phase == RunnerPhase::Playing && self.player.jump(self.jump_impulse)
    }

    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        if self.phase != RunnerPhase::Playing {
            return;
        }
        self.clock += dt;

        self.player.apply_gravity(dt);
        self.player.land_on(self.ground_y);

        if self.clock >= self.next_spawn_at {
            self.spawn_obstacle(rng);
            self.next_spawn_at += SPAWN_INTERVAL;
        }

        for obstacle in &mut self.obstacles {
            obstacle.entity.x -= self.scroll_speed * dt;
        }
        self.obstacles
            .retain(|o| o.entity.x + o.entity.width as f32 > 0.0);

        self.score += 1;
        if self.score >= TARGET_SCORE {
            self.phase = RunnerPhase::Won;
            return;
        }

        if self.hits_obstacle() {
            self.phase = RunnerPhase::GameOver;
        }
    }

    fn spawn_obstacle(&mut self, rng: &mut impl Rng) {
        let kind = if rng.gen_bool(0.5) {
            ObstacleKind::Gate
        } else {
            ObstacleKind::Tumbler
        };
        let template = self.template(kind);

        let stagger = rng.gen_range(0..(self.width as f32 * 0.3) as i32) as f32;
        let mut entity = Entity::new(
            EntityKind::Obstacle,
            self.width as f32 + stagger,
            0.0,
            template.width,
            template.height,
        );
        // Obstacles sit slightly into the ground band
        entity.y = self.ground_y + 5.0 - template.height as f32;

        self.obstacles.push(Obstacle { kind, entity });
    }

    fn template(&self, kind: ObstacleKind) -> &ObstacleTemplate {
        match kind {
            ObstacleKind::Gate => &self.gate,
            ObstacleKind::Tumbler => &self.tumbler,
        }
    }

    fn hits_obstacle(&self) -> bool {
        let px = self.player.x as i32;
        let py = self.player.y as i32;

        self.obstacles.iter().any(|obstacle| {
            let mask = &self.template(obstacle.kind).mask;
            self.player_mask.overlaps(
                mask,
                obstacle.entity.x as i32 - px,
                obstacle.entity.y as i32 - py,
            )
        })
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
        &assets::background_path("fuji"),
        ctx.width,
        ctx.height,
        context::SKY,
    );

    let player_height = (ctx.height as f32 * 0.25) as u32;
    let player_sprite = assets::load_sprite(
        texture_creator,
        &assets::face_path(character.id),
        player_height,
        sdl2::pixels::Color::RGB(0, 0, 255),
    );

    let gate_height = (ctx.height as f32 * 0.45) as u32;
    let gate_sprite = assets::load_sprite(
        texture_creator,
        &assets::sprite_path("gate"),
        gate_height,
        context::GATE_RED,
    );
    let tumbler_height = (ctx.height as f32 * 0.19) as u32;
    let tumbler_sprite = assets::load_sprite(
        texture_creator,
        &assets::sprite_path("tumbler"),
        tumbler_height,
        context::TUMBLER_RED,
    );

    let mut game = RunnerGame::new(
        ctx.width,
        ctx.height,
        ctx.ground_y as f32,
        player_sprite.width,
        player_sprite.height,
        player_sprite.mask().clone(),
        ObstacleTemplate {
            width: gate_sprite.width,
            height: gate_sprite.height,
            mask: gate_sprite.mask().top_band(GATE_HIT_BAND),
        },
        ObstacleTemplate {
            width: tumbler_sprite.width,
            height: tumbler_sprite.height,
            mask: tumbler_sprite.mask().clone(),
        },
    );

    let banner = OutcomeBanner::new();
    let mut rng = rand::thread_rng();
    audio.play_music("runner");

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
                    keycode: Some(Keycode::Space),
                    ..
                } => match game.phase {
                    RunnerPhase::Playing => {
                        if game.jump() {
                            audio.play_sound("jump");
                        }
                    }
                    RunnerPhase::GameOver | RunnerPhase::Won => game.reset(),
                },
                _ => {}
            }
        }

        game.update(1.0 / 60.0, &mut rng);

        background.render(canvas, 0, 0)?;

        canvas.set_draw_color(context::GROUND_BLUE);
        canvas.fill_rect(Rect::new(
            0,
            ctx.ground_y,
            ctx.width,
            ctx.height - ctx.ground_y as u32,
        ))?;

        for obstacle in &game.obstacles {
            let sprite = match obstacle.kind {
                ObstacleKind::Gate => &gate_sprite,
                ObstacleKind::Tumbler => &tumbler_sprite,
            };
            sprite.render(canvas, obstacle.entity.x as i32, obstacle.entity.y as i32)?;
        }
        player_sprite.render(canvas, game.player.x as i32, game.player.y as i32)?;

        // Score card, paper on ink
        let score_text = format!("SCORE {} / {}", game.score, TARGET_SCORE);
        let card = Rect::new(16, 12, (score_text.len() as u32) * 12 + 20, 34);
        canvas.set_draw_color(context::PAPER);
        canvas.fill_rect(card)?;
        canvas.set_draw_color(context::INK);
        canvas.draw_rect(card)?;
        draw_text(canvas, &score_text, card.x() + 10, card.y() + 10, context::INK, 2)?;

        match game.phase {
            RunnerPhase::GameOver => banner.render(
                canvas,
                "YOU CRASHED!",
                sdl2::pixels::Color::RGB(255, 80, 80),
                "SPACE TO TRY AGAIN",
                "ESC FOR THE HUB",
            )?,
            RunnerPhase::Won => banner.render(
                canvas,
                "COURSE CLEAR!",
                context::GOLD,
                "SPACE TO RUN AGAIN",
                "ESC FOR THE HUB",
            )?,
            RunnerPhase::Playing => {}
        }

        canvas.present();
        std::thread::sleep(Duration::new(0, 1_000_000_000u32 / 60));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DT: f32 = 1.0 / 60.0;

    fn test_game() -> RunnerGame {
        RunnerGame::new(
            640,
            360,
            342.0,
            64,
            90,
            PixelMask::filled(64, 90),
            ObstacleTemplate {
                width: 40,
                height: 160,
                mask: PixelMask::filled(40, 160).top_band(0.25),
            },
            ObstacleTemplate {
                width: 48,
                height: 68,
                mask: PixelMask::filled(48, 68),
            },
        )
    }

    #[test]
    fn test_obstacles_spawn_on_interval_and_scroll_left() {
        let mut game = test_game();
        let mut rng = StdRng::seed_from_u64(7);

        // Just under the first deadline: nothing yet
        for _ in 0..83 {
            game.update(DT, &mut rng);
        }
        assert!(game.obstacles.is_empty());

        for _ in 0..4 {
            game.update(DT, &mut rng);
        }
        assert_eq!(game.obstacles.len(), 1);

        let x_before = game.obstacles[0].entity.x;
        game.update(DT, &mut rng);
        assert!(game.obstacles[0].entity.x < x_before);
    }

    #[test]
    fn test_offscreen_obstacles_despawn() {
        let mut game = test_game();
        let mut rng = StdRng::seed_from_u64(7);

        game.obstacles.push(Obstacle {
            kind: ObstacleKind::Tumbler,
            entity: Entity::new(EntityKind::Obstacle, -30.0, 274.0, 48, 68),
        });
        game.update(DT, &mut rng);
        assert!(game.obstacles.is_empty());
    }

    #[test]
    fn test_tumbler_contact_ends_the_run() {
        let mut game = test_game();
        let mut rng = StdRng::seed_from_u64(7);

        // Drop a tumbler right on the player
        let mut entity = Entity::new(EntityKind::Obstacle, game.player.x, 0.0, 48, 68);
        entity.y = game.player.y + 20.0;
        game.obstacles.push(Obstacle {
            kind: ObstacleKind::Tumbler,
            entity,
        });

        game.update(DT, &mut rng);
        assert_eq!(game.phase, RunnerPhase::GameOver);
    }

    #[test]
    fn test_running_under_a_gate_is_a_near_miss() {
        let mut game = test_game();
        let mut rng = StdRng::seed_from_u64(7);

        // Gate straddling the player: its bottom 75% is an open arch, and
        // the grounded player (height 90) stays below the 40px crossbar.
        let mut entity = Entity::new(EntityKind::Obstacle, game.player.x, 0.0, 40, 160);
        entity.y = 342.0 + 5.0 - 160.0;
        game.obstacles.push(Obstacle {
            kind: ObstacleKind::Gate,
            entity,
        });

        game.update(DT, &mut rng);
        assert_eq!(game.phase, RunnerPhase::Playing);
    }

    #[test]
    fn test_score_reaches_target_and_wins() {
        let mut game = test_game();
        let mut rng = StdRng::seed_from_u64(7);

        game.score = TARGET_SCORE - 1;
        game.update(DT, &mut rng);
        assert_eq!(game.phase, RunnerPhase::Won);

        // Frozen after the win
        let score = game.score;
        game.update(DT, &mut rng);
        assert_eq!(game.score, score);
    }

    #[test]
    fn test_reset_reinitializes_mutable_state() {
        let mut game = test_game();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            game.update(DT, &mut rng);
        }
        game.phase = RunnerPhase::GameOver;
        game.reset();

        assert_eq!(game.phase, RunnerPhase::Playing);
        assert_eq!(game.score, 0);
        assert!(game.obstacles.is_empty());
        assert!(!game.player.airborne);
    }
}
