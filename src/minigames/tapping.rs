//! Timed-reaction tapping game.
//!
//! A prompt lights up after a randomized wait; the player must tap Space
//! inside the reaction window. Enough hits wins. A late prompt counts as a
//! miss and the cycle restarts; tapping while nothing is lit is ignored.

use crate::assets;
use crate::audio::AudioPlayer;
use crate::context::{self, Character, GameContext};
use crate::gui::OutcomeBanner;
use crate::minigames::MiniGameExit;
use crate::text::{draw_text, draw_text_centered};
use rand::Rng;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::{Canvas, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;
use std::time::Duration;

pub const HITS_NEEDED: u32 = 8;

const WAIT_MIN: f32 = 0.8;
const WAIT_MAX: f32 = 2.5;
/// How long the prompt stays tappable.
const REACTION_WINDOW: f32 = 0.8;
const HIT_ANIM_TIME: f32 = 0.45;
const MISS_PAUSE: f32 = 0.7;

/// All deadlines are absolute values on the game's own clock, checked
/// once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapPhase {
    Waiting { until: f32 },
    Prompt { until: f32 },
    HitAnim { until: f32 },
    Miss { until: f32 },
    Win,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    Hit,
    Ignored,
}

pub struct TappingGame {
    clock: f32,
    pub phase: TapPhase,
    pub hits: u32,
    pub misses: u32,
    pub hits_needed: u32,
}

impl TappingGame {
    pub fn new(hits_needed: u32, rng: &mut impl Rng) -> Self {
        TappingGame {
            clock: 0.0,
            phase: TapPhase::Waiting {
                until: rng.gen_range(WAIT_MIN..WAIT_MAX),
            },
            hits: 0,
            misses: 0,
            hits_needed,
        }
    }

    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.clock = 0.0;
        self.hits = 0;
        self.misses = 0;
        self.phase = TapPhase::Waiting {
            until: rng.gen_range(WAIT_MIN..WAIT_MAX),
        };
    }

    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        if self.phase == TapPhase::Win {
            return;
        }
        self.clock += dt;

        match self.phase {
            TapPhase::Waiting { until } if self.clock >= until => {
                self.phase = TapPhase::Prompt {
                    until: self.clock + REACTION_WINDOW,
                };
            }
            TapPhase::Prompt { until } if self.clock >= until => {
                self.misses += 1;
                self.phase = TapPhase::Miss {
                    until: self.clock + MISS_PAUSE,
                };
            }
            TapPhase::HitAnim { until } | TapPhase::Miss { until } if self.clock >= until => {
                self.phase = TapPhase::Waiting {
                    until: self.clock + rng.gen_range(WAIT_MIN..WAIT_MAX),
                };
            }
            _ => {}
        }
    }

    /// A tap only counts while the prompt is lit.
    pub fn tap(&mut self) -> TapOutcome {
        match self.phase {
            TapPhase::Prompt { .. } => {
                self.hits += 1;
                self.phase = if self.hits >= self.hits_needed {
                    TapPhase::Win
                } else {
                    TapPhase::HitAnim {
                        until: self.clock + HIT_ANIM_TIME,
                    }
                };
                TapOutcome::Hit
            }
            _ => TapOutcome::Ignored,
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
        &assets::background_path("dojo"),
        ctx.width,
        ctx.height,
        Color::RGB(60, 40, 60),
    );
    let portrait = assets::load_sprite(
        texture_creator,
        &assets::face_path(character.id),
        (ctx.height as f32 * 0.18) as u32,
        Color::RGB(0, 0, 255),
    );

    let mut rng = rand::thread_rng();
    let mut game = TappingGame::new(HITS_NEEDED, &mut rng);
    let banner = OutcomeBanner::new();
    audio.play_music("tapping");

    let drum = Rect::new(
        ctx.width as i32 / 2 - 70,
        ctx.height as i32 / 2 - 70,
        140,
        140,
    );

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
                } => {
                    if game.phase == TapPhase::Win {
                        game.reset(&mut rng);
                    } else if game.tap() == TapOutcome::Hit {
                        audio.play_sound("tap");
                    }
                }
                _ => {}
            }
        }

        game.update(1.0 / 60.0, &mut rng);

        background.render(canvas, 0, 0)?;
        portrait.render(canvas, 16, ctx.height as i32 - portrait.height as i32 - 16)?;

        // The drum: dim while waiting, lit while tappable
        let (drum_color, caption) = match game.phase {
            TapPhase::Waiting { .. } => (Color::RGB(90, 60, 50), "WAIT FOR IT..."),
            TapPhase::Prompt { .. } => (context::GOLD, "TAP NOW!"),
            TapPhase::HitAnim { .. } => (Color::RGB(240, 240, 240), "GOOD!"),
            TapPhase::Miss { .. } => (Color::RGB(180, 40, 40), "TOO SLOW!"),
            TapPhase::Win => (context::GOLD, ""),
        };
        canvas.set_draw_color(drum_color);
        canvas.fill_rect(drum)?;
        canvas.set_draw_color(context::INK);
        canvas.draw_rect(drum)?;
        draw_text_centered(
            canvas,
            caption,
            ctx.width as i32 / 2,
            drum.y() - 30,
            context::PAPER,
            2,
        )?;

        let progress = format!("HITS {} / {}   MISSES {}", game.hits, game.hits_needed, game.misses);
        draw_text(canvas, &progress, 16, 16, context::PAPER, 2)?;

        if game.phase == TapPhase::Win {
            banner.render(
                canvas,
                "PERFECT RHYTHM!",
                context::GOLD,
                "SPACE TO PLAY AGAIN",
                "ESC FOR THE HUB",
            )?;
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

    fn advance_to_prompt(game: &mut TappingGame, rng: &mut StdRng) {
        for _ in 0..(5.0 / DT) as u32 {
            game.update(DT, rng);
            if matches!(game.phase, TapPhase::Prompt { .. }) {
                return;
            }
        }
        panic!("prompt never fired");
    }

    #[test]
    fn test_waiting_transitions_to_prompt_on_deadline() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = TappingGame::new(HITS_NEEDED, &mut rng);

        assert!(matches!(game.phase, TapPhase::Waiting { .. }));
        advance_to_prompt(&mut game, &mut rng);
    }

    #[test]
    fn test_tap_during_waiting_is_ignored() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = TappingGame::new(HITS_NEEDED, &mut rng);

        assert_eq!(game.tap(), TapOutcome::Ignored);
        assert_eq!(game.hits, 0);
        assert!(matches!(game.phase, TapPhase::Waiting { .. }));
    }

    #[test]
    fn test_prompt_timeout_is_a_miss_and_recycles() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = TappingGame::new(HITS_NEEDED, &mut rng);

        advance_to_prompt(&mut game, &mut rng);
        // Let the whole window lapse
        for _ in 0..(REACTION_WINDOW / DT) as u32 + 2 {
            game.update(DT, &mut rng);
        }
        assert_eq!(game.misses, 1);
        assert!(matches!(game.phase, TapPhase::Miss { .. }));

        // Miss pause lapses back into a fresh wait
        for _ in 0..(MISS_PAUSE / DT) as u32 + 2 {
            game.update(DT, &mut rng);
        }
        assert!(matches!(game.phase, TapPhase::Waiting { .. }));
    }

    #[test]
    fn test_hit_anim_returns_to_waiting() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = TappingGame::new(HITS_NEEDED, &mut rng);

        advance_to_prompt(&mut game, &mut rng);
        assert_eq!(game.tap(), TapOutcome::Hit);
        assert!(matches!(game.phase, TapPhase::HitAnim { .. }));

        for _ in 0..(HIT_ANIM_TIME / DT) as u32 + 2 {
            game.update(DT, &mut rng);
        }
        assert!(matches!(game.phase, TapPhase::Waiting { .. }));
    }

    #[test]
    fn test_eight_well_timed_taps_win() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = TappingGame::new(8, &mut rng);

        for _ in 0..8 {
            advance_to_prompt(&mut game, &mut rng);
            assert_eq!(game.tap(), TapOutcome::Hit);
            // Sit out the hit animation before the next round
            for _ in 0..(HIT_ANIM_TIME / DT) as u32 + 2 {
                game.update(DT, &mut rng);
            }
        }

        assert_eq!(game.hits, 8);
        assert_eq!(game.phase, TapPhase::Win);
        assert_eq!(game.misses, 0);
    }

    #[test]
    fn test_reset_reinitializes_counters() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = TappingGame::new(HITS_NEEDED, &mut rng);

        advance_to_prompt(&mut game, &mut rng);
        game.tap();
        game.reset(&mut rng);

        assert_eq!(game.hits, 0);
        assert_eq!(game.misses, 0);
        assert!(matches!(game.phase, TapPhase::Waiting { .. }));
    }
}
