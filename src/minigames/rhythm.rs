//! Rhythm tapping game.
//!
//! Notes spawn from a fixed beat map and fall at constant speed toward a
//! hit bar. A tap is judged by its distance from the note's ideal arrival
//! time: a tight window scores high, a loose window scores low, anything
//! else breaks the combo, as does a note sailing past unaddressed. The
//! session ends at a fixed elapsed time no matter how many notes are left;
//! whatever was not presented is dropped without penalty.

use crate::assets;
use crate::audio::AudioPlayer;
use crate::context::{self, Character, GameContext};
use crate::gui::OutcomeBanner;
use crate::minigames::MiniGameExit;
use crate::text::{draw_text, draw_text_centered};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::{Canvas, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;
use std::time::Duration;

/// Millisecond timestamps at which each note should be hit. Fixed at
/// compile time; must be strictly increasing.
pub const BEAT_MAP: &[u32] = &[
    2000, 2600, 3200, 3800, 4400, 5000, 5600, 6200, 7000, 7400, 7800, 8600, 9200, 9800, 10400,
    11000, 11600, 12200, 13000, 13400, 13800, 14600, 15200, 15800, 16400, 17000, 17600, 18200,
    19000, 19400, 19800, 20600, 21200, 21800, 22400, 23000, 23600, 24200, 25000, 26000,
];

/// The session ends here, resolved or not.
pub const SESSION_MS: f32 = 28_000.0;
pub const WIN_SCORE: u32 = 6_000;

/// Tight and loose judgement windows, in ms either side of the beat.
pub const PERFECT_MS: f32 = 45.0;
pub const GOOD_MS: f32 = 120.0;

pub const PERFECT_SCORE: u32 = 300;
pub const GOOD_SCORE: u32 = 100;

/// How long a note is visible before its beat.
const TRAVEL_MS: f32 = 1500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapJudgement {
    Perfect,
    Good,
    /// Outside both windows (or no note at all): combo gone.
    Break,
}

#[derive(Debug, Clone, Copy)]
pub struct ActiveNote {
    pub target_ms: u32,
}

pub struct RhythmGame {
    pub song_ms: f32,
    next_spawn: usize,
    pub notes: Vec<ActiveNote>,
    pub score: u32,
    pub combo: u32,
    pub best_combo: u32,
    pub perfects: u32,
    pub goods: u32,
    pub misses: u32,
    pub finished: bool,
}

impl RhythmGame {
    pub fn new() -> Self {
        debug_assert!(BEAT_MAP.windows(2).all(|w| w[0] < w[1]), "beat map out of order");
        RhythmGame {
            song_ms: 0.0,
            next_spawn: 0,
            notes: Vec::new(),
            score: 0,
            combo: 0,
            best_combo: 0,
            perfects: 0,
            goods: 0,
            misses: 0,
            finished: false,
        }
    }

    pub fn reset(&mut self) {
        *self = RhythmGame::new();
    }

    pub fn update(&mut self, dt: f32) {
        if self.finished {
            return;
        }
        self.song_ms += dt * 1000.0;

        if self.song_ms >= SESSION_MS {
            // Fixed-length session; whatever is still on screen is dropped
            self.finished = true;
            return;
        }

        while self.next_spawn < BEAT_MAP.len()
            && BEAT_MAP[self.next_spawn] as f32 <= self.song_ms + TRAVEL_MS
        {
            self.notes.push(ActiveNote {
                target_ms: BEAT_MAP[self.next_spawn],
            });
            self.next_spawn += 1;
        }

        // Notes past the loose window are misses and break the combo
        let before = self.notes.len();
        let song_ms = self.song_ms;
        self.notes
            .retain(|note| note.target_ms as f32 + GOOD_MS >= song_ms);
        let missed = before - self.notes.len();
        if missed > 0 {
            self.misses += missed as u32;
            self.combo = 0;
        }
    }

    /// Judges a tap against the nearest live note.
    pub fn tap(&mut self) -> TapJudgement {
        if self.finished {
            return TapJudgement::Break;
        }

        let nearest = self
            .notes
            .iter()
            .enumerate()
            .min_by_key(|(_, note)| (self.song_ms - note.target_ms as f32).abs() as u32);

        let (index, delta) = match nearest {
            Some((index, note)) => (index, (self.song_ms - note.target_ms as f32).abs()),
            None => {
                self.combo = 0;
                return TapJudgement::Break;
            }
        };

        if delta <= PERFECT_MS {
            self.notes.remove(index);
            self.score += PERFECT_SCORE;
            self.perfects += 1;
            self.bump_combo();
            TapJudgement::Perfect
        } else if delta <= GOOD_MS {
            self.notes.remove(index);
            self.score += GOOD_SCORE;
            self.goods += 1;
            self.bump_combo();
            TapJudgement::Good
        } else {
            self.combo = 0;
            TapJudgement::Break
        }
    }

    fn bump_combo(&mut self) {
        self.combo += 1;
        self.best_combo = self.best_combo.max(self.combo);
    }

    pub fn won(&self) -> bool {
        self.score >= WIN_SCORE
    }

    /// 0.0 when a note spawns, 1.0 exactly on the beat; can exceed 1.0
    /// while the note is overdue but still live.
    pub fn note_progress(&self, note: &ActiveNote) -> f32 {
        1.0 - (note.target_ms as f32 - self.song_ms) / TRAVEL_MS
    }
}

impl Default for RhythmGame {
    fn default() -> Self {
        Self::new()
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
        &assets::background_path("festival"),
        ctx.width,
        ctx.height,
        Color::RGB(30, 24, 48),
    );
    let portrait = assets::load_sprite(
        texture_creator,
        &assets::face_path(character.id),
        (ctx.height as f32 * 0.18) as u32,
        Color::RGB(0, 0, 255),
    );

    let mut game = RhythmGame::new();
    let banner = OutcomeBanner::new();
    let mut last_judgement: Option<(TapJudgement, f32)> = None;
    audio.play_music("rhythm");

    let lane_x = ctx.width as i32 / 2 - 20;
    let hit_y = ctx.height as i32 - 70;

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
                    if game.finished {
                        game.reset();
                        last_judgement = None;
                        audio.play_music("rhythm");
                    } else {
                        let judgement = game.tap();
                        if judgement != TapJudgement::Break {
                            audio.play_sound("tap");
                        }
                        last_judgement = Some((judgement, game.song_ms));
                    }
                }
                _ => {}
            }
        }

        game.update(1.0 / 60.0);
        if game.finished {
            audio.stop_music();
        }

        background.render(canvas, 0, 0)?;
        portrait.render(canvas, 16, ctx.height as i32 - portrait.height as i32 - 16)?;

        // Lane and hit bar
        canvas.set_draw_color(Color::RGB(25, 25, 35));
        canvas.fill_rect(Rect::new(lane_x, 0, 40, ctx.height))?;
        canvas.set_draw_color(context::PAPER);
        canvas.fill_rect(Rect::new(lane_x - 8, hit_y, 56, 4))?;

        for note in &game.notes {
            let progress = game.note_progress(note);
            let y = (progress * hit_y as f32) as i32;
            canvas.set_draw_color(context::GOLD);
            canvas.fill_rect(Rect::new(lane_x + 4, y - 6, 32, 12))?;
        }

        let hud = format!("SCORE {}  COMBO {}", game.score, game.combo);
        draw_text(canvas, &hud, 16, 16, context::PAPER, 2)?;

        // Judgement flash fades after half a second
        if let Some((judgement, at_ms)) = last_judgement {
            if game.song_ms - at_ms < 500.0 {
                let (label, color) = match judgement {
                    TapJudgement::Perfect => ("PERFECT!", context::GOLD),
                    TapJudgement::Good => ("GOOD", context::PAPER),
                    TapJudgement::Break => ("MISS", Color::RGB(255, 80, 80)),
                };
                draw_text_centered(canvas, label, ctx.width as i32 / 2, hit_y - 50, color, 3)?;
            }
        }

        if game.finished {
            if game.won() {
                banner.render(
                    canvas,
                    "GREAT PERFORMANCE!",
                    context::GOLD,
                    "SPACE FOR AN ENCORE",
                    "ESC FOR THE HUB",
                )?;
            } else {
                banner.render(
                    canvas,
                    "OFF THE BEAT...",
                    Color::RGB(255, 80, 80),
                    "SPACE TO TRY AGAIN",
                    "ESC FOR THE HUB",
                )?;
            }
            let summary = format!(
                "PERFECT {}  GOOD {}  MISS {}  BEST COMBO {}",
                game.perfects, game.goods, game.misses, game.best_combo
            );
            draw_text_centered(
                canvas,
                &summary,
                ctx.width as i32 / 2,
                ctx.height as i32 / 2 + 100,
                context::PAPER,
                1,
            )?;
        }

        canvas.present();
        std::thread::sleep(Duration::new(0, 1_000_000_000u32 / 60));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    /// Advances the clock until `song_ms` first reaches `target`.
    fn advance_to(game: &mut RhythmGame, target: f32) {
        while game.song_ms < target && !game.finished {
            game.update(DT);
        }
    }

    #[test]
    fn test_tap_on_the_beat_scores_the_higher_tier() {
        let mut game = RhythmGame::new();
        advance_to(&mut game, BEAT_MAP[0] as f32);

        assert_eq!(game.tap(), TapJudgement::Perfect);
        assert_eq!(game.score, PERFECT_SCORE);
        assert_eq!(game.combo, 1);
        assert_eq!(game.perfects, 1);
    }

    #[test]
    fn test_tap_in_loose_window_scores_the_lower_tier() {
        let mut game = RhythmGame::new();
        advance_to(&mut game, BEAT_MAP[0] as f32 + 80.0);

        assert_eq!(game.tap(), TapJudgement::Good);
        assert_eq!(game.score, GOOD_SCORE);
        assert_eq!(game.combo, 1);
    }

    #[test]
    fn test_tap_far_from_any_note_breaks_combo() {
        let mut game = RhythmGame::new();

        advance_to(&mut game, BEAT_MAP[0] as f32);
        assert_eq!(game.tap(), TapJudgement::Perfect);
        assert_eq!(game.combo, 1);

        // Halfway between two beats, well outside the loose window
        advance_to(&mut game, (BEAT_MAP[0] + BEAT_MAP[1]) as f32 / 2.0);
        assert_eq!(game.tap(), TapJudgement::Break);
        assert_eq!(game.combo, 0);
        assert_eq!(game.score, PERFECT_SCORE);
    }

    #[test]
    fn test_unaddressed_note_is_a_miss_and_breaks_combo() {
        let mut game = RhythmGame::new();

        advance_to(&mut game, BEAT_MAP[0] as f32);
        game.tap();
        assert_eq!(game.combo, 1);

        // Sleep through the second note entirely
        advance_to(&mut game, BEAT_MAP[1] as f32 + GOOD_MS + 50.0);
        assert_eq!(game.misses, 1);
        assert_eq!(game.combo, 0);
    }

    #[test]
    fn test_notes_spawn_ahead_of_their_beat() {
        let mut game = RhythmGame::new();

        advance_to(&mut game, BEAT_MAP[0] as f32 - 1000.0);
        assert_eq!(game.notes.len(), 1);
        assert!(game.note_progress(&game.notes[0]) < 1.0);
    }

    #[test]
    fn test_session_ends_at_fixed_time_and_drops_leftovers() {
        let mut game = RhythmGame::new();

        // Never tap at all
        for _ in 0..(SESSION_MS / 1000.0 / DT) as u32 + 120 {
            game.update(DT);
        }
        assert!(game.finished);

        let score = game.score;
        let misses = game.misses;
        // Dead clock after the end: nothing moves, nothing is penalized
        game.update(DT);
        game.update(DT);
        assert_eq!(game.score, score);
        assert_eq!(game.misses, misses);
        assert_eq!(game.tap(), TapJudgement::Break);
    }

    #[test]
    fn test_win_is_a_score_threshold() {
        let mut game = RhythmGame::new();
        assert!(!game.won());
        game.score = WIN_SCORE;
        assert!(game.won());
    }

    #[test]
    fn test_combo_accumulates_and_best_is_kept() {
        let mut game = RhythmGame::new();

        for i in 0..3 {
            advance_to(&mut game, BEAT_MAP[i] as f32);
            assert_eq!(game.tap(), TapJudgement::Perfect);
        }
        assert_eq!(game.combo, 3);
        assert_eq!(game.best_combo, 3);

        advance_to(&mut game, BEAT_MAP[3] as f32 + GOOD_MS + 60.0);
        assert_eq!(game.combo, 0);
        assert_eq!(game.best_combo, 3);
    }
}
