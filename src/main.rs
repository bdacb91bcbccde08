use log::info;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::{Canvas, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;
use std::time::Duration;

mod assets;
mod audio;
mod camera;
mod collision;
mod context;
mod entity;
mod gui;
mod level;
mod minigames;
mod sprite;
mod text;

use audio::AudioPlayer;
use context::{Character, GameContext, ROSTER};
use gui::Button;
use minigames::MiniGameExit;
use text::draw_title;

// Game resolution constants
const GAME_WIDTH: u32 = 640;
const GAME_HEIGHT: u32 = 360;

/// The five activities reachable from the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MiniGameId {
    Runner,
    Tapping,
    WordSearch,
    Platformer,
    Rhythm,
}

impl MiniGameId {
    fn all() -> [MiniGameId; 5] {
        [
            MiniGameId::Runner,
            MiniGameId::Tapping,
            MiniGameId::WordSearch,
            MiniGameId::Platformer,
            MiniGameId::Rhythm,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            MiniGameId::Runner => "ROOFTOP RUN",
            MiniGameId::Tapping => "TAIKO TAP",
            MiniGameId::WordSearch => "WORD HUNT",
            MiniGameId::Platformer => "TEMPLE CLIMB",
            MiniGameId::Rhythm => "FESTIVAL BEAT",
        }
    }
}

/// What the hub screen resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HubChoice {
    Play(MiniGameId),
    BackToSelect,
    Quit,
}

/// Calculate the best window scale based on monitor size
fn calculate_window_scale(video_subsystem: &sdl2::VideoSubsystem) -> u32 {
    match video_subsystem.desktop_display_mode(0) {
        Ok(display_mode) => {
            // Leave 10% margin for taskbars/decorations
            let usable_w = (display_mode.w as f32 * 0.9) as i32;
            let usable_h = (display_mode.h as f32 * 0.9) as i32;

            let max_scale_w = usable_w / GAME_WIDTH as i32;
            let max_scale_h = usable_h / GAME_HEIGHT as i32;

            // Use smaller scale to ensure both dimensions fit
            let scale = max_scale_w.min(max_scale_h);

            scale.clamp(1, 6) as u32
        }
        Err(_) => {
            info!("could not detect monitor size, using 2x scale");
            2
        }
    }
}

/// Darkens the whole screen so the paper menu stands out.
fn draw_menu_overlay(canvas: &mut Canvas<Window>) -> Result<(), String> {
    canvas.set_blend_mode(sdl2::render::BlendMode::Blend);
    canvas.set_draw_color(Color::RGBA(0, 0, 0, 100));
    canvas.fill_rect(None)?;
    canvas.set_blend_mode(sdl2::render::BlendMode::None);
    Ok(())
}

/// Character-select screen. Returns the chosen character, or `None` to
/// quit the program (window close, Escape, or the quit button).
fn character_select(
    canvas: &mut Canvas<Window>,
    event_pump: &mut EventPump,
    texture_creator: &TextureCreator<WindowContext>,
    audio: &mut AudioPlayer,
    ctx: &GameContext,
) -> Result<Option<Character>, String> {
    let background = assets::load_sprite_sized(
        texture_creator,
        &assets::background_path("fuji"),
        ctx.width,
        ctx.height,
        context::SKY,
    );
    let portraits: Vec<_> = ROSTER
        .iter()
        .map(|character| {
            assets::load_sprite(
                texture_creator,
                &assets::face_path(character.id),
                (ctx.height as f32 * 0.35) as u32,
                Color::RGB(0, 0, 255),
            )
        })
        .collect();

    let button_w = 190;
    let button_h = 230;
    let button_y = 70;
    let character_buttons: Vec<Button> = ROSTER
        .iter()
        .enumerate()
        .map(|(i, character)| {
            let x = ctx.width as i32 / 2 - 210 + i as i32 * 230;
            Button::new(Rect::new(x, button_y, button_w, button_h), character.label)
        })
        .collect();

    let mut quit_rect = Rect::new(0, 0, 130, 34);
    quit_rect.center_on((ctx.width as i32 / 2, ctx.height as i32 - 26));
    let quit_button = Button::new(quit_rect, "QUIT");

    let mut pointer = (0, 0);
    audio.play_music("menu");

    loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => return Ok(None),
                Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return Ok(None),
                Event::MouseMotion { x, y, .. } => pointer = (x, y),
                Event::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    x,
                    y,
                    ..
                } => {
                    for (i, button) in character_buttons.iter().enumerate() {
                        if button.contains(x, y) {
                            return Ok(Some(ROSTER[i]));
                        }
                    }
                    if quit_button.contains(x, y) {
                        return Ok(None);
                    }
                }
                _ => {}
            }
        }

        background.render(canvas, 0, 0)?;
        draw_menu_overlay(canvas)?;
        draw_title(
            canvas,
            "MISSION JAPAN",
            ctx.width as i32 / 2,
            18,
            context::PAPER,
            4,
        )?;

        for (button, portrait) in character_buttons.iter().zip(&portraits) {
            button.render(canvas, button.contains(pointer.0, pointer.1), Some(portrait))?;
        }
        quit_button.render(canvas, quit_button.contains(pointer.0, pointer.1), None)?;

        canvas.present();
        std::thread::sleep(Duration::new(0, 1_000_000_000u32 / 60));
    }
}

/// Hub screen: routes to one of the five mini-games.
fn hub(
    canvas: &mut Canvas<Window>,
    event_pump: &mut EventPump,
    texture_creator: &TextureCreator<WindowContext>,
    audio: &mut AudioPlayer,
    ctx: &GameContext,
    character: &Character,
) -> Result<HubChoice, String> {
    let background = assets::load_sprite_sized(
        texture_creator,
        &assets::background_path("fuji"),
        ctx.width,
        ctx.height,
        context::SKY,
    );
    let portrait = assets::load_sprite(
        texture_creator,
        &assets::face_path(character.id),
        (ctx.height as f32 * 0.18) as u32,
        Color::RGB(0, 0, 255),
    );

    // Five game buttons in a 2 x 3 grid, back button in the last slot
    let games = MiniGameId::all();
    let button_w = 250u32;
    let button_h = 62u32;
    let grid_x = ctx.width as i32 / 2 - button_w as i32 - 10;
    let grid_y = 74;

    let game_buttons: Vec<(MiniGameId, Button)> = games
        .iter()
        .enumerate()
        .map(|(i, &id)| {
            let col = (i % 2) as i32;
            let row = (i / 2) as i32;
            let rect = Rect::new(
                grid_x + col * (button_w as i32 + 20),
                grid_y + row * (button_h as i32 + 18),
                button_w,
                button_h,
            );
            (id, Button::new(rect, id.label()))
        })
        .collect();

    let back_button = Button::new(
        Rect::new(
            grid_x + button_w as i32 + 20,
            grid_y + 2 * (button_h as i32 + 18),
            button_w,
            button_h,
        ),
        "CHANGE CHARACTER",
    );

    let mut pointer = (0, 0);
    audio.play_music("menu");

    loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => return Ok(HubChoice::Quit),
                Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return Ok(HubChoice::BackToSelect),
                Event::MouseMotion { x, y, .. } => pointer = (x, y),
                Event::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    x,
                    y,
                    ..
                } => {
                    for (id, button) in &game_buttons {
                        if button.contains(x, y) {
                            return Ok(HubChoice::Play(*id));
                        }
                    }
                    if back_button.contains(x, y) {
                        return Ok(HubChoice::BackToSelect);
                    }
                }
                _ => {}
            }
        }

        background.render(canvas, 0, 0)?;
        draw_menu_overlay(canvas)?;
        draw_title(
            canvas,
            "CHOOSE A CHALLENGE",
            ctx.width as i32 / 2,
            20,
            context::PAPER,
            3,
        )?;
        portrait.render(canvas, 16, ctx.height as i32 - portrait.height as i32 - 16)?;

        for (_, button) in &game_buttons {
            button.render(canvas, button.contains(pointer.0, pointer.1), None)?;
        }
        back_button.render(canvas, back_button.contains(pointer.0, pointer.1), None)?;

        canvas.present();
        std::thread::sleep(Duration::new(0, 1_000_000_000u32 / 60));
    }
}

fn run_minigame(
    id: MiniGameId,
    canvas: &mut Canvas<Window>,
    event_pump: &mut EventPump,
    texture_creator: &TextureCreator<WindowContext>,
    audio: &mut AudioPlayer,
    ctx: &GameContext,
    character: &Character,
) -> Result<MiniGameExit, String> {
    info!("starting {} as {}", id.label(), character.id);
    match id {
        MiniGameId::Runner => {
            minigames::runner::run(canvas, event_pump, texture_creator, audio, ctx, character)
        }
        MiniGameId::Tapping => {
            minigames::tapping::run(canvas, event_pump, texture_creator, audio, ctx, character)
        }
        MiniGameId::WordSearch => {
            minigames::wordsearch::run(canvas, event_pump, texture_creator, audio, ctx, character)
        }
        MiniGameId::Platformer => {
            minigames::platformer::run(canvas, event_pump, texture_creator, audio, ctx, character)
        }
        MiniGameId::Rhythm => {
            minigames::rhythm::run(canvas, event_pump, texture_creator, audio, ctx, character)
        }
    }
}

fn main() -> Result<(), String> {
    env_logger::init();

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;
    let _image_context = sdl2::image::init(sdl2::image::InitFlag::PNG)?;

    let window_scale = calculate_window_scale(&video_subsystem);
    info!(
        "window scale {}x ({}x{})",
        window_scale,
        GAME_WIDTH * window_scale,
        GAME_HEIGHT * window_scale
    );

    let window = video_subsystem
        .window(
            "Mission Japan: Get the Book",
            GAME_WIDTH * window_scale,
            GAME_HEIGHT * window_scale,
        )
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
    canvas
        .set_logical_size(GAME_WIDTH, GAME_HEIGHT)
        .map_err(|e| e.to_string())?;

    let texture_creator = canvas.texture_creator();
    let mut event_pump = sdl_context.event_pump()?;
    let mut audio = AudioPlayer::init(&sdl_context);

    let ctx = GameContext::new(GAME_WIDTH, GAME_HEIGHT);

    // Menu -> hub -> mini-game -> hub -> ... until a quit
    'app: loop {
        let character = match character_select(
            &mut canvas,
            &mut event_pump,
            &texture_creator,
            &mut audio,
            &ctx,
        )? {
            Some(character) => character,
            None => break 'app,
        };

        loop {
            match hub(
                &mut canvas,
                &mut event_pump,
                &texture_creator,
                &mut audio,
                &ctx,
                &character,
            )? {
                HubChoice::Quit => break 'app,
                HubChoice::BackToSelect => break,
                HubChoice::Play(id) => {
                    let exit = run_minigame(
                        id,
                        &mut canvas,
                        &mut event_pump,
                        &texture_creator,
                        &mut audio,
                        &ctx,
                        &character,
                    )?;
                    if exit == MiniGameExit::Quit {
                        break 'app;
                    }
                }
            }
        }
    }

    audio.stop_music();
    info!("goodbye");
    Ok(())
}
