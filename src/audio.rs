//! Audio as a black-box collaborator.
//!
//! Mini-games ask for named tracks and effects; whether anything is audible
//! depends on the mixer coming up and the files existing. Every failure
//! path degrades to silence, so callers never handle audio errors.

use log::{info, warn};
use sdl2::mixer::{self, Chunk, InitFlag, Music, Sdl2MixerContext};
use std::collections::HashMap;

pub struct AudioPlayer {
    // Both handles keep SDL audio alive for the life of the player
    _audio_subsystem: Option<sdl2::AudioSubsystem>,
    _mixer_context: Option<Sdl2MixerContext>,
    enabled: bool,
    // Music must outlive playback; Chunks must stay alive while a channel
    // plays them, so both are held here.
    current_music: Option<Music<'static>>,
    current_track: Option<String>,
    sounds: HashMap<String, Chunk>,
}

impl AudioPlayer {
    /// Brings up SDL_mixer. Never fails; a machine without audio gets a
    /// silent player.
    pub fn init(sdl: &sdl2::Sdl) -> Self {
        let mut silent = AudioPlayer {
            _audio_subsystem: None,
            _mixer_context: None,
            enabled: false,
            current_music: None,
            current_track: None,
            sounds: HashMap::new(),
        };

        let audio_subsystem = match sdl.audio() {
            Ok(subsystem) => subsystem,
            Err(e) => {
                warn!("audio subsystem unavailable, continuing silent: {}", e);
                return silent;
            }
        };
        let context = match mixer::init(InitFlag::OGG) {
            Ok(context) => context,
            Err(e) => {
                warn!("mixer init failed, continuing silent: {}", e);
                return silent;
            }
        };
        if let Err(e) = mixer::open_audio(
            mixer::DEFAULT_FREQUENCY,
            mixer::DEFAULT_FORMAT,
            mixer::DEFAULT_CHANNELS,
            1_024,
        ) {
            warn!("could not open audio device, continuing silent: {}", e);
            return silent;
        }
        mixer::allocate_channels(8);

        info!("audio initialized");
        silent._audio_subsystem = Some(audio_subsystem);
        silent._mixer_context = Some(context);
        silent.enabled = true;
        silent
    }

    /// Starts looping `assets/audio/<name>.ogg`, replacing whatever was
    /// playing. Re-requesting the current track is a no-op; a missing
    /// track means silence.
    pub fn play_music(&mut self, name: &str) {
        if !self.enabled || self.current_track.as_deref() == Some(name) {
            return;
        }
        let path = format!("assets/audio/{}.ogg", name);
        match Music::from_file(&path) {
            Ok(music) => {
                if let Err(e) = music.play(-1) {
                    warn!("could not play {}: {}", path, e);
                }
                self.current_music = Some(music);
                self.current_track = Some(name.to_string());
            }
            Err(e) => {
                warn!("no music for {}: {}", path, e);
                self.stop_music();
            }
        }
    }

    pub fn stop_music(&mut self) {
        if self.enabled {
            Music::halt();
        }
        self.current_music = None;
        self.current_track = None;
    }

    /// Fire-and-forget one-shot from `assets/audio/<name>.ogg`.
    pub fn play_sound(&mut self, name: &str) {
        if !self.enabled {
            return;
        }
        if !self.sounds.contains_key(name) {
            let path = format!("assets/audio/{}.ogg", name);
            match Chunk::from_file(&path) {
                Ok(chunk) => {
                    self.sounds.insert(name.to_string(), chunk);
                }
                Err(e) => {
                    warn!("no sound for {}: {}", path, e);
                    return;
                }
            }
        }
        if let Some(chunk) = self.sounds.get(name) {
            if let Err(e) = mixer::Channel::all().play(chunk, 0) {
                warn!("could not play sound {}: {}", name, e);
            }
        }
    }
}
