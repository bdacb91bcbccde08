use sdl2::rect::Rect;

/// Downward acceleration in pixels per second squared, shared by the runner
/// and the platformer.
pub const GRAVITY: f32 = 2300.0;

/// What an entity is, for the code paths that treat kinds differently
/// (obstacle masks, enemy contact, collectible pickup).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Runner,
    Obstacle,
    Platformer,
    Enemy,
    Collectible,
    Goal,
}

/// A moving or placed thing in a mini-game: position, extent, velocity.
///
/// One shared struct covers the runner's player and obstacles, the
/// platformer's player, enemies, collectibles and goal. Positions are kept
/// as `f32` so sub-pixel velocities accumulate; `rect()` rounds down to the
/// integer box used for collision and rendering.
#[derive(Debug, Clone)]
pub struct Entity {
    pub kind: EntityKind,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: u32,
    pub height: u32,
    pub airborne: bool,
}

impl Entity {
    pub fn new(kind: EntityKind, x: f32, y: f32, width: u32, height: u32) -> Self {
        Entity {
            kind,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            width,
            height,
            airborne: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x as i32, self.y as i32, self.width, self.height)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height as f32
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width as f32 / 2.0
    }

    /// One Euler step: velocity first, then position. No sub-stepping;
    /// a fast entity can tunnel a thin platform in one frame.
    pub fn apply_gravity(&mut self, dt: f32) {
        self.vy += GRAVITY * dt;
        self.y += self.vy * dt;
    }

    /// Clamp the entity's bottom edge to `ground_y` when it has fallen
    /// through, killing vertical speed and clearing the airborne flag.
    pub fn land_on(&mut self, ground_y: f32) {
        if self.bottom() >= ground_y {
            self.y = ground_y - self.height as f32;
            self.vy = 0.0;
            self.airborne = false;
        }
    }

    /// Apply the jump impulse. Only a grounded entity can jump; returns
    /// whether the impulse was applied.
    pub fn jump(&mut self, impulse: f32) -> bool {
        if self.airborne {
            return false;
        }
        self.vy = -impulse;
        self.airborne = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_gravity_increases_fall_speed_each_frame() {
        let mut e = Entity::new(EntityKind::Runner, 0.0, 0.0, 32, 32);
        e.airborne = true;

        let mut last_vy = e.vy;
        for _ in 0..10 {
            e.apply_gravity(DT);
            assert!(e.vy > last_vy);
            assert!((e.vy - last_vy - GRAVITY * DT).abs() < 1e-3);
            last_vy = e.vy;
        }
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let mut e = Entity::new(EntityKind::Runner, 0.0, 100.0, 32, 32);

        assert!(e.jump(800.0));
        assert_eq!(e.vy, -800.0);
        assert!(e.airborne);

        // A second jump mid-air must not re-apply the impulse
        e.vy = -100.0;
        assert!(!e.jump(800.0));
        assert_eq!(e.vy, -100.0);
    }

    #[test]
    fn test_landing_clamps_and_regrounds() {
        let mut e = Entity::new(EntityKind::Runner, 0.0, 0.0, 32, 32);
        e.jump(400.0);

        // Fall long enough to pass the ground line
        for _ in 0..240 {
            e.apply_gravity(DT);
            e.land_on(300.0);
        }

        assert_eq!(e.bottom(), 300.0);
        assert_eq!(e.vy, 0.0);
        assert!(!e.airborne);
        // Grounded again, so jumping works
        assert!(e.jump(400.0));
    }
}
