use crate::constants::{PLAYER_SIZE, PLAYER_SPAWN};
use crate::types::{Facing, Rect, Vec2};

/// The student. Movement itself is resolved by the orchestrator; this only
/// carries position, facing, and the cosmetic animation frame.
#[derive(Clone, Debug)]
pub struct Player {
    position: Vec2,
    spawn: Vec2,
    facing: Facing,
    frame: u32,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        let position = Vec2::new(x, y);
        Self {
            position,
            spawn: position,
            facing: Facing::default(),
            frame: 0,
        }
    }

    pub fn at_spawn() -> Self {
        Self::new(PLAYER_SPAWN.x, PLAYER_SPAWN.y)
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn reset_to_spawn(&mut self) {
        self.position = self.spawn;
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn set_facing(&mut self, facing: Facing) {
        self.facing = facing;
        self.frame = self.frame.wrapping_add(1);
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, PLAYER_SIZE, PLAYER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_returns_to_original_spawn() {
        let mut player = Player::new(560.0, 180.0);
        player.set_position(Vec2::new(10.0, 20.0));
        player.reset_to_spawn();
        assert_eq!(player.position(), Vec2::new(560.0, 180.0));
    }

    #[test]
    fn bounds_follow_position() {
        let mut player = Player::new(0.0, 0.0);
        player.set_position(Vec2::new(100.0, 50.0));
        let bounds = player.bounds();
        assert_eq!((bounds.x, bounds.y), (100.0, 50.0));
        assert_eq!((bounds.w, bounds.h), (16.0, 16.0));
    }

    #[test]
    fn facing_changes_advance_the_animation_frame() {
        let mut player = Player::at_spawn();
        let before = player.frame();
        player.set_facing(Facing::Left);
        assert_eq!(player.facing(), Facing::Left);
        assert_eq!(player.frame(), before + 1);
    }
}
