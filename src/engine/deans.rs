use crate::constants::{DEAN_ALT_RESET, DEAN_BASE_SPEED, PATROL_BASE_SPEED};
use crate::types::Vec2;
use crate::world::WorldMap;

/// The chasing dean. Moves straight at the player every tick, falling back to
/// a single-axis step when the diagonal is blocked.
#[derive(Clone, Debug)]
pub struct Dean {
    position: Vec2,
    start_position: Vec2,
    speed: f32,
}

impl Dean {
    pub fn new(x: f32, y: f32) -> Self {
        let position = Vec2::new(x, y);
        Self {
            position,
            start_position: position,
            speed: DEAN_BASE_SPEED,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn update(&mut self, target: Vec2, map: &WorldMap) {
        let direction = self.position.direction_to(target);
        if direction == Vec2::default() {
            return;
        }

        let new_x = self.position.x + direction.x * self.speed;
        let new_y = self.position.y + direction.y * self.speed;

        if !map.is_cell_blocked_for_dean(new_x, new_y) {
            self.position = Vec2::new(new_x, new_y);
            return;
        }
        if !map.is_cell_blocked_for_dean(new_x, self.position.y) {
            self.position.x = new_x;
            return;
        }
        if !map.is_cell_blocked_for_dean(self.position.x, new_y) {
            self.position.y = new_y;
        }
    }

    /// After a catch the dean leaves the player alone for a moment: even catch
    /// counts send it home, odd counts to the far-side reset point so it
    /// cannot camp the respawn.
    pub fn reset_to_start(&mut self, catch_count: i32) {
        if catch_count % 2 == 0 {
            self.position = self.start_position;
        } else {
            self.position = DEAN_ALT_RESET;
        }
    }
}

/// A dean pacing a fixed vertical beat between two Y bounds.
#[derive(Clone, Debug)]
pub struct PatrolDean {
    position: Vec2,
    min_y: f32,
    max_y: f32,
    direction: i32,
    speed: f32,
}

impl PatrolDean {
    pub fn new(start_x: f32, start_y: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            position: Vec2::new(start_x, start_y),
            min_y,
            max_y,
            direction: 1,
            speed: PATROL_BASE_SPEED,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// (min y, max y) of the patrol route.
    pub fn route_bounds(&self) -> (f32, f32) {
        (self.min_y, self.max_y)
    }

    pub fn update(&mut self, map: &WorldMap) {
        let mut new_y = self.position.y + self.direction as f32 * self.speed;

        if new_y > self.max_y {
            new_y = self.max_y;
            self.direction = -1;
        } else if new_y < self.min_y {
            new_y = self.min_y;
            self.direction = 1;
        }

        if !map.is_cell_blocked(self.position.x, new_y) {
            self.position.y = new_y;
        } else {
            // Flip rather than grind against an obstacle forever.
            self.direction = -self.direction;
        }
    }
}
