use std::collections::BTreeMap;

use crate::constants::{TILE_SIZE, WORLD_TILES};
use crate::types::Rect;

/// Tile characters: `.` floor, `#` wall, `D` door. Doors block only deans.
const FLOOR: char = '.';
const WALL: char = '#';
const DOOR: char = 'D';

/// Walkable tile grid plus the named rectangles the map's events layer would
/// normally provide (bus stop, water zones, quiz area, and so on). Row 0 is the
/// top of the world; y grows downward, so "up" movement decreases y.
#[derive(Clone, Debug)]
pub struct WorldMap {
    tile_size: f32,
    tiles: Vec<String>,
    named_areas: BTreeMap<String, Rect>,
}

impl WorldMap {
    pub fn new(tiles: Vec<String>, tile_size: f32) -> Self {
        Self {
            tile_size,
            tiles,
            named_areas: BTreeMap::new(),
        }
    }

    pub fn with_area(mut self, name: &str, area: Rect) -> Self {
        self.named_areas.insert(name.to_string(), area);
        self
    }

    pub fn width(&self) -> f32 {
        self.tiles
            .first()
            .map(|row| row.chars().count() as f32 * self.tile_size)
            .unwrap_or(0.0)
    }

    pub fn height(&self) -> f32 {
        self.tiles.len() as f32 * self.tile_size
    }

    /// Tile under an entity position, sampled at the sprite center.
    fn tile_at(&self, x: f32, y: f32) -> Option<char> {
        let half = self.tile_size / 2.0;
        let tile_x = ((x + half) / self.tile_size).floor();
        let tile_y = ((y + half) / self.tile_size).floor();
        if tile_x < 0.0 || tile_y < 0.0 {
            return None;
        }
        self.tiles
            .get(tile_y as usize)
            .and_then(|row| row.chars().nth(tile_x as usize))
    }

    pub fn is_cell_blocked(&self, x: f32, y: f32) -> bool {
        !matches!(self.tile_at(x, y), Some(FLOOR) | Some(DOOR))
    }

    /// Deans additionally treat door tiles as blocked, keeping them out of
    /// buildings the player can duck into.
    pub fn is_cell_blocked_for_dean(&self, x: f32, y: f32) -> bool {
        !matches!(self.tile_at(x, y), Some(FLOOR))
    }

    /// True while an entity of the given size stays fully inside the world.
    pub fn in_bounds(&self, x: f32, y: f32, size: f32) -> bool {
        x >= 0.0 && y >= 0.0 && x + size <= self.width() && y + size <= self.height()
    }

    /// Named rectangle from the events layer. Absent names are a tolerated map
    /// authoring gap; callers disable the feature.
    pub fn named_area(&self, name: &str) -> Option<Rect> {
        self.named_areas.get(name).copied()
    }
}

/// The built-in campus maze. Mostly open ground ringed by a wall, with a few
/// interior building walls, two door gaps, and the event rectangles placed to
/// match the entity spawn constants.
pub fn campus_map() -> WorldMap {
    let side = WORLD_TILES;
    let mut grid: Vec<Vec<char>> = vec![vec![FLOOR; side]; side];

    for i in 0..side {
        grid[0][i] = WALL;
        grid[side - 1][i] = WALL;
        grid[i][0] = WALL;
        grid[i][side - 1] = WALL;
    }

    // Science block, rows are tile_y (world y / 16).
    wall_run(&mut grid, 28, 8, 18, true);
    wall_run(&mut grid, 32, 8, 18, true);
    wall_run(&mut grid, 28, 8, 5, false);
    grid[30][8] = DOOR;

    // Dorm corridor east of the player spawn.
    wall_run(&mut grid, 8, 40, 12, true);
    wall_run(&mut grid, 16, 40, 12, true);
    wall_run(&mut grid, 8, 51, 9, false);
    grid[12][40] = DOOR;

    // Quad hedge.
    wall_run(&mut grid, 22, 24, 8, true);

    let tiles = grid
        .into_iter()
        .map(|row| row.into_iter().collect())
        .collect();

    WorldMap::new(tiles, TILE_SIZE)
        .with_area("BusTicket", Rect::new(520.0, 600.0, 16.0, 16.0))
        .with_area("Bus", Rect::new(860.0, 880.0, 64.0, 32.0))
        .with_area("Water1", Rect::new(96.0, 96.0, 96.0, 64.0))
        .with_area("Water2", Rect::new(704.0, 320.0, 96.0, 64.0))
        .with_area("Questionnaire", Rect::new(400.0, 416.0, 64.0, 64.0))
        .with_area("Materials", Rect::new(112.0, 512.0, 48.0, 48.0))
}

fn wall_run(grid: &mut [Vec<char>], row: usize, start: usize, len: usize, horizontal: bool) {
    for offset in 0..len {
        if horizontal {
            grid[row][start + offset] = WALL;
        } else {
            grid[row + offset][start] = WALL;
        }
    }
}
