use crate::types::Vec2;

pub const TICK_RATE: u32 = 60;
pub const TICK_SECONDS: f32 = 1.0 / TICK_RATE as f32;

/// Default round length when no override is given.
pub const ROUND_TIME_SECONDS: f32 = 300.0;

pub const TILE_SIZE: f32 = 16.0;
/// Campus map extent in tiles per side.
pub const WORLD_TILES: usize = 60;

/// Euclidean distance at which a dean catches the player.
pub const CATCH_RADIUS: f32 = 16.0;

pub const PLAYER_BASE_SPEED: f32 = 1.0;
pub const PLAYER_SIZE: f32 = 16.0;
pub const PLAYER_SPAWN: Vec2 = Vec2::new(560.0, 180.0);

pub const DEAN_BASE_SPEED: f32 = 0.7;
pub const DEAN_SPAWN: Vec2 = Vec2::new(325.0, 335.0);
/// Alternate reset point used on odd catch counts so the dean cannot camp the
/// player spawn.
pub const DEAN_ALT_RESET: Vec2 = Vec2::new(690.0, 560.0);

pub const PATROL_BASE_SPEED: f32 = 3.0;
/// (start x, start y, min y, max y) for the three standing patrols.
pub const PATROL_ROUTES: [(f32, f32, f32, f32); 3] = [
    (140.0, 190.0, 100.0, 260.0),
    (170.0, 130.0, 100.0, 260.0),
    (200.0, 100.0, 100.0, 260.0),
];
/// Route of the extra patrol spawned by a wrong quiz answer (top-right area).
pub const EXTRA_PATROL_ROUTE: (f32, f32, f32, f32) = (550.0, 450.0, 450.0, 600.0);

pub const TICKET_PICKUP_RADIUS: f32 = 16.0;
pub const LOCKER_INTERACT_RADIUS: f32 = 50.0;
pub const LOCKER_POSITION: Vec2 = Vec2::new(495.0, 895.0);
pub const LOCKER_BOOST_MULTIPLIER: f32 = 2.0;
pub const LOCKER_BOOST_SECONDS: f32 = 10.0;

pub const BUSH_POSITION: Vec2 = Vec2::new(560.0, 270.0);
pub const BUSH_SIZE: (f32, f32) = (32.0, 30.0);
pub const BUSH_SLOW_MULTIPLIER: f32 = 0.5;
pub const BUSH_SLOW_SECONDS: f32 = 20.0;

pub const TREE_POSITION: Vec2 = Vec2::new(270.0, 9.0);
pub const TREE_SIZE: (f32, f32) = (56.0, 56.0);
pub const TREE_TIME_DELTA: f32 = -30.0;

pub const EXTRA_TIME_POSITION: Vec2 = Vec2::new(300.0, 120.0);
pub const EXTRA_TIME_SIZE: (f32, f32) = (56.0, 56.0);
pub const EXTRA_TIME_DELTA: f32 = 30.0;

pub const TELEPORT_POSITION: Vec2 = Vec2::new(800.0, 620.0);
pub const TELEPORT_SIZE: (f32, f32) = (32.0, 48.0);
pub const TELEPORT_COUNTDOWN_SECONDS: f32 = 3.6;
pub const TELEPORT_FLASH_SECONDS: f32 = 0.8;
pub const TELEPORT_SAFE_SPOTS: [Vec2; 6] = [
    Vec2::new(560.0, 180.0),
    Vec2::new(300.0, 300.0),
    Vec2::new(150.0, 400.0),
    Vec2::new(450.0, 100.0),
    Vec2::new(360.0, 250.0),
    Vec2::new(50.0, 200.0),
];

pub const NPC_POSITION: Vec2 = Vec2::new(560.0, 600.0);
pub const NPC_INTERACT_RADIUS: f32 = 50.0;
/// Wider than the interact radius so the hint does not flicker at the edge.
pub const NPC_HIDE_RADIUS: f32 = 60.0;

pub const DROWN_RESPAWN: Vec2 = Vec2::new(560.0, 180.0);

pub const FREEZE_CACHE_SECONDS: f32 = 30.0;

/// How long informational banners stay on screen.
pub const BANNER_SECONDS: f32 = 5.0;

pub const DEAN_CATCH_PENALTY: i32 = 5;
pub const PATROL_CATCH_PENALTY: i32 = 5;
pub const DROWN_PENALTY: i32 = 10;

pub const LEADERBOARD_MAX_ENTRIES: usize = 5;
