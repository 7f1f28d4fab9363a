pub mod constants;
pub mod engine;
pub mod input;
pub mod leaderboard;
pub mod rng;
pub mod scoring;
pub mod timer;
pub mod types;
pub mod world;
