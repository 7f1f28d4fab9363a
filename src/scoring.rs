//! End-of-run arithmetic. Everything here is a pure function of [`RunStats`]
//! and the remaining time so the win screen, the simulation binary, and the
//! tests all agree on the numbers.

use crate::constants::{DEAN_CATCH_PENALTY, DROWN_PENALTY, PATROL_CATCH_PENALTY};
use crate::types::{Achievement, RunStats};

/// Remaining time converted to points: each full minute is worth 100, each
/// leftover second 1. Negative remainders count as zero.
pub fn time_score(time_remaining: f32) -> i32 {
    let total = time_remaining.max(0.0) as i32;
    let minutes = total / 60;
    let seconds = total % 60;
    minutes * 100 + seconds
}

pub fn total_penalty(stats: &RunStats) -> i32 {
    DEAN_CATCH_PENALTY * stats.caught_by_dean
        + PATROL_CATCH_PENALTY * stats.caught_by_patrol
        + DROWN_PENALTY * stats.times_drowned
}

/// Walks the full rule table. Rules are independent and may all fire on the
/// same run.
pub fn evaluate_achievements(stats: &RunStats) -> Vec<Achievement> {
    let hidden_both = stats.ticket_collected && stats.teleported;
    let positive_both = stats.locker_boost_used && stats.extra_time_taken;
    let negative_all = stats.caught_by_dean > 0
        && stats.caught_by_patrol > 0
        && stats.times_drowned > 0
        && stats.bush_hit
        && stats.tree_hit;

    let hidden_any = stats.ticket_collected || stats.teleported;
    let positive_any = stats.locker_boost_used || stats.extra_time_taken;
    let negative_any = stats.total_catches() > 0
        || stats.times_drowned > 0
        || stats.bush_hit
        || stats.tree_hit;

    let mut achievements = Vec::new();
    if hidden_both {
        achievements.push(Achievement::new(
            "Campus Secrets",
            "Found both hidden events in one run",
            25,
        ));
    }
    if positive_both {
        achievements.push(Achievement::new(
            "Lucky Day",
            "Cashed in both positive events",
            25,
        ));
    }
    if negative_all {
        achievements.push(Achievement::new(
            "Walking Disaster",
            "Suffered every negative event on campus",
            -25,
        ));
    }
    if hidden_any && positive_any && negative_any {
        achievements.push(Achievement::new(
            "Full Tour",
            "Encountered at least one event of every kind",
            100,
        ));
    }
    if stats.total_catches() == 0 {
        achievements.push(Achievement::new(
            "Untouchable",
            "Never caught by any dean",
            50,
        ));
    }
    if stats.total_catches() >= 3 {
        achievements.push(Achievement::new(
            "Repeat Offender",
            "Caught three or more times",
            -15,
        ));
    }
    if stats.quiz_attempted {
        achievements.push(Achievement::new(
            "Pop Quiz",
            "Took the questionnaire, for better or worse",
            20,
        ));
    }
    if stats.bush_hit || stats.tree_hit {
        achievements.push(Achievement::new(
            "Nature's Toll",
            "Ran afoul of campus flora",
            -10,
        ));
    }
    achievements
}

/// Penalties cannot push the base below zero, and achievement maluses cannot
/// push the final total below zero either.
pub fn final_score(time_score: i32, total_penalty: i32, achievements: &[Achievement]) -> i32 {
    let base = (time_score - total_penalty).max(0);
    let bonus: i32 = achievements.iter().map(|a| a.bonus_score).sum();
    (base + bonus).max(0)
}
