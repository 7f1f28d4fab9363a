use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Unit vector pointing from `self` toward `target`. Zero when the two
    /// points coincide, so a chaser standing on its target stays put.
    pub fn direction_to(self, target: Vec2) -> Vec2 {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len == 0.0 {
            return Vec2::default();
        }
        Vec2::new(dx / len, dy / len)
    }
}

/// Axis-aligned rectangle used only for overlap tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizAnswer {
    A,
    B,
    C,
    D,
}

impl QuizAnswer {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "a" | "A" => Some(Self::A),
            "b" | "B" => Some(Self::B),
            "c" | "C" => Some(Self::C),
            "d" | "D" => Some(Self::D),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Win,
    TimeUp,
    Quit,
}

/// Fire-and-forget screen change request for the host shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenRequest {
    Menu,
    Win,
    GameOver,
}

/// Everything the score and achievement calculators need about a finished run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub caught_by_dean: i32,
    pub caught_by_patrol: i32,
    pub times_drowned: i32,
    pub ticket_collected: bool,
    pub teleported: bool,
    pub locker_boost_used: bool,
    pub extra_time_taken: bool,
    pub bush_hit: bool,
    pub tree_hit: bool,
    pub quiz_attempted: bool,
    pub freeze_cache_used: bool,
}

impl RunStats {
    pub fn total_catches(&self) -> i32 {
        self.caught_by_dean + self.caught_by_patrol
    }
}

/// Checklist tallies shown by the host HUD.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTally {
    pub positive: u32,
    pub positive_total: u32,
    pub negative: u32,
    pub negative_total: u32,
    pub hidden: u32,
    pub hidden_total: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub name: String,
    pub description: String,
    pub bonus_score: i32,
}

impl Achievement {
    pub fn new(name: &str, description: &str, bonus_score: i32) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            bonus_score,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub reason: EndReason,
    pub player_name: String,
    #[serde(rename = "timeRemainingSeconds")]
    pub time_remaining: f32,
    pub time_score: i32,
    pub total_penalty: i32,
    pub achievements: Vec<Achievement>,
    pub final_score: i32,
    pub stats: RunStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(30.0, 40.0);
        assert_eq!(a.distance(b), 50.0);
    }

    #[test]
    fn direction_to_is_unit_length() {
        let dir = Vec2::new(10.0, 10.0).direction_to(Vec2::new(10.0, 50.0));
        assert_eq!(dir, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn direction_to_self_is_zero() {
        let p = Vec2::new(5.0, 5.0);
        assert_eq!(p.direction_to(p), Vec2::default());
    }

    #[test]
    fn rects_overlap_when_intersecting() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(20.0, 20.0, 4.0, 4.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn quiz_answer_parses_either_case() {
        assert_eq!(QuizAnswer::parse("c"), Some(QuizAnswer::C));
        assert_eq!(QuizAnswer::parse("B"), Some(QuizAnswer::B));
        assert_eq!(QuizAnswer::parse("x"), None);
    }

    #[test]
    fn total_catches_sums_both_kinds() {
        let stats = RunStats {
            caught_by_dean: 2,
            caught_by_patrol: 1,
            ..RunStats::default()
        };
        assert_eq!(stats.total_catches(), 3);
    }
}
