use std::path::PathBuf;

use crate::constants::{
    BUSH_POSITION, BUSH_SIZE, BUSH_SLOW_MULTIPLIER, CATCH_RADIUS, DEAN_SPAWN, EXTRA_PATROL_ROUTE,
    EXTRA_TIME_DELTA, EXTRA_TIME_POSITION, EXTRA_TIME_SIZE, LOCKER_BOOST_MULTIPLIER,
    LOCKER_POSITION, NPC_POSITION, PATROL_ROUTES, PLAYER_BASE_SPEED, PLAYER_SIZE,
    ROUND_TIME_SECONDS,
    TELEPORT_POSITION, TELEPORT_SIZE, TREE_POSITION, TREE_SIZE, TREE_TIME_DELTA,
};
use crate::input::InputFrame;
use crate::leaderboard::Leaderboard;
use crate::rng::Rng;
use crate::scoring;
use crate::timer::RunTimer;
use crate::types::{
    EndReason, EventTally, Facing, Rect, RunStats, RunSummary, ScreenRequest, Vec2,
};
use crate::world::{campus_map, WorldMap};

mod deans;
mod events;
mod player;

pub use self::deans::{Dean, PatrolDean};
pub use self::events::{
    Banner, DrownHazard, EventCommand, EventObject, FreezeCache, LockerBoost, Npc, Quiz,
    SlowHazard, Teleporter, TicketPickup, TimeShift,
};
pub use self::player::Player;

#[derive(Clone, Debug)]
pub struct GameOptions {
    pub seed: u32,
    pub player_name: String,
    pub time_limit_override: Option<f32>,
    pub leaderboard_path: Option<PathBuf>,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            seed: 1,
            player_name: "Anonymous".to_string(),
            time_limit_override: None,
            leaderboard_path: None,
        }
    }
}

/// One run of the chase. The host shell feeds it an [`InputFrame`] per tick
/// and drains screen requests; everything else lives in here.
pub struct GameEngine {
    map: WorldMap,
    rng: Rng,
    timer: RunTimer,
    player: Player,
    deans: Vec<Dean>,
    patrols: Vec<PatrolDean>,
    events: Vec<EventObject>,
    stats: RunStats,
    player_name: String,
    leaderboard: Option<Leaderboard>,

    paused: bool,
    ended: bool,
    end_reason: Option<EndReason>,
    deans_frozen: bool,
    frozen_for_good: bool,
    pending_screen: Option<ScreenRequest>,
    summary: Option<RunSummary>,
    tick_counter: u64,
}

impl GameEngine {
    pub fn new(options: GameOptions) -> Self {
        let map = campus_map();
        let events = build_campus_events(&map);
        let leaderboard = options.leaderboard_path.map(Leaderboard::new);

        Self {
            map,
            rng: Rng::new(options.seed),
            timer: RunTimer::new(options.time_limit_override.unwrap_or(ROUND_TIME_SECONDS)),
            player: Player::at_spawn(),
            deans: vec![Dean::new(DEAN_SPAWN.x, DEAN_SPAWN.y)],
            patrols: PATROL_ROUTES
                .iter()
                .map(|&(x, y, min_y, max_y)| PatrolDean::new(x, y, min_y, max_y))
                .collect(),
            events,
            stats: RunStats::default(),
            player_name: options.player_name,
            leaderboard,
            paused: false,
            ended: false,
            end_reason: None,
            deans_frozen: false,
            frozen_for_good: false,
            pending_screen: None,
            summary: None,
            tick_counter: 0,
        }
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn deans_frozen(&self) -> bool {
        self.deans_frozen
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn deans(&self) -> &[Dean] {
        &self.deans
    }

    pub fn patrols(&self) -> &[PatrolDean] {
        &self.patrols
    }

    pub fn time_left(&self) -> f32 {
        self.timer.time_left()
    }

    pub fn clock(&self) -> String {
        self.timer.format_clock()
    }

    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    pub fn high_scores(&self) -> &[crate::leaderboard::ScoreEntry] {
        self.leaderboard
            .as_ref()
            .map(|board| board.high_scores())
            .unwrap_or(&[])
    }

    pub fn take_screen_request(&mut self) -> Option<ScreenRequest> {
        self.pending_screen.take()
    }

    /// While the questionnaire is open the player stands still.
    pub fn quiz_open(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, EventObject::Quiz(quiz) if quiz.open()))
    }

    /// Hint text from the friendly classmate, while the message is up.
    pub fn npc_hint(&self) -> Option<&'static str> {
        self.events.iter().find_map(|event| match event {
            EventObject::Friend(npc) if npc.message_visible() => Some(Npc::HINT),
            _ => None,
        })
    }

    /// Number of `step` calls taken so far, paused ticks included.
    pub fn ticks(&self) -> u64 {
        self.tick_counter
    }

    pub fn ticket_collected(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, EventObject::Ticket(ticket) if ticket.collected()))
    }

    /// True while the player holds the ticket and stands at the bus, which is
    /// when the host shows the boarding prompt.
    pub fn can_end_run(&self) -> bool {
        if !self.ticket_collected() {
            return false;
        }
        let Some(bus) = self.map.named_area("Bus") else {
            return false;
        };
        self.player.bounds().overlaps(&bus)
    }

    pub fn step(&mut self, dt: f32, input: &InputFrame) {
        if self.ended {
            return;
        }
        self.tick_counter += 1;

        if input.quit {
            self.finish(EndReason::Quit);
            return;
        }
        if input.pause {
            self.paused = !self.paused;
        }
        if self.paused {
            return;
        }

        self.timer.decrement(dt);

        if !self.quiz_open() {
            self.move_player(input);
        }
        if !self.deans_frozen {
            let target = self.player.position();
            for dean in &mut self.deans {
                dean.update(target, &self.map);
            }
            for patrol in &mut self.patrols {
                patrol.update(&self.map);
            }
        }

        self.run_events(dt, input);
        self.resolve_catches();
        self.check_win(input);
        self.check_time_up();
    }

    fn move_player(&mut self, input: &InputFrame) {
        let mut dx = 0.0;
        let mut dy = 0.0;
        let speed = PLAYER_BASE_SPEED * self.player_speed_multiplier();
        if input.left {
            dx -= speed;
            self.player.set_facing(Facing::Left);
        }
        if input.right {
            dx += speed;
            self.player.set_facing(Facing::Right);
        }
        if input.up {
            dy -= speed;
            self.player.set_facing(Facing::Up);
        }
        if input.down {
            dy += speed;
            self.player.set_facing(Facing::Down);
        }
        if dx == 0.0 && dy == 0.0 {
            return;
        }

        let from = self.player.position();
        let full = Vec2::new(from.x + dx, from.y + dy);
        let horizontal = Vec2::new(from.x + dx, from.y);
        let vertical = Vec2::new(from.x, from.y + dy);
        for candidate in [full, horizontal, vertical] {
            if candidate == from {
                continue;
            }
            if self.map.in_bounds(candidate.x, candidate.y, PLAYER_SIZE)
                && !self.map.is_cell_blocked(candidate.x, candidate.y)
            {
                self.player.set_position(candidate);
                return;
            }
        }
    }

    fn player_speed_multiplier(&self) -> f32 {
        let mut multiplier = 1.0;
        for event in &self.events {
            if let EventObject::Locker(locker) = event {
                if locker.boost_active() {
                    multiplier = LOCKER_BOOST_MULTIPLIER;
                }
            }
        }
        // the bush wins over any boost
        for event in &self.events {
            if let EventObject::Bush(bush) = event {
                if bush.slow_active() {
                    multiplier = BUSH_SLOW_MULTIPLIER;
                }
            }
        }
        multiplier
    }

    fn run_events(&mut self, dt: f32, input: &InputFrame) {
        let mut commands = Vec::new();
        for event in &mut self.events {
            event.update(
                &mut self.player,
                &mut self.timer,
                input,
                &mut self.rng,
                dt,
                &mut commands,
            );
        }
        for command in commands {
            match command {
                EventCommand::FreezeDeans { duration } => {
                    self.deans_frozen = true;
                    if duration.is_none() {
                        self.frozen_for_good = true;
                    }
                }
                EventCommand::UnfreezeDeans => {
                    if !self.frozen_for_good {
                        self.deans_frozen = false;
                    }
                }
                EventCommand::SpawnExtraPatrol => {
                    let (x, y, min_y, max_y) = EXTRA_PATROL_ROUTE;
                    self.patrols.push(PatrolDean::new(x, y, min_y, max_y));
                }
                EventCommand::PlayerDrowned => {
                    self.stats.times_drowned += 1;
                }
            }
        }
    }

    fn resolve_catches(&mut self) {
        let player_pos = self.player.position();
        for idx in 0..self.deans.len() {
            if self.deans[idx].position().distance(player_pos) < CATCH_RADIUS {
                self.stats.caught_by_dean += 1;
                self.player.reset_to_spawn();
                self.deans[idx].reset_to_start(self.stats.caught_by_dean);
                return;
            }
        }
        for patrol in &self.patrols {
            if patrol.position().distance(player_pos) < CATCH_RADIUS {
                self.stats.caught_by_patrol += 1;
                self.player.reset_to_spawn();
                return;
            }
        }
    }

    fn check_win(&mut self, input: &InputFrame) {
        if !self.ended && input.interact && self.can_end_run() {
            self.finish(EndReason::Win);
        }
    }

    fn check_time_up(&mut self) {
        if !self.ended && self.timer.time_left() == 0.0 {
            self.finish(EndReason::TimeUp);
        }
    }

    fn finish(&mut self, reason: EndReason) {
        self.collect_event_stats();
        let time_score = scoring::time_score(self.timer.time_left());
        let total_penalty = scoring::total_penalty(&self.stats);
        let achievements = scoring::evaluate_achievements(&self.stats);
        let final_score = scoring::final_score(time_score, total_penalty, &achievements);

        if reason == EndReason::Win {
            if let Some(board) = self.leaderboard.as_mut() {
                board.record_score(&self.player_name, final_score);
            }
        }

        self.summary = Some(RunSummary {
            reason,
            player_name: self.player_name.clone(),
            time_remaining: self.timer.time_left(),
            time_score,
            total_penalty,
            achievements,
            final_score,
            stats: self.stats,
        });
        self.ended = true;
        self.end_reason = Some(reason);
        self.pending_screen = Some(match reason {
            EndReason::Win => ScreenRequest::Win,
            EndReason::TimeUp => ScreenRequest::GameOver,
            EndReason::Quit => ScreenRequest::Menu,
        });
    }

    fn collect_event_stats(&mut self) {
        for event in &self.events {
            match event {
                EventObject::Ticket(ticket) => self.stats.ticket_collected = ticket.collected(),
                EventObject::Locker(locker) => self.stats.locker_boost_used = locker.searched(),
                EventObject::Bush(bush) => self.stats.bush_hit = bush.triggered(),
                EventObject::Tree(tree) => self.stats.tree_hit = tree.applied(),
                EventObject::ExtraTime(clock) => self.stats.extra_time_taken = clock.applied(),
                EventObject::Teleporter(pad) => self.stats.teleported = pad.teleported(),
                EventObject::Drown(_) | EventObject::Friend(_) => {}
                EventObject::Quiz(quiz) => self.stats.quiz_attempted = quiz.attempted(),
                EventObject::Materials(cache) => self.stats.freeze_cache_used = cache.used(),
            }
        }
    }

    /// HUD checklist of encountered events per category.
    pub fn event_tally(&mut self) -> EventTally {
        self.collect_event_stats();
        let positive = self.stats.locker_boost_used as u32 + self.stats.extra_time_taken as u32;
        let negative = (self.stats.caught_by_dean > 0) as u32
            + (self.stats.caught_by_patrol > 0) as u32
            + (self.stats.times_drowned > 0) as u32
            + self.stats.bush_hit as u32
            + self.stats.tree_hit as u32;
        let hidden = self.stats.ticket_collected as u32 + self.stats.teleported as u32;
        EventTally {
            positive,
            positive_total: 2,
            negative,
            negative_total: 5,
            hidden,
            hidden_total: 2,
        }
    }
}

/// The fixed roster of campus events. Areas the map does not carry are left
/// out of the roster rather than guessed at.
fn build_campus_events(map: &WorldMap) -> Vec<EventObject> {
    let mut events = Vec::new();

    if let Some(area) = map.named_area("BusTicket") {
        events.push(EventObject::Ticket(TicketPickup::new(Vec2::new(
            area.x, area.y,
        ))));
    }
    events.push(EventObject::Locker(LockerBoost::new(LOCKER_POSITION)));
    events.push(EventObject::Bush(SlowHazard::new(Rect::new(
        BUSH_POSITION.x,
        BUSH_POSITION.y,
        BUSH_SIZE.0,
        BUSH_SIZE.1,
    ))));
    events.push(EventObject::Tree(TimeShift::new(
        Rect::new(TREE_POSITION.x, TREE_POSITION.y, TREE_SIZE.0, TREE_SIZE.1),
        TREE_TIME_DELTA,
    )));
    events.push(EventObject::ExtraTime(TimeShift::new(
        Rect::new(
            EXTRA_TIME_POSITION.x,
            EXTRA_TIME_POSITION.y,
            EXTRA_TIME_SIZE.0,
            EXTRA_TIME_SIZE.1,
        ),
        EXTRA_TIME_DELTA,
    )));
    events.push(EventObject::Teleporter(Teleporter::new(Rect::new(
        TELEPORT_POSITION.x,
        TELEPORT_POSITION.y,
        TELEPORT_SIZE.0,
        TELEPORT_SIZE.1,
    ))));

    events.push(EventObject::Friend(Npc::new(NPC_POSITION)));

    let water: Vec<Rect> = ["Water1", "Water2"]
        .iter()
        .filter_map(|name| map.named_area(name))
        .collect();
    if !water.is_empty() {
        events.push(EventObject::Drown(DrownHazard::new(water)));
    }
    if let Some(area) = map.named_area("Questionnaire") {
        events.push(EventObject::Quiz(Quiz::new(area)));
    }
    if let Some(area) = map.named_area("Materials") {
        events.push(EventObject::Materials(FreezeCache::new(area)));
    }
    events
}
