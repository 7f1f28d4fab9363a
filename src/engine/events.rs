use crate::constants::{
    BANNER_SECONDS, BUSH_SLOW_SECONDS, DROWN_RESPAWN, FREEZE_CACHE_SECONDS, LOCKER_BOOST_SECONDS,
    LOCKER_INTERACT_RADIUS, NPC_HIDE_RADIUS, NPC_INTERACT_RADIUS, TELEPORT_COUNTDOWN_SECONDS,
    TELEPORT_FLASH_SECONDS, TELEPORT_SAFE_SPOTS, TICKET_PICKUP_RADIUS,
};
use crate::input::InputFrame;
use crate::rng::Rng;
use crate::timer::RunTimer;
use crate::types::{QuizAnswer, Rect, Vec2};

use super::player::Player;

/// Side effects an event cannot apply by itself because they touch entities
/// owned by the orchestrator. Collected during the event pass and drained
/// afterwards.
#[derive(Clone, Debug, PartialEq)]
pub enum EventCommand {
    /// `duration` of `None` freezes until the round ends.
    FreezeDeans { duration: Option<f32> },
    UnfreezeDeans,
    SpawnExtraPatrol,
    PlayerDrowned,
}

/// On-screen notice with a fixed lifetime.
#[derive(Clone, Debug)]
pub struct Banner {
    visible: bool,
    remaining: f32,
    duration: f32,
}

impl Banner {
    pub fn new(duration: f32) -> Self {
        Self {
            visible: false,
            remaining: 0.0,
            duration,
        }
    }

    pub fn show(&mut self) {
        self.visible = true;
        self.remaining = self.duration;
    }

    pub fn tick(&mut self, dt: f32) {
        if !self.visible {
            return;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.visible = false;
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }
}

impl Default for Banner {
    fn default() -> Self {
        Self::new(BANNER_SECONDS)
    }
}

/// Bus ticket lying on the ground. Walk close, press interact, keep it for
/// the rest of the round.
#[derive(Clone, Debug)]
pub struct TicketPickup {
    position: Vec2,
    in_range: bool,
    collected: bool,
}

impl TicketPickup {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            in_range: false,
            collected: false,
        }
    }

    pub fn collected(&self) -> bool {
        self.collected
    }

    pub fn prompt_visible(&self) -> bool {
        self.in_range && !self.collected
    }

    fn update(&mut self, player: &Player, input: &InputFrame) {
        if self.collected {
            return;
        }
        self.in_range = player.position().distance(self.position) < TICKET_PICKUP_RADIUS;
        if self.in_range && input.interact {
            self.collected = true;
        }
    }
}

/// Locker that grants a temporary speed boost when searched. One use.
#[derive(Clone, Debug)]
pub struct LockerBoost {
    position: Vec2,
    in_range: bool,
    searched: bool,
    boost_remaining: f32,
    banner: Banner,
}

impl LockerBoost {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            in_range: false,
            searched: false,
            boost_remaining: 0.0,
            banner: Banner::default(),
        }
    }

    pub fn searched(&self) -> bool {
        self.searched
    }

    pub fn boost_active(&self) -> bool {
        self.boost_remaining > 0.0
    }

    pub fn prompt_visible(&self) -> bool {
        self.in_range && !self.searched
    }

    pub fn banner_visible(&self) -> bool {
        self.banner.visible()
    }

    fn update(&mut self, player: &Player, input: &InputFrame, dt: f32) {
        if !self.searched {
            self.in_range = player.position().distance(self.position) < LOCKER_INTERACT_RADIUS;
            if self.in_range && input.interact {
                self.searched = true;
                self.boost_remaining = LOCKER_BOOST_SECONDS;
                self.banner.show();
            }
        }
        if self.boost_remaining > 0.0 {
            self.boost_remaining -= dt;
        }
        self.banner.tick(dt);
    }
}

/// Area that slows the player once entered. One trigger per round.
#[derive(Clone, Debug)]
pub struct SlowHazard {
    bounds: Rect,
    triggered: bool,
    slow_remaining: f32,
    banner: Banner,
}

impl SlowHazard {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            triggered: false,
            slow_remaining: 0.0,
            banner: Banner::default(),
        }
    }

    pub fn triggered(&self) -> bool {
        self.triggered
    }

    pub fn slow_active(&self) -> bool {
        self.slow_remaining > 0.0
    }

    fn update(&mut self, player: &Player, dt: f32) {
        if !self.triggered && player.bounds().overlaps(&self.bounds) {
            self.triggered = true;
            self.slow_remaining = BUSH_SLOW_SECONDS;
            self.banner.show();
        }
        if self.slow_remaining > 0.0 {
            self.slow_remaining -= dt;
        }
        self.banner.tick(dt);
    }
}

/// Walk-over area that shifts the round timer once. Covers both the falling
/// tree (time loss) and the extra-time pickup.
#[derive(Clone, Debug)]
pub struct TimeShift {
    bounds: Rect,
    delta: f32,
    applied: bool,
    banner: Banner,
}

impl TimeShift {
    pub fn new(bounds: Rect, delta: f32) -> Self {
        Self {
            bounds,
            delta,
            applied: false,
            banner: Banner::default(),
        }
    }

    pub fn applied(&self) -> bool {
        self.applied
    }

    fn update(&mut self, player: &Player, timer: &mut RunTimer, dt: f32) {
        if !self.applied && player.bounds().overlaps(&self.bounds) {
            self.applied = true;
            timer.add_time(self.delta);
            self.banner.show();
        }
        self.banner.tick(dt);
    }
}

/// Teleporter pad. Entering it starts a countdown; when it elapses the player
/// is moved to a random safe spot and a short flash plays. One use per round.
#[derive(Clone, Debug)]
pub struct Teleporter {
    bounds: Rect,
    counting: bool,
    elapsed: f32,
    teleported: bool,
    flash_elapsed: f32,
    flash_active: bool,
}

impl Teleporter {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            counting: false,
            elapsed: 0.0,
            teleported: false,
            flash_elapsed: 0.0,
            flash_active: false,
        }
    }

    pub fn teleported(&self) -> bool {
        self.teleported
    }

    pub fn countdown_active(&self) -> bool {
        self.counting && !self.teleported
    }

    pub fn flash_active(&self) -> bool {
        self.flash_active
    }

    fn update(&mut self, player: &mut Player, rng: &mut Rng, dt: f32) {
        if !self.counting && !self.teleported && player.bounds().overlaps(&self.bounds) {
            self.counting = true;
            self.elapsed = 0.0;
        }
        if self.counting && !self.teleported {
            self.elapsed += dt;
            if self.elapsed >= TELEPORT_COUNTDOWN_SECONDS {
                player.set_position(rng.pick(&TELEPORT_SAFE_SPOTS));
                self.teleported = true;
                self.flash_active = true;
                self.flash_elapsed = 0.0;
            }
        }
        if self.flash_active {
            self.flash_elapsed += dt;
            if self.flash_elapsed >= TELEPORT_FLASH_SECONDS {
                self.flash_active = false;
            }
        }
    }
}

/// Water the player can fall into. Respawns the player and reports the
/// mishap. Triggers every time, not once.
#[derive(Clone, Debug)]
pub struct DrownHazard {
    zones: Vec<Rect>,
    respawn: Vec2,
}

impl DrownHazard {
    pub fn new(zones: Vec<Rect>) -> Self {
        Self {
            zones,
            respawn: DROWN_RESPAWN,
        }
    }

    fn update(&mut self, player: &mut Player, commands: &mut Vec<EventCommand>) {
        let bounds = player.bounds();
        if self.zones.iter().any(|zone| bounds.overlaps(zone)) {
            player.set_position(self.respawn);
            commands.push(EventCommand::PlayerDrowned);
        }
    }
}

/// Friendly classmate standing around campus. Interacting up close shows a
/// hint about the bus ticket; the message hides again once the player walks
/// far enough away. Can be asked any number of times.
#[derive(Clone, Debug)]
pub struct Npc {
    position: Vec2,
    in_range: bool,
    message_visible: bool,
}

impl Npc {
    pub const HINT: &'static str =
        "Hey friend! Don't forget your bus ticket... you always drop them by your room";

    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            in_range: false,
            message_visible: false,
        }
    }

    pub fn message_visible(&self) -> bool {
        self.message_visible
    }

    pub fn prompt_visible(&self) -> bool {
        self.in_range && !self.message_visible
    }

    fn update(&mut self, player: &Player, input: &InputFrame) {
        let distance = player.position().distance(self.position);
        self.in_range = distance < NPC_INTERACT_RADIUS;
        if self.in_range && input.interact {
            self.message_visible = true;
        }
        if self.message_visible && distance > NPC_HIDE_RADIUS {
            self.message_visible = false;
        }
    }
}

/// The questionnaire stand. Starting it locks the player in place until an
/// answer is given; the right answer freezes every dean for the rest of the
/// round, a wrong one spawns an extra patrol. One attempt per round.
#[derive(Clone, Debug)]
pub struct Quiz {
    area: Rect,
    in_range: bool,
    open: bool,
    attempted: bool,
    answered_correctly: bool,
    result_banner: Banner,
}

impl Quiz {
    const RESULT_BANNER_SECONDS: f32 = 3.0;

    pub fn new(area: Rect) -> Self {
        Self {
            area,
            in_range: false,
            open: false,
            attempted: false,
            answered_correctly: false,
            result_banner: Banner::new(Self::RESULT_BANNER_SECONDS),
        }
    }

    pub fn attempted(&self) -> bool {
        self.attempted
    }

    pub fn answered_correctly(&self) -> bool {
        self.answered_correctly
    }

    pub fn open(&self) -> bool {
        self.open
    }

    pub fn prompt_visible(&self) -> bool {
        self.in_range && !self.attempted && !self.open
    }

    fn update(&mut self, player: &Player, input: &InputFrame, dt: f32, commands: &mut Vec<EventCommand>) {
        self.result_banner.tick(dt);
        if self.attempted {
            return;
        }
        self.in_range = player.bounds().overlaps(&self.area);
        if !self.open {
            if self.in_range && input.interact {
                self.open = true;
            }
            return;
        }
        let Some(answer) = input.quiz_answer else {
            return;
        };
        self.open = false;
        self.attempted = true;
        self.result_banner.show();
        if answer == QuizAnswer::C {
            self.answered_correctly = true;
            commands.push(EventCommand::FreezeDeans { duration: None });
        } else {
            commands.push(EventCommand::SpawnExtraPatrol);
        }
    }
}

/// Stash of course materials. Using it freezes the deans for a fixed window,
/// after which they resume. One use per round.
#[derive(Clone, Debug)]
pub struct FreezeCache {
    area: Rect,
    in_range: bool,
    used: bool,
    freeze_remaining: f32,
    freeze_active: bool,
}

impl FreezeCache {
    pub fn new(area: Rect) -> Self {
        Self {
            area,
            in_range: false,
            used: false,
            freeze_remaining: 0.0,
            freeze_active: false,
        }
    }

    pub fn used(&self) -> bool {
        self.used
    }

    pub fn freeze_active(&self) -> bool {
        self.freeze_active
    }

    pub fn prompt_visible(&self) -> bool {
        self.in_range && !self.used
    }

    fn update(&mut self, player: &Player, input: &InputFrame, dt: f32, commands: &mut Vec<EventCommand>) {
        if self.freeze_active {
            self.freeze_remaining -= dt;
            if self.freeze_remaining <= 0.0 {
                self.freeze_active = false;
                commands.push(EventCommand::UnfreezeDeans);
            }
        }
        if self.used {
            return;
        }
        self.in_range = player.bounds().overlaps(&self.area);
        if self.in_range && input.interact {
            self.used = true;
            self.freeze_active = true;
            self.freeze_remaining = FREEZE_CACHE_SECONDS;
            commands.push(EventCommand::FreezeDeans {
                duration: Some(FREEZE_CACHE_SECONDS),
            });
        }
    }
}

/// Every world event the campus map can carry. The orchestrator walks this
/// roster once per tick; adding an event means adding a variant here.
#[derive(Clone, Debug)]
pub enum EventObject {
    Ticket(TicketPickup),
    Locker(LockerBoost),
    Bush(SlowHazard),
    Tree(TimeShift),
    ExtraTime(TimeShift),
    Teleporter(Teleporter),
    Drown(DrownHazard),
    Friend(Npc),
    Quiz(Quiz),
    Materials(FreezeCache),
}

impl EventObject {
    pub fn update(
        &mut self,
        player: &mut Player,
        timer: &mut RunTimer,
        input: &InputFrame,
        rng: &mut Rng,
        dt: f32,
        commands: &mut Vec<EventCommand>,
    ) {
        match self {
            EventObject::Ticket(ticket) => ticket.update(player, input),
            EventObject::Locker(locker) => locker.update(player, input, dt),
            EventObject::Bush(bush) => bush.update(player, dt),
            EventObject::Tree(tree) => tree.update(player, timer, dt),
            EventObject::ExtraTime(clock) => clock.update(player, timer, dt),
            EventObject::Teleporter(pad) => pad.update(player, rng, dt),
            EventObject::Drown(water) => water.update(player, commands),
            EventObject::Friend(npc) => npc.update(player, input),
            EventObject::Quiz(quiz) => quiz.update(player, input, dt, commands),
            EventObject::Materials(cache) => cache.update(player, input, dt, commands),
        }
    }

    /// Whether the event has fired at least once this round.
    pub fn triggered(&self) -> bool {
        match self {
            EventObject::Ticket(ticket) => ticket.collected(),
            EventObject::Locker(locker) => locker.searched(),
            EventObject::Bush(bush) => bush.triggered(),
            EventObject::Tree(shift) | EventObject::ExtraTime(shift) => shift.applied(),
            EventObject::Teleporter(pad) => pad.teleported(),
            EventObject::Drown(_) | EventObject::Friend(_) => false,
            EventObject::Quiz(quiz) => quiz.attempted(),
            EventObject::Materials(cache) => cache.used(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(x: f32, y: f32) -> Player {
        let mut player = Player::at_spawn();
        player.set_position(Vec2::new(x, y));
        player
    }

    #[test]
    fn banner_hides_after_its_duration() {
        let mut banner = Banner::new(2.0);
        banner.show();
        banner.tick(1.5);
        assert!(banner.visible());
        banner.tick(0.6);
        assert!(!banner.visible());
    }

    #[test]
    fn ticket_needs_interact_within_range() {
        let mut ticket = TicketPickup::new(Vec2::new(520.0, 600.0));
        let far = player_at(100.0, 100.0);
        ticket.update(&far, &InputFrame::press_interact());
        assert!(!ticket.collected());

        let near = player_at(525.0, 605.0);
        ticket.update(&near, &InputFrame::idle());
        assert!(ticket.prompt_visible());
        assert!(!ticket.collected());

        ticket.update(&near, &InputFrame::press_interact());
        assert!(ticket.collected());
    }

    #[test]
    fn locker_boost_runs_out() {
        let mut locker = LockerBoost::new(Vec2::new(495.0, 895.0));
        let player = player_at(500.0, 900.0);
        locker.update(&player, &InputFrame::press_interact(), 0.1);
        assert!(locker.searched());
        assert!(locker.boost_active());

        locker.update(&player, &InputFrame::idle(), LOCKER_BOOST_SECONDS);
        assert!(!locker.boost_active());
    }

    #[test]
    fn locker_cannot_be_searched_twice() {
        let mut locker = LockerBoost::new(Vec2::new(495.0, 895.0));
        let player = player_at(500.0, 900.0);
        locker.update(&player, &InputFrame::press_interact(), 0.1);
        locker.update(&player, &InputFrame::idle(), LOCKER_BOOST_SECONDS + 1.0);
        locker.update(&player, &InputFrame::press_interact(), 0.1);
        assert!(!locker.boost_active());
    }

    #[test]
    fn bush_slows_once_then_stays_spent() {
        let mut bush = SlowHazard::new(Rect::new(560.0, 270.0, 32.0, 30.0));
        let inside = player_at(565.0, 275.0);
        bush.update(&inside, 0.1);
        assert!(bush.triggered());
        assert!(bush.slow_active());

        bush.update(&inside, BUSH_SLOW_SECONDS + 1.0);
        assert!(!bush.slow_active());

        // walking back in does nothing
        bush.update(&inside, 0.1);
        assert!(!bush.slow_active());
    }

    #[test]
    fn time_shift_applies_exactly_once() {
        let mut timer = RunTimer::new(100.0);
        let mut tree = TimeShift::new(Rect::new(270.0, 9.0, 56.0, 56.0), -30.0);
        let inside = player_at(280.0, 20.0);
        tree.update(&inside, &mut timer, 0.1);
        assert_eq!(timer.remaining(), 70.0);
        tree.update(&inside, &mut timer, 0.1);
        assert_eq!(timer.remaining(), 70.0);
    }

    #[test]
    fn teleporter_moves_player_after_countdown() {
        let mut pad = Teleporter::new(Rect::new(800.0, 620.0, 32.0, 48.0));
        let mut rng = Rng::new(7);
        let mut player = player_at(805.0, 630.0);
        pad.update(&mut player, &mut rng, 0.1);
        assert!(pad.countdown_active());
        assert!(!pad.teleported());

        pad.update(&mut player, &mut rng, TELEPORT_COUNTDOWN_SECONDS);
        assert!(pad.teleported());
        assert!(pad.flash_active());
        assert!(
            TELEPORT_SAFE_SPOTS.contains(&player.position()),
            "player landed at {:?}",
            player.position()
        );

        pad.update(&mut player, &mut rng, TELEPORT_FLASH_SECONDS + 0.1);
        assert!(!pad.flash_active());
    }

    #[test]
    fn teleporter_fires_only_once() {
        let mut pad = Teleporter::new(Rect::new(800.0, 620.0, 32.0, 48.0));
        let mut rng = Rng::new(7);
        let mut player = player_at(805.0, 630.0);
        pad.update(&mut player, &mut rng, TELEPORT_COUNTDOWN_SECONDS + 1.0);
        pad.update(&mut player, &mut rng, TELEPORT_COUNTDOWN_SECONDS + 1.0);
        assert!(pad.teleported());

        let landed = player.position();
        player.set_position(Vec2::new(805.0, 630.0));
        pad.update(&mut player, &mut rng, TELEPORT_COUNTDOWN_SECONDS + 1.0);
        assert_eq!(player.position(), Vec2::new(805.0, 630.0));
        let _ = landed;
    }

    #[test]
    fn drown_respawns_and_reports_every_time() {
        let mut water = DrownHazard::new(vec![Rect::new(96.0, 96.0, 96.0, 64.0)]);
        let mut commands = Vec::new();

        let mut player = player_at(100.0, 100.0);
        water.update(&mut player, &mut commands);
        assert_eq!(player.position(), DROWN_RESPAWN);
        assert_eq!(commands, vec![EventCommand::PlayerDrowned]);

        player.set_position(Vec2::new(100.0, 100.0));
        water.update(&mut player, &mut commands);
        assert_eq!(commands.len(), 2);
    }

    #[test]
    fn npc_hint_shows_on_interact_and_hides_when_walking_away() {
        let mut npc = Npc::new(Vec2::new(560.0, 600.0));
        let near = player_at(565.0, 605.0);
        npc.update(&near, &InputFrame::idle());
        assert!(npc.prompt_visible());
        assert!(!npc.message_visible());

        npc.update(&near, &InputFrame::press_interact());
        assert!(npc.message_visible());

        // between the two radii the message stays up
        let edge = player_at(560.0, 655.0);
        npc.update(&edge, &InputFrame::idle());
        assert!(npc.message_visible());

        let far = player_at(560.0, 665.0);
        npc.update(&far, &InputFrame::idle());
        assert!(!npc.message_visible());
    }

    #[test]
    fn npc_hint_can_be_asked_for_again() {
        let mut npc = Npc::new(Vec2::new(560.0, 600.0));
        let near = player_at(565.0, 605.0);
        npc.update(&near, &InputFrame::press_interact());
        npc.update(&player_at(700.0, 700.0), &InputFrame::idle());
        assert!(!npc.message_visible());

        npc.update(&near, &InputFrame::press_interact());
        assert!(npc.message_visible());
    }

    #[test]
    fn quiz_correct_answer_freezes_deans_for_good() {
        let mut quiz = Quiz::new(Rect::new(400.0, 416.0, 64.0, 64.0));
        let player = player_at(410.0, 420.0);
        let mut commands = Vec::new();

        quiz.update(&player, &InputFrame::press_interact(), 0.1, &mut commands);
        assert!(quiz.open());
        assert!(commands.is_empty());

        quiz.update(&player, &InputFrame::answer(QuizAnswer::C), 0.1, &mut commands);
        assert!(!quiz.open());
        assert!(quiz.attempted());
        assert!(quiz.answered_correctly());
        assert_eq!(commands, vec![EventCommand::FreezeDeans { duration: None }]);
    }

    #[test]
    fn quiz_wrong_answer_spawns_extra_patrol() {
        let mut quiz = Quiz::new(Rect::new(400.0, 416.0, 64.0, 64.0));
        let player = player_at(410.0, 420.0);
        let mut commands = Vec::new();

        quiz.update(&player, &InputFrame::press_interact(), 0.1, &mut commands);
        quiz.update(&player, &InputFrame::answer(QuizAnswer::B), 0.1, &mut commands);
        assert!(quiz.attempted());
        assert!(!quiz.answered_correctly());
        assert_eq!(commands, vec![EventCommand::SpawnExtraPatrol]);
    }

    #[test]
    fn quiz_allows_a_single_attempt() {
        let mut quiz = Quiz::new(Rect::new(400.0, 416.0, 64.0, 64.0));
        let player = player_at(410.0, 420.0);
        let mut commands = Vec::new();

        quiz.update(&player, &InputFrame::press_interact(), 0.1, &mut commands);
        quiz.update(&player, &InputFrame::answer(QuizAnswer::A), 0.1, &mut commands);
        commands.clear();

        quiz.update(&player, &InputFrame::press_interact(), 0.1, &mut commands);
        assert!(!quiz.open());
        assert!(commands.is_empty());
    }

    #[test]
    fn materials_freeze_expires_and_stays_spent() {
        let mut cache = FreezeCache::new(Rect::new(112.0, 512.0, 48.0, 48.0));
        let player = player_at(120.0, 520.0);
        let mut commands = Vec::new();

        cache.update(&player, &InputFrame::press_interact(), 0.1, &mut commands);
        assert!(cache.used());
        assert!(cache.freeze_active());
        assert_eq!(
            commands,
            vec![EventCommand::FreezeDeans {
                duration: Some(FREEZE_CACHE_SECONDS)
            }]
        );

        commands.clear();
        cache.update(&player, &InputFrame::idle(), FREEZE_CACHE_SECONDS + 0.1, &mut commands);
        assert!(!cache.freeze_active());
        assert_eq!(commands, vec![EventCommand::UnfreezeDeans]);

        commands.clear();
        cache.update(&player, &InputFrame::press_interact(), 0.1, &mut commands);
        assert!(commands.is_empty());
    }

    #[test]
    fn roster_dispatch_reaches_each_variant() {
        let mut timer = RunTimer::new(300.0);
        let mut rng = Rng::new(1);
        let mut commands = Vec::new();
        let mut player = player_at(565.0, 275.0);
        let mut bush = EventObject::Bush(SlowHazard::new(Rect::new(560.0, 270.0, 32.0, 30.0)));
        bush.update(
            &mut player,
            &mut timer,
            &InputFrame::idle(),
            &mut rng,
            0.1,
            &mut commands,
        );
        assert!(bush.triggered());
    }
}
