use campus_chase::constants::{
    PLAYER_SIZE, TICK_RATE, TICK_SECONDS, TILE_SIZE, WORLD_TILES,
};
use campus_chase::engine::{GameEngine, GameOptions};
use campus_chase::input::InputFrame;
use campus_chase::rng::Rng;
use campus_chase::types::{EndReason, Vec2};
use clap::Parser;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const TICKET_TARGET: Vec2 = Vec2::new(520.0, 600.0);
const BUS_TARGET: Vec2 = Vec2::new(884.0, 888.0);

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Run a single custom scenario instead of the default battery.
    #[arg(long)]
    single: bool,
    #[arg(long)]
    minutes: Option<i32>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    policy: Option<String>,
    #[arg(long)]
    player_name: Option<String>,
    #[arg(long)]
    run_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
    /// Persist winning scores to this leaderboard file.
    #[arg(long)]
    leaderboard: Option<PathBuf>,
}

/// How the scripted bot plays a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Policy {
    /// Stands still until the clock runs out.
    Idle,
    /// Random walk with occasional interact presses.
    Wander,
    /// Beeline to the bus ticket, then to the bus.
    TicketRun,
}

impl Policy {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "idle" => Some(Self::Idle),
            "wander" => Some(Self::Wander),
            "ticket-run" | "ticket_run" => Some(Self::TicketRun),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
struct Scenario {
    name: String,
    policy: Policy,
    minutes: i32,
    seed: u32,
    /// Run the scenario twice and flag any divergence.
    replay_check: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioResultLine {
    scenario: String,
    policy: Policy,
    seed: u32,
    minutes: i32,
    reason: EndReason,
    ticks: u64,
    final_score: i32,
    time_score: i32,
    total_penalty: i32,
    dean_catches: i32,
    patrol_catches: i32,
    drownings: i32,
    ticket_collected: bool,
    achievement_count: usize,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug)]
struct ScenarioRunResult {
    result: ScenarioResultLine,
    anomaly_records: Vec<AnomalyRecord>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimSummary {
    run_id: String,
    started_at_ms: u64,
    finished_at_ms: u64,
    scenario_count: usize,
    anomaly_count: usize,
    reason_counts: BTreeMap<String, usize>,
    scenarios: Vec<ScenarioResultLine>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StructuredLogLine {
    timestamp_ms: u64,
    level: String,
    event: String,
    run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    scenario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tick: Option<u64>,
    details: Value,
}

fn main() {
    let cli = Cli::parse();
    let scenarios = resolve_scenarios(&cli);
    let run_started_at_ms = now_ms();
    let seed_hint = scenarios.first().map(|scenario| scenario.seed).unwrap_or(0);
    let run_id = cli
        .run_id
        .clone()
        .unwrap_or_else(|| default_run_id(seed_hint, run_started_at_ms));

    let mut has_anomaly = false;
    let mut scenario_results = Vec::new();
    let mut reason_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_anomalies = 0usize;

    for scenario in scenarios {
        emit_log(
            "info",
            "scenario_started",
            &run_id,
            Some(&scenario.name),
            Some(scenario.seed),
            None,
            json!({
                "policy": scenario.policy,
                "minutes": scenario.minutes,
                "replayCheck": scenario.replay_check,
            }),
        );
        let scenario_run = run_scenario(&scenario, cli.leaderboard.clone(), &cli);

        for anomaly in &scenario_run.anomaly_records {
            emit_log(
                "warn",
                "anomaly_detected",
                &run_id,
                Some(&scenario.name),
                Some(scenario.seed),
                Some(anomaly.tick),
                json!({ "message": anomaly.message }),
            );
        }
        if !scenario_run.result.anomalies.is_empty() {
            has_anomaly = true;
        }
        total_anomalies += scenario_run.anomaly_records.len();
        *reason_counts
            .entry(end_reason_key(scenario_run.result.reason))
            .or_insert(0) += 1;

        emit_log(
            "info",
            "scenario_finished",
            &run_id,
            Some(&scenario.name),
            Some(scenario.seed),
            Some(scenario_run.result.ticks),
            json!({
                "reason": scenario_run.result.reason,
                "finalScore": scenario_run.result.final_score,
                "anomalyCount": scenario_run.anomaly_records.len(),
            }),
        );

        println!(
            "{}",
            serde_json::to_string(&scenario_run.result).expect("scenario result should serialize")
        );
        scenario_results.push(scenario_run.result);
    }

    let run_finished_at_ms = now_ms();
    let summary = SimSummary {
        run_id: run_id.clone(),
        started_at_ms: run_started_at_ms,
        finished_at_ms: run_finished_at_ms,
        scenario_count: scenario_results.len(),
        anomaly_count: total_anomalies,
        reason_counts,
        scenarios: scenario_results,
    };

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                &run_id,
                None,
                None,
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "run_finished",
        &run_id,
        None,
        None,
        None,
        json!({
            "scenarioCount": summary.scenario_count,
            "anomalyCount": summary.anomaly_count,
            "reasonCounts": summary.reason_counts,
            "summaryOut": summary_out_written,
        }),
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn run_scenario(
    scenario: &Scenario,
    leaderboard_path: Option<PathBuf>,
    cli: &Cli,
) -> ScenarioRunResult {
    let player_name = cli
        .player_name
        .clone()
        .unwrap_or_else(|| format!("Bot-{}", scenario.seed % 1000));

    let (episode, anomaly_records, mut anomalies) =
        run_episode(scenario, leaderboard_path, &player_name);

    if scenario.replay_check {
        let (replay, _, _) = run_episode(scenario, None, &player_name);
        if replay.final_player.to_bits_pair() != episode.final_player.to_bits_pair()
            || replay.final_score != episode.final_score
        {
            anomalies.push(format!(
                "replay divergence: ({:?}, {}) vs ({:?}, {})",
                episode.final_player, episode.final_score, replay.final_player, replay.final_score
            ));
        }
    }

    ScenarioRunResult {
        result: ScenarioResultLine {
            scenario: scenario.name.clone(),
            policy: scenario.policy,
            seed: scenario.seed,
            minutes: scenario.minutes,
            reason: episode.reason,
            ticks: episode.ticks,
            final_score: episode.final_score,
            time_score: episode.time_score,
            total_penalty: episode.total_penalty,
            dean_catches: episode.dean_catches,
            patrol_catches: episode.patrol_catches,
            drownings: episode.drownings,
            ticket_collected: episode.ticket_collected,
            achievement_count: episode.achievement_count,
            anomalies,
        },
        anomaly_records,
    }
}

#[derive(Clone, Debug)]
struct EpisodeOutcome {
    reason: EndReason,
    ticks: u64,
    final_score: i32,
    time_score: i32,
    total_penalty: i32,
    dean_catches: i32,
    patrol_catches: i32,
    drownings: i32,
    ticket_collected: bool,
    achievement_count: usize,
    final_player: PositionBits,
}

#[derive(Clone, Copy, Debug)]
struct PositionBits {
    x: f32,
    y: f32,
}

impl PositionBits {
    fn to_bits_pair(self) -> (u32, u32) {
        (self.x.to_bits(), self.y.to_bits())
    }
}

fn run_episode(
    scenario: &Scenario,
    leaderboard_path: Option<PathBuf>,
    player_name: &str,
) -> (EpisodeOutcome, Vec<AnomalyRecord>, Vec<String>) {
    let mut engine = GameEngine::new(GameOptions {
        seed: scenario.seed,
        player_name: player_name.to_string(),
        time_limit_override: Some(scenario.minutes as f32 * 60.0),
        leaderboard_path,
    });
    // the bot's own dice, separate from the engine's draw stream
    let mut bot_rng = Rng::new(scenario.seed ^ 0x5eed);
    let mut wander_frame = InputFrame::idle();

    let mut anomalies = Vec::new();
    let mut anomaly_records = Vec::new();
    let mut anomaly_seen = HashSet::new();
    let mut tick = 0u64;
    // extra time pickup can stretch the round past the configured limit
    let tick_safety = (scenario.minutes as u64 * 60 + 120) * TICK_RATE as u64;

    while !engine.is_ended() {
        tick += 1;
        let frame = next_frame(scenario.policy, &engine, &mut bot_rng, &mut wander_frame, tick);
        engine.step(TICK_SECONDS, &frame);

        for message in collect_tick_anomalies(&engine, scenario.minutes) {
            push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                tick,
                message,
            );
        }
        if tick > tick_safety {
            push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                tick,
                "tick safety limit exceeded".to_string(),
            );
            break;
        }
    }

    let position = engine.player().position();
    let outcome = match engine.summary() {
        Some(summary) => EpisodeOutcome {
            reason: summary.reason,
            ticks: engine.ticks(),
            final_score: summary.final_score,
            time_score: summary.time_score,
            total_penalty: summary.total_penalty,
            dean_catches: summary.stats.caught_by_dean,
            patrol_catches: summary.stats.caught_by_patrol,
            drownings: summary.stats.times_drowned,
            ticket_collected: summary.stats.ticket_collected,
            achievement_count: summary.achievements.len(),
            final_player: PositionBits {
                x: position.x,
                y: position.y,
            },
        },
        None => {
            push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                tick,
                "run ended without a summary".to_string(),
            );
            EpisodeOutcome {
                reason: EndReason::TimeUp,
                ticks: engine.ticks(),
                final_score: 0,
                time_score: 0,
                total_penalty: 0,
                dean_catches: 0,
                patrol_catches: 0,
                drownings: 0,
                ticket_collected: false,
                achievement_count: 0,
                final_player: PositionBits {
                    x: position.x,
                    y: position.y,
                },
            }
        }
    };
    (outcome, anomaly_records, anomalies)
}

fn next_frame(
    policy: Policy,
    engine: &GameEngine,
    bot_rng: &mut Rng,
    wander_frame: &mut InputFrame,
    tick: u64,
) -> InputFrame {
    match policy {
        Policy::Idle => InputFrame::idle(),
        Policy::Wander => {
            if tick % 30 == 1 {
                let mut frame = InputFrame::idle();
                match bot_rng.int(0, 3) {
                    0 => frame.up = true,
                    1 => frame.down = true,
                    2 => frame.left = true,
                    _ => frame.right = true,
                }
                frame.interact = bot_rng.int(0, 9) == 0;
                *wander_frame = frame;
            }
            *wander_frame
        }
        Policy::TicketRun => {
            let target = if engine.ticket_collected() {
                BUS_TARGET
            } else {
                TICKET_TARGET
            };
            seek(engine.player().position(), target)
        }
    }
}

/// Greedy per-axis movement toward a target, interacting once close.
fn seek(from: Vec2, target: Vec2) -> InputFrame {
    let mut frame = InputFrame::idle();
    let dx = target.x - from.x;
    let dy = target.y - from.y;
    if dx > 2.0 {
        frame.right = true;
    } else if dx < -2.0 {
        frame.left = true;
    }
    if dy > 2.0 {
        frame.down = true;
    } else if dy < -2.0 {
        frame.up = true;
    }
    if from.distance(target) < 20.0 {
        frame.interact = true;
    }
    frame
}

fn collect_tick_anomalies(engine: &GameEngine, minutes: i32) -> Vec<String> {
    let mut anomalies = Vec::new();
    let world_side = WORLD_TILES as f32 * TILE_SIZE;

    let player = engine.player().position();
    if !in_world(player, world_side) {
        anomalies.push(format!("player escaped the map: {player:?}"));
    }
    for dean in engine.deans() {
        if !in_world(dean.position(), world_side) {
            anomalies.push(format!("dean escaped the map: {:?}", dean.position()));
        }
    }
    for patrol in engine.patrols() {
        let (min_y, max_y) = patrol.route_bounds();
        let y = patrol.position().y;
        if y < min_y || y > max_y {
            anomalies.push(format!(
                "patrol outside its route: y={y} not in [{min_y}, {max_y}]"
            ));
        }
    }

    let time_left = engine.time_left();
    // one extra-time pickup is the only legitimate way past the limit
    let ceiling = minutes as f32 * 60.0 + 30.0 + 1.0;
    if !time_left.is_finite() || time_left > ceiling {
        anomalies.push(format!("timer out of range: {time_left}"));
    }
    anomalies
}

fn in_world(position: Vec2, world_side: f32) -> bool {
    position.x >= 0.0
        && position.y >= 0.0
        && position.x + PLAYER_SIZE <= world_side
        && position.y + PLAYER_SIZE <= world_side
}

fn resolve_scenarios(cli: &Cli) -> Vec<Scenario> {
    let seed = normalize_seed(cli.seed.unwrap_or_else(now_ms));
    let policy = cli
        .policy
        .as_deref()
        .and_then(Policy::parse)
        .unwrap_or(Policy::Wander);

    if cli.single || cli.minutes.is_some() || cli.policy.is_some() {
        let minutes = cli.minutes.unwrap_or(2).clamp(1, 10);
        return vec![Scenario {
            name: format!("custom-{}", policy_key(policy)),
            policy,
            minutes,
            seed,
            replay_check: false,
        }];
    }

    vec![
        Scenario {
            name: "idle-timeout".to_string(),
            policy: Policy::Idle,
            minutes: 1,
            seed,
            replay_check: false,
        },
        Scenario {
            name: "wander-replay".to_string(),
            policy: Policy::Wander,
            minutes: 2,
            seed: normalize_seed(seed as u64 + 1),
            replay_check: true,
        },
        Scenario {
            name: "ticket-run".to_string(),
            policy: Policy::TicketRun,
            minutes: 3,
            seed: normalize_seed(seed as u64 + 2),
            replay_check: false,
        },
    ]
}

fn policy_key(policy: Policy) -> &'static str {
    match policy {
        Policy::Idle => "idle",
        Policy::Wander => "wander",
        Policy::TicketRun => "ticket-run",
    }
}

fn end_reason_key(reason: EndReason) -> String {
    match reason {
        EndReason::Win => "win",
        EndReason::TimeUp => "time_up",
        EndReason::Quit => "quit",
    }
    .to_string()
}

fn normalize_seed(seed: u64) -> u32 {
    seed as u32
}

fn push_anomaly(
    anomalies: &mut Vec<String>,
    anomaly_records: &mut Vec<AnomalyRecord>,
    anomaly_seen: &mut HashSet<String>,
    tick: u64,
    message: String,
) {
    anomaly_records.push(AnomalyRecord {
        tick,
        message: message.clone(),
    });
    if anomaly_seen.insert(message.clone()) {
        anomalies.push(message);
    }
}

fn default_run_id(seed: u32, timestamp_ms: u64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn emit_log(
    level: &str,
    event: &str,
    run_id: &str,
    scenario: Option<&str>,
    seed: Option<u32>,
    tick: Option<u64>,
    details: Value,
) {
    let log_line = StructuredLogLine {
        timestamp_ms: now_ms(),
        level: level.to_string(),
        event: event.to_string(),
        run_id: run_id.to_string(),
        scenario: scenario.map(|value| value.to_string()),
        seed,
        tick,
        details,
    };
    eprintln!(
        "{}",
        serde_json::to_string(&log_line).expect("structured log should serialize")
    );
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn write_summary(path: &Path, summary: &SimSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).expect("sim summary should serialize");
    std::fs::write(path, summary_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_run_id_contains_seed_and_timestamp() {
        assert_eq!(default_run_id(42, 123456789), "sim-42-123456789");
    }

    #[test]
    fn seek_presses_toward_the_target() {
        let frame = seek(Vec2::new(100.0, 100.0), Vec2::new(300.0, 50.0));
        assert!(frame.right);
        assert!(frame.up);
        assert!(!frame.interact);
    }

    #[test]
    fn seek_interacts_when_close() {
        let frame = seek(Vec2::new(100.0, 100.0), Vec2::new(105.0, 100.0));
        assert!(frame.interact);
    }

    #[test]
    fn idle_bot_times_out_without_anomalies() {
        let scenario = Scenario {
            name: "test-idle".to_string(),
            policy: Policy::Idle,
            minutes: 1,
            seed: 7,
            replay_check: false,
        };
        let (outcome, records, anomalies) = run_episode(&scenario, None, "Bot");
        assert_eq!(outcome.reason, EndReason::TimeUp);
        assert!(records.is_empty(), "anomalies: {anomalies:?}");
    }

    #[test]
    fn ticket_run_bot_wins() {
        let scenario = Scenario {
            name: "test-ticket".to_string(),
            policy: Policy::TicketRun,
            minutes: 3,
            seed: 11,
            replay_check: false,
        };
        let (outcome, records, _) = run_episode(&scenario, None, "Bot");
        assert_eq!(outcome.reason, EndReason::Win);
        assert!(outcome.ticket_collected);
        assert!(outcome.final_score > 0);
        assert!(records.is_empty());
    }

    #[test]
    fn wander_bot_replays_identically() {
        let scenario = Scenario {
            name: "test-replay".to_string(),
            policy: Policy::Wander,
            minutes: 1,
            seed: 23,
            replay_check: false,
        };
        let (first, _, _) = run_episode(&scenario, None, "Bot");
        let (second, _, _) = run_episode(&scenario, None, "Bot");
        assert_eq!(
            first.final_player.to_bits_pair(),
            second.final_player.to_bits_pair()
        );
        assert_eq!(first.final_score, second.final_score);
    }

    #[test]
    fn push_anomaly_keeps_records_and_deduplicates_messages() {
        let mut anomalies = Vec::new();
        let mut records = Vec::new();
        let mut seen = HashSet::new();
        push_anomaly(&mut anomalies, &mut records, &mut seen, 4, "same".to_string());
        push_anomaly(&mut anomalies, &mut records, &mut seen, 5, "same".to_string());
        assert_eq!(anomalies.len(), 1);
        assert_eq!(records.len(), 2);
    }
}
