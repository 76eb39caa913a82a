//! Fixed timestep simulation tick
//!
//! Round controller: consumes the coalesced commands for one tick and moves
//! the session through Menu -> Playing -> Lost -> (restart) Playing, or to
//! Terminated on quit.

use serde::Serialize;

use super::collision::{Boundary, out_of_bounds};
use super::state::{GameEvent, GamePhase, GameState, LossCause};

/// A single command from the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Command {
    Jump,
    Start,
    Restart,
    Quit,
}

impl Command {
    /// Parse a command name; unknown names yield `None` and are ignored
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "jump" | "flap" => Some(Command::Jump),
            "start" => Some(Command::Start),
            "restart" => Some(Command::Restart),
            "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Input commands for a single tick (deterministic)
///
/// Only "was it seen since the last tick" matters; repeats collapse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickInput {
    pub jump: bool,
    pub start: bool,
    pub restart: bool,
    pub quit: bool,
    /// Demo mode - the sim decides when to flap
    pub autopilot: bool,
}

impl TickInput {
    /// Fold one command into this tick's input
    pub fn record(&mut self, command: Command) {
        match command {
            Command::Jump => self.jump = true,
            Command::Start => self.start = true,
            Command::Restart => self.restart = true,
            Command::Quit => self.quit = true,
        }
    }

    pub fn from_commands(commands: impl IntoIterator<Item = Command>) -> Self {
        let mut input = Self::default();
        for command in commands {
            input.record(command);
        }
        input
    }

    /// Parse one line of command names separated by whitespace or commas.
    /// Unknown names are logged and skipped; an empty line is an idle tick.
    pub fn from_line(line: &str) -> Self {
        let mut input = Self::default();
        for word in line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|w| !w.is_empty())
        {
            match Command::parse(word) {
                Some(command) => input.record(command),
                None => log::warn!("Ignoring unknown command {word:?}"),
            }
        }
        input
    }

    /// Clear one-shot commands after a tick consumed them
    pub fn clear_commands(&mut self) {
        self.jump = false;
        self.start = false;
        self.restart = false;
        self.quit = false;
    }
}

/// Advance the session by one tick and return the phase afterwards
pub fn tick(state: &mut GameState, input: &TickInput) -> GamePhase {
    state.events.clear();

    if state.phase == GamePhase::Terminated {
        return state.phase;
    }

    if input.quit {
        log::info!("Quit requested during {:?}", state.phase);
        state.phase = GamePhase::Terminated;
        state.events.push(GameEvent::Quit);
        return state.phase;
    }

    match state.phase {
        GamePhase::Menu => {
            if input.start {
                state.round += 1;
                state.phase = GamePhase::Playing;
                state.events.push(GameEvent::Started);
                log::info!("Round {} started (seed {})", state.round, state.seed);
            }
        }
        GamePhase::Playing => step_round(state, input),
        GamePhase::Lost => {
            if input.restart {
                state.reset_round();
                state.round += 1;
                state.phase = GamePhase::Playing;
                state.events.push(GameEvent::Restarted);
                log::info!("Round {} started after restart", state.round);
            }
        }
        GamePhase::Terminated => {}
    }

    state.phase
}

/// One Playing tick: flap, move everything, collide, score
fn step_round(state: &mut GameState, input: &TickInput) {
    let jump = input.jump || (input.autopilot && autopilot_wants_jump(state));
    if jump {
        state.bird.jump(&state.config);
        state.events.push(GameEvent::Flapped);
    }

    state.bird.advance(&state.config);
    state.bird.animate(&state.config);
    state.ground.advance(&state.config);

    let outcome = state
        .pipes
        .advance_all(&state.bird, &state.sprites, &state.config, &mut state.rng);
    state.ticks += 1;

    let mut causes: Vec<LossCause> = outcome
        .hits
        .iter()
        .map(|&pipe_id| LossCause::Pipe { pipe_id })
        .collect();

    let base_score = state.pipes.score - outcome.passed.len() as u32;
    for (i, &pipe_id) in outcome.passed.iter().enumerate() {
        state.events.push(GameEvent::Scored {
            pipe_id,
            score: base_score + i as u32 + 1,
        });
    }
    for &pipe_id in &outcome.removed {
        state.events.push(GameEvent::PipeRemoved { pipe_id });
    }
    for &pipe_id in &outcome.spawned {
        state.events.push(GameEvent::PipeSpawned { pipe_id });
    }

    match out_of_bounds(state.bird.y, state.bird_frame_height(), state.config.floor) {
        Some(Boundary::Floor) => causes.push(LossCause::Floor),
        Some(Boundary::Ceiling) => causes.push(LossCause::Ceiling),
        None => {}
    }

    if let Some(&first) = causes.first() {
        for &cause in &causes {
            state.events.push(GameEvent::Crashed { cause });
        }
        state.loss = Some(first);
        state.phase = GamePhase::Lost;
        log::info!(
            "Round {} lost at tick {} ({:?}), score {}",
            state.round,
            state.ticks,
            first,
            state.pipes.score
        );
    }
}

/// Margin below the gap center before the autopilot flaps
const AUTOPILOT_SLACK: f64 = 20.0;

/// Demo heuristic: flap while falling below the next gap's center, or when
/// the floor is one terminal fall away
fn autopilot_wants_jump(state: &GameState) -> bool {
    let config = &state.config;
    let bird = &state.bird;
    if !bird.is_falling(config) {
        return false;
    }

    let frame_height = state.bird_frame_height() as f64;
    if bird.y + frame_height + config.terminal_displacement >= config.floor as f64 {
        return true;
    }

    let target = state
        .pipes
        .next_ahead(bird, &state.sprites)
        .map(|p| (p.height + config.pipe_gap / 2) as f64)
        .unwrap_or(config.floor as f64 / 2.0);

    bird.y + frame_height / 2.0 > target + AUTOPILOT_SLACK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn start() -> TickInput {
        TickInput::from_commands([Command::Start])
    }

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(GameConfig::default(), seed);
        tick(&mut state, &start());
        state
    }

    #[test]
    fn test_menu_waits_for_start() {
        let mut state = GameState::new(GameConfig::default(), 12345);
        assert_eq!(state.phase, GamePhase::Menu);

        let y = state.bird.y;
        let pipe_x = state.pipes.pipes[0].x;
        let input = TickInput::from_commands([Command::Jump]);
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.bird.y, y);
        assert_eq!(state.pipes.pipes[0].x, pipe_x);

        assert_eq!(tick(&mut state, &start()), GamePhase::Playing);
        assert_eq!(state.events, vec![GameEvent::Started]);
        // The start tick itself does not move anything
        assert_eq!(state.bird.y, y);
        assert_eq!(state.ticks, 0);
    }

    #[test]
    fn test_free_fall_hits_floor_on_tick_23() {
        let mut state = playing_state(1);
        let idle = TickInput::default();
        for _ in 0..22 {
            assert_eq!(tick(&mut state, &idle), GamePhase::Playing);
        }
        assert_eq!(state.bird.y, 675.0);
        assert_eq!(tick(&mut state, &idle), GamePhase::Lost);
        assert_eq!(state.ticks, 23);
        assert_eq!(state.bird.y, 691.0);
        assert_eq!(state.loss, Some(LossCause::Floor));
        assert!(state.events.contains(&GameEvent::Crashed { cause: LossCause::Floor }));
    }

    #[test]
    fn test_lost_is_frozen() {
        let mut state = playing_state(1);
        let idle = TickInput::default();
        while tick(&mut state, &idle) == GamePhase::Playing {}
        let y = state.bird.y;
        let ground = state.ground.x1;
        let jump = TickInput::from_commands([Command::Jump, Command::Start]);
        for _ in 0..5 {
            assert_eq!(tick(&mut state, &jump), GamePhase::Lost);
        }
        assert_eq!(state.bird.y, y);
        assert_eq!(state.ground.x1, ground);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_restart_resets_round() {
        let mut state = playing_state(9);
        let idle = TickInput::default();
        // Fake some progress so the reset is observable
        state.pipes.score = 4;
        while tick(&mut state, &idle) == GamePhase::Playing {}

        let restart = TickInput::from_commands([Command::Restart]);
        assert_eq!(tick(&mut state, &restart), GamePhase::Playing);
        assert_eq!(state.events, vec![GameEvent::Restarted]);
        assert_eq!(state.round, 2);
        assert_eq!(state.score(), 0);
        assert_eq!(state.ticks, 0);
        assert_eq!(state.loss, None);
        assert_eq!(state.bird.x, 230);
        assert_eq!(state.bird.y, 350.0);
        assert_eq!(state.bird.tilt, 0.0);
        assert_eq!(state.pipes.len(), 1);
        assert_eq!(state.pipes.pipes[0].x, 700.0);
        assert_eq!(state.ground.x1, 0.0);
    }

    #[test]
    fn test_quit_from_any_phase() {
        let quit = TickInput::from_commands([Command::Quit, Command::Start]);

        let mut state = GameState::new(GameConfig::default(), 1);
        assert_eq!(tick(&mut state, &quit), GamePhase::Terminated);
        assert_eq!(state.events, vec![GameEvent::Quit]);

        let mut state = playing_state(1);
        let y = state.bird.y;
        assert_eq!(tick(&mut state, &quit), GamePhase::Terminated);
        // Quit does not run the rest of the tick
        assert_eq!(state.bird.y, y);

        // Terminated stays terminated
        assert_eq!(tick(&mut state, &start()), GamePhase::Terminated);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_jump_flaps_bird() {
        let mut state = playing_state(3);
        let jump = TickInput::from_commands([Command::Jump, Command::Jump]);
        tick(&mut state, &jump);
        assert_eq!(state.events.iter().filter(|e| **e == GameEvent::Flapped).count(), 1);
        assert_eq!(state.bird.y, 339.0);
        assert_eq!(state.bird.tilt, 25.0);
    }

    #[test]
    fn test_pipe_pass_scores_and_spawns() {
        let mut state = playing_state(5);
        // One pipe just right of the bird; a single flap keeps it between
        // y=254 and y=339, inside the 220..420 gap
        state.pipes = crate::sim::PipeStream::empty();
        let id = state
            .pipes
            .spawn_with_height(240.0, 220, &state.config, &state.sprites);

        let mut scored = None;
        for t in 0..7 {
            let input = TickInput {
                jump: t == 0,
                ..Default::default()
            };
            tick(&mut state, &input);
            assert_eq!(state.phase, GamePhase::Playing, "tick {t}: {:?}", state.events);
            if let Some(GameEvent::Scored { pipe_id, score }) = state
                .events
                .iter()
                .find(|e| matches!(e, GameEvent::Scored { .. }))
            {
                scored = Some((*pipe_id, *score));
                assert!(state.events.iter().any(|e| matches!(e, GameEvent::PipeSpawned { .. })));
            }
        }
        assert_eq!(scored, Some((id, 1)));
        assert_eq!(state.score(), 1);
        assert_eq!(state.pipes.len(), 2);
        assert!(state.pipes.get(id).unwrap().passed);
    }

    #[test]
    fn test_bird_at_ceiling_in_pipe_loses() {
        let mut state = playing_state(5);
        state.pipes = crate::sim::PipeStream::empty();
        let id = state
            .pipes
            .spawn_with_height(235.0, 250, &state.config, &state.sprites);
        state.bird.y = 10.0;
        state.bird.vel = -10.5;
        state.bird.tick_count = 0;
        // Rises 11 px to y=-1: both the pipe and the ceiling are hit
        assert_eq!(tick(&mut state, &TickInput::default()), GamePhase::Lost);
        assert_eq!(state.loss, Some(LossCause::Pipe { pipe_id: id }));
        assert!(state.events.contains(&GameEvent::Crashed { cause: LossCause::Ceiling }));
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput::default(),
            TickInput {
                autopilot: true,
                ..Default::default()
            },
        ];
        let mut a = playing_state(99999);
        let mut b = playing_state(99999);
        for i in 0..600 {
            let input = &inputs[i % 2];
            tick(&mut a, input);
            tick(&mut b, input);
            if a.phase == GamePhase::Lost {
                let restart = TickInput::from_commands([Command::Restart]);
                tick(&mut a, &restart);
                tick(&mut b, &restart);
            }
        }
        assert_eq!(a.bird.y, b.bird.y);
        assert_eq!(a.score(), b.score());
        assert_eq!(a.round, b.round);
        let gaps_a: Vec<i32> = a.pipes.pipes.iter().map(|p| p.height).collect();
        let gaps_b: Vec<i32> = b.pipes.pipes.iter().map(|p| p.height).collect();
        assert_eq!(gaps_a, gaps_b);
    }

    #[test]
    fn test_autopilot_flaps_before_floor() {
        let mut state = playing_state(11);
        state.pipes = crate::sim::PipeStream::empty();
        let autopilot = TickInput {
            autopilot: true,
            ..Default::default()
        };
        // No pipes: it must keep the bird off the floor indefinitely
        for _ in 0..300 {
            assert_eq!(tick(&mut state, &autopilot), GamePhase::Playing);
        }
    }

    #[test]
    fn test_command_parse_ignores_unknown() {
        assert_eq!(Command::parse("Jump"), Some(Command::Jump));
        assert_eq!(Command::parse(" quit "), Some(Command::Quit));
        assert_eq!(Command::parse("teleport"), None);
        let input = TickInput::from_commands(["jump", "bogus", "jump"].iter().filter_map(|s| Command::parse(s)));
        assert_eq!(
            input,
            TickInput {
                jump: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_from_line_skips_unknown_names() {
        let input = TickInput::from_line("flap, warp  START\tjump");
        assert_eq!(
            input,
            TickInput {
                jump: true,
                start: true,
                ..Default::default()
            }
        );
        assert_eq!(TickInput::from_line(""), TickInput::default());
        assert_eq!(TickInput::from_line("noclip"), TickInput::default());
    }

    #[test]
    fn test_scripted_lines_drive_a_round() {
        let mut state = GameState::new(GameConfig::default(), 4);
        let script = ["start", "", "jump", "", "quit"];
        let phases: Vec<GamePhase> = script
            .iter()
            .map(|line| tick(&mut state, &TickInput::from_line(line)))
            .collect();
        assert_eq!(
            phases,
            vec![
                GamePhase::Playing,
                GamePhase::Playing,
                GamePhase::Playing,
                GamePhase::Playing,
                GamePhase::Terminated
            ]
        );
        assert_eq!(state.ticks, 3);
    }

    #[test]
    fn test_state_serializes() {
        let state = playing_state(1);
        let json = serde_json::to_value(&state).expect("state serializes");
        assert_eq!(json["phase"], "Playing");
        assert_eq!(json["bird"]["x"], 230);
        assert!(json.get("sprites").is_none());
    }
}
