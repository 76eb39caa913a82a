//! Game state and core simulation types
//!
//! Everything a renderer needs to draw a tick lives here and serializes to
//! JSON. Sprite masks and the RNG are skipped.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::collision::{Silhouetted, collides};
use super::mask::Silhouette;
use super::sprites::{FRAME_CYCLE, SpriteSet};
use super::stream::PipeStream;
use crate::config::GameConfig;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Waiting for a start command; nothing moves
    Menu,
    /// Active round
    Playing,
    /// Round ended by a collision; frozen until restart or quit
    Lost,
    /// Quit requested; the caller should exit
    Terminated,
}

/// What ended a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LossCause {
    Pipe { pipe_id: u32 },
    Floor,
    Ceiling,
}

/// Things that happened during the last tick (for sound/visual hooks)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    Started,
    Flapped,
    Scored { pipe_id: u32, score: u32 },
    PipeSpawned { pipe_id: u32 },
    PipeRemoved { pipe_id: u32 },
    Crashed { cause: LossCause },
    Restarted,
    Quit,
}

/// The player body
#[derive(Debug, Clone, Serialize)]
pub struct Bird {
    /// Fixed horizontal position
    pub x: i32,
    pub y: f64,
    /// Velocity set by the last flap (negative = upward)
    pub vel: f64,
    /// Ticks since the last flap
    pub tick_count: u32,
    /// Visual tilt in degrees (positive = nose up)
    pub tilt: f64,
    /// y at the last flap, used for tilt
    pub height: f64,
    /// Ticks into the current animation cycle
    pub anim_count: u32,
    /// Index into the sprite set's bird frames
    pub frame: usize,
}

impl Bird {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            x: config.bird_x,
            y: config.bird_y,
            vel: 0.0,
            tick_count: 0,
            tilt: 0.0,
            height: config.bird_y,
            anim_count: 0,
            frame: FRAME_CYCLE[0],
        }
    }

    /// Flap: override velocity and restart the fall curve
    pub fn jump(&mut self, config: &GameConfig) {
        self.vel = config.jump_velocity;
        self.tick_count = 0;
        self.height = self.y;
    }

    /// Vertical displacement applied on tick `t` after a flap with velocity `vel`
    pub fn displacement(vel: f64, t: u32, config: &GameConfig) -> f64 {
        let t = t as f64;
        let mut d = vel * t + config.gravity * t * t;
        if d >= config.terminal_displacement {
            d = config.terminal_displacement;
        }
        if d < 0.0 {
            d -= config.rise_bias;
        }
        d
    }

    /// Advance physics by one tick
    pub fn advance(&mut self, config: &GameConfig) {
        self.tick_count += 1;
        let d = Self::displacement(self.vel, self.tick_count, config);
        self.y += d;

        if d < 0.0 || self.y < self.height + config.tilt_hold_distance {
            if self.tilt < config.max_rotation {
                self.tilt = config.max_rotation;
            }
        } else if self.tilt > config.min_rotation {
            self.tilt = (self.tilt - config.rotation_velocity).max(config.min_rotation);
        }
    }

    /// Step the wing animation; independent of physics
    pub fn animate(&mut self, config: &GameConfig) {
        let hold = config.animation_ticks.max(1);
        self.anim_count = (self.anim_count + 1) % (hold * FRAME_CYCLE.len() as u32);
        self.frame = FRAME_CYCLE[(self.anim_count / hold) as usize];
    }

    /// Whether the next tick moves the bird down
    pub fn is_falling(&self, config: &GameConfig) -> bool {
        Self::displacement(self.vel, self.tick_count + 1, config) > 0.0
    }

    /// y snapped to the pixel grid (half-to-even)
    pub fn pixel_y(&self) -> i32 {
        self.y.round_ties_even() as i32
    }
}

impl Silhouetted for Bird {
    fn silhouette<'s>(&self, sprites: &'s SpriteSet) -> Silhouette<'s> {
        sprites.bird(self.frame)
    }

    fn origin(&self) -> IVec2 {
        IVec2::new(self.x, self.pixel_y())
    }
}

/// A gap obstacle: a top pipe and a bottom pipe around an opening
#[derive(Debug, Clone, Serialize)]
pub struct Pipe {
    /// Stable handle within the stream
    pub id: u32,
    pub x: f32,
    /// Gap center height (top of the opening)
    pub height: i32,
    /// y of the top pipe's upper edge
    pub top: i32,
    /// y of the bottom pipe's upper edge
    pub bottom: i32,
    /// Set once the bird's x overtakes the pipe
    pub passed: bool,
}

impl Pipe {
    /// Pipe with a random gap height drawn from the configured range
    pub fn new<R: Rng>(id: u32, x: f32, rng: &mut R, config: &GameConfig, sprites: &SpriteSet) -> Self {
        let height = rng.random_range(config.pipe_height_min..config.pipe_height_max);
        Self::with_height(id, x, height, config, sprites)
    }

    pub fn with_height(id: u32, x: f32, height: i32, config: &GameConfig, sprites: &SpriteSet) -> Self {
        debug_assert!(config.pipe_gap > 0);
        Self {
            id,
            x,
            height,
            top: height - sprites.pipe_height(),
            bottom: height + config.pipe_gap,
            passed: false,
        }
    }

    pub fn advance(&mut self, config: &GameConfig) {
        self.x -= config.pipe_velocity;
    }

    #[inline]
    pub fn pixel_x(&self) -> i32 {
        self.x as i32
    }

    pub fn top_origin(&self) -> IVec2 {
        IVec2::new(self.pixel_x(), self.top)
    }

    pub fn bottom_origin(&self) -> IVec2 {
        IVec2::new(self.pixel_x(), self.bottom)
    }

    /// Silhouette test of `actor` against both halves
    pub fn collides<E: Silhouetted>(&self, actor: &E, sprites: &SpriteSet) -> bool {
        collides(actor, sprites, sprites.pipe_bottom(), self.bottom_origin())
            || collides(actor, sprites, sprites.pipe_top(), self.top_origin())
    }

    /// Fully scrolled past the left window edge
    pub fn is_offscreen(&self, sprites: &SpriteSet) -> bool {
        self.x + sprites.pipe_width() < 0.0
    }
}

/// Two-tile scrolling ground strip
#[derive(Debug, Clone, Serialize)]
pub struct Ground {
    pub y: i32,
    pub x1: f32,
    pub x2: f32,
    pub width: f32,
}

impl Ground {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            y: config.floor,
            x1: 0.0,
            x2: config.ground_tile_width,
            width: config.ground_tile_width,
        }
    }

    pub fn advance(&mut self, config: &GameConfig) {
        self.x1 -= config.ground_velocity;
        self.x2 -= config.ground_velocity;

        // Recycle whichever tile left the screen behind the other one
        if self.x1 + self.width < 0.0 {
            self.x1 = self.x2 + self.width;
        }
        if self.x2 + self.width < 0.0 {
            self.x2 = self.x1 + self.width;
        }
    }
}

/// Complete session state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: GameConfig,
    pub phase: GamePhase,
    /// Rounds started this session (1-based once playing)
    pub round: u32,
    /// Ticks simulated in the current round
    pub ticks: u64,
    pub bird: Bird,
    pub ground: Ground,
    pub pipes: PipeStream,
    /// Why the current round was lost, if it was
    pub loss: Option<LossCause>,
    /// Events raised by the last tick
    pub events: Vec<GameEvent>,
    #[serde(skip)]
    pub sprites: SpriteSet,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// New session in the menu, with default sprite silhouettes
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self::with_sprites(config, seed, SpriteSet::default())
    }

    pub fn with_sprites(config: GameConfig, seed: u64, sprites: SpriteSet) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid config: {config:?}");
        let mut rng = Pcg32::seed_from_u64(seed);
        let pipes = PipeStream::new(config.first_pipe_x, &mut rng, &config, &sprites);
        Self {
            seed,
            bird: Bird::new(&config),
            ground: Ground::new(&config),
            pipes,
            config,
            phase: GamePhase::Menu,
            round: 0,
            ticks: 0,
            loss: None,
            events: Vec::new(),
            sprites,
            rng,
        }
    }

    /// Score of the current round
    pub fn score(&self) -> u32 {
        self.pipes.score
    }

    /// Replace every round entity; the RNG stream carries on
    pub fn reset_round(&mut self) {
        self.bird = Bird::new(&self.config);
        self.ground = Ground::new(&self.config);
        self.pipes = PipeStream::new(self.config.first_pipe_x, &mut self.rng, &self.config, &self.sprites);
        self.ticks = 0;
        self.loss = None;
    }

    /// Height of the bird's current frame
    pub fn bird_frame_height(&self) -> u32 {
        self.bird.silhouette(&self.sprites).height()
    }
}
