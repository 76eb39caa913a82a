//! Pipe stream: spawn, scroll, score and retire obstacles
//!
//! Pipes are kept in spawn order, which is also left-to-right order since
//! they all scroll at the same speed. Each pipe has a stable id; removals are
//! collected during the pass and applied afterwards.

use rand::Rng;
use serde::Serialize;

use super::state::{Bird, Pipe};
use super::sprites::SpriteSet;
use crate::config::GameConfig;

/// Ordered pipes plus the round score
#[derive(Debug, Clone, Serialize)]
pub struct PipeStream {
    pub pipes: Vec<Pipe>,
    /// Pipes passed this round; never decreases
    pub score: u32,
    next_id: u32,
}

/// What one [`PipeStream::advance_all`] pass did, by pipe id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamOutcome {
    /// Pipes overlapping the bird after moving
    pub hits: Vec<u32>,
    /// Pipes whose `passed` flag flipped this tick
    pub passed: Vec<u32>,
    pub removed: Vec<u32>,
    pub spawned: Vec<u32>,
}

impl PipeStream {
    /// A stream holding one pipe at `first_x`
    pub fn new<R: Rng>(first_x: f32, rng: &mut R, config: &GameConfig, sprites: &SpriteSet) -> Self {
        let mut stream = Self::empty();
        stream.spawn(first_x, rng, config, sprites);
        stream
    }

    pub fn empty() -> Self {
        Self {
            pipes: Vec::new(),
            score: 0,
            next_id: 1,
        }
    }

    /// Allocate a new pipe id
    fn next_pipe_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append a pipe with a random gap at `x`, returning its id
    pub fn spawn<R: Rng>(&mut self, x: f32, rng: &mut R, config: &GameConfig, sprites: &SpriteSet) -> u32 {
        let id = self.next_pipe_id();
        let pipe = Pipe::new(id, x, rng, config, sprites);
        log::debug!("Spawned pipe {} at x={} gap={}", id, x, pipe.height);
        self.pipes.push(pipe);
        id
    }

    /// Append a pipe with a fixed gap height
    pub fn spawn_with_height(&mut self, x: f32, height: i32, config: &GameConfig, sprites: &SpriteSet) -> u32 {
        let id = self.next_pipe_id();
        self.pipes.push(Pipe::with_height(id, x, height, config, sprites));
        id
    }

    pub fn get(&self, id: u32) -> Option<&Pipe> {
        self.pipes.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    /// First pipe whose right edge is still ahead of the bird
    pub fn next_ahead(&self, bird: &Bird, sprites: &SpriteSet) -> Option<&Pipe> {
        let width = sprites.pipe_width();
        self.pipes.iter().find(|p| p.x + width > bird.x as f32)
    }

    /// Strictly increasing x in storage order
    pub fn is_ordered(&self) -> bool {
        self.pipes.windows(2).all(|w| w[0].x < w[1].x)
    }

    /// Scroll every pipe one tick, test it against the bird, score passes,
    /// then drop off-screen pipes and spawn replacements.
    ///
    /// A hit does not stop the pass: every pipe is moved and scored before
    /// the caller acts on `hits`.
    pub fn advance_all<R: Rng>(
        &mut self,
        bird: &Bird,
        sprites: &SpriteSet,
        config: &GameConfig,
        rng: &mut R,
    ) -> StreamOutcome {
        let mut outcome = StreamOutcome::default();

        for pipe in &mut self.pipes {
            pipe.advance(config);

            if pipe.collides(bird, sprites) {
                outcome.hits.push(pipe.id);
            }

            if pipe.is_offscreen(sprites) {
                outcome.removed.push(pipe.id);
            }

            if !pipe.passed && pipe.x < bird.x as f32 {
                pipe.passed = true;
                outcome.passed.push(pipe.id);
            }
        }

        self.score += outcome.passed.len() as u32;

        if !outcome.removed.is_empty() {
            self.pipes.retain(|p| !outcome.removed.contains(&p.id));
            log::debug!("Removed pipes {:?}", outcome.removed);
        }

        let spawns = config.spawn_policy.spawn_count(outcome.passed.len());
        let spawn_x = config.spawn_x();
        let width = sprites.pipe_width();
        for i in 0..spawns {
            let id = self.spawn(spawn_x + i as f32 * width, rng, config, sprites);
            outcome.spawned.push(id);
        }

        outcome
    }
}
