//! Default sprite silhouettes
//!
//! Procedural stand-ins for the bird and pipe art at the game's 2× scale.
//! A frontend that decodes real images builds its own masks with
//! [`Mask::from_alpha`] and hands them to [`SpriteSet::new`].

use super::mask::{Mask, Reflection, Silhouette};

/// Bird frame size (34×24 art scaled 2×)
pub const BIRD_WIDTH: u32 = 68;
pub const BIRD_HEIGHT: u32 = 48;

/// Pipe size (52×320 art scaled 2×)
pub const PIPE_WIDTH: u32 = 104;
pub const PIPE_HEIGHT: u32 = 640;
/// Height of the lip at the open end of a pipe
pub const PIPE_CAP_HEIGHT: u32 = 48;
/// Body inset from each side below the lip
pub const PIPE_BODY_INSET: u32 = 4;

/// Animation frame order; frame 1 is shown twice per cycle
pub const FRAME_CYCLE: [usize; 4] = [0, 1, 2, 1];

/// All masks the collision engine needs
#[derive(Debug, Clone)]
pub struct SpriteSet {
    pub bird_frames: [Mask; 3],
    /// Bottom pipe, opening upward. The top pipe is this mask mirrored.
    pub pipe: Mask,
}

impl Default for SpriteSet {
    fn default() -> Self {
        Self::new(
            [bird_frame(WingPose::Up), bird_frame(WingPose::Level), bird_frame(WingPose::Down)],
            pipe_mask(),
        )
    }
}

impl SpriteSet {
    pub fn new(bird_frames: [Mask; 3], pipe: Mask) -> Self {
        Self { bird_frames, pipe }
    }

    /// Silhouette of bird frame `index` (0..3)
    pub fn bird(&self, index: usize) -> Silhouette<'_> {
        self.bird_frames[index % self.bird_frames.len()].view(Reflection::None)
    }

    pub fn pipe_top(&self) -> Silhouette<'_> {
        self.pipe.view(Reflection::Vertical)
    }

    pub fn pipe_bottom(&self) -> Silhouette<'_> {
        self.pipe.view(Reflection::None)
    }

    pub fn pipe_width(&self) -> f32 {
        self.pipe.width() as f32
    }

    pub fn pipe_height(&self) -> i32 {
        self.pipe.height() as i32
    }
}

#[derive(Debug, Clone, Copy)]
enum WingPose {
    Up,
    Level,
    Down,
}

/// Is (x, y) inside the axis-aligned ellipse centered at (cx, cy)
fn in_ellipse(x: u32, y: u32, cx: f32, cy: f32, rx: f32, ry: f32) -> bool {
    let dx = (x as f32 + 0.5 - cx) / rx;
    let dy = (y as f32 + 0.5 - cy) / ry;
    dx * dx + dy * dy <= 1.0
}

fn bird_frame(pose: WingPose) -> Mask {
    let wing_cy = match pose {
        WingPose::Up => 16.0,
        WingPose::Level => 26.0,
        WingPose::Down => 36.0,
    };
    Mask::from_fn(BIRD_WIDTH, BIRD_HEIGHT, |x, y| {
        let body = in_ellipse(x, y, 32.0, 26.0, 24.0, 16.0);
        let wing = in_ellipse(x, y, 18.0, wing_cy, 12.0, 6.0);
        let beak = (54..64).contains(&x) && (24..32).contains(&y);
        body || wing || beak
    })
}

fn pipe_mask() -> Mask {
    Mask::from_fn(PIPE_WIDTH, PIPE_HEIGHT, |x, y| {
        y < PIPE_CAP_HEIGHT || (PIPE_BODY_INSET..PIPE_WIDTH - PIPE_BODY_INSET).contains(&x)
    })
}
