//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (pipes in spawn order, addressed by id)
//! - No rendering or platform dependencies

pub mod collision;
pub mod mask;
pub mod sprites;
pub mod state;
pub mod stream;
pub mod tick;

pub use collision::{Boundary, Silhouetted, collides, out_of_bounds, overlap};
pub use mask::{Mask, MaskError, Rect, Reflection, Silhouette};
pub use sprites::SpriteSet;
pub use state::{Bird, GameEvent, GamePhase, GameState, Ground, LossCause, Pipe};
pub use stream::{PipeStream, StreamOutcome};
pub use tick::{Command, TickInput, tick};
