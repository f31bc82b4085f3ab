//! Deterministic swarm simulation
//!
//! The whole demo's designed behavior lives here. This module must stay pure
//! and deterministic:
//! - Seeded RNG at initialization only, never during updates
//! - Strict ascending chain order (follower i reads predecessor i-1's
//!   position as already updated this frame)
//! - No rendering or platform dependencies

pub mod state;
pub mod tick;

pub use state::{Blob, ChaseMode, Swarm, SwarmParams};
pub use tick::{FrameInput, advance, chase_target, leader_position};
