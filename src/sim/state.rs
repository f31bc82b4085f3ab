//! Swarm state and core simulation types
//!
//! The swarm owns a fixed-size, indexable sequence of blobs. The renderer
//! gets a non-owning read view once per frame after the update completes.

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How a follower closes on its per-frame target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ChaseMode {
    /// Jump to the target immediately
    Snap,
    /// Advance a fixed fraction of the remaining distance each frame
    #[default]
    Smooth,
}

/// Tunable swarm parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SwarmParams {
    /// Chain length including the hidden leader at index 0
    pub blob_count: usize,
    /// Spread multiplier for initial positions
    pub spawn_spread: f32,
    /// Follower chase strategy
    pub chase: ChaseMode,
    /// Per-frame lerp factor for `ChaseMode::Smooth`, in (0, 1]
    pub smoothing: f32,
}

impl Default for SwarmParams {
    fn default() -> Self {
        Self {
            blob_count: BLOB_COUNT,
            spawn_spread: SPAWN_SPREAD,
            chase: ChaseMode::Smooth,
            smoothing: CHASE_SMOOTHING,
        }
    }
}

/// A single chain member
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Blob {
    /// World position, mutated in place each frame
    pub pos: Vec3,
    /// Uniform scale drawn once at init, fixed for the process lifetime
    pub scale: f32,
}

/// Ordered chain of blobs. Index 0 is the leader, 1..N-1 are followers.
///
/// The set size is fixed at construction; there is no spawning or
/// destruction afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swarm {
    /// Seed used at construction, kept for reproducibility
    pub seed: u64,
    blobs: Vec<Blob>,
}

impl Swarm {
    /// Build a swarm with every member at a seeded pseudo-random position.
    ///
    /// Each coordinate is drawn as `rand()*M - rand()*M`: the difference of
    /// two independent uniforms on [0, M], a triangular distribution
    /// centered at 0 (not uniform on [-M, M]).
    pub fn new(seed: u64, params: &SwarmParams) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let m = params.spawn_spread;

        let blobs = (0..params.blob_count)
            .map(|_| {
                let x = rng.random::<f32>() * m - rng.random::<f32>() * m;
                let y = rng.random::<f32>() * m - rng.random::<f32>() * m;
                let z = rng.random::<f32>() * m - rng.random::<f32>() * m;
                Blob {
                    pos: Vec3::new(x, y, z),
                    scale: rng.random::<f32>(),
                }
            })
            .collect();

        Self { seed, blobs }
    }

    /// Number of chain members, leader included
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Read view of the whole chain, leader first
    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    /// Read view of the rendered members (everything but the leader)
    pub fn followers(&self) -> &[Blob] {
        if self.blobs.is_empty() {
            &[]
        } else {
            &self.blobs[1..]
        }
    }

    pub(crate) fn blobs_mut(&mut self) -> &mut [Blob] {
        &mut self.blobs
    }

    /// Overwrite positions in chain order, leader first
    pub fn set_positions(&mut self, positions: &[Vec3]) {
        for (blob, pos) in self.blobs.iter_mut().zip(positions) {
            blob.pos = *pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_is_deterministic() {
        let params = SwarmParams::default();
        let a = Swarm::new(42, &params);
        let b = Swarm::new(42, &params);
        for (x, y) in a.blobs().iter().zip(b.blobs()) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.scale, y.scale);
        }
    }

    #[test]
    fn test_spawn_triangular_bounds() {
        let params = SwarmParams::default();
        let swarm = Swarm::new(7, &params);
        let m = params.spawn_spread;
        for blob in swarm.blobs() {
            assert!(blob.pos.x.abs() <= m && blob.pos.y.abs() <= m && blob.pos.z.abs() <= m);
            assert!((0.0..1.0).contains(&blob.scale));
        }
        // Difference of two uniforms centers the distribution on zero
        let mean = swarm.blobs().iter().map(|b| b.pos.x + b.pos.y + b.pos.z).sum::<f32>()
            / (3.0 * swarm.len() as f32);
        assert!(mean.abs() < 1.5, "triangular mean drifted: {mean}");
    }

    #[test]
    fn test_followers_skip_leader() {
        let params = SwarmParams {
            blob_count: 5,
            ..Default::default()
        };
        let swarm = Swarm::new(1, &params);
        assert_eq!(swarm.len(), 5);
        assert_eq!(swarm.followers().len(), 4);
        assert_eq!(swarm.followers()[0].pos, swarm.blobs()[1].pos);
    }
}
