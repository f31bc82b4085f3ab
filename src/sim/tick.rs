//! Per-frame swarm update
//!
//! One update-then-render pass per display refresh tick, driven externally
//! by the host's clock. Both functions here are synchronous and allocation
//! free; the position array is read and written only from `advance`.

use glam::{Vec2, Vec3};

use super::state::{ChaseMode, Swarm, SwarmParams};
use crate::consts::{CHAIN_RATE, LEADER_RATE};

/// Inputs for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// World-space x/y offset from the pointer mapper; zero when
    /// follow-pointer is off
    pub offset: Vec2,
}

/// Closed-form leader position: a unit circle in x/y around the offset,
/// with a matching oscillation in z. No dependency on previous state.
#[inline]
pub fn leader_position(elapsed: f32, offset: Vec2) -> Vec3 {
    let t = elapsed * LEADER_RATE;
    Vec3::new(offset.x + t.cos(), offset.y + t.sin(), t.sin())
}

/// Chase target for a follower, derived from its predecessor's position
#[inline]
pub fn chase_target(prev: Vec3, offset: Vec2) -> Vec3 {
    Vec3::new(
        offset.x + (prev.x * CHAIN_RATE).cos(),
        offset.y + (prev.y * CHAIN_RATE).sin(),
        (prev.z * CHAIN_RATE).cos(),
    )
}

/// Advance the whole chain by one frame.
///
/// `interval` is the host's frame delta; the recurrence itself is a pure
/// function of `elapsed` and the chain, so the delta is accepted only to
/// mirror the host's clock callback.
///
/// Followers are updated in strict ascending index order, and each one reads
/// its predecessor's position *after* that predecessor was updated this
/// frame. Do not parallelize this loop and do not snapshot the positions
/// first: the recurrence's character depends on the sequential order.
pub fn advance(
    swarm: &mut Swarm,
    params: &SwarmParams,
    input: &FrameInput,
    _interval: f32,
    elapsed: f32,
) {
    if swarm.is_empty() {
        return;
    }

    let offset = input.offset;
    let blobs = swarm.blobs_mut();
    blobs[0].pos = leader_position(elapsed, offset);

    for i in 1..blobs.len() {
        let target = chase_target(blobs[i - 1].pos, offset);
        blobs[i].pos = match params.chase {
            ChaseMode::Snap => target,
            ChaseMode::Smooth => blobs[i].pos.lerp(target, params.smoothing),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SPAWN_SPREAD;

    fn swarm_of(n: usize, chase: ChaseMode, smoothing: f32) -> (Swarm, SwarmParams) {
        let params = SwarmParams {
            blob_count: n,
            spawn_spread: SPAWN_SPREAD,
            chase,
            smoothing,
        };
        (Swarm::new(123, &params), params)
    }

    #[test]
    fn test_leader_closed_form() {
        let offset = Vec2::new(0.4, -1.2);
        for &t in &[0.0_f32, 0.25, 1.0, 3.7, 42.0] {
            let p = leader_position(t, offset);
            assert!((p.x - offset.x - (2.0 * t).cos()).abs() < 1e-6);
            assert!((p.y - offset.y - (2.0 * t).sin()).abs() < 1e-6);
            assert!((p.z - (2.0 * t).sin()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_leader_unit_circle_invariant() {
        let offset = Vec2::new(2.0, 5.0);
        for step in 0..200 {
            let t = step as f32 * 0.05;
            let p = leader_position(t, offset);
            let r2 = (p.x - offset.x).powi(2) + (p.y - offset.y).powi(2);
            assert!((r2 - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_smooth_chase_scenario() {
        // Three-member chain, smoothing 0.05, frame at elapsed = 0
        let (mut swarm, params) = swarm_of(3, ChaseMode::Smooth, 0.05);
        swarm.set_positions(&[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(2.0, 2.0, 2.0),
        ]);

        advance(&mut swarm, &params, &FrameInput::default(), 1.0 / 60.0, 0.0);

        let leader = swarm.blobs()[0].pos;
        assert!((leader - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);

        // Follower 1 targets the leader's *new* position (1, 0, 0):
        // target = (cos 3, sin 0, cos 0), then lerp from (1,1,1) by 0.05
        let f1 = swarm.blobs()[1].pos;
        assert!((f1.x - 0.9005).abs() < 1e-3, "got {}", f1.x);
        assert!((f1.y - 0.95).abs() < 1e-6);
        assert!((f1.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_follower_reads_updated_predecessor() {
        // In snap mode the dependency chain is visible directly: follower 2
        // must be computed from follower 1's position of *this* frame.
        let (mut swarm, params) = swarm_of(3, ChaseMode::Snap, 1.0);
        swarm.set_positions(&[Vec3::ZERO, Vec3::ZERO, Vec3::ZERO]);

        advance(&mut swarm, &params, &FrameInput::default(), 1.0 / 60.0, 0.0);

        let f1 = swarm.blobs()[1].pos;
        let f2 = swarm.blobs()[2].pos;
        let cos3 = 3.0_f32.cos();
        assert!((f1 - Vec3::new(cos3, 0.0, 1.0)).length() < 1e-6);
        // From f1 = (cos 3, 0, 1), not from the pre-frame zero vector
        assert!((f2.x - (cos3 * 3.0).cos()).abs() < 1e-6);
        assert!((f2.y - 0.0).abs() < 1e-6);
        assert!((f2.z - 3.0_f32.cos()).abs() < 1e-6);
    }

    #[test]
    fn test_smooth_convergence_factor() {
        // Leader is stationary at elapsed = 0, so follower 1's target is
        // fixed; each step closes (1 - smoothing) of the remaining distance.
        let smoothing = 0.25;
        let (mut swarm, params) = swarm_of(2, ChaseMode::Smooth, smoothing);
        swarm.set_positions(&[Vec3::ZERO, Vec3::new(4.0, -3.0, 2.0)]);

        advance(&mut swarm, &params, &FrameInput::default(), 1.0 / 60.0, 0.0);
        let target = chase_target(swarm.blobs()[0].pos, Vec2::ZERO);

        let mut dist = (swarm.blobs()[1].pos - target).length();
        for _ in 0..20 {
            advance(&mut swarm, &params, &FrameInput::default(), 1.0 / 60.0, 0.0);
            let next = (swarm.blobs()[1].pos - target).length();
            assert!((next - dist * (1.0 - smoothing)).abs() < 1e-4);
            dist = next;
        }
    }

    #[test]
    fn test_offset_shifts_leader_and_targets() {
        let offset = Vec2::new(3.0, -2.0);
        let input = FrameInput { offset };
        let (mut swarm, params) = swarm_of(2, ChaseMode::Snap, 1.0);
        swarm.set_positions(&[Vec3::ZERO, Vec3::ZERO]);

        advance(&mut swarm, &params, &input, 1.0 / 60.0, 0.0);

        let leader = swarm.blobs()[0].pos;
        assert!((leader - Vec3::new(offset.x + 1.0, offset.y, 0.0)).length() < 1e-6);
        let f1 = swarm.blobs()[1].pos;
        let expected = chase_target(leader, offset);
        assert!((f1 - expected).length() < 1e-6);
    }

    #[test]
    fn test_determinism_across_runs() {
        let params = SwarmParams::default();
        let mut a = Swarm::new(99999, &params);
        let mut b = Swarm::new(99999, &params);

        let input = FrameInput::default();
        for step in 0..120 {
            let elapsed = step as f32 / 60.0;
            advance(&mut a, &params, &input, 1.0 / 60.0, elapsed);
            advance(&mut b, &params, &input, 1.0 / 60.0, elapsed);
        }

        for (x, y) in a.blobs().iter().zip(b.blobs()) {
            assert_eq!(x.pos, y.pos);
        }
    }
}
