//! Orbit camera and screen-to-world mapping
//!
//! The camera orbits a target point on a damped spherical track (drag to
//! orbit, wheel to zoom). `screen_to_world` maps a screen-pixel coordinate
//! onto a constant-z world plane through the camera's inverse
//! view-projection; it is the only place the demo does any projective math.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::consts::*;

/// Radians of orbit per pixel of drag
const ORBIT_SENSITIVITY: f32 = 0.005;
/// Zoom rate per wheel unit, scaled by current radius
const ZOOM_SENSITIVITY: f32 = 0.002;
/// Per-frame velocity retention for damped orbiting (at 60 fps)
const ORBIT_DAMPING: f32 = 0.85;
/// Polar clamp margin keeping the camera off the poles
const POLAR_MARGIN: f32 = 0.01;
/// Zoom clamp
const MIN_RADIUS: f32 = 2.0;
const MAX_RADIUS: f32 = 40.0;

/// Perspective camera on a damped spherical orbit around a target
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Point the camera looks at
    pub target: Vec3,
    /// Horizontal orbit angle (radians)
    pub azimuth: f32,
    /// Vertical orbit angle (radians), clamped off the poles
    pub polar: f32,
    /// Distance from the target
    pub radius: f32,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    /// Viewport aspect ratio (width / height)
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    azimuth_vel: f32,
    polar_vel: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            azimuth: 0.0,
            polar: std::f32::consts::FRAC_PI_2,
            radius: CAMERA_START_RADIUS,
            fov_y: CAMERA_FOV_DEG.to_radians(),
            aspect: 1.0,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            azimuth_vel: 0.0,
            polar_vel: 0.0,
        }
    }
}

impl OrbitCamera {
    /// World position derived from the spherical orbit state
    pub fn position(&self) -> Vec3 {
        let x = self.radius * self.polar.sin() * self.azimuth.sin();
        let y = self.radius * self.polar.cos();
        let z = self.radius * self.polar.sin() * self.azimuth.cos();
        Vec3::new(x, y, z) + self.target
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.proj() * self.view()
    }

    /// Feed a pointer drag into the damped orbit
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.azimuth_vel -= dx * ORBIT_SENSITIVITY;
        self.polar_vel -= dy * ORBIT_SENSITIVITY;
    }

    /// Wheel zoom; positive delta zooms out
    pub fn zoom(&mut self, delta: f32) {
        self.radius =
            (self.radius + delta * ZOOM_SENSITIVITY * self.radius).clamp(MIN_RADIUS, MAX_RADIUS);
    }

    /// Apply and damp orbit velocities once per frame
    pub fn update(&mut self, dt: f32) {
        self.azimuth += self.azimuth_vel;
        self.polar = (self.polar + self.polar_vel)
            .clamp(POLAR_MARGIN, std::f32::consts::PI - POLAR_MARGIN);

        let retain = ORBIT_DAMPING.powf(dt * 60.0);
        self.azimuth_vel *= retain;
        self.polar_vel *= retain;
    }

    /// Map a screen-pixel coordinate onto the world plane `z = target_depth`.
    ///
    /// The screen coordinate is normalized to clip space (y flipped),
    /// un-projected through the inverse view-projection onto the camera's
    /// viewing ray, and the ray is scaled to the target depth plane. The
    /// result lies exactly on `z = target_depth`, directly under the screen
    /// coordinate as seen by this camera.
    ///
    /// Preconditions: `viewport` matches the aspect ratio this camera was
    /// configured with, and the viewing ray has a nonzero z component. A ray
    /// parallel to the depth plane divides by zero and yields an infinite
    /// result; the caller must avoid camera orientations that make that
    /// happen.
    pub fn screen_to_world(&self, screen: Vec2, target_depth: f32, viewport: Vec2) -> Vec3 {
        let ndc_x = (screen.x / viewport.x) * 2.0 - 1.0;
        let ndc_y = -(screen.y / viewport.y) * 2.0 + 1.0;

        // Any clip z strictly inside the frustum works: only the ray
        // direction survives the plane intersection below.
        let clip = Vec4::new(ndc_x, ndc_y, 0.5, 1.0);
        let unprojected = self.view_proj().inverse() * clip;
        let on_ray = unprojected.truncate() / unprojected.w;

        let cam_pos = self.position();
        let dir = (on_ray - cam_pos).normalize();
        let distance = (target_depth - cam_pos.z) / dir.z;
        cam_pos + dir * distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

    fn test_camera() -> OrbitCamera {
        OrbitCamera {
            aspect: VIEWPORT.x / VIEWPORT.y,
            ..Default::default()
        }
    }

    /// Forward projection: world point -> screen pixels
    fn project(camera: &OrbitCamera, world: Vec3) -> Vec2 {
        let clip = camera.view_proj() * world.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        Vec2::new(
            (ndc.x + 1.0) / 2.0 * VIEWPORT.x,
            (1.0 - ndc.y) / 2.0 * VIEWPORT.y,
        )
    }

    #[test]
    fn test_default_position() {
        let camera = test_camera();
        assert!((camera.position() - Vec3::new(0.0, 0.0, CAMERA_START_RADIUS)).length() < 1e-5);
    }

    #[test]
    fn test_screen_center_hits_axis() {
        let camera = test_camera();
        let center = Vec2::new(VIEWPORT.x / 2.0, VIEWPORT.y / 2.0);
        let world = camera.screen_to_world(center, 0.0, VIEWPORT);
        assert!(world.x.abs() < 1e-4 && world.y.abs() < 1e-4);
        assert!(world.z.abs() < 1e-4);
    }

    #[test]
    fn test_result_on_target_plane() {
        let camera = test_camera();
        for &(sx, sy, depth) in &[
            (0.0, 0.0, 0.0),
            (1280.0, 720.0, 0.0),
            (200.0, 650.0, -1.5),
            (900.0, 100.0, 2.0),
        ] {
            let world = camera.screen_to_world(Vec2::new(sx, sy), depth, VIEWPORT);
            assert!((world.z - depth).abs() < 1e-4, "z off plane: {}", world.z);
        }
    }

    #[test]
    fn test_project_unproject_round_trip() {
        let camera = test_camera();
        let p = Vec3::new(0.8, -0.45, 0.0);
        let screen = project(&camera, p);
        let back = camera.screen_to_world(screen, p.z, VIEWPORT);
        assert!((back - p).length() < 1e-3, "round trip drifted: {back:?}");
    }

    #[test]
    fn test_round_trip_after_orbit() {
        let mut camera = test_camera();
        camera.azimuth = 0.6;
        camera.polar = 1.1;
        camera.radius = 10.0;

        let p = Vec3::new(-1.2, 0.7, 0.5);
        let screen = project(&camera, p);
        let back = camera.screen_to_world(screen, p.z, VIEWPORT);
        assert!((back - p).length() < 1e-3);
    }

    #[test]
    fn test_orbit_damping_settles() {
        let mut camera = test_camera();
        camera.orbit(40.0, 10.0);
        for _ in 0..240 {
            camera.update(1.0 / 60.0);
        }
        let before = camera.azimuth;
        camera.update(1.0 / 60.0);
        assert!((camera.azimuth - before).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_unproject_lands_on_plane(
            sx in 0.0f32..1280.0,
            sy in 0.0f32..720.0,
            depth in -2.0f32..2.0,
        ) {
            let camera = test_camera();
            let world = camera.screen_to_world(Vec2::new(sx, sy), depth, VIEWPORT);
            prop_assert!((world.z - depth).abs() < 1e-3);
        }

        #[test]
        fn prop_round_trip(
            x in -2.0f32..2.0,
            y in -2.0f32..2.0,
            z in -1.5f32..1.5,
        ) {
            let camera = test_camera();
            let p = Vec3::new(x, y, z);
            let screen = project(&camera, p);
            let back = camera.screen_to_world(screen, p.z, VIEWPORT);
            prop_assert!((back - p).length() < 1e-2);
        }
    }
}
