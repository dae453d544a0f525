use glam::{Mat4, Vec3};

/// Discrete movement directions fed from the key table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

const YAW: f32 = -90.0;
const PITCH: f32 = 0.0;
const SPEED: f32 = 5.0;
const SENSITIVITY: f32 = 0.1;
const ZOOM: f32 = 45.0;

const PITCH_LIMIT: f32 = 89.0;
const ZOOM_MIN: f32 = 1.0;
const ZOOM_MAX: f32 = 45.0;

const WORLD_UP: Vec3 = Vec3::Y;

/// Free-fly first-person camera driven by yaw/pitch Euler angles in
/// degrees. The basis vectors are derived state: they are recomputed on
/// every yaw/pitch change and never assigned from outside, so they stay
/// orthonormal by construction.
pub struct FlyCamera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    yaw: f32,
    pitch: f32,
    zoom: f32,
    speed: f32,
    sensitivity: f32,
    last_cursor: Option<(f32, f32)>,
}

impl FlyCamera {
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: WORLD_UP,
            right: Vec3::X,
            yaw: YAW,
            pitch: PITCH,
            zoom: ZOOM,
            speed: SPEED,
            sensitivity: SENSITIVITY,
            last_cursor: None,
        };
        camera.update_vectors();
        camera
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Moves along the current basis, scaled by frame time so the travel
    /// rate is independent of frame rate.
    pub fn process_keyboard(&mut self, direction: CameraMovement, dt: f32) {
        let velocity = self.speed * dt;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
            CameraMovement::Up => self.position += self.up * velocity,
            CameraMovement::Down => self.position -= self.up * velocity,
        }
    }

    /// Takes the raw cursor position in window pixels; deltas are tracked
    /// internally. The very first call only seeds the tracker and applies
    /// no rotation.
    pub fn process_mouse_movement(&mut self, x: f32, y: f32, constrain_pitch: bool) {
        let Some((last_x, last_y)) = self.last_cursor.replace((x, y)) else {
            return;
        };
        let dx = x - last_x;
        // Screen Y grows downward.
        let dy = last_y - y;

        self.yaw += dx * self.sensitivity;
        self.pitch += dy * self.sensitivity;
        if constrain_pitch {
            if self.pitch > PITCH_LIMIT {
                self.pitch = PITCH_LIMIT;
            }
            if self.pitch < -PITCH_LIMIT {
                self.pitch = -PITCH_LIMIT;
            }
        }

        self.update_vectors();
    }

    /// Narrows or widens the field of view. Both bounds are checked
    /// unconditionally, so any starting value lands back inside
    /// [ZOOM_MIN, ZOOM_MAX].
    pub fn process_scroll(&mut self, y_offset: f32) {
        self.zoom -= y_offset;
        if self.zoom < ZOOM_MIN {
            self.zoom = ZOOM_MIN;
        }
        if self.zoom > ZOOM_MAX {
            self.zoom = ZOOM_MAX;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    fn update_vectors(&mut self) {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        // Right is taken against the fixed world up, not the camera's own.
        self.right = self.front.cross(WORLD_UP).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

pub struct Projection {
    aspect: f32,
    fovy: f32,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, fovy_degrees: f32, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy: fovy_degrees.to_radians(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn set_fovy(&mut self, fovy_degrees: f32) {
        self.fovy = fovy_degrees.to_radians();
    }

    pub fn build_projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_orthonormal(camera: &FlyCamera) {
        assert!((camera.front().length() - 1.0).abs() < EPS);
        assert!((camera.right().length() - 1.0).abs() < EPS);
        assert!((camera.up().length() - 1.0).abs() < EPS);
        assert!(camera.front().dot(camera.right()).abs() < EPS);
        assert!(camera.front().dot(camera.up()).abs() < EPS);
        assert!(camera.right().dot(camera.up()).abs() < EPS);
    }

    #[test]
    fn fresh_camera_looks_down_negative_z() {
        let camera = FlyCamera::new(Vec3::new(0.0, 0.0, 3.0));
        assert!((camera.front() - Vec3::NEG_Z).length() < EPS);
        assert_orthonormal(&camera);
    }

    #[test]
    fn first_mouse_sample_is_suppressed() {
        let mut camera = FlyCamera::new(Vec3::ZERO);
        let (yaw, pitch) = (camera.yaw(), camera.pitch());

        camera.process_mouse_movement(400.0, 300.0, true);
        assert_eq!(camera.yaw(), yaw);
        assert_eq!(camera.pitch(), pitch);

        // Second sample moves 10 px right and 10 px up (screen Y down).
        camera.process_mouse_movement(410.0, 290.0, true);
        assert!((camera.yaw() - (yaw + 10.0 * SENSITIVITY)).abs() < EPS);
        assert!((camera.pitch() - (pitch + 10.0 * SENSITIVITY)).abs() < EPS);
        assert_orthonormal(&camera);
    }

    #[test]
    fn pitch_never_leaves_clamp_range() {
        let mut camera = FlyCamera::new(Vec3::ZERO);
        camera.process_mouse_movement(0.0, 0.0, true);
        for step in 1..=1000 {
            // Each call drags the cursor another 10000 px up.
            camera.process_mouse_movement(0.0, step as f32 * -10000.0, true);
            assert!(camera.pitch() <= PITCH_LIMIT);
            assert!(camera.pitch() >= -PITCH_LIMIT);
        }
        assert!((camera.pitch() - PITCH_LIMIT).abs() < EPS);
        for step in 1..=1000 {
            camera.process_mouse_movement(0.0, step as f32 * 10000.0, true);
            assert!(camera.pitch() <= PITCH_LIMIT);
            assert!(camera.pitch() >= -PITCH_LIMIT);
        }
        assert!((camera.pitch() + PITCH_LIMIT).abs() < EPS);
        assert_orthonormal(&camera);
    }

    #[test]
    fn unconstrained_pitch_is_not_clamped() {
        let mut camera = FlyCamera::new(Vec3::ZERO);
        camera.process_mouse_movement(0.0, 0.0, false);
        camera.process_mouse_movement(0.0, -10000.0, false);
        assert!(camera.pitch() > PITCH_LIMIT);
    }

    #[test]
    fn zoom_clamps_extreme_offsets() {
        let mut camera = FlyCamera::new(Vec3::ZERO);
        camera.process_scroll(1000.0);
        assert_eq!(camera.zoom(), ZOOM_MIN);
        camera.process_scroll(-1000.0);
        assert_eq!(camera.zoom(), ZOOM_MAX);

        // One overshooting step from either end still lands in range.
        camera.process_scroll(44.5);
        assert_eq!(camera.zoom(), ZOOM_MIN);
        camera.process_scroll(-0.5);
        assert!((camera.zoom() - 1.5).abs() < EPS);
    }

    #[test]
    fn keyboard_movement_scales_with_frame_time() {
        let mut camera = FlyCamera::new(Vec3::ZERO);
        camera.process_keyboard(CameraMovement::Forward, 2.0);
        let expected = camera.front() * SPEED * 2.0;
        assert!((camera.position - expected).length() < EPS);

        camera.position = Vec3::ZERO;
        camera.process_keyboard(CameraMovement::Left, 0.5);
        camera.process_keyboard(CameraMovement::Up, 0.5);
        let expected = (-camera.right() + camera.up()) * SPEED * 0.5;
        assert!((camera.position - expected).length() < EPS);
    }

    #[test]
    fn basis_stays_orthonormal_under_mutation() {
        let mut camera = FlyCamera::new(Vec3::new(1.0, 2.0, 3.0));
        camera.process_mouse_movement(0.0, 0.0, true);
        for step in 1..50 {
            camera.process_mouse_movement(step as f32 * 37.0, step as f32 * -13.0, true);
            camera.process_keyboard(CameraMovement::Forward, 0.016);
            assert_orthonormal(&camera);
        }
    }

    #[test]
    fn view_matrix_maps_position_to_origin() {
        let mut camera = FlyCamera::new(Vec3::new(4.0, -2.0, 7.5));
        camera.process_mouse_movement(0.0, 0.0, true);
        camera.process_mouse_movement(123.0, -45.0, true);

        let eye = camera.view_matrix().transform_point3(camera.position);
        assert!(eye.length() < EPS);

        // A point one unit along front lands on the view-space -Z axis.
        let ahead = camera
            .view_matrix()
            .transform_point3(camera.position + camera.front());
        assert!((ahead - Vec3::NEG_Z).length() < EPS);
    }
}
