use glam::{Mat4, Vec3};

/// Fixed world translations for the cube group.
pub const CUBE_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

/// World scale applied to the skybox faces and the terrain mesh.
pub const ENCLOSURE_SCALE: f32 = 50.0;

/// Constant spin every cube carries, around the (1,1,1) diagonal.
const BASE_SPIN_RATE: f32 = 0.5;

/// Transform state shared by the whole cube group, adjusted at runtime
/// from the key table and read once per frame when instance matrices are
/// rebuilt.
pub struct SceneTransformState {
    pub scale: Vec3,
    pub translate: Vec3,
    /// Extra per-axis rotation rates (radians per second).
    pub spin_rate: Vec3,
}

impl Default for SceneTransformState {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            translate: Vec3::ZERO,
            spin_rate: Vec3::ZERO,
        }
    }
}

impl SceneTransformState {
    /// Spin rates and scale go back to their defaults; translation is kept.
    pub fn reset(&mut self) {
        self.spin_rate = Vec3::ZERO;
        self.scale = Vec3::ONE;
    }

    /// Model matrix for one cube at elapsed time `t` seconds.
    pub fn cube_model(&self, index: usize, t: f32) -> Mat4 {
        Mat4::from_translation(self.translate)
            * Mat4::from_translation(CUBE_POSITIONS[index])
            * Mat4::from_axis_angle(Vec3::ONE.normalize(), t * BASE_SPIN_RATE)
            * Mat4::from_rotation_x(t * self.spin_rate.x)
            * Mat4::from_rotation_y(t * self.spin_rate.y)
            * Mat4::from_rotation_z(t * self.spin_rate.z)
            * Mat4::from_scale(self.scale)
    }
}

/// Model matrix shared by the skybox faces and the terrain mesh.
pub fn enclosure_model() -> Mat4 {
    Mat4::from_scale(Vec3::splat(ENCLOSURE_SCALE))
}
