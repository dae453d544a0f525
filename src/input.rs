use crate::camera::{CameraMovement, FlyCamera};
use crate::scene::SceneTransformState;
use glam::Vec3;
use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Per-frame step for spin-rate, scale, and translation adjustments.
const TRANSFORM_STEP: f32 = 0.01;

const TRACKED: [KeyCode; 15] = [
    KeyCode::KeyW,
    KeyCode::KeyS,
    KeyCode::KeyA,
    KeyCode::KeyD,
    KeyCode::KeyQ,
    KeyCode::KeyE,
    KeyCode::KeyU,
    KeyCode::KeyJ,
    KeyCode::KeyI,
    KeyCode::KeyK,
    KeyCode::KeyO,
    KeyCode::KeyL,
    KeyCode::KeyR,
    KeyCode::ShiftRight,
    KeyCode::ControlRight,
];

/// Pressed-key table fed from window key events and read by the per-frame
/// movement dispatch.
#[derive(Default)]
pub struct KeyState {
    pressed: HashSet<KeyCode>,
}

impl KeyState {
    /// Returns whether the event concerned a key this table tracks;
    /// untracked keys (Escape among them) fall through to the caller.
    pub fn process(&mut self, event: &KeyEvent) -> bool {
        let PhysicalKey::Code(code) = event.physical_key else {
            return false;
        };
        if !TRACKED.contains(&code) {
            return false;
        }
        self.set(code, event.state == ElementState::Pressed);
        true
    }

    pub fn is_pressed(&self, code: KeyCode) -> bool {
        self.pressed.contains(&code)
    }

    fn set(&mut self, code: KeyCode, pressed: bool) {
        if pressed {
            self.pressed.insert(code);
        } else {
            self.pressed.remove(&code);
        }
    }
}

/// Applies the key table to the camera and the cube transform state for
/// one frame. W/S/A/D move in the horizontal basis, Q/E fly up and down.
/// U/J, I/K, O/L step the X/Y/Z spin rates; with Right-Shift held they
/// step the scale instead, with Right-Ctrl the translation. R resets spin
/// and scale.
pub fn apply_movement(
    keys: &KeyState,
    camera: &mut FlyCamera,
    scene: &mut SceneTransformState,
    dt: f32,
) {
    let moves = [
        (KeyCode::KeyW, CameraMovement::Forward),
        (KeyCode::KeyS, CameraMovement::Backward),
        (KeyCode::KeyA, CameraMovement::Left),
        (KeyCode::KeyD, CameraMovement::Right),
        (KeyCode::KeyQ, CameraMovement::Up),
        (KeyCode::KeyE, CameraMovement::Down),
    ];
    for (code, direction) in moves {
        if keys.is_pressed(code) {
            camera.process_keyboard(direction, dt);
        }
    }

    let axes = [
        (KeyCode::KeyU, KeyCode::KeyJ, Vec3::X),
        (KeyCode::KeyI, KeyCode::KeyK, Vec3::Y),
        (KeyCode::KeyO, KeyCode::KeyL, Vec3::Z),
    ];
    for (increase, decrease, axis) in axes {
        let mut step = 0.0;
        if keys.is_pressed(increase) {
            step += TRANSFORM_STEP;
        }
        if keys.is_pressed(decrease) {
            step -= TRANSFORM_STEP;
        }
        if step == 0.0 {
            continue;
        }
        if keys.is_pressed(KeyCode::ShiftRight) {
            scene.scale += axis * step;
        } else if keys.is_pressed(KeyCode::ControlRight) {
            scene.translate += axis * step;
        } else {
            scene.spin_rate += axis * step;
        }
    }

    if keys.is_pressed(KeyCode::KeyR) {
        scene.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn pressed(codes: &[KeyCode]) -> KeyState {
        let mut keys = KeyState::default();
        for code in codes {
            keys.set(*code, true);
        }
        keys
    }

    #[test]
    fn press_and_release_bookkeeping() {
        let mut keys = KeyState::default();
        keys.set(KeyCode::KeyW, true);
        assert!(keys.is_pressed(KeyCode::KeyW));
        keys.set(KeyCode::KeyW, false);
        assert!(!keys.is_pressed(KeyCode::KeyW));
    }

    #[test]
    fn movement_keys_drive_the_camera() {
        let keys = pressed(&[KeyCode::KeyW, KeyCode::KeyD]);
        let mut camera = FlyCamera::new(Vec3::ZERO);
        let mut scene = SceneTransformState::default();

        apply_movement(&keys, &mut camera, &mut scene, 0.1);
        let along_front = camera.position.dot(camera.front());
        let along_right = camera.position.dot(camera.right());
        assert!(along_front > 0.0);
        assert!(along_right > 0.0);
    }

    #[test]
    fn bare_axis_keys_step_spin_rate() {
        let keys = pressed(&[KeyCode::KeyU, KeyCode::KeyK]);
        let mut camera = FlyCamera::new(Vec3::ZERO);
        let mut scene = SceneTransformState::default();

        apply_movement(&keys, &mut camera, &mut scene, 0.016);
        assert!((scene.spin_rate.x - TRANSFORM_STEP).abs() < EPS);
        assert!((scene.spin_rate.y + TRANSFORM_STEP).abs() < EPS);
        assert_eq!(scene.scale, Vec3::ONE);
        assert_eq!(scene.translate, Vec3::ZERO);
    }

    #[test]
    fn shift_turns_axis_keys_into_scale() {
        let keys = pressed(&[KeyCode::KeyO, KeyCode::ShiftRight]);
        let mut camera = FlyCamera::new(Vec3::ZERO);
        let mut scene = SceneTransformState::default();

        apply_movement(&keys, &mut camera, &mut scene, 0.016);
        assert!((scene.scale.z - (1.0 + TRANSFORM_STEP)).abs() < EPS);
        assert_eq!(scene.spin_rate, Vec3::ZERO);
    }

    #[test]
    fn ctrl_turns_axis_keys_into_translation() {
        let keys = pressed(&[KeyCode::KeyI, KeyCode::ControlRight]);
        let mut camera = FlyCamera::new(Vec3::ZERO);
        let mut scene = SceneTransformState::default();

        apply_movement(&keys, &mut camera, &mut scene, 0.016);
        assert!((scene.translate.y - TRANSFORM_STEP).abs() < EPS);
        assert_eq!(scene.spin_rate, Vec3::ZERO);
    }

    #[test]
    fn opposing_keys_cancel() {
        let keys = pressed(&[KeyCode::KeyU, KeyCode::KeyJ]);
        let mut camera = FlyCamera::new(Vec3::ZERO);
        let mut scene = SceneTransformState::default();

        apply_movement(&keys, &mut camera, &mut scene, 0.016);
        assert_eq!(scene.spin_rate, Vec3::ZERO);
    }

    #[test]
    fn reset_key_restores_transforms() {
        let keys = pressed(&[KeyCode::KeyR]);
        let mut camera = FlyCamera::new(Vec3::ZERO);
        let mut scene = SceneTransformState {
            scale: Vec3::splat(3.0),
            spin_rate: Vec3::splat(0.5),
            ..Default::default()
        };

        apply_movement(&keys, &mut camera, &mut scene, 0.016);
        assert_eq!(scene.scale, Vec3::ONE);
        assert_eq!(scene.spin_rate, Vec3::ZERO);
    }
}
