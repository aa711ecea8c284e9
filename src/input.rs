// Held-key tracking and the per-tick action snapshot handed to the simulation

use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Logical actions sampled once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Input {
    pub forward: bool,
    pub backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub restart: bool,
}

impl Input {
    /// -1, 0 or +1 from a pair of opposing flags.
    #[inline]
    pub fn axis(negative: bool, positive: bool) -> f32 {
        (positive as i8 - negative as i8) as f32
    }

    #[inline]
    pub fn turn(&self) -> f32 {
        Self::axis(self.turn_left, self.turn_right)
    }

    /// Opposing turn keys cancel out and leave translation enabled.
    #[inline]
    pub fn is_turning(&self) -> bool {
        self.turn() != 0.0
    }
}

#[derive(Default)]
pub struct KeyState {
    held: HashSet<KeyCode>,
}

impl KeyState {
    pub fn process_key(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(code) = event.physical_key {
            self.set(code, event.state == ElementState::Pressed);
        }
    }

    pub fn set(&mut self, code: KeyCode, pressed: bool) {
        if pressed {
            self.held.insert(code);
        } else {
            self.held.remove(&code);
        }
    }

    /// Window lost focus: release events won't arrive.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    fn any(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.held.contains(c))
    }

    pub fn snapshot(&self) -> Input {
        Input {
            forward: self.any(&[KeyCode::KeyW, KeyCode::ArrowUp]),
            backward: self.any(&[KeyCode::KeyS, KeyCode::ArrowDown]),
            strafe_left: self.any(&[KeyCode::KeyA]),
            strafe_right: self.any(&[KeyCode::KeyD]),
            turn_left: self.any(&[KeyCode::KeyQ, KeyCode::ArrowLeft]),
            turn_right: self.any(&[KeyCode::KeyE, KeyCode::ArrowRight]),
            restart: self.any(&[KeyCode::KeyR, KeyCode::Enter]),
        }
    }
}
