use winit::{
    event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::simulation::player::{MovementCommand, SpeedMode};

/// Everything the simulation needs from the input devices for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSnapshot {
    pub command: MovementCommand,
    /// Grab button went down since the last snapshot
    pub grab_pressed: bool,
    /// Grab button went up since the last snapshot
    pub grab_released: bool,
    /// Movement and look are only honoured while the pointer is locked
    pub pointer_locked: bool,
    /// Accumulated mouse motion in pixels since the last snapshot
    pub look_delta: (f32, f32),
}

impl InputSnapshot {
    /// Same held intents with the one-shot parts (edges, look motion) removed
    pub fn held_only(&self) -> Self {
        Self {
            command: self.command,
            pointer_locked: self.pointer_locked,
            ..Self::default()
        }
    }

    /// Fold a later frame into this one: held state is replaced, edges are
    /// OR-ed and look motion is summed.
    pub fn accumulate(&mut self, later: &InputSnapshot) {
        self.command = later.command;
        self.pointer_locked = later.pointer_locked;
        self.grab_pressed |= later.grab_pressed;
        self.grab_released |= later.grab_released;
        self.look_delta.0 += later.look_delta.0;
        self.look_delta.1 += later.look_delta.1;
    }
}

/// Collects winit events between frames and hands out one [`InputSnapshot`]
/// per frame.
pub struct InputController {
    is_forward_held: bool,
    is_backward_held: bool,
    is_left_held: bool,
    is_right_held: bool,
    is_run_held: bool,
    is_pointer_locked: bool,
    grab_pressed: bool,
    grab_released: bool,
    look_delta: (f32, f32),
}

impl InputController {
    pub fn new() -> Self {
        Self {
            is_forward_held: false,
            is_backward_held: false,
            is_left_held: false,
            is_right_held: false,
            is_run_held: false,
            is_pointer_locked: false,
            grab_pressed: false,
            grab_released: false,
            look_delta: (0.0, 0.0),
        }
    }

    pub fn process_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.process_keyboard_event(event),
            WindowEvent::MouseInput { state, button, .. } => {
                self.process_mouse_button(*button, *state)
            }
            WindowEvent::Focused(false) => {
                // Key releases are not delivered while unfocused.
                self.release_held();
                self.set_pointer_locked(false);
            }
            _ => (),
        }
    }

    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.process_mouse_motion(delta.0 as f32, delta.1 as f32);
        }
    }

    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(code) = event.physical_key {
            self.process_key(code, event.state);
        }
    }

    /// Press sets an intent, release clears it.
    pub fn process_key(&mut self, code: KeyCode, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match code {
            KeyCode::KeyW | KeyCode::ArrowUp => self.is_forward_held = pressed,
            KeyCode::KeyS | KeyCode::ArrowDown => self.is_backward_held = pressed,
            KeyCode::KeyA | KeyCode::ArrowLeft => self.is_left_held = pressed,
            KeyCode::KeyD | KeyCode::ArrowRight => self.is_right_held = pressed,
            KeyCode::ShiftLeft | KeyCode::ShiftRight => self.is_run_held = pressed,
            KeyCode::Escape if pressed => self.set_pointer_locked(false),
            _ => (),
        }
    }

    /// Left button: the first click locks the pointer; once locked, press and
    /// release become grab and release edges.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left {
            return;
        }
        match state {
            ElementState::Pressed if !self.is_pointer_locked => self.set_pointer_locked(true),
            ElementState::Pressed => self.grab_pressed = true,
            ElementState::Released => self.grab_released = true,
        }
    }

    /// Drop every held movement intent
    pub fn release_held(&mut self) {
        self.is_forward_held = false;
        self.is_backward_held = false;
        self.is_left_held = false;
        self.is_right_held = false;
        self.is_run_held = false;
    }

    pub fn process_mouse_motion(&mut self, dx: f32, dy: f32) {
        if self.is_pointer_locked {
            self.look_delta.0 += dx;
            self.look_delta.1 += dy;
        }
    }

    pub fn set_pointer_locked(&mut self, locked: bool) {
        if locked != self.is_pointer_locked {
            log::debug!("pointer lock changed: {}", locked);
        }
        self.is_pointer_locked = locked;
        if !locked {
            self.look_delta = (0.0, 0.0);
        }
    }

    pub fn is_pointer_locked(&self) -> bool {
        self.is_pointer_locked
    }

    /// Current held intents, without consuming edges
    pub fn command(&self) -> MovementCommand {
        MovementCommand {
            forward: self.is_forward_held,
            backward: self.is_backward_held,
            strafe_left: self.is_left_held,
            strafe_right: self.is_right_held,
            speed: if self.is_run_held {
                SpeedMode::Run
            } else {
                SpeedMode::Walk
            },
        }
    }

    /// Assemble this frame's snapshot and clear one-shot edges and look motion.
    pub fn snapshot(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            command: self.command(),
            grab_pressed: self.grab_pressed,
            grab_released: self.grab_released,
            pointer_locked: self.is_pointer_locked,
            look_delta: self.look_delta,
        };
        self.grab_pressed = false;
        self.grab_released = false;
        self.look_delta = (0.0, 0.0);
        snapshot
    }
}

impl Default for InputController {
    fn default() -> Self {
        Self::new()
    }
}
