//! Simulation manager
//!
//! Owns the attached simulation and applies pause, time scale and an
//! optional fixed timestep before handing time to it.

use super::traits::Simulation;
use crate::camera::InputSnapshot;

/// Upper bound on catch-up steps per frame in fixed-timestep mode
const MAX_FIXED_STEPS_PER_FRAME: u32 = 8;

/// Drives one simulation per frame
pub struct SimulationManager {
    simulation: Option<Box<dyn Simulation>>,
    is_paused: bool,
    time_scale: f32,
    accumulated_time: f32,
    fixed_timestep: Option<f32>, // For deterministic simulations
    /// Input not yet seen by any step; edges survive frames that run no step
    pending_input: InputSnapshot,
}

impl SimulationManager {
    /// Create a new simulation manager
    pub fn new() -> Self {
        Self {
            simulation: None,
            is_paused: false,
            time_scale: 1.0,
            accumulated_time: 0.0,
            fixed_timestep: None,
            pending_input: InputSnapshot::default(),
        }
    }

    /// Attach a simulation, cleaning up any previous one
    pub fn attach_simulation(&mut self, mut simulation: Box<dyn Simulation>) {
        if let Some(mut old_sim) = self.simulation.take() {
            log::info!("detaching simulation '{}'", old_sim.name());
            old_sim.cleanup();
        }

        simulation.initialize();
        log::info!("attached simulation '{}'", simulation.name());
        self.simulation = Some(simulation);
        self.is_paused = false;
    }

    /// Remove current simulation
    pub fn detach_simulation(&mut self) {
        if let Some(mut sim) = self.simulation.take() {
            sim.cleanup();
        }
    }

    /// Update simulation (called every frame)
    ///
    /// In fixed-timestep mode the input edges are delivered to the first
    /// sub-step that runs, which may be in a later call; other sub-steps see
    /// held intents alone.
    pub fn update(&mut self, delta_time: f32, input: &InputSnapshot) {
        if self.is_paused {
            return;
        }

        let Some(simulation) = &mut self.simulation else {
            return;
        };
        self.pending_input.accumulate(input);
        let scaled_delta = delta_time.max(0.0) * self.time_scale;

        match self.fixed_timestep {
            Some(fixed_dt) => {
                self.accumulated_time += scaled_delta;

                let mut steps = 0;
                while self.accumulated_time >= fixed_dt {
                    if steps == MAX_FIXED_STEPS_PER_FRAME {
                        log::warn!(
                            "dropping {:.3}s of simulation time after {} catch-up steps",
                            self.accumulated_time,
                            steps
                        );
                        self.accumulated_time = 0.0;
                        break;
                    }
                    simulation.update(fixed_dt, &self.pending_input);
                    self.pending_input = self.pending_input.held_only();
                    self.accumulated_time -= fixed_dt;
                    steps += 1;
                }
            }
            None => {
                simulation.update(scaled_delta, &self.pending_input);
                self.pending_input = self.pending_input.held_only();
            }
        }
    }

    pub fn current_simulation_name(&self) -> Option<&str> {
        self.simulation.as_ref().map(|s| s.name())
    }

    /// `true` if a simulation exists and is not paused
    pub fn is_running(&self) -> bool {
        !self.is_paused && self.simulation.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.is_paused = paused;
        if let Some(simulation) = &mut self.simulation {
            simulation.set_running(!paused);
        }
    }

    /// Enable fixed timestep mode, or `None` for variable timestep
    pub fn set_fixed_timestep(&mut self, timestep: Option<f32>) {
        self.fixed_timestep = timestep.filter(|dt| *dt > 0.0);
        self.accumulated_time = 0.0; // Reset accumulator
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set time scale (1.0 = normal speed)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0); // Prevent negative time
    }

    pub fn has_simulation(&self) -> bool {
        self.simulation.is_some()
    }

    pub fn reset(&mut self) {
        self.accumulated_time = 0.0;
        self.pending_input = InputSnapshot::default();
        if let Some(simulation) = &mut self.simulation {
            simulation.reset();
        }
    }
}

impl Default for SimulationManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorded {
        steps: Vec<f32>,
        grabs: u32,
        releases: u32,
        look_x: f32,
    }

    struct Recorder {
        log: Rc<RefCell<Recorded>>,
        running: bool,
    }

    impl Simulation for Recorder {
        fn update(&mut self, delta_time: f32, input: &InputSnapshot) {
            let mut log = self.log.borrow_mut();
            log.steps.push(delta_time);
            if input.grab_pressed {
                log.grabs += 1;
            }
            if input.grab_released {
                log.releases += 1;
            }
            log.look_x += input.look_delta.0;
        }
        fn name(&self) -> &str {
            "recorder"
        }
        fn is_running(&self) -> bool {
            self.running
        }
        fn set_running(&mut self, running: bool) {
            self.running = running;
        }
        fn reset(&mut self) {}
    }

    fn manager_with_recorder() -> (SimulationManager, Rc<RefCell<Recorded>>) {
        let log = Rc::new(RefCell::new(Recorded::default()));
        let mut manager = SimulationManager::new();
        manager.attach_simulation(Box::new(Recorder {
            log: Rc::clone(&log),
            running: true,
        }));
        (manager, log)
    }

    #[test]
    fn test_variable_step_applies_time_scale() {
        let (mut manager, log) = manager_with_recorder();
        manager.set_time_scale(0.5);
        manager.update(0.02, &InputSnapshot::default());
        assert_eq!(log.borrow().steps, vec![0.01]);
    }

    #[test]
    fn test_paused_manager_does_not_step() {
        let (mut manager, log) = manager_with_recorder();
        manager.set_paused(true);
        manager.update(0.02, &InputSnapshot::default());
        assert!(log.borrow().steps.is_empty());
    }

    #[test]
    fn test_fixed_step_delivers_edges_once() {
        let (mut manager, log) = manager_with_recorder();
        manager.set_fixed_timestep(Some(0.01));
        let input = InputSnapshot {
            grab_pressed: true,
            ..InputSnapshot::default()
        };
        manager.update(0.035, &input);

        let log = log.borrow();
        assert_eq!(log.steps.len(), 3);
        assert_eq!(log.grabs, 1);
    }

    #[test]
    fn test_fixed_step_keeps_edges_until_a_step_runs() {
        let (mut manager, log) = manager_with_recorder();
        manager.set_fixed_timestep(Some(1.0 / 60.0));
        let release = InputSnapshot {
            grab_released: true,
            look_delta: (4.0, 0.0),
            ..InputSnapshot::default()
        };

        // Display runs at twice the fixed rate; the first call runs no step.
        manager.update(1.0 / 120.0, &release);
        assert!(log.borrow().steps.is_empty());
        manager.update(1.0 / 120.0, &InputSnapshot::default());
        manager.update(1.0 / 120.0, &InputSnapshot::default());

        let log = log.borrow();
        assert_eq!(log.steps.len(), 1);
        assert_eq!(log.releases, 1);
        assert_eq!(log.look_x, 4.0);
    }

    #[test]
    fn test_fixed_step_caps_catch_up() {
        let (mut manager, log) = manager_with_recorder();
        manager.set_fixed_timestep(Some(0.001));
        manager.update(1.0, &InputSnapshot::default());
        assert_eq!(log.borrow().steps.len(), MAX_FIXED_STEPS_PER_FRAME as usize);
    }
}
