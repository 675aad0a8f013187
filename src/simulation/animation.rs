//! Walk-cycle limb swing for a blocky avatar
//!
//! Each limb rotates about its hinge at a constant angular rate and bounces
//! between `-swing_limit` and `+swing_limit`. Arms and legs start in opposite
//! phase. When the avatar stops, limbs finish their current half-swing back
//! to neutral and rest there.

use std::f32::consts::FRAC_PI_4;

/// Which limb of the rig
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimbKind {
    RightArm,
    LeftArm,
    RightLeg,
    LeftLeg,
}

/// A single swinging limb
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limb {
    pub kind: LimbKind,
    /// Current hinge angle in radians
    pub angle: f32,
    /// Signed angular rate in radians per second
    pub rate: f32,
}

impl Limb {
    pub fn new(kind: LimbKind, rate: f32) -> Self {
        Self {
            kind,
            angle: 0.0,
            rate,
        }
    }

    fn swing(&mut self, dt: f32, limit: f32) {
        self.angle += self.rate * dt;
        if self.angle > limit {
            self.angle = limit;
            self.rate = -self.rate.abs();
        } else if self.angle < -limit {
            self.angle = -limit;
            self.rate = self.rate.abs();
        }
    }

    /// Swing towards neutral; returns true once at rest.
    fn settle(&mut self, dt: f32, limit: f32) -> bool {
        if self.angle == 0.0 {
            return true;
        }
        let before = self.angle;
        self.swing(dt, limit);
        if before.signum() != self.angle.signum() || self.angle == 0.0 {
            self.angle = 0.0;
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GaitState {
    Idle,
    Walking,
    Settling,
}

/// Four-limb avatar driven by whether the player is moving
#[derive(Debug, Clone)]
pub struct CharacterRig {
    limbs: [Limb; 4],
    swing_limit: f32,
    gait: GaitState,
}

impl CharacterRig {
    /// Rig swinging at `rate` radians per second between +-45 degrees.
    pub fn new(rate: f32) -> Self {
        let rate = rate.abs();
        Self {
            limbs: [
                Limb::new(LimbKind::RightArm, rate),
                Limb::new(LimbKind::LeftArm, -rate),
                Limb::new(LimbKind::RightLeg, -rate),
                Limb::new(LimbKind::LeftLeg, rate),
            ],
            swing_limit: FRAC_PI_4,
            gait: GaitState::Idle,
        }
    }

    pub fn limbs(&self) -> &[Limb; 4] {
        &self.limbs
    }

    pub fn limb(&self, kind: LimbKind) -> &Limb {
        // Every kind is present exactly once.
        &self.limbs[kind as usize]
    }

    pub fn swing_limit(&self) -> f32 {
        self.swing_limit
    }

    pub fn is_animating(&self) -> bool {
        self.gait != GaitState::Idle
    }

    pub fn update(&mut self, dt: f32, moving: bool) {
        let limit = self.swing_limit;
        self.gait = match (self.gait, moving) {
            (_, true) => GaitState::Walking,
            (GaitState::Idle, false) => GaitState::Idle,
            (_, false) => GaitState::Settling,
        };

        match self.gait {
            GaitState::Idle => {}
            GaitState::Walking => {
                for limb in &mut self.limbs {
                    limb.swing(dt, limit);
                }
            }
            GaitState::Settling => {
                let mut all_rest = true;
                for limb in &mut self.limbs {
                    all_rest &= limb.settle(dt, limit);
                }
                if all_rest {
                    log::trace!("character rig at rest");
                    self.gait = GaitState::Idle;
                }
            }
        }
    }

    pub fn reset(&mut self) {
        for limb in &mut self.limbs {
            limb.angle = 0.0;
        }
        self.gait = GaitState::Idle;
    }
}

impl Default for CharacterRig {
    fn default() -> Self {
        // 0.03 rad per frame at 60 Hz
        Self::new(1.8)
    }
}
