// src/simulation/mod.rs
//! Simulation system
//!
//! Player movement, dynamic bodies and the per-frame driver that steps them.

pub mod animation;
pub mod body;
pub mod floor;
pub mod manager;
pub mod player;
pub mod room;
pub mod traits;
pub mod world;
