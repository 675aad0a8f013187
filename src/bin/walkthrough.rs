//! # Headless walkthrough
//!
//! Scripted session against the room simulation: walk up to the sphere,
//! pick it up, turn, throw it and watch it bounce off the walls. Poses are
//! logged instead of rendered.
//!
//! ## Usage:
//! ```bash
//! RUST_LOG=info cargo run --bin walkthrough
//! RUST_LOG=debug cargo run --bin walkthrough -- --floor-follow --frames 600
//! ```

use std::time::Duration;

use anyhow::{bail, Context, Result};
use atrium::prelude::*;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

const FRAME: Duration = Duration::from_micros(16_667);

struct Args {
    floor_follow: bool,
    frames: u32,
    restitution: f32,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        floor_follow: false,
        frames: 300,
        restitution: -0.6,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--floor-follow" => args.floor_follow = true,
            "--frames" => {
                let value = iter.next().context("--frames needs a value")?;
                args.frames = value
                    .parse()
                    .with_context(|| format!("invalid frame count '{value}'"))?;
            }
            "--restitution" => {
                let value = iter.next().context("--restitution needs a value")?;
                args.restitution = value
                    .parse()
                    .with_context(|| format!("invalid restitution '{value}'"))?;
            }
            other => bail!("unknown argument '{other}'"),
        }
    }
    Ok(args)
}

/// Pitch that puts the view centre on `target` from `eye` (yaw assumed 0).
fn pitch_towards(eye: Vector3<f32>, target: Vector3<f32>) -> f32 {
    let to_target = target - eye;
    (to_target.y / to_target.magnitude()).asin()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let policy = if args.floor_follow {
        CollisionPolicy::FloorFollow
    } else {
        CollisionPolicy::SphereExclusion {
            clamp_to_room: true,
        }
    };
    let config = SimConfig::builder()
        .with_collision_policy(policy)
        .with_wall_restitution(args.restitution)
        .build()
        .context("building scene configuration")?;

    let mut room = RoomSimulation::new(config).with_avatar(CharacterRig::default());
    room.initialize();

    let mut input = InputController::new();
    let mut clock = FrameClock::new(room.config().max_frame_dt);

    for frame in 0..args.frames {
        match frame {
            // First click only captures the pointer.
            0 => input.process_mouse_button(MouseButton::Left, ElementState::Pressed),
            1 => input.process_key(KeyCode::KeyW, ElementState::Pressed),
            60 => {
                input.process_key(KeyCode::KeyW, ElementState::Released);
                let eye = room.player().pose.position;
                let sphere = room.bodies().bodies()[0].position;
                room.camera_mut().set_pitch(pitch_towards(eye, sphere));
            }
            61 => input.process_mouse_button(MouseButton::Left, ElementState::Pressed),
            62..=90 => input.process_mouse_motion(12.0, -2.0),
            91 => input.process_mouse_button(MouseButton::Left, ElementState::Released),
            _ => {}
        }

        // One long stall to show the dt clamp at work.
        let frame_time = if frame == 120 {
            Duration::from_millis(750)
        } else {
            FRAME
        };
        let dt = clock.record(frame_time);
        let out = room.frame(dt, &input.snapshot());

        if frame % 30 == 0 || frame == 61 || frame == 91 {
            let body = &out.bodies[0];
            log::info!(
                "frame {:>4} eye ({:6.2}, {:5.2}, {:6.2}) sphere ({:6.2}, {:5.2}, {:6.2}){}",
                out.frame,
                out.camera.position.x,
                out.camera.position.y,
                out.camera.position.z,
                body.position.x,
                body.position.y,
                body.position.z,
                if body.held { " [held]" } else { "" }
            );
        }
    }

    let metrics = clock.metrics();
    log::info!(
        "simulated {} frames, avg {:.2}ms, {} clamped",
        args.frames,
        metrics.frame_time_ms,
        metrics.clamped_frames
    );
    Ok(())
}
