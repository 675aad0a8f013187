//! # Frame clock
//!
//! Supplies the per-frame `dt` and keeps rolling frame-time statistics.
//!
//! ## Usage
//!
//! ```no_run
//! use atrium::performance::FrameClock;
//!
//! let mut clock = FrameClock::new(0.1);
//! loop {
//!     let dt = clock.tick();
//!     // ... step the simulation with dt ...
//! #   break;
//! }
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Rolling frame-time statistics
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceMetrics {
    /// Current frames per second
    pub fps: f32,
    /// Average frame time in milliseconds
    pub frame_time_ms: f32,
    /// Minimum frame time in the current window
    pub min_frame_time_ms: f32,
    /// Maximum frame time in the current window
    pub max_frame_time_ms: f32,
    /// Frames whose raw duration exceeded the clamp
    pub clamped_frames: u64,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: f32::MAX,
            max_frame_time_ms: 0.0,
            clamped_frames: 0,
        }
    }
}

/// Measures wall-clock time between frames
pub struct FrameClock {
    /// Ring buffer of recent raw frame times for averaging
    frame_times: VecDeque<Duration>,
    /// Maximum number of frame times to keep for averaging
    max_samples: usize,
    last_tick: Option<Instant>,
    max_dt: f32,
    current_metrics: PerformanceMetrics,
}

impl FrameClock {
    /// Clock that never reports more than `max_dt` seconds per frame
    pub fn new(max_dt: f32) -> Self {
        Self::with_config(max_dt, 120) // ~2 seconds at 60fps
    }

    pub fn with_config(max_dt: f32, max_samples: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            last_tick: None,
            max_dt,
            current_metrics: PerformanceMetrics::default(),
        }
    }

    /// Seconds since the previous tick, clamped. The first tick returns 0.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = self.last_tick.map(|last| now - last);
        self.last_tick = Some(now);
        match elapsed {
            Some(frame_time) => self.record(frame_time),
            None => 0.0,
        }
    }

    /// Feed a measured frame duration; returns the clamped dt.
    pub fn record(&mut self, frame_time: Duration) -> f32 {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);

        let raw = frame_time.as_secs_f32();
        if raw > self.max_dt {
            self.current_metrics.clamped_frames += 1;
            log::debug!("frame took {:.1}ms, clamping to {:.1}ms", raw * 1000.0, self.max_dt * 1000.0);
        }
        self.update_metrics();
        raw.min(self.max_dt)
    }

    /// Update calculated metrics
    fn update_metrics(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        let total_time: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total_time / self.frame_times.len() as u32;
        let avg_frame_time_ms = avg_frame_time.as_secs_f32() * 1000.0;

        self.current_metrics.frame_time_ms = avg_frame_time_ms;
        self.current_metrics.fps = if avg_frame_time_ms > 0.0 {
            1000.0 / avg_frame_time_ms
        } else {
            0.0
        };

        if let (Some(min_time), Some(max_time)) =
            (self.frame_times.iter().min(), self.frame_times.iter().max())
        {
            self.current_metrics.min_frame_time_ms = min_time.as_secs_f32() * 1000.0;
            self.current_metrics.max_frame_time_ms = max_time.as_secs_f32() * 1000.0;
        }
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.current_metrics
    }

    /// Get frame time history in milliseconds
    pub fn frame_time_history(&self) -> Vec<f32> {
        self.frame_times
            .iter()
            .map(|duration| duration.as_secs_f32() * 1000.0)
            .collect()
    }

    /// Reset all metrics and history
    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.current_metrics = PerformanceMetrics::default();
        self.last_tick = None;
    }
}
