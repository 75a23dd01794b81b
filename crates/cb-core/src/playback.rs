//! Clock-driven playback scheduler.
//!
//! `Playback` owns the normalized progress value and a single armed flag
//! standing in for the host's repeating animation-frame callback. The host
//! calls `tick` with a monotonic timestamp while `is_armed()` is true and
//! cancels its callback as soon as it turns false.

use serde::{Deserialize, Serialize};

/// What happens when progress reaches the end of the last segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackEnd {
    /// Auto-pause and rewind to 0 (editor).
    #[default]
    Stop,
    /// Jump back to 0 and keep playing (preview).
    Loop,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Result of one clock callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Not armed; nothing happened.
    Idle,
    /// Progress moved forward to the contained value.
    Advanced(f64),
    /// The end was reached under `PlaybackEnd::Stop`. Progress is back at 0
    /// and the ticker is disarmed.
    Finished,
    /// The end was reached under `PlaybackEnd::Loop`; progress restarted at 0.
    Looped,
    /// Fewer than two keyframes remain, so playback was stopped.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    state: PlaybackState,
    progress: f64,
    /// Duration of one segment, in the same unit as the tick timestamps.
    speed: f64,
    end: PlaybackEnd,
    armed: bool,
    last_tick: Option<f64>,
}

impl Playback {
    pub fn new(speed: f64, end: PlaybackEnd) -> Self {
        Self {
            state: PlaybackState::Stopped,
            progress: 0.0,
            speed,
            end,
            armed: false,
            last_tick: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Whether the host should keep its repeating callback alive.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn end_policy(&self) -> PlaybackEnd {
        self.end
    }

    /// Change the segment duration. The running ticker picks it up on its
    /// next callback. Non-positive or non-finite values are ignored.
    pub fn set_speed(&mut self, speed: f64) -> bool {
        if !(speed.is_finite() && speed > 0.0) {
            return false;
        }
        self.speed = speed;
        true
    }

    /// Start from the beginning. Refused with fewer than two keyframes.
    pub fn play(&mut self, frame_count: usize) -> bool {
        if frame_count < 2 {
            return false;
        }
        self.progress = 0.0;
        self.arm();
        log::debug!("playback started ({frame_count} frames, speed {})", self.speed);
        true
    }

    /// Continue from the current progress.
    pub fn resume(&mut self, frame_count: usize) -> bool {
        if frame_count < 2 {
            return false;
        }
        self.arm();
        log::debug!("playback resumed at {:.3}", self.progress);
        true
    }

    /// Halt, keeping the current progress.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
            self.disarm();
            log::debug!("playback paused at {:.3}", self.progress);
        }
    }

    /// Halt and rewind to 0.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.progress = 0.0;
        self.disarm();
    }

    /// Play/pause toggle. Starting always rewinds to 0. Returns whether
    /// playback is running afterwards.
    pub fn toggle(&mut self, frame_count: usize) -> bool {
        if frame_count < 2 {
            return self.is_playing();
        }
        if self.is_playing() {
            self.pause();
        } else {
            self.play(frame_count);
        }
        self.is_playing()
    }

    /// Cancel playback if the animation no longer has a segment to play.
    pub fn sync_frame_count(&mut self, frame_count: usize) {
        if frame_count < 2 && self.state != PlaybackState::Stopped {
            log::debug!("playback cancelled: {frame_count} frame(s) left");
            self.stop();
        }
    }

    /// Advance by the wall time elapsed since the previous tick.
    ///
    /// The first tick after arming only records the timestamp. A clock that
    /// runs backwards contributes no time.
    pub fn tick(&mut self, now: f64, frame_count: usize) -> TickOutcome {
        if !self.armed {
            return TickOutcome::Idle;
        }
        if frame_count < 2 {
            self.stop();
            return TickOutcome::Cancelled;
        }

        let elapsed = match self.last_tick.replace(now) {
            Some(prev) => (now - prev).max(0.0),
            None => 0.0,
        };
        let delta = elapsed / (self.speed * (frame_count - 1) as f64);
        let next = self.progress + delta;
        log::trace!("tick +{elapsed:.1} -> {next:.4}");

        if next < 1.0 {
            self.progress = next;
            return TickOutcome::Advanced(next);
        }

        match self.end {
            PlaybackEnd::Stop => {
                self.stop();
                log::debug!("playback finished");
                TickOutcome::Finished
            }
            PlaybackEnd::Loop => {
                self.progress = 0.0;
                TickOutcome::Looped
            }
        }
    }

    fn arm(&mut self) {
        self.state = PlaybackState::Playing;
        self.armed = true;
        self.last_tick = None;
    }

    fn disarm(&mut self) {
        self.armed = false;
        self.last_tick = None;
    }
}
