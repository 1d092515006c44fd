//! Rest countdown state machine
//!
//! The machine never touches devices or widgets. Every operation returns the
//! effects the owner must apply, in order.

use std::{num::NonZeroU32, time::Duration};

use crate::{services::VibrationPattern, settings::Settings};
use super::Frame;

/// Spacing between ticks
pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// What the alert at the end of a rest should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionAlert {
    pub vibrate: bool,
    pub play_sound: bool,
}

/// Side effect requested by the countdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Redraw the countdown area
    Render(Frame),
    /// Vibration pulse outside the completion alert
    Vibrate(VibrationPattern),
    /// The rest is over; fired once per session
    Complete(CompletionAlert),
    /// Deliver `tick(generation)` after `delay`
    ScheduleTick { generation: u64, delay: Duration },
}

/// Countdown session
#[derive(Debug, Default)]
pub struct RestCountdown {
    seconds_remaining: u32,
    alerts_armed: bool,
    generation: u64,
}

impl RestCountdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn alerts_armed(&self) -> bool {
        self.alerts_armed
    }

    pub fn is_counting(&self) -> bool {
        self.seconds_remaining > 0
    }

    /// Start a new session, replacing any running one at full length
    pub fn start_rest(&mut self, seconds: NonZeroU32, settings: &Settings) -> Vec<Effect> {
        self.generation += 1;
        self.seconds_remaining = seconds.get();

        let mut effects = Vec::new();
        if settings.vibrate {
            effects.push(Effect::Vibrate(VibrationPattern::START));
        }
        self.advance(settings, &mut effects);
        effects
    }

    /// End the current session without an alert
    pub fn stop_rest(&mut self, settings: &Settings) -> Vec<Effect> {
        self.generation += 1;
        self.seconds_remaining = 0;
        self.alerts_armed = false;

        let mut effects = Vec::new();
        self.advance(settings, &mut effects);
        effects
    }

    /// Scheduled tick. Ticks from a superseded session do nothing.
    pub fn tick(&mut self, generation: u64, settings: &Settings) -> Vec<Effect> {
        let mut effects = Vec::new();
        if generation == self.generation {
            self.advance(settings, &mut effects);
        }
        effects
    }

    fn advance(&mut self, settings: &Settings, effects: &mut Vec<Effect>) {
        if self.seconds_remaining > 0 {
            self.alerts_armed = true;
            effects.push(Effect::Render(Frame::resting(self.seconds_remaining)));
            self.seconds_remaining -= 1;
            effects.push(Effect::ScheduleTick {
                generation: self.generation,
                delay: TICK_INTERVAL,
            });
        } else {
            if self.alerts_armed {
                effects.push(Effect::Complete(CompletionAlert {
                    vibrate: settings.vibrate,
                    play_sound: settings.play_sound,
                }));
                self.alerts_armed = false;
            }
            effects.push(Effect::Render(Frame::idle(settings.start_timer_control)));
        }
    }
}

/// Parse the duration field. Only positive whole seconds start a rest.
pub fn parse_rest_seconds(text: &str) -> Option<NonZeroU32> {
    text.trim().parse().ok()
}
