//! Screen controller task
//!
//! Owns the rest countdown and processes every input and tick on one task,
//! in arrival order. Ticks are timer tasks that post back into the same
//! queue; a pending timer is aborted when its session is replaced, and a
//! tick that was already queued is dropped by the generation check.

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
    time::sleep,
};
use tracing::{debug, info, warn};

use crate::{
    error::ControllerError,
    services::{AlertDevice, VibrationPattern, WakeLock},
    settings::{Settings, SettingsStore},
    state::{parse_rest_seconds, CompletionAlert, CountdownStatus, Effect, Frame, RestCountdown},
};

/// Inputs the screen reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Tap on the countdown area
    Tap,
    /// Camera button pressed down
    CameraButton,
    /// New text in the rest length field
    DurationEdited(String),
    /// Screen came to the foreground
    Resume,
    /// Screen left the foreground
    Pause,
    /// The settings screen saved new values
    SettingsChanged,
    /// Release everything and stop the controller
    Shutdown,
}

enum ControllerEvent {
    Input {
        input: Input,
        reply: Option<oneshot::Sender<CountdownStatus>>,
    },
    Tick(u64),
}

/// Cloneable handle for sending inputs and watching the countdown status
#[derive(Clone)]
pub struct ControllerHandle {
    events: mpsc::UnboundedSender<ControllerEvent>,
    status: watch::Receiver<CountdownStatus>,
}

impl ControllerHandle {
    /// Send an input and wait for the status it produced
    pub async fn dispatch(&self, input: Input) -> Result<CountdownStatus, ControllerError> {
        let (reply, status) = oneshot::channel();
        self.events
            .send(ControllerEvent::Input { input, reply: Some(reply) })
            .map_err(|_| ControllerError::Stopped)?;
        status.await.map_err(|_| ControllerError::Stopped)
    }

    /// Send an input without waiting for it to be processed
    pub fn send(&self, input: Input) -> Result<(), ControllerError> {
        self.events
            .send(ControllerEvent::Input { input, reply: None })
            .map_err(|_| ControllerError::Stopped)
    }

    /// Latest published status
    pub fn status(&self) -> CountdownStatus {
        self.status.borrow().clone()
    }

    /// Receiver notified on every status change
    pub fn subscribe(&self) -> watch::Receiver<CountdownStatus> {
        self.status.clone()
    }
}

/// Wires the countdown to the settings store, the alert device and the
/// sleep lock
pub struct ScreenController<A: AlertDevice, W: WakeLock> {
    countdown: RestCountdown,
    settings: Arc<dyn SettingsStore>,
    alerts: Arc<A>,
    wake_lock: W,
    duration_text: String,
    frame: Frame,
    resumed: bool,
    pending_tick: Option<JoinHandle<()>>,
    // Weak so the loop ends once every handle is gone and no tick is pending
    events_tx: mpsc::WeakUnboundedSender<ControllerEvent>,
    events_rx: mpsc::UnboundedReceiver<ControllerEvent>,
    status_tx: watch::Sender<CountdownStatus>,
}

impl<A: AlertDevice, W: WakeLock> ScreenController<A, W> {
    /// Activate the screen: load the rest length into the duration field
    /// and show the idle instruction
    pub fn new(settings: Arc<dyn SettingsStore>, alerts: A, wake_lock: W) -> (Self, ControllerHandle) {
        let current = load_settings(settings.as_ref());
        let duration_text = current.rest_seconds.to_string();
        let initial = CountdownStatus::idle(current.start_timer_control, duration_text.clone());

        let (events, events_rx) = mpsc::unbounded_channel();
        let (status_tx, status) = watch::channel(initial.clone());

        let controller = Self {
            countdown: RestCountdown::new(),
            settings,
            alerts: Arc::new(alerts),
            wake_lock,
            duration_text,
            frame: initial.frame,
            resumed: false,
            pending_tick: None,
            events_tx: events.downgrade(),
            events_rx,
            status_tx,
        };

        (controller, ControllerHandle { events, status })
    }

    /// Process events until shutdown or until every handle is dropped
    pub async fn run(mut self) {
        info!("Starting countdown controller (rest field: {}s)", self.duration_text);

        while let Some(event) = self.events_rx.recv().await {
            match event {
                ControllerEvent::Tick(generation) => {
                    let settings = self.current_settings();
                    let effects = self.countdown.tick(generation, &settings);
                    if effects.is_empty() {
                        debug!("Discarding stale tick from generation {}", generation);
                        continue;
                    }
                    self.apply(effects);
                    self.publish();
                }
                ControllerEvent::Input { input, reply } => {
                    let stop = input == Input::Shutdown;
                    self.handle_input(input);
                    let status = self.publish();
                    if let Some(reply) = reply {
                        // The caller may have given up waiting
                        let _ = reply.send(status);
                    }
                    if stop {
                        break;
                    }
                }
            }
        }

        self.shutdown();
        info!("Countdown controller stopped");
    }

    fn handle_input(&mut self, input: Input) {
        match input {
            Input::Tap => {
                let settings = self.current_settings();
                if !settings.start_timer_control.allows_tap() {
                    debug!("Tap ignored in {:?} mode", settings.start_timer_control);
                    return;
                }
                if self.countdown.is_counting() {
                    self.stop_rest(&settings);
                } else {
                    self.start_rest(&settings);
                }
            }
            Input::CameraButton => {
                let settings = self.current_settings();
                if !settings.start_timer_control.allows_camera() {
                    debug!("Camera button ignored in {:?} mode", settings.start_timer_control);
                    return;
                }
                if self.countdown.is_counting() {
                    debug!("Camera button ignored while resting");
                    return;
                }
                self.start_rest(&settings);
            }
            Input::DurationEdited(text) => self.edit_duration(text),
            Input::Resume => self.resume(),
            Input::Pause => self.pause(),
            Input::SettingsChanged => {
                let settings = self.current_settings();
                self.duration_text = settings.rest_seconds.to_string();
                if self.resumed {
                    self.resume();
                } else if !self.countdown.is_counting() {
                    self.frame = Frame::idle(settings.start_timer_control);
                }
            }
            Input::Shutdown => self.shutdown(),
        }
    }

    fn start_rest(&mut self, settings: &Settings) {
        let Some(seconds) = parse_rest_seconds(&self.duration_text) else {
            debug!("Rest length {:?} is not a number of seconds, not starting", self.duration_text);
            return;
        };

        self.cancel_pending_tick();
        let effects = self.countdown.start_rest(seconds, settings);
        info!("Rest started: {}s (generation {})", seconds, self.countdown.generation());
        self.apply(effects);
    }

    fn stop_rest(&mut self, settings: &Settings) {
        self.cancel_pending_tick();
        let effects = self.countdown.stop_rest(settings);
        info!("Rest stopped (generation {})", self.countdown.generation());
        self.apply(effects);
    }

    fn edit_duration(&mut self, text: String) {
        match parse_rest_seconds(&text) {
            Some(seconds) => {
                if let Err(e) = self.settings.set_rest_seconds(seconds.get()) {
                    warn!("Failed to persist rest length: {}", e);
                } else {
                    debug!("Rest length set to {}s", seconds);
                }
            }
            None => debug!("Ignoring rest length {:?}", text),
        }
        self.duration_text = text;
    }

    fn resume(&mut self) {
        self.resumed = true;
        let settings = self.current_settings();

        if settings.prevent_sleep {
            if !self.wake_lock.is_held() {
                if let Err(e) = self.wake_lock.acquire() {
                    warn!("Could not prevent sleep: {}", e);
                }
            }
        } else {
            self.release_wake_lock();
        }

        if !self.countdown.is_counting() {
            self.frame = Frame::idle(settings.start_timer_control);
        }
    }

    fn pause(&mut self) {
        self.resumed = false;
        self.release_wake_lock();
    }

    fn shutdown(&mut self) {
        self.cancel_pending_tick();
        self.resumed = false;
        self.release_wake_lock();
    }

    fn release_wake_lock(&mut self) {
        if self.wake_lock.is_held() {
            if let Err(e) = self.wake_lock.release() {
                warn!("Could not release sleep lock: {}", e);
            }
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Render(frame) => self.frame = frame,
                Effect::Vibrate(pattern) => self.alerts.vibrate(&pattern),
                Effect::Complete(alert) => self.complete(alert),
                Effect::ScheduleTick { generation, delay } => self.schedule_tick(generation, delay),
            }
        }
    }

    fn complete(&self, alert: CompletionAlert) {
        info!("Rest complete");
        if alert.vibrate {
            self.alerts.vibrate(&VibrationPattern::COMPLETION);
        }
        if alert.play_sound {
            tokio::spawn(play_completion_sound(Arc::clone(&self.alerts)));
        }
    }

    fn schedule_tick(&mut self, generation: u64, delay: Duration) {
        self.cancel_pending_tick();

        let Some(events) = self.events_tx.upgrade() else {
            debug!("No inputs left, not scheduling tick");
            return;
        };

        self.pending_tick = Some(tokio::spawn(async move {
            sleep(delay).await;
            // Fails only when the controller is gone
            let _ = events.send(ControllerEvent::Tick(generation));
        }));
    }

    fn cancel_pending_tick(&mut self) {
        if let Some(pending) = self.pending_tick.take() {
            pending.abort();
        }
    }

    fn current_settings(&self) -> Settings {
        load_settings(self.settings.as_ref())
    }

    fn publish(&mut self) -> CountdownStatus {
        let status = CountdownStatus {
            frame: self.frame.clone(),
            counting: self.countdown.is_counting(),
            seconds_remaining: self.countdown.seconds_remaining(),
            generation: self.countdown.generation(),
            duration_text: self.duration_text.clone(),
            wake_lock_held: self.wake_lock.is_held(),
        };
        self.status_tx.send_replace(status.clone());
        status
    }
}

fn load_settings(store: &dyn SettingsStore) -> Settings {
    store.load().unwrap_or_else(|e| {
        warn!("Failed to read settings, using defaults: {}", e);
        Settings::default()
    })
}

/// Play the notification sound if the notification volume is up.
/// Failures are logged and never reach the countdown.
async fn play_completion_sound<A: AlertDevice>(alerts: Arc<A>) {
    match alerts.notification_volume().await {
        Ok(0) => debug!("Notification volume is zero, skipping sound"),
        Ok(volume) => {
            debug!("Notification volume {}%", volume);
            if let Err(e) = alerts.play_notification().await {
                warn!("Alert sound failed: {}", e);
            }
        }
        Err(e) => warn!("Could not read notification volume: {}", e),
    }
}
