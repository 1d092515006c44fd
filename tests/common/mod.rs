#![allow(dead_code)]

use std::{
    io,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};
use tokio::task::JoinHandle;

use rest_timer::{
    error::{AlertError, WakeLockError},
    services::{AlertDevice, VibrationPattern, WakeLock},
    settings::{MemoryStore, Settings},
    tasks::{ControllerHandle, ScreenController},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertCall {
    Vibrate(Vec<u64>),
    VolumeQuery,
    Play,
}

/// Alert device that records every call
#[derive(Debug, Clone, Default)]
pub struct RecordingAlerts {
    calls: Arc<Mutex<Vec<AlertCall>>>,
    volume: u32,
    fail_play: bool,
}

impl RecordingAlerts {
    pub fn with_volume(volume: u32) -> Self {
        Self {
            volume,
            ..Self::default()
        }
    }

    pub fn failing_player(volume: u32) -> Self {
        Self {
            volume,
            fail_play: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<AlertCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &AlertCall) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn completion_vibrations(&self) -> usize {
        self.count(&AlertCall::Vibrate(VibrationPattern::COMPLETION.timings_ms.to_vec()))
    }

    pub fn start_pulses(&self) -> usize {
        self.count(&AlertCall::Vibrate(VibrationPattern::START.timings_ms.to_vec()))
    }
}

impl AlertDevice for RecordingAlerts {
    fn vibrate(&self, pattern: &VibrationPattern) {
        self.calls
            .lock()
            .unwrap()
            .push(AlertCall::Vibrate(pattern.timings_ms.to_vec()));
    }

    async fn notification_volume(&self) -> Result<u32, AlertError> {
        self.calls.lock().unwrap().push(AlertCall::VolumeQuery);
        Ok(self.volume)
    }

    async fn play_notification(&self) -> Result<(), AlertError> {
        self.calls.lock().unwrap().push(AlertCall::Play);
        if self.fail_play {
            return Err(AlertError::Spawn {
                command: "paplay".to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no player"),
            });
        }
        Ok(())
    }
}

/// Sleep lock that only tracks its state
#[derive(Debug, Clone, Default)]
pub struct FakeWakeLock {
    held: Arc<AtomicBool>,
    acquisitions: Arc<AtomicUsize>,
}

impl FakeWakeLock {
    pub fn held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }

    /// Simulate the inhibitor going away behind the controller's back
    pub fn lose(&self) {
        self.held.store(false, Ordering::SeqCst);
    }

    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }
}

impl WakeLock for FakeWakeLock {
    fn acquire(&mut self) -> Result<(), WakeLockError> {
        self.held.store(true, Ordering::SeqCst);
        self.acquisitions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn release(&mut self) -> Result<(), WakeLockError> {
        self.held.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_held(&mut self) -> bool {
        self.held()
    }
}

pub struct Harness {
    pub handle: ControllerHandle,
    pub alerts: RecordingAlerts,
    pub wake_lock: FakeWakeLock,
    pub store: Arc<MemoryStore>,
    pub task: JoinHandle<()>,
}

/// Spawn a controller over an in-memory store and recording devices
pub fn start(settings: Settings, alerts: RecordingAlerts) -> Harness {
    let store = Arc::new(MemoryStore::new(settings));
    let wake_lock = FakeWakeLock::default();
    let (controller, handle) = ScreenController::new(store.clone(), alerts.clone(), wake_lock.clone());
    let task = tokio::spawn(controller.run());

    Harness {
        handle,
        alerts,
        wake_lock,
        store,
        task,
    }
}
