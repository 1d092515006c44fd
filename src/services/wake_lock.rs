//! Prevent-sleep lock held while the timer is in the foreground

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::error::WakeLockError;

/// Keeps the display and system awake while held
pub trait WakeLock: Send + 'static {
    fn acquire(&mut self) -> Result<(), WakeLockError>;
    fn release(&mut self) -> Result<(), WakeLockError>;
    /// Whether sleep is actually being inhibited right now
    fn is_held(&mut self) -> bool;
}

/// Sleep lock backed by a `systemd-inhibit` child process.
/// The inhibitor lives as long as the child; dropping the lock kills it.
#[derive(Debug)]
pub struct SystemdInhibitor {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
}

impl SystemdInhibitor {
    pub fn new() -> Self {
        Self::with_command(
            "systemd-inhibit",
            [
                "--what=idle:sleep",
                "--who=rest-timer",
                "--why=Rest countdown on screen",
                "--mode=block",
                "sleep",
                "infinity",
            ],
        )
    }

    /// Inhibitor run through a different command line
    pub fn with_command<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            child: None,
        }
    }

    /// Forget an inhibitor process that has already exited
    fn reap_exited(&mut self) {
        let Some(child) = self.child.as_mut() else {
            return;
        };
        match child.try_wait() {
            Ok(Some(status)) => {
                warn!("{} exited with {}, sleep is no longer inhibited", self.program, status);
                self.child = None;
            }
            Ok(None) => {}
            Err(e) => warn!("Could not check {}: {}", self.program, e),
        }
    }
}

impl Default for SystemdInhibitor {
    fn default() -> Self {
        Self::new()
    }
}

impl WakeLock for SystemdInhibitor {
    fn acquire(&mut self) -> Result<(), WakeLockError> {
        if self.is_held() {
            return Ok(());
        }

        let child = Command::new(&self.program)
            .args(&self.args)
            .kill_on_drop(true)
            .spawn()
            .map_err(WakeLockError::Spawn)?;

        debug!("{} running as pid {:?}", self.program, child.id());
        self.child = Some(child);
        info!("Sleep lock acquired");
        Ok(())
    }

    fn release(&mut self) -> Result<(), WakeLockError> {
        if let Some(mut child) = self.child.take() {
            child.start_kill().map_err(WakeLockError::Kill)?;
            info!("Sleep lock released");
        }
        Ok(())
    }

    fn is_held(&mut self) -> bool {
        self.reap_exited();
        self.child.is_some()
    }
}
