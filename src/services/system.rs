//! Host tool checks

use tokio::process::Command;
use tracing::info;

/// Check that a command-line tool the device backends rely on can be run
pub async fn check_command_available(program: &str, version_arg: &str) -> Result<(), String> {
    Command::new(program)
        .arg(version_arg)
        .output()
        .await
        .map_err(|_| format!("{} is not available on this system", program))?;

    info!("{} is available", program);
    Ok(())
}
