//! Accessibility permission gate.
//!
//! Reading another application's menu tree requires the user to authorize
//! this process under Privacy & Security → Accessibility. The check is
//! cheap and re-run on every query; the prompt is the system dialog and is
//! shown at most once per denial episode by the facade.

use std::process::Command;

/// Whether this process may read accessibility data. No UI.
pub fn trusted() -> bool {
    macos_accessibility_client::accessibility::application_is_trusted()
}

/// Ask the system to show its accessibility permission dialog.
///
/// The dialog appears asynchronously; the process usually needs to be
/// restarted after the user grants permission.
pub fn prompt() {
    macos_accessibility_client::accessibility::application_is_trusted_with_prompt();
}

/// Open System Settings at the Accessibility privacy pane.
pub fn open_accessibility_settings() -> std::io::Result<()> {
    Command::new("open")
        .arg("x-apple.systempreferences:com.apple.preference.security?Privacy_Accessibility")
        .spawn()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trusted_does_not_panic() {
        // The value depends on system state; only the call itself is
        // checkable here.
        let _ = trusted();
    }

    // prompt() and open_accessibility_settings() pop system UI and are
    // exercised manually.
}
