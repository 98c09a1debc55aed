//! System clipboard access. Kept behind one function so the handler can fall
//! back to printing the text when no clipboard is reachable (headless
//! sessions, some Wayland setups).

use anyhow::{Context, Result};

pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("clipboard unavailable")?;
    clipboard
        .set_text(text.to_string())
        .context("clipboard write failed")?;
    Ok(())
}
