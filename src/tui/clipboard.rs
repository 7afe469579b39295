//! System clipboard for the copy shortcuts.

use crate::grid::ClipboardSink;
use std::io::Write;
use std::process::{Command, Stdio};

/// Copy text to the system clipboard.
///
/// Uses `pbcopy` on macOS and `xclip` elsewhere.
/// Returns `true` on success.
pub fn copy_to_clipboard(text: &str) -> bool {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("pbcopy")
    } else {
        let mut xclip = Command::new("xclip");
        xclip.args(["-selection", "clipboard"]);
        xclip
    };

    let result = command
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .and_then(|mut child| {
            if let Some(ref mut stdin) = child.stdin {
                stdin.write_all(text.as_bytes())?;
            }
            child.wait()
        });

    match result {
        Ok(status) => status.success(),
        Err(e) => {
            tracing::warn!("clipboard helper failed: {e}");
            false
        }
    }
}

/// [`ClipboardSink`] backed by the platform clipboard helper.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> bool {
        copy_to_clipboard(text)
    }
}
