//! Host-OS integration: open paths with the default handler and copy text
//! to the clipboard.
//!
//! Everything here shells out to the platform's own tools.  No TUI types.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Failure modes when handing a path to the OS.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Can't open folder on this OS!")]
    UnsupportedOs,
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Program and leading arguments that open a path on `os`
/// (a value of [`std::env::consts::OS`]).
pub fn opener_for(os: &str) -> Option<(&'static str, &'static [&'static str])> {
    match os {
        // `start` treats the first quoted argument as a window title.
        "windows" => Some(("cmd", &["/C", "start", ""])),
        "macos" => Some(("open", &[])),
        "linux" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => Some(("xdg-open", &[])),
        _ => None,
    }
}

/// Open a file or folder with the OS default application.
///
/// The opener is spawned and left running; we never wait on it.
pub fn open_path(path: &Path) -> Result<(), PlatformError> {
    let (program, args) =
        opener_for(std::env::consts::OS).ok_or(PlatformError::UnsupportedOs)?;

    Command::new(program)
        .args(args)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| PlatformError::Launch { program, source })?;

    tracing::debug!("open_path: {} {}", program, path.display());
    Ok(())
}

/// Clipboard commands to try on `os`, in order.
pub fn clipboard_commands(os: &str) -> &'static [(&'static str, &'static [&'static str])] {
    match os {
        "macos" => &[("pbcopy", &[])],
        "windows" => &[("cmd", &["/C", "clip"])],
        "linux" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => &[
            ("wl-copy", &[]),
            ("xclip", &["-selection", "clipboard"]),
        ],
        _ => &[],
    }
}

/// Copy `text` into the system clipboard.  Returns `false` when no clipboard
/// tool is available or every attempt failed.
pub fn copy_to_clipboard(text: &str) -> bool {
    clipboard_commands(std::env::consts::OS)
        .iter()
        .any(|(cmd, args)| run_clip_command(cmd, args, text))
}

fn run_clip_command(cmd: &str, args: &[&str], input: &str) -> bool {
    let mut child = match Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(c) => c,
        Err(_) => return false,
    };

    if let Some(stdin) = child.stdin.as_mut() {
        if stdin.write_all(input.as_bytes()).is_err() {
            let _ = child.kill();
            let _ = child.wait();
            return false;
        }
    }
    // Close stdin so the tool sees EOF.
    drop(child.stdin.take());

    child.wait().map(|s| s.success()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_platforms_have_openers() {
        assert_eq!(opener_for("macos"), Some(("open", &[][..])));
        assert_eq!(opener_for("linux").map(|(p, _)| p), Some("xdg-open"));
        let (program, args) = opener_for("windows").unwrap();
        assert_eq!(program, "cmd");
        assert_eq!(args, ["/C", "start", ""]);
    }

    #[test]
    fn unknown_os_has_no_opener() {
        assert_eq!(opener_for("haiku"), None);
        assert_eq!(opener_for(""), None);
    }

    #[test]
    fn unsupported_os_message() {
        assert_eq!(
            PlatformError::UnsupportedOs.to_string(),
            "Can't open folder on this OS!"
        );
    }

    #[test]
    fn linux_clipboard_prefers_wayland() {
        let cmds = clipboard_commands("linux");
        assert_eq!(cmds[0].0, "wl-copy");
        assert_eq!(cmds[1].0, "xclip");
        assert!(clipboard_commands("haiku").is_empty());
    }
}
