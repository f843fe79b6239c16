// ABOUTME: Clipboard support for the cardpost application
// ABOUTME: Pipes exported card images into a platform clipboard command

use crate::errors::{CardError, Result};
use crate::export::Exporter;
use crate::preview::Preview;
use log::{debug, info, warn};
use std::env;
use std::io::Write;
use std::process::{Command, Stdio};

pub trait Clipboard {
    fn write_image(&self, bytes: &[u8], mime: &str) -> Result<()>;
}

/// Which clipboard program to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardCommand {
    WlCopy,
    Xclip,
    /// A user-supplied program; the image arrives on its stdin
    Custom { program: String, args: Vec<String> },
}

impl ClipboardCommand {
    /// Pick a command for the current desktop session
    pub fn detect() -> Self {
        if env::var_os("WAYLAND_DISPLAY").is_some() {
            ClipboardCommand::WlCopy
        } else {
            ClipboardCommand::Xclip
        }
    }

    /// Parse a command line such as `xsel --clipboard --input`
    pub fn custom(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(ClipboardCommand::Custom {
            program,
            args: parts.collect(),
        })
    }

    pub(crate) fn build(&self, mime: &str) -> Command {
        match self {
            ClipboardCommand::WlCopy => {
                let mut cmd = Command::new("wl-copy");
                cmd.args(["--type", mime]);
                cmd
            }
            ClipboardCommand::Xclip => {
                let mut cmd = Command::new("xclip");
                cmd.args(["-selection", "clipboard", "-t", mime, "-i"]);
                cmd
            }
            ClipboardCommand::Custom { program, args } => {
                let mut cmd = Command::new(program);
                cmd.args(args);
                cmd
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommandClipboard {
    command: ClipboardCommand,
}

impl CommandClipboard {
    pub fn new(command: ClipboardCommand) -> Self {
        Self { command }
    }

    pub fn detect() -> Self {
        Self::new(ClipboardCommand::detect())
    }
}

impl Clipboard for CommandClipboard {
    fn write_image(&self, bytes: &[u8], mime: &str) -> Result<()> {
        let mut cmd = self.command.build(mime);
        let program = format!("{:?}", cmd.get_program());
        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CardError::ClipboardFailure(format!("Failed to run {}: {}", program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(bytes) {
                drop(stdin);
                if let Err(kill_err) = child.kill() {
                    debug!("{} already exited: {}", program, kill_err);
                }
                let status = child.wait();
                warn!("{} stopped reading the image ({:?}): {}", program, status, e);
                return Err(CardError::ClipboardFailure(format!(
                    "Failed to write to {}: {}",
                    program, e
                )));
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| CardError::ClipboardFailure(format!("{} did not finish: {}", program, e)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("{} exited with {}: {}", program, output.status, stderr.trim());
            return Err(CardError::ClipboardFailure(format!(
                "{} exited with {}",
                program, output.status
            )));
        }
        Ok(())
    }
}

/// Export the card on screen and place it on the clipboard
pub fn copy_current(
    exporter: &Exporter<'_>,
    preview: &Preview,
    clipboard: &dyn Clipboard,
) -> Result<()> {
    let image = exporter.export_current(preview)?;
    clipboard.write_image(&image.bytes, image.mime)?;
    info!("Copied card to clipboard ({} bytes)", image.bytes.len());
    Ok(())
}
