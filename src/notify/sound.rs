//! Notification sounds and platform playback backends.
//!
//! Playback shells out to the platform's stock player:
//!
//! | Platform | Command |
//! |----------|---------|
//! | Linux | `aplay <file>` |
//! | macOS | `afplay <file>` |
//! | Windows | `powershell -c (New-Object Media.SoundPlayer "<file>").PlaySync();` |

// ============================================================================
// Imports
// ============================================================================

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};

// ============================================================================
// Sound
// ============================================================================

/// Which notification to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    /// Request confirmed.
    Success,
    /// Request failed.
    Fail,
}

impl Sound {
    /// File name of the sound inside the sound directory.
    #[inline]
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Success => "success.wav",
            Self::Fail => "fail.wav",
        }
    }
}

// ============================================================================
// SoundPlayer
// ============================================================================

/// Capability to play an audio file.
#[async_trait]
pub trait SoundPlayer: Send + Sync {
    /// Plays the file at `path` to completion.
    async fn play(&self, path: &Path) -> Result<()>;
}

// ============================================================================
// Platform
// ============================================================================

/// Operating systems with a known sound player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// ALSA `aplay`.
    Linux,
    /// `afplay`.
    MacOs,
    /// PowerShell `Media.SoundPlayer`.
    Windows,
}

impl Platform {
    /// Maps a `std::env::consts::OS` value to a platform.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedPlatform`] for any other OS.
    pub fn from_os(os: &str) -> Result<Self> {
        match os {
            "linux" => Ok(Self::Linux),
            "macos" => Ok(Self::MacOs),
            "windows" => Ok(Self::Windows),
            other => Err(Error::unsupported_platform(other)),
        }
    }

    /// Builds the command that plays `path` on this platform.
    #[must_use]
    pub fn command(self, path: &Path) -> Command {
        match self {
            Self::Linux => {
                let mut cmd = Command::new("aplay");
                cmd.arg(path);
                cmd
            }
            Self::MacOs => {
                let mut cmd = Command::new("afplay");
                cmd.arg(path);
                cmd
            }
            Self::Windows => {
                let mut cmd = Command::new("powershell");
                cmd.arg("-c").arg(format!(
                    "(New-Object Media.SoundPlayer \"{}\").PlaySync();",
                    path.display()
                ));
                cmd
            }
        }
    }
}

// ============================================================================
// CommandPlayer
// ============================================================================

/// [`SoundPlayer`] that runs the platform's player command.
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    /// Operating system name, resolved to a [`Platform`] at play time.
    os: String,
}

impl Default for CommandPlayer {
    fn default() -> Self {
        Self::current()
    }
}

impl CommandPlayer {
    /// Player for the operating system this binary was built for.
    #[inline]
    #[must_use]
    pub fn current() -> Self {
        Self::for_os(std::env::consts::OS)
    }

    /// Player for an explicit operating system name.
    #[inline]
    #[must_use]
    pub fn for_os(os: impl Into<String>) -> Self {
        Self { os: os.into() }
    }
}

#[async_trait]
impl SoundPlayer for CommandPlayer {
    async fn play(&self, path: &Path) -> Result<()> {
        let platform = Platform::from_os(&self.os)?;

        let is_file = tokio::fs::metadata(path)
            .await
            .is_ok_and(|meta| meta.is_file());
        if !is_file {
            return Err(Error::sound(format!(
                "sound file not found: {}",
                path.display()
            )));
        }

        let mut cmd = platform.command(path);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        debug!(?platform, path = %path.display(), "Playing sound");

        let status = cmd.status().await?;
        if !status.success() {
            return Err(Error::sound(format!("{platform:?} player exited with {status}")));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
