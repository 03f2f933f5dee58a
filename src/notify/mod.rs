//! Outcome notification.
//!
//! The notifier receives the one [`Outcome`] of a run and tells the user
//! about it: a line on stdout and, unless muted, a sound. Sound problems are
//! logged and swallowed; they never change the outcome.

// ============================================================================
// Submodules
// ============================================================================

/// Notification sounds and platform playback backends.
pub mod sound;

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{info, trace, warn};

use crate::outcome::Outcome;

// ============================================================================
// Re-exports
// ============================================================================

pub use sound::{CommandPlayer, Platform, Sound, SoundPlayer};

// ============================================================================
// Notifier
// ============================================================================

/// Receives the final outcome of a run.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Reports `outcome` to the user. Must not fail.
    async fn notify(&self, outcome: &Outcome);
}

// ============================================================================
// NotifierConfig
// ============================================================================

/// Notifier settings, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    /// Suppress all sounds.
    pub muted: bool,
    /// Directory holding `success.wav` and `fail.wav`.
    pub sound_dir: PathBuf,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            muted: false,
            sound_dir: PathBuf::from("."),
        }
    }
}

impl NotifierConfig {
    /// Sets whether sounds are suppressed.
    #[inline]
    #[must_use]
    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    /// Sets the sound directory.
    #[inline]
    #[must_use]
    pub fn with_sound_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.sound_dir = dir.into();
        self
    }

    /// Full path of `sound`.
    #[inline]
    #[must_use]
    pub fn sound_path(&self, sound: Sound) -> PathBuf {
        self.sound_dir.join(sound.file_name())
    }
}

// ============================================================================
// ConsoleNotifier
// ============================================================================

/// Prints the outcome and plays the matching sound.
#[derive(Debug, Clone)]
pub struct ConsoleNotifier<P = CommandPlayer> {
    /// Settings.
    config: NotifierConfig,
    /// Sound backend.
    player: P,
}

impl<P: SoundPlayer> ConsoleNotifier<P> {
    /// Creates a notifier.
    #[inline]
    #[must_use]
    pub fn new(config: NotifierConfig, player: P) -> Self {
        Self { config, player }
    }

    /// Returns the notifier settings.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Plays `sound` unless muted. Best effort.
    async fn play(&self, sound: Sound) {
        if self.config.muted {
            trace!(?sound, "Muted, skipping sound");
            return;
        }

        let path = self.config.sound_path(sound);
        if let Err(e) = self.player.play(&path).await {
            warn!(error = %e, path = %path.display(), "Failed to play sound");
        }
    }
}

#[async_trait]
impl<P: SoundPlayer> Notifier for ConsoleNotifier<P> {
    async fn notify(&self, outcome: &Outcome) {
        println!("{outcome}");

        match outcome {
            Outcome::Success => {
                info!("Star request succeeded");
                self.play(Sound::Success).await;
            }
            Outcome::Failure { reason } => {
                info!(reason = %reason, "Star request failed");
                self.play(Sound::Fail).await;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;
    use std::sync::Arc;

    use parking_lot::Mutex;

    use crate::error::{Error, Result};

    /// Records requested paths, optionally failing every call.
    #[derive(Clone, Default)]
    struct RecordingPlayer {
        played: Arc<Mutex<Vec<PathBuf>>>,
        fail: bool,
    }

    #[async_trait]
    impl SoundPlayer for RecordingPlayer {
        async fn play(&self, path: &Path) -> Result<()> {
            self.played.lock().push(path.to_path_buf());
            if self.fail {
                return Err(Error::sound("device busy"));
            }
            Ok(())
        }
    }

    fn notifier(config: NotifierConfig, player: &RecordingPlayer) -> ConsoleNotifier<RecordingPlayer> {
        ConsoleNotifier::new(config, player.clone())
    }

    #[test]
    fn test_default_config() {
        let config = NotifierConfig::default();
        assert!(!config.muted);
        assert_eq!(config.sound_path(Sound::Success), Path::new("./success.wav"));
    }

    #[test]
    fn test_sound_dir() {
        let config = NotifierConfig::default().with_sound_dir("/usr/share/twinkle");
        assert_eq!(
            config.sound_path(Sound::Fail),
            Path::new("/usr/share/twinkle/fail.wav")
        );
    }

    #[tokio::test]
    async fn test_success_plays_success_sound() {
        let player = RecordingPlayer::default();
        let config = NotifierConfig::default().with_sound_dir("sounds");

        notifier(config, &player).notify(&Outcome::Success).await;

        assert_eq!(*player.played.lock(), vec![PathBuf::from("sounds/success.wav")]);
    }

    #[tokio::test]
    async fn test_failure_plays_fail_sound() {
        let player = RecordingPlayer::default();
        let config = NotifierConfig::default().with_sound_dir("sounds");

        notifier(config, &player)
            .notify(&Outcome::failure("error received"))
            .await;

        assert_eq!(*player.played.lock(), vec![PathBuf::from("sounds/fail.wav")]);
    }

    #[tokio::test]
    async fn test_muted_plays_nothing() {
        let player = RecordingPlayer::default();
        let config = NotifierConfig::default().with_muted(true);
        let notifier = notifier(config, &player);

        notifier.notify(&Outcome::Success).await;
        notifier.notify(&Outcome::failure("request failed")).await;

        assert!(player.played.lock().is_empty());
    }

    #[tokio::test]
    async fn test_player_error_is_swallowed() {
        let player = RecordingPlayer {
            fail: true,
            ..Default::default()
        };

        notifier(NotifierConfig::default(), &player)
            .notify(&Outcome::failure("timeout waiting for response"))
            .await;

        assert_eq!(player.played.lock().len(), 1);
    }
}
