//! Audio
//!
//! The jump sound effect. Audio is optional: when the `audio` feature is off,
//! there is no output device, or the sound file is missing or undecodable,
//! a warning is logged once and [`JumpSound::play`] does nothing.

use std::path::Path;

#[cfg(feature = "audio")]
mod backend {
    use std::io::Cursor;
    use std::path::Path;
    use std::sync::Arc;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Source};

    pub struct Backend {
        // Dropping the stream stops playback
        _stream: OutputStream,
        handle: OutputStreamHandle,
        bytes: Arc<[u8]>,
    }

    impl Backend {
        pub fn open(path: &Path) -> Result<Self, String> {
            let bytes: Arc<[u8]> = std::fs::read(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?
                .into();
            // Decode once up front so a bad file is reported at startup
            Decoder::new(Cursor::new(Arc::clone(&bytes)))
                .map_err(|e| format!("cannot decode {}: {e}", path.display()))?;
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| format!("no audio output: {e}"))?;
            Ok(Self {
                _stream: stream,
                handle,
                bytes,
            })
        }

        pub fn play(&self) -> Result<(), String> {
            let source = Decoder::new(Cursor::new(Arc::clone(&self.bytes)))
                .map_err(|e| e.to_string())?;
            self.handle
                .play_raw(source.convert_samples())
                .map_err(|e| e.to_string())
        }
    }
}

/// Fire-and-forget jump sound; each call to [`JumpSound::play`] starts it from the beginning.
pub struct JumpSound {
    #[cfg(feature = "audio")]
    backend: Option<backend::Backend>,
}

impl JumpSound {
    /// Open the default output device and load `path`. Never fails.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        #[cfg(feature = "audio")]
        {
            match backend::Backend::open(path) {
                Ok(backend) => {
                    log::info!("Jump sound loaded from {}", path.display());
                    Self {
                        backend: Some(backend),
                    }
                }
                Err(message) => {
                    log::warn!("Jump sound disabled: {message}");
                    Self { backend: None }
                }
            }
        }

        #[cfg(not(feature = "audio"))]
        {
            log::info!(
                "Built without audio, {} will not be played",
                path.display()
            );
            Self {}
        }
    }

    /// A sound that never plays.
    pub fn silent() -> Self {
        Self {
            #[cfg(feature = "audio")]
            backend: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        #[cfg(feature = "audio")]
        {
            self.backend.is_some()
        }
        #[cfg(not(feature = "audio"))]
        {
            false
        }
    }

    /// Start the sound. Playback errors are logged, never returned.
    pub fn play(&self) {
        #[cfg(feature = "audio")]
        if let Some(backend) = &self.backend {
            if let Err(message) = backend.play() {
                log::warn!("Jump sound failed: {message}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_silent_not_fatal() {
        let sound = JumpSound::load("does/not/exist.wav");
        assert!(!sound.is_enabled());
        sound.play();
    }

    #[test]
    fn test_silent_sound() {
        let sound = JumpSound::silent();
        assert!(!sound.is_enabled());
        sound.play();
    }
}
