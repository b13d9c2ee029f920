//! Pop sound playback
//!
//! Audio is fire-and-forget: a missing or broken sound asset, or a backend
//! that fails mid-session, disables sound for the rest of the run and never
//! reaches the frame loop.
//!
//! Clips are decoded with rodio. The output device is only opened with the
//! `playback` feature; otherwise pops are logged.

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use rodio::{Decoder, Source};

/// Most channels a clip may declare
const MAX_CHANNELS: u16 = 8;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Bubble clicked
    Pop,
}

/// Encoded clip whose header decoded cleanly
#[derive(Debug, Clone)]
pub struct SoundAsset {
    bytes: Arc<[u8]>,
    channels: u16,
    sample_rate: u32,
    duration: Option<Duration>,
}

impl SoundAsset {
    /// Read and validate a sound file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading sound {}", path.display()))?;
        Self::from_bytes(bytes).with_context(|| format!("decoding sound {}", path.display()))
    }

    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> anyhow::Result<Self> {
        let bytes = bytes.into();
        let decoder = Decoder::new(Cursor::new(Arc::clone(&bytes)))?;
        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        if channels == 0 || channels > MAX_CHANNELS {
            bail!("unsupported channel count {channels}");
        }
        if sample_rate == 0 {
            bail!("invalid sample rate");
        }

        Ok(Self {
            duration: decoder.total_duration(),
            bytes,
            channels,
            sample_rate,
        })
    }

    /// Fresh decoder positioned at the start of the clip
    pub fn decoder(&self) -> anyhow::Result<Decoder<Cursor<Arc<[u8]>>>> {
        Ok(Decoder::new(Cursor::new(Arc::clone(&self.bytes)))?)
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Clip length, if the container records it
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }
}

/// Whatever actually makes noise
pub trait SoundBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> anyhow::Result<()>;
}

/// Backend for headless runs and machines without an output device
#[derive(Debug)]
pub struct HeadlessBackend {
    pop: SoundAsset,
}

impl HeadlessBackend {
    pub fn new(pop: SoundAsset) -> Self {
        Self { pop }
    }
}

impl SoundBackend for HeadlessBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> anyhow::Result<()> {
        log::debug!(
            "{:?} at volume {:.2} ({:?}, {} Hz)",
            effect,
            volume,
            self.pop.duration(),
            self.pop.sample_rate()
        );
        Ok(())
    }
}

#[cfg(feature = "playback")]
pub use output::RodioBackend;

#[cfg(feature = "playback")]
mod output {
    use anyhow::Context;
    use rodio::{OutputStream, OutputStreamHandle, Source};

    use super::{SoundAsset, SoundBackend, SoundEffect};

    /// Plays clips on the default output device
    pub struct RodioBackend {
        // Must outlive every clip played through `handle`
        _stream: OutputStream,
        handle: OutputStreamHandle,
        pop: SoundAsset,
    }

    impl RodioBackend {
        pub fn open(pop: SoundAsset) -> anyhow::Result<Self> {
            let (stream, handle) =
                OutputStream::try_default().context("opening default audio output")?;
            Ok(Self {
                _stream: stream,
                handle,
                pop,
            })
        }
    }

    impl SoundBackend for RodioBackend {
        fn play(&mut self, effect: SoundEffect, volume: f32) -> anyhow::Result<()> {
            let clip = match effect {
                SoundEffect::Pop => &self.pop,
            };
            let source = clip.decoder()?.amplify(volume).convert_samples();
            self.handle.play_raw(source).context("queueing clip")?;
            Ok(())
        }
    }
}

#[cfg(feature = "playback")]
fn open_backend(asset: SoundAsset) -> Box<dyn SoundBackend> {
    match RodioBackend::open(asset.clone()) {
        Ok(backend) => Box::new(backend),
        Err(e) => {
            log::info!("No audio output, pops are logged only: {e:#}");
            Box::new(HeadlessBackend::new(asset))
        }
    }
}

#[cfg(not(feature = "playback"))]
fn open_backend(asset: SoundAsset) -> Box<dyn SoundBackend> {
    Box::new(HeadlessBackend::new(asset))
}

/// Audio manager
pub struct AudioManager {
    backend: Option<Box<dyn SoundBackend>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::disabled()
    }
}

impl AudioManager {
    pub fn new(backend: Box<dyn SoundBackend>) -> Self {
        Self {
            backend: Some(backend),
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// No sound at all
    pub fn disabled() -> Self {
        Self {
            backend: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Load the pop sound and open the output.
    ///
    /// A bad asset disables sound for the session.
    pub fn load_pop(path: &Path) -> Self {
        match SoundAsset::load(path) {
            Ok(asset) => {
                log::info!(
                    "Loaded pop sound ({} ch, {} Hz, {:?})",
                    asset.channels(),
                    asset.sample_rate(),
                    asset.duration()
                );
                Self::new(open_backend(asset))
            }
            Err(e) => {
                log::warn!("Pop sound unavailable, audio disabled: {e:#}");
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(backend) = self.backend.as_mut() else { return };
        if let Err(e) = backend.play(effect, vol) {
            log::warn!("Audio playback failed, disabling sound: {e:#}");
            self.backend = None;
        }
    }

    pub fn play_pop(&mut self) {
        self.play(SoundEffect::Pop);
    }
}
