//! Caption/subtitle display state shared across the presentation UI.
//!
//! The state is a fixed set of independently-addressable cells. Most cells
//! are session-only and reset to their defaults on every start; the selected
//! caption language and the display mode are mirrored to durable storage
//! under fixed keys so they survive a restart. Cell reads and writes never
//! fail: when the durable medium misbehaves, the affected cell silently
//! degrades to session-only behavior and the failure is only logged.

use std::cell::RefCell;
use std::rc::Rc;

use slidecap_config::subtitles::SubtitlesConfig;

use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage};

/// Storage key for the selected TTS/caption language.
pub const TTS_LANG_KEY: &str = "slidev-tts-lang";
/// Storage key for the closed-caption display mode.
pub const CC_DISPLAY_KEY: &str = "slidev-cc-display";

const DEFAULT_TTS_LANG: &str = "en";
const DEFAULT_CC_DISPLAY: u8 = 1;

/// The caption/subtitle state for one presentation session.
///
/// Constructed once at startup and handed by reference to whichever UI
/// layer needs it. All cells hold exactly one value of their declared type
/// at all times; only the resolved subtitle configuration starts absent,
/// until the host's first resolution event installs it.
#[derive(Debug)]
pub struct CaptionState {
    storage: Box<dyn KeyValueStorage>,
    is_first_time: bool,
    is_play: bool,
    current_tts_lang: String,
    cc_display: u8,
    subtitles_config: Option<SubtitlesConfig>,
    subtitle_exists: bool,
}

/// Shared single-threaded handle to the caption state.
///
/// All reads and writes happen on the UI's event-handling flow, so a
/// reference-counted cell is enough; no locking is involved.
pub type SharedCaptionState = Rc<RefCell<CaptionState>>;

impl CaptionState {
    /// Creates the state backed by the given storage.
    ///
    /// Persisted cells load their last written value. A missing entry (or,
    /// for the display mode, one that does not parse as a decimal integer)
    /// falls back to the default, which is written back so the entry exists
    /// from then on. Storage failures are logged and the affected cell keeps
    /// its default for this session.
    pub fn new(storage: Box<dyn KeyValueStorage>) -> Self {
        let mut state = Self {
            storage,
            is_first_time: true,
            is_play: true,
            current_tts_lang: DEFAULT_TTS_LANG.to_string(),
            cc_display: DEFAULT_CC_DISPLAY,
            subtitles_config: None,
            subtitle_exists: true,
        };

        state.current_tts_lang = match state.load(TTS_LANG_KEY) {
            Some(lang) => lang,
            None => {
                state.mirror(TTS_LANG_KEY, DEFAULT_TTS_LANG);
                DEFAULT_TTS_LANG.to_string()
            }
        };
        state.cc_display = match state.load(CC_DISPLAY_KEY).and_then(|raw| raw.parse().ok()) {
            Some(mode) => mode,
            None => {
                state.mirror(CC_DISPLAY_KEY, &DEFAULT_CC_DISPLAY.to_string());
                DEFAULT_CC_DISPLAY
            }
        };

        state
    }

    /// Creates the state backed by the platform storage location, degrading
    /// to a session-only in-memory table when it cannot be opened.
    pub fn open_default() -> Self {
        match FileStorage::open_default() {
            Ok(storage) => Self::new(Box::new(storage)),
            Err(error) => {
                log::warn!("Caption storage unavailable, selections will not survive restart: {error}");
                Self::new(Box::new(MemoryStorage::new()))
            }
        }
    }

    /// Whether captions are being shown for the first time this session.
    pub fn is_first_time(&self) -> bool {
        self.is_first_time
    }

    pub fn set_first_time(&mut self, value: bool) {
        self.is_first_time = value;
    }

    /// Whether caption/audio playback is currently active.
    pub fn is_play(&self) -> bool {
        self.is_play
    }

    pub fn set_play(&mut self, value: bool) {
        self.is_play = value;
    }

    /// The selected TTS/caption language code.
    pub fn current_tts_lang(&self) -> &str {
        &self.current_tts_lang
    }

    /// Selects the TTS/caption language and mirrors it to storage.
    pub fn set_current_tts_lang(&mut self, lang: impl Into<String>) {
        let lang = lang.into();
        self.mirror(TTS_LANG_KEY, &lang);
        self.current_tts_lang = lang;
    }

    /// The closed-caption display mode. The meaning of each value is owned
    /// by the UI; the store only holds and persists it.
    pub fn cc_display(&self) -> u8 {
        self.cc_display
    }

    /// Selects the closed-caption display mode and mirrors it to storage in
    /// its decimal form.
    pub fn set_cc_display(&mut self, mode: u8) {
        self.mirror(CC_DISPLAY_KEY, &mode.to_string());
        self.cc_display = mode;
    }

    /// The resolved subtitle configuration, absent until the host's first
    /// resolution event.
    pub fn subtitles_config(&self) -> Option<&SubtitlesConfig> {
        self.subtitles_config.as_ref()
    }

    /// Installs the configuration computed by the host resolver, replacing
    /// any previously resolved one wholesale. There is no way back to the
    /// absent state.
    pub fn resolve_subtitles_config(&mut self, config: SubtitlesConfig) {
        self.subtitles_config = Some(config);
    }

    /// Whether a subtitle track exists for the current content.
    pub fn subtitle_exists(&self) -> bool {
        self.subtitle_exists
    }

    pub fn set_subtitle_exists(&mut self, value: bool) {
        self.subtitle_exists = value;
    }

    fn load(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(error) => {
                log::warn!("Failed to read {key} from caption storage: {error}");
                None
            }
        }
    }

    fn mirror(&mut self, key: &str, value: &str) {
        if let Err(error) = self.storage.set(key, value) {
            log::warn!("Failed to mirror {key} to caption storage: {error}");
        }
    }
}
