//! Presentation surface abstraction
//!
//! [`PlaybackSurface`] is the seam between the landing logic and whatever
//! renders the page. The browser binding implements it over the DOM;
//! [`MemorySurface`] records the same operations for tests and headless use.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use tracing::{debug, warn};

/// Attributes that keep mobile browsers from forcing fullscreen playback
pub const INLINE_PLAYBACK_ATTRIBUTES: [&str; 2] = ["playsinline", "webkit-playsinline"];

/// Media source child of the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub src: String,
    pub media_type: String,
}

/// Subtitle track child of the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSpec {
    pub src: String,
    pub kind: String,
    pub label: String,
    pub language: String,
    /// Active without user selection
    pub default: bool,
}

/// Everything the landing sequence needs to do to a page
pub trait PlaybackSurface {
    /// Set the document (tab) title
    fn set_document_title(&mut self, title: &str) -> Result<()>;

    /// Set the visible heading text
    fn set_heading(&mut self, text: &str) -> Result<()>;

    /// Show the error region with `message`
    fn show_error(&mut self, message: &str) -> Result<()>;

    /// Hide the tap-to-start overlay
    fn hide_overlay(&mut self) -> Result<()>;

    /// Remove every child of the media element
    fn clear_media(&mut self) -> Result<()>;

    fn append_source(&mut self, source: &SourceSpec) -> Result<()>;

    fn append_track(&mut self, track: &TrackSpec) -> Result<()>;

    /// Set the poster image, or remove the attribute when `None`
    fn set_poster(&mut self, poster: Option<&str>) -> Result<()>;

    /// Point the "open directly" link at `href`
    fn set_direct_link(&mut self, href: &str) -> Result<()>;

    /// Set the playback position in seconds
    fn set_start_position(&mut self, seconds: f64) -> Result<()>;

    /// Arm the tap-to-start interaction.
    ///
    /// The first overlay activation hides the overlay, applies
    /// [`INLINE_PLAYBACK_ATTRIBUTES`] and attempts playback; a rejected attempt
    /// goes to [`report_rejected_start`]. Any `play` event on the media element
    /// also hides the overlay. Arming again replaces the earlier handlers.
    fn arm_tap_to_start(&mut self) -> Result<()>;

    /// Detach handlers armed by [`arm_tap_to_start`](Self::arm_tap_to_start).
    /// No-op when nothing is armed.
    fn disarm_tap_to_start(&mut self) -> Result<()>;
}

/// Guard that lets a handler run once
#[derive(Debug, Default)]
pub struct OneShot {
    fired: Cell<bool>,
}

impl OneShot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time only
    pub fn fire(&self) -> bool {
        !self.fired.replace(true)
    }

    pub fn has_fired(&self) -> bool {
        self.fired.get()
    }
}

/// Log a declined playback attempt.
///
/// Not shown to the user: the native controls stay available.
pub fn report_rejected_start(reason: impl Into<String>) -> Error {
    let err = Error::PlaybackStartRejected(reason.into());
    warn!(code = err.error_code(), error = %err, "Playback start declined, native controls remain");
    err
}

/// Whether a simulated platform lets scripted playback start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoplayPolicy {
    #[default]
    Allowed,
    Blocked,
}

/// Child node of the recorded media element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaChild {
    Source(SourceSpec),
    Track(TrackSpec),
}

/// Observable state of a [`MemorySurface`]
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceState {
    pub document_title: String,
    pub heading: String,
    /// Error region text; `None` while the region is hidden
    pub error: Option<String>,
    pub overlay_visible: bool,
    pub media: Vec<MediaChild>,
    pub poster: Option<String>,
    pub direct_link: Option<String>,
    pub current_time: f64,
    pub inline_attributes: Vec<String>,
    pub playing: bool,
    pub tap_armed: bool,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            document_title: String::new(),
            heading: String::new(),
            error: None,
            overlay_visible: true,
            media: Vec::new(),
            poster: None,
            direct_link: None,
            current_time: 0.0,
            inline_attributes: Vec::new(),
            playing: false,
            tap_armed: false,
        }
    }
}

impl SurfaceState {
    pub fn sources(&self) -> Vec<&SourceSpec> {
        self.media
            .iter()
            .filter_map(|child| match child {
                MediaChild::Source(source) => Some(source),
                MediaChild::Track(_) => None,
            })
            .collect()
    }

    pub fn tracks(&self) -> Vec<&TrackSpec> {
        self.media
            .iter()
            .filter_map(|child| match child {
                MediaChild::Track(track) => Some(track),
                MediaChild::Source(_) => None,
            })
            .collect()
    }
}

/// In-memory presentation surface
#[derive(Debug, Default)]
pub struct MemorySurface {
    state: SurfaceState,
    autoplay: AutoplayPolicy,
    tap: OneShot,
    play_attempts: u32,
    rejections: Vec<Error>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_autoplay(mut self, policy: AutoplayPolicy) -> Self {
        self.autoplay = policy;
        self
    }

    pub fn state(&self) -> &SurfaceState {
        &self.state
    }

    pub fn play_attempts(&self) -> u32 {
        self.play_attempts
    }

    /// Declined playback attempts, oldest first
    pub fn rejections(&self) -> &[Error] {
        &self.rejections
    }

    /// Simulate a tap on the overlay. Returns whether the armed handler ran.
    pub fn tap_overlay(&mut self) -> bool {
        if !self.state.tap_armed || !self.tap.fire() {
            return false;
        }

        self.state.overlay_visible = false;
        for attribute in INLINE_PLAYBACK_ATTRIBUTES {
            if !self.state.inline_attributes.iter().any(|a| a == attribute) {
                self.state.inline_attributes.push(attribute.to_string());
            }
        }

        self.play_attempts += 1;
        match self.autoplay {
            AutoplayPolicy::Allowed => self.emit_play(),
            AutoplayPolicy::Blocked => {
                let err = report_rejected_start("NotAllowedError: play() requires a user gesture");
                self.rejections.push(err);
            }
        }
        true
    }

    /// Simulate playback started from the native controls
    pub fn native_play(&mut self) {
        self.emit_play();
    }

    fn emit_play(&mut self) {
        self.state.playing = true;
        if self.state.tap_armed {
            self.state.overlay_visible = false;
        }
    }
}

impl PlaybackSurface for MemorySurface {
    fn set_document_title(&mut self, title: &str) -> Result<()> {
        self.state.document_title = title.to_string();
        Ok(())
    }

    fn set_heading(&mut self, text: &str) -> Result<()> {
        self.state.heading = text.to_string();
        Ok(())
    }

    fn show_error(&mut self, message: &str) -> Result<()> {
        self.state.error = Some(message.to_string());
        Ok(())
    }

    fn hide_overlay(&mut self) -> Result<()> {
        self.state.overlay_visible = false;
        Ok(())
    }

    fn clear_media(&mut self) -> Result<()> {
        self.state.media.clear();
        Ok(())
    }

    fn append_source(&mut self, source: &SourceSpec) -> Result<()> {
        self.state.media.push(MediaChild::Source(source.clone()));
        Ok(())
    }

    fn append_track(&mut self, track: &TrackSpec) -> Result<()> {
        self.state.media.push(MediaChild::Track(track.clone()));
        Ok(())
    }

    fn set_poster(&mut self, poster: Option<&str>) -> Result<()> {
        self.state.poster = poster.map(str::to_string);
        Ok(())
    }

    fn set_direct_link(&mut self, href: &str) -> Result<()> {
        self.state.direct_link = Some(href.to_string());
        Ok(())
    }

    fn set_start_position(&mut self, seconds: f64) -> Result<()> {
        self.state.current_time = seconds;
        Ok(())
    }

    fn arm_tap_to_start(&mut self) -> Result<()> {
        debug!("Arming tap-to-start");
        self.state.tap_armed = true;
        self.tap = OneShot::new();
        Ok(())
    }

    fn disarm_tap_to_start(&mut self) -> Result<()> {
        self.state.tap_armed = false;
        Ok(())
    }
}
