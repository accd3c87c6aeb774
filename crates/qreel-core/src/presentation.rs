//! Playback configuration
//!
//! Turns a resolved [`MediaRecord`] into a [`Presentation`] and applies it to
//! a [`PlaybackSurface`].

use crate::{
    surface::{PlaybackSurface, SourceSpec, TrackSpec},
    LandingConfig, MediaRecord, Result, StartOffset,
};
use tracing::{debug, info};

/// Everything shown for one record
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub document_title: String,
    pub heading: String,
    pub source: SourceSpec,
    pub track: Option<TrackSpec>,
    pub poster: Option<String>,
    pub direct_link: String,
}

impl Presentation {
    pub fn for_record(record: &MediaRecord, config: &LandingConfig) -> Self {
        let title = record.title.as_deref().filter(|t| !t.is_empty());
        let messages = &config.messages;

        Self {
            document_title: title.unwrap_or(messages.fallback_document_title.as_str()).to_string(),
            heading: title.unwrap_or(messages.fallback_heading.as_str()).to_string(),
            source: SourceSpec {
                src: record.src.clone(),
                media_type: config.media_type.clone(),
            },
            track: record.caption.as_ref().map(|caption| TrackSpec {
                src: caption.clone(),
                kind: config.caption.kind.clone(),
                label: config.caption.label.clone(),
                language: config.caption.language.clone(),
                default: true,
            }),
            poster: record.poster.clone(),
            direct_link: record.src.clone(),
        }
    }

    /// Apply to `surface`, replacing whatever an earlier pass left behind
    pub fn apply<S: PlaybackSurface + ?Sized>(&self, surface: &mut S) -> Result<()> {
        surface.set_document_title(&self.document_title)?;
        surface.set_heading(&self.heading)?;

        surface.clear_media()?;
        surface.append_source(&self.source)?;
        if let Some(track) = &self.track {
            surface.append_track(track)?;
        }
        surface.set_poster(self.poster.as_deref())?;

        surface.arm_tap_to_start()?;
        surface.set_direct_link(&self.direct_link)?;

        debug!(
            src = %self.source.src,
            captions = self.track.is_some(),
            poster = self.poster.is_some(),
            "Presentation applied"
        );
        Ok(())
    }
}

/// Configure `surface` to play `record`
pub fn configure<S: PlaybackSurface + ?Sized>(
    surface: &mut S,
    record: &MediaRecord,
    config: &LandingConfig,
) -> Result<()> {
    info!(slug = ?record.slug, "Configuring playback");
    Presentation::for_record(record, config).apply(surface)
}

/// Seek to the requested start position, if any
pub fn apply_start_offset<S: PlaybackSurface + ?Sized>(
    surface: &mut S,
    offset: Option<StartOffset>,
) -> Result<()> {
    if let Some(offset) = offset {
        debug!(%offset, "Applying start offset");
        surface.set_start_position(offset.seconds())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    #[test]
    fn test_title_fallbacks() {
        let config = LandingConfig::default();

        let plan = Presentation::for_record(&MediaRecord::new("a", "a.mp4"), &config);
        assert_eq!(plan.document_title, "동영상 재생");
        assert_eq!(plan.heading, "동영상");

        let plan = Presentation::for_record(&MediaRecord::new("a", "a.mp4").with_title(""), &config);
        assert_eq!(plan.heading, "동영상");

        let plan = Presentation::for_record(&MediaRecord::new("a", "a.mp4").with_title("Alpha"), &config);
        assert_eq!(plan.document_title, "Alpha");
        assert_eq!(plan.heading, "Alpha");
    }

    #[test]
    fn test_caption_track_attributes() {
        let record = MediaRecord::new("a", "a.mp4").with_caption("captions/a.vtt");
        let plan = Presentation::for_record(&record, &LandingConfig::default());

        let track = plan.track.unwrap();
        assert_eq!(track.src, "captions/a.vtt");
        assert_eq!(track.kind, "subtitles");
        assert_eq!(track.label, "Korean");
        assert_eq!(track.language, "ko");
        assert!(track.default);
    }

    #[test]
    fn test_source_and_link_are_verbatim() {
        let record = MediaRecord::new("a", "videos/a b.mp4?x=1");
        let plan = Presentation::for_record(&record, &LandingConfig::default());
        assert_eq!(plan.source.src, "videos/a b.mp4?x=1");
        assert_eq!(plan.source.media_type, "video/mp4");
        assert_eq!(plan.direct_link, "videos/a b.mp4?x=1");
    }

    #[test]
    fn test_start_offset_none_leaves_position() {
        let mut surface = MemorySurface::new();
        apply_start_offset(&mut surface, None).unwrap();
        assert_eq!(surface.state().current_time, 0.0);

        apply_start_offset(&mut surface, StartOffset::parse("42")).unwrap();
        assert_eq!(surface.state().current_time, 42.0);
    }
}
