//! Landing sequence - page initialization from address to configured player
//!
//! Coordinates:
//! - Catalog loading
//! - Slug resolution
//! - Playback configuration and start offset
//! - The two terminal failure states
//!
//! Every error is trapped here and turned into something the visitor can see.

use crate::{
    catalog::CatalogSource,
    config::Messages,
    presentation::{apply_start_offset, configure},
    surface::PlaybackSurface,
    Error, LandingConfig, PageParams, Result,
};
use std::fmt;
use tracing::{error, info, instrument, warn};

/// How a landing run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Player configured and tap-to-start armed
    Ready { slug: Option<String> },
    /// No record matches the requested slug
    NotFound { slug: Option<String> },
    /// Catalog could not be loaded or the page could not be configured
    LoadFailed { code: &'static str },
}

impl Outcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, Outcome::Ready { .. })
    }

    /// Short machine-readable name
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Ready { .. } => "ready",
            Outcome::NotFound { .. } => "not_found",
            Outcome::LoadFailed { .. } => "load_failed",
        }
    }
}

/// Terminal failure states of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureState {
    /// Link points at nothing
    InvalidLink,
    /// Catalog or page setup failed; worth retrying later
    LoadError,
}

impl FailureState {
    pub fn title(self, messages: &Messages) -> &str {
        match self {
            FailureState::InvalidLink => &messages.not_found_title,
            FailureState::LoadError => &messages.load_error_title,
        }
    }

    pub fn message(self, messages: &Messages) -> &str {
        match self {
            FailureState::InvalidLink => &messages.not_found_message,
            FailureState::LoadError => &messages.load_error_message,
        }
    }

    /// Show the state and withdraw anything a partial configuration left
    fn present<S: PlaybackSurface + ?Sized>(self, surface: &mut S, messages: &Messages) -> Result<()> {
        surface.set_heading(self.title(messages))?;
        surface.show_error(self.message(messages))?;
        surface.hide_overlay()?;

        surface.disarm_tap_to_start()?;
        surface.clear_media()?;
        surface.set_poster(None)
    }
}

impl fmt::Display for FailureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureState::InvalidLink => write!(f, "invalid_link"),
            FailureState::LoadError => write!(f, "load_error"),
        }
    }
}

/// Page initialization over a catalog source
pub struct Landing<C> {
    config: LandingConfig,
    source: C,
}

impl<C: CatalogSource> Landing<C> {
    pub fn new(config: LandingConfig, source: C) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &LandingConfig {
        &self.config
    }

    /// Run the whole sequence once. Never fails; failures end up on `surface`.
    #[instrument(skip(self, surface))]
    pub async fn run<S: PlaybackSurface + ?Sized>(
        &self,
        params: &PageParams,
        surface: &mut S,
    ) -> Outcome {
        match self.try_run(params, surface).await {
            Ok(()) => {
                info!("Player ready");
                Outcome::Ready {
                    slug: params.slug.clone(),
                }
            }
            Err(Error::NotFound { slug }) => {
                warn!(slug = ?slug, "No media for slug");
                self.present_failure(surface, FailureState::InvalidLink);
                Outcome::NotFound { slug }
            }
            Err(err) => {
                error!(code = err.error_code(), error = %err, "Landing failed");
                self.present_failure(surface, FailureState::LoadError);
                Outcome::LoadFailed {
                    code: err.error_code(),
                }
            }
        }
    }

    async fn try_run<S: PlaybackSurface + ?Sized>(
        &self,
        params: &PageParams,
        surface: &mut S,
    ) -> Result<()> {
        let catalog = self.source.load().await?;
        info!(records = catalog.len(), "Catalog loaded");

        let record = catalog
            .resolve(params.slug())
            .ok_or_else(|| Error::NotFound {
                slug: params.slug.clone(),
            })?;

        configure(surface, record, &self.config)?;
        apply_start_offset(surface, params.start_offset)
    }

    fn present_failure<S: PlaybackSurface + ?Sized>(&self, surface: &mut S, state: FailureState) {
        if let Err(err) = state.present(surface, &self.config.messages) {
            error!(%state, error = %err, "Failed to present error state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{surface::MemorySurface, Catalog, MediaRecord, StaticCatalog};

    fn landing() -> Landing<StaticCatalog> {
        let catalog = Catalog::new(vec![MediaRecord::new("alpha", "videos/alpha.mp4")]);
        Landing::new(LandingConfig::default(), StaticCatalog::new(catalog))
    }

    #[tokio::test]
    async fn test_absent_slug_is_invalid_link() {
        let mut surface = MemorySurface::new();
        let outcome = landing().run(&PageParams::default(), &mut surface).await;

        assert_eq!(outcome, Outcome::NotFound { slug: None });
        assert_eq!(outcome.label(), "not_found");
        assert_eq!(surface.state().heading, "잘못된 링크입니다");
        assert!(!surface.state().overlay_visible);
    }

    #[tokio::test]
    async fn test_ready_outcome() {
        let mut surface = MemorySurface::new();
        let params = PageParams::new(Some("alpha"), None);
        let outcome = landing().run(&params, &mut surface).await;

        assert!(outcome.is_ready());
        assert!(surface.state().overlay_visible);
        assert!(surface.state().tap_armed);
        assert_eq!(surface.state().error, None);
    }

    #[test]
    fn test_failure_state_texts() {
        let messages = Messages::default();
        assert_eq!(FailureState::LoadError.title(&messages), "로딩 오류");
        assert!(FailureState::LoadError.message(&messages).contains("다시 시도"));
        assert_eq!(FailureState::InvalidLink.to_string(), "invalid_link");
    }
}
