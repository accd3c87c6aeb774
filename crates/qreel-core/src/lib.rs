//! qreel Core - landing logic for QR-linked video pages
//!
//! A visitor opens `page.html?v=<slug>[&t=<seconds>]`. This crate provides:
//! - Catalog loading (static JSON list of media records, never cached)
//! - Slug resolution against the catalog
//! - Page parameter parsing (`v`, `t`)
//! - Playback configuration of a presentation surface
//! - The invalid-link and load-error page states
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      qreel Core                         │
//! ├─────────────────────────────────────────────────────────┤
//! │                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐   │
//! │  │   Catalog    │  │    Page      │  │    Config    │   │
//! │  │   Source     │  │   Params     │  │              │   │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘   │
//! │         └─────────────────┼─────────────────┘           │
//! │                    ┌──────┴──────┐                      │
//! │                    │   Landing   │                      │
//! │                    └──────┬──────┘                      │
//! │                    ┌──────┴──────┐                      │
//! │                    │ Presentation│                      │
//! │                    └──────┬──────┘                      │
//! │                    ┌──────┴──────┐                      │
//! │                    │  Playback   │  DOM (qreel-wasm)    │
//! │                    │  Surface    │  Memory (tests)      │
//! │                    └─────────────┘                      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use qreel_core::{Catalog, Landing, LandingConfig, MediaRecord, MemorySurface, PageParams, StaticCatalog};
//!
//! # async fn demo() {
//! let catalog = Catalog::new(vec![MediaRecord::new("alpha", "videos/alpha.mp4")]);
//! let config = LandingConfig::default();
//! let params = PageParams::from_query("?v=alpha&t=12.5", &config);
//!
//! let landing = Landing::new(config, StaticCatalog::new(catalog));
//! let mut surface = MemorySurface::new();
//! assert!(landing.run(&params, &mut surface).await.is_ready());
//! assert_eq!(surface.state().current_time, 12.5);
//! # }
//! ```

pub mod error;
pub mod config;
pub mod catalog;
pub mod params;
pub mod surface;
pub mod presentation;
pub mod landing;

pub use error::{Error, Result};
pub use config::{CaptionConfig, ElementIds, LandingConfig, Messages};
pub use catalog::{check_status, Catalog, CatalogSource, MediaRecord, StaticCatalog};
#[cfg(feature = "http")]
pub use catalog::HttpCatalogSource;
pub use params::{PageParams, StartOffset};
pub use surface::{
    report_rejected_start, AutoplayPolicy, MediaChild, MemorySurface, OneShot, PlaybackSurface,
    SourceSpec, SurfaceState, TrackSpec, INLINE_PLAYBACK_ATTRIBUTES,
};
pub use presentation::{apply_start_offset, configure, Presentation};
pub use landing::{FailureState, Landing, Outcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
