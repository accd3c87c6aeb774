//! Landing configuration
//!
//! Every field has a default matching the stock `www/index.html`, so an empty
//! JSON object is a valid configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Landing page configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingConfig {
    /// Catalog location, relative to the page
    pub catalog_url: String,
    /// Query parameter carrying the slug
    pub slug_param: String,
    /// Query parameter carrying the start offset in seconds
    pub start_param: String,
    /// Type hint on the media source element
    pub media_type: String,
    /// Subtitle track attributes
    pub caption: CaptionConfig,
    /// Page element ids
    pub elements: ElementIds,
    /// Class toggled on the overlay to hide it
    pub hidden_class: String,
    /// User-facing strings
    pub messages: Messages,
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            catalog_url: "data/videos.json".to_string(),
            slug_param: "v".to_string(),
            start_param: "t".to_string(),
            media_type: "video/mp4".to_string(),
            caption: CaptionConfig::default(),
            elements: ElementIds::default(),
            hidden_class: "hidden".to_string(),
            messages: Messages::default(),
        }
    }
}

impl LandingConfig {
    /// Parse a (possibly partial) JSON configuration and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot drive a page
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("catalog_url", &self.catalog_url),
            ("slug_param", &self.slug_param),
            ("start_param", &self.start_param),
            ("hidden_class", &self.hidden_class),
            ("elements.title", &self.elements.title),
            ("elements.error", &self.elements.error),
            ("elements.video", &self.elements.video),
            ("elements.overlay", &self.elements.overlay),
            ("elements.direct_link", &self.elements.direct_link),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(Error::InvalidConfig(format!("{name} must not be empty")));
            }
        }

        if self.slug_param == self.start_param {
            return Err(Error::InvalidConfig(
                "slug_param and start_param must differ".to_string(),
            ));
        }

        Ok(())
    }
}

/// Subtitle track attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    pub kind: String,
    pub label: String,
    pub language: String,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            kind: "subtitles".to_string(),
            label: "Korean".to_string(),
            language: "ko".to_string(),
        }
    }
}

/// Ids of the page elements making up the presentation surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub title: String,
    pub error: String,
    pub video: String,
    pub overlay: String,
    pub direct_link: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            title: "title".to_string(),
            error: "error".to_string(),
            video: "video".to_string(),
            overlay: "overlayPlay".to_string(),
            direct_link: "openDirect".to_string(),
        }
    }
}

/// User-facing strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Document title when the record has no title
    pub fallback_document_title: String,
    /// Heading when the record has no title
    pub fallback_heading: String,
    pub not_found_title: String,
    pub not_found_message: String,
    pub load_error_title: String,
    pub load_error_message: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            fallback_document_title: "동영상 재생".to_string(),
            fallback_heading: "동영상".to_string(),
            not_found_title: "잘못된 링크입니다".to_string(),
            not_found_message: "존재하지 않는 영상입니다. QR 코드를 다시 확인해주세요.".to_string(),
            load_error_title: "로딩 오류".to_string(),
            load_error_message: "데이터를 불러오지 못했습니다. 잠시 후 다시 시도해주세요."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LandingConfig::default();
        assert_eq!(config.catalog_url, "data/videos.json");
        assert_eq!(config.slug_param, "v");
        assert_eq!(config.start_param, "t");
        assert_eq!(config.caption.language, "ko");
        assert_eq!(config.elements.overlay, "overlayPlay");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = LandingConfig::from_json(
            r#"{"catalog_url": "catalog.json", "elements": {"video": "player"}}"#,
        )
        .unwrap();

        assert_eq!(config.catalog_url, "catalog.json");
        assert_eq!(config.elements.video, "player");
        assert_eq!(config.elements.title, "title");
        assert_eq!(config.media_type, "video/mp4");
    }

    #[test]
    fn test_empty_values_rejected() {
        let err = LandingConfig::from_json(r#"{"catalog_url": " "}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = LandingConfig::from_json(r#"{"slug_param": "t"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_unparseable_config() {
        let err = LandingConfig::from_json("[1, 2]").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
