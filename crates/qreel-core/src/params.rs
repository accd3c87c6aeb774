//! Page address parameters

use crate::{Error, LandingConfig, Result};
use std::borrow::Cow;
use std::fmt;
use url::{form_urlencoded, Url};

/// Playback start position requested through the page address, in seconds.
///
/// Always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct StartOffset(f64);

impl StartOffset {
    /// Parse a start offset the way browsers read a leading decimal number.
    ///
    /// Leading whitespace is skipped and trailing garbage after the number is
    /// ignored, so `"12.5s"` yields 12.5. Values that are not numeric, are
    /// negative, or overflow to infinity yield `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let number = decimal_prefix(input.trim_start());
        if number.is_empty() {
            return None;
        }

        let seconds: f64 = number.parse().ok()?;
        if seconds.is_finite() && seconds >= 0.0 {
            Some(Self(seconds))
        } else {
            None
        }
    }

    pub fn seconds(self) -> f64 {
        self.0
    }
}

impl fmt::Display for StartOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Longest prefix of `s` shaped like `[+-]digits[.digits][e[+-]digits]`
fn decimal_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        let frac_digits = frac_end - (end + 1);
        if mantissa_digits + frac_digits > 0 {
            mantissa_digits += frac_digits;
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    &s[..end]
}

/// Parameters read from the page's own address
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageParams {
    /// Requested slug (`v`)
    pub slug: Option<String>,
    /// Requested start position (`t`)
    pub start_offset: Option<StartOffset>,
}

impl PageParams {
    pub fn new(slug: Option<&str>, start_offset: Option<StartOffset>) -> Self {
        Self {
            slug: slug.map(str::to_string),
            start_offset,
        }
    }

    /// Read parameters from a full page address
    pub fn from_href(href: &str, config: &LandingConfig) -> Result<Self> {
        let url = Url::parse(href)
            .map_err(|e| Error::surface(format!("invalid page address {href:?}: {e}")))?;
        Ok(Self::from_url(&url, config))
    }

    pub fn from_url(url: &Url, config: &LandingConfig) -> Self {
        Self::from_pairs(url.query_pairs(), config)
    }

    /// Read parameters from a query string, with or without the leading `?`
    pub fn from_query(query: &str, config: &LandingConfig) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(form_urlencoded::parse(query.as_bytes()), config)
    }

    fn from_pairs<'a>(
        pairs: impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>,
        config: &LandingConfig,
    ) -> Self {
        let mut slug = None;
        let mut start = None;

        // First occurrence of each parameter wins
        for (key, value) in pairs {
            if slug.is_none() && key == config.slug_param {
                slug = Some(value.into_owned());
            } else if start.is_none() && key == config.start_param {
                start = Some(value.into_owned());
            }
        }

        Self {
            slug,
            start_offset: start.as_deref().and_then(StartOffset::parse),
        }
    }

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset(input: &str) -> Option<f64> {
        StartOffset::parse(input).map(StartOffset::seconds)
    }

    #[test]
    fn test_start_offset_values() {
        assert_eq!(offset("12.5"), Some(12.5));
        assert_eq!(offset("0"), Some(0.0));
        assert_eq!(offset("90"), Some(90.0));
        assert_eq!(offset(".5"), Some(0.5));
        assert_eq!(offset("1e2"), Some(100.0));
    }

    #[test]
    fn test_start_offset_rejects() {
        assert_eq!(offset("-3"), None);
        assert_eq!(offset("abc"), None);
        assert_eq!(offset(""), None);
        assert_eq!(offset("."), None);
        assert_eq!(offset("-"), None);
        assert_eq!(offset("1e999"), None);
        assert_eq!(offset("Infinity"), None);
    }

    #[test]
    fn test_start_offset_reads_leading_number() {
        assert_eq!(offset("  12.5"), Some(12.5));
        assert_eq!(offset("12.5s"), Some(12.5));
        assert_eq!(offset("7."), Some(7.0));
        assert_eq!(offset("3e"), Some(3.0));
        assert_eq!(offset("4.2.1"), Some(4.2));
    }

    #[test]
    fn test_params_from_href() {
        let config = LandingConfig::default();
        let params =
            PageParams::from_href("https://example.com/watch/?v=alpha&t=12.5", &config).unwrap();
        assert_eq!(params.slug(), Some("alpha"));
        assert_eq!(params.start_offset, StartOffset::parse("12.5"));
    }

    #[test]
    fn test_params_absent_and_invalid() {
        let config = LandingConfig::default();
        let params = PageParams::from_href("https://example.com/?t=-3", &config).unwrap();
        assert_eq!(params.slug(), None);
        assert_eq!(params.start_offset, None);

        assert!(PageParams::from_href("not a url", &config).is_err());
    }

    #[test]
    fn test_params_decoding_and_first_wins() {
        let config = LandingConfig::default();
        let params = PageParams::from_query("?v=%ED%95%9C&v=other&t=abc", &config);
        assert_eq!(params.slug(), Some("한"));
        assert_eq!(params.start_offset, None);

        let params = PageParams::from_query("v=", &config);
        assert_eq!(params.slug(), Some(""));
    }

    #[test]
    fn test_params_custom_names() {
        let config = LandingConfig {
            slug_param: "video".to_string(),
            start_param: "at".to_string(),
            ..Default::default()
        };
        let params = PageParams::from_query("v=alpha&video=beta&at=3", &config);
        assert_eq!(params.slug(), Some("beta"));
        assert_eq!(params.start_offset.map(StartOffset::seconds), Some(3.0));
    }
}
