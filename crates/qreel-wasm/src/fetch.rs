//! Catalog source over the browser's `fetch`

use crate::describe_js;
use async_trait::async_trait;
use qreel_core::{check_status, Catalog, CatalogSource, Error, Result};
use tracing::info;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCache, RequestInit, Response, Window};

/// Fetches the catalog relative to the page, bypassing the HTTP cache
pub struct FetchCatalogSource {
    window: Window,
    url: String,
}

impl FetchCatalogSource {
    pub fn new(window: Window, url: impl Into<String>) -> Self {
        Self {
            window,
            url: url.into(),
        }
    }

    fn unavailable(&self, value: &JsValue) -> Error {
        Error::unavailable(&self.url, describe_js(value))
    }
}

#[async_trait(?Send)]
impl CatalogSource for FetchCatalogSource {
    async fn load(&self) -> Result<Catalog> {
        info!(url = %self.url, "Loading catalog");

        let init = RequestInit::new();
        init.set_method("GET");
        init.set_cache(RequestCache::NoStore);

        let request = Request::new_with_str_and_init(&self.url, &init)
            .map_err(|e| self.unavailable(&e))?;

        let response: Response = JsFuture::from(self.window.fetch_with_request(&request))
            .await
            .map_err(|e| self.unavailable(&e))?
            .dyn_into()
            .map_err(|e| self.unavailable(&e))?;

        check_status(&self.url, response.status(), &response.status_text())?;

        let text = response.text().map_err(|e| self.unavailable(&e))?;
        let body = JsFuture::from(text)
            .await
            .map_err(|e| self.unavailable(&e))?
            .as_string()
            .ok_or_else(|| Error::CatalogMalformed("catalog body is not text".to_string()))?;

        Catalog::from_json(&body)
    }
}
