//! qreel WASM - browser binding for QR-linked video pages
//!
//! Loads next to a page holding the player markup (see `www/index.html`),
//! reads `?v=` and `?t=`, fetches the catalog with `cache: "no-store"`, and
//! configures the `<video>` element.
//!
//! ## Integration
//!
//! ```javascript
//! import init from './pkg/qreel_wasm.js';
//!
//! // With the default `autostart` feature the landing sequence runs on init.
//! await init();
//! ```
//!
//! Built with `default-features = false`, the host calls `mount` itself:
//!
//! ```javascript
//! import init, { mount } from './pkg/qreel_wasm.js';
//!
//! await init();
//! const outcome = await mount({ catalog_url: 'catalog.json' }); // "ready" | "not_found" | "load_failed"
//! ```

use qreel_core::{Error, Landing, LandingConfig, Outcome, PageParams};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

mod console;
mod dom;
mod fetch;

pub use dom::DomSurface;
pub use fetch::FetchCatalogSource;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console::init_logging();
    tracing::info!(version = qreel_core::VERSION, "qreel initialized");

    #[cfg(feature = "autostart")]
    wasm_bindgen_futures::spawn_local(async {
        if let Err(err) = boot(LandingConfig::default()).await {
            tracing::error!(code = err.error_code(), error = %err, "Page could not be initialized");
        }
    });
}

/// Library version
#[wasm_bindgen]
pub fn version() -> String {
    qreel_core::VERSION.to_string()
}

/// Run the landing sequence with a host-supplied configuration.
///
/// `config` may be `undefined` or a partial object; missing fields take their
/// defaults. Resolves to the outcome label.
#[wasm_bindgen]
pub async fn mount(config: JsValue) -> Result<String, JsValue> {
    let config: LandingConfig = if config.is_undefined() || config.is_null() {
        LandingConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)?
    };
    config.validate().map_err(to_js)?;

    let outcome = boot(config).await.map_err(to_js)?;
    Ok(outcome.label().to_string())
}

/// Bind to the current page and run the landing sequence once
async fn boot(config: LandingConfig) -> qreel_core::Result<Outcome> {
    let window = web_sys::window().ok_or_else(|| Error::MissingElement("window".to_string()))?;
    let href = window
        .location()
        .href()
        .map_err(|e| Error::surface(format!("page address: {}", describe_js(&e))))?;

    let params = PageParams::from_href(&href, &config)?;
    let mut surface = DomSurface::bind(&window, &config)?;
    let source = FetchCatalogSource::new(window, &config.catalog_url);

    let outcome = Landing::new(config, source).run(&params, &mut surface).await;
    surface.keep_alive();
    Ok(outcome)
}

fn to_js(err: Error) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Human-readable text for a thrown JS value
pub(crate) fn describe_js(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        let name: String = err.name().into();
        let message: String = err.message().into();
        return format!("{name}: {message}");
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
