//! DOM presentation surface

use crate::describe_js;
use qreel_core::{
    report_rejected_start, Error, LandingConfig, OneShot, PlaybackSurface, Result, SourceSpec,
    TrackSpec, INLINE_PLAYBACK_ATTRIBUTES,
};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    AddEventListenerOptions, Document, HtmlAnchorElement, HtmlElement, HtmlSourceElement,
    HtmlTrackElement, HtmlVideoElement, Window,
};

/// Page elements making up the player
pub struct DomSurface {
    document: Document,
    title: HtmlElement,
    error: HtmlElement,
    video: HtmlVideoElement,
    overlay: HtmlElement,
    direct_link: HtmlAnchorElement,
    hidden_class: String,
    listeners: Option<Listeners>,
}

/// Armed event handlers. A dropped closure throws when the browser calls it,
/// so these are detached before being replaced.
struct Listeners {
    overlay_click: Closure<dyn FnMut()>,
    media_play: Closure<dyn FnMut()>,
}

impl DomSurface {
    /// Look up every element named in `config.elements`
    pub fn bind(window: &Window, config: &LandingConfig) -> Result<Self> {
        let document = window
            .document()
            .ok_or_else(|| Error::MissingElement("document".to_string()))?;
        let ids = &config.elements;

        Ok(Self {
            title: element(&document, &ids.title)?,
            error: element(&document, &ids.error)?,
            video: element(&document, &ids.video)?,
            overlay: element(&document, &ids.overlay)?,
            direct_link: element(&document, &ids.direct_link)?,
            hidden_class: config.hidden_class.clone(),
            listeners: None,
            document,
        })
    }

    /// Leave the armed handlers attached for the rest of the page's life
    pub fn keep_alive(mut self) {
        if let Some(listeners) = self.listeners.take() {
            listeners.overlay_click.forget();
            listeners.media_play.forget();
        }
    }

    fn detach_listeners(&mut self) -> Result<()> {
        if let Some(listeners) = self.listeners.take() {
            self.overlay
                .remove_event_listener_with_callback(
                    "click",
                    listeners.overlay_click.as_ref().unchecked_ref(),
                )
                .map_err(js_err("remove click listener"))?;
            self.video
                .remove_event_listener_with_callback(
                    "play",
                    listeners.media_play.as_ref().unchecked_ref(),
                )
                .map_err(js_err("remove play listener"))?;
        }
        Ok(())
    }
}

impl PlaybackSurface for DomSurface {
    fn set_document_title(&mut self, title: &str) -> Result<()> {
        self.document.set_title(title);
        Ok(())
    }

    fn set_heading(&mut self, text: &str) -> Result<()> {
        self.title.set_text_content(Some(text));
        Ok(())
    }

    fn show_error(&mut self, message: &str) -> Result<()> {
        self.error.set_text_content(Some(message));
        self.error.set_hidden(false);
        Ok(())
    }

    fn hide_overlay(&mut self) -> Result<()> {
        self.overlay
            .class_list()
            .add_1(&self.hidden_class)
            .map_err(js_err("hide overlay"))
    }

    fn clear_media(&mut self) -> Result<()> {
        self.video.set_inner_html("");
        Ok(())
    }

    fn append_source(&mut self, spec: &SourceSpec) -> Result<()> {
        let source: HtmlSourceElement = create(&self.document, "source")?;
        source.set_src(&spec.src);
        source.set_type(&spec.media_type);
        self.video
            .append_child(&source)
            .map_err(js_err("append source"))?;
        Ok(())
    }

    fn append_track(&mut self, spec: &TrackSpec) -> Result<()> {
        let track: HtmlTrackElement = create(&self.document, "track")?;
        track.set_kind(&spec.kind);
        track.set_label(&spec.label);
        track.set_srclang(&spec.language);
        track.set_src(&spec.src);
        track.set_default(spec.default);
        self.video
            .append_child(&track)
            .map_err(js_err("append track"))?;
        Ok(())
    }

    fn set_poster(&mut self, poster: Option<&str>) -> Result<()> {
        match poster {
            Some(poster) => self.video.set_poster(poster),
            None => self
                .video
                .remove_attribute("poster")
                .map_err(js_err("remove poster"))?,
        }
        Ok(())
    }

    fn set_direct_link(&mut self, href: &str) -> Result<()> {
        self.direct_link.set_href(href);
        Ok(())
    }

    fn set_start_position(&mut self, seconds: f64) -> Result<()> {
        self.video.set_current_time(seconds);
        Ok(())
    }

    fn arm_tap_to_start(&mut self) -> Result<()> {
        self.detach_listeners()?;

        let once = OneShot::new();
        let video = self.video.clone();
        let overlay = self.overlay.clone();
        let hidden = self.hidden_class.clone();
        let overlay_click = Closure::<dyn FnMut()>::new(move || {
            if !once.fire() {
                return;
            }
            hide(&overlay, &hidden);
            start_playback(&video);
        });

        let options = AddEventListenerOptions::new();
        options.set_once(true);
        self.overlay
            .add_event_listener_with_callback_and_add_event_listener_options(
                "click",
                overlay_click.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(js_err("arm overlay"))?;

        let overlay = self.overlay.clone();
        let hidden = self.hidden_class.clone();
        let media_play = Closure::<dyn FnMut()>::new(move || hide(&overlay, &hidden));
        self.video
            .add_event_listener_with_callback("play", media_play.as_ref().unchecked_ref())
            .map_err(js_err("arm play listener"))?;

        debug!("Tap-to-start armed");
        self.listeners = Some(Listeners {
            overlay_click,
            media_play,
        });
        Ok(())
    }

    fn disarm_tap_to_start(&mut self) -> Result<()> {
        self.detach_listeners()
    }
}

/// Hide the overlay from inside an event handler
fn hide(overlay: &HtmlElement, hidden_class: &str) {
    if let Err(err) = overlay.class_list().add_1(hidden_class) {
        warn!(error = %describe_js(&err), "Could not hide overlay");
    }
}

/// Request inline playback and start it without waiting on the result
fn start_playback(video: &HtmlVideoElement) {
    for attribute in INLINE_PLAYBACK_ATTRIBUTES {
        if let Err(err) = video.set_attribute(attribute, "") {
            warn!(attribute, error = %describe_js(&err), "Could not set inline playback hint");
        }
    }

    match video.play() {
        Ok(promise) => spawn_local(async move {
            if let Err(err) = JsFuture::from(promise).await {
                report_rejected_start(describe_js(&err));
            }
        }),
        Err(err) => {
            report_rejected_start(describe_js(&err));
        }
    }
}

fn element<T: JsCast>(document: &Document, id: &str) -> Result<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| Error::MissingElement(format!("#{id}")))?
        .dyn_into::<T>()
        .map_err(|_| Error::MissingElement(format!("#{id} has an unexpected element type")))
}

fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T> {
    document
        .create_element(tag)
        .map_err(js_err("create element"))?
        .dyn_into::<T>()
        .map_err(|_| Error::surface(format!("<{tag}> has an unexpected element type")))
}

fn js_err(context: &'static str) -> impl Fn(JsValue) -> Error {
    move |value| Error::surface(format!("{context}: {}", describe_js(&value)))
}
