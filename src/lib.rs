// spotlight_core: Rust/WASM engine for the gallery spotlight sequence.
// All choreography lives here; the page only forwards input and replays surface commands.

mod arc;
mod catalog;
mod driver;
mod error;
mod frame;
mod phase;
mod schedule;
mod session;
mod surface;
mod tracker;
mod types;

use wasm_bindgen::prelude::*;

pub use arc::ArcPath;
pub use catalog::{
    hero_image, items_from_records, parse_records, with_placeholder, GalleryItem, GalleryRecord,
    DEFAULT_CAPTION, FALLBACK_HERO_IMAGE, PLACEHOLDER_CAPTION, PLACEHOLDER_IMAGE,
};
pub use driver::{DriverSample, ProgressDriver, ScrollSmoother};
pub use error::{SpotlightError, SpotlightResult};
pub use frame::{Frame, FrameComposer};
pub use phase::{Phase, INTRO_END, SCROLL_END, SCROLL_START};
pub use schedule::{ItemPlacement, ItemScheduler, ItemWindow, WindowState};
pub use session::{Session, TickReport};
pub use surface::{BatchSurface, RenderSurface, SurfaceCommand};
pub use tracker::{nearest_caption, ActiveChange, ActiveItemTracker, CaptionBox, CaptionFade};
pub use types::*;

use serde::Serialize;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Build the item list from the data service's gallery JSON. A collection that
/// fails to parse degrades to the placeholder item like an empty one.
pub fn items_from_json(records_json: &str) -> Vec<GalleryItem> {
    let items = match parse_records(records_json) {
        Ok(records) => items_from_records(&records),
        Err(err) => {
            tracing::warn!(%err, "gallery collection is malformed");
            Vec::new()
        }
    };
    with_placeholder(items)
}

/// What one JS tick gets back: the surface commands to replay plus the frame summary.
#[derive(Debug, Serialize)]
struct TickOutput<'a> {
    progress: f64,
    phase: Option<Phase>,
    active_index: usize,
    commands: &'a [SurfaceCommand],
}

/// Main engine interface exposed to JavaScript.
/// Batch interface to minimize JS↔WASM crossings: measurements in, commands out.
#[wasm_bindgen]
pub struct SpotlightEngine {
    session: Session<BatchSurface>,
}

#[wasm_bindgen]
impl SpotlightEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, gallery_json: &str) -> Result<SpotlightEngine, JsValue> {
        let config: SpotlightConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;
        let items = items_from_json(gallery_json);

        let session = Session::new(config, items, BatchSurface::default())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(SpotlightEngine { session })
    }

    /// Pin the container and return the initial commands as JSON.
    pub fn start(&mut self, width: f64, height: f64) -> Result<String, JsValue> {
        self.session
            .surface_mut()
            .set_viewport(Viewport::new(width, height));
        self.session.start();
        self.flush(None)
    }

    /// Unpin and return the release commands as JSON.
    pub fn stop(&mut self) -> Result<String, JsValue> {
        self.session.stop();
        self.flush(None)
    }

    /// Queue a wheel/touch delta in pixels. Returns whether the engine consumed it.
    pub fn scroll_by(&mut self, delta: f64) -> bool {
        self.session.scroll_by(delta)
    }

    /// Queue an absolute position in pixels within the pinned extent.
    pub fn scroll_to(&mut self, offset: f64) -> bool {
        self.session.scroll_to(offset)
    }

    /// Advance one animation frame.
    /// `caption_boxes_json` is an array of `{ top, height }` in caption order.
    /// Returns JSON with `{ progress, phase, active_index, commands }`.
    pub fn tick(
        &mut self,
        dt_ms: f64,
        width: f64,
        height: f64,
        stack_height: f64,
        caption_boxes_json: &str,
    ) -> Result<String, JsValue> {
        let boxes: Vec<CaptionBox> = serde_json::from_str(caption_boxes_json)
            .map_err(|e| JsValue::from_str(&SpotlightError::InvalidCaptions(e.to_string()).to_string()))?;

        let surface = self.session.surface_mut();
        surface.set_viewport(Viewport::new(width, height));
        surface.set_stack_height(stack_height);
        surface.set_caption_boxes(boxes);

        let report = self
            .session
            .tick(dt_ms / 1000.0)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.flush(report.map(|r| r.frame.phase))
    }

    /// Frame for an explicit progress value, without advancing the session.
    /// Returns `null` JSON for a zero-sized viewport.
    pub fn frame_at(
        &self,
        progress: f64,
        width: f64,
        height: f64,
        stack_height: f64,
    ) -> Result<String, JsValue> {
        let frame = self.session.frame_at(
            Progress::new(progress),
            Viewport::new(width, height),
            stack_height,
        );
        serde_json::to_string(&frame)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    pub fn progress(&self) -> f64 {
        self.session.progress().value()
    }

    pub fn active_index(&self) -> usize {
        self.session.active_index()
    }

    pub fn hero_image(&self) -> String {
        self.session.hero_image().to_string()
    }

    /// Items actually in play (after placeholder substitution) as JSON.
    pub fn items_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.items())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}

impl SpotlightEngine {
    fn flush(&mut self, phase: Option<Phase>) -> Result<String, JsValue> {
        let progress = self.session.progress().value();
        let active_index = self.session.active_index();
        let commands = self.session.surface_mut().drain();
        let output = TickOutput {
            progress,
            phase,
            active_index,
            commands: &commands,
        };
        serde_json::to_string(&output)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_creation_works() {
        let engine = SpotlightEngine::new("{}", "[]");
        assert!(engine.is_ok());
    }

    #[test]
    fn malformed_gallery_degrades_to_placeholder() {
        let items = items_from_json("{\"not\": \"a list\"}");
        assert_eq!(items, vec![GalleryItem::placeholder()]);
    }

    #[test]
    fn null_url_row_keeps_the_rest_of_the_gallery() {
        let items = items_from_json(
            r#"[{"id":"1","url":"https://picsum.photos/800/600?random=20","caption":"Beautiful Sunset"},
                {"id":"2","url":null,"caption":"Broken upload"}]"#,
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].caption, "Beautiful Sunset");
    }

    #[test]
    fn start_tick_stop_round_trip() {
        let config = r#"{"driver":{"smoothing_secs":0.0}}"#;
        let gallery = r#"[{"id":"1","url":"https://img/1.jpg","caption":"Beautiful Sunset"}]"#;
        let mut engine = SpotlightEngine::new(config, gallery).unwrap();

        let started: serde_json::Value =
            serde_json::from_str(&engine.start(1000.0, 800.0).unwrap()).unwrap();
        assert_eq!(started["commands"][0]["op"], "Pin");
        assert_eq!(started["commands"][0]["extent"], 8000.0);

        assert!(engine.scroll_by(4000.0));
        let ticked: serde_json::Value = serde_json::from_str(
            &engine
                .tick(16.0, 1000.0, 800.0, 400.0, r#"[{"top":380.0,"height":40.0}]"#)
                .unwrap(),
        )
        .unwrap();
        assert_eq!(ticked["phase"], "Scroll");
        assert_eq!(ticked["progress"], 0.5);
        assert!(!ticked["commands"].as_array().unwrap().is_empty());

        let stopped: serde_json::Value =
            serde_json::from_str(&engine.stop().unwrap()).unwrap();
        assert_eq!(stopped["commands"][0]["op"], "Unpin");
    }

    #[test]
    fn frame_at_is_null_for_hidden_viewport() {
        let engine = SpotlightEngine::new("{}", "[]").unwrap();
        assert_eq!(engine.frame_at(0.5, 0.0, 0.0, 0.0).unwrap(), "null");
    }
}
