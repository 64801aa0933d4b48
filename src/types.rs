// Strong typing over raw floats. Newtypes for progress and viewport, handles for rendered elements.

use serde::{Deserialize, Serialize};

use crate::error::{SpotlightError, SpotlightResult};

/// Normalized scroll progress through the pinned sequence (0.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Progress(f64);

impl Progress {
    pub const START: Progress = Progress(0.0);
    pub const END: Progress = Progress(1.0);

    /// Clamps into `[0, 1]`. NaN maps to the start.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Progress::START;
        }
        Progress(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Current viewport size in CSS pixels. Queried fresh every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }

    /// A hidden tab reports a zero-sized viewport; nothing can be laid out against it.
    pub fn is_renderable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn mid_y(&self) -> f64 {
        self.height / 2.0
    }
}

/// A rendered element the engine writes styles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index")]
pub enum Element {
    /// One of the two intro headlines (0 slides left, 1 slides right).
    Headline(usize),
    /// The scaled card holding the spotlight image.
    BackgroundLayer,
    /// The spotlight image inside the card.
    BackgroundImage,
    Header,
    MaskTop,
    MaskBottom,
    /// The vertical column of captions.
    CaptionStack,
    Item(usize),
    Caption(usize),
}

/// Partial style update. Unset fields are left as they are on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct StylePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl StylePatch {
    pub fn opacity(opacity: f64) -> Self {
        StylePatch {
            opacity: Some(opacity),
            ..Default::default()
        }
    }

    pub fn scale(scale: f64) -> Self {
        StylePatch {
            scale: Some(scale),
            ..Default::default()
        }
    }

    pub fn translate_y(y: f64) -> Self {
        StylePatch {
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn with_x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }
}

/// One style write against one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementWrite {
    pub element: Element,
    pub style: StylePatch,
}

impl ElementWrite {
    pub fn new(element: Element, style: StylePatch) -> Self {
        ElementWrite { element, style }
    }
}

/// Engine configuration passed from JS.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SpotlightConfig {
    #[serde(default)]
    pub schedule: ScheduleSettings,
    #[serde(default)]
    pub arc: ArcSettings,
    #[serde(default)]
    pub driver: DriverSettings,
    #[serde(default)]
    pub tracker: TrackerSettings,
    /// Hero images configured for the site. The first one sits behind the sequence.
    #[serde(default)]
    pub hero_images: Vec<String>,
}

impl SpotlightConfig {
    pub fn validate(&self) -> SpotlightResult<()> {
        let s = &self.schedule;
        require_positive("schedule.speed", s.speed)?;
        require_non_negative("schedule.gap", s.gap)?;
        require_non_negative("schedule.item_width", s.item_width)?;
        require_non_negative("schedule.item_height", s.item_height)?;

        let a = &self.arc;
        if !a.radius.is_finite() {
            return Err(SpotlightError::InvalidConfig(format!(
                "arc.radius must be finite, got {}",
                a.radius
            )));
        }
        require_positive("arc.container_ratio", a.container_ratio)?;
        require_non_negative("arc.start_inset", a.start_inset)?;
        require_non_negative("arc.overshoot", a.overshoot)?;

        require_non_negative("driver.smoothing_secs", self.driver.smoothing_secs)?;
        require_positive("driver.extent_multiplier", self.driver.extent_multiplier)?;

        if !(0.0..=1.0).contains(&self.tracker.dim_opacity) {
            return Err(SpotlightError::InvalidConfig(format!(
                "tracker.dim_opacity must be within [0, 1], got {}",
                self.tracker.dim_opacity
            )));
        }
        require_non_negative("tracker.fade_secs", self.tracker.fade_secs)?;
        Ok(())
    }
}

fn require_positive(name: &str, value: f64) -> SpotlightResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SpotlightError::InvalidConfig(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

fn require_non_negative(name: &str, value: f64) -> SpotlightResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SpotlightError::InvalidConfig(format!(
            "{name} must be finite and non-negative, got {value}"
        )))
    }
}

/// Staggering of gallery items along the arc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSettings {
    /// Offset between consecutive item windows (switch-progress units).
    #[serde(default = "default_gap")]
    pub gap: f64,
    /// Width of each item window (switch-progress units).
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Fixed render size of an item card; half of it centers the card on the arc.
    #[serde(default = "default_item_width")]
    pub item_width: f64,
    #[serde(default = "default_item_height")]
    pub item_height: f64,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        ScheduleSettings {
            gap: default_gap(),
            speed: default_speed(),
            item_width: default_item_width(),
            item_height: default_item_height(),
        }
    }
}

fn default_gap() -> f64 {
    0.08
}

fn default_speed() -> f64 {
    0.30
}

fn default_item_width() -> f64 {
    200.0
}

fn default_item_height() -> f64 {
    150.0
}

/// Geometry of the arc, relative to the viewport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArcSettings {
    /// Horizontal bulge of the control point (px).
    #[serde(default = "default_arc_radius")]
    pub radius: f64,
    /// Share of the viewport width taken by the caption column.
    #[serde(default = "default_container_ratio")]
    pub container_ratio: f64,
    /// Distance of the arc start from the column's right edge (px).
    #[serde(default = "default_start_inset")]
    pub start_inset: f64,
    /// How far above / below the viewport the arc starts and ends (px).
    #[serde(default = "default_overshoot")]
    pub overshoot: f64,
}

impl Default for ArcSettings {
    fn default() -> Self {
        ArcSettings {
            radius: default_arc_radius(),
            container_ratio: default_container_ratio(),
            start_inset: default_start_inset(),
            overshoot: default_overshoot(),
        }
    }
}

fn default_arc_radius() -> f64 {
    500.0
}

fn default_container_ratio() -> f64 {
    0.3
}

fn default_start_inset() -> f64 {
    220.0
}

fn default_overshoot() -> f64 {
    200.0
}

/// Scroll smoothing and pin extent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverSettings {
    /// Time for the smoothed offset to reach a new target (seconds). 0 disables smoothing.
    #[serde(default = "default_smoothing_secs")]
    pub smoothing_secs: f64,
    /// Scrollable extent while pinned, in viewport heights.
    #[serde(default = "default_extent_multiplier")]
    pub extent_multiplier: f64,
}

impl Default for DriverSettings {
    fn default() -> Self {
        DriverSettings {
            smoothing_secs: default_smoothing_secs(),
            extent_multiplier: default_extent_multiplier(),
        }
    }
}

fn default_smoothing_secs() -> f64 {
    1.2
}

fn default_extent_multiplier() -> f64 {
    10.0
}

/// Caption highlight behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerSettings {
    /// Opacity of inactive captions.
    #[serde(default = "default_dim_opacity")]
    pub dim_opacity: f64,
    /// Duration of the dim/highlight transition (seconds).
    #[serde(default = "default_fade_secs")]
    pub fade_secs: f64,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        TrackerSettings {
            dim_opacity: default_dim_opacity(),
            fade_secs: default_fade_secs(),
        }
    }
}

fn default_dim_opacity() -> f64 {
    0.25
}

fn default_fade_secs() -> f64 {
    0.2
}
