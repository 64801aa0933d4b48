// Active caption tracking. The caption whose center sits closest to mid-viewport is the
// active one; a change dims the old caption, highlights the new one and swaps the spotlight.

use serde::{Deserialize, Serialize};

use crate::catalog::GalleryItem;
use crate::types::{TrackerSettings, Viewport};

/// Vertical extent of a rendered caption, as reported by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptionBox {
    pub top: f64,
    pub height: f64,
}

impl CaptionBox {
    pub fn new(top: f64, height: f64) -> Self {
        CaptionBox { top, height }
    }

    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Index of the caption closest to `mid_y`. Ties go to the lower index;
/// boxes with non-finite geometry are ignored.
pub fn nearest_caption(boxes: &[CaptionBox], mid_y: f64) -> Option<usize> {
    let mut closest: Option<(usize, f64)> = None;
    for (index, caption) in boxes.iter().enumerate() {
        let distance = (caption.center_y() - mid_y).abs();
        if !distance.is_finite() {
            continue;
        }
        match closest {
            Some((_, best)) if distance >= best => {}
            _ => closest = Some((index, distance)),
        }
    }
    closest.map(|(index, _)| index)
}

/// Opacity transition for one caption.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptionFade {
    pub index: usize,
    pub opacity: f64,
    pub duration_secs: f64,
}

/// Emitted when the active caption changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveChange {
    pub previous: usize,
    pub current: usize,
    /// Image the spotlight switches to.
    pub image_url: String,
    pub fades: Vec<CaptionFade>,
}

pub struct ActiveItemTracker {
    settings: TrackerSettings,
    active: usize,
}

impl ActiveItemTracker {
    pub fn new(settings: TrackerSettings) -> Self {
        ActiveItemTracker {
            settings,
            active: 0,
        }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn reset(&mut self) {
        self.active = 0;
    }

    /// Caption opacities at session start: the first caption lit, the rest dimmed.
    pub fn initial_fades(&self, caption_count: usize) -> Vec<CaptionFade> {
        (0..caption_count)
            .map(|index| CaptionFade {
                index,
                opacity: if index == self.active {
                    1.0
                } else {
                    self.settings.dim_opacity
                },
                duration_secs: 0.0,
            })
            .collect()
    }

    /// Re-evaluate the active caption. Returns a change only when the index moved.
    /// An empty `boxes` slice means the captions are not mounted yet.
    pub fn update(
        &mut self,
        boxes: &[CaptionBox],
        viewport: Viewport,
        items: &[GalleryItem],
    ) -> Option<ActiveChange> {
        let closest = nearest_caption(boxes, viewport.mid_y())?;
        if closest == self.active {
            return None;
        }
        let item = items.get(closest)?;

        let previous = self.active;
        self.active = closest;
        tracing::debug!(previous, current = closest, "active caption changed");

        Some(ActiveChange {
            previous,
            current: closest,
            image_url: item.image_url.clone(),
            fades: vec![
                CaptionFade {
                    index: previous,
                    opacity: self.settings.dim_opacity,
                    duration_secs: self.settings.fade_secs,
                },
                CaptionFade {
                    index: closest,
                    opacity: 1.0,
                    duration_secs: self.settings.fade_secs,
                },
            ],
        })
    }
}
