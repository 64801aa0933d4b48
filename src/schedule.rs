// Item scheduling: staggered time windows inside the scroll phase.
// Each item flies along the shared arc during its own window; windows overlap so items cascade.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::arc::ArcPath;
use crate::phase::{SCROLL_END, SCROLL_START};
use crate::types::{Progress, ScheduleSettings};

/// An item's window in switch-progress units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemWindow {
    pub start: f64,
    pub end: f64,
}

impl ItemWindow {
    /// Where `switch_progress` falls relative to this window.
    pub fn state(&self, switch_progress: f64) -> WindowState {
        if switch_progress < self.start {
            WindowState::Pending
        } else if switch_progress > self.end {
            WindowState::Exited
        } else {
            let width = self.end - self.start;
            WindowState::Active((switch_progress - self.start) / width)
        }
    }
}

/// Item lifecycle within the scroll phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WindowState {
    /// Window not reached yet.
    Pending,
    /// Inside the window, with local progress in `[0, 1]`.
    Active(f64),
    /// Window already passed.
    Exited,
}

/// Where one item is drawn for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemPlacement {
    pub index: usize,
    pub opacity: f64,
    /// Top-left corner of the card. `None` leaves the last position in place.
    pub position: Option<Point>,
}

pub struct ItemScheduler {
    settings: ScheduleSettings,
}

impl ItemScheduler {
    pub fn new(settings: ScheduleSettings) -> Self {
        ItemScheduler { settings }
    }

    /// Scroll-phase progress renormalized to `[0, 1]`. `None` outside the scroll phase.
    pub fn switch_progress(progress: Progress) -> Option<f64> {
        let p = progress.value();
        if p > SCROLL_START && p <= SCROLL_END {
            Some((p - SCROLL_START) / (SCROLL_END - SCROLL_START))
        } else {
            None
        }
    }

    pub fn window(&self, index: usize) -> ItemWindow {
        let start = index as f64 * self.settings.gap;
        ItemWindow {
            start,
            end: start + self.settings.speed,
        }
    }

    /// Vertical offset of the caption stack: from just below the viewport
    /// (`viewport_height`) up to fully above it (`-stack_height`).
    pub fn caption_stack_y(&self, switch_progress: f64, viewport_height: f64, stack_height: f64) -> f64 {
        let start = viewport_height;
        let target = -stack_height;
        start - switch_progress * (start - target)
    }

    pub fn place(&self, index: usize, switch_progress: f64, arc: &ArcPath) -> ItemPlacement {
        match self.window(index).state(switch_progress) {
            WindowState::Pending | WindowState::Exited => ItemPlacement {
                index,
                opacity: 0.0,
                position: None,
            },
            WindowState::Active(p) => {
                let center = arc.point_at(p);
                ItemPlacement {
                    index,
                    opacity: 1.0,
                    position: Some(Point::new(
                        center.x - self.settings.item_width / 2.0,
                        center.y - self.settings.item_height / 2.0,
                    )),
                }
            }
        }
    }

    pub fn place_all(&self, count: usize, switch_progress: f64, arc: &ArcPath) -> Vec<ItemPlacement> {
        (0..count)
            .map(|index| self.place(index, switch_progress, arc))
            .collect()
    }
}
