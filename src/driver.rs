// Progress driver: smoothed scroll offset inside the pinned container, mapped to progress.
// Rule: extent and geometry come from the viewport of the current tick, never from session start.

use crate::surface::RenderSurface;
use crate::types::{DriverSettings, Progress, Viewport};

/// Exponential-out tween from the rendered offset toward the latest target.
/// A new target restarts the tween from wherever the offset currently is,
/// so lag never exceeds `duration_secs`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollSmoother {
    duration_secs: f64,
    from: f64,
    to: f64,
    current: f64,
    elapsed_secs: f64,
}

impl ScrollSmoother {
    pub fn new(duration_secs: f64) -> Self {
        ScrollSmoother {
            duration_secs: duration_secs.max(0.0),
            from: 0.0,
            to: 0.0,
            current: 0.0,
            elapsed_secs: 0.0,
        }
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.to
    }

    pub fn retarget(&mut self, target: f64) {
        if target == self.to {
            return;
        }
        self.from = self.current;
        self.to = target;
        self.elapsed_secs = 0.0;
    }

    /// Advance by `dt_secs` and return the new offset.
    pub fn advance(&mut self, dt_secs: f64) -> f64 {
        if self.is_settled() {
            return self.current;
        }
        self.elapsed_secs += dt_secs.max(0.0);
        if self.duration_secs <= 0.0 || self.elapsed_secs >= self.duration_secs {
            self.current = self.to;
        } else {
            let eased = ease_out_expo(self.elapsed_secs / self.duration_secs);
            self.current = self.from + (self.to - self.from) * eased;
        }
        self.current
    }

    /// Scale every offset, used when the extent changes under a resize.
    pub fn rescale(&mut self, factor: f64) {
        self.from *= factor;
        self.to *= factor;
        self.current *= factor;
    }

    pub fn reset(&mut self) {
        *self = ScrollSmoother::new(self.duration_secs);
    }
}

fn ease_out_expo(t: f64) -> f64 {
    (1.001 - 2.0_f64.powf(-10.0 * t)).min(1.0)
}

/// One driver sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverSample {
    pub progress: Progress,
    pub extent: f64,
    /// The extent differs from the previous tick's.
    pub resized: bool,
}

pub struct ProgressDriver {
    settings: DriverSettings,
    smoother: ScrollSmoother,
    /// Latest requested offset; deltas between ticks coalesce here.
    target: f64,
    extent: f64,
    pinned: bool,
}

impl ProgressDriver {
    pub fn new(settings: DriverSettings) -> Self {
        let smoother = ScrollSmoother::new(settings.smoothing_secs);
        ProgressDriver {
            settings,
            smoother,
            target: 0.0,
            extent: 0.0,
            pinned: false,
        }
    }

    pub fn extent_for(&self, viewport: Viewport) -> f64 {
        if viewport.is_renderable() {
            viewport.height * self.settings.extent_multiplier
        } else {
            0.0
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn extent(&self) -> f64 {
        self.extent
    }

    /// Rendered (smoothed) offset within the extent.
    pub fn offset(&self) -> f64 {
        self.smoother.current()
    }

    /// Lock the container in place for the current extent. No-op if already pinned.
    pub fn pin<S: RenderSurface>(&mut self, surface: &mut S) {
        if self.pinned {
            return;
        }
        self.extent = self.extent_for(surface.viewport());
        surface.pin(self.extent);
        self.pinned = true;
        tracing::debug!(extent = self.extent, "pinned");
    }

    /// Release the pin and restore page scrolling. No-op if not pinned.
    pub fn unpin<S: RenderSurface>(&mut self, surface: &mut S) {
        if !self.pinned {
            return;
        }
        surface.unpin();
        self.pinned = false;
        tracing::debug!("unpinned");
    }

    /// Queue a relative scroll. Ignored (returns `false`) while not pinned.
    pub fn scroll_by(&mut self, delta: f64) -> bool {
        if !self.pinned || !delta.is_finite() {
            return false;
        }
        self.target += delta;
        true
    }

    /// Queue an absolute scroll position. Ignored (returns `false`) while not pinned.
    pub fn scroll_to(&mut self, offset: f64) -> bool {
        if !self.pinned || !offset.is_finite() {
            return false;
        }
        self.target = offset;
        true
    }

    /// Advance smoothing and report progress. A zero viewport makes the tick a no-op.
    pub fn tick(&mut self, dt_secs: f64, viewport: Viewport) -> Option<DriverSample> {
        let extent = self.extent_for(viewport);
        if extent <= 0.0 {
            return None;
        }

        let resized = extent != self.extent;
        if resized {
            if self.extent > 0.0 {
                let factor = extent / self.extent;
                self.target *= factor;
                self.smoother.rescale(factor);
            }
            tracing::debug!(from = self.extent, to = extent, "scroll extent changed");
            self.extent = extent;
        }

        self.target = self.target.clamp(0.0, extent);
        self.smoother.retarget(self.target);
        let offset = self.smoother.advance(dt_secs);

        Some(DriverSample {
            progress: Progress::new(offset / extent),
            extent,
            resized,
        })
    }

    /// Drop all smoothing state. The pin is left alone.
    pub fn reset(&mut self) {
        self.smoother.reset();
        self.target = 0.0;
    }
}
