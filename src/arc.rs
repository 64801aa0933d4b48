// Quadratic Bézier arc that gallery items travel along during the scroll phase.
// Control points are derived from the viewport at every frame so the arc follows resizes.

use kurbo::{ParamCurve, Point, QuadBez};

use crate::types::{ArcSettings, Viewport};

/// The arc for one viewport geometry. Pure: same inputs, same points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcPath {
    curve: QuadBez,
}

impl ArcPath {
    pub fn new(start: Point, control: Point, end: Point) -> Self {
        ArcPath {
            curve: QuadBez::new(start, control, end),
        }
    }

    /// Start above the viewport just inside the caption column, bulge right by
    /// `radius` at mid-height, and come back to the same x below the viewport.
    pub fn for_viewport(viewport: Viewport, settings: &ArcSettings) -> Self {
        let container_width = viewport.width * settings.container_ratio;
        let start = Point::new(container_width - settings.start_inset, -settings.overshoot);
        let control = Point::new(start.x + settings.radius, viewport.height / 2.0);
        let end = Point::new(start.x, viewport.height + settings.overshoot);
        ArcPath::new(start, control, end)
    }

    /// Point at local progress `p`. Endpoints are exact at 0 and 1.
    pub fn point_at(&self, p: f64) -> Point {
        self.curve.eval(p)
    }

    pub fn start(&self) -> Point {
        self.curve.p0
    }

    pub fn control(&self) -> Point {
        self.curve.p1
    }

    pub fn end(&self) -> Point {
        self.curve.p2
    }
}
