// Pure progress -> frame composition. Everything visible is a function of progress and
// the current viewport; the only stateful piece (active caption) lives in the tracker.

use serde::{Deserialize, Serialize};

use crate::arc::ArcPath;
use crate::phase::Phase;
use crate::schedule::ItemScheduler;
use crate::types::{ArcSettings, Element, ElementWrite, Progress, ScheduleSettings, StylePatch, Viewport};

/// Every style write needed to render one progress value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub progress: Progress,
    pub phase: Phase,
    /// Renormalized scroll-phase progress, present only in the scroll phase.
    pub switch_progress: Option<f64>,
    pub writes: Vec<ElementWrite>,
}

impl Frame {
    /// Last style written to `element` in this frame.
    pub fn style_of(&self, element: Element) -> Option<StylePatch> {
        self.writes
            .iter()
            .rev()
            .find(|w| w.element == element)
            .map(|w| w.style)
    }
}

pub struct FrameComposer {
    scheduler: ItemScheduler,
    arc_settings: ArcSettings,
}

impl FrameComposer {
    pub fn new(schedule: ScheduleSettings, arc_settings: ArcSettings) -> Self {
        FrameComposer {
            scheduler: ItemScheduler::new(schedule),
            arc_settings,
        }
    }

    /// Compose the frame for `progress`. `stack_height` is the caption column's
    /// scroll height as currently measured. Returns `None` for a zero viewport.
    pub fn compose(
        &self,
        progress: Progress,
        viewport: Viewport,
        item_count: usize,
        stack_height: f64,
    ) -> Option<Frame> {
        if !viewport.is_renderable() {
            return None;
        }

        let phase = Phase::classify(progress);
        let mut writes = Vec::with_capacity(item_count + 12);
        phase.chrome_writes(progress, viewport, item_count, &mut writes);

        let switch_progress = ItemScheduler::switch_progress(progress);
        if let Some(sp) = switch_progress {
            let stack_height = if stack_height.is_finite() { stack_height.max(0.0) } else { 0.0 };
            let y = self.scheduler.caption_stack_y(sp, viewport.height, stack_height);
            writes.push(ElementWrite::new(Element::CaptionStack, StylePatch::translate_y(y)));

            let arc = ArcPath::for_viewport(viewport, &self.arc_settings);
            for placement in self.scheduler.place_all(item_count, sp, &arc) {
                let mut style = StylePatch::opacity(placement.opacity);
                if let Some(position) = placement.position {
                    style = style.with_x(position.x).with_y(position.y);
                }
                writes.push(ElementWrite::new(Element::Item(placement.index), style));
            }
        }

        Some(Frame {
            progress,
            phase,
            switch_progress,
            writes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composer() -> FrameComposer {
        FrameComposer::new(ScheduleSettings::default(), ArcSettings::default())
    }

    const VIEWPORT: Viewport = Viewport {
        width: 1000.0,
        height: 800.0,
    };

    #[test]
    fn zero_viewport_yields_no_frame() {
        let frame = composer().compose(Progress::new(0.5), Viewport::new(0.0, 0.0), 6, 900.0);
        assert!(frame.is_none());
    }

    #[test]
    fn intro_frame_has_no_switch_progress() {
        let frame = composer().compose(Progress::new(0.1), VIEWPORT, 6, 900.0).unwrap();
        assert_eq!(frame.phase, Phase::Intro);
        assert_eq!(frame.switch_progress, None);
        assert_eq!(frame.style_of(Element::CaptionStack), None);
    }

    #[test]
    fn scroll_frame_moves_captions_and_items() {
        let frame = composer().compose(Progress::new(0.6), VIEWPORT, 6, 1200.0).unwrap();
        assert_eq!(frame.phase, Phase::Scroll);
        let y = frame.style_of(Element::CaptionStack).unwrap().y.unwrap();
        // switch progress 0.5: 800 - 0.5 * 2000
        assert!((y + 200.0).abs() < 1e-6);

        // Windows 3 (0.24..0.54), 4 (0.32..0.62) and 5 (0.40..0.70) contain 0.5.
        for index in 0..3 {
            assert_eq!(frame.style_of(Element::Item(index)).unwrap().opacity, Some(0.0));
        }
        for index in 3..6 {
            let style = frame.style_of(Element::Item(index)).unwrap();
            assert_eq!(style.opacity, Some(1.0));
            assert!(style.x.is_some() && style.y.is_some());
        }
    }

    #[test]
    fn exit_frame_leaves_items_alone() {
        let frame = composer().compose(Progress::new(0.97), VIEWPORT, 6, 1200.0).unwrap();
        assert_eq!(frame.phase, Phase::Exit);
        assert!(frame.style_of(Element::Item(0)).is_none());
        assert_eq!(frame.style_of(Element::Header).unwrap().opacity, Some(0.0));
    }

    #[test]
    fn same_progress_same_frame() {
        let c = composer();
        let first = c.compose(Progress::new(0.42), VIEWPORT, 6, 1200.0);
        let _elsewhere = c.compose(Progress::new(0.1), VIEWPORT, 6, 1200.0);
        let again = c.compose(Progress::new(0.42), VIEWPORT, 6, 1200.0);
        assert_eq!(first, again);
    }
}
