// Phase classification. Progress is partitioned into four fixed ranges, each with its own
// visibility rules for the headlines, the spotlight card, the header and the mask edges.

use serde::{Deserialize, Serialize};

use crate::types::{Element, ElementWrite, Progress, StylePatch, Viewport};

/// Upper bound (inclusive) of the intro phase.
pub const INTRO_END: f64 = 0.20;
/// Upper bound (inclusive) of the transition phase; the scroll phase starts above it.
pub const SCROLL_START: f64 = 0.25;
/// Upper bound (inclusive) of the scroll phase.
pub const SCROLL_END: f64 = 0.95;

/// Headlines slide apart by this share of the viewport width over the intro.
const HEADLINE_TRAVEL: f64 = 0.6;
/// Spotlight image zoom at the very start of the intro.
const INTRO_IMAGE_ZOOM: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// `[0, 0.20]`: headlines slide apart, the spotlight card grows.
    Intro,
    /// `(0.20, 0.25]`: card settles at full size, chrome appears.
    Transition,
    /// `(0.25, 0.95]`: items travel the arc, captions scroll past.
    Scroll,
    /// `(0.95, 1]`: chrome fades, items keep their last state.
    Exit,
}

impl Phase {
    pub fn classify(progress: Progress) -> Phase {
        let p = progress.value();
        if p <= INTRO_END {
            Phase::Intro
        } else if p <= SCROLL_START {
            Phase::Transition
        } else if p <= SCROLL_END {
            Phase::Scroll
        } else {
            Phase::Exit
        }
    }

    /// Header and mask edges are shown between the intro and the exit.
    pub fn shows_chrome(self) -> bool {
        matches!(self, Phase::Transition | Phase::Scroll)
    }

    /// Writes owned by the phase itself. Item placement and the caption stack
    /// are added by the frame composer during the scroll phase.
    pub fn chrome_writes(
        self,
        progress: Progress,
        viewport: Viewport,
        item_count: usize,
        out: &mut Vec<ElementWrite>,
    ) {
        match self {
            Phase::Intro => {
                let t = progress.value() / INTRO_END;
                let travel = t * HEADLINE_TRAVEL * viewport.width;
                out.push(ElementWrite::new(
                    Element::Headline(0),
                    StylePatch::opacity(1.0).with_x(-travel),
                ));
                out.push(ElementWrite::new(
                    Element::Headline(1),
                    StylePatch::opacity(1.0).with_x(travel),
                ));
                out.push(ElementWrite::new(Element::BackgroundLayer, StylePatch::scale(t)));
                out.push(ElementWrite::new(
                    Element::BackgroundImage,
                    StylePatch::scale(INTRO_IMAGE_ZOOM - t * (INTRO_IMAGE_ZOOM - 1.0)),
                ));
                hide_items(item_count, out);
            }
            Phase::Transition => {
                settle_background(out);
                hide_headlines(out);
                hide_items(item_count, out);
            }
            Phase::Scroll => {
                settle_background(out);
                hide_headlines(out);
            }
            Phase::Exit => {}
        }

        let chrome = if self.shows_chrome() { 1.0 } else { 0.0 };
        for element in [Element::Header, Element::MaskTop, Element::MaskBottom] {
            out.push(ElementWrite::new(element, StylePatch::opacity(chrome)));
        }
    }
}

fn settle_background(out: &mut Vec<ElementWrite>) {
    out.push(ElementWrite::new(Element::BackgroundLayer, StylePatch::scale(1.0)));
    out.push(ElementWrite::new(Element::BackgroundImage, StylePatch::scale(1.0)));
}

fn hide_headlines(out: &mut Vec<ElementWrite>) {
    for index in 0..2 {
        out.push(ElementWrite::new(Element::Headline(index), StylePatch::opacity(0.0)));
    }
}

fn hide_items(count: usize, out: &mut Vec<ElementWrite>) {
    for index in 0..count {
        out.push(ElementWrite::new(Element::Item(index), StylePatch::opacity(0.0)));
    }
}
