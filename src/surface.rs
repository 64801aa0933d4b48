// Rendering surface seam. The engine measures and writes through this trait only;
// the browser adapter (or a test) supplies the implementation.

use serde::{Deserialize, Serialize};

use crate::tracker::{CaptionBox, CaptionFade};
use crate::types::{ElementWrite, Viewport};

pub trait RenderSurface {
    /// Current viewport size. Queried on every tick.
    fn viewport(&self) -> Viewport;

    /// Bounding boxes of the rendered captions, in index order.
    /// Empty while the captions are not mounted.
    fn caption_boxes(&self) -> Vec<CaptionBox>;

    /// Full scroll height of the caption column.
    fn caption_stack_height(&self) -> f64;

    fn apply(&mut self, write: &ElementWrite);

    fn fade_caption(&mut self, fade: &CaptionFade);

    fn set_spotlight_image(&mut self, url: &str);

    /// Lock the container for `extent` pixels of scrolling and suppress page scroll.
    /// Called again with the new extent after a resize.
    fn pin(&mut self, extent: f64);

    /// Release the pin and restore page scroll.
    fn unpin(&mut self);
}

impl<T: RenderSurface + ?Sized> RenderSurface for &mut T {
    fn viewport(&self) -> Viewport {
        (**self).viewport()
    }

    fn caption_boxes(&self) -> Vec<CaptionBox> {
        (**self).caption_boxes()
    }

    fn caption_stack_height(&self) -> f64 {
        (**self).caption_stack_height()
    }

    fn apply(&mut self, write: &ElementWrite) {
        (**self).apply(write)
    }

    fn fade_caption(&mut self, fade: &CaptionFade) {
        (**self).fade_caption(fade)
    }

    fn set_spotlight_image(&mut self, url: &str) {
        (**self).set_spotlight_image(url)
    }

    fn pin(&mut self, extent: f64) {
        (**self).pin(extent)
    }

    fn unpin(&mut self) {
        (**self).unpin()
    }
}

/// A recorded surface operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum SurfaceCommand {
    Write(ElementWrite),
    Fade(CaptionFade),
    Spotlight { url: String },
    Pin { extent: f64 },
    Unpin,
}

/// Surface that records commands for a remote renderer to replay.
/// Measurements are fed in before each tick.
#[derive(Debug, Clone, Default)]
pub struct BatchSurface {
    viewport: Viewport,
    caption_boxes: Vec<CaptionBox>,
    stack_height: f64,
    commands: Vec<SurfaceCommand>,
}

impl BatchSurface {
    pub fn new(viewport: Viewport) -> Self {
        BatchSurface {
            viewport,
            ..Default::default()
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_caption_boxes(&mut self, boxes: Vec<CaptionBox>) {
        self.caption_boxes = boxes;
    }

    pub fn set_stack_height(&mut self, height: f64) {
        self.stack_height = height;
    }

    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    /// Take every command recorded since the last drain.
    pub fn drain(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl RenderSurface for BatchSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn caption_boxes(&self) -> Vec<CaptionBox> {
        self.caption_boxes.clone()
    }

    fn caption_stack_height(&self) -> f64 {
        self.stack_height
    }

    fn apply(&mut self, write: &ElementWrite) {
        self.commands.push(SurfaceCommand::Write(*write));
    }

    fn fade_caption(&mut self, fade: &CaptionFade) {
        self.commands.push(SurfaceCommand::Fade(*fade));
    }

    fn set_spotlight_image(&mut self, url: &str) {
        self.commands.push(SurfaceCommand::Spotlight {
            url: url.to_string(),
        });
    }

    fn pin(&mut self, extent: f64) {
        self.commands.push(SurfaceCommand::Pin { extent });
    }

    fn unpin(&mut self) {
        self.commands.push(SurfaceCommand::Unpin);
    }
}
