// Choreography session: owns the items, the driver, the tracker and the surface for one
// pinned sequence. start() acquires the pin, stop() (or drop) releases it.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, GalleryItem};
use crate::driver::ProgressDriver;
use crate::error::{SpotlightError, SpotlightResult};
use crate::frame::{Frame, FrameComposer};
use crate::phase::Phase;
use crate::surface::RenderSurface;
use crate::tracker::{ActiveChange, ActiveItemTracker};
use crate::types::{Element, ElementWrite, Progress, SpotlightConfig, StylePatch, Viewport};

/// Result of one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub frame: Frame,
    pub active_change: Option<ActiveChange>,
}

pub struct Session<S: RenderSurface> {
    surface: S,
    items: Vec<GalleryItem>,
    hero_image: String,
    composer: FrameComposer,
    driver: ProgressDriver,
    tracker: ActiveItemTracker,
    running: bool,
    last_phase: Option<Phase>,
}

impl<S: RenderSurface> Session<S> {
    /// Build a stopped session. An empty item list is replaced by the placeholder item.
    pub fn new(config: SpotlightConfig, items: Vec<GalleryItem>, surface: S) -> SpotlightResult<Self> {
        config.validate()?;
        let hero_image = catalog::hero_image(&config.hero_images).to_string();
        Ok(Session {
            surface,
            items: catalog::with_placeholder(items),
            hero_image,
            composer: FrameComposer::new(config.schedule, config.arc),
            driver: ProgressDriver::new(config.driver),
            tracker: ActiveItemTracker::new(config.tracker),
            running: false,
            last_phase: None,
        })
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn hero_image(&self) -> &str {
        &self.hero_image
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn active_index(&self) -> usize {
        self.tracker.active()
    }

    pub fn progress(&self) -> Progress {
        let extent = self.driver.extent();
        if extent > 0.0 {
            Progress::new(self.driver.offset() / extent)
        } else {
            Progress::START
        }
    }

    /// Pin the container and install the initial state: items hidden, the first
    /// caption lit, the spotlight on the first item. No-op when already running.
    #[tracing::instrument(skip(self), fields(items = self.items.len()))]
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.tracker.reset();
        self.driver.reset();
        self.last_phase = None;
        self.driver.pin(&mut self.surface);

        for index in 0..self.items.len() {
            self.surface
                .apply(&ElementWrite::new(Element::Item(index), StylePatch::opacity(0.0)));
        }
        for fade in self.tracker.initial_fades(self.items.len()) {
            self.surface.fade_caption(&fade);
        }
        if let Some(first) = self.items.first() {
            self.surface.set_spotlight_image(&first.image_url);
        }
        self.running = true;
        tracing::debug!("session started");
    }

    /// Release the pin and drop smoothing state. No-op when not running.
    #[tracing::instrument(skip(self))]
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.driver.unpin(&mut self.surface);
        self.driver.reset();
        self.running = false;
        tracing::debug!("session stopped");
    }

    /// Queue a scroll delta. Returns whether it was consumed.
    pub fn scroll_by(&mut self, delta: f64) -> bool {
        self.running && self.driver.scroll_by(delta)
    }

    pub fn scroll_to(&mut self, offset: f64) -> bool {
        self.running && self.driver.scroll_to(offset)
    }

    /// Advance by `dt_secs` and render. `Ok(None)` when the viewport has no size.
    pub fn tick(&mut self, dt_secs: f64) -> SpotlightResult<Option<TickReport>> {
        if !self.running {
            return Err(SpotlightError::NotRunning);
        }

        let viewport = self.surface.viewport();
        let Some(sample) = self.driver.tick(dt_secs, viewport) else {
            tracing::trace!("viewport has no size, skipping tick");
            return Ok(None);
        };
        if sample.resized && self.driver.is_pinned() {
            self.surface.pin(sample.extent);
        }

        let stack_height = self.surface.caption_stack_height();
        let Some(frame) =
            self.composer
                .compose(sample.progress, viewport, self.items.len(), stack_height)
        else {
            return Ok(None);
        };
        tracing::trace!(progress = frame.progress.value(), phase = ?frame.phase, "tick");

        if self.last_phase != Some(frame.phase) {
            tracing::debug!(from = ?self.last_phase, to = ?frame.phase, "phase changed");
            self.last_phase = Some(frame.phase);
        }

        for write in &frame.writes {
            self.surface.apply(write);
        }

        let mut active_change = None;
        if frame.phase == Phase::Scroll {
            let boxes = self.surface.caption_boxes();
            if let Some(change) = self.tracker.update(&boxes, viewport, &self.items) {
                for fade in &change.fades {
                    self.surface.fade_caption(fade);
                }
                self.surface.set_spotlight_image(&change.image_url);
                active_change = Some(change);
            }
        }

        Ok(Some(TickReport {
            frame,
            active_change,
        }))
    }

    /// Frame for an arbitrary progress value and geometry, without touching session state.
    pub fn frame_at(&self, progress: Progress, viewport: Viewport, stack_height: f64) -> Option<Frame> {
        self.composer
            .compose(progress, viewport, self.items.len(), stack_height)
    }
}

impl<S: RenderSurface> Drop for Session<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{BatchSurface, SurfaceCommand};
    use crate::tracker::CaptionBox;
    use crate::types::DriverSettings;

    fn config() -> SpotlightConfig {
        SpotlightConfig {
            driver: DriverSettings {
                smoothing_secs: 0.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn items(count: usize) -> Vec<GalleryItem> {
        (0..count)
            .map(|i| GalleryItem::new(format!("Caption {i}"), format!("https://img/{i}.jpg")))
            .collect()
    }

    fn session(count: usize) -> Session<BatchSurface> {
        let surface = BatchSurface::new(Viewport::new(1000.0, 800.0));
        Session::new(config(), items(count), surface).unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = config();
        config.schedule.speed = -1.0;
        let result = Session::new(config, items(3), BatchSurface::default());
        assert!(matches!(result, Err(SpotlightError::InvalidConfig(_))));
    }

    #[test]
    fn empty_gallery_runs_with_placeholder() {
        let mut s = session(0);
        assert_eq!(s.items(), &[GalleryItem::placeholder()]);
        s.start();
        s.scroll_to(5000.0);
        assert!(s.tick(0.016).unwrap().is_some());
    }

    #[test]
    fn start_pins_and_installs_initial_state() {
        let mut s = session(3);
        s.start();
        let commands = s.surface_mut().drain();
        assert_eq!(commands[0], SurfaceCommand::Pin { extent: 8000.0 });
        assert!(commands.contains(&SurfaceCommand::Spotlight {
            url: "https://img/0.jpg".to_string()
        }));
        let fades = commands
            .iter()
            .filter(|c| matches!(c, SurfaceCommand::Fade(_)))
            .count();
        assert_eq!(fades, 3);
    }

    #[test]
    fn tick_before_start_fails() {
        let mut s = session(3);
        assert!(matches!(s.tick(0.016), Err(SpotlightError::NotRunning)));
    }

    #[test]
    fn tick_after_stop_fails() {
        let mut s = session(3);
        s.start();
        s.stop();
        assert!(matches!(s.tick(0.016), Err(SpotlightError::NotRunning)));
        assert!(!s.scroll_by(100.0));
    }

    #[test]
    fn stop_unpins_exactly_once() {
        let mut s = session(3);
        s.start();
        s.stop();
        s.stop();
        let unpins = s
            .surface()
            .commands()
            .iter()
            .filter(|c| **c == SurfaceCommand::Unpin)
            .count();
        assert_eq!(unpins, 1);
    }

    #[test]
    fn hidden_viewport_skips_tick() {
        let mut s = session(3);
        s.start();
        s.surface_mut().drain();
        s.surface_mut().set_viewport(Viewport::new(0.0, 0.0));
        assert!(s.tick(0.016).unwrap().is_none());
        assert!(s.surface().commands().is_empty());
    }

    #[test]
    fn tracker_only_runs_in_scroll_phase() {
        let mut s = session(3);
        s.surface_mut().set_caption_boxes(vec![
            CaptionBox::new(-500.0, 40.0),
            CaptionBox::new(380.0, 40.0),
            CaptionBox::new(900.0, 40.0),
        ]);
        s.start();

        s.scroll_to(800.0);
        let report = s.tick(0.016).unwrap().unwrap();
        assert_eq!(report.frame.phase, Phase::Intro);
        assert!(report.active_change.is_none());
        assert_eq!(s.active_index(), 0);

        s.scroll_to(4000.0);
        let report = s.tick(0.016).unwrap().unwrap();
        assert_eq!(report.frame.phase, Phase::Scroll);
        let change = report.active_change.unwrap();
        assert_eq!(change.current, 1);
        assert_eq!(s.active_index(), 1);
        assert!(s.surface().commands().contains(&SurfaceCommand::Spotlight {
            url: "https://img/1.jpg".to_string()
        }));
    }

    #[test]
    fn unmounted_captions_retry_next_tick() {
        let mut s = session(3);
        s.start();
        s.scroll_to(4000.0);
        let report = s.tick(0.016).unwrap().unwrap();
        assert!(report.active_change.is_none());

        s.surface_mut().set_caption_boxes(vec![
            CaptionBox::new(0.0, 40.0),
            CaptionBox::new(100.0, 40.0),
            CaptionBox::new(380.0, 40.0),
        ]);
        let report = s.tick(0.016).unwrap().unwrap();
        assert_eq!(report.active_change.unwrap().current, 2);
    }

    #[test]
    fn resize_repins_with_new_extent() {
        let mut s = session(3);
        s.start();
        s.tick(0.016).unwrap();
        s.surface_mut().drain();
        s.surface_mut().set_viewport(Viewport::new(1000.0, 600.0));
        s.tick(0.016).unwrap();
        assert!(s
            .surface()
            .commands()
            .contains(&SurfaceCommand::Pin { extent: 6000.0 }));
    }

    #[test]
    fn drop_releases_the_pin() {
        let mut surface = BatchSurface::new(Viewport::new(1000.0, 800.0));
        {
            let mut s = Session::new(config(), items(3), &mut surface).unwrap();
            s.start();
            assert!(s.is_running());
        }
        assert_eq!(surface.commands().last(), Some(&SurfaceCommand::Unpin));
    }

    #[test]
    fn restart_begins_from_scratch() {
        let mut s = session(3);
        s.surface_mut().set_caption_boxes(vec![
            CaptionBox::new(-500.0, 40.0),
            CaptionBox::new(380.0, 40.0),
            CaptionBox::new(900.0, 40.0),
        ]);
        s.start();
        s.scroll_to(4000.0);
        s.tick(0.016).unwrap();
        assert_eq!(s.active_index(), 1);

        s.stop();
        s.start();
        assert_eq!(s.active_index(), 0);
        assert_eq!(s.progress(), Progress::START);
    }
}
