//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::sync::Arc;
use std::time::Instant;

use image::RgbaImage;
use tokio::sync::mpsc::UnboundedSender;

use crate::config::AppConfig;
use crate::core::{
    animator::{target_offset, PositionAnimator},
    gallery::Gallery,
    monitor::ScrollMonitor,
    scroll::ListScroll,
};
use crate::ui::image_stack::FitCache;

use super::loader::{self, DecodeJob, LoadUpdate};

/// Decode status of one gallery entry.
#[derive(Debug, Clone)]
pub enum ImageSlot {
    Pending,
    Ready(Arc<RgbaImage>),
    Failed(String),
}

/// Top-level application state.
pub struct AppState {
    pub gallery: Gallery,
    /// Scroll position of the image list.
    pub scroll: ListScroll,
    /// Memoized "last image visible" flag.
    pub monitor: ScrollMonitor,
    /// Vertical position of the glass card.
    pub animator: PositionAnimator,
    /// Decoded images, indexed like `gallery`.
    pub images: Vec<ImageSlot>,
    /// Images cropped to the current cell size.
    pub fitted: FitCache,
    pub config: AppConfig,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// `true` while decode workers are still running.
    pub loading: bool,
    /// Current decode batch; updates tagged with any other generation are
    /// dropped.
    decode: Option<DecodeJob>,
    /// Set by the reload key; the event loop starts a new batch.
    pub reload_requested: bool,
    /// Frame counter (drives the spinner).
    pub tick: u64,
}

impl AppState {
    pub fn new(gallery: Gallery, config: AppConfig, now: Instant) -> Self {
        let len = gallery.len();
        Self {
            scroll: ListScroll::new(len, config.item_rows),
            monitor: ScrollMonitor::new(),
            animator: PositionAnimator::starting_at(0.0, config.animation_duration(), now),
            images: vec![ImageSlot::Pending; len],
            fitted: FitCache::default(),
            gallery,
            config,
            should_quit: false,
            status_message: None,
            loading: false,
            decode: None,
            reload_requested: false,
            tick: 0,
        }
    }

    /// Resize the list viewport.  A new height moves the card's bottom
    /// target, so the animator is re-synced too.
    pub fn set_viewport(&mut self, rows: u16, now: Instant) {
        self.scroll.set_viewport(rows);
        self.sync_card(now);
    }

    /// Re-derive the bottom flag and point the card at the matching offset.
    ///
    /// Cheap to call after every scroll event: unchanged input is answered
    /// from the monitor's memo and an unchanged target leaves the running
    /// animation untouched.
    pub fn sync_card(&mut self, now: Instant) {
        let obs = self
            .monitor
            .observe(self.scroll.last_visible(), self.gallery.len());
        if obs.changed {
            tracing::debug!("at_bottom -> {}", obs.at_bottom);
        }
        let target = target_offset(obs.at_bottom, self.scroll.viewport_rows() as f64);
        if self.animator.set_target(target, now) {
            tracing::debug!("card target -> {:.1}", self.animator.target());
        }
    }

    /// Advance one animation frame.  Returns `true` when the frame needs
    /// drawing: the card moved (or is moving) or the spinner is showing.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        self.tick = self.tick.wrapping_add(1);
        let moving = self.animator.is_animating(now);
        let before = self.animator.offset();
        let landed = self.animator.tick(now) != before;
        moving || landed || self.loading
    }

    /// Decode every gallery image in the background, superseding any batch
    /// still running.  Already decoded images stay on screen until their
    /// replacement arrives.
    pub fn start_decode(&mut self, tx: &UnboundedSender<(u64, LoadUpdate)>) {
        let generation = match self.decode.take() {
            Some(old) => {
                old.request_cancel();
                old.generation() + 1
            }
            None => 1,
        };
        let job = loader::spawn_decode(tx, generation, self.gallery.sources());
        tracing::debug!("decode generation {generation} started");
        self.loading = job.is_loading();
        self.decode = Some(job);
    }

    /// Stop the running batch, if any.
    pub fn cancel_decode(&mut self) {
        if let Some(job) = self.decode.take() {
            job.request_cancel();
        }
        self.loading = false;
    }

    /// Apply a generation-tagged decode update.  Returns `false` when it
    /// belongs to a superseded (or cancelled) batch and was dropped.
    pub fn handle_decode_update(&mut self, generation: u64, update: LoadUpdate) -> bool {
        let Some(job) = self.decode.as_mut() else {
            return false;
        };
        if generation != job.generation() {
            tracing::debug!("dropping update from stale generation {generation}");
            return false;
        }
        if matches!(update, LoadUpdate::WorkerDone) && job.worker_done() {
            self.loading = false;
            tracing::debug!("decode generation {generation} finished");
        }
        self.apply_load(update);
        true
    }

    pub fn at_bottom(&self) -> bool {
        self.monitor.at_bottom()
    }

    /// Current card offset in rows from the top of the list area.
    pub fn card_offset(&self) -> f64 {
        self.animator.offset()
    }

    /// Store a decode result.
    fn apply_load(&mut self, update: LoadUpdate) {
        match update {
            LoadUpdate::Decoded { index, image } => {
                if let Some(slot) = self.images.get_mut(index) {
                    *slot = ImageSlot::Ready(image);
                    self.fitted.invalidate(index);
                }
            }
            LoadUpdate::Failed { index, error } => {
                let label = self
                    .gallery
                    .get(index)
                    .map(|s| s.label())
                    .unwrap_or_default();
                tracing::warn!("could not load {label}: {error}");
                self.status_message = Some(format!("Could not load {label}"));
                if let Some(slot) = self.images.get_mut(index) {
                    *slot = ImageSlot::Failed(error);
                }
            }
            LoadUpdate::WorkerDone => {}
        }
    }

    /// `(index, label)` of the topmost visible image.
    pub fn current_image(&self) -> Option<(usize, String)> {
        let range = self.scroll.visible_range()?;
        let label = self.gallery.get(range.first)?.label();
        Some((range.first, label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::sync::mpsc;

    fn state(now: Instant) -> AppState {
        let mut config = AppConfig::default();
        config.item_rows = 10;
        config.animation_ms = 300;
        let mut s = AppState::new(Gallery::builtin(), config, now);
        s.set_viewport(25, now);
        s
    }

    #[test]
    fn starts_at_top_and_not_at_bottom() {
        let t0 = Instant::now();
        let s = state(t0);
        assert!(!s.at_bottom());
        assert_eq!(s.animator.target(), 0.0);
        assert_eq!(s.card_offset(), 0.0);
    }

    #[test]
    fn reaching_last_image_targets_bottom() {
        let t0 = Instant::now();
        let mut s = state(t0);
        s.scroll.scroll_to_bottom();
        s.sync_card(t0);
        assert!(s.at_bottom());
        assert_eq!(s.animator.target(), 0.95 * 25.0);

        s.on_tick(t0 + Duration::from_millis(400));
        assert_eq!(s.card_offset(), 0.95 * 25.0);
    }

    #[test]
    fn resize_at_bottom_retargets() {
        let t0 = Instant::now();
        let mut s = state(t0);
        s.scroll.scroll_to_bottom();
        s.sync_card(t0);
        s.set_viewport(40, t0);
        // 50 rows of content fit in 40 rows only partially; still at bottom.
        assert!(s.at_bottom());
        assert_eq!(s.animator.target(), 0.95 * 40.0);
    }

    #[test]
    fn failed_decode_is_kept_per_slot() {
        let t0 = Instant::now();
        let mut s = state(t0);
        let (tx, _rx) = mpsc::unbounded_channel();
        s.start_decode(&tx);
        s.handle_decode_update(1, LoadUpdate::Failed {
            index: 2,
            error: "boom".into(),
        });
        assert!(matches!(s.images[2], ImageSlot::Failed(ref e) if e == "boom"));
        assert!(matches!(s.images[1], ImageSlot::Pending));
        assert!(s.status_message.as_deref().unwrap_or("").contains("desert"));
    }

    #[test]
    fn current_image_follows_scroll() {
        let t0 = Instant::now();
        let mut s = state(t0);
        assert_eq!(s.current_image(), Some((0, "cascade".to_string())));
        s.scroll.scroll_to_item(3);
        assert_eq!(s.current_image().map(|(i, _)| i), Some(2));
    }

    #[test]
    fn tick_reports_motion_until_the_card_lands() {
        let t0 = Instant::now();
        let mut s = state(t0);
        assert!(!s.on_tick(t0));

        s.scroll.scroll_to_bottom();
        s.sync_card(t0);
        assert!(s.on_tick(t0 + Duration::from_millis(100)));
        // First frame past the end still moves the card onto the target.
        assert!(s.on_tick(t0 + Duration::from_millis(400)));
        assert!(!s.on_tick(t0 + Duration::from_millis(420)));
    }

    #[test]
    fn updates_from_a_superseded_batch_are_dropped() {
        let t0 = Instant::now();
        let mut s = state(t0);
        let (tx, _rx) = mpsc::unbounded_channel();
        s.start_decode(&tx);
        s.start_decode(&tx);

        let image = Arc::new(RgbaImage::new(4, 4));
        assert!(!s.handle_decode_update(1, LoadUpdate::Decoded { index: 0, image }));
        assert!(matches!(s.images[0], ImageSlot::Pending));

        let image = Arc::new(RgbaImage::new(4, 4));
        assert!(s.handle_decode_update(2, LoadUpdate::Decoded { index: 0, image }));
        assert!(matches!(s.images[0], ImageSlot::Ready(_)));
    }

    #[test]
    fn updates_without_a_batch_are_dropped() {
        let t0 = Instant::now();
        let mut s = state(t0);
        assert!(!s.handle_decode_update(1, LoadUpdate::WorkerDone));
    }

    #[tokio::test]
    async fn last_worker_done_clears_loading() {
        let t0 = Instant::now();
        let mut s = state(t0);
        let (tx, mut rx) = mpsc::unbounded_channel();
        s.start_decode(&tx);
        s.start_decode(&tx);
        assert!(s.loading);

        while s.loading {
            let (generation, update) = rx.recv().await.unwrap();
            s.handle_decode_update(generation, update);
        }
        assert!(s.images.iter().all(|slot| matches!(slot, ImageSlot::Ready(_))));
    }

    #[test]
    fn cancel_stops_accepting_updates() {
        let t0 = Instant::now();
        let mut s = state(t0);
        let (tx, _rx) = mpsc::unbounded_channel();
        s.start_decode(&tx);
        s.cancel_decode();
        assert!(!s.loading);
        assert!(!s.handle_decode_update(1, LoadUpdate::WorkerDone));
    }
}
