//! Three-slot cover flow.
//!
//! The carousel shows the selected cover in the center with its circular
//! neighbors on either side. A move left or right is a fixed number of
//! equal steps; on the last step the index is committed and the progress
//! resets. Steps are driven either by the blocking [`Carousel::navigate_right`]
//! / [`Carousel::navigate_left`] calls or one per frame through
//! [`Carousel::step`].

use std::time::Duration;

use crate::backend::{Color, RenderBackend};
use crate::catalog::CatalogEntry;
use crate::config::CarouselConfig;
use crate::error::{CoverdeckError, Result};
use crate::projection::{Projection, Vec3};
use crate::textures::TextureCache;

/// Half extents and depth of a cover quad before any offset.
const QUAD_HALF_WIDTH: f32 = 1.25;
const QUAD_HALF_HEIGHT: f32 = 1.6;
const QUAD_Z: f32 = 1.0;

/// Offset of the right neighbor at rest.
pub const RIGHT_DELTA: Vec3 = Vec3::new(1.9, 0.0, -0.5);
/// Offset of the left neighbor at rest.
pub const LEFT_DELTA: Vec3 = Vec3::new(-1.9, 0.0, -0.5);

/// Delay between animation steps.
pub trait StepTimer {
    fn wait(&mut self, delay: Duration);
}

/// [`StepTimer`] that sleeps the current thread.
pub struct SleepTimer;

impl StepTimer for SleepTimer {
    fn wait(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// Where the carousel is in its state machine. `step` counts completed
/// animation steps of the current transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    Idle,
    TransitioningLeft { step: u32 },
    TransitioningRight { step: u32 },
}

/// Which visible slot a quad fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Left,
    Center,
    Right,
}

/// One cover quad for the current frame, in camera space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub slot: Slot,
    /// Index into the entry list and texture cache.
    pub index: usize,
    /// Offset from the rest position of the center cover.
    pub offset: Vec3,
    pub min: Vec3,
    pub max: Vec3,
}

pub struct Carousel {
    entries: Vec<CatalogEntry>,
    textures: TextureCache,
    index: usize,
    zoom: f32,
    /// Right-move progress.
    t: f32,
    /// Left-move progress.
    s: f32,
    state: TransitionState,
    steps: u32,
    step_delay: Duration,
    background: Color,
}

impl Carousel {
    /// Carousel at rest on entry 0. An empty entry list is refused, which
    /// keeps every modulo below well defined.
    pub fn new(entries: Vec<CatalogEntry>, textures: TextureCache, config: &CarouselConfig) -> Result<Self> {
        if entries.is_empty() {
            return Err(CoverdeckError::CatalogEmpty(Default::default()));
        }
        Ok(Self {
            entries,
            textures,
            index: 0,
            zoom: config.default_zoom,
            t: 0.0,
            s: 0.0,
            state: TransitionState::Idle,
            steps: config.transition_steps,
            step_delay: config.step_delay(),
            background: Color::BLACK,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Current `(t, s)` progress pair.
    pub fn progress(&self) -> (f32, f32) {
        (self.t, self.s)
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == TransitionState::Idle
    }

    /// Entry under the center slot. While a transition runs this is still
    /// the entry it started from.
    pub fn selected_entry(&self) -> &CatalogEntry {
        &self.entries[self.index]
    }

    /// Move the camera by `delta` along z. Ignored mid-transition.
    pub fn adjust_zoom(&mut self, delta: f32) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.zoom += delta;
        true
    }

    /// Start a move to the right neighbor. Returns false if a transition is
    /// already running.
    pub fn begin_right(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state = TransitionState::TransitioningRight { step: 0 };
        true
    }

    /// Start a move to the left neighbor.
    pub fn begin_left(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state = TransitionState::TransitioningLeft { step: 0 };
        true
    }

    /// Advance the running transition by one step.
    ///
    /// Each call moves the progress by `1 / steps`; the call after progress
    /// reaches 1 commits the index and returns to idle. Returns whether the
    /// transition is still running afterwards.
    pub fn step(&mut self) -> bool {
        let n = self.entries.len();
        match self.state {
            TransitionState::Idle => false,
            TransitionState::TransitioningRight { step } if step >= self.steps => {
                self.index = (self.index + 1) % n;
                self.settle();
                false
            },
            TransitionState::TransitioningLeft { step } if step >= self.steps => {
                self.index = (self.index + n - 1) % n;
                self.settle();
                false
            },
            TransitionState::TransitioningRight { step } => {
                let step = step + 1;
                self.t = step as f32 / self.steps as f32;
                self.state = TransitionState::TransitioningRight { step };
                true
            },
            TransitionState::TransitioningLeft { step } => {
                let step = step + 1;
                self.s = step as f32 / self.steps as f32;
                self.state = TransitionState::TransitioningLeft { step };
                true
            },
        }
    }

    fn settle(&mut self) {
        self.t = 0.0;
        self.s = 0.0;
        self.state = TransitionState::Idle;
        log::debug!(
            "carousel at {} ({})",
            self.index,
            self.entries[self.index].name()
        );
    }

    /// Animate a full move right. Each step waits the step delay, then
    /// renders and presents; the committed frame follows the last step.
    /// Does nothing if a transition is already running.
    pub fn navigate_right(&mut self, backend: &mut dyn RenderBackend, timer: &mut dyn StepTimer) -> Result<()> {
        if !self.begin_right() {
            return Ok(());
        }
        self.run_transition(backend, timer)
    }

    /// Animate a full move left.
    pub fn navigate_left(&mut self, backend: &mut dyn RenderBackend, timer: &mut dyn StepTimer) -> Result<()> {
        if !self.begin_left() {
            return Ok(());
        }
        self.run_transition(backend, timer)
    }

    fn run_transition(&mut self, backend: &mut dyn RenderBackend, timer: &mut dyn StepTimer) -> Result<()> {
        while self.step() {
            timer.wait(self.step_delay);
            self.render(backend)?;
            backend.swap_buffers()?;
        }
        self.render(backend)?;
        backend.swap_buffers()
    }

    /// The three quads for the current state, center first.
    pub fn quads(&self) -> [Quad; 3] {
        let n = self.entries.len();
        let (t, s) = (self.t, self.s);
        let camera = Vec3::new(0.0, 0.0, self.zoom);
        let quad = |slot, index, offset: Vec3| {
            let center = Vec3::new(0.0, 0.0, QUAD_Z) + offset + camera;
            Quad {
                slot,
                index,
                offset,
                min: center + Vec3::new(-QUAD_HALF_WIDTH, -QUAD_HALF_HEIGHT, 0.0),
                max: center + Vec3::new(QUAD_HALF_WIDTH, QUAD_HALF_HEIGHT, 0.0),
            }
        };
        [
            quad(Slot::Center, self.index, LEFT_DELTA * t + RIGHT_DELTA * s),
            quad(Slot::Right, (self.index + 1) % n, RIGHT_DELTA * (1.0 - t + s)),
            quad(Slot::Left, (self.index + n - 1) % n, LEFT_DELTA * (1.0 + t - s)),
        ]
    }

    /// Draw the current frame (without presenting it).
    pub fn render(&self, backend: &mut dyn RenderBackend) -> Result<()> {
        backend.clear(self.background)?;
        let (width, height) = backend.viewport();
        let projection = Projection::new(width, height);

        let mut visible: Vec<_> = self
            .quads()
            .iter()
            .filter_map(|q| {
                let tex = self.textures.get(q.index)?;
                let rect = projection.project_rect(q.min, q.max)?;
                Some((tex, rect))
            })
            .collect();
        // Painter's order: farthest first.
        visible.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));
        for (tex, rect) in visible {
            backend.blit(tex, rect.x, rect.y, rect.w, rect.h)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::PathBuf;

    use proptest::prelude::*;

    use super::*;
    use crate::backend::{Color, TextureId};
    use crate::test_utils::{CountingTimer, DrawCall, MockBackend};

    fn catalog(n: usize) -> (Vec<CatalogEntry>, TextureCache) {
        let entries: Vec<CatalogEntry> = (0..n)
            .map(|i| CatalogEntry::new(format!("Game {i}"), PathBuf::from(format!("Game {i}.lnk"))))
            .collect();
        let handles = (0..n).map(|i| Some(TextureId(i as u64 + 1))).collect();
        (entries, TextureCache::from_handles(handles))
    }

    fn carousel(n: usize) -> Carousel {
        let (entries, textures) = catalog(n);
        Carousel::new(entries, textures, &CarouselConfig::default()).unwrap()
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5 && (a.z - b.z).abs() < 1e-5
    }

    #[test]
    fn empty_catalog_is_refused() {
        let (entries, textures) = catalog(0);
        let err = Carousel::new(entries, textures, &CarouselConfig::default());
        assert!(matches!(err, Err(CoverdeckError::CatalogEmpty(_))));
    }

    #[test]
    fn initial_state() {
        let c = carousel(3);
        assert_eq!(c.index(), 0);
        assert_eq!(c.zoom(), -7.0);
        assert_eq!(c.progress(), (0.0, 0.0));
        assert_eq!(c.state(), TransitionState::Idle);
        assert_eq!(c.selected_entry().name(), "Game 0");
    }

    #[test]
    fn rest_positions() {
        let c = carousel(3);
        let [center, right, left] = c.quads();
        assert_eq!((center.slot, center.index), (Slot::Center, 0));
        assert_eq!((right.slot, right.index), (Slot::Right, 1));
        assert_eq!((left.slot, left.index), (Slot::Left, 2));
        assert!(close(center.offset, Vec3::ZERO));
        assert!(close(right.offset, RIGHT_DELTA));
        assert!(close(left.offset, LEFT_DELTA));
        assert!(close(center.min, Vec3::new(-1.25, -1.6, -6.0)));
        assert!(close(center.max, Vec3::new(1.25, 1.6, -6.0)));
    }

    #[test]
    fn fully_shifted_right_positions() {
        let mut c = carousel(3);
        c.begin_right();
        for _ in 0..10 {
            assert!(c.step());
        }
        assert_eq!(c.progress(), (1.0, 0.0));
        let [center, right, left] = c.quads();
        assert!(close(center.offset, LEFT_DELTA));
        assert!(close(right.offset, Vec3::ZERO));
        assert!(close(left.offset, LEFT_DELTA * 2.0));
        // Not committed yet.
        assert_eq!(c.selected_entry().name(), "Game 0");
    }

    #[test]
    fn fully_shifted_left_positions() {
        let mut c = carousel(3);
        c.begin_left();
        for _ in 0..10 {
            c.step();
        }
        assert_eq!(c.progress(), (0.0, 1.0));
        let [center, right, left] = c.quads();
        assert!(close(center.offset, RIGHT_DELTA));
        assert!(close(right.offset, RIGHT_DELTA * 2.0));
        assert!(close(left.offset, Vec3::ZERO));
    }

    #[test]
    fn step_commits_after_final_progress() {
        let mut c = carousel(4);
        assert!(c.begin_right());
        let mut running = 0;
        while c.step() {
            running += 1;
        }
        assert_eq!(running, 10);
        assert_eq!(c.index(), 1);
        assert_eq!(c.progress(), (0.0, 0.0));
        assert!(c.is_idle());
    }

    #[test]
    fn left_wraps_to_last_entry() {
        let mut c = carousel(4);
        c.begin_left();
        while c.step() {}
        assert_eq!(c.index(), 3);
        assert_eq!(c.selected_entry().name(), "Game 3");
    }

    #[test]
    fn navigation_ignored_mid_transition() {
        let mut c = carousel(3);
        assert!(c.begin_right());
        c.step();
        assert!(!c.begin_left());
        assert!(!c.begin_right());
        assert!(!c.adjust_zoom(1.0));
        assert_eq!(c.zoom(), -7.0);
        assert_eq!(c.state(), TransitionState::TransitioningRight { step: 1 });
    }

    #[test]
    fn idle_step_is_noop() {
        let mut c = carousel(2);
        assert!(!c.step());
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn zoom_is_unbounded() {
        let mut c = carousel(1);
        for _ in 0..100 {
            c.adjust_zoom(0.1);
        }
        assert!((c.zoom() - 3.0).abs() < 1e-3);
    }

    #[test]
    fn single_entry_neighbors_are_itself() {
        let mut c = carousel(1);
        let [center, right, left] = c.quads();
        assert_eq!((center.index, right.index, left.index), (0, 0, 0));
        c.begin_right();
        while c.step() {}
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn navigate_right_renders_every_step() {
        let mut c = carousel(3);
        let mut backend = MockBackend::new();
        let mut timer = CountingTimer::default();
        c.navigate_right(&mut backend, &mut timer).unwrap();
        assert_eq!(c.index(), 1);
        assert!(c.is_idle());
        assert_eq!(backend.swap_count(), 11);
        assert_eq!(timer.waits, vec![Duration::from_millis(50); 10]);
    }

    /// Records presents and step delays in one sequence.
    #[derive(Default)]
    struct Sequence(RefCell<Vec<&'static str>>);

    struct SequencedBackend<'a>(&'a Sequence, MockBackend);

    impl RenderBackend for SequencedBackend<'_> {
        fn clear(&mut self, color: Color) -> Result<()> {
            self.1.clear(color)
        }

        fn load_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<TextureId> {
            self.1.load_texture(width, height, rgba)
        }

        fn blit(&mut self, tex: TextureId, x: i32, y: i32, w: u32, h: u32) -> Result<()> {
            self.1.blit(tex, x, y, w, h)
        }

        fn swap_buffers(&mut self) -> Result<()> {
            self.0.0.borrow_mut().push("swap");
            self.1.swap_buffers()
        }

        fn viewport(&self) -> (u32, u32) {
            self.1.viewport()
        }

        fn shutdown(&mut self) -> Result<()> {
            self.1.shutdown()
        }
    }

    struct SequencedTimer<'a>(&'a Sequence);

    impl StepTimer for SequencedTimer<'_> {
        fn wait(&mut self, _delay: Duration) {
            self.0.0.borrow_mut().push("wait");
        }
    }

    #[test]
    fn each_step_waits_before_presenting() {
        let (entries, textures) = catalog(3);
        let cfg = CarouselConfig {
            transition_steps: 2,
            ..CarouselConfig::default()
        };
        let mut c = Carousel::new(entries, textures, &cfg).unwrap();
        let seq = Sequence::default();
        let mut backend = SequencedBackend(&seq, MockBackend::new());
        let mut timer = SequencedTimer(&seq);
        c.navigate_right(&mut backend, &mut timer).unwrap();
        assert_eq!(
            *seq.0.borrow(),
            vec!["wait", "swap", "wait", "swap", "swap"]
        );
    }

    #[test]
    fn navigate_left_decrements() {
        let mut c = carousel(3);
        let mut backend = MockBackend::new();
        let mut timer = CountingTimer::default();
        c.navigate_left(&mut backend, &mut timer).unwrap();
        c.navigate_left(&mut backend, &mut timer).unwrap();
        assert_eq!(c.index(), 1);
    }

    #[test]
    fn configured_step_count_is_used() {
        let (entries, textures) = catalog(2);
        let cfg = CarouselConfig {
            transition_steps: 4,
            step_delay_ms: 5,
            ..CarouselConfig::default()
        };
        let mut c = Carousel::new(entries, textures, &cfg).unwrap();
        let mut backend = MockBackend::new();
        let mut timer = CountingTimer::default();
        c.navigate_right(&mut backend, &mut timer).unwrap();
        assert_eq!(timer.waits, vec![Duration::from_millis(5); 4]);
        assert_eq!(backend.swap_count(), 5);
    }

    #[test]
    fn zero_steps_commit_immediately() {
        let (entries, textures) = catalog(2);
        let cfg = CarouselConfig {
            transition_steps: 0,
            ..CarouselConfig::default()
        };
        let mut c = Carousel::new(entries, textures, &cfg).unwrap();
        c.begin_right();
        assert!(!c.step());
        assert_eq!(c.index(), 1);
    }

    #[test]
    fn render_draws_three_covers_back_to_front() {
        let c = carousel(3);
        let mut backend = MockBackend::new();
        c.render(&mut backend).unwrap();
        assert_eq!(backend.calls[0], DrawCall::Clear(Color::BLACK));
        let blits = backend.blits();
        assert_eq!(blits.len(), 3);
        // The center cover is nearest, so it is drawn last and largest.
        let DrawCall::Blit { tex, w, .. } = blits[2] else {
            unreachable!()
        };
        assert_eq!(*tex, TextureId(1));
        for other in &blits[..2] {
            let DrawCall::Blit { w: ow, .. } = other else {
                unreachable!()
            };
            assert!(ow < w);
        }
    }

    #[test]
    fn center_cover_is_centered_on_screen() {
        let c = carousel(3);
        let mut backend = MockBackend::new();
        c.render(&mut backend).unwrap();
        let blits = backend.blits();
        let DrawCall::Blit { x, y, w, h, .. } = blits[2] else {
            unreachable!()
        };
        assert!((x + *w as i32 / 2 - 400).abs() <= 1);
        assert!((y + *h as i32 / 2 - 300).abs() <= 1);
    }

    #[test]
    fn covers_behind_camera_are_skipped() {
        let mut c = carousel(3);
        c.adjust_zoom(10.0);
        let mut backend = MockBackend::new();
        c.render(&mut backend).unwrap();
        assert!(backend.blits().is_empty());
    }

    proptest! {
        #[test]
        fn n_right_moves_return_to_start(n in 1usize..12, start in 0usize..12) {
            let mut c = carousel(n);
            let mut backend = MockBackend::new();
            let mut timer = CountingTimer::default();
            for _ in 0..start % n {
                c.navigate_right(&mut backend, &mut timer).unwrap();
            }
            let origin = c.index();
            for _ in 0..n {
                c.navigate_right(&mut backend, &mut timer).unwrap();
            }
            prop_assert_eq!(c.index() % n, origin % n);
        }

        #[test]
        fn index_stays_in_range(moves in proptest::collection::vec(any::<bool>(), 0..40), n in 1usize..6) {
            let mut c = carousel(n);
            for right in moves {
                if right { c.begin_right(); } else { c.begin_left(); }
                while c.step() {}
                prop_assert!(c.index() < n);
            }
        }
    }
}
