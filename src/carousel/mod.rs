use std::time::Duration;

/// Home page loop interval.
pub const LOOP_INTERVAL: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bounds {
    /// Past either end continues from the other.
    Wrap,
    /// Stops at the first and last slide.
    Clamp,
}

/// Indexed sequence viewer shared by card sliders, the detail gallery, the
/// lightbox and the home page loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    index: usize,
    bounds: Bounds,
    autoplay: Option<Duration>,
    paused: bool,
}

impl Carousel {
    pub fn new(len: usize, bounds: Bounds) -> Self {
        Self {
            len,
            index: 0,
            bounds,
            autoplay: None,
            paused: false,
        }
    }

    /// Listing-card photo slider.
    pub fn card(len: usize) -> Self {
        Self::new(len, Bounds::Wrap)
    }

    /// Detail hero and lightbox; `start` is clamped into range.
    pub fn lightbox(len: usize, start: usize) -> Self {
        let mut carousel = Self::new(len, Bounds::Wrap);
        carousel.open_at(start);
        carousel
    }

    /// Infinite home page strip that advances on every `tick`.
    pub fn looping(len: usize) -> Self {
        Self::new(len, Bounds::Wrap).with_autoplay(LOOP_INTERVAL)
    }

    pub fn with_autoplay(mut self, interval: Duration) -> Self {
        self.autoplay = Some(interval);
        self
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn autoplay(&self) -> Option<Duration> {
        self.autoplay
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn next(&mut self) -> usize {
        if self.len > 0 {
            self.index = match self.bounds {
                Bounds::Wrap => (self.index + 1) % self.len,
                Bounds::Clamp => (self.index + 1).min(self.len - 1),
            };
        }
        self.index
    }

    pub fn prev(&mut self) -> usize {
        if self.len > 0 {
            self.index = match (self.bounds, self.index) {
                (Bounds::Wrap, 0) => self.len - 1,
                (Bounds::Clamp, 0) => 0,
                (_, i) => i - 1,
            };
        }
        self.index
    }

    /// Thumbnail or dot click.
    pub fn jump_to(&mut self, index: usize) -> usize {
        self.index = index.min(self.len.saturating_sub(1));
        self.index
    }

    pub fn open_at(&mut self, index: usize) -> usize {
        self.jump_to(index)
    }

    /// One-based "i/N" label; "0/0" for an empty carousel.
    pub fn counter(&self) -> String {
        if self.len == 0 {
            return "0/0".to_string();
        }
        format!("{}/{}", self.index + 1, self.len)
    }

    /// Horizontal offset of the slide track, as a CSS percentage.
    pub fn translate_percent(&self) -> i64 {
        -(self.index as i64) * 100
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Autoplay step. Returns whether the carousel moved.
    pub fn tick(&mut self) -> bool {
        if self.autoplay.is_none() || self.paused || self.len < 2 {
            return false;
        }
        let before = self.index;
        self.next();
        before != self.index
    }
}
