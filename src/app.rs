//! Program runtime: configuration, message queue, update/view loop.
//!
//! A [`Program`] owns its model, turns messages into model changes in
//! [`Program::update`], and describes the canvas in [`Program::view`].
//! [`Runtime`] ties a program to a [`Surface`]: messages are queued with
//! [`Runtime::dispatch`] and applied in batches by [`Runtime::process`], which
//! renders at most one frame per batch.

use std::collections::VecDeque;

use tracing::debug;

use crate::canvas::metrics::{measure_text, MetricsCache, TextMeasure};
use crate::canvas::scene::{apply_all, SaveGuard, Scene};
use crate::canvas::surface::{Surface, TextMetrics};
use crate::color::Color;
use crate::css::StyleSheet;
use crate::error::Result;
use crate::geometry::{Matrix, Rect, Size};

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for the runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Canvas width in CSS pixels.
    pub width: f64,
    /// Canvas height in CSS pixels.
    pub height: f64,
    /// Fill color painted under every frame. `None` leaves the cleared canvas
    /// transparent.
    pub background: Option<Color>,
    /// Whether text measurements made through [`ViewContext::measure`] are
    /// memoized.
    pub metrics_cache: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 150.0,
            background: None,
            metrics_cache: true,
        }
    }
}

impl AppConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the canvas size (builder).
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the background color (builder).
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Enable or disable the text metrics cache (builder).
    pub fn with_metrics_cache(mut self, enabled: bool) -> Self {
        self.metrics_cache = enabled;
        self
    }

    /// The canvas size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

// ---------------------------------------------------------------------------
// MessageQueue
// ---------------------------------------------------------------------------

/// FIFO queue of pending program messages.
#[derive(Debug)]
pub struct MessageQueue<M> {
    queue: VecDeque<M>,
}

impl<M> MessageQueue<M> {
    /// Create a new, empty queue.
    pub fn new() -> Self {
        Self { queue: VecDeque::new() }
    }

    /// Enqueue a message for later processing.
    pub fn push(&mut self, message: M) {
        self.queue.push_back(message);
    }

    /// Take all pending messages in arrival order.
    ///
    /// The queue is empty after this call.
    pub fn drain(&mut self) -> Vec<M> {
        self.queue.drain(..).collect()
    }

    /// Number of pending messages.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<M> Default for MessageQueue<M> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Program / ViewContext
// ---------------------------------------------------------------------------

/// What a [`Program`] can ask of the runtime while building its view.
pub struct ViewContext<'a> {
    surface: &'a mut dyn Surface,
    cache: Option<&'a mut MetricsCache>,
    size: Size,
}

impl<'a> ViewContext<'a> {
    /// A context over `surface`, measuring through `cache` when given.
    pub fn new(surface: &'a mut dyn Surface, cache: Option<&'a mut MetricsCache>, size: Size) -> Self {
        Self { surface, cache, size }
    }

    /// Measure `text` with the given font and text settings.
    ///
    /// The surface's text state is left as it was.
    pub fn measure(&mut self, measure: &TextMeasure, text: &str) -> Result<TextMetrics> {
        match self.cache.as_deref_mut() {
            Some(cache) => cache.measure(&mut *self.surface, measure, text),
            None => measure_text(&mut *self.surface, measure, text),
        }
    }

    /// The configured canvas size.
    pub fn size(&self) -> Size {
        self.size
    }
}

/// A model plus its update and view functions.
pub trait Program {
    /// Messages the program reacts to.
    type Message;

    /// Apply one message to the model. Returns `true` if the view changed.
    fn update(&mut self, message: Self::Message) -> bool;

    /// Describe the canvas for the current model.
    fn view(&self, cx: &mut ViewContext<'_>) -> Result<Vec<Scene>>;

    /// Styles for the page around the canvas.
    fn stylesheet(&self) -> StyleSheet {
        StyleSheet::new()
    }
}

// ---------------------------------------------------------------------------
// Runtime
// ---------------------------------------------------------------------------

/// Drives a [`Program`] against a [`Surface`].
pub struct Runtime<P: Program, S: Surface> {
    program: P,
    surface: S,
    queue: MessageQueue<P::Message>,
    cache: MetricsCache,
    config: AppConfig,
    frames: u64,
}

impl<P: Program, S: Surface> Runtime<P, S> {
    /// Create a runtime. Nothing is drawn until [`render`](Self::render) or a
    /// batch that requests a redraw.
    pub fn new(program: P, surface: S, config: AppConfig) -> Self {
        Self {
            program,
            surface,
            queue: MessageQueue::new(),
            cache: MetricsCache::new(),
            config,
            frames: 0,
        }
    }

    /// Queue a message for the next [`process`](Self::process).
    pub fn dispatch(&mut self, message: P::Message) {
        self.queue.push(message);
    }

    /// Number of queued messages.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Apply every queued message in arrival order, then render once if any
    /// update asked for it. Returns the number of messages applied.
    ///
    /// Messages dispatched during this call wait for the next one.
    pub fn process(&mut self) -> Result<usize> {
        let batch = self.queue.drain();
        let count = batch.len();
        let mut redraw = false;
        for message in batch {
            redraw |= self.program.update(message);
        }
        debug!(messages = count, redraw, "processed message batch");
        if redraw {
            self.render()?;
        }
        Ok(count)
    }

    /// Draw one frame: clear the canvas, paint the background if configured,
    /// then apply the program's view.
    pub fn render(&mut self) -> Result<()> {
        let bounds = self.config.size().to_rect();
        self.clear(bounds)?;

        let size = self.config.size();
        let cache = self.config.metrics_cache.then_some(&mut self.cache);
        let scenes = {
            let mut cx = ViewContext::new(&mut self.surface, cache, size);
            self.program.view(&mut cx)?
        };
        apply_all(&mut self.surface, &scenes)?;

        self.frames += 1;
        debug!(frame = self.frames, scenes = scenes.len(), "rendered frame");
        Ok(())
    }

    fn clear(&mut self, bounds: Rect) -> Result<()> {
        let mut guard = SaveGuard::new(&mut self.surface)?;
        guard.set_transform(Matrix::IDENTITY)?;
        guard.clear_rect(bounds)?;
        if let Some(background) = self.config.background {
            guard.set_fill_style(background)?;
            guard.fill_rect(bounds)?;
        }
        guard.finish()
    }

    /// The program's stylesheet as CSS text.
    pub fn css(&self) -> String {
        self.program.stylesheet().to_string()
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn program(&self) -> &P {
        &self.program
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn metrics_cache(&self) -> &MetricsCache {
        &self.cache
    }

    /// Give back the program and surface.
    pub fn into_parts(self) -> (P, S) {
        (self.program, self.surface)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
