//! Text measurement without lasting side effects.
//!
//! [`measure_text`] sets the font, alignment, baseline and direction it was
//! asked about, measures, and puts the surface's previous values back on
//! every exit path. Each call is a host text-shaping operation;
//! [`MetricsCache`] memoizes results for layouts that measure the same
//! labels every frame.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use crate::error::Result;

use super::font::Font;
use super::surface::{Direction, Surface, TextAlign, TextBaseline, TextMetrics};

// ---------------------------------------------------------------------------
// TextMeasure
// ---------------------------------------------------------------------------

/// The text settings a measurement is made under.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextMeasure {
    pub font: Font,
    pub align: TextAlign,
    pub baseline: TextBaseline,
    pub direction: Direction,
}

impl TextMeasure {
    /// Measure with `font` and the canvas defaults for everything else.
    pub fn new(font: Font) -> Self {
        Self { font, ..Self::default() }
    }

    /// Set the alignment (builder).
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Set the baseline (builder).
    pub fn with_baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Set the direction (builder).
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
}

// ---------------------------------------------------------------------------
// Text state guard
// ---------------------------------------------------------------------------

/// Remembers the four text properties and writes them back on drop.
struct TextStateGuard<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    direction: Direction,
    align: TextAlign,
    baseline: TextBaseline,
    font: String,
    armed: bool,
}

impl<'a, S: Surface + ?Sized> TextStateGuard<'a, S> {
    fn new(surface: &'a mut S) -> Result<Self> {
        let direction = surface.direction()?;
        let align = surface.text_align()?;
        let baseline = surface.text_baseline()?;
        let font = surface.font()?;
        Ok(Self { surface, direction, align, baseline, font, armed: true })
    }

    /// Write every property back, attempting all four even if one fails.
    fn restore(&mut self) -> Result<()> {
        let font = self.surface.set_font(&self.font);
        let baseline = self.surface.set_text_baseline(self.baseline);
        let align = self.surface.set_text_align(self.align);
        let direction = self.surface.set_direction(self.direction);
        font.and(baseline).and(align).and(direction)
    }

    fn finish(mut self) -> Result<()> {
        self.armed = false;
        self.restore()
    }
}

impl<S: Surface + ?Sized> Deref for TextStateGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for TextStateGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.surface
    }
}

impl<S: Surface + ?Sized> Drop for TextStateGuard<'_, S> {
    fn drop(&mut self) {
        if self.armed {
            if let Err(err) = self.restore() {
                tracing::error!(%err, "failed to restore text state after measuring");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Measure `text` under `measure`, leaving the surface's text state as it was.
pub fn measure_text<S: Surface + ?Sized>(
    surface: &mut S,
    measure: &TextMeasure,
    text: &str,
) -> Result<TextMetrics> {
    let mut scope = TextStateGuard::new(surface)?;
    scope.set_direction(measure.direction)?;
    scope.set_text_align(measure.align)?;
    scope.set_text_baseline(measure.baseline)?;
    scope.set_font(&measure.font.to_string())?;
    let metrics = scope.measure_text(text)?;
    scope.finish()?;
    Ok(metrics)
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct MetricsKey {
    font: String,
    text: String,
    align: TextAlign,
    baseline: TextBaseline,
    direction: Direction,
}

/// Memoizes [`measure_text`] by font, text, alignment, baseline and direction.
///
/// The cache never expires entries on its own; call [`MetricsCache::clear`]
/// when fonts may have changed on the host (for example after a web font
/// finishes loading).
#[derive(Debug, Default)]
pub struct MetricsCache {
    entries: HashMap<MetricsKey, TextMetrics>,
    hits: u64,
    misses: u64,
}

impl MetricsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached measurement, measuring on the surface on a miss.
    ///
    /// Failed measurements are not cached.
    pub fn measure<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        measure: &TextMeasure,
        text: &str,
    ) -> Result<TextMetrics> {
        let key = MetricsKey {
            font: measure.font.to_string(),
            text: text.to_owned(),
            align: measure.align,
            baseline: measure.baseline,
            direction: measure.direction,
        };
        if let Some(metrics) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(*metrics);
        }
        self.misses += 1;
        let metrics = measure_text(surface, measure, text)?;
        self.entries.insert(key, metrics);
        Ok(metrics)
    }

    /// Number of cached measurements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Drop every cached measurement. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
