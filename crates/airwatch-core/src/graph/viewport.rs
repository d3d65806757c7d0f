//! Line-plot scaling
//!
//! Maps a sample window onto a pixel rectangle. The newest sample sits in the
//! right-most column and older samples step one column to the left each, so
//! the plot grows leftwards and anything older than the plot width is cut
//! off. Drawing the connecting lines is up to the caller's `DrawTarget`.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::String;

use super::axis::format_tick;
use super::constants::{MAX_AXIS_LABEL_LENGTH, MIN_VALUE_RANGE};
use crate::config::PlotConfig;

/// Pixel area a line plot is drawn into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePlot {
    area: Rectangle,
}

impl LinePlot {
    /// Create a plot over `area`; empty dimensions are raised to 1 pixel
    pub fn new(area: Rectangle) -> Self {
        let size = Size::new(area.size.width.max(1), area.size.height.max(1));
        Self {
            area: Rectangle::new(area.top_left, size),
        }
    }

    /// Plot of the configured size with its top-left corner at `origin`
    pub fn from_config(config: &PlotConfig, origin: Point) -> Self {
        Self::new(Rectangle::new(origin, Size::new(config.width, config.height)))
    }

    pub fn area(&self) -> Rectangle {
        self.area
    }

    /// Most recent samples that fit in the plot width
    pub fn visible<'a>(&self, samples: &'a [i16]) -> &'a [i16] {
        let width = self.area.size.width as usize;
        if samples.len() > width {
            &samples[samples.len() - width..]
        } else {
            samples
        }
    }

    /// Scale for the visible part of `samples`, `None` when there is nothing to plot
    pub fn scale<'a>(&self, samples: &'a [i16]) -> Option<PlotScale<'a>> {
        let visible = self.visible(samples);

        let min = *visible.iter().min()?;
        let max = *visible.iter().max()?;

        Some(PlotScale {
            area: self.area,
            samples: visible,
            min,
            max,
        })
    }
}

/// Value-to-pixel mapping for one sample window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotScale<'a> {
    area: Rectangle,
    samples: &'a [i16],
    min: i16,
    max: i16,
}

impl<'a> PlotScale<'a> {
    /// Smallest visible value
    pub fn min(&self) -> i16 {
        self.min
    }

    /// Largest visible value
    pub fn max(&self) -> i16 {
        self.max
    }

    /// Samples that made it into the plot, oldest first
    pub fn samples(&self) -> &'a [i16] {
        self.samples
    }

    fn value_range(&self) -> i32 {
        (self.max as i32 - self.min as i32).max(MIN_VALUE_RANGE)
    }

    fn pixel_span(&self) -> i32 {
        self.area.size.height as i32 - 1
    }

    /// Vertical pixels per value unit
    pub fn pixels_per_unit(&self) -> f32 {
        self.pixel_span() as f32 / self.value_range() as f32
    }

    /// Pixel row for `value`; the maximum maps to the top row and the
    /// minimum to the bottom row
    pub fn y_for(&self, value: i16) -> i32 {
        let offset = (self.max as i32 - value as i32) * self.pixel_span() / self.value_range();
        self.area.top_left.y + offset
    }

    /// Pixel column for a sample `age` steps older than the newest
    pub fn x_for(&self, age: usize) -> i32 {
        let right = self.area.top_left.x + self.area.size.width as i32 - 1;
        right - age as i32
    }

    /// Scaled points, newest first
    pub fn points(&self) -> impl Iterator<Item = Point> + use<'a> {
        let scale = *self;
        self.samples
            .iter()
            .rev()
            .enumerate()
            .map(move |(age, &value)| Point::new(scale.x_for(age), scale.y_for(value)))
    }

    /// Line segments between consecutive points, newest first
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + use<'a> {
        self.points().zip(self.points().skip(1))
    }

    /// Tick label for the top of the value axis
    pub fn max_label(&self) -> String<MAX_AXIS_LABEL_LENGTH> {
        format_tick(self.max)
    }

    /// Tick label for the bottom of the value axis
    pub fn min_label(&self) -> String<MAX_AXIS_LABEL_LENGTH> {
        format_tick(self.min)
    }
}
