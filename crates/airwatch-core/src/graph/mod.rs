//! Display-ready series for small monochrome panels
//!
//! Two consumers of a history window live here:
//!
//! - [`Sparkline`] conditions a window into one value per pixel column,
//!   with outliers trimmed and the result smoothed and scaled to the
//!   sparkline height.
//! - [`LinePlot`] maps raw samples onto a pixel rectangle, newest on the
//!   right, and produces min/max tick labels.
//!
//! Neither draws anything. The output is plain `Point`s and integers that a
//! `DrawTarget` owner can turn into pixels.
//!
//! # Examples
//!
//! ```ignore
//! let window = telemetry.history_mut(Metric::Eco2).contiguous();
//! let rows = Sparkline::new(128, 21).process(window);
//!
//! let plot = LinePlot::new(Rectangle::new(Point::new(20, 1), Size::new(106, 22)));
//! if let Some(scale) = plot.scale(window) {
//!     for (from, to) in scale.segments() {
//!         Line::new(from, to).into_styled(style).draw(&mut display)?;
//!     }
//! }
//! ```

mod axis;
pub mod constants;
mod sparkline;
pub mod viewport;

pub use axis::format_tick;
pub use sparkline::Sparkline;
pub use viewport::{LinePlot, PlotScale};
