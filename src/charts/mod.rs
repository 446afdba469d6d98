//! Charts module - Chart rendering

mod layout;
mod plotter;
mod renderer;

pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
