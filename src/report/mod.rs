// Report assembly and rendering
pub mod builder;
pub mod color;
pub mod table;

pub use builder::{Align, Cell, Report, ReportBuilder, SymbolReadings};
pub use color::{CellColor, ColorScale, Tint, auto_color};
pub use table::render;
