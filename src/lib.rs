// Library exports for chartdeck

pub mod assign;
pub mod catalog;
pub mod enum_values;
pub mod error;
pub mod filter;
pub mod format;
pub mod model;
pub mod palette;
pub mod rows;
pub mod session;
pub mod sort_order;
pub mod style;
pub mod validate;

// Compilation pipeline
pub mod ir;
pub mod resolve;
pub mod transform;
pub mod scale;
pub mod compiler;
pub mod preview;
