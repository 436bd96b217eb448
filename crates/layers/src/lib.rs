pub mod charts;
pub mod factories;
pub mod labels;
pub mod layer;
pub mod legend;
pub mod provinces;
pub mod symbology;

pub use layer::*;
