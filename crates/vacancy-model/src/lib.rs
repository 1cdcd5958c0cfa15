pub mod grid;
pub mod rooms;
pub mod schedule;

pub use grid::*;
pub use rooms::*;
pub use schedule::*;
