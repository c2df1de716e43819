/// Presentation layer
///
/// The core only ever talks to the `BoardView` trait in view.rs; terminal.rs
/// is the shipped implementation.

pub mod terminal;
pub mod view;
