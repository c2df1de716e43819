/// State management module
///
/// This module handles all board state, including:
/// - The persisted data model (model.rs)
/// - Board file parsing and rendering (schema.rs)
/// - Mutation and save/close logic for one board (controller.rs)
/// - The set of concurrently open boards (registry.rs)

pub mod controller;
pub mod model;
pub mod registry;
pub mod schema;
