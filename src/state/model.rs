/// Persisted data model for reference boards
///
/// These structs are plain data holders. They are serialized to JSON board
/// files (`*.refboard`); all mutation goes through the board controller,
/// never through these types directly.

use serde::Serialize;
use std::collections::BTreeMap;

/// 2D point, the pan anchor in image space
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Width/height pair.
///
/// Board files historically name window-position fields `w`/`h` as well, so
/// `view_position` shares this wire shape even though it is semantically x/y.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub w: f64,
    pub h: f64,
}

/// Persisted state of one reference image on a board
///
/// Field declaration order here is the canonical field order of the board
/// file format.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ReferenceImageModel {
    /// Path to the image asset. May point to a missing file; that is a
    /// warning condition, not an error.
    pub path: String,
    /// Stacking order, -1 = unset
    pub z_order: i32,
    /// Positive scale factor
    pub zoom: f64,
    pub image_center: Point,
    /// Rendered size on screen
    pub view_size: Extent,
    /// Window position on screen
    pub view_position: Extent,
    pub view_hidden: bool,
}

impl Default for ReferenceImageModel {
    fn default() -> Self {
        Self {
            path: String::new(),
            z_order: -1,
            zoom: 1.0,
            image_center: Point { x: 256.0, y: 256.0 },
            view_size: Extent { w: 512.0, h: 512.0 },
            view_position: Extent { w: 0.0, h: 0.0 },
            view_hidden: false,
        }
    }
}

impl ReferenceImageModel {
    /// Default record pointing at `path`
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

/// A named collection of reference images, persisted as one board file
///
/// Keys are unique, non-empty image names derived from filename stems.
/// Map order carries no meaning; the `BTreeMap` only makes serialization
/// deterministic.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ReferenceBoardModel {
    pub board_name: String,
    pub reference_images: BTreeMap<String, ReferenceImageModel>,
}

impl Default for ReferenceBoardModel {
    fn default() -> Self {
        Self {
            board_name: "unknown".to_string(),
            reference_images: BTreeMap::new(),
        }
    }
}
