/// Serialization layer for `*.refboard` documents
///
/// Parsing is schema-driven rather than a `serde::Deserialize` derive: the
/// format accepts loosely-typed numeric literals (`"2"` for a zoom of 2.0),
/// ignores unknown fields, and must report malformed documents as a
/// `SchemaError` without ever producing a half-populated board.
///
/// Output is canonical: per-image field order is
/// `path, z_order, zoom, image_center, view_size, view_position, view_hidden`
/// (the declaration order in `model.rs`), pretty-printed.

use serde_json::Value;

use crate::error::SchemaError;
use crate::state::model::{Extent, Point, ReferenceBoardModel, ReferenceImageModel};

/// Parse a board document, applying defaults for missing optional fields.
pub fn parse_board(text: &str) -> Result<ReferenceBoardModel, SchemaError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| SchemaError::new(format!("not valid JSON: {e}")))?;
    board_from_value(&value)
}

/// Render a board in its canonical on-disk form.
pub fn render_board(board: &ReferenceBoardModel) -> String {
    // Serializing plain strings/numbers/bools cannot fail
    let mut text =
        serde_json::to_string_pretty(board).expect("board model serialization is infallible");
    text.push('\n');
    text
}

fn board_from_value(value: &Value) -> Result<ReferenceBoardModel, SchemaError> {
    let root = value
        .as_object()
        .ok_or_else(|| SchemaError::new("top level must be an object"))?;

    let mut board = ReferenceBoardModel::default();
    if let Some(name) = root.get("board_name") {
        board.board_name = string_field("board_name", name)?;
    }
    if let Some(images) = root.get("reference_images") {
        let entries = images
            .as_object()
            .ok_or_else(|| SchemaError::new("\"reference_images\" must be an object"))?;
        for (name, entry) in entries {
            if name.is_empty() {
                return Err(SchemaError::new("image names must not be empty"));
            }
            let image = image_from_value(name, entry)?;
            board.reference_images.insert(name.clone(), image);
        }
    }
    Ok(board)
}

fn image_from_value(name: &str, value: &Value) -> Result<ReferenceImageModel, SchemaError> {
    let fields = value
        .as_object()
        .ok_or_else(|| SchemaError::new(format!("image \"{name}\" must be an object")))?;

    // `path` is the one required field; everything else has a default
    let path = fields
        .get("path")
        .ok_or_else(|| SchemaError::new(format!("image \"{name}\" is missing \"path\"")))?;
    let mut image = ReferenceImageModel::with_path(string_field("path", path)?);

    if let Some(v) = fields.get("z_order") {
        image.z_order = int_field("z_order", v)?;
    }
    if let Some(v) = fields.get("zoom") {
        let zoom = float_field("zoom", v)?;
        if zoom <= 0.0 {
            return Err(SchemaError::new(format!("\"zoom\" must be positive, got {zoom}")));
        }
        image.zoom = zoom;
    }
    if let Some(v) = fields.get("image_center") {
        let (x, y) = pair_field("image_center", v, "x", "y")?;
        image.image_center = Point { x, y };
    }
    if let Some(v) = fields.get("view_size") {
        let (w, h) = pair_field("view_size", v, "w", "h")?;
        image.view_size = Extent { w, h };
    }
    if let Some(v) = fields.get("view_position") {
        let (w, h) = pair_field("view_position", v, "w", "h")?;
        image.view_position = Extent { w, h };
    }
    if let Some(v) = fields.get("view_hidden") {
        image.view_hidden = v
            .as_bool()
            .ok_or_else(|| SchemaError::new("\"view_hidden\" must be a boolean"))?;
    }
    Ok(image)
}

fn string_field(field: &str, value: &Value) -> Result<String, SchemaError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| SchemaError::new(format!("\"{field}\" must be a string")))
}

/// Numbers may appear as JSON numbers or numeric-looking strings; both
/// coerce. The result must be finite.
fn float_field(field: &str, value: &Value) -> Result<f64, SchemaError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(f) if f.is_finite() => Ok(f),
        _ => Err(SchemaError::new(format!(
            "\"{field}\" must be a finite number, got {value}"
        ))),
    }
}

/// Integers additionally accept integral floats (`2.0` coerces to 2)
fn int_field(field: &str, value: &Value) -> Result<i32, SchemaError> {
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed
        .and_then(|i| i32::try_from(i).ok())
        .ok_or_else(|| SchemaError::new(format!("\"{field}\" must be an integer, got {value}")))
}

/// A sub-object carrying exactly two named numeric fields, e.g.
/// `{"x": 256, "y": 256}`. Extra keys are ignored; both named keys are
/// required once the object is present.
fn pair_field(
    field: &str,
    value: &Value,
    first: &str,
    second: &str,
) -> Result<(f64, f64), SchemaError> {
    let object = value
        .as_object()
        .ok_or_else(|| SchemaError::new(format!("\"{field}\" must be an object")))?;
    let component = |key: &str| -> Result<f64, SchemaError> {
        let v = object
            .get(key)
            .ok_or_else(|| SchemaError::new(format!("\"{field}\" is missing \"{key}\"")))?;
        float_field(&format!("{field}.{key}"), v)
    };
    Ok((component(first)?, component(second)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_from_loose_json() {
        let board = parse_board(
            r#"{"reference_images": {"pippo": {"path": "./pippo.png", "zoom": "2"}}}"#,
        )
        .unwrap();
        let image = &board.reference_images["pippo"];
        assert_eq!(image.path, "./pippo.png");
        assert_eq!(image.zoom, 2.0);
        // untouched fields keep their defaults
        assert_eq!(image.z_order, -1);
        assert_eq!(image.image_center, Point { x: 256.0, y: 256.0 });
        assert!(!image.view_hidden);
    }

    #[test]
    fn test_missing_board_fields_take_defaults() {
        let board = parse_board("{}").unwrap();
        assert_eq!(board.board_name, "unknown");
        assert!(board.reference_images.is_empty());
    }

    #[test]
    fn test_image_without_path_fails() {
        let err = parse_board(
            r#"{"reference_images": {"img": {"id": "123", "nome": "Alice"}}}"#,
        )
        .unwrap_err();
        assert!(err.0.contains("path"), "unexpected message: {err}");
    }

    #[test]
    fn test_type_mismatch_fails() {
        assert!(parse_board(r#"{"reference_images": {"a": {"path": 42}}}"#).is_err());
        assert!(
            parse_board(r#"{"reference_images": {"a": {"path": "x", "zoom": "due"}}}"#).is_err()
        );
        assert!(
            parse_board(r#"{"reference_images": {"a": {"path": "x", "view_hidden": "si"}}}"#)
                .is_err()
        );
        assert!(
            parse_board(r#"{"reference_images": {"a": {"path": "x", "image_center": {"x": 1}}}}"#)
                .is_err()
        );
    }

    #[test]
    fn test_non_object_shapes_fail() {
        assert!(parse_board("[1, 2]").is_err());
        assert!(parse_board(r#"{"reference_images": []}"#).is_err());
        assert!(parse_board(r#"{"reference_images": {"a": "not an object"}}"#).is_err());
        assert!(parse_board(r#"{"reference_images": {"": {"path": "x"}}}"#).is_err());
        assert!(parse_board("not json at all").is_err());
    }

    #[test]
    fn test_zoom_must_be_positive_and_finite() {
        assert!(parse_board(r#"{"reference_images": {"a": {"path": "x", "zoom": 0}}}"#).is_err());
        assert!(parse_board(r#"{"reference_images": {"a": {"path": "x", "zoom": -1.5}}}"#).is_err());
        assert!(
            parse_board(r#"{"reference_images": {"a": {"path": "x", "zoom": "NaN"}}}"#).is_err()
        );
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let board = parse_board(
            r#"{"board_name": "b", "extra": 1,
                "reference_images": {"a": {"path": "x", "favourite": true}}}"#,
        )
        .unwrap();
        assert_eq!(board.reference_images["a"].path, "x");
    }

    #[test]
    fn test_integer_coercion() {
        let board = parse_board(
            r#"{"reference_images": {"a": {"path": "x", "z_order": 2.0},
                                     "b": {"path": "y", "z_order": "7"}}}"#,
        )
        .unwrap();
        assert_eq!(board.reference_images["a"].z_order, 2);
        assert_eq!(board.reference_images["b"].z_order, 7);
        assert!(
            parse_board(r#"{"reference_images": {"a": {"path": "x", "z_order": 2.5}}}"#).is_err()
        );
    }

    #[test]
    fn test_canonical_field_order() {
        let mut image = ReferenceImageModel::with_path("./pippo.png");
        image.zoom = 2.0;
        assert_eq!(
            serde_json::to_string(&image).unwrap(),
            r#"{"path":"./pippo.png","z_order":-1,"zoom":2.0,"image_center":{"x":256.0,"y":256.0},"view_size":{"w":512.0,"h":512.0},"view_position":{"w":0.0,"h":0.0},"view_hidden":false}"#
        );
    }

    #[test]
    fn test_round_trip() {
        let mut board = ReferenceBoardModel::default();
        board.board_name = "moodboard".to_string();
        let mut pippo = ReferenceImageModel::with_path("./pippo.png");
        pippo.zoom = 0.75;
        pippo.z_order = 3;
        pippo.view_hidden = true;
        pippo.view_position = Extent { w: 40.0, h: 80.0 };
        board.reference_images.insert("pippo".to_string(), pippo);
        board
            .reference_images
            .insert("pluto".to_string(), ReferenceImageModel::with_path("./pluto.png"));

        let restored = parse_board(&render_board(&board)).unwrap();
        assert_eq!(restored, board);
    }

    #[test]
    fn test_parse_reference_document() {
        // Known-good document with mixed loose/strict typing
        let board = parse_board(
            r#"{"board_name": "test",
                "reference_images": {
                    "pippo": {"path": "./pippo.png", "zoom": "2"},
                    "pluto": {"path": "./pluto.png", "zoom": "1",
                              "image_center": {"x": 256.0, "y": 256.0},
                              "view_size": {"w": 512.0, "h": 512.0}}}}"#,
        )
        .unwrap();
        assert_eq!(board.board_name, "test");
        let names: Vec<&str> = board.reference_images.keys().map(String::as_str).collect();
        assert_eq!(names, ["pippo", "pluto"]);
        assert_eq!(board.reference_images["pippo"].zoom, 2.0);
        assert_eq!(board.reference_images["pluto"].zoom, 1.0);
    }
}
