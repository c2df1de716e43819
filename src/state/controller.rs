/// Board controller
///
/// Owns exactly one `ReferenceBoardModel` and is its sole mutator. Every
/// operation is all-or-nothing: on error the board is left untouched. The
/// controller tracks a modified flag and pushes title/refresh notifications
/// to its view, but knows nothing about widgets.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{BoardError, BoardResult};
use crate::state::model::{Extent, Point, ReferenceBoardModel, ReferenceImageModel};
use crate::state::schema;
use crate::ui::view::BoardView;

pub struct BoardController {
    /// Session id assigned by the registry, stable for this controller's
    /// lifetime
    board_id: u64,
    board: ReferenceBoardModel,
    /// `None` means the board has never been saved
    board_path: Option<PathBuf>,
    /// Dirty flag: in-memory board diverges from the last loaded/saved state
    modified: bool,
    view: Box<dyn BoardView>,
}

impl BoardController {
    /// Wrap a fresh or loaded board.
    ///
    /// A board that has never touched disk starts modified, so closing it
    /// still asks before dropping it; a loaded board starts clean.
    pub fn new(
        board_id: u64,
        board: ReferenceBoardModel,
        board_path: Option<PathBuf>,
        view: Box<dyn BoardView>,
    ) -> Self {
        let start_dirty = board_path.is_none();
        let mut controller = Self {
            board_id,
            board,
            board_path,
            modified: false,
            view,
        };
        controller.set_modified(start_dirty);
        controller.warn_missing_images();
        controller
    }

    pub fn board_id(&self) -> u64 {
        self.board_id
    }

    pub fn name(&self) -> &str {
        &self.board.board_name
    }

    pub fn path(&self) -> Option<&Path> {
        self.board_path.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn model(&self) -> &ReferenceBoardModel {
        &self.board
    }

    /// Look up one image. Returns a borrow into the board, not a copy.
    pub fn image(&self, name: &str) -> BoardResult<&ReferenceImageModel> {
        self.board
            .reference_images
            .get(name)
            .ok_or_else(|| BoardError::NotFound(name.to_string()))
    }

    /// Add the image at `path` with default display state.
    ///
    /// The image name is the file stem; on collision the smallest free
    /// `-1`, `-2`, … suffix of the original stem wins. Returns the
    /// resolved name.
    pub fn add_image(&mut self, path: &Path) -> BoardResult<String> {
        if !path.is_file() {
            return Err(BoardError::InvalidPath(path.to_path_buf()));
        }
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        let name = self.free_image_name(stem);
        let image = ReferenceImageModel::with_path(path.to_string_lossy());
        self.board.reference_images.insert(name.clone(), image);
        self.set_modified(true);
        self.view
            .on_image_added(&name, &self.board.reference_images[&name]);
        info!(board = %self.board.board_name, image = %name, "added image");
        Ok(name)
    }

    pub fn delete_image(&mut self, name: &str) -> BoardResult<()> {
        if self.board.reference_images.remove(name).is_none() {
            return Err(BoardError::NotFound(name.to_string()));
        }
        self.set_modified(true);
        self.view.on_image_removed(name);
        info!(board = %self.board.board_name, image = %name, "removed image");
        Ok(())
    }

    /// Re-key an image, preserving its record.
    ///
    /// Renaming to any name already on the board is a conflict, including
    /// `new == old`.
    pub fn rename_image(&mut self, old: &str, new: &str) -> BoardResult<()> {
        if new.is_empty() {
            return Err(BoardError::InvalidField {
                field: "name",
                reason: "must not be empty".to_string(),
            });
        }
        if self.board.reference_images.contains_key(new) {
            return Err(BoardError::NameConflict(new.to_string()));
        }
        let image = self
            .board
            .reference_images
            .remove(old)
            .ok_or_else(|| BoardError::NotFound(old.to_string()))?;
        self.board.reference_images.insert(new.to_string(), image);
        self.set_modified(true);
        self.view.on_image_renamed(old, new);
        Ok(())
    }

    pub fn rename_board(&mut self, new_name: &str) {
        self.board.board_name = new_name.to_string();
        self.set_modified(true);
    }

    /// Hide or reveal one image.
    pub fn set_image_hidden(&mut self, name: &str, hidden: bool) -> BoardResult<()> {
        let image = self
            .board
            .reference_images
            .get_mut(name)
            .ok_or_else(|| BoardError::NotFound(name.to_string()))?;
        image.view_hidden = hidden;
        self.set_modified(true);
        Ok(())
    }

    /// Hide or reveal every image on the board.
    pub fn set_all_hidden(&mut self, hidden: bool) {
        if self.board.reference_images.is_empty() {
            return;
        }
        for image in self.board.reference_images.values_mut() {
            image.view_hidden = hidden;
        }
        self.set_modified(true);
    }

    /// Persist display state coming back from the view layer (drag, zoom,
    /// resize).
    pub fn update_image_view(
        &mut self,
        name: &str,
        zoom: f64,
        image_center: Point,
        view_size: Extent,
        view_position: Extent,
    ) -> BoardResult<()> {
        if !(zoom.is_finite() && zoom > 0.0) {
            return Err(BoardError::InvalidField {
                field: "zoom",
                reason: format!("must be a positive finite number, got {zoom}"),
            });
        }
        let coordinates = [
            image_center.x,
            image_center.y,
            view_size.w,
            view_size.h,
            view_position.w,
            view_position.h,
        ];
        if coordinates.iter().any(|c| !c.is_finite()) {
            return Err(BoardError::InvalidField {
                field: "view geometry",
                reason: "coordinates must be finite".to_string(),
            });
        }
        let image = self
            .board
            .reference_images
            .get_mut(name)
            .ok_or_else(|| BoardError::NotFound(name.to_string()))?;
        image.zoom = zoom;
        image.image_center = image_center;
        image.view_size = view_size;
        image.view_position = view_position;
        self.set_modified(true);
        Ok(())
    }

    /// Write the board to disk.
    ///
    /// A never-saved board (or `force_dialog`) asks the view for a
    /// destination first; an aborted dialog makes the whole save a no-op.
    /// Writes only happen while the board is modified, so a second
    /// consecutive save does no I/O. On write failure the modified flag is
    /// untouched and a retry stays possible.
    pub fn save(&mut self, force_dialog: bool) -> BoardResult<()> {
        if self.board_path.is_none() || force_dialog {
            let Some(destination) = self.view.request_save_destination() else {
                debug!(board = %self.board.board_name, "save aborted from dialog");
                return Ok(());
            };
            self.board_path = Some(destination);
            // A fresh destination always gets written, even if the same
            // content was already saved elsewhere
            self.modified = true;
        }
        if self.modified {
            if let Some(path) = &self.board_path {
                std::fs::write(path, schema::render_board(&self.board))?;
                info!(board = %self.board.board_name, path = %path.display(), "board saved");
                self.set_modified(false);
            }
        }
        Ok(())
    }

    /// Whether the controller may be torn down.
    ///
    /// A modified board asks the view for confirmation; declined leaves the
    /// board intact and keeps it open. Unsaved changes are never dropped
    /// silently.
    pub fn close(&mut self) -> bool {
        if self.modified && !self.view.confirm_discard_changes() {
            debug!(board = %self.board.board_name, "close declined");
            return false;
        }
        true
    }

    fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
        let title = if modified {
            format!("*{}", self.board.board_name)
        } else {
            self.board.board_name.clone()
        };
        self.view.on_title_changed(&title);
    }

    fn free_image_name(&self, stem: &str) -> String {
        if !self.board.reference_images.contains_key(stem) {
            return stem.to_string();
        }
        let mut i = 1;
        loop {
            let candidate = format!("{stem}-{i}");
            if !self.board.reference_images.contains_key(&candidate) {
                return candidate;
            }
            i += 1;
        }
    }

    fn warn_missing_images(&mut self) {
        for (name, image) in &self.board.reference_images {
            if !Path::new(&image.path).exists() {
                self.view.notify_missing_image(name, &image.path);
            }
        }
    }
}
