/// Presentation-layer collaborator for one board
///
/// The controller drives every dialog and view refresh through this trait;
/// the core has no knowledge of how (or whether) the board is drawn. A GUI
/// frontend would map these onto windows and message boxes, the shipped
/// terminal frontend onto native file dialogs and stdin prompts.

use std::path::PathBuf;

use crate::state::model::ReferenceImageModel;

pub trait BoardView {
    /// Pick a destination for saving the board. `None` aborts the save.
    fn request_save_destination(&mut self) -> Option<PathBuf>;

    /// Pick a file to open. `filter` is a comma-separated extension list
    /// without dots (e.g. `"png,jpg"`). `None` aborts.
    fn request_open_path(&mut self, filter: &str) -> Option<PathBuf>;

    /// Whether unsaved changes may be discarded on close.
    fn confirm_discard_changes(&mut self) -> bool;

    /// Best-effort warning that an image file is gone. Must not block.
    fn notify_missing_image(&mut self, name: &str, path: &str);

    fn on_image_added(&mut self, name: &str, image: &ReferenceImageModel);
    fn on_image_removed(&mut self, name: &str);
    fn on_image_renamed(&mut self, old: &str, new: &str);

    /// Window-title refresh; modified boards get a `*` prefix.
    fn on_title_changed(&mut self, title: &str);
}
