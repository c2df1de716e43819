/// Terminal frontend
///
/// Implements `BoardView` with the pieces that need no widget toolkit:
/// native OS file dialogs for picking paths, a stdin confirmation prompt for
/// discarding changes, and plain prints for the view-refresh hooks.

use std::path::PathBuf;

use dialoguer::Confirm;
use rfd::FileDialog;
use tracing::warn;

use crate::state::model::ReferenceImageModel;
use crate::ui::view::BoardView;

pub struct TerminalView;

impl BoardView for TerminalView {
    fn request_save_destination(&mut self) -> Option<PathBuf> {
        FileDialog::new()
            .set_title("Save Reference Board")
            .add_filter("Reference Boards", &["refboard"])
            .save_file()
    }

    fn request_open_path(&mut self, filter: &str) -> Option<PathBuf> {
        let extensions: Vec<&str> = filter.split(',').collect();
        FileDialog::new()
            .set_title("Select a File")
            .add_filter(filter, &extensions)
            .pick_file()
    }

    fn confirm_discard_changes(&mut self) -> bool {
        Confirm::new()
            .with_prompt("This board is modified. Close it anyway?")
            .default(false)
            .interact()
            .unwrap_or(false)
    }

    fn notify_missing_image(&mut self, name: &str, path: &str) {
        warn!(image = %name, %path, "image file not found, keeping its board entry");
        println!("warning: image \"{name}\" not found at {path}");
    }

    fn on_image_added(&mut self, name: &str, image: &ReferenceImageModel) {
        println!("added image \"{name}\" ({})", image.path);
    }

    fn on_image_removed(&mut self, name: &str) {
        println!("removed image \"{name}\"");
    }

    fn on_image_renamed(&mut self, old: &str, new: &str) {
        println!("renamed image \"{old}\" to \"{new}\"");
    }

    fn on_title_changed(&mut self, title: &str) {
        println!("== {title} ==");
    }
}
