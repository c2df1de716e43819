/// Board registry
///
/// Owns every board open in this session, keyed by session id. The registry
/// is plain owned state threaded through `main`, not a global; when it runs
/// empty the caller decides whether the application terminates.

use std::collections::HashMap;
use std::path::Path;

use tracing::{info, warn};

use crate::error::BoardResult;
use crate::state::controller::BoardController;
use crate::state::model::ReferenceBoardModel;
use crate::state::schema;
use crate::ui::view::BoardView;

/// Builds the view for a newly opened board.
pub type ViewFactory = Box<dyn FnMut(u64) -> Box<dyn BoardView>>;

pub struct BoardRegistry {
    boards: HashMap<u64, BoardController>,
    // Never goes backwards, so a closed board's id is not recycled within
    // the session
    next_id: u64,
    make_view: ViewFactory,
}

impl BoardRegistry {
    pub fn new(make_view: ViewFactory) -> Self {
        Self {
            boards: HashMap::new(),
            next_id: 0,
            make_view,
        }
    }

    /// Open a board from `path`, or a fresh empty board when `path` is
    /// `None`. Returns the new session id.
    pub fn open_board(&mut self, path: Option<&Path>) -> BoardResult<u64> {
        let (board, board_path) = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                (schema::parse_board(&text)?, Some(path.to_path_buf()))
            }
            None => (ReferenceBoardModel::default(), None),
        };

        let board_id = self.next_id;
        self.next_id += 1;
        let view = (self.make_view)(board_id);
        let controller = BoardController::new(board_id, board, board_path, view);
        info!(board_id, board = %controller.name(), "board opened");
        self.boards.insert(board_id, controller);
        Ok(board_id)
    }

    /// Ask the board to close and drop it on success.
    ///
    /// Failures are logged, never propagated: one stuck board must not take
    /// the whole session down or block closing the others.
    pub fn close_board(&mut self, board_id: u64) -> bool {
        let Some(controller) = self.boards.get_mut(&board_id) else {
            warn!(board_id, "close requested for unknown board");
            return false;
        };
        if !controller.close() {
            info!(board_id, "close declined, board stays open");
            return false;
        }
        self.boards.remove(&board_id);
        info!(board_id, "board closed");
        true
    }

    pub fn board(&self, board_id: u64) -> Option<&BoardController> {
        self.boards.get(&board_id)
    }

    pub fn board_mut(&mut self, board_id: u64) -> Option<&mut BoardController> {
        self.boards.get_mut(&board_id)
    }

    /// Open session ids, ascending.
    pub fn ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.boards.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;
    use crate::state::model::ReferenceImageModel;
    use std::fs;
    use std::path::PathBuf;

    /// View double with a fixed answer to the discard prompt.
    struct StaticView {
        confirm_discard: bool,
    }

    impl BoardView for StaticView {
        fn request_save_destination(&mut self) -> Option<PathBuf> {
            None
        }
        fn request_open_path(&mut self, _filter: &str) -> Option<PathBuf> {
            None
        }
        fn confirm_discard_changes(&mut self) -> bool {
            self.confirm_discard
        }
        fn notify_missing_image(&mut self, _name: &str, _path: &str) {}
        fn on_image_added(&mut self, _name: &str, _image: &ReferenceImageModel) {}
        fn on_image_removed(&mut self, _name: &str) {}
        fn on_image_renamed(&mut self, _old: &str, _new: &str) {}
        fn on_title_changed(&mut self, _title: &str) {}
    }

    fn registry(confirm_discard: bool) -> BoardRegistry {
        BoardRegistry::new(Box::new(move |_| Box::new(StaticView { confirm_discard })))
    }

    #[test]
    fn test_session_ids_are_monotonic() {
        let mut registry = registry(true);
        assert_eq!(registry.open_board(None).unwrap(), 0);
        assert_eq!(registry.open_board(None).unwrap(), 1);
        assert!(registry.close_board(0));
        // 0 is free again but must not be reused
        assert_eq!(registry.open_board(None).unwrap(), 2);
        assert_eq!(registry.ids(), [1, 2]);
    }

    #[test]
    fn test_close_unknown_board_is_swallowed() {
        let mut registry = registry(true);
        assert!(!registry.close_board(99));
    }

    #[test]
    fn test_close_declined_keeps_board_registered() {
        let mut registry = registry(false);
        // a fresh board starts modified, so closing needs confirmation
        let id = registry.open_board(None).unwrap();
        assert!(!registry.close_board(id));
        assert_eq!(registry.len(), 1);
        assert!(registry.board(id).is_some());
    }

    #[test]
    fn test_open_board_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.refboard");
        fs::write(
            &path,
            r#"{"board_name":"test","reference_images":{"pippo":{"path":"./pippo.png","zoom":"2"},"pluto":{"path":"./pluto.png","zoom":"1","image_center":{"x":256.0,"y":256.0},"view_size":{"w":512.0,"h":512.0}}}}"#,
        )
        .unwrap();

        let mut registry = registry(true);
        let id = registry.open_board(Some(&path)).unwrap();
        let controller = registry.board(id).unwrap();

        assert_eq!(controller.name(), "test");
        assert!(!controller.is_modified());
        let names: Vec<&str> = controller
            .model()
            .reference_images
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(names, ["pippo", "pluto"]);
        assert_eq!(controller.image("pippo").unwrap().zoom, 2.0);
    }

    #[test]
    fn test_open_board_reports_schema_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.refboard");
        fs::write(&path, r#"{"reference_images": {"a": {"zoom": 2}}}"#).unwrap();

        let mut registry = registry(true);
        let err = registry.open_board(Some(&path)).unwrap_err();
        assert!(matches!(err, BoardError::Schema(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_open_board_missing_file() {
        let mut registry = registry(true);
        let err = registry
            .open_board(Some(Path::new("./no-such-board.refboard")))
            .unwrap_err();
        assert!(matches!(err, BoardError::Persistence(_)));
    }
}
