//! Shared helpers for TUI tests: `TestBackend` terminals, buffer text
//! lookups and apps backed by a temporary data directory.

use std::path::Path;

use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use tempfile::TempDir;
use widget_grid::{InteractionController, LayoutStore};

use crate::config::schema::TuiConfig;
use crate::storage::FilePersistence;
use crate::tui::app::App;
use crate::tui::ui::render;

/// Creates a Terminal with TestBackend at the specified dimensions.
pub fn test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).expect("failed to create test terminal")
}

/// Extracts all text from a specific row in the buffer as a single String.
pub fn row_text(buffer: &Buffer, row: u16) -> String {
    let area = buffer.area();
    if row >= area.height {
        return String::new();
    }
    (0..area.width)
        .map(|col| {
            buffer
                .cell((col, row))
                .map(|cell| cell.symbol())
                .unwrap_or(" ")
        })
        .collect()
}

/// Finds the first row index that contains the given text.
pub fn find_row_with_text(buffer: &Buffer, text: &str) -> Option<u16> {
    (0..buffer.area().height).find(|&row| row_text(buffer, row).contains(text))
}

/// Whether any row contains `text`.
pub fn buffer_contains(buffer: &Buffer, text: &str) -> bool {
    find_row_with_text(buffer, text).is_some()
}

/// App over the data directory `dir`, scope `test`, default TUI settings.
pub fn test_app_with(dir: &Path, width: u16) -> App {
    let tui = TuiConfig::default();
    let store = LayoutStore::open(FilePersistence::new(dir), "test");
    let controller = InteractionController::with_options(store, tui.viewport_options(width));
    let mut app = App::new(controller, tui);
    app.on_resize(width);
    app
}

/// App over a fresh temporary data directory. Keep the `TempDir` alive for
/// the duration of the test.
pub fn test_app(width: u16) -> (TempDir, App) {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let app = test_app_with(tmp.path(), width);
    (tmp, app)
}

/// Draws `app` on a `width`×`height` test terminal and returns the buffer.
pub fn render_app(app: &mut App, width: u16, height: u16) -> Buffer {
    let mut terminal = test_terminal(width, height);
    terminal
        .draw(|frame| render(frame, app))
        .expect("failed to draw");
    terminal.backend().buffer().clone()
}
