pub mod line_editor;
pub mod nl;
pub mod types;
pub mod ui;
