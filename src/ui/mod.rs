/// Widgets and dialogs for the main window
///
/// - Record list with row selection (list.rs)
/// - Edit form for the selected datasheet (editor.rs)
/// - Native message boxes (dialog.rs)

pub mod dialog;
pub mod editor;
pub mod list;
