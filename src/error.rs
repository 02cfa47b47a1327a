use std::path::PathBuf;
use thiserror::Error;

use crate::state::library::LibraryError;

/// Something the user left out. The action is aborted with no state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please enter a component name.")]
    MissingName,

    #[error("Please enter all details and select a file.")]
    MissingDetails,

    #[error("Please enter a search keyword.")]
    EmptyKeyword,

    #[error("Please select a datasheet from the list.")]
    NoSelection,
}

/// Everything a single user action can fail with
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("The datasheet catalog could not be used: {0}")]
    Storage(#[from] LibraryError),

    #[error("Could not open {target}: {source}")]
    Launch {
        target: String,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    /// Dialog title for this error
    pub fn title(&self) -> &'static str {
        match self {
            AppError::Input(InputError::NoSelection) => "Selection Error",
            AppError::Input(_) => "Input Error",
            AppError::FileNotFound(_) => "File Error",
            // The selected row vanished underneath us
            AppError::Storage(LibraryError::NotFound(_)) => "Selection Error",
            AppError::Storage(_) => "Storage Error",
            AppError::Launch { .. } => "Launch Error",
        }
    }

    /// Input problems are warnings; everything else is an error
    pub fn is_warning(&self) -> bool {
        matches!(self, AppError::Input(_))
    }
}
