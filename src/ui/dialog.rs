/// Blocking native message boxes
use rfd::{MessageButtons, MessageDialog, MessageLevel};

use crate::error::AppError;

/// Show a failed action to the user and wait for acknowledgement
pub fn report(err: &AppError) {
    if err.is_warning() {
        log::warn!("{}: {}", err.title(), err);
    } else {
        log::error!("{}: {}", err.title(), err);
    }

    let level = if err.is_warning() {
        MessageLevel::Warning
    } else {
        MessageLevel::Error
    };

    show(level, err.title(), &err.to_string());
}

/// Show an informational message
pub fn info(title: &str, body: &str) {
    show(MessageLevel::Info, title, body);
}

fn show(level: MessageLevel, title: &str, body: &str) {
    let _ = MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(body)
        .set_buttons(MessageButtons::Ok)
        .show();
}
