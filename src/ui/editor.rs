/// "Edit Datasheet" form shown in place of the main controls
use iced::widget::{button, column, pick_list, row, text, text_input};
use iced::{Alignment, Element, Length};

use crate::error::InputError;
use crate::state::data::{ComponentType, Datasheet};
use crate::Message;

#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
    pub id: i64,
    pub name: String,
    pub component_type: ComponentType,
    /// Shown read-only; paths are fixed once a datasheet is added
    pub filepath: String,
}

impl EditForm {
    pub fn new(datasheet: Datasheet) -> Self {
        Self {
            id: datasheet.id,
            name: datasheet.name,
            component_type: datasheet.component_type,
            filepath: datasheet.filepath,
        }
    }

    /// Name and type to save, or why they can't be saved
    pub fn validate(&self) -> Result<(&str, ComponentType), InputError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(InputError::MissingDetails);
        }
        Ok((name, self.component_type))
    }

    pub fn view(&self) -> Element<Message> {
        column![
            text("Edit Datasheet Information").size(24),
            text(format!("ID: {}", self.id)).size(14),
            text("Name:"),
            text_input("Component name", &self.name)
                .on_input(Message::EditNameChanged)
                .on_submit(Message::SaveEdit)
                .padding(6)
                .width(Length::Fixed(360.0)),
            text("Type:"),
            pick_list(
                ComponentType::ALL,
                Some(self.component_type),
                Message::EditTypeSelected
            )
            .width(Length::Fixed(360.0)),
            text(format!("File: {}", self.filepath)).size(14),
            row![
                button("Save Changes").on_press(Message::SaveEdit).padding(8),
                button("Cancel")
                    .on_press(Message::CancelEdit)
                    .style(button::secondary)
                    .padding(8),
            ]
            .spacing(10),
        ]
        .spacing(10)
        .align_x(Alignment::Center)
        .into()
    }
}
