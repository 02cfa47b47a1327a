/// Record list with a stable row-to-id binding
///
/// Each row remembers the id of the datasheet it renders, so selecting a
/// row never depends on parsing the displayed text.
use iced::widget::{button, column, scrollable, text, Column};
use iced::{Element, Length};

use crate::state::data::Datasheet;
use crate::Message;

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Default)]
pub struct RecordList {
    rows: Vec<Row>,
    selected: Option<i64>,
}

impl RecordList {
    /// Replace the rows with a fresh query result.
    /// The selection survives only if its record is still shown.
    pub fn replace(&mut self, datasheets: &[Datasheet]) {
        self.rows = datasheets
            .iter()
            .map(|datasheet| Row {
                id: datasheet.id,
                label: datasheet.to_string(),
            })
            .collect();

        if let Some(id) = self.selected {
            if !self.contains(id) {
                self.selected = None;
            }
        }
    }

    /// Select the row bound to `id`; ignored if no such row is shown
    pub fn select(&mut self, id: i64) {
        if self.contains(id) {
            self.selected = Some(id);
        }
    }

    pub fn selected(&self) -> Option<i64> {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in display order, each bound to its record id
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    fn contains(&self, id: i64) -> bool {
        self.rows.iter().any(|row| row.id == id)
    }

    pub fn view(&self) -> Element<Message> {
        if self.is_empty() {
            return text("No datasheets to show.").size(14).into();
        }

        let rows = Column::with_children(self.rows().iter().map(|row| {
            let style = if self.selected == Some(row.id) {
                button::primary
            } else {
                button::secondary
            };

            button(text(&row.label).size(14))
                .on_press(Message::Select(row.id))
                .style(style)
                .width(Length::Fill)
                .into()
        }))
        .spacing(2);

        column![scrollable(rows).height(Length::Fill)].into()
    }
}
