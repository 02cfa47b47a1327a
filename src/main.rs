use iced::widget::{button, column, container, pick_list, row, text, text_input, Column};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;

mod error;
mod launch;
mod state;
mod ui;

use error::{AppError, InputError};
use state::data::{ComponentType, Datasheet, TypeFilter};
use state::library::{Library, LibraryError};
use state::settings::Settings;
use ui::editor::EditForm;
use ui::list::RecordList;

/// Main application state
struct DatasheetViewer {
    /// The datasheet catalog
    library: Library,
    settings: Settings,
    /// "Name" entry, used by Add and Search Online
    name: String,
    component_type: ComponentType,
    /// "Search in Database" entry
    keyword: String,
    filter: TypeFilter,
    list: RecordList,
    /// Open while a datasheet is being edited
    editor: Option<EditForm>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    NameChanged(String),
    TypeSelected(ComponentType),
    KeywordChanged(String),
    FilterSelected(TypeFilter),
    /// A row of the record list was clicked
    Select(i64),
    SearchOnline,
    OpenLocal,
    AddToDatabase,
    RemoveSelected,
    EditSelected,
    ViewDetails,
    SearchLocal,
    ApplyFilter,
    EditNameChanged(String),
    EditTypeSelected(ComponentType),
    SaveEdit,
    CancelEdit,
    About,
    Exit,
}

impl DatasheetViewer {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let settings = Settings::load().unwrap_or_else(|err| {
            log::warn!("{}; using default settings", err);
            Settings::default()
        });
        let library = Library::at(settings.database_path());

        let mut app = DatasheetViewer::with_library(library, settings);

        // Startup failures only go to the status line; each later
        // action opens its own connection and retries.
        let startup = app
            .library
            .initialize()
            .map_err(AppError::from)
            .and_then(|()| app.refresh());
        if let Err(err) = startup {
            log::error!("Catalog unavailable at start: {}", err);
            app.status = err.to_string();
        } else {
            log::info!(
                "Datasheet Viewer started with {} datasheets from {}",
                app.list.len(),
                app.library.path().display()
            );
        }

        (app, Task::none())
    }

    fn with_library(library: Library, settings: Settings) -> Self {
        DatasheetViewer {
            library,
            settings,
            name: String::new(),
            component_type: ComponentType::default(),
            keyword: String::new(),
            filter: TypeFilter::default(),
            list: RecordList::default(),
            editor: None,
            status: "Ready.".to_string(),
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let result = match message {
            Message::NameChanged(name) => {
                self.name = name;
                Ok(())
            }
            Message::TypeSelected(component_type) => {
                self.component_type = component_type;
                Ok(())
            }
            Message::KeywordChanged(keyword) => {
                self.keyword = keyword;
                Ok(())
            }
            Message::FilterSelected(filter) => {
                self.filter = filter;
                Ok(())
            }
            Message::Select(id) => {
                self.list.select(id);
                Ok(())
            }
            Message::SearchOnline => self
                .online_search_url()
                .and_then(|url| launch::open_url(&url)),
            Message::OpenLocal => self
                .selected_file()
                .and_then(|path| launch::open_file(&path)),
            Message::AddToDatabase => self.add_to_database(),
            Message::RemoveSelected => self.remove_selected(),
            Message::EditSelected => self.begin_edit(),
            Message::ViewDetails => self
                .selected_details()
                .map(|details| ui::dialog::info("Datasheet Details", &details)),
            Message::SearchLocal => self.search_local(),
            Message::ApplyFilter => self.apply_filter(),
            Message::EditNameChanged(name) => {
                if let Some(form) = self.editor.as_mut() {
                    form.name = name;
                }
                Ok(())
            }
            Message::EditTypeSelected(component_type) => {
                if let Some(form) = self.editor.as_mut() {
                    form.component_type = component_type;
                }
                Ok(())
            }
            Message::SaveEdit => self.save_edit(),
            Message::CancelEdit => {
                self.editor = None;
                Ok(())
            }
            Message::About => {
                ui::dialog::info("About Datasheet Viewer", &about_text());
                Ok(())
            }
            Message::Exit => {
                log::info!("Exiting");
                return iced::exit();
            }
        };

        if let Err(err) = result {
            self.status = err.to_string();
            ui::dialog::report(&err);
        }

        Task::none()
    }

    /// Re-render the list from every datasheet in the catalog
    fn refresh(&mut self) -> Result<(), AppError> {
        let datasheets = self.library.get_all_datasheets()?;
        self.show(&datasheets);
        self.status = format!("{} datasheets in catalog.", datasheets.len());
        Ok(())
    }

    fn show(&mut self, datasheets: &[Datasheet]) {
        self.list.replace(datasheets);
    }

    fn require_selection(&self) -> Result<i64, AppError> {
        self.list
            .selected()
            .ok_or(AppError::Input(InputError::NoSelection))
    }

    fn selected_datasheet(&self) -> Result<Datasheet, AppError> {
        let id = self.require_selection()?;
        self.library
            .get_datasheet(id)?
            .ok_or(AppError::Storage(LibraryError::NotFound(id)))
    }

    fn online_search_url(&self) -> Result<String, AppError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(InputError::MissingName.into());
        }
        Ok(launch::search_url(&self.settings.search_url, name))
    }

    /// Path of the selected datasheet, if the file is still there
    fn selected_file(&self) -> Result<PathBuf, AppError> {
        let datasheet = self.selected_datasheet()?;
        launch::existing_file(&datasheet.filepath)
    }

    fn selected_details(&self) -> Result<String, AppError> {
        Ok(self.selected_datasheet()?.details())
    }

    /// Ask for the datasheet file, then add it under the entered name
    fn add_to_database(&mut self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(InputError::MissingDetails.into());
        }

        let file = FileDialog::new()
            .set_title("Select Datasheet")
            .add_filter("PDF files", &["pdf"])
            .add_filter("All files", &["*"])
            .pick_file();

        self.add_datasheet(file).map(|_| ())
    }

    fn add_datasheet(&mut self, file: Option<PathBuf>) -> Result<i64, AppError> {
        let name = self.name.trim();
        let file = match file {
            Some(file) if !name.is_empty() => file,
            _ => return Err(InputError::MissingDetails.into()),
        };

        let filepath = file.to_string_lossy();
        let id = self
            .library
            .add_datasheet(name, self.component_type, &filepath)?;

        self.refresh()?;
        self.list.select(id);
        self.status = format!("Added datasheet {}.", id);
        Ok(id)
    }

    fn remove_selected(&mut self) -> Result<(), AppError> {
        let id = self.require_selection()?;
        let removed = self.library.remove_datasheet(id)?;

        if self.editor.as_ref().is_some_and(|form| form.id == id) {
            self.editor = None;
        }

        self.refresh()?;
        self.status = if removed {
            format!("Removed datasheet {}.", id)
        } else {
            format!("Datasheet {} was already removed.", id)
        };
        Ok(())
    }

    /// Open the edit form for the selected datasheet
    fn begin_edit(&mut self) -> Result<(), AppError> {
        let datasheet = self.selected_datasheet()?;
        self.editor = Some(EditForm::new(datasheet));
        Ok(())
    }

    fn save_edit(&mut self) -> Result<(), AppError> {
        let form = self
            .editor
            .as_ref()
            .ok_or(AppError::Input(InputError::NoSelection))?;
        let id = form.id;
        let (name, component_type) = form.validate()?;

        self.library.update_datasheet(id, name, component_type)?;

        self.editor = None;
        self.refresh()?;
        self.status = format!("Updated datasheet {}.", id);
        Ok(())
    }

    fn search_local(&mut self) -> Result<(), AppError> {
        let keyword = self.keyword.trim();
        if keyword.is_empty() {
            return Err(InputError::EmptyKeyword.into());
        }

        let datasheets = self.library.search_datasheets(keyword)?;
        self.status = format!("{} datasheets match '{}'.", datasheets.len(), keyword);
        self.show(&datasheets);
        Ok(())
    }

    /// `All` lists everything; any other choice asks the store for that type
    fn apply_filter(&mut self) -> Result<(), AppError> {
        match self.filter {
            TypeFilter::All => self.refresh(),
            TypeFilter::Only(component_type) => {
                let datasheets = self.library.get_datasheets_by_type(component_type)?;
                self.show(&datasheets);
                self.status = format!("{} {} datasheets.", datasheets.len(), component_type);
                Ok(())
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let menu = row![
            button("Exit").on_press(Message::Exit).style(button::secondary),
            button("About").on_press(Message::About).style(button::secondary),
        ]
        .spacing(4);

        let body: Element<Message> = match &self.editor {
            Some(form) => container(form.view())
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
            None => self.catalog_view(),
        };

        column![menu, body].spacing(10).padding(10).into()
    }

    fn catalog_view(&self) -> Element<Message> {
        let label_width = Length::Fixed(150.0);
        let input_width = Length::Fixed(300.0);

        let inputs = column![
            row![
                text("Name:").width(label_width),
                text_input("Component name", &self.name)
                    .on_input(Message::NameChanged)
                    .padding(6)
                    .width(input_width),
            ]
            .align_y(Alignment::Center),
            row![
                text("Type:").width(label_width),
                pick_list(
                    ComponentType::ALL,
                    Some(self.component_type),
                    Message::TypeSelected
                )
                .width(input_width),
            ]
            .align_y(Alignment::Center),
        ]
        .spacing(8);

        let actions = column![
            row![
                action_button("Search Online", Message::SearchOnline),
                action_button("Open Local", Message::OpenLocal),
            ]
            .spacing(8),
            row![
                action_button("Add to Database", Message::AddToDatabase),
                action_button("Remove from Database", Message::RemoveSelected),
            ]
            .spacing(8),
            row![
                action_button("Edit Selected", Message::EditSelected),
                action_button("View Details", Message::ViewDetails),
            ]
            .spacing(8),
        ]
        .spacing(8);

        let search = column![
            row![
                text("Search in Database:").width(label_width),
                text_input("Keyword", &self.keyword)
                    .on_input(Message::KeywordChanged)
                    .on_submit(Message::SearchLocal)
                    .padding(6)
                    .width(input_width),
                button("Search").on_press(Message::SearchLocal),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
            row![
                text("Filter by Type:").width(label_width),
                pick_list(TypeFilter::ALL, Some(self.filter), Message::FilterSelected)
                    .width(input_width),
                button("Filter").on_press(Message::ApplyFilter),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
        ]
        .spacing(8);

        let content: Column<Message> = column![
            inputs,
            actions,
            search,
            text(format!("Available Datasheets ({}):", self.list.len())).size(18),
            container(self.list.view()).height(Length::Fill),
            text(&self.status).size(14),
            button("Quit").on_press(Message::Exit).padding(8),
        ]
        .spacing(16)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        if self.settings.dark_theme {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

fn action_button(label: &str, message: Message) -> Element<Message> {
    button(text(label.to_string()))
        .on_press(message)
        .padding(8)
        .width(Length::Fixed(200.0))
        .into()
}

/// Name, version and who to contact about the app
fn about_text() -> String {
    format!(
        "Datasheet Viewer {}\n{}\n\nDeveloped by: {}",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_AUTHORS").replace(':', ", ")
    )
}

/// Send logs to a file under the local data directory,
/// or to stderr if that file can't be opened
fn setup_logging() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    match open_log_file() {
        Ok((file, path)) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            builder.init();
            log::info!("Logging initialized, writing to: {}", path.display());
        }
        Err(err) => {
            builder.init();
            log::warn!("Could not open log file, logging to stderr: {}", err);
        }
    }
}

fn open_log_file() -> std::io::Result<(File, PathBuf)> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("datasheet-viewer")
        .join("logs");
    fs::create_dir_all(&log_dir)?;

    let path = log_dir.join("datasheet-viewer.log");
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((file, path))
}

fn main() -> iced::Result {
    setup_logging();

    iced::application(
        "Datasheet Viewer",
        DatasheetViewer::update,
        DatasheetViewer::view,
    )
    .theme(DatasheetViewer::theme)
    .window_size((760.0, 820.0))
    .centered()
    .run_with(DatasheetViewer::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_app() -> (TempDir, DatasheetViewer) {
        let dir = TempDir::new().unwrap();
        let library = Library::at(dir.path().join("datasheets.db"));
        library.initialize().unwrap();
        let mut app = DatasheetViewer::with_library(library, Settings::default());
        app.refresh().unwrap();
        (dir, app)
    }

    fn add(app: &mut DatasheetViewer, name: &str, component_type: ComponentType, file: &str) -> i64 {
        app.name = name.to_string();
        app.component_type = component_type;
        app.add_datasheet(Some(PathBuf::from(file))).unwrap()
    }

    fn shown_ids(app: &DatasheetViewer) -> Vec<i64> {
        app.list.rows().iter().map(|row| row.id).collect()
    }

    #[test]
    fn test_add_requires_name_and_file() {
        let (_dir, mut app) = test_app();

        let err = app.add_datasheet(Some(PathBuf::from("/docs/x.pdf"))).unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::MissingDetails)));

        app.name = "LM317".to_string();
        let err = app.add_datasheet(None).unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::MissingDetails)));

        assert!(app.list.is_empty());
    }

    #[test]
    fn test_add_selects_new_row() {
        let (_dir, mut app) = test_app();

        let id = add(&mut app, " LM317 ", ComponentType::Ic, "/docs/lm317.pdf");

        assert_eq!(app.list.selected(), Some(id));
        assert_eq!(app.list.rows()[0].label, "1: LM317 (IC) - /docs/lm317.pdf");
    }

    #[test]
    fn test_actions_need_a_selection() {
        let (_dir, mut app) = test_app();
        add(&mut app, "LM317", ComponentType::Ic, "/docs/lm317.pdf");
        app.list = RecordList::default();

        for err in [
            app.remove_selected().unwrap_err(),
            app.begin_edit().unwrap_err(),
            app.selected_details().unwrap_err(),
            app.selected_file().unwrap_err(),
        ] {
            assert!(matches!(err, AppError::Input(InputError::NoSelection)));
        }
    }

    #[test]
    fn test_remove_selected() {
        let (_dir, mut app) = test_app();
        let keep = add(&mut app, "LM317", ComponentType::Ic, "/docs/lm317.pdf");
        let gone = add(&mut app, "BC547", ComponentType::Transistor, "/docs/bc547.pdf");

        app.list.select(gone);
        app.remove_selected().unwrap();

        assert_eq!(shown_ids(&app), vec![keep]);
        assert_eq!(app.list.selected(), None);
    }

    #[test]
    fn test_edit_updates_name_and_type() {
        let (_dir, mut app) = test_app();
        let id = add(&mut app, "LM317", ComponentType::Other, "/docs/lm317.pdf");

        app.list.select(id);
        app.begin_edit().unwrap();
        let form = app.editor.as_mut().unwrap();
        assert_eq!(form.name, "LM317");
        form.name = "LM317T".to_string();
        form.component_type = ComponentType::Ic;

        app.save_edit().unwrap();

        assert!(app.editor.is_none());
        assert_eq!(app.list.rows()[0].label, "1: LM317T (IC) - /docs/lm317.pdf");
    }

    #[test]
    fn test_edit_with_blank_name_keeps_form_open() {
        let (_dir, mut app) = test_app();
        let id = add(&mut app, "LM317", ComponentType::Ic, "/docs/lm317.pdf");

        app.list.select(id);
        app.begin_edit().unwrap();
        app.editor.as_mut().unwrap().name = "  ".to_string();

        let err = app.save_edit().unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::MissingDetails)));
        assert!(app.editor.is_some());
        assert_eq!(app.library.get_datasheet(id).unwrap().unwrap().name, "LM317");
    }

    #[test]
    fn test_edit_of_removed_record_is_not_found() {
        let (_dir, mut app) = test_app();
        let id = add(&mut app, "LM317", ComponentType::Ic, "/docs/lm317.pdf");
        app.list.select(id);
        app.begin_edit().unwrap();

        app.library.remove_datasheet(id).unwrap();

        let err = app.save_edit().unwrap_err();
        assert!(matches!(err, AppError::Storage(LibraryError::NotFound(i)) if i == id));
    }

    #[test]
    fn test_search_local() {
        let (_dir, mut app) = test_app();
        let lm317 = add(&mut app, "LM317", ComponentType::Ic, "a.pdf");
        add(&mut app, "NE555", ComponentType::Ic, "b.pdf");
        let lm7805 = add(&mut app, "LM7805", ComponentType::Ic, "c.pdf");

        app.keyword = "   ".to_string();
        let err = app.search_local().unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::EmptyKeyword)));
        assert_eq!(app.list.len(), 3);

        app.keyword = "LM".to_string();
        app.search_local().unwrap();
        assert_eq!(shown_ids(&app), vec![lm317, lm7805]);
    }

    #[test]
    fn test_filter_all_and_by_type() {
        let (_dir, mut app) = test_app();
        add(&mut app, "LM317", ComponentType::Ic, "a.pdf");
        let diode = add(&mut app, "1N4148", ComponentType::Diode, "b.pdf");

        app.filter = TypeFilter::Only(ComponentType::Diode);
        app.apply_filter().unwrap();
        assert_eq!(shown_ids(&app), vec![diode]);

        app.filter = TypeFilter::All;
        app.apply_filter().unwrap();
        assert_eq!(app.list.len(), 2);
    }

    #[test]
    fn test_view_details_of_selection() {
        let (_dir, mut app) = test_app();
        let id = add(&mut app, "LM317", ComponentType::Ic, "/docs/lm317.pdf");
        app.list.select(id);

        assert_eq!(
            app.selected_details().unwrap(),
            "ID: 1\nName: LM317\nType: IC\nFilepath: /docs/lm317.pdf"
        );
    }

    #[test]
    fn test_open_local_checks_file_exists() {
        let (dir, mut app) = test_app();
        let pdf = dir.path().join("lm317.pdf");
        fs::write(&pdf, b"%PDF-1.4").unwrap();

        let present = add(&mut app, "LM317", ComponentType::Ic, pdf.to_str().unwrap());
        let missing = add(&mut app, "LM318", ComponentType::Ic, "/nowhere/lm318.pdf");

        app.list.select(present);
        assert_eq!(app.selected_file().unwrap(), pdf);

        app.list.select(missing);
        assert!(matches!(app.selected_file().unwrap_err(), AppError::FileNotFound(_)));
    }

    #[test]
    fn test_online_search_needs_a_name() {
        let (_dir, mut app) = test_app();

        let err = app.online_search_url().unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::MissingName)));

        app.name = "2N3904".to_string();
        assert_eq!(
            app.online_search_url().unwrap(),
            "https://www.datasheetarchive.com/2N3904-datasheet.html"
        );
    }

    #[test]
    fn test_about_names_version_and_authors() {
        let about = about_text();
        assert!(about.starts_with(&format!("Datasheet Viewer {}", env!("CARGO_PKG_VERSION"))));
        assert!(about.contains("Developed by: Datasheet Viewer contributors"));
    }

    #[test]
    fn test_storage_failure_is_reported_as_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"not a directory").unwrap();

        let library = Library::at(blocker.join("datasheets.db"));
        let mut app = DatasheetViewer::with_library(library, Settings::default());

        let err = app.refresh().unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(err.title(), "Storage Error");
    }
}
