use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::data::{ComponentType, Datasheet};

/// Errors raised by the catalog database
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("database error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("could not create data directory {}: {source}", .path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no datasheet with id {0}")]
    NotFound(i64),
}

pub type LibraryResult<T> = Result<T, LibraryError>;

const SELECT_COLUMNS: &str = "SELECT id, name, type, filepath FROM datasheets";

/// The Library manages the SQLite catalog of datasheets.
///
/// It holds only the database location. Every operation opens its own
/// connection and drops it before returning, so a failure in one call
/// (disk unplugged, permissions changed) never poisons the next one.
#[derive(Debug, Clone)]
pub struct Library {
    db_path: PathBuf,
}

impl Library {
    /// Create a Library backed by the database file at `db_path`.
    /// Nothing is touched on disk until [`Library::initialize`] runs.
    pub fn at(db_path: impl Into<PathBuf>) -> Self {
        Library {
            db_path: db_path.into(),
        }
    }

    /// Get the default database location.
    ///
    /// - Linux: ~/.local/share/datasheet-viewer/datasheets.db
    /// - macOS: ~/Library/Application Support/datasheet-viewer/datasheets.db
    /// - Windows: %APPDATA%\datasheet-viewer\datasheets.db
    ///
    /// Falls back to the working directory when no home is known.
    pub fn default_db_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push("datasheet-viewer");
        path.push("datasheets.db");
        path
    }

    /// Get the path to the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> LibraryResult<Connection> {
        Ok(Connection::open(&self.db_path)?)
    }

    /// Ensure the data directory and the datasheets table exist.
    /// Safe to call on every start.
    pub fn initialize(&self) -> LibraryResult<()> {
        if let Some(parent) = self.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| LibraryError::DataDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = self.connect()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS datasheets (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL,
                type        TEXT NOT NULL,
                filepath    TEXT NOT NULL
            )",
            [],
        )?;

        log::info!("Catalog ready at {}", self.db_path.display());
        Ok(())
    }

    /// Add a datasheet to the catalog.
    /// Returns the new datasheet ID.
    pub fn add_datasheet(
        &self,
        name: &str,
        component_type: ComponentType,
        filepath: &str,
    ) -> LibraryResult<i64> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO datasheets (name, type, filepath) VALUES (?1, ?2, ?3)",
            params![name, component_type, filepath],
        )?;

        let id = conn.last_insert_rowid();
        log::info!("Added datasheet {} ({}) as id {}", name, component_type, id);
        Ok(id)
    }

    /// Get all datasheets in insertion order
    pub fn get_all_datasheets(&self) -> LibraryResult<Vec<Datasheet>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_COLUMNS))?;
        let rows = stmt.query_map([], datasheet_from_row)?;
        let datasheets = rows.collect::<Result<Vec<_>, _>>()?;

        log::debug!("Loaded {} datasheets", datasheets.len());
        Ok(datasheets)
    }

    /// Datasheets whose name contains `keyword`.
    ///
    /// Matching is a case-sensitive substring test. `instr` is used
    /// instead of LIKE so `%` and `_` in the keyword are literal.
    pub fn search_datasheets(&self, keyword: &str) -> LibraryResult<Vec<Datasheet>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE instr(name, ?1) > 0 ORDER BY id",
            SELECT_COLUMNS
        ))?;
        let rows = stmt.query_map([keyword], datasheet_from_row)?;
        let datasheets = rows.collect::<Result<Vec<_>, _>>()?;

        log::debug!("Search '{}' matched {} datasheets", keyword, datasheets.len());
        Ok(datasheets)
    }

    /// Datasheets of exactly one component type.
    ///
    /// Rows with an unrecognised stored label read back as `Other`,
    /// so the `Other` filter matches them too.
    pub fn get_datasheets_by_type(
        &self,
        component_type: ComponentType,
    ) -> LibraryResult<Vec<Datasheet>> {
        let condition = match component_type {
            ComponentType::Other => format!("(type = ?1 OR {})", unrecognised_type_sql()),
            _ => "type = ?1".to_string(),
        };

        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE {} ORDER BY id",
            SELECT_COLUMNS, condition
        ))?;
        let rows = stmt.query_map([component_type], datasheet_from_row)?;
        let datasheets = rows.collect::<Result<Vec<_>, _>>()?;

        log::debug!("Filter {} matched {} datasheets", component_type, datasheets.len());
        Ok(datasheets)
    }

    /// Look up a single datasheet by ID
    pub fn get_datasheet(&self, id: i64) -> LibraryResult<Option<Datasheet>> {
        let conn = self.connect()?;
        let datasheet = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                [id],
                datasheet_from_row,
            )
            .optional()?;
        Ok(datasheet)
    }

    /// Replace the name and type of an existing datasheet.
    /// The file path is fixed at creation and never changes here.
    ///
    /// Saving as `Other` keeps an unrecognised stored label as it was,
    /// since that label is what was shown as `Other`.
    ///
    /// Fails with [`LibraryError::NotFound`] when `id` is not in the catalog.
    pub fn update_datasheet(
        &self,
        id: i64,
        name: &str,
        component_type: ComponentType,
    ) -> LibraryResult<()> {
        let conn = self.connect()?;
        let changed = conn.execute(
            &format!(
                "UPDATE datasheets
                 SET name = ?1,
                     type = CASE WHEN ?2 = '{}' AND {} THEN type ELSE ?2 END
                 WHERE id = ?3",
                ComponentType::Other,
                unrecognised_type_sql()
            ),
            params![name, component_type, id],
        )?;

        if changed == 0 {
            log::warn!("Update skipped: datasheet {} does not exist", id);
            return Err(LibraryError::NotFound(id));
        }

        log::info!("Updated datasheet {} to {} ({})", id, name, component_type);
        Ok(())
    }

    /// Delete a datasheet.
    ///
    /// Returns `false` when nothing had that ID, so removing twice is harmless.
    pub fn remove_datasheet(&self, id: i64) -> LibraryResult<bool> {
        let conn = self.connect()?;
        let removed = conn.execute("DELETE FROM datasheets WHERE id = ?1", [id])? > 0;

        if removed {
            log::info!("Removed datasheet {}", id);
        } else {
            log::debug!("Remove of datasheet {} was a no-op", id);
        }
        Ok(removed)
    }
}

/// SQL condition true for `type` labels that name no [`ComponentType`]
fn unrecognised_type_sql() -> String {
    let labels: Vec<String> = ComponentType::ALL
        .iter()
        .map(|kind| format!("'{}'", kind.as_str()))
        .collect();
    format!("type NOT IN ({})", labels.join(", "))
}

fn datasheet_from_row(row: &Row<'_>) -> rusqlite::Result<Datasheet> {
    Ok(Datasheet {
        id: row.get(0)?,
        name: row.get(1)?,
        component_type: row.get(2)?,
        filepath: row.get(3)?,
    })
}
