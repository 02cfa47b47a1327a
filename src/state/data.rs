/// Shared data structures for the application state
///
/// These types represent the data model that flows between
/// the catalog database and the UI layer.
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use std::fmt;
use std::str::FromStr;

/// Kind of electronic component a datasheet describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComponentType {
    #[default]
    Ic,
    Transistor,
    Resistor,
    Capacitor,
    Diode,
    Other,
}

impl ComponentType {
    /// Every component type, in the order the pickers show them
    pub const ALL: [ComponentType; 6] = [
        ComponentType::Ic,
        ComponentType::Transistor,
        ComponentType::Resistor,
        ComponentType::Capacitor,
        ComponentType::Diode,
        ComponentType::Other,
    ];

    /// Label used both on screen and in the `type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Ic => "IC",
            ComponentType::Transistor => "Transistor",
            ComponentType::Resistor => "Resistor",
            ComponentType::Capacitor => "Capacitor",
            ComponentType::Diode => "Diode",
            ComponentType::Other => "Other",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a label does not name any [`ComponentType`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown component type '{0}'")]
pub struct UnknownComponentType(pub String);

impl FromStr for ComponentType {
    type Err = UnknownComponentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownComponentType(s.to_string()))
    }
}

impl ToSql for ComponentType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ComponentType {
    /// Catalogs written by older builds accepted free-text types.
    /// Anything unrecognised is read back as `Other` rather than
    /// making the whole catalog unreadable.
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let label = value.as_str()?;
        Ok(label.parse().unwrap_or_else(|err| {
            log::warn!("{}; treating it as Other", err);
            ComponentType::Other
        }))
    }
}

/// Type filter offered next to the record list.
///
/// `All` is not a component type: it means "no filter" and is
/// resolved by the shell, never sent to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(ComponentType),
}

impl TypeFilter {
    pub const ALL: [TypeFilter; 7] = [
        TypeFilter::All,
        TypeFilter::Only(ComponentType::Ic),
        TypeFilter::Only(ComponentType::Transistor),
        TypeFilter::Only(ComponentType::Resistor),
        TypeFilter::Only(ComponentType::Capacitor),
        TypeFilter::Only(ComponentType::Diode),
        TypeFilter::Only(ComponentType::Other),
    ];
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str("All"),
            TypeFilter::Only(kind) => fmt::Display::fmt(kind, f),
        }
    }
}

/// Represents a single datasheet in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Datasheet {
    /// Unique database ID, assigned on insert
    pub id: i64,
    /// Component identifier (e.g., "LM317")
    pub name: String,
    pub component_type: ComponentType,
    /// Path to the local document. Not checked until it is opened.
    pub filepath: String,
}

impl Datasheet {
    /// Multi-line summary shown by "View Details"
    pub fn details(&self) -> String {
        format!(
            "ID: {}\nName: {}\nType: {}\nFilepath: {}",
            self.id, self.name, self.component_type, self.filepath
        )
    }
}

/// One list line: `id: name (type) - filepath`
impl fmt::Display for Datasheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}) - {}",
            self.id, self.name, self.component_type, self.filepath
        )
    }
}
