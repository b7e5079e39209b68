/// Column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    /// `DD/MM/YYYY` in the source, normalized to ISO `YYYY-MM-DD` on load
    Date,
    /// `HH:MM` 24-hour wall-clock time, validated and zero-padded on load
    Time,
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub nullable: bool,
}

impl Column {
    /// Create an optional (nullable) column
    pub const fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: true,
        }
    }

    /// Create a required (non-nullable) column
    pub const fn required(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: false,
        }
    }
}

/// Foreign key reference
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
}

impl ForeignKey {
    pub const fn new(
        column: &'static str,
        references_table: &'static str,
        references_column: &'static str,
    ) -> Self {
        Self {
            column,
            references_table,
            references_column,
        }
    }
}

/// Load-time referential filter: fact rows whose key is not present in the
/// parent table are silently dropped (and counted) instead of inserted.
#[derive(Debug, Clone)]
pub struct ReferentialFilter {
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
}

/// Base table schema definition
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    pub source_file: &'static str,
    pub primary_key: &'static str,
    pub columns: &'static [Column],
    pub foreign_keys: &'static [ForeignKey],
    /// Referential filter applied while loading this table, if any
    pub load_filter: Option<ReferentialFilter>,
}

/// Derived view definition: a named, always-live SELECT over base tables.
/// Every read re-evaluates the body, so views never go stale.
#[derive(Debug, Clone)]
pub struct ViewSchema {
    pub name: &'static str,
    /// Columns the view exposes, in projection order
    pub columns: &'static [&'static str],
    /// Base tables the SELECT body reads from
    pub depends_on: &'static [&'static str],
    /// The SELECT body (without the CREATE VIEW prefix)
    pub select_sql: &'static str,
}

impl ViewSchema {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| *c == name)
    }
}
