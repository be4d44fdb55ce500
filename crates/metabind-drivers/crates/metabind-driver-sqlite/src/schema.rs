//! SQLite schema introspection
//!
//! SQLite has no schemas. Attached databases ("main", "temp", ...) play the
//! role of catalogs, so the catalog qualifier picks the database whose
//! `sqlite_master` is read and the schema qualifier is ignored.

use metabind_core::{
    BufferedCursor, ColumnInfo, DatabaseType, IndexColumnInfo, MetadataCursor, PrimaryKeyColumn,
    Result, SchemaIntrospection, TableInfo, TableType,
};
use rusqlite::params;

use crate::SqliteConnection;
use crate::connection::MAIN_CATALOG;

impl SchemaIntrospection for SqliteConnection {
    #[tracing::instrument(skip(self))]
    fn tables(
        &self,
        catalog: Option<&str>,
        _schema: Option<&str>,
        table_name: Option<&str>,
        types: Option<&[TableType]>,
    ) -> Result<Box<dyn MetadataCursor<TableInfo> + '_>> {
        let catalog = catalog.unwrap_or(MAIN_CATALOG);
        let mut sql = format!(
            "SELECT name, type FROM {}.sqlite_master \
             WHERE type IN ('table', 'view') AND name NOT GLOB 'sqlite_*'",
            quote(catalog)
        );
        if table_name.is_some() {
            sql.push_str(" AND name = ?1 COLLATE NOCASE");
        }
        sql.push_str(" ORDER BY name");

        let rows: Vec<(String, String)> = self.with_connection(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let map_row = |row: &rusqlite::Row<'_>| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            };
            match table_name {
                Some(name) => stmt.query_map(params![name], map_row)?.collect(),
                None => stmt.query_map([], map_row)?.collect(),
            }
        })?;

        let tables: Vec<TableInfo> = rows
            .into_iter()
            .map(|(name, kind)| TableInfo {
                catalog: Some(catalog.to_string()),
                schema: None,
                name,
                table_type: if kind == "view" {
                    TableType::View
                } else if catalog == "temp" {
                    TableType::Temporary
                } else {
                    TableType::Table
                },
            })
            .filter(|table| types.is_none_or(|types| types.contains(&table.table_type)))
            .collect();

        tracing::trace!(table_count = tables.len(), "tables listed");
        Ok(Box::new(BufferedCursor::new(tables)))
    }

    #[tracing::instrument(skip(self))]
    fn columns(
        &self,
        catalog: Option<&str>,
        _schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<ColumnInfo>> {
        let catalog = catalog.unwrap_or(MAIN_CATALOG);
        let rows = self.table_info(catalog, table)?;
        let pk_count = rows.iter().filter(|row| row.pk > 0).count();

        Ok(rows
            .into_iter()
            .map(|row| {
                // A lone INTEGER PRIMARY KEY aliases the rowid and is assigned by SQLite.
                let is_auto_increment =
                    row.pk > 0 && pk_count == 1 && row.data_type.eq_ignore_ascii_case("INTEGER");
                ColumnInfo {
                    table: table.to_string(),
                    ordinal: row.cid + 1,
                    nullable: !row.not_null && row.pk == 0,
                    is_auto_increment,
                    case_sensitive: affinity(&row.data_type) == Affinity::Text,
                    name: row.name,
                    data_type: row.data_type,
                }
            })
            .collect())
    }

    #[tracing::instrument(skip(self))]
    fn primary_keys(
        &self,
        catalog: Option<&str>,
        _schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<PrimaryKeyColumn>> {
        let catalog = catalog.unwrap_or(MAIN_CATALOG);
        let mut keys: Vec<PrimaryKeyColumn> = self
            .table_info(catalog, table)?
            .into_iter()
            .filter(|row| row.pk > 0)
            .map(|row| PrimaryKeyColumn {
                table: table.to_string(),
                column: row.name,
                key_sequence: row.pk,
                constraint_name: None,
            })
            .collect();
        keys.sort_by_key(|key| key.key_sequence);
        Ok(keys)
    }

    #[tracing::instrument(skip(self))]
    fn index_info(
        &self,
        catalog: Option<&str>,
        _schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<IndexColumnInfo>> {
        let catalog = catalog.unwrap_or(MAIN_CATALOG);
        self.with_connection(|conn| {
            let mut list = conn.prepare(
                "SELECT name, \"unique\" FROM pragma_index_list(?1, ?2) ORDER BY seq",
            )?;
            let indexes = list
                .query_map(params![table, catalog], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? != 0))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            let mut info = conn.prepare(
                "SELECT seqno, name FROM pragma_index_info(?1, ?2) ORDER BY seqno",
            )?;
            let mut entries = Vec::new();
            for (index_name, unique) in indexes {
                let columns = info
                    .query_map(params![index_name, catalog], |row| {
                        Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?))
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                for (seqno, column) in columns {
                    entries.push(IndexColumnInfo {
                        table: table.to_string(),
                        index_name: Some(index_name.clone()),
                        column,
                        non_unique: !unique,
                        ordinal: seqno as usize + 1,
                    });
                }
            }
            Ok(entries)
        })
    }
}

/// One row of `pragma_table_info`
struct TableInfoRow {
    cid: usize,
    name: String,
    data_type: String,
    not_null: bool,
    /// Position within the primary key, 0 when not part of it
    pk: usize,
}

impl SqliteConnection {
    fn table_info(&self, catalog: &str, table: &str) -> Result<Vec<TableInfoRow>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT cid, name, type, \"notnull\", pk FROM pragma_table_info(?1, ?2) ORDER BY cid",
            )?;
            stmt.query_map(params![table, catalog], |row| {
                Ok(TableInfoRow {
                    cid: row.get::<_, i64>(0)? as usize,
                    name: row.get(1)?,
                    data_type: row.get(2)?,
                    not_null: row.get::<_, i64>(3)? != 0,
                    pk: row.get::<_, i64>(4)? as usize,
                })
            })?
            .collect()
        })
    }
}

fn quote(identifier: &str) -> String {
    DatabaseType::Sqlite.profile().quote_identifier(identifier)
}

#[derive(Debug, PartialEq, Eq)]
enum Affinity {
    Integer,
    Text,
    Blob,
    Real,
    Numeric,
}

/// Column affinity from a declared type, following SQLite's rules in order
fn affinity(declared: &str) -> Affinity {
    let declared = declared.to_ascii_uppercase();
    if declared.contains("INT") {
        Affinity::Integer
    } else if ["CHAR", "CLOB", "TEXT"].iter().any(|t| declared.contains(t)) {
        Affinity::Text
    } else if declared.is_empty() || declared.contains("BLOB") {
        Affinity::Blob
    } else if ["REAL", "FLOA", "DOUB"].iter().any(|t| declared.contains(t)) {
        Affinity::Real
    } else {
        Affinity::Numeric
    }
}
