//! metabind core - table metadata loading for relational databases
//!
//! This crate lets a SQL binding layer learn the shape of tables without
//! querying the live database for every statement. It defines:
//!
//! - `Connection`, `DataSource` - where connections come from
//! - `SchemaIntrospection` - the metadata facility a connection exposes
//! - `DatabaseType`, `DialectRegistry` - per-dialect addressing rules
//! - `TableMetadataLoader`, `SchemaMetadataLoader` - the loaders themselves
//! - `TableMetadata`, `SchemaMetadata` - immutable load results

mod connection;
mod dialect;
mod driver;
mod error;
pub mod metadata;
mod schema;

pub use connection::*;
pub use dialect::*;
pub use driver::*;
pub use error::*;
pub use metadata::{
    ColumnLoader, ColumnMetadata, IndexLoader, IndexMetadata, IntrospectionColumnLoader,
    IntrospectionIndexLoader, SchemaMetadata, SchemaMetadataLoader, TableLookup, TableMetadata,
    TableMetadataLoader,
};
pub use schema::*;
