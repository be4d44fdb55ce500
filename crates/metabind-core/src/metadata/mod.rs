//! Table and schema metadata, and the loaders that produce it

mod column;
mod index;
mod loader;
mod schema;
mod schema_loader;
mod table;


pub use column::{ColumnLoader, ColumnMetadata, IntrospectionColumnLoader};
pub use index::{IndexLoader, IndexMetadata, IntrospectionIndexLoader};
pub use loader::{TableLookup, TableMetadataLoader};
pub use schema::SchemaMetadata;
pub use schema_loader::SchemaMetadataLoader;
pub use table::TableMetadata;
