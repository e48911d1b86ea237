//! Architecture schemas for decoded GGUF metadata.
//!
//! [`validate`] reads `general.architecture` from a [`MetadataTree`],
//! selects that architecture's schema, checks every field, and returns a
//! [`GgufMetadata`] record. Schemas are static [`FieldSpec`] tables evaluated
//! by one generic validator; adding an architecture means adding a table, a
//! record type, and an [`Architecture`] variant.
//!
//! Validation is pure: no I/O, and the input tree is never modified.
//!
//! [`MetadataTree`]: ggufmeta_reader::MetadataTree

pub mod architecture;
pub mod descriptor;
pub mod error;
pub mod field;
pub mod file_type;
pub mod number;
pub mod record;
pub mod schemas;
pub mod validate;

pub use architecture::Architecture;
pub use descriptor::{ArchitectureSchema, FieldKind, FieldSpec, Presence};
pub use error::{Result, SchemaError};
pub use field::FieldValue;
pub use file_type::FileType;
pub use number::Number;
pub use record::*;
pub use schemas::{GENERAL_FIELDS, schema_for};
pub use validate::{architecture_of, validate, validate_as, validate_block};
