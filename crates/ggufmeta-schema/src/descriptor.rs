//! Schema descriptors: field name, presence, and expected kind.
//!
//! Every architecture schema is a `&'static [FieldSpec]` evaluated by the one
//! generic validator in [`crate::validate`].

use crate::architecture::Architecture;

/// Whether a field must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// Shape a field must have in the metadata tree.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Any integer or float value.
    Number,
    Bool,
    String,
    /// Integer normalized through the file-type table; unmapped codes drop out.
    FileType,
    /// Nested mapping with its own fields.
    Object(&'static [FieldSpec]),
}

/// One entry of a schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub presence: Presence,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self { name, presence: Presence::Required, kind }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self { name, presence: Presence::Optional, kind }
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }
}

/// Fields of one architecture's parameter block (the block keyed by the
/// architecture name).
#[derive(Debug, Clone, Copy)]
pub struct ArchitectureSchema {
    pub architecture: Architecture,
    pub fields: &'static [FieldSpec],
}

impl ArchitectureSchema {
    /// Key of the parameter block, e.g. `llama`.
    pub fn block(&self) -> &'static str {
        self.architecture.name()
    }

    /// Dotted paths of every required leaf, e.g. `llama.attention.head_count`.
    pub fn required_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_required(self.block(), self.fields, &mut out);
        out
    }
}

fn collect_required(prefix: &str, fields: &[FieldSpec], out: &mut Vec<String>) {
    for field in fields.iter().filter(|f| f.is_required()) {
        let path = format!("{prefix}.{}", field.name);
        match field.kind {
            FieldKind::Object(inner) => collect_required(&path, inner, out),
            _ => out.push(path),
        }
    }
}
