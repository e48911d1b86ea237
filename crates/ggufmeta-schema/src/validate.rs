//! Generic schema validator.
//!
//! Walks a [`MetadataTree`] alongside a `&[FieldSpec]` descriptor, checks
//! every field's shape, and produces a [`FieldValue`] object holding only
//! the fields the descriptor names. That object is then deserialized into
//! the typed record for the architecture.

use std::collections::BTreeMap;

use ggufmeta_reader::{GgufValue, MetadataNode, MetadataTree};
use tracing::debug;

use crate::architecture::Architecture;
use crate::descriptor::{FieldKind, FieldSpec};
use crate::error::{Result, SchemaError};
use crate::field::FieldValue;
use crate::file_type::FileType;
use crate::number::Number;
use crate::record::GgufMetadata;
use crate::schemas::{GENERAL_FIELDS, schema_for};

const ARCHITECTURE_KEY: &str = "general.architecture";

/// Validate `tree` against the schema named by `general.architecture`.
///
/// Whisper has a schema but is never selected here; use [`validate_as`].
pub fn validate(tree: &MetadataTree) -> Result<GgufMetadata> {
    let architecture = architecture_of(tree)?;
    if !architecture.is_dispatchable() {
        return Err(SchemaError::UnsupportedArchitecture(architecture.name().to_string()));
    }
    validate_with(tree, architecture)
}

/// Validate `tree` against an explicitly chosen schema.
///
/// `general.architecture` must still be present and name the same
/// architecture.
pub fn validate_as(tree: &MetadataTree, architecture: Architecture) -> Result<GgufMetadata> {
    let declared = architecture_name(tree)?;
    if declared != architecture.name() {
        return Err(SchemaError::validation(
            ARCHITECTURE_KEY,
            format!("expected `{architecture}`, found `{declared}`"),
        ));
    }
    validate_with(tree, architecture)
}

/// Resolve `general.architecture` to a known architecture.
pub fn architecture_of(tree: &MetadataTree) -> Result<Architecture> {
    let name = architecture_name(tree)?;
    Architecture::from_name(name).ok_or_else(|| SchemaError::UnsupportedArchitecture(name.into()))
}

fn architecture_name(tree: &MetadataTree) -> Result<&str> {
    match tree.get(ARCHITECTURE_KEY) {
        None => Err(SchemaError::MissingField(ARCHITECTURE_KEY.to_string())),
        Some(MetadataNode::Value(GgufValue::String(name))) if name.is_empty() => {
            Err(SchemaError::MissingField(ARCHITECTURE_KEY.to_string()))
        }
        Some(MetadataNode::Value(GgufValue::String(name))) => Ok(name.as_str()),
        Some(other) => Err(SchemaError::validation(
            ARCHITECTURE_KEY,
            format!("expected string, found {}", describe(other)),
        )),
    }
}

fn validate_with(tree: &MetadataTree, architecture: Architecture) -> Result<GgufMetadata> {
    let schema = schema_for(architecture);
    let block = schema.block();

    let general = validate_block(require_object(tree, "general")?, GENERAL_FIELDS, "general")?;
    let params = validate_block(require_object(tree, block)?, schema.fields, block)?;

    let root = BTreeMap::from([
        ("general".to_string(), FieldValue::Object(general)),
        (block.to_string(), FieldValue::Object(params)),
    ]);

    debug!(%architecture, "metadata matches architecture schema");
    GgufMetadata::from_validated(architecture, FieldValue::Object(root))
}

fn require_object<'a>(tree: &'a MetadataTree, name: &str) -> Result<&'a MetadataTree> {
    match tree.child(name) {
        Some(MetadataNode::Map(map)) => Ok(map),
        Some(other) => Err(SchemaError::validation(
            name,
            format!("expected mapping, found {}", describe(other)),
        )),
        None => Err(SchemaError::validation(name, "required field is missing")),
    }
}

/// Check every field of `fields` in `tree` and return the recognized ones.
///
/// `path` is the dotted prefix used in error messages. Keys of `tree` not
/// named by `fields` are dropped.
pub fn validate_block(
    tree: &MetadataTree,
    fields: &[FieldSpec],
    path: &str,
) -> Result<BTreeMap<String, FieldValue>> {
    let mut out = BTreeMap::new();
    for field in fields {
        let field_path = format!("{path}.{}", field.name);
        match tree.child(field.name) {
            Some(node) => {
                if let Some(value) = check_field(node, field.kind, &field_path)? {
                    out.insert(field.name.to_string(), value);
                }
            }
            None if field.is_required() => {
                return Err(SchemaError::validation(field_path, "required field is missing"));
            }
            None => {}
        }
    }
    Ok(out)
}

/// `Ok(None)` means the field normalizes to unset.
fn check_field(node: &MetadataNode, kind: FieldKind, path: &str) -> Result<Option<FieldValue>> {
    let mismatch = |expected: &str| {
        SchemaError::validation(path, format!("expected {expected}, found {}", describe(node)))
    };

    match kind {
        FieldKind::Object(inner) => {
            let map = node.as_map().ok_or_else(|| mismatch("mapping"))?;
            validate_block(map, inner, path).map(|m| Some(FieldValue::Object(m)))
        }
        FieldKind::Number => {
            let number =
                node.as_value().and_then(Number::from_value).ok_or_else(|| mismatch("number"))?;
            if number.is_nan() {
                return Err(SchemaError::validation(path, "expected number, found NaN"));
            }
            Ok(Some(FieldValue::Number(number)))
        }
        FieldKind::Bool => match node.as_value() {
            Some(GgufValue::Bool(b)) => Ok(Some(FieldValue::Bool(*b))),
            _ => Err(mismatch("bool")),
        },
        FieldKind::String => match node.as_value() {
            Some(GgufValue::String(s)) => Ok(Some(FieldValue::Text(s.clone()))),
            _ => Err(mismatch("string")),
        },
        FieldKind::FileType => {
            let file_type =
                node.as_value().and_then(GgufValue::as_u64).and_then(FileType::from_code);
            match file_type {
                Some(ft) => Ok(Some(FieldValue::FileType(ft))),
                None => {
                    debug!(path, value = ?node, "unmapped file type, leaving unset");
                    Ok(None)
                }
            }
        }
    }
}

fn describe(node: &MetadataNode) -> &'static str {
    match node {
        MetadataNode::Map(_) => "mapping",
        MetadataNode::Value(GgufValue::Bool(_)) => "bool",
        MetadataNode::Value(GgufValue::String(_)) => "string",
        MetadataNode::Value(GgufValue::Array(..)) => "array",
        MetadataNode::Value(v) if v.is_numeric() => "number",
        MetadataNode::Value(_) => "value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(entries: &[(&str, GgufValue)]) -> MetadataTree {
        let mut t = MetadataTree::new();
        for (k, v) in entries {
            t.insert(k, v.clone()).unwrap();
        }
        t
    }

    const SAMPLE: &[FieldSpec] = &[
        FieldSpec::required("count", FieldKind::Number),
        FieldSpec::optional("flag", FieldKind::Bool),
        FieldSpec::optional("kind", FieldKind::FileType),
    ];

    #[test]
    fn unknown_keys_are_dropped() {
        let t = tree(&[("count", GgufValue::U32(3)), ("extra", GgufValue::Bool(true))]);
        let out = validate_block(&t, SAMPLE, "x").unwrap();
        assert_eq!(serde_json::to_value(&out).unwrap(), serde_json::json!({ "count": 3 }));
    }

    #[test]
    fn missing_required_names_the_path() {
        let err = validate_block(&MetadataTree::new(), SAMPLE, "x").unwrap_err();
        assert_eq!(err.path(), Some("x.count"));
    }

    #[test]
    fn wrong_type_is_reported() {
        let t = tree(&[("count", GgufValue::String("3".into()))]);
        let err = validate_block(&t, SAMPLE, "x").unwrap_err();
        assert_eq!(err.to_string(), "invalid metadata at `x.count`: expected number, found string");
    }

    #[test]
    fn optional_field_with_wrong_type_is_rejected() {
        let t = tree(&[("count", GgufValue::U8(1)), ("flag", GgufValue::U8(1))]);
        let err = validate_block(&t, SAMPLE, "x").unwrap_err();
        assert_eq!(err.path(), Some("x.flag"));
    }

    #[test]
    fn nan_is_rejected_but_infinity_is_a_number() {
        let t = tree(&[("count", GgufValue::F32(f32::NAN))]);
        let err = validate_block(&t, SAMPLE, "x").unwrap_err();
        assert_eq!(err.to_string(), "invalid metadata at `x.count`: expected number, found NaN");

        for inf in [f64::INFINITY, f64::NEG_INFINITY] {
            let t = tree(&[("count", GgufValue::F64(inf))]);
            let out = validate_block(&t, SAMPLE, "x").unwrap();
            assert_eq!(out["count"], FieldValue::Number(Number::Float(inf)));
        }
    }

    #[test]
    fn file_type_is_normalized_or_unset() {
        let known = tree(&[("count", GgufValue::U8(1)), ("kind", GgufValue::U32(7))]);
        let out = validate_block(&known, SAMPLE, "x").unwrap();
        assert_eq!(out["kind"], FieldValue::FileType(FileType::MostlyQ8_0));

        for odd in [GgufValue::U32(99), GgufValue::I32(-1), GgufValue::String("q4".into())] {
            let t = tree(&[("count", GgufValue::U8(1)), ("kind", odd)]);
            let out = validate_block(&t, SAMPLE, "x").unwrap();
            assert!(!out.contains_key("kind"));
        }
    }

    #[test]
    fn architecture_lookup() {
        assert_eq!(
            architecture_of(&MetadataTree::new()),
            Err(SchemaError::MissingField("general.architecture".into()))
        );
        let empty = tree(&[("general.architecture", GgufValue::String(String::new()))]);
        assert!(matches!(architecture_of(&empty), Err(SchemaError::MissingField(_))));
        let numeric = tree(&[("general.architecture", GgufValue::U32(1))]);
        assert!(matches!(architecture_of(&numeric), Err(SchemaError::Validation { .. })));
        let unknown = tree(&[("general.architecture", GgufValue::String("mamba".into()))]);
        assert_eq!(
            architecture_of(&unknown),
            Err(SchemaError::UnsupportedArchitecture("mamba".into()))
        );
    }

    #[test]
    fn whisper_is_not_dispatched() {
        let t = tree(&[("general.architecture", GgufValue::String("whisper".into()))]);
        assert_eq!(validate(&t), Err(SchemaError::UnsupportedArchitecture("whisper".into())));
    }

    #[test]
    fn validate_as_requires_matching_architecture() {
        let t = tree(&[("general.architecture", GgufValue::String("llama".into()))]);
        let err = validate_as(&t, Architecture::Whisper).unwrap_err();
        assert_eq!(err.path(), Some("general.architecture"));
    }

    #[test]
    fn architecture_block_must_be_a_mapping() {
        let t = tree(&[
            ("general.architecture", GgufValue::String("gpt2".into())),
            ("gpt2", GgufValue::U32(1)),
        ]);
        let err = validate(&t).unwrap_err();
        assert_eq!(err.to_string(), "invalid metadata at `gpt2`: expected mapping, found number");
    }
}
