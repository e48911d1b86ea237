//! Checked field values produced by the validator.
//!
//! A [`FieldValue`] tree holds only the fields a schema names, already
//! shape-checked. It is a [`serde::Deserializer`] so the typed records are
//! built from it directly. Floats stay `f64` the whole way, infinities
//! included.

use std::collections::BTreeMap;

use serde::de::value::{Error, MapDeserializer, StrDeserializer, StringDeserializer};
use serde::de::{self, IntoDeserializer, Unexpected, Visitor};
use serde::{Serialize, forward_to_deserialize_any};

use crate::file_type::FileType;
use crate::number::Number;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(Number),
    Bool(bool),
    Text(String),
    FileType(FileType),
    Object(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    pub fn as_object(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    fn unexpected(&self) -> Unexpected<'_> {
        match self {
            Self::Number(Number::Unsigned(v)) => Unexpected::Unsigned(*v),
            Self::Number(Number::Signed(v)) => Unexpected::Signed(*v),
            Self::Number(Number::Float(v)) => Unexpected::Float(*v),
            Self::Bool(b) => Unexpected::Bool(*b),
            Self::Text(s) => Unexpected::Str(s),
            Self::FileType(ft) => Unexpected::Str(ft.as_str()),
            Self::Object(_) => Unexpected::Map,
        }
    }
}

impl<'de> de::Deserializer<'de> for FieldValue {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self {
            Self::Number(Number::Unsigned(v)) => visitor.visit_u64(v),
            Self::Number(Number::Signed(v)) => visitor.visit_i64(v),
            Self::Number(Number::Float(v)) => visitor.visit_f64(v),
            Self::Bool(b) => visitor.visit_bool(b),
            Self::Text(s) => visitor.visit_string(s),
            Self::FileType(ft) => visitor.visit_str(ft.as_str()),
            Self::Object(map) => {
                let mut access: MapDeserializer<'de, _, Error> =
                    MapDeserializer::new(map.into_iter());
                let value = visitor.visit_map(&mut access)?;
                access.end()?;
                Ok(value)
            }
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_some(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        match self {
            Self::Text(s) => visitor.visit_enum(StringDeserializer::<Error>::new(s)),
            Self::FileType(ft) => visitor.visit_enum(StrDeserializer::<Error>::new(ft.as_str())),
            other => Err(de::Error::invalid_type(other.unexpected(), &visitor)),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct newtype_struct seq tuple tuple_struct
        map struct identifier ignored_any
    }
}

impl<'de> IntoDeserializer<'de, Error> for FieldValue {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}
