//! Response schemas and validators.
//!
//! Each resource module defines its shapes as serde types; those types are the
//! only definition of what a valid payload looks like. Validators check a raw
//! `serde_json::Value` against them without coercion: a number sent as a
//! string, an enum value outside its closed set, or a missing required field
//! all fail. Nullable fields accept `null` (or absence).

pub mod blog;
pub mod certification;
pub mod common;
pub mod experience;
pub mod project;
mod registry;
pub mod search;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ResourceDomain;

pub use common::{
    BaseRecord, BlogCategory, CertificationCategory, EmploymentType, ListEnvelope, NavEnvelope,
    ProjectStatus, ResourceId, Timestamp,
};
pub use registry::{registry, SchemaEntry, SchemaRegistry, Variant};

/// `true` iff `value` is a JSON object matching `T`.
///
/// serde accepts positional arrays for structs; the object check rules that
/// out.
pub fn conforms<T: DeserializeOwned>(value: &Value) -> bool {
    value.is_object() && T::deserialize(value).is_ok()
}

/// `true` iff `value` is an array whose every element is an object matching
/// `T`. An empty array is valid.
pub fn conforms_array<T: DeserializeOwned>(value: &Value) -> bool {
    value
        .as_array()
        .map(|items| items.iter().all(conforms::<T>))
        .unwrap_or(false)
}

/// Envelope check: the envelope itself must match `T`, and every entry of
/// `items` must be an object.
pub fn conforms_envelope<T: DeserializeOwned>(value: &Value) -> bool {
    entries_are_objects(value, "items") && conforms::<T>(value)
}

pub(crate) fn entries_are_objects(value: &Value, field: &str) -> bool {
    value
        .get(field)
        .and_then(Value::as_array)
        .map(|entries| entries.iter().all(Value::is_object))
        .unwrap_or(false)
}

/// Check `value` against the registered validator for (resource, variant).
/// Pairs without a registered schema never validate.
pub fn validate(resource: ResourceDomain, variant: Variant, value: &Value) -> bool {
    SchemaRegistry::get().validate(resource, variant, value)
}

/// Narrow a value that already passed its validator.
///
/// Returns `None` when the value does not match `T`.
pub fn narrow<T: DeserializeOwned>(value: Value) -> Option<T> {
    serde_json::from_value(value).ok()
}
