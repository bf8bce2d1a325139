// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Value marshalling between native types and the host runtime's value model.
//
// The host sees JSON-shaped values: records are objects keyed by camelCase
// names, selectors are integer discriminants, lists are arrays. Optional
// text is three-state: a missing key is absent, `""` is present-but-empty.
// `null` also decodes as absent. Nothing is ever defaulted silently; a
// value of the wrong shape fails the whole conversion.

use rolodex_core::error::{Result, RolodexError};
use rolodex_core::types::{
    Contact, ContactFieldSet, ContactFields, FieldSlot, FieldSlotMut, StringHolder,
};
use serde_json::{Map, Value};

/// Convert a native value into its host representation.
pub trait ToHost {
    fn to_host(&self) -> Value;
}

/// Convert a host value into its native representation.
pub trait FromHost: Sized {
    /// Decode `value`, reporting failures against `path`.
    fn decode(value: &Value, path: &str) -> Result<Self>;

    fn from_host(value: &Value) -> Result<Self> {
        Self::decode(value, "$")
    }
}

/// Host-side name of a value's type, for error messages.
fn host_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(path: &str, expected: &'static str, value: &Value) -> RolodexError {
    RolodexError::TypeMismatch {
        path: path.to_string(),
        expected,
        actual: host_type(value),
    }
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

impl ToHost for Value {
    fn to_host(&self) -> Value {
        self.clone()
    }
}

impl FromHost for Value {
    fn decode(value: &Value, _path: &str) -> Result<Self> {
        Ok(value.clone())
    }
}

impl ToHost for String {
    fn to_host(&self) -> Value {
        Value::String(self.clone())
    }
}

impl FromHost for String {
    fn decode(value: &Value, path: &str) -> Result<Self> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| mismatch(path, "string", value))
    }
}

impl ToHost for usize {
    fn to_host(&self) -> Value {
        Value::from(*self as u64)
    }
}

impl FromHost for usize {
    fn decode(value: &Value, path: &str) -> Result<Self> {
        let n = value
            .as_u64()
            .ok_or_else(|| mismatch(path, "unsigned integer", value))?;
        usize::try_from(n).map_err(|_| RolodexError::TypeMismatch {
            path: path.to_string(),
            expected: "unsigned integer within the platform word size",
            actual: "number",
        })
    }
}

/// Host numbers may arrive as floats (`3.0`); only integral values count.
fn integral(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

// ---------------------------------------------------------------------------
// Sequences
// ---------------------------------------------------------------------------

impl<T: ToHost> ToHost for Vec<T> {
    fn to_host(&self) -> Value {
        Value::Array(self.iter().map(ToHost::to_host).collect())
    }
}

impl<T: FromHost> FromHost for Vec<T> {
    fn decode(value: &Value, path: &str) -> Result<Self> {
        let items = value
            .as_array()
            .ok_or_else(|| mismatch(path, "array", value))?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| T::decode(item, &format!("{path}[{index}]")))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

impl ToHost for ContactFields {
    fn to_host(&self) -> Value {
        Value::from(self.discriminant())
    }
}

impl FromHost for ContactFields {
    fn decode(value: &Value, path: &str) -> Result<Self> {
        let discriminant = integral(value).ok_or_else(|| mismatch(path, "integer", value))?;
        ContactFields::from_discriminant(discriminant)
    }
}

impl ToHost for ContactFieldSet {
    fn to_host(&self) -> Value {
        Value::Array(self.iter().map(|field| field.to_host()).collect())
    }
}

impl FromHost for ContactFieldSet {
    fn decode(value: &Value, path: &str) -> Result<Self> {
        Ok(Vec::<ContactFields>::decode(value, path)?.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

impl ToHost for StringHolder {
    fn to_host(&self) -> Value {
        let mut object = Map::new();
        object.insert("value".into(), Value::String(self.value.clone()));
        Value::Object(object)
    }
}

impl FromHost for StringHolder {
    fn decode(value: &Value, path: &str) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| mismatch(path, "object", value))?;
        let inner = object
            .get("value")
            .ok_or_else(|| RolodexError::MissingField {
                path: path.to_string(),
                record: "StringHolder",
                field: "value",
            })?;
        Ok(Self {
            value: String::decode(inner, &format!("{path}.value"))?,
        })
    }
}

impl ToHost for Contact {
    /// Absent fields are omitted; present-but-empty ones are kept.
    fn to_host(&self) -> Value {
        let mut object = Map::new();
        for field in ContactFields::ALL {
            let encoded = match self.slot(field) {
                FieldSlot::Text(text) => text.as_ref().map(ToHost::to_host),
                FieldSlot::Holders(list) => list.as_ref().map(ToHost::to_host),
            };
            if let Some(encoded) = encoded {
                object.insert(field.host_key().into(), encoded);
            }
        }
        Value::Object(object)
    }
}

impl FromHost for Contact {
    fn decode(value: &Value, path: &str) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| mismatch(path, "object", value))?;

        let mut contact = Contact::default();
        for field in ContactFields::ALL {
            let key = field.host_key();
            let Some(raw) = object.get(key).filter(|raw| !raw.is_null()) else {
                continue;
            };
            let field_path = format!("{path}.{key}");
            match contact.slot_mut(field) {
                FieldSlotMut::Text(slot) => *slot = Some(String::decode(raw, &field_path)?),
                FieldSlotMut::Holders(slot) => {
                    *slot = Some(Vec::<StringHolder>::decode(raw, &field_path)?)
                }
            }
        }
        Ok(contact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolodex_core::error::ErrorKind;
    use serde_json::json;

    fn full_contact() -> Contact {
        Contact {
            first_name: Some("Grace".into()),
            last_name: Some("Hopper".into()),
            middle_name: Some(String::new()),
            phone_numbers: Some(vec![
                StringHolder::new("+1 202 555 0100"),
                StringHolder::new("+1 202 555 0100"),
            ]),
            email_addresses: Some(vec![]),
            image_data: None,
            thumbnail_image_data: Some("iVBORw0KGgo=".into()),
        }
    }

    #[test]
    fn contact_round_trip_keeps_three_states() {
        let contact = full_contact();
        let host = contact.to_host();

        let object = host.as_object().unwrap();
        assert_eq!(object.get("middleName"), Some(&json!("")));
        assert!(!object.contains_key("imageData"));
        assert_eq!(object.get("emailAddresses"), Some(&json!([])));

        assert_eq!(Contact::from_host(&host).unwrap(), contact);
    }

    #[test]
    fn sequences_keep_order_and_duplicates() {
        let host = json!([
            { "value": "b" },
            { "value": "a" },
            { "value": "b" }
        ]);
        let holders = Vec::<StringHolder>::from_host(&host).unwrap();
        let values: Vec<_> = holders.iter().map(|h| h.value.as_str()).collect();
        assert_eq!(values, ["b", "a", "b"]);
    }

    #[test]
    fn null_decodes_as_absent() {
        let contact = Contact::from_host(&json!({ "firstName": null, "lastName": "Byron" })).unwrap();
        assert_eq!(contact.first_name, None);
        assert_eq!(contact.last_name.as_deref(), Some("Byron"));
    }

    #[test]
    fn holder_without_value_fails_whole_record() {
        let host = json!({
            "firstName": "Ada",
            "phoneNumbers": [{ "value": "1" }, { "label": "home" }]
        });
        let err = Contact::from_host(&host).unwrap_err();
        match err {
            RolodexError::MissingField { path, record, field } => {
                assert_eq!(path, "$.phoneNumbers[1]");
                assert_eq!(record, "StringHolder");
                assert_eq!(field, "value");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn sizes_decode_only_from_non_negative_integers() {
        assert_eq!(usize::from_host(&json!(4096)).unwrap(), 4096);
        assert_eq!(usize::from_host(&json!(-1)).unwrap_err().kind(), ErrorKind::Marshal);
        assert_eq!(usize::from_host(&json!(1.5)).unwrap_err().kind(), ErrorKind::Marshal);
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn sizes_beyond_the_word_size_are_rejected() {
        let err = usize::from_host(&json!(u64::MAX)).unwrap_err();
        assert!(matches!(err, RolodexError::TypeMismatch { .. }));
    }

    #[test]
    fn wrong_type_reports_path() {
        let err = Contact::from_host(&json!({ "emailAddresses": "ada@example.com" })).unwrap_err();
        match err {
            RolodexError::TypeMismatch { path, expected, actual } => {
                assert_eq!(path, "$.emailAddresses");
                assert_eq!(expected, "array");
                assert_eq!(actual, "string");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn selectors_decode_from_discriminants() {
        let keys = ContactFieldSet::from_host(&json!([4, 3.0, 4])).unwrap();
        assert_eq!(
            keys.iter().collect::<Vec<_>>(),
            vec![ContactFields::PhoneNumbers, ContactFields::EmailAddresses]
        );
        assert_eq!(keys.to_host(), json!([3, 4]));
    }

    #[test]
    fn unknown_selector_is_a_marshal_error() {
        let err = ContactFieldSet::from_host(&json!([0, 99])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Marshal);

        let err = ContactFields::from_host(&json!(1.5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Marshal);
    }
}
