// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Rolodex contacts bridge.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, RolodexError};

/// Unique identifier for a single bridged call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallId(pub Uuid);

impl CallId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Selectable attributes of a [`Contact`].
///
/// The discriminants are part of the cross-runtime contract and must never
/// be renumbered. New cases are appended. Serde uses the upper-case names
/// (`PHONE_NUMBERS`), which is how `BridgeConfig::default_fields` lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum ContactFields {
    FirstName = 0,
    LastName = 1,
    MiddleName = 2,
    PhoneNumbers = 3,
    EmailAddresses = 4,
    ImageData = 5,
    ThumbnailImageData = 6,
}

impl ContactFields {
    /// Every case, in discriminant order.
    pub const ALL: [ContactFields; 7] = [
        Self::FirstName,
        Self::LastName,
        Self::MiddleName,
        Self::PhoneNumbers,
        Self::EmailAddresses,
        Self::ImageData,
        Self::ThumbnailImageData,
    ];

    /// Stable integer discriminant used on the wire.
    pub fn discriminant(self) -> u8 {
        self as u8
    }

    /// Validate a wire discriminant. Unknown values are an error, never a
    /// default case.
    pub fn from_discriminant(value: i64) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|field| i64::from(field.discriminant()) == value)
            .ok_or(RolodexError::UnknownDiscriminant {
                type_name: "ContactFields",
                value,
            })
    }

    /// Key under which this field appears in a host-side record.
    pub fn host_key(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::MiddleName => "middleName",
            Self::PhoneNumbers => "phoneNumbers",
            Self::EmailAddresses => "emailAddresses",
            Self::ImageData => "imageData",
            Self::ThumbnailImageData => "thumbnailImageData",
        }
    }

    /// Upper-case name (`PHONE_NUMBERS`), as used by configuration and the CLI.
    pub fn name(self) -> &'static str {
        match self {
            Self::FirstName => "FIRST_NAME",
            Self::LastName => "LAST_NAME",
            Self::MiddleName => "MIDDLE_NAME",
            Self::PhoneNumbers => "PHONE_NUMBERS",
            Self::EmailAddresses => "EMAIL_ADDRESSES",
            Self::ImageData => "IMAGE_DATA",
            Self::ThumbnailImageData => "THUMBNAIL_IMAGE_DATA",
        }
    }

    fn bit(self) -> u8 {
        1 << self.discriminant()
    }
}

impl std::fmt::Display for ContactFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ContactFields {
    type Err = RolodexError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(s) || field.host_key() == s)
            .ok_or_else(|| RolodexError::UnknownFieldName(s.to_string()))
    }
}

/// An order-irrelevant set of [`ContactFields`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ContactFieldSet(u8);

impl ContactFieldSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        ContactFields::ALL.into_iter().collect()
    }

    pub fn insert(&mut self, field: ContactFields) {
        self.0 |= field.bit();
    }

    pub fn contains(&self, field: ContactFields) -> bool {
        self.0 & field.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in discriminant order.
    pub fn iter(&self) -> impl Iterator<Item = ContactFields> + '_ {
        ContactFields::ALL
            .into_iter()
            .filter(move |field| self.contains(*field))
    }
}

impl FromIterator<ContactFields> for ContactFieldSet {
    fn from_iter<I: IntoIterator<Item = ContactFields>>(iter: I) -> Self {
        let mut set = Self::empty();
        for field in iter {
            set.insert(field);
        }
        set
    }
}

impl std::fmt::Debug for ContactFieldSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// A text value wrapped so that list entries are records, not bare strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StringHolder {
    pub value: String,
}

impl StringHolder {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Borrowed view of one field of a [`Contact`].
#[derive(Debug, Clone, Copy)]
pub enum FieldSlot<'a> {
    Text(&'a Option<String>),
    Holders(&'a Option<Vec<StringHolder>>),
}

/// Mutable view of one field of a [`Contact`].
#[derive(Debug)]
pub enum FieldSlotMut<'a> {
    Text(&'a mut Option<String>),
    Holders(&'a mut Option<Vec<StringHolder>>),
}

/// One address-book entry.
///
/// `None` means the field is absent. `Some(String::new())` is a present but
/// empty value and is kept distinct everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Contact {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub phone_numbers: Option<Vec<StringHolder>>,
    pub email_addresses: Option<Vec<StringHolder>>,
    /// Base64 image payload as handed over by the platform.
    pub image_data: Option<String>,
    pub thumbnail_image_data: Option<String>,
}

impl Contact {
    pub fn slot(&self, field: ContactFields) -> FieldSlot<'_> {
        match field {
            ContactFields::FirstName => FieldSlot::Text(&self.first_name),
            ContactFields::LastName => FieldSlot::Text(&self.last_name),
            ContactFields::MiddleName => FieldSlot::Text(&self.middle_name),
            ContactFields::PhoneNumbers => FieldSlot::Holders(&self.phone_numbers),
            ContactFields::EmailAddresses => FieldSlot::Holders(&self.email_addresses),
            ContactFields::ImageData => FieldSlot::Text(&self.image_data),
            ContactFields::ThumbnailImageData => FieldSlot::Text(&self.thumbnail_image_data),
        }
    }

    pub fn slot_mut(&mut self, field: ContactFields) -> FieldSlotMut<'_> {
        match field {
            ContactFields::FirstName => FieldSlotMut::Text(&mut self.first_name),
            ContactFields::LastName => FieldSlotMut::Text(&mut self.last_name),
            ContactFields::MiddleName => FieldSlotMut::Text(&mut self.middle_name),
            ContactFields::PhoneNumbers => FieldSlotMut::Holders(&mut self.phone_numbers),
            ContactFields::EmailAddresses => FieldSlotMut::Holders(&mut self.email_addresses),
            ContactFields::ImageData => FieldSlotMut::Text(&mut self.image_data),
            ContactFields::ThumbnailImageData => FieldSlotMut::Text(&mut self.thumbnail_image_data),
        }
    }

    /// Fields that are present (including present-but-empty).
    pub fn populated_fields(&self) -> ContactFieldSet {
        ContactFields::ALL
            .into_iter()
            .filter(|field| match self.slot(*field) {
                FieldSlot::Text(text) => text.is_some(),
                FieldSlot::Holders(list) => list.is_some(),
            })
            .collect()
    }

    /// Sparse copy holding only the requested fields.
    ///
    /// Requested list fields are always present, empty when this record has
    /// none. Requested text fields keep whatever this record holds.
    pub fn project(&self, keys: ContactFieldSet) -> Contact {
        let mut out = Contact::default();
        for field in keys.iter() {
            match (self.slot(field), out.slot_mut(field)) {
                (FieldSlot::Text(src), FieldSlotMut::Text(dst)) => *dst = src.clone(),
                (FieldSlot::Holders(src), FieldSlotMut::Holders(dst)) => {
                    *dst = Some(src.clone().unwrap_or_default())
                }
                (src, dst) => {
                    unreachable!("slot shapes disagree for {field}: {src:?} vs {dst:?}")
                }
            }
        }
        out
    }

    /// Heap bytes owned by this record's strings and lists.
    pub fn heap_size(&self) -> usize {
        ContactFields::ALL
            .into_iter()
            .map(|field| match self.slot(field) {
                FieldSlot::Text(text) => text.as_ref().map_or(0, String::capacity),
                FieldSlot::Holders(list) => list.as_ref().map_or(0, |holders| {
                    holders.capacity() * std::mem::size_of::<StringHolder>()
                        + holders.iter().map(|h| h.value.capacity()).sum::<usize>()
                }),
            })
            .sum()
    }
}
