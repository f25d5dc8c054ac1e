use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kinds::{ErrorKind, FieldType};

/// Typed person fields shared by canonical entities and their variants.
///
/// Optional fields are decided once, when the canonical entity is created.
/// Variants never add a field; `missing_value` is the only kind that drops
/// one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonFields {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address_1: String,
    pub address_2: Option<String>,
    pub city: String,
    /// Region code (US state, Swiss canton).
    pub state: String,
    pub postcode: Option<String>,
    pub country_code: String,
}

impl PersonFields {
    pub fn get(&self, field: PersonField) -> Option<&str> {
        match field {
            PersonField::FirstName => Some(&self.first_name),
            PersonField::LastName => Some(&self.last_name),
            PersonField::Email => self.email.as_deref(),
            PersonField::Phone => self.phone.as_deref(),
            PersonField::Address1 => Some(&self.address_1),
            PersonField::Address2 => self.address_2.as_deref(),
            PersonField::City => Some(&self.city),
            PersonField::State => Some(&self.state),
        }
    }

    /// Mutable slot for a present field; absent optional fields yield `None`.
    pub fn slot_mut(&mut self, field: PersonField) -> Option<&mut String> {
        match field {
            PersonField::FirstName => Some(&mut self.first_name),
            PersonField::LastName => Some(&mut self.last_name),
            PersonField::Email => self.email.as_mut(),
            PersonField::Phone => self.phone.as_mut(),
            PersonField::Address1 => Some(&mut self.address_1),
            PersonField::Address2 => self.address_2.as_mut(),
            PersonField::City => Some(&mut self.city),
            PersonField::State => Some(&mut self.state),
        }
    }

    /// Drop an optional field, or blank a required one.
    pub fn clear(&mut self, field: PersonField) {
        match field {
            PersonField::Email => self.email = None,
            PersonField::Phone => self.phone = None,
            PersonField::Address2 => self.address_2 = None,
            required => {
                if let Some(slot) = self.slot_mut(required) {
                    slot.clear();
                }
            }
        }
    }

    /// Fields whose value differs from `other`.
    pub fn diff(&self, other: &PersonFields) -> Vec<PersonField> {
        PersonField::POLLUTABLE
            .into_iter()
            .filter(|field| self.get(*field) != other.get(*field))
            .collect()
    }
}

/// Fields the cluster generator may pollute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonField {
    FirstName,
    LastName,
    Email,
    Phone,
    #[serde(rename = "address_1")]
    Address1,
    #[serde(rename = "address_2")]
    Address2,
    City,
    State,
}

impl PersonField {
    /// Pollution order; every variant draws its fields in this order.
    pub const POLLUTABLE: [PersonField; 8] = [
        PersonField::FirstName,
        PersonField::LastName,
        PersonField::Email,
        PersonField::Phone,
        PersonField::Address1,
        PersonField::Address2,
        PersonField::City,
        PersonField::State,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PersonField::FirstName => "first_name",
            PersonField::LastName => "last_name",
            PersonField::Email => "email",
            PersonField::Phone => "phone",
            PersonField::Address1 => "address_1",
            PersonField::Address2 => "address_2",
            PersonField::City => "city",
            PersonField::State => "state",
        }
    }

    pub fn field_type(self) -> FieldType {
        match self {
            PersonField::FirstName | PersonField::LastName => FieldType::Name,
            PersonField::Email => FieldType::Email,
            PersonField::Phone => FieldType::Phone,
            PersonField::Address1 | PersonField::Address2 => FieldType::Address,
            PersonField::City | PersonField::State => FieldType::Locality,
        }
    }
}

impl fmt::Display for PersonField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ground-truth identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalEntity {
    pub canonical_id: String,
    pub fields: PersonFields,
}

/// One observation of a canonical entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub canonical_id: String,
    pub variant_id: String,
    pub is_duplicate: bool,
    pub fields: PersonFields,
    /// Fields whose value actually changed, with the kind that changed them.
    pub changes: Vec<(PersonField, ErrorKind)>,
}

impl Variant {
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }
}

/// A baseline record plus its polluted duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateCluster {
    pub canonical: CanonicalEntity,
    /// First member is always the unmodified baseline.
    pub members: Vec<Variant>,
}

impl DuplicateCluster {
    pub fn baseline(&self) -> Option<&Variant> {
        self.members.first()
    }

    pub fn duplicates(&self) -> &[Variant] {
        self.members.get(1..).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PersonFields {
        PersonFields {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: Some("jane.doe@example.com".to_string()),
            phone: None,
            address_1: "12 Oak Street".to_string(),
            address_2: None,
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            postcode: Some("62701".to_string()),
            country_code: "US".to_string(),
        }
    }

    #[test]
    fn absent_optional_fields_have_no_slot() {
        let mut fields = sample();
        assert!(fields.slot_mut(PersonField::Phone).is_none());
        assert!(fields.slot_mut(PersonField::Email).is_some());
        assert_eq!(fields.get(PersonField::Address2), None);
    }

    #[test]
    fn clear_drops_optional_and_blanks_required() {
        let mut fields = sample();
        fields.clear(PersonField::Email);
        fields.clear(PersonField::City);
        assert_eq!(fields.email, None);
        assert_eq!(fields.city, "");
        assert_eq!(
            fields.diff(&sample()),
            vec![PersonField::Email, PersonField::City]
        );
    }

    #[test]
    fn diff_reports_changed_fields_in_order() {
        let base = sample();
        let mut other = sample();
        other.city = "SPRINGFIELD".to_string();
        other.first_name = "J.".to_string();
        assert_eq!(
            other.diff(&base),
            vec![PersonField::FirstName, PersonField::City]
        );
    }
}
