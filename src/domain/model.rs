use crate::utils::error::{DirectoryError, ReferenceKind, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Maps the dataset's `genero` literal.
    pub fn from_genero(value: &str) -> Option<Self> {
        match value {
            "Hombre" => Some(Gender::Male),
            "Mujer" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// A date field as found in the dataset.
///
/// Presence is what carries meaning (an end date ends a term); a string
/// that is not an ISO date is kept verbatim instead of failing the load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DateValue {
    Known(NaiveDate),
    Unparsed(String),
}

impl DateValue {
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            DateValue::Known(date) => Some(*date),
            DateValue::Unparsed(_) => None,
        }
    }
}

impl std::fmt::Display for DateValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateValue::Known(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            DateValue::Unparsed(raw) if raw.trim().is_empty() => write!(f, "?"),
            DateValue::Unparsed(raw) => write!(f, "{}", raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub gender: Gender,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub start: Option<DateValue>,
    pub end: Option<DateValue>,
}

impl Entity {
    pub fn is_active(&self) -> bool {
        self.end.is_none()
    }
}

/// An appointment of a person to a position in an entity.
///
/// `person_id` and `entity_id` are keys into the [`Directory`] tables; the
/// normalizer only builds an `Authority` once both keys resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Authority {
    pub id: String,
    pub person_id: String,
    pub entity_id: String,
    pub position: String,
    pub start: DateValue,
    pub end: Option<DateValue>,
}

impl Authority {
    pub fn in_charge(&self) -> bool {
        self.end.is_none()
    }
}

pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Person {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Entity {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Authority {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Identifier-keyed table that keeps source document order.
#[derive(Debug, Clone)]
pub struct Lookup<T> {
    collection: &'static str,
    items: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T: Identified> Lookup<T> {
    pub fn new(collection: &'static str) -> Self {
        Self {
            collection,
            items: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn insert(&mut self, item: T) -> Result<()> {
        if self.index.contains_key(item.id()) {
            return Err(DirectoryError::DuplicateId {
                collection: self.collection.to_string(),
                id: item.id().to_string(),
            });
        }
        self.index.insert(item.id().to_string(), self.items.len());
        self.items.push(item);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a Lookup<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Snapshot of the dataset after normalization.
#[derive(Debug, Clone)]
pub struct Directory {
    pub persons: Lookup<Person>,
    pub entities: Lookup<Entity>,
    pub authorities: Lookup<Authority>,
}

impl Directory {
    pub fn person_of(&self, authority: &Authority) -> Option<&Person> {
        self.persons.get(&authority.person_id)
    }

    pub fn entity_of(&self, authority: &Authority) -> Option<&Entity> {
        self.entities.get(&authority.entity_id)
    }
}

/// A ministry (or any entity of the queried kind) and its current holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinistryListing<'a> {
    pub entity: &'a Entity,
    pub current_authority: Option<&'a Authority>,
}

/// Owned, fully resolved row handed to the listing output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRow {
    pub entity: Entity,
    pub current_authority: Option<CurrentAuthority>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAuthority {
    pub id: String,
    pub person: Person,
    pub position: String,
    pub start: DateValue,
}

impl ListingRow {
    pub fn is_vacant(&self) -> bool {
        self.current_authority.is_none()
    }
}

impl<'a> MinistryListing<'a> {
    /// Resolves the holder's person; a dangling person key is an error.
    pub fn to_row(&self, directory: &Directory) -> Result<ListingRow> {
        let current_authority = match self.current_authority {
            Some(authority) => {
                let person = directory.person_of(authority).ok_or_else(|| DirectoryError::Reference {
                    kind: ReferenceKind::Person,
                    id: authority.person_id.clone(),
                    authority: authority.id.clone(),
                })?;
                Some(CurrentAuthority {
                    id: authority.id.clone(),
                    person: person.clone(),
                    position: authority.position.clone(),
                    start: authority.start.clone(),
                })
            }
            None => None,
        };

        Ok(ListingRow {
            entity: self.entity.clone(),
            current_authority,
        })
    }
}
