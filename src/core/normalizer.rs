//! Turns the raw dataset document into typed lookup tables.
//!
//! The document is loosely typed: each collection is an array of objects
//! whose fields come straight from an Airtable export. Every record is
//! checked field by field and the first problem aborts the whole load.

use crate::domain::model::{Authority, DateValue, Directory, Entity, Gender, Lookup, Person};
use crate::utils::error::{DirectoryError, ReferenceKind, Result};
use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

pub const PERSONS_KEY: &str = "personas";
pub const ENTITIES_KEY: &str = "entidades";
pub const AUTHORITIES_KEY: &str = "autoridades";

pub fn normalize(document: &Value) -> Result<Directory> {
    let document = document
        .as_object()
        .ok_or_else(|| DirectoryError::validation("document", "root", "must be a JSON object"))?;

    let mut persons = Lookup::new(PERSONS_KEY);
    for (index, raw) in collection(document, PERSONS_KEY)?.iter().enumerate() {
        persons.insert(parse_person(RawRecord::new("persona", index, raw)?)?)?;
    }
    tracing::debug!("Parsed {} persons", persons.len());

    let mut entities = Lookup::new(ENTITIES_KEY);
    for (index, raw) in collection(document, ENTITIES_KEY)?.iter().enumerate() {
        entities.insert(parse_entity(RawRecord::new("entidad", index, raw)?)?)?;
    }
    tracing::debug!("Parsed {} entities", entities.len());

    let mut authorities = Lookup::new(AUTHORITIES_KEY);
    for (index, raw) in collection(document, AUTHORITIES_KEY)?.iter().enumerate() {
        let record = RawRecord::new("autoridad", index, raw)?;
        authorities.insert(parse_authority(record, &persons, &entities)?)?;
    }
    tracing::debug!("Parsed {} authorities", authorities.len());

    Ok(Directory {
        persons,
        entities,
        authorities,
    })
}

/// Absent and `null` collections read as empty.
fn collection<'a>(document: &'a Map<String, Value>, key: &str) -> Result<&'a [Value]> {
    match document.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(DirectoryError::validation("document", key, "must be an array")),
    }
}

struct RawRecord<'a> {
    label: String,
    fields: &'a Map<String, Value>,
}

impl<'a> RawRecord<'a> {
    fn new(kind: &str, index: usize, raw: &'a Value) -> Result<Self> {
        let label = format!("{} #{}", kind, index);
        let fields = raw
            .as_object()
            .ok_or_else(|| DirectoryError::validation(&label, "record", "must be an object"))?;
        Ok(Self { label, fields })
    }

    fn error(&self, field: &str, message: impl Into<String>) -> DirectoryError {
        DirectoryError::validation(&self.label, field, message)
    }

    /// Reads `airtableId` and switches the error label to it.
    fn identify(&mut self) -> Result<String> {
        let id = self.required_str("airtableId")?.to_string();
        self.label = format!("{} ({})", self.label, id);
        Ok(id)
    }

    fn required_str(&self, field: &str) -> Result<&'a str> {
        match self.fields.get(field) {
            None => Err(self.error(field, "is missing")),
            Some(Value::String(value)) => Ok(value.as_str()),
            Some(_) => Err(self.error(field, "must be a string")),
        }
    }

    /// A present field must be a string; `null` is not accepted.
    fn optional_str(&self, field: &str) -> Result<Option<&'a str>> {
        match self.fields.get(field) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.as_str())),
            Some(_) => Err(self.error(field, "must be a string when present")),
        }
    }

    fn single_reference(&self, field: &str) -> Result<&'a str> {
        match self.fields.get(field) {
            Some(Value::Array(items)) => match items.as_slice() {
                [Value::String(id)] => Ok(id.as_str()),
                _ => Err(self.error(field, "must hold exactly one identifier")),
            },
            None => Err(self.error(field, "is missing")),
            Some(_) => Err(self.error(field, "must be a list with one identifier")),
        }
    }

    /// Dates are only required to be strings; unreadable ones are kept raw.
    fn date(&self, field: &str, value: &str) -> DateValue {
        match parse_date(value) {
            Some(date) => DateValue::Known(date),
            None => {
                tracing::warn!("{}: '{}' is not an ISO date: '{}'", self.label, field, value);
                DateValue::Unparsed(value.to_string())
            }
        }
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

fn parse_person(mut record: RawRecord<'_>) -> Result<Person> {
    let id = record.identify()?;
    let name = record.required_str("nombre")?;
    let genero = record.required_str("genero").map_err(|_| {
        record.error("genero", "must be \"Hombre\" or \"Mujer\"")
    })?;
    let gender = Gender::from_genero(genero)
        .ok_or_else(|| record.error("genero", format!("must be \"Hombre\" or \"Mujer\", got '{}'", genero)))?;

    Ok(Person {
        id,
        name: name.to_string(),
        gender,
    })
}

fn parse_entity(mut record: RawRecord<'_>) -> Result<Entity> {
    let id = record.identify()?;
    let name = record.required_str("nombre")?;
    let kind = record.required_str("tipo")?;

    // empty strings count as "no date"
    let start = match record.optional_str("desde")? {
        Some(value) if !value.is_empty() => Some(record.date("desde", value)),
        _ => None,
    };
    let end = match record.optional_str("hasta")? {
        Some(value) if !value.is_empty() => Some(record.date("hasta", value)),
        _ => None,
    };

    Ok(Entity {
        id,
        name: name.to_string(),
        kind: kind.to_string(),
        start,
        end,
    })
}

fn parse_authority(
    mut record: RawRecord<'_>,
    persons: &Lookup<Person>,
    entities: &Lookup<Entity>,
) -> Result<Authority> {
    let id = record.identify()?;
    let person_id = record.single_reference("persona")?;
    let entity_id = record.single_reference("entidad")?;
    let position = record.required_str("cargo")?;
    let start = record.date("desde", record.required_str("desde")?);
    // any present `hasta`, even an empty one, ends the term
    let end = record
        .optional_str("hasta")?
        .map(|value| record.date("hasta", value));

    if !entities.contains(entity_id) {
        return Err(DirectoryError::Reference {
            kind: ReferenceKind::Entity,
            id: entity_id.to_string(),
            authority: id,
        });
    }
    if !persons.contains(person_id) {
        return Err(DirectoryError::Reference {
            kind: ReferenceKind::Person,
            id: person_id.to_string(),
            authority: id,
        });
    }

    Ok(Authority {
        id,
        person_id: person_id.to_string(),
        entity_id: entity_id.to_string(),
        position: position.to_string(),
        start,
        end,
    })
}
