use crate::domain::model::{Authority, Directory, MinistryListing};
use crate::utils::error::{DirectoryError, Result};
use std::collections::HashMap;

pub const MINISTRY_KIND: &str = "Ministerio";

/// Every entity of `kind`, in source order, paired with the authority
/// currently in charge of it. Two in-charge authorities for one of those
/// entities is an error.
pub fn current_holders<'a>(directory: &'a Directory, kind: &str) -> Result<Vec<MinistryListing<'a>>> {
    let mut in_charge: HashMap<&str, &Authority> = HashMap::new();

    for authority in directory.authorities.iter().filter(|a| a.in_charge()) {
        let inspected = directory
            .entity_of(authority)
            .is_some_and(|entity| entity.kind == kind);
        if !inspected {
            continue;
        }
        if in_charge.insert(&authority.entity_id, authority).is_some() {
            return Err(DirectoryError::InvariantViolation {
                entity_id: authority.entity_id.clone(),
            });
        }
    }

    let listings: Vec<MinistryListing<'a>> = directory
        .entities
        .iter()
        .filter(|entity| entity.kind == kind)
        .map(|entity| MinistryListing {
            entity,
            current_authority: in_charge.get(entity.id.as_str()).copied(),
        })
        .collect();

    tracing::debug!(
        "{} entities of kind '{}', {} vacant",
        listings.len(),
        kind,
        listings.iter().filter(|l| l.current_authority.is_none()).count()
    );

    Ok(listings)
}

pub fn ministries(directory: &Directory) -> Result<Vec<MinistryListing<'_>>> {
    current_holders(directory, MINISTRY_KIND)
}

/// All authorities ever recorded for an entity, in source order.
pub fn authorities_of<'a>(directory: &'a Directory, entity_id: &str) -> Vec<&'a Authority> {
    directory
        .authorities
        .iter()
        .filter(|authority| authority.entity_id == entity_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalizer::normalize;
    use serde_json::json;

    fn directory(autoridades: serde_json::Value) -> Directory {
        normalize(&json!({
            "personas": [
                {"airtableId": "p1", "nombre": "Ana", "genero": "Mujer"},
                {"airtableId": "p2", "nombre": "Luis", "genero": "Hombre"}
            ],
            "entidades": [
                {"airtableId": "e3", "nombre": "Ministerio de Economía", "tipo": "Ministerio"},
                {"airtableId": "v1", "nombre": "Viceministerio de Tesoro", "tipo": "Viceministerio"},
                {"airtableId": "e1", "nombre": "Ministerio de Salud", "tipo": "Ministerio"}
            ],
            "autoridades": autoridades
        }))
        .unwrap()
    }

    #[test]
    fn test_ministries_in_source_order_with_vacancies() {
        let dir = directory(json!([
            {"airtableId": "a1", "persona": ["p1"], "entidad": ["e1"], "cargo": "Ministra", "desde": "2024-01-01"}
        ]));
        let listings = ministries(&dir).unwrap();

        let ids: Vec<&str> = listings.iter().map(|l| l.entity.id.as_str()).collect();
        assert_eq!(ids, vec!["e3", "e1"]);
        assert!(listings[0].current_authority.is_none());
        assert_eq!(listings[1].current_authority.unwrap().id, "a1");
    }

    #[test]
    fn test_past_authorities_do_not_count() {
        let dir = directory(json!([
            {"airtableId": "a1", "persona": ["p1"], "entidad": ["e1"], "cargo": "Ministra", "desde": "2020-01-01", "hasta": "2022-01-01"},
            {"airtableId": "a2", "persona": ["p2"], "entidad": ["e1"], "cargo": "Ministro", "desde": "2022-01-02"}
        ]));
        let listings = ministries(&dir).unwrap();
        assert_eq!(listings[1].current_authority.unwrap().id, "a2");
    }

    #[test]
    fn test_two_in_charge_authorities_violate_invariant() {
        let dir = directory(json!([
            {"airtableId": "a1", "persona": ["p1"], "entidad": ["e1"], "cargo": "Ministra", "desde": "2024-01-01"},
            {"airtableId": "a2", "persona": ["p2"], "entidad": ["e1"], "cargo": "Ministro", "desde": "2024-02-01"}
        ]));
        let err = ministries(&dir).unwrap_err();
        assert!(matches!(err, DirectoryError::InvariantViolation { ref entity_id } if entity_id == "e1"));
    }

    #[test]
    fn test_invariant_checked_only_for_queried_kind() {
        let dir = directory(json!([
            {"airtableId": "a1", "persona": ["p1"], "entidad": ["v1"], "cargo": "Viceministra", "desde": "2024-01-01"},
            {"airtableId": "a2", "persona": ["p2"], "entidad": ["v1"], "cargo": "Viceministro", "desde": "2024-02-01"}
        ]));
        assert_eq!(ministries(&dir).unwrap().len(), 2);
        assert!(current_holders(&dir, "Viceministerio").is_err());
    }

    #[test]
    fn test_unknown_kind_yields_empty_listing() {
        let dir = directory(json!([]));
        assert!(current_holders(&dir, "Embajada").unwrap().is_empty());
    }

    #[test]
    fn test_authorities_of_entity() {
        let dir = directory(json!([
            {"airtableId": "a1", "persona": ["p1"], "entidad": ["e1"], "cargo": "Ministra", "desde": "2020-01-01", "hasta": "2022-01-01"},
            {"airtableId": "a2", "persona": ["p2"], "entidad": ["e3"], "cargo": "Ministro", "desde": "2022-01-02"},
            {"airtableId": "a3", "persona": ["p2"], "entidad": ["e1"], "cargo": "Ministro", "desde": "2022-01-02"}
        ]));
        let ids: Vec<&str> = authorities_of(&dir, "e1").iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a3"]);
        assert!(authorities_of(&dir, "v1").is_empty());
    }
}
