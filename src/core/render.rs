use crate::domain::model::{Authority, Directory, Entity, Gender, ListingRow};
use crate::utils::error::{DirectoryError, ReferenceKind, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const VACANT_NOTICE: &str = "Falta la información o el puesto está vacante.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(DirectoryError::InvalidConfigValue {
                field: "format".to_string(),
                value: other.to_string(),
                reason: "Valid formats: text, json, csv".to_string(),
            }),
        }
    }
}

pub fn render(rows: &[ListingRow], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(rows)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Csv => render_csv(rows),
    }
}

fn render_text(rows: &[ListingRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len());
    for row in rows {
        match &row.current_authority {
            Some(current) => lines.push(format!("{} — {}", current.person.name, current.position)),
            None => lines.push(format!("{} - {}", row.entity.name, VACANT_NOTICE)),
        }
    }
    lines.join("\n")
}

pub fn render_history(
    directory: &Directory,
    entity: &Entity,
    authorities: &[&Authority],
) -> Result<String> {
    let mut lines = vec![entity.name.clone()];
    if authorities.is_empty() {
        lines.push(format!("  {}", VACANT_NOTICE));
    }
    for authority in authorities {
        let person = directory
            .person_of(authority)
            .ok_or_else(|| DirectoryError::Reference {
                kind: ReferenceKind::Person,
                id: authority.person_id.clone(),
                authority: authority.id.clone(),
            })?;
        let end = match &authority.end {
            Some(end) => end.to_string(),
            None => "actual".to_string(),
        };
        lines.push(format!(
            "  {} — {} ({} – {})",
            person.name, authority.position, authority.start, end
        ));
    }
    Ok(lines.join("\n"))
}

fn render_csv(rows: &[ListingRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["entity_id", "entity", "person", "gender", "position", "since"])?;

    for row in rows {
        match &row.current_authority {
            Some(current) => {
                let gender = match current.person.gender {
                    Gender::Male => "m",
                    Gender::Female => "f",
                };
                let since = current.start.to_string();
                writer.write_record([
                    row.entity.id.as_str(),
                    row.entity.name.as_str(),
                    current.person.name.as_str(),
                    gender,
                    current.position.as_str(),
                    since.as_str(),
                ])?;
            }
            None => {
                writer.write_record([row.entity.id.as_str(), row.entity.name.as_str(), "", "", "", ""])?;
            }
        }
    }

    let data = writer
        .into_inner()
        .map_err(|e| DirectoryError::Io(e.into_error()))?;
    String::from_utf8(data).map_err(|e| DirectoryError::Config {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CurrentAuthority, DateValue, Entity, Lookup, Person};
    use chrono::NaiveDate;

    fn rows() -> Vec<ListingRow> {
        let entity = |id: &str, name: &str| Entity {
            id: id.to_string(),
            name: name.to_string(),
            kind: "Ministerio".to_string(),
            start: None,
            end: None,
        };
        vec![
            ListingRow {
                entity: entity("e1", "Ministerio de Salud"),
                current_authority: Some(CurrentAuthority {
                    id: "a1".to_string(),
                    person: Person {
                        id: "p1".to_string(),
                        name: "Ana".to_string(),
                        gender: Gender::Female,
                    },
                    position: "Ministra".to_string(),
                    start: DateValue::Known(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
                }),
            },
            ListingRow {
                entity: entity("e2", "Ministerio de Justicia"),
                current_authority: None,
            },
        ]
    }

    #[test]
    fn test_render_text_marks_vacancies() {
        let text = render(&rows(), OutputFormat::Text).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Ana — Ministra");
        assert_eq!(
            lines[1],
            "Ministerio de Justicia - Falta la información o el puesto está vacante."
        );
    }

    #[test]
    fn test_render_json_shape() {
        let json = render(&rows(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["entity"]["id"], "e1");
        assert_eq!(value[0]["currentAuthority"]["person"]["name"], "Ana");
        assert_eq!(value[0]["currentAuthority"]["person"]["gender"], "female");
        assert_eq!(value[0]["currentAuthority"]["start"], "2024-01-01");
        assert!(value[1]["currentAuthority"].is_null());
    }

    #[test]
    fn test_render_csv() {
        let csv = render(&rows(), OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "entity_id,entity,person,gender,position,since");
        assert_eq!(lines[1], "e1,Ministerio de Salud,Ana,f,Ministra,2024-01-01");
        assert_eq!(lines[2], "e2,Ministerio de Justicia,,,,");
    }

    #[test]
    fn test_render_history_with_unparsed_end_date() {
        let mut persons = Lookup::new("personas");
        persons
            .insert(Person {
                id: "p1".to_string(),
                name: "Ana".to_string(),
                gender: Gender::Female,
            })
            .unwrap();
        let directory = Directory {
            persons,
            entities: Lookup::new("entidades"),
            authorities: Lookup::new("autoridades"),
        };
        let entity = rows()[0].entity.clone();
        let mut authority = Authority {
            id: "a1".to_string(),
            person_id: "p1".to_string(),
            entity_id: "e1".to_string(),
            position: "Ministra".to_string(),
            start: DateValue::Known(NaiveDate::from_ymd_opt(2020, 11, 9).unwrap()),
            end: Some(DateValue::Unparsed(String::new())),
        };

        let text = render_history(&directory, &entity, &[&authority]).unwrap();
        assert_eq!(text, "Ministerio de Salud\n  Ana — Ministra (2020-11-09 – ?)");

        authority.person_id = "p404".to_string();
        let err = render_history(&directory, &entity, &[&authority]).unwrap_err();
        assert!(matches!(err, DirectoryError::Reference { ref id, .. } if id == "p404"));
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("txt".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
