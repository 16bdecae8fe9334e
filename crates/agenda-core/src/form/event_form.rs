//! Event and pending-event editor schema.

use std::str::FromStr;

use chrono::NaiveDate;

use super::rules::TIME_RANGE_MESSAGE;
use super::{FieldSpec, FormSchema, FormState, FormValues, Rule, ValidationErrors};
use crate::models::{
    format_time, parse_time, AdministrativeStatus, CleanupDuration, EventMode, EventPayload, EventStatus,
    Location, Priority,
};

/// Schema shared by event and pending-event create/edit forms.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventSchema;

pub type EventForm = FormState<EventSchema>;

static EVENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name", "Nome", &[Rule::Required, Rule::MinLength(3)]),
    FieldSpec::text("day", "Data", &[Rule::Required, Rule::Date]),
    FieldSpec::text("startTime", "Horário de início", &[Rule::Required, Rule::Time]),
    FieldSpec::text("endTime", "Horário de término", &[Rule::Required, Rule::Time]),
    FieldSpec::text("theme", "Tema", &[Rule::Required]),
    FieldSpec::text("targetAudience", "Público-alvo", &[Rule::Required]),
    FieldSpec::text(
        "mode",
        "Modalidade",
        &[Rule::Required, Rule::OneOf(EventMode::WIRE_NAMES)],
    ),
    FieldSpec::text("environment", "Ambiente", &[]),
    FieldSpec::text("organizer", "Organizador", &[Rule::Required]),
    FieldSpec::list("resourcesDescription", "Recursos", &[Rule::NoBlankItems]),
    FieldSpec::text("disclosureMethod", "Forma de divulgação", &[]),
    FieldSpec::list("relatedSubjects", "Disciplinas relacionadas", &[Rule::NoBlankItems]),
    FieldSpec::text("teachingStrategy", "Estratégia de ensino", &[]),
    FieldSpec::list("authors", "Autores", &[Rule::Required, Rule::NoBlankItems]),
    FieldSpec::list("courses", "Cursos", &[Rule::Required, Rule::NoBlankItems]),
    FieldSpec::text("disciplinaryLink", "Vínculo disciplinar", &[]),
    FieldSpec::text("locationName", "Local", &[Rule::Required]),
    FieldSpec::text("locationFloor", "Andar", &[]),
    FieldSpec::text("status", "Status", &[Rule::OneOf(EventStatus::WIRE_NAMES)]),
    FieldSpec::text(
        "administrativeStatus",
        "Status administrativo",
        &[Rule::OneOf(AdministrativeStatus::WIRE_NAMES)],
    ),
    FieldSpec::text("priority", "Prioridade", &[Rule::OneOf(Priority::WIRE_NAMES)]),
    FieldSpec::text("cleanupDuration", "Tempo de limpeza", &[Rule::IsoDuration]),
    FieldSpec::text("observation", "Observação", &[]),
];

impl FormSchema for EventSchema {
    fn fields(&self) -> &'static [FieldSpec] {
        EVENT_FIELDS
    }

    fn cross_field_errors(&self, values: &FormValues) -> Vec<(&'static str, String)> {
        let start = parse_time(values.text("startTime"));
        let end = parse_time(values.text("endTime"));
        match (start, end) {
            (Some(start), Some(end)) if start >= end => vec![
                ("startTime", TIME_RANGE_MESSAGE.to_string()),
                ("endTime", TIME_RANGE_MESSAGE.to_string()),
            ],
            _ => Vec::new(),
        }
    }

    fn linked_fields(&self, field: &str) -> &'static [&'static str] {
        match field {
            "startTime" => &["endTime"],
            "endTime" => &["startTime"],
            _ => &[],
        }
    }
}

impl FormState<EventSchema> {
    /// Blank event form with the backend's default statuses selected.
    pub fn new_event() -> Self {
        let mut form = Self::new(EventSchema);
        form.values
            .text
            .insert("status", EventStatus::default().as_wire().to_string());
        form.values.text.insert(
            "administrativeStatus",
            AdministrativeStatus::default().as_wire().to_string(),
        );
        form.values
            .text
            .insert("priority", Priority::default().as_wire().to_string());
        form
    }

    /// Edit form pre-filled from an existing record.
    pub fn from_payload(payload: &EventPayload) -> Self {
        let mut form = Self::new(EventSchema);
        let text = &mut form.values.text;
        text.insert("name", payload.name.clone());
        text.insert("day", payload.day.format("%Y-%m-%d").to_string());
        text.insert("startTime", format_time(payload.start_time));
        text.insert("endTime", format_time(payload.end_time));
        text.insert("theme", payload.theme.clone());
        text.insert("targetAudience", payload.target_audience.clone());
        text.insert("mode", payload.mode.as_wire().to_string());
        text.insert("environment", payload.environment.clone());
        text.insert("organizer", payload.organizer.clone());
        text.insert("disclosureMethod", payload.disclosure_method.clone());
        text.insert("teachingStrategy", payload.teaching_strategy.clone());
        text.insert("disciplinaryLink", payload.disciplinary_link.clone());
        text.insert("locationName", payload.location.name.clone());
        text.insert("locationFloor", payload.location.floor.clone());
        text.insert("status", payload.status.as_wire().to_string());
        text.insert(
            "administrativeStatus",
            payload.administrative_status.as_wire().to_string(),
        );
        text.insert("priority", payload.priority.as_wire().to_string());
        text.insert(
            "cleanupDuration",
            payload.cleanup_duration.as_str().to_string(),
        );
        text.insert(
            "observation",
            payload.observation.clone().unwrap_or_default(),
        );

        let lists = &mut form.values.lists;
        lists.insert(
            "resourcesDescription",
            payload.resources_description.clone(),
        );
        lists.insert("relatedSubjects", payload.related_subjects.clone());
        lists.insert("authors", payload.authors.clone());
        lists.insert("courses", payload.courses.clone());
        form
    }

    /// Validate everything and build the request body.
    pub fn to_payload(&mut self) -> Result<EventPayload, ValidationErrors> {
        self.validate_all()?;
        let values = &self.values;

        let day = NaiveDate::parse_from_str(values.text("day"), "%Y-%m-%d")
            .map_err(|_| single_error("day", "Data inválida (use AAAA-MM-DD)"))?;
        let start_time = parse_time(values.text("startTime"))
            .ok_or_else(|| single_error("startTime", "Horário inválido (use HH:MM)"))?;
        let end_time = parse_time(values.text("endTime"))
            .ok_or_else(|| single_error("endTime", "Horário inválido (use HH:MM)"))?;

        let cleanup = values.text("cleanupDuration");
        let observation = values.text("observation");

        Ok(EventPayload {
            name: values.text("name").to_string(),
            day,
            start_time,
            end_time,
            theme: values.text("theme").to_string(),
            target_audience: values.text("targetAudience").to_string(),
            mode: values
                .text("mode")
                .parse::<EventMode>()
                .map_err(|error| single_error("mode", error.to_string()))?,
            environment: values.text("environment").to_string(),
            organizer: values.text("organizer").to_string(),
            resources_description: trimmed_items(values, "resourcesDescription"),
            disclosure_method: values.text("disclosureMethod").to_string(),
            related_subjects: trimmed_items(values, "relatedSubjects"),
            teaching_strategy: values.text("teachingStrategy").to_string(),
            authors: trimmed_items(values, "authors"),
            courses: trimmed_items(values, "courses"),
            disciplinary_link: values.text("disciplinaryLink").to_string(),
            location: Location {
                name: values.text("locationName").to_string(),
                floor: values.text("locationFloor").to_string(),
            },
            status: parse_or_default(values, "status")?,
            administrative_status: parse_or_default(values, "administrativeStatus")?,
            priority: parse_or_default(values, "priority")?,
            cleanup_duration: if cleanup.is_empty() {
                CleanupDuration::default()
            } else {
                CleanupDuration::new(cleanup)
            },
            observation: (!observation.is_empty()).then(|| observation.to_string()),
        })
    }
}

fn trimmed_items(values: &FormValues, name: &str) -> Vec<String> {
    values
        .list(name)
        .iter()
        .map(|item| item.trim().to_string())
        .collect()
}

/// Parse an enum field; blank falls back to the type's default.
fn parse_or_default<T>(values: &FormValues, name: &'static str) -> Result<T, ValidationErrors>
where
    T: FromStr + Default,
{
    let raw = values.text(name);
    if raw.is_empty() {
        return Ok(T::default());
    }
    raw.parse()
        .map_err(|_| single_error(name, format!("Valor inválido: {raw}")))
}

fn single_error(field: &str, message: impl Into<String>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.insert(field, message);
    errors
}
