use std::path::Path;
use std::str::FromStr;

use agenda_core::conflict::ConflictKind;
use agenda_core::form::{EventForm, ValidationErrors};
use agenda_core::models::{Event, EventPayload, EventSearchFilters};
use chrono::NaiveDate;
use serde_json::Value;

use crate::cli::{EventCommands, EventFilterArgs};
use crate::commands::common::{
    apply_form_document, drive_event_write, event_detail_lines, form_document,
    format_event_lines, normalize_identifier, print_json, print_write_report, read_form_document,
    session_client,
};
use crate::config_profiles::normalize_text_option;
use crate::error::CliError;
use crate::navigator::{resolve_decision, TerminalNavigator};

pub async fn run_events(command: EventCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    let client = session_client(global_profile)?;

    match command {
        EventCommands::List { json } => {
            let events = client.list_events().await?;
            render_events(&events, json)
        }
        EventCommands::Show { id, json } => {
            let id = normalize_identifier("Event ID", &id)?;
            let event = client.get_event(&id).await?;
            if json {
                return print_json(&event);
            }
            println!("ID:              {}", event.id);
            for line in event_detail_lines(&event.details) {
                println!("{line}");
            }
            Ok(())
        }
        EventCommands::Create { file, conflict } => {
            let payload = event_payload_from_input(EventForm::new_event(), file.as_deref())?;
            let report = drive_event_write(
                &client,
                &mut TerminalNavigator,
                ConflictKind::Create { payload },
                |_| resolve_decision(conflict.preset()),
            )
            .await?;
            print_write_report(&report, None);
            Ok(())
        }
        EventCommands::Edit { id, file, conflict } => {
            let id = normalize_identifier("Event ID", &id)?;
            let event = client.get_event(&id).await?;
            let payload =
                event_payload_from_input(EventForm::from_payload(&event.details), file.as_deref())?;
            if payload == event.details {
                println!("{id}");
                return Ok(());
            }

            let report = drive_event_write(
                &client,
                &mut TerminalNavigator,
                ConflictKind::Update {
                    event_id: id.clone(),
                    payload,
                },
                |_| resolve_decision(conflict.preset()),
            )
            .await?;
            print_write_report(&report, Some(&id));
            Ok(())
        }
        EventCommands::Delete { id } => {
            let id = normalize_identifier("Event ID", &id)?;
            client.delete_event(&id).await?;
            println!("{id}");
            Ok(())
        }
        EventCommands::Search { filters, json } => {
            let filters = search_filters(filters)?;
            let events = client.search_events(&filters).await?;
            render_events(&events, json)
        }
    }
}

fn render_events(events: &[Event], as_json: bool) -> Result<(), CliError> {
    if as_json {
        return print_json(events);
    }
    if events.is_empty() {
        println!("Nenhum evento encontrado.");
    }
    for line in format_event_lines(events) {
        println!("{line}");
    }
    Ok(())
}

/// Fill `form` from `--file` or $EDITOR and validate it.
pub fn event_payload_from_input(
    form: EventForm,
    file: Option<&Path>,
) -> Result<EventPayload, CliError> {
    let template = form_document(&form);
    let document = read_form_document(file, &template)?;
    event_payload_from_document(form, &document)
}

pub fn event_payload_from_document(
    mut form: EventForm,
    document: &Value,
) -> Result<EventPayload, CliError> {
    apply_form_document(&mut form, document)?;
    Ok(form.to_payload()?)
}

pub fn search_filters(args: EventFilterArgs) -> Result<EventSearchFilters, CliError> {
    let mut errors = ValidationErrors::new();
    let filters = EventSearchFilters {
        name: normalize_text_option(args.name),
        day: parse_filter(&mut errors, "day", args.day, |raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| "Data inválida (use AAAA-MM-DD)".to_string())
        }),
        location: normalize_text_option(args.location),
        organizer: normalize_text_option(args.organizer),
        mode: parse_filter(&mut errors, "mode", args.mode, parse_enum),
        status: parse_filter(&mut errors, "status", args.status, parse_enum),
        administrative_status: parse_filter(
            &mut errors,
            "administrativeStatus",
            args.administrative_status,
            parse_enum,
        ),
        priority: parse_filter(&mut errors, "priority", args.priority, parse_enum),
    };

    if errors.is_empty() {
        Ok(filters)
    } else {
        Err(errors.into())
    }
}

fn parse_enum<T>(raw: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: ToString,
{
    raw.parse().map_err(|error: T::Err| error.to_string())
}

fn parse_filter<T>(
    errors: &mut ValidationErrors,
    field: &str,
    raw: Option<String>,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Option<T> {
    let raw = normalize_text_option(raw)?;
    match parse(&raw) {
        Ok(value) => Some(value),
        Err(message) => {
            errors.insert(field, message);
            None
        }
    }
}
