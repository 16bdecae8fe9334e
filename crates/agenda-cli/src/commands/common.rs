use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use agenda_core::api::ApiClient;
use agenda_core::conflict::{
    Conflict, ConflictFlow, ConflictKind, Decision, DecisionOutcome, EventsBackend, Navigator,
    SubmitOutcome,
};
use agenda_core::form::{FieldKind, FormSchema, FormState};
use agenda_core::models::{Event, EventPayload, PendingEvent, User};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::auth::auth_service_for_profile;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

/// Authenticated client for the resolved profile.
pub fn session_client(global_profile: Option<&str>) -> Result<ApiClient, CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();
    let service = auth_service_for_profile(&profile_name, &profile)?;
    Ok(service.client()?)
}

pub fn normalize_identifier(kind: &'static str, id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyIdentifier(kind))
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn preview(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let mut truncated = collapsed
            .chars()
            .take(max_chars.saturating_sub(3))
            .collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

fn event_line(id: &str, event: &EventPayload, tail: &str) -> String {
    format!(
        "{:<8}  {}  {:<13}  {:<36}  {}",
        preview(id, 8),
        event.day_label(),
        event.time_range_label(),
        preview(&event.name, 36),
        tail
    )
}

pub fn format_event_lines(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .map(|event| {
            let tail = format!(
                "{} / {}",
                event.details.status, event.details.administrative_status
            );
            event_line(&event.id, &event.details, &tail)
        })
        .collect()
}

pub fn format_pending_lines(pending: &[PendingEvent]) -> Vec<String> {
    pending
        .iter()
        .map(|request| {
            let tail = format!("solicitante={}", request.event_requester_id);
            event_line(&request.id, &request.details, &tail)
        })
        .collect()
}

pub fn format_user_lines(users: &[User]) -> Vec<String> {
    users
        .iter()
        .map(|user| {
            format!(
                "{:<8}  {:<28}  {:<32}  {}",
                preview(&user.id, 8),
                preview(&user.name, 28),
                preview(&user.email, 32),
                user.role
            )
        })
        .collect()
}

pub fn event_detail_lines(event: &EventPayload) -> Vec<String> {
    let mut lines = vec![
        format!("Nome:            {}", event.name),
        format!("Data:            {}", event.day_label()),
        format!("Horário:         {}", event.time_range_label()),
        format!("Tema:            {}", event.theme),
        format!("Público-alvo:    {}", event.target_audience),
        format!("Modalidade:      {}", event.mode),
        format!("Ambiente:        {}", event.environment),
        format!("Local:           {}", event.location),
        format!("Organizador:     {}", event.organizer),
        format!("Autores:         {}", event.authors.join(", ")),
        format!("Cursos:          {}", event.courses.join(", ")),
        format!("Disciplinas:     {}", event.related_subjects.join(", ")),
        format!("Recursos:        {}", event.resources_description.join(", ")),
        format!("Divulgação:      {}", event.disclosure_method),
        format!("Estratégia:      {}", event.teaching_strategy),
        format!("Vínculo:         {}", event.disciplinary_link),
        format!("Status:          {}", event.status),
        format!("Status adm.:     {}", event.administrative_status),
        format!("Prioridade:      {}", event.priority),
        format!("Limpeza:         {}", event.cleanup_duration),
    ];
    if let Some(observation) = &event.observation {
        lines.push(format!("Observação:      {observation}"));
    }
    lines
}

/// Current form values as a JSON object, one key per schema field.
pub fn form_document<S: FormSchema>(form: &FormState<S>) -> Value {
    let values = form.values();
    let document = form
        .schema()
        .fields()
        .iter()
        .map(|spec| {
            let value = match spec.kind {
                FieldKind::Text => Value::String(values.text(spec.name).to_string()),
                FieldKind::List => Value::Array(
                    values
                        .list(spec.name)
                        .iter()
                        .cloned()
                        .map(Value::String)
                        .collect(),
                ),
            };
            (spec.name.to_string(), value)
        })
        .collect::<Map<String, Value>>();
    Value::Object(document)
}

/// Copy a JSON form document into `form`, field by field.
pub fn apply_form_document<S: FormSchema>(
    form: &mut FormState<S>,
    document: &Value,
) -> Result<(), CliError> {
    let Value::Object(fields) = document else {
        return Err(CliError::InvalidFormDocument);
    };

    for (name, value) in fields {
        match value {
            Value::Array(items) => {
                let items = items
                    .iter()
                    .map(|item| scalar_text(item).ok_or_else(|| invalid_value(name)))
                    .collect::<Result<Vec<_>, _>>()?;
                form.set_items(name, items)?;
            }
            other => {
                let text = scalar_text(other).ok_or_else(|| invalid_value(name))?;
                form.set(name, text)?;
            }
        }
    }
    Ok(())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

fn invalid_value(name: &str) -> CliError {
    CliError::InvalidFormValue(name.to_string())
}

/// Read a form document from `file`, or let the user edit `template` in $EDITOR.
pub fn read_form_document(file: Option<&Path>, template: &Value) -> Result<Value, CliError> {
    let raw = if let Some(path) = file {
        std::fs::read_to_string(path)?
    } else {
        let initial = serde_json::to_string_pretty(template)?;
        capture_editor_input_with_initial(&initial)?.ok_or(CliError::EmptyEditedForm)?
    };
    Ok(serde_json::from_str(&raw)?)
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn capture_editor_input_with_initial(
    initial_content: &str,
) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_form_file_path();
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let content = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(normalize_content(&content))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) => {
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let status = Command::new(program).args(parts).arg(file_path).status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

pub fn create_temp_form_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("agenda-form-{}-{now}.json", std::process::id()))
}

/// What an event write ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteReport {
    Saved(Option<Event>),
    Replaced { existing_id: String },
    Cancelled { existing_id: String },
}

/// Submit `kind` through the conflict flow, asking `decide` when the backend
/// reports a clash.
pub async fn drive_event_write<B, N, D>(
    backend: &B,
    navigator: &mut N,
    kind: ConflictKind,
    decide: D,
) -> Result<WriteReport, CliError>
where
    B: EventsBackend + ?Sized,
    N: Navigator + ?Sized,
    D: FnOnce(&Conflict) -> Result<Decision, CliError>,
{
    let mut flow = ConflictFlow::new();
    let conflict = match flow.submit(backend, navigator, kind).await? {
        SubmitOutcome::Success(event) => return Ok(WriteReport::Saved(event)),
        SubmitOutcome::Conflict(conflict) => conflict,
    };

    let existing_id = conflict.existing.id.clone();
    let decision = decide(&conflict)?;
    match flow.decide(backend, navigator, decision).await? {
        DecisionOutcome::Replaced => Ok(WriteReport::Replaced { existing_id }),
        DecisionOutcome::Cancelled => Ok(WriteReport::Cancelled { existing_id }),
    }
}

pub fn print_write_report(report: &WriteReport, fallback_id: Option<&str>) {
    match report {
        WriteReport::Saved(Some(event)) => println!("{}", event.id),
        WriteReport::Saved(None) => println!("{}", fallback_id.unwrap_or("ok")),
        WriteReport::Replaced { existing_id } => {
            println!("Evento {existing_id} substituído");
        }
        WriteReport::Cancelled { existing_id } => {
            println!("Operação cancelada; evento {existing_id} mantido");
        }
    }
}
