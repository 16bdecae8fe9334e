use agenda_core::conflict::ConflictKind;
use agenda_core::form::EventForm;
use agenda_core::models::PendingEvent;

use crate::cli::PendingCommands;
use crate::commands::common::{
    drive_event_write, event_detail_lines, format_pending_lines, normalize_identifier,
    print_json, print_write_report, session_client,
};
use crate::commands::events::event_payload_from_input;
use crate::error::CliError;
use crate::navigator::{resolve_decision, TerminalNavigator};

pub async fn run_pending(
    command: PendingCommands,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let client = session_client(global_profile)?;

    match command {
        PendingCommands::List { json } => {
            let pending = client.list_pending_events().await?;
            render_pending(&pending, json)
        }
        PendingCommands::Mine { json } => {
            let pending = client.my_pending_events().await?;
            render_pending(&pending, json)
        }
        PendingCommands::Show { id, json } => {
            let id = normalize_identifier("Pending event ID", &id)?;
            let pending = client.get_pending_event(&id).await?;
            if json {
                return print_json(&pending);
            }
            println!("ID:              {}", pending.id);
            println!("Solicitante:     {}", pending.event_requester_id);
            for line in event_detail_lines(&pending.details) {
                println!("{line}");
            }
            Ok(())
        }
        PendingCommands::Create { file } => {
            let payload = event_payload_from_input(EventForm::new_event(), file.as_deref())?;
            client.create_pending_event(&payload).await?;
            println!("Solicitação enviada para aprovação");
            Ok(())
        }
        PendingCommands::Edit { id, file } => {
            let id = normalize_identifier("Pending event ID", &id)?;
            let pending = client.get_pending_event(&id).await?;
            let payload = event_payload_from_input(
                EventForm::from_payload(&pending.details),
                file.as_deref(),
            )?;
            if payload != pending.details {
                client.update_pending_event(&id, &payload).await?;
            }
            println!("{id}");
            Ok(())
        }
        PendingCommands::Delete { id } => {
            let id = normalize_identifier("Pending event ID", &id)?;
            client.delete_pending_event(&id).await?;
            println!("{id}");
            Ok(())
        }
        PendingCommands::Approve { id, conflict } => {
            let id = normalize_identifier("Pending event ID", &id)?;
            let pending = client.get_pending_event(&id).await?;
            let report = drive_event_write(
                &client,
                &mut TerminalNavigator,
                ConflictKind::Approval { pending },
                |_| resolve_decision(conflict.preset()),
            )
            .await?;
            print_write_report(&report, Some(&id));
            Ok(())
        }
        PendingCommands::Reject { id } => {
            let id = normalize_identifier("Pending event ID", &id)?;
            client.reject_pending_event(&id).await?;
            println!("{id}");
            Ok(())
        }
    }
}

fn render_pending(pending: &[PendingEvent], as_json: bool) -> Result<(), CliError> {
    if as_json {
        return print_json(pending);
    }
    if pending.is_empty() {
        println!("Nenhuma solicitação pendente.");
    }
    for line in format_pending_lines(pending) {
        println!("{line}");
    }
    Ok(())
}
