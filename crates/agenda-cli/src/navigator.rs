//! Terminal rendering of the conflict comparison screen.

use std::io::{self, IsTerminal};

use agenda_core::conflict::{Conflict, Decision, Navigator};
use agenda_core::models::EventPayload;
use dialoguer::Confirm;

use crate::error::CliError;

#[derive(Debug, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn show_comparison(&mut self, conflict: &Conflict) {
        println!(
            "Conflito de horário na {} do evento:",
            conflict.kind.label()
        );
        for line in comparison_lines(conflict) {
            println!("{line}");
        }
    }

    fn go_back(&mut self, levels: usize) {
        tracing::debug!(levels, "Leaving conflict screens");
    }

    fn alert(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

/// Side-by-side rows; changed fields are marked with `*`.
pub fn comparison_lines(conflict: &Conflict) -> Vec<String> {
    let existing = &conflict.existing.details;
    let proposed = conflict.proposed();

    let mut lines = vec![format!(
        "  {:<12} {:<32} {}",
        "Campo",
        format!("Existente ({})", conflict.existing.id),
        "Proposto"
    )];
    for (label, left, right) in comparison_rows(existing, proposed) {
        let marker = if left == right { ' ' } else { '*' };
        lines.push(format!("{marker} {label:<12} {left:<32} {right}"));
    }
    lines
}

fn comparison_rows(
    existing: &EventPayload,
    proposed: &EventPayload,
) -> Vec<(&'static str, String, String)> {
    let row = |label, pick: fn(&EventPayload) -> String| (label, pick(existing), pick(proposed));
    vec![
        row("Nome", |event| event.name.clone()),
        row("Data", EventPayload::day_label),
        row("Horário", EventPayload::time_range_label),
        row("Local", |event| event.location.to_string()),
        row("Organizador", |event| event.organizer.clone()),
        row("Modalidade", |event| event.mode.label().to_string()),
        row("Status", |event| event.status.label().to_string()),
        row("Prioridade", |event| event.priority.label().to_string()),
        row("Limpeza", |event| event.cleanup_duration.to_string()),
    ]
}

/// Ask whether to replace the existing event. `preset` skips the prompt.
pub fn resolve_decision(preset: Option<Decision>) -> Result<Decision, CliError> {
    if let Some(decision) = preset {
        return Ok(decision);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::DecisionRequired);
    }

    let replace = Confirm::new()
        .with_prompt("Substituir o evento existente pelo proposto?")
        .default(false)
        .interact()?;
    Ok(if replace {
        Decision::Replace
    } else {
        Decision::Cancel
    })
}
