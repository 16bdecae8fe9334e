//! Field-level validation rules and their Portuguese messages.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::models::{parse_time, CleanupDuration};

/// Message attached to both ends of an inverted time range.
pub const TIME_RANGE_MESSAGE: &str = "início deve ser menor que término";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Text must be non-blank; lists must have at least one item.
    Required,
    Email,
    MinLength(usize),
    /// `YYYY-MM-DD`
    Date,
    /// `HH:MM` or `HH:MM:SS`
    Time,
    /// ISO-8601 duration such as `PT30M`
    IsoDuration,
    /// Case-insensitive match against one of the given wire names.
    OneOf(&'static [&'static str]),
    /// No list item may be blank.
    NoBlankItems,
}

impl Rule {
    /// Check a text value. Blank values only fail [`Rule::Required`]; every
    /// other rule treats them as "not provided".
    pub fn check_text(self, label: &str, value: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            return matches!(self, Self::Required).then(|| format!("Preencha o campo {label}"));
        }

        let valid = match self {
            Self::Required | Self::NoBlankItems => true,
            Self::Email => email_regex().is_match(value),
            Self::MinLength(min) => value.chars().count() >= min,
            Self::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
            Self::Time => parse_time(value).is_some(),
            Self::IsoDuration => CleanupDuration::new(value).to_duration().is_ok(),
            Self::OneOf(options) => {
                let wanted = value.to_uppercase();
                options.iter().any(|option| *option == wanted)
            }
        };

        if valid {
            None
        } else {
            Some(self.failure_message(label))
        }
    }

    pub fn check_list(self, label: &str, items: &[String]) -> Option<String> {
        match self {
            Self::Required if items.is_empty() => {
                Some(format!("Informe ao menos um item em {label}"))
            }
            Self::NoBlankItems if items.iter().any(|item| item.trim().is_empty()) => {
                Some(format!("{label} não pode conter itens vazios"))
            }
            _ => None,
        }
    }

    fn failure_message(self, label: &str) -> String {
        match self {
            Self::Required => format!("Preencha o campo {label}"),
            Self::Email => "E-mail inválido".to_string(),
            Self::MinLength(min) => format!("{label} deve ter ao menos {min} caracteres"),
            Self::Date => "Data inválida (use AAAA-MM-DD)".to_string(),
            Self::Time => "Horário inválido (use HH:MM)".to_string(),
            Self::IsoDuration => "Duração inválida (ex.: PT30M)".to_string(),
            Self::OneOf(options) => {
                format!("Valor inválido para {label} (use {})", options.join(", "))
            }
            Self::NoBlankItems => format!("{label} não pode conter itens vazios"),
        }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}
