//! Wire enums shared by events and users.
//!
//! Values travel as upper-case Portuguese identifiers (`PRESENCIAL`,
//! `HIBRIDO`, ...). `Display` renders the human label, `FromStr` accepts the
//! wire name in any case.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal, $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];
            pub const WIRE_NAMES: &'static [&'static str] = &[$($wire),+];

            /// Name used on the wire.
            pub const fn as_wire(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_uppercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|value| value.as_wire() == wanted)
                    .ok_or_else(|| ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

wire_enum! {
    /// How attendees take part in an event.
    EventMode, "mode" {
        Presencial => "PRESENCIAL", "Presencial",
        Online => "ONLINE", "Online",
        Hibrido => "HIBRIDO", "Híbrido",
    }
}

wire_enum! {
    /// Scheduling status of an event.
    EventStatus, "status" {
        Agendado => "AGENDADO", "Agendado",
        Confirmado => "CONFIRMADO", "Confirmado",
        Cancelado => "CANCELADO", "Cancelado",
        Concluido => "CONCLUIDO", "Concluído",
    }
}

wire_enum! {
    /// Administrative review status of an event.
    AdministrativeStatus, "administrativeStatus" {
        Pendente => "PENDENTE", "Pendente",
        Aprovado => "APROVADO", "Aprovado",
        Reprovado => "REPROVADO", "Reprovado",
    }
}

wire_enum! {
    Priority, "priority" {
        Baixa => "BAIXA", "Baixa",
        Media => "MEDIA", "Média",
        Alta => "ALTA", "Alta",
    }
}

wire_enum! {
    /// Account role. MASTER approves users and events, REQUESTER submits
    /// pending events, USER only reads.
    Role, "role" {
        Master => "MASTER", "Master",
        Requester => "REQUESTER", "Solicitante",
        User => "USER", "Usuário",
    }
}

impl Default for EventStatus {
    fn default() -> Self {
        Self::Agendado
    }
}

impl Default for AdministrativeStatus {
    fn default() -> Self {
        Self::Pendente
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Media
    }
}
