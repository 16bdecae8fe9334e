//! Screen-stack side effects driven by the conflict flow.

use super::Conflict;

pub trait Navigator {
    /// Push the comparison screen showing both records.
    fn show_comparison(&mut self, conflict: &Conflict);
    /// Pop `levels` screens.
    fn go_back(&mut self, levels: usize);
    /// Show a modal alert.
    fn alert(&mut self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    ShowComparison {
        existing_id: String,
        proposed_name: String,
    },
    Back(usize),
    Alert(String),
}

/// Navigator that only records what it was asked to do.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    pub events: Vec<NavigationEvent>,
}

impl Navigator for RecordingNavigator {
    fn show_comparison(&mut self, conflict: &Conflict) {
        self.events.push(NavigationEvent::ShowComparison {
            existing_id: conflict.existing.id.clone(),
            proposed_name: conflict.kind.proposed().name.clone(),
        });
    }

    fn go_back(&mut self, levels: usize) {
        self.events.push(NavigationEvent::Back(levels));
    }

    fn alert(&mut self, message: &str) {
        self.events.push(NavigationEvent::Alert(message.to_string()));
    }
}
