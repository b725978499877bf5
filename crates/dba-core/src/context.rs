//! Builds the system-state and history bundle that accompanies every chat prompt.

use crate::session::Message;
use crate::snapshot::SystemSnapshots;

/// Raw messages kept from the tail of the conversation (three turns).
pub const HISTORY_WINDOW: usize = 6;
pub const MAX_LISTED_RISKS: usize = 3;
pub const MAX_LISTED_QUERIES: usize = 2;
pub const EMPTY_HISTORY_PLACEHOLDER: &str = "(no prior conversation)";

#[derive(Debug, Clone, Copy)]
pub struct ContextAssembler {
    history_window: usize,
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self {
            history_window: HISTORY_WINDOW,
        }
    }
}

impl ContextAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_window(mut self, history_window: usize) -> Self {
        self.history_window = history_window;
        self
    }

    pub fn assemble(&self, snapshots: &SystemSnapshots, history: &[Message]) -> String {
        let mut sections = Vec::new();

        if let Some(section) = security_section(snapshots) {
            sections.push(section);
        }
        if let Some(section) = performance_section(snapshots) {
            sections.push(section);
        }
        if let Some(section) = anomaly_section(snapshots) {
            sections.push(section);
        }
        sections.push(self.history_section(history));

        sections.join("\n\n")
    }

    fn history_section(&self, history: &[Message]) -> String {
        let mut section = String::from("CONVERSATION HISTORY:\n");
        if history.is_empty() {
            section.push_str(EMPTY_HISTORY_PLACEHOLDER);
            return section;
        }

        let start = history.len().saturating_sub(self.history_window);
        let lines: Vec<String> = history[start..]
            .iter()
            .map(|message| format!("{}: {}", message.role.label(), message.content))
            .collect();
        section.push_str(&lines.join("\n"));
        section
    }
}

fn security_section(snapshots: &SystemSnapshots) -> Option<String> {
    let audit = snapshots.security.as_ref()?;
    let score = audit
        .score
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "N/A".to_string());

    let mut section = format!(
        "SECURITY AUDIT:\nScore: {}/100 ({})",
        score,
        audit.status().as_str()
    );
    let risks: Vec<&str> = audit.risk_names().take(MAX_LISTED_RISKS).collect();
    if !risks.is_empty() {
        section.push_str("\nMain risks: ");
        section.push_str(&risks.join("; "));
    }
    Some(section)
}

fn performance_section(snapshots: &SystemSnapshots) -> Option<String> {
    let queries = snapshots.performance.as_deref()?;
    if queries.is_empty() {
        return None;
    }

    let mut section = format!("PERFORMANCE:\nAnalysed slow queries: {}", queries.len());
    let examples: Vec<&str> = queries
        .iter()
        .filter_map(|query| query.sql_id.as_deref())
        .take(MAX_LISTED_QUERIES)
        .collect();
    if !examples.is_empty() {
        section.push_str("\nExamples: ");
        section.push_str(&examples.join(", "));
    }
    Some(section)
}

fn anomaly_section(snapshots: &SystemSnapshots) -> Option<String> {
    snapshots.anomalies.as_ref()?;
    Some(format!(
        "ANOMALIES:\nCritical anomalies detected: {}",
        snapshots.critical_anomalies()
    ))
}
