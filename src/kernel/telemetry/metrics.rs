use std::collections::VecDeque;

use super::event::{LogEntry, LogKind};

/// Per-kind counts over the retained journal window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSummary {
    pub requests: u64,
    pub responses: u64,
    pub actions: u64,
    pub errors: u64,
    pub infos: u64,
}

pub fn compute_summary(entries: &VecDeque<LogEntry>) -> LogSummary {
    let mut summary = LogSummary::default();

    for entry in entries {
        match entry.kind {
            LogKind::Request => summary.requests += 1,
            LogKind::Response => summary.responses += 1,
            LogKind::Action => summary.actions += 1,
            LogKind::Error => summary.errors += 1,
            LogKind::Info => summary.infos += 1,
        }
    }

    summary
}

impl LogSummary {
    pub fn total(&self) -> u64 {
        self.requests + self.responses + self.actions + self.errors + self.infos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_each_kind() {
        let entries: VecDeque<LogEntry> = [
            LogKind::Request,
            LogKind::Request,
            LogKind::Response,
            LogKind::Error,
            LogKind::Action,
        ]
        .into_iter()
        .map(|kind| LogEntry::new(kind, "x"))
        .collect();

        let summary = compute_summary(&entries);
        assert_eq!(summary.requests, 2);
        assert_eq!(summary.responses, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.actions, 1);
        assert_eq!(summary.infos, 0);
        assert_eq!(summary.total(), 5);
    }
}
