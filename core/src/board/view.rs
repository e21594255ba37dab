use crate::cache::ColumnSnapshot;
use crate::domain::{Accent, Column};

/// Everything a renderer needs for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView {
    pub column: Column,
    pub label: &'static str,
    pub accent: Accent,
    pub search: String,
    pub snapshot: ColumnSnapshot,
}

impl ColumnView {
    pub fn new(column: Column, search: &str, snapshot: ColumnSnapshot) -> Self {
        let spec = column.spec();
        Self {
            column,
            label: spec.label,
            accent: spec.accent,
            search: search.to_string(),
            snapshot,
        }
    }

    /// Task count for the header; an ellipsis while the first load runs.
    pub fn count_label(&self) -> String {
        if self.snapshot.is_loading {
            "…".to_string()
        } else {
            self.snapshot.tasks.len().to_string()
        }
    }

    pub fn error_text(&self) -> Option<&'static str> {
        self.snapshot.is_error.then_some("Failed to load tasks.")
    }

    pub fn can_load_more(&self) -> bool {
        self.snapshot.has_more && !self.snapshot.is_loading && !self.snapshot.is_fetching_more
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_column_shows_ellipsis() {
        let view = ColumnView::new(
            Column::Review,
            "",
            ColumnSnapshot {
                is_loading: true,
                ..ColumnSnapshot::default()
            },
        );
        assert_eq!(view.label, "Review");
        assert_eq!(view.accent, Accent::Violet);
        assert_eq!(view.count_label(), "…");
        assert!(!view.can_load_more());
    }

    #[test]
    fn errored_column_has_notice() {
        let view = ColumnView::new(
            Column::Todo,
            "",
            ColumnSnapshot {
                is_error: true,
                ..ColumnSnapshot::default()
            },
        );
        assert_eq!(view.error_text(), Some("Failed to load tasks."));
        assert_eq!(view.count_label(), "0");
    }
}
