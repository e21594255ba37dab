use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four fixed board lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Todo,
    InProgress,
    Review,
    Done,
}

/// Visual accent attached to a column. The renderer maps it to colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Slate,
    Amber,
    Violet,
    Emerald,
}

/// Static configuration of a column: id, display label, accent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub column: Column,
    pub label: &'static str,
    pub accent: Accent,
}

/// Board columns in display order.
pub const COLUMNS: [ColumnSpec; 4] = [
    ColumnSpec {
        column: Column::Todo,
        label: "Todo",
        accent: Accent::Slate,
    },
    ColumnSpec {
        column: Column::InProgress,
        label: "In Progress",
        accent: Accent::Amber,
    },
    ColumnSpec {
        column: Column::Review,
        label: "Review",
        accent: Accent::Violet,
    },
    ColumnSpec {
        column: Column::Done,
        label: "Done",
        accent: Accent::Emerald,
    },
];

impl Column {
    pub const ALL: [Column; 4] = [
        Column::Todo,
        Column::InProgress,
        Column::Review,
        Column::Done,
    ];

    /// Wire name, as used in the REST contract.
    pub fn as_str(self) -> &'static str {
        match self {
            Column::Todo => "todo",
            Column::InProgress => "in_progress",
            Column::Review => "review",
            Column::Done => "done",
        }
    }

    pub fn spec(self) -> &'static ColumnSpec {
        &COLUMNS[self.index()]
    }

    pub fn label(self) -> &'static str {
        self.spec().label
    }

    /// Position in display order.
    pub fn index(self) -> usize {
        match self {
            Column::Todo => 0,
            Column::InProgress => 1,
            Column::Review => 2,
            Column::Done => 3,
        }
    }

    pub fn from_index(idx: usize) -> Option<Column> {
        Column::ALL.get(idx).copied()
    }

    /// Neighbour to the left in display order, if any.
    pub fn prev(self) -> Option<Column> {
        self.index().checked_sub(1).and_then(Column::from_index)
    }

    /// Neighbour to the right in display order, if any.
    pub fn next(self) -> Option<Column> {
        Column::from_index(self.index() + 1)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "todo" => Ok(Column::Todo),
            "in_progress" => Ok(Column::InProgress),
            "review" => Ok(Column::Review),
            "done" => Ok(Column::Done),
            _ => Err(format!(
                "unknown column '{s}' (expected one of: todo, in_progress, review, done)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_table_matches_enum_order() {
        for (idx, spec) in COLUMNS.iter().enumerate() {
            assert_eq!(spec.column.index(), idx);
            assert_eq!(Column::from_index(idx), Some(spec.column));
        }
        assert_eq!(Column::InProgress.label(), "In Progress");
    }

    #[test]
    fn serde_uses_snake_case_wire_names() {
        let json = serde_json::to_string(&Column::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let back: Column = serde_json::from_str("\"review\"").unwrap();
        assert_eq!(back, Column::Review);
    }

    #[test]
    fn from_str_accepts_loose_spellings() {
        assert_eq!("In Progress".parse::<Column>(), Ok(Column::InProgress));
        assert_eq!("in-progress".parse::<Column>(), Ok(Column::InProgress));
        assert_eq!("DONE".parse::<Column>(), Ok(Column::Done));
        assert!("backlog".parse::<Column>().is_err());
    }

    #[test]
    fn neighbours_stop_at_edges() {
        assert_eq!(Column::Todo.prev(), None);
        assert_eq!(Column::Todo.next(), Some(Column::InProgress));
        assert_eq!(Column::Done.next(), None);
        assert_eq!(Column::Done.prev(), Some(Column::Review));
    }
}
