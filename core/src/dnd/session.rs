use super::{Point, Rect};
use crate::domain::{Column, Task};

/// The one active drag on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Task as it was when the drag started.
    pub task: Task,
    pub origin: Point,
    pub pointer: Point,
    /// Card bounds at press time.
    pub card: Rect,
    pub over: Option<Column>,
}

impl DragSession {
    /// Card bounds moved along with the pointer.
    pub fn ghost(&self) -> Rect {
        self.card
            .translate(self.pointer.x - self.origin.x, self.pointer.y - self.origin.y)
    }
}

/// What a released gesture means for the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Released before the drag threshold; treat as a click on the card.
    Click(Task),
    NoTarget,
    SameColumn,
    Move { task: Task, from: Column, to: Column },
}
