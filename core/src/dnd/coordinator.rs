use super::{closest_corners, DragSession, DropOutcome, DropZone, Point, Rect};
use crate::domain::Task;

enum DragState {
    Idle,
    /// Pressed on a card, not yet past the activation threshold.
    Pending { task: Task, origin: Point, card: Rect },
    Dragging(DragSession),
}

/// `Idle -> Dragging -> Idle`, with a pending press in between that turns
/// into a drag once the pointer travels more than `threshold` pixels.
pub struct DragCoordinator {
    threshold: f64,
    state: DragState,
}

impl DragCoordinator {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.max(0.0),
            state: DragState::Idle,
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    /// Press on `task`'s card. Refused while a drag is active; a pending
    /// press whose release never arrived is replaced.
    pub fn pointer_down(&mut self, task: &Task, card: Rect, at: Point) -> bool {
        if self.is_dragging() {
            tracing::warn!(
                target: "kanban.dnd",
                task_id = task.id,
                "press ignored: a drag session is already active"
            );
            return false;
        }
        self.state = DragState::Pending {
            task: task.clone(),
            origin: at,
            card,
        };
        true
    }

    /// Track the pointer. Returns the session once dragging.
    pub fn pointer_move(&mut self, at: Point, zones: &[DropZone]) -> Option<&DragSession> {
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        self.state = match state {
            DragState::Pending { task, origin, card } if origin.distance(at) > self.threshold => {
                tracing::debug!(
                    target: "kanban.dnd",
                    stage = "dnd.start",
                    task_id = task.id,
                    column = %task.column
                );
                let mut session = DragSession {
                    task,
                    origin,
                    pointer: at,
                    card,
                    over: None,
                };
                session.over = closest_corners(&session.ghost(), zones);
                DragState::Dragging(session)
            }
            DragState::Dragging(mut session) => {
                session.pointer = at;
                session.over = closest_corners(&session.ghost(), zones);
                DragState::Dragging(session)
            }
            other => other,
        };
        self.session()
    }

    /// Release the pointer. `None` when no gesture was in progress.
    pub fn pointer_up(&mut self, at: Point, zones: &[DropZone]) -> Option<DropOutcome> {
        self.pointer_move(at, zones);
        let outcome = match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => return None,
            DragState::Pending { task, .. } => DropOutcome::Click(task),
            DragState::Dragging(session) => match session.over {
                None => DropOutcome::NoTarget,
                Some(to) if to == session.task.column => DropOutcome::SameColumn,
                Some(to) => DropOutcome::Move {
                    from: session.task.column,
                    task: session.task,
                    to,
                },
            },
        };
        tracing::debug!(target: "kanban.dnd", stage = "dnd.drop", outcome = ?outcome);
        Some(outcome)
    }

    pub fn cancel(&mut self) {
        if !self.is_idle() {
            tracing::debug!(target: "kanban.dnd", stage = "dnd.cancel");
        }
        self.state = DragState::Idle;
    }
}
