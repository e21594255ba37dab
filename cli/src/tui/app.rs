use std::future::Future;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use kanban_core::api::{
    Board, Column, ColumnView, DropOutcome, LoadMore, Task, TaskForm, TaskServiceError, TuiConfig,
};
use ratatui::layout::Rect;
use tokio::sync::mpsc;

use super::layout::{scroll_to_show, BoardLayout, CellScale, Hit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Column,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Column,
            FormField::Column => FormField::Title,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::Column,
            FormField::Description => FormField::Title,
            FormField::Column => FormField::Description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Search,
    Form {
        form: TaskForm,
        field: FormField,
    },
    ConfirmDelete {
        task: Task,
        deleting: bool,
        error: Option<String>,
    },
}

/// Results of background operations, delivered back to the UI loop.
pub enum AppMsg {
    Submitted(Result<Task, TaskServiceError>),
    Deleted(Result<(), TaskServiceError>),
    Moved(Result<Option<Task>, TaskServiceError>),
    LoadedMore(Column, LoadMore),
}

pub struct BoardApp {
    pub config: TuiConfig,
    pub board: Board,
    pub mode: Mode,
    pub focus: Column,
    pub selected: [usize; 4],
    pub scroll: [usize; 4],
    pub notice: Option<String>,
    pub views: Vec<ColumnView>,
    /// Geometry of the last drawn frame; mouse input is resolved against it.
    pub layout: BoardLayout,
    msg_tx: mpsc::UnboundedSender<AppMsg>,
}

impl BoardApp {
    pub fn new(config: TuiConfig, board: Board, msg_tx: mpsc::UnboundedSender<AppMsg>) -> Self {
        let views = board.columns();
        Self {
            config,
            board,
            mode: Mode::Normal,
            focus: Column::Todo,
            selected: [0; 4],
            scroll: [0; 4],
            notice: None,
            views,
            layout: BoardLayout::default(),
            msg_tx,
        }
    }

    pub fn scale(&self) -> CellScale {
        CellScale::new(self.config.cell_width_px, self.config.cell_height_px)
    }

    /// Re-read the columns and lay them out for `area`, scrolling each column
    /// so its selected card stays visible.
    pub fn refresh(&mut self, area: Rect) {
        self.views = self.board.columns();
        for view in &self.views {
            let i = view.column.index();
            self.selected[i] = self.selected[i].min(view.snapshot.tasks.len().saturating_sub(1));
        }
        self.layout = BoardLayout::compute(area, &self.views, &self.scroll);

        let mut changed = false;
        for (view, col) in self.views.iter().zip(&self.layout.columns) {
            let i = view.column.index();
            let fitted = scroll_to_show(
                &view.snapshot.tasks,
                self.selected[i],
                self.scroll[i],
                col.cards_area.height,
            );
            if fitted != self.scroll[i] {
                self.scroll[i] = fitted;
                changed = true;
            }
        }
        if changed {
            self.layout = BoardLayout::compute(area, &self.views, &self.scroll);
        }
    }

    pub fn view(&self, column: Column) -> Option<&ColumnView> {
        self.views.get(column.index())
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.view(self.focus)?
            .snapshot
            .tasks
            .get(self.selected[self.focus.index()])
    }

    /// Returns true when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        match self.mode {
            Mode::Normal => return self.handle_normal_key(key),
            Mode::Search => self.handle_search_key(key),
            Mode::Form { .. } => self.handle_form_key(key),
            Mode::ConfirmDelete { .. } => self.handle_confirm_key(key),
        }
        false
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                self.board.cancel_drag();
                self.notice = None;
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if let Some(prev) = self.focus.prev() {
                    self.focus = prev;
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if let Some(next) = self.focus.next() {
                    self.focus = next;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.select_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.select_by(1),
            KeyCode::Char('/') => self.mode = Mode::Search,
            KeyCode::Char('n') => self.open_create(self.focus),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(task) = self.selected_task().cloned() {
                    self.mode = Mode::Form {
                        form: TaskForm::edit(&task),
                        field: FormField::Title,
                    };
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.selected_task().cloned() {
                    self.mode = Mode::ConfirmDelete {
                        task,
                        deleting: false,
                        error: None,
                    };
                }
            }
            KeyCode::Char('m') => self.load_more(self.focus),
            KeyCode::Char('r') => {
                self.board.refresh();
                self.notice = Some("Refreshing…".to_string());
            }
            KeyCode::Char('<') => self.move_selected(self.focus.prev()),
            KeyCode::Char('>') => self.move_selected(self.focus.next()),
            _ => {}
        }
        false
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => self.mode = Mode::Normal,
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.board.set_search_input("");
            }
            KeyCode::Backspace => {
                let mut raw = self.board.search_input().to_string();
                if raw.pop().is_some() {
                    self.board.set_search_input(raw);
                }
            }
            KeyCode::Char(ch) => {
                let raw = format!("{}{}", self.board.search_input(), ch);
                self.board.set_search_input(raw);
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Mode::Form { form, field } = &mut self.mode else {
            return;
        };
        if form.submitting {
            return;
        }
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => *field = field.next(),
            KeyCode::BackTab | KeyCode::Up => *field = field.prev(),
            KeyCode::Enter => {
                if let Some(submission) = form.submission() {
                    let ops = self.board.ops().clone();
                    self.spawn(async move { AppMsg::Submitted(ops.submit(submission).await) });
                }
            }
            KeyCode::Left if *field == FormField::Column => {
                if let Some(prev) = form.column.prev() {
                    form.column = prev;
                }
            }
            KeyCode::Right if *field == FormField::Column => {
                if let Some(next) = form.column.next() {
                    form.column = next;
                }
            }
            KeyCode::Backspace => match field {
                FormField::Title => {
                    form.title.pop();
                }
                FormField::Description => {
                    form.description.pop();
                }
                FormField::Column => {}
            },
            KeyCode::Char(ch) => match field {
                FormField::Title => {
                    form.title.push(ch);
                    form.field_error = None;
                }
                FormField::Description => form.description.push(ch),
                FormField::Column => {}
            },
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        let Mode::ConfirmDelete {
            task,
            deleting,
            error,
        } = &mut self.mode
        else {
            return;
        };
        if *deleting {
            return;
        }
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                *deleting = true;
                *error = None;
                let ops = self.board.ops().clone();
                let task = task.clone();
                self.spawn(async move { AppMsg::Deleted(ops.delete_task(&task).await) });
            }
            KeyCode::Char('n') | KeyCode::Esc => self.mode = Mode::Normal,
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.mode != Mode::Normal && self.mode != Mode::Search {
            return;
        }
        let scale = self.scale();
        let at = scale.point(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                match self.layout.hit(mouse.column, mouse.row) {
                    Hit::Card { column, index } => {
                        self.mode = Mode::Normal;
                        self.focus = column;
                        self.selected[column.index()] = index;
                        if let Some(slot) = self.layout.card(column, index).cloned() {
                            self.board.pointer_down(&slot.task, scale.rect(slot.area), at);
                        }
                    }
                    Hit::LoadMore(column) => {
                        self.focus = column;
                        self.load_more(column);
                    }
                    Hit::AddTask(column) => {
                        self.focus = column;
                        self.open_create(column);
                    }
                    Hit::Search => self.mode = Mode::Search,
                    Hit::Column(column) => {
                        self.mode = Mode::Normal;
                        self.focus = column;
                    }
                    Hit::None => {}
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let zones = self.layout.drop_zones(scale);
                self.board.pointer_move(at, &zones);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let zones = self.layout.drop_zones(scale);
                if let Some(outcome) = self.board.pointer_up(at, &zones) {
                    self.apply_drop(outcome);
                }
            }
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                if let Hit::Card { column, .. } | Hit::Column(column) =
                    self.layout.hit(mouse.column, mouse.row)
                {
                    self.focus = column;
                    let step = if mouse.kind == MouseEventKind::ScrollDown { 1 } else { -1 };
                    self.select_by(step);
                }
            }
            _ => {}
        }
    }

    pub fn handle_msg(&mut self, msg: AppMsg) {
        match msg {
            AppMsg::Submitted(result) => {
                let Mode::Form { form, .. } = &mut self.mode else {
                    return;
                };
                let edit = form.is_edit();
                if form.finish(&result) {
                    self.mode = Mode::Normal;
                    self.notice = Some(if edit { "Task updated" } else { "Task created" }.to_string());
                }
            }
            AppMsg::Deleted(result) => match result {
                Ok(()) => {
                    self.mode = Mode::Normal;
                    self.notice = Some("Task deleted".to_string());
                }
                Err(err) => {
                    tracing::warn!(target: "kanban.tui", error = %err, "delete failed");
                    if let Mode::ConfirmDelete {
                        deleting, error, ..
                    } = &mut self.mode
                    {
                        *deleting = false;
                        *error = Some(err.user_message());
                    }
                }
            },
            AppMsg::Moved(result) => {
                // Failures were already logged by the move itself.
                if let Ok(Some(task)) = result {
                    self.notice = Some(format!("Moved \"{}\" to {}", task.title, task.column.label()));
                }
            }
            AppMsg::LoadedMore(column, outcome) => {
                tracing::debug!(target: "kanban.tui", column = %column, outcome = ?outcome, "load more finished");
            }
        }
    }

    fn apply_drop(&mut self, outcome: DropOutcome) {
        if let DropOutcome::Click(task) = &outcome {
            self.focus = task.column;
            return;
        }
        if matches!(outcome, DropOutcome::Move { .. }) {
            let ops = self.board.ops().clone();
            self.spawn(async move { AppMsg::Moved(ops.apply_drop(&outcome).await) });
        }
    }

    fn open_create(&mut self, column: Column) {
        self.mode = Mode::Form {
            form: TaskForm::create(column),
            field: FormField::Title,
        };
    }

    fn select_by(&mut self, delta: isize) {
        let i = self.focus.index();
        let len = self
            .view(self.focus)
            .map(|v| v.snapshot.tasks.len())
            .unwrap_or(0);
        if len == 0 {
            return;
        }
        self.selected[i] = self.selected[i]
            .saturating_add_signed(delta)
            .min(len - 1);
    }

    fn load_more(&self, column: Column) {
        let Some(key) = self.board.subscription(column).map(|s| s.key().clone()) else {
            return;
        };
        let ops = self.board.ops().clone();
        self.spawn(async move { AppMsg::LoadedMore(column, ops.load_more(&key).await) });
    }

    /// Keyboard counterpart of a drag between neighbouring columns.
    fn move_selected(&mut self, to: Option<Column>) {
        let (Some(task), Some(to)) = (self.selected_task().cloned(), to) else {
            return;
        };
        let ops = self.board.ops().clone();
        self.spawn(async move { AppMsg::Moved(ops.move_task(&task, to).await) });
    }

    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = AppMsg> + Send + 'static,
    {
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(fut.await);
        });
    }
}
