//! Screen geometry for the board, kept apart from drawing so mouse hits and
//! drop zones use exactly the rectangles that were rendered.

use kanban_core::api::{Column, ColumnView, DropZone, Point, Rect as PxRect, Task};
use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const HEADER_HEIGHT: u16 = 3;
pub const FOOTER_HEIGHT: u16 = 1;
const DESCRIPTION_LINES: usize = 2;

/// Non-blank description lines shown on a card.
pub fn description_lines(task: &Task) -> Vec<&str> {
    task.description
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(DESCRIPTION_LINES)
        .collect()
}

/// Bordered card: title plus up to two description lines.
pub fn card_height(task: &Task) -> u16 {
    3 + description_lines(task).len() as u16
}

/// Smallest scroll offset >= the lowest one that keeps `selected` fully visible.
pub fn scroll_to_show(tasks: &[Task], selected: usize, scroll: usize, height: u16) -> usize {
    if tasks.is_empty() {
        return 0;
    }
    let selected = selected.min(tasks.len() - 1);
    let mut scroll = scroll.min(selected);
    while scroll < selected {
        let used: u16 = tasks[scroll..=selected].iter().map(card_height).sum();
        if used <= height {
            break;
        }
        scroll += 1;
    }
    scroll
}

/// Terminal cell to pixel conversion for the drag geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellScale {
    pub width: f64,
    pub height: f64,
}

impl CellScale {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Centre of a cell.
    pub fn point(&self, col: u16, row: u16) -> Point {
        Point::new(
            (col as f64 + 0.5) * self.width,
            (row as f64 + 0.5) * self.height,
        )
    }

    pub fn rect(&self, r: Rect) -> PxRect {
        PxRect::new(
            r.x as f64 * self.width,
            r.y as f64 * self.height,
            r.width as f64 * self.width,
            r.height as f64 * self.height,
        )
    }

    /// Back to cells, rounded and clamped inside `bounds`.
    pub fn to_cells(&self, r: &PxRect, bounds: Rect) -> Rect {
        let width = ((r.width / self.width).round() as u16).min(bounds.width);
        let height = ((r.height / self.height).round() as u16).min(bounds.height);
        let max_x = bounds.x + bounds.width - width;
        let max_y = bounds.y + bounds.height - height;
        let x = ((r.x / self.width).round().max(0.0) as u16).clamp(bounds.x, max_x);
        let y = ((r.y / self.height).round().max(0.0) as u16).clamp(bounds.y, max_y);
        Rect::new(x, y, width, height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSlot {
    pub index: usize,
    pub task: Task,
    pub area: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub column: Column,
    pub area: Rect,
    pub inner: Rect,
    /// First row, for the error / loading / empty line.
    pub notice: Option<Rect>,
    pub cards_area: Rect,
    pub cards: Vec<CardSlot>,
    pub hidden_above: usize,
    pub hidden_below: usize,
    pub load_more: Option<Rect>,
    pub add_task: Option<Rect>,
}

impl ColumnLayout {
    fn compute(area: Rect, view: &ColumnView, scroll: usize) -> Self {
        let inner = inset(area);
        let mut top = inner.y;
        let mut bottom = inner.y + inner.height;

        let add_task = take_bottom_row(inner, &mut bottom, top);
        let snap = &view.snapshot;
        let load_more = if snap.has_more || snap.is_fetching_more {
            take_bottom_row(inner, &mut bottom, top)
        } else {
            None
        };
        let wants_notice =
            view.error_text().is_some() || snap.is_loading || snap.tasks.is_empty();
        let notice = if wants_notice && top < bottom {
            top += 1;
            Some(Rect::new(inner.x, top - 1, inner.width, 1))
        } else {
            None
        };

        let cards_area = Rect::new(inner.x, top, inner.width, bottom - top);
        let first = scroll.min(snap.tasks.len());
        let mut cards = Vec::new();
        let mut y = top;
        for (index, task) in snap.tasks.iter().enumerate().skip(first) {
            let h = card_height(task);
            if y + h > bottom {
                break;
            }
            cards.push(CardSlot {
                index,
                task: task.clone(),
                area: Rect::new(inner.x, y, inner.width, h),
            });
            y += h;
        }
        let hidden_below = snap.tasks.len() - first - cards.len();

        Self {
            column: view.column,
            area,
            inner,
            notice,
            cards_area,
            cards,
            hidden_above: first,
            hidden_below,
            load_more,
            add_task,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Card { column: Column, index: usize },
    LoadMore(Column),
    AddTask(Column),
    Search,
    Column(Column),
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardLayout {
    pub area: Rect,
    pub header: Rect,
    pub title: Rect,
    pub search: Rect,
    pub body: Rect,
    pub footer: Rect,
    pub columns: Vec<ColumnLayout>,
}

impl BoardLayout {
    /// `views` in display order; `scroll[i]` is the first card shown in column `i`.
    pub fn compute(area: Rect, views: &[ColumnView], scroll: &[usize; 4]) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);
        let header_parts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(16), Constraint::Min(0)])
            .split(rows[0]);
        let lanes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(rows[1]);

        let columns = views
            .iter()
            .zip(lanes.iter())
            .map(|(view, lane)| {
                let offset = scroll.get(view.column.index()).copied().unwrap_or(0);
                ColumnLayout::compute(*lane, view, offset)
            })
            .collect();

        Self {
            area,
            header: rows[0],
            title: header_parts[0],
            search: header_parts[1],
            body: rows[1],
            footer: rows[2],
            columns,
        }
    }

    pub fn column(&self, column: Column) -> Option<&ColumnLayout> {
        self.columns.iter().find(|c| c.column == column)
    }

    pub fn card(&self, column: Column, index: usize) -> Option<&CardSlot> {
        self.column(column)?.cards.iter().find(|c| c.index == index)
    }

    pub fn hit(&self, x: u16, y: u16) -> Hit {
        if contains(self.search, x, y) {
            return Hit::Search;
        }
        for col in &self.columns {
            if !contains(col.area, x, y) {
                continue;
            }
            if let Some(card) = col.cards.iter().find(|c| contains(c.area, x, y)) {
                return Hit::Card {
                    column: col.column,
                    index: card.index,
                };
            }
            if col.load_more.is_some_and(|r| contains(r, x, y)) {
                return Hit::LoadMore(col.column);
            }
            if col.add_task.is_some_and(|r| contains(r, x, y)) {
                return Hit::AddTask(col.column);
            }
            return Hit::Column(col.column);
        }
        Hit::None
    }

    /// Whole column rectangles in pixels.
    pub fn drop_zones(&self, scale: CellScale) -> Vec<DropZone> {
        self.columns
            .iter()
            .map(|c| DropZone {
                column: c.column,
                rect: scale.rect(c.area),
            })
            .collect()
    }
}

fn inset(area: Rect) -> Rect {
    if area.width < 2 || area.height < 2 {
        return Rect::new(area.x, area.y, 0, 0);
    }
    Rect::new(area.x + 1, area.y + 1, area.width - 2, area.height - 2)
}

fn take_bottom_row(inner: Rect, bottom: &mut u16, top: u16) -> Option<Rect> {
    if *bottom <= top {
        return None;
    }
    *bottom -= 1;
    Some(Rect::new(inner.x, *bottom, inner.width, 1))
}

fn contains(r: Rect, x: u16, y: u16) -> bool {
    x >= r.x && x < r.x + r.width && y >= r.y && y < r.y + r.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanban_core::api::{ColumnSnapshot, NewTask};
    use pretty_assertions::assert_eq;

    fn task(id: u64, description: &str, column: Column) -> Task {
        NewTask::new(format!("task {id}"), description, column).with_id(id)
    }

    fn views(todo: Vec<Task>, has_more: bool) -> Vec<ColumnView> {
        Column::ALL
            .iter()
            .map(|c| {
                let tasks = if *c == Column::Todo { todo.clone() } else { Vec::new() };
                ColumnView::new(
                    *c,
                    "",
                    ColumnSnapshot {
                        tasks,
                        has_more: has_more && *c == Column::Todo,
                        ..ColumnSnapshot::default()
                    },
                )
            })
            .collect()
    }

    #[test]
    fn card_height_counts_two_description_lines_at_most() {
        assert_eq!(card_height(&task(1, "", Column::Todo)), 3);
        assert_eq!(card_height(&task(1, "a\n\nb\nc", Column::Todo)), 5);
    }

    #[test]
    fn columns_split_body_in_four() {
        let layout = BoardLayout::compute(Rect::new(0, 0, 80, 24), &views(vec![], false), &[0; 4]);
        assert_eq!(layout.columns.len(), 4);
        assert_eq!(layout.columns[0].area, Rect::new(0, 3, 20, 20));
        assert_eq!(layout.columns[3].area.x, 60);
        assert_eq!(layout.footer, Rect::new(0, 23, 80, 1));
    }

    #[test]
    fn cards_stack_below_and_affordances_sit_at_bottom() {
        let tasks = vec![task(1, "", Column::Todo), task(2, "milk", Column::Todo)];
        let layout = BoardLayout::compute(Rect::new(0, 0, 80, 24), &views(tasks, true), &[0; 4]);
        let todo = layout.column(Column::Todo).unwrap();
        assert_eq!(todo.notice, None);
        assert_eq!(todo.cards[0].area, Rect::new(1, 4, 18, 3));
        assert_eq!(todo.cards[1].area, Rect::new(1, 7, 18, 4));
        assert_eq!(todo.add_task.map(|r| r.y), Some(21));
        assert_eq!(todo.load_more.map(|r| r.y), Some(20));

        let empty = layout.column(Column::Done).unwrap();
        assert!(empty.notice.is_some());
        assert!(empty.load_more.is_none());
    }

    #[test]
    fn hit_resolves_cards_and_affordances() {
        let tasks = vec![task(1, "", Column::Todo), task(2, "", Column::Todo)];
        let layout = BoardLayout::compute(Rect::new(0, 0, 80, 24), &views(tasks, true), &[0; 4]);
        assert_eq!(layout.hit(5, 8), Hit::Card { column: Column::Todo, index: 1 });
        assert_eq!(layout.hit(5, 20), Hit::LoadMore(Column::Todo));
        assert_eq!(layout.hit(25, 21), Hit::AddTask(Column::InProgress));
        assert_eq!(layout.hit(45, 10), Hit::Column(Column::Review));
        assert_eq!(layout.hit(30, 1), Hit::Search);
        assert_eq!(layout.hit(30, 23), Hit::None);
    }

    #[test]
    fn scrolled_column_skips_leading_cards() {
        let tasks: Vec<_> = (1..=8).map(|i| task(i, "", Column::Todo)).collect();
        let mut scroll = [0; 4];
        scroll[0] = 3;
        let layout = BoardLayout::compute(Rect::new(0, 0, 80, 24), &views(tasks, false), &scroll);
        let todo = layout.column(Column::Todo).unwrap();
        assert_eq!(todo.cards[0].index, 3);
        assert_eq!(todo.hidden_above, 3);
        assert_eq!(todo.cards.len() + todo.hidden_above + todo.hidden_below, 8);
    }

    #[test]
    fn scroll_follows_selection_downwards_only_as_needed() {
        let tasks: Vec<_> = (1..=10).map(|i| task(i, "", Column::Todo)).collect();
        assert_eq!(scroll_to_show(&tasks, 2, 0, 9), 0);
        assert_eq!(scroll_to_show(&tasks, 5, 0, 9), 3);
        assert_eq!(scroll_to_show(&tasks, 1, 3, 9), 1);
        assert_eq!(scroll_to_show(&[], 4, 2, 9), 0);
    }

    #[test]
    fn cell_scale_round_trips_rects() {
        let scale = CellScale::new(8.0, 16.0);
        let cells = Rect::new(2, 3, 10, 4);
        let px = scale.rect(cells);
        assert_eq!(px, PxRect::new(16.0, 48.0, 80.0, 64.0));
        assert_eq!(scale.to_cells(&px, Rect::new(0, 0, 80, 24)), cells);
        assert_eq!(scale.point(0, 0), Point::new(4.0, 8.0));

        let off_screen = px.translate(-400.0, 1000.0);
        assert_eq!(scale.to_cells(&off_screen, Rect::new(0, 0, 80, 24)), Rect::new(0, 20, 10, 4));
    }

    #[test]
    fn drop_zones_cover_whole_columns() {
        let layout = BoardLayout::compute(Rect::new(0, 0, 80, 24), &views(vec![], false), &[0; 4]);
        let zones = layout.drop_zones(CellScale::new(8.0, 16.0));
        assert_eq!(zones[1].column, Column::InProgress);
        assert_eq!(zones[1].rect, PxRect::new(160.0, 48.0, 160.0, 320.0));
    }
}
