use kanban_core::api::{Accent, ColumnView, Task};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::app::{BoardApp, FormField, Mode};
use super::layout::{description_lines, CardSlot, ColumnLayout};

pub fn draw(f: &mut Frame<'_>, app: &BoardApp) {
    draw_header(f, app);
    for (col, view) in app.layout.columns.iter().zip(&app.views) {
        draw_column(f, app, col, view);
    }
    draw_ghost(f, app);
    draw_footer(f, app);

    match &app.mode {
        Mode::Form { .. } => draw_form(f, app),
        Mode::ConfirmDelete { .. } => draw_confirm(f, app),
        Mode::Normal | Mode::Search => {}
    }
}

fn accent_color(accent: Accent) -> Color {
    match accent {
        Accent::Slate => Color::Gray,
        Accent::Amber => Color::Yellow,
        Accent::Violet => Color::Magenta,
        Accent::Emerald => Color::Green,
    }
}

fn draw_header(f: &mut Frame<'_>, app: &BoardApp) {
    let title = Paragraph::new(Line::from(Span::styled(
        "Kanban",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, app.layout.title);

    let searching = app.mode == Mode::Search;
    let input = app.board.search_input();
    let mut spans = Vec::new();
    if input.is_empty() && !searching {
        spans.push(Span::styled(
            "Search tasks… (/)",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(input.to_string()));
    }
    if searching {
        spans.push(Span::styled("▏", Style::default().fg(Color::Cyan)));
    }
    if input != app.board.search() {
        spans.push(Span::styled("  …", Style::default().fg(Color::DarkGray)));
    }

    let mut block = Block::default().borders(Borders::ALL).title(" Search ");
    if searching {
        block = block.border_style(Style::default().fg(Color::Cyan));
    }
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), app.layout.search);
}

fn draw_column(f: &mut Frame<'_>, app: &BoardApp, col: &ColumnLayout, view: &ColumnView) {
    let focused = app.focus == col.column;
    let hovered = app
        .board
        .drag_session()
        .is_some_and(|s| s.over == Some(col.column));
    let accent = accent_color(view.accent);

    let title_style = if focused {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(accent)
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(vec![
            Span::styled(format!(" {} ", view.label), title_style),
            Span::styled(
                format!("{} ", view.count_label()),
                Style::default().fg(Color::Gray),
            ),
        ]))
        .border_style(Style::default().fg(if focused { accent } else { Color::DarkGray }));
    if hovered {
        block = block
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(Color::Cyan));
    }
    if col.hidden_above > 0 || col.hidden_below > 0 {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" ↑{} ↓{} ", col.hidden_above, col.hidden_below),
            Style::default().fg(Color::DarkGray),
        )));
    }
    f.render_widget(block, col.area);

    if let Some(area) = col.notice {
        let line = if let Some(err) = view.error_text() {
            Span::styled(err, Style::default().fg(Color::Red))
        } else if view.snapshot.is_loading {
            Span::styled("Loading…", Style::default().fg(Color::Gray))
        } else if !view.search.is_empty() {
            Span::styled("No matching tasks", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled("No tasks", Style::default().fg(Color::DarkGray))
        };
        f.render_widget(Paragraph::new(Line::from(line)), area);
    }

    let dragged = app.board.drag_session().map(|s| s.task.id);
    for slot in &col.cards {
        let selected = focused && app.selected[col.column.index()] == slot.index;
        draw_card(f, slot, selected, dragged == Some(slot.task.id));
    }

    if let Some(area) = col.load_more {
        let text = if view.snapshot.is_fetching_more {
            Span::styled("Loading more…", Style::default().fg(Color::Gray))
        } else {
            Span::styled(
                "Load more (m)",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
            )
        };
        f.render_widget(
            Paragraph::new(Line::from(text)).alignment(Alignment::Center),
            area,
        );
    }
    if let Some(area) = col.add_task {
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "+ Add task",
                Style::default().fg(Color::DarkGray),
            ))),
            area,
        );
    }
}

fn card_lines(task: &Task, dimmed: bool) -> Vec<Line<'_>> {
    let title_style = if dimmed {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let mut lines = vec![Line::from(Span::styled(task.title.as_str(), title_style))];
    for desc in description_lines(task) {
        lines.push(Line::from(Span::styled(desc, Style::default().fg(Color::Gray))));
    }
    lines
}

fn draw_card(f: &mut Frame<'_>, slot: &CardSlot, selected: bool, dragged: bool) {
    let border = if dragged {
        Style::default().fg(Color::DarkGray)
    } else if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);
    f.render_widget(
        Paragraph::new(card_lines(&slot.task, dragged)).block(block),
        slot.area,
    );
}

/// Card copy following the pointer while a drag is active.
fn draw_ghost(f: &mut Frame<'_>, app: &BoardApp) {
    let Some(session) = app.board.drag_session() else {
        return;
    };
    let area = app.scale().to_cells(&session.ghost(), app.layout.body);
    if area.width < 2 || area.height < 2 {
        return;
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(card_lines(&session.task, false)).block(block),
        area,
    );
}

fn draw_footer(f: &mut Frame<'_>, app: &BoardApp) {
    let line = if let Some(notice) = &app.notice {
        Line::from(Span::styled(notice.as_str(), Style::default().fg(Color::Yellow)))
    } else {
        let hints = match app.mode {
            Mode::Normal => "←→ column  ↑↓ card  n new  e edit  d delete  </> move  m more  r refresh  / search  q quit",
            Mode::Search => "type to filter  Ctrl-U clear  Enter/Esc done",
            Mode::Form { .. } => "Tab next field  ←→ column  Enter save  Esc cancel",
            Mode::ConfirmDelete { .. } => "y delete  n cancel",
        };
        Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray)))
    };
    f.render_widget(Paragraph::new(line), app.layout.footer);
}

fn draw_form(f: &mut Frame<'_>, app: &BoardApp) {
    let Mode::Form { form, field } = &app.mode else {
        return;
    };
    let area = centered_rect(56, 12, app.layout.area);
    let title = if form.is_edit() { " Edit task " } else { " New task " };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Cyan));

    let label = |name: &'static str, this: FormField| {
        let style = if *field == this {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        Span::styled(name, style)
    };
    let cursor = |this: FormField| if *field == this { "▏" } else { "" };

    let mut lines = vec![
        Line::from(vec![
            label("Title       ", FormField::Title),
            Span::raw(form.title.as_str()),
            Span::styled(cursor(FormField::Title), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(Span::styled(
            form.field_error.clone().unwrap_or_default(),
            Style::default().fg(Color::Red),
        )),
        Line::from(vec![
            label("Description ", FormField::Description),
            Span::raw(form.description.as_str()),
            Span::styled(cursor(FormField::Description), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(""),
        Line::from(vec![
            label("Column      ", FormField::Column),
            Span::raw("◀ "),
            Span::styled(
                form.column.label(),
                Style::default().fg(accent_color(form.column.spec().accent)),
            ),
            Span::raw(" ▶"),
        ]),
        Line::from(""),
    ];
    if let Some(err) = &form.submit_error {
        lines.push(Line::from(Span::styled(err.as_str(), Style::default().fg(Color::Red))));
    } else if form.submitting {
        lines.push(Line::from(Span::styled("Saving…", Style::default().fg(Color::Gray))));
    }

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_confirm(f: &mut Frame<'_>, app: &BoardApp) {
    let Mode::ConfirmDelete {
        task,
        deleting,
        error,
    } = &app.mode
    else {
        return;
    };
    let area = centered_rect(48, 8, app.layout.area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Delete task ")
        .border_style(Style::default().fg(Color::Red));

    let mut lines = vec![
        Line::from(format!("Delete \"{}\"?", task.title)),
        Line::from(Span::styled(
            "This cannot be undone.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];
    if *deleting {
        lines.push(Line::from(Span::styled("Deleting…", Style::default().fg(Color::Gray))));
    } else if let Some(err) = error {
        lines.push(Line::from(Span::styled(err.as_str(), Style::default().fg(Color::Red))));
    } else {
        lines.push(Line::from(vec![
            Span::styled("[y] ", Style::default().fg(Color::Red)),
            Span::raw("delete   "),
            Span::styled("[n] ", Style::default().fg(Color::Cyan)),
            Span::raw("cancel"),
        ]));
    }

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
