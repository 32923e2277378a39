use crate::app::{App, Dialog, Field};
use crate::column::{ColumnId, PALETTE};
use crate::drag::DropTarget;
use crate::task::TaskId;
use chrono::Local;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// Screen rectangles of the columns and task rows drawn last frame.
#[derive(Debug, Default, Clone)]
pub struct HitMap {
    columns: Vec<(Rect, ColumnId)>,
    tasks: Vec<(Rect, ColumnId, TaskId)>,
}

fn contains(rect: &Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

impl HitMap {
    pub fn add_column(&mut self, rect: Rect, column_id: ColumnId) {
        self.columns.push((rect, column_id));
    }

    pub fn add_task(&mut self, rect: Rect, column_id: ColumnId, task_id: impl Into<TaskId>) {
        self.tasks.push((rect, column_id, task_id.into()));
    }

    pub fn task_at(&self, x: u16, y: u16) -> Option<(ColumnId, &str)> {
        self.tasks
            .iter()
            .find(|(rect, ..)| contains(rect, x, y))
            .map(|(_, column_id, task_id)| (*column_id, task_id.as_str()))
    }

    pub fn column_at(&self, x: u16, y: u16) -> Option<ColumnId> {
        self.columns
            .iter()
            .find(|(rect, _)| contains(rect, x, y))
            .map(|(_, column_id)| *column_id)
    }

    pub fn task_rect(&self, task_id: &str) -> Option<Rect> {
        self.tasks
            .iter()
            .find(|(_, _, id)| id == task_id)
            .map(|(rect, ..)| *rect)
    }

    pub fn column_rect(&self, column_id: ColumnId) -> Option<Rect> {
        self.columns
            .iter()
            .find(|(_, id)| *id == column_id)
            .map(|(rect, _)| *rect)
    }

    /// A task row wins over the column around it.
    pub fn drop_target_at(&self, x: u16, y: u16) -> Option<DropTarget> {
        if let Some((column_id, task_id)) = self.task_at(x, y) {
            return Some(DropTarget::Task {
                column_id,
                task_id: task_id.to_string(),
            });
        }
        self.column_at(x, y).map(DropTarget::Column)
    }
}

fn column_color(color: &str) -> Color {
    color.parse().unwrap_or(Color::Gray)
}

fn popup_area(area: Rect, height: u16) -> Rect {
    let width = (area.width / 5 * 3).max(30).min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " Kanban Board ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  n: new task  c: new status  x: delete status  enter: details  q: quit"),
    ]));
    f.render_widget(header, rows[0]);

    draw_columns(f, app, rows[1]);

    let status = match app.toasts.latest() {
        Some(toast) => Line::from(Span::styled(
            format!("[{}] {}", toast.at.format("%H:%M:%S"), toast.message),
            Style::default().fg(Color::Yellow),
        )),
        None if app.drag.is_dragging() => {
            Line::from("Release on a task to drop above it, or on a column to append")
        }
        None => Line::from(format!(
            "{} statuses, {} tasks",
            app.store.board().columns().len(),
            app.store.board().task_count()
        )),
    };
    f.render_widget(Paragraph::new(status), rows[2]);

    if let Some(dialog) = &app.dialog {
        draw_dialog(f, app, dialog);
    }
}

fn draw_columns(f: &mut Frame, app: &mut App, area: Rect) {
    let columns = app.store.board().columns();
    let count = columns.len().max(1) as u32;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..count).map(|_| Constraint::Ratio(1, count)).collect::<Vec<_>>())
        .split(area);

    let mut hit_map = HitMap::default();
    let dragged = app.drag.dragged_task();
    let hover = app.drag.hover_task();

    for (i, column) in columns.iter().enumerate() {
        let chunk = chunks[i];
        hit_map.add_column(chunk, column.id);

        let selected = app.selected_column == i;
        let block = Block::default()
            .title(Line::from(vec![
                Span::styled(
                    format!(" {} ", column.title),
                    Style::default()
                        .fg(Color::Black)
                        .bg(column_color(&column.color))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" {} ", column.tasks.len()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
            .borders(Borders::ALL)
            .border_style(if selected {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            });
        let inner = block.inner(chunk);

        let items: Vec<ListItem> = column
            .tasks
            .iter()
            .enumerate()
            .map(|(row, task)| {
                let mut style = Style::default();
                if selected && app.selected_task == row {
                    style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
                }
                if dragged == Some(task.id.as_str()) {
                    style = style.add_modifier(Modifier::DIM);
                }
                let marker = if hover == Some(task.id.as_str()) && dragged != hover {
                    Span::styled("▶ ", Style::default().fg(Color::Yellow))
                } else {
                    Span::raw("  ")
                };
                ListItem::new(Line::from(vec![
                    marker,
                    Span::styled(task.title.as_str(), style),
                ]))
            })
            .collect();

        for (row, task) in column.tasks.iter().enumerate().take(inner.height as usize) {
            let rect = Rect {
                x: inner.x,
                y: inner.y + row as u16,
                width: inner.width,
                height: 1,
            };
            hit_map.add_task(rect, column.id, task.id.as_str());
        }

        f.render_widget(List::new(items).block(block), chunk);
    }

    app.hit_map = hit_map;
}

fn field_line(label: &str, value: String, focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(format!("{label:>12}: "), style),
        Span::raw(format!("{value}{cursor}")),
    ])
}

fn draw_dialog(f: &mut Frame, app: &App, dialog: &Dialog) {
    let form = dialog.form();
    let focused = |field: Field| form.focus == field;
    let (title, mut lines, hint) = match dialog {
        Dialog::AddColumn(_) => {
            let swatches: Vec<Span> = PALETTE
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    let label = if i == form.choice { "[●]" } else { " ● " };
                    Span::styled(label, Style::default().fg(column_color(c)))
                })
                .collect();
            let mut colors = vec![Span::styled(
                format!("{:>12}: ", "Colors"),
                if focused(Field::Choice) {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                },
            )];
            colors.extend(swatches);
            (
                "Add New Status",
                vec![
                    field_line("Title", form.title.clone(), focused(Field::Title)),
                    Line::from(colors),
                ],
                "tab: next field  ←/→: colour  enter: add  esc: cancel",
            )
        }
        Dialog::AddTask { .. } => (
            "Add New Task",
            vec![
                field_line("Task Title", form.title.clone(), focused(Field::Title)),
                field_line(
                    "Description",
                    form.description.clone(),
                    focused(Field::Description),
                ),
            ],
            "tab: next field  enter: add  esc: cancel",
        ),
        Dialog::TaskDetails { .. } => {
            let status = app
                .store
                .board()
                .titles()
                .get(form.choice)
                .map(|t| format!("< {t} >"))
                .unwrap_or_default();
            (
                "Task Details",
                vec![
                    field_line("Task Title", form.title.clone(), focused(Field::Title)),
                    field_line(
                        "Description",
                        form.description.clone(),
                        focused(Field::Description),
                    ),
                    field_line("Status", status, focused(Field::Choice)),
                ],
                "tab: next field  ←/→: status  enter: save  ctrl-d: delete  esc: close",
            )
        }
    };
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        hint,
        Style::default().fg(Color::DarkGray),
    )));

    let area = popup_area(f.area(), lines.len() as u16 + 2);
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL)),
        area,
    );
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.toasts.expire(Local::now());
        terminal.draw(|f| draw(f, app))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            _ => {}
        }
        if app.should_quit {
            return Ok(());
        }
    }
}
