//! Interactive board state: selection, dialogs and the mouse drag gesture.
//!
//! Nothing here touches the terminal, so key and mouse handling can be driven
//! directly from tests.

use crate::board::TaskEdit;
use crate::column::{Column, ColumnId, PALETTE};
use crate::drag::DragSession;
use crate::error::BoardError;
use crate::kanban_board::KanbanBoard;
use crate::notify::{Notifier, Toasts};
use crate::task::{Task, TaskId};
use crate::ui::HitMap;
use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
    /// Colour for a new column, status for an existing task.
    Choice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub title: String,
    pub description: String,
    pub choice: usize,
    pub focus: Field,
}

impl Form {
    fn empty() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            choice: 0,
            focus: Field::Title,
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::Title => Some(&mut self.title),
            Field::Description => Some(&mut self.description),
            Field::Choice => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    AddColumn(Form),
    AddTask {
        column_id: ColumnId,
        form: Form,
    },
    TaskDetails {
        column_id: ColumnId,
        task_id: TaskId,
        form: Form,
    },
}

impl Dialog {
    pub fn form(&self) -> &Form {
        match self {
            Self::AddColumn(form) => form,
            Self::AddTask { form, .. } | Self::TaskDetails { form, .. } => form,
        }
    }

    fn form_mut(&mut self) -> &mut Form {
        match self {
            Self::AddColumn(form) => form,
            Self::AddTask { form, .. } | Self::TaskDetails { form, .. } => form,
        }
    }

    pub fn fields(&self) -> &'static [Field] {
        match self {
            Self::AddColumn(_) => &[Field::Title, Field::Choice],
            Self::AddTask { .. } => &[Field::Title, Field::Description],
            Self::TaskDetails { .. } => &[Field::Title, Field::Description, Field::Choice],
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let fields = self.fields();
        let form = self.form_mut();
        let at = fields.iter().position(|f| *f == form.focus).unwrap_or(0);
        let next = if forward {
            (at + 1) % fields.len()
        } else {
            (at + fields.len() - 1) % fields.len()
        };
        form.focus = fields[next];
    }
}

/// A mouse press on a task that has not been released yet.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Press {
    column_id: ColumnId,
    task_id: TaskId,
    moved: bool,
}

pub struct App {
    pub store: KanbanBoard,
    pub drag: DragSession,
    pub dialog: Option<Dialog>,
    pub toasts: Toasts,
    pub selected_column: usize,
    pub selected_task: usize,
    pub should_quit: bool,
    /// Screen regions from the last draw, used to resolve mouse positions.
    pub hit_map: HitMap,
    press: Option<Press>,
}

impl App {
    pub fn new(store: KanbanBoard, toasts: Toasts) -> Self {
        Self {
            store,
            drag: DragSession::default(),
            dialog: None,
            toasts,
            selected_column: 0,
            selected_task: 0,
            should_quit: false,
            hit_map: HitMap::default(),
            press: None,
        }
    }

    pub fn current_column(&self) -> Option<&Column> {
        self.store.board().columns().get(self.selected_column)
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.current_column()?.tasks.get(self.selected_task)
    }

    fn report(&mut self, err: BoardError) {
        self.toasts.warn(&err.to_string());
    }

    fn report_save_failures(&mut self) {
        for err in self.store.take_failures() {
            self.toasts.warn(&format!("Failed to save board: {err}"));
        }
    }

    fn clamp_selection(&mut self) {
        let columns = self.store.board().columns().len();
        self.selected_column = self.selected_column.min(columns.saturating_sub(1));
        let tasks = self.current_column().map_or(0, |c| c.tasks.len());
        self.selected_task = self.selected_task.min(tasks.saturating_sub(1));
    }

    fn select(&mut self, column_id: ColumnId, task_id: Option<&str>) {
        let columns = self.store.board().columns();
        if let Some(ci) = columns.iter().position(|c| c.id == column_id) {
            self.selected_column = ci;
            self.selected_task = task_id
                .and_then(|id| columns[ci].position_of(id))
                .unwrap_or(0);
        }
        self.clamp_selection();
    }

    pub fn open_add_column(&mut self) {
        self.dialog = Some(Dialog::AddColumn(Form::empty()));
    }

    pub fn open_add_task(&mut self) {
        if let Some(column_id) = self.current_column().map(|c| c.id) {
            self.dialog = Some(Dialog::AddTask {
                column_id,
                form: Form::empty(),
            });
        }
    }

    pub fn open_details(&mut self, column_id: ColumnId, task_id: &str) {
        let board = self.store.board();
        let Some(task) = board.column(column_id).and_then(|c| c.task(task_id)) else {
            return;
        };
        let choice = board
            .titles()
            .iter()
            .position(|t| *t == task.status)
            .unwrap_or(0);
        self.dialog = Some(Dialog::TaskDetails {
            column_id,
            task_id: task.id.clone(),
            form: Form {
                title: task.title.clone(),
                description: task.description.clone(),
                choice,
                focus: Field::Title,
            },
        });
        self.select(column_id, Some(task_id));
    }

    pub fn delete_selected_column(&mut self) {
        let Some(title) = self.current_column().map(|c| c.title.clone()) else {
            return;
        };
        if let Err(err) = self.store.delete_column(&title) {
            self.report(err);
        }
        self.clamp_selection();
    }

    /// Number of options behind the `Choice` field of the open dialog.
    fn choice_count(&self) -> usize {
        match self.dialog {
            Some(Dialog::AddColumn(_)) => PALETTE.len(),
            Some(Dialog::TaskDetails { .. }) => self.store.board().columns().len(),
            _ => 0,
        }
    }

    pub fn submit_dialog(&mut self) {
        let Some(dialog) = self.dialog.clone() else {
            return;
        };
        let result = match &dialog {
            Dialog::AddColumn(form) => {
                let color = PALETTE[form.choice.min(PALETTE.len() - 1)];
                self.store
                    .add_column(&form.title, color)
                    .map(|column| self.select(column.id, None))
            }
            Dialog::AddTask { column_id, form } => self
                .store
                .add_task(*column_id, &form.title, &form.description)
                .map(|task| self.select(*column_id, Some(&task.id))),
            Dialog::TaskDetails {
                column_id,
                task_id,
                form,
            } => {
                let status = self
                    .store
                    .board()
                    .titles()
                    .get(form.choice)
                    .map(|t| t.to_string())
                    .unwrap_or_default();
                let edit = TaskEdit {
                    title: form.title.clone(),
                    description: form.description.clone(),
                    status,
                };
                self.store
                    .update_task(*column_id, task_id, &edit)
                    .map(|()| self.clamp_selection())
            }
        };
        match result {
            Ok(()) => self.dialog = None,
            Err(err) => self.report(err),
        }
    }

    fn delete_dialog_task(&mut self) {
        let Some(Dialog::TaskDetails {
            column_id, task_id, ..
        }) = &self.dialog
        else {
            return;
        };
        let (column_id, task_id) = (*column_id, task_id.clone());
        self.store.delete_task(column_id, &task_id);
        self.dialog = None;
        self.clamp_selection();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.dialog.is_some() {
            self.handle_dialog_key(key);
        } else {
            self.handle_board_key(key);
        }
        self.report_save_failures();
    }

    fn handle_board_key(&mut self, key: KeyEvent) {
        let columns = self.store.board().columns().len();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc if self.drag.is_dragging() => {
                self.drag.cancel();
                self.press = None;
            }
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected_column = self.selected_column.saturating_sub(1);
                self.clamp_selection();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.selected_column + 1 < columns {
                    self.selected_column += 1;
                }
                self.clamp_selection();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_task = self.selected_task.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_task += 1;
                self.clamp_selection();
            }
            KeyCode::Enter => {
                let selected = self
                    .current_column()
                    .zip(self.current_task())
                    .map(|(column, task)| (column.id, task.id.clone()));
                if let Some((column_id, task_id)) = selected {
                    self.open_details(column_id, &task_id);
                }
            }
            KeyCode::Char('n') => self.open_add_task(),
            KeyCode::Char('c') => self.open_add_column(),
            KeyCode::Char('x') => self.delete_selected_column(),
            _ => {}
        }
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) {
        let choices = self.choice_count();
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('d') {
                self.delete_dialog_task();
            }
            return;
        }
        match key.code {
            KeyCode::Esc => self.dialog = None,
            KeyCode::Enter => self.submit_dialog(),
            KeyCode::Tab => dialog.cycle_focus(true),
            KeyCode::BackTab => dialog.cycle_focus(false),
            KeyCode::Left | KeyCode::Right if dialog.form().focus == Field::Choice => {
                let n = choices.max(1);
                let form = dialog.form_mut();
                form.choice = if key.code == KeyCode::Left {
                    (form.choice + n - 1) % n
                } else {
                    (form.choice + 1) % n
                };
            }
            KeyCode::Backspace => {
                if let Some(text) = dialog.form_mut().text_mut() {
                    text.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(text) = dialog.form_mut().text_mut() {
                    text.push(c);
                }
            }
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if self.dialog.is_none() {
            self.handle_pointer(event);
            self.report_save_failures();
        }
    }

    fn handle_pointer(&mut self, event: MouseEvent) {
        let (x, y) = (event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((column_id, task_id)) = self.hit_map.task_at(x, y) {
                    let task_id = task_id.to_string();
                    self.drag.start(task_id.clone(), column_id);
                    self.select(column_id, Some(&task_id));
                    self.press = Some(Press {
                        column_id,
                        task_id,
                        moved: false,
                    });
                } else if let Some(column_id) = self.hit_map.column_at(x, y) {
                    self.select(column_id, None);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) if self.drag.is_dragging() => {
                if let Some(press) = self.press.as_mut() {
                    press.moved = true;
                }
                match self.hit_map.task_at(x, y) {
                    Some((_, task_id)) => {
                        let task_id = task_id.to_string();
                        self.drag.enter_task(task_id);
                    }
                    None => self.drag.leave_task(),
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(press) = self.press.take() else {
                    return;
                };
                if !press.moved {
                    self.drag.cancel();
                    self.open_details(press.column_id, &press.task_id);
                    return;
                }
                let Some(target) = self.hit_map.drop_target_at(x, y) else {
                    tracing::debug!(task = %press.task_id, "drag released outside the board");
                    self.drag.cancel();
                    return;
                };
                if let Some(request) = self.drag.drop_on(target) {
                    match self.store.move_task(&request) {
                        Ok(()) => self.select(request.target_column_id, Some(&request.task_id)),
                        Err(err) => self.report(err),
                    }
                }
            }
            _ => {}
        }
    }
}
