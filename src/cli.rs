use crate::board::{MoveTask, TaskEdit};
use crate::column::{ColumnId, PALETTE};
use crate::config::CONFIG_FILE;
use crate::kanban_board::KanbanBoard;
use crate::notify::Notifier;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about = "Terminal Kanban board")]
pub struct Cli {
    /// Config file to read
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Overrides the board storage file from the config
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Open the interactive board (default)
    Tui,
    /// Write a default config file
    Init,
    /// Print every column and its tasks
    List,
    /// Add a status column
    AddColumn {
        title: String,
        #[arg(long, default_value = PALETTE[0])]
        color: String,
    },
    /// Delete a status column and its tasks
    DeleteColumn { title: String },
    /// Add a task to the end of a column
    AddTask {
        column_id: ColumnId,
        title: String,
        description: String,
    },
    /// Edit a task; a new status moves it to that column
    UpdateTask {
        column_id: ColumnId,
        task_id: String,
        title: String,
        description: String,
        status: String,
    },
    /// Delete a task from a column
    DeleteTask { column_id: ColumnId, task_id: String },
    /// Move a task to another column, optionally above a given task
    Move {
        task_id: String,
        source_column_id: ColumnId,
        target_column_id: ColumnId,
        #[arg(long)]
        before: Option<String>,
    },
}

/// Prints the board in the same column order the TUI shows.
pub fn list(store: &KanbanBoard, out: &mut impl Write) -> io::Result<()> {
    for column in store.board().columns() {
        writeln!(
            out,
            "{} [{}] {} ({})",
            column.id,
            column.color,
            column.title,
            column.tasks.len()
        )?;
        for task in &column.tasks {
            writeln!(out, "  - [{}] {}: {}", task.id, task.title, task.description)?;
        }
    }
    Ok(())
}

/// Runs a non-interactive subcommand against the store. Rejections and failed
/// saves are reported through `notifier` rather than failing the process.
pub fn run(
    command: &Command,
    store: &mut KanbanBoard,
    notifier: &mut impl Notifier,
    out: &mut impl Write,
) -> io::Result<()> {
    let result = match command {
        Command::Tui | Command::Init => return Ok(()),
        Command::List => return list(store, out),
        Command::AddColumn { title, color } => store
            .add_column(title, color)
            .map(|c| format!("added column {} ({})", c.id, c.title)),
        Command::DeleteColumn { title } => store
            .delete_column(title)
            .map(|()| format!("deleted column {title}")),
        Command::AddTask {
            column_id,
            title,
            description,
        } => store
            .add_task(*column_id, title, description)
            .map(|t| format!("added task {} to {}", t.id, t.status)),
        Command::UpdateTask {
            column_id,
            task_id,
            title,
            description,
            status,
        } => {
            let edit = TaskEdit {
                title: title.clone(),
                description: description.clone(),
                status: status.clone(),
            };
            store
                .update_task(*column_id, task_id, &edit)
                .map(|()| format!("updated task {task_id}"))
        }
        Command::DeleteTask { column_id, task_id } => {
            store.delete_task(*column_id, task_id);
            Ok(format!("deleted task {task_id}"))
        }
        Command::Move {
            task_id,
            source_column_id,
            target_column_id,
            before,
        } => store
            .move_task(&MoveTask {
                task_id: task_id.clone(),
                source_column_id: *source_column_id,
                target_column_id: *target_column_id,
                before_task_id: before.clone(),
            })
            .map(|()| format!("moved task {task_id}")),
    };
    match result {
        Ok(message) => writeln!(out, "{message}")?,
        Err(err) => notifier.warn(&err.to_string()),
    }
    for err in store.take_failures() {
        notifier.warn(&format!("Failed to save board: {err}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::error::StorageError;
    use crate::storage::{KeyValueStore, Persist};

    #[derive(Default)]
    struct Collect(Vec<String>);

    impl Notifier for Collect {
        fn warn(&mut self, message: &str) {
            self.0.push(message.to_string());
        }
    }

    fn exec(store: &mut KanbanBoard, args: &[&str]) -> (String, Vec<String>) {
        let argv = std::iter::once("taskboard").chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv).unwrap();
        let mut notes = Collect::default();
        let mut out = Vec::new();
        run(&cli.command.unwrap(), store, &mut notes, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), notes.0)
    }

    #[test]
    fn test_default_command_is_tui() {
        let cli = Cli::try_parse_from(["taskboard"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.config, PathBuf::from(CONFIG_FILE));
    }

    #[test]
    fn test_every_subcommand_has_help() {
        use clap::CommandFactory;
        let cli = Cli::command();
        for sub in cli.get_subcommands() {
            assert!(sub.get_about().is_some(), "{} has no help", sub.get_name());
        }
        let delete = cli.find_subcommand("delete-task").unwrap();
        assert_eq!(
            delete.get_about().unwrap().to_string(),
            "Delete a task from a column"
        );
    }

    #[test]
    fn test_add_column_defaults_color() {
        let mut store = KanbanBoard::new(Board::seed());
        let (out, notes) = exec(&mut store, &["add-column", "Review"]);
        assert_eq!(out.trim(), "added column 4 (Review)");
        assert!(notes.is_empty());
        assert_eq!(store.board().column(4).unwrap().color, PALETTE[0]);
    }

    #[test]
    fn test_rejection_goes_to_notifier() {
        let mut store = KanbanBoard::new(Board::seed());
        let (out, notes) = exec(&mut store, &["add-column", "Todo"]);
        assert!(out.is_empty());
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("same title"));
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&mut self, _: &str, _: &str) -> Result<(), StorageError> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    #[test]
    fn test_failed_save_goes_to_notifier() {
        let mut store = KanbanBoard::new(Board::seed());
        store.subscribe(Persist::new(ReadOnlyStore));
        let (out, notes) = exec(&mut store, &["delete-task", "1", "1"]);
        assert_eq!(out.trim(), "deleted task 1");
        assert_eq!(notes.len(), 1);
        assert!(notes[0].starts_with("Failed to save board"));
        assert!(notes[0].contains("read-only"));
    }

    #[test]
    fn test_move_before() {
        let mut store = KanbanBoard::new(Board::seed());
        exec(&mut store, &["move", "1", "1", "2", "--before", "3"]);
        let column = store.board().column(2).unwrap();
        let ids: Vec<_> = column.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
    }

    #[test]
    fn test_list_output() {
        let mut store = KanbanBoard::new(Board::seed());
        let (out, _) = exec(&mut store, &["list"]);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "1 [#ffcbd7] Todo (1)");
        assert_eq!(lines[1], "  - [1] Item 1: Item 1 description");
        assert_eq!(lines.len(), 7);
    }
}
