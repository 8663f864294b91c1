/// Newline-delimited JSON command protocol.
///
/// Each input line is one `Command`; after applying it the backend writes
/// one line with the full board snapshot. Lines that don't parse are logged
/// and skipped without output.
use std::io::{self, BufRead, Write};

use serde::{Deserialize, Serialize};
use tasklane_core::{Board, DragEvent, DraggedEntity, List, Task, TaskPatch};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    AddList { title: String },
    UpdateListTitle { list_id: String, title: String },
    DeleteList { list_id: String },
    AddTask { list_id: String, content: String },
    UpdateTask { task_id: String, patch: TaskPatch },
    DeleteTask { task_id: String },
    MoveList { source_id: String, target_id: String },
    Drag { event: DragEvent },
    Snapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub lists: Vec<List>,
    pub tasks: Vec<Task>,
    pub dragging: Option<DraggedEntity>,
}

impl BoardSnapshot {
    pub fn of(board: &Board) -> Self {
        Self {
            lists: board.lists().to_vec(),
            tasks: board.tasks().to_vec(),
            dragging: board.drag_session().preview(),
        }
    }
}

/// Apply one command. Returns whether the board changed.
pub fn apply(board: &mut Board, command: Command) -> bool {
    match command {
        Command::AddList { title } => board.add_list(&title).is_some(),
        Command::UpdateListTitle { list_id, title } => board.update_list_title(&list_id, &title),
        Command::DeleteList { list_id } => board.delete_list(&list_id),
        Command::AddTask { list_id, content } => board.add_task(&list_id, &content).is_some(),
        Command::UpdateTask { task_id, patch } => board.update_task(&task_id, patch),
        Command::DeleteTask { task_id } => board.delete_task(&task_id),
        Command::MoveList {
            source_id,
            target_id,
        } => board.move_list(&source_id, &target_id),
        Command::Drag { event } => board.handle_drag_event(event),
        Command::Snapshot => false,
    }
}

/// Read commands from `input` until EOF, answering each with a snapshot.
pub fn serve<R: BufRead, W: Write>(board: &mut Board, input: R, mut output: W) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command: Command = match serde_json::from_str(&line) {
            Ok(command) => command,
            Err(e) => {
                log::warn!("[tasklane.backend] Skipping unparseable command: {}", e);
                continue;
            }
        };

        if apply(board, command) {
            log::debug!("[tasklane.backend] Board changed");
        }

        serde_json::to_writer(&mut output, &BoardSnapshot::of(board))?;
        output.write_all(b"\n")?;
        output.flush()?;
    }
    Ok(())
}
