/// The board: authoritative lists, tasks and drag session.
///
/// Sequences are held as `Arc<[T]>` snapshots and every mutation swaps in a
/// new one, so a reader that kept an older snapshot never sees it change and
/// can detect updates with `Arc::ptr_eq`. After each commit the affected
/// slot is saved and a `BoardChange` is broadcast. A failed save is logged
/// and otherwise ignored; memory stays the source of truth.
use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::config::StoreConfig;
use crate::drag::{DragEvent, DragSession, DropTarget, MoveIntent};
use crate::reorder::{self, ReorderError};
use crate::storage::memory::MemoryStore;
use crate::storage::{self, SlotStore};
use crate::types::{DraggedEntity, EntityKind, List, Task, TaskPatch};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Published after every committed replacement, carrying the new snapshot.
#[derive(Debug, Clone)]
pub enum BoardChange {
    ListsReplaced(Arc<[List]>),
    TasksReplaced(Arc<[Task]>),
}

pub struct Board {
    lists: Arc<[List]>,
    tasks: Arc<[Task]>,
    drag: DragSession,
    store: Box<dyn SlotStore>,
    keys: StoreConfig,
    changes: broadcast::Sender<BoardChange>,
}

impl Board {
    /// Load both slots from `store` (missing or broken slots start empty) and
    /// repair anything that breaks the board invariants.
    pub fn open(store: Box<dyn SlotStore>, keys: StoreConfig) -> Self {
        let lists: Vec<List> = storage::load(store.as_ref(), &keys.lists_key, Vec::new());
        let tasks: Vec<Task> = storage::load(store.as_ref(), &keys.tasks_key, Vec::new());
        let (lists, tasks) = repair(lists, tasks);

        log::info!(
            "[tasklane.board] Opened board with {} lists and {} tasks",
            lists.len(),
            tasks.len()
        );

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            lists: Arc::from(lists),
            tasks: Arc::from(tasks),
            drag: DragSession::Idle,
            store,
            keys,
            changes,
        }
    }

    /// An empty board that persists nowhere.
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryStore::new()), StoreConfig::default())
    }

    pub fn lists(&self) -> Arc<[List]> {
        Arc::clone(&self.lists)
    }

    pub fn tasks(&self) -> Arc<[Task]> {
        Arc::clone(&self.tasks)
    }

    pub fn list(&self, list_id: &str) -> Option<&List> {
        self.lists.iter().find(|l| l.id == list_id)
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Cards of one column, in column order.
    pub fn tasks_for_list(&self, list_id: &str) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.list_id == list_id).collect()
    }

    pub fn drag_session(&self) -> &DragSession {
        &self.drag
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardChange> {
        self.changes.subscribe()
    }

    fn commit_lists(&mut self, lists: Vec<List>) {
        self.lists = Arc::from(lists);
        storage::save(self.store.as_ref(), &self.keys.lists_key, &*self.lists);
        let _ = self
            .changes
            .send(BoardChange::ListsReplaced(Arc::clone(&self.lists)));
    }

    fn commit_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = Arc::from(tasks);
        storage::save(self.store.as_ref(), &self.keys.tasks_key, &*self.tasks);
        let _ = self
            .changes
            .send(BoardChange::TasksReplaced(Arc::clone(&self.tasks)));
    }

    /// Append a list. Returns its id, or `None` if the title is blank.
    pub fn add_list(&mut self, title: &str) -> Option<String> {
        let title = title.trim();
        if title.is_empty() {
            log::debug!("[tasklane.board] Discarding list with blank title");
            return None;
        }

        let list = List::new(title);
        let id = list.id.clone();
        let mut lists = self.lists.to_vec();
        lists.push(list);
        self.commit_lists(lists);
        Some(id)
    }

    pub fn update_list_title(&mut self, list_id: &str, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            log::debug!("[tasklane.board] Discarding blank title for list {}", list_id);
            return false;
        }
        let Some(index) = self.lists.iter().position(|l| l.id == list_id) else {
            log::debug!("[tasklane.board] Rename of unknown list {}", list_id);
            return false;
        };
        if self.lists[index].title == title {
            return false;
        }

        let mut lists = self.lists.to_vec();
        lists[index].title = title.to_string();
        self.commit_lists(lists);
        true
    }

    /// Delete a list and every task in it. Unknown ids are a no-op.
    pub fn delete_list(&mut self, list_id: &str) -> bool {
        if self.list(list_id).is_none() {
            return false;
        }

        // Tasks first: a failure between the two writes leaves an empty list
        // on disk, never orphaned tasks.
        if self.tasks.iter().any(|t| t.list_id == list_id) {
            let tasks = self
                .tasks
                .iter()
                .filter(|t| t.list_id != list_id)
                .cloned()
                .collect();
            self.commit_tasks(tasks);
        }

        let lists = self
            .lists
            .iter()
            .filter(|l| l.id != list_id)
            .cloned()
            .collect();
        self.commit_lists(lists);
        true
    }

    /// Move list `source_id` to the position of `target_id`.
    pub fn move_list(&mut self, source_id: &str, target_id: &str) -> bool {
        match reorder::move_list(&self.lists, source_id, target_id) {
            Ok(Some(lists)) => {
                self.commit_lists(lists);
                true
            }
            Ok(None) => false,
            Err(e) => move_aborted(e),
        }
    }

    /// Append a task to the end of a list. Returns its id, or `None` if the
    /// content is blank or the list does not exist.
    pub fn add_task(&mut self, list_id: &str, content: &str) -> Option<String> {
        let content = content.trim();
        if content.is_empty() {
            log::debug!("[tasklane.board] Discarding task with blank content");
            return None;
        }
        if self.list(list_id).is_none() {
            log::warn!(
                "[tasklane.board] Refusing to add task to unknown list {}",
                list_id
            );
            return None;
        }

        let task = Task::new(list_id, content);
        let id = task.id.clone();
        let mut tasks = self.tasks.to_vec();
        tasks.push(task);
        self.commit_tasks(tasks);
        Some(id)
    }

    /// Apply a partial update. Blank content discards the whole patch; a blank
    /// description clears it. A task moved to another list this way keeps its
    /// place in the global sequence.
    pub fn update_task(&mut self, task_id: &str, patch: TaskPatch) -> bool {
        let Some(index) = self.tasks.iter().position(|t| t.id == task_id) else {
            log::debug!("[tasklane.board] Update of unknown task {}", task_id);
            return false;
        };
        let current = &self.tasks[index];
        let mut updated = current.clone();

        if let Some(content) = patch.content {
            let content = content.trim();
            if content.is_empty() {
                log::debug!("[tasklane.board] Discarding blank content for task {}", task_id);
                return false;
            }
            updated.content = content.to_string();
        }

        if let Some(description) = patch.description {
            updated.description = description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty());
        }

        if let Some(due_date) = patch.due_date {
            updated.due_date = due_date;
        }

        if let Some(list_id) = patch.list_id {
            if self.list(&list_id).is_none() {
                log::warn!(
                    "[tasklane.board] Refusing to move task {} to unknown list {}",
                    task_id,
                    list_id
                );
                return false;
            }
            updated.list_id = list_id;
        }

        if updated == *current {
            return false;
        }

        let mut tasks = self.tasks.to_vec();
        tasks[index] = updated;
        self.commit_tasks(tasks);
        true
    }

    /// Delete a task. Unknown ids are a no-op.
    pub fn delete_task(&mut self, task_id: &str) -> bool {
        if self.task(task_id).is_none() {
            return false;
        }
        let tasks = self
            .tasks
            .iter()
            .filter(|t| t.id != task_id)
            .cloned()
            .collect();
        self.commit_tasks(tasks);
        true
    }

    /// Move task `active_id` to the position of task `over_id`, switching
    /// lists if the over task lives elsewhere.
    pub fn move_task(&mut self, active_id: &str, over_id: &str) -> bool {
        match reorder::move_task_within_or_across_list(&self.tasks, active_id, over_id) {
            Ok(Some(tasks)) => {
                self.commit_tasks(tasks);
                true
            }
            Ok(None) => false,
            Err(e) => move_aborted(e),
        }
    }

    /// Make task `active_id` the last card of list `list_id`.
    pub fn move_task_to_list(&mut self, active_id: &str, list_id: &str) -> bool {
        if self.list(list_id).is_none() {
            return move_aborted(ReorderError::NotFound {
                kind: EntityKind::List,
                id: list_id.to_string(),
            });
        }
        match reorder::move_task_onto_list(&self.tasks, active_id, list_id) {
            Ok(Some(tasks)) => {
                self.commit_tasks(tasks);
                true
            }
            Ok(None) => false,
            Err(e) => move_aborted(e),
        }
    }

    pub fn begin_drag(&mut self, entity: DraggedEntity) {
        self.drag.begin(entity);
    }

    /// Live reorder while a task is dragged over `over`.
    pub fn drag_over(
        &mut self,
        active_id: &str,
        active_kind: EntityKind,
        over: &DropTarget,
    ) -> bool {
        match self.drag.hover(active_id, active_kind, over) {
            Some(intent) => self.apply_move(intent),
            None => false,
        }
    }

    /// Drop. Commits a pending list move; always ends the session.
    pub fn end_drag(&mut self, active_id: &str, over: Option<&DropTarget>) -> bool {
        match self.drag.end(active_id, over) {
            Some(intent) => self.apply_move(intent),
            None => false,
        }
    }

    /// Abort the drag. Live moves that already landed stay.
    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Route one drag lifecycle event. Returns whether the board changed.
    pub fn handle_drag_event(&mut self, event: DragEvent) -> bool {
        match self.drag.handle(event) {
            Some(intent) => self.apply_move(intent),
            None => false,
        }
    }

    fn apply_move(&mut self, intent: MoveIntent) -> bool {
        match intent {
            MoveIntent::List {
                source_id,
                target_id,
            } => self.move_list(&source_id, &target_id),
            MoveIntent::TaskOverTask { active_id, over_id } => self.move_task(&active_id, &over_id),
            MoveIntent::TaskOntoList { active_id, list_id } => {
                self.move_task_to_list(&active_id, &list_id)
            }
        }
    }
}

fn move_aborted(e: ReorderError) -> bool {
    log::warn!("[tasklane.board] Move aborted, board unchanged: {}", e);
    false
}

/// Enforce id uniqueness (first occurrence wins) and drop tasks whose list
/// does not exist.
fn repair(lists: Vec<List>, tasks: Vec<Task>) -> (Vec<List>, Vec<Task>) {
    let list_count = lists.len();
    let mut list_ids = HashSet::new();
    let lists: Vec<List> = lists
        .into_iter()
        .filter(|l| list_ids.insert(l.id.clone()))
        .collect();
    if lists.len() != list_count {
        log::warn!(
            "[tasklane.board] Dropped {} lists with duplicate ids",
            list_count - lists.len()
        );
    }

    let task_count = tasks.len();
    let mut task_ids = HashSet::new();
    let tasks: Vec<Task> = tasks
        .into_iter()
        .filter(|t| task_ids.insert(t.id.clone()))
        .collect();
    if tasks.len() != task_count {
        log::warn!(
            "[tasklane.board] Dropped {} tasks with duplicate ids",
            task_count - tasks.len()
        );
    }

    let unique_count = tasks.len();
    let tasks: Vec<Task> = tasks
        .into_iter()
        .filter(|t| list_ids.contains(&t.list_id))
        .collect();
    if tasks.len() != unique_count {
        log::warn!(
            "[tasklane.board] Dropped {} tasks referencing missing lists",
            unique_count - tasks.len()
        );
    }

    (lists, tasks)
}
