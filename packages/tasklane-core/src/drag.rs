/// Drag session state machine.
///
/// Turns the begin / hover / end / cancel callbacks of the pointer library
/// into move intents for the board. Task moves commit live on every hover;
/// list moves commit once on drop. The session always returns to `Idle` on
/// end or cancel, whatever happened to the board.
use serde::{Deserialize, Serialize};

use crate::types::{DraggedEntity, EntityKind, List, Task};

/// What is currently being dragged, with the snapshot taken at drag start
/// for the overlay preview.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragSession {
    #[default]
    Idle,
    DraggingList(List),
    DraggingTask(Task),
}

/// The element under the pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTarget {
    pub id: String,
    pub kind: EntityKind,
}

impl DropTarget {
    pub fn list(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: EntityKind::List,
        }
    }

    pub fn task(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: EntityKind::Task,
        }
    }
}

/// Drag lifecycle events, in the order the event source delivers them:
/// one `Begin`, any number of `Hover`, then exactly one `End` or `Cancel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DragEvent {
    Begin {
        active: DraggedEntity,
    },
    Hover {
        active_id: String,
        active_kind: EntityKind,
        over: DropTarget,
    },
    End {
        active_id: String,
        #[serde(default)]
        over: Option<DropTarget>,
    },
    Cancel,
}

/// A position change the board should compute and commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveIntent {
    List { source_id: String, target_id: String },
    TaskOverTask { active_id: String, over_id: String },
    TaskOntoList { active_id: String, list_id: String },
}

impl DragSession {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragSession::Idle)
    }

    /// Id of the dragged entity, if any.
    pub fn active_id(&self) -> Option<&str> {
        match self {
            DragSession::Idle => None,
            DragSession::DraggingList(list) => Some(&list.id),
            DragSession::DraggingTask(task) => Some(&task.id),
        }
    }

    /// The snapshot to render in the drag overlay.
    pub fn preview(&self) -> Option<DraggedEntity> {
        match self {
            DragSession::Idle => None,
            DragSession::DraggingList(list) => Some(DraggedEntity::List(list.clone())),
            DragSession::DraggingTask(task) => Some(DraggedEntity::Task(task.clone())),
        }
    }

    pub fn begin(&mut self, entity: DraggedEntity) {
        if let Some(previous) = self.active_id() {
            log::debug!(
                "[tasklane.drag] Begin while dragging {}, replacing session",
                previous
            );
        }
        *self = match entity {
            DraggedEntity::List(list) => DragSession::DraggingList(list),
            DraggedEntity::Task(task) => DragSession::DraggingTask(task),
        };
    }

    /// Pointer moved over a candidate target. Only task drags move on hover.
    pub fn hover(
        &self,
        active_id: &str,
        active_kind: EntityKind,
        over: &DropTarget,
    ) -> Option<MoveIntent> {
        let task = match self {
            DragSession::DraggingTask(task) => task,
            DragSession::DraggingList(_) | DragSession::Idle => return None,
        };
        if active_kind != EntityKind::Task || task.id != active_id {
            log::debug!(
                "[tasklane.drag] Ignoring hover for {} {}, session is dragging task {}",
                active_kind,
                active_id,
                task.id
            );
            return None;
        }

        Some(match over.kind {
            EntityKind::Task => MoveIntent::TaskOverTask {
                active_id: task.id.clone(),
                over_id: over.id.clone(),
            },
            EntityKind::List => MoveIntent::TaskOntoList {
                active_id: task.id.clone(),
                list_id: over.id.clone(),
            },
        })
    }

    /// Drop. Clears the session; returns the list move to commit, if any.
    /// Task drags already committed their position while hovering.
    pub fn end(&mut self, active_id: &str, over: Option<&DropTarget>) -> Option<MoveIntent> {
        match std::mem::take(self) {
            DragSession::DraggingList(list) if list.id == active_id => match over {
                Some(target) if target.kind == EntityKind::List => Some(MoveIntent::List {
                    source_id: list.id,
                    target_id: target.id.clone(),
                }),
                _ => None,
            },
            DragSession::DraggingList(list) => {
                log::debug!(
                    "[tasklane.drag] Drop for {} does not match dragged list {}",
                    active_id,
                    list.id
                );
                None
            }
            DragSession::DraggingTask(_) | DragSession::Idle => None,
        }
    }

    /// Abort the drag. Returns whether a session was active.
    pub fn cancel(&mut self) -> bool {
        !std::mem::take(self).is_idle()
    }

    /// Feed one event through the state machine.
    pub fn handle(&mut self, event: DragEvent) -> Option<MoveIntent> {
        match event {
            DragEvent::Begin { active } => {
                self.begin(active);
                None
            }
            DragEvent::Hover {
                active_id,
                active_kind,
                over,
            } => self.hover(&active_id, active_kind, &over),
            DragEvent::End { active_id, over } => self.end(&active_id, over.as_ref()),
            DragEvent::Cancel => {
                self.cancel();
                None
            }
        }
    }
}
