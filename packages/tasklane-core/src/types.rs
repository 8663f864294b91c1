use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Generate a fresh entity id (UUID v4, hyphenated).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A column on the board. Column order is the position in the list sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: String,
    pub title: String,
}

impl List {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
        }
    }
}

/// A card. Tasks live in one global sequence; `list_id` partitions it into
/// columns and the relative order within a partition is the card order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub content: String,
    pub list_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl Task {
    pub fn new(list_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            content: content.into(),
            list_id: list_id.into(),
            description: None,
            due_date: None,
        }
    }
}

/// Partial update for a task. `None` leaves a field untouched.
///
/// `description` and `due_date` use a nested option so a patch can clear
/// them: `Some(None)` removes the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "double_option"
    )]
    pub description: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "double_option"
    )]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
}

impl TaskPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }
}

/// Which kind of entity a drag event or drop target refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    List,
    Task,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::List => f.write_str("list"),
            EntityKind::Task => f.write_str("task"),
        }
    }
}

/// Snapshot of the entity picked up at drag start, used for the overlay preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entity")]
pub enum DraggedEntity {
    List(List),
    Task(Task),
}

impl DraggedEntity {
    pub fn id(&self) -> &str {
        match self {
            DraggedEntity::List(list) => &list.id,
            DraggedEntity::Task(task) => &task.id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            DraggedEntity::List(_) => EntityKind::List,
            DraggedEntity::Task(_) => EntityKind::Task,
        }
    }
}

/// Distinguishes "field absent" from "field explicitly null" in patches.
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, s: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(s),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(d: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(d).map(Some)
    }
}
