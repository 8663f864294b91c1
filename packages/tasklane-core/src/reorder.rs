/// Position math for lists and tasks.
///
/// Every function here is pure: it borrows the current sequence and, when
/// something actually moves, returns a freshly built one. `Ok(None)` means
/// the move is a no-op and the caller should keep (and not re-save) what it
/// has. Tasks are moved inside the single global sequence; a task's column
/// is only its `list_id`, so crossing a column boundary is a `list_id`
/// rewrite plus an ordinary move.
use crate::types::{EntityKind, List, Task};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },
}

/// Remove the element at `from` and reinsert it so it ends up at index `to`.
/// Elements between the two positions shift by one.
pub fn array_move<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut moved = items.to_vec();
    let item = moved.remove(from);
    moved.insert(to.min(moved.len()), item);
    moved
}

fn list_index(lists: &[List], id: &str) -> Result<usize, ReorderError> {
    lists
        .iter()
        .position(|l| l.id == id)
        .ok_or_else(|| ReorderError::NotFound {
            kind: EntityKind::List,
            id: id.to_string(),
        })
}

fn task_index(tasks: &[Task], id: &str) -> Result<usize, ReorderError> {
    tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| ReorderError::NotFound {
            kind: EntityKind::Task,
            id: id.to_string(),
        })
}

/// Move list `source_id` into the position currently held by `target_id`.
pub fn move_list(
    lists: &[List],
    source_id: &str,
    target_id: &str,
) -> Result<Option<Vec<List>>, ReorderError> {
    if source_id == target_id {
        return Ok(None);
    }
    let source_index = list_index(lists, source_id)?;
    let target_index = list_index(lists, target_id)?;
    Ok(Some(array_move(lists, source_index, target_index)))
}

/// Move task `active_id` into the position of task `over_id`, adopting the
/// over task's list when the two differ.
pub fn move_task_within_or_across_list(
    tasks: &[Task],
    active_id: &str,
    over_id: &str,
) -> Result<Option<Vec<Task>>, ReorderError> {
    if active_id == over_id {
        return Ok(None);
    }
    let active_index = task_index(tasks, active_id)?;
    let over_index = task_index(tasks, over_id)?;

    let over_list = &tasks[over_index].list_id;
    if tasks[active_index].list_id == *over_list {
        return Ok(Some(array_move(tasks, active_index, over_index)));
    }

    // Reassign before moving so the card jumps columns in the same commit.
    let mut reassigned = tasks.to_vec();
    reassigned[active_index].list_id = over_list.clone();
    let item = reassigned.remove(active_index);
    reassigned.insert(over_index.min(reassigned.len()), item);
    Ok(Some(reassigned))
}

/// Drop task `active_id` on the body of list `destination_list_id`: it
/// becomes the last card of that list (the end of the global sequence).
pub fn move_task_onto_list(
    tasks: &[Task],
    active_id: &str,
    destination_list_id: &str,
) -> Result<Option<Vec<Task>>, ReorderError> {
    let active_index = task_index(tasks, active_id)?;

    let already_last = tasks[active_index].list_id == destination_list_id
        && !tasks[active_index + 1..]
            .iter()
            .any(|t| t.list_id == destination_list_id);
    if already_last {
        return Ok(None);
    }

    let mut moved = tasks.to_vec();
    let mut task = moved.remove(active_index);
    task.list_id = destination_list_id.to_string();
    moved.push(task);
    Ok(Some(moved))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(id: &str, title: &str) -> List {
        List {
            id: id.to_string(),
            title: title.to_string(),
        }
    }

    fn task(id: &str, content: &str, list_id: &str) -> Task {
        Task {
            id: id.to_string(),
            content: content.to_string(),
            list_id: list_id.to_string(),
            description: None,
            due_date: None,
        }
    }

    fn list_ids(lists: &[List]) -> Vec<String> {
        lists.iter().map(|l| l.id.clone()).collect()
    }

    fn task_ids(tasks: &[Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.clone()).collect()
    }

    fn sorted_ids(tasks: &[Task]) -> Vec<String> {
        let mut ids = task_ids(tasks);
        ids.sort();
        ids
    }

    fn sample_lists() -> Vec<List> {
        vec![list("A", "Todo"), list("B", "Done")]
    }

    fn sample_tasks() -> Vec<Task> {
        vec![
            task("t1", "a1", "A"),
            task("t2", "b1", "B"),
            task("t3", "a2", "A"),
            task("t4", "b2", "B"),
            task("t5", "a3", "A"),
        ]
    }

    #[test]
    fn test_array_move_forward_and_backward() {
        let items = vec![0, 1, 2, 3, 4];
        assert_eq!(array_move(&items, 1, 3), vec![0, 2, 3, 1, 4]);
        assert_eq!(array_move(&items, 3, 1), vec![0, 3, 1, 2, 4]);
        assert_eq!(array_move(&items, 0, 4), vec![1, 2, 3, 4, 0]);
        assert_eq!(array_move(&items, 4, 0), vec![4, 0, 1, 2, 3]);
        assert_eq!(array_move(&items, 2, 2), items);
    }

    #[test]
    fn test_move_list_swaps_two_lists() {
        let lists = sample_lists();
        let moved = move_list(&lists, "A", "B").unwrap().unwrap();
        assert_eq!(moved, vec![list("B", "Done"), list("A", "Todo")]);
        // Input untouched
        assert_eq!(lists, sample_lists());
    }

    #[test]
    fn test_move_list_shifts_intermediate_lists() {
        let lists = vec![list("A", "1"), list("B", "2"), list("C", "3"), list("D", "4")];
        let moved = move_list(&lists, "A", "C").unwrap().unwrap();
        assert_eq!(list_ids(&moved), vec!["B", "C", "A", "D"]);

        let moved = move_list(&lists, "D", "B").unwrap().unwrap();
        assert_eq!(list_ids(&moved), vec!["A", "D", "B", "C"]);
    }

    #[test]
    fn test_move_list_same_id_is_noop() {
        let lists = sample_lists();
        assert_eq!(move_list(&lists, "A", "A").unwrap(), None);
        // Even for an id that does not exist
        assert_eq!(move_list(&lists, "Z", "Z").unwrap(), None);
    }

    #[test]
    fn test_move_list_unknown_id() {
        let lists = sample_lists();
        assert_eq!(
            move_list(&lists, "A", "Z"),
            Err(ReorderError::NotFound {
                kind: EntityKind::List,
                id: "Z".to_string()
            })
        );
        assert!(move_list(&lists, "Z", "A").is_err());
    }

    #[test]
    fn test_move_task_within_list() {
        let tasks = vec![task("t1", "x", "A"), task("t2", "y", "A")];
        let moved = move_task_within_or_across_list(&tasks, "t1", "t2")
            .unwrap()
            .unwrap();
        assert_eq!(task_ids(&moved), vec!["t2", "t1"]);
        assert!(moved.iter().all(|t| t.list_id == "A"));
    }

    #[test]
    fn test_move_task_within_list_skips_other_lists() {
        // t5 over t1: only column A's order changes; B keeps its cards and order.
        let moved = move_task_within_or_across_list(&sample_tasks(), "t5", "t1")
            .unwrap()
            .unwrap();
        assert_eq!(task_ids(&moved), vec!["t5", "t1", "t2", "t3", "t4"]);
        let b: Vec<_> = moved.iter().filter(|t| t.list_id == "B").collect();
        assert_eq!(b.len(), 2);
        assert_eq!(b[0].id, "t2");
        assert_eq!(b[1].id, "t4");
    }

    #[test]
    fn test_move_task_across_lists_reassigns_list() {
        let tasks = sample_tasks();
        let moved = move_task_within_or_across_list(&tasks, "t1", "t4")
            .unwrap()
            .unwrap();
        let t1 = moved.iter().find(|t| t.id == "t1").unwrap();
        assert_eq!(t1.list_id, "B");
        assert_eq!(task_ids(&moved), vec!["t2", "t3", "t4", "t1", "t5"]);

        // Moving backwards lands before the over task.
        let moved = move_task_within_or_across_list(&tasks, "t5", "t2")
            .unwrap()
            .unwrap();
        assert_eq!(task_ids(&moved), vec!["t1", "t5", "t2", "t3", "t4"]);
        let t5 = moved.iter().find(|t| t.id == "t5").unwrap();
        assert_eq!(t5.list_id, "B");
    }

    #[test]
    fn test_move_task_same_id_is_noop() {
        assert_eq!(
            move_task_within_or_across_list(&sample_tasks(), "t3", "t3").unwrap(),
            None
        );
    }

    #[test]
    fn test_move_task_unknown_ids() {
        let tasks = sample_tasks();
        assert!(matches!(
            move_task_within_or_across_list(&tasks, "nope", "t1"),
            Err(ReorderError::NotFound { kind: EntityKind::Task, .. })
        ));
        assert!(move_task_within_or_across_list(&tasks, "t1", "nope").is_err());
        assert!(move_task_onto_list(&tasks, "nope", "A").is_err());
    }

    #[test]
    fn test_moves_preserve_task_ids() {
        let tasks = sample_tasks();
        let expected = sorted_ids(&tasks);
        for active in &tasks {
            for over in &tasks {
                if let Some(moved) =
                    move_task_within_or_across_list(&tasks, &active.id, &over.id).unwrap()
                {
                    assert_eq!(sorted_ids(&moved), expected);
                    if active.list_id != over.list_id {
                        let a = moved.iter().find(|t| t.id == active.id).unwrap();
                        assert_eq!(a.list_id, over.list_id);
                    }
                }
            }
            for dest in ["A", "B", "C"] {
                if let Some(moved) = move_task_onto_list(&tasks, &active.id, dest).unwrap() {
                    assert_eq!(sorted_ids(&moved), expected);
                }
            }
        }
    }

    #[test]
    fn test_move_task_onto_list_appends() {
        let tasks = sample_tasks();
        let moved = move_task_onto_list(&tasks, "t1", "B").unwrap().unwrap();
        assert_eq!(task_ids(&moved), vec!["t2", "t3", "t4", "t5", "t1"]);
        let last_b = moved.iter().filter(|t| t.list_id == "B").last().unwrap();
        assert_eq!(last_b.id, "t1");
    }

    #[test]
    fn test_move_task_onto_empty_list() {
        let tasks = sample_tasks();
        let moved = move_task_onto_list(&tasks, "t3", "C").unwrap().unwrap();
        let in_c: Vec<_> = moved.iter().filter(|t| t.list_id == "C").collect();
        assert_eq!(in_c.len(), 1);
        assert_eq!(in_c[0].id, "t3");
    }

    #[test]
    fn test_move_task_onto_own_list() {
        let tasks = sample_tasks();
        // t5 is already the last card of A
        assert_eq!(move_task_onto_list(&tasks, "t5", "A").unwrap(), None);

        // t1 is not: it moves behind t5 without changing lists
        let moved = move_task_onto_list(&tasks, "t1", "A").unwrap().unwrap();
        let a: Vec<_> = moved
            .iter()
            .filter(|t| t.list_id == "A")
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(a, vec!["t3", "t5", "t1"]);
    }

    #[test]
    fn test_move_task_onto_list_is_idempotent() {
        let tasks = sample_tasks();
        let once = move_task_onto_list(&tasks, "t1", "B").unwrap().unwrap();
        assert_eq!(move_task_onto_list(&once, "t1", "B").unwrap(), None);
    }
}
