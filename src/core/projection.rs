use serde::Serialize;
use std::collections::HashMap;

use crate::core::store::{Staff, Task};

/// A task as the board sees it: every task field plus its resolved owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    /// `None` when the owning staff record no longer exists.
    pub owner: Option<Staff>,
}

pub fn serialize_task(task: Task, staff_by_id: &HashMap<i64, Staff>) -> TaskView {
    let owner = staff_by_id.get(&task.owner_id).cloned();
    TaskView { task, owner }
}

/// Sorts by `(quadrant, due_date)`; tasks without a due date come first
/// within their quadrant. The sort is stable.
pub fn sort_for_board(views: &mut [TaskView]) {
    views.sort_by(|a, b| board_key(&a.task).cmp(&board_key(&b.task)));
}

fn board_key(task: &Task) -> (u8, &str) {
    (task.quadrant, task.due_date.as_deref().unwrap_or(""))
}

/// Joins every task with its owner and returns them in board order.
pub fn project_tasks(tasks: Vec<Task>, staff_by_id: &HashMap<i64, Staff>) -> Vec<TaskView> {
    let mut views: Vec<TaskView> = tasks
        .into_iter()
        .map(|task| serialize_task(task, staff_by_id))
        .collect();
    sort_for_board(&mut views);
    views
}
