use anyhow::Result;
use console::style;

use super::ServeArgs;
use super::serve::resolve_data_dir;
use crate::core::config::BoardConfig;
use crate::core::store::{RecordStore, TaskStatus};
use crate::core::terminal::{GuideSection, print_error, print_success, print_warn};

pub async fn run_status(args: ServeArgs) -> Result<()> {
    let data_dir = resolve_data_dir(&args);
    if !data_dir.exists() {
        print_warn(&format!(
            "No board data at {} yet. Run 'quadboard serve' to create it.",
            data_dir.display()
        ));
        return Ok(());
    }

    let board_config = BoardConfig::load(&data_dir).await?;
    let store = match RecordStore::open(&data_dir).await {
        Ok(store) => store,
        Err(e) => {
            print_error(&format!("Board data is unreadable: {e}"));
            return Ok(());
        }
    };

    let tasks = store.list_tasks().await;
    let staff = store.list_staff().await;
    let mut section = GuideSection::new("Board status")
        .status("Data", &data_dir.display().to_string())
        .status("Tasks file", &store.tasks_file().display().to_string())
        .status("Staff file", &store.staff_file().display().to_string())
        .status("Staff", &staff.len().to_string())
        .status("Tasks", &tasks.len().to_string());
    for quadrant in 1..=4u8 {
        let count = tasks.iter().filter(|t| t.quadrant == quadrant).count();
        section = section.status(&format!("  Quadrant {quadrant}"), &count.to_string());
    }
    for status in TaskStatus::ALL {
        let count = tasks.iter().filter(|t| t.status == status).count();
        section = section.status(&format!("  {}", status.label()), &count.to_string());
    }
    let avatars = if board_config.avatars.is_usable() {
        style(format!("enabled ({})", board_config.avatars.model))
            .green()
            .to_string()
    } else if board_config.avatars.enabled {
        style("disabled (GEMINI_API_KEY not set)").yellow().to_string()
    } else {
        style("disabled").dim().to_string()
    };
    section.status("Avatars", &avatars).print();

    let staff_ids = store.staff_by_id().await;
    let orphaned = tasks
        .iter()
        .filter(|t| !staff_ids.contains_key(&t.owner_id))
        .count();
    if orphaned > 0 {
        print_warn(&format!("{orphaned} task(s) reference deleted staff."));
    } else {
        print_success("Every task has an owner.");
    }
    Ok(())
}
