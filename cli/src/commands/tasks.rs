//! One-shot task commands. Each returns the text to print so the output can
//! be checked without a terminal.

use kanban_core::api::{
    AppConfig, CliError, Column, ColumnCache, ListQuery, NewTask, Task, TaskClient, TaskOps,
};
use serde_json::json;

use super::cli::{AddArgs, EditArgs, ListArgs, MoveArgs, RmArgs};

pub async fn list(client: &TaskClient, args: &ListArgs, page_size: u32) -> Result<String, CliError> {
    let columns = match args.column {
        Some(column) => vec![column],
        None => Column::ALL.to_vec(),
    };

    let mut out = Vec::with_capacity(columns.len());
    for column in columns {
        let mut query = ListQuery::new(column, args.page, page_size);
        if let Some(term) = args.search.as_deref() {
            query = query.with_search(term);
        }
        let page = client.list_tasks(&query).await?;
        out.push((column, page));
    }

    if args.json {
        let body: Vec<_> = out
            .iter()
            .map(|(column, page)| {
                json!({
                    "column": column,
                    "page": args.page,
                    "has_more": page.has_more,
                    "tasks": page.tasks,
                })
            })
            .collect();
        return serde_json::to_string_pretty(&body)
            .map_err(|e| CliError::Command(format!("encode output failed: {e}")));
    }

    let mut text = String::new();
    for (column, page) in &out {
        text.push_str(&format!("{} ({})\n", column.label(), page.tasks.len()));
        for task in &page.tasks {
            text.push_str(&format!("  {}\n", task_line(task)));
        }
        if page.has_more {
            text.push_str(&format!("  … more on page {}\n", args.page + 1));
        }
    }
    Ok(text)
}

pub async fn add(ops: &TaskOps, args: &AddArgs) -> Result<String, CliError> {
    let draft = NewTask::new(args.title.clone(), args.description.clone(), args.column);
    let created = ops.create_task(draft).await?;
    Ok(format!("created {}", task_line(&created)))
}

pub async fn edit(ops: &TaskOps, args: &EditArgs, page_size: u32) -> Result<String, CliError> {
    let current = ops.client().find_task(args.id, page_size).await?;
    let mut next = current.clone();
    if let Some(title) = &args.title {
        next.title = title.clone();
    }
    if let Some(description) = &args.description {
        next.description = description.clone();
    }
    if let Some(column) = args.column {
        next.column = column;
    }
    let updated = ops.update_task(current.column, next).await?;
    Ok(format!("updated {}", task_line(&updated)))
}

pub async fn move_task(ops: &TaskOps, args: &MoveArgs, page_size: u32) -> Result<String, CliError> {
    let task = ops.client().find_task(args.id, page_size).await?;
    match ops.move_task(&task, args.to).await? {
        Some(moved) => Ok(format!("moved {} ({} -> {})", task_line(&moved), task.column, args.to)),
        None => Ok(format!("task {} is already in {}", task.id, args.to)),
    }
}

pub async fn remove(ops: &TaskOps, args: &RmArgs, page_size: u32) -> Result<String, CliError> {
    let task = ops.client().find_task(args.id, page_size).await?;
    ops.delete_task(&task).await?;
    Ok(format!("deleted #{}", task.id))
}

/// Operations over a throwaway cache; one-shot commands never read it.
pub fn task_ops(client: TaskClient, cfg: &AppConfig) -> TaskOps {
    TaskOps::new(ColumnCache::new(client, &cfg.board))
}

fn task_line(task: &Task) -> String {
    let mut line = format!("#{} [{}] {}", task.id, task.column, task.title);
    if let Some(first) = task.description.lines().find(|l| !l.trim().is_empty()) {
        line.push_str(" - ");
        line.push_str(first.trim());
    }
    line
}
