//! Task command handlers.

use anyhow::Result;
use chores_core::domain::{RecurrenceUnit, Task};
use chores_core::forms::TaskForm;

use super::App;

pub async fn create(
    app: &App,
    household_id: &str,
    title: String,
    interval: String,
    unit: &str,
) -> Result<()> {
    let recurrence_unit: RecurrenceUnit =
        unit.parse().map_err(|err: String| anyhow::anyhow!(err))?;
    let form = TaskForm {
        title,
        recurrence_unit,
        recurrence_interval: interval,
    };
    let body = match form.validate() {
        Ok(body) => body,
        Err(errors) => return super::fail_validation(&errors),
    };

    app.api
        .request(&format!("/household/{household_id}/task"))
        .post_unit(&body)
        .await?;
    println!("Created task {}", body.title);
    Ok(())
}

pub async fn list(app: &App, household_id: &str) -> Result<()> {
    let tasks: Vec<Task> = app
        .api
        .request(&format!("/household/{household_id}/task"))
        .get()
        .await?;

    if tasks.is_empty() {
        println!("No tasks yet.");
        return Ok(());
    }
    for task in tasks {
        let due = task
            .next_due
            .map_or_else(|| "unscheduled".to_string(), |d| d.to_string());
        println!(
            "{}  every {} {}  next due {}",
            task.title, task.recurrent_interval, task.recurrence_unit, due
        );
    }
    Ok(())
}
