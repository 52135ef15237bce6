//! Household command handlers.

use anyhow::Result;
use chores_core::domain::Household;
use chores_core::forms::HouseholdForm;

use super::App;

pub async fn list(app: &App) -> Result<()> {
    if let Some(handle) = app.registry.load(&app.api) {
        handle.await?;
    }

    match app.registry.households() {
        Some(households) if households.is_empty() => println!("No households yet."),
        Some(households) => {
            for household in households {
                println!("{}  {}", household.id, household.name);
            }
        }
        None => anyhow::bail!("Could not load households"),
    }
    Ok(())
}

pub async fn create(app: &App, name: &str) -> Result<()> {
    let form = HouseholdForm {
        name: name.to_string(),
    };
    let body = match form.validate() {
        Ok(body) => body,
        Err(errors) => return super::fail_validation(&errors),
    };

    let created: Household = app.api.request("/household").post(&body).await?;
    app.registry.add_household(created.clone());
    println!("Created household {} ({})", created.name, created.id);
    Ok(())
}
