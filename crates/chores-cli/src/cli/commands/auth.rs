//! Login, logout and status handlers.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use chores_core::auth;
use chores_core::session::Session;

use super::App;

pub fn login(app: &App, no_browser: bool) -> Result<()> {
    let url = auth::login_url(&app.server_url);
    let skip_browser = no_browser || std::env::var("CHORES_NO_BROWSER").is_ok_and(|v| v == "1");

    if skip_browser {
        println!("Open this URL to log in:");
        println!("  {url}");
    } else if open::that(&url).is_err() {
        println!("Could not open a browser. Open this URL to log in:");
        println!("  {url}");
    }

    println!("After logging in, paste the session line shown by the server:");
    print!("> ");
    io::stdout().flush().context("flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .lock()
        .read_line(&mut input)
        .context("read session input")?;
    auth::complete_login(&app.tracker, &input)?;

    match app.tracker.read() {
        Session::LoggedIn { user } => println!("Logged in as {}.", user.name),
        Session::LoggedOut => anyhow::bail!("The pasted session did not contain a user record"),
    }
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    if !app.tracker.read().is_logged_in() {
        println!("Not logged in.");
        return Ok(());
    }

    auth::logout(&app.server_url, &app.tracker).await?;
    println!("Logged out.");
    Ok(())
}

pub fn status(app: &App) -> Result<()> {
    match app.tracker.read() {
        Session::LoggedIn { user } => println!("Logged in as {}.", user.name),
        Session::LoggedOut => println!("Not logged in."),
    }
    Ok(())
}
