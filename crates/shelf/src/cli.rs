// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line front-end over [`ApiClient`].

use clap::{Parser, Subcommand};
use reqwest::Method;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::library::{GameStatus, GameUpdate, NewGame, Priority};
use crate::session::{LogoutReason, SessionEvent};
use crate::transport::ApiRequest;

/// Personal game library client.
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub client: ClientConfig,

    /// Log filter (tracing `EnvFilter` syntax).
    #[arg(long, env = "SHELF_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format: text or json.
    #[arg(long, env = "SHELF_LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session.
    Login {
        #[arg(long, env = "SHELF_USERNAME")]
        username: String,
        #[arg(long, env = "SHELF_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show whether a session is stored and whether it is an admin session.
    Whoami,
    /// Manage the game library.
    #[command(subcommand)]
    Games(GamesCommand),
    /// Send an arbitrary authenticated request and print the response body.
    Request {
        method: String,
        path: String,
        /// JSON request body.
        #[arg(long)]
        body: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum GamesCommand {
    List,
    Show {
        id: i64,
    },
    Add {
        title: String,
        #[arg(long)]
        platform: Option<String>,
        #[arg(long, value_enum, default_value_t = GameStatus::Backlog)]
        status: GameStatus,
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        #[arg(long)]
        notes: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        platform: Option<String>,
        #[arg(long, value_enum)]
        status: Option<GameStatus>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long)]
        notes: Option<String>,
    },
    Remove {
        id: i64,
    },
}

#[derive(Debug, Serialize)]
struct WhoAmI {
    authenticated: bool,
    admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<serde_json::Value>,
}

/// Run one CLI command to completion.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = ApiClient::open(cli.client)?;
    let mut events = client.session().subscribe();

    let result = dispatch(&client, cli.command).await;
    report_session_events(&mut events);
    result
}

async fn dispatch(client: &ApiClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { username, password } => {
            client.sign_in(&username, &password).await?;
            let role = if client.session().is_admin() { "admin" } else { "user" };
            println!("logged in as {username} ({role})");
        }
        Command::Logout => {
            if client.sign_out() {
                println!("logged out");
            } else {
                println!("not logged in");
            }
        }
        Command::Whoami => {
            let session = client.session();
            let whoami = WhoAmI {
                authenticated: session.is_authenticated(),
                admin: session.is_admin(),
                subject: session.claims().claims().and_then(|c| c.sub.clone()),
            };
            print_json(&whoami)?;
        }
        Command::Games(games) => run_games(client, games).await?,
        Command::Request { method, path, body } => {
            let method = Method::from_bytes(method.to_uppercase().as_bytes())?;
            let mut request = ApiRequest::new(method, path);
            if let Some(raw) = body {
                let value: serde_json::Value = serde_json::from_str(&raw)?;
                request = request.json(&value)?;
            }
            let resp = client.send(request).await?;
            let status = resp.status();
            let text = resp.text().await?;
            if !text.is_empty() {
                println!("{text}");
            }
            if !status.is_success() {
                anyhow::bail!("server responded {status}");
            }
        }
    }
    Ok(())
}

async fn run_games(client: &ApiClient, command: GamesCommand) -> anyhow::Result<()> {
    let library = client.library();
    match command {
        GamesCommand::List => print_json(&library.list_games().await?)?,
        GamesCommand::Show { id } => print_json(&library.get_game(id).await?)?,
        GamesCommand::Add { title, platform, status, priority, notes } => {
            let game = NewGame { title, platform, status, priority, notes };
            print_json(&library.add_game(&game).await?)?;
        }
        GamesCommand::Update { id, title, platform, status, priority, notes } => {
            let update = GameUpdate { title, platform, status, priority, notes };
            if update.is_empty() {
                anyhow::bail!("nothing to update");
            }
            print_json(&library.update_game(id, &update).await?)?;
        }
        GamesCommand::Remove { id } => {
            library.remove_game(id).await?;
            println!("removed {id}");
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Tell the user when the session ended underneath them.
fn report_session_events(events: &mut broadcast::Receiver<SessionEvent>) {
    while let Ok(event) = events.try_recv() {
        if let SessionEvent::LoggedOut { reason: LogoutReason::RefreshFailed, redirect_to } = event
        {
            eprintln!("session expired; run `shelf login` to sign in again ({redirect_to})");
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
