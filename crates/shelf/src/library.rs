// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Game library endpoints.

use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::transport::ApiRequest;

/// Where a game sits in the player's backlog.
///
/// Values the server adds later decode as `Unknown` instead of failing the
/// whole response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Wishlist,
    Backlog,
    Playing,
    Completed,
    Dropped,
    #[serde(other)]
    #[value(skip)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    #[serde(other)]
    #[value(skip)]
    Unknown,
}

/// A game in the user's library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    pub status: GameStatus,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Payload for adding a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGame {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    pub status: GameStatus,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update; unset fields are left alone by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<GameStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl GameUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Library calls, all routed through the authenticated client.
pub struct LibraryApi<'a> {
    client: &'a ApiClient,
}

impl<'a> LibraryApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_games(&self) -> Result<Vec<Game>, ClientError> {
        self.client.json(ApiRequest::get("/games")).await
    }

    pub async fn get_game(&self, id: i64) -> Result<Game, ClientError> {
        self.client.json(ApiRequest::get(format!("/games/{id}"))).await
    }

    pub async fn add_game(&self, game: &NewGame) -> Result<Game, ClientError> {
        self.client.json(ApiRequest::post("/games").json(game)?).await
    }

    pub async fn update_game(&self, id: i64, update: &GameUpdate) -> Result<Game, ClientError> {
        self.client.json(ApiRequest::put(format!("/games/{id}")).json(update)?).await
    }

    pub async fn remove_game(&self, id: i64) -> Result<(), ClientError> {
        self.client.execute(ApiRequest::delete(format!("/games/{id}"))).await
    }
}

#[cfg(test)]
#[path = "library_tests.rs"]
mod tests;
