// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request authentication and session refresh.

pub mod authenticator;
pub mod claims;
pub mod coordinator;
pub mod refresh;
