// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Rokto: blood donor registry for the University of Chittagong campus.
//!
//! This crate provides the backend API for registering donors, searching
//! them by blood group and district, and cycling donation availability.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod validation;

use config::Config;
use db::{DonorStore, ProfileStore};
use services::Mailer;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub donors: DonorStore,
    pub profiles: ProfileStore,
    pub mailer: Mailer,
}
