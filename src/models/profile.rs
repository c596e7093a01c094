// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Donor profile model: social links, avatar, employment status.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::EmploymentStatus;

/// Avatar reference given to every new profile.
pub const DEFAULT_PROFILE_IMG: &str = "profile_img.png";

/// Profile row, one per donor, cascade-deleted with it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    /// Owning donor
    pub donor_id: Uuid,
    /// Stored avatar file name
    pub profile_img: String,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub employment_status: EmploymentStatus,
}

/// Explicit per-field profile update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileChanges {
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub employment_status: Option<EmploymentStatus>,
}
