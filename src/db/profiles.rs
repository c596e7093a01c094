// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile repository.
//!
//! Profiles are created inside the donor insert transaction and keyed by
//! donor id everywhere; the profile's own id never appears in the API paths.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::profile::{Profile, ProfileChanges};

const PROFILE_COLUMNS: &str =
    "id, donor_id, profile_img, facebook, instagram, linkedin, website, employment_status";

/// Profile repository over the shared pool.
#[derive(Clone)]
pub struct ProfileStore {
    pool: PgPool,
}

impl ProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_donor(&self, donor_id: Uuid) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE donor_id = $1"
        ))
        .bind(donor_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Apply an explicit field-by-field update and return the new row.
    pub async fn update(&self, donor_id: Uuid, changes: &ProfileChanges) -> Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "UPDATE profiles SET \
                 facebook = COALESCE($2, facebook), \
                 instagram = COALESCE($3, instagram), \
                 linkedin = COALESCE($4, linkedin), \
                 website = COALESCE($5, website), \
                 employment_status = COALESCE($6, employment_status) \
             WHERE donor_id = $1 RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(donor_id)
        .bind(&changes.facebook)
        .bind(&changes.instagram)
        .bind(&changes.linkedin)
        .bind(&changes.website)
        .bind(changes.employment_status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("The profile does not exist.".to_string()))?;

        Ok(profile)
    }

    /// Point the profile at a newly stored avatar file.
    pub async fn set_avatar(&self, donor_id: Uuid, file_name: &str) -> Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "UPDATE profiles SET profile_img = $2 WHERE donor_id = $1 RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(donor_id)
        .bind(file_name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("The profile does not exist.".to_string()))?;

        Ok(profile)
    }
}
