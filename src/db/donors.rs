// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Donor repository with typed operations.
//!
//! Every mutation is explicit about the columns it touches; updates take a
//! per-field payload and bind `NULL` for fields left alone, so a stray
//! payload field can never overwrite a flag it was not meant to reach.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::donor::{Donor, DonorChanges, DonorFilter, NewDonor};
use crate::models::enums::BloodGroup;
use crate::models::stats::DonorCounts;
use crate::time_utils;

/// Column list shared by every donor SELECT/RETURNING clause.
const DONOR_COLUMNS: &str = "id, full_name, email, mobile, department, student_id, gender, \
     district, blood_group, academic_year, is_available, is_active, is_admin, is_superuser, \
     hashed_password, created_on, donated_on";

/// Columns the list endpoint may order by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderColumn {
    CreatedOn,
    FullName,
    StudentId,
    DonatedOn,
}

impl OrderColumn {
    fn as_sql(self) -> &'static str {
        match self {
            OrderColumn::CreatedOn => "created_on",
            OrderColumn::FullName => "full_name",
            OrderColumn::StudentId => "student_id",
            OrderColumn::DonatedOn => "donated_on",
        }
    }
}

/// Sort direction for the list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    fn as_sql(self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// Caller-specified ordering, parsed from strings like "created_on desc".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: OrderColumn,
    pub direction: OrderDirection,
}

impl Default for OrderBy {
    fn default() -> Self {
        Self {
            column: OrderColumn::CreatedOn,
            direction: OrderDirection::Desc,
        }
    }
}

impl OrderBy {
    /// Parse "column" or "column direction"; only whitelisted columns are
    /// accepted, everything else is a client error.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.split_whitespace();

        let column = match parts.next() {
            None | Some("") => return Ok(Self::default()),
            Some("created_on") => OrderColumn::CreatedOn,
            Some("full_name") => OrderColumn::FullName,
            Some("student_id") => OrderColumn::StudentId,
            Some("donated_on") => OrderColumn::DonatedOn,
            Some(other) => {
                return Err(AppError::InvalidFormat(format!(
                    "Cannot order donors by {other}."
                )))
            }
        };

        let direction = match parts.next() {
            None => OrderDirection::Asc,
            Some("asc") => OrderDirection::Asc,
            Some("desc") => OrderDirection::Desc,
            Some(other) => {
                return Err(AppError::InvalidFormat(format!(
                    "Unknown sort direction {other}."
                )))
            }
        };

        if parts.next().is_some() {
            return Err(AppError::InvalidFormat(
                "Ordering must be a column name and an optional direction.".to_string(),
            ));
        }

        Ok(Self { column, direction })
    }
}

/// Pagination and visibility for donor listings.
#[derive(Debug, Clone)]
pub struct ListParams {
    pub skip: i64,
    pub limit: i64,
    pub order_by: OrderBy,
    /// Admin listings see unavailable donors too
    pub include_unavailable: bool,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 100,
            order_by: OrderBy::default(),
            include_unavailable: false,
        }
    }
}

/// Donor repository over the shared pool.
#[derive(Clone)]
pub struct DonorStore {
    pool: PgPool,
}

impl DonorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a donor and its empty profile in one transaction.
    pub async fn create(&self, new_donor: &NewDonor) -> Result<Donor> {
        let mut tx = self.pool.begin().await?;

        let donor = sqlx::query_as::<_, Donor>(&format!(
            "INSERT INTO donors (full_name, email, mobile, department, student_id, gender, \
                 district, blood_group, academic_year, hashed_password, is_active, is_admin, \
                 is_superuser, is_available) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {DONOR_COLUMNS}"
        ))
        .bind(&new_donor.full_name)
        .bind(&new_donor.email)
        .bind(&new_donor.mobile)
        .bind(new_donor.department.code())
        .bind(&new_donor.student_id)
        .bind(new_donor.gender)
        .bind(new_donor.district)
        .bind(new_donor.blood_group)
        .bind(new_donor.academic_year.as_str())
        .bind(&new_donor.hashed_password)
        .bind(new_donor.is_active)
        .bind(new_donor.is_admin)
        .bind(new_donor.is_superuser)
        .bind(new_donor.is_available)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO profiles (donor_id) VALUES ($1)")
            .bind(donor.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(donor_id = %donor.id, "Donor created");
        Ok(donor)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Donor>> {
        let donor = sqlx::query_as::<_, Donor>(&format!(
            "SELECT {DONOR_COLUMNS} FROM donors WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(donor)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<Donor>> {
        self.get_by_text_column("email", email).await
    }

    pub async fn get_by_mobile(&self, mobile: &str) -> Result<Option<Donor>> {
        self.get_by_text_column("mobile", mobile).await
    }

    pub async fn get_by_student_id(&self, student_id: &str) -> Result<Option<Donor>> {
        self.get_by_text_column("student_id", student_id).await
    }

    async fn get_by_text_column(&self, column: &'static str, value: &str) -> Result<Option<Donor>> {
        let donor = sqlx::query_as::<_, Donor>(&format!(
            "SELECT {DONOR_COLUMNS} FROM donors WHERE {column} = $1"
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        Ok(donor)
    }

    /// One OR-combined existence probe across the three unique fields.
    pub async fn any_duplicate(
        &self,
        mobile: &str,
        email: &str,
        student_id: &str,
    ) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM donors \
             WHERE mobile = $1 OR email = $2 OR student_id = $3)",
        )
        .bind(mobile)
        .bind(email)
        .bind(student_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Paged listing; hides unavailable donors unless asked not to.
    pub async fn list(&self, params: &ListParams) -> Result<Vec<Donor>> {
        let filter = if params.include_unavailable {
            ""
        } else {
            "WHERE is_available = TRUE "
        };

        // Ordering comes from the OrderColumn whitelist, never from raw input.
        let donors = sqlx::query_as::<_, Donor>(&format!(
            "SELECT {DONOR_COLUMNS} FROM donors {filter}\
             ORDER BY {} {}, id ASC OFFSET $1 LIMIT $2",
            params.order_by.column.as_sql(),
            params.order_by.direction.as_sql(),
        ))
        .bind(params.skip)
        .bind(params.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(donors)
    }

    /// AND-combined filter search; availability does not restrict results.
    pub async fn search(&self, filter: &DonorFilter) -> Result<Vec<Donor>> {
        let mut qb = QueryBuilder::<sqlx::Postgres>::new(format!(
            "SELECT {DONOR_COLUMNS} FROM donors WHERE 1=1"
        ));

        if let Some(name) = &filter.full_name {
            qb.push(" AND full_name ILIKE ");
            qb.push_bind(format!("%{name}%"));
        }
        if let Some(student_id) = &filter.student_id {
            qb.push(" AND student_id = ");
            qb.push_bind(student_id);
        }
        if let Some(gender) = filter.gender {
            qb.push(" AND gender = ");
            qb.push_bind(gender);
        }
        if let Some(district) = filter.district {
            qb.push(" AND district = ");
            qb.push_bind(district);
        }
        if let Some(blood_group) = filter.blood_group {
            qb.push(" AND blood_group = ");
            qb.push_bind(blood_group);
        }
        if let Some(department) = filter.department {
            qb.push(" AND department = ");
            qb.push_bind(department.code());
        }
        if let Some(academic_year) = filter.academic_year {
            qb.push(" AND academic_year = ");
            qb.push_bind(academic_year.as_str());
        }

        qb.push(" ORDER BY created_on DESC, id ASC");

        let donors = qb
            .build_query_as::<Donor>()
            .fetch_all(&self.pool)
            .await?;

        Ok(donors)
    }

    /// Apply an explicit field-by-field update and return the new row.
    pub async fn update(&self, id: Uuid, changes: &DonorChanges) -> Result<Donor> {
        let donor = sqlx::query_as::<_, Donor>(&format!(
            "UPDATE donors SET \
                 full_name = COALESCE($2, full_name), \
                 email = COALESCE($3, email), \
                 mobile = COALESCE($4, mobile), \
                 district = COALESCE($5, district), \
                 blood_group = COALESCE($6, blood_group), \
                 is_available = COALESCE($7, is_available), \
                 is_active = COALESCE($8, is_active), \
                 hashed_password = COALESCE($9, hashed_password) \
             WHERE id = $1 RETURNING {DONOR_COLUMNS}"
        ))
        .bind(id)
        .bind(&changes.full_name)
        .bind(&changes.email)
        .bind(&changes.mobile)
        .bind(changes.district)
        .bind(changes.blood_group)
        .bind(changes.is_available)
        .bind(changes.is_active)
        .bind(&changes.hashed_password)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("The donor does not exist.".to_string()))?;

        Ok(donor)
    }

    /// Flip availability; going unavailable stamps the donation time.
    pub async fn toggle_availability(&self, id: Uuid) -> Result<Donor> {
        let donor = sqlx::query_as::<_, Donor>(&format!(
            "UPDATE donors SET \
                 is_available = NOT is_available, \
                 donated_on = CASE WHEN is_available THEN now() ELSE donated_on END \
             WHERE id = $1 RETURNING {DONOR_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("The donor does not exist.".to_string()))?;

        Ok(donor)
    }

    /// Flag an account as email-verified.
    pub async fn mark_active(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE donors SET is_active = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Store a new password hash.
    pub async fn set_password(&self, id: Uuid, hashed_password: &str) -> Result<()> {
        sqlx::query("UPDATE donors SET hashed_password = $2 WHERE id = $1")
            .bind(id)
            .bind(hashed_password)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Remove a donor; the profile row goes with it via cascade.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM donors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("The donor does not exist.".to_string()));
        }

        tracing::debug!(donor_id = %id, "Donor deleted");
        Ok(())
    }

    /// Registry-wide aggregate counts.
    pub async fn counts(&self) -> Result<DonorCounts> {
        let month_start = time_utils::start_of_month(Utc::now());

        let (total, available, new_this_month) = sqlx::query_as::<_, (i64, i64, i64)>(
            "SELECT COUNT(*), \
                    COUNT(*) FILTER (WHERE is_available), \
                    COUNT(*) FILTER (WHERE created_on >= $1) \
             FROM donors",
        )
        .bind(month_start)
        .fetch_one(&self.pool)
        .await?;

        let groups = sqlx::query_as::<_, (BloodGroup, i64)>(
            "SELECT blood_group, COUNT(*) FROM donors GROUP BY blood_group",
        )
        .fetch_all(&self.pool)
        .await?;

        let blood_group_percentages = groups
            .into_iter()
            .map(|(group, count)| (group, blood_group_percentage(count, total)))
            .collect();

        Ok(DonorCounts {
            total_donors: total,
            available_donors: available,
            new_donors_this_month: new_this_month,
            blood_group_percentages,
        })
    }

    /// One atomic bulk update restoring availability after the cooldown.
    ///
    /// Both conditions are re-evaluated inside the UPDATE, so a donor who
    /// toggled back available between runs is simply not matched.
    pub async fn release_eligible_donors(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE donors SET is_available = TRUE \
             WHERE donated_on < $1 AND is_available = FALSE",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

/// Share of one blood group on a 0-100 scale.
///
/// Rounded to a whole point, so 2 of 3 donors yields 67.0, not 66.67.
/// Exact halves round to even.
fn blood_group_percentage(count: i64, total: i64) -> f64 {
    if total > 0 {
        ((count as f64 / total as f64) * 100.0).round_ties_even()
    } else {
        0.0
    }
}
