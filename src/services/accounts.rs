// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Donor account flows: registration, login, self-service and privileged
//! updates, password recovery, startup seeding.
//!
//! Validation always runs before any store access, and the duplicate probe
//! before any write, so an invalid or colliding registration never touches
//! the donors table.

use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::config::Config;
use crate::db::DonorStore;
use crate::error::{AppError, Result};
use crate::middleware::auth::{create_email_token, require_active, verify_email_token};
use crate::models::donor::{
    CreateDonorBySuperuser, Donor, DonorChanges, NewDonor, RegisterDonor, UpdateByEmail, UpdateMe,
};
use crate::validation;
use crate::AppState;

/// Hash a password into PHC string form.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {e}")))?;

    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash.
///
/// An unparseable stored hash counts as a mismatch rather than an error;
/// login must not 500 on a corrupt row.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hashed_password) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Run the full registration validation chain and hash the password.
///
/// Order matters and is observable through which error a doubly-invalid
/// payload reports: full name, email, mobile, department, student id,
/// academic year, password.
fn build_new_donor(
    payload: RegisterDonor,
    is_active: bool,
    is_admin: bool,
    is_superuser: bool,
    is_available: bool,
) -> Result<NewDonor> {
    let full_name = validation::validate_full_name(&payload.full_name)?;
    validation::validate_email(&payload.email)?;
    let mobile = validation::normalize_mobile(&payload.mobile)?;
    let department = validation::validate_department_code(&payload.department)?;
    validation::validate_student_id(&payload.student_id, department)?;
    let academic_year = validation::validate_academic_year(&payload.student_id, &payload.academic_year)?;
    validation::validate_password(&payload.password)?;

    let hashed_password = hash_password(&payload.password)?;

    Ok(NewDonor {
        full_name,
        email: payload.email,
        mobile,
        department,
        student_id: payload.student_id,
        gender: payload.gender,
        district: payload.district,
        blood_group: payload.blood_group,
        academic_year,
        hashed_password,
        is_active,
        is_admin,
        is_superuser,
        is_available,
    })
}

/// Validate an open-registration payload. The account starts inactive and
/// available, with no elevated flags.
pub fn validate_registration(payload: RegisterDonor) -> Result<NewDonor> {
    build_new_donor(payload, false, false, false, true)
}

/// Validate a privileged creation payload; flags come from the caller.
pub fn validate_privileged_registration(payload: CreateDonorBySuperuser) -> Result<NewDonor> {
    build_new_donor(
        payload.donor,
        payload.is_active,
        payload.is_admin,
        payload.is_superuser,
        payload.is_available,
    )
}

fn duplicate_entry() -> AppError {
    AppError::DuplicateEntry(
        "The donor with this mobile, email or student id already exists in the system.".to_string(),
    )
}

fn donor_not_found() -> AppError {
    AppError::NotFound("The donor does not exist.".to_string())
}

/// Register a donor through open registration.
///
/// Creates the account inactive and sends the verification email.
pub async fn register(state: &AppState, payload: RegisterDonor) -> Result<Donor> {
    let new_donor = validate_registration(payload)?;
    create_checked(state, new_donor).await
}

/// Create a donor with explicit flags on behalf of a superuser.
pub async fn register_by_superuser(
    state: &AppState,
    payload: CreateDonorBySuperuser,
) -> Result<Donor> {
    let new_donor = validate_privileged_registration(payload)?;
    create_checked(state, new_donor).await
}

/// Duplicate probe, insert, and verification email for inactive accounts.
async fn create_checked(state: &AppState, new_donor: NewDonor) -> Result<Donor> {
    if state
        .donors
        .any_duplicate(&new_donor.mobile, &new_donor.email, &new_donor.student_id)
        .await?
    {
        return Err(duplicate_entry());
    }

    let donor = state.donors.create(&new_donor).await?;

    tracing::info!(donor_id = %donor.id, mobile = %donor.mobile, "Donor registered");

    if !donor.is_active {
        send_verification_email(state, &donor);
    }

    Ok(donor)
}

/// Build a verification token and queue the new-account email.
///
/// Token creation failure is logged, never surfaced: the account exists and
/// the donor can request a fresh email later.
fn send_verification_email(state: &AppState, donor: &Donor) {
    match create_email_token(
        &donor.email,
        &state.config.secret_key,
        state.config.email_token_expire_hours,
    ) {
        Ok(token) => state
            .mailer
            .send_new_account_email(&donor.email, &donor.full_name, &token),
        Err(e) => {
            tracing::error!(donor_id = %donor.id, error = %e, "Failed to create verification token")
        }
    }
}

/// Look a donor up by mobile number or email and verify the password.
///
/// The caller decides what an inactive account means for the operation.
pub async fn authenticate(donors: &DonorStore, identifier: &str, password: &str) -> Result<Donor> {
    // A login form may carry the mobile in "+88" form; store keys are
    // normalized.
    let mobile_key = validation::normalize_mobile(identifier)
        .unwrap_or_else(|_| identifier.to_string());

    let donor = match donors.get_by_mobile(&mobile_key).await? {
        Some(d) => Some(d),
        None => donors.get_by_email(identifier).await?,
    };

    let Some(donor) = donor else {
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &donor.hashed_password) {
        return Err(AppError::InvalidCredentials);
    }

    Ok(donor)
}

/// Self-service update; every change is gated on the current password.
pub async fn update_self(state: &AppState, current: &Donor, payload: UpdateMe) -> Result<Donor> {
    if !verify_password(&payload.password, &current.hashed_password) {
        return Err(AppError::Unauthorized("The password is incorrect.".to_string()));
    }

    let mut changes = DonorChanges::default();

    if let Some(name) = payload.full_name {
        changes.full_name = Some(validation::validate_full_name(&name)?);
    }

    if let Some(email) = payload.email {
        validation::validate_email(&email)?;
        if email != current.email {
            if state.donors.get_by_email(&email).await?.is_some() {
                return Err(duplicate_entry());
            }
            changes.email = Some(email);
        }
    }

    if let Some(mobile) = payload.mobile {
        let mobile = validation::normalize_mobile(&mobile)?;
        if mobile != current.mobile {
            if state.donors.get_by_mobile(&mobile).await?.is_some() {
                return Err(duplicate_entry());
            }
            changes.mobile = Some(mobile);
        }
    }

    changes.district = payload.district;
    changes.blood_group = payload.blood_group;
    changes.is_available = payload.is_available;

    if let Some(new_password) = payload.new_password {
        validation::validate_password(&new_password)?;
        changes.hashed_password = Some(hash_password(&new_password)?);
    }

    state.donors.update(current.id, &changes).await
}

/// Privileged update of the donor with the given email.
pub async fn update_by_email(
    state: &AppState,
    email: &str,
    payload: UpdateByEmail,
) -> Result<Donor> {
    let target = state
        .donors
        .get_by_email(email)
        .await?
        .ok_or_else(donor_not_found)?;

    let mut changes = DonorChanges::default();

    if let Some(name) = payload.full_name {
        changes.full_name = Some(validation::validate_full_name(&name)?);
    }

    if let Some(mobile) = payload.mobile {
        let mobile = validation::normalize_mobile(&mobile)?;
        if mobile != target.mobile {
            if state.donors.get_by_mobile(&mobile).await?.is_some() {
                return Err(duplicate_entry());
            }
            changes.mobile = Some(mobile);
        }
    }

    changes.district = payload.district;
    changes.blood_group = payload.blood_group;
    changes.is_available = payload.is_available;
    changes.is_active = payload.is_active;

    if let Some(password) = payload.password {
        validation::validate_password(&password)?;
        changes.hashed_password = Some(hash_password(&password)?);
    }

    state.donors.update(target.id, &changes).await
}

/// Delete the donor with the given email; superusers cannot remove
/// themselves.
pub async fn delete_by_email(state: &AppState, actor: &Donor, email: &str) -> Result<()> {
    let target = state
        .donors
        .get_by_email(email)
        .await?
        .ok_or_else(donor_not_found)?;

    if target.id == actor.id {
        return Err(AppError::Forbidden(
            "Superusers cannot delete their own account!".to_string(),
        ));
    }

    state.donors.delete(target.id).await?;

    tracing::info!(donor_id = %target.id, by = %actor.id, "Donor deleted");
    Ok(())
}

/// Replace the password of an authenticated donor.
pub async fn change_password(state: &AppState, donor: &Donor, new_password: &str) -> Result<()> {
    validation::validate_password(new_password)?;
    state
        .donors
        .set_password(donor.id, &hash_password(new_password)?)
        .await
}

/// Send a password-recovery email if the address belongs to a donor.
///
/// Silent when it does not: the endpoint never reveals whether an email is
/// registered.
pub async fn recover_password(state: &AppState, email: &str) -> Result<()> {
    let Some(donor) = state.donors.get_by_email(email).await? else {
        tracing::info!(email = %email, "Password recovery requested for unknown email");
        return Ok(());
    };

    let token = create_email_token(
        &donor.email,
        &state.config.secret_key,
        state.config.email_token_expire_hours,
    )?;

    state
        .mailer
        .send_reset_password_email(&donor.email, &donor.full_name, &token);

    Ok(())
}

/// Verify an emailed reset token and store the new password.
pub async fn reset_password(state: &AppState, token: &str, new_password: &str) -> Result<()> {
    let email = verify_email_token(token, &state.config.secret_key)?;

    let donor = state
        .donors
        .get_by_email(&email)
        .await?
        .ok_or_else(donor_not_found)?;

    require_active(&donor)?;
    validation::validate_password(new_password)?;

    state
        .donors
        .set_password(donor.id, &hash_password(new_password)?)
        .await
}

/// Verify an emailed account token and activate the donor.
pub async fn verify_account(state: &AppState, token: &str) -> Result<()> {
    let email = verify_email_token(token, &state.config.secret_key)?;

    let donor = state
        .donors
        .get_by_email(&email)
        .await?
        .ok_or_else(donor_not_found)?;

    state.donors.mark_active(donor.id).await?;

    tracing::info!(donor_id = %donor.id, "Donor account verified");
    Ok(())
}

/// Seed the configured bootstrap superuser if it is not present yet.
///
/// Goes through the same validation chain as registration, so a bad fixture
/// fails startup loudly instead of planting an invalid account.
pub async fn seed_first_superuser(state: &AppState) -> Result<()> {
    let Some(fixture) = &state.config.first_superuser else {
        return Ok(());
    };

    if state.donors.get_by_mobile(&fixture.mobile).await?.is_some() {
        tracing::debug!(mobile = %fixture.mobile, "First superuser already present");
        return Ok(());
    }

    let payload = RegisterDonor {
        full_name: fixture.full_name.clone(),
        email: fixture.email.clone(),
        mobile: fixture.mobile.clone(),
        department: fixture.department.clone(),
        student_id: fixture.student_id.clone(),
        gender: parse_wire("gender", &fixture.gender)?,
        district: parse_wire("district", &fixture.district)?,
        blood_group: parse_wire("blood group", &fixture.blood_group)?,
        academic_year: fixture.academic_year.clone(),
        password: fixture.password.clone(),
    };

    let new_donor = build_new_donor(payload, true, true, true, true)?;
    let donor = state.donors.create(&new_donor).await?;

    tracing::info!(donor_id = %donor.id, mobile = %donor.mobile, "First superuser seeded");
    Ok(())
}

/// Parse an enumerated value from its wire (JSON string) form.
fn parse_wire<T: serde::de::DeserializeOwned>(field: &str, value: &str) -> Result<T> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| AppError::UnknownEnumValue(format!("The {field} {value} is not supported.")))
}
