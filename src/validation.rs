// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cross-field donor identity validation.
//!
//! A student id encodes the department and enrollment session of its owner:
//! positions 3-5 carry the 3-digit department code and the first two digits
//! repeat the trailing year of the academic session ("2019-2020" -> "20").
//! These checks are pure functions, run before any lookup or write, so an
//! inconsistent identity never reaches the store.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::enums::{AcademicYear, Department};

/// Trim the name and require it to be non-empty.
pub fn validate_full_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidFormat("The name cannot be empty.".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Structural email check.
pub fn validate_email(email: &str) -> Result<()> {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(AppError::InvalidFormat(
            "The email address is not valid.".to_string(),
        ));
    }
    Ok(())
}

/// Strip an optional "+88" country prefix and require an 11-digit local
/// number starting with "01".
pub fn normalize_mobile(input: &str) -> Result<String> {
    let trimmed = input.trim();
    let local = trimmed.strip_prefix("+88").unwrap_or(trimmed);

    static MOBILE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = MOBILE_REGEX
        .get_or_init(|| Regex::new(r"^01\d{9}$").expect("Failed to compile mobile regex"));

    if !regex.is_match(local) {
        return Err(AppError::InvalidFormat(
            "The mobile number is not valid. Use a number like 01XXXXXXXXX.".to_string(),
        ));
    }
    Ok(local.to_string())
}

/// Resolve a 3-digit department code.
pub fn validate_department_code(code: &str) -> Result<Department> {
    Department::from_code(code).ok_or_else(|| {
        AppError::UnknownEnumValue(format!("The code {code} does not match any known department."))
    })
}

/// Check the student id against its structural pattern and department.
///
/// The failure message names the department mismatch separately from
/// structural problems so callers can tell which rule broke.
pub fn validate_student_id(student_id: &str, department: Department) -> Result<()> {
    static STUDENT_ID_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = STUDENT_ID_REGEX
        .get_or_init(|| Regex::new(r"^[1-9]\d[1-9]\d{5}$").expect("Failed to compile id regex"));

    if !regex.is_match(student_id) {
        return Err(AppError::InvalidFormat(
            "The student id is not valid.".to_string(),
        ));
    }

    // Regex guarantees 8 ASCII digits, so positional slicing is safe.
    if &student_id[2..5] != department.code() {
        return Err(AppError::InvalidFormat(
            "The student id does not belong to the selected department.".to_string(),
        ));
    }

    let serial: u32 = student_id[5..8]
        .parse()
        .map_err(|_| AppError::InvalidFormat("The student id is not valid.".to_string()))?;
    if !(1..=150).contains(&serial) {
        return Err(AppError::InvalidFormat(
            "The student id is not valid.".to_string(),
        ));
    }

    Ok(())
}

/// Resolve the academic session token and require the student id to lead
/// with the session's trailing two digits.
pub fn validate_academic_year(student_id: &str, academic_year: &str) -> Result<AcademicYear> {
    let year = AcademicYear::from_token(academic_year).ok_or_else(|| {
        AppError::UnknownEnumValue(format!(
            "The academic year {academic_year} is not supported."
        ))
    })?;

    if student_id.len() < 2 || year.session_suffix() != &student_id[..2] {
        return Err(AppError::InconsistentState(
            "The academic session does not match the student id.".to_string(),
        ));
    }

    Ok(year)
}

/// Minimum password length check.
pub fn validate_password(raw: &str) -> Result<()> {
    if raw.chars().count() < 5 {
        return Err(AppError::TooWeak(
            "The password must be at least 5 characters long.".to_string(),
        ));
    }
    Ok(())
}
