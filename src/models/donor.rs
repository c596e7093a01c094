//! Donor model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{AcademicYear, BloodGroup, Department, District, Gender};

/// Donor row as stored in Postgres.
///
/// Deliberately not `Serialize`: the password hash rides along with the row
/// and responses go through [`DonorOut`], which has no hash field at all.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Donor {
    /// Generated donor id (primary key)
    pub id: Uuid,
    /// Full name, trimmed
    pub full_name: String,
    /// Email address (unique)
    pub email: String,
    /// Normalized 11-digit mobile number (unique)
    pub mobile: String,
    /// Academic department, stored as its 3-digit code
    #[sqlx(try_from = "String")]
    pub department: Department,
    /// 8-digit student id (unique)
    pub student_id: String,
    pub gender: Gender,
    pub district: District,
    pub blood_group: BloodGroup,
    /// Enrollment session, stored as its "YYYY-YYYY" token
    #[sqlx(try_from = "String")]
    pub academic_year: AcademicYear,
    /// Whether the donor can currently be contacted for donation
    pub is_available: bool,
    /// Whether the account finished email verification
    pub is_active: bool,
    pub is_admin: bool,
    pub is_superuser: bool,
    /// Argon2 PHC-format password hash
    pub hashed_password: String,
    /// When the account was created
    pub created_on: DateTime<Utc>,
    /// When the donor last donated
    pub donated_on: DateTime<Utc>,
}

/// Donor fields exposed over the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonorOut {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    pub department: Department,
    pub student_id: String,
    pub gender: Gender,
    pub district: District,
    pub blood_group: BloodGroup,
    pub academic_year: AcademicYear,
    pub is_available: bool,
    pub is_active: bool,
    pub is_admin: bool,
    pub is_superuser: bool,
    pub created_on: DateTime<Utc>,
    pub donated_on: DateTime<Utc>,
}

impl From<Donor> for DonorOut {
    fn from(d: Donor) -> Self {
        Self {
            id: d.id,
            full_name: d.full_name,
            email: d.email,
            mobile: d.mobile,
            department: d.department,
            student_id: d.student_id,
            gender: d.gender,
            district: d.district,
            blood_group: d.blood_group,
            academic_year: d.academic_year,
            is_available: d.is_available,
            is_active: d.is_active,
            is_admin: d.is_admin,
            is_superuser: d.is_superuser,
            created_on: d.created_on,
            donated_on: d.donated_on,
        }
    }
}

/// Open-registration payload.
///
/// Department and academic year arrive as raw strings so the validation
/// layer can produce its own errors for unknown codes instead of a generic
/// deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterDonor {
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    pub department: String,
    pub student_id: String,
    pub gender: Gender,
    pub district: District,
    pub blood_group: BloodGroup,
    pub academic_year: String,
    pub password: String,
}

/// Privileged creation payload: registration fields plus account flags.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDonorBySuperuser {
    #[serde(flatten)]
    pub donor: RegisterDonor,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

/// Self-service update payload.
///
/// `password` is the donor's current password and must match before any
/// field is touched; a replacement password travels in `new_password`.
/// Account flags are absent on purpose and cannot be set through this type.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMe {
    pub password: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub district: Option<District>,
    pub blood_group: Option<BloodGroup>,
    pub is_available: Option<bool>,
    pub new_password: Option<String>,
}

/// Superuser update payload, keyed on the target's email in the path.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateByEmail {
    pub full_name: Option<String>,
    pub mobile: Option<String>,
    pub district: Option<District>,
    pub blood_group: Option<BloodGroup>,
    pub is_available: Option<bool>,
    pub is_active: Option<bool>,
    /// New password, set directly without confirmation
    pub password: Option<String>,
}

/// Fully validated donor ready for insertion.
#[derive(Debug, Clone)]
pub struct NewDonor {
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    pub department: Department,
    pub student_id: String,
    pub gender: Gender,
    pub district: District,
    pub blood_group: BloodGroup,
    pub academic_year: AcademicYear,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub is_superuser: bool,
    pub is_available: bool,
}

/// Explicit per-field donor update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct DonorChanges {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub district: Option<District>,
    pub blood_group: Option<BloodGroup>,
    pub is_available: Option<bool>,
    pub is_active: Option<bool>,
    pub hashed_password: Option<String>,
}

/// Search filters; every field optional, combined with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DonorFilter {
    /// Case-insensitive name substring
    pub full_name: Option<String>,
    pub student_id: Option<String>,
    pub gender: Option<Gender>,
    pub district: Option<District>,
    pub blood_group: Option<BloodGroup>,
    pub department: Option<Department>,
    pub academic_year: Option<AcademicYear>,
}
