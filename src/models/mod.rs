// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod donor;
pub mod enums;
pub mod profile;
pub mod stats;

pub use donor::{Donor, DonorChanges, DonorFilter, DonorOut, NewDonor, RegisterDonor};
pub use enums::{AcademicYear, BloodGroup, Department, District, EmploymentStatus, Gender};
pub use profile::{Profile, ProfileChanges};
pub use stats::DonorCounts;
