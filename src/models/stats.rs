//! Aggregate donor statistics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::enums::BloodGroup;

/// Registry-wide counts returned by the public counts endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonorCounts {
    /// All registered donors
    pub total_donors: i64,
    /// Donors currently available to donate
    pub available_donors: i64,
    /// Donors registered since the start of the current calendar month
    pub new_donors_this_month: i64,
    /// Share of each blood group on a 0-100 scale, only groups with donors
    pub blood_group_percentages: HashMap<BloodGroup, f64>,
}
