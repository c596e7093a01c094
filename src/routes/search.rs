// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Donor search routes.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::error::Result;
use crate::models::donor::{DonorFilter, DonorOut};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/search/filter_donors", get(filter_donors))
}

/// Filtered donor search; every filter optional, combined with AND.
///
/// No filters at all returns the whole registry, available or not, which is
/// what the search page shows before the first filter is picked.
async fn filter_donors(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<DonorFilter>,
) -> Result<Json<Vec<DonorOut>>> {
    tracing::debug!(?filter, "Filtering donors");

    let donors = state.donors.search(&filter).await?;
    Ok(Json(donors.into_iter().map(DonorOut::from).collect()))
}
