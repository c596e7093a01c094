// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod accounts;
pub mod availability;
pub mod mailer;

pub use availability::AvailabilityService;
pub use mailer::Mailer;
