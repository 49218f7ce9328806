//! Martini Payments - Payment provider service
//!
//! This crate implements a payment provider plugged into a hosting platform:
//! the platform signs every call, the provider connects merchant accounts,
//! records transactions idempotently by the platform's id and accumulates
//! refunds. Outcomes are reported back to the platform as events.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
