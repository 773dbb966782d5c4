//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `contact` - Contacts, the add-contact form and directory search
//! - `deal` - Deals, pipeline stages and the kanban board model
//! - `activity` - Read-only interaction log
//! - `dashboard` - Summary read models for the overview page
//! - `assistant` - Drafting assistant requests, prompts and fallbacks

pub mod activity;
pub mod assistant;
pub mod contact;
pub mod dashboard;
pub mod deal;
pub mod foundation;
