//! Atomic CRM - in-memory CRM session core
//!
//! Contacts, a kanban deal pipeline, a read-only activity log and dashboard
//! summaries, held in a session-scoped store, plus an assistant that drafts
//! emails and deal tips through a generative-text provider.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
