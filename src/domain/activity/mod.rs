//! Activity log module.
//!
//! Activities are read-only: they come from seed data and there is no
//! runtime path that creates or deletes them.

mod aggregate;

pub use aggregate::{Activity, ActivityKind};

use crate::domain::foundation::DealId;

/// Activities linked to `deal_id`, in log order.
pub fn activities_for_deal<'a>(activities: &'a [Activity], deal_id: &DealId) -> Vec<&'a Activity> {
    activities
        .iter()
        .filter(|a| a.deal_id() == Some(deal_id))
        .collect()
}
