//! Contact directory search.

use super::Contact;

/// Contacts whose name or company contains `query`, ignoring case.
///
/// Order is preserved. An empty query matches everything.
pub fn search_contacts<'a>(contacts: &'a [Contact], query: &str) -> Vec<&'a Contact> {
    let needle = query.to_lowercase();
    contacts
        .iter()
        .filter(|c| {
            c.name().to_lowercase().contains(&needle)
                || c.company().to_lowercase().contains(&needle)
        })
        .collect()
}
