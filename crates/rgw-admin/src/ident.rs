//! Composite `user:subuser` identifiers
//!
//! Subuser names and key owners are reported by the gateway fully qualified
//! as `parent:local`. Only the first colon separates the two halves, which
//! means local subuser names cannot contain a colon themselves.

/// Separator between parent user and subuser
pub const OWNER_SEPARATOR: char = ':';

/// Split an owner string into parent user and optional subuser
pub fn split_owner(owner: &str) -> (&str, Option<&str>) {
    match owner.split_once(OWNER_SEPARATOR) {
        Some((user, subuser)) => (user, Some(subuser)),
        None => (owner, None),
    }
}

/// Build the owner string for a user or `user:subuser`
pub fn join_owner(user: &str, subuser: Option<&str>) -> String {
    match subuser {
        Some(subuser) => format!("{user}{OWNER_SEPARATOR}{subuser}"),
        None => user.to_string(),
    }
}

/// Strip exactly one `parent:` prefix from a fully qualified name
///
/// Names without the prefix are returned unchanged.
pub fn strip_parent<'a>(name: &'a str, parent: &str) -> &'a str {
    name.strip_prefix(parent)
        .and_then(|rest| rest.strip_prefix(OWNER_SEPARATOR))
        .unwrap_or(name)
}

/// Parse an external `parent:local` id into its two non-empty halves
pub fn parse_composite(id: &str) -> Option<(&str, &str)> {
    let (parent, local) = id.split_once(OWNER_SEPARATOR)?;
    if parent.is_empty() || local.is_empty() {
        return None;
    }
    Some((parent, local))
}

/// Check that a subuser local name can be qualified unambiguously
pub fn is_valid_local_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(OWNER_SEPARATOR)
}
