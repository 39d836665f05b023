//! Group-level permission queries used during traversal.

use crate::catalog::Catalog;
use crate::permission::PermissionSet;
use std::borrow::Cow;

/// Answers which groups are active and whether a token is allowed in a group.
#[derive(Debug, Clone)]
pub struct GroupResolver<'c> {
    permissions: PermissionSet<'c>,
}

impl<'c> GroupResolver<'c> {
    /// Wrap a resolved permission set.
    pub const fn new(permissions: PermissionSet<'c>) -> Self {
        Self { permissions }
    }

    /// The underlying permission set.
    pub const fn permissions(&self) -> &PermissionSet<'c> {
        &self.permissions
    }

    /// Groups with at least one allowed operator, in catalog order.
    ///
    /// With `restrict`, the result holds at most that group (matched
    /// case-insensitively) and is empty if it has no permissions or does not
    /// exist.
    pub fn active_groups(&self, restrict: Option<&str>) -> Vec<&'c str> {
        let catalog: &'c Catalog = self.permissions.catalog();
        catalog
            .group_names()
            .filter(|group| restrict.is_none_or(|r| r.eq_ignore_ascii_case(group)))
            .filter(|group| !self.permissions.allowed_tokens(group).is_empty())
            .collect()
    }

    /// Whether `token` is allowed in `group`.
    ///
    /// `"and"` and `"$and"` are equivalent: the prefix is added when missing.
    /// Unknown groups and empty tokens are never allowed.
    pub fn allowed(&self, group: &str, token: &str) -> bool {
        let Some(token) = canonicalize(self.permissions.catalog().prefix(), token) else {
            return false;
        };
        self.permissions
            .allowed_tokens(group)
            .iter()
            .any(|allowed| *allowed == token)
    }
}

/// Prefix `token` with the operator marker unless it already carries it.
pub(crate) fn canonicalize(prefix: char, token: &str) -> Option<Cow<'_, str>> {
    if token.is_empty() {
        None
    } else if token.starts_with(prefix) {
        Some(Cow::Borrowed(token))
    } else {
        let mut owned = String::with_capacity(token.len() + prefix.len_utf8());
        owned.push(prefix);
        owned.push_str(token);
        Some(Cow::Owned(owned))
    }
}
