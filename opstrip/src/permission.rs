//! Permission configuration and the resolved per-group allow lists.
//!
//! [`Permissions`] is what callers supply: group name to bitmask. A
//! [`PermissionSet`] is derived from it once per sanitizer by expanding each
//! bitmask against the catalog into concrete operator tokens.
//!
//! # Example
//!
//! ```
//! use opstrip::bits::query;
//! use opstrip::{Catalog, PermissionSet, Permissions};
//!
//! let perms = Permissions::new().grant("query", query::ELEMENT);
//! let set = PermissionSet::build(Catalog::mongodb(), &perms).unwrap();
//! assert_eq!(set.allowed_tokens("query"), ["$exists", "$type"]);
//! assert!(set.allowed_tokens("update").is_empty());
//! ```

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// Caller-supplied permission configuration: group name to bitmask.
///
/// Group names are stored lowercase. Groups never granted resolve to zero
/// permissions, so the default configuration enables nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Permissions {
    masks: BTreeMap<String, u64>,
}

impl Permissions {
    /// Empty configuration: every operator is stripped.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the categories in `mask` for `group`.
    ///
    /// Repeated grants for the same group are OR-ed together.
    #[must_use]
    pub fn grant(mut self, group: &str, mask: u64) -> Self {
        *self.masks.entry(group.to_ascii_lowercase()).or_insert(0) |= mask;
        self
    }

    /// Enable every category of `group`, whatever the catalog declares.
    #[must_use]
    pub fn grant_all(self, group: &str) -> Self {
        self.grant(group, u64::MAX)
    }

    /// Configured bitmask for `group` (0 when absent).
    pub fn bitmask(&self, group: &str) -> u64 {
        self.masks
            .get(&group.to_ascii_lowercase())
            .copied()
            .unwrap_or(0)
    }

    /// Configured groups and their bitmasks, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.masks.iter().map(|(group, mask)| (group.as_str(), *mask))
    }

    /// Parse a configuration such as `{"query": 2, "update": 31}`.
    ///
    /// - `null` or a negative integer resolves to zero permissions.
    /// - Fractional numbers and non-numeric values are `InvalidArgument`.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(|_| Error::InvalidJson)?;
        Self::from_json_value(&value)
    }

    /// Parse a configuration from an already parsed JSON value.
    pub fn from_json_value(value: &Value) -> Result<Self> {
        let Value::Object(obj) = value else {
            return Err(Error::invalid("permissions must be a JSON object"));
        };

        let mut perms = Self::new();
        for (group, mask) in obj.iter() {
            perms = perms.grant(group, bitmask_from_json(group, mask)?);
        }
        Ok(perms)
    }
}

fn bitmask_from_json(group: &str, value: &Value) -> Result<u64> {
    let not_integer = || Error::invalid(format!("bitmask for `{group}` must be an integer"));

    match value {
        Value::Null => Ok(0),
        Value::Number(n) => match (n.as_u64(), n.as_i64(), n.as_f64()) {
            (Some(mask), _, _) => Ok(mask),
            // Negative masks grant nothing
            (None, Some(_), _) => Ok(0),
            (None, None, Some(f)) => bitmask_from_float(group, f).ok_or_else(not_integer)?,
            (None, None, None) => Err(not_integer()),
        },
        _ => Err(not_integer()),
    }
}

/// Integral floats (`3.0`) are accepted; `None` for fractional input.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
fn bitmask_from_float(group: &str, f: f64) -> Option<Result<u64>> {
    if !f.is_finite() || f.fract() != 0.0 {
        return None;
    }
    Some(if f <= 0.0 {
        Ok(0)
    } else if f >= u64::MAX as f64 {
        Err(Error::invalid(format!("bitmask for `{group}` is out of range")))
    } else {
        Ok(f as u64)
    })
}

/// Expand `bitmask` into the tokens it enables for `group`.
///
/// Categories are visited in bit order and every token of each enabled
/// category is appended. Unknown groups and a zero mask yield an empty list.
pub fn resolve<'c>(catalog: &'c Catalog, group: &str, bitmask: u64) -> Vec<&'c str> {
    let Some(def) = catalog.group(group) else {
        return Vec::new();
    };

    def.categories()
        .iter()
        .enumerate()
        .filter(|(bit, _)| (bitmask & (1u64 << bit)) != 0)
        .flat_map(|(_, category)| category.tokens().iter().map(String::as_str))
        .collect()
}

/// Allowed operator tokens for every catalog group, derived once.
#[derive(Debug, Clone)]
pub struct PermissionSet<'c> {
    catalog: &'c Catalog,
    // Indexed by catalog group position
    allowed: Vec<Vec<&'c str>>,
}

impl<'c> PermissionSet<'c> {
    /// Resolve every group of `catalog` against `permissions`.
    ///
    /// Fails with `InvalidArgument` when `permissions` names a group the
    /// catalog does not declare.
    pub fn build(catalog: &'c Catalog, permissions: &Permissions) -> Result<Self> {
        if let Some((unknown, _)) = permissions
            .iter()
            .find(|(group, _)| catalog.group(group).is_none())
        {
            return Err(Error::invalid(format!(
                "permissions name unknown group `{unknown}`"
            )));
        }

        let allowed = catalog
            .group_names()
            .map(|group| resolve(catalog, group, permissions.bitmask(group)))
            .collect();

        Ok(Self { catalog, allowed })
    }

    /// The catalog the set was resolved against.
    pub const fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Tokens a `bitmask` would enable for `group`; see [`resolve`].
    pub fn resolve(&self, group: &str, bitmask: u64) -> Vec<&'c str> {
        resolve(self.catalog, group, bitmask)
    }

    /// Allowed tokens of `group` in catalog order. Empty for unknown groups.
    pub fn allowed_tokens(&self, group: &str) -> &[&'c str] {
        self.catalog
            .groups()
            .iter()
            .position(|g| g.name().eq_ignore_ascii_case(group))
            .and_then(|index| self.allowed.get(index))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
