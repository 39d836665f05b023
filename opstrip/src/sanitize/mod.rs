//! Recursive operator stripping over JSON documents.
//!
//! # Policy
//!
//! - Scalars pass through unchanged.
//! - Objects are sanitized in place. Container values are sanitized first,
//!   then every operator key must be allowed by **every** active group or it
//!   is removed. Other keys are never removed.
//! - Arrays are sanitized element by element; elements left as empty
//!   containers, and falsy scalars, are dropped.
//! - With no active group, every operator key is removed.
//!
//! # Example
//!
//! ```
//! use opstrip::bits::query;
//! use opstrip::{Permissions, Sanitizer};
//!
//! let sanitizer = Sanitizer::new(&Permissions::new().grant("query", query::LOGICAL)).unwrap();
//!
//! let out = sanitizer
//!     .filter_str(r#"{"$and": [{"$ne": 1.99}, {"price": {"$exists": true}}]}"#, None)
//!     .unwrap();
//! assert_eq!(out, r#"{"$and":[{"price":{}}]}"#);
//! ```

mod depth;
mod predicates;

pub use predicates::{
    is_container, is_empty_container, is_falsy, is_mapping, is_operator_token, is_sequence,
};

use crate::catalog::Catalog;
use crate::constants;
use crate::error::{Error, Result};
use crate::permission::{PermissionSet, Permissions};
use crate::resolver::GroupResolver;
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

/// Strips non-whitelisted operator keys from documents.
///
/// Immutable after construction; share it by reference across threads.
#[derive(Debug, Clone)]
pub struct Sanitizer<'c> {
    resolver: GroupResolver<'c>,
    max_depth: usize,
    max_json_size: usize,
}

impl Sanitizer<'static> {
    /// Sanitizer over the built-in MongoDB catalog.
    ///
    /// Fails with `InvalidArgument` if `permissions` names an unknown group.
    pub fn new(permissions: &Permissions) -> Result<Self> {
        Self::with_catalog(Catalog::mongodb(), permissions)
    }
}

impl<'c> Sanitizer<'c> {
    /// Sanitizer over a caller-supplied catalog.
    pub fn with_catalog(catalog: &'c Catalog, permissions: &Permissions) -> Result<Self> {
        let resolver = GroupResolver::new(PermissionSet::build(catalog, permissions)?);
        debug!(groups = ?resolver.active_groups(None), "operator sanitizer ready");

        Ok(Self {
            resolver,
            max_depth: constants::max_depth(),
            max_json_size: constants::max_json_size(),
        })
    }

    /// Override the maximum nesting depth for this instance.
    ///
    /// Defaults to [`constants::max_depth()`]. A depth of 0 rejects every
    /// container.
    #[must_use]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Override the maximum textual input size, in bytes, for this instance.
    ///
    /// Defaults to [`constants::max_json_size()`]. Only the textual entry
    /// points check it.
    #[must_use]
    pub const fn max_json_size(mut self, bytes: usize) -> Self {
        self.max_json_size = bytes;
        self
    }

    /// The catalog this sanitizer resolves against.
    pub const fn catalog(&self) -> &'c Catalog {
        self.resolver.permissions().catalog()
    }

    /// The permission set derived at construction.
    pub const fn permissions(&self) -> &PermissionSet<'c> {
        self.resolver.permissions()
    }

    /// Whether `token` (with or without prefix) is allowed in `group`.
    pub fn allowed(&self, group: &str, token: &str) -> bool {
        self.resolver.allowed(group, token)
    }

    /// Groups with at least one allowed operator, optionally restricted.
    pub fn active_groups(&self, restrict: Option<&str>) -> Vec<&'c str> {
        self.resolver.active_groups(restrict)
    }

    /// Tokens a `bitmask` would enable for `group`.
    pub fn resolve(&self, group: &str, bitmask: u64) -> Vec<&'c str> {
        self.resolver.permissions().resolve(group, bitmask)
    }

    /// Sanitize an owned document and return it.
    ///
    /// Only `restrict`'s permissions are consulted when it is given.
    pub fn filter(&self, mut document: Value, restrict: Option<&str>) -> Result<Value> {
        self.filter_in_place(&mut document, restrict)?;
        Ok(document)
    }

    /// Sanitize a document in place.
    ///
    /// On `DepthExceeded` the document is left untouched.
    pub fn filter_in_place(&self, document: &mut Value, restrict: Option<&str>) -> Result<()> {
        if !is_container(document) {
            return Ok(());
        }

        if let Err(err) = depth::check_depth(document, self.max_depth) {
            warn!(max = self.max_depth, "document rejected: nesting too deep");
            return Err(err);
        }

        let groups = self.active_groups(restrict);
        self.sanitize(document, &groups, 1);
        Ok(())
    }

    /// Parse, sanitize and re-serialize a JSON document.
    ///
    /// Object keys keep the order they arrived in.
    pub fn filter_str(&self, json: &str, restrict: Option<&str>) -> Result<String> {
        self.filter_bytes(json.as_bytes(), restrict)
    }

    /// Like [`filter_str`](Self::filter_str) for raw UTF-8 bytes.
    pub fn filter_bytes(&self, bytes: &[u8], restrict: Option<&str>) -> Result<String> {
        if bytes.len() > self.max_json_size {
            warn!(
                max = self.max_json_size,
                actual = bytes.len(),
                "document rejected: input too large"
            );
            return Err(Error::InputTooLarge {
                max: self.max_json_size,
                actual: bytes.len(),
            });
        }

        let document: Value = serde_json::from_slice(bytes).map_err(|_| Error::InvalidJson)?;
        Ok(self.filter(document, restrict)?.to_string())
    }

    fn sanitize(&self, value: &mut Value, groups: &[&str], depth: usize) {
        match value {
            Value::Object(obj) => self.sanitize_object(obj, groups, depth),
            Value::Array(arr) => self.sanitize_array(arr, groups, depth),
            _ => {},
        }
    }

    fn sanitize_object(&self, obj: &mut Map<String, Value>, groups: &[&str], depth: usize) {
        for value in obj.values_mut() {
            self.sanitize(value, groups, depth + 1);
        }

        let prefix = self.catalog().prefix();
        obj.retain(|key, _| {
            if !is_operator_token(prefix, key) {
                return true;
            }
            // Intersection: every active group must allow the key
            let keep = !groups.is_empty() && groups.iter().all(|g| self.allowed(g, key));
            if !keep {
                debug!(key = %key, depth, "stripped operator key");
            }
            keep
        });
    }

    fn sanitize_array(&self, arr: &mut Vec<Value>, groups: &[&str], depth: usize) {
        let mut index = 0;
        arr.retain_mut(|item| {
            self.sanitize(item, groups, depth + 1);
            let keep = !is_empty_container(item) && !is_falsy(item);
            if !keep {
                trace!(index, depth, "dropped empty array element");
            }
            index += 1;
            keep
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{query, update};

    fn json(s: &str) -> Value {
        serde_json::from_str(s).unwrap()
    }

    fn to_json(value: &Value) -> String {
        value.to_string()
    }

    fn logical_only() -> Sanitizer<'static> {
        Sanitizer::new(&Permissions::new().grant("query", query::LOGICAL)).unwrap()
    }

    #[test]
    fn test_scalars_pass_through() {
        let s = logical_only();
        assert_eq!(to_json(&s.filter(json("42"), None).unwrap()), "42");
        assert_eq!(to_json(&s.filter(json(r#""x""#), None).unwrap()), r#""x""#);
        assert_eq!(to_json(&s.filter(Value::Null, None).unwrap()), "null");
        assert_eq!(s.filter_str(r#""no object""#, None).unwrap(), r#""no object""#);
    }

    #[test]
    fn test_non_operator_keys_untouched() {
        let s = logical_only();
        let out = s.filter(json(r#"{"price": 1.99}"#), None).unwrap();
        assert_eq!(to_json(&out), r#"{"price":1.99}"#);
    }

    #[test]
    fn test_removes_disallowed_operators() {
        let s = logical_only();
        let out = s
            .filter_str(
                r#"{"$and": [{"price": {"$ne": 1.99}}, {"price": {"$exists": true}}]}"#,
                None,
            )
            .unwrap();
        assert_eq!(out, r#"{"$and":[{"price":{}},{"price":{}}]}"#);
    }

    #[test]
    fn test_compacts_arrays() {
        let s = logical_only();
        let out = s
            .filter_str(r#"{"$and": [{"$ne": 1.99}, {"price": {"$exists": true}}]}"#, None)
            .unwrap();
        assert_eq!(out, r#"{"$and":[{"price":{}}]}"#);
    }

    #[test]
    fn test_falsy_elements_dropped() {
        let s = logical_only();
        let out = s
            .filter_str(
                r#"[0, 1, "", "a", null, false, true, [], {}, [0], {"$where": "x"}]"#,
                None,
            )
            .unwrap();
        assert_eq!(out, r#"[1,"a",true]"#);
    }

    #[test]
    fn test_restrict_to_group() {
        let s = Sanitizer::new(
            &Permissions::new()
                .grant("query", query::ALL)
                .grant("update", update::ALL),
        )
        .unwrap();
        let doc = r#"{"$inc": {"quantity": -2, "metrics.orders": 1}}"#;

        assert_eq!(s.filter_str(doc, Some("query")).unwrap(), "{}");
        assert_eq!(
            s.filter_str(doc, Some("update")).unwrap(),
            r#"{"$inc":{"quantity":-2,"metrics.orders":1}}"#
        );
    }

    #[test]
    fn test_intersection_across_groups() {
        let s = Sanitizer::new(
            &Permissions::new()
                .grant("query", query::LOGICAL | query::COMPARISON)
                .grant("update", update::FIELDS),
        )
        .unwrap();
        let out = s.filter_str(r#"{"$or": [{"a": 1}], "$set": {"b": 2}}"#, None).unwrap();
        // $or is not an update operator, $set is not a query operator
        assert_eq!(out, r#"{}"#);
    }

    #[test]
    fn test_no_permissions_strips_every_operator() {
        let s = Sanitizer::new(&Permissions::new()).unwrap();
        let out = s
            .filter_str(r#"{"name": {"$regex": ".*"}, "tags": [{"$where": "1"}, "x"]}"#, None)
            .unwrap();
        assert_eq!(out, r#"{"name":{},"tags":["x"]}"#);
    }

    #[test]
    fn test_unknown_restriction_strips_every_operator() {
        let s = logical_only();
        let out = s.filter_str(r#"{"$and": [{"a": 1}]}"#, Some("nope")).unwrap();
        assert_eq!(out, "{}");
    }

    #[test]
    fn test_filter_in_place_keeps_mapping() {
        let s = logical_only();
        let mut doc = json(r#"{"a": {"$gt": 1}, "$or": [{"b": 2}]}"#);
        s.filter_in_place(&mut doc, None).unwrap();
        assert_eq!(to_json(&doc), r#"{"a":{},"$or":[{"b":2}]}"#);
    }

    #[test]
    fn test_depth_exceeded_leaves_document_untouched() {
        let s = logical_only().max_depth(2);
        let mut doc = json(r#"{"$where": "x", "a": {"b": {"c": 1}}}"#);
        let err = s.filter_in_place(&mut doc, None).unwrap_err();
        assert_eq!(err, Error::DepthExceeded { max: 2 });
        assert_eq!(to_json(&doc), r#"{"$where":"x","a":{"b":{"c":1}}}"#);
    }

    #[test]
    fn test_idempotent() {
        let s = logical_only();
        let doc = r#"{"$and": [{"$ne": 1}, {"p": {"$exists": true, "$or": [0, {"$in": [1]}]}}]}"#;
        let once = s.filter_str(doc, None).unwrap();
        let twice = s.filter_str(&once, None).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_key_order_is_preserved() {
        let s = Sanitizer::new(&Permissions::new().grant("query", query::ALL)).unwrap();
        let out = s
            .filter_str(
                r#"{"zeta": 1, "$where": "x", "alpha": {"$orderby": {"b": 1, "a": -1}}, "mid": 0}"#,
                None,
            )
            .unwrap();
        assert_eq!(out, r#"{"zeta":1,"$where":"x","alpha":{"$orderby":{"b":1,"a":-1}},"mid":0}"#);

        let s = logical_only();
        let mut doc = json(r#"{"z": 1, "$regex": "^a", "a": 2, "$or": [{"y": 1, "b": 2}]}"#);
        s.filter_in_place(&mut doc, None).unwrap();
        assert_eq!(to_json(&doc), r#"{"z":1,"a":2,"$or":[{"y":1,"b":2}]}"#);
    }

    #[test]
    fn test_input_size_limit() {
        let s = logical_only().max_json_size(16);
        let doc = r#"{"$where": "sleep(100)"}"#;
        assert_eq!(
            s.filter_str(doc, None),
            Err(Error::InputTooLarge {
                max: 16,
                actual: doc.len(),
            })
        );
        assert_eq!(
            s.filter_bytes(doc.as_bytes(), None),
            Err(Error::InputTooLarge {
                max: 16,
                actual: doc.len(),
            })
        );

        // At the limit is accepted
        let s = logical_only().max_json_size(doc.len());
        assert_eq!(s.filter_str(doc, None).unwrap(), "{}");
    }

    #[test]
    fn test_size_limit_does_not_apply_to_values() {
        let s = logical_only().max_json_size(1);
        let out = s.filter(json(r#"{"$where": "sleep(100)", "a": 1}"#), None).unwrap();
        assert_eq!(to_json(&out), r#"{"a":1}"#);
    }

    #[test]
    fn test_invalid_input() {
        let s = logical_only();
        assert_eq!(s.filter_str("{", None), Err(Error::InvalidJson));
        assert_eq!(s.filter_bytes(&[0xff, 0xfe], None), Err(Error::InvalidJson));
        assert_eq!(
            s.filter_bytes(br#"{"$or": []}"#, None).unwrap(),
            r#"{"$or":[]}"#
        );
    }

    #[test]
    fn test_introspection() {
        let s = logical_only();
        assert!(s.allowed("query", "and"));
        assert!(!s.allowed("query", "$where"));
        assert_eq!(s.active_groups(None), ["query"]);
        assert_eq!(s.resolve("query", query::ELEMENT), ["$exists", "$type"]);
        assert_eq!(s.permissions().allowed_tokens("query").len(), 4);
        assert_eq!(s.catalog().prefix(), '$');
    }
}
