//! Bit constants for building [`Permissions`](crate::Permissions) against the
//! MongoDB catalog.
//!
//! One constant per (group, category) pair plus a per-group `ALL`.
//!
//! ```
//! use opstrip::bits::{query, update};
//! use opstrip::Permissions;
//!
//! let perms = Permissions::new()
//!     .grant("query", query::COMPARISON | query::LOGICAL)
//!     .grant("update", update::FIELDS);
//! assert_eq!(perms.bitmask("query"), 0b11);
//! ```

/// Query filter operators.
pub mod query {
    /// `$gt $gte $in $lt $lte $ne $nin`
    pub const COMPARISON: u64 = 1 << 0;
    /// `$or $and $not $nor`
    pub const LOGICAL: u64 = 1 << 1;
    /// `$exists $type`
    pub const ELEMENT: u64 = 1 << 2;
    /// `$mod $regex $text $where`
    pub const EVALUATION: u64 = 1 << 3;
    /// `$geoWithin $geoIntersects $near $nearSphere`
    pub const GEOSPATIAL: u64 = 1 << 4;
    /// `$all $elemMatch $size`
    pub const ARRAY: u64 = 1 << 5;
    /// `$comment`
    pub const COMMENT: u64 = 1 << 6;
    /// Legacy query modifiers (`$hint`, `$explain`, `$maxTimeMS`, ...).
    pub const MODIFIERS: u64 = 1 << 7;
    /// `$orderby $natural`
    pub const SORT: u64 = 1 << 8;
    /// Every query category.
    pub const ALL: u64 = (1 << 9) - 1;
}

/// Update operators.
pub mod update {
    /// `$inc $mul $rename $setOnInsert $set $unset $min $max $currentDate`
    pub const FIELDS: u64 = 1 << 0;
    /// Array update operators, including the positional `$`.
    pub const OPERATORS: u64 = 1 << 1;
    /// `$each $slice $sort $position`
    pub const MODIFIERS: u64 = 1 << 2;
    /// `$bit`
    pub const BITWISE: u64 = 1 << 3;
    /// `$isolated`
    pub const ISOLATION: u64 = 1 << 4;
    /// Every update category.
    pub const ALL: u64 = (1 << 5) - 1;
}

/// Aggregation pipeline stages and expressions.
pub mod pipeline {
    /// Stages: `$project $match $group $sort $out` and friends.
    pub const STAGE: u64 = 1 << 0;
    /// `$and $or $not`
    pub const BOOLEAN: u64 = 1 << 1;
    /// Set expressions (`$setUnion`, `$anyElementTrue`, ...).
    pub const SET: u64 = 1 << 2;
    /// `$cmp $eq $gt $gte $lt $lte $ne`
    pub const COMPARISON: u64 = 1 << 3;
    /// `$add $subtract $multiply $divide $mod`
    pub const ARITHMETIC: u64 = 1 << 4;
    /// `$concat $substr $toLower $toUpper $strcasecmp`
    pub const STRING: u64 = 1 << 5;
    /// `$meta`
    pub const TEXT: u64 = 1 << 6;
    /// `$size`
    pub const ARRAY: u64 = 1 << 7;
    /// `$map $let`
    pub const VARIABLE: u64 = 1 << 8;
    /// `$literal`
    pub const LITERAL: u64 = 1 << 9;
    /// Date part extraction (`$year`, `$month`, `$hour`, ...).
    pub const DATE: u64 = 1 << 10;
    /// `$cond $ifNull`
    pub const CONDITIONAL: u64 = 1 << 11;
    /// `$group` accumulators (`$sum`, `$avg`, `$push`, ...).
    pub const ACCUMULATORS: u64 = 1 << 12;
    /// Every pipeline category.
    pub const ALL: u64 = (1 << 13) - 1;
}

/// Projection operators (flat group).
pub mod projection {
    /// `$ $elemMatch $meta $slice`
    pub const PROJECTION: u64 = 1 << 0;
    /// Same as [`PROJECTION`]; the group has a single category.
    pub const ALL: u64 = (1 << 1) - 1;
}

#[cfg(test)]
mod tests {
    use crate::Catalog;

    fn bit(group: &str, category: &str) -> u64 {
        Catalog::mongodb().bit_of(group, category).unwrap()
    }

    #[test]
    fn test_query_bits_match_catalog() {
        use super::query::*;
        assert_eq!(bit("query", "comparison"), COMPARISON);
        assert_eq!(bit("query", "logical"), LOGICAL);
        assert_eq!(bit("query", "element"), ELEMENT);
        assert_eq!(bit("query", "evaluation"), EVALUATION);
        assert_eq!(bit("query", "geospatial"), GEOSPATIAL);
        assert_eq!(bit("query", "array"), ARRAY);
        assert_eq!(bit("query", "comment"), COMMENT);
        assert_eq!(bit("query", "modifiers"), MODIFIERS);
        assert_eq!(bit("query", "sort"), SORT);
        assert_eq!(Catalog::mongodb().all_of("query").unwrap(), ALL);
    }

    #[test]
    fn test_update_bits_match_catalog() {
        use super::update::*;
        assert_eq!(bit("update", "fields"), FIELDS);
        assert_eq!(bit("update", "operators"), OPERATORS);
        assert_eq!(bit("update", "modifiers"), MODIFIERS);
        assert_eq!(bit("update", "bitwise"), BITWISE);
        assert_eq!(bit("update", "isolation"), ISOLATION);
        assert_eq!(Catalog::mongodb().all_of("update").unwrap(), ALL);
    }

    #[test]
    fn test_pipeline_bits_match_catalog() {
        use super::pipeline::*;
        let expected = [
            ("stage", STAGE),
            ("boolean", BOOLEAN),
            ("set", SET),
            ("comparison", COMPARISON),
            ("arithmetic", ARITHMETIC),
            ("string", STRING),
            ("text", TEXT),
            ("array", ARRAY),
            ("variable", VARIABLE),
            ("literal", LITERAL),
            ("date", DATE),
            ("conditional", CONDITIONAL),
            ("accumulators", ACCUMULATORS),
        ];
        for (category, mask) in expected {
            assert_eq!(bit("pipeline", category), mask, "category {category}");
        }
        assert_eq!(Catalog::mongodb().all_of("pipeline").unwrap(), ALL);
    }

    #[test]
    fn test_projection_is_flat() {
        assert_eq!(bit("projection", "projection"), super::projection::PROJECTION);
        assert_eq!(super::projection::PROJECTION, super::projection::ALL);
        assert_eq!(Catalog::mongodb().all_of("projection").unwrap(), 1);
    }
}
