//! MongoDB operator tables.
//!
//! Category order within each group is load-bearing: it fixes the bit
//! constants in [`bits`](super::bits). Append new categories at the end.

type Table = &'static [(&'static str, &'static [&'static str])];

const QUERY: Table = &[
    ("comparison", &["$gt", "$gte", "$in", "$lt", "$lte", "$ne", "$nin"]),
    ("logical", &["$or", "$and", "$not", "$nor"]),
    ("element", &["$exists", "$type"]),
    ("evaluation", &["$mod", "$regex", "$text", "$where"]),
    ("geospatial", &["$geoWithin", "$geoIntersects", "$near", "$nearSphere"]),
    ("array", &["$all", "$elemMatch", "$size"]),
    ("comment", &["$comment"]),
    (
        "modifiers",
        &[
            "$explain",
            "$hint",
            "$maxScan",
            "$maxTimeMS",
            "$max",
            "$min",
            "$query",
            "$returnKey",
            "$showDiskLoc",
            "$snapshot",
        ],
    ),
    ("sort", &["$orderby", "$natural"]),
];

const UPDATE: Table = &[
    (
        "fields",
        &[
            "$inc",
            "$mul",
            "$rename",
            "$setOnInsert",
            "$set",
            "$unset",
            "$min",
            "$max",
            "$currentDate",
        ],
    ),
    ("operators", &["$", "$addToSet", "$pop", "$pullAll", "$pull", "$pushAll", "$push"]),
    ("modifiers", &["$each", "$slice", "$sort", "$position"]),
    ("bitwise", &["$bit"]),
    ("isolation", &["$isolated"]),
];

const PIPELINE: Table = &[
    (
        "stage",
        &[
            "$project", "$match", "$redact", "$limit", "$skip", "$unwind", "$group", "$sort",
            "$geoNear", "$out",
        ],
    ),
    ("boolean", &["$and", "$or", "$not"]),
    (
        "set",
        &[
            "$setEquals",
            "$setIntersection",
            "$setUnion",
            "$setDifference",
            "$setIsSubset",
            "$anyElementTrue",
            "$allElementsTrue",
        ],
    ),
    ("comparison", &["$cmp", "$eq", "$gt", "$gte", "$lt", "$lte", "$ne"]),
    ("arithmetic", &["$add", "$subtract", "$multiply", "$divide", "$mod"]),
    ("string", &["$concat", "$substr", "$toLower", "$toUpper", "$strcasecmp"]),
    ("text", &["$meta"]),
    ("array", &["$size"]),
    ("variable", &["$map", "$let"]),
    ("literal", &["$literal"]),
    (
        "date",
        &[
            "$dayOfYear",
            "$dayOfMonth",
            "$dayOfWeek",
            "$year",
            "$month",
            "$week",
            "$hour",
            "$minute",
            "$second",
            "$millisecond",
        ],
    ),
    ("conditional", &["$cond", "$ifNull"]),
    (
        "accumulators",
        &["$sum", "$avg", "$first", "$last", "$max", "$min", "$push", "$addToSet"],
    ),
];

// Flat group: a single implicit category named after the group.
const PROJECTION: Table = &[("projection", &["$", "$elemMatch", "$meta", "$slice"])];

/// All groups in declaration order.
pub(super) const GROUPS: &[(&str, Table)] = &[
    ("query", QUERY),
    ("update", UPDATE),
    ("pipeline", PIPELINE),
    ("projection", PROJECTION),
];
