//! Nesting depth guard, run before any mutation.

use super::predicates::is_container;
use crate::error::{Error, Result};
use serde_json::Value;

/// Fail with `DepthExceeded` if containers nest deeper than `max`.
///
/// The top-level container is depth 1; scalars add no depth. Iterative, so
/// it is safe on input the recursive traversal could not handle.
pub(crate) fn check_depth(value: &Value, max: usize) -> Result<()> {
    let mut stack: Vec<(&Value, usize)> = vec![(value, 1)];

    while let Some((value, depth)) = stack.pop() {
        if !is_container(value) {
            continue;
        }
        if depth > max {
            return Err(Error::DepthExceeded { max });
        }
        match value {
            Value::Object(obj) => stack.extend(obj.values().map(|child| (child, depth + 1))),
            Value::Array(arr) => stack.extend(arr.iter().map(|child| (child, depth + 1))),
            _ => {},
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Built by hand: the parser refuses input this deep
    fn nested(depth: usize) -> Value {
        (0..depth).fold(json!(1), |inner, _| Value::Array(vec![inner]))
    }

    #[test]
    fn test_scalars_have_no_depth() {
        assert!(check_depth(&Value::Null, 0).is_ok());
        assert!(check_depth(&Value::Bool(true), 0).is_ok());
    }

    #[test]
    fn test_depth_at_limit() {
        assert!(check_depth(&nested(5), 5).is_ok());
        assert_eq!(
            check_depth(&nested(6), 5),
            Err(Error::DepthExceeded { max: 5 })
        );
    }

    #[test]
    fn test_mixed_nesting() {
        let value = json!({"$and": [{"price": {"$ne": 1}}]});
        // object > array > object > object
        assert!(check_depth(&value, 4).is_ok());
        assert!(check_depth(&value, 3).is_err());
    }

    #[test]
    fn test_deep_input_does_not_overflow() {
        assert!(check_depth(&nested(2_000), 32).is_err());
    }
}
