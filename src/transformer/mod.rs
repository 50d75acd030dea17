//! Recursive key-case transformer for JSON values.

mod case;

pub use case::Direction;

use crate::matcher::ExclusionSet;
use serde_json::{Map, Value as JsonValue};

/// Rewrites every object key in a JSON value for one direction.
///
/// Arrays and nested objects are walked to any depth. Scalars and `null`
/// are returned as-is. A key matching the exclusion set keeps its spelling,
/// but its value is still converted.
#[derive(Debug, Clone)]
pub struct KeyTransformer {
    direction: Direction,
    exclude: ExclusionSet,
}

impl KeyTransformer {
    /// Create a new transformer.
    pub fn new(direction: Direction, exclude: ExclusionSet) -> Self {
        Self { direction, exclude }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclude
    }

    /// Convert a single key, honouring exclusions.
    pub fn convert_key(&self, key: &str) -> String {
        convert_key(key, self.direction, &self.exclude)
    }

    /// Build a converted copy of `value`. The input is left untouched.
    pub fn transform(&self, value: &JsonValue) -> JsonValue {
        convert(value, self.direction, &self.exclude)
    }
}

/// Convert all keys of `value`, recursing into arrays and objects.
pub fn convert(value: &JsonValue, direction: Direction, exclude: &ExclusionSet) -> JsonValue {
    match value {
        JsonValue::Array(items) => JsonValue::Array(
            items
                .iter()
                .map(|v| convert(v, direction, exclude))
                .collect(),
        ),
        JsonValue::Object(obj) => {
            let mut new_obj = Map::with_capacity(obj.len());
            for (k, v) in obj {
                new_obj.insert(
                    convert_key(k, direction, exclude),
                    convert(v, direction, exclude),
                );
            }
            JsonValue::Object(new_obj)
        }
        other => other.clone(),
    }
}

fn convert_key(key: &str, direction: Direction, exclude: &ExclusionSet) -> String {
    if exclude.matches(key) {
        key.to_string()
    } else {
        direction.convert_key(key)
    }
}

/// Count object keys at every depth.
pub(crate) fn count_keys(value: &JsonValue) -> usize {
    match value {
        JsonValue::Array(items) => items.iter().map(count_keys).sum(),
        JsonValue::Object(obj) => obj.len() + obj.values().map(count_keys).sum::<usize>(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::KeyMatcher;
    use serde_json::json;

    fn outbound() -> KeyTransformer {
        KeyTransformer::new(Direction::Outbound, ExclusionSet::new())
    }

    fn inbound() -> KeyTransformer {
        KeyTransformer::new(Direction::Inbound, ExclusionSet::new())
    }

    #[test]
    fn test_scalars_pass_through() {
        for value in [json!(null), json!(true), json!(42), json!(1.5), json!("fooBar")] {
            assert_eq!(outbound().transform(&value), value);
            assert_eq!(inbound().transform(&value), value);
        }
    }

    #[test]
    fn test_flat_object() {
        let input = json!({"id": 1, "snakeCase": "snake_case"});
        assert_eq!(
            outbound().transform(&input),
            json!({"id": 1, "snake_case": "snake_case"})
        );
    }

    #[test]
    fn test_values_are_not_renamed() {
        let input = json!({"code": 200, "camel_case": "camel_case"});
        assert_eq!(
            inbound().transform(&input),
            json!({"code": 200, "camelCase": "camel_case"})
        );
    }

    #[test]
    fn test_nested_arrays_and_objects() {
        let input = json!({
            "userList": [
                {"firstName": "a", "tagSet": [{"tagName": "x"}, 3, null]},
                [{"deepKey": {"deeperKey": true}}]
            ],
            "pageInfo": {"totalCount": 2, "nextCursor": null}
        });
        let expected = json!({
            "user_list": [
                {"first_name": "a", "tag_set": [{"tag_name": "x"}, 3, null]},
                [{"deep_key": {"deeper_key": true}}]
            ],
            "page_info": {"total_count": 2, "next_cursor": null}
        });
        assert_eq!(outbound().transform(&input), expected);
    }

    #[test]
    fn test_top_level_array() {
        let input = json!([{"fooBar": 1}, {"bazQux": 2}]);
        assert_eq!(
            outbound().transform(&input),
            json!([{"foo_bar": 1}, {"baz_qux": 2}])
        );
    }

    #[test]
    fn test_excluded_key_keeps_spelling_but_children_convert() {
        let exclude: ExclusionSet = [KeyMatcher::exact("metaData")].into_iter().collect();
        let transformer = KeyTransformer::new(Direction::Outbound, exclude);

        let input = json!({"metaData": {"innerKey": 1, "metaData": 2}, "otherKey": 3});
        assert_eq!(
            transformer.transform(&input),
            json!({"metaData": {"inner_key": 1, "metaData": 2}, "other_key": 3})
        );
    }

    #[test]
    fn test_pattern_exclusion() {
        let exclude: ExclusionSet = [KeyMatcher::pattern("exclude$").unwrap()]
            .into_iter()
            .collect();
        let transformer = KeyTransformer::new(Direction::Inbound, exclude);

        let input = json!({"camel_case": 1, "camel_case_exclude": 2});
        assert_eq!(
            transformer.transform(&input),
            json!({"camelCase": 1, "camel_case_exclude": 2})
        );
    }

    #[test]
    fn test_convert_key_honours_exclusions() {
        let exclude: ExclusionSet = [KeyMatcher::exact("keepMe")].into_iter().collect();
        let transformer = KeyTransformer::new(Direction::Outbound, exclude);
        assert_eq!(transformer.convert_key("keepMe"), "keepMe");
        assert_eq!(transformer.convert_key("convertMe"), "convert_me");
        assert_eq!(transformer.direction(), Direction::Outbound);
        assert_eq!(transformer.exclusions().len(), 1);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = json!({"fooBar": {"bazQux": [1, 2]}});
        let snapshot = input.clone();
        let _ = outbound().transform(&input);
        assert_eq!(input, snapshot);
    }

    #[test]
    fn test_key_order_is_preserved() {
        let input = json!({"zetaKey": 1, "alphaKey": 2, "midKey": 3});
        let output = outbound().transform(&input);
        let keys: Vec<&String> = output.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zeta_key", "alpha_key", "mid_key"]);
    }

    #[test]
    fn test_idempotence() {
        let input = json!({"fooBar": [{"bazQux": 1}], "already_snake": {"innerKey": 2}});
        let once = outbound().transform(&input);
        assert_eq!(outbound().transform(&once), once);

        let once = inbound().transform(&input);
        assert_eq!(inbound().transform(&once), once);
    }

    #[test]
    fn test_round_trip() {
        let input = json!({"firstName": "a", "addressList": [{"zipCode": "1"}], "id": 7});
        let snake = outbound().transform(&input);
        assert_eq!(inbound().transform(&snake), input);
    }

    #[test]
    fn test_convert_function() {
        let exclude = ExclusionSet::new();
        assert_eq!(
            convert(&json!({"fooBar": 1}), Direction::Outbound, &exclude),
            json!({"foo_bar": 1})
        );
        assert_eq!(convert(&json!("fooBar"), Direction::Outbound, &exclude), json!("fooBar"));
    }

    #[test]
    fn test_count_keys() {
        assert_eq!(count_keys(&json!({"a": {"b": 1, "c": [{"d": 1}]}})), 4);
        assert_eq!(count_keys(&json!("a")), 0);
    }
}
