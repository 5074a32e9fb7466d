//! Scalar constraint evaluators: ranges and lengths
//!
//! Range comparison is type-aware. Numbers compare numerically, formatted
//! strings (dates, times, time zones) compare after parsing, other strings
//! compare lexicographically. A value that cannot be parsed is never reported
//! as out of range; its format is flagged by the type check instead. A bound
//! whose own type does not fit the validator is a schema problem.

use std::cmp::Ordering;

use serde_json::{Number, Value};

use super::formats::StringFormat;
use super::messages;
use crate::schema::ValidatorKind;

/// Which side of a range a bound constrains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Minimum,
    MinimumExclusive,
    Maximum,
    MaximumExclusive,
}

impl Bound {
    pub const ALL: [Bound; 4] = [
        Bound::Minimum,
        Bound::MinimumExclusive,
        Bound::Maximum,
        Bound::MaximumExclusive,
    ];

    /// Whether `value.cmp(bound) == ordering` satisfies this bound
    pub fn admits(&self, ordering: Ordering) -> bool {
        match self {
            Bound::Minimum => ordering != Ordering::Less,
            Bound::MinimumExclusive => ordering == Ordering::Greater,
            Bound::Maximum => ordering != Ordering::Greater,
            Bound::MaximumExclusive => ordering == Ordering::Less,
        }
    }

    pub fn violation(&self, path: &str, bound: &Value) -> String {
        match self {
            Bound::Minimum => messages::minimum_value(path, bound),
            Bound::MinimumExclusive => messages::minimum_value_exclusive(path, bound),
            Bound::Maximum => messages::maximum_value(path, bound),
            Bound::MaximumExclusive => messages::maximum_value_exclusive(path, bound),
        }
    }
}

/// What kind of bound a validator can be ranged by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    /// integer, float: numeric bounds only
    Numeric,
    /// string: string bounds, compared lexicographically
    Text,
    /// date, datetime, time, timezone, uuid: well-formed strings of the format
    Formatted(StringFormat),
    /// any other type: a number or string bound, applied when the value matches
    Untyped,
}

impl RangeKind {
    pub fn of(kind: &ValidatorKind) -> Self {
        if let Some(format) = kind.string_format() {
            return RangeKind::Formatted(format);
        }
        match kind {
            ValidatorKind::Integer | ValidatorKind::Float => RangeKind::Numeric,
            ValidatorKind::String { .. } => RangeKind::Text,
            _ => RangeKind::Untyped,
        }
    }
}

/// The bound itself cannot be compared against values of this kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomparableBound;

/// Order `value` relative to `bound`.
///
/// `Ok(None)` means the value is not comparable (wrong type or malformed);
/// `Err` means the bound is unusable for `range`, which is a schema problem.
pub fn compare_to_bound(
    value: &Value,
    bound: &Value,
    range: RangeKind,
) -> Result<Option<Ordering>, IncomparableBound> {
    match (range, bound) {
        (RangeKind::Formatted(format), Value::String(b)) if format.is_valid(b) => {
            Ok(value.as_str().and_then(|v| format.compare(v, b)))
        }
        (RangeKind::Numeric | RangeKind::Untyped, Value::Number(b)) => match value {
            Value::Number(v) => Ok(compare_numbers(v, b)),
            _ => Ok(None),
        },
        (RangeKind::Text | RangeKind::Untyped, Value::String(b)) => match value {
            Value::String(v) => Ok(Some(v.as_str().cmp(b.as_str()))),
            _ => Ok(None),
        },
        _ => Err(IncomparableBound),
    }
}

/// Check one bound; true when satisfied or when the value is not comparable
pub fn check_bound(
    value: &Value,
    bound_value: &Value,
    bound: Bound,
    range: RangeKind,
) -> Result<bool, IncomparableBound> {
    Ok(compare_to_bound(value, bound_value, range)?.map_or(true, |o| bound.admits(o)))
}

fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x.cmp(&y));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

/// Length of a string (in UTF-16 code units), array, or object (in keys)
pub fn item_length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.encode_utf16().count()),
        Value::Array(a) => Some(a.len()),
        Value::Object(o) => Some(o.len()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NUM: RangeKind = RangeKind::Numeric;
    const DATE: RangeKind = RangeKind::Formatted(StringFormat::Date);

    #[test]
    fn test_inclusive_and_exclusive_boundaries() {
        let at = json!(10);
        let bound = json!(10);
        assert!(check_bound(&at, &bound, Bound::Minimum, NUM).unwrap());
        assert!(check_bound(&at, &bound, Bound::Maximum, NUM).unwrap());
        assert!(!check_bound(&at, &bound, Bound::MinimumExclusive, NUM).unwrap());
        assert!(!check_bound(&at, &bound, Bound::MaximumExclusive, NUM).unwrap());

        assert!(!check_bound(&json!(9), &bound, Bound::Minimum, NUM).unwrap());
        assert!(check_bound(&json!(11), &bound, Bound::MinimumExclusive, NUM).unwrap());
        assert!(!check_bound(&json!(11), &bound, Bound::Maximum, NUM).unwrap());
        assert!(check_bound(&json!(9), &bound, Bound::MaximumExclusive, NUM).unwrap());
    }

    #[test]
    fn test_mixed_integer_float_comparison() {
        assert!(check_bound(&json!(1.5), &json!(1), Bound::MinimumExclusive, NUM).unwrap());
        assert!(!check_bound(&json!(-0.5), &json!(0), Bound::Minimum, NUM).unwrap());
    }

    #[test]
    fn test_dates_compare_semantically() {
        let bound = json!("2018-01-01");
        assert!(check_bound(&json!("2018"), &bound, Bound::Minimum, DATE).unwrap());
        assert!(!check_bound(&json!("2017-12-31"), &bound, Bound::Minimum, DATE).unwrap());
    }

    #[test]
    fn test_malformed_value_is_not_out_of_range() {
        let bound = json!("2018-01-01");
        assert!(check_bound(&json!("garbage"), &bound, Bound::Minimum, DATE).unwrap());
        assert!(check_bound(&json!("text"), &json!(3), Bound::Maximum, NUM).unwrap());
        assert!(check_bound(&json!(7), &json!("m"), Bound::Maximum, RangeKind::Text).unwrap());
    }

    #[test]
    fn test_unusable_bound_is_an_error() {
        assert_eq!(
            check_bound(&json!("2018"), &json!("soon"), Bound::Minimum, DATE),
            Err(IncomparableBound)
        );
        assert_eq!(
            check_bound(&json!(1), &json!([1]), Bound::Minimum, RangeKind::Untyped),
            Err(IncomparableBound)
        );
    }

    #[test]
    fn test_bound_must_fit_validator_type() {
        assert_eq!(
            check_bound(&json!(3), &json!("5"), Bound::Minimum, NUM),
            Err(IncomparableBound)
        );
        assert_eq!(
            check_bound(&json!("abc"), &json!(5), Bound::Maximum, RangeKind::Text),
            Err(IncomparableBound)
        );
        assert_eq!(
            check_bound(&json!("2018"), &json!(2018), Bound::Minimum, DATE),
            Err(IncomparableBound)
        );
    }

    #[test]
    fn test_range_kind_follows_validator_type() {
        assert_eq!(RangeKind::of(&ValidatorKind::Integer), RangeKind::Numeric);
        assert_eq!(RangeKind::of(&ValidatorKind::Float), RangeKind::Numeric);
        assert_eq!(
            RangeKind::of(&ValidatorKind::String { regex_pattern: None }),
            RangeKind::Text
        );
        assert_eq!(RangeKind::of(&ValidatorKind::Time), RangeKind::Formatted(StringFormat::Time));
        assert_eq!(RangeKind::of(&ValidatorKind::Any), RangeKind::Untyped);
    }

    #[test]
    fn test_time_zone_offsets() {
        let fmt = RangeKind::Formatted(StringFormat::TimeZone);
        assert!(check_bound(&json!("Z"), &json!("-01:00"), Bound::MinimumExclusive, fmt).unwrap());
        assert!(!check_bound(&json!("+02:00"), &json!("+01:00"), Bound::Maximum, fmt).unwrap());
    }

    #[test]
    fn test_item_length() {
        assert_eq!(item_length(&json!("héllo")), Some(5));
        assert_eq!(item_length(&json!([1, 2])), Some(2));
        assert_eq!(item_length(&json!({ "a": 1 })), Some(1));
        assert_eq!(item_length(&json!(12)), None);
    }

    #[test]
    fn test_string_length_counts_utf16_units() {
        assert_eq!(item_length(&json!("😀")), Some(2));
        assert_eq!(item_length(&json!("a😀b")), Some(4));
    }
}
