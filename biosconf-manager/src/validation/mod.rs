//! Validation engine
//!
//! Pure checks of a proposed value against an attribute's bounds. Each
//! validator returns accept/reject; [`validate_pending`] turns a rejection
//! into an [`Error::InvalidArgument`].
//!
//! Integer validation is strict by default: with no `ScalarIncrement` bound
//! (or a zero one) every value is rejected.

use biosconf_api::{AttributeType, AttributeValue, Bound, BoundType, Error, Result};

fn integer_bound(bound: &Bound) -> Option<i64> {
    let value = bound.value.as_integer();
    if value.is_none() {
        log::error!("{:?} bound carries a non-integer value", bound.kind);
    }
    value
}

/// Value must equal the string half of at least one `OneOf` bound
pub fn validate_enumeration(value: &str, bounds: &[Bound]) -> bool {
    let found = bounds
        .iter()
        .filter(|bound| bound.kind == BoundType::OneOf)
        .any(|bound| bound.value.as_str() == Some(value));

    if !found {
        log::error!("{} is not one of the permitted enumeration values", value);
    }
    found
}

/// Byte length must lie within `[MinStringLength, MaxStringLength]`, both 0 when absent
pub fn validate_string(value: &str, bounds: &[Bound]) -> bool {
    let mut min_len: i64 = 0;
    let mut max_len: i64 = 0;

    for bound in bounds {
        let slot = match bound.kind {
            BoundType::MinStringLength => &mut min_len,
            BoundType::MaxStringLength => &mut max_len,
            _ => continue,
        };
        match integer_bound(bound) {
            Some(len) => *slot = len,
            None => return false,
        }
    }

    let len = value.len() as i64;
    if len < min_len || len > max_len {
        log::error!(
            "{} length is out of range, minStringLength = {}, maxStringLength = {}",
            value,
            min_len,
            max_len
        );
        return false;
    }
    true
}

/// Value must lie within `[LowerBound, UpperBound]` and sit a whole number of
/// `ScalarIncrement` steps above the lower bound
pub fn validate_integer(value: i64, bounds: &[Bound]) -> bool {
    let mut lower: i64 = 0;
    let mut upper: i64 = 0;
    let mut increment: i64 = 0;

    for bound in bounds {
        let slot = match bound.kind {
            BoundType::LowerBound => &mut lower,
            BoundType::UpperBound => &mut upper,
            BoundType::ScalarIncrement => &mut increment,
            _ => continue,
        };
        match integer_bound(bound) {
            Some(n) => *slot = n,
            None => return false,
        }
    }

    if value < lower || value > upper {
        log::error!("{} is outside [{}, {}]", value, lower, upper);
        return false;
    }

    // i128 keeps the distance exact across the full i64 range
    let distance = (i128::from(value) - i128::from(lower)).abs();
    if increment == 0 || distance % i128::from(increment) != 0 {
        log::error!(
            "({} - {}) is not a multiple of scalar increment {}",
            value,
            lower,
            increment
        );
        return false;
    }
    true
}

/// Check a staged value against the declared type and bounds of its attribute
pub fn validate_pending(
    name: &str,
    declared: AttributeType,
    value: &AttributeValue,
    bounds: &[Bound],
) -> Result<()> {
    let accepted = match (declared, value) {
        (AttributeType::Enumeration, AttributeValue::String(s)) => validate_enumeration(s, bounds),
        (AttributeType::String, AttributeValue::String(s)) => validate_string(s, bounds),
        (AttributeType::Integer, AttributeValue::Integer(n)) => validate_integer(*n, bounds),
        (_, _) => {
            log::error!("{} value shape does not match declared type {:?}", name, declared);
            false
        }
    };

    if accepted {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!("{} rejected by its bounds", name)))
    }
}
