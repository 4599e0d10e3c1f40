//! Value normalizer (§4.1): maps any [`ToonValue`] onto the JSON data model
//! the wire grammar actually carries — object, array, string, number,
//! boolean, null. The two encode-only variants noted in §3 (`BigInt`,
//! `Date`) are substituted away here; `decode` never reconstructs them, it
//! always yields their string form.

use crate::value::Number;
use crate::ToonMap;
use crate::ToonValue;
use num_bigint::BigInt;

/// The largest (and smallest) integer magnitude a `f64` can represent exactly.
const SAFE_INTEGER_LIMIT: i64 = 9_007_199_254_740_991; // 2^53 - 1

/// Normalizes `value` per §4.1. Pure and total: every input produces some JSON-domain value.
#[must_use]
pub fn normalize(value: &ToonValue) -> ToonValue {
    match value {
        ToonValue::Null => ToonValue::Null,
        ToonValue::Bool(b) => ToonValue::Bool(*b),
        ToonValue::Number(n) => normalize_number(n),
        ToonValue::String(s) => ToonValue::String(s.clone()),
        ToonValue::Array(arr) => ToonValue::Array(arr.iter().map(normalize).collect()),
        ToonValue::Object(obj) => {
            let mut out = ToonMap::new();
            for (k, v) in obj.iter() {
                out.insert(k.clone(), normalize(v));
            }
            ToonValue::Object(out)
        }
        ToonValue::Table { headers, rows } => {
            let mut normalized_rows = Vec::with_capacity(rows.len());
            for row in rows {
                normalized_rows.push(row.iter().map(normalize).collect());
            }
            ToonValue::Table {
                headers: headers.clone(),
                rows: normalized_rows,
            }
        }
        ToonValue::Date(dt) => {
            ToonValue::String(dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
        }
        ToonValue::BigInt(bi) => normalize_bigint(bi),
    }
}

fn normalize_number(n: &Number) -> ToonValue {
    match n {
        Number::Integer(i) => ToonValue::Number(Number::Integer(*i)),
        Number::Float(f) => {
            if f.is_finite() {
                ToonValue::Number(Number::Float(if *f == 0.0 { 0.0 } else { *f }))
            } else {
                ToonValue::Null
            }
        }
        Number::Infinity | Number::NegativeInfinity | Number::NaN => ToonValue::Null,
    }
}

fn normalize_bigint(bi: &BigInt) -> ToonValue {
    let limit = BigInt::from(SAFE_INTEGER_LIMIT);
    let neg_limit = BigInt::from(-SAFE_INTEGER_LIMIT);
    if *bi >= neg_limit && *bi <= limit {
        // Safe to downcast: bounded by SAFE_INTEGER_LIMIT which fits in i64.
        let as_i64: i64 = bi.to_string().parse().expect("bounded bigint fits in i64");
        ToonValue::Number(Number::Integer(as_i64))
    } else {
        ToonValue::String(bi.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_and_infinities_become_null() {
        assert_eq!(normalize(&ToonValue::Number(Number::NaN)), ToonValue::Null);
        assert_eq!(
            normalize(&ToonValue::Number(Number::Infinity)),
            ToonValue::Null
        );
        assert_eq!(
            normalize(&ToonValue::Number(Number::NegativeInfinity)),
            ToonValue::Null
        );
    }

    #[test]
    fn small_bigint_becomes_number() {
        let bi = BigInt::from(42);
        assert_eq!(
            normalize(&ToonValue::BigInt(bi)),
            ToonValue::Number(Number::Integer(42))
        );
    }

    #[test]
    fn huge_bigint_becomes_string() {
        let bi: BigInt = "123456789012345678901234567890".parse().unwrap();
        assert_eq!(
            normalize(&ToonValue::BigInt(bi)),
            ToonValue::String("123456789012345678901234567890".to_string())
        );
    }

    #[test]
    fn date_normalizes_to_millisecond_precision_utc_with_z_suffix() {
        use chrono::{DateTime, Utc};
        let dt: DateTime<Utc> = "2024-01-02T03:04:05.6789Z".parse().unwrap();
        assert_eq!(
            normalize(&ToonValue::Date(dt)),
            ToonValue::String("2024-01-02T03:04:05.678Z".to_string())
        );
    }
}
