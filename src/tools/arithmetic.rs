//! `add_numbers` and `multiply_numbers`.
//!
//! Integer operands stay exact at any size; anything involving a float is
//! computed in `f64`. Rendering follows the conventional shortest
//! round-trip float form with a trailing `.0` on integral floats, so
//! `2.5 + 0.5` prints as `3.0` while `2 + 1` prints `3`.

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde_json::Value;
use std::fmt;

/// A JSON number, kept as an integer when it is one.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Int(BigInt),
    Float(f64),
}

impl Number {
    /// Read a JSON number from its literal text, so integers beyond 64 bits
    /// keep every digit.
    pub fn from_json(value: &Value) -> Option<Self> {
        let Value::Number(n) = value else {
            return None;
        };
        match n.to_string().parse::<BigInt>() {
            Ok(i) => Some(Self::Int(i)),
            Err(_) => n.as_f64().map(Self::Float),
        }
    }

    fn as_f64(&self) -> f64 {
        match self {
            Self::Int(i) => i.to_f64().unwrap_or(f64::NAN),
            Self::Float(f) => *f,
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Self::Int(a + b),
            (a, b) => Self::Float(a.as_f64() + b.as_f64()),
        }
    }

    pub fn mul(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Self::Int(a * b),
            (a, b) => Self::Float(a.as_f64() * b.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => f.write_str(&format_float(*x)),
        }
    }
}

fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".into();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf".into() } else { "-inf".into() };
    }

    let abs = x.abs();
    if x == 0.0 || (1e-4..1e16).contains(&abs) {
        let plain = x.to_string();
        return if plain.contains('.') {
            plain
        } else {
            format!("{}.0", plain)
        };
    }

    // Scientific form with an explicit sign and at least two exponent digits.
    let sci = format!("{:e}", x);
    match sci.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => sci,
    }
}

/// `"{a} + {b} = {a+b}"`
pub fn add_numbers(a: Number, b: Number) -> String {
    let sum = a.add(&b);
    format!("{} + {} = {}", a, b, sum)
}

/// `"{x} × {y} = {x*y}"`
pub fn multiply_numbers(x: Number, y: Number) -> String {
    let product = x.mul(&y);
    format!("{} × {} = {}", x, y, product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn num(v: Value) -> Number {
        Number::from_json(&v).unwrap()
    }

    #[test]
    fn test_add_integers() {
        assert_eq!(add_numbers(num(json!(1)), num(json!(2))), "1 + 2 = 3");
        assert_eq!(add_numbers(num(json!(-5)), num(json!(3))), "-5 + 3 = -2");
        assert_eq!(add_numbers(num(json!(0)), num(json!(0))), "0 + 0 = 0");
    }

    #[test]
    fn test_add_is_exact_beyond_i64() {
        let max = num(json!(i64::MAX));
        assert_eq!(
            add_numbers(max, num(json!(1))),
            "9223372036854775807 + 1 = 9223372036854775808"
        );
        let big = num(json!(u64::MAX));
        assert_eq!(
            add_numbers(big.clone(), big),
            "18446744073709551615 + 18446744073709551615 = 36893488147419103230"
        );
    }

    #[test]
    fn test_add_floats() {
        assert_eq!(add_numbers(num(json!(2.5)), num(json!(0.5))), "2.5 + 0.5 = 3.0");
        assert_eq!(add_numbers(num(json!(1)), num(json!(2.5))), "1 + 2.5 = 3.5");
        assert_eq!(
            add_numbers(num(json!(0.1)), num(json!(0.2))),
            "0.1 + 0.2 = 0.30000000000000004"
        );
    }

    #[test]
    fn test_multiply() {
        assert_eq!(multiply_numbers(num(json!(3)), num(json!(4))), "3 × 4 = 12");
        assert_eq!(multiply_numbers(num(json!(-2)), num(json!(7))), "-2 × 7 = -14");
        assert_eq!(multiply_numbers(num(json!(1.5)), num(json!(2))), "1.5 × 2 = 3.0");
    }

    #[test]
    fn test_add_is_exact_beyond_u64() {
        let a: Value = serde_json::from_str("100000000000000000000").unwrap();
        assert_eq!(
            add_numbers(num(a), num(json!(1))),
            "100000000000000000000 + 1 = 100000000000000000001"
        );
    }

    #[test]
    fn test_multiply_is_exact_beyond_u64() {
        let big = num(json!(u64::MAX));
        assert_eq!(
            multiply_numbers(big.clone(), big),
            "18446744073709551615 × 18446744073709551615 = \
             340282366920938463426481119284349108225"
        );
    }

    #[test]
    fn test_exponent_literal_is_a_float() {
        let x: Value = serde_json::from_str("1e3").unwrap();
        assert_eq!(num(x), Number::Float(1000.0));
    }

    #[test]
    fn test_float_rendering() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(-0.0), "-0.0");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(0.00001), "1e-05");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1.5e300), "1.5e+300");
        assert_eq!(format_float(f64::INFINITY), "inf");
    }

    #[test]
    fn test_from_json_rejects_non_numbers() {
        assert!(Number::from_json(&json!("1")).is_none());
        assert!(Number::from_json(&json!(null)).is_none());
    }
}
