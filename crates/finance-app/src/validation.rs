// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    InvalidAmount,
    NonFiniteAmount,
    NegativeRowId,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAmount => f.write_str("invalid amount; use a signed decimal like -12.50"),
            Self::NonFiniteAmount => f.write_str("amount must be a finite number"),
            Self::NegativeRowId => f.write_str("row id must not be negative"),
        }
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Parses an amount typed into the ledger grid. Blank input is the placeholder `0.0`.
pub fn parse_amount(input: &str) -> ValidationResult<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let unsigned = unsigned.strip_prefix('$').unwrap_or(unsigned);
    if unsigned.is_empty() || unsigned.starts_with(['-', '+']) {
        return Err(ValidationError::InvalidAmount);
    }

    let digits: String = unsigned.chars().filter(|ch| *ch != ',').collect();
    if !digits
        .chars()
        .all(|ch| ch.is_ascii_digit() || ch == '.' || ch == 'e' || ch == 'E' || ch == '-')
    {
        return Err(ValidationError::InvalidAmount);
    }

    let value = digits
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidAmount)?;
    check_amount(if negative { -value } else { value })
}

pub fn check_amount(value: f64) -> ValidationResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NonFiniteAmount)
    }
}

pub fn check_row_id(value: i64) -> ValidationResult<i64> {
    if value < 0 {
        return Err(ValidationError::NegativeRowId);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{ValidationError, check_amount, check_row_id, parse_amount};
    use std::collections::BTreeMap;

    #[test]
    fn parse_amount_test() {
        let cases = BTreeMap::from([
            ("1.5", 1.5),
            ("-42", -42.0),
            ("+7.25", 7.25),
            ("$1,234.56", 1234.56),
            ("-$5.00", -5.0),
            ("  3 ", 3.0),
            (".75", 0.75),
        ]);
        for (input, expected) in cases {
            let got = parse_amount(input).expect("amount should parse");
            assert_eq!(got, expected, "input {input}");
        }
    }

    #[test]
    fn blank_amount_is_zero() {
        assert_eq!(parse_amount(""), Ok(0.0));
        assert_eq!(parse_amount("   "), Ok(0.0));
    }

    #[test]
    fn parse_amount_invalid() {
        for input in ["abc", "1.2.3", "--5", "$", "-", "12 eur", "inf", "NaN"] {
            assert_eq!(
                parse_amount(input),
                Err(ValidationError::InvalidAmount),
                "input {input}"
            );
        }
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        assert_eq!(check_amount(f64::NAN), Err(ValidationError::NonFiniteAmount));
        assert_eq!(
            check_amount(f64::INFINITY),
            Err(ValidationError::NonFiniteAmount)
        );
        assert_eq!(parse_amount("1e400"), Err(ValidationError::NonFiniteAmount));
    }

    #[test]
    fn row_ids_must_be_non_negative() {
        assert_eq!(check_row_id(0), Ok(0));
        assert_eq!(check_row_id(-1), Err(ValidationError::NegativeRowId));
    }
}
