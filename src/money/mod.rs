use std::fmt;

use nom::character::complete::{char, digit1, one_of, space0};
use nom::combinator::{all_consuming, opt};
use nom::IResult;
use nom::multi::many0;
use nom::sequence::{preceded, tuple};
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::common::InputError;

const CENTS_PER_UNIT: i64 = 100;

/// Largest amount a single entry may hold, in whole units
const MAX_UNITS: i64 = 1_000_000_000_000;

/// Money amount in minor units (cents). Stored as INTEGER in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub(crate) struct Amount(i64);

impl Amount {
    pub(crate) const ZERO: Amount = Amount(0);

    #[cfg(test)]
    pub(crate) fn from_cents(cents: i64) -> Amount {
        Amount(cents)
    }

    #[cfg(test)]
    pub(crate) fn from_units(units: i64) -> Amount {
        Amount(units * CENTS_PER_UNIT)
    }

    pub(crate) fn cents(self) -> i64 {
        self.0
    }

    pub(crate) fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub(crate) fn as_f64(self) -> f64 {
        self.0 as f64 / CENTS_PER_UNIT as f64
    }

    /// Whole currency units, rounded half away from zero.
    pub(crate) fn rounded_units(self) -> i64 {
        let half = CENTS_PER_UNIT / 2;
        if self.0 >= 0 {
            self.0.saturating_add(half) / CENTS_PER_UNIT
        } else {
            self.0.saturating_sub(half) / CENTS_PER_UNIT
        }
    }

    /// Parse an amount typed by a user, e.g. `1500`, `12.50`, `12,5` or `1 000 000`.
    /// More than two fractional digits are rounded to the nearest cent.
    pub(crate) fn parse(text: &str) -> Result<Amount, InputError> {
        let invalid = || InputError::InvalidAmount(text.trim().to_string());

        let (_, (negative, integer, fraction)) = amount_literal(text.trim()).map_err(|_| invalid())?;

        let units: i64 = integer.parse().map_err(|_| invalid())?;
        let mut cents = units.checked_mul(CENTS_PER_UNIT).ok_or_else(invalid)?;
        if let Some(fraction) = fraction {
            cents = cents.checked_add(fraction_cents(fraction)).ok_or_else(invalid)?;
        }

        if negative || cents == 0 {
            return Err(InputError::NonPositiveAmount);
        }
        if cents > MAX_UNITS * CENTS_PER_UNIT {
            return Err(invalid());
        }
        Ok(Amount(cents))
    }

    pub(crate) fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub(crate) fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Total of all amounts, `None` if it does not fit
    pub(crate) fn checked_sum<'a>(amounts: impl IntoIterator<Item = &'a Amount>) -> Option<Amount> {
        amounts.into_iter().try_fold(Amount::ZERO, |total, amount| total.checked_add(*amount))
    }
}

/// `-`? digits (separator digits)* ([.,] digits)?
fn amount_literal(input: &str) -> IResult<&str, (bool, String, Option<&str>)> {
    let (input, (minus, _, integer, fraction)) = all_consuming(tuple((
        opt(char('-')),
        space0,
        integer_part,
        opt(preceded(one_of(".,"), digit1)),
    )))(input)?;
    Ok((input, (minus.is_some(), integer, fraction)))
}

/// Digits, optionally grouped by single spaces or underscores
fn integer_part(input: &str) -> IResult<&str, String> {
    let (input, first) = digit1(input)?;
    let (input, groups) = many0(preceded(opt(one_of(" _\u{a0}")), digit1))(input)?;

    let mut digits = first.to_string();
    for group in groups {
        digits.push_str(group);
    }
    Ok((input, digits))
}

/// Convert fractional digits to cents, rounding on the third digit
fn fraction_cents(fraction: &str) -> i64 {
    let digits: Vec<i64> = fraction.chars().filter_map(|c| c.to_digit(10)).map(i64::from).collect();
    let tenths = digits.first().copied().unwrap_or(0);
    let hundredths = digits.get(1).copied().unwrap_or(0);
    let round_up = digits.get(2).map_or(0, |d| if *d >= 5 { 1 } else { 0 });
    tenths * 10 + hundredths + round_up
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / CENTS_PER_UNIT as u64;
        let cents = abs % CENTS_PER_UNIT as u64;
        if cents == 0 {
            write!(f, "{sign}{units}")
        } else {
            write!(f, "{sign}{units}.{cents:02}")
        }
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Amount)
    }
}
