//! Small descriptive statistics over `Decimal` samples.
//!
//! Every operation is checked: a result outside the `Decimal` range yields
//! `None` instead of a panic.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Sum of the values, `None` on overflow.
pub fn checked_sum(values: &[Decimal]) -> Option<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
}

/// Arithmetic mean, `None` for an empty sample or on overflow.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    checked_sum(values)?.checked_div(Decimal::from(values.len()))
}

/// Sample standard deviation (n - 1 denominator), `None` below two values or on overflow.
pub fn sample_std_dev(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let squared_sum = values.iter().try_fold(Decimal::ZERO, |acc, v| {
        let deviation = v.checked_sub(mean)?;
        acc.checked_add(deviation.checked_mul(deviation)?)
    })?;
    let variance = squared_sum.checked_div(Decimal::from(values.len() - 1))?;

    variance.sqrt()
}
