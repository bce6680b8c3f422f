//! Summary of a halving result.

use std::fmt;

/// Totals of the two halves. `second_half` is derived, so the two always add
/// up to `total`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Split {
    pub total: f64,
    pub first_half: f64,
}

impl Split {
    #[inline]
    pub fn new(total: f64, first_half: f64) -> Self {
        Self { total, first_half }
    }

    #[inline]
    pub fn second_half(&self) -> f64 {
        self.total - self.first_half
    }

    /// Fraction of the total in the first half (NaN when `total == 0`).
    #[inline]
    pub fn first_share(&self) -> f64 {
        self.first_half / self.total
    }

    #[inline]
    pub fn second_share(&self) -> f64 {
        self.second_half() / self.total
    }

    /// Absolute distance of the first half from the exact midpoint.
    #[inline]
    pub fn deviation(&self) -> f64 {
        (self.first_half - self.total / 2.0).abs()
    }
}

/// One line: both halves with thousands separators and percentage of total.
impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "There is {} in total, and {} ({}) in first half, {} ({}) in second half",
            group_thousands(self.total),
            group_thousands(self.first_half),
            percent(self.first_share()),
            group_thousands(self.second_half()),
            percent(self.second_share()),
        )
    }
}

/// Two decimals, right-aligned to five characters including the `%`.
fn percent(share: f64) -> String {
    format!("{:>5}", format!("{:.2}%", share * 100.0))
}

/// Decimal rendering with `,` between groups of three integer digits.
/// Integral values (below 2^53) print without a fractional part.
pub fn group_thousands(x: f64) -> String {
    if !x.is_finite() {
        return x.to_string();
    }
    let raw = if x.fract() == 0.0 && x.abs() < 9_007_199_254_740_992.0 {
        format!("{}", x as i64)
    } else {
        format!("{x}")
    };
    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, fr)) => (i, Some(fr)),
        None => (unsigned, None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (k, ch) in int_part.chars().enumerate() {
        if k > 0 && (int_part.len() - k) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match frac_part {
        Some(fr) => format!("{sign}{grouped}.{fr}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1000.0), "1,000");
        assert_eq!(group_thousands(1234567.0), "1,234,567");
        assert_eq!(group_thousands(-1234567.0), "-1,234,567");
        assert_eq!(group_thousands(12345.5), "12,345.5");
        assert_eq!(group_thousands(0.25), "0.25");
    }

    #[test]
    fn halves_add_up() {
        let s = Split::new(30.0, 10.0);
        assert_eq!(s.second_half(), 20.0);
        assert!((s.first_share() + s.second_share() - 1.0).abs() < 1e-12);
        assert_eq!(s.deviation(), 5.0);
    }

    #[test]
    fn summary_line() {
        let s = Split::new(30.0, 10.0);
        assert_eq!(
            s.to_string(),
            "There is 30 in total, and 10 (33.33%) in first half, 20 (66.67%) in second half"
        );
        let big = Split::new(4_000_000.0, 1_998_000.0);
        assert_eq!(
            big.to_string(),
            "There is 4,000,000 in total, and 1,998,000 (49.95%) in first half, 2,002,000 (50.05%) in second half"
        );
    }

    #[test]
    fn summary_line_small_shares_are_not_padded() {
        assert_eq!(
            Split::new(20.0, 1.0).to_string(),
            "There is 20 in total, and 1 (5.00%) in first half, 19 (95.00%) in second half"
        );
        // A lone region always ends up in the second half.
        assert_eq!(
            Split::new(8.0, 0.0).to_string(),
            "There is 8 in total, and 0 (0.00%) in first half, 8 (100.00%) in second half"
        );
        assert_eq!(percent(0.001), "0.10%");
    }
}
