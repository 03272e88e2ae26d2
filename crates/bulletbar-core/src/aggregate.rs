use crate::record::{Record, total_counts};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A percent-scaled slice of the bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub counts: f64,
    /// Running total over the chosen category, taken before zero-count rows are dropped.
    pub cumulative: f64,
    pub bed_type: String,
    pub status: String,
    pub percent: f64,
}

/// Aggregated view of one update, as consumed by layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    /// The first-encountered category, `None` for empty input.
    pub category: Option<String>,
    /// Sum over every record, all categories.
    pub total: f64,
    /// Sum over the segments, used as the legend title count.
    pub category_total: f64,
    pub segments: Vec<Segment>,
}

/// Rounds to two decimals the way JS `Number#toFixed(2)` does, then reads the result back.
///
/// The decision is made on the exact binary value of `v`, not on `v * 100`, so
/// `0.08499999999999999` rounds down to `0.08`. Exact ties go to the larger magnitude.
pub fn round_percent(v: f64) -> f64 {
    // `toFixed` falls back to plain `toString` from 1e21 up.
    if !v.is_finite() || v.abs() >= 1e21 {
        return v;
    }
    let hundredths = fixed_hundredths(v.abs());
    let sign = if v < 0.0 { "-" } else { "" };
    format!("{sign}{}.{:02}", hundredths / 100, hundredths % 100)
        .parse()
        .unwrap_or(v)
}

/// `round(v * 100)` computed exactly from the mantissa and exponent of a non-negative `v`.
fn fixed_hundredths(v: f64) -> u128 {
    let bits = v.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };

    let scaled = u128::from(mantissa) * 100;
    if exponent >= 0 {
        // Integral already; below 1e21 this stays well inside u128.
        return scaled << exponent;
    }
    let shift = exponent.unsigned_abs();
    // `scaled < 2^60`, so anything shifted further is below one half.
    if shift > 61 {
        return 0;
    }
    let quotient = scaled >> shift;
    let remainder = scaled & ((1u128 << shift) - 1);
    if remainder >= 1u128 << (shift - 1) {
        quotient + 1
    } else {
        quotient
    }
}

/// Adds an equal share of the shortfall to every segment when the percents sum below 100.
///
/// The share is flat, not proportional to segment size. Sums at or above 100 are left as-is.
pub fn rebalance(segments: &mut [Segment]) {
    if segments.is_empty() {
        return;
    }
    let sum: f64 = segments.iter().map(|s| s.percent).sum();
    if sum < 100.0 {
        let per_item = (100.0 - sum) / segments.len() as f64;
        for s in segments.iter_mut() {
            s.percent += per_item;
        }
    }
}

/// Builds the normalized segment list for the first category in `records`.
///
/// `total` is the sum of `counts` over all records (every category), see [`total_counts`].
pub fn aggregate(records: &[Record], total: f64) -> Result<Vec<Segment>> {
    // The first record's category is, by definition, the first distinct category.
    let Some(category) = records.first().map(|r| r.bed_type.as_str()) else {
        return Ok(Vec::new());
    };
    if !total.is_finite() || total <= 0.0 {
        return Err(Error::invalid_input(format!(
            "total counts must be a positive finite number, got {total}"
        )));
    }
    for r in records {
        r.validate()?;
    }

    let mut cumulative = 0.0;
    let mut segments: Vec<Segment> = records
        .iter()
        .filter(|r| r.bed_type == category)
        .map(|r| {
            cumulative += r.counts;
            Segment {
                counts: r.counts,
                cumulative,
                bed_type: r.bed_type.clone(),
                status: r.status.clone(),
                percent: round_percent(r.counts / total * 100.0),
            }
        })
        .filter(|s| s.counts > 0.0)
        .collect();

    rebalance(&mut segments);

    tracing::debug!(
        category,
        total,
        segments = segments.len(),
        "aggregated bullet segments"
    );
    Ok(segments)
}

/// Computes the total, aggregates, and collects the legend title count in one pass.
pub fn summarize(records: &[Record]) -> Result<Aggregation> {
    let total = total_counts(records);
    let segments = aggregate(records, total)?;
    let category_total = segments.iter().map(|s| s.counts).sum();
    Ok(Aggregation {
        category: records.first().map(|r| r.bed_type.clone()),
        total,
        category_total,
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn ward() -> Vec<Record> {
        vec![
            Record::new("A", "Occupied", 30.0),
            Record::new("A", "Free", 70.0),
            Record::new("B", "X", 50.0),
        ]
    }

    #[test]
    fn rebalances_the_first_category_only() {
        let records = ward();
        let segments = aggregate(&records, 150.0).unwrap();

        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| s.bed_type == "A"));
        assert!(approx(segments[0].percent, 36.665), "{}", segments[0].percent);
        assert!(approx(segments[1].percent, 63.335), "{}", segments[1].percent);
        assert!(approx(segments.iter().map(|s| s.percent).sum(), 100.0));
        assert_eq!(segments[0].cumulative, 30.0);
        assert_eq!(segments[1].cumulative, 100.0);
    }

    #[test]
    fn single_record_fills_the_bar() {
        let records = vec![Record::new("ICU", "Occupied", 12.0)];
        let segments = aggregate(&records, 12.0).unwrap();
        assert_eq!(segments.len(), 1);
        assert!(approx(segments[0].percent, 100.0));
    }

    #[test]
    fn empty_input_is_not_an_error() {
        assert!(aggregate(&[], 0.0).unwrap().is_empty());
    }

    #[test]
    fn zero_total_is_invalid_input() {
        let records = vec![Record::new("A", "x", 0.0), Record::new("A", "y", 0.0)];
        let err = aggregate(&records, 0.0).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
        assert!(aggregate(&records, f64::NAN).is_err());
    }

    #[test]
    fn zero_rows_are_dropped_after_cumulative() {
        let records = vec![
            Record::new("A", "x", 5.0),
            Record::new("A", "y", 0.0),
            Record::new("A", "z", 3.0),
        ];
        let segments = aggregate(&records, 8.0).unwrap();
        let statuses: Vec<&str> = segments.iter().map(|s| s.status.as_str()).collect();
        assert_eq!(statuses, vec!["x", "z"]);
        assert_eq!(segments[1].cumulative, 8.0);
    }

    #[test]
    fn rejects_records_that_bypassed_validation() {
        let records = vec![Record::new("A", "x", 1.0), Record::new("A", "y", -4.0)];
        assert!(aggregate(&records, 1.0).is_err());
    }

    #[test]
    fn overage_is_left_untouched() {
        let seg = |percent| Segment {
            counts: 1.0,
            cumulative: 1.0,
            bed_type: "A".to_string(),
            status: "x".to_string(),
            percent,
        };
        let mut segments = vec![seg(50.01), seg(50.0)];
        rebalance(&mut segments);
        assert_eq!(segments[0].percent, 50.01);
        assert_eq!(segments[1].percent, 50.0);
    }

    #[test]
    fn rounding_is_two_decimals() {
        assert_eq!(round_percent(46.666_666), 46.67);
        assert_eq!(round_percent(20.0), 20.0);
        assert_eq!(round_percent(0.004), 0.0);
        assert_eq!(round_percent(100.0), 100.0);
    }

    #[test]
    fn rounding_uses_the_exact_stored_value() {
        // 0.85 / 1000 * 100 is stored as 0.08499999999999999.
        assert_eq!(round_percent(0.85 / 1000.0 * 100.0), 0.08);
        // 0.015 is stored slightly below the tie.
        assert_eq!(round_percent(0.15 / 1000.0 * 100.0), 0.01);
        assert_eq!(round_percent(1.005), 1.0);
    }

    #[test]
    fn exact_ties_round_to_the_larger_magnitude() {
        assert_eq!(round_percent(0.125), 0.13);
        assert_eq!(round_percent(12.375), 12.38);
        assert_eq!(round_percent(-0.125), -0.13);
    }

    #[test]
    fn fractional_counts_follow_fixed_point_rounding() {
        let records = vec![Record::new("A", "x", 0.85), Record::new("A", "y", 500.0)];
        let segments = aggregate(&records, 1000.0).unwrap();
        // Raw 0.08 and 50, shortfall 49.92 split evenly.
        assert!(approx(segments[0].percent, 25.04), "{}", segments[0].percent);
        assert!(approx(segments[1].percent, 74.96), "{}", segments[1].percent);
    }

    #[test]
    fn summary_reports_category_total() {
        let summary = summarize(&ward()).unwrap();
        assert_eq!(summary.category.as_deref(), Some("A"));
        assert_eq!(summary.total, 150.0);
        assert_eq!(summary.category_total, 100.0);
    }
}
