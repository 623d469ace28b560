//! Derived money figures shown on the financial screens.
//!
//! Every function here is pure. Callers pass the count bucket from the
//! current session and the pack cost read from the store at screen-entry
//! time; nothing is cached.

use crate::preference::PackCost;
use serde::{Deserialize, Serialize};

/// Cigarettes in a pack.
pub const UNITS_PER_PACK: f64 = 20.0;

/// Days used for monthly projections.
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Count buckets offered on the "how many" screen, in display order.
pub const COUNT_BUCKETS: [&str; 4] = ["1", "2–3", "4–5", "More than 5"];

/// Representative cigarette count for a bucket label.
///
/// Unknown labels count as one.
///
/// # Example
///
/// ```rust
/// use checkin_flow::calculator::cigarette_estimate;
///
/// assert_eq!(cigarette_estimate("2–3"), 2.5);
/// assert_eq!(cigarette_estimate("a few"), 1.0);
/// ```
pub fn cigarette_estimate(bucket: &str) -> f64 {
    match bucket {
        "1" => 1.0,
        "2–3" => 2.5,
        "4–5" => 4.5,
        "More than 5" => 7.0,
        _ => 1.0,
    }
}

/// Cost of a single unit, or zero when no positive pack cost is known.
pub fn cost_per_unit(pack_cost: Option<f64>, units_per_pack: f64) -> f64 {
    match pack_cost {
        Some(cost) if cost > 0.0 && units_per_pack > 0.0 => cost / units_per_pack,
        _ => 0.0,
    }
}

/// Estimated spend today for a count bucket, in whole currency units.
pub fn today_cost(bucket: &str, pack_cost: Option<f64>) -> u64 {
    round_half_up(cigarette_estimate(bucket) * cost_per_unit(pack_cost, UNITS_PER_PACK))
}

/// Thirty-day projection of a daily amount.
pub fn monthly_projection(daily_amount: f64) -> u64 {
    round_half_up(daily_amount * DAYS_PER_MONTH)
}

/// Money kept by not smoking today, modelled as half a pack.
pub fn daily_savings(pack_cost: Option<f64>) -> u64 {
    round_half_up(cost_per_unit(pack_cost, UNITS_PER_PACK) * (UNITS_PER_PACK / 2.0))
}

/// Round to the nearest integer, halves up. Negative and non-finite inputs
/// clamp to zero.
pub fn round_half_up(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.round() as u64
}

/// Figures computed when a screen with a derived display is entered.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DerivedFigures {
    Spend {
        cost_per_unit: f64,
        today_cost: u64,
        monthly_projection: u64,
    },
    Savings {
        daily_savings: u64,
        monthly_savings: u64,
    },
}

impl DerivedFigures {
    /// Spend figures for a count bucket at the given pack cost.
    pub fn spend(bucket: &str, pack_cost: Option<PackCost>) -> Self {
        let pack_cost = pack_cost.map(PackCost::value);
        let today = today_cost(bucket, pack_cost);
        Self::Spend {
            cost_per_unit: cost_per_unit(pack_cost, UNITS_PER_PACK),
            today_cost: today,
            monthly_projection: monthly_projection(today as f64),
        }
    }

    /// Savings figures at the given pack cost.
    pub fn savings(pack_cost: Option<PackCost>) -> Self {
        let daily = daily_savings(pack_cost.map(PackCost::value));
        Self::Savings {
            daily_savings: daily,
            monthly_savings: monthly_projection(daily as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_table_is_fixed() {
        let expected = [1.0, 2.5, 4.5, 7.0];
        for (bucket, value) in COUNT_BUCKETS.iter().zip(expected) {
            assert_eq!(cigarette_estimate(bucket), value);
        }
    }

    #[test]
    fn unknown_bucket_defaults_to_one() {
        assert_eq!(cigarette_estimate(""), 1.0);
        assert_eq!(cigarette_estimate("2-3"), 1.0);
    }

    #[test]
    fn cost_per_unit_is_zero_without_positive_cost() {
        assert_eq!(cost_per_unit(None, UNITS_PER_PACK), 0.0);
        assert_eq!(cost_per_unit(Some(0.0), UNITS_PER_PACK), 0.0);
        assert_eq!(cost_per_unit(Some(-40.0), UNITS_PER_PACK), 0.0);
        assert_eq!(cost_per_unit(Some(200.0), UNITS_PER_PACK), 10.0);
    }

    #[test]
    fn today_cost_for_two_to_three() {
        assert_eq!(today_cost("2–3", Some(200.0)), 25);
        assert_eq!(monthly_projection(25.0), 750);
    }

    #[test]
    fn daily_savings_is_half_a_pack() {
        assert_eq!(daily_savings(Some(200.0)), 100);
        assert_eq!(monthly_projection(100.0), 3000);
        assert_eq!(daily_savings(None), 0);
    }

    #[test]
    fn rounding_goes_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(0.5), 1);
        assert_eq!(round_half_up(-3.0), 0);
        assert_eq!(round_half_up(f64::NAN), 0);
        assert_eq!(round_half_up(0.49999999999999994), 0);
        assert_eq!(round_half_up(4503599627370497.0), 4503599627370497);
    }

    #[test]
    fn today_cost_rounds_fractional_spend() {
        // 4.5 cigarettes at 0.9 each = 4.05
        assert_eq!(today_cost("4–5", Some(18.0)), 4);
        // 2.5 cigarettes at 0.5 each = 1.25
        assert_eq!(today_cost("2–3", Some(10.0)), 1);
        // 7 cigarettes at 0.25 each = 1.75
        assert_eq!(today_cost("More than 5", Some(5.0)), 2);
    }

    #[test]
    fn derived_spend_combines_figures() {
        let cost = PackCost::new(200.0).ok();
        assert_eq!(
            DerivedFigures::spend("2–3", cost),
            DerivedFigures::Spend {
                cost_per_unit: 10.0,
                today_cost: 25,
                monthly_projection: 750,
            }
        );
    }

    #[test]
    fn derived_savings_combines_figures() {
        let cost = PackCost::new(200.0).ok();
        assert_eq!(
            DerivedFigures::savings(cost),
            DerivedFigures::Savings {
                daily_savings: 100,
                monthly_savings: 3000,
            }
        );
    }
}
