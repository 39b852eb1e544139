//! Time-value-of-money bond pricing.

use crate::core::entry::CouponFrequency;

const SECONDS_PER_YEAR: f64 = 365.0 * 86_400.0;

/// Present value of a bond's remaining cash flows.
///
/// Coupons and the face-value redemption are discounted back to `now`
/// (unix seconds) at the periodic yield. A matured bond collapses to par.
///
/// When less than one coupon period remains, the single final cash flow is
/// discounted with a simple-interest stub `1 / (1 + r * years_remaining)`
/// instead of a compound factor, so a nearly-matured bond is not
/// over-discounted. The stub mixes periodic rate with calendar years and
/// is kept as-is for compatibility with existing stored valuations.
pub fn present_value(
    face_value: f64,
    coupon_rate_pct: f64,
    ytm_pct: f64,
    maturity_date: i64,
    frequency: CouponFrequency,
    now: i64,
) -> f64 {
    if maturity_date <= now {
        return face_value;
    }

    let periods_per_year = frequency.periods_per_year();
    let periodic_coupon = face_value * (coupon_rate_pct / 100.0) / periods_per_year;
    let periodic_ytm = (ytm_pct / 100.0) / periods_per_year;
    let years_to_maturity = (maturity_date - now) as f64 / SECONDS_PER_YEAR;
    let remaining_periods = (years_to_maturity * periods_per_year).ceil() as i64;

    if remaining_periods <= 1 {
        return (periodic_coupon + face_value) / (1.0 + periodic_ytm * years_to_maturity);
    }

    let mut pv = 0.0;
    for t in 1..=remaining_periods {
        let mut cash_flow = periodic_coupon;
        if t == remaining_periods {
            cash_flow += face_value;
        }
        pv += cash_flow / (1.0 + periodic_ytm).powi(t as i32);
    }
    pv
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR_SECS: i64 = 365 * 86_400;

    #[test]
    fn test_matured_bond_returns_face_value() {
        let now = 1_700_000_000;
        let pv = present_value(1000.0, 5.0, 8.0, now, CouponFrequency::Annual, now);
        assert_eq!(pv, 1000.0);

        let pv = present_value(1000.0, 5.0, 8.0, now - 1, CouponFrequency::Annual, now);
        assert_eq!(pv, 1000.0);
    }

    #[test]
    fn test_par_bond_two_whole_years() {
        // Coupon rate == YTM and a whole number of periods: prices at par.
        let now = 1_700_000_000;
        let maturity = now + 2 * YEAR_SECS;
        let pv = present_value(1000.0, 5.0, 5.0, maturity, CouponFrequency::Annual, now);
        assert!((pv - 1000.0).abs() < 1e-6, "expected par, got {pv}");
    }

    #[test]
    fn test_par_bond_semiannual() {
        let now = 1_700_000_000;
        let maturity = now + 3 * YEAR_SECS;
        let pv = present_value(1000.0, 6.0, 6.0, maturity, CouponFrequency::SemiAnnual, now);
        assert!((pv - 1000.0).abs() < 1e-6, "expected par, got {pv}");
    }

    #[test]
    fn test_discount_bond_below_par() {
        // YTM above coupon rate prices below par.
        let now = 1_700_000_000;
        let maturity = now + 2 * YEAR_SECS;
        let pv = present_value(1000.0, 5.0, 8.0, maturity, CouponFrequency::Annual, now);
        assert!(pv < 1000.0);
        // 50/1.08 + 1050/1.08^2 = 946.50...
        assert!((pv - 946.502).abs() < 0.01, "got {pv}");
    }

    #[test]
    fn test_premium_bond_above_par() {
        let now = 1_700_000_000;
        let maturity = now + 2 * YEAR_SECS;
        let pv = present_value(1000.0, 8.0, 5.0, maturity, CouponFrequency::Annual, now);
        assert!(pv > 1000.0);
    }

    #[test]
    fn test_simple_interest_stub_in_final_period() {
        // Half a year to an annual maturity: one period remains, so the
        // final cash flow is discounted with simple interest.
        let now = 1_700_000_000;
        let maturity = now + YEAR_SECS / 2;
        let pv = present_value(1000.0, 5.0, 5.0, maturity, CouponFrequency::Annual, now);
        let years = (maturity - now) as f64 / (365.0 * 86_400.0);
        let expected = 1050.0 / (1.0 + 0.05 * years);
        assert!((pv - expected).abs() < 1e-9, "got {pv}, expected {expected}");
    }

    #[test]
    fn test_zero_coupon_quarterly() {
        let now = 1_700_000_000;
        let maturity = now + YEAR_SECS;
        let pv = present_value(1000.0, 0.0, 4.0, maturity, CouponFrequency::Quarterly, now);
        let expected = 1000.0 / 1.01_f64.powi(4);
        assert!((pv - expected).abs() < 1e-6, "got {pv}, expected {expected}");
    }
}
