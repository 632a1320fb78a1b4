use serde::{Deserialize, Serialize};

/// Economic assumptions used to score a selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinanceParameters {
    /// Electricity price per kWh avoided
    pub electricity_price: f64,
    /// Subtract yearly maintenance from the savings
    pub include_maintenance: bool,
    /// Yearly maintenance as a fraction of the installed cost
    pub maintenance_rate: f64,
    pub lifetime_years: usize,
    pub discount_rate: f64,
    /// Yearly electricity price increase, e.g. 0.02 for 2%
    pub price_escalation: f64,
}

impl Default for FinanceParameters {
    fn default() -> Self {
        Self {
            electricity_price: 0.25,
            include_maintenance: true,
            maintenance_rate: 0.02,
            lifetime_years: 25,
            discount_rate: 0.03,
            price_escalation: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentResult {
    pub initial_investment: f64,
    /// First-year savings after maintenance
    pub net_annual_savings: f64,
    /// Simple ROI in percent, 0 when cost or savings are not positive
    pub roi_percent: f64,
    pub payback_years: Option<f64>,
    pub net_present_value: f64,
}

/// Evaluate an installation that avoids `avoided_import_kwh` of grid import
/// per year.
pub fn evaluate_investment(
    initial_investment: f64,
    avoided_import_kwh: f64,
    params: &FinanceParameters,
) -> InvestmentResult {
    let maintenance = if params.include_maintenance {
        initial_investment * params.maintenance_rate
    } else {
        0.0
    };

    let annual_savings: Vec<f64> = (0..params.lifetime_years)
        .map(|year| {
            let price = params.electricity_price * (1.0 + params.price_escalation).powf(year as f64);
            avoided_import_kwh * price - maintenance
        })
        .collect();
    let net_annual_savings = annual_savings
        .first()
        .copied()
        .unwrap_or(avoided_import_kwh * params.electricity_price - maintenance);

    InvestmentResult {
        initial_investment,
        net_annual_savings,
        roi_percent: simple_roi_percent(initial_investment, net_annual_savings),
        payback_years: payback_period(initial_investment, &annual_savings),
        net_present_value: net_present_value(initial_investment, &annual_savings, params.discount_rate),
    }
}

pub fn simple_roi_percent(initial_investment: f64, net_annual_savings: f64) -> f64 {
    if initial_investment <= 0.0 || net_annual_savings <= 0.0 {
        return 0.0;
    }
    net_annual_savings / initial_investment * 100.0
}

/// Savings in year `i` are discounted by `(1 + rate)^(i + 1)`.
pub fn net_present_value(initial_investment: f64, annual_savings: &[f64], discount_rate: f64) -> f64 {
    annual_savings
        .iter()
        .enumerate()
        .fold(-initial_investment, |npv, (i, savings)| {
            npv + savings / (1.0 + discount_rate).powf(i as f64 + 1.0)
        })
}

/// Years until cumulative savings cover the investment, interpolated within
/// the breakeven year. `None` if it never pays back within the horizon.
pub fn payback_period(initial_investment: f64, annual_savings: &[f64]) -> Option<f64> {
    if initial_investment <= 0.0 {
        return Some(0.0);
    }
    let mut cumulative_savings = 0.0;
    for (i, &savings) in annual_savings.iter().enumerate() {
        let before = cumulative_savings;
        cumulative_savings += savings;
        if cumulative_savings >= initial_investment && savings > 0.0 {
            return Some(i as f64 + (initial_investment - before) / savings);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_roi() {
        assert_eq!(simple_roi_percent(10_000.0, 1_000.0), 10.0);
        assert_eq!(simple_roi_percent(0.0, 1_000.0), 0.0);
        assert_eq!(simple_roi_percent(10_000.0, -5.0), 0.0);
    }

    #[test]
    fn test_payback_interpolates() {
        let savings = vec![400.0; 10];
        assert_eq!(payback_period(1000.0, &savings), Some(2.5));
        assert_eq!(payback_period(1000.0, &[100.0; 5]), None);
    }

    #[test]
    fn test_npv_without_discount_is_sum() {
        let npv = net_present_value(1000.0, &[300.0; 5], 0.0);
        assert!((npv - 500.0).abs() < 1e-9);
        assert!(net_present_value(1000.0, &[300.0; 5], 0.05) < 500.0);
    }

    #[test]
    fn test_evaluate_investment_with_maintenance() {
        let params = FinanceParameters {
            electricity_price: 0.2,
            maintenance_rate: 0.02,
            ..Default::default()
        };
        // 10 000 kWh * 0.2 = 2000, minus 2% of 10 000 = 1800
        let result = evaluate_investment(10_000.0, 10_000.0, &params);
        assert!((result.net_annual_savings - 1800.0).abs() < 1e-9);
        assert!((result.roi_percent - 18.0).abs() < 1e-9);
        let payback = result.payback_years.unwrap();
        assert!((payback - 10_000.0 / 1800.0).abs() < 1e-9);
        assert!(result.net_present_value > 0.0);
    }

    #[test]
    fn test_escalation_raises_npv() {
        let flat = evaluate_investment(5_000.0, 3_000.0, &FinanceParameters::default());
        let rising = evaluate_investment(
            5_000.0,
            3_000.0,
            &FinanceParameters {
                price_escalation: 0.02,
                ..Default::default()
            },
        );
        assert!(rising.net_present_value > flat.net_present_value);
        assert_eq!(rising.roi_percent, flat.roi_percent);
    }
}
