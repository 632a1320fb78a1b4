use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Hours per month in a non-leap year.
const HOURS_PER_MONTH: [u32; 12] = [744, 672, 744, 720, 744, 720, 744, 744, 720, 744, 720, 744];

/// Represents monthly energy demand in kWh
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthlyDemand {
    pub january: f64,
    pub february: f64,
    pub march: f64,
    pub april: f64,
    pub may: f64,
    pub june: f64,
    pub july: f64,
    pub august: f64,
    pub september: f64,
    pub october: f64,
    pub november: f64,
    pub december: f64,
}

impl MonthlyDemand {
    pub fn from_months(values: [f64; 12]) -> Self {
        let [january, february, march, april, may, june, july, august, september, october, november, december] =
            values;
        MonthlyDemand {
            january,
            february,
            march,
            april,
            may,
            june,
            july,
            august,
            september,
            october,
            november,
            december,
        }
    }

    /// Spread an annual total over the months in proportion to their hours.
    pub fn flat(annual_kwh: f64) -> Self {
        let months = HOURS_PER_MONTH.map(|hours| annual_kwh * f64::from(hours) / 8760.0);
        Self::from_months(months)
    }

    pub fn months(&self) -> [f64; 12] {
        [
            self.january,
            self.february,
            self.march,
            self.april,
            self.may,
            self.june,
            self.july,
            self.august,
            self.september,
            self.october,
            self.november,
            self.december,
        ]
    }

    pub fn annual_total(&self) -> f64 {
        self.months().iter().sum()
    }
}

/// Building electricity demand, either as one annual figure or per month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectricityDemand {
    Annual(f64),
    Monthly(MonthlyDemand),
}

impl ElectricityDemand {
    pub fn annual_kwh(&self) -> f64 {
        match self {
            ElectricityDemand::Annual(total) => *total,
            ElectricityDemand::Monthly(monthly) => monthly.annual_total(),
        }
    }

    pub fn monthly(&self) -> MonthlyDemand {
        match self {
            ElectricityDemand::Annual(total) => MonthlyDemand::flat(*total),
            ElectricityDemand::Monthly(monthly) => monthly.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let months = self.monthly().months();
        if months.iter().any(|value| !value.is_finite() || *value < 0.0) {
            return Err(Error::InvalidConfiguration(
                "electricity demand must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
