pub mod demand;
pub mod finance;

pub use demand::{ElectricityDemand, MonthlyDemand};
pub use finance::{FinanceParameters, InvestmentResult, evaluate_investment};
