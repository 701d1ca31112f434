//! Portfolio allocation by asset class, valued at cost basis

use std::collections::BTreeMap;

use serde::Serialize;

use super::{round_to, AnalyticsError};
use crate::models::{AssetClass, Investment};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetAllocation {
    pub asset_class: AssetClass,
    pub value: f64,
    /// 2 decimals
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioAllocation {
    pub total_value: f64,
    /// Largest share first
    pub allocation: Vec<AssetAllocation>,
}

pub fn portfolio_allocation(
    investments: &[Investment],
) -> Result<PortfolioAllocation, AnalyticsError> {
    if investments.is_empty() {
        return Err(AnalyticsError::NoData(
            "No investments found in portfolio.".to_string(),
        ));
    }

    let mut by_class: BTreeMap<AssetClass, f64> = BTreeMap::new();
    for investment in investments {
        *by_class.entry(investment.asset_class).or_insert(0.0) +=
            investment.quantity * investment.purchase_price;
    }
    let total_value: f64 = by_class.values().sum();

    let mut allocation: Vec<AssetAllocation> = by_class
        .into_iter()
        .map(|(asset_class, value)| AssetAllocation {
            asset_class,
            value,
            percentage: if total_value > 0.0 {
                round_to(value / total_value * 100.0, 2)
            } else {
                0.0
            },
        })
        .collect();
    allocation.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

    Ok(PortfolioAllocation {
        total_value,
        allocation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn holding(symbol: &str, asset_class: AssetClass, quantity: f64, price: f64) -> Investment {
        Investment {
            id: 0,
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            asset_class,
            quantity,
            purchase_price: price,
            purchase_date: NaiveDate::from_ymd_opt(2023, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            account: None,
            notes: None,
        }
    }

    #[test]
    fn test_empty_portfolio() {
        assert!(matches!(
            portfolio_allocation(&[]),
            Err(AnalyticsError::NoData(_))
        ));
    }

    #[test]
    fn test_grouped_and_sorted() {
        let investments = vec![
            holding("BND", AssetClass::Bond, 10.0, 50.0),
            holding("AAPL", AssetClass::Stock, 5.0, 100.0),
            holding("MSFT", AssetClass::Stock, 10.0, 100.0),
        ];
        let result = portfolio_allocation(&investments).unwrap();

        assert_eq!(result.total_value, 2000.0);
        assert_eq!(result.allocation[0].asset_class, AssetClass::Stock);
        assert_eq!(result.allocation[0].percentage, 75.0);
        assert_eq!(result.allocation[1].value, 500.0);
    }
}
