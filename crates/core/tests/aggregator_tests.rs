// ═══════════════════════════════════════════════════════════════════
// Aggregator Tests — derived metrics, roll-ups, numeric edge cases
// ═══════════════════════════════════════════════════════════════════

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};

use portfolio_dashboard_core::models::holding::{Exchange, Holding};
use portfolio_dashboard_core::models::market_data::MarketData;
use portfolio_dashboard_core::services::aggregator::PortfolioAggregator;

const EPSILON: f64 = 1e-9;

fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn holding(name: &str, price: f64, quantity: u32, sector: &str) -> Holding {
    Holding {
        stock_name: name.to_string(),
        purchase_price: price,
        quantity,
        exchange: Exchange::Nse,
        sector: sector.to_string(),
    }
}

fn market(symbol: &str, price: f64, pe: f64, earnings: f64) -> (String, MarketData) {
    (
        symbol.to_string(),
        MarketData {
            symbol: symbol.to_string(),
            current_price: price,
            pe_ratio: pe,
            latest_earnings: earnings,
        },
    )
}

// ═══════════════════════════════════════════════════════════════════
// Per-stock derived metrics
// ═══════════════════════════════════════════════════════════════════

mod per_stock {
    use super::*;

    #[test]
    fn derives_all_metrics() {
        let holdings = vec![holding("ACME", 100.0, 10, "Tech")];
        let data = HashMap::from([market("ACME.NS", 150.0, 20.0, 5.0)]);

        let snapshot = PortfolioAggregator::new().aggregate(&holdings, &data, as_of());
        let stock = &snapshot.stocks[0];

        assert_eq!(stock.total_investment, 1000.0);
        assert_eq!(stock.current_value, 1500.0);
        assert_eq!(stock.gain_loss, 500.0);
        assert_eq!(stock.gain_loss_percentage, 50.0);
        assert_eq!(stock.portfolio_percentage, 100.0);
        assert_eq!(stock.pe_ratio, 20.0);
        assert_eq!(stock.latest_earnings, 5.0);
        assert_eq!(stock.symbol, "ACME.NS");
    }

    #[test]
    fn zero_quantity_yields_zero_percentages() {
        let holdings = vec![holding("ACME", 100.0, 0, "Tech")];
        let data = HashMap::from([market("ACME.NS", 150.0, 0.0, 0.0)]);

        let snapshot = PortfolioAggregator::new().aggregate(&holdings, &data, as_of());
        let stock = &snapshot.stocks[0];

        assert_eq!(stock.total_investment, 0.0);
        assert_eq!(stock.current_value, 0.0);
        // Defined as 0, never NaN
        assert_eq!(stock.gain_loss_percentage, 0.0);
        assert_eq!(stock.portfolio_percentage, 0.0);
    }

    #[test]
    fn missing_market_data_joins_as_zero_filled() {
        let holdings = vec![holding("GHOST", 50.0, 4, "Tech")];
        let data = HashMap::new();

        let snapshot = PortfolioAggregator::new().aggregate(&holdings, &data, as_of());
        let stock = &snapshot.stocks[0];

        assert_eq!(stock.symbol, "GHOST.NS");
        assert_eq!(stock.current_price, 0.0);
        assert_eq!(stock.total_investment, 200.0);
        assert_eq!(stock.current_value, 0.0);
        assert_eq!(stock.gain_loss, -200.0);
        assert_eq!(stock.gain_loss_percentage, -100.0);
    }

    #[test]
    fn loss_produces_negative_percentage() {
        let holdings = vec![holding("DOWN", 200.0, 5, "Tech")];
        let data = HashMap::from([market("DOWN.NS", 150.0, 0.0, 0.0)]);

        let snapshot = PortfolioAggregator::new().aggregate(&holdings, &data, as_of());
        assert_eq!(snapshot.stocks[0].gain_loss, -250.0);
        assert_eq!(snapshot.stocks[0].gain_loss_percentage, -25.0);
    }

    #[test]
    fn negative_earnings_pass_through() {
        let holdings = vec![holding("LOSSCO", 10.0, 1, "Tech")];
        let data = HashMap::from([market("LOSSCO.NS", 9.0, 0.0, -3.2)]);

        let snapshot = PortfolioAggregator::new().aggregate(&holdings, &data, as_of());
        assert_eq!(snapshot.stocks[0].latest_earnings, -3.2);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Portfolio totals and weights
// ═══════════════════════════════════════════════════════════════════

mod portfolio_totals {
    use super::*;

    #[test]
    fn totals_sum_over_all_stocks() {
        let holdings = vec![
            holding("A", 100.0, 10, "Tech"),
            holding("B", 200.0, 5, "Financial"),
        ];
        let data = HashMap::from([
            market("A.NS", 110.0, 0.0, 0.0),
            market("B.NS", 180.0, 0.0, 0.0),
        ]);

        let snapshot = PortfolioAggregator::new().aggregate(&holdings, &data, as_of());
        assert_eq!(snapshot.total_investment, 2000.0);
        assert_eq!(snapshot.current_value, 2000.0);
        assert_eq!(snapshot.total_gain_loss, 0.0);
        assert_eq!(snapshot.total_gain_loss_percentage, 0.0);
    }

    #[test]
    fn portfolio_percentages_sum_to_100() {
        let holdings = vec![
            holding("A", 123.45, 7, "Tech"),
            holding("B", 678.9, 3, "Financial"),
            holding("C", 55.5, 13, "Energy"),
        ];
        let data = HashMap::new();

        let snapshot = PortfolioAggregator::new().aggregate(&holdings, &data, as_of());
        let sum: f64 = snapshot.stocks.iter().map(|s| s.portfolio_percentage).sum();
        assert!((sum - 100.0).abs() < EPSILON, "sum was {sum}");
    }

    #[test]
    fn zero_total_investment_yields_all_zero_percentages() {
        let holdings = vec![
            holding("A", 0.0, 10, "Tech"),
            holding("B", 100.0, 0, "Financial"),
        ];
        let data = HashMap::from([market("A.NS", 50.0, 0.0, 0.0)]);

        let snapshot = PortfolioAggregator::new().aggregate(&holdings, &data, as_of());
        assert_eq!(snapshot.total_investment, 0.0);
        assert_eq!(snapshot.total_gain_loss_percentage, 0.0);
        for stock in &snapshot.stocks {
            assert_eq!(stock.portfolio_percentage, 0.0);
            assert_eq!(stock.gain_loss_percentage, 0.0);
        }
    }

    #[test]
    fn stocks_keep_holdings_order() {
        let holdings = vec![
            holding("Z", 1.0, 1, "Tech"),
            holding("M", 1.0, 1, "Tech"),
            holding("A", 1.0, 1, "Tech"),
        ];
        let snapshot =
            PortfolioAggregator::new().aggregate(&holdings, &HashMap::new(), as_of());
        let names: Vec<&str> = snapshot.stocks.iter().map(|s| s.stock_name.as_str()).collect();
        assert_eq!(names, vec!["Z", "M", "A"]);
    }

    #[test]
    fn empty_holdings_produce_empty_snapshot() {
        let snapshot = PortfolioAggregator::new().aggregate(&[], &HashMap::new(), as_of());
        assert!(snapshot.stocks.is_empty());
        assert!(snapshot.sector_summaries.is_empty());
        assert_eq!(snapshot.total_investment, 0.0);
        assert_eq!(snapshot.total_gain_loss_percentage, 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Sector roll-ups
// ═══════════════════════════════════════════════════════════════════

mod sectors {
    use super::*;

    #[test]
    fn same_sector_sums_constituents() {
        let holdings = vec![
            holding("A", 100.0, 10, "Tech"), // 1000
            holding("B", 200.0, 10, "Tech"), // 2000
        ];
        let data = HashMap::from([
            market("A.NS", 120.0, 0.0, 0.0),
            market("B.NS", 210.0, 0.0, 0.0),
        ]);

        let snapshot = PortfolioAggregator::new().aggregate(&holdings, &data, as_of());
        assert_eq!(snapshot.sector_summaries.len(), 1);
        let tech = &snapshot.sector_summaries[0];
        assert_eq!(tech.sector, "Tech");
        assert_eq!(tech.total_investment, 3000.0);
        assert_eq!(tech.current_value, 3300.0);
        assert_eq!(tech.gain_loss, 300.0);
    }

    #[test]
    fn sector_totals_partition_portfolio_totals() {
        let holdings = vec![
            holding("A", 123.45, 7, "Tech"),
            holding("B", 678.9, 3, "Financial"),
            holding("C", 55.5, 13, "Tech"),
            holding("D", 9.99, 100, "Energy"),
        ];
        let data = HashMap::from([
            market("A.NS", 130.0, 0.0, 0.0),
            market("C.NS", 60.0, 0.0, 0.0),
        ]);

        let snapshot = PortfolioAggregator::new().aggregate(&holdings, &data, as_of());

        let sector_investment: f64 = snapshot
            .sector_summaries
            .iter()
            .map(|s| s.total_investment)
            .sum();
        let sector_value: f64 = snapshot.sector_summaries.iter().map(|s| s.current_value).sum();

        assert!((sector_investment - snapshot.total_investment).abs() < EPSILON);
        assert!((sector_value - snapshot.current_value).abs() < EPSILON);
    }

    #[test]
    fn sectors_appear_in_first_seen_order() {
        let holdings = vec![
            holding("A", 1.0, 1, "Energy"),
            holding("B", 1.0, 1, "Tech"),
            holding("C", 1.0, 1, "Energy"),
            holding("D", 1.0, 1, "Financial"),
        ];
        let snapshot =
            PortfolioAggregator::new().aggregate(&holdings, &HashMap::new(), as_of());
        let sectors: Vec<&str> = snapshot
            .sector_summaries
            .iter()
            .map(|s| s.sector.as_str())
            .collect();
        assert_eq!(sectors, vec!["Energy", "Tech", "Financial"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Purity
// ═══════════════════════════════════════════════════════════════════

mod purity {
    use super::*;

    #[test]
    fn aggregation_is_idempotent() {
        let holdings = vec![
            holding("A", 100.0, 10, "Tech"),
            holding("B", 200.0, 5, "Financial"),
        ];
        let data = HashMap::from([
            market("A.NS", 110.0, 12.0, 3.0),
            market("B.NS", 180.0, 8.0, -1.0),
        ]);

        let aggregator = PortfolioAggregator::new();
        let first = aggregator.aggregate(&holdings, &data, as_of());
        let second = aggregator.aggregate(&holdings, &data, as_of());
        assert_eq!(first, second);
    }

    #[test]
    fn total_investment_is_exact() {
        // purchase_price × quantity with no drift across recomputation
        let holdings = vec![holding("A", 100.0, 10, "Tech")];
        let aggregator = PortfolioAggregator::new();
        for _ in 0..100 {
            let snapshot = aggregator.aggregate(&holdings, &HashMap::new(), as_of());
            assert_eq!(snapshot.stocks[0].total_investment, 1000.0);
        }
    }
}
