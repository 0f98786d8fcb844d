//! Universe configuration — the ticker list with names and industries.
//!
//! Stored as a TOML file of `[[stocks]]` rows. Listed (.TW) and OTC (.TWO)
//! tickers share one file; the industry field feeds the sector-leadership
//! ranking in the momentum scan.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// One instrument in the universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInfo {
    pub ticker: String,
    pub name: String,
    pub industry: String,
}

/// The complete universe configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Universe {
    pub stocks: Vec<StockInfo>,
}

impl Universe {
    /// Load a universe from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("read universe file: {e}"))?;
        Self::from_toml(&content)
    }

    /// Parse a universe from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("parse universe TOML: {e}"))
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }

    pub fn get(&self, ticker: &str) -> Option<&StockInfo> {
        self.stocks.iter().find(|s| s.ticker == ticker)
    }

    /// A small built-in sample of liquid TWSE/TPEx names, used when no
    /// universe file is given.
    pub fn default_tw() -> Self {
        let rows: &[(&str, &str, &str)] = &[
            ("2330.TW", "TSMC", "Semiconductors"),
            ("2454.TW", "MediaTek", "Semiconductors"),
            ("2303.TW", "UMC", "Semiconductors"),
            ("3034.TW", "Novatek", "Semiconductors"),
            ("3443.TW", "GUC", "Semiconductors"),
            ("2317.TW", "Hon Hai", "Electronics Manufacturing"),
            ("2382.TW", "Quanta", "Electronics Manufacturing"),
            ("2357.TW", "Asus", "Computers & Peripherals"),
            ("2376.TW", "Gigabyte", "Computers & Peripherals"),
            ("3231.TW", "Wistron", "Electronics Manufacturing"),
            ("2308.TW", "Delta Electronics", "Electronic Components"),
            ("2327.TW", "Yageo", "Electronic Components"),
            ("2881.TW", "Fubon Financial", "Financials"),
            ("2882.TW", "Cathay Financial", "Financials"),
            ("2603.TW", "Evergreen Marine", "Shipping"),
            ("2609.TW", "Yang Ming", "Shipping"),
            ("2002.TW", "China Steel", "Steel"),
            ("1301.TW", "Formosa Plastics", "Plastics"),
            ("1216.TW", "Uni-President", "Food"),
            ("2912.TW", "President Chain Store", "Retail"),
            ("6488.TWO", "GlobalWafers", "Semiconductors"),
            ("5483.TWO", "Sino-American Silicon", "Semiconductors"),
            ("8069.TWO", "E Ink", "Optoelectronics"),
            ("3105.TWO", "WIN Semiconductors", "Semiconductors"),
        ];
        Self {
            stocks: rows
                .iter()
                .map(|&(ticker, name, industry)| StockInfo {
                    ticker: ticker.into(),
                    name: name.into(),
                    industry: industry.into(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_toml_rows() {
        let toml = r#"
            [[stocks]]
            ticker = "2330.TW"
            name = "TSMC"
            industry = "Semiconductors"

            [[stocks]]
            ticker = "8069.TWO"
            name = "E Ink"
            industry = "Optoelectronics"
        "#;
        let universe = Universe::from_toml(toml).unwrap();
        assert_eq!(universe.len(), 2);
        assert_eq!(universe.get("2330.TW").unwrap().name, "TSMC");
        assert_eq!(universe.get("8069.TWO").unwrap().industry, "Optoelectronics");
        assert!(universe.get("0000.TW").is_none());
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(Universe::from_toml("stocks = 3").is_err());
    }

    #[test]
    fn default_universe_is_nonempty_and_unique() {
        let universe = Universe::default_tw();
        assert!(!universe.is_empty());
        let mut tickers: Vec<_> = universe.stocks.iter().map(|s| &s.ticker).collect();
        tickers.sort();
        tickers.dedup();
        assert_eq!(tickers.len(), universe.len());
    }

    #[test]
    fn default_universe_covers_both_markets() {
        let universe = Universe::default_tw();
        assert!(universe.stocks.iter().any(|s| s.ticker.ends_with(".TW")));
        assert!(universe.stocks.iter().any(|s| s.ticker.ends_with(".TWO")));
    }
}
