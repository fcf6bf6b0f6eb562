//! 구리 시세 보드: 가격 서비스 응답 계약과 요약.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 기준 시장 (LME 현물 구리, USD/t).
pub const MARKET_NAME: &str = "LME Spot Copper";

/// 시세 이력 한 점.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// "HH:MM" 또는 날짜 라벨
    pub time: String,
    pub price: f64,
}

impl PricePoint {
    pub fn new(time: &str, price: f64) -> Self {
        Self {
            time: time.to_string(),
            price,
        }
    }
}

/// 가격 서비스 `GET /api/market/price` 응답.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// 현재 기준가 [USD/t]
    pub price: f64,
    #[serde(default)]
    pub history: Vec<PricePoint>,
    #[serde(default)]
    pub updated_at: String,
}

impl MarketSnapshot {
    /// 가격 서비스에 닿지 못할 때 쓰는 기준 스냅샷.
    pub fn reference() -> Self {
        Self {
            price: 9392.50,
            history: vec![
                PricePoint::new("08:00", 9240.0),
                PricePoint::new("10:00", 9310.0),
                PricePoint::new("12:00", 9280.0),
                PricePoint::new("14:00", 9350.0),
                PricePoint::new("16:00", 9410.0),
                PricePoint::new("18:00", 9392.0),
            ],
            updated_at: String::new(),
        }
    }

    pub fn price_per_kg(&self) -> f64 {
        self.price / 1000.0
    }
}

/// 이력 조회 범위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceRange {
    #[default]
    Day,
    Week,
    Month,
}

impl PriceRange {
    pub fn as_query(&self) -> &'static str {
        match self {
            PriceRange::Day => "day",
            PriceRange::Week => "week",
            PriceRange::Month => "month",
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for PriceRange {
    type Err = crate::cable::ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "24h" => Ok(PriceRange::Day),
            "week" | "7d" => Ok(PriceRange::Week),
            "month" | "30d" => Ok(PriceRange::Month),
            _ => Err(crate::cable::ParseEnumError::new("price range", s)),
        }
    }
}

/// 보드 상단에 표시할 요약.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketSummary {
    pub latest: f64,
    /// 이력 첫 점 대비 변화율 [%]. 이력이 없으면 0.
    pub change_pct: f64,
    pub high: f64,
    pub low: f64,
}

impl MarketSummary {
    pub fn from_snapshot(snapshot: &MarketSnapshot) -> Self {
        let latest = snapshot.price;
        let first = snapshot.history.first().map(|p| p.price);
        let change_pct = match first {
            Some(open) if open > 0.0 => (latest - open) / open * 100.0,
            _ => 0.0,
        };
        let (high, low) = snapshot
            .history
            .iter()
            .map(|p| p.price)
            .fold((latest, latest), |(hi, lo), p| (hi.max(p), lo.min(p)));
        Self {
            latest,
            change_pct,
            high,
            low,
        }
    }

    pub fn is_up(&self) -> bool {
        self.change_pct >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_summary() {
        let s = MarketSummary::from_snapshot(&MarketSnapshot::reference());
        assert_eq!(s.latest, 9392.50);
        assert!((s.change_pct - 1.6504).abs() < 1e-3, "change={}", s.change_pct);
        assert_eq!(s.high, 9410.0);
        assert_eq!(s.low, 9240.0);
        assert!(s.is_up());
    }

    #[test]
    fn empty_history_has_flat_change() {
        let snap = MarketSnapshot {
            price: 9000.0,
            history: vec![],
            updated_at: String::new(),
        };
        let s = MarketSummary::from_snapshot(&snap);
        assert_eq!(s.change_pct, 0.0);
        assert_eq!(s.high, 9000.0);
    }

    #[test]
    fn decodes_service_payload() {
        let json = r#"{"price": 9401.2, "history": [{"time": "09:30", "price": 9390.0}],
                       "updated_at": "2024-05-01T09:30:00"}"#;
        let snap: MarketSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.history.len(), 1);
        assert!((snap.price_per_kg() - 9.4012).abs() < 1e-9);
    }
}
