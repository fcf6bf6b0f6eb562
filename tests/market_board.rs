use wire_expert_toolbox::market::{MarketSnapshot, MarketSummary, PricePoint, PriceRange};

#[test]
fn reference_snapshot_summary() {
    let snap = MarketSnapshot::reference();
    let s = MarketSummary::from_snapshot(&snap);
    assert_eq!(s.latest, 9392.5);
    assert!((s.change_pct - 1.6504).abs() < 1e-3, "change={}", s.change_pct);
    assert_eq!(s.high, 9410.0);
    assert_eq!(s.low, 9240.0);
    assert!(s.is_up());
    assert!((snap.price_per_kg() - 9.3925).abs() < 1e-9);
}

#[test]
fn empty_history_has_flat_change() {
    let snap = MarketSnapshot {
        price: 9000.0,
        history: Vec::new(),
        updated_at: String::new(),
    };
    let s = MarketSummary::from_snapshot(&snap);
    assert_eq!(s.change_pct, 0.0);
    assert_eq!((s.high, s.low), (9000.0, 9000.0));
}

#[test]
fn falling_market() {
    let snap = MarketSnapshot {
        price: 9100.0,
        history: vec![PricePoint::new("08:00", 9300.0), PricePoint::new("12:00", 9200.0)],
        updated_at: "2024-05-01T12:00:00Z".into(),
    };
    assert!(!MarketSummary::from_snapshot(&snap).is_up());
}

#[test]
fn price_service_payload_decodes() {
    let body = r#"{"price": 9401.25, "history": [{"time": "09:00", "price": 9388.0}]}"#;
    let snap: MarketSnapshot = serde_json::from_str(body).unwrap();
    assert_eq!(snap.price, 9401.25);
    assert_eq!(snap.history.len(), 1);
    assert!(snap.updated_at.is_empty());
}

#[test]
fn range_parsing() {
    assert_eq!("24h".parse::<PriceRange>().unwrap(), PriceRange::Day);
    assert_eq!("Week".parse::<PriceRange>().unwrap(), PriceRange::Week);
    assert_eq!("30d".parse::<PriceRange>().unwrap(), PriceRange::Month);
    assert!("year".parse::<PriceRange>().is_err());
    assert_eq!(PriceRange::Month.as_query(), "month");
}
