use wire_expert_toolbox::{
    antifake::{self, AntiFakeError, ValueCheckInput, VerdictStatus, CHECK_SIZES_MM2},
    bill::{self, BillError, BillInput},
    i18n::Translator,
};

#[test]
fn default_bill_estimate() {
    let est = bill::estimate_bill(BillInput::default()).unwrap();
    assert!((est.daily_kwh - 20.0).abs() < 1e-9);
    assert!((est.daily_cost - 3.0).abs() < 1e-9);
    assert!((est.monthly_cost - 90.0).abs() < 1e-9);
    assert!((est.yearly_cost - 1095.0).abs() < 1e-9);
}

#[test]
fn idle_load_costs_nothing() {
    let est = bill::estimate_bill(BillInput {
        hours_per_day: 0.0,
        ..BillInput::default()
    })
    .unwrap();
    assert_eq!(est.monthly_cost, 0.0);
}

#[test]
fn negative_price_is_rejected() {
    let err = bill::estimate_bill(BillInput {
        price_per_kwh: -0.1,
        ..BillInput::default()
    })
    .unwrap_err();
    assert_eq!(err, BillError::InvalidInput("price_per_kwh"));
}

#[test]
fn copper_weight_follows_density() {
    // 2.5 mm² × 100 m × 8.96 g/cm³
    assert!((antifake::copper_weight_kg(2.5, 100.0) - 2.24).abs() < 1e-9);
}

#[test]
fn default_purchase_is_safe() {
    let v = antifake::check_value(ValueCheckInput::default()).unwrap();
    assert!((v.copper_value - 21.04).abs() < 0.01, "value={}", v.copper_value);
    assert_eq!(v.status, VerdictStatus::Safe);
    assert_eq!(v.copper_share_pct, 14.0);
}

#[test]
fn price_near_metal_value_is_flagged() {
    let check = |paid| {
        antifake::check_value(ValueCheckInput {
            paid_price: paid,
            ..ValueCheckInput::default()
        })
        .unwrap()
        .status
    };
    assert_eq!(check(20.0), VerdictStatus::Danger);
    assert_eq!(check(25.0), VerdictStatus::Suspicious);
    assert_eq!(check(40.0), VerdictStatus::Safe);
}

#[test]
fn ratio_thresholds() {
    assert_eq!(VerdictStatus::from_ratio(1.0), VerdictStatus::Danger);
    assert_eq!(VerdictStatus::from_ratio(1.1), VerdictStatus::Suspicious);
    assert_eq!(VerdictStatus::from_ratio(1.35), VerdictStatus::Safe);
}

#[test]
fn zero_length_is_rejected() {
    let err = antifake::check_value(ValueCheckInput {
        length_m: 0.0,
        ..ValueCheckInput::default()
    })
    .unwrap_err();
    assert_eq!(err, AntiFakeError::InvalidInput("length_m"));
}

#[test]
fn check_sizes_ascend() {
    assert!(CHECK_SIZES_MM2.windows(2).all(|w| w[0] < w[1]));
    assert!(CHECK_SIZES_MM2.contains(&2.5));
}

#[test]
fn checklist_is_translated_in_every_language() {
    for code in ["cn", "en", "kh"] {
        let tr = Translator::new(code);
        assert_eq!(antifake::inspection_checklist().len(), 4);
        for item in antifake::inspection_checklist() {
            for key in [item.title_key, item.desc_key] {
                assert_ne!(tr.t(key), "[missing translation]", "{code}: {key}");
            }
        }
    }
}
