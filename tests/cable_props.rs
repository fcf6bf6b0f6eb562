use proptest::prelude::*;
use wire_expert_toolbox::cable::{
    self, is_standard_breaker, is_standard_size, Material, MountType, Scenario, SizingInput,
    SizingMode, BREAKER_MARGIN,
};

fn scenario() -> impl Strategy<Value = Scenario> {
    prop::sample::select(Scenario::ALL.to_vec())
}

fn mount() -> impl Strategy<Value = MountType> {
    prop::sample::select(MountType::ALL.to_vec())
}

fn material() -> impl Strategy<Value = Material> {
    prop::sample::select(Material::ALL.to_vec())
}

fn voltage() -> impl Strategy<Value = f64> {
    prop::sample::select(vec![220.0, 230.0, 380.0, 400.0])
}

prop_compose! {
    fn any_input()(
        power in 0.1f64..150.0,
        voltage in voltage(),
        distance in 0.0f64..500.0,
        scenario in scenario(),
        mount_type in mount(),
        material in material(),
        ambient in -10.0f64..60.0,
        pro in any::<bool>(),
        pf in 0.5f64..=1.0,
        drop in 1.0f64..10.0,
        group in 1.0f64..2.0,
    ) -> SizingInput {
        SizingInput {
            rated_power_kw: power,
            line_voltage_v: voltage,
            distance_m: distance,
            scenario,
            mount_type,
            material,
            ambient_temp_c: ambient,
            mode: if pro { SizingMode::Pro } else { SizingMode::Basic },
            power_factor: pf,
            allowed_drop_pct: drop,
            group_factor: group,
        }
    }
}

proptest! {
    #[test]
    fn results_come_from_standard_tables(input in any_input()) {
        let res = cable::size_cable(&input).unwrap();
        prop_assert!(is_standard_breaker(res.recommended_breaker_a));
        prop_assert!(is_standard_size(res.recommended_cable_mm2));
        prop_assert!(res.load_current_a > 0.0);
        prop_assert!(res.voltage_drop_pct >= 0.0);
    }

    #[test]
    fn breaker_covers_margin_when_table_allows(input in any_input()) {
        let res = cable::size_cable(&input).unwrap();
        let required = res.load_current_a * BREAKER_MARGIN;
        if required <= 630.0 {
            prop_assert!(f64::from(res.recommended_breaker_a) >= required);
        }
    }

    #[test]
    fn longer_run_never_shrinks_cable(input in any_input(), extra in 0.0f64..500.0) {
        let near = cable::size_cable(&input).unwrap();
        let far = cable::size_cable(&SizingInput { distance_m: input.distance_m + extra, ..input.clone() }).unwrap();
        prop_assert!(far.recommended_cable_mm2 >= near.recommended_cable_mm2);
    }

    #[test]
    fn more_power_never_shrinks_cable_or_breaker(input in any_input(), extra in 0.0f64..50.0) {
        let small = cable::size_cable(&input).unwrap();
        let big = cable::size_cable(&SizingInput { rated_power_kw: input.rated_power_kw + extra, ..input.clone() }).unwrap();
        prop_assert!(big.load_current_a >= small.load_current_a);
        prop_assert!(big.recommended_cable_mm2 >= small.recommended_cable_mm2);
        prop_assert!(big.recommended_breaker_a >= small.recommended_breaker_a);
    }

    #[test]
    fn industrial_at_least_lighting_with_same_overrides(input in any_input()) {
        let base = SizingInput { mode: SizingMode::Pro, ..input };
        let lighting = cable::size_cable(&SizingInput { scenario: Scenario::Lighting, ..base.clone() }).unwrap();
        let industrial = cable::size_cable(&SizingInput { scenario: Scenario::Industrial, ..base }).unwrap();
        prop_assert!(industrial.recommended_cable_mm2 >= lighting.recommended_cable_mm2);
    }

    #[test]
    fn ambient_at_or_above_limit_always_rejected(input in any_input(), ambient in 70.0f64..200.0) {
        let res = cable::size_cable(&SizingInput { ambient_temp_c: ambient, ..input });
        prop_assert!(res.is_err());
    }
}
