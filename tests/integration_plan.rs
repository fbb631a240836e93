//! Integration tests for the planning calculator.

mod common;

use serde_json::{Value, json};
use truck_site_planner::config::{PlanningRules, ScenarioConfig};
use truck_site_planner::plan::{PlanInput, calc_plan, calc_plan_with};

const NULLABLE: [&str; 2] = ["payback_years", "payback_net_years"];

#[test]
fn every_field_is_present_and_numeric_or_null() {
    for input in common::geometry_sweep() {
        let result = calc_plan(&input);
        let value = serde_json::to_value(&result).expect("result should serialize");
        let obj = value.as_object().expect("result should be an object");

        for (key, v) in obj {
            match v {
                Value::Number(n) => assert!(
                    n.as_f64().is_some_and(f64::is_finite),
                    "{key} not finite for {input:?}"
                ),
                Value::Null => assert!(NULLABLE.contains(&key.as_str()), "{key} is null"),
                Value::String(_) | Value::Array(_) => {}
                other => panic!("unexpected value for {key}: {other:?}"),
            }
        }
    }
}

#[test]
fn malformed_json_input_never_fails() {
    let raw = json!({
        "site_length_m": "abc",
        "site_width_m": null,
        "guns_per_pile": [],
        "service_fee_yuan_per_kwh": {"x": 1},
        "days_per_year": "many",
    });
    let result = calc_plan(&PlanInput::from_value(&raw));
    assert_eq!(result.n_recommend, 0);
    assert_eq!(result.invest_total_yuan, 0.0);
    assert_eq!(result.payback_years, None);
}

#[test]
fn zero_site_is_not_viable() {
    let r = calc_plan(&PlanInput::with_site(0.0, 0.0));
    assert_eq!(r.stalls_total, 0);
    assert_eq!(r.n_recommend, 0);
    assert_eq!(r.invest_total_yuan, 0.0);
    assert_eq!(r.revenue_year_yuan, 0.0);
    assert_eq!(r.payback_years, None);
    assert!(r.notes[0].contains("Site length"));
    assert!(r.notes[1].contains("turning radius"));
    assert_eq!(r.notes[2], r.layout_note);
}

#[test]
fn minimum_single_row_site() {
    let r = calc_plan(&PlanInput::with_site(12.0, 30.0));
    assert_eq!(r.stalls_per_row_raw, 2);
    assert_eq!(r.row_count, 1);
    assert_eq!(r.stalls_per_row_draw, 2);
    assert_eq!(r.stalls_left, 0);
    assert_eq!(r.stalls_right, 2);
    assert_eq!(r.stalls_total, 2);
    assert_eq!(r.n_layout, 1);
    assert_eq!(r.n_recommend, 1);
    assert_eq!(r.power_capacity_kva, 400.0);
}

#[test]
fn square_hundred_metre_site() {
    let r = calc_plan(&PlanInput::with_site(100.0, 100.0));
    assert_eq!(r.stalls_per_row_raw, 16);
    assert_eq!(r.row_count, 4);
    assert_eq!(r.stalls_total, 64);
    assert_eq!(r.n_layout, 32);
}

#[test]
fn zero_piles_zero_every_cost_field() {
    for input in common::geometry_sweep() {
        let input = PlanInput {
            rent_yuan_per_sqm_month: 1e4,
            staff_count: 1000,
            salary_yuan_per_month: 1e5,
            ..input
        };
        let r = calc_plan(&input);
        if r.n_recommend > 0 {
            continue;
        }
        assert_eq!(r.invest_power_yuan, 0.0);
        assert_eq!(r.invest_civil_yuan, 0.0);
        assert_eq!(r.invest_pile_yuan, 0.0);
        assert_eq!(r.invest_total_yuan, 0.0);
        assert_eq!(r.rent_year_yuan, 0.0);
        assert_eq!(r.labor_year_yuan, 0.0);
        assert_eq!(r.revenue_net_year_yuan, 0.0);
    }
}

#[test]
fn payback_is_null_without_revenue_or_investment() {
    for input in common::geometry_sweep() {
        let r = calc_plan(&input);
        if r.revenue_year_yuan <= 0.0 || r.invest_total_yuan <= 0.0 {
            assert_eq!(r.payback_years, None, "{input:?}");
        } else {
            let years = r.payback_years.expect("payback should be defined");
            assert!(common::approx(years, r.invest_total_yuan / r.revenue_year_yuan));
        }
    }
}

#[test]
fn width_500_is_last_band_and_beyond_needs_review() {
    let r = calc_plan(&PlanInput::with_site(60.0, 500.0));
    assert_eq!(r.row_count, 22);
    assert_eq!(r.stalls_total, 10 * 22);

    let r = calc_plan(&PlanInput::with_site(60.0, 500.01));
    assert_eq!(r.row_count, 0);
    assert_eq!(r.stalls_total, 0);
    assert!(r.notes.iter().any(|n| n.contains("manual review")));
}

#[test]
fn net_payback_accounts_for_opex() {
    let r = calc_plan(&common::staffed_site(120.0, 60.0));
    assert_eq!(r.n_recommend, 20);
    assert!(common::approx(r.rent_year_yuan, 7200.0 * 2.0 * 12.0));
    assert!(common::approx(r.labor_year_yuan, 4.0 * 6000.0 * 12.0));
    let net = r.payback_net_years.expect("net payback should be defined");
    assert!(common::approx(net, r.invest_total_yuan / r.revenue_net_year_yuan));
}

#[test]
fn scenario_rules_flow_into_calculation() {
    let cfg = ScenarioConfig::from_toml_file(std::path::Path::new("scenarios/grid_capped.toml"))
        .expect("scenario file should load");
    let r = calc_plan_with(&cfg.input, &cfg.rules);
    assert_eq!(r.n_power, 20);
    assert_eq!(r.n_recommend, 20);
    assert!(r.n_layout > r.n_recommend);

    let uncapped = calc_plan_with(&cfg.input, &PlanningRules::default());
    assert_eq!(uncapped.n_recommend, uncapped.n_layout);
}

#[test]
fn repeated_evaluation_is_identical() {
    let input = common::staffed_site(84.0, 130.0);
    assert_eq!(calc_plan(&input), calc_plan(&input));
}
