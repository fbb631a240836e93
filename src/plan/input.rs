//! Lenient planning input record.
//!
//! Every field has a documented default and malformed values never fail:
//! missing keys, `null`, booleans, nested values, unparseable strings and
//! non-finite numbers all fall back to the field default. JSON and TOML
//! sources share the same path through [`serde_json::Value`].

use serde::Serialize;
use serde_json::{Map, Value};

/// Site geometry and economic assumptions for one planning scenario.
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
#[serde(from = "Value")]
pub struct PlanInput {
    /// Free-text site location, only used by reports.
    pub site_location: String,
    /// Site length along the stall row (m).
    pub site_length_m: f64,
    /// Site width, determines the number of rows (m).
    pub site_width_m: f64,
    /// Nominal pile rating (kVA). Echoed only; capacity uses the planning rules.
    pub pile_kva_per: f64,
    /// Charging guns per pile.
    pub guns_per_pile: i64,
    /// Energy delivered per gun per operating day (kWh).
    pub kwh_per_gun_per_day: f64,
    /// Service fee charged on top of energy (yuan/kWh).
    pub service_fee_yuan_per_kwh: f64,
    /// Operating days per year.
    pub days_per_year: i64,
    /// Grid connection cost (yuan/kVA).
    pub power_cost_yuan_per_kva: f64,
    /// Civil works cost (yuan/m²).
    pub civil_cost_yuan_per_sqm: f64,
    /// Equipment cost per pile (yuan).
    pub pile_cost_yuan_each: f64,
    /// Site rent (yuan/m² per month).
    pub rent_yuan_per_sqm_month: f64,
    /// Operating staff headcount.
    pub staff_count: i64,
    /// Salary per staff member (yuan/month).
    pub salary_yuan_per_month: f64,
}

impl Default for PlanInput {
    fn default() -> Self {
        Self {
            site_location: String::new(),
            site_length_m: 0.0,
            site_width_m: 0.0,
            pile_kva_per: 400.0,
            guns_per_pile: 2,
            kwh_per_gun_per_day: 1000.0,
            service_fee_yuan_per_kwh: 0.3,
            days_per_year: 330,
            power_cost_yuan_per_kva: 600.0,
            civil_cost_yuan_per_sqm: 200.0,
            pile_cost_yuan_each: 45000.0,
            rent_yuan_per_sqm_month: 0.0,
            staff_count: 0,
            salary_yuan_per_month: 0.0,
        }
    }
}

impl PlanInput {
    /// Convenience constructor for a site of the given dimensions with
    /// default economics.
    pub fn with_site(length_m: f64, width_m: f64) -> Self {
        Self {
            site_length_m: length_m,
            site_width_m: width_m,
            ..Self::default()
        }
    }

    /// Builds an input from an arbitrary JSON value.
    ///
    /// Anything other than an object yields the all-default input.
    pub fn from_value(value: &Value) -> Self {
        let empty = Map::new();
        let obj = value.as_object().unwrap_or(&empty);
        let d = Self::default();

        Self {
            site_location: obj
                .get("site_location")
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .unwrap_or(d.site_location),
            site_length_m: float_field(obj, "site_length_m", d.site_length_m),
            site_width_m: float_field(obj, "site_width_m", d.site_width_m),
            pile_kva_per: float_field(obj, "pile_kva_per", d.pile_kva_per),
            guns_per_pile: int_field(obj, "guns_per_pile", d.guns_per_pile),
            kwh_per_gun_per_day: float_field(obj, "kwh_per_gun_per_day", d.kwh_per_gun_per_day),
            service_fee_yuan_per_kwh: float_field(
                obj,
                "service_fee_yuan_per_kwh",
                d.service_fee_yuan_per_kwh,
            ),
            days_per_year: int_field(obj, "days_per_year", d.days_per_year),
            power_cost_yuan_per_kva: float_field(
                obj,
                "power_cost_yuan_per_kva",
                d.power_cost_yuan_per_kva,
            ),
            civil_cost_yuan_per_sqm: float_field(
                obj,
                "civil_cost_yuan_per_sqm",
                d.civil_cost_yuan_per_sqm,
            ),
            pile_cost_yuan_each: float_field(obj, "pile_cost_yuan_each", d.pile_cost_yuan_each),
            rent_yuan_per_sqm_month: float_field(
                obj,
                "rent_yuan_per_sqm_month",
                d.rent_yuan_per_sqm_month,
            ),
            staff_count: int_field(obj, "staff_count", d.staff_count),
            salary_yuan_per_month: float_field(
                obj,
                "salary_yuan_per_month",
                d.salary_yuan_per_month,
            ),
        }
    }

    /// Parses a JSON document leniently. Malformed JSON yields the defaults.
    pub fn from_json_str(s: &str) -> Self {
        serde_json::from_str::<Value>(s)
            .map(|v| Self::from_value(&v))
            .unwrap_or_default()
    }
}

impl From<Value> for PlanInput {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

fn float_field(obj: &Map<String, Value>, key: &str, default: f64) -> f64 {
    let parsed = match obj.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(default)
}

fn int_field(obj: &Map<String, Value>, key: &str, default: i64) -> i64 {
    match obj.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|v| v.is_finite()).map(|v| v.trunc() as i64))
            .unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse::<i64>().unwrap_or(default),
        _ => default,
    }
}
