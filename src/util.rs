// Formatting and console helpers shared by the simulation core and the UI.

/// Rounding mode used by every value formatter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundType {
    /// Half rounds up (towards positive infinity).
    Round,
    Floor,
    Ceil,
}

/// Round `value` to a multiple of `round_val`.
pub fn round_to_val(value: f64, round_type: RoundType, round_val: f64) -> f64 {
    let scaled = value / round_val;
    let rounded = match round_type {
        RoundType::Round => (scaled + 0.5).floor(),
        RoundType::Floor => scaled.floor(),
        RoundType::Ceil => scaled.ceil(),
    };
    rounded * round_val
}

/// Scientific notation with a three digit mantissa, e.g. `1.234e+5`.
pub fn round_exp(value: f64, round_type: RoundType) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let e = value.log10().floor();
    let m = value / 10f64.powf(e);
    let rounded = round_to_val(m, round_type, 0.001);
    format!("{:.3}e+{}", rounded, e as i64)
}

pub fn format_value(value: f64, round_type: RoundType, prefix: &str, suffix: &str) -> String {
    if value < 1000.0 {
        format!("{}{:.2}{}", prefix, round_to_val(value, round_type, 0.01), suffix)
    } else {
        format!("{}{}{}", prefix, round_exp(value, round_type), suffix)
    }
}

pub fn format_currency(value: f64, round_type: RoundType) -> String {
    format_value(value, round_type, "$", "")
}

pub fn format_time(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{:01}:{:02}:{:02}", h, m, s)
    } else if m > 0 {
        format!("{:02}:{:02}", m, s)
    } else {
        format!("{}s", s)
    }
}

/// `HH:MM:SS`, or `Infinity` for a timer that never finishes.
pub fn format_hms(secs: f64) -> String {
    if !secs.is_finite() {
        return "Infinity".to_string();
    }
    let total = secs.max(0.0).floor() as u64;
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

pub fn clog(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(msg));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = msg;
}

pub fn cwarn(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&wasm_bindgen::JsValue::from_str(msg));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = msg;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up_like_the_browser() {
        assert_eq!(round_to_val(2.5, RoundType::Round, 1.0), 3.0);
        assert_eq!(round_to_val(-2.5, RoundType::Round, 1.0), -2.0);
        assert_eq!(round_to_val(7.9, RoundType::Floor, 1.0), 7.0);
        assert_eq!(round_to_val(7.1, RoundType::Ceil, 1.0), 8.0);
    }

    #[test]
    fn small_values_are_fixed_point() {
        assert_eq!(format_value(12.345, RoundType::Floor, "", ""), "12.34");
        assert_eq!(format_currency(3.0, RoundType::Round), "$3.00");
        assert_eq!(format_value(0.0, RoundType::Floor, "", "%"), "0.00%");
    }

    #[test]
    fn large_values_use_exponent_form() {
        assert_eq!(format_value(12345.0, RoundType::Floor, "", ""), "1.234e+4");
        assert_eq!(format_value(2000.0, RoundType::Round, "", ""), "2.000e+3");
        assert_eq!(format_value(f64::INFINITY, RoundType::Round, "", ""), "Infinity");
    }

    #[test]
    fn time_formats() {
        assert_eq!(format_time(5), "5s");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(3725), "1:02:05");
        assert_eq!(format_hms(3725.9), "01:02:05");
        assert_eq!(format_hms(f64::INFINITY), "Infinity");
    }
}
