/// Rounds to two decimal places for display. Never feed the result back
/// into an accumulation.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Formats a GPA with two decimals, or an em dash when there is none.
pub fn display_gpa(gpa: Option<f64>) -> String {
    match gpa {
        Some(value) => format!("{:.2}", round2(value)),
        None => "—".to_string(),
    }
}

/// Formats a credit total without trailing zeros ("13", "13.5").
pub fn display_credits(credits: f64) -> String {
    let rounded = round2(credits);
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}
