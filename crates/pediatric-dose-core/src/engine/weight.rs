//! Body weight input.

/// A weight the engine can compute with: finite and `> 0`.
pub fn is_valid_weight(weight_kg: f64) -> bool {
    weight_kg.is_finite() && weight_kg > 0.0
}

/// Parse a weight typed into the form.
///
/// Accepts ASCII, Persian (`۰-۹`) and Arabic-Indic (`٠-٩`) digits with an
/// optional `.` or `٫` decimal separator. Anything else, including empty
/// text, yields `None`.
pub fn parse_weight(text: &str) -> Option<f64> {
    let mut normalized = String::with_capacity(text.len());
    for c in text.trim().chars() {
        let mapped = match c {
            '0'..='9' | '.' => c,
            '۰'..='۹' => shift_digit(c, '۰')?,
            '٠'..='٩' => shift_digit(c, '٠')?,
            '٫' => '.',
            _ => return None,
        };
        normalized.push(mapped);
    }

    if normalized.matches('.').count() > 1 {
        return None;
    }
    normalized.parse::<f64>().ok()
}

fn shift_digit(c: char, zero: char) -> Option<char> {
    char::from_digit(c as u32 - zero as u32, 10)
}
