/// Parses a user-entered field the way a browser `parseFloat` does: leading
/// whitespace is skipped and the longest numeric prefix is read, so `"7%"`
/// gives 7. Anything without a numeric prefix becomes 0; no error is raised.
///
/// Non-finite results also become 0. A browser keeps `"Infinity"` as
/// infinity, which would make the monthly loop unbounded.
pub fn parse_number_or_zero(raw: &str) -> f64 {
    match numeric_prefix(raw.trim_start()).and_then(|s| s.parse::<f64>().ok()) {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

fn take_digits(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    pos
}

/// Longest prefix of the form `[+-]?(digits[.digits]|.digits)([eE][+-]?digits)?`,
/// rebuilt so every part has at least one digit.
fn numeric_prefix(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut pos = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            pos = 1;
            true
        }
        Some(b'+') => {
            pos = 1;
            false
        }
        _ => false,
    };

    let int_end = take_digits(bytes, pos);
    let int_part = &s[pos..int_end];
    pos = int_end;

    let mut frac_part = "";
    if bytes.get(pos) == Some(&b'.') {
        let frac_end = take_digits(bytes, pos + 1);
        frac_part = &s[pos + 1..frac_end];
        pos = frac_end;
    }
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut exponent = String::new();
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp_pos = pos + 1;
        let exp_negative = bytes.get(exp_pos) == Some(&b'-');
        if matches!(bytes.get(exp_pos), Some(b'+' | b'-')) {
            exp_pos += 1;
        }
        let exp_end = take_digits(bytes, exp_pos);
        if exp_end > exp_pos {
            let sign = if exp_negative { "-" } else { "" };
            exponent = format!("e{sign}{}", &s[exp_pos..exp_end]);
        }
    }

    Some(format!(
        "{}{}.{}{}",
        if negative { "-" } else { "" },
        if int_part.is_empty() { "0" } else { int_part },
        if frac_part.is_empty() { "0" } else { frac_part },
        exponent
    ))
}

/// Missing fields coerce to 0 like unparsable ones.
pub fn coerce_number(raw: Option<&str>) -> f64 {
    raw.map(parse_number_or_zero).unwrap_or(0.0)
}

/// Rounds to the nearest integer with halves going toward positive infinity
/// (`2.5 -> 3`, `-2.5 -> -2`). NaN and infinities pass through.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}
