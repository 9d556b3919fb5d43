//! Parsing helpers shared by connectors and upload normalization.

/// Parse a number written with either `.` or `,` as decimal separator.
///
/// - Both separators present: the last one is the decimal point.
/// - Only one kind present once: it is the decimal point (`"3,5"` is 3.5).
/// - Only one kind present several times: thousands grouping (`"1.234.567"`).
///
/// Blank input, `"."`, `"NaN"`, `"ND"` and anything non-finite yield `None`.
#[must_use]
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let s: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}' && *c != '\'')
        .collect();
    if s.is_empty() || s == "." || s.eq_ignore_ascii_case("nd") {
        return None;
    }
    let commas = s.matches(',').count();
    let dots = s.matches('.').count();
    let normalized = match (commas, dots) {
        (0, _) if dots > 1 => s.replace('.', ""),
        (_, 0) if commas > 1 => s.replace(',', ""),
        (_, 0) => s.replace(',', "."),
        (0, _) => s,
        _ => {
            let last_comma = s.rfind(',').unwrap_or(0);
            let last_dot = s.rfind('.').unwrap_or(0);
            if last_comma > last_dot {
                s.replace('.', "").replace(',', ".")
            } else {
                s.replace(',', "")
            }
        }
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}
