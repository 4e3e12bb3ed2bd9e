//! Display formatting for currency and percentages.

const RUPEE: char = '₹';

/// Clamp to a displayable, non-negative amount.
fn sanitize(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Full currency display: `4000.0 -> "₹4,000"`, `1234.5 -> "₹1,234.5"`.
pub fn inr(amount: f64) -> String {
    let paise = (sanitize(amount) * 100.0).round() as u64;
    let mut out = String::new();
    out.push(RUPEE);
    out.push_str(&group_thousands(paise / 100));
    let frac = paise % 100;
    if frac != 0 {
        let digits = format!("{frac:02}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

/// Compact thousands display for dashboard cards: `18320.0 -> "₹18.3k"`.
pub fn inr_compact(amount: f64) -> String {
    format!("{RUPEE}{:.1}k", sanitize(amount) / 1000.0)
}

/// `round(fraction * 100, 1)`. Non-finite input maps to 0.
pub fn percent_one_decimal(fraction: f64) -> f64 {
    if !fraction.is_finite() {
        return 0.0;
    }
    (fraction * 1000.0).round() / 10.0
}

/// `0.823 -> "82.3%"`.
pub fn percent_label(fraction: f64) -> String {
    format!("{:.1}%", percent_one_decimal(fraction))
}
