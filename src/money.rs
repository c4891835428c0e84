// Money formatting helpers
//
// Display amounts use a dollar sign with two decimals. The amount input in
// entry forms is a digits-only cents mask shown as `1.234,56`.

/// Format an amount as `$1234.50` (negative values as `-$50.00`)
pub fn format_money(amount: f64) -> String {
    let cents = (amount * 100.0).round();
    if cents < 0.0 {
        format!("-${:.2}", -cents / 100.0)
    } else {
        // Adding zero turns -0.0 into 0.0
        format!("${:.2}", (cents + 0.0) / 100.0)
    }
}

/// Render a cents value with `.` thousands separators and a `,` decimal mark
pub fn format_cents_mask(cents: u64) -> String {
    let digits = format!("{:03}", cents);
    let (integer, decimal) = digits.split_at(digits.len() - 2);

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{},{}", grouped, decimal)
}

pub fn cents_to_amount(cents: u64) -> f64 {
    cents as f64 / 100.0
}

/// Nearest whole cents for a decimal amount; negatives clamp to zero
pub fn amount_to_cents(amount: f64) -> u64 {
    if !amount.is_finite() || amount <= 0.0 {
        return 0;
    }
    (amount * 100.0).round() as u64
}
