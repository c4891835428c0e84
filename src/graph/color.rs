// Center-node color blending
//
// The net-worth node shifts from red to green as profits outweigh expenses.

/// Plain RGB triple, independent of any terminal color type
pub type Rgb = (u8, u8, u8);

/// Color used when every category is an income source
/// RGB: (76, 175, 80)
pub const PROFIT_RGB: Rgb = (76, 175, 80);

/// Color used when every category is spending
/// RGB: (244, 67, 54)
pub const EXPENSE_RGB: Rgb = (244, 67, 54);

/// Color used when there is no activity at all
/// RGB: (158, 158, 158)
pub const NEUTRAL_RGB: Rgb = (158, 158, 158);

/// Blend between the expense and profit colors by the profit share
///
/// Returns `NEUTRAL_RGB` when both totals are zero. Each channel is rounded
/// to the nearest integer.
pub fn interpolate_center_color(total_profits: f64, total_expenses: f64) -> Rgb {
    let sum = total_profits + total_expenses;
    if sum == 0.0 || !sum.is_finite() {
        return NEUTRAL_RGB;
    }

    let profit_ratio = (total_profits / sum).clamp(0.0, 1.0);
    let expense_ratio = 1.0 - profit_ratio;
    let channel = |expense: u8, profit: u8| -> u8 {
        (expense as f64 * expense_ratio + profit as f64 * profit_ratio)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    (
        channel(EXPENSE_RGB.0, PROFIT_RGB.0),
        channel(EXPENSE_RGB.1, PROFIT_RGB.1),
        channel(EXPENSE_RGB.2, PROFIT_RGB.2),
    )
}
