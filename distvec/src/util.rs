use crate::router::INF;
use std::cmp::min;

/// Adds two costs, saturating at INF
///
/// # Examples
///
/// ```
/// use distvec::router::INF;
/// assert_eq!(distvec::util::sum_inf(3, 4), 7);
/// assert_eq!(distvec::util::sum_inf(10, 10), INF);
/// assert_eq!(distvec::util::sum_inf(INF, 0), INF);
/// ```
pub fn sum_inf(cost_a: u16, cost_b: u16) -> u16 {
    min(INF as u32, cost_a as u32 + cost_b as u32) as u16
}

/// Shifts a cost by a signed delta, clamped to [0, INF]
///
/// # Examples
///
/// ```
/// use distvec::router::INF;
/// assert_eq!(distvec::util::shift_clamped(5, -2), 3);
/// assert_eq!(distvec::util::shift_clamped(1, -4), 0);
/// assert_eq!(distvec::util::shift_clamped(15, 3), INF);
/// ```
pub fn shift_clamped(cost: u16, delta: i32) -> u16 {
    (cost as i32 + delta).clamp(0, INF as i32) as u16
}

/// Caps a cost at INF
pub fn clamp_inf(cost: u16) -> u16 {
    min(cost, INF)
}
