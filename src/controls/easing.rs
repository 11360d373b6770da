/// Cubic ease-in-out on normalized progress; input is clamped to `0.0..=1.0`.
///
/// Accelerates through the first half and decelerates through the second,
/// hitting exactly `0.0` and `1.0` at the ends.
pub fn ease_in_out_cubic(p: f32) -> f32 {
    let p = p.clamp(0.0, 1.0);
    if p < 0.5 {
        4.0 * p * p * p
    } else {
        1.0 - (-2.0 * p + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert_eq!(ease_in_out_cubic(0.5), 0.5);
    }

    #[test]
    fn test_clamps_out_of_range() {
        assert_eq!(ease_in_out_cubic(-1.0), 0.0);
        assert_eq!(ease_in_out_cubic(2.0), 1.0);
    }

    #[test]
    fn test_monotonic() {
        let mut previous = ease_in_out_cubic(0.0);
        for i in 1..=1000 {
            let eased = ease_in_out_cubic(i as f32 / 1000.0);
            assert!(eased >= previous, "eased progress went backwards at step {}", i);
            previous = eased;
        }
    }

    #[test]
    fn test_slow_at_the_ends() {
        // Ease-in: early progress lags linear, late progress leads it
        assert!(ease_in_out_cubic(0.1) < 0.1);
        assert!(ease_in_out_cubic(0.9) > 0.9);
    }
}
