//! Seeded random selection over settings lists and numeric lists.

use tracing::debug;

use crate::core::{PackError, PackResult, Settings, SettingsList};
use crate::ports::IndexPicker;

/// Separator of the numeric list text
pub const NUMBER_SEPARATOR: char = '|';

/// The picked settings and where they came from
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub settings: Settings,
    pub index: usize,
}

/// Pick one element of `list`, determined by `seed`
pub fn random_select(
    picker: &dyn IndexPicker,
    list: &SettingsList,
    seed: u64,
) -> PackResult<Selection> {
    let index = picker.pick(list.len(), seed)?;
    let settings = list.get(index).cloned().ok_or_else(|| {
        PackError::Range(format!("picker returned {} for {} entries", index, list.len()))
    })?;

    debug!(picker = picker.name(), seed, index, len = list.len(), "random_select");
    Ok(Selection { settings, index })
}

/// The picked number, rounded, and its position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberChoice {
    pub value: f64,
    pub rounded: i64,
    pub index: usize,
}

/// Parse `"0.0|0.125|0.25"` into floats
///
/// Whitespace around a token is ignored, as Python's `float()` does.
/// Anything else that is not a float, including an empty token, fails.
pub fn parse_number_list(text: &str) -> PackResult<Vec<f64>> {
    text.split(NUMBER_SEPARATOR)
        .map(|token| {
            token.trim().parse::<f64>().map_err(|_| PackError::Parse {
                token: token.to_string(),
            })
        })
        .collect()
}

/// Pick one number of a `|`-separated list, determined by `seed`
///
/// Rounding is half-to-even: `0.5 -> 0`, `1.5 -> 2`, `2.5 -> 2`.
pub fn random_number(picker: &dyn IndexPicker, text: &str, seed: u64) -> PackResult<NumberChoice> {
    let values = parse_number_list(text)?;
    let index = picker.pick(values.len(), seed)?;
    let value = values.get(index).copied().ok_or_else(|| {
        PackError::Range(format!("picker returned {} for {} numbers", index, values.len()))
    })?;
    let rounded = round_to_int(value)?;

    debug!(picker = picker.name(), seed, index, value, "random_number");
    Ok(NumberChoice { value, rounded, index })
}

/// Round half-to-even into an `i64`
pub(crate) fn round_to_int(value: f64) -> PackResult<i64> {
    let r = value.round_ties_even();
    // i64::MAX as f64 is 2^63, one past the largest representable value
    if !r.is_finite() || r < i64::MIN as f64 || r >= i64::MAX as f64 {
        return Err(PackError::Range(format!("{} does not fit an integer", value)));
    }
    Ok(r as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ChaChaPicker;
    use crate::core::SettingsBundle;
    use crate::ports::FixedPicker;

    fn list(n: usize) -> SettingsList {
        (0..n)
            .map(|i| Settings::Present(SettingsBundle::new(format!("m{}.ckpt", i), "Baked VAE")))
            .collect()
    }

    #[test]
    fn test_select_deterministic() {
        let items = list(7);
        let first = random_select(&ChaChaPicker, &items, 123_456).unwrap();
        for _ in 0..5 {
            let again = random_select(&ChaChaPicker, &items, 123_456).unwrap();
            assert_eq!(again, first);
        }
        assert_eq!(first.settings, items[first.index]);
    }

    #[test]
    fn test_select_same_length_same_index() {
        let a = list(5);
        let b: SettingsList = (0..5)
            .map(|i| Settings::Present(SettingsBundle::new(format!("other{}", i), "x.vae")))
            .collect();
        for seed in [0, 1, 99, u64::MAX] {
            let ia = random_select(&ChaChaPicker, &a, seed).unwrap().index;
            let ib = random_select(&ChaChaPicker, &b, seed).unwrap().index;
            assert_eq!(ia, ib);
        }
    }

    #[test]
    fn test_select_single() {
        let items = list(1);
        for seed in [0, 7, 1 << 40] {
            assert_eq!(random_select(&ChaChaPicker, &items, seed).unwrap().index, 0);
        }
    }

    #[test]
    fn test_select_empty() {
        assert_eq!(
            random_select(&ChaChaPicker, &vec![], 1),
            Err(PackError::EmptyInput)
        );
    }

    #[test]
    fn test_select_fixed_picker() {
        let items = list(3);
        let sel = random_select(&FixedPicker::new(2), &items, 0).unwrap();
        assert_eq!(sel.index, 2);
        assert_eq!(sel.settings, items[2]);
    }

    #[test]
    fn test_parse_number_list() {
        assert_eq!(parse_number_list("0.0|0.125|0.25").unwrap(), vec![0.0, 0.125, 0.25]);
        assert_eq!(parse_number_list("3").unwrap(), vec![3.0]);
        assert_eq!(parse_number_list(" 1.5 | -2").unwrap(), vec![1.5, -2.0]);
    }

    #[test]
    fn test_parse_number_list_malformed() {
        assert_eq!(
            parse_number_list("0.1|abc"),
            Err(PackError::Parse { token: "abc".into() })
        );
        assert!(matches!(parse_number_list(""), Err(PackError::Parse { .. })));
        assert!(matches!(parse_number_list("1||2"), Err(PackError::Parse { .. })));
        assert!(matches!(parse_number_list("1| |2"), Err(PackError::Parse { .. })));
    }

    #[test]
    fn test_random_number_index_one() {
        let choice = random_number(&FixedPicker::new(1), "0.0|0.125|0.25", 5).unwrap();
        assert_eq!(choice.index, 1);
        assert_eq!(choice.value, 0.125);
        assert_eq!(choice.rounded, 0);
    }

    #[test]
    fn test_random_number_seeded() {
        let text = "1|2|3|4|5|6";
        let a = random_number(&ChaChaPicker, text, 31337).unwrap();
        let b = random_number(&ChaChaPicker, text, 31337).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.value, (a.index + 1) as f64);
    }

    #[test]
    fn test_round_half_to_even() {
        assert_eq!(round_to_int(0.5).unwrap(), 0);
        assert_eq!(round_to_int(1.5).unwrap(), 2);
        assert_eq!(round_to_int(2.5).unwrap(), 2);
        assert_eq!(round_to_int(-0.5).unwrap(), 0);
        assert_eq!(round_to_int(-1.5).unwrap(), -2);
        assert_eq!(round_to_int(2.6).unwrap(), 3);
    }

    #[test]
    fn test_round_out_of_range() {
        assert!(matches!(round_to_int(f64::NAN), Err(PackError::Range(_))));
        assert!(matches!(round_to_int(f64::INFINITY), Err(PackError::Range(_))));
        assert!(matches!(round_to_int(1e19), Err(PackError::Range(_))));
    }

    #[test]
    fn test_random_number_nan_is_range_error() {
        let result = random_number(&FixedPicker::new(0), "nan", 0);
        assert!(matches!(result, Err(PackError::Range(_))));
    }
}
