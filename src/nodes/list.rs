//! Tie and Merger: fan-in of bundles and lists.
//!
//! Tie drops absent slots and slots whose checkpoint is the none-marker.
//! Merger concatenates lists as they are.

use tracing::debug;

use crate::core::{PackConfig, Settings, SettingsList};

/// A combined list and its length
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListOutput {
    pub settings_list: SettingsList,
    pub size: usize,
}

impl ListOutput {
    fn new(settings_list: SettingsList) -> Self {
        let size = settings_list.len();
        Self { settings_list, size }
    }
}

/// Append real bundles to an optional base list, in slot order
pub fn tie<'a, I>(config: &PackConfig, base: Option<&SettingsList>, slots: I) -> ListOutput
where
    I: IntoIterator<Item = &'a Settings>,
{
    let mut out: SettingsList = base.cloned().unwrap_or_default();
    let mut dropped = 0usize;

    for slot in slots {
        match slot {
            Settings::Present(b) if !config.is_none_marker(&b.ckpt_name) => {
                out.push(slot.clone());
            }
            _ => dropped += 1,
        }
    }

    debug!(size = out.len(), dropped, "tie");
    ListOutput::new(out)
}

/// Concatenate every present list, in slot order
pub fn merge<'a, I>(lists: I) -> ListOutput
where
    I: IntoIterator<Item = Option<&'a SettingsList>>,
{
    let out: SettingsList = lists.into_iter().flatten().flatten().cloned().collect();
    debug!(size = out.len(), "merge");
    ListOutput::new(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SettingsBundle;

    fn bundle(name: &str) -> Settings {
        Settings::Present(SettingsBundle::new(name, "Baked VAE"))
    }

    #[test]
    fn test_tie_drops_absent_keeps_order() {
        let config = PackConfig::default();
        let b1 = bundle("one.safetensors");
        let b2 = bundle("two.safetensors");

        let out = tie(&config, Some(&vec![]), [&b1, &Settings::Absent, &b2]);

        assert_eq!(out.settings_list, vec![b1, b2]);
        assert_eq!(out.size, 2);
    }

    #[test]
    fn test_tie_drops_none_marker_bundle() {
        let config = PackConfig::default();
        let real = bundle("real.ckpt");
        let marker = bundle("None");

        let out = tie(&config, None, [&marker, &real]);
        assert_eq!(out.settings_list, vec![real]);
    }

    #[test]
    fn test_tie_base_first() {
        let config = PackConfig::default();
        let base = vec![bundle("base0"), bundle("base1")];
        let extra = bundle("extra");

        let out = tie(&config, Some(&base), [&extra]);

        let names: Vec<_> = out
            .settings_list
            .iter()
            .map(|s| s.as_bundle().unwrap().ckpt_name.as_str())
            .collect();
        assert_eq!(names, ["base0", "base1", "extra"]);
        assert_eq!(out.size, 3);
    }

    #[test]
    fn test_tie_nothing() {
        let out = tie(&PackConfig::default(), None, Vec::<&Settings>::new());
        assert_eq!(out, ListOutput::default());
    }

    #[test]
    fn test_merge_concatenates() {
        let a = vec![bundle("a")];
        let b = vec![bundle("b")];

        let out = merge([Some(&a), None, Some(&b)]);
        assert_eq!(out.settings_list, vec![bundle("a"), bundle("b")]);
        assert_eq!(out.size, 2);
    }

    #[test]
    fn test_merge_empty_lists() {
        let empty: SettingsList = vec![];
        let out = merge([Some(&empty), Some(&empty)]);
        assert!(out.settings_list.is_empty());
        assert_eq!(out.size, 0);
    }

    #[test]
    fn test_merge_keeps_absent_entries() {
        let list = vec![bundle("a"), Settings::Absent];
        let out = merge([Some(&list)]);
        assert_eq!(out.size, 2);
        assert!(out.settings_list[1].is_absent());
    }
}
