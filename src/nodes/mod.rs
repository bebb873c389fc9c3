//! # Nodes
//!
//! The typed node operations. Each one is a pure function of its inputs
//! (plus the injected picker or clock) and either fully succeeds or fails.
//!
//! | Node                               | Function                  |
//! |------------------------------------|---------------------------|
//! | `CheckPointSettingsPack`           | [`pack`]                  |
//! | `CheckPointSettingsUnpack`         | [`unpack`]                |
//! | `CheckPointSettingsTie`            | [`tie`]                   |
//! | `CheckPointSettingsListMerger`     | [`merge`]                 |
//! | `CheckPointSettingsRandomSelector` | [`random_select`]         |
//! | `RandomNumberChooser`              | [`random_number`]         |
//! | `CheckPointSettingsToFilename`     | [`to_filename`]           |

mod filename;
mod list;
mod pack;
mod select;

pub use filename::{strip_name, to_filename};
pub use list::{merge, tie, ListOutput};
pub use pack::{pack, unpack, Unpacked};
pub use select::{parse_number_list, random_number, random_select, NumberChoice, Selection};
