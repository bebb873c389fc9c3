//! # Node Registry
//!
//! Read-only table of every node the crate provides, with the input and
//! output schema the host uses to type-check and wire the graph.
//!
//! The table is a constant: it is complete at compile time and never
//! mutated, so lookups need no synchronization.

use crate::core::{PackError, PackResult};

/// Category every node is listed under in the host's menu
pub const CATEGORY: &str = "CheckPointSettings";

/// Slots of the Tie node
pub const TIE_SLOTS: usize = 10;

/// Slots of the Merger node
pub const MERGER_SLOTS: usize = 5;

/// Which operation a node runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Pack,
    Unpack,
    Tie,
    ListMerger,
    RandomSelector,
    RandomNumber,
    ToFilename,
}

/// Type tag of a port, as the host spells it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortType {
    Settings,
    SettingsList,
    LoraStack,
    Int,
    Float,
    String,
    /// One of a host-supplied list (checkpoints, VAEs, samplers, schedulers)
    Combo,
    /// Matches any input type
    Any,
}

impl PortType {
    pub fn tag(&self) -> &'static str {
        match self {
            PortType::Settings => "CP_SETTINGS",
            PortType::SettingsList => "CP_SETTINGS_LIST",
            PortType::LoraStack => "LORA_STACK",
            PortType::Int => "INT",
            PortType::Float => "FLOAT",
            PortType::String => "STRING",
            PortType::Combo => "COMBO",
            PortType::Any => "*",
        }
    }
}

/// A declared input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputPort {
    pub name: &'static str,
    pub ty: PortType,
    pub required: bool,
    /// Default as the host displays it
    pub default: Option<&'static str>,
    /// Inclusive numeric bounds
    pub range: Option<(f64, f64)>,
}

impl InputPort {
    const fn required(name: &'static str, ty: PortType) -> Self {
        Self { name, ty, required: true, default: None, range: None }
    }

    const fn optional(name: &'static str, ty: PortType) -> Self {
        Self { name, ty, required: false, default: None, range: None }
    }

    const fn number(name: &'static str, ty: PortType, default: &'static str, min: f64, max: f64) -> Self {
        Self { name, ty, required: true, default: Some(default), range: Some((min, max)) }
    }

    const fn text(name: &'static str, default: &'static str) -> Self {
        Self { name, ty: PortType::String, required: true, default: Some(default), range: None }
    }
}

/// A declared output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputPort {
    pub name: &'static str,
    pub ty: PortType,
}

const fn out(name: &'static str, ty: PortType) -> OutputPort {
    OutputPort { name, ty }
}

/// One registered node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSpec {
    pub name: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    /// Name of the host-side entry point
    pub function: &'static str,
    pub kind: NodeKind,
    pub inputs: &'static [InputPort],
    pub outputs: &'static [OutputPort],
}

impl NodeSpec {
    pub fn input(&self, name: &str) -> Option<&InputPort> {
        self.inputs.iter().find(|p| p.name == name)
    }

    pub fn output_index(&self, name: &str) -> Option<usize> {
        self.outputs.iter().position(|p| p.name == name)
    }
}

const PACK_INPUTS: &[InputPort] = &[
    InputPort::required("ckpt_name", PortType::Combo),
    InputPort::required("vae_name", PortType::Combo),
    InputPort::number("clip_skip", PortType::Int, "-2", -24.0, 0.0),
    InputPort::number("steps", PortType::Int, "20", 1.0, 10000.0),
    InputPort::number("cfg", PortType::Float, "8.0", 0.0, 100.0),
    InputPort::required("sampler_name", PortType::Combo),
    InputPort::required("scheduler", PortType::Combo),
    InputPort::number("denoise", PortType::Float, "1.0", 0.0, 1.0),
    InputPort::optional("optional_lora_stack", PortType::LoraStack),
];

const UNPACK_OUTPUTS: &[OutputPort] = &[
    out("settings", PortType::Settings),
    out("optional_lora_stack", PortType::LoraStack),
    out("ckpt_name", PortType::Any),
    out("vae_name", PortType::Any),
    out("clip_skip", PortType::Int),
    out("steps", PortType::Int),
    out("cfg", PortType::Float),
    out("sampler_name", PortType::Any),
    out("scheduler", PortType::Any),
    out("denoise", PortType::Float),
];

const TIE_INPUTS: &[InputPort] = &[
    InputPort::optional("base_settings_list", PortType::SettingsList),
    InputPort::optional("settings0", PortType::Settings),
    InputPort::optional("settings1", PortType::Settings),
    InputPort::optional("settings2", PortType::Settings),
    InputPort::optional("settings3", PortType::Settings),
    InputPort::optional("settings4", PortType::Settings),
    InputPort::optional("settings5", PortType::Settings),
    InputPort::optional("settings6", PortType::Settings),
    InputPort::optional("settings7", PortType::Settings),
    InputPort::optional("settings8", PortType::Settings),
    InputPort::optional("settings9", PortType::Settings),
];

const MERGER_INPUTS: &[InputPort] = &[
    InputPort::optional("settings_list0", PortType::SettingsList),
    InputPort::optional("settings_list1", PortType::SettingsList),
    InputPort::optional("settings_list2", PortType::SettingsList),
    InputPort::optional("settings_list3", PortType::SettingsList),
    InputPort::optional("settings_list4", PortType::SettingsList),
];

const LIST_OUTPUTS: &[OutputPort] = &[
    out("settings_list", PortType::SettingsList),
    out("size", PortType::Int),
];

/// Every node, in menu order
pub const NODES: &[NodeSpec] = &[
    NodeSpec {
        name: "CheckPointSettingsPack",
        display_name: "CheckPointSettingsPack",
        category: CATEGORY,
        function: "packSettings",
        kind: NodeKind::Pack,
        inputs: PACK_INPUTS,
        outputs: &[out("settings", PortType::Settings)],
    },
    NodeSpec {
        name: "CheckPointSettingsUnpack",
        display_name: "CheckPointSettingsUnpack",
        category: CATEGORY,
        function: "unpackSettings",
        kind: NodeKind::Unpack,
        inputs: &[InputPort::required("settings", PortType::Settings)],
        outputs: UNPACK_OUTPUTS,
    },
    NodeSpec {
        name: "CheckPointSettingsTie",
        display_name: "CheckPointSettingsTie",
        category: CATEGORY,
        function: "tie",
        kind: NodeKind::Tie,
        inputs: TIE_INPUTS,
        outputs: LIST_OUTPUTS,
    },
    NodeSpec {
        name: "CheckPointSettingsListMerger",
        display_name: "CheckPointSettingsListMerger",
        category: CATEGORY,
        function: "tie",
        kind: NodeKind::ListMerger,
        inputs: MERGER_INPUTS,
        outputs: LIST_OUTPUTS,
    },
    NodeSpec {
        name: "CheckPointSettingsRandomSelector",
        display_name: "CheckPointSettingsRandomSelector",
        category: CATEGORY,
        function: "index_switch",
        kind: NodeKind::RandomSelector,
        inputs: &[
            InputPort::required("settings_list", PortType::SettingsList),
            InputPort::required("seed", PortType::Int),
        ],
        outputs: &[out("settings", PortType::Settings), out("index", PortType::Int)],
    },
    NodeSpec {
        name: "RandomNumberChooser",
        display_name: "RandomNumberChooser",
        category: CATEGORY,
        function: "choose",
        kind: NodeKind::RandomNumber,
        inputs: &[
            InputPort::text("numbers", "0.0|0.5|1.0"),
            InputPort::required("seed", PortType::Int),
        ],
        outputs: &[
            out("value", PortType::Float),
            out("rounded", PortType::Int),
            out("index", PortType::Int),
        ],
    },
    NodeSpec {
        name: "CheckPointSettingsToFilename",
        display_name: "CheckPointSettingsToFilename",
        category: CATEGORY,
        function: "makeFilename",
        kind: NodeKind::ToFilename,
        inputs: &[
            InputPort::required("settings", PortType::Settings),
            InputPort::text("format", crate::core::config::DEFAULT_TEMPLATE),
        ],
        outputs: &[out("filename", PortType::String)],
    },
];

/// Find a node by its registered name
pub fn lookup(name: &str) -> PackResult<&'static NodeSpec> {
    NODES
        .iter()
        .find(|n| n.name == name)
        .ok_or_else(|| PackError::UnknownNode(name.to_string()))
}

/// Registered names, in menu order
pub fn node_names() -> impl Iterator<Item = &'static str> {
    NODES.iter().map(|n| n.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_unique() {
        let names: HashSet<_> = node_names().collect();
        assert_eq!(names.len(), NODES.len());
        assert_eq!(NODES.len(), 7);
    }

    #[test]
    fn test_lookup() {
        let spec = lookup("CheckPointSettingsTie").unwrap();
        assert_eq!(spec.kind, NodeKind::Tie);
        assert_eq!(spec.category, CATEGORY);
        assert_eq!(spec.inputs.len(), TIE_SLOTS + 1);

        assert_eq!(
            lookup("KSampler"),
            Err(PackError::UnknownNode("KSampler".to_string()))
        );
    }

    #[test]
    fn test_merger_slots() {
        let spec = lookup("CheckPointSettingsListMerger").unwrap();
        assert_eq!(spec.inputs.len(), MERGER_SLOTS);
        assert!(spec.inputs.iter().all(|p| !p.required));
    }

    #[test]
    fn test_pack_defaults() {
        let spec = lookup("CheckPointSettingsPack").unwrap();
        let clip = spec.input("clip_skip").unwrap();
        assert_eq!(clip.default, Some("-2"));
        assert_eq!(clip.range, Some((-24.0, 0.0)));
        assert_eq!(spec.input("steps").unwrap().range, Some((1.0, 10000.0)));
        assert!(!spec.input("optional_lora_stack").unwrap().required);
    }

    #[test]
    fn test_unpack_output_order() {
        let spec = lookup("CheckPointSettingsUnpack").unwrap();
        assert_eq!(spec.output_index("settings"), Some(0));
        for (i, field) in crate::core::SettingsBundle::FIELDS.iter().enumerate() {
            assert_eq!(spec.output_index(field), Some(i + 1));
        }
    }

    #[test]
    fn test_type_tags() {
        assert_eq!(PortType::Settings.tag(), "CP_SETTINGS");
        assert_eq!(PortType::SettingsList.tag(), "CP_SETTINGS_LIST");
        assert_eq!(PortType::Any.tag(), "*");
    }
}
