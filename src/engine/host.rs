//! # Node Host
//!
//! The main entry point.
//!
//! This struct wires together:
//! - Index picker (seeded selection port)
//! - Clock (filename port)
//! - Configuration
//!
//! And exposes both the typed node operations and `invoke`, which runs a
//! node by its registered name over dynamic `Value`s.

use tracing::{debug, debug_span};

use crate::adapters::{ChaChaPicker, SystemClock};
use crate::core::{PackConfig, PackResult, Settings, SettingsBundle, SettingsList};
use crate::engine::registry::{self, NodeKind, MERGER_SLOTS, TIE_SLOTS};
use crate::engine::value::{InputReader, Inputs, Value};
use crate::nodes::{self, ListOutput, NumberChoice, Selection, Unpacked};
use crate::ports::{Clock, IndexPicker};

/// Runs nodes for the host
pub struct NodeHost {
    /// Configuration
    config: PackConfig,

    /// Seeded index draw (selector port)
    picker: Box<dyn IndexPicker>,

    /// Wall clock (filename port)
    clock: Box<dyn Clock>,
}

impl Default for NodeHost {
    fn default() -> Self {
        Self::new(PackConfig::default())
    }
}

impl NodeHost {
    /// Create a host with the default adapters
    ///
    /// Uses `ChaChaPicker` and `SystemClock`.
    pub fn new(config: PackConfig) -> Self {
        Self {
            config,
            picker: Box::new(ChaChaPicker::new()),
            clock: Box::new(SystemClock),
        }
    }

    /// Create with custom adapters
    pub fn with_adapters(
        config: PackConfig,
        picker: Box<dyn IndexPicker>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            config,
            picker,
            clock,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    // ========================================================================
    // TYPED OPERATIONS
    // ========================================================================

    pub fn pack(&self, fields: SettingsBundle) -> Settings {
        nodes::pack(&self.config, fields)
    }

    pub fn unpack(&self, settings: &Settings) -> PackResult<Unpacked> {
        nodes::unpack(settings)
    }

    pub fn tie<'a, I>(&self, base: Option<&SettingsList>, slots: I) -> ListOutput
    where
        I: IntoIterator<Item = &'a Settings>,
    {
        nodes::tie(&self.config, base, slots)
    }

    pub fn merge<'a, I>(&self, lists: I) -> ListOutput
    where
        I: IntoIterator<Item = Option<&'a SettingsList>>,
    {
        nodes::merge(lists)
    }

    pub fn random_select(&self, list: &SettingsList, seed: u64) -> PackResult<Selection> {
        nodes::random_select(self.picker.as_ref(), list, seed)
    }

    pub fn random_number(&self, numbers: &str, seed: u64) -> PackResult<NumberChoice> {
        nodes::random_number(self.picker.as_ref(), numbers, seed)
    }

    /// Render a filename; `None` uses the configured default template
    pub fn to_filename(&self, settings: &Settings, template: Option<&str>) -> PackResult<String> {
        let template = template.unwrap_or(&self.config.default_template);
        nodes::to_filename(&self.config, self.clock.as_ref(), settings, template)
    }

    // ========================================================================
    // DYNAMIC INVOCATION
    // ========================================================================

    /// Run a node by registered name
    ///
    /// Outputs come back in the order the registry declares them.
    pub fn invoke(&self, name: &str, inputs: &Inputs) -> PackResult<Vec<Value>> {
        let spec = registry::lookup(name)?;
        let _span = debug_span!("node", node = spec.name).entered();
        let r = InputReader::new(inputs);

        let outputs: Vec<Value> = match spec.kind {
            NodeKind::Pack => {
                let fields = SettingsBundle {
                    ckpt_name: r.string("ckpt_name")?.to_string(),
                    vae_name: r.string("vae_name")?.to_string(),
                    clip_skip: r.int("clip_skip")?,
                    steps: r.int("steps")?,
                    cfg: r.float("cfg")?,
                    sampler_name: r.string("sampler_name")?.to_string(),
                    scheduler: r.string("scheduler")?.to_string(),
                    denoise: r.float("denoise")?,
                    optional_lora_stack: r.opt_lora_stack("optional_lora_stack")?,
                };
                vec![self.pack(fields).into()]
            }
            NodeKind::Unpack => {
                let u = self.unpack(r.settings("settings")?)?;
                vec![
                    Value::Settings(Settings::Present(u.settings)),
                    u.optional_lora_stack.into(),
                    u.ckpt_name.into(),
                    u.vae_name.into(),
                    u.clip_skip.into(),
                    u.steps.into(),
                    u.cfg.into(),
                    u.sampler_name.into(),
                    u.scheduler.into(),
                    u.denoise.into(),
                ]
            }
            NodeKind::Tie => {
                let base = r.opt_settings_list("base_settings_list")?;
                let mut slots = Vec::with_capacity(TIE_SLOTS);
                for i in 0..TIE_SLOTS {
                    if let Some(s) = r.opt_settings(&format!("settings{}", i))? {
                        slots.push(s);
                    }
                }
                list_values(self.tie(base, slots))
            }
            NodeKind::ListMerger => {
                let lists = (0..MERGER_SLOTS)
                    .map(|i| r.opt_settings_list(&format!("settings_list{}", i)))
                    .collect::<PackResult<Vec<_>>>()?;
                list_values(self.merge(lists))
            }
            NodeKind::RandomSelector => {
                let sel = self.random_select(r.settings_list("settings_list")?, r.seed("seed")?)?;
                vec![sel.settings.into(), sel.index.into()]
            }
            NodeKind::RandomNumber => {
                let choice = self.random_number(r.string("numbers")?, r.seed("seed")?)?;
                vec![choice.value.into(), choice.rounded.into(), choice.index.into()]
            }
            NodeKind::ToFilename => {
                let filename = self.to_filename(r.settings("settings")?, r.opt_string("format")?)?;
                vec![filename.into()]
            }
        };

        debug_assert_eq!(outputs.len(), spec.outputs.len());
        debug!(outputs = outputs.len(), "node done");
        Ok(outputs)
    }
}

fn list_values(out: ListOutput) -> Vec<Value> {
    vec![out.settings_list.into(), out.size.into()]
}
