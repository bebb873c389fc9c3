//! # Core
//!
//! Pure data, no I/O.
//!
//! - `SettingsBundle`: one checkpoint + sampler setup
//! - `Settings`: a bundle or the absent sentinel
//! - `SettingsList`: what Tie and Merger build
//! - `LoraEntry` / `LoraStack`: adapter stack carried along untouched

pub mod config;
pub mod error;
pub mod template;

use serde::{Deserialize, Serialize};

pub use config::PackConfig;
pub use template::FieldValue;
pub use error::{PackError, PackResult};

/// One adapter in a lora stack: `(lora_name, model_strength, clip_strength)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoraEntry {
    pub lora_name: String,
    pub model_strength: f64,
    pub clip_strength: f64,
}

impl LoraEntry {
    pub fn new(lora_name: impl Into<String>, model_strength: f64, clip_strength: f64) -> Self {
        Self {
            lora_name: lora_name.into(),
            model_strength,
            clip_strength,
        }
    }
}

/// Ordered adapter stack, applied by the host in order
pub type LoraStack = Vec<LoraEntry>;

/// A packed checkpoint + sampler configuration
///
/// Immutable once packed: nodes only read it. The setters exist to
/// assemble the fields before handing them to `pack`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsBundle {
    pub ckpt_name: String,
    pub vae_name: String,
    pub clip_skip: i64,
    pub steps: i64,
    pub cfg: f64,
    pub sampler_name: String,
    pub scheduler: String,
    pub denoise: f64,
    pub optional_lora_stack: Option<LoraStack>,
}

impl SettingsBundle {
    /// Field names in unpack order (after the bundle itself)
    pub const FIELDS: [&'static str; 9] = [
        "optional_lora_stack",
        "ckpt_name",
        "vae_name",
        "clip_skip",
        "steps",
        "cfg",
        "sampler_name",
        "scheduler",
        "denoise",
    ];

    /// Create a bundle with the host's default sampler fields
    pub fn new(ckpt_name: impl Into<String>, vae_name: impl Into<String>) -> Self {
        Self {
            ckpt_name: ckpt_name.into(),
            vae_name: vae_name.into(),
            clip_skip: -2,
            steps: 20,
            cfg: 8.0,
            sampler_name: "euler".to_string(),
            scheduler: "normal".to_string(),
            denoise: 1.0,
            optional_lora_stack: None,
        }
    }

    pub fn with_clip_skip(mut self, clip_skip: i64) -> Self {
        self.clip_skip = clip_skip;
        self
    }

    pub fn with_steps(mut self, steps: i64) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_cfg(mut self, cfg: f64) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn with_sampler(mut self, sampler_name: impl Into<String>, scheduler: impl Into<String>) -> Self {
        self.sampler_name = sampler_name.into();
        self.scheduler = scheduler.into();
        self
    }

    pub fn with_denoise(mut self, denoise: f64) -> Self {
        self.denoise = denoise;
        self
    }

    pub fn with_lora_stack(mut self, stack: LoraStack) -> Self {
        self.optional_lora_stack = Some(stack);
        self
    }

    /// A field as a typed template value
    ///
    /// Returns `None` for names that are not bundle fields.
    pub fn field_value(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "ckpt_name" => FieldValue::Text(self.ckpt_name.clone()),
            "vae_name" => FieldValue::Text(self.vae_name.clone()),
            "clip_skip" => FieldValue::Int(self.clip_skip),
            "steps" => FieldValue::Int(self.steps),
            "cfg" => FieldValue::Float(self.cfg),
            "sampler_name" => FieldValue::Text(self.sampler_name.clone()),
            "scheduler" => FieldValue::Text(self.scheduler.clone()),
            "denoise" => FieldValue::Float(self.denoise),
            "optional_lora_stack" => {
                FieldValue::Text(lora_stack_text(self.optional_lora_stack.as_deref()))
            }
            _ => return None,
        };
        Some(value)
    }

    /// Render a field the way a Python `str()` call would
    pub fn field_text(&self, name: &str) -> Option<String> {
        self.field_value(name).map(|v| v.to_text())
    }
}

/// `None` or `[('a.safetensors', 1.0, 0.5), ...]`
fn lora_stack_text(stack: Option<&[LoraEntry]>) -> String {
    match stack {
        None => "None".to_string(),
        Some(entries) => {
            let items: Vec<String> = entries
                .iter()
                .map(|e| {
                    format!(
                        "({}, {}, {})",
                        template::py_repr_str(&e.lora_name),
                        template::float_text(e.model_strength),
                        template::float_text(e.clip_strength)
                    )
                })
                .collect();
            format!("[{}]", items.join(", "))
        }
    }
}

/// A settings slot: a real bundle, or the absent sentinel
///
/// Serializes as the bundle or `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<SettingsBundle>", into = "Option<SettingsBundle>")]
pub enum Settings {
    /// No real settings here
    #[default]
    Absent,
    /// A packed bundle
    Present(SettingsBundle),
}

impl Settings {
    pub fn is_absent(&self) -> bool {
        matches!(self, Settings::Absent)
    }

    pub fn as_bundle(&self) -> Option<&SettingsBundle> {
        match self {
            Settings::Present(b) => Some(b),
            Settings::Absent => None,
        }
    }

    /// Borrow the bundle, or fail naming the field the caller wanted
    pub fn require(&self, field: &str) -> PackResult<&SettingsBundle> {
        self.as_bundle().ok_or_else(|| PackError::missing(field))
    }
}

impl From<SettingsBundle> for Settings {
    fn from(bundle: SettingsBundle) -> Self {
        Settings::Present(bundle)
    }
}

impl From<Option<SettingsBundle>> for Settings {
    fn from(bundle: Option<SettingsBundle>) -> Self {
        bundle.map_or(Settings::Absent, Settings::Present)
    }
}

impl From<Settings> for Option<SettingsBundle> {
    fn from(settings: Settings) -> Self {
        match settings {
            Settings::Present(b) => Some(b),
            Settings::Absent => None,
        }
    }
}

/// Ordered settings, as built by Tie and Merger
pub type SettingsList = Vec<Settings>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SettingsBundle {
        SettingsBundle::new("sd/model.safetensors", "Baked VAE")
            .with_cfg(7.5)
            .with_steps(30)
    }

    #[test]
    fn test_bundle_defaults() {
        let b = SettingsBundle::new("a.ckpt", "Baked VAE");
        assert_eq!(b.clip_skip, -2);
        assert_eq!(b.steps, 20);
        assert_eq!(b.cfg, 8.0);
        assert_eq!(b.denoise, 1.0);
        assert!(b.optional_lora_stack.is_none());
    }

    #[test]
    fn test_field_text() {
        let b = sample();
        assert_eq!(b.field_text("ckpt_name").as_deref(), Some("sd/model.safetensors"));
        assert_eq!(b.field_text("cfg").as_deref(), Some("7.5"));
        assert_eq!(b.field_text("steps").as_deref(), Some("30"));
        assert_eq!(b.field_text("denoise").as_deref(), Some("1.0"));
        assert_eq!(b.field_text("clip_skip").as_deref(), Some("-2"));
        assert_eq!(b.field_text("optional_lora_stack").as_deref(), Some("None"));
        assert_eq!(b.field_text("seed"), None);
    }

    #[test]
    fn test_lora_stack_text() {
        let b = sample().with_lora_stack(vec![
            LoraEntry::new("detail.safetensors", 1.0, 0.5),
            LoraEntry::new("style.safetensors", 0.8, 0.8),
        ]);
        assert_eq!(
            b.field_text("optional_lora_stack").unwrap(),
            "[('detail.safetensors', 1.0, 0.5), ('style.safetensors', 0.8, 0.8)]"
        );
    }

    #[test]
    fn test_lora_stack_text_quotes_like_python() {
        let b = sample().with_lora_stack(vec![
            LoraEntry::new("bob's.safetensors", 1.0, 1.0),
            LoraEntry::new(r#"a'b"c"#, 0.5, 0.5),
        ]);
        assert_eq!(
            b.field_text("optional_lora_stack").unwrap(),
            r#"[("bob's.safetensors", 1.0, 1.0), ('a\'b"c', 0.5, 0.5)]"#
        );
    }

    #[test]
    fn test_field_value_types() {
        let b = sample();
        assert_eq!(b.field_value("steps"), Some(FieldValue::Int(30)));
        assert_eq!(b.field_value("cfg"), Some(FieldValue::Float(7.5)));
        assert_eq!(
            b.field_value("sampler_name"),
            Some(FieldValue::Text("euler".to_string()))
        );
    }

    #[test]
    fn test_fields_are_all_renderable() {
        let b = sample();
        for field in SettingsBundle::FIELDS {
            assert!(b.field_text(field).is_some(), "{field} not renderable");
        }
    }

    #[test]
    fn test_settings_require() {
        let present = Settings::from(sample());
        assert!(present.require("cfg").is_ok());

        let absent = Settings::Absent;
        assert!(absent.is_absent());
        assert_eq!(
            absent.require("cfg"),
            Err(PackError::MissingField { field: "cfg".into() })
        );
    }

    #[test]
    fn test_settings_serde_null_is_absent() {
        let absent: Settings = serde_json::from_str("null").unwrap();
        assert_eq!(absent, Settings::Absent);
        assert_eq!(serde_json::to_string(&Settings::Absent).unwrap(), "null");

        let present = Settings::from(sample());
        let json = serde_json::to_string(&present).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, present);
    }
}
