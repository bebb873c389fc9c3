//! Pack and Unpack.

use tracing::debug;

use crate::core::{LoraStack, PackConfig, PackResult, Settings, SettingsBundle};

/// Pack scalar fields into a bundle
///
/// A checkpoint name equal to the none-marker packs to `Settings::Absent`.
/// Every other field is kept verbatim.
pub fn pack(config: &PackConfig, fields: SettingsBundle) -> Settings {
    if config.is_none_marker(&fields.ckpt_name) {
        debug!("pack: checkpoint is the none-marker, emitting absent");
        return Settings::Absent;
    }
    Settings::Present(fields)
}

/// A bundle split into its fields, in output order
#[derive(Debug, Clone, PartialEq)]
pub struct Unpacked {
    pub settings: SettingsBundle,
    pub optional_lora_stack: Option<LoraStack>,
    pub ckpt_name: String,
    pub vae_name: String,
    pub clip_skip: i64,
    pub steps: i64,
    pub cfg: f64,
    pub sampler_name: String,
    pub scheduler: String,
    pub denoise: f64,
}

/// Project a bundle onto its individual fields
///
/// Fails with `MissingField` when handed the absent sentinel.
pub fn unpack(settings: &Settings) -> PackResult<Unpacked> {
    let b = settings.require("settings")?;
    Ok(Unpacked {
        settings: b.clone(),
        optional_lora_stack: b.optional_lora_stack.clone(),
        ckpt_name: b.ckpt_name.clone(),
        vae_name: b.vae_name.clone(),
        clip_skip: b.clip_skip,
        steps: b.steps,
        cfg: b.cfg,
        sampler_name: b.sampler_name.clone(),
        scheduler: b.scheduler.clone(),
        denoise: b.denoise,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LoraEntry, PackError};

    fn fields() -> SettingsBundle {
        SettingsBundle::new("models/anime.safetensors", "vae/kl-f8.pt")
            .with_clip_skip(-1)
            .with_steps(28)
            .with_cfg(6.5)
            .with_sampler("dpmpp_2m", "karras")
            .with_denoise(0.75)
            .with_lora_stack(vec![LoraEntry::new("detail.safetensors", 0.6, 1.0)])
    }

    #[test]
    fn test_pack_keeps_fields_verbatim() {
        let config = PackConfig::default();
        let packed = pack(&config, fields());
        assert_eq!(packed, Settings::Present(fields()));
    }

    #[test]
    fn test_pack_none_marker_is_absent() {
        let config = PackConfig::default();
        let packed = pack(&config, SettingsBundle::new("None", "Baked VAE"));
        assert!(packed.is_absent());
    }

    #[test]
    fn test_pack_custom_none_marker() {
        let config = PackConfig::default().with_none_marker("(none)");
        assert!(pack(&config, SettingsBundle::new("(none)", "Baked VAE")).is_absent());
        assert!(!pack(&config, SettingsBundle::new("None", "Baked VAE")).is_absent());
    }

    #[test]
    fn test_unpack_round_trip() {
        let config = PackConfig::default();
        let out = unpack(&pack(&config, fields())).unwrap();

        assert_eq!(out.settings, fields());
        assert_eq!(out.ckpt_name, "models/anime.safetensors");
        assert_eq!(out.vae_name, "vae/kl-f8.pt");
        assert_eq!(out.clip_skip, -1);
        assert_eq!(out.steps, 28);
        assert_eq!(out.cfg, 6.5);
        assert_eq!(out.sampler_name, "dpmpp_2m");
        assert_eq!(out.scheduler, "karras");
        assert_eq!(out.denoise, 0.75);
        assert_eq!(
            out.optional_lora_stack,
            Some(vec![LoraEntry::new("detail.safetensors", 0.6, 1.0)])
        );
    }

    #[test]
    fn test_unpack_absent() {
        assert_eq!(
            unpack(&Settings::Absent),
            Err(PackError::MissingField { field: "settings".into() })
        );
    }
}
