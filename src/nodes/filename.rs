//! Filename templating.
//!
//! `{ckpt_name}` and `{vae_name}` lose their directory and extension
//! (`Baked VAE` is left alone). `{datetime}`, `{date}` and `{time}` come from
//! one clock reading and take strftime specs (`{date:%Y%m%d}`). The rendered
//! text is then made filesystem-safe.

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::core::template::{self, FieldValue};
use crate::core::{PackConfig, PackResult, Settings};
use crate::ports::Clock;

/// Wall-clock placeholders from a single reading
fn temporal_field(instant: NaiveDateTime, name: &str) -> Option<FieldValue> {
    match name {
        "datetime" => Some(FieldValue::DateTime(instant)),
        "date" => Some(FieldValue::Date(instant.date())),
        "time" => Some(FieldValue::Time(instant.time())),
        _ => None,
    }
}

/// Drop directory and extension: `sd/xl/base.safetensors` -> `base`
///
/// Both `/` and `\` separate directories. Leading dots of the file name do
/// not start an extension, so `.hidden` stays `.hidden`.
pub fn strip_name(name: &str) -> &str {
    let base = match name.rfind(|c: char| c == '/' || c == '\\') {
        Some(pos) => &name[pos + 1..],
        None => name,
    };
    let leading_dots = base.len() - base.trim_start_matches('.').len();
    match base[leading_dots..].rfind('.') {
        Some(pos) => &base[..leading_dots + pos],
        None => base,
    }
}

/// Render `template` for a bundle and sanitize the result
pub fn to_filename(
    config: &PackConfig,
    clock: &dyn Clock,
    settings: &Settings,
    template_text: &str,
) -> PackResult<String> {
    let bundle = settings.require("ckpt_name")?;

    let ckpt_name = strip_name(&bundle.ckpt_name).to_string();
    let vae_name = if bundle.vae_name == config.baked_vae {
        bundle.vae_name.clone()
    } else {
        strip_name(&bundle.vae_name).to_string()
    };
    let instant = clock.now();

    let rendered = template::render(template_text, |name| match name {
        "ckpt_name" => Some(FieldValue::Text(ckpt_name.clone())),
        "vae_name" => Some(FieldValue::Text(vae_name.clone())),
        _ => temporal_field(instant, name).or_else(|| bundle.field_value(name)),
    })
    .map_err(|e| {
        warn!(template = template_text, error = %e, "filename template rejected");
        e
    })?;

    let filename = config.sanitize(&rendered);
    debug!(%filename, "to_filename");
    Ok(filename)
}
