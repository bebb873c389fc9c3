//! # Python Bindings
//!
//! PyO3 bindings so the node-graph host can call the nodes directly.
//!
//! ## Python API
//!
//! ```python
//! import ckpt_settings as cs
//!
//! a = cs.pack("sd15/anime.safetensors", "Baked VAE", steps=28, cfg=6.5)
//! b = cs.pack("None", "Baked VAE")          # -> None (absent)
//!
//! settings_list, size = cs.tie(None, [a, b])  # absent dropped, size == 1
//! chosen, index = cs.random_select(settings_list, seed=1234)
//!
//! print(cs.to_filename(chosen, "{ckpt_name}_{date}"))
//! ```
//!
//! The absent sentinel is Python `None`.

use std::sync::OnceLock;

use pyo3::exceptions::{PyKeyError, PyOverflowError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::core::{LoraEntry, LoraStack, PackConfig, PackError, Settings, SettingsBundle, SettingsList};
use crate::engine::{node_names as registered_names, NodeHost};

/// Host shared by every call, created on first use
static HOST: OnceLock<NodeHost> = OnceLock::new();

fn host() -> &'static NodeHost {
    HOST.get_or_init(NodeHost::default)
}

fn to_py_err(e: PackError) -> PyErr {
    match e {
        PackError::MissingField { .. } | PackError::UnknownNode(_) => PyKeyError::new_err(e.to_string()),
        PackError::Range(_) => PyOverflowError::new_err(e.to_string()),
        _ => PyValueError::new_err(e.to_string()),
    }
}

type PyLoraStack = Vec<(String, f64, f64)>;

fn lora_from_py(stack: Option<PyLoraStack>) -> Option<LoraStack> {
    stack.map(|entries| {
        entries
            .into_iter()
            .map(|(name, model, clip)| LoraEntry::new(name, model, clip))
            .collect()
    })
}

fn lora_to_py(stack: &Option<LoraStack>) -> Option<PyLoraStack> {
    stack.as_ref().map(|entries| {
        entries
            .iter()
            .map(|e| (e.lora_name.clone(), e.model_strength, e.clip_strength))
            .collect()
    })
}

/// Python wrapper for a packed bundle
#[pyclass(name = "SettingsBundle")]
#[derive(Clone)]
pub struct PySettingsBundle {
    inner: SettingsBundle,
}

#[pymethods]
impl PySettingsBundle {
    #[getter]
    fn ckpt_name(&self) -> &str {
        &self.inner.ckpt_name
    }

    #[getter]
    fn vae_name(&self) -> &str {
        &self.inner.vae_name
    }

    #[getter]
    fn clip_skip(&self) -> i64 {
        self.inner.clip_skip
    }

    #[getter]
    fn steps(&self) -> i64 {
        self.inner.steps
    }

    #[getter]
    fn cfg(&self) -> f64 {
        self.inner.cfg
    }

    #[getter]
    fn sampler_name(&self) -> &str {
        &self.inner.sampler_name
    }

    #[getter]
    fn scheduler(&self) -> &str {
        &self.inner.scheduler
    }

    #[getter]
    fn denoise(&self) -> f64 {
        self.inner.denoise
    }

    #[getter]
    fn optional_lora_stack(&self) -> Option<PyLoraStack> {
        lora_to_py(&self.inner.optional_lora_stack)
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.inner == other.inner
    }

    fn __repr__(&self) -> String {
        format!(
            "SettingsBundle(ckpt_name='{}', vae_name='{}', steps={}, cfg={}, sampler='{}/{}')",
            self.inner.ckpt_name,
            self.inner.vae_name,
            self.inner.steps,
            self.inner.cfg,
            self.inner.sampler_name,
            self.inner.scheduler
        )
    }
}

type PySettings = Option<PySettingsBundle>;

fn settings_from_py(s: PySettings) -> Settings {
    s.map(|b| b.inner).into()
}

fn settings_to_py(s: Settings) -> PySettings {
    Option::<SettingsBundle>::from(s).map(|inner| PySettingsBundle { inner })
}

fn list_from_py(list: Vec<PySettings>) -> SettingsList {
    list.into_iter().map(settings_from_py).collect()
}

fn list_to_py(list: SettingsList) -> Vec<PySettings> {
    list.into_iter().map(settings_to_py).collect()
}

/// Load configuration from TOML before any node runs
///
/// Fails once the nodes have already been used.
#[pyfunction]
fn configure(toml_text: &str) -> PyResult<()> {
    let config = PackConfig::from_toml_str(toml_text).map_err(to_py_err)?;
    HOST.set(NodeHost::new(config))
        .map_err(|_| PyRuntimeError::new_err("configuration is already in use"))
}

/// Pack settings; returns None when ckpt_name is the none-marker
#[pyfunction]
#[pyo3(signature = (
    ckpt_name,
    vae_name,
    clip_skip = -2,
    steps = 20,
    cfg = 8.0,
    sampler_name = "euler".to_string(),
    scheduler = "normal".to_string(),
    denoise = 1.0,
    optional_lora_stack = None,
))]
#[allow(clippy::too_many_arguments)]
fn pack(
    ckpt_name: String,
    vae_name: String,
    clip_skip: i64,
    steps: i64,
    cfg: f64,
    sampler_name: String,
    scheduler: String,
    denoise: f64,
    optional_lora_stack: Option<PyLoraStack>,
) -> PySettings {
    let fields = SettingsBundle {
        ckpt_name,
        vae_name,
        clip_skip,
        steps,
        cfg,
        sampler_name,
        scheduler,
        denoise,
        optional_lora_stack: lora_from_py(optional_lora_stack),
    };
    settings_to_py(host().pack(fields))
}

/// Split a bundle into (settings, optional_lora_stack, ckpt_name, vae_name,
/// clip_skip, steps, cfg, sampler_name, scheduler, denoise)
#[pyfunction]
#[allow(clippy::type_complexity)]
fn unpack(
    settings: PySettings,
) -> PyResult<(
    PySettingsBundle,
    Option<PyLoraStack>,
    String,
    String,
    i64,
    i64,
    f64,
    String,
    String,
    f64,
)> {
    let u = host().unpack(&settings_from_py(settings)).map_err(to_py_err)?;
    let lora = lora_to_py(&u.optional_lora_stack);
    Ok((
        PySettingsBundle { inner: u.settings },
        lora,
        u.ckpt_name,
        u.vae_name,
        u.clip_skip,
        u.steps,
        u.cfg,
        u.sampler_name,
        u.scheduler,
        u.denoise,
    ))
}

/// Append real bundles to an optional base list
#[pyfunction]
#[pyo3(signature = (base_settings_list, settings))]
fn tie(base_settings_list: Option<Vec<PySettings>>, settings: Vec<PySettings>) -> (Vec<PySettings>, usize) {
    let base = base_settings_list.map(list_from_py);
    let slots: SettingsList = list_from_py(settings);
    let out = host().tie(base.as_ref(), &slots);
    (list_to_py(out.settings_list), out.size)
}

/// Concatenate lists; None entries are skipped
#[pyfunction]
fn merge(settings_lists: Vec<Option<Vec<PySettings>>>) -> (Vec<PySettings>, usize) {
    let lists: Vec<Option<SettingsList>> = settings_lists
        .into_iter()
        .map(|l| l.map(list_from_py))
        .collect();
    let out = host().merge(lists.iter().map(Option::as_ref));
    (list_to_py(out.settings_list), out.size)
}

/// Pick one entry of a list by seed
#[pyfunction]
fn random_select(settings_list: Vec<PySettings>, seed: u64) -> PyResult<(PySettings, usize)> {
    let list = list_from_py(settings_list);
    let sel = host().random_select(&list, seed).map_err(to_py_err)?;
    Ok((settings_to_py(sel.settings), sel.index))
}

/// Pick one number of a "|"-separated list: (value, rounded, index)
#[pyfunction]
fn random_number(numbers: &str, seed: u64) -> PyResult<(f64, i64, usize)> {
    let choice = host().random_number(numbers, seed).map_err(to_py_err)?;
    Ok((choice.value, choice.rounded, choice.index))
}

/// Render a filesystem-safe filename from a template
#[pyfunction]
#[pyo3(signature = (settings, format = None))]
fn to_filename(settings: PySettings, format: Option<&str>) -> PyResult<String> {
    host()
        .to_filename(&settings_from_py(settings), format)
        .map_err(to_py_err)
}

/// Registered node names
#[pyfunction]
fn node_names() -> Vec<&'static str> {
    registered_names().collect()
}

/// ckpt_settings Python module
#[pymodule]
fn ckpt_settings(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySettingsBundle>()?;
    m.add_function(wrap_pyfunction!(configure, m)?)?;
    m.add_function(wrap_pyfunction!(pack, m)?)?;
    m.add_function(wrap_pyfunction!(unpack, m)?)?;
    m.add_function(wrap_pyfunction!(tie, m)?)?;
    m.add_function(wrap_pyfunction!(merge, m)?)?;
    m.add_function(wrap_pyfunction!(random_select, m)?)?;
    m.add_function(wrap_pyfunction!(random_number, m)?)?;
    m.add_function(wrap_pyfunction!(to_filename, m)?)?;
    m.add_function(wrap_pyfunction!(node_names, m)?)?;

    m.add("__doc__", "Checkpoint/sampler settings bundles for node-graph pipelines")?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
