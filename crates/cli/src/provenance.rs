//! Sidecar records written next to alignment artifacts.
//!
//! The record holds the resolved search configuration and the input angles actually used,
//! so a result file can be reproduced without the command line that produced it.

use anyhow::{Context, Result};
use foldmatch::api::{AlignCfg, Vertex, PATTERN_NAMES};
use serde::Serialize;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Clone, Debug, Serialize)]
pub struct Callsite {
    pub file: &'static str,
    pub line: u32,
}

/// `AlignCfg` after defaults and validation, with the threshold in degrees.
#[derive(Clone, Debug, Serialize)]
pub struct CfgRecord {
    pub threshold_deg: f64,
    pub number_of_output: usize,
    pub dedup_eps: f64,
    pub materialize: bool,
}

impl From<&AlignCfg> for CfgRecord {
    fn from(cfg: &AlignCfg) -> Self {
        Self {
            threshold_deg: cfg.threshold.to_degrees(),
            number_of_output: cfg.number_of_output,
            dedup_eps: cfg.dedup_eps,
            materialize: cfg.materialize,
        }
    }
}

/// One compared vertex: where it came from and its sorted angles.
#[derive(Clone, Debug, Serialize)]
pub struct InputRecord {
    pub source: String,
    pub angles_deg: Vec<f64>,
}

impl InputRecord {
    pub fn new(source: impl Into<String>, v: &Vertex) -> Self {
        Self {
            source: source.into(),
            angles_deg: v.iter().map(|b| b.angle.to_degrees()).collect(),
        }
    }
}

/// Contents of `<artifact>.provenance.json` for one `align` run.
#[derive(Clone, Debug, Serialize)]
pub struct AlignRecord {
    pub code_rev: String,
    pub lib_version: &'static str,
    pub callsite: Callsite,
    pub cfg: CfgRecord,
    pub parallel: bool,
    pub inputs: Vec<InputRecord>,
    /// Non-placeholder results written to the artifact.
    pub filled: usize,
    pub outputs: Vec<String>,
}

impl AlignRecord {
    #[track_caller]
    pub fn new(cfg: &AlignCfg, parallel: bool, inputs: Vec<InputRecord>, filled: usize) -> Self {
        let loc = Location::caller();
        Self {
            code_rev: current_git_rev(),
            lib_version: foldmatch::VERSION,
            callsite: Callsite {
                file: loc.file(),
                line: loc.line(),
            },
            cfg: cfg.into(),
            parallel,
            inputs,
            filled,
            outputs: Vec::new(),
        }
    }
}

/// What `report` prints: build identity plus the library defaults.
#[derive(Clone, Debug, Serialize)]
pub struct BuildRecord {
    pub code_rev: String,
    pub lib_version: &'static str,
    pub patterns: Vec<&'static str>,
    pub defaults: CfgRecord,
}

impl BuildRecord {
    pub fn current() -> Self {
        Self {
            code_rev: current_git_rev(),
            lib_version: foldmatch::VERSION,
            patterns: PATTERN_NAMES.to_vec(),
            defaults: (&AlignCfg::default()).into(),
        }
    }
}

/// Write the record next to `artifact`, listing it as the output. Returns the sidecar path.
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, mut record: AlignRecord) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let path = sidecar_path(artifact);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating provenance dir {}", parent.display()))?;
    }
    record.outputs = vec![artifact.to_string_lossy().into_owned()];
    fs::write(&path, serde_json::to_vec_pretty(&record)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let stem = artifact.file_stem().map_or_else(
        || "artifact".to_string(),
        |s| s.to_string_lossy().into_owned(),
    );
    artifact.with_file_name(format!("{stem}.provenance.json"))
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`, else "unknown".
fn current_git_rev() -> String {
    let env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|s| !s.is_empty());
    if let Some(rev) = env {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
