use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use foldmatch::api::{
    draw_embedded_pair, filled, AlignCfg, Algorithm, BranchCount, Output, ReplayToken, Vertex,
    VertexCfg, PATTERN_NAMES,
};
use std::path::Path;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;
mod provenance;

use io::{load_vertex, rows, write_rows, VertexFile};
use provenance::{write_sidecar, AlignRecord, BuildRecord, InputRecord};

#[derive(Parser)]
#[command(name = "foldmatch-cli")]
#[command(about = "Align origami fold vertices and export the best overlays")]
struct Cmd {
    /// Log candidate updates during the search
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Align two vertices (built-in pattern names or JSON files)
    Align {
        #[arg(long)]
        a: String,
        #[arg(long)]
        b: String,
        /// Per-branch tolerance in degrees
        #[arg(long, default_value_t = 5.0)]
        threshold_deg: f64,
        /// Number of distinct results to keep
        #[arg(long, default_value_t = 1)]
        outputs: usize,
        /// Score each rotation on the thread pool
        #[arg(long)]
        parallel: bool,
        /// Write results to .json or .csv (plus a provenance sidecar)
        #[arg(long)]
        out: Option<String>,
    },
    /// Print the built-in patterns as JSON
    Patterns,
    /// Plant a rotated subset in a random vertex and check the search recovers it
    Demo {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 6)]
        branches: usize,
        #[arg(long, default_value_t = 4)]
        subset: usize,
        #[arg(long, default_value_t = 40)]
        rotation_deg: u32,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    match cmd.action {
        Action::Align {
            a,
            b,
            threshold_deg,
            outputs,
            parallel,
            out,
        } => align(a, b, threshold_deg, outputs, parallel, out),
        Action::Patterns => patterns(),
        Action::Demo {
            seed,
            branches,
            subset,
            rotation_deg,
        } => demo(seed, branches, subset, rotation_deg),
        Action::Report => report(),
    }
}

fn run_search(alg: &Algorithm, a: &Vertex, b: &Vertex, parallel: bool) -> Result<Vec<Output>> {
    let out = if parallel {
        alg.optimize_pattern_par(a, b)?
    } else {
        alg.optimize_pattern(a, b)?
    };
    Ok(filled(out))
}

fn align(
    a: String,
    b: String,
    threshold_deg: f64,
    outputs: usize,
    parallel: bool,
    out: Option<String>,
) -> Result<()> {
    tracing::info!(a, b, threshold_deg, outputs, parallel, "align");
    let va = load_vertex(&a)?;
    let vb = load_vertex(&b)?;
    tracing::info!(a = %va, b = %vb, "inputs");
    let cfg = AlignCfg::new(threshold_deg.to_radians(), outputs)?;
    let alg = Algorithm::new(cfg)?;
    let results = run_search(&alg, &va, &vb, parallel)?;
    for (rank, o) in results.iter().enumerate() {
        println!("#{rank} {o}");
        if let Some(v) = &o.vertex {
            println!("   aligned: {v}");
        }
    }

    if let Some(out) = out {
        let out_path = Path::new(&out);
        write_rows(out_path, &rows(&results))?;
        let inputs = vec![InputRecord::new(a, &va), InputRecord::new(b, &vb)];
        let record = AlignRecord::new(&cfg, parallel, inputs, results.len());
        let prov = write_sidecar(out_path, record)?;
        tracing::info!(out, provenance = %prov.display(), "wrote results");
    }
    Ok(())
}

fn patterns() -> Result<()> {
    let mut obj = serde_json::Map::new();
    for name in PATTERN_NAMES {
        let v = load_vertex(name)?;
        obj.insert(name.to_string(), serde_json::to_value(VertexFile::from_vertex(&v))?);
    }
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn demo(seed: u64, branches: usize, subset: usize, rotation_deg: u32) -> Result<()> {
    tracing::info!(seed, branches, subset, rotation_deg, "demo");
    check_demo_args(branches, subset, rotation_deg)?;
    let cfg = VertexCfg {
        branch_count: BranchCount::Fixed(branches),
        ..VertexCfg::default()
    };
    let (smaller, larger) =
        draw_embedded_pair(cfg, subset, rotation_deg, ReplayToken::new(seed, 0))?;
    println!("larger:  {larger}");
    println!("smaller: {smaller}");
    let alg = Algorithm::new(AlignCfg::default())?;
    let results = run_search(&alg, &smaller, &larger, true)?;
    let Some(best) = results.first() else {
        bail!("search returned no alignment");
    };
    println!("best: {best}");
    let found = best.rotation.to_degrees().round() as u32 % 360;
    if best.cost > 1e-9 || found != rotation_deg {
        bail!(
            "expected a zero-cost alignment at {rotation_deg}°, got {found}° (cost {:.3e})",
            best.cost
        );
    }
    tracing::info!(found, "planted rotation recovered");
    Ok(())
}

fn check_demo_args(branches: usize, subset: usize, rotation_deg: u32) -> Result<()> {
    if subset == 0 || subset > branches {
        bail!("subset must satisfy 1 <= subset <= branches, got {subset} of {branches}");
    }
    if rotation_deg >= 360 {
        bail!("rotation must lie in [0, 360), got {rotation_deg}");
    }
    Ok(())
}

fn report() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&BuildRecord::current())?);
    Ok(())
}
