//! `chron bnet`: fit empirical CPTs over a library's high-frequency DAG.
//!
//! Pipeline: look-back arrows per chronicle, arrow frequencies, arrows kept
//! at `>= min_freq`, presence dataset over the head's frames, then
//! [`BayesNet::fit`].

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chron_bnet::{Arrow, ArrowFrequencies, BayesNet, BnetError, Dataset, library_dot};
use chron_core::Chronicle;
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::ChronConfig;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Library used when no `--input` is given: one long game and three of its
/// time-compatible sub-games.
pub const SAMPLE_LIBRARY: [&[&str]; 4] = [
    &["X2", "O5", "X7", "O1", "X4", "O0", "X8", "O3", "X6"],
    &["X2", "O5", "X4", "O3", "X6"],
    &["X7", "O1", "X8", "O3", "X6"],
    &["X2", "O1", "X4", "O0", "X6"],
];

#[derive(Args, Debug)]
pub struct BnetArgs {
    /// JSON file holding an array of chronicles (arrays of frame labels).
    /// The first chronicle is the library head.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Predecessors joined to each frame (overrides `network.memory_time`).
    #[arg(long)]
    pub memory_time: Option<usize>,

    /// Minimum arrow frequency (overrides `network.min_arrow_freq`).
    #[arg(long)]
    pub min_freq: Option<usize>,

    /// Also print Graphviz `dot` descriptions.
    #[arg(long)]
    pub dot: bool,
}

#[derive(Debug, Serialize)]
struct ArrowCount {
    arrow: Arrow,
    count: usize,
}

#[derive(Debug, Serialize)]
struct DotOutput {
    library: String,
    high_frequency: String,
}

#[derive(Debug, Serialize)]
struct BnetOutput {
    chronicles: usize,
    memory_time: usize,
    min_freq: usize,
    arrow_frequencies: Vec<ArrowCount>,
    high_frequency_arrows: usize,
    cycles: Vec<Vec<String>>,
    undefined_entries: usize,
    network: BayesNet,
    #[serde(skip_serializing_if = "Option::is_none")]
    dot: Option<DotOutput>,
}

fn sample_library() -> Result<Vec<Chronicle>> {
    SAMPLE_LIBRARY
        .iter()
        .map(|labels| Chronicle::from_labels(labels.iter().copied()).map_err(Into::into))
        .collect()
}

/// Read a JSON array of label arrays as chronicles.
pub fn read_library(path: &Path) -> Result<Vec<Chronicle>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let raw: Vec<Vec<String>> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    raw.into_iter()
        .enumerate()
        .map(|(i, labels)| {
            Chronicle::from_labels(labels)
                .with_context(|| format!("chronicle {i} in {}", path.display()))
        })
        .collect()
}

fn fit_library(
    chronicles: &[Chronicle],
    memory_time: usize,
    min_freq: usize,
    with_dot: bool,
) -> Result<BnetOutput> {
    let Some(head) = chronicles.first() else {
        return Err(BnetError::EmptyLibrary.into());
    };

    let outsiders = chronicles[1..]
        .iter()
        .filter(|member| !member.is_smaller_than(head))
        .count();
    if outsiders > 0 {
        warn!(outsiders, "some chronicles are not smaller than the head");
    }

    let frequencies = ArrowFrequencies::from_chronicles(chronicles, memory_time);
    let arrows = frequencies.high_frequency_arrows(min_freq);
    info!(
        distinct = frequencies.len(),
        kept = arrows.len(),
        min_freq,
        "selected high-frequency arrows"
    );

    let dataset = Dataset::presence(chronicles, head.frames())?;
    let high_frequency_arrows = arrows.len();
    let network = BayesNet::fit(arrows, &dataset)?;

    let dot = with_dot.then(|| DotOutput {
        library: library_dot(chronicles, memory_time),
        high_frequency: frequencies.high_frequency_dot(min_freq),
    });

    Ok(BnetOutput {
        chronicles: chronicles.len(),
        memory_time,
        min_freq,
        arrow_frequencies: frequencies
            .entries()
            .iter()
            .map(|(arrow, count)| ArrowCount {
                arrow: arrow.clone(),
                count: *count,
            })
            .collect(),
        high_frequency_arrows,
        cycles: network.structure().cycles(),
        undefined_entries: network.undefined_entries().len(),
        network,
        dot,
    })
}

pub fn run_bnet(args: &BnetArgs, config: &ChronConfig, output: OutputMode) -> Result<()> {
    let chronicles = match &args.input {
        Some(path) => read_library(path)?,
        None => sample_library()?,
    };
    let memory_time = args.memory_time.unwrap_or(config.network.memory_time);
    let min_freq = args.min_freq.unwrap_or(config.network.min_arrow_freq);

    let out = fit_library(&chronicles, memory_time, min_freq, args.dot)?;
    render_mode(output, &out, render_text, render_pretty)
}

fn render_text(out: &BnetOutput, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "bnet chronicles={} memory_time={} min_freq={} arrows={} kept={} nodes={} undefined={}",
        out.chronicles,
        out.memory_time,
        out.min_freq,
        out.arrow_frequencies.len(),
        out.high_frequency_arrows,
        out.network.nodes().len(),
        out.undefined_entries
    )?;
    for entry in &out.arrow_frequencies {
        writeln!(w, "arrow {} count={}", entry.arrow, entry.count)?;
    }
    write!(w, "{}", out.network)?;
    if let Some(dot) = &out.dot {
        write!(w, "{}", dot.library)?;
        write!(w, "{}", dot.high_frequency)?;
    }
    Ok(())
}

fn render_pretty(out: &BnetOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Library")?;
    pretty_kv(w, "Chronicles", out.chronicles.to_string())?;
    pretty_kv(w, "Memory time", out.memory_time.to_string())?;
    pretty_kv(w, "Min freq", out.min_freq.to_string())?;
    pretty_kv(
        w,
        "Arrows",
        format!(
            "{} distinct, {} kept",
            out.arrow_frequencies.len(),
            out.high_frequency_arrows
        ),
    )?;
    if !out.cycles.is_empty() {
        pretty_kv(w, "Cycles", format!("{:?}", out.cycles))?;
    }
    writeln!(w)?;

    pretty_section(w, "Arrow Frequencies")?;
    for entry in &out.arrow_frequencies {
        let marker = if entry.count >= out.min_freq { "*" } else { " " };
        writeln!(w, "{marker} {:<12} {}", entry.arrow.to_string(), entry.count)?;
    }
    writeln!(w)?;

    pretty_section(w, "Network")?;
    write!(w, "{}", out.network)?;
    if out.undefined_entries > 0 {
        writeln!(w)?;
        pretty_kv(w, "Undefined", format!("{} parent states never observed", out.undefined_entries))?;
    }

    if let Some(dot) = &out.dot {
        writeln!(w)?;
        pretty_section(w, "Library DAG (dot)")?;
        write!(w, "{}", dot.library)?;
        writeln!(w)?;
        pretty_section(w, "High-Frequency DAG (dot)")?;
        write!(w, "{}", dot.high_frequency)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn sample_library_fits() {
        let chronicles = sample_library().expect("sample");
        let out = fit_library(&chronicles, 2, 2, true).expect("fit");
        assert_eq!(out.chronicles, 4);
        assert_eq!(out.high_frequency_arrows, 10);
        assert_eq!(out.network.nodes().len(), 9);
        assert_eq!(out.undefined_entries, 6);
        assert!(out.cycles.is_empty());
        let dot = out.dot.expect("dot requested");
        assert!(dot.library.contains("subgraph {"));
        assert!(dot.high_frequency.contains("O3 -> X6 [label=3];"));
    }

    #[test]
    fn empty_library_is_an_error() {
        let err = fit_library(&[], 2, 2, false).expect_err("empty");
        assert_eq!(
            err.downcast_ref::<BnetError>(),
            Some(&BnetError::EmptyLibrary)
        );
    }

    #[test]
    fn library_file_round_trips() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("library.json");
        std::fs::write(&path, r#"[["A","B","C"],["A","C"]]"#).expect("write");

        let chronicles = read_library(&path).expect("read");
        assert_eq!(chronicles.len(), 2);
        assert!(chronicles[1].is_smaller_than(&chronicles[0]));
    }

    #[test]
    fn repeated_frame_in_file_is_reported() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("library.json");
        std::fs::write(&path, r#"[["A","A"]]"#).expect("write");

        let err = read_library(&path).expect_err("repeated");
        assert!(format!("{err:#}").contains("chronicle 0"));
        assert!(err.downcast_ref::<chron_core::ChronicleError>().is_some());
    }

    #[test]
    fn text_report_starts_with_summary() {
        let chronicles = sample_library().expect("sample");
        let out = fit_library(&chronicles, 1, 2, false).expect("fit");
        let mut buf = Vec::new();
        render_text(&out, &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.starts_with("bnet chronicles=4 memory_time=1 min_freq=2 "));
        assert!(text.contains("node: "));
    }
}
