//! `chron libraries`: generate games and group them into libraries.

use std::io::Write;

use anyhow::Result;
use chron_sim::{LibraryReport, run_library_campaign};
use clap::Args;

use crate::config::ChronConfig;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Longest libraries printed in pretty/text mode.
const LONGEST_SHOWN: usize = 5;

#[derive(Args, Debug)]
pub struct LibrariesArgs {
    /// Number of games to generate (overrides `generate.count`).
    #[arg(long)]
    pub count: Option<usize>,

    /// RNG seed (overrides `generate.seed`).
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run_libraries(args: &LibrariesArgs, config: &ChronConfig, output: OutputMode) -> Result<()> {
    let generate = config.generate.resolve(args.seed, args.count);
    let report = run_library_campaign(&generate)?;
    render_mode(output, &report, render_text, render_pretty)
}

fn join_library(library: &[Vec<String>]) -> String {
    library
        .iter()
        .map(|chronicle| format!("[{}]", chronicle.join(", ")))
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_text(report: &LibraryReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "libraries seed={} games={} duplicates={} count={} max_len={}",
        report.seed, report.games, report.duplicates, report.library_count, report.max_library_len
    )?;
    for (len, count) in &report.length_histogram {
        writeln!(w, "length len={len} count={count}")?;
    }
    for (i, library) in report.longest.iter().take(LONGEST_SHOWN).enumerate() {
        writeln!(w, "longest index={} members={}", i + 1, join_library(library))?;
    }
    Ok(())
}

fn render_pretty(report: &LibraryReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Chronicle Libraries")?;
    pretty_kv(w, "Seed", report.seed.to_string())?;
    pretty_kv(w, "Games", report.games.to_string())?;
    pretty_kv(w, "Duplicates", report.duplicates.to_string())?;
    pretty_kv(w, "Libraries", report.library_count.to_string())?;
    writeln!(w)?;

    pretty_section(w, "Library Lengths")?;
    for (len, count) in &report.length_histogram {
        pretty_kv(w, &format!("len {len}"), count.to_string())?;
    }
    writeln!(w)?;

    pretty_section(
        w,
        &format!("Longest Libraries (length {})", report.max_library_len),
    )?;
    for (i, library) in report.longest.iter().take(LONGEST_SHOWN).enumerate() {
        writeln!(w, "{}:", i + 1)?;
        for chronicle in library {
            writeln!(w, "  [{}]", chronicle.join(", "))?;
        }
    }
    if report.longest.len() > LONGEST_SHOWN {
        writeln!(w, "... and {} more", report.longest.len() - LONGEST_SHOWN)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chron_sim::GenerateConfig;

    fn sample_report() -> LibraryReport {
        run_library_campaign(&GenerateConfig { seed: 21, count: 60 }).expect("campaign")
    }

    #[test]
    fn text_lists_histogram_rows() {
        let report = sample_report();
        let mut buf = Vec::new();
        render_text(&report, &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");

        assert!(text.starts_with("libraries seed=21 games=60 "));
        assert_eq!(
            text.lines().filter(|l| l.starts_with("length ")).count(),
            report.length_histogram.len()
        );
    }

    #[test]
    fn pretty_has_sections() {
        let mut buf = Vec::new();
        render_pretty(&sample_report(), &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("Chronicle Libraries"));
        assert!(text.contains("Library Lengths"));
        assert!(text.contains("Longest Libraries"));
    }

    #[test]
    fn join_library_brackets_each_chronicle() {
        let library = vec![
            vec!["X0".to_string(), "O4".to_string()],
            vec!["X0".to_string()],
        ];
        assert_eq!(join_library(&library), "[X0, O4] [X0]");
    }
}
