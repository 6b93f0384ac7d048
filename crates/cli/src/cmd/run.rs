//! Simulation run command

use anyhow::Result;
use cli_lib::config::CadenceConfig;
use cli_lib::sim::{self, RunSummary};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(
    config_path: Option<&Path>,
    duration_ms: Option<u64>,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let mut config = CadenceConfig::load(config_path)?;
    if let Some(duration_ms) = duration_ms {
        config.scroll.duration_ms = duration_ms;
    }
    if let Some(seed) = seed {
        config.scroll.seed = seed;
    }

    let summary = sim::run(&config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("{}", "Scripted Scroll Session".bold());
    println!(
        "  {} frames over {}ms, {} callbacks fired",
        summary.frames,
        summary.duration_ms,
        summary.callbacks_fired.to_string().cyan()
    );
    println!(
        "  final scroll: {:.0}px, indicator: {}",
        summary.final_scroll,
        if summary.indicator_visible {
            "visible".green().to_string()
        } else {
            "hidden".dimmed().to_string()
        }
    );
    println!(
        "  layout width: {:.0}px after {} relayout(s)",
        summary.layout_width, summary.relayouts
    );

    if !summary.counters.is_empty() {
        println!("\n{}", "Counters".yellow());
        for counter in &summary.counters {
            let mark = if counter.done {
                "done".green().to_string()
            } else {
                "running".red().to_string()
            };
            println!(
                "  {} = {}/{} ({})",
                counter.name.cyan(),
                counter.display,
                counter.target,
                mark
            );
        }
    }

    if !summary.typewriters.is_empty() {
        println!("\n{}", "Typewriters".yellow());
        for tw in &summary.typewriters {
            println!(
                "  {} = {:?}{}",
                tw.name.cyan(),
                tw.shown,
                if tw.done { "" } else { " …" }
            );
        }
    }

    if !summary.sections.is_empty() {
        println!("\n{}", "Sections".yellow());
        for section in &summary.sections {
            println!(
                "  {} revealed={} times={}",
                section.name.cyan(),
                section.revealed,
                section.times
            );
        }
    }

    if !summary.skipped.is_empty() {
        println!("\n{}", "Skipped registrations".yellow());
        for name in &summary.skipped {
            println!("  {}", name.dimmed());
        }
    }
}
