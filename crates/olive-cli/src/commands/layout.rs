use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use olive_layout::{LayoutRow, LineSegment};

use super::GraphArgs;
use crate::Cli;

#[derive(Args)]
pub struct LayoutArgs {
    #[command(flatten)]
    graph: GraphArgs,
}

pub fn run(args: &LayoutArgs, _cli: &Cli) -> Result<i32> {
    let source = args.graph.load()?;
    let layout = args.graph.layout(&source)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (pos, row) in layout.iter().enumerate() {
        writeln!(out, "{}", format_row(pos, row))?;
    }
    writeln!(out, "columns: {}", layout.column_count)?;
    Ok(0)
}

/// `<row> <revno> <column> <colour> <id> [(ghost)] <segments>`
fn format_row(pos: usize, row: &LayoutRow) -> String {
    let mut line = format!(
        "{} {} {} {} {}",
        pos, row.revno, row.node.column, row.node.color, row.revision_id
    );
    if row.ghost {
        line.push_str(" (ghost)");
    }
    line.push(' ');
    if row.lines.is_empty() {
        line.push('-');
    } else {
        let segments: Vec<String> = row.lines.iter().map(format_segment).collect();
        line.push_str(&segments.join(","));
    }
    line
}

fn format_segment(segment: &LineSegment) -> String {
    let end = |col: Option<usize>| col.map_or_else(|| ".".to_string(), |c| c.to_string());
    format!("{}>{}", end(segment.from), end(segment.to))
}
