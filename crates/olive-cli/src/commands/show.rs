use std::io::{self, Write};

use anyhow::{bail, Result};
use clap::Args;
use olive_layout::RowDecorator;
use olive_source::RevisionId;

use super::GraphArgs;
use crate::Cli;

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    graph: GraphArgs,

    /// Revision to show
    id: String,
}

pub fn run(args: &ShowArgs, _cli: &Cli) -> Result<i32> {
    let source = args.graph.load()?;
    let layout = args.graph.layout(&source)?;

    let Some(row) = layout.row_of(&args.id) else {
        bail!("revision '{}' is not in the layout", args.id);
    };
    let mut decorator = RowDecorator::new(&source);
    let decorated = decorator.decorate(row)?;

    let listed = |label: &str, ids: &[RevisionId]| {
        ids.iter().fold(label.to_string(), |mut line, id| {
            line.push(' ');
            line.push_str(id.as_str());
            line
        })
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "revision {}", row.revision_id)?;
    writeln!(out, "revno {}", row.revno)?;
    writeln!(out, "column {}", row.node.column)?;
    writeln!(out, "colour {}", row.node.color)?;
    writeln!(out, "depth {}", row.merge_depth)?;
    writeln!(out, "{}", listed("parents", &row.parents))?;
    writeln!(out, "{}", listed("children", &row.children))?;
    match &decorated.meta {
        Some(meta) => {
            writeln!(out, "committer {}", meta.committer)?;
            writeln!(out, "timestamp {} {}", meta.timestamp, meta.timezone)?;
            writeln!(out, "message {}", meta.summary())?;
        }
        None => writeln!(out, "ghost")?,
    }
    Ok(0)
}
