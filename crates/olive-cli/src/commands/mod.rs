pub mod layout;
pub mod show;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use olive_layout::{ColorScheme, GraphLayoutEngine, Layout, LayoutOptions};
use olive_source::{InMemorySource, RevisionId};

use crate::Cli;

#[derive(Subcommand)]
pub enum Commands {
    /// Lay out an ancestry file and print one line per row
    Layout(layout::LayoutArgs),
    /// Show the layout row and metadata of one revision
    Show(show::ShowArgs),
}

pub fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Layout(args) => layout::run(args, &cli),
        Commands::Show(args) => show::run(args, &cli),
    }
}

/// Input file and layout knobs shared by every subcommand.
#[derive(Args)]
pub struct GraphArgs {
    /// Ancestry file in the olive text format
    file: PathBuf,

    /// Revision to start from; repeat to lay out several heads
    #[arg(long = "start", value_name = "ID")]
    starts: Vec<String>,

    /// Show only the first <n> rows
    #[arg(short = 'n', long = "max-count")]
    max_count: Option<usize>,

    /// Rows an edge may span before it is drawn as two stubs
    #[arg(long, value_name = "N", conflicts_with = "no_broken_lines")]
    broken_line_length: Option<usize>,

    /// Never break long edges
    #[arg(long)]
    no_broken_lines: bool,

    /// Node colouring: branch or lineage
    #[arg(long, value_name = "SCHEME")]
    color_scheme: Option<ColorScheme>,
}

impl GraphArgs {
    pub fn load(&self) -> Result<InMemorySource> {
        InMemorySource::open(&self.file)
            .with_context(|| format!("cannot read '{}'", self.file.display()))
    }

    /// Environment overrides first, then flags.
    pub fn options(&self) -> Result<LayoutOptions> {
        let mut options = LayoutOptions::from_env()?;
        if let Some(n) = self.max_count {
            options = options.max_count(Some(n));
        }
        if self.no_broken_lines {
            options = options.broken_line_length(None);
        } else if let Some(n) = self.broken_line_length {
            options = options.broken_line_length(Some(n));
        }
        if let Some(scheme) = self.color_scheme {
            options = options.color_scheme(scheme);
        }
        Ok(options)
    }

    /// Run the layout over the file.
    pub fn layout(&self, source: &InMemorySource) -> Result<Layout> {
        let starts: Vec<RevisionId> = if self.starts.is_empty() {
            let first = source
                .first()
                .with_context(|| format!("no revisions in '{}'", self.file.display()))?;
            vec![first.clone()]
        } else {
            self.starts.iter().map(|s| RevisionId::from(s.as_str())).collect()
        };

        let engine = GraphLayoutEngine::new(self.options()?)?;
        log::debug!("laying out {} from {} start(s)", self.file.display(), starts.len());
        Ok(engine.layout_heads(source, &starts)?)
    }
}
