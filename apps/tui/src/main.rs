//! Articlecast TUI: type a query, watch the pipeline run, read the summary.
//!
//! No tracing subscriber is installed here, so library log output is
//! dropped instead of being drawn over the terminal.

mod app;
mod screens;
mod widgets;

use color_eyre::eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;
    app::run()
}
