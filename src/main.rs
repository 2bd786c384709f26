use anyhow::Result;
use clap::Parser;

mod cli;
mod layout;
mod model;
mod pdf;
mod period;
mod report;
mod session;
mod source;
mod stats;
mod store;
mod timeparse;
mod util;

use crate::cli::{Cli, normalize};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;

  // Phase 2: resolve the effective clock
  let now_opt = util::parse_now_override(cfg.now_override.as_deref());

  // Phase 3: generate the report
  report::run(&cfg, now_opt)
}
