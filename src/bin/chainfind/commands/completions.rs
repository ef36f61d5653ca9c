//! `chainfind completions` command

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::generate;

use crate::cli::{Cli, CompletionsArgs};

/// Command name the generated scripts complete.
const BIN_NAME: &str = "chainfind";

pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate(args.shell, &mut cmd, BIN_NAME, &mut buf);

    tracing::debug!("generated {} completions ({} bytes)", args.shell, buf.len());
    super::emit(&buf, args.output.as_deref())
}
