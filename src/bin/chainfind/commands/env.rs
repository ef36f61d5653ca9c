//! `chainfind env` command

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::cli::EnvArgs;
use chainfind::cc::{BuildConfig, Builder, FlagSet};
use chainfind::discovery::ProbeOptions;

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct Report<'a> {
    #[serde(flatten)]
    builder: &'a Builder,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<BuildConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    flags: Option<FlagSet>,
}

pub fn execute(args: EnvArgs) -> Result<()> {
    let config = super::config()?;
    let builder = Builder::from_env(&ProbeOptions::from_config(&config))?;

    let report = Report {
        builder: &builder,
        config: args.config,
        flags: args.config.map(|c| builder.default_flags().effective(c)),
    };

    let buf = super::render(&report, args.format, |w| {
        builder.print_summary(w)?;
        if let (Some(config), Some(flags)) = (&report.config, &report.flags) {
            let flags: Vec<&str> = flags.iter().collect();
            writeln!(w, "- {} flags: {}", config, flags.join(" "))?;
        }
        Ok(())
    })?;

    super::emit(&buf, args.output.as_deref())
}
