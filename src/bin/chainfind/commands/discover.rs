//! `chainfind discover` command

use std::io::Write;

use anyhow::Result;

use crate::cli::DiscoverArgs;
use chainfind::core::chain::Chain;
use chainfind::core::triplet::parse_full;
use chainfind::discovery::{self, Feedback, Installation, ProbeOptions};

pub fn execute(args: DiscoverArgs) -> Result<()> {
    let config = super::config()?;

    let mut opts = ProbeOptions::from_config(&config);
    opts.extra_search_paths.extend(args.paths.iter().cloned());
    opts.isolated = args.isolated;

    let types = if args.types.is_empty() {
        config.discovery.types.clone()
    } else {
        args.types.clone()
    };

    let buf = if args.installations {
        let found = discovery::discover_installations_with(&types, &opts, Feedback::none());
        super::render(&found, args.format, |w| summarize_installations(&found, w))?
    } else {
        let chains =
            discovery::discover_toolchains_with(!args.c_only, &types, &opts, Feedback::none());
        let selected = select(&chains, &args, &config.preference())?;
        super::render(&selected, args.format, |w| summarize_chains(&selected, w))?
    };

    super::emit(&buf, args.output.as_deref())
}

/// Apply the target filters and `--best`.
fn select<'a>(chains: &'a [Chain], args: &DiscoverArgs, preference: &[String]) -> Result<Vec<&'a Chain>> {
    let target = match &args.target {
        Some(triplet) => Some(parse_full(triplet)?.target),
        None => None,
    };

    let selected = match (&target, args.native, args.best) {
        (Some(target), _, true) => discovery::choose(chains, target, preference)
            .into_iter()
            .collect(),
        (None, true, true) => discovery::choose_native(chains, preference)
            .into_iter()
            .collect(),
        (None, false, true) => {
            discovery::choose(chains, &Default::default(), preference)
                .into_iter()
                .collect()
        }
        (Some(target), _, false) => discovery::find(target, chains),
        (None, true, false) => discovery::natives(chains),
        (None, false, false) => chains.iter().collect(),
    };
    Ok(selected)
}

fn summarize_installations(found: &[Installation], w: &mut dyn Write) -> std::io::Result<()> {
    if found.is_empty() {
        writeln!(w, "no installations found")?;
    }
    for inst in found {
        inst.print_summary(w)?;
    }
    Ok(())
}

fn summarize_chains(chains: &[&Chain], w: &mut dyn Write) -> std::io::Result<()> {
    if chains.is_empty() {
        writeln!(w, "no compilers found")?;
    }
    for chain in chains {
        chain.print_summary(w)?;
    }
    Ok(())
}
