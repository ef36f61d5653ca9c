//! `chainfind triplet` command

use std::io::Write;

use anyhow::Result;

use crate::cli::TripletArgs;
use chainfind::core::triplet::parse_full;

pub fn execute(args: TripletArgs) -> Result<()> {
    let full = parse_full(&args.triplet)?;

    let buf = super::render(&full, args.format, |w| {
        writeln!(w, "{}", full.original)?;
        writeln!(w, "- arch: {}", full.arch)?;
        writeln!(w, "- os: {}", full.os)?;
        writeln!(w, "- abi: {}", full.abi)?;
        writeln!(w, "- libc: {}", full.libc)?;
        if !full.vendors.is_empty() {
            writeln!(w, "- vendors: {}", full.vendors.join(", "))?;
        }
        if let Err(e) = full.validate() {
            writeln!(w, "- warning: {}", e)?;
        }
        Ok(())
    })?;

    super::emit(&buf, None)
}
