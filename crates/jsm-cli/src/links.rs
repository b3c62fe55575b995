//! # Links Subcommand
//!
//! Shows, for every hypermedia action, the link it would follow given a
//! schema's `links` and the default rel priorities.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use jsm_io::{Action, Links, RelPolicy};

#[derive(Args, Debug)]
pub struct LinksArgs {
    /// Schema document carrying a `links` array.
    #[arg(long)]
    pub schema: PathBuf,

    /// Override the rels tried for an action, e.g. `save=put,post`.
    /// May be repeated.
    #[arg(long = "rels", value_name = "ACTION=REL,...")]
    pub overrides: Vec<String>,
}

pub fn run_links(args: &LinksArgs, out: &mut impl Write) -> Result<u8> {
    let schema = crate::load_schema(&args.schema)?;
    let links = match schema.links() {
        Some(raw) => Links::parse(raw)?,
        None => Links::default(),
    };
    let policy = policy_from(&args.overrides)?;

    for action in Action::ALL {
        let rels = policy.rels(action);
        match links.first_of(&rels) {
            Some(link) => writeln!(
                out,
                "{:<12} {:<12} {:<7} {}",
                action.name(),
                link.rel,
                link.method.to_ascii_uppercase(),
                link.href
            )?,
            None => writeln!(out, "{:<12} (none: tried {})", action.name(), rels.join(", "))?,
        }
    }
    Ok(0)
}

fn policy_from(overrides: &[String]) -> Result<RelPolicy> {
    let mut policy = RelPolicy::default();
    for raw in overrides {
        let (action, rels) = raw
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("expected ACTION=REL,..., got '{raw}'"))?;
        let action: Action = action.parse().map_err(anyhow::Error::msg)?;
        policy.set_rels(action, rels.split(',').map(str::trim).filter(|r| !r.is_empty()));
    }
    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_parse() {
        let policy = policy_from(&["save=put, post".to_string()]).unwrap();
        assert_eq!(policy.rels(Action::Save), vec!["put", "post"]);
        assert!(policy_from(&["save".to_string()]).is_err());
        assert!(policy_from(&["patch=x".to_string()]).is_err());
    }
}
