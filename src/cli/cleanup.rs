//! Retention maintenance command
//!
//! With a type, flags override any configured policy for that type. With
//! no type, every policy in the retention config runs, which is the shape
//! a cron entry wants: `stash cleanup`, then `stash cleanup
//! --dry-run=false` once the report looks right.

use std::path::Path;

use anyhow::{bail, Result};

use super::output::Output;
use crate::storage::{Config, RetentionPolicy, Store};

pub fn run(
    output: &Output,
    root: &Path,
    doc_type: Option<&str>,
    count: Option<usize>,
    window_days: Option<i64>,
    dry_run: bool,
) -> Result<()> {
    let store = Store::open(root)?;
    let config = Config::load_for_root(store.root())?;

    let mut report = Vec::new();
    match doc_type {
        Some(doc_type) => {
            let configured = config.retention.get(doc_type).copied().unwrap_or_default();
            let policy = RetentionPolicy {
                count: count.or(configured.count),
                window_days: window_days.or(configured.window_days),
            };
            if policy.count.is_none() && policy.window_days.is_none() {
                bail!(
                    "no retention policy for '{doc_type}': pass --count or --window-days, \
                     or configure [retention.{doc_type}]"
                );
            }
            report.push(clean_type(output, &store, doc_type, policy, dry_run)?);
        }
        None => {
            if config.retention.is_empty() {
                bail!("no retention policies configured; pass a type with --count or --window-days");
            }
            for (doc_type, policy) in &config.retention {
                report.push(clean_type(output, &store, doc_type, *policy, dry_run)?);
            }
        }
    }

    if output.is_json() {
        output.data(&report);
    }
    Ok(())
}

fn clean_type(
    output: &Output,
    store: &Store,
    doc_type: &str,
    policy: RetentionPolicy,
    dry_run: bool,
) -> Result<serde_json::Value> {
    let selected = store.cleanup(doc_type, policy.count, policy.window(), dry_run)?;
    output.verbose_ctx(
        "cleanup",
        &format!("{} candidates for '{}'", selected.len(), doc_type),
    );
    if !output.is_json() && !selected.is_empty() {
        println!(
            "DRY_RUN={}: cleaned {} items from {}.",
            dry_run,
            selected.len(),
            doc_type
        );
    }
    Ok(serde_json::json!({
        "type": doc_type,
        "dry_run": dry_run,
        "selected": selected.iter().map(|(id, _)| id).collect::<Vec<_>>(),
    }))
}
