//! Document commands (init, put, get)

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use super::output::Output;
use crate::domain::Document;
use crate::storage::{Store, CONFIG_FILE};

const STARTER_CONFIG: &str = "\
# Retention policies applied by `stash cleanup` when no type is given.
#
# [retention.plan]
# window_days = 90
#
# [retention.http]
# window_days = 14
# count = 5
";

/// Initialize a store root
pub fn init(output: &Output, root: PathBuf) -> Result<()> {
    let store = Store::open(root)?;
    let config_path = store.root().join(CONFIG_FILE);
    if !config_path.exists() {
        fs::write(&config_path, STARTER_CONFIG)
            .with_context(|| format!("failed to write config: {}", config_path.display()))?;
    }
    output.success(&format!("Initialized store at {}", store.root().display()));
    Ok(())
}

/// Store a document read from a file or stdin
pub fn put(output: &Output, root: &Path, id: &str, file: Option<&Path>) -> Result<()> {
    let text = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read document: {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read document from stdin")?;
            buffer
        }
    };
    let document: Document =
        serde_json::from_str(&text).context("document is not a JSON object")?;

    let store = Store::open(root)?;
    store.put(id, &document)?;
    output.verbose_ctx("put", &format!("wrote {} bytes", text.len()));
    output.success(&format!("Stored {}", id));
    Ok(())
}

/// Print the document stored under a token
pub fn get(output: &Output, root: &Path, id: &str) -> Result<()> {
    let store = Store::open(root)?;
    match store.get(id)? {
        Some(document) => {
            output.data(&document);
            Ok(())
        }
        None if output.is_json() => {
            output.data(&serde_json::Value::Null);
            Ok(())
        }
        None => bail!("no document stored at {id}"),
    }
}
