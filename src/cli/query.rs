//! Query commands (list, latest)

use std::path::Path;

use anyhow::{bail, Context, Result};

use super::output::Output;
use crate::domain::Document;
use crate::storage::Store;

fn parse_query(raw: Option<&str>) -> Result<Option<Document>> {
    raw.map(|text| serde_json::from_str(text).context("query is not a JSON object"))
        .transpose()
}

/// List documents of a type, optionally filtered
pub fn list(output: &Output, root: &Path, doc_type: &str, query: Option<&str>) -> Result<()> {
    let query = parse_query(query)?;
    let store = Store::open(root)?;

    let mut items = Vec::new();
    for item in store.list(doc_type, query.as_ref())? {
        items.push(item?);
    }
    output.verbose_ctx(
        "list",
        &format!("found {} documents of type '{}'", items.len(), doc_type),
    );

    if output.is_json() {
        let items: Vec<_> = items
            .iter()
            .map(|(id, document)| serde_json::json!({ "id": id, "document": document }))
            .collect();
        output.data(&items);
    } else if items.is_empty() {
        println!("No documents of type '{}'.", doc_type);
    } else {
        for (id, document) in items {
            println!("{}\t{}", id, serde_json::to_string(&document)?);
        }
    }
    Ok(())
}

/// Show the most recent document of a type
pub fn latest(output: &Output, root: &Path, doc_type: &str, query: Option<&str>) -> Result<()> {
    let query = parse_query(query)?;
    let store = Store::open(root)?;

    match store.latest(doc_type, query.as_ref())? {
        Some((id, document)) => {
            if output.is_json() {
                output.data(&serde_json::json!({ "id": id, "document": document }));
            } else {
                println!("{}\t{}", id, serde_json::to_string(&document)?);
            }
            Ok(())
        }
        None if output.is_json() => {
            output.data(&serde_json::Value::Null);
            Ok(())
        }
        None => bail!("no documents of type '{doc_type}'"),
    }
}
