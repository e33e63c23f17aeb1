//! Transaction template model and loading.
//!
//! A template file holds one JSON transaction request: a `TransactItems`
//! array of write actions, each keyed by exactly one of `Put`, `Update`, or
//! `Delete`. Beyond the table name the action payloads (items, keys,
//! expressions) are carried opaquely and forwarded to the store untouched.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::LoadError;
use crate::placeholder::substitute;

/// One atomic batch of write actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    #[serde(rename = "TransactItems")]
    pub items: Vec<WriteAction>,
}

/// A single write action, tagged by its operation kind.
///
/// External tagging enforces "exactly one of Put/Update/Delete" per array
/// entry: zero or multiple keys fail deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WriteAction {
    Put(WriteSpec),
    Update(WriteSpec),
    Delete(WriteSpec),
}

/// The body of a write action: the target table plus the opaque payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteSpec {
    #[serde(rename = "TableName")]
    pub table_name: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl WriteAction {
    pub fn table_name(&self) -> &str {
        &self.spec().table_name
    }

    pub fn spec(&self) -> &WriteSpec {
        match self {
            Self::Put(spec) | Self::Update(spec) | Self::Delete(spec) => spec,
        }
    }

    fn spec_mut(&mut self) -> &mut WriteSpec {
        match self {
            Self::Put(spec) | Self::Update(spec) | Self::Delete(spec) => spec,
        }
    }
}

/// Reads `path`, expands `{NAME}` placeholders from `vars`, and parses the
/// result into a [`TransactionRequest`].
///
/// Substitution happens on the raw text, before parsing, so placeholders can
/// sit anywhere a JSON string can. A leading byte order mark is ignored.
pub fn load_template(
    path: &Path,
    vars: &BTreeMap<String, String>,
) -> Result<TransactionRequest, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // Editors on Windows often prepend a BOM, which serde_json rejects.
    let text = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
    let expanded = substitute(text, |name| vars.get(name).cloned());
    let request: TransactionRequest =
        serde_json::from_str(&expanded).map_err(|source| LoadError::MalformedTemplate {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(
        path = %path.display(),
        actions = request.items.len(),
        "template loaded"
    );
    Ok(request)
}

/// Redirects every action in `request` to `table`, when one is given.
///
/// `None` and the empty string both leave the template's own table names in
/// place. The override applies uniformly; there is no per-action opt-out.
pub fn apply_table_override(request: &mut TransactionRequest, table: Option<&str>) {
    let Some(table) = table.filter(|name| !name.is_empty()) else {
        return;
    };
    for action in &mut request.items {
        action.spec_mut().table_name = table.to_string();
    }
}
