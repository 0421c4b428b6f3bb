//! CSV import service
//!
//! Rows are processed in file order and written one by one, with no
//! enclosing transaction. A failing row is recorded in the summary and the
//! import continues with the next row.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use insight_common::InsightError;
use insight_persistence::{InsightData, PersistenceService};

use crate::lookup::LookupTable;
use crate::transcoder::{self, CsvDocument};

/// Policy for rows whose `insightId` already exists in the store
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImportPolicy {
    /// Fail the row as a duplicate
    #[default]
    Reject,
    /// Update the existing record in place
    Overwrite,
}

impl ImportPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ImportPolicy::Reject => "REJECT",
            ImportPolicy::Overwrite => "OVERWRITE",
        }
    }
}

impl Display for ImportPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ImportPolicy {
    type Err = InsightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "REJECT" => Ok(ImportPolicy::Reject),
            "OVERWRITE" => Ok(ImportPolicy::Overwrite),
            _ => Err(InsightError::validation(format!(
                "invalid policy: {}. Valid values: REJECT, OVERWRITE",
                s
            ))),
        }
    }
}

/// A rejected row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub row: usize,
    pub error: String,
}

/// Import operation result summary
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub success: bool,
    pub imported: usize,
    pub errors: usize,
    pub error_details: Vec<ErrorDetail>,
}

impl Default for ImportSummary {
    fn default() -> Self {
        Self {
            success: true,
            imported: 0,
            errors: 0,
            error_details: Vec::new(),
        }
    }
}

impl ImportSummary {
    fn fail(&mut self, row: usize, error: String) {
        tracing::debug!(row, error = %error, "Import row rejected");
        self.errors += 1;
        self.error_details.push(ErrorDetail { row, error });
    }
}

fn duplicate(insight_id: &str) -> String {
    format!("duplicate insightId: {}", insight_id)
}

/// Reason string for a failed store write
fn write_failure(err: anyhow::Error) -> String {
    match err.downcast_ref::<InsightError>() {
        Some(e @ (InsightError::Conflict(_) | InsightError::Validation(_))) => e.to_string(),
        Some(InsightError::Storage(message)) => InsightError::Storage(message.clone()).to_string(),
        _ => InsightError::Storage(err.to_string()).to_string(),
    }
}

/// Import a CSV document. `username` becomes `updatedBy` of every written row.
///
/// File-level problems (empty or unreadable file) fail the whole call with a
/// [`transcoder::TranscodeError`]; everything else is reported per row.
pub async fn import_csv<P>(
    persistence: &P,
    bytes: &[u8],
    policy: ImportPolicy,
    username: &str,
) -> anyhow::Result<ImportSummary>
where
    P: PersistenceService + ?Sized,
{
    let document = transcoder::read_csv(bytes)?;
    let lookup = LookupTable::load(persistence).await?;

    tracing::info!(
        rows = document.rows.len(),
        policy = %policy,
        username = %username,
        "Importing insights"
    );

    let summary = import_document(persistence, &document, &lookup, policy, username).await?;

    tracing::info!(
        imported = summary.imported,
        errors = summary.errors,
        "Insight import finished"
    );

    Ok(summary)
}

async fn import_document<P>(
    persistence: &P,
    document: &CsvDocument,
    lookup: &LookupTable,
    policy: ImportPolicy,
    username: &str,
) -> anyhow::Result<ImportSummary>
where
    P: PersistenceService + ?Sized,
{
    let mut summary = ImportSummary::default();
    let mut seen: HashSet<String> = HashSet::new();

    for row in &document.rows {
        let mut data = match document.parse_row(row, lookup) {
            Ok(d) => d,
            Err(reason) => {
                summary.fail(row.number, reason);
                continue;
            }
        };
        data.updated_by = Some(username.to_string());

        if let Some(insight_id) = data.insight_id.clone()
            && !seen.insert(insight_id.clone())
        {
            summary.fail(row.number, duplicate(&insight_id));
            continue;
        }

        match write_row(persistence, &data, policy).await {
            Ok(()) => summary.imported += 1,
            Err(reason) => summary.fail(row.number, reason),
        }
    }

    Ok(summary)
}

async fn write_row<P>(persistence: &P, data: &InsightData, policy: ImportPolicy) -> Result<(), String>
where
    P: PersistenceService + ?Sized,
{
    let existing = match data.insight_id.as_deref() {
        Some(insight_id) => persistence
            .insight_find_by_insight_id(insight_id)
            .await
            .map_err(write_failure)?,
        None => None,
    };

    match (existing, policy) {
        (Some(existing), ImportPolicy::Overwrite) => {
            persistence
                .insight_update(existing.id, data)
                .await
                .map_err(write_failure)?;
        }
        (Some(existing), ImportPolicy::Reject) => {
            return Err(duplicate(existing.data.insight_id.as_deref().unwrap_or_default()));
        }
        (None, _) => {
            persistence.insight_create(data).await.map_err(write_failure)?;
        }
    }

    Ok(())
}
