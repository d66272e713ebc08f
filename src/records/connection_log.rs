use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::error::{require, BridgeResult};
use crate::helpers::time::now;
use crate::observability::metrics::get_metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Lean,
    Plaid,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Lean => "lean",
            Provider::Plaid => "plaid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub account_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

/// One successful bank link. Tokens are deliberately not part of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub provider: Provider,
    #[serde(default)]
    pub institution_id: String,
    #[serde(default)]
    pub institution_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(default)]
    pub accounts: Vec<AccountSummary>,
    /// set by the log on append when the caller leaves it out
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Append-only JSON-lines log of connection records.
///
/// Each record is written with a single append, so concurrent writers cannot
/// drop each other's entries. Nothing is ever rewritten or deleted.
#[derive(Debug, Clone)]
pub struct ConnectionLog {
    path: PathBuf,
}

impl ConnectionLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, mut record: ConnectionRecord) -> BridgeResult<ConnectionRecord> {
        require("institution_id", &record.institution_id)?;
        if record.created_at.is_none() {
            record.created_at = Some(now());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut line = serde_json::to_vec(&record).map_err(anyhow::Error::from)?;
        line.push(b'\n');

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path).await?;
        file.write_all(&line).await?;
        file.flush().await?;

        get_metrics().await.connection_records.with_label_values(&[record.provider.as_str()]).inc();
        info!(provider = record.provider.as_str(), institution_id = %record.institution_id, "connection record appended");
        Ok(record)
    }

    /// All readable records, oldest first. Malformed lines are skipped.
    pub async fn list(&self) -> BridgeResult<Vec<ConnectionRecord>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let records = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(idx, line)| {
                serde_json::from_str::<ConnectionRecord>(line)
                    .inspect_err(|e| warn!("skipping malformed connection record at line {}: {}", idx + 1, e))
                    .ok()
            })
            .collect();
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plaid_record(institution_id: &str) -> ConnectionRecord {
        ConnectionRecord {
            provider: Provider::Plaid,
            institution_id: institution_id.to_string(),
            institution_name: "First Platypus Bank".to_string(),
            customer_id: None,
            entity_id: None,
            item_id: Some("item-1".to_string()),
            accounts: vec![AccountSummary {
                account_id: "acc-1".to_string(),
                name: "Checking".to_string(),
                mask: Some("0000".to_string()),
                subtype: Some("checking".to_string()),
            }],
            created_at: None,
        }
    }

    #[tokio::test]
    async fn appends_and_lists_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = ConnectionLog::new(dir.path().join("nested/connections.jsonl"));

        assert!(log.list().await.unwrap().is_empty());

        let first = log.append(plaid_record("ins_1")).await.unwrap();
        assert!(first.created_at.is_some());
        log.append(plaid_record("ins_2")).await.unwrap();

        let records = log.list().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].institution_id, "ins_1");
        assert_eq!(records[1].institution_id, "ins_2");
        assert_eq!(records[0].accounts[0].mask.as_deref(), Some("0000"));
    }

    #[tokio::test]
    async fn skips_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("connections.jsonl");
        let log = ConnectionLog::new(&path);

        log.append(plaid_record("ins_1")).await.unwrap();
        let mut file = OpenOptions::new().append(true).open(&path).await.unwrap();
        file.write_all(b"{not json\n\n").await.unwrap();
        log.append(plaid_record("ins_2")).await.unwrap();

        let ids: Vec<String> = log.list().await.unwrap().into_iter().map(|r| r.institution_id).collect();
        assert_eq!(ids, vec!["ins_1", "ins_2"]);
    }

    #[tokio::test]
    async fn rejects_record_without_institution() {
        let dir = tempfile::tempdir().unwrap();
        let log = ConnectionLog::new(dir.path().join("connections.jsonl"));

        assert!(log.append(plaid_record("")).await.is_err());
        assert!(!log.path().exists());
    }
}
