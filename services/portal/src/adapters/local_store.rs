//! services/portal/src/adapters/local_store.rs
//!
//! File-backed implementation of the storage ports. Every record lives in its own
//! `<data_dir>/<key>.json` file, written atomically (temp file + rename).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use training_portal_core::{
    catalog::TrainingModule,
    domain::{
        CaseRecord, CaseStatus, FieldValue, FormData, FormDraft, Score, SubmissionStatus,
        SubmittedForm, UserProgress,
    },
    forms::{FormId, FormLookup},
    ports::{CaseHistoryStore, FormRecordStore, PortError, PortResult, ProgressStore},
};

pub const PROGRESS_KEY: &str = "trainingProgress";
pub const CASE_HISTORY_KEY: &str = "newarkhhs_progress";
pub const DRAFTS_KEY: &str = "newarkhhs_drafts";
pub const SUBMISSIONS_KEY: &str = "newarkhhs_completed";

/// The storage adapter. Holds the data directory and serialises
/// read-modify-write cycles on the same file.
pub struct LocalStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Reads a record, falling back to its default when it is missing or unreadable.
    async fn read_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let path = self.path_for(key);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No stored '{}' record yet; using defaults.", key);
                return T::default();
            }
            Err(e) => {
                warn!("Failed to read '{}': {}. Using defaults.", path.display(), e);
                return T::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                warn!("Stored '{}' record is malformed: {}. Using defaults.", key, e);
                T::default()
            }
        }
    }

    /// Reads a record that is about to be rewritten. Only a missing file counts as
    /// empty; an unreadable or malformed one is an error and is left untouched.
    async fn read_for_update<T: DeserializeOwned + Default>(&self, key: &str) -> PortResult<T> {
        let path = self.path_for(key);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
            Err(e) => {
                return Err(PortError::Unexpected(format!(
                    "Failed to read '{}': {e}",
                    path.display()
                )))
            }
        };
        serde_json::from_str(&text).map_err(|e| {
            warn!("Refusing to rewrite malformed '{}' record: {}", key, e);
            PortError::Unexpected(format!("Stored '{key}' record is malformed: {e}"))
        })
    }

    async fn write<T: Serialize>(&self, key: &str, value: &T) -> PortResult<()> {
        let bytes =
            serde_json::to_vec_pretty(value).map_err(|e| PortError::Unexpected(e.to_string()))?;
        let path = self.path_for(key);
        tokio::task::spawn_blocking(move || atomic_write(&path, &bytes))
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .map_err(|e| PortError::Unexpected(format!("Failed to write '{key}': {e}")))
    }
}

fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

//=========================================================================================
// Stored Record Structs (Private to this module)
//=========================================================================================

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct ProgressRecord {
    completed_modules: Vec<u32>,
    current_module: u32,
    scores: BTreeMap<String, f64>,
    total_watch_time: u64,
}

impl ProgressRecord {
    fn to_domain(self) -> UserProgress {
        let mut progress = UserProgress {
            current_module: self.current_module.max(1),
            total_watch_time: self.total_watch_time,
            ..UserProgress::default()
        };

        for number in self.completed_modules {
            let Some(module) = TrainingModule::from_number(number) else {
                warn!("Ignoring stored completion of unknown module {}.", number);
                continue;
            };
            let score = match self.scores.get(&number.to_string()) {
                Some(raw) => to_score(*raw),
                None => {
                    warn!("Completed module {} has no stored score; using 0%.", number);
                    Score::ZERO
                }
            };
            progress.completed_modules.insert(module);
            progress.scores.insert(module, score);
            progress.current_module = progress.current_module.max(number + 1);
        }
        progress
    }

    fn from_domain(progress: &UserProgress) -> Self {
        Self {
            completed_modules: progress.completed_modules.iter().map(|m| m.number()).collect(),
            current_module: progress.current_module,
            scores: progress
                .scores
                .iter()
                .map(|(module, score)| (module.number().to_string(), f64::from(score.percent())))
                .collect(),
            total_watch_time: progress.total_watch_time,
        }
    }
}

fn to_score(raw: f64) -> Score {
    let clamped = raw.round().clamp(0.0, 100.0) as u32;
    Score::new(clamped).unwrap_or(Score::ZERO)
}

/// Anything other than the case history in this file, including the legacy
/// `completedModules` list, is ignored on read.
#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct CaseHistoryFile {
    case_history: Vec<CaseRecordRecord>,
    last_updated: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize)]
struct CaseRecordRecord {
    id: String,
    description: String,
    forms: Vec<String>,
    timestamp: DateTime<Utc>,
    status: String,
}

impl CaseRecordRecord {
    fn to_domain(self) -> CaseRecord {
        CaseRecord {
            forms: known_forms(&self.id, self.forms),
            id: self.id,
            description: self.description,
            timestamp: self.timestamp,
            status: CaseStatus::Generated,
        }
    }

    fn from_domain(record: &CaseRecord) -> Self {
        Self {
            id: record.id.clone(),
            description: record.description.clone(),
            forms: record.forms.iter().map(|f| f.as_str().to_string()).collect(),
            timestamp: record.timestamp,
            status: record.status.as_str().to_string(),
        }
    }
}

fn known_forms(case_id: &str, forms: Vec<String>) -> Vec<FormId> {
    forms
        .into_iter()
        .filter_map(|form| match FormId::parse(&form) {
            FormLookup::Known(id) => Some(id),
            FormLookup::Unknown(other) => {
                warn!("Case {} refers to unknown form '{}'; dropping it.", case_id, other);
                None
            }
        })
        .collect()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(untagged)]
enum FieldValueRecord {
    Single(String),
    Multiple(Vec<String>),
}

fn data_to_domain(data: BTreeMap<String, FieldValueRecord>) -> FormData {
    data.into_iter()
        .map(|(name, value)| {
            let value = match value {
                FieldValueRecord::Single(v) => FieldValue::Single(v),
                FieldValueRecord::Multiple(v) => FieldValue::Multiple(v),
            };
            (name, value)
        })
        .collect()
}

fn data_from_domain(data: &FormData) -> BTreeMap<String, FieldValueRecord> {
    data.iter()
        .map(|(name, value)| {
            let value = match value {
                FieldValue::Single(v) => FieldValueRecord::Single(v.clone()),
                FieldValue::Multiple(v) => FieldValueRecord::Multiple(v.clone()),
            };
            (name.clone(), value)
        })
        .collect()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
struct DraftRecord {
    data: BTreeMap<String, FieldValueRecord>,
    saved: DateTime<Utc>,
    form_id: String,
}

impl DraftRecord {
    fn from_domain(draft: &FormDraft) -> Self {
        Self {
            data: data_from_domain(&draft.data),
            saved: draft.saved_at,
            form_id: draft.form_id.as_str().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
struct SubmissionRecord {
    form_id: String,
    data: BTreeMap<String, FieldValueRecord>,
    submitted: DateTime<Utc>,
    status: String,
    confirmation_number: String,
}

impl SubmissionRecord {
    fn to_domain(self) -> Option<SubmittedForm> {
        match FormId::parse(&self.form_id) {
            FormLookup::Known(form_id) => Some(SubmittedForm {
                form_id,
                data: data_to_domain(self.data),
                submitted_at: self.submitted,
                status: SubmissionStatus::Submitted,
                confirmation_number: self.confirmation_number,
            }),
            FormLookup::Unknown(other) => {
                warn!(
                    "Submission {} is for unknown form '{}'; skipping it.",
                    self.confirmation_number, other
                );
                None
            }
        }
    }

    fn from_domain(submission: &SubmittedForm) -> Self {
        Self {
            form_id: submission.form_id.as_str().to_string(),
            data: data_from_domain(&submission.data),
            submitted: submission.submitted_at,
            status: submission.status.as_str().to_string(),
            confirmation_number: submission.confirmation_number.clone(),
        }
    }
}

//=========================================================================================
// Port Implementations
//=========================================================================================

#[async_trait]
impl ProgressStore for LocalStore {
    async fn load(&self) -> UserProgress {
        self.read_or_default::<ProgressRecord>(PROGRESS_KEY)
            .await
            .to_domain()
    }

    async fn save(&self, progress: &UserProgress) -> PortResult<()> {
        self.write(PROGRESS_KEY, &ProgressRecord::from_domain(progress))
            .await
    }
}

#[async_trait]
impl CaseHistoryStore for LocalStore {
    async fn load_history(&self) -> Vec<CaseRecord> {
        self.read_or_default::<CaseHistoryFile>(CASE_HISTORY_KEY)
            .await
            .case_history
            .into_iter()
            .map(CaseRecordRecord::to_domain)
            .collect()
    }

    async fn save_history(&self, history: &[CaseRecord]) -> PortResult<()> {
        let file = CaseHistoryFile {
            case_history: history.iter().map(CaseRecordRecord::from_domain).collect(),
            last_updated: Some(Utc::now()),
        };
        let _guard = self.write_lock.lock().await;
        self.write(CASE_HISTORY_KEY, &file).await
    }
}

#[async_trait]
impl FormRecordStore for LocalStore {
    async fn load_drafts(&self) -> PortResult<BTreeMap<FormId, FormDraft>> {
        let stored: BTreeMap<String, DraftRecord> = self.read_or_default(DRAFTS_KEY).await;
        let mut drafts = BTreeMap::new();
        for (key, record) in stored {
            match FormId::parse(&key) {
                FormLookup::Known(form_id) => {
                    drafts.insert(
                        form_id,
                        FormDraft {
                            form_id,
                            data: data_to_domain(record.data),
                            saved_at: record.saved,
                        },
                    );
                }
                FormLookup::Unknown(other) => {
                    warn!("Ignoring stored draft of unknown form '{}'.", other);
                }
            }
        }
        Ok(drafts)
    }

    async fn save_draft(&self, draft: &FormDraft) -> PortResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut stored: BTreeMap<String, DraftRecord> = self.read_for_update(DRAFTS_KEY).await?;
        stored.insert(
            draft.form_id.as_str().to_string(),
            DraftRecord::from_domain(draft),
        );
        self.write(DRAFTS_KEY, &stored).await
    }

    async fn remove_draft(&self, form_id: FormId) -> PortResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut stored: BTreeMap<String, DraftRecord> = self.read_for_update(DRAFTS_KEY).await?;
        if stored.remove(form_id.as_str()).is_none() {
            return Ok(());
        }
        self.write(DRAFTS_KEY, &stored).await
    }

    async fn append_submission(&self, submission: &SubmittedForm) -> PortResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut stored: Vec<SubmissionRecord> = self.read_for_update(SUBMISSIONS_KEY).await?;
        stored.push(SubmissionRecord::from_domain(submission));
        self.write(SUBMISSIONS_KEY, &stored).await
    }

    async fn list_submissions(&self) -> PortResult<Vec<SubmittedForm>> {
        let stored: Vec<SubmissionRecord> = self.read_or_default(SUBMISSIONS_KEY).await;
        Ok(stored
            .into_iter()
            .filter_map(SubmissionRecord::to_domain)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        (dir, store)
    }

    fn completed(numbers: &[(u32, u32)]) -> UserProgress {
        let mut progress = UserProgress::default();
        for (number, score) in numbers {
            let module = TrainingModule::from_number(*number).unwrap();
            progress.completed_modules.insert(module);
            progress.scores.insert(module, Score::new(*score).unwrap());
            progress.current_module = progress.current_module.max(number + 1);
        }
        progress
    }

    #[tokio::test]
    async fn saved_progress_loads_back_equal() {
        let (_dir, store) = store();
        let progress = completed(&[(1, 100), (2, 80), (3, 90)]);

        store.save(&progress).await.unwrap();

        assert_eq!(store.load().await, progress);
    }

    #[tokio::test]
    async fn missing_or_corrupt_progress_loads_as_default() {
        let (dir, store) = store();
        assert_eq!(store.load().await, UserProgress::default());

        std::fs::write(dir.path().join("trainingProgress.json"), "{ not json").unwrap();
        assert_eq!(store.load().await, UserProgress::default());
    }

    #[tokio::test]
    async fn stored_progress_uses_the_browser_layout() {
        let (dir, store) = store();
        store.save(&completed(&[(1, 100)])).await.unwrap();

        let text = std::fs::read_to_string(dir.path().join("trainingProgress.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["completedModules"], serde_json::json!([1]));
        assert_eq!(json["currentModule"], 2);
        assert_eq!(json["scores"]["1"], 100.0);
        assert_eq!(json["totalWatchTime"], 0);
    }

    #[tokio::test]
    async fn inconsistent_progress_is_repaired_on_load() {
        let (dir, store) = store();
        std::fs::write(
            dir.path().join("trainingProgress.json"),
            r#"{"completedModules":[1,2,42],"currentModule":1,"scores":{"1":95,"7":60}}"#,
        )
        .unwrap();

        let progress = store.load().await;

        assert_eq!(progress.completed_modules.len(), 2);
        assert_eq!(progress.score(TrainingModule::IntroContext), Score::new(95));
        assert_eq!(progress.score(TrainingModule::LeadAbatement), Some(Score::ZERO));
        assert_eq!(progress.score(TrainingModule::DataManagement), None);
        assert_eq!(progress.current_module, 3);
    }

    #[tokio::test]
    async fn legacy_completed_modules_in_case_history_are_ignored() {
        let (dir, store) = store();
        std::fs::write(
            dir.path().join("newarkhhs_progress.json"),
            r#"{
                "completedModules": [1, 2, 3],
                "caseHistory": [{
                    "id": "CASE-20251009-042",
                    "description": "Lead paint",
                    "forms": ["lead-inspection", "tax-return"],
                    "timestamp": "2025-10-09T08:53:20.234Z",
                    "status": "Generated"
                }],
                "lastUpdated": "2025-10-09T08:53:20.234Z"
            }"#,
        )
        .unwrap();

        let history = store.load_history().await;

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, "CASE-20251009-042");
        assert_eq!(history[0].forms, vec![FormId::LeadInspection]);
        assert_eq!(ProgressStore::load(&store).await, UserProgress::default());
    }

    #[tokio::test]
    async fn drafts_are_keyed_by_form_and_removed() {
        let (_dir, store) = store();
        let when = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        let mut data = FormData::new();
        data.insert(
            "services_needed".to_string(),
            FieldValue::Multiple(vec!["Job Training".to_string()]),
        );
        let draft = FormDraft {
            form_id: FormId::HomelessIntake,
            data,
            saved_at: when,
        };

        store.save_draft(&draft).await.unwrap();
        store.save_draft(&draft).await.unwrap();
        assert_eq!(
            store.load_drafts().await.unwrap(),
            BTreeMap::from([(FormId::HomelessIntake, draft)])
        );

        store.remove_draft(FormId::HomelessIntake).await.unwrap();
        assert!(store.load_drafts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn submissions_are_appended() {
        let (_dir, store) = store();
        let submission = |n: &str| SubmittedForm {
            form_id: FormId::SafetyInspection,
            data: FormData::new(),
            submitted_at: Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap(),
            status: SubmissionStatus::Submitted,
            confirmation_number: n.to_string(),
        };

        store.append_submission(&submission("NHH-20261019-0001")).await.unwrap();
        store.append_submission(&submission("NHH-20261019-0002")).await.unwrap();

        let numbers: Vec<_> = store
            .list_submissions()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.confirmation_number)
            .collect();
        assert_eq!(numbers, vec!["NHH-20261019-0001", "NHH-20261019-0002"]);
    }

    #[tokio::test]
    async fn unreadable_submission_log_is_never_overwritten() {
        let (dir, store) = store();
        let path = dir.path().join("newarkhhs_completed.json");
        let submission = SubmittedForm {
            form_id: FormId::SafetyInspection,
            data: FormData::new(),
            submitted_at: Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap(),
            status: SubmissionStatus::Submitted,
            confirmation_number: "NHH-20261019-0003".to_string(),
        };

        let truncated = r#"[{"formId":"safety-inspection","data":{},"submitted":"2026-10-19T09:00:00Z","status":"Submitted","confirmationNumber":"NHH-20261019-0001"},{"formId":"#;
        let bad_record = r#"[{"formId":"safety-inspection","data":{"n":5},"submitted":"2026-10-19T09:00:00Z","status":"Submitted","confirmationNumber":"NHH-20261019-0001"}]"#;
        for stored in [truncated, bad_record] {
            std::fs::write(&path, stored).unwrap();

            assert!(matches!(
                store.append_submission(&submission).await,
                Err(PortError::Unexpected(_))
            ));
            assert_eq!(std::fs::read_to_string(&path).unwrap(), stored);
        }
    }

    #[tokio::test]
    async fn unreadable_drafts_are_never_overwritten() {
        let (dir, store) = store();
        let path = dir.path().join("newarkhhs_drafts.json");
        let stored = r#"{"client-grievance":{"data":{"client_name":"Sarah"#;
        std::fs::write(&path, stored).unwrap();
        let draft = FormDraft {
            form_id: FormId::HomelessIntake,
            data: FormData::new(),
            saved_at: Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap(),
        };

        assert!(store.save_draft(&draft).await.is_err());
        assert!(store.remove_draft(FormId::ClientGrievance).await.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), stored);
    }
}
