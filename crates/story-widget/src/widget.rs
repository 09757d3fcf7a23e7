//! Widget orchestration: selection, the async moderation pipeline, removal,
//! publish, and teardown.
//!
//! State is a record list replaced wholesale on every transition. The
//! moderation call is the only suspension point; a completion is applied
//! only if a record with the same id is still present, so removal during an
//! in-flight analysis simply makes the result a no-op. Preview handles are
//! released exactly once on every exit path.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use story_core::models::{MediaFile, UploadRecord};
use story_core::StoryError;
use story_media::{PreviewAllocator, PreviewHandle, StillExtractor};
use story_moderation::ModerationProvider;

use crate::state::{publish_enabled, render, ViewState};

const PUBLISH_DELAY: Duration = Duration::from_millis(900);

/// Host callbacks for the surrounding modal
pub trait ModalHost: Send + Sync {
    fn is_open(&self) -> bool;
    fn request_close(&self);
}

/// One pending analysis: the record it belongs to and the file to analyze.
/// Carried out by `run_analysis`; the record id is the identity check for
/// applying the result.
#[derive(Debug, Clone)]
pub struct AnalysisTicket {
    pub record_id: Uuid,
    pub file: MediaFile,
}

pub struct StoryUploadWidget {
    records: Mutex<Vec<UploadRecord>>,
    handles: Mutex<HashMap<Uuid, PreviewHandle>>,
    previews: Arc<dyn PreviewAllocator>,
    extractor: Arc<dyn StillExtractor>,
    moderation: Arc<dyn ModerationProvider>,
    modal: Arc<dyn ModalHost>,
    publish_delay: Duration,
}

impl StoryUploadWidget {
    pub fn new(
        previews: Arc<dyn PreviewAllocator>,
        extractor: Arc<dyn StillExtractor>,
        moderation: Arc<dyn ModerationProvider>,
        modal: Arc<dyn ModalHost>,
    ) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            handles: Mutex::new(HashMap::new()),
            previews,
            extractor,
            moderation,
            modal,
            publish_delay: PUBLISH_DELAY,
        }
    }

    /// Accept a user-chosen file. Anything that is not image/* or video/* is
    /// ignored without touching state, as is any selection delivered after
    /// the host modal closed. Acceptance discards the previous record
    /// (releasing its preview), creates one record in `analyzing`, and
    /// returns the ticket for the moderation pipeline.
    pub fn select_file(&self, file: MediaFile) -> Option<AnalysisTicket> {
        if !self.modal.is_open() {
            return None;
        }

        let kind = match file.kind() {
            Some(kind) => kind,
            None => {
                tracing::debug!(
                    content_type = %file.content_type,
                    "Ignoring file with unsupported content type"
                );
                return None;
            }
        };

        let handle = self.previews.allocate(&file);
        let record = UploadRecord::new(file.clone(), kind, handle.url().clone());
        let record_id = record.id;

        {
            let mut records = self.records.lock().expect("widget state lock poisoned");
            let previous = std::mem::replace(&mut *records, vec![record]);
            drop(records);

            let mut handles = self.handles.lock().expect("widget state lock poisoned");
            for old in previous {
                if let Some(old_handle) = handles.remove(&old.id) {
                    self.previews.release(old_handle);
                }
            }
            handles.insert(record_id, handle);
        }

        tracing::info!(record_id = %record_id, kind = %kind, "File selected, analysis pending");
        Some(AnalysisTicket { record_id, file })
    }

    /// Run the moderation pipeline for one ticket: capture a still, classify
    /// it, and apply the outcome. The result is discarded if the record was
    /// removed while the call was in flight.
    pub async fn run_analysis(&self, ticket: AnalysisTicket) {
        let outcome = match self.extractor.capture(&ticket.file).await {
            Ok(still) => self.moderation.classify(&still).await,
            Err(e) => Err(e),
        };

        let mut records = self.records.lock().expect("widget state lock poisoned");
        let mut applied = false;
        let next: Vec<UploadRecord> = records
            .drain(..)
            .map(|record| {
                if record.id != ticket.record_id || !record.is_analyzing() {
                    return record;
                }
                applied = true;
                match &outcome {
                    Ok(verdict) => record.with_verdict(verdict.clone()),
                    Err(e) => {
                        tracing::warn!(record_id = %record.id, error = %e, "Analysis failed");
                        record.with_error(e.user_message())
                    }
                }
            })
            .collect();
        *records = next;

        if !applied {
            tracing::debug!(
                record_id = %ticket.record_id,
                "Discarding analysis result for a removed record"
            );
        }
    }

    /// `run_analysis` on a background task
    pub fn spawn_analysis(self: &Arc<Self>, ticket: AnalysisTicket) -> tokio::task::JoinHandle<()> {
        let widget = Arc::clone(self);
        tokio::spawn(async move { widget.run_analysis(ticket).await })
    }

    /// Remove a record and release its preview. An in-flight analysis is not
    /// cancelled; its completion will fail the identity check.
    pub fn remove(&self, record_id: Uuid) {
        let mut records = self.records.lock().expect("widget state lock poisoned");
        records.retain(|r| r.id != record_id);
        drop(records);

        let handle = self
            .handles
            .lock()
            .expect("widget state lock poisoned")
            .remove(&record_id);
        if let Some(handle) = handle {
            self.previews.release(handle);
            tracing::info!(record_id = %record_id, "Record removed");
        }
    }

    /// Snapshot of the current records
    pub fn records(&self) -> Vec<UploadRecord> {
        self.records
            .lock()
            .expect("widget state lock poisoned")
            .clone()
    }

    /// Current rendering of every record
    pub fn render(&self) -> Vec<ViewState> {
        self.records().iter().map(render).collect()
    }

    pub fn publish_enabled(&self) -> bool {
        publish_enabled(&self.records())
    }

    /// Simulated publish: fixed delay standing in for the network call, then
    /// clear everything and close the modal.
    pub async fn publish(&self) -> Result<(), StoryError> {
        if !self.publish_enabled() {
            return Err(StoryError::InvalidInput(
                "Publish requires an approved story and no analysis in progress".to_string(),
            ));
        }

        tokio::time::sleep(self.publish_delay).await;

        self.clear_all();
        self.modal.request_close();
        tracing::info!("Story published");
        Ok(())
    }

    /// Cancel: discard everything and close the modal
    pub fn cancel(&self) {
        self.clear_all();
        self.modal.request_close();
    }

    /// Teardown on host unmount: release every preview, keep the modal alone
    pub fn teardown(&self) {
        self.clear_all();
    }

    fn clear_all(&self) {
        let mut records = self.records.lock().expect("widget state lock poisoned");
        records.clear();
        drop(records);

        let drained: Vec<PreviewHandle> = {
            let mut handles = self.handles.lock().expect("widget state lock poisoned");
            handles.drain().map(|(_, h)| h).collect()
        };
        for handle in drained {
            self.previews.release(handle);
        }
    }
}
