use crate::model::document::FileStatus;

/// Progress added per tick while uploading
pub const PROGRESS_STEP: u8 = 10;
/// Ticks spent in `processing` before a file is ready
pub const PROCESSING_TICKS: u8 = 3;

/// One entry of the upload panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub id: u64,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub folder_id: Option<String>,
    pub project_id: Option<String>,
    pub status: FileStatus,
    /// 0..=100
    pub progress: u8,
    pub error: Option<String>,
    processing_left: u8,
}

/// An upload that reached `ready` on the last tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedUpload {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub folder_id: Option<String>,
    pub project_id: Option<String>,
}

/// Deterministic stand-in for a file upload: every `tick` advances each
/// in-flight entry one step through pending, uploading, processing, ready.
#[derive(Debug, Default)]
pub struct UploadQueue {
    items: Vec<Upload>,
    next_id: u64,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Upload] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True while any entry still needs ticks
    pub fn is_active(&self) -> bool {
        self.items.iter().any(|u| {
            matches!(
                u.status,
                FileStatus::Pending | FileStatus::Uploading | FileStatus::Processing
            )
        })
    }

    pub fn enqueue(
        &mut self,
        name: &str,
        size: u64,
        folder_id: Option<String>,
        project_id: Option<String>,
    ) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Upload {
            id,
            name: name.to_string(),
            mime_type: mime_from_name(name).to_string(),
            size,
            folder_id,
            project_id,
            status: FileStatus::Pending,
            progress: 0,
            error: None,
            processing_left: 0,
        });
        id
    }

    /// Advance every in-flight upload by one step and return the ones that
    /// became ready
    pub fn tick(&mut self) -> Vec<CompletedUpload> {
        let mut completed = Vec::new();
        for upload in &mut self.items {
            match upload.status {
                FileStatus::Pending => {
                    upload.status = FileStatus::Uploading;
                    upload.progress = 0;
                }
                FileStatus::Uploading => {
                    if upload.progress >= 100 {
                        upload.status = FileStatus::Processing;
                        upload.processing_left = PROCESSING_TICKS;
                    } else {
                        upload.progress = (upload.progress + PROGRESS_STEP).min(100);
                    }
                }
                FileStatus::Processing => {
                    upload.processing_left = upload.processing_left.saturating_sub(1);
                    if upload.processing_left == 0 {
                        upload.status = FileStatus::Ready;
                        completed.push(CompletedUpload {
                            name: upload.name.clone(),
                            mime_type: upload.mime_type.clone(),
                            size: upload.size,
                            folder_id: upload.folder_id.clone(),
                            project_id: upload.project_id.clone(),
                        });
                    }
                }
                FileStatus::Ready | FileStatus::Error => {}
            }
        }
        completed
    }

    /// Abort an in-flight upload, leaving it in the `error` state
    pub fn fail(&mut self, id: u64, reason: &str) -> bool {
        match self.items.iter_mut().find(|u| u.id == id) {
            Some(u) if u.status != FileStatus::Ready && u.status != FileStatus::Error => {
                u.status = FileStatus::Error;
                u.error = Some(reason.to_string());
                true
            }
            _ => false,
        }
    }

    /// Restart a failed upload from scratch. Only entries in `error` qualify.
    pub fn retry(&mut self, id: u64) -> bool {
        match self.items.iter_mut().find(|u| u.id == id) {
            Some(u) if u.status == FileStatus::Error => {
                u.status = FileStatus::Pending;
                u.progress = 0;
                u.error = None;
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|u| u.id != id);
        self.items.len() != before
    }

    /// Drop every entry that finished successfully
    pub fn clear_ready(&mut self) {
        self.items.retain(|u| u.status != FileStatus::Ready);
    }
}

/// Best-effort MIME type from a file extension
pub fn mime_from_name(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "dwg" => "application/acad",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "csv" => "text/csv",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}
