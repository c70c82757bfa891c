use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A folder in the document browser. Folders form a tree through `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    /// Weak reference to the parent folder (`None` = root)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Processing state of a stored file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Pending,
    Uploading,
    Processing,
    Ready,
    Error,
}

impl FileStatus {
    pub fn label(self) -> &'static str {
        match self {
            FileStatus::Pending => "Pending",
            FileStatus::Uploading => "Uploading",
            FileStatus::Processing => "Processing",
            FileStatus::Ready => "Ready",
            FileStatus::Error => "Error",
        }
    }
}

/// A document stored in the browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocFile {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    /// MIME type, e.g. `application/pdf`
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Size in bytes
    pub size: u64,
    pub uploaded_by: String,
    pub uploaded_at: NaiveDateTime,
    pub status: FileStatus,
    /// Projects this file is linked to (weak references)
    #[serde(default)]
    pub project_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_field_renamed() {
        let file: DocFile = serde_json::from_str(
            r#"{"id":"file1","name":"a.pdf","type":"application/pdf","size":10,
                "uploadedBy":"Ana","uploadedAt":"2026-01-10T14:30:00","status":"ready","projectIds":["1"]}"#,
        )
        .unwrap();
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(file.folder_id, None);
        assert_eq!(file.status, FileStatus::Ready);

        let out = serde_json::to_value(&file).unwrap();
        assert_eq!(out["type"], "application/pdf");
        assert!(out.get("folderId").is_none());
    }
}
