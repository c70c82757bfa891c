use std::collections::HashSet;

use tracing::warn;

use crate::model::document::{DocFile, Folder};

/// Label of the synthetic root crumb
pub const ALL_FILES: &str = "All files";

// ---------------------------------------------------------------------------
// Folder tree
// ---------------------------------------------------------------------------

pub fn find_folder<'a>(folders: &'a [Folder], folder_id: &str) -> Option<&'a Folder> {
    folders.iter().find(|f| f.id == folder_id)
}

pub fn root_folders(folders: &[Folder]) -> Vec<&Folder> {
    folders.iter().filter(|f| f.parent_id.is_none()).collect()
}

pub fn child_folders<'a>(folders: &'a [Folder], parent_id: &str) -> Vec<&'a Folder> {
    folders
        .iter()
        .filter(|f| f.parent_id.as_deref() == Some(parent_id))
        .collect()
}

pub fn has_children(folders: &[Folder], folder_id: &str) -> bool {
    folders
        .iter()
        .any(|f| f.parent_id.as_deref() == Some(folder_id))
}

/// A visible row of the folder sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRow {
    pub folder_id: String,
    pub name: String,
    pub depth: usize,
    pub has_children: bool,
    pub is_expanded: bool,
}

/// Flatten the folder tree depth-first, descending only into expanded folders.
/// A folder already emitted is never revisited, so parent cycles terminate.
pub fn folder_rows(folders: &[Folder], expanded: &HashSet<String>) -> Vec<FolderRow> {
    let mut rows = Vec::new();
    let mut visited = HashSet::new();
    for root in root_folders(folders) {
        push_folder_rows(folders, root, 0, expanded, &mut visited, &mut rows);
    }
    rows
}

fn push_folder_rows<'a>(
    folders: &'a [Folder],
    folder: &'a Folder,
    depth: usize,
    expanded: &HashSet<String>,
    visited: &mut HashSet<&'a str>,
    rows: &mut Vec<FolderRow>,
) {
    if !visited.insert(folder.id.as_str()) {
        return;
    }
    let has_children = has_children(folders, &folder.id);
    let is_expanded = has_children && expanded.contains(&folder.id);
    rows.push(FolderRow {
        folder_id: folder.id.clone(),
        name: folder.name.clone(),
        depth,
        has_children,
        is_expanded,
    });
    if is_expanded {
        for child in child_folders(folders, &folder.id) {
            push_folder_rows(folders, child, depth + 1, expanded, visited, rows);
        }
    }
}

/// Ids of `folder_id` and all of its ancestors, nearest first.
/// Stops at the first repeated folder when `parent_id` links form a cycle.
pub fn ancestor_chain<'a>(folders: &'a [Folder], folder_id: &str) -> Vec<&'a Folder> {
    let mut chain = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = find_folder(folders, folder_id);
    while let Some(folder) = current {
        if !visited.insert(folder.id.as_str()) {
            warn!(folder = %folder.id, "folder parent cycle detected");
            break;
        }
        chain.push(folder);
        current = folder
            .parent_id
            .as_deref()
            .and_then(|parent| find_folder(folders, parent));
    }
    chain
}

/// One step of the breadcrumb trail. `id` is `None` for the root crumb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub id: Option<String>,
    pub name: String,
}

/// Root crumb followed by the selected folder's ancestors, top-down
pub fn breadcrumbs(folders: &[Folder], selected: Option<&str>) -> Vec<Crumb> {
    let mut crumbs = vec![Crumb {
        id: None,
        name: ALL_FILES.to_string(),
    }];
    if let Some(selected) = selected {
        crumbs.extend(ancestor_chain(folders, selected).into_iter().rev().map(|f| Crumb {
            id: Some(f.id.clone()),
            name: f.name.clone(),
        }));
    }
    crumbs
}

// ---------------------------------------------------------------------------
// File filtering
// ---------------------------------------------------------------------------

/// Criteria for the file table. Every set criterion must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileFilter {
    /// `None` shows files from every folder
    pub folder_id: Option<String>,
    /// Case-insensitive substring of the file name
    pub query: String,
    pub mime_type: Option<String>,
    /// Hide files already linked to this project
    pub not_linked_to: Option<String>,
}

impl FileFilter {
    pub fn matches(&self, file: &DocFile) -> bool {
        let matches_folder = self
            .folder_id
            .as_deref()
            .is_none_or(|folder| file.folder_id.as_deref() == Some(folder));
        let query = self.query.to_lowercase();
        let matches_query = query.is_empty() || file.name.to_lowercase().contains(&query);
        let matches_type = self
            .mime_type
            .as_deref()
            .is_none_or(|mime| file.mime_type == mime);
        let not_linked = self
            .not_linked_to
            .as_deref()
            .is_none_or(|project| !file.project_ids.iter().any(|p| p == project));
        matches_folder && matches_query && matches_type && not_linked
    }
}

pub fn filter_files<'a>(files: &'a [DocFile], filter: &FileFilter) -> Vec<&'a DocFile> {
    files.iter().filter(|f| filter.matches(f)).collect()
}

/// Files linked to a project
pub fn project_files<'a>(files: &'a [DocFile], project_id: &str) -> Vec<&'a DocFile> {
    files
        .iter()
        .filter(|f| f.project_ids.iter().any(|p| p == project_id))
        .collect()
}

/// Folders holding at least one of `files`, plus their ancestors, in the
/// original folder order
pub fn relevant_folders<'a>(folders: &'a [Folder], files: &[&DocFile]) -> Vec<&'a Folder> {
    let mut keep: HashSet<&str> = HashSet::new();
    for folder_id in files.iter().filter_map(|f| f.folder_id.as_deref()) {
        for folder in ancestor_chain(folders, folder_id) {
            keep.insert(folder.id.as_str());
        }
    }
    folders
        .iter()
        .filter(|f| keep.contains(f.id.as_str()))
        .collect()
}

/// Distinct MIME types in first-seen order
pub fn file_types(files: &[DocFile]) -> Vec<&str> {
    let mut seen = HashSet::new();
    files
        .iter()
        .map(|f| f.mime_type.as_str())
        .filter(|t| seen.insert(*t))
        .collect()
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DocError {
    #[error("file not found: {0}")]
    FileNotFound(String),
    #[error("folder not found: {0}")]
    FolderNotFound(String),
    #[error("name is required")]
    NameRequired,
}

/// Prepend a folder (newest first). A parent that does not exist is rejected.
pub fn create_folder(folders: &[Folder], folder: Folder) -> Result<Vec<Folder>, DocError> {
    if folder.name.trim().is_empty() {
        return Err(DocError::NameRequired);
    }
    if let Some(parent) = folder.parent_id.as_deref()
        && find_folder(folders, parent).is_none()
    {
        return Err(DocError::FolderNotFound(parent.to_string()));
    }
    let mut out = Vec::with_capacity(folders.len() + 1);
    out.push(folder);
    out.extend_from_slice(folders);
    Ok(out)
}

/// Prepend a file (newest first)
pub fn add_file(files: &[DocFile], file: DocFile) -> Vec<DocFile> {
    let mut out = Vec::with_capacity(files.len() + 1);
    out.push(file);
    out.extend_from_slice(files);
    out
}

pub fn rename_file(files: &[DocFile], file_id: &str, new_name: &str) -> Result<Vec<DocFile>, DocError> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(DocError::NameRequired);
    }
    update_file(files, file_id, |f| f.name = new_name.to_string())
}

pub fn delete_file(files: &[DocFile], file_id: &str) -> Result<Vec<DocFile>, DocError> {
    if !files.iter().any(|f| f.id == file_id) {
        return Err(DocError::FileNotFound(file_id.to_string()));
    }
    Ok(files.iter().filter(|f| f.id != file_id).cloned().collect())
}

/// Link every listed file to `project_id`. Already-linked files are left as is.
pub fn link_files(files: &[DocFile], file_ids: &[String], project_id: &str) -> Vec<DocFile> {
    files
        .iter()
        .map(|f| {
            let mut f = f.clone();
            if file_ids.contains(&f.id) && !f.project_ids.iter().any(|p| p == project_id) {
                f.project_ids.push(project_id.to_string());
            }
            f
        })
        .collect()
}

pub fn unlink_file(files: &[DocFile], file_id: &str, project_id: &str) -> Result<Vec<DocFile>, DocError> {
    update_file(files, file_id, |f| f.project_ids.retain(|p| p != project_id))
}

fn update_file(
    files: &[DocFile],
    file_id: &str,
    edit: impl FnOnce(&mut DocFile),
) -> Result<Vec<DocFile>, DocError> {
    let idx = files
        .iter()
        .position(|f| f.id == file_id)
        .ok_or_else(|| DocError::FileNotFound(file_id.to_string()))?;
    let mut out = files.to_vec();
    edit(&mut out[idx]);
    Ok(out)
}

// ---------------------------------------------------------------------------
// Presentation helpers
// ---------------------------------------------------------------------------

/// Human-readable size with a 1024 base, rounded to two decimals
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".into();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    // Drop trailing zeros: 2.30 -> 2.3, 5.00 -> 5
    let text = format!("{:.2}", rounded);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", text, UNITS[unit])
}

pub fn is_image(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// Short type label for the file table
pub fn file_type_label(mime_type: &str) -> String {
    if is_image(mime_type) {
        return "Image".into();
    }
    if mime_type == "application/pdf" {
        return "PDF".into();
    }
    if mime_type.contains("word") {
        return "Word".into();
    }
    if mime_type.contains("excel") || mime_type.contains("sheet") {
        return "Excel".into();
    }
    if mime_type == "application/acad" {
        return "AutoCAD".into();
    }
    match mime_type.split('/').nth(1) {
        Some(sub) if !sub.is_empty() => sub.to_uppercase(),
        _ => "File".into(),
    }
}

/// Name of the folder a file lives in, for display
pub fn folder_name<'a>(folders: &'a [Folder], folder_id: Option<&str>) -> &'a str {
    match folder_id {
        None => "No folder",
        Some(id) => find_folder(folders, id).map_or("Unknown", |f| f.name.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Seed;
    use chrono::NaiveDateTime;
    use pretty_assertions::assert_eq;

    fn seed() -> Seed {
        Seed::builtin().unwrap()
    }

    fn folder(id: &str, parent: Option<&str>) -> Folder {
        Folder {
            id: id.into(),
            name: format!("Folder {}", id),
            parent_id: parent.map(String::from),
            created_at: NaiveDateTime::parse_from_str("2026-01-05T10:00:00", "%Y-%m-%dT%H:%M:%S")
                .unwrap(),
        }
    }

    fn crumb_names(crumbs: &[Crumb]) -> Vec<&str> {
        crumbs.iter().map(|c| c.name.as_str()).collect()
    }

    // --- tree ---

    #[test]
    fn test_folder_rows_collapsed() {
        let seed = seed();
        let rows = folder_rows(&seed.folders, &HashSet::new());
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Contratos", "Planos", "Fotos", "Presupuestos"]);
        assert!(rows[0].has_children);
        assert!(!rows[0].is_expanded);
    }

    #[test]
    fn test_folder_rows_expanded() {
        let seed = seed();
        let expanded: HashSet<String> = ["f1".to_string()].into();
        let rows = folder_rows(&seed.folders, &expanded);
        assert_eq!(rows[1].name, "Legal");
        assert_eq!(rows[1].depth, 1);
        assert!(rows[0].is_expanded);
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn test_folder_rows_ignore_expanded_leaf() {
        let seed = seed();
        let expanded: HashSet<String> = ["f2".to_string()].into();
        let rows = folder_rows(&seed.folders, &expanded);
        assert!(!rows[1].is_expanded);
    }

    // --- breadcrumbs ---

    #[test]
    fn test_breadcrumbs_root() {
        let seed = seed();
        assert_eq!(crumb_names(&breadcrumbs(&seed.folders, None)), vec![ALL_FILES]);
    }

    #[test]
    fn test_breadcrumbs_nested() {
        let seed = seed();
        let crumbs = breadcrumbs(&seed.folders, Some("f5"));
        assert_eq!(crumb_names(&crumbs), vec![ALL_FILES, "Contratos", "Legal"]);
        assert_eq!(crumbs[0].id, None);
        assert_eq!(crumbs[2].id.as_deref(), Some("f5"));
    }

    #[test]
    fn test_breadcrumbs_unknown_folder() {
        let seed = seed();
        assert_eq!(
            crumb_names(&breadcrumbs(&seed.folders, Some("nope"))),
            vec![ALL_FILES]
        );
    }

    #[test]
    fn test_breadcrumbs_terminate_on_cycle() {
        let folders = vec![
            folder("a", Some("c")),
            folder("b", Some("a")),
            folder("c", Some("b")),
        ];
        let crumbs = breadcrumbs(&folders, Some("a"));
        assert_eq!(
            crumb_names(&crumbs),
            vec![ALL_FILES, "Folder b", "Folder c", "Folder a"]
        );
    }

    #[test]
    fn test_breadcrumbs_self_parent() {
        let folders = vec![folder("a", Some("a"))];
        assert_eq!(
            crumb_names(&breadcrumbs(&folders, Some("a"))),
            vec![ALL_FILES, "Folder a"]
        );
    }

    // --- filtering ---

    #[test]
    fn test_filter_by_folder_and_query() {
        let seed = seed();
        let filter = FileFilter {
            folder_id: Some("f3".into()),
            query: "AVANCE_2".into(),
            ..Default::default()
        };
        let hits = filter_files(&seed.files, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "file6");
    }

    #[test]
    fn test_filter_all_folders() {
        let seed = seed();
        let hits = filter_files(&seed.files, &FileFilter::default());
        assert_eq!(hits.len(), seed.files.len());
        // Selecting a parent folder does not include its subfolders' files
        let filter = FileFilter {
            folder_id: Some("f1".into()),
            ..Default::default()
        };
        let ids: Vec<&str> = filter_files(&seed.files, &filter).iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["file1", "file2"]);
    }

    #[test]
    fn test_filter_type_and_not_linked() {
        let seed = seed();
        let filter = FileFilter {
            mime_type: Some("application/pdf".into()),
            not_linked_to: Some("1".into()),
            ..Default::default()
        };
        let ids: Vec<&str> = filter_files(&seed.files, &filter).iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["file2", "file10"]);
    }

    #[test]
    fn test_relevant_folders_include_ancestors() {
        let seed = seed();
        let files = project_files(&seed.files, "2");
        let ids: Vec<&str> = relevant_folders(&seed.folders, &files)
            .iter()
            .map(|f| f.id.as_str())
            .collect();
        assert_eq!(ids, vec!["f1", "f5"]);
    }

    #[test]
    fn test_file_types_first_seen_order() {
        let seed = seed();
        let types = file_types(&seed.files);
        assert_eq!(types[0], "application/pdf");
        assert_eq!(types[1], "application/acad");
        assert_eq!(types.len(), 5);
    }

    // --- mutations ---

    #[test]
    fn test_create_folder() {
        let seed = seed();
        let out = create_folder(&seed.folders, folder("f9", Some("f2"))).unwrap();
        assert_eq!(out[0].id, "f9");
        assert_eq!(
            create_folder(&seed.folders, folder("f9", Some("zz"))),
            Err(DocError::FolderNotFound("zz".into()))
        );
        let mut blank = folder("f10", None);
        blank.name = "  ".into();
        assert_eq!(create_folder(&seed.folders, blank), Err(DocError::NameRequired));
    }

    #[test]
    fn test_rename_and_delete() {
        let seed = seed();
        let out = rename_file(&seed.files, "file9", " Nota.docx ").unwrap();
        assert_eq!(out.iter().find(|f| f.id == "file9").unwrap().name, "Nota.docx");
        assert_eq!(rename_file(&seed.files, "file9", ""), Err(DocError::NameRequired));

        let out = delete_file(&seed.files, "file9").unwrap();
        assert_eq!(out.len(), seed.files.len() - 1);
        assert!(delete_file(&out, "file9").is_err());
    }

    #[test]
    fn test_link_is_idempotent() {
        let seed = seed();
        let ids = vec!["file9".to_string(), "file1".to_string()];
        let once = link_files(&seed.files, &ids, "1");
        let twice = link_files(&once, &ids, "1");
        assert_eq!(once, twice);
        let file9 = once.iter().find(|f| f.id == "file9").unwrap();
        assert_eq!(file9.project_ids, vec!["1".to_string()]);
        let file1 = once.iter().find(|f| f.id == "file1").unwrap();
        assert_eq!(file1.project_ids, vec!["1".to_string()]);
    }

    #[test]
    fn test_unlink() {
        let seed = seed();
        let out = unlink_file(&seed.files, "file5", "1").unwrap();
        let file5 = out.iter().find(|f| f.id == "file5").unwrap();
        assert_eq!(file5.project_ids, vec!["6".to_string()]);
    }

    // --- helpers ---

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(150_000), "146.48 KB");
        assert_eq!(format_file_size(2_450_000), "2.34 MB");
        assert_eq!(format_file_size(5_200_000), "4.96 MB");
    }

    #[test]
    fn test_file_type_label() {
        assert_eq!(file_type_label("image/jpeg"), "Image");
        assert_eq!(file_type_label("application/pdf"), "PDF");
        assert_eq!(
            file_type_label("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
            "Word"
        );
        assert_eq!(file_type_label("application/vnd.ms-excel"), "Excel");
        assert_eq!(file_type_label("application/acad"), "AutoCAD");
        assert_eq!(file_type_label("text/csv"), "CSV");
        assert_eq!(file_type_label("blob"), "File");
    }

    #[test]
    fn test_folder_name() {
        let seed = seed();
        assert_eq!(folder_name(&seed.folders, Some("f5")), "Legal");
        assert_eq!(folder_name(&seed.folders, None), "No folder");
        assert_eq!(folder_name(&seed.folders, Some("x")), "Unknown");
    }
}
