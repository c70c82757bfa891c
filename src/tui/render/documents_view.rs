use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::document::FileStatus;
use crate::ops::doc_ops;
use crate::ops::upload::Upload;
use crate::tui::app::{App, DocsFocus};
use crate::util::unicode;

use super::helpers::{base, cursor_marker, dim, header, pad_line, row_style, scroll_offset};
use super::push_highlighted_spans;

const SIDEBAR_W: u16 = 24;
const NAME_W: usize = 30;
const TYPE_W: usize = 8;
const SIZE_W: usize = 10;
const DATE_W: usize = 12;
const BAR_W: usize = 20;

/// Render the document browser: folder tree, file table, upload panel
pub fn render_documents_view(frame: &mut Frame, app: &App, area: Rect) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_W), Constraint::Min(20)])
        .split(area);

    render_folder_tree(frame, app, panes[0]);

    let uploads = app.uploads.items();
    let right = if uploads.is_empty() {
        vec![panes[1]]
    } else {
        let panel_h = (uploads.len() as u16 + 2).min(panes[1].height / 2);
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(panel_h)])
            .split(panes[1])
            .to_vec()
    };
    render_file_table(frame, app, right[0]);
    if let Some(panel) = right.get(1) {
        render_upload_panel(frame, app, *panel, uploads);
    }
}

fn pane_block(app: &App, title: &str, focused: bool) -> Block<'static> {
    let bg = app.theme.background;
    let border = if focused { app.theme.selection_border } else { app.theme.dim };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(bg))
        .title(Span::styled(format!(" {} ", title), header(app)))
        .style(Style::default().bg(bg))
}

fn render_folder_tree(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.docs.focus == DocsFocus::Folders;
    let block = pane_block(app, "Folders", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let rows = app.folder_rows();
    let visible = (inner.height as usize).max(1);
    let offset = scroll_offset(app.docs.folder_cursor, visible);

    // Row 0 is the synthetic root
    let mut entries: Vec<(Option<&str>, String)> = vec![(None, format!("\u{25A4} {}", doc_ops::ALL_FILES))];
    for row in &rows {
        let arrow = match (row.has_children, row.is_expanded) {
            (true, true) => "\u{25BE} ",
            (true, false) => "\u{25B8} ",
            _ => "  ",
        };
        entries.push((
            Some(row.folder_id.as_str()),
            format!("{}{}{}", "  ".repeat(row.depth), arrow, row.name),
        ));
    }

    let mut lines: Vec<Line> = Vec::new();
    for (idx, (folder_id, label)) in entries.iter().enumerate().skip(offset).take(visible) {
        let under_cursor = focused && idx == app.docs.folder_cursor;
        let is_selected = *folder_id == app.docs.selected_folder.as_deref();
        let mut style = row_style(app, under_cursor);
        if is_selected {
            style = style.fg(app.theme.highlight).add_modifier(Modifier::BOLD);
        }
        let spans = vec![
            cursor_marker(app, under_cursor),
            Span::styled(unicode::truncate_to_width(label, width.saturating_sub(1)), style),
        ];
        lines.push(pad_line(spans, width, style));
    }

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(app.theme.background)),
        inner,
    );
}

fn render_file_table(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.docs.focus == DocsFocus::Files;
    let files = app.visible_files();
    let block = pane_block(app, &format!("Files ({})", files.len()), focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let bg = app.theme.background;
    let mut lines: Vec<Line> = Vec::new();

    // Breadcrumbs
    let crumbs = doc_ops::breadcrumbs(app.store.folders(), app.docs.selected_folder.as_deref());
    let mut crumb_spans = vec![Span::styled(" ", base(app))];
    for (i, crumb) in crumbs.iter().enumerate() {
        if i > 0 {
            crumb_spans.push(Span::styled(" \u{203A} ", dim(app)));
        }
        let style = if i + 1 == crumbs.len() { header(app) } else { base(app) };
        crumb_spans.push(Span::styled(crumb.name.clone(), style));
    }
    lines.push(Line::from(crumb_spans));

    // Active filters
    let mut filters = Vec::new();
    if !app.docs.query.is_empty() {
        filters.push(format!("name contains \"{}\"", app.docs.query));
    }
    if let Some(mime) = &app.docs.type_filter {
        filters.push(format!("type {}", doc_ops::file_type_label(mime)));
    }
    if !filters.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(" Filter: {}", filters.join(", ")),
            Style::default().fg(app.theme.yellow).bg(bg),
        )));
    }
    lines.push(Line::from(""));

    if files.is_empty() {
        let hint = if filters.is_empty() {
            " No documents here. Press a to upload one."
        } else {
            " No documents match. Esc clears filters."
        };
        lines.push(Line::from(Span::styled(hint, dim(app))));
        frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
        return;
    }

    lines.push(Line::from(Span::styled(
        format!(
            "  {}{}{}{}Uploaded by",
            unicode::fit_to_width("Name", NAME_W),
            unicode::fit_to_width("Type", TYPE_W),
            unicode::fit_to_width("Size", SIZE_W),
            unicode::fit_to_width("Uploaded", DATE_W),
        ),
        dim(app),
    )));

    let search_re = app.search_re();
    let match_style = Style::default()
        .fg(app.theme.search_match_fg)
        .bg(app.theme.search_match_bg);
    let visible = (inner.height as usize).saturating_sub(lines.len()).max(1);
    let offset = scroll_offset(app.docs.file_cursor, visible);
    for (idx, file) in files.iter().enumerate().skip(offset).take(visible) {
        let selected = focused && idx == app.docs.file_cursor;
        let style = row_style(app, selected);
        let name_style = if file.status == FileStatus::Ready {
            style
        } else {
            style.fg(app.theme.file_status_color(file.status))
        };

        let mut spans = vec![cursor_marker(app, selected), Span::styled(" ", style)];
        let name = unicode::truncate_to_width(&file.name, NAME_W - 1);
        let pad = NAME_W.saturating_sub(unicode::display_width(&name));
        push_highlighted_spans(&mut spans, &name, name_style, match_style, search_re.as_ref());
        spans.push(Span::styled(" ".repeat(pad), style));
        spans.push(Span::styled(
            unicode::fit_to_width(&doc_ops::file_type_label(&file.mime_type), TYPE_W),
            style,
        ));
        spans.push(Span::styled(
            unicode::fit_to_width(&doc_ops::format_file_size(file.size), SIZE_W),
            style,
        ));
        spans.push(Span::styled(
            unicode::fit_to_width(&file.uploaded_at.format("%d %b %Y").to_string(), DATE_W),
            style,
        ));
        spans.push(Span::styled(file.uploaded_by.clone(), style.fg(app.theme.dim)));
        lines.push(pad_line(spans, width, style));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}

fn render_upload_panel(frame: &mut Frame, app: &App, area: Rect, uploads: &[Upload]) {
    let block = pane_block(app, "Uploads", false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let bg = app.theme.background;
    let visible = inner.height as usize;
    // Newest last; keep the tail in view
    let skip = uploads.len().saturating_sub(visible);
    let lines: Vec<Line> = uploads
        .iter()
        .skip(skip)
        .map(|upload| {
            let status_style = Style::default()
                .fg(app.theme.file_status_color(upload.status))
                .bg(bg);
            let mut spans = vec![
                Span::styled(format!(" {}", unicode::fit_to_width(&upload.name, 32)), base(app)),
                Span::styled(unicode::fit_to_width(upload.status.label(), 12), status_style),
            ];
            match upload.status {
                FileStatus::Uploading => {
                    spans.push(Span::styled(progress_bar(upload.progress), status_style));
                    spans.push(Span::styled(format!(" {:>3}%", upload.progress), dim(app)));
                }
                FileStatus::Error => {
                    let reason = upload.error.as_deref().unwrap_or("failed");
                    spans.push(Span::styled(format!("{}  R retry", reason), dim(app)));
                }
                FileStatus::Ready => {
                    spans.push(Span::styled(doc_ops::format_file_size(upload.size), dim(app)));
                }
                FileStatus::Pending | FileStatus::Processing => {}
            }
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}

fn progress_bar(progress: u8) -> String {
    let filled = usize::from(progress.min(100)) * BAR_W / 100;
    format!("{}{}", "\u{2588}".repeat(filled), "\u{2591}".repeat(BAR_W - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::View;
    use crate::tui::render::test_helpers::*;

    fn browser(app: &App) -> String {
        render_to_string(TERM_W, 24, |frame, area| render_documents_view(frame, app, area))
    }

    #[test]
    fn tree_and_table_on_all_files() {
        let app = app_on(View::Documents);
        let out = browser(&app);
        assert!(out.contains("All files"));
        assert!(out.contains("\u{25B8} Contratos"));
        assert!(out.contains("Planos"));
        assert!(!out.contains("Legal "));
        assert!(out.contains("Files (10)"));
        assert!(out.contains("Contrato_ParqueChacon.pdf"));
        assert!(out.contains("2.34 MB"));
        assert!(out.contains("Juan Pérez"));
    }

    #[test]
    fn expanded_folder_shows_children_and_breadcrumbs() {
        let mut app = app_on(View::Documents);
        app.docs.expanded.insert("f1".into());
        app.docs.selected_folder = Some("f5".into());
        let out = browser(&app);
        assert!(out.contains("\u{25BE} Contratos"));
        assert!(out.contains("Legal"));
        assert!(out.contains("All files \u{203A} Contratos \u{203A} Legal"));
        assert!(out.contains("Files (1)"));
        assert!(out.contains("Acuerdo_Legal.pdf"));
    }

    #[test]
    fn search_filter_is_reported() {
        let mut app = app_on(View::Documents);
        app.docs.query = "plano".into();
        let out = browser(&app);
        assert!(out.contains("Filter: name contains \"plano\""));
        assert!(out.contains("Files (2)"));
        assert!(!out.contains("Contrato_ParqueChacon.pdf"));
    }

    #[test]
    fn no_matches_hint() {
        let mut app = app_on(View::Documents);
        app.docs.query = "zzz".into();
        let out = browser(&app);
        assert!(out.contains("No documents match"));
    }

    #[test]
    fn upload_panel_shows_progress() {
        let mut app = app_on(View::Documents);
        app.uploads.enqueue("acta.pdf", 2048, None, None);
        for _ in 0..6 {
            app.uploads.tick();
        }
        let out = browser(&app);
        assert!(out.contains("Uploads"));
        assert!(out.contains("acta.pdf"));
        assert!(out.contains("Uploading"));
        assert!(out.contains(" 50%"));
    }

    #[test]
    fn failed_upload_offers_retry() {
        let mut app = app_on(View::Documents);
        let id = app.uploads.enqueue("acta.pdf", 2048, None, None);
        app.uploads.fail(id, "cancelled");
        let out = browser(&app);
        assert!(out.contains("cancelled  R retry"));
    }

    #[test]
    fn progress_bar_scales() {
        assert_eq!(progress_bar(0), "\u{2591}".repeat(BAR_W));
        assert_eq!(progress_bar(100), "\u{2588}".repeat(BAR_W));
        assert_eq!(progress_bar(50).chars().filter(|c| *c == '\u{2588}').count(), BAR_W / 2);
    }
}
