use crate::model::document::DocFile;
use crate::model::project::{Project, ProjectStatus};
use crate::model::task::{Priority, TaskStatus};
use crate::ops::project_ops::ProjectInput;
use crate::ops::task_ops::TaskInput;
use crate::util::unicode;

/// What submitting the form does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    NewTask,
    EditTask(String),
    NewProject,
    EditProject(String),
    NewFolder { parent_id: Option<String> },
    RenameFile(String),
    Invite,
    Upload { folder_id: Option<String> },
}

/// One option of a choice field. `value` is what gets submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: Option<String>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    /// Free text; `cursor` is a byte offset on a grapheme boundary
    Text { value: String, cursor: usize },
    /// Cycled with Left/Right
    Choice { options: Vec<Choice>, selected: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    pub input: FieldInput,
}

impl FormField {
    fn text(label: &'static str, value: &str) -> Self {
        FormField {
            label,
            input: FieldInput::Text {
                value: value.to_string(),
                cursor: value.len(),
            },
        }
    }

    fn choice(label: &'static str, options: Vec<Choice>, current: Option<&str>) -> Self {
        let selected = options
            .iter()
            .position(|c| c.value.as_deref() == current)
            .unwrap_or(0);
        FormField {
            label,
            input: FieldInput::Choice { options, selected },
        }
    }

    /// Text shown in the field
    pub fn display(&self) -> &str {
        match &self.input {
            FieldInput::Text { value, .. } => value,
            FieldInput::Choice { options, selected } => options
                .get(*selected)
                .map_or("", |c| c.label.as_str()),
        }
    }
}

/// A modal form: a list of fields, one focused at a time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub kind: FormKind,
    pub title: String,
    pub fields: Vec<FormField>,
    pub focus: usize,
    /// Validation message from the last submit attempt
    pub error: Option<String>,
}

impl Form {
    fn new(kind: FormKind, title: impl Into<String>, fields: Vec<FormField>) -> Self {
        Form {
            kind,
            title: title.into(),
            fields,
            focus: 0,
            error: None,
        }
    }

    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    pub fn task(kind: FormKind, input: &TaskInput, projects: &[Project]) -> Self {
        let title = match kind {
            FormKind::EditTask(_) => "Edit task",
            _ => "New task",
        };
        let fields = vec![
            FormField::text("Title", &input.title),
            FormField::text("Date", &input.date),
            FormField::choice(
                "Priority",
                Priority::ALL
                    .iter()
                    .map(|p| Choice {
                        value: Some(p.as_str().to_string()),
                        label: p.label().to_string(),
                    })
                    .collect(),
                Some(input.priority.as_str()),
            ),
            FormField::choice(
                "Status",
                TaskStatus::ALL
                    .iter()
                    .map(|s| Choice {
                        value: Some(s.as_str().to_string()),
                        label: s.label().to_string(),
                    })
                    .collect(),
                Some(input.status.as_str()),
            ),
            FormField::choice("Project", project_choices(projects), input.project_id.as_deref()),
        ];
        Form::new(kind, title, fields)
    }

    pub fn project(kind: FormKind, input: &ProjectInput) -> Self {
        let title = match kind {
            FormKind::EditProject(_) => "Edit project",
            _ => "New project",
        };
        let fields = vec![
            FormField::text("Name", &input.name),
            FormField::text("Client", &input.client),
            FormField::text("Start", &input.start_date),
            FormField::text("End", &input.end_date),
            FormField::choice(
                "Status",
                ProjectStatus::ALL
                    .iter()
                    .map(|s| Choice {
                        value: Some(s.as_str().to_string()),
                        label: s.label().to_string(),
                    })
                    .collect(),
                Some(input.status.as_str()),
            ),
            FormField::text("Description", &input.description),
        ];
        Form::new(kind, title, fields)
    }

    pub fn folder(parent_id: Option<String>, parent_name: &str) -> Self {
        let title = format!("New folder in {}", parent_name);
        Form::new(
            FormKind::NewFolder { parent_id },
            title,
            vec![FormField::text("Name", "")],
        )
    }

    pub fn rename(file: &DocFile) -> Self {
        Form::new(
            FormKind::RenameFile(file.id.clone()),
            "Rename file",
            vec![FormField::text("Name", &file.name)],
        )
    }

    pub fn invite(projects: &[Project]) -> Self {
        Form::new(
            FormKind::Invite,
            "Invite collaborator",
            vec![
                FormField::text("Name", ""),
                FormField::text("Email", ""),
                FormField::choice("Project", project_choices(projects), None),
            ],
        )
    }

    pub fn upload(folder_id: Option<String>, folder_name: &str, projects: &[Project]) -> Self {
        Form::new(
            FormKind::Upload { folder_id },
            format!("Upload to {}", folder_name),
            vec![
                FormField::text("File name", ""),
                FormField::text("Size (bytes)", "1048576"),
                FormField::choice("Project", project_choices(projects), None),
            ],
        )
    }

    // -----------------------------------------------------------------------
    // Reading values
    // -----------------------------------------------------------------------

    /// Text of field `idx` (empty for choice fields)
    pub fn text(&self, idx: usize) -> &str {
        match self.fields.get(idx).map(|f| &f.input) {
            Some(FieldInput::Text { value, .. }) => value,
            _ => "",
        }
    }

    /// Submitted value of choice field `idx`
    pub fn choice(&self, idx: usize) -> Option<&str> {
        match self.fields.get(idx).map(|f| &f.input) {
            Some(FieldInput::Choice { options, selected }) => {
                options.get(*selected).and_then(|c| c.value.as_deref())
            }
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    fn focused(&mut self) -> Option<&mut FieldInput> {
        self.fields.get_mut(self.focus).map(|f| &mut f.input)
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(FieldInput::Text { value, cursor }) = self.focused() {
            value.insert(*cursor, c);
            *cursor += c.len_utf8();
        }
    }

    pub fn backspace(&mut self) {
        if let Some(FieldInput::Text { value, cursor }) = self.focused()
            && let Some(prev) = unicode::prev_grapheme_boundary(value, *cursor)
        {
            value.replace_range(prev..*cursor, "");
            *cursor = prev;
        }
    }

    pub fn delete_word(&mut self) {
        if let Some(FieldInput::Text { value, cursor }) = self.focused() {
            let start = unicode::word_boundary_left(value, *cursor);
            value.replace_range(start..*cursor, "");
            *cursor = start;
        }
    }

    /// Left/Right: move the text cursor, or cycle a choice
    pub fn move_left(&mut self) {
        match self.focused() {
            Some(FieldInput::Text { value, cursor }) => {
                if let Some(prev) = unicode::prev_grapheme_boundary(value, *cursor) {
                    *cursor = prev;
                }
            }
            Some(FieldInput::Choice { options, selected }) if !options.is_empty() => {
                *selected = (*selected + options.len() - 1) % options.len();
            }
            _ => {}
        }
    }

    pub fn move_right(&mut self) {
        match self.focused() {
            Some(FieldInput::Text { value, cursor }) => {
                if let Some(next) = unicode::next_grapheme_boundary(value, *cursor) {
                    *cursor = next;
                }
            }
            Some(FieldInput::Choice { options, selected }) if !options.is_empty() => {
                *selected = (*selected + 1) % options.len();
            }
            _ => {}
        }
    }

    pub fn home(&mut self) {
        if let Some(FieldInput::Text { cursor, .. }) = self.focused() {
            *cursor = 0;
        }
    }

    pub fn end(&mut self) {
        if let Some(FieldInput::Text { value, cursor }) = self.focused() {
            *cursor = value.len();
        }
    }
}

fn project_choices(projects: &[Project]) -> Vec<Choice> {
    let mut choices = vec![Choice {
        value: None,
        label: "(none)".into(),
    }];
    choices.extend(projects.iter().map(|p| Choice {
        value: Some(p.id.clone()),
        label: p.name.clone(),
    }));
    choices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Seed;
    use pretty_assertions::assert_eq;

    fn task_form() -> Form {
        let seed = Seed::builtin().unwrap();
        Form::task(FormKind::NewTask, &TaskInput::new(TaskStatus::InProgress), &seed.projects)
    }

    #[test]
    fn task_form_prefills_choices() {
        let form = task_form();
        assert_eq!(form.title, "New task");
        assert_eq!(form.choice(2), Some("medium"));
        assert_eq!(form.choice(3), Some("in-progress"));
        assert_eq!(form.choice(4), None);
        assert_eq!(form.fields[4].display(), "(none)");
    }

    #[test]
    fn edit_task_form_selects_project() {
        let seed = Seed::builtin().unwrap();
        let input = TaskInput::from_task(&seed.tasks[0]);
        let form = Form::task(FormKind::EditTask("101".into()), &input, &seed.projects);
        assert_eq!(form.title, "Edit task");
        assert_eq!(form.text(0), "REVISIÓN GENERAL");
        assert_eq!(form.choice(4), Some("5"));
    }

    #[test]
    fn typing_and_backspace_respect_graphemes() {
        let mut form = task_form();
        for c in "Año".chars() {
            form.insert_char(c);
        }
        assert_eq!(form.text(0), "Año");
        form.backspace();
        assert_eq!(form.text(0), "Añ");
        form.move_left();
        form.insert_char('x');
        assert_eq!(form.text(0), "Axñ");
        form.end();
        form.backspace();
        assert_eq!(form.text(0), "Ax");
    }

    #[test]
    fn delete_word_removes_last_word() {
        let mut form = task_form();
        for c in "revisar planos".chars() {
            form.insert_char(c);
        }
        form.delete_word();
        assert_eq!(form.text(0), "revisar ");
    }

    #[test]
    fn choice_cycles_both_ways() {
        let mut form = task_form();
        form.focus = 2;
        form.move_right();
        assert_eq!(form.choice(2), Some("low"));
        form.move_right();
        assert_eq!(form.choice(2), Some("urgent"));
        form.move_left();
        assert_eq!(form.choice(2), Some("low"));
        // Typing into a choice is ignored
        form.insert_char('z');
        assert_eq!(form.choice(2), Some("low"));
    }

    #[test]
    fn focus_wraps() {
        let mut form = task_form();
        form.prev_field();
        assert_eq!(form.focus, 4);
        form.next_field();
        assert_eq!(form.focus, 0);
    }
}
