pub mod calendar;
pub mod check;
pub mod doc_ops;
pub mod project_ops;
pub mod task_ops;
pub mod upload;
pub mod user_ops;
