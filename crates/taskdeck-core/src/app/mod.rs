//! App - アプリケーションロジック
//!
//! - **TaskService**: 作成・完了切り替え・削除・編集（各 1 回の書き込み）
//! - **TaskListView**: 検索・ソート・ページングつきの live リスト
//! - **EditSession**: `TaskService::edit_task` を包む編集フォームの状態

pub mod edit;
pub mod service;
pub mod view;

pub use self::edit::{EditFields, EditSession, ValidatedEdit, parse_due_date};
pub use self::service::{DELETE_PROMPT, DeleteOutcome, TaskService};
pub use self::view::{ListState, TaskListView};
