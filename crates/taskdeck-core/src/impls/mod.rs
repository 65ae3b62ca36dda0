//! Impls - 外部サービスを必要としないポート実装
//!
//! - **InMemoryTaskStore**: テストと CLI が使うストア
//! - **TracingNotifier**: 通知をログに出す（CLI の `--quiet`）
//! - **RecordingNotifier**: 通知を記録する（テスト用）

pub mod inmem_store;
pub mod notify;

pub use self::inmem_store::InMemoryTaskStore;
pub use self::notify::{Notification, RecordingNotifier, TracingNotifier};
