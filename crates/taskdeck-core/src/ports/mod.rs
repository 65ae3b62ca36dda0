//! Ports - 抽象化レイヤー
//!
//! Hexagonal Architecture の「ポート」を定義します。
//! 外部のドキュメントストア、確認ダイアログ、通知、時刻への
//! インターフェースを trait として提供します。
//!
//! # 設計原則
//! - ドキュメントストアが source of truth（正本）
//! - 読み取りは live subscription、書き込みは 1 操作につき 1 回
//! - Clock / IdGenerator はテストで差し替え可能

pub mod clock;
pub mod confirm;
pub mod document;
pub mod id_generator;
pub mod notifier;
pub mod task_store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::confirm::{Confirm, StaticConfirm};
pub use self::document::{HistoryDocument, StoreTimestamp, TaskDocument, TaskPatch, TaskPatchBuilder};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::notifier::Notifier;
pub use self::task_store::{OrderBy, Snapshot, Subscription, TaskStore};
