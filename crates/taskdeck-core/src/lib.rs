//! taskdeck-core
//!
//! 外部ドキュメントストアにタスクを置く個人用タスクトラッカーのコア。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, priority, status, task, history, recorder, errors）
//! - **listing**: 表示ページの導出（filter → sort → paginate）
//! - **ports**: 抽象化レイヤー（TaskStore, Clock, IdGenerator, Confirm, Notifier）
//! - **impls**: 実装（InMemoryTaskStore, notifier など開発・テスト用）
//! - **app**: アプリケーションロジック（TaskService, TaskListView, EditSession）
//! - **config**: 設定の読み込み（figment）

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod listing;
pub mod ports;
