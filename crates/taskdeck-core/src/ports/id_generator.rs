//! IdGenerator port - ID 生成の抽象化

use crate::domain::TaskId;
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator は新規タスクの ID を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（ストアが `Arc<dyn IdGenerator>` で保持する）
pub trait IdGenerator: Send + Sync {
    fn generate_task_id(&self) -> TaskId;
}

/// ULID ids whose timestamp part comes from a `Clock`, so ids created under a
/// `FixedClock` share a deterministic prefix.
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_task_id(&self) -> TaskId {
        let timestamp_ms = self.clock.now().timestamp_millis().max(0) as u64;
        TaskId::from(Ulid::from_parts(timestamp_ms, rand::random()))
    }
}
