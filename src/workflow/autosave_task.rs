//! 定时自动保存任务
//!
//! 生命周期绑定在会话上：会话结束前必须 `stop()`，否则 drop 时直接 abort。

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error};

use crate::workflow::autosave::{AutosaveCoordinator, FlushTrigger};

/// 周期下限，`interval_at` 不接受零周期
const MIN_PERIOD: Duration = Duration::from_millis(1);

pub struct AutosaveTask {
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl AutosaveTask {
    /// 启动任务，第一次触发在一个完整周期之后；周期至少 1 毫秒
    pub fn spawn(coordinator: Arc<AutosaveCoordinator>, period: Duration) -> Self {
        let period = period.max(MIN_PERIOD);
        let (shutdown, mut stop_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        coordinator.flush(FlushTrigger::Timer).await;
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!("自动保存任务已停止");
        });

        debug!("自动保存任务已启动，间隔 {:?}", period);
        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// 停止定时器并等待任务退出；在途的 flush 会先完成
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!("自动保存任务异常退出: {}", e);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map_or(false, |h| !h.is_finished())
    }
}

impl Drop for AutosaveTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
