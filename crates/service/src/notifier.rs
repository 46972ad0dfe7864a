use crate::stores::Notifier;
use domain::LiveEvent;
use tokio::sync::broadcast;

/// 基于 broadcast 通道的推送实现，SSE 端各自订阅。
#[derive(Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<LiveEvent>,
}

impl BroadcastNotifier {
    pub fn new(tx: broadcast::Sender<LiveEvent>) -> Self {
        Self { tx }
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, event: LiveEvent) {
        // 没有在线订阅者时 send 返回 Err，直接忽略
        let _ = self.tx.send(event);
    }
}
