//! 配信計画（`Dispatch`）を MessagePusher に引き渡す

use crate::domain::{Dispatch, MessagePusher, Recipients};

/// 配信計画を順に MessagePusher に渡す
///
/// 呼び出し側は ChatRoom のガードを保持したまま呼ぶこと。
/// 送信失敗はその宛先だけの問題として記録し、残りの配信を続ける。
pub(crate) async fn fan_out(message_pusher: &dyn MessagePusher, dispatches: Vec<Dispatch>) {
    for Dispatch { recipients, event } in dispatches {
        match &recipients {
            Recipients::Only(targets) => {
                for target in targets {
                    if let Err(e) = message_pusher.push_to(target, &event).await {
                        tracing::warn!("Failed to push event to '{}': {}", target, e);
                    }
                }
            }
            Recipients::Everyone | Recipients::EveryoneExcept(_) => {
                if let Err(e) = message_pusher.broadcast(&recipients, &event).await {
                    tracing::warn!("Failed to broadcast event: {}", e);
                }
            }
        }
    }
}
