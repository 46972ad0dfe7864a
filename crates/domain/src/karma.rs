//! 声望调整策略：由投票切换的三态结果推导作者的 karma 变化。

use crate::models::{EntityId, User};
use crate::votes::{VoteDirection, VoteOutcome};
use chrono::{Duration, NaiveDateTime};

/// 防刷门槛：账号至少注册满一天，且自己给自己投票永远不计分。
pub fn eligible(actor: &User, target_author: &EntityId, now: NaiveDateTime) -> bool {
    if actor.id == *target_author {
        return false;
    }
    now - actor.created_at >= Duration::days(1)
}

/// 计算一次切换后的新 karma。下限钳在 0，任何跨过 0 的扣减都被截断。
///
/// 翻转按新加一票计：对面那票的影响在它自己那次切换调用里已经结算过了，
/// 每次调用独立计分，不做批量合并。
pub fn apply_vote(current: i64, direction: VoteDirection, outcome: VoteOutcome) -> i64 {
    let delta = match (direction, outcome) {
        (VoteDirection::Up, VoteOutcome::Fresh | VoteOutcome::Flipped) => 1,
        (VoteDirection::Up, VoteOutcome::Retracted) => {
            if current > 0 {
                -1
            } else {
                0
            }
        }
        (VoteDirection::Down, VoteOutcome::Fresh | VoteOutcome::Flipped) => {
            if current > 0 {
                -1
            } else {
                0
            }
        }
        (VoteDirection::Down, VoteOutcome::Retracted) => 1,
    };
    (current + delta).max(0)
}
