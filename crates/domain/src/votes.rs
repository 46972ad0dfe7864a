//! 单个节点上 up/down 投票集合的切换语义。
//!
//! 一次用户点击是一个原子动作：没投过就加票，投过同向就撤票，
//! 投过反向就一次性翻转（先清对面再加本面），不会出现同时在两边的状态。

use crate::models::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
}

/// 三态结果，驱动 KarmaPolicy。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// 原本没有投票，新加一票
    Fresh,
    /// 撤回自己已有的同向票
    Retracted,
    /// 从反向票一次切换过来
    Flipped,
}

pub fn toggle(
    direction: VoteDirection,
    user: &EntityId,
    up: &mut Vec<EntityId>,
    down: &mut Vec<EntityId>,
) -> VoteOutcome {
    let (same, other) = match direction {
        VoteDirection::Up => (up, down),
        VoteDirection::Down => (down, up),
    };

    if let Some(pos) = same.iter().position(|u| u == user) {
        same.remove(pos);
        return VoteOutcome::Retracted;
    }
    if let Some(pos) = other.iter().position(|u| u == user) {
        other.remove(pos);
        same.push(user.clone());
        return VoteOutcome::Flipped;
    }
    same.push(user.clone());
    VoteOutcome::Fresh
}

pub fn vote_total(up: &[EntityId], down: &[EntityId]) -> i64 {
    up.len() as i64 - down.len() as i64
}
