//! 评论树的定位与变更。
//!
//! 树是严格所有权结构（没有共享节点、没有回指针），遍历一律从 Post 根开始，
//! 所以不需要环保护。定位统一走先序深度优先：先看当前兄弟，再钻进它的子树，
//! 然后才轮到下一个兄弟。`find_by_id` 和 `find_parent` 必须走同一个顺序，
//! 这样即使出现理论上不该有的重复 ID，两个函数也指向同一个节点。

use crate::error::DomainError;
use crate::models::{CommentNode, EntityId, Post};
use crate::votes::{self, VoteDirection, VoteOutcome};
use chrono::NaiveDateTime;
use serde::Serialize;

/// 父节点标记：评论要么直接挂在 Post 根下，要么挂在另一条评论下。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentRef {
    Root,
    Node(EntityId),
}

pub fn find_by_id<'a>(id: &EntityId, nodes: &'a [CommentNode]) -> Option<&'a CommentNode> {
    for node in nodes {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = find_by_id(id, &node.comments) {
            return Some(found);
        }
    }
    None
}

pub fn find_by_id_mut<'a>(
    id: &EntityId,
    nodes: &'a mut [CommentNode],
) -> Option<&'a mut CommentNode> {
    for node in nodes.iter_mut() {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = find_by_id_mut(id, &mut node.comments) {
            return Some(found);
        }
    }
    None
}

/// 返回匹配节点的父标记和它所在的兄弟序列，调用方据此做拼接。
pub fn find_parent<'a>(
    id: &EntityId,
    nodes: &'a [CommentNode],
) -> Option<(ParentRef, &'a [CommentNode])> {
    find_parent_in(id, nodes, &ParentRef::Root)
}

fn find_parent_in<'a>(
    id: &EntityId,
    nodes: &'a [CommentNode],
    parent: &ParentRef,
) -> Option<(ParentRef, &'a [CommentNode])> {
    for node in nodes {
        if &node.id == id {
            return Some((parent.clone(), nodes));
        }
        let label = ParentRef::Node(node.id.clone());
        if let Some(found) = find_parent_in(id, &node.comments, &label) {
            return Some(found);
        }
    }
    None
}

/// 可变版：先用只读遍历确定父标记（保证和 `find_parent` 同序），再下到
/// 对应的兄弟 Vec 拿可变借用。
pub fn find_parent_mut<'a>(
    id: &EntityId,
    nodes: &'a mut Vec<CommentNode>,
) -> Option<(ParentRef, &'a mut Vec<CommentNode>)> {
    let label = find_parent(id, nodes).map(|(label, _)| label)?;
    match label {
        ParentRef::Root => Some((ParentRef::Root, nodes)),
        ParentRef::Node(parent_id) => {
            let parent = find_by_id_mut(&parent_id, nodes)?;
            Some((ParentRef::Node(parent_id), &mut parent.comments))
        }
    }
}

/// 新回复插到父节点子序列的最前面（每层都是新到旧）。
pub fn insert_reply(
    parent: &ParentRef,
    reply: CommentNode,
    nodes: &mut Vec<CommentNode>,
) -> Result<(), DomainError> {
    match parent {
        ParentRef::Root => {
            nodes.insert(0, reply);
            Ok(())
        }
        ParentRef::Node(id) => {
            let parent = find_by_id_mut(id, nodes)
                .ok_or_else(|| DomainError::not_found("comment", id.as_str()))?;
            parent.comments.insert(0, reply);
            Ok(())
        }
    }
}

pub fn update_content<'a>(
    id: &EntityId,
    new_content: &str,
    now: NaiveDateTime,
    nodes: &'a mut Vec<CommentNode>,
) -> Result<&'a CommentNode, DomainError> {
    let node =
        find_by_id_mut(id, nodes).ok_or_else(|| DomainError::not_found("comment", id.as_str()))?;
    node.content = new_content.to_string();
    node.updated_at = Some(now);
    Ok(node)
}

pub fn toggle_vote<'a>(
    id: &EntityId,
    user: &EntityId,
    direction: VoteDirection,
    nodes: &'a mut Vec<CommentNode>,
) -> Result<(VoteOutcome, &'a CommentNode), DomainError> {
    let node =
        find_by_id_mut(id, nodes).ok_or_else(|| DomainError::not_found("comment", id.as_str()))?;
    let outcome = votes::toggle(direction, user, &mut node.up_votes, &mut node.down_votes);
    node.vote_total = votes::vote_total(&node.up_votes, &node.down_votes);
    Ok((outcome, node))
}

/// 把节点连同整棵子树从树上摘下来并返回，调用方拿它去清理旁表。
/// 拼接按 ID 相等从兄弟序列里移除，不按位置。
pub fn cascade_delete(
    id: &EntityId,
    nodes: &mut Vec<CommentNode>,
) -> Result<CommentNode, DomainError> {
    let (_, siblings) = find_parent_mut(id, nodes)
        .ok_or_else(|| DomainError::not_found("comment", id.as_str()))?;
    let pos = siblings
        .iter()
        .position(|n| &n.id == id)
        .ok_or_else(|| DomainError::not_found("comment", id.as_str()))?;
    Ok(siblings.remove(pos))
}

/// 先序收集子树里所有节点的 ID（含自身），每个节点恰好出现一次。
pub fn subtree_ids(node: &CommentNode) -> Vec<EntityId> {
    let mut ids = Vec::new();
    collect_ids(node, &mut ids);
    ids
}

fn collect_ids(node: &CommentNode, out: &mut Vec<EntityId>) {
    out.push(node.id.clone());
    for child in &node.comments {
        collect_ids(child, out);
    }
}

/// API 响应形态：节点自身加上它的直接父级（Post 或上一级评论）。
/// 每次读取现算，从不落库。
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: CommentNode,
    pub parent: ParentView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ParentView {
    Post(Post),
    Comment(CommentNode),
}

pub fn attach_parent_view(id: &EntityId, post: &Post) -> Result<CommentView, DomainError> {
    let node = find_by_id(id, &post.comments)
        .ok_or_else(|| DomainError::not_found("comment", id.as_str()))?;
    let (label, _) = find_parent(id, &post.comments)
        .ok_or_else(|| DomainError::not_found("comment", id.as_str()))?;

    let parent = match label {
        ParentRef::Root => ParentView::Post(post.clone()),
        ParentRef::Node(parent_id) => {
            let parent_node = find_by_id(&parent_id, &post.comments)
                .ok_or_else(|| DomainError::not_found("comment", parent_id.as_str()))?;
            ParentView::Comment(parent_node.clone())
        }
    };

    Ok(CommentView {
        comment: node.clone(),
        parent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use chrono::Utc;

    fn now() -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    fn user(name: &str) -> User {
        User {
            id: EntityId::generate(),
            username: name.into(),
            karma: 0,
            created_at: now(),
        }
    }

    fn node(author: &User, content: &str) -> CommentNode {
        CommentNode::new(author, content, now())
    }

    fn post(author: &User) -> Post {
        Post::new_draft(author, "need a hand", "details", vec!["errand".into()], now())
    }

    #[test]
    fn find_on_empty_forest_is_none() {
        let missing = EntityId::generate();
        assert!(find_by_id(&missing, &[]).is_none());
        assert!(find_parent(&missing, &[]).is_none());
    }

    #[test]
    fn insert_under_root_then_find() {
        let author = user("ana");
        let mut tree = Vec::new();
        let reply = node(&author, "first!");
        let reply_id = reply.id.clone();

        insert_reply(&ParentRef::Root, reply, &mut tree).unwrap();

        let found = find_by_id(&reply_id, &tree).unwrap();
        assert_eq!(found.content, "first!");
        assert!(found.comments.is_empty());
    }

    #[test]
    fn new_reply_becomes_first_sibling() {
        let author = user("ana");
        let mut tree = Vec::new();
        insert_reply(&ParentRef::Root, node(&author, "older"), &mut tree).unwrap();
        let newer = node(&author, "newer");
        let newer_id = newer.id.clone();
        insert_reply(&ParentRef::Root, newer, &mut tree).unwrap();

        assert_eq!(tree[0].id, newer_id);
        assert_eq!(tree[1].content, "older");
    }

    #[test]
    fn parent_of_nested_reply_is_its_comment() {
        let author = user("ana");
        let mut tree = Vec::new();
        let r1 = node(&author, "r1");
        let r1_id = r1.id.clone();
        insert_reply(&ParentRef::Root, r1, &mut tree).unwrap();

        let r2 = node(&author, "r2");
        let r2_id = r2.id.clone();
        insert_reply(&ParentRef::Node(r1_id.clone()), r2, &mut tree).unwrap();

        let (label, siblings) = find_parent(&r2_id, &tree).unwrap();
        assert_eq!(label, ParentRef::Node(r1_id));
        assert_eq!(siblings.len(), 1);
        assert_eq!(siblings[0].id, r2_id);
    }

    #[test]
    fn parent_of_top_level_is_root() {
        let author = user("ana");
        let mut tree = Vec::new();
        let r1 = node(&author, "r1");
        let r1_id = r1.id.clone();
        insert_reply(&ParentRef::Root, r1, &mut tree).unwrap();

        let (label, _) = find_parent(&r1_id, &tree).unwrap();
        assert_eq!(label, ParentRef::Root);
    }

    #[test]
    fn insert_under_missing_parent_fails() {
        let author = user("ana");
        let mut tree = Vec::new();
        let ghost = EntityId::generate();
        let err = insert_reply(&ParentRef::Node(ghost), node(&author, "x"), &mut tree);
        assert!(matches!(err, Err(DomainError::NotFound { .. })));
    }

    #[test]
    fn cascade_delete_takes_whole_chain() {
        // r1 > r2 > r3，摘掉 r1 之后树整个清空，子树里三个 ID 都在
        let author = user("ana");
        let mut tree = Vec::new();
        let r1 = node(&author, "r1");
        let r1_id = r1.id.clone();
        insert_reply(&ParentRef::Root, r1, &mut tree).unwrap();
        let r2 = node(&author, "r2");
        let r2_id = r2.id.clone();
        insert_reply(&ParentRef::Node(r1_id.clone()), r2, &mut tree).unwrap();
        let r3 = node(&author, "r3");
        let r3_id = r3.id.clone();
        insert_reply(&ParentRef::Node(r2_id.clone()), r3, &mut tree).unwrap();

        let detached = cascade_delete(&r1_id, &mut tree).unwrap();
        assert!(tree.is_empty());
        assert!(find_by_id(&r1_id, &tree).is_none());
        assert!(find_by_id(&r2_id, &tree).is_none());
        assert!(find_by_id(&r3_id, &tree).is_none());

        let ids = subtree_ids(&detached);
        assert_eq!(ids, vec![r1_id, r2_id, r3_id]);
    }

    #[test]
    fn cascade_delete_leaves_siblings_alone() {
        let author = user("ana");
        let mut tree = Vec::new();
        let keep = node(&author, "keep");
        let keep_id = keep.id.clone();
        let drop = node(&author, "drop");
        let drop_id = drop.id.clone();
        insert_reply(&ParentRef::Root, keep, &mut tree).unwrap();
        insert_reply(&ParentRef::Root, drop, &mut tree).unwrap();

        cascade_delete(&drop_id, &mut tree).unwrap();
        assert_eq!(tree.len(), 1);
        assert!(find_by_id(&keep_id, &tree).is_some());
    }

    #[test]
    fn cascade_delete_missing_id_is_not_found() {
        let mut tree = Vec::new();
        let ghost = EntityId::generate();
        assert!(matches!(
            cascade_delete(&ghost, &mut tree),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn update_content_refreshes_timestamp() {
        let author = user("ana");
        let mut tree = Vec::new();
        let r1 = node(&author, "before");
        let r1_id = r1.id.clone();
        insert_reply(&ParentRef::Root, r1, &mut tree).unwrap();

        let updated = update_content(&r1_id, "after", now(), &mut tree).unwrap();
        assert_eq!(updated.content, "after");
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn toggle_vote_keeps_total_in_sync() {
        let author = user("ana");
        let voter = user("bo");
        let mut tree = Vec::new();
        let r1 = node(&author, "r1");
        let r1_id = r1.id.clone();
        insert_reply(&ParentRef::Root, r1, &mut tree).unwrap();

        let (outcome, n) = toggle_vote(&r1_id, &voter.id, VoteDirection::Up, &mut tree).unwrap();
        assert_eq!(outcome, VoteOutcome::Fresh);
        assert_eq!(n.vote_total, 1);

        let (outcome, n) = toggle_vote(&r1_id, &voter.id, VoteDirection::Up, &mut tree).unwrap();
        assert_eq!(outcome, VoteOutcome::Retracted);
        assert_eq!(n.vote_total, 0);
    }

    #[test]
    fn parent_view_for_top_level_points_at_post() {
        let author = user("ana");
        let mut p = post(&author);
        let r1 = node(&author, "r1");
        let r1_id = r1.id.clone();
        insert_reply(&ParentRef::Root, r1, &mut p.comments).unwrap();

        let view = attach_parent_view(&r1_id, &p).unwrap();
        match view.parent {
            ParentView::Post(parent) => assert_eq!(parent.id, p.id),
            ParentView::Comment(_) => panic!("top-level comment must attach the post"),
        }
    }

    #[test]
    fn parent_view_for_nested_points_at_comment() {
        let author = user("ana");
        let mut p = post(&author);
        let r1 = node(&author, "r1");
        let r1_id = r1.id.clone();
        insert_reply(&ParentRef::Root, r1, &mut p.comments).unwrap();
        let r2 = node(&author, "r2");
        let r2_id = r2.id.clone();
        insert_reply(&ParentRef::Node(r1_id.clone()), r2, &mut p.comments).unwrap();

        let view = attach_parent_view(&r2_id, &p).unwrap();
        match view.parent {
            ParentView::Comment(parent) => assert_eq!(parent.id, r1_id),
            ParentView::Post(_) => panic!("nested comment must attach its parent comment"),
        }
    }

    #[test]
    fn locator_and_parent_agree_on_traversal_order() {
        // 深层节点排在前面的兄弟子树里时，两个函数都先命中它
        let author = user("ana");
        let mut tree = Vec::new();
        let a = node(&author, "a");
        let a_id = a.id.clone();
        let b = node(&author, "b");
        insert_reply(&ParentRef::Root, b, &mut tree).unwrap();
        insert_reply(&ParentRef::Root, a, &mut tree).unwrap();
        let deep = node(&author, "deep");
        let deep_id = deep.id.clone();
        insert_reply(&ParentRef::Node(a_id.clone()), deep, &mut tree).unwrap();

        let by_id = find_by_id(&deep_id, &tree).unwrap();
        let (label, siblings) = find_parent(&deep_id, &tree).unwrap();
        assert_eq!(by_id.id, deep_id);
        assert_eq!(label, ParentRef::Node(a_id));
        assert!(siblings.iter().any(|n| n.id == deep_id));
    }
}
