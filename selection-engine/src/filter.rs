use std::ops::RangeInclusive;
use threadpick_core::{
    CommentNode, PayloadComment, RedditComment, RemovalState, SelectionConfig, TextSanitizer,
};

/// Decides which replies make it into a comment payload.
///
/// A reply survives only when every check passes; cheap structural checks
/// run before sanitizing.
pub struct ReplyFilter<'a> {
    length: RangeInclusive<usize>,
    min_score: i64,
    sanitizer: &'a dyn TextSanitizer,
}

impl<'a> ReplyFilter<'a> {
    pub fn new(
        length: RangeInclusive<usize>,
        min_score: i64,
        sanitizer: &'a dyn TextSanitizer,
    ) -> Self {
        Self {
            length,
            min_score,
            sanitizer,
        }
    }

    pub fn from_config(config: &SelectionConfig, sanitizer: &'a dyn TextSanitizer) -> Self {
        Self::new(
            config.comment_length.clone(),
            config.min_comment_upvotes,
            sanitizer,
        )
    }

    /// The reply behind `node` when it passes every check.
    pub fn accept<'n>(&self, node: &'n CommentNode) -> Option<&'n RedditComment> {
        let CommentNode::Comment(reply) = node else {
            return None;
        };
        if reply.removal_state() != RemovalState::Normal || reply.stickied {
            return None;
        }
        if !self.length.contains(&reply.body.chars().count()) || reply.score < self.min_score {
            return None;
        }
        reply.author.as_ref()?;

        let sanitized = self.sanitizer.sanitize(&reply.body);
        if sanitized.is_empty() || sanitized == " " {
            return None;
        }
        Some(reply)
    }

    /// Surviving replies, in listing order.
    pub fn apply(&self, nodes: &[CommentNode]) -> Vec<PayloadComment> {
        nodes
            .iter()
            .filter_map(|node| self.accept(node))
            .map(PayloadComment::from)
            .collect()
    }
}
