//! Vote transitions and the reputation they earn.
//!
//! The caller reports its current vote on a question (`has_upvoted`,
//! `has_downvoted`). From that and the requested direction a [`VotePlan`]
//! decides whether the request retracts, switches or adds a vote, and how much
//! reputation moves for the voter and for the question's author.

use uuid::Uuid;

/// Reputation the author gains or loses per vote, either direction.
pub const AUTHOR_REPUTATION: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Column holding the voters for this direction.
    pub fn column(self) -> &'static str {
        match self {
            VoteDirection::Up => "upvotes",
            VoteDirection::Down => "downvotes",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            VoteDirection::Up => VoteDirection::Down,
            VoteDirection::Down => VoteDirection::Up,
        }
    }

    /// Reputation the voter gains or loses for casting this kind of vote.
    pub fn voter_reputation(self) -> i32 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTransition {
    /// Already voted this way: remove the vote.
    Retract,
    /// Voted the other way: move the vote over.
    Switch,
    /// No vote yet: add one.
    Add,
}

/// What a single vote request does to a question and to reputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VotePlan {
    pub direction: VoteDirection,
    pub transition: VoteTransition,
    pub voter_delta: i32,
    pub author_delta: i32,
}

impl VotePlan {
    pub fn new(direction: VoteDirection, has_upvoted: bool, has_downvoted: bool) -> Self {
        let (same, other) = match direction {
            VoteDirection::Up => (has_upvoted, has_downvoted),
            VoteDirection::Down => (has_downvoted, has_upvoted),
        };

        let transition = if same {
            VoteTransition::Retract
        } else if other {
            VoteTransition::Switch
        } else {
            VoteTransition::Add
        };

        let sign = if transition == VoteTransition::Retract { -1 } else { 1 };

        Self {
            direction,
            transition,
            voter_delta: sign * direction.voter_reputation(),
            author_delta: sign * AUTHOR_REPUTATION,
        }
    }

    /// Reputation changes for `voter` and `author`, ordered by user id.
    ///
    /// Rows must be updated in this order so two crossed votes (A on B's
    /// question, B on A's) lock the same users in the same sequence. A self
    /// vote collapses into a single change.
    pub fn reputation_changes(&self, voter: Uuid, author: Uuid) -> Vec<(Uuid, i32)> {
        if voter == author {
            return vec![(voter, self.voter_delta + self.author_delta)];
        }

        let mut changes = vec![(voter, self.voter_delta), (author, self.author_delta)];
        changes.sort_by_key(|(id, _)| *id);
        changes
    }

    /// Apply the vote to in-memory vote sets.
    ///
    /// Adding or switching always clears the voter from the opposite set, so a
    /// voter never ends up in both even if the reported flags were stale.
    pub fn apply(&self, voter: Uuid, upvotes: &mut Vec<Uuid>, downvotes: &mut Vec<Uuid>) {
        let (target, opposite) = match self.direction {
            VoteDirection::Up => (upvotes, downvotes),
            VoteDirection::Down => (downvotes, upvotes),
        };

        match self.transition {
            VoteTransition::Retract => target.retain(|id| *id != voter),
            VoteTransition::Switch | VoteTransition::Add => {
                opposite.retain(|id| *id != voter);
                if !target.contains(&voter) {
                    target.push(voter);
                }
            }
        }
    }
}
