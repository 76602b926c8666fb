// src/generator/chains.rs

//! Per-user linear write chains.

use crate::types::{DepRef, EntityKind, OpId, UserId, Version};

/// Hands out operation ids in construction order.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: OpId,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> OpId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn allocated(&self) -> u64 {
        self.next
    }
}

/// One generated operation: a user creating a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub id: OpId,
    pub user: UserId,
    /// 0-based position in the owner's chain.
    pub index: usize,
}

impl Operation {
    /// Version of the owner's serial counter this operation writes.
    pub fn serial(&self) -> Version {
        self.index as Version + 1
    }

    pub fn parent_index(&self) -> Option<usize> {
        self.index.checked_sub(1)
    }

    /// The post this operation creates. Posts are written exactly once.
    pub fn post_dep(&self) -> DepRef {
        DepRef::new(EntityKind::Post.key(self.id), 1)
    }

    pub fn serial_dep(&self) -> DepRef {
        DepRef::new(EntityKind::User.key(self.user as u64), self.serial())
    }

    /// The complete write-set: own post plus the owner's serial counter.
    pub fn writes(&self) -> [DepRef; 2] {
        [self.post_dep(), self.serial_dep()]
    }
}

/// All users' chains, indexed by user.
#[derive(Debug, Clone)]
pub struct Chains {
    ops_per_user: usize,
    chains: Vec<Vec<Operation>>,
}

impl Chains {
    /// Allocate `ops_per_user` operations for each user, user 0 first.
    pub fn build(num_users: usize, ops_per_user: usize, ids: &mut IdAllocator) -> Self {
        let chains = (0..num_users)
            .map(|user| {
                (0..ops_per_user)
                    .map(|index| Operation {
                        id: ids.allocate(),
                        user,
                        index,
                    })
                    .collect()
            })
            .collect();

        Self {
            ops_per_user,
            chains,
        }
    }

    pub fn ops_per_user(&self) -> usize {
        self.ops_per_user
    }

    pub fn num_users(&self) -> usize {
        self.chains.len()
    }

    pub fn chain(&self, user: UserId) -> &[Operation] {
        &self.chains[user]
    }

    pub fn op(&self, user: UserId, index: usize) -> Option<&Operation> {
        self.chains.get(user).and_then(|c| c.get(index))
    }

    /// Every operation, in construction (id) order.
    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.chains.iter().flatten()
    }

    /// Operations in emission order: round-robin across users by chain index.
    pub fn interleaved(&self) -> impl Iterator<Item = &Operation> {
        (0..self.ops_per_user)
            .flat_map(move |index| self.chains.iter().filter_map(move |c| c.get(index)))
    }
}
