use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use chrono::{DateTime, FixedOffset};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

/// A commit waiting in the traversal queue
#[derive(Debug)]
struct PendingCommit {
    timestamp: DateTime<FixedOffset>,
    /// Discovery order, used to break timestamp ties
    sequence: u64,
    oid: ObjectId,
    commit: Commit,
}

impl Ord for PendingCommit {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for PendingCommit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PendingCommit {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PendingCommit {}

/// History walk over every parent, newest committer timestamp first
///
/// Each reachable commit is yielded exactly once.
pub struct RevList<'r> {
    database: &'r Database,
    queue: BinaryHeap<PendingCommit>,
    seen: HashSet<ObjectId>,
    discovered: u64,
}

impl<'r> RevList<'r> {
    pub fn new(
        database: &'r Database,
        start: impl IntoIterator<Item = ObjectId>,
    ) -> anyhow::Result<Self> {
        let mut rev_list = RevList {
            database,
            queue: BinaryHeap::new(),
            seen: HashSet::new(),
            discovered: 0,
        };
        for oid in start {
            rev_list.enqueue(oid)?;
        }

        Ok(rev_list)
    }

    fn enqueue(&mut self, oid: ObjectId) -> anyhow::Result<()> {
        if !self.seen.insert(oid.clone()) {
            return Ok(());
        }

        let commit = self.database.get_commit(&oid)?;
        self.queue.push(PendingCommit {
            timestamp: commit.timestamp(),
            sequence: self.discovered,
            oid,
            commit,
        });
        self.discovered += 1;

        Ok(())
    }
}

impl Iterator for RevList<'_> {
    type Item = anyhow::Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let pending = self.queue.pop()?;

        for parent in pending.commit.parents() {
            if let Err(err) = self.enqueue(parent.clone()) {
                return Some(Err(err));
            }
        }

        Some(Ok((pending.oid, pending.commit)))
    }
}
