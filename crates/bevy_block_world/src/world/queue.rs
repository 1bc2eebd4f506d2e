//! Coalescing chunk work queue.
//!
//! A FIFO of generate/remove jobs holding at most one pending job per
//! coordinate. Enqueuing the opposite kind for a queued coordinate
//! annihilates the pair: a chunk queued for removal that re-enters the
//! active set is simply never removed, and a chunk that leaves the set
//! before its generation ran is simply never generated.

use std::collections::VecDeque;

use crate::coords::ChunkPos;

/// What a job does to its chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobKind {
  Generate,
  Remove,
}

/// One unit of queued streaming work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Job {
  pub kind: JobKind,
  pub pos: ChunkPos,
}

impl Job {
  pub const fn generate(pos: ChunkPos) -> Self {
    Self {
      kind: JobKind::Generate,
      pos,
    }
  }

  pub const fn remove(pos: ChunkPos) -> Self {
    Self {
      kind: JobKind::Remove,
      pos,
    }
  }
}

/// Drain activity of the queue.
///
/// Explicit state instead of "is a timer pending": Draining whenever jobs
/// are queued, Idle once the queue empties.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrainState {
  #[default]
  Idle,
  Draining,
}

/// FIFO job queue with per-coordinate coalescing.
#[derive(Debug, Default)]
pub struct ChunkQueue {
  jobs: VecDeque<Job>,
  state: DrainState,
}

impl ChunkQueue {
  pub fn new() -> Self {
    Self::default()
  }

  /// Enqueues a job, coalescing against any pending job for the same
  /// coordinate.
  ///
  /// Same kind pending: the older entry is dropped and the new one
  /// appended. Opposite kind pending: both are dropped.
  pub fn push(&mut self, job: Job) {
    if let Some(index) = self.jobs.iter().position(|queued| queued.pos == job.pos) {
      let existing = self.jobs[index];
      self.jobs.remove(index);
      if existing.kind != job.kind {
        if self.jobs.is_empty() {
          self.state = DrainState::Idle;
        }
        return;
      }
    }
    self.jobs.push_back(job);
    self.state = DrainState::Draining;
  }

  /// Pops the oldest pending job.
  pub fn pop(&mut self) -> Option<Job> {
    let job = self.jobs.pop_front();
    if self.jobs.is_empty() {
      self.state = DrainState::Idle;
    }
    job
  }

  /// Returns the pending job kind for a coordinate, if any.
  pub fn pending_for(&self, pos: ChunkPos) -> Option<JobKind> {
    self
      .jobs
      .iter()
      .find(|job| job.pos == pos)
      .map(|job| job.kind)
  }

  pub fn len(&self) -> usize {
    self.jobs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.jobs.is_empty()
  }

  pub fn state(&self) -> DrainState {
    self.state
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const POS: ChunkPos = ChunkPos::new(1, 0, -2);

  #[test]
  fn opposite_kinds_annihilate() {
    let mut queue = ChunkQueue::new();
    queue.push(Job::generate(POS));
    queue.push(Job::remove(POS));
    assert!(queue.is_empty());
    assert_eq!(queue.pending_for(POS), None);
    assert_eq!(queue.state(), DrainState::Idle);

    queue.push(Job::remove(POS));
    queue.push(Job::generate(POS));
    assert!(queue.is_empty());
  }

  #[test]
  fn same_kind_replaces_older_entry() {
    let mut queue = ChunkQueue::new();
    let other = ChunkPos::new(5, 0, 5);
    queue.push(Job::generate(POS));
    queue.push(Job::generate(other));
    queue.push(Job::generate(POS));
    assert_eq!(queue.len(), 2);
    // The re-pushed job moved behind `other`.
    assert_eq!(queue.pop(), Some(Job::generate(other)));
    assert_eq!(queue.pop(), Some(Job::generate(POS)));
  }

  #[test]
  fn drains_in_fifo_order() {
    let mut queue = ChunkQueue::new();
    let positions = [
      ChunkPos::new(0, 0, 0),
      ChunkPos::new(1, 0, 0),
      ChunkPos::new(2, 0, 0),
    ];
    for &pos in &positions {
      queue.push(Job::generate(pos));
    }
    for &pos in &positions {
      assert_eq!(queue.pop(), Some(Job::generate(pos)));
    }
    assert_eq!(queue.pop(), None);
  }

  #[test]
  fn state_tracks_queue_contents() {
    let mut queue = ChunkQueue::new();
    assert_eq!(queue.state(), DrainState::Idle);
    queue.push(Job::generate(POS));
    assert_eq!(queue.state(), DrainState::Draining);
    queue.pop();
    assert_eq!(queue.state(), DrainState::Idle);
    // Any enqueue reactivates the queue.
    queue.push(Job::remove(POS));
    assert_eq!(queue.state(), DrainState::Draining);
  }

  #[test]
  fn annihilation_touches_only_its_coordinate() {
    let mut queue = ChunkQueue::new();
    let other = ChunkPos::new(9, 0, 9);
    queue.push(Job::generate(POS));
    queue.push(Job::generate(other));
    queue.push(Job::remove(POS));
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.pending_for(other), Some(JobKind::Generate));
  }
}
