//! Keyed one-shot timers driven by an injected clock.
//!
//! Each key holds at most one armed timer. Arming a key again supersedes
//! its previous timer, and cancelling before expiry fully suppresses it.
//! Superseded heap entries are dropped lazily when they reach the top.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Armed<T> {
    deadline: Instant,
    seq: u64,
    payload: T,
}

#[derive(Debug)]
pub struct TimerQueue<K, T> {
    armed: HashMap<K, Armed<T>>,
    heap: BinaryHeap<Reverse<(Instant, u64, K)>>,
    next_seq: u64,
}

impl<K, T> Default for TimerQueue<K, T> {
    fn default() -> Self {
        Self {
            armed: HashMap::new(),
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<K, T> TimerQueue<K, T>
where
    K: Clone + Eq + Hash + Ord,
    T: Copy,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms `key` to fire at `now + delay`, replacing any timer it had.
    pub fn arm(&mut self, key: K, payload: T, now: Instant, delay: Duration) -> Instant {
        let deadline = now + delay;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.armed.insert(
            key.clone(),
            Armed {
                deadline,
                seq,
                payload,
            },
        );
        self.heap.push(Reverse((deadline, seq, key)));
        deadline
    }

    /// Cancels the timer for `key`, returning its payload if one was armed.
    pub fn cancel(&mut self, key: &K) -> Option<T> {
        self.armed.remove(key).map(|armed| armed.payload)
    }

    pub fn cancel_all(&mut self) -> usize {
        let count = self.armed.len();
        self.armed.clear();
        self.heap.clear();
        count
    }

    pub fn payload(&self, key: &K) -> Option<T> {
        self.armed.get(key).map(|armed| armed.payload)
    }

    pub fn deadline(&self, key: &K) -> Option<Instant> {
        self.armed.get(key).map(|armed| armed.deadline)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, T)> + '_ {
        self.armed.iter().map(|(key, armed)| (key, armed.payload))
    }

    pub fn len(&self) -> usize {
        self.armed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.armed.is_empty()
    }

    pub fn next_deadline(&mut self) -> Option<Instant> {
        self.pop_stale();
        self.heap.peek().map(|Reverse((deadline, _, _))| *deadline)
    }

    /// Removes and returns every timer due at `now`, earliest first.
    ///
    /// Timers with equal deadlines fire in arming order.
    pub fn drain_due(&mut self, now: Instant) -> Vec<(K, T)> {
        let mut due = Vec::new();
        loop {
            self.pop_stale();
            let Some(Reverse((deadline, _, _))) = self.heap.peek() else {
                break;
            };
            if *deadline > now {
                break;
            }
            let Some(Reverse((_, _, key))) = self.heap.pop() else {
                break;
            };
            if let Some(armed) = self.armed.remove(&key) {
                due.push((key, armed.payload));
            }
        }
        due
    }

    fn pop_stale(&mut self) {
        while let Some(Reverse((_, seq, key))) = self.heap.peek() {
            match self.armed.get(key) {
                Some(armed) if armed.seq == *seq => break,
                _ => {
                    let _ = self.heap.pop();
                }
            }
        }
    }
}
