//! Dependency-safe ordering for generated declarations

use crate::error::OrderError;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use tracing::debug;

/// Lazily yields declarations so that every item appears only after
/// everything in its dependency set.
///
/// Repeated-pass elimination: each pass scans the pending list and emits
/// every item whose dependencies have all been produced, keeping the
/// relative input order within the pass. The output is therefore fully
/// deterministic for identical input, which keeps generated source
/// diffable across runs. Worst case is O(n²) comparisons, fine for n
/// bounded by the declarations of one generated program.
///
/// A full pass over a non-empty pending list that emits nothing is fatal:
/// the iterator yields one `Err` naming the unresolved declarations and is
/// fused afterwards.
pub struct EmissionOrder<T> {
    produced: HashSet<T>,
    pending: Vec<(T, HashSet<T>)>,
    cursor: usize,
    pass: usize,
    emitted_this_pass: bool,
    empty_source: bool,
    done: bool,
}

impl<T> EmissionOrder<T>
where
    T: Eq + Hash,
{
    /// Order a materialized collection of (item, dependencies) pairs.
    ///
    /// An empty collection is valid and yields an empty sequence.
    pub fn new<I, D>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, D)>,
        D: IntoIterator<Item = T>,
    {
        Self::build(Self::materialize(pairs), false)
    }

    /// Order pairs drained from a single-shot lazy source.
    ///
    /// The source is consumed here, exactly once. A source that yields no
    /// pairs before exhausting is a usage error and surfaces as
    /// [`OrderError::EmptySource`] on the first `next` call; callers with a
    /// genuinely empty collection should use [`EmissionOrder::new`].
    pub fn from_source<I, D>(source: I) -> Self
    where
        I: Iterator<Item = (T, D)>,
        D: IntoIterator<Item = T>,
    {
        let pending = Self::materialize(source);
        let empty_source = pending.is_empty();
        Self::build(pending, empty_source)
    }

    fn materialize<I, D>(pairs: I) -> Vec<(T, HashSet<T>)>
    where
        I: IntoIterator<Item = (T, D)>,
        D: IntoIterator<Item = T>,
    {
        pairs
            .into_iter()
            .map(|(item, deps)| (item, deps.into_iter().collect()))
            .collect()
    }

    fn build(pending: Vec<(T, HashSet<T>)>, empty_source: bool) -> Self {
        Self {
            produced: HashSet::new(),
            pending,
            cursor: 0,
            pass: 1,
            emitted_this_pass: false,
            empty_source,
            done: false,
        }
    }
}

impl<T> EmissionOrder<T>
where
    T: Clone + Eq + Hash + fmt::Debug + fmt::Display,
{
    /// Classify a stalled pass: a dependency that neither the produced set
    /// nor the pending list can ever supply means a dangling reference;
    /// otherwise the remaining items are waiting on each other.
    fn stall_error(&self) -> OrderError<T> {
        let pending: Vec<T> = self.pending.iter().map(|(item, _)| item.clone()).collect();
        let supplied: HashSet<&T> = self.pending.iter().map(|(item, _)| item).collect();
        for (item, deps) in &self.pending {
            let mut missing: Vec<T> = deps
                .iter()
                .filter(|dep| !self.produced.contains(*dep) && !supplied.contains(*dep))
                .cloned()
                .collect();
            if !missing.is_empty() {
                // Set iteration order is unstable; sort so diagnostics are
                // reproducible.
                missing.sort_by_key(|dep| dep.to_string());
                return OrderError::MissingDependency {
                    item: item.clone(),
                    missing,
                    pending,
                };
            }
        }
        OrderError::Cycle { pending }
    }
}

impl<T> Iterator for EmissionOrder<T>
where
    T: Clone + Eq + Hash + fmt::Debug + fmt::Display,
{
    type Item = Result<T, OrderError<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.empty_source {
            self.done = true;
            return Some(Err(OrderError::EmptySource));
        }

        loop {
            while self.cursor < self.pending.len() {
                if self.pending[self.cursor].1.is_subset(&self.produced) {
                    let (item, _) = self.pending.remove(self.cursor);
                    self.produced.insert(item.clone());
                    self.emitted_this_pass = true;
                    return Some(Ok(item));
                }
                self.cursor += 1;
            }

            if self.pending.is_empty() {
                self.done = true;
                return None;
            }
            if !self.emitted_this_pass {
                // A full pass over a non-empty pending list made no
                // progress: the remainder can never be ordered.
                self.done = true;
                return Some(Err(self.stall_error()));
            }
            debug!(
                "emission pass {} left {} declaration(s) pending",
                self.pass,
                self.pending.len()
            );
            self.pass += 1;
            self.cursor = 0;
            self.emitted_this_pass = false;
        }
    }
}

/// Drive a full ordering of `pairs` to completion
pub fn emission_order<T, I, D>(pairs: I) -> Result<Vec<T>, OrderError<T>>
where
    T: Clone + Eq + Hash + fmt::Debug + fmt::Display,
    I: IntoIterator<Item = (T, D)>,
    D: IntoIterator<Item = T>,
{
    EmissionOrder::new(pairs).collect()
}
