//! Greedy packing of arguments under a command-line byte budget.

use crate::domain::model::{ArgVector, CommandPrefix, arg_cost};

/// Accumulates arguments into invocations whose size stays within `max_bytes`.
///
/// Every argument costs its length plus one separator byte. Arguments are never split or
/// dropped: one that cannot fit next to the prefix still gets an invocation of its own.
#[derive(Debug)]
pub struct SizePartitioner<'a> {
    prefix: &'a CommandPrefix,
    max_bytes: usize,
    parts: Vec<ArgVector>,
    current: Vec<String>,
    size: usize,
}

impl<'a> SizePartitioner<'a> {
    pub fn new(prefix: &'a CommandPrefix, max_bytes: usize) -> Self {
        Self {
            prefix,
            max_bytes,
            parts: Vec::new(),
            current: Vec::new(),
            size: prefix.byte_len(),
        }
    }

    /// Append an argument, closing the current invocation first if it would overflow.
    pub fn push(&mut self, arg: impl Into<String>) {
        let arg = arg.into();
        let cost = arg_cost(&arg);
        if !self.current.is_empty() && self.size + cost > self.max_bytes {
            self.close();
        }
        self.size += cost;
        self.current.push(arg);
    }

    /// Close the trailing invocation and return everything collected.
    pub fn finish(mut self) -> Vec<ArgVector> {
        self.close();
        self.parts
    }

    fn close(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.current);
        self.parts.push(self.prefix.with_args(batch));
        self.size = self.prefix.byte_len();
    }
}

impl Extend<String> for SizePartitioner<'_> {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        for arg in iter {
            self.push(arg);
        }
    }
}

/// Split `paths` into invocations of at most `max_bytes` each.
pub fn partition_to_max_size<S: AsRef<str>>(
    prefix: &CommandPrefix,
    paths: &[S],
    max_bytes: usize,
) -> Vec<ArgVector> {
    let mut partitioner = SizePartitioner::new(prefix, max_bytes);
    for path in paths {
        partitioner.push(path.as_ref());
    }
    partitioner.finish()
}
