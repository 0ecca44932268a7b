use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Ordered, duplicate-free list of candidate passwords shared by all
/// workers of a run.
///
/// Workers iterate over a [`snapshot`](Self::snapshot), so a concurrent
/// [`promote`](Self::promote) never disturbs an attempt in flight. The lock
/// is only held for the copy or the reorder itself.
#[derive(Debug, Clone, Default)]
pub struct PasswordPool {
    entries: Arc<Mutex<Vec<String>>>,
}

impl PasswordPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a pool with `manual` passwords first, followed by `hints` that
    /// are not already present. Hints are sorted so the resulting order does
    /// not depend on hash-set iteration.
    pub fn from_sources<I>(manual: &[String], hints: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let pool = Self::new();
        for password in manual {
            pool.push(password.clone());
        }

        let mut hints: Vec<String> = hints.into_iter().collect();
        hints.sort();
        for hint in hints {
            pool.push(hint);
        }

        pool
    }

    /// Splits a user-supplied "pw1 pw2 pw3" string, dropping blanks and
    /// repeats while keeping first-seen order.
    pub fn parse_manual(input: &str) -> Vec<String> {
        let mut passwords: Vec<String> = Vec::new();
        for piece in input.split_whitespace() {
            if !passwords.iter().any(|p| p == piece) {
                passwords.push(piece.to_string());
            }
        }
        passwords
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `password` unless it is already present.
    pub fn push(&self, password: String) -> bool {
        let mut entries = self.lock();
        if entries.contains(&password) {
            return false;
        }
        entries.push(password);
        true
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Passwords to try for one archive, in order. An empty pool still
    /// yields one attempt with no password.
    pub fn candidates(&self) -> Vec<String> {
        let snapshot = self.snapshot();
        if snapshot.is_empty() {
            vec![String::new()]
        } else {
            snapshot
        }
    }

    /// Moves a password that just worked to the front, so archives sharing
    /// it succeed on the first try. Returns whether the order changed.
    pub fn promote(&self, password: &str) -> bool {
        if password.is_empty() {
            return false;
        }

        let mut entries = self.lock();
        if entries.len() <= 1 || entries.first().is_some_and(|p| p == password) {
            return false;
        }

        match entries.iter().position(|p| p == password) {
            Some(index) => {
                let winner = entries.remove(index);
                entries.insert(0, winner);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, password: &str) -> bool {
        self.lock().iter().any(|p| p == password)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
