use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::domain::{Student, UserId};

/// Students observed submitting homework, recorded on first submission.
///
/// Process-lifetime only; restarts start from an empty roster.
#[derive(Default)]
pub struct StudentRoster {
    inner: Mutex<HashMap<UserId, Student>>,
}

impl StudentRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sender. Returns `true` on first sight, `false` otherwise.
    /// A later submission with a display name fills in an earlier anonymous
    /// record.
    pub async fn record(&self, student: Student) -> bool {
        let mut map = self.inner.lock().await;
        match map.get_mut(&student.id) {
            Some(existing) => {
                if existing.display_name.is_none() && student.display_name.is_some() {
                    existing.display_name = student.display_name;
                }
                false
            }
            None => {
                map.insert(student.id, student);
                true
            }
        }
    }

    /// All recorded students, ordered by id for stable listings.
    pub async fn list(&self) -> Vec<Student> {
        let map = self.inner.lock().await;
        let mut out: Vec<Student> = map.values().cloned().collect();
        out.sort_by_key(|s| s.id);
        out
    }

    pub async fn ids(&self) -> Vec<UserId> {
        self.list().await.into_iter().map(|s| s.id).collect()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}
