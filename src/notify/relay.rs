use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::models::{Task, TaskGroup};

use super::clock::Clock;

/// One "X was created" channel.
///
/// A slot owns at most one pending clear. Announcing again cancels it and
/// schedules a fresh one, so every event is shown for the full duration.
#[derive(Debug, Clone)]
pub struct Slot<T> {
    last: Option<T>,
    visible: bool,
    ttl: Duration,
    pending: Option<PendingClear>,
}

#[derive(Debug, Clone, Copy)]
struct PendingClear {
    token: u64,
    due: Instant,
}

impl<T> Slot<T> {
    fn new(ttl: Duration) -> Self {
        Self {
            last: None,
            visible: false,
            ttl,
            pending: None,
        }
    }

    /// A clear that would land past the end of `Instant` is never scheduled.
    fn announce(&mut self, record: T, now: Instant, token: u64) {
        self.last = Some(record);
        self.visible = true;
        self.pending = now
            .checked_add(self.ttl)
            .map(|due| PendingClear { token, due });
    }

    /// Fire the pending clear if it is due. Returns the token that fired.
    fn fire_due(&mut self, now: Instant) -> Option<u64> {
        let pending = self.pending?;
        if now < pending.due {
            return None;
        }
        self.pending = None;
        self.visible = false;
        Some(pending.token)
    }

    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        self.visible && self.pending.map_or(true, |p| now < p.due)
    }
}

pub struct NotificationRelay {
    clock: Arc<dyn Clock>,
    next_token: u64,
    task: Slot<Task>,
    task_group: Slot<TaskGroup>,
}

impl NotificationRelay {
    pub fn new(clock: Arc<dyn Clock>, task_ttl: Duration, task_group_ttl: Duration) -> Self {
        Self {
            clock,
            next_token: 0,
            task: Slot::new(task_ttl),
            task_group: Slot::new(task_group_ttl),
        }
    }

    fn token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    pub fn announce_task(&mut self, task: Task) {
        let token = self.token();
        tracing::info!(task_id = %task.id, token, "task created notice");
        self.task.announce(task, self.clock.now(), token);
    }

    pub fn announce_task_group(&mut self, group: TaskGroup) {
        let token = self.token();
        tracing::info!(task_group_id = %group.id, token, "task group created notice");
        self.task_group.announce(group, self.clock.now(), token);
    }

    /// Run any clears that have come due. Returns how many fired.
    pub fn poll(&mut self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;
        if let Some(token) = self.task.fire_due(now) {
            tracing::debug!(token, "task notice cleared");
            fired += 1;
        }
        if let Some(token) = self.task_group.fire_due(now) {
            tracing::debug!(token, "task group notice cleared");
            fired += 1;
        }
        fired
    }

    pub fn last_created_task(&self) -> Option<&Task> {
        self.task.last()
    }

    pub fn last_created_task_group(&self) -> Option<&TaskGroup> {
        self.task_group.last()
    }

    pub fn show_task_created(&self) -> bool {
        self.task.is_visible_at(self.clock.now())
    }

    pub fn show_task_group_created(&self) -> bool {
        self.task_group.is_visible_at(self.clock.now())
    }
}
