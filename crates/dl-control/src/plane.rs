// plane.rs — Trigger flags and pending execution intents.
//
// Two independent pieces of state live here, both outside the event log:
//
//   - trigger flags: whether build/sync/deploy run automatically on change.
//   - intent slots: one per kind, holding the id of the latest manual
//     execute request not yet picked up by the executor. A newer request
//     for the same kind replaces the older one; nothing queues up.
//
// Every mutation notifies `changed()`, so an executor loop can sleep until
// there is something to look at.

use std::sync::{Mutex, MutexGuard};

use dl_proto::{Intent, TriggerKind, Triggers};
use tokio::sync::Notify;

use crate::error::ControlError;

#[derive(Debug, Default)]
struct Slots {
    build: Option<u64>,
    sync: Option<u64>,
    deploy: Option<u64>,
}

impl Slots {
    fn get_mut(&mut self, kind: TriggerKind) -> &mut Option<u64> {
        match kind {
            TriggerKind::Build => &mut self.build,
            TriggerKind::Sync => &mut self.sync,
            TriggerKind::Deploy => &mut self.deploy,
        }
    }

    fn get(&self, kind: TriggerKind) -> Option<u64> {
        match kind {
            TriggerKind::Build => self.build,
            TriggerKind::Sync => self.sync,
            TriggerKind::Deploy => self.deploy,
        }
    }

    fn take(&mut self) -> Intent {
        Intent {
            build: self.build.take().is_some(),
            sync: self.sync.take().is_some(),
            deploy: self.deploy.take().is_some(),
        }
    }
}

#[derive(Debug)]
struct ControlInner {
    triggers: Triggers,
    slots: Slots,
    next_submission: u64,
}

/// Holds trigger flags and execute intents for one session.
#[derive(Debug)]
pub struct ControlPlane {
    inner: Mutex<ControlInner>,
    changed: Notify,
}

impl ControlPlane {
    pub fn new(triggers: Triggers) -> Self {
        Self {
            inner: Mutex::new(ControlInner {
                triggers,
                slots: Slots::default(),
                next_submission: 1,
            }),
            changed: Notify::new(),
        }
    }

    /// Set a trigger by name. Names are case-insensitive; anything other
    /// than `build`, `sync`, or `deploy` is rejected.
    pub fn set_trigger(&self, name: &str, enabled: bool) -> Result<TriggerKind, ControlError> {
        let kind = name.parse::<TriggerKind>().inspect_err(|_| {
            tracing::warn!(trigger = name, "rejected unknown trigger");
        })?;
        self.set(kind, enabled)?;
        Ok(kind)
    }

    /// Set a trigger flag. Returns the previous value.
    pub fn set(&self, kind: TriggerKind, enabled: bool) -> Result<bool, ControlError> {
        let previous = {
            let mut inner = self.lock()?;
            let previous = inner.triggers.get(kind);
            inner.triggers.set(kind, enabled);
            previous
        };
        tracing::info!(trigger = %kind, enabled, "auto-trigger updated");
        self.changed.notify_one();
        Ok(previous)
    }

    pub fn triggers(&self) -> Result<Triggers, ControlError> {
        Ok(self.lock()?.triggers)
    }

    /// Record a manual execute request. Each requested kind's slot now holds
    /// this submission, replacing any request not yet consumed.
    pub fn submit_intent(&self, intent: Intent) -> Result<u64, ControlError> {
        let id = {
            let mut inner = self.lock()?;
            let id = inner.next_submission;
            inner.next_submission = inner.next_submission.saturating_add(1);
            for kind in intent.kinds() {
                if let Some(replaced) = inner.slots.get_mut(kind).replace(id) {
                    tracing::debug!(%kind, replaced, submission = id, "intent superseded");
                }
            }
            id
        };
        tracing::info!(
            submission = id,
            build = intent.build,
            sync = intent.sync,
            deploy = intent.deploy,
            "execute intent submitted"
        );
        if !intent.is_empty() {
            self.changed.notify_one();
        }
        Ok(id)
    }

    /// The submission currently occupying `kind`'s slot, if any.
    pub fn pending_submission(&self, kind: TriggerKind) -> Result<Option<u64>, ControlError> {
        Ok(self.lock()?.slots.get(kind))
    }

    /// Take every pending request at once, leaving all slots empty.
    pub fn consume_intent(&self) -> Result<Intent, ControlError> {
        let intent = self.lock()?.slots.take();
        if !intent.is_empty() {
            tracing::debug!(
                build = intent.build,
                sync = intent.sync,
                deploy = intent.deploy,
                "execute intent consumed"
            );
        }
        Ok(intent)
    }

    /// Wait until a trigger flag or intent slot changes.
    ///
    /// A change that happens while nobody is waiting is remembered, so the
    /// next call returns immediately.
    pub async fn changed(&self) {
        self.changed.notified().await;
    }

    fn lock(&self) -> Result<MutexGuard<'_, ControlInner>, ControlError> {
        self.inner.lock().map_err(|_| ControlError::LockPoisoned)
    }
}

impl Default for ControlPlane {
    fn default() -> Self {
        Self::new(Triggers::default())
    }
}
