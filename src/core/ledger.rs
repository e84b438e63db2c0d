//! Single owner of one day's entry list.
//!
//! The ledger task holds the [`DayLog`] and the store. Every mutation, from
//! the user or from backfill, arrives as a message on one channel and is
//! applied in arrival order, so there is never more than one writer.
//! Callers address entries by id; the ledger turns an id into the
//! entry's current position only when it applies the change.

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::core::serving::valid_grams;
use crate::db::DiaryStore;
use crate::error::DietError;
use crate::models::entry::{DayLog, DiaryEntry, EntryPatch, MealSlot};

const CHANNEL_CAPACITY: usize = 32;

/// Corrected nutrients for one entry, produced by backfill.
#[derive(Debug, Clone)]
pub struct NutrientPatch {
    pub entry_id: String,
    /// Position of the entry when the patch was issued; informational only.
    pub issued_index: usize,
    pub patch: EntryPatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchOutcome {
    /// Applied locally and persisted.
    Applied,
    /// Applied locally; the store rejected it and will catch up on reload.
    AppliedLocally,
    /// The entry no longer exists.
    Stale,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddedEntry {
    pub slot: MealSlot,
    pub index: usize,
    pub entry: DiaryEntry,
}

enum Command {
    Add {
        slot: MealSlot,
        entry: DiaryEntry,
        reply: oneshot::Sender<Result<AddedEntry, DietError>>,
    },
    UpdateServing {
        slot: MealSlot,
        id: String,
        grams: f64,
        reply: oneshot::Sender<Result<DiaryEntry, DietError>>,
    },
    Remove {
        slot: MealSlot,
        id: String,
        reply: oneshot::Sender<Result<DiaryEntry, DietError>>,
    },
    Patch {
        patch: NutrientPatch,
        reply: oneshot::Sender<PatchOutcome>,
    },
    Snapshot {
        reply: oneshot::Sender<DayLog>,
    },
    Reload {
        reply: oneshot::Sender<Result<DayLog, DietError>>,
    },
}

/// Cloneable handle to a running ledger.
#[derive(Clone)]
pub struct LedgerHandle {
    date: NaiveDate,
    tx: mpsc::Sender<Command>,
}

/// Load `date` from the store and start its ledger task.
///
/// The task ends once every handle is dropped and yields the store back.
pub fn spawn(
    store: Box<dyn DiaryStore>,
    date: NaiveDate,
) -> Result<(LedgerHandle, JoinHandle<Box<dyn DiaryStore>>), DietError> {
    let day = store.day_log(date)?.unwrap_or_else(|| DayLog::new(date));
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let ledger = Ledger { store, day };
    let task = tokio::spawn(ledger.run(rx));
    Ok((LedgerHandle { date, tx }, task))
}

impl LedgerHandle {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, DietError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| DietError::LedgerClosed)?;
        rx.await.map_err(|_| DietError::LedgerClosed)
    }

    pub async fn add(&self, slot: MealSlot, entry: DiaryEntry) -> Result<AddedEntry, DietError> {
        self.request(|reply| Command::Add { slot, entry, reply })
            .await?
    }

    pub async fn update_serving(
        &self,
        slot: MealSlot,
        id: &str,
        grams: f64,
    ) -> Result<DiaryEntry, DietError> {
        let id = id.to_string();
        self.request(|reply| Command::UpdateServing {
            slot,
            id,
            grams,
            reply,
        })
        .await?
    }

    pub async fn remove(&self, slot: MealSlot, id: &str) -> Result<DiaryEntry, DietError> {
        let id = id.to_string();
        self.request(|reply| Command::Remove { slot, id, reply })
            .await?
    }

    /// Submit a backfill patch. `None` if the ledger has already shut down.
    pub async fn apply_patch(&self, patch: NutrientPatch) -> Option<PatchOutcome> {
        self.request(|reply| Command::Patch { patch, reply })
            .await
            .ok()
    }

    pub async fn snapshot(&self) -> Result<DayLog, DietError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Drop local state and re-read the day from the store.
    pub async fn reload(&self) -> Result<DayLog, DietError> {
        self.request(|reply| Command::Reload { reply }).await?
    }

    /// Release this handle. The task stops once no other clones remain.
    pub fn shutdown(self) {}
}

struct Ledger {
    store: Box<dyn DiaryStore>,
    day: DayLog,
}

impl Ledger {
    async fn run(mut self, mut rx: mpsc::Receiver<Command>) -> Box<dyn DiaryStore> {
        while let Some(cmd) = rx.recv().await {
            self.handle(cmd);
        }
        debug!(date = %self.day.date, "ledger closed");
        self.store
    }

    // Reply send failures mean the caller went away; nothing to do.
    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Add { slot, entry, reply } => {
                let _ = reply.send(self.add(slot, entry));
            }
            Command::UpdateServing {
                slot,
                id,
                grams,
                reply,
            } => {
                let _ = reply.send(self.update_serving(slot, &id, grams));
            }
            Command::Remove { slot, id, reply } => {
                let _ = reply.send(self.remove(slot, &id));
            }
            Command::Patch { patch, reply } => {
                let _ = reply.send(self.patch(patch));
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.day.clone());
            }
            Command::Reload { reply } => {
                let _ = reply.send(self.reload());
            }
        }
    }

    fn add(&mut self, slot: MealSlot, entry: DiaryEntry) -> Result<AddedEntry, DietError> {
        if valid_grams(entry.quantity_grams).is_none() {
            return Err(DietError::InvalidServingSize(format!(
                "{:?}",
                entry.quantity_grams
            )));
        }
        let date = self.day.date;
        let index = self.store.append_entry(date, slot, &entry)?;
        let local = self.day.meals.slot_mut(slot);
        if index != local.len() {
            warn!(%date, %slot, index, local = local.len(), "store and ledger disagree on slot length");
        }
        local.push(entry.clone());
        debug!(%date, %slot, index, id = %entry.id, "entry added");
        Ok(AddedEntry { slot, index, entry })
    }

    fn update_serving(
        &mut self,
        slot: MealSlot,
        id: &str,
        grams: f64,
    ) -> Result<DiaryEntry, DietError> {
        let grams = valid_grams(Some(grams))
            .ok_or_else(|| DietError::InvalidServingSize(grams.to_string()))?;
        let index = self
            .day
            .position(slot, id)
            .ok_or_else(|| DietError::UnknownEntry(id.to_string()))?;
        let patch = EntryPatch::serving(grams);
        self.store.update_entry(self.day.date, slot, index, &patch)?;
        let entry = &mut self.day.meals.slot_mut(slot)[index];
        entry.apply(&patch);
        Ok(entry.clone())
    }

    fn remove(&mut self, slot: MealSlot, id: &str) -> Result<DiaryEntry, DietError> {
        let index = self
            .day
            .position(slot, id)
            .ok_or_else(|| DietError::UnknownEntry(id.to_string()))?;
        self.store.delete_entry(self.day.date, slot, index)?;
        Ok(self.day.meals.slot_mut(slot).remove(index))
    }

    /// Apply a backfill patch at the entry's current position, if it still exists.
    fn patch(&mut self, p: NutrientPatch) -> PatchOutcome {
        let date = self.day.date;
        let Some((slot, index)) = self.day.locate(&p.entry_id) else {
            debug!(%date, id = %p.entry_id, "dropping patch for removed entry");
            return PatchOutcome::Stale;
        };
        if index != p.issued_index {
            debug!(%date, %slot, issued = p.issued_index, index, "entry moved since patch was issued");
        }

        self.day.meals.slot_mut(slot)[index].apply(&p.patch);
        match self.store.update_entry(date, slot, index, &p.patch) {
            Ok(()) => PatchOutcome::Applied,
            Err(e) => {
                warn!(%date, %slot, index, error = %e, "failed to persist backfill patch; keeping local correction");
                PatchOutcome::AppliedLocally
            }
        }
    }

    fn reload(&mut self) -> Result<DayLog, DietError> {
        let date = self.day.date;
        self.day = self.store.day_log(date)?.unwrap_or_else(|| DayLog::new(date));
        Ok(self.day.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Store wrapper whose updates can be switched to fail.
    struct FlakyStore {
        inner: Database,
        fail_updates: Arc<AtomicBool>,
    }

    impl DiaryStore for FlakyStore {
        fn append_entry(
            &self,
            date: NaiveDate,
            slot: MealSlot,
            entry: &DiaryEntry,
        ) -> Result<usize, DietError> {
            self.inner.append_entry(date, slot, entry)
        }
        fn update_entry(
            &self,
            date: NaiveDate,
            slot: MealSlot,
            index: usize,
            patch: &EntryPatch,
        ) -> Result<(), DietError> {
            if self.fail_updates.load(Ordering::SeqCst) {
                return Err(DietError::Storage("offline".into()));
            }
            self.inner.update_entry(date, slot, index, patch)
        }
        fn delete_entry(
            &self,
            date: NaiveDate,
            slot: MealSlot,
            index: usize,
        ) -> Result<(), DietError> {
            self.inner.delete_entry(date, slot, index)
        }
        fn day_log(&self, date: NaiveDate) -> Result<Option<DayLog>, DietError> {
            self.inner.day_log(date)
        }
        fn month_logs(&self, year: i32, month: u32) -> Result<Vec<DayLog>, DietError> {
            self.inner.month_logs(year, month)
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 4).unwrap()
    }

    fn food(name: &str, calories: f64) -> DiaryEntry {
        let mut e = DiaryEntry::new(Some(name.into()));
        e.calories = calories;
        e
    }

    fn macros(protein: f64) -> EntryPatch {
        EntryPatch {
            protein: Some(protein),
            carbs: Some(1.0),
            fat: Some(1.0),
            ..EntryPatch::default()
        }
    }

    #[tokio::test]
    async fn add_update_remove_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let (ledger, task) = spawn(Box::new(db), date()).unwrap();

        let a = ledger.add(MealSlot::Lunch, food("a", 100.0)).await.unwrap();
        let b = ledger.add(MealSlot::Lunch, food("b", 200.0)).await.unwrap();
        assert_eq!((a.index, b.index), (0, 1));

        let updated = ledger
            .update_serving(MealSlot::Lunch, &b.entry.id, 250.0)
            .await
            .unwrap();
        assert_eq!(updated.quantity_grams, Some(250.0));

        ledger.remove(MealSlot::Lunch, &a.entry.id).await.unwrap();
        let day = ledger.snapshot().await.unwrap();
        assert_eq!(day.meals.lunch.len(), 1);
        assert_eq!(day.meals.lunch[0].id, b.entry.id);

        drop(ledger);
        let store = task.await.unwrap();
        let stored = store.day_log(date()).unwrap().unwrap();
        assert_eq!(stored, day);
    }

    #[tokio::test]
    async fn add_rejects_invalid_serving() {
        let db = Database::open_in_memory().unwrap();
        let (ledger, _task) = spawn(Box::new(db), date()).unwrap();
        let mut e = food("x", 100.0);
        e.quantity_grams = None;
        assert!(matches!(
            ledger.add(MealSlot::Snack, e).await,
            Err(DietError::InvalidServingSize(_))
        ));
        assert!(matches!(
            ledger.update_serving(MealSlot::Snack, "missing", 0.0).await,
            Err(DietError::InvalidServingSize(_))
        ));
        assert!(ledger.snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn patch_follows_entry_after_shift() {
        let db = Database::open_in_memory().unwrap();
        let (ledger, task) = spawn(Box::new(db), date()).unwrap();
        let first = ledger.add(MealSlot::Dinner, food("first", 50.0)).await.unwrap();
        let second = ledger.add(MealSlot::Dinner, food("second", 90.0)).await.unwrap();

        // Issued while "second" sat at index 1; "first" is then removed.
        let patch = NutrientPatch {
            entry_id: second.entry.id.clone(),
            issued_index: 1,
            patch: macros(7.0),
        };
        ledger.remove(MealSlot::Dinner, &first.entry.id).await.unwrap();
        assert_eq!(ledger.apply_patch(patch).await, Some(PatchOutcome::Applied));

        drop(ledger);
        let store = task.await.unwrap();
        let stored = store.day_log(date()).unwrap().unwrap();
        assert_eq!(stored.meals.dinner.len(), 1);
        assert_eq!(stored.meals.dinner[0].protein, 7.0);
        assert_eq!(stored.meals.dinner[0].calories, 90.0);
    }

    #[tokio::test]
    async fn patch_for_removed_entry_is_stale() {
        let db = Database::open_in_memory().unwrap();
        let (ledger, _task) = spawn(Box::new(db), date()).unwrap();
        let added = ledger.add(MealSlot::Breakfast, food("gone", 80.0)).await.unwrap();
        ledger.remove(MealSlot::Breakfast, &added.entry.id).await.unwrap();
        let outcome = ledger
            .apply_patch(NutrientPatch {
                entry_id: added.entry.id,
                issued_index: 0,
                patch: macros(3.0),
            })
            .await;
        assert_eq!(outcome, Some(PatchOutcome::Stale));
    }

    #[tokio::test]
    async fn store_failure_keeps_local_correction() {
        let fail = Arc::new(AtomicBool::new(false));
        let store = FlakyStore {
            inner: Database::open_in_memory().unwrap(),
            fail_updates: fail.clone(),
        };
        let (ledger, _task) = spawn(Box::new(store), date()).unwrap();
        let added = ledger.add(MealSlot::Snack, food("bar", 400.0)).await.unwrap();

        fail.store(true, Ordering::SeqCst);
        let outcome = ledger
            .apply_patch(NutrientPatch {
                entry_id: added.entry.id.clone(),
                issued_index: 0,
                patch: macros(20.0),
            })
            .await;
        assert_eq!(outcome, Some(PatchOutcome::AppliedLocally));
        assert_eq!(ledger.snapshot().await.unwrap().meals.snack[0].protein, 20.0);

        // A full reload shows the store's view again.
        let reloaded = ledger.reload().await.unwrap();
        assert_eq!(reloaded.meals.snack[0].protein, 0.0);
    }

    #[tokio::test]
    async fn closed_ledger_turns_patches_into_no_ops() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let orphan = LedgerHandle { date: date(), tx };
        let outcome = orphan
            .apply_patch(NutrientPatch {
                entry_id: "x".into(),
                issued_index: 0,
                patch: EntryPatch::default(),
            })
            .await;
        assert_eq!(outcome, None);
        assert!(matches!(orphan.snapshot().await, Err(DietError::LedgerClosed)));
    }

    #[tokio::test]
    async fn task_ends_when_last_handle_drops() {
        let db = Database::open_in_memory().unwrap();
        let (ledger, task) = spawn(Box::new(db), date()).unwrap();
        let other = ledger.clone();
        drop(ledger);
        other.add(MealSlot::Lunch, food("late", 10.0)).await.unwrap();
        drop(other);
        let store = task.await.unwrap();
        assert_eq!(store.day_log(date()).unwrap().unwrap().meals.lunch.len(), 1);
    }
}
