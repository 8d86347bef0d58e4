//! DU UE manager (§4.K): the bounded pool of DU-local UE indices, found by
//! index or C-RNTI, each with a FIFO task queue serializing locally-issued
//! requests with incoming messages.

use common::{CoreError, CoreResult};
use slog::{debug, Logger};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use ue_id::{CRnti, DuUeIndex, MAX_DU_UES};
use xxap::DrbId;

type UeTask = Pin<Box<dyn Future<Output = ()> + Send>>;

struct UeContext {
    c_rnti: CRnti,
    bearers: Vec<DrbId>,
    tasks: async_channel::Sender<UeTask>,
}

/// A DU-local UE, addressed by index or C-RNTI.
#[derive(Debug)]
pub struct UeHandle {
    pub index: DuUeIndex,
    pub c_rnti: CRnti,
    pub bearers: Vec<DrbId>,
}

/// Bounded pool of `0..MAX_DU_UES` DU-local UEs, each with a FIFO task
/// queue. A UE's queue is drained by its own `async_std` task, so tasks
/// scheduled from different call sites still execute in submission order
/// and never interleave with each other.
pub struct UeManager {
    slots: Vec<Option<UeContext>>,
    by_rnti: HashMap<CRnti, DuUeIndex>,
    logger: Logger,
}

impl UeManager {
    pub fn new(logger: Logger) -> Self {
        UeManager {
            slots: (0..MAX_DU_UES).map(|_| None).collect(),
            by_rnti: HashMap::new(),
            logger,
        }
    }

    fn lowest_free_index(&self) -> Option<DuUeIndex> {
        self.slots.iter().position(|s| s.is_none()).map(DuUeIndex)
    }

    pub fn create_ue(&mut self, c_rnti: CRnti) -> CoreResult<DuUeIndex> {
        if self.by_rnti.contains_key(&c_rnti) {
            return Err(CoreError::DuplicateRnti);
        }
        let index = self.lowest_free_index().ok_or(CoreError::NoFreeUeIndex)?;
        let (tasks, receiver) = async_channel::unbounded::<UeTask>();
        let logger = self.logger.new(slog::o!("du_ue_index" => index.0, "c_rnti" => c_rnti.0));
        async_std::task::spawn(async move {
            while let Ok(task) = receiver.recv().await {
                task.await;
            }
            debug!(logger, "UE task queue closed");
        });
        self.slots[index.0] = Some(UeContext { c_rnti, bearers: Vec::new(), tasks });
        self.by_rnti.insert(c_rnti, index);
        Ok(index)
    }

    pub fn find_by_index(&self, index: DuUeIndex) -> CoreResult<UeHandle> {
        let ctx = self.slots.get(index.0).and_then(|s| s.as_ref()).ok_or(CoreError::NotFound)?;
        Ok(UeHandle { index, c_rnti: ctx.c_rnti, bearers: ctx.bearers.clone() })
    }

    pub fn find_by_rnti(&self, c_rnti: CRnti) -> CoreResult<UeHandle> {
        let index = *self.by_rnti.get(&c_rnti).ok_or(CoreError::NotFound)?;
        self.find_by_index(index)
    }

    pub fn add_bearer(&mut self, index: DuUeIndex, drb_id: DrbId) -> CoreResult<()> {
        let ctx = self.slots.get_mut(index.0).and_then(|s| s.as_mut()).ok_or(CoreError::NotFound)?;
        ctx.bearers.push(drb_id);
        Ok(())
    }

    /// Releases all bearers, then frees the index.
    pub fn remove_ue(&mut self, index: DuUeIndex) -> CoreResult<()> {
        let mut ctx = self.slots.get_mut(index.0).ok_or(CoreError::NotFound)?.take().ok_or(CoreError::NotFound)?;
        ctx.bearers.clear();
        self.by_rnti.remove(&ctx.c_rnti);
        Ok(())
    }

    /// Appends a task to the UE's FIFO queue.
    pub fn schedule(&self, index: DuUeIndex, task: UeTask) -> CoreResult<()> {
        let ctx = self.slots.get(index.0).and_then(|s| s.as_ref()).ok_or(CoreError::NotFound)?;
        ctx.tasks.try_send(task).map_err(|_| CoreError::NotReady)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use slog::Discard;

    fn logger() -> Logger {
        Logger::root(Discard, slog::o!())
    }

    #[test]
    fn create_find_and_remove_round_trip() {
        let mut mgr = UeManager::new(logger());
        let index = mgr.create_ue(CRnti(10)).unwrap();
        assert_eq!(mgr.find_by_index(index).unwrap().c_rnti, CRnti(10));
        assert_eq!(mgr.find_by_rnti(CRnti(10)).unwrap().index, index);
        mgr.remove_ue(index).unwrap();
        assert_eq!(mgr.find_by_index(index).unwrap_err(), CoreError::NotFound);
        assert_eq!(mgr.find_by_rnti(CRnti(10)).unwrap_err(), CoreError::NotFound);
    }

    #[test]
    fn duplicate_rnti_is_rejected() {
        let mut mgr = UeManager::new(logger());
        mgr.create_ue(CRnti(10)).unwrap();
        assert_eq!(mgr.create_ue(CRnti(10)).unwrap_err(), CoreError::DuplicateRnti);
    }

    #[test]
    fn exhausting_the_pool_fails_with_no_free_ue_index() {
        let mut mgr = UeManager::new(logger());
        for i in 0..MAX_DU_UES as u16 {
            mgr.create_ue(CRnti(i + 1)).unwrap();
        }
        assert_eq!(mgr.create_ue(CRnti(9999)).unwrap_err(), CoreError::NoFreeUeIndex);
    }

    #[test]
    fn removing_a_ue_frees_its_index_for_reuse() {
        let mut mgr = UeManager::new(logger());
        let first = mgr.create_ue(CRnti(1)).unwrap();
        mgr.remove_ue(first).unwrap();
        let second = mgr.create_ue(CRnti(2)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn bearers_are_cleared_on_removal() {
        let mut mgr = UeManager::new(logger());
        let index = mgr.create_ue(CRnti(1)).unwrap();
        mgr.add_bearer(index, DrbId(1)).unwrap();
        assert_eq!(mgr.find_by_index(index).unwrap().bearers, vec![DrbId(1)]);
        mgr.remove_ue(index).unwrap();
        let second = mgr.create_ue(CRnti(2)).unwrap();
        assert!(mgr.find_by_index(second).unwrap().bearers.is_empty());
    }
}
