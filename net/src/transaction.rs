//! Transaction slot table: one outstanding request per slot, completed by
//! the PDU reader task when a matching response arrives, or failed by a
//! guard timer if the peer never answers. Sized like the real stack's NG/F1
//! setup retry machinery in `gnb-cu-cp`'s workflows, which assumes a
//! transaction either completes or times out, never both.

use crate::traits::TransactionId;
use async_channel::{bounded, Receiver, Sender};
use async_std::sync::Mutex;
use common::{CoreError, CoreResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

pub const DEFAULT_GUARD_TIMER: Duration = Duration::from_secs(2);

/// `Ok` is a Success-tagged response payload, `Err` a Failure-tagged one.
pub type TransactionOutcome = Result<asn1_per::Buffer, asn1_per::Buffer>;

pub struct PendingTransaction {
    pub sender: Sender<TransactionOutcome>,
}

#[derive(Default)]
pub struct TransactionManager {
    next_id: AtomicU32,
    slots: Mutex<HashMap<TransactionId, PendingTransaction>>,
}

impl TransactionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a new transaction slot, returning its id and the receiving
    /// half of the channel the PDU reader task will complete.
    pub async fn begin(&self) -> (TransactionId, Receiver<TransactionOutcome>) {
        let id = TransactionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = bounded(1);
        self.slots.lock().await.insert(id, PendingTransaction { sender: tx });
        (id, rx)
    }

    /// Complete a pending transaction with the raw response payload.
    /// Returns `NotFound` if the slot was already completed or timed out.
    pub async fn complete(&self, id: TransactionId, outcome: TransactionOutcome) -> CoreResult<()> {
        let slot = self.slots.lock().await.remove(&id).ok_or(CoreError::NotFound)?;
        slot.sender.send(outcome).await.map_err(|_| CoreError::NotFound)
    }

    /// Drop a slot after its guard timer fires or the request failed to
    /// send, so a late response can no longer match it.
    pub async fn abandon(&self, id: TransactionId) {
        self.slots.lock().await.remove(&id);
    }

    pub async fn pending_count(&self) -> usize {
        self.slots.lock().await.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use asn1_per::Buffer;

    #[async_std::test]
    async fn complete_delivers_to_waiting_receiver() {
        let mgr = TransactionManager::new();
        let (id, rx) = mgr.begin().await;
        mgr.complete(id, Ok(Buffer::from_vec(vec![1, 2, 3]))).await.unwrap();
        let payload = rx.recv().await.unwrap().unwrap();
        assert_eq!(payload.to_contiguous(), vec![1, 2, 3]);
    }

    #[async_std::test]
    async fn completing_twice_fails_the_second_time() {
        let mgr = TransactionManager::new();
        let (id, _rx) = mgr.begin().await;
        mgr.complete(id, Ok(Buffer::from_vec(vec![1]))).await.unwrap();
        assert!(mgr.complete(id, Ok(Buffer::from_vec(vec![2]))).await.is_err());
    }

    #[async_std::test]
    async fn abandon_clears_the_slot() {
        let mgr = TransactionManager::new();
        let (id, _rx) = mgr.begin().await;
        mgr.abandon(id).await;
        assert_eq!(mgr.pending_count().await, 0);
        assert!(mgr.complete(id, Ok(Buffer::from_vec(vec![1]))).await.is_err());
    }

    #[async_std::test]
    async fn transaction_ids_are_unique() {
        let mgr = TransactionManager::new();
        let (id1, _) = mgr.begin().await;
        let (id2, _) = mgr.begin().await;
        assert_ne!(id1, id2);
    }
}
