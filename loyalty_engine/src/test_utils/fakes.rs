//! In-memory stand-ins for the order store and the accrual service.
//!
//! Both fakes are cheap to clone and every clone shares the same state, so a test can keep one copy for assertions
//! while the engine works on the other.
use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{Arc, Mutex},
};

use accrual_tools::AccrualStatus;
use chrono::Utc;
use log::*;
use loyalty_common::Points;
use tokio::time::Instant;

use crate::{
    db_types::{AccrualResult, Order, OrderId, OrderStatusType},
    traits::{AccrualOrderStore, AccrualQuery, AccrualQueryError, OrderStoreError},
};

//--------------------------------------   MemoryOrderStore    ---------------------------------------------------------
#[derive(Default)]
struct StoreState {
    orders: Vec<Order>,
    failing_listings: usize,
    failing_persists: HashSet<OrderId>,
    list_calls: usize,
    persisted: Vec<AccrualResult>,
}

#[derive(Clone, Default)]
pub struct MemoryOrderStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an order with status `NEW` and no accrual.
    pub fn add_order(&self, order_id: &str) {
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();
        let id = state.orders.len() as i64 + 1;
        state.orders.push(Order {
            id,
            order_id: OrderId::from(order_id),
            customer_id: "alice".to_string(),
            status: OrderStatusType::New,
            accrual: None,
            created_at: now,
            updated_at: now,
        });
    }

    /// The next `n` calls to `fetch_unsettled_order_ids` fail.
    pub fn fail_next_listings(&self, n: usize) {
        self.state.lock().unwrap().failing_listings = n;
    }

    /// Every persist for this order fails until further notice.
    pub fn fail_persist_for(&self, order_id: &str) {
        self.state.lock().unwrap().failing_persists.insert(OrderId::from(order_id));
    }

    pub fn order(&self, order_id: &str) -> Option<Order> {
        let id = OrderId::from(order_id);
        self.state.lock().unwrap().orders.iter().find(|o| o.order_id == id).cloned()
    }

    pub fn status_of(&self, order_id: &str) -> Option<OrderStatusType> {
        self.order(order_id).map(|o| o.status)
    }

    pub fn accrual_of(&self, order_id: &str) -> Option<Points> {
        self.order(order_id).and_then(|o| o.accrual)
    }

    /// The number of times the unsettled orders have been listed, including failed attempts.
    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    /// Every result that was successfully persisted, in the order they were written.
    pub fn persisted_results(&self) -> Vec<AccrualResult> {
        self.state.lock().unwrap().persisted.clone()
    }
}

impl AccrualOrderStore for MemoryOrderStore {
    async fn fetch_unsettled_order_ids(&self) -> Result<Vec<OrderId>, OrderStoreError> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        if state.failing_listings > 0 {
            state.failing_listings -= 1;
            return Err(OrderStoreError::DatabaseError("database is locked".into()));
        }
        let ids = state.orders.iter().filter(|o| !o.status.is_terminal()).map(|o| o.order_id.clone()).collect();
        Ok(ids)
    }

    async fn persist_accrual_result(&self, result: &AccrualResult) -> Result<(), OrderStoreError> {
        let mut state = self.state.lock().unwrap();
        if state.failing_persists.contains(&result.order_id) {
            return Err(OrderStoreError::DatabaseError("disk I/O error".into()));
        }
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.order_id == result.order_id)
            .ok_or_else(|| OrderStoreError::OrderNotFound(result.order_id.clone()))?;
        order.status = result.order_status();
        order.accrual = result.accrual;
        order.updated_at = Utc::now();
        state.persisted.push(result.clone());
        Ok(())
    }
}

//--------------------------------------  ScriptedAccrualClient ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedReply {
    Result(AccrualStatus, Option<Points>),
    RateLimited,
    NoContent,
    Failure(String),
}

impl ScriptedReply {
    pub fn processed(points: i64) -> Self {
        Self::Result(AccrualStatus::Processed, Some(Points::from_points(points)))
    }

    pub fn processing() -> Self {
        Self::Result(AccrualStatus::Processing, None)
    }

    pub fn invalid() -> Self {
        Self::Result(AccrualStatus::Invalid, None)
    }
}

/// One query made against the [`ScriptedAccrualClient`].
#[derive(Debug, Clone)]
pub struct QueryRecord {
    pub order_id: OrderId,
    pub at: Instant,
    pub reply: ScriptedReply,
}

#[derive(Default)]
struct ClientState {
    scripts: HashMap<OrderId, VecDeque<ScriptedReply>>,
    queries: Vec<QueryRecord>,
}

/// An accrual service that plays back a script of replies per order. Each query consumes the next reply, and the last
/// reply repeats forever. Orders without a script get `NoContent`.
#[derive(Clone, Default)]
pub struct ScriptedAccrualClient {
    state: Arc<Mutex<ClientState>>,
}

impl ScriptedAccrualClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, order_id: &str, replies: Vec<ScriptedReply>) {
        self.state.lock().unwrap().scripts.insert(OrderId::from(order_id), replies.into());
    }

    pub fn queries(&self) -> Vec<QueryRecord> {
        self.state.lock().unwrap().queries.clone()
    }

    pub fn queries_for(&self, order_id: &str) -> usize {
        let id = OrderId::from(order_id);
        self.state.lock().unwrap().queries.iter().filter(|q| q.order_id == id).count()
    }

    fn next_reply(&self, order_id: &OrderId) -> ScriptedReply {
        let mut state = self.state.lock().unwrap();
        let reply = match state.scripts.get_mut(order_id) {
            Some(script) if script.len() > 1 => script.pop_front(),
            Some(script) => script.front().cloned(),
            None => None,
        }
        .unwrap_or(ScriptedReply::NoContent);
        state.queries.push(QueryRecord { order_id: order_id.clone(), at: Instant::now(), reply: reply.clone() });
        reply
    }
}

impl AccrualQuery for ScriptedAccrualClient {
    async fn query_accrual(&self, order_id: &OrderId) -> Result<AccrualResult, AccrualQueryError> {
        let reply = self.next_reply(order_id);
        trace!("📡️ Scripted reply for {order_id}: {reply:?}");
        match reply {
            ScriptedReply::Result(status, accrual) => Ok(AccrualResult::new(order_id.clone(), status, accrual)),
            ScriptedReply::RateLimited => Err(AccrualQueryError::RateLimited { retry_after: None }),
            ScriptedReply::NoContent => Err(AccrualQueryError::NoContent),
            ScriptedReply::Failure(msg) => Err(AccrualQueryError::Failed(msg)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn scripts_play_back_and_repeat_the_last_reply() {
        let client = ScriptedAccrualClient::new();
        client.script("1", vec![ScriptedReply::processing(), ScriptedReply::processed(500)]);
        let id = OrderId::from("1");
        assert_eq!(client.query_accrual(&id).await.unwrap().status, AccrualStatus::Processing);
        assert_eq!(client.query_accrual(&id).await.unwrap().status, AccrualStatus::Processed);
        assert_eq!(client.query_accrual(&id).await.unwrap().accrual, Some(Points::from_points(500)));
        assert_eq!(client.query_accrual(&"2".into()).await, Err(AccrualQueryError::NoContent));
        assert_eq!(client.queries_for("1"), 3);
    }

    #[tokio::test]
    async fn memory_store_lists_only_unsettled_orders() {
        let store = MemoryOrderStore::new();
        store.add_order("1");
        store.add_order("2");
        let done = AccrualResult::new("2".into(), AccrualStatus::Invalid, None);
        store.persist_accrual_result(&done).await.unwrap();
        assert_eq!(store.fetch_unsettled_order_ids().await.unwrap(), vec![OrderId::from("1")]);
        let missing = AccrualResult::new("3".into(), AccrualStatus::Invalid, None);
        let err = store.persist_accrual_result(&missing).await.unwrap_err();
        assert!(matches!(err, OrderStoreError::OrderNotFound(_)));
    }
}
