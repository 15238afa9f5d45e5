use accrual_tools::AccrualStatus;
use cucumber::{given, then, when};
use loyalty_common::Points;
use loyalty_engine::{
    db_types::{NewOrder, Order, OrderId, OrderStatusType},
    test_utils::fakes::ScriptedReply,
    InsertOrderResult,
    OrderManagement,
    OrderStoreError,
};

use crate::cucumber::{loyalty_world::DISCOVERY_INTERVAL, LoyaltyWorld};

/// Parses a script such as `PROCESSING; PROCESSED 500; RATE LIMITED; NO CONTENT`.
fn parse_script(script: &str) -> Vec<ScriptedReply> {
    script
        .split(';')
        .map(str::trim)
        .map(|step| match step {
            "PROCESSING" => ScriptedReply::processing(),
            "INVALID" => ScriptedReply::invalid(),
            "RATE LIMITED" => ScriptedReply::RateLimited,
            "NO CONTENT" => ScriptedReply::NoContent,
            s if s.starts_with("PROCESSED ") => {
                let points = s["PROCESSED ".len()..].parse::<Points>().expect("Invalid accrual amount");
                ScriptedReply::Result(AccrualStatus::Processed, Some(points))
            },
            s if s.starts_with("FAILURE ") => ScriptedReply::Failure(s["FAILURE ".len()..].to_string()),
            s => panic!("Unknown accrual reply: {s}"),
        })
        .collect()
}

async fn fetch_order(world: &mut LoyaltyWorld, order_id: &str) -> Order {
    let db = &world.system().db;
    db.order_by_id(&OrderId::from(order_id)).await.expect("Error fetching order").expect("Order not found")
}

#[given(expr = "customer '{word}' uploads order {word}")]
async fn upload_order(world: &mut LoyaltyWorld, customer_id: String, order_id: String) {
    let order = NewOrder::new(OrderId::from(order_id), customer_id);
    let result = world.system().db.insert_order(order).await.expect("Error inserting order");
    assert!(result.was_inserted(), "Order was already registered");
}

#[when(expr = "customer '{word}' uploads order {word} again")]
async fn upload_order_again(world: &mut LoyaltyWorld, customer_id: String, order_id: String) {
    let order = NewOrder::new(OrderId::from(order_id), customer_id);
    let result = world.system().db.insert_order(order).await.expect("Error inserting order");
    assert!(matches!(result, InsertOrderResult::AlreadyExists(_)), "Order was inserted twice");
}

#[then(expr = "uploading order {word} for customer '{word}' is rejected as invalid")]
async fn upload_invalid_order(world: &mut LoyaltyWorld, order_id: String, customer_id: String) {
    let order = NewOrder::new(OrderId::from(order_id), customer_id);
    let err = world.system().db.insert_order(order).await.expect_err("Order number was accepted");
    assert!(matches!(err, OrderStoreError::InvalidOrderNumber(_)), "Unexpected error: {err}");
}

#[given(expr = "the accrual service will answer {string} for order {word}")]
async fn script_accrual_service(world: &mut LoyaltyWorld, script: String, order_id: String) {
    world.system().client.script(&order_id, parse_script(&script));
}

#[when(expr = "the accrual sync engine runs with {int} workers for {int} discovery cycles")]
async fn run_engine(world: &mut LoyaltyWorld, workers: usize, cycles: u32) {
    let system = world.system();
    system.start_engine(workers);
    // The first cycle starts immediately. Stop halfway between the last cycle and the one after it.
    let run_time = DISCOVERY_INTERVAL * cycles.saturating_sub(1) + DISCOVERY_INTERVAL / 2;
    tokio::time::sleep(run_time).await;
    system.stop_engine().await;
}

#[then(expr = "order {word} has status {word}")]
async fn order_has_status(world: &mut LoyaltyWorld, order_id: String, status: String) {
    let expected = status.parse::<OrderStatusType>().expect("Unknown status");
    let order = fetch_order(world, &order_id).await;
    assert_eq!(order.status, expected);
}

#[then(expr = "order {word} has an accrual of {word} points")]
async fn order_has_accrual(world: &mut LoyaltyWorld, order_id: String, points: String) {
    let expected = points.parse::<Points>().expect("Invalid points amount");
    let order = fetch_order(world, &order_id).await;
    assert_eq!(order.accrual, Some(expected));
}

#[then(expr = "order {word} has no accrual")]
async fn order_has_no_accrual(world: &mut LoyaltyWorld, order_id: String) {
    let order = fetch_order(world, &order_id).await;
    assert_eq!(order.accrual, None);
}

#[then(expr = "order {word} belongs to customer '{word}'")]
async fn order_belongs_to(world: &mut LoyaltyWorld, order_id: String, customer_id: String) {
    let order = fetch_order(world, &order_id).await;
    assert_eq!(order.customer_id, customer_id);
}

#[then(expr = "the accrual service was asked about order {word} {int} times")]
async fn query_count(world: &mut LoyaltyWorld, order_id: String, count: usize) {
    assert_eq!(world.system().client.queries_for(&order_id), count);
}
