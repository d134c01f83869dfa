//! Tests for the order desk service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

use super::*;
use crate::domain::ports::{
    MockOrderRepository, MockProductRepository, MockSandwichRepository, MockStockPublisher,
    OrderRepositoryError,
};
use crate::domain::{Colour, ErrorCode, Product, Size};

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 11, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

fn member(weight_grams: i32) -> Product {
    Product {
        id: Uuid::new_v4(),
        name: format!("ingredient-{weight_grams}"),
        size: Size::M,
        weight_grams,
        colour: Colour::Red,
        quantity_in_stock: 10,
        cook_time_seconds: Some(90),
    }
}

fn croque() -> Sandwich {
    Sandwich::compose(
        Uuid::new_v4(),
        "Croque".to_owned(),
        Size::M,
        vec![member(120), member(25)],
    )
}

fn order_for(sandwich: &Sandwich, quantity: i32, status: OrderStatus) -> Order {
    Order::from_draft(
        Uuid::new_v4(),
        OrderDraft {
            sandwich_id: sandwich.id,
            quantity,
            status,
            barcode: None,
        },
        sandwich,
        fixture_timestamp(),
    )
    .expect("fixture totals fit in i32")
}

struct Mocks {
    orders: MockOrderRepository,
    sandwiches: MockSandwichRepository,
    products: MockProductRepository,
    publisher: MockStockPublisher,
}

impl Mocks {
    fn new() -> Self {
        Self {
            orders: MockOrderRepository::new(),
            sandwiches: MockSandwichRepository::new(),
            products: MockProductRepository::new(),
            publisher: MockStockPublisher::new(),
        }
    }

    fn expect_broadcast(&mut self) {
        self.products.expect_list().times(1).returning(|| Ok(vec![]));
        self.publisher.expect_publish().times(1).return_const(());
    }

    fn expect_no_broadcast(&mut self) {
        self.products.expect_list().times(0);
        self.publisher.expect_publish().times(0);
    }

    fn into_service(
        self,
    ) -> OrderDeskService<
        MockOrderRepository,
        MockSandwichRepository,
        MockProductRepository,
        MockStockPublisher,
    > {
        OrderDeskService::new(
            Arc::new(self.orders),
            Arc::new(self.sandwiches),
            Arc::new(self.products),
            Arc::new(self.publisher),
            fixture_clock(),
        )
    }
}

#[tokio::test]
async fn create_order_derives_totals_from_the_sandwich() {
    let sandwich = croque();
    let sandwich_id = sandwich.id;

    let mut mocks = Mocks::new();
    mocks
        .sandwiches
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(sandwich)));
    mocks
        .orders
        .expect_insert()
        .withf(|order: &Order| {
            order.weight_total_grams == 290
                && order.cook_time_total_seconds == 180
                && order.status == OrderStatus::Pending
                && order.created_at == fixture_timestamp()
        })
        .times(1)
        .returning(|_| Ok(()));
    mocks.expect_no_broadcast();

    let created = mocks
        .into_service()
        .create_order(OrderDraft {
            sandwich_id,
            quantity: 2,
            status: OrderStatus::Pending,
            barcode: None,
        })
        .await
        .expect("create succeeds");
    assert_eq!(created.weight_total_grams, 290);
    assert_eq!(created.sandwich_id, sandwich_id);
}

#[tokio::test]
async fn create_order_unknown_sandwich_is_invalid_request() {
    let mut mocks = Mocks::new();
    mocks
        .sandwiches
        .expect_find_by_id()
        .times(1)
        .returning(|_| Ok(None));
    mocks.orders.expect_insert().times(0);

    let error = mocks
        .into_service()
        .create_order(OrderDraft {
            sandwich_id: Uuid::new_v4(),
            quantity: 1,
            status: OrderStatus::Pending,
            barcode: None,
        })
        .await
        .expect_err("unknown sandwich rejected");
    assert_eq!(error.code, ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn create_order_directly_done_does_not_draw_stock() {
    let sandwich = croque();
    let sandwich_id = sandwich.id;

    let mut mocks = Mocks::new();
    mocks
        .sandwiches
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(sandwich)));
    mocks
        .orders
        .expect_insert()
        .withf(|order: &Order| order.status == OrderStatus::Done)
        .times(1)
        .returning(|_| Ok(()));
    mocks.orders.expect_complete().times(0);
    mocks.expect_no_broadcast();

    let created = mocks
        .into_service()
        .create_order(OrderDraft {
            sandwich_id,
            quantity: 1,
            status: OrderStatus::Done,
            barcode: None,
        })
        .await
        .expect("create succeeds");
    assert_eq!(created.status, OrderStatus::Done);
}

#[tokio::test]
async fn create_order_duplicate_barcode_is_conflict() {
    let sandwich = croque();
    let sandwich_id = sandwich.id;

    let mut mocks = Mocks::new();
    mocks
        .sandwiches
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(sandwich)));
    mocks
        .orders
        .expect_insert()
        .times(1)
        .returning(|_| Err(OrderRepositoryError::duplicate_barcode("K-0042")));

    let error = mocks
        .into_service()
        .create_order(OrderDraft {
            sandwich_id,
            quantity: 1,
            status: OrderStatus::Pending,
            barcode: Some("K-0042".to_owned()),
        })
        .await
        .expect_err("duplicate barcode rejected");
    assert_eq!(error.code, ErrorCode::Conflict);
}

#[tokio::test]
async fn change_status_into_done_draws_stock_once() {
    let sandwich = croque();
    let existing = order_for(&sandwich, 3, OrderStatus::Cooking);
    let loaded = existing.clone();

    let mut mocks = Mocks::new();
    mocks
        .orders
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(loaded)));
    let for_lookup = sandwich.clone();
    mocks
        .sandwiches
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(for_lookup)));
    mocks
        .orders
        .expect_complete()
        .withf(|order: &Order, debits: &[StockDebit]| {
            order.status == OrderStatus::Done
                && debits.len() == 2
                && debits.iter().all(|debit| debit.amount == 3)
        })
        .times(1)
        .returning(|_, _| Ok(()));
    mocks.orders.expect_update().times(0);
    mocks.expect_broadcast();

    let updated = mocks
        .into_service()
        .change_status(existing.id, OrderStatus::Done)
        .await
        .expect("transition succeeds");
    assert_eq!(updated.status, OrderStatus::Done);
}

#[tokio::test]
async fn change_status_shortfall_is_conflict_without_broadcast() {
    let sandwich = croque();
    let existing = order_for(&sandwich, 40, OrderStatus::Validated);
    let loaded = existing.clone();

    let mut mocks = Mocks::new();
    mocks
        .orders
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(loaded)));
    mocks
        .sandwiches
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(sandwich)));
    mocks
        .orders
        .expect_complete()
        .times(1)
        .returning(|_, _| Err(OrderRepositoryError::insufficient_stock("ingredient-25")));
    mocks.expect_no_broadcast();

    let error = mocks
        .into_service()
        .change_status(existing.id, OrderStatus::Done)
        .await
        .expect_err("shortfall rejected");
    assert_eq!(error.code, ErrorCode::Conflict);
    assert!(error.message.contains("ingredient-25"));
}

#[tokio::test]
async fn change_status_between_non_done_states_updates_without_drawing() {
    let sandwich = croque();
    let existing = order_for(&sandwich, 1, OrderStatus::Pending);
    let loaded = existing.clone();

    let mut mocks = Mocks::new();
    mocks
        .orders
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(loaded)));
    mocks
        .sandwiches
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(sandwich)));
    mocks
        .orders
        .expect_update()
        .withf(|order: &Order| order.status == OrderStatus::Cooking)
        .times(1)
        .returning(|_| Ok(true));
    mocks.orders.expect_complete().times(0);
    mocks.expect_broadcast();

    let updated = mocks
        .into_service()
        .change_status(existing.id, OrderStatus::Cooking)
        .await
        .expect("transition succeeds");
    assert_eq!(updated.status, OrderStatus::Cooking);
}

#[tokio::test]
async fn change_status_of_a_done_order_never_draws_again() {
    let sandwich = croque();
    let existing = order_for(&sandwich, 2, OrderStatus::Done);
    let loaded = existing.clone();

    let mut mocks = Mocks::new();
    mocks
        .orders
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(loaded)));
    mocks
        .sandwiches
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(sandwich)));
    mocks.orders.expect_complete().times(0);
    mocks.orders.expect_update().times(1).returning(|_| Ok(true));
    mocks.expect_broadcast();

    let updated = mocks
        .into_service()
        .change_status(existing.id, OrderStatus::Done)
        .await
        .expect("transition succeeds");
    assert_eq!(updated.status, OrderStatus::Done);
}

#[tokio::test]
async fn change_status_refreshes_stale_totals() {
    let sandwich = croque();
    let mut existing = order_for(&sandwich, 2, OrderStatus::Pending);
    existing.weight_total_grams = 9_999;
    let loaded = existing.clone();

    let mut mocks = Mocks::new();
    mocks
        .orders
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(loaded)));
    mocks
        .sandwiches
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(sandwich)));
    mocks
        .orders
        .expect_update()
        .withf(|order: &Order| order.weight_total_grams == 290)
        .times(1)
        .returning(|_| Ok(true));
    mocks.expect_broadcast();

    let updated = mocks
        .into_service()
        .change_status(existing.id, OrderStatus::TicketPrinted)
        .await
        .expect("transition succeeds");
    assert_eq!(updated.weight_total_grams, 290);
}

#[tokio::test]
async fn verify_weight_within_tolerance_completes_the_order() {
    let sandwich = croque();
    let existing = order_for(&sandwich, 2, OrderStatus::Cooking);
    assert_eq!(existing.weight_total_grams, 290);
    let loaded = existing.clone();

    let mut mocks = Mocks::new();
    mocks
        .orders
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(loaded)));
    mocks
        .sandwiches
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(sandwich)));
    mocks
        .orders
        .expect_complete()
        .withf(|order: &Order, _| order.status == OrderStatus::Done)
        .times(1)
        .returning(|_, _| Ok(()));
    mocks.expect_broadcast();

    let verified = mocks
        .into_service()
        .verify_weight(existing.id, 293)
        .await
        .expect("verification succeeds");
    assert_eq!(verified.status, OrderStatus::Done);
}

#[tokio::test]
async fn verify_weight_outside_tolerance_resets_to_pending() {
    let sandwich = croque();
    let existing = order_for(&sandwich, 2, OrderStatus::Cooking);
    let loaded = existing.clone();

    let mut mocks = Mocks::new();
    mocks
        .orders
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(loaded)));
    mocks
        .sandwiches
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(sandwich)));
    mocks
        .orders
        .expect_update()
        .withf(|order: &Order| order.status == OrderStatus::Pending)
        .times(1)
        .returning(|_| Ok(true));
    mocks.orders.expect_complete().times(0);
    mocks.expect_broadcast();

    let verified = mocks
        .into_service()
        .verify_weight(existing.id, 250)
        .await
        .expect("verification succeeds");
    assert_eq!(verified.status, OrderStatus::Pending);
}

#[tokio::test]
async fn update_order_completing_draws_stock() {
    let sandwich = croque();
    let sandwich_id = sandwich.id;
    let existing = order_for(&sandwich, 1, OrderStatus::Cooking);
    let loaded = existing.clone();

    let mut mocks = Mocks::new();
    mocks
        .orders
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(loaded)));
    mocks
        .sandwiches
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(sandwich)));
    mocks
        .orders
        .expect_complete()
        .withf(|order: &Order, debits: &[StockDebit]| {
            order.status == OrderStatus::Done && debits.iter().all(|debit| debit.amount == 2)
        })
        .times(1)
        .returning(|_, _| Ok(()));
    mocks.expect_broadcast();

    let updated = mocks
        .into_service()
        .update_order(
            existing.id,
            OrderDraft {
                sandwich_id,
                quantity: 2,
                status: OrderStatus::Done,
                barcode: None,
            },
        )
        .await
        .expect("update succeeds");
    assert_eq!(updated.quantity, 2);
    assert_eq!(updated.status, OrderStatus::Done);
}

#[tokio::test]
async fn update_order_preserves_the_creation_timestamp() {
    let sandwich = croque();
    let sandwich_id = sandwich.id;
    let existing = order_for(&sandwich, 1, OrderStatus::Pending);
    let created_at = existing.created_at;
    let loaded = existing.clone();

    let mut mocks = Mocks::new();
    mocks
        .orders
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(loaded)));
    mocks
        .sandwiches
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(sandwich)));
    mocks
        .orders
        .expect_update()
        .withf(move |order: &Order| order.created_at == created_at)
        .times(1)
        .returning(|_| Ok(true));
    mocks.expect_no_broadcast();

    mocks
        .into_service()
        .update_order(
            existing.id,
            OrderDraft {
                sandwich_id,
                quantity: 3,
                status: OrderStatus::Pending,
                barcode: None,
            },
        )
        .await
        .expect("update succeeds");
}

#[tokio::test]
async fn delete_order_missing_is_not_found() {
    let mut mocks = Mocks::new();
    mocks.orders.expect_delete().times(1).returning(|_| Ok(false));

    let error = mocks
        .into_service()
        .delete_order(Uuid::new_v4())
        .await
        .expect_err("missing order");
    assert_eq!(error.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn change_status_missing_order_is_not_found() {
    let mut mocks = Mocks::new();
    mocks
        .orders
        .expect_find_by_id()
        .times(1)
        .returning(|_| Ok(None));

    let error = mocks
        .into_service()
        .change_status(Uuid::new_v4(), OrderStatus::Cooking)
        .await
        .expect_err("missing order");
    assert_eq!(error.code, ErrorCode::NotFound);
}
