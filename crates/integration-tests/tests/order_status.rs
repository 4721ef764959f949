//! The order status machine: conditional transitions and conflicts.

use plateful_core::{OrderAction, OrderStatus, ShippingAddress};
use plateful_engine::EngineError;
use plateful_engine::models::{Order, OrderBucket};
use plateful_integration_tests::{TestContext, buyer, dec};

async fn placed_order(ctx: &TestContext) -> Order {
    let (business, foods) = ctx.seed_business("Trattoria", &[("Pizza", "14.00")]).await;
    let mut cart = ctx.catalog.open_cart(business.id).await.expect("open cart");
    cart.increment(foods[0].id);
    ctx.orders
        .checkout_cart(
            buyer(),
            ShippingAddress::new("Ada", "555-0100", "1 Main St").expect("valid"),
            &mut cart,
        )
        .await
        .expect("checkout")
}

#[tokio::test]
async fn merchant_can_cancel_an_unhandled_order() {
    let ctx = TestContext::new().await;
    let order = placed_order(&ctx).await;

    let cancelled = ctx
        .orders
        .transition_order(order.id, OrderAction::Cancel)
        .await
        .expect("cancel");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn merchant_can_complete_an_unhandled_order() {
    let ctx = TestContext::new().await;
    let order = placed_order(&ctx).await;

    let finished = ctx
        .orders
        .transition_order(order.id, OrderAction::Complete)
        .await
        .expect("complete");
    assert_eq!(finished.status, OrderStatus::Finished);
}

#[tokio::test]
async fn complete_after_cancel_conflicts_and_status_stays() {
    let ctx = TestContext::new().await;
    let order = placed_order(&ctx).await;

    ctx.orders
        .transition_order(order.id, OrderAction::Cancel)
        .await
        .expect("cancel wins");

    // The double-tapped loser gets a conflict naming both statuses.
    let err = ctx
        .orders
        .transition_order(order.id, OrderAction::Complete)
        .await
        .expect_err("complete loses");
    match err {
        EngineError::Conflict { expected, actual, .. } => {
            assert_eq!(expected, OrderStatus::Unhandled);
            assert_eq!(actual, OrderStatus::Cancelled);
        }
        other => panic!("expected conflict, got {other}"),
    }

    let fetched = ctx.orders.fetch_order(order.id).await.expect("fetch");
    assert_eq!(fetched.status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn terminal_statuses_admit_no_further_transition() {
    let ctx = TestContext::new().await;
    let order = placed_order(&ctx).await;

    ctx.orders
        .transition_order(order.id, OrderAction::Complete)
        .await
        .expect("complete");
    ctx.orders
        .submit_comment(order.id, "Lovely", 5, None)
        .await
        .expect("comment");

    for action in [OrderAction::Cancel, OrderAction::Complete] {
        let result = ctx.orders.transition_order(order.id, action).await;
        assert!(
            matches!(result, Err(EngineError::Conflict { .. })),
            "action {action} must conflict on a terminal order"
        );
    }
    let result = ctx.orders.submit_comment(order.id, "again", 5, None).await;
    assert!(matches!(result, Err(EngineError::Conflict { .. })));

    let fetched = ctx.orders.fetch_order(order.id).await.expect("fetch");
    assert_eq!(fetched.status, OrderStatus::FinishedCommented);
}

#[tokio::test]
async fn comment_action_cannot_bypass_rating_submission() {
    let ctx = TestContext::new().await;
    let order = placed_order(&ctx).await;
    ctx.orders
        .transition_order(order.id, OrderAction::Complete)
        .await
        .expect("complete");

    // The commented status is only reachable together with a persisted
    // comment row, through submit_comment.
    let err = ctx
        .orders
        .transition_order(order.id, OrderAction::Comment)
        .await
        .expect_err("direct comment transition rejected");
    assert!(matches!(err, EngineError::CommentRequired(_)));

    let fetched = ctx.orders.fetch_order(order.id).await.expect("fetch");
    assert_eq!(fetched.status, OrderStatus::Finished);
    assert_eq!(ctx.count_rows("comment").await, 0);
}

#[tokio::test]
async fn transition_on_missing_order_reports_not_found() {
    let ctx = TestContext::new().await;
    let ghost = plateful_core::OrderId::generate();

    let err = ctx
        .orders
        .transition_order(ghost, OrderAction::Cancel)
        .await
        .expect_err("missing order");
    assert!(matches!(err, EngineError::NotFound { entity: "order", .. }));
}

#[tokio::test]
async fn listings_split_open_from_settled() {
    let ctx = TestContext::new().await;
    let (business, foods) = ctx
        .seed_business("Trattoria", &[("Pizza", "14.00")])
        .await;
    let user = buyer();
    let addr = ShippingAddress::new("Ada", "555-0100", "1 Main St").expect("valid");

    let mut first = ctx.catalog.open_cart(business.id).await.expect("cart");
    first.increment(foods[0].id);
    let open_order = ctx
        .orders
        .checkout_cart(user, addr.clone(), &mut first)
        .await
        .expect("first checkout");

    let mut second = ctx.catalog.open_cart(business.id).await.expect("cart");
    second.increment(foods[0].id);
    second.increment(foods[0].id);
    let settled_order = ctx
        .orders
        .checkout_cart(user, addr, &mut second)
        .await
        .expect("second checkout");
    ctx.orders
        .transition_order(settled_order.id, OrderAction::Complete)
        .await
        .expect("complete");

    let open = ctx
        .orders
        .list_for_user(user, OrderBucket::Open)
        .await
        .expect("open listing");
    assert_eq!(open.iter().map(|o| o.id).collect::<Vec<_>>(), vec![open_order.id]);

    let settled = ctx
        .orders
        .list_for_business(business.id, OrderBucket::Settled)
        .await
        .expect("settled listing");
    assert_eq!(
        settled.iter().map(|o| o.id).collect::<Vec<_>>(),
        vec![settled_order.id]
    );
    // Listings come back with their snapshots attached.
    assert_eq!(settled.first().map(Order::total), Some(dec("28.00")));
}
