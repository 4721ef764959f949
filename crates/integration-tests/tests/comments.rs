//! The rating flow: comment persistence drives the final transition.

use plateful_core::{OrderAction, OrderStatus, ShippingAddress};
use plateful_engine::EngineError;
use plateful_engine::models::Order;
use plateful_integration_tests::{TestContext, buyer, dec};

async fn finished_order(ctx: &TestContext) -> Order {
    let (business, foods) = ctx.seed_business("Trattoria", &[("Pizza", "14.00")]).await;
    let mut cart = ctx.catalog.open_cart(business.id).await.expect("cart");
    cart.increment(foods[0].id);
    let order = ctx
        .orders
        .checkout_cart(
            buyer(),
            ShippingAddress::new("Ada", "555-0100", "1 Main St").expect("valid"),
            &mut cart,
        )
        .await
        .expect("checkout");
    ctx.orders
        .transition_order(order.id, OrderAction::Complete)
        .await
        .expect("complete")
}

#[tokio::test]
async fn rating_a_finished_order_creates_comment_and_advances_status() {
    let ctx = TestContext::new().await;
    let order = finished_order(&ctx).await;

    let comment = ctx
        .orders
        .submit_comment(order.id, "Crust was perfect", 5, None)
        .await
        .expect("comment");
    assert_eq!(comment.user_id, order.user_id);
    assert_eq!(comment.business_id, order.business_id);

    let fetched = ctx.orders.fetch_order(order.id).await.expect("fetch");
    assert_eq!(fetched.status, OrderStatus::FinishedCommented);

    let listed = ctx
        .catalog
        .list_comments(order.business_id)
        .await
        .expect("listing");
    assert_eq!(listed.iter().map(|c| c.id).collect::<Vec<_>>(), vec![comment.id]);
    assert_eq!(
        ctx.catalog
            .average_score(order.business_id)
            .await
            .expect("average"),
        Some(dec("5"))
    );
}

#[tokio::test]
async fn invalid_score_changes_nothing() {
    let ctx = TestContext::new().await;
    let order = finished_order(&ctx).await;

    let err = ctx
        .orders
        .submit_comment(order.id, "??", 6, None)
        .await
        .expect_err("score out of range");
    assert!(matches!(err, EngineError::InvalidScore(_)));

    let fetched = ctx.orders.fetch_order(order.id).await.expect("fetch");
    assert_eq!(fetched.status, OrderStatus::Finished);
    assert_eq!(ctx.count_rows("comment").await, 0);
}

#[tokio::test]
async fn rating_an_unhandled_order_conflicts() {
    let ctx = TestContext::new().await;
    let (business, foods) = ctx.seed_business("Trattoria", &[("Pizza", "14.00")]).await;
    let mut cart = ctx.catalog.open_cart(business.id).await.expect("cart");
    cart.increment(foods[0].id);
    let order = ctx
        .orders
        .checkout_cart(
            buyer(),
            ShippingAddress::new("Ada", "555-0100", "1 Main St").expect("valid"),
            &mut cart,
        )
        .await
        .expect("checkout");

    let err = ctx
        .orders
        .submit_comment(order.id, "too early", 4, None)
        .await
        .expect_err("not finished yet");
    match err {
        EngineError::Conflict { expected, actual, .. } => {
            assert_eq!(expected, OrderStatus::Finished);
            assert_eq!(actual, OrderStatus::Unhandled);
        }
        other => panic!("expected conflict, got {other}"),
    }
    // The losing comment row was rolled back with the transition.
    assert_eq!(ctx.count_rows("comment").await, 0);
}

#[tokio::test]
async fn double_rating_loses_and_leaves_one_comment() {
    let ctx = TestContext::new().await;
    let order = finished_order(&ctx).await;

    ctx.orders
        .submit_comment(order.id, "first", 4, None)
        .await
        .expect("first rating");
    let err = ctx
        .orders
        .submit_comment(order.id, "second", 1, None)
        .await
        .expect_err("second rating conflicts");
    assert!(matches!(err, EngineError::Conflict { .. }));

    assert_eq!(ctx.count_rows("comment").await, 1);
    assert_eq!(
        ctx.catalog
            .average_score(order.business_id)
            .await
            .expect("average"),
        Some(dec("4"))
    );
}
