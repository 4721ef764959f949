//! Checkout: turning a mutable cart into an immutable, priced order.

use plateful_core::{OrderStatus, ShippingAddress};
use plateful_engine::EngineError;
use plateful_integration_tests::{TestContext, buyer, dec};

fn address() -> ShippingAddress {
    ShippingAddress::new("Ada", "555-0100", "1 Main St").expect("valid address")
}

#[tokio::test]
async fn checkout_round_trips_through_fetch() {
    let ctx = TestContext::new().await;
    let (business, foods) = ctx
        .seed_business("Golden Noodle House", &[("Item A", "10.00"), ("Item B", "5.00")])
        .await;

    let mut cart = ctx.catalog.open_cart(business.id).await.expect("open cart");
    cart.increment(foods[0].id);
    cart.increment(foods[0].id);
    cart.increment(foods[1].id);
    assert_eq!(cart.running_total(), dec("25.00"));

    let user = buyer();
    let order = ctx
        .orders
        .checkout_cart(user, address(), &mut cart)
        .await
        .expect("checkout succeeds");

    // Cart is cleared only on success.
    assert!(cart.is_empty());

    let fetched = ctx.orders.fetch_order(order.id).await.expect("fetch");
    assert_eq!(fetched.id, order.id);
    assert_eq!(fetched.user_id, user);
    assert_eq!(fetched.business_id, business.id);
    assert_eq!(fetched.status, OrderStatus::Unhandled);
    assert_eq!(fetched.details.len(), 2);
    assert_eq!(fetched.total(), dec("25.00"));
    assert_eq!(fetched.address, address());
}

#[tokio::test]
async fn snapshots_survive_later_price_edits() {
    let ctx = TestContext::new().await;
    let (business, foods) = ctx.seed_business("Trattoria", &[("Pizza", "14.00")]).await;

    let mut cart = ctx.catalog.open_cart(business.id).await.expect("open cart");
    cart.increment(foods[0].id);
    let order = ctx
        .orders
        .checkout_cart(buyer(), address(), &mut cart)
        .await
        .expect("checkout");

    // Merchant raises the price afterward.
    ctx.catalog
        .update_food(foods[0].id, "Pizza", "", dec("99.00"), None)
        .await
        .expect("price edit");

    let fetched = ctx.orders.fetch_order(order.id).await.expect("fetch");
    let detail = fetched.details.first().expect("one detail");
    assert_eq!(detail.price, dec("14.00"));
    assert_eq!(fetched.total(), dec("14.00"));
}

#[tokio::test]
async fn empty_cart_is_rejected_before_any_write() {
    let ctx = TestContext::new().await;
    let (business, _) = ctx.seed_business("Trattoria", &[("Pizza", "14.00")]).await;

    let mut cart = ctx.catalog.open_cart(business.id).await.expect("open cart");
    // All quantities are still zero.
    let err = ctx
        .orders
        .checkout_cart(buyer(), address(), &mut cart)
        .await
        .expect_err("empty cart rejected");

    assert!(matches!(err, EngineError::EmptyCart));
    assert_eq!(ctx.count_rows("orders").await, 0);
    assert_eq!(ctx.count_rows("order_detail").await, 0);
}

#[tokio::test]
async fn blank_address_fields_are_rejected_before_any_write() {
    let ctx = TestContext::new().await;
    let (business, foods) = ctx.seed_business("Trattoria", &[("Pizza", "14.00")]).await;

    let mut cart = ctx.catalog.open_cart(business.id).await.expect("open cart");
    cart.increment(foods[0].id);

    // The address fails validation, so checkout is never reached and no
    // order row can exist.
    let err = ShippingAddress::new("Ada", "", "1 Main St")
        .map_err(EngineError::from)
        .expect_err("blank phone rejected");
    assert!(err.to_string().contains("phone"));
    assert_eq!(ctx.count_rows("orders").await, 0);
}

#[tokio::test]
async fn soft_deleted_food_still_snapshots_at_checkout() {
    let ctx = TestContext::new().await;
    let (business, foods) = ctx.seed_business("Trattoria", &[("Pizza", "14.00")]).await;

    let mut cart = ctx.catalog.open_cart(business.id).await.expect("open cart");
    cart.increment(foods[0].id);

    // Withdrawn after being added to the cart: existence, not visibility,
    // is the checkout-time condition.
    ctx.catalog.withdraw_food(foods[0].id).await.expect("withdraw");

    let order = ctx
        .orders
        .checkout_cart(buyer(), address(), &mut cart)
        .await
        .expect("checkout still succeeds");
    assert_eq!(order.details.first().map(|d| d.name.as_str()), Some("Pizza"));
}

#[tokio::test]
async fn dangling_business_reference_is_rejected() {
    let ctx = TestContext::new().await;

    // Foreign keys are enforced on the test pool just like production.
    let result = sqlx::query(
        "INSERT INTO orders (id, created_at, business_id, user_id, detail_group_id, status, address) \
         VALUES ('o-1', '2026-01-01 00:00:00+00:00', 'no-such-business', 'u-1', 'g-1', 1, 'a|b|c')",
    )
    .execute(&ctx.pool)
    .await;

    assert!(result.is_err());
    assert_eq!(ctx.count_rows("orders").await, 0);
}

#[tokio::test]
async fn vanished_food_fails_checkout_with_not_found() {
    let ctx = TestContext::new().await;
    let (business, foods) = ctx.seed_business("Trattoria", &[("Pizza", "14.00")]).await;

    let mut cart = ctx.catalog.open_cart(business.id).await.expect("open cart");
    cart.increment(foods[0].id);

    // Physically remove the row to simulate a vanished reference. The
    // engine itself never hard-deletes.
    sqlx::query("DELETE FROM food_item WHERE id = ?")
        .bind(foods[0].id)
        .execute(&ctx.pool)
        .await
        .expect("hard delete");

    let err = ctx
        .orders
        .checkout_cart(buyer(), address(), &mut cart)
        .await
        .expect_err("missing food rejected");
    assert!(matches!(err, EngineError::NotFound { entity: "food item", .. }));
    // Failure leaves the cart untouched and no partial order behind.
    assert!(!cart.is_empty());
    assert_eq!(ctx.count_rows("orders").await, 0);
    assert_eq!(ctx.count_rows("order_detail").await, 0);
}
