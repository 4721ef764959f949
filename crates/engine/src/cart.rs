//! In-memory cart state for one (buyer, business) session.
//!
//! The cart is an explicit object owned by the session context - never a
//! display-widget string. It seeds one entry per visible catalog item at
//! quantity zero, mutates only its own state, and never touches the
//! repository. Checkout reads [`Cart::lines`] and, on success, the service
//! clears the cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use plateful_core::{BusinessId, FoodId, pricing};

use crate::models::FoodItem;

/// One checkout-bound line: a food item and its selected quantity.
///
/// Transient and in-memory only; it exists until checkout succeeds or the
/// session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// The selected food item.
    pub food_id: FoodId,
    /// Selected quantity. Always > 0 in checkout-bound lines.
    pub quantity: u32,
}

/// One UI-facing cart entry. Zero-quantity entries stay part of this
/// state so a listing screen can render every item with its count.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CartEntry {
    food_id: FoodId,
    name: String,
    price: Decimal,
    quantity: u32,
}

/// Borrowed view of one cart entry for display purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItemView<'a> {
    pub food_id: FoodId,
    pub name: &'a str,
    pub price: Decimal,
    pub quantity: u32,
}

/// The buyer's in-progress selection for one business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    business_id: BusinessId,
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Seed a cart from the business's visible catalog, every item at
    /// quantity zero.
    #[must_use]
    pub fn new(business_id: BusinessId, items: &[FoodItem]) -> Self {
        Self {
            business_id,
            entries: items
                .iter()
                .map(|item| CartEntry {
                    food_id: item.id,
                    name: item.name.clone(),
                    price: item.price,
                    quantity: 0,
                })
                .collect(),
        }
    }

    /// The business this cart belongs to.
    #[must_use]
    pub const fn business_id(&self) -> BusinessId {
        self.business_id
    }

    /// Increase an item's quantity by one.
    ///
    /// Returns the new quantity, or `None` when the item is not part of
    /// this cart's catalog.
    pub fn increment(&mut self, food_id: FoodId) -> Option<u32> {
        let entry = self.entries.iter_mut().find(|e| e.food_id == food_id)?;
        entry.quantity = entry.quantity.saturating_add(1);
        Some(entry.quantity)
    }

    /// Decrease an item's quantity by one, clamped at zero.
    ///
    /// Decrementing an item already at zero is a no-op, not an error.
    /// Returns the new quantity, or `None` when the item is not part of
    /// this cart's catalog.
    pub fn decrement(&mut self, food_id: FoodId) -> Option<u32> {
        let entry = self.entries.iter_mut().find(|e| e.food_id == food_id)?;
        entry.quantity = entry.quantity.saturating_sub(1);
        Some(entry.quantity)
    }

    /// Current quantity for an item, if it is part of this cart.
    #[must_use]
    pub fn quantity(&self, food_id: FoodId) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.food_id == food_id)
            .map(|e| e.quantity)
    }

    /// Total over all entries, recomputed from scratch with fixed-point
    /// decimal arithmetic on every call. Never an incremental counter:
    /// repeated increment/decrement cannot accumulate drift.
    #[must_use]
    pub fn running_total(&self) -> Decimal {
        pricing::order_total(self.entries.iter().map(|e| (e.price, e.quantity)))
    }

    /// Display rows for a listing screen, one per seeded catalog item.
    pub fn items(&self) -> impl Iterator<Item = CartItemView<'_>> {
        self.entries.iter().map(|e| CartItemView {
            food_id: e.food_id,
            name: &e.name,
            price: e.price,
            quantity: e.quantity,
        })
    }

    /// Checkout-bound lines: every entry with quantity above zero.
    ///
    /// Zero-quantity entries remain part of the UI-facing state.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.entries
            .iter()
            .filter(|e| e.quantity > 0)
            .map(|e| CartLine {
                food_id: e.food_id,
                quantity: e.quantity,
            })
            .collect()
    }

    /// Whether no entry has a quantity above zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|e| e.quantity == 0)
    }

    /// Reset every entry to quantity zero. Called after a successful
    /// checkout; the seeded catalog stays in place.
    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            entry.quantity = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("valid decimal literal")
    }

    fn seeded_cart() -> (Cart, FoodId, FoodId) {
        let business_id = BusinessId::generate();
        let a = FoodItem::new(business_id, "Item A", "", dec("10.00"), None);
        let b = FoodItem::new(business_id, "Item B", "", dec("5.00"), None);
        let (a_id, b_id) = (a.id, b.id);
        (Cart::new(business_id, &[a, b]), a_id, b_id)
    }

    #[test]
    fn seeds_every_item_at_zero() {
        let (cart, a, b) = seeded_cart();
        assert_eq!(cart.quantity(a), Some(0));
        assert_eq!(cart.quantity(b), Some(0));
        assert!(cart.is_empty());
        assert_eq!(cart.running_total(), Decimal::ZERO);
    }

    #[test]
    fn running_total_sums_selected_quantities() {
        // Item A (10.00) x2 plus Item B (5.00) x1 totals 25.00.
        let (mut cart, a, b) = seeded_cart();
        cart.increment(a);
        cart.increment(a);
        cart.increment(b);
        assert_eq!(cart.running_total(), dec("25.00"));
    }

    #[test]
    fn decrement_at_zero_is_an_idempotent_floor() {
        let (mut cart, _, b) = seeded_cart();
        assert_eq!(cart.decrement(b), Some(0));
        assert_eq!(cart.decrement(b), Some(0));
        assert_eq!(cart.quantity(b), Some(0));
    }

    #[test]
    fn unknown_item_is_rejected() {
        let (mut cart, _, _) = seeded_cart();
        let stranger = FoodId::generate();
        assert_eq!(cart.increment(stranger), None);
        assert_eq!(cart.decrement(stranger), None);
        assert_eq!(cart.quantity(stranger), None);
    }

    #[test]
    fn lines_filter_zero_quantities_but_state_keeps_them() {
        let (mut cart, a, b) = seeded_cart();
        cart.increment(a);
        let lines = cart.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines.first(),
            Some(&CartLine {
                food_id: a,
                quantity: 1
            })
        );
        // The zero line is still part of the cart state.
        assert_eq!(cart.quantity(b), Some(0));
    }

    #[test]
    fn totals_stay_exact_across_many_mutations() {
        let (mut cart, a, _) = seeded_cart();
        for _ in 0..1000 {
            cart.increment(a);
        }
        for _ in 0..999 {
            cart.decrement(a);
        }
        assert_eq!(cart.running_total(), dec("10.00"));
    }

    #[test]
    fn items_render_names_prices_and_counts() {
        let (mut cart, a, _) = seeded_cart();
        cart.increment(a);
        let rows: Vec<_> = cart.items().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Item A");
        assert_eq!(rows[0].price, dec("10.00"));
        assert_eq!(rows[0].quantity, 1);
        assert_eq!(rows[1].quantity, 0);
    }

    #[test]
    fn clear_resets_quantities_and_keeps_catalog() {
        let (mut cart, a, b) = seeded_cart();
        cart.increment(a);
        cart.increment(b);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.quantity(a), Some(0));
        assert_eq!(cart.quantity(b), Some(0));
    }
}
