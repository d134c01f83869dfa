//! Sandwich menu entities.
//!
//! A sandwich is a named composition of products. Its weight and cook time
//! are derived from the current member set and are recomputed on every
//! membership change, so the stored totals never go stale.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::product::{Product, Size};

/// A named composition of products with derived totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sandwich {
    /// Unique sandwich identifier.
    pub id: Uuid,
    /// Unique display name.
    pub name: String,
    /// Portion size.
    pub size: Size,
    /// Member products, in menu order.
    pub products: Vec<Product>,
    /// Sum of member product weights, in grams.
    pub weight_total_grams: i32,
    /// Cook time in seconds; the slowest member sets the pace.
    pub cook_time_seconds: i32,
}

/// Input payload for creating or replacing a [`Sandwich`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandwichDraft {
    /// Unique display name.
    pub name: String,
    /// Portion size.
    pub size: Size,
    /// Identifiers of the member products.
    pub product_ids: Vec<Uuid>,
}

impl Sandwich {
    /// Compose a sandwich from resolved member products.
    ///
    /// The derived totals are computed here and nowhere else. An empty member
    /// set yields zero weight and zero cook time rather than retaining any
    /// previous totals.
    ///
    /// # Examples
    /// ```
    /// use kiosk_backend::domain::{Sandwich, Size};
    /// use uuid::Uuid;
    ///
    /// let sandwich = Sandwich::compose(Uuid::new_v4(), "Plain".into(), Size::S, vec![]);
    /// assert_eq!(sandwich.weight_total_grams, 0);
    /// assert_eq!(sandwich.cook_time_seconds, 0);
    /// ```
    pub fn compose(id: Uuid, name: String, size: Size, products: Vec<Product>) -> Self {
        let (weight_total_grams, cook_time_seconds) = derive_totals(&products);
        Self {
            id,
            name,
            size,
            products,
            weight_total_grams,
            cook_time_seconds,
        }
    }
}

/// Compute the derived totals for a member product set.
///
/// Weight is the sum of member weights. Cook time is the maximum member cook
/// time, not the sum: ingredients share the grill, and the slowest one
/// decides when the sandwich is ready.
pub fn derive_totals(products: &[Product]) -> (i32, i32) {
    let weight = products.iter().map(|p| p.weight_grams).sum();
    let cook_time = products
        .iter()
        .filter_map(|p| p.cook_time_seconds)
        .max()
        .unwrap_or(0);
    (weight, cook_time)
}

#[cfg(test)]
mod tests {
    //! Derived-total behaviour for sandwich composition.

    use rstest::rstest;
    use uuid::Uuid;

    use super::*;
    use crate::domain::product::Colour;

    fn product(weight_grams: i32, cook_time_seconds: Option<i32>) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: format!("ingredient-{weight_grams}"),
            size: Size::M,
            weight_grams,
            colour: Colour::Yellow,
            quantity_in_stock: 10,
            cook_time_seconds,
        }
    }

    #[rstest]
    fn totals_sum_weight_and_take_slowest_cook_time() {
        let members = vec![
            product(50, Some(90)),
            product(25, Some(180)),
            product(10, None),
        ];
        let (weight, cook_time) = derive_totals(&members);
        assert_eq!(weight, 85);
        assert_eq!(cook_time, 180);
    }

    #[rstest]
    fn totals_are_zero_for_an_empty_member_set() {
        assert_eq!(derive_totals(&[]), (0, 0));
    }

    #[rstest]
    fn totals_ignore_missing_cook_times() {
        let members = vec![product(30, None), product(40, None)];
        assert_eq!(derive_totals(&members), (70, 0));
    }

    #[rstest]
    fn compose_recomputes_rather_than_trusting_previous_totals() {
        let sandwich = Sandwich::compose(
            Uuid::new_v4(),
            "Croque".to_owned(),
            Size::L,
            vec![product(50, Some(120)), product(20, Some(60))],
        );
        assert_eq!(sandwich.weight_total_grams, 70);
        assert_eq!(sandwich.cook_time_seconds, 120);

        let emptied = Sandwich::compose(sandwich.id, sandwich.name, sandwich.size, vec![]);
        assert_eq!(emptied.weight_total_grams, 0);
        assert_eq!(emptied.cook_time_seconds, 0);
    }
}
