//! Fixed-menu order problem.
//!
//! Pick how many of each menu item to order so the bill gets as close as
//! possible to a target price without exceeding it, the order is ready
//! quickly, and there is plenty of food. Items are cooked in parallel, so
//! an order's preparation time is that of its slowest item.
//!
//! A genome is a multiset: menu index → count, with no zero counts.

use crate::error::{EvaluationFailure, MoeaError, Result};
use crate::moea::operators::{step_count, swap_counts};
use crate::moea::{FitnessVector, MoeaProblem, Objective, ObjectiveSpec};
use rand::Rng;
use std::collections::BTreeMap;

/// Order genome: menu index → count.
pub type Order = BTreeMap<usize, u32>;

/// One menu entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MenuItem {
    /// Display name.
    pub name: String,
    /// Unit price in dollars.
    pub price: f64,
    /// Preparation time in minutes.
    pub prep_minutes: f64,
}

impl MenuItem {
    /// Creates an item.
    pub fn new(name: impl Into<String>, price: f64, prep_minutes: f64) -> Self {
        Self {
            name: name.into(),
            price,
            prep_minutes,
        }
    }
}

/// Read-only list of menu items addressed by index.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    /// Wraps a list of items.
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    /// The six appetizers of xkcd #287, with made-up preparation times.
    pub fn appetizers() -> Self {
        Self::new(vec![
            MenuItem::new("French Fries", 2.75, 5.0),
            MenuItem::new("Hot Wings", 3.55, 7.0),
            MenuItem::new("Mixed Fruit", 2.15, 2.0),
            MenuItem::new("Mozzarella Sticks", 4.2, 4.0),
            MenuItem::new("Sampler Plate", 5.8, 10.0),
            MenuItem::new("Side Salad", 3.35, 3.0),
        ])
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the menu has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&MenuItem> {
        self.items.get(index)
    }

    /// All items in index order.
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }
}

/// Default number of items drawn for an initial order.
pub const DEFAULT_INITIAL_ITEMS: usize = 2;

/// Order optimization over a [`Menu`].
///
/// # Objectives
///
/// | # | name | direction |
/// |---|------|-----------|
/// | 0 | `price_delta` (price − target) | maximize |
/// | 1 | `prep_time` (slowest item) | minimize |
/// | 2 | `items` (total count) | maximize |
///
/// An order is valid when its total price does not exceed the target.
#[derive(Debug, Clone)]
pub struct OrderProblem {
    menu: Menu,
    spec: ObjectiveSpec,
    target_price: f64,
    initial_items: usize,
    swap_prob: f64,
}

impl OrderProblem {
    /// Creates a problem with the given price cap.
    pub fn new(menu: Menu, target_price: f64) -> Self {
        Self {
            menu,
            spec: ObjectiveSpec::new(vec![
                Objective::maximize("price_delta"),
                Objective::minimize("prep_time"),
                Objective::maximize("items"),
            ]),
            target_price,
            initial_items: DEFAULT_INITIAL_ITEMS,
            swap_prob: 0.5,
        }
    }

    /// Sets how many items (drawn with replacement) an initial order has.
    pub fn with_initial_items(mut self, n: usize) -> Self {
        self.initial_items = n;
        self
    }

    /// Sets the per-item swap probability of crossover.
    pub fn with_swap_prob(mut self, p: f64) -> Self {
        self.swap_prob = p;
        self
    }

    /// The menu orders are drawn from.
    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Price cap a valid order must not exceed.
    pub fn target_price(&self) -> f64 {
        self.target_price
    }

    /// Total bill of an order. Unknown menu indices contribute nothing.
    pub fn total_price(&self, order: &Order) -> f64 {
        order
            .iter()
            .filter_map(|(&i, &n)| self.menu.get(i).map(|item| item.price * f64::from(n)))
            .sum()
    }

    /// Renders an order as `"2 × Mixed Fruit, 1 × Sampler Plate"`.
    pub fn describe(&self, order: &Order) -> String {
        order
            .iter()
            .map(|(&i, &n)| match self.menu.get(i) {
                Some(item) => format!("{n} × {}", item.name),
                None => format!("{n} × #{i}"),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl MoeaProblem for OrderProblem {
    type Genome = Order;

    fn objectives(&self) -> &ObjectiveSpec {
        &self.spec
    }

    fn validate(&self) -> Result<()> {
        if self.menu.is_empty() {
            return Err(MoeaError::EmptyCatalog {
                available: 0,
                required: 1,
            });
        }
        if !self.target_price.is_finite() {
            return Err(MoeaError::Configuration(format!(
                "target price must be finite, got {}",
                self.target_price
            )));
        }
        if !(0.0..=1.0).contains(&self.swap_prob) {
            return Err(MoeaError::Configuration(format!(
                "swap probability must be in [0, 1], got {}",
                self.swap_prob
            )));
        }
        if let Some(item) = self
            .menu
            .items()
            .iter()
            .find(|item| !(item.price.is_finite() && item.price >= 0.0))
        {
            return Err(MoeaError::InvalidRecord {
                item: item.name.clone(),
                reason: format!("invalid price {}", item.price),
            });
        }
        Ok(())
    }

    fn create_genome<R: Rng>(&self, rng: &mut R) -> Order {
        let mut order = Order::new();
        for _ in 0..self.initial_items {
            *order.entry(rng.random_range(0..self.menu.len())).or_insert(0) += 1;
        }
        order
    }

    fn evaluate(&self, order: &Order) -> std::result::Result<FitnessVector, EvaluationFailure> {
        let mut price = 0.0;
        let mut prep = 0.0f64;
        let mut food = 0u64;
        for (&i, &n) in order {
            let item = self.menu.get(i).ok_or(EvaluationFailure::UnknownItem(i))?;
            if n > 0 {
                price += item.price * f64::from(n);
                prep = prep.max(item.prep_minutes);
                food += u64::from(n);
            }
        }
        Ok(FitnessVector::new(vec![
            price - self.target_price,
            prep,
            food as f64,
        ]))
    }

    fn is_feasible(&self, order: &Order) -> bool {
        self.total_price(order) <= self.target_price
    }

    fn crossover<R: Rng>(&self, a: &Order, b: &Order, rng: &mut R) -> (Order, Order) {
        swap_counts(a, b, 0..self.menu.len(), self.swap_prob, rng)
    }

    /// Adds one unit of a random item, or removes one unit of a random
    /// item, with equal probability. Removing an item not in the order
    /// changes nothing.
    fn mutate<R: Rng>(&self, order: &Order, rng: &mut R) -> Order {
        let up = rng.random_bool(0.5);
        let key = rng.random_range(0..self.menu.len());
        step_count(order, key, up)
    }
}
