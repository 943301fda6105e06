#![allow(dead_code)]

use catalog_core::{Category, Product};
use rust_decimal::Decimal;

const NAMES: &[&str] = &["Hat", "Pants", "Shirt", "Apple", "Banana", "Pots", "Towels"];

/// Deterministic product builder for tests.
///
/// Names cycle every 7 products, prices every 4, categories every 6 and
/// availability every 3, so batches of 5-10 contain repeated attribute
/// values for the finder tests.
#[derive(Default)]
pub struct ProductFactory {
    sequence: usize,
}

impl ProductFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(&mut self) -> Product {
        let n = self.sequence;
        self.sequence += 1;

        let cents = 500 + 250 * (n % 4) as i64;
        Product::new(
            NAMES[n % NAMES.len()],
            format!("factory product #{n}"),
            Decimal::new(cents, 2),
            n % 3 != 0,
            Category::all()[n % Category::all().len()],
        )
    }

    pub fn build_batch(&mut self, count: usize) -> Vec<Product> {
        (0..count).map(|_| self.build()).collect()
    }
}
