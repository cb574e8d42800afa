//! Benchmark utilities.
//!
//! Orders are generated from a fixed seed over small vocabularies, so
//! every run indexes the same data and filters hit a predictable share
//! of it.

use pathdex_core::{CoreResult, EntityKey, IndexConfig, Indexable, PageIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Seed used by [`populated_index`].
pub const SEED: u64 = 0x5eed;

/// Region vocabulary.
pub static REGIONS: [&str; 6] = ["north", "south", "east", "west", "central", "remote"];

/// Status vocabulary.
pub static STATUSES: [&str; 4] = ["open", "paid", "shipped", "returned"];

/// Product vocabulary.
pub static SKUS: [&str; 12] = [
    "sku-01", "sku-02", "sku-03", "sku-04", "sku-05", "sku-06", "sku-07", "sku-08", "sku-09",
    "sku-10", "sku-11", "sku-12",
];

/// One line of an order.
#[derive(Debug, Clone, Serialize)]
pub struct LineItem {
    /// Product code.
    pub sku: String,
    /// Units ordered, 1 to 5.
    pub quantity: u32,
}

/// A benchmark entity with scalar, list and nested fields.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Identity.
    pub id: u64,
    /// One of [`REGIONS`].
    pub region: String,
    /// One of [`STATUSES`].
    pub status: String,
    /// Set on about a tenth of orders.
    pub priority: bool,
    /// Up to three regions the order passed through.
    pub route: Vec<String>,
    /// One to four lines.
    pub lines: Vec<LineItem>,
}

impl Indexable for Order {
    fn entity_key(&self) -> EntityKey {
        self.id.into()
    }
}

fn pick(rng: &mut StdRng, words: &[&str]) -> String {
    words[rng.gen_range(0..words.len())].to_string()
}

/// Generates `count` orders with ids `0..count`.
pub fn generate_orders(count: usize, seed: u64) -> Vec<Order> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count as u64)
        .map(|id| {
            let route = (0..rng.gen_range(0..=3)).map(|_| pick(&mut rng, &REGIONS)).collect();
            let lines = (0..rng.gen_range(1..=4))
                .map(|_| LineItem {
                    sku: pick(&mut rng, &SKUS),
                    quantity: rng.gen_range(1..=5),
                })
                .collect();
            Order {
                id,
                region: pick(&mut rng, &REGIONS),
                status: pick(&mut rng, &STATUSES),
                priority: rng.gen_bool(0.1),
                route,
                lines,
            }
        })
        .collect()
}

/// Builds an index over `count` generated orders.
///
/// # Errors
///
/// Returns the first indexing error.
pub fn populated_index(count: usize, config: IndexConfig) -> CoreResult<PageIndex<Order>> {
    let mut index = PageIndex::with_config(config);
    index.index_all(generate_orders(count, SEED))?;
    Ok(index)
}
