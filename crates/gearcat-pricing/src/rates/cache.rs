use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use gearcat_core::Currency;
use rust_decimal::Decimal;
use tokio::sync::OnceCell;

use super::RateProvider;
use crate::error::RateSourceError;

type PairCells = HashMap<(Currency, Currency), Arc<OnceCell<Decimal>>>;

/// Memoizes rates from an inner provider, one fetch per currency pair.
///
/// Concurrent callers asking for the same pair share a single in-flight
/// lookup. A failed lookup leaves the pair empty so the next caller tries
/// again. Rates are never expired; build a fresh cache per batch.
pub struct CachedRateProvider<P> {
    inner: P,
    cells: Mutex<PairCells>,
}

impl<P: RateProvider> CachedRateProvider<P> {
    #[must_use]
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cells: Mutex::new(HashMap::new()),
        }
    }

    /// Number of currency pairs with a cached rate.
    #[must_use]
    pub fn cached_pairs(&self) -> usize {
        self.cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    fn cell_for(&self, from: &Currency, to: &Currency) -> Arc<OnceCell<Decimal>> {
        let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cells.entry((from.clone(), to.clone())).or_default())
    }
}

impl<P: RateProvider> RateProvider for CachedRateProvider<P> {
    async fn rate(&self, from: &Currency, to: &Currency) -> Result<Decimal, RateSourceError> {
        let cell = self.cell_for(from, to);
        let rate = cell
            .get_or_try_init(|| async {
                let rate = self.inner.rate(from, to).await?;
                tracing::debug!(%from, %to, %rate, "cached conversion rate");
                Ok::<_, RateSourceError>(rate)
            })
            .await?;
        Ok(*rate)
    }
}
