//! Pluggable price sources, one per retailer.
//!
//! The fan-out in [`crate::scraper`] only sees [`PriceSource`], so a real
//! HTML scraper or retailer API client can replace any of the mock retailers
//! below without touching cache or merge logic.

use std::ops::Range;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::config::DEFAULT_SOURCE_TIMEOUT;
use crate::error::SourceError;
use crate::models::PriceQuote;

/// A retailer that can be asked for prices.
///
/// Implementations may return zero, one or many quotes. Errors are reported
/// back to the fan-out and logged there; they never abort other sources.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Label used in logs and on every quote this source produces.
    fn supplier(&self) -> &str;

    /// Longest the fan-out waits for [`PriceSource::fetch`] before treating
    /// the call as failed.
    fn timeout(&self) -> Duration {
        DEFAULT_SOURCE_TIMEOUT
    }

    async fn fetch(&self, query: &str) -> Result<Vec<PriceQuote>, SourceError>;
}

/// How a mock retailer reports stock.
#[derive(Debug, Clone, PartialEq)]
pub enum StockProfile {
    /// Always in stock with a quantity drawn from the range.
    Reliable(Range<u32>),
    /// In stock on a coin flip; quantity is reported as zero 30% of the time.
    Patchy(Range<u32>),
}

/// Stand-in for a retailer scraper: sleeps for a simulated network delay,
/// then fabricates one quote in the retailer's price band.
#[derive(Debug, Clone)]
pub struct MockRetailer {
    supplier: String,
    grade: String,
    link: String,
    price_range: Range<f64>,
    latency: Range<Duration>,
    stock: StockProfile,
    timeout: Duration,
}

impl MockRetailer {
    pub fn new(
        supplier: impl Into<String>,
        grade: impl Into<String>,
        link: impl Into<String>,
        price_range: Range<f64>,
        latency: Range<Duration>,
        stock: StockProfile,
    ) -> Self {
        MockRetailer {
            supplier: supplier.into(),
            grade: grade.into(),
            link: link.into(),
            price_range,
            latency,
            stock,
            timeout: DEFAULT_SOURCE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn builders_warehouse() -> Self {
        Self::new(
            "Builders Warehouse",
            "Standard Grade",
            "https://www.builders.co.za",
            80.0..450.0,
            Duration::from_millis(500)..Duration::from_millis(1500),
            StockProfile::Reliable(50..501),
        )
    }

    pub fn cashbuild() -> Self {
        Self::new(
            "Cashbuild",
            "Value Pack",
            "https://www.cashbuild.co.za",
            70.0..420.0,
            Duration::from_millis(300)..Duration::from_millis(1000),
            StockProfile::Reliable(30..301),
        )
    }

    pub fn leroy_merlin() -> Self {
        Self::new(
            "Leroy Merlin",
            "Premium Quality",
            "https://leroymerlin.co.za",
            90.0..500.0,
            Duration::from_millis(400)..Duration::from_millis(1200),
            StockProfile::Patchy(10..201),
        )
    }

    /// The three retailers compared by default, in result order.
    pub fn default_lineup() -> Vec<MockRetailer> {
        vec![
            Self::builders_warehouse(),
            Self::cashbuild(),
            Self::leroy_merlin(),
        ]
    }

    fn simulated_delay(&self) -> Duration {
        if self.latency.is_empty() {
            return self.latency.start;
        }
        rand::thread_rng().gen_range(self.latency.clone())
    }

    fn fabricate(&self, query: &str) -> Result<PriceQuote, SourceError> {
        let mut rng = rand::thread_rng();
        let price = if self.price_range.is_empty() {
            self.price_range.start
        } else {
            rng.gen_range(self.price_range.clone())
        };
        let (in_stock, quantity) = match &self.stock {
            StockProfile::Reliable(range) => (true, sample_quantity(&mut rng, range)),
            StockProfile::Patchy(range) => {
                let in_stock = rng.gen_bool(0.5);
                let quantity = if rng.gen_bool(0.7) {
                    sample_quantity(&mut rng, range)
                } else {
                    0
                };
                (in_stock, quantity)
            }
        };

        PriceQuote::new(
            self.supplier.clone(),
            format!("{} - {}", capitalize(query), self.grade),
            round_cents(price),
            in_stock,
            Some(quantity),
            Some(self.link.clone()),
        )
    }
}

#[async_trait]
impl PriceSource for MockRetailer {
    fn supplier(&self) -> &str {
        &self.supplier
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, query: &str) -> Result<Vec<PriceQuote>, SourceError> {
        tokio::time::sleep(self.simulated_delay()).await;
        Ok(vec![self.fabricate(query)?])
    }
}

fn sample_quantity<R: Rng>(rng: &mut R, range: &Range<u32>) -> u32 {
    if range.is_empty() {
        range.start
    } else {
        rng.gen_range(range.clone())
    }
}

// Rounding can land exactly on zero for sub-cent bands; keep the smallest
// representable positive amount instead.
fn round_cents(price: f64) -> f64 {
    ((price * 100.0).round() / 100.0).max(0.01)
}

/// Uppercases the first character and lowercases the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
