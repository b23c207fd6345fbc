//! Per-token position tracking.

/// Quantities below this after a partial sell are treated as closed.
pub const DUST_QUANTITY: f64 = 0.0001;

/// Long holding in one token. `average_cost` and `peak_price` are only
/// meaningful while `quantity > 0`; a closed position has all three at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub token: String,
    pub quantity: f64,
    pub average_cost: f64,
    pub peak_price: f64,
}

impl Position {
    pub fn new(token: &str) -> Self {
        Position {
            token: token.to_string(),
            quantity: 0.0,
            average_cost: 0.0,
            peak_price: 0.0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.quantity > 0.0
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity * price
    }

    /// Fractional gain of `price` over the average cost.
    pub fn unrealized_return(&self, price: f64) -> f64 {
        (price - self.average_cost) / self.average_cost
    }

    /// Fractional distance of `price` below the peak since entry.
    pub fn return_from_peak(&self, price: f64) -> f64 {
        (price - self.peak_price) / self.peak_price
    }

    pub fn update_peak(&mut self, price: f64) {
        self.peak_price = self.peak_price.max(price);
    }

    /// Add `quantity` bought at `execution_price`; `market_price` seeds the
    /// peak of a fresh position.
    pub fn add(&mut self, quantity: f64, execution_price: f64, market_price: f64) {
        let total = self.quantity + quantity;
        self.average_cost = (self.average_cost * self.quantity + execution_price * quantity) / total;
        self.quantity = total;
        let base = if self.peak_price > 0.0 {
            self.peak_price
        } else {
            market_price
        };
        self.peak_price = base.max(market_price);
    }

    /// Remove `quantity`, closing the position if only dust remains.
    pub fn reduce(&mut self, quantity: f64) {
        self.quantity -= quantity;
        if self.quantity < DUST_QUANTITY {
            self.close();
        }
    }

    pub fn close(&mut self) {
        self.quantity = 0.0;
        self.average_cost = 0.0;
        self.peak_price = 0.0;
    }
}
