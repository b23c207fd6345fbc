//! Price data access port trait.

use crate::domain::candle::Candle;
use crate::domain::error::ArenaError;

pub trait DataPort {
    /// Daily candles for `token`, in any order.
    fn fetch_candles(&self, token: &str) -> Result<Vec<Candle>, ArenaError>;

    /// Tokens the source has data for.
    fn list_tokens(&self) -> Result<Vec<String>, ArenaError>;

    /// Human-readable location of the data, used in errors.
    fn describe(&self) -> String;
}
