// In crates/strategies/src/ema.rs

use core_types::Symbol;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Exponential moving averages for a fixed set of symbols.
///
/// The key set is fixed at construction and doubles as the set of tracked
/// symbols. A value of zero means no price has been observed yet.
#[derive(Debug, Clone)]
pub struct EmaBook {
    alpha: Decimal,
    values: HashMap<Symbol, Decimal>,
}

impl EmaBook {
    pub fn new(alpha: Decimal, symbols: impl IntoIterator<Item = Symbol>) -> Self {
        Self {
            alpha,
            values: symbols.into_iter().map(|s| (s, Decimal::ZERO)).collect(),
        }
    }

    pub fn is_tracked(&self, symbol: &Symbol) -> bool {
        self.values.contains_key(symbol)
    }

    /// Folds `price` into the average of `symbol` and returns the new value.
    ///
    /// The first observation seeds the average; later ones apply
    /// `alpha * price + (1 - alpha) * ema`. Untracked symbols return `None`.
    pub fn update(&mut self, symbol: &Symbol, price: Decimal) -> Option<Decimal> {
        let ema = self.values.get_mut(symbol)?;
        *ema = if ema.is_zero() {
            price
        } else {
            self.alpha * price + (Decimal::ONE - self.alpha) * *ema
        };
        Some(*ema)
    }

    /// The current average, or `None` if untracked or not yet seeded.
    pub fn get(&self, symbol: &Symbol) -> Option<Decimal> {
        self.values.get(symbol).copied().filter(|v| !v.is_zero())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn book() -> EmaBook {
        EmaBook::new(dec!(0.2), [Symbol::from("PTT"), Symbol::from("AOT")])
    }

    #[test]
    fn first_price_seeds_the_average() {
        let mut emas = book();
        assert_eq!(emas.get(&Symbol::from("PTT")), None);

        assert_eq!(emas.update(&Symbol::from("PTT"), dec!(34.5)), Some(dec!(34.5)));
        assert_eq!(emas.get(&Symbol::from("PTT")), Some(dec!(34.5)));
    }

    #[test]
    fn later_prices_follow_the_recurrence() {
        let mut emas = book();
        let ptt = Symbol::from("PTT");
        emas.update(&ptt, dec!(10));

        assert_eq!(emas.update(&ptt, dec!(12)), Some(dec!(10.4)));
        assert_eq!(emas.update(&ptt, dec!(11)), Some(dec!(10.52)));
    }

    #[test]
    fn symbols_are_averaged_independently() {
        let mut emas = book();
        emas.update(&Symbol::from("PTT"), dec!(10));
        emas.update(&Symbol::from("AOT"), dec!(60));
        emas.update(&Symbol::from("PTT"), dec!(20));

        assert_eq!(emas.get(&Symbol::from("PTT")), Some(dec!(12)));
        assert_eq!(emas.get(&Symbol::from("AOT")), Some(dec!(60)));
    }

    #[test]
    fn untracked_symbols_are_never_added() {
        let mut emas = book();
        let bbl = Symbol::from("BBL");

        assert_eq!(emas.update(&bbl, dec!(150)), None);
        assert!(!emas.is_tracked(&bbl));
        assert_eq!(emas.len(), 2);
    }
}
