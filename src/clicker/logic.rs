//! Mushroom economy logic — the single authority over balance and owned upgrades.

use super::catalog::Catalog;
use super::config::{CLICK_DEBOUNCE_MS, GRAND_PRIZE_COST, REDEEM_CODES};
use super::state::{EconomyState, UpgradeDefinition};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EconomyError {
    #[error("not enough mushrooms: need {price}, have {balance}")]
    InsufficientFunds { price: f64, balance: f64 },
    #[error("unknown upgrade: {0}")]
    UnknownUpgrade(String),
    #[error("purchase quantity must be at least 1")]
    ZeroQuantity,
    #[error("grand prize already unlocked")]
    GrandPrizeAlreadyUnlocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RedeemError {
    #[error("code not recognized")]
    NotRecognized,
}

/// Price of buying `quantity` more units of `upgrade` when `owned` are held.
///
/// Each unit is floored individually, so bulk purchases cost exactly the same
/// as the equivalent sequence of single purchases.
pub fn price_for(upgrade: &UpgradeDefinition, owned: u32, quantity: u32) -> f64 {
    (0..quantity)
        .map(|i| {
            let exponent = owned.saturating_add(i).min(i32::MAX as u32) as i32;
            (upgrade.base_price * upgrade.price_multiplier.powi(exponent)).floor()
        })
        .sum()
}

/// Look up a redeem code, ignoring case and surrounding whitespace.
pub fn lookup_code(code: &str) -> Option<f64> {
    let code = code.trim().to_lowercase();
    REDEEM_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, amount)| *amount)
}

pub struct Economy {
    catalog: Catalog,
    state: EconomyState,
    /// Timestamp (ms) of the last accepted click.
    last_click_ms: Option<f64>,
}

impl Economy {
    /// Resume from a restored state. Negative or non-finite balances are
    /// clamped to zero so the invariant holds from the first call.
    pub fn with_state(catalog: Catalog, mut state: EconomyState) -> Self {
        if !state.balance.is_finite() || state.balance < 0.0 {
            state.balance = 0.0;
        }
        Self {
            catalog,
            state,
            last_click_ms: None,
        }
    }

    pub fn state(&self) -> &EconomyState {
        &self.state
    }

    pub fn upgrades(&self) -> &[UpgradeDefinition] {
        self.catalog.upgrades()
    }

    pub fn balance(&self) -> f64 {
        self.state.balance
    }

    pub fn owned_count(&self, name: &str) -> u32 {
        self.state.owned(name)
    }

    pub fn grand_prize_unlocked(&self) -> bool {
        self.state.grand_prize_unlocked
    }

    /// Price of the next `quantity` units of `name` at the current owned count.
    pub fn current_price(&self, name: &str, quantity: u32) -> Result<f64, EconomyError> {
        let upgrade = self
            .catalog
            .get(name)
            .ok_or_else(|| EconomyError::UnknownUpgrade(name.to_string()))?;
        Ok(price_for(upgrade, self.state.owned(name), quantity))
    }

    pub fn can_afford(&self, name: &str, quantity: u32) -> bool {
        self.current_price(name, quantity)
            .map(|price| self.state.balance >= price)
            .unwrap_or(false)
    }

    /// Buy `quantity` units. All-or-nothing; returns the price paid.
    pub fn purchase(&mut self, name: &str, quantity: u32) -> Result<f64, EconomyError> {
        if quantity == 0 {
            return Err(EconomyError::ZeroQuantity);
        }
        let price = self.current_price(name, quantity)?;
        if self.state.balance < price {
            return Err(EconomyError::InsufficientFunds {
                price,
                balance: self.state.balance,
            });
        }
        self.state.balance -= price;
        let owned = self.state.owned_counts.entry(name.to_string()).or_insert(0);
        *owned = owned.saturating_add(quantity);
        log::debug!("bought {quantity}x {name} for {price} (now {owned})");
        Ok(price)
    }

    /// Mushrooms per second from everything owned.
    pub fn generation_rate(&self) -> f64 {
        self.catalog
            .upgrades()
            .iter()
            .map(|u| self.state.owned(&u.name) as f64 * u.base_generation_rate)
            .sum()
    }

    /// One second of passive income.
    pub fn tick(&mut self) {
        self.state.balance += self.generation_rate();
    }

    /// Manual click at `now_ms`. Returns the new balance, or `None` when the
    /// click falls inside the debounce window of the last accepted click.
    pub fn click(&mut self, now_ms: f64) -> Option<f64> {
        if let Some(last) = self.last_click_ms {
            if now_ms - last < CLICK_DEBOUNCE_MS {
                return None;
            }
        }
        self.last_click_ms = Some(now_ms);
        self.state.balance += 1.0;
        Some(self.state.balance)
    }

    /// Add the bonus for `code`. Repeated valid codes grant again.
    pub fn redeem_code(&mut self, code: &str) -> Result<f64, RedeemError> {
        let amount = lookup_code(code).ok_or(RedeemError::NotRecognized)?;
        self.state.balance += amount;
        log::debug!("redeemed code for {amount}");
        Ok(amount)
    }

    pub fn buy_grand_prize(&mut self) -> Result<(), EconomyError> {
        if self.state.grand_prize_unlocked {
            return Err(EconomyError::GrandPrizeAlreadyUnlocked);
        }
        if self.state.balance < GRAND_PRIZE_COST {
            return Err(EconomyError::InsufficientFunds {
                price: GRAND_PRIZE_COST,
                balance: self.state.balance,
            });
        }
        self.state.balance -= GRAND_PRIZE_COST;
        self.state.grand_prize_unlocked = true;
        Ok(())
    }

    /// Wipe all progress. Confirmation happens at the UI boundary.
    pub fn reset(&mut self) {
        self.state = EconomyState::default();
        self.last_click_ms = None;
        log::info!("economy reset");
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_upgrade() -> impl Strategy<Value = UpgradeDefinition> {
        (1.0f64..1_000_000.0, 0.0f64..1000.0, 1.01f64..2.0).prop_map(|(price, rate, mult)| {
            UpgradeDefinition {
                name: "u".into(),
                description: String::new(),
                base_price: price,
                base_generation_rate: rate,
                price_multiplier: mult,
            }
        })
    }

    fn economy_with(upgrade: UpgradeDefinition, owned: u32, balance: f64) -> Economy {
        let catalog = Catalog::new(vec![upgrade]).unwrap();
        let mut state = EconomyState {
            balance,
            ..EconomyState::default()
        };
        if owned > 0 {
            state.owned_counts.insert("u".into(), owned);
        }
        Economy::with_state(catalog, state)
    }

    proptest! {
        #[test]
        fn prop_price_increases_with_quantity(
            u in arb_upgrade(),
            owned in 0u32..50,
            q in 1u32..50,
        ) {
            prop_assert!(price_for(&u, owned, q + 1) > price_for(&u, owned, q));
        }

        #[test]
        fn prop_price_never_decreases_with_owned(
            u in arb_upgrade(),
            owned in 0u32..50,
            q in 1u32..20,
        ) {
            prop_assert!(price_for(&u, owned + 1, q) >= price_for(&u, owned, q));
        }

        #[test]
        fn prop_bulk_equals_sequential_singles(
            u in arb_upgrade(),
            owned in 0u32..30,
            q in 1u32..20,
        ) {
            let sequential: f64 = (0..q).map(|i| price_for(&u, owned + i, 1)).sum();
            prop_assert!((price_for(&u, owned, q) - sequential).abs() < 1e-6);
        }

        #[test]
        fn prop_purchase_succeeds_iff_affordable(
            u in arb_upgrade(),
            owned in 0u32..30,
            q in 1u32..20,
            balance in 0.0f64..1e9,
        ) {
            let mut e = economy_with(u, owned, balance);
            let price = e.current_price("u", q).unwrap();
            let result = e.purchase("u", q);
            if balance >= price {
                prop_assert_eq!(result, Ok(price));
                prop_assert!((e.balance() - (balance - price)).abs() < 1e-6);
                prop_assert_eq!(e.owned_count("u"), owned + q);
            } else {
                prop_assert!(result.is_err());
                prop_assert_eq!(e.balance(), balance);
                prop_assert_eq!(e.owned_count("u"), owned);
            }
            prop_assert!(e.balance() >= 0.0);
        }

        #[test]
        fn prop_ticks_are_linear(
            u in arb_upgrade(),
            owned in 0u32..100,
            n in 0u32..200,
        ) {
            let mut e = economy_with(u, owned, 0.0);
            let rate = e.generation_rate();
            for _ in 0..n {
                e.tick();
            }
            let expected = n as f64 * rate;
            prop_assert!((e.balance() - expected).abs() <= 1e-6 * expected.max(1.0));
        }

        #[test]
        fn prop_rapid_clicks_count_once(gap in 0.0f64..99.9) {
            let mut e = economy_with(UpgradeDefinition {
                name: "u".into(),
                description: String::new(),
                base_price: 1.0,
                base_generation_rate: 0.0,
                price_multiplier: 1.1,
            }, 0, 0.0);
            e.click(5000.0);
            e.click(5000.0 + gap);
            prop_assert_eq!(e.balance(), 1.0);
        }
    }
}
