//! Aggregate economy counters mutated by building effect rules.

use ascii_city_core::EconomySnapshot;

/// Mutable economy owned exclusively by the world.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Economy {
    cash: f64,
    population: u32,
    pollution: u32,
    production_boost: f64,
    abandonment_pressure: u32,
    cash_delta: f64,
    pollution_delta: u32,
}

impl Economy {
    /// Creates an economy with the provided treasury and residents.
    pub(crate) fn new(cash: f64, population: u32) -> Self {
        Self {
            cash,
            population,
            pollution: 0,
            production_boost: 0.0,
            abandonment_pressure: 0,
            cash_delta: 0.0,
            pollution_delta: 0,
        }
    }

    /// Clears the per-step accumulators before effect rules run.
    pub(crate) fn begin_step(&mut self) {
        self.cash_delta = 0.0;
        self.pollution_delta = 0;
    }

    /// Credits `base` scaled by the current production boost.
    pub(crate) fn earn(&mut self, base: f64) {
        let amount = base * (1.0 + self.production_boost);
        self.cash += amount;
        self.cash_delta += amount;
    }

    pub(crate) fn pollute(&mut self, amount: u32) {
        self.pollution = self.pollution.saturating_add(amount);
        self.pollution_delta = self.pollution_delta.saturating_add(amount);
    }

    /// Raises the production boost and returns the new aggregate.
    pub(crate) fn boost(&mut self, amount: f64) -> f64 {
        self.production_boost += amount;
        self.production_boost
    }

    pub(crate) fn pollution(&self) -> u32 {
        self.pollution
    }

    pub(crate) fn population(&self) -> u32 {
        self.population
    }

    pub(crate) fn abandonment_pressure(&self) -> u32 {
        self.abandonment_pressure
    }

    /// Removes residents after an abandonment and returns how many left.
    ///
    /// Population never drops below zero and every call raises the pressure
    /// counter by one.
    pub(crate) fn abandon(&mut self, residents: u32) -> u32 {
        let removed = residents.min(self.population);
        self.population -= removed;
        self.abandonment_pressure = self.abandonment_pressure.saturating_add(1);
        removed
    }

    /// Deducts `price` when the treasury covers it.
    pub(crate) fn try_spend(&mut self, price: u32) -> bool {
        let price = f64::from(price);
        if self.cash < price {
            return false;
        }
        self.cash -= price;
        true
    }

    pub(crate) fn snapshot(&self) -> EconomySnapshot {
        EconomySnapshot {
            cash: self.cash,
            population: self.population,
            pollution: self.pollution,
            production_boost: self.production_boost,
            abandonment_pressure: self.abandonment_pressure,
            cash_delta: self.cash_delta,
            pollution_delta: self.pollution_delta,
        }
    }
}
