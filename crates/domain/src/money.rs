//! Money and tax value objects.

use serde::{Deserialize, Serialize};

/// Money amount represented in cents to avoid floating point issues.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money {
    /// Amount in cents (e.g., 1000 = $10.00)
    cents: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the dollar portion (whole number).
    pub fn dollars(&self) -> i64 {
        self.cents / 100
    }

    /// Returns the cents portion (remainder after dollars).
    pub fn cents_part(&self) -> i64 {
        self.cents.abs() % 100
    }

    /// Returns true if the amount is positive.
    pub fn is_positive(&self) -> bool {
        self.cents > 0
    }

    /// Multiplies by a quantity, saturating at the bounds of `i64`.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money {
            cents: self.cents.saturating_mul(i64::from(quantity)),
        }
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    pub fn checked_multiply(&self, quantity: u32) -> Option<Money> {
        self.cents
            .checked_mul(i64::from(quantity))
            .map(Money::from_cents)
    }

    /// Adds two amounts, returning `None` on overflow.
    pub fn checked_add(&self, rhs: Money) -> Option<Money> {
        self.cents.checked_add(rhs.cents).map(Money::from_cents)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.cents < 0 {
            write!(f, "-${}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            write!(f, "${}.{:02}", self.dollars(), self.cents_part())
        }
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents.saturating_add(rhs.cents),
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.cents = self.cents.saturating_add(rhs.cents);
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// A fixed sales tax rate, in basis points (1500 = 15%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate {
    basis_points: u32,
}

impl TaxRate {
    /// The standard 15% rate applied to orders.
    pub const STANDARD: TaxRate = TaxRate {
        basis_points: 1500,
    };

    /// Creates a tax rate from basis points.
    pub fn from_basis_points(basis_points: u32) -> Self {
        Self { basis_points }
    }

    /// Returns the rate in basis points.
    pub fn basis_points(&self) -> u32 {
        self.basis_points
    }

    /// Returns the rate as a fraction (0.15 for 15%).
    pub fn as_fraction(&self) -> f64 {
        f64::from(self.basis_points) / 10_000.0
    }

    /// Returns the tax owed on `amount`, rounded half away from zero to the cent.
    ///
    /// Saturates at the bounds of `i64`.
    pub fn tax_on(&self, amount: Money) -> Money {
        self.checked_tax_on(amount).unwrap_or(if amount.cents() < 0 {
            Money::from_cents(i64::MIN)
        } else {
            Money::from_cents(i64::MAX)
        })
    }

    /// Returns the tax owed on `amount`, or `None` if it does not fit in cents.
    pub fn checked_tax_on(&self, amount: Money) -> Option<Money> {
        let raw = i128::from(amount.cents()) * i128::from(self.basis_points);
        let rounded = if raw >= 0 {
            (raw + 5_000) / 10_000
        } else {
            (raw - 5_000) / 10_000
        };
        i64::try_from(rounded).ok().map(Money::from_cents)
    }

    /// Returns `amount` with tax added, saturating at the bounds of `i64`.
    pub fn apply(&self, amount: Money) -> Money {
        amount + self.tax_on(amount)
    }

    /// Returns `amount` with tax added, or `None` on overflow.
    pub fn checked_apply(&self, amount: Money) -> Option<Money> {
        amount.checked_add(self.checked_tax_on(amount)?)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl std::fmt::Display for TaxRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{:02}%",
            self.basis_points / 100,
            self.basis_points % 100
        )
    }
}
