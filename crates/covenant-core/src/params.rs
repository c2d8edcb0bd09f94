//! Protocol parameters

use anyhow::Result;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Fixed economic parameters of the protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolParams {
    /// Extra collateral awarded to a liquidator, as a fraction of the
    /// debt repaid (0.05 = 5% bonus)
    pub liquidation_bonus: Decimal,

    /// Largest share of a loan's outstanding debt one liquidation call
    /// may close (0.5 = half)
    pub max_liquidation_fraction: Decimal,

    /// Smallest collateral-to-principal ratio an offer may demand
    pub min_collateral_ratio: Decimal,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            liquidation_bonus: dec!(0.05),
            max_liquidation_fraction: dec!(0.5),
            min_collateral_ratio: Decimal::ONE,
        }
    }
}

impl ProtocolParams {
    /// Load parameters from the environment, falling back to defaults.
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        let mut params = Self::default();

        if let Ok(val) = std::env::var("COVENANT_LIQUIDATION_BONUS") {
            params.liquidation_bonus = val.parse()?;
        }
        if let Ok(val) = std::env::var("COVENANT_MAX_LIQUIDATION_FRACTION") {
            params.max_liquidation_fraction = val.parse()?;
        }
        if let Ok(val) = std::env::var("COVENANT_MIN_COLLATERAL_RATIO") {
            params.min_collateral_ratio = val.parse()?;
        }

        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.liquidation_bonus >= Decimal::ZERO,
            "liquidation bonus must be non-negative"
        );
        anyhow::ensure!(
            self.max_liquidation_fraction > Decimal::ZERO
                && self.max_liquidation_fraction <= Decimal::ONE,
            "max liquidation fraction must be in (0, 1]"
        );
        anyhow::ensure!(
            self.min_collateral_ratio >= Decimal::ONE,
            "minimum collateral ratio must be at least 1"
        );
        Ok(())
    }
}
