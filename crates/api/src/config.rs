//! Application configuration loaded from environment variables.

use domain::TaxRate;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `TAX_RATE_BPS`: order tax rate in basis points (default: `1500`, i.e. 15%)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub tax_rate_bps: u32,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    ///
    /// Unparseable numeric values fall back to their defaults as well.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            tax_rate_bps: std::env::var("TAX_RATE_BPS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.tax_rate_bps),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the configured order tax rate.
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_basis_points(self.tax_rate_bps)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            tax_rate_bps: TaxRate::STANDARD.basis_points(),
        }
    }
}
