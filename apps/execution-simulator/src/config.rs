//! Configuration for a simulation run.
//!
//! Every field carries a serde default, so an absent file, a bare
//! section, or no file at all still yields a runnable session.
//! Validation happens once, at construction, before the engine touches
//! anything.
//!
//! # Usage
//!
//! ```rust,ignore
//! use execution_simulator::config::load_config;
//!
//! // Load from the default path (config.yaml), falling back to
//! // built-in defaults when the file does not exist
//! let config = load_config(None)?;
//!
//! // Load from a custom path
//! let config = load_config(Some("session.yaml"))?;
//! ```

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::order_hierarchy::value_objects::OrderSide;
use crate::domain::shared::{Money, Timestamp, VenueId};
use crate::scheduling::{ParticipationCurve, ResidualPolicy};
use crate::venue::{Venue, VenueResponseModel, VenueUniverse};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    Parse(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    Validation(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// The client order the session executes.
    #[serde(default)]
    pub order: OrderConfig,
    /// Trading session layout.
    #[serde(default)]
    pub session: SessionConfig,
    /// Venue universe available to the router.
    #[serde(default = "default_venues")]
    pub venues: Vec<VenueConfig>,
    /// Router behavior.
    #[serde(default)]
    pub routing: RoutingConfig,
    /// Venue response probabilities.
    #[serde(default)]
    pub model: ModelConfig,
    /// Reference price venues fill around.
    #[serde(default = "default_reference_price")]
    pub reference_price: Decimal,
    /// Seed for the run's random source.
    #[serde(default = "default_rng_seed")]
    pub rng_seed: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            order: OrderConfig::default(),
            session: SessionConfig::default(),
            venues: default_venues(),
            routing: RoutingConfig::default(),
            model: ModelConfig::default(),
            reference_price: default_reference_price(),
            rng_seed: default_rng_seed(),
        }
    }
}

fn default_venues() -> Vec<VenueConfig> {
    vec![
        VenueConfig {
            name: "NYSE".to_string(),
            fade_probability: 0.05,
            base_liquidity: 20_000,
        },
        VenueConfig {
            name: "NASDAQ".to_string(),
            fade_probability: 0.10,
            base_liquidity: 18_000,
        },
        VenueConfig {
            name: "ARCA".to_string(),
            fade_probability: 0.15,
            base_liquidity: 12_000,
        },
        VenueConfig {
            name: "DARK".to_string(),
            fade_probability: 0.02,
            base_liquidity: 15_000,
        },
    ]
}
fn default_reference_price() -> Decimal {
    dec!(650.00)
}
const fn default_rng_seed() -> u64 {
    42
}

/// The client order to execute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfig {
    /// Client-assigned order identifier, shared by the whole subtree.
    #[serde(default = "default_client_order_id")]
    pub client_order_id: String,
    /// Instrument ticker.
    #[serde(default = "default_ticker")]
    pub ticker: String,
    /// Order side.
    #[serde(default = "default_side")]
    pub side: OrderSide,
    /// Total quantity to execute, in whole shares.
    #[serde(default = "default_total_quantity")]
    pub total_quantity: u64,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            client_order_id: default_client_order_id(),
            ticker: default_ticker(),
            side: default_side(),
            total_quantity: default_total_quantity(),
        }
    }
}

fn default_client_order_id() -> String {
    "CLIENT_20250106_001".to_string()
}
fn default_ticker() -> String {
    "TSLA".to_string()
}
const fn default_side() -> OrderSide {
    OrderSide::Buy
}
const fn default_total_quantity() -> u64 {
    30_000
}

/// Trading session layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session open, RFC3339.
    #[serde(default = "default_start_time")]
    pub start_time: String,
    /// Length of each schedule period in minutes.
    #[serde(default = "default_period_minutes")]
    pub period_minutes: u32,
    /// Per-period participation fractions, one per period, summing to
    /// roughly one.
    #[serde(default = "default_participation_curve")]
    pub participation_curve: Vec<f64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start_time: default_start_time(),
            period_minutes: default_period_minutes(),
            participation_curve: default_participation_curve(),
        }
    }
}

fn default_start_time() -> String {
    "2025-01-06T08:00:00Z".to_string()
}
const fn default_period_minutes() -> u32 {
    60
}
fn default_participation_curve() -> Vec<f64> {
    ParticipationCurve::UShaped
        .weights(7)
        .into_iter()
        .map(|weight| weight.to_f64().unwrap_or(0.0))
        .collect()
}

/// One venue in the universe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueConfig {
    /// Venue name, also its identifier.
    pub name: String,
    /// Probability the displayed liquidity is gone when an order
    /// arrives.
    #[serde(default = "default_fade_probability")]
    pub fade_probability: f64,
    /// Displayed liquidity in shares, drives selection and allocation.
    #[serde(default = "default_base_liquidity")]
    pub base_liquidity: u64,
}

const fn default_fade_probability() -> f64 {
    0.05
}
const fn default_base_liquidity() -> u64 {
    10_000
}

/// Router behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Additional venue passes allowed after the first.
    #[serde(default = "default_retry_bound")]
    pub retry_bound: u32,
    /// What the schedule does with quantity left behind by earlier
    /// slices.
    #[serde(default)]
    pub residual_policy: ResidualPolicy,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            retry_bound: default_retry_bound(),
            residual_policy: ResidualPolicy::default(),
        }
    }
}

const fn default_retry_bound() -> u32 {
    2
}

/// Venue response probabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Probability a venue fills only part of the routed quantity.
    #[serde(default = "default_partial_probability")]
    pub partial_probability: f64,
    /// Fraction of the routed quantity a partial fill delivers.
    #[serde(default = "default_partial_fill_ratio")]
    pub partial_fill_ratio: f64,
    /// Probability a venue rejects the order or the connection drops,
    /// split evenly between the two.
    #[serde(default = "default_reject_probability")]
    pub reject_probability: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            partial_probability: default_partial_probability(),
            partial_fill_ratio: default_partial_fill_ratio(),
            reject_probability: default_reject_probability(),
        }
    }
}

const fn default_partial_probability() -> f64 {
    0.10
}
const fn default_partial_fill_ratio() -> f64 {
    0.5
}
const fn default_reject_probability() -> f64 {
    0.02
}

impl SimulatorConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] describing the first rule
    /// the configuration breaks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.order.client_order_id.is_empty() {
            return Err(ConfigError::Validation(
                "order.client_order_id must not be empty".to_string(),
            ));
        }

        if self.order.ticker.is_empty() {
            return Err(ConfigError::Validation(
                "order.ticker must not be empty".to_string(),
            ));
        }

        if self.order.total_quantity == 0 {
            return Err(ConfigError::Validation(
                "order.total_quantity must be positive".to_string(),
            ));
        }

        if i64::try_from(self.order.total_quantity).is_err() {
            return Err(ConfigError::Validation(
                "order.total_quantity is too large".to_string(),
            ));
        }

        self.session_start()?;

        if self.session.period_minutes == 0 {
            return Err(ConfigError::Validation(
                "session.period_minutes must be positive".to_string(),
            ));
        }

        let curve = &self.session.participation_curve;
        if curve.is_empty() {
            return Err(ConfigError::Validation(
                "session.participation_curve must have at least one period".to_string(),
            ));
        }

        if curve.iter().any(|weight| !weight.is_finite() || *weight < 0.0) {
            return Err(ConfigError::Validation(
                "session.participation_curve weights must be finite and non-negative".to_string(),
            ));
        }

        let sum: f64 = curve.iter().sum();
        if (sum - 1.0).abs() > 0.01 {
            return Err(ConfigError::Validation(format!(
                "session.participation_curve sums to {sum}, expected 1.0 within 0.01"
            )));
        }

        self.participation_curve()?;

        if self.venues.is_empty() {
            return Err(ConfigError::Validation(
                "venues must not be empty".to_string(),
            ));
        }

        for venue in &self.venues {
            if venue.name.is_empty() {
                return Err(ConfigError::Validation(
                    "venue name must not be empty".to_string(),
                ));
            }

            if venue.base_liquidity == 0 {
                return Err(ConfigError::Validation(format!(
                    "venue {}: base_liquidity must be positive",
                    venue.name
                )));
            }

            if !(0.0..=1.0).contains(&venue.fade_probability) {
                return Err(ConfigError::Validation(format!(
                    "venue {}: fade_probability must be between 0.0 and 1.0",
                    venue.name
                )));
            }
        }

        for (index, venue) in self.venues.iter().enumerate() {
            if self.venues[..index].iter().any(|seen| seen.name == venue.name) {
                return Err(ConfigError::Validation(format!(
                    "venue {} is listed twice",
                    venue.name
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.model.partial_probability) {
            return Err(ConfigError::Validation(
                "model.partial_probability must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.model.partial_fill_ratio <= 0.0 || self.model.partial_fill_ratio > 1.0 {
            return Err(ConfigError::Validation(
                "model.partial_fill_ratio must be greater than 0.0 and at most 1.0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.model.reject_probability) {
            return Err(ConfigError::Validation(
                "model.reject_probability must be between 0.0 and 1.0".to_string(),
            ));
        }

        for venue in &self.venues {
            let mass = venue.fade_probability
                + self.model.partial_probability
                + self.model.reject_probability;
            if mass > 1.0 {
                return Err(ConfigError::Validation(format!(
                    "venue {}: fade + partial + reject probabilities sum to {mass}, exceeding 1.0",
                    venue.name
                )));
            }
        }

        if self.reference_price <= Decimal::ZERO {
            return Err(ConfigError::Validation(
                "reference_price must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Parsed session open timestamp.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `start_time` is not RFC3339.
    pub fn session_start(&self) -> Result<Timestamp, ConfigError> {
        Timestamp::parse(&self.session.start_time).map_err(|error| {
            ConfigError::Validation(format!("session.start_time is not RFC3339: {error}"))
        })
    }

    /// The participation curve with weights as exact decimals.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a weight cannot be represented
    /// as a decimal.
    pub fn participation_curve(&self) -> Result<ParticipationCurve, ConfigError> {
        let weights = self
            .session
            .participation_curve
            .iter()
            .map(|weight| {
                Decimal::try_from(*weight).map_err(|error| {
                    ConfigError::Validation(format!(
                        "session.participation_curve weight {weight} is not a valid decimal: {error}"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ParticipationCurve::custom(weights))
    }

    /// Builds the router's venue universe from the configured venues.
    #[must_use]
    pub fn venue_universe(&self) -> VenueUniverse {
        VenueUniverse::new(
            self.venues
                .iter()
                .map(|venue| {
                    Venue::new(
                        VenueId::new(venue.name.as_str()),
                        venue.base_liquidity,
                        venue.fade_probability,
                    )
                })
                .collect(),
        )
    }

    /// Builds the venue response model from the configured
    /// probabilities and reference price.
    #[must_use]
    pub fn response_model(&self) -> VenueResponseModel {
        VenueResponseModel::new(
            self.model.partial_probability,
            self.model.partial_fill_ratio,
            self.model.reject_probability,
            Money::new(self.reference_price),
        )
    }
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to
///   "config.yaml"; when no path is given and the default file does
///   not exist, built-in defaults are used.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or
/// validated.
pub fn load_config(path: Option<&str>) -> Result<SimulatorConfig, ConfigError> {
    match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_string(),
                source,
            })?;
            load_config_from_string(&contents)
        }
        None => match std::fs::read_to_string("config.yaml") {
            Ok(contents) => load_config_from_string(&contents),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                let config = SimulatorConfig::default();
                config.validate()?;
                Ok(config)
            }
            Err(source) => Err(ConfigError::Read {
                path: "config.yaml".to_string(),
                source,
            }),
        },
    }
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<SimulatorConfig, ConfigError> {
    let config: SimulatorConfig = serde_yaml_bw::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}
