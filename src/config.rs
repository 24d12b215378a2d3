// src/config.rs

use crate::core::session::TradingSession;
use crate::core::valuation::PositionValuator;
use crate::errors::ConfigError;
use crate::types::{Position, Side};
use chrono::{NaiveTime, Weekday};
use chrono_tz::Tz;
use config::{Config, Environment, File, FileFormat};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_CURRENCY: &str = "KRW";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct QuoteConfig {
    /// `{symbol}` is replaced with the position's symbol.
    pub url_template: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            url_template:
                "https://polling.finance.naver.com/api/realtime?query=SERVICE_ITEM:{symbol}"
                    .to_string(),
            timeout_secs: 6,
            user_agent: "Mozilla/5.0 (X11; Linux) AppleWebKit/537.36 (KHTML, like Gecko) Chrome"
                .to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScheduleConfig {
    pub interval_secs: u64,
    pub session_enabled: bool,
    pub timezone: String,
    pub open: String,
    pub close: String,
    pub weekdays: Vec<String>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            session_enabled: true,
            timezone: "Asia/Seoul".to_string(),
            open: "09:00".to_string(),
            close: "15:30".to_string(),
            weekdays: ["Mon", "Tue", "Wed", "Thu", "Fri"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }
}

impl ScheduleConfig {
    /// `None` when gating is disabled.
    pub fn session(&self) -> Result<Option<TradingSession>, ConfigError> {
        if !self.session_enabled {
            return Ok(None);
        }

        let tz: Tz = self
            .timezone
            .parse()
            .map_err(|_| {
                ConfigError::InvalidSchedule(format!("unknown time zone '{}'", self.timezone))
            })?;
        let open = parse_clock(&self.open)?;
        let close = parse_clock(&self.close)?;
        if open >= close {
            return Err(ConfigError::InvalidSchedule(format!(
                "open {} must be before close {}",
                self.open, self.close
            )));
        }

        let weekdays = self
            .weekdays
            .iter()
            .map(|d| {
                d.parse::<Weekday>()
                    .map_err(|_| ConfigError::InvalidSchedule(format!("unknown weekday '{}'", d)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if weekdays.is_empty() {
            return Err(ConfigError::InvalidSchedule("no trading weekdays".to_string()));
        }

        Ok(Some(TradingSession::new(tz, weekdays, open, close)))
    }
}

fn parse_clock(value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value.trim(), "%H:%M:%S"))
        .map_err(|_| ConfigError::InvalidSchedule(format!("bad clock time '{}'", value)))
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PublishConfig {
    /// Relative to `repo_dir`.
    pub output_path: PathBuf,
    pub git_enabled: bool,
    pub repo_dir: PathBuf,
    pub commit_prefix: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("web/live.json"),
            git_enabled: true,
            repo_dir: PathBuf::from("."),
            commit_prefix: "chore: update live".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file_prefix: "ls_monitor.log".to_string(),
        }
    }
}

/// A position exactly as written in the config file, before validation.
#[derive(Debug, Deserialize, Clone, Default)]
struct RawPosition {
    symbol: Option<String>,
    name: Option<String>,
    side: Option<String>,
    qty: Option<Decimal>,
    avg_price: Option<Decimal>,
    group: Option<String>,
}

impl RawPosition {
    fn validate(self, index: usize) -> Result<Position, ConfigError> {
        let symbol = self
            .symbol
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let invalid = |reason: &str| ConfigError::InvalidPosition {
            index,
            symbol: symbol.clone().unwrap_or_else(|| "?".to_string()),
            reason: reason.to_string(),
        };

        let Some(symbol) = symbol.clone() else {
            return Err(invalid("missing symbol"));
        };
        let side = match self.side.as_deref() {
            None => Side::Long,
            Some(s) => s.parse::<Side>().map_err(|e| invalid(&e))?,
        };
        let quantity = self.qty.ok_or_else(|| invalid("missing qty"))?;
        if quantity <= Decimal::ZERO {
            return Err(invalid("qty must be positive"));
        }
        let avg_price = self.avg_price.ok_or_else(|| invalid("missing avg_price"))?;
        if avg_price < Decimal::ZERO {
            return Err(invalid("avg_price must not be negative"));
        }
        if avg_price.checked_mul(quantity).is_none() {
            return Err(invalid("notional overflows"));
        }

        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| symbol.clone());
        let group = self
            .group
            .filter(|g| !g.trim().is_empty())
            .unwrap_or_else(|| name.clone());

        Ok(Position {
            symbol,
            name,
            side,
            quantity,
            avg_price,
            group,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default = "default_currency")]
    currency: String,
    #[serde(default)]
    valuation: PositionValuator,
    #[serde(default)]
    quotes: QuoteConfig,
    #[serde(default)]
    schedule: ScheduleConfig,
    #[serde(default)]
    publish: PublishConfig,
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    positions: Vec<RawPosition>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub currency: String,
    pub valuation: PositionValuator,
    pub quotes: QuoteConfig,
    pub schedule: ScheduleConfig,
    pub session: Option<TradingSession>,
    pub publish: PublishConfig,
    pub logging: LoggingConfig,
    pub positions: Vec<Position>,
}

impl AppConfig {
    /// Loads `path` (any format the `config` crate knows, extension optional)
    /// and overlays `MONITOR__*` environment variables.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("MONITOR").separator("__"));

        Self::from_config(builder.build()?)
    }

    pub fn parse(content: &str, format: FileFormat) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from_str(content, format))
            .build()?;
        Self::from_config(config)
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        let raw: RawConfig = config.try_deserialize()?;

        let positions = raw
            .positions
            .into_iter()
            .enumerate()
            .map(|(i, p)| p.validate(i))
            .collect::<Result<Vec<_>, _>>()?;

        let session = raw.schedule.session()?;
        if raw.schedule.interval_secs == 0 {
            return Err(ConfigError::InvalidSchedule(
                "interval_secs must be positive".to_string(),
            ));
        }

        let currency = match raw.currency.trim() {
            "" => default_currency(),
            c => c.to_uppercase(),
        };

        Ok(Self {
            currency,
            valuation: raw.valuation,
            quotes: raw.quotes,
            schedule: raw.schedule,
            session,
            publish: raw.publish,
            logging: raw.logging,
            positions,
        })
    }
}
