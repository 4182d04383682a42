use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Which corner of the service/cost/cash triangle the business is steering
/// toward. Values match the STRATEGY_MODE column in the warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyMode {
    Growth,
    Margin,
    Cash,
}

impl StrategyMode {
    pub const ALL: [StrategyMode; 3] = [StrategyMode::Growth, StrategyMode::Margin, StrategyMode::Cash];

    /// The literal stored in the warehouse.
    pub fn as_sql(&self) -> &'static str {
        match self {
            StrategyMode::Growth => "GROWTH",
            StrategyMode::Margin => "MARGIN",
            StrategyMode::Cash => "CASH",
        }
    }
}

impl std::fmt::Display for StrategyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_sql())
    }
}

impl std::str::FromStr for StrategyMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GROWTH" => Ok(StrategyMode::Growth),
            "MARGIN" => Ok(StrategyMode::Margin),
            "CASH" => Ok(StrategyMode::Cash),
            _ => Err(Error::UnknownStrategyMode(s.to_string())),
        }
    }
}

/// Scenario shock applied on top of a strategy. `None` is the unshocked
/// scenario and is stored as a NULL SHOCK_EVENT in the warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShockEvent {
    None,
    SupplyDisruption,
    PortStrike,
    DemandSurge,
}

impl ShockEvent {
    pub const ALL: [ShockEvent; 4] = [
        ShockEvent::None,
        ShockEvent::SupplyDisruption,
        ShockEvent::PortStrike,
        ShockEvent::DemandSurge,
    ];

    /// The literal stored in the warehouse, or None for the unshocked scenario.
    pub fn as_sql(&self) -> Option<&'static str> {
        match self {
            ShockEvent::None => None,
            ShockEvent::SupplyDisruption => Some("SUPPLY_DISRUPTION"),
            ShockEvent::PortStrike => Some("PORT_STRIKE"),
            ShockEvent::DemandSurge => Some("DEMAND_SURGE"),
        }
    }
}

impl std::fmt::Display for ShockEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_sql().unwrap_or("NONE"))
    }
}

impl std::str::FromStr for ShockEvent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NONE" => Ok(ShockEvent::None),
            "SUPPLY_DISRUPTION" => Ok(ShockEvent::SupplyDisruption),
            "PORT_STRIKE" => Ok(ShockEvent::PortStrike),
            "DEMAND_SURGE" => Ok(ShockEvent::DemandSurge),
            _ => Err(Error::UnknownShockEvent(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_mode_roundtrip() {
        for mode in StrategyMode::ALL {
            let parsed: StrategyMode = mode.to_string().parse().unwrap();
            assert_eq!(parsed, mode);
        }
    }

    #[test]
    fn test_strategy_mode_case_insensitive() {
        let mode: StrategyMode = "growth".parse().unwrap();
        assert_eq!(mode, StrategyMode::Growth);
    }

    #[test]
    fn test_unknown_strategy_mode() {
        let result = "AGGRESSIVE".parse::<StrategyMode>();
        assert!(result.is_err());
    }

    #[test]
    fn test_shock_event_roundtrip() {
        for shock in ShockEvent::ALL {
            let parsed: ShockEvent = shock.to_string().parse().unwrap();
            assert_eq!(parsed, shock);
        }
    }

    #[test]
    fn test_unshocked_has_no_sql_literal() {
        assert_eq!(ShockEvent::None.as_sql(), None);
        assert_eq!(ShockEvent::PortStrike.as_sql(), Some("PORT_STRIKE"));
    }
}
