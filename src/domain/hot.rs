use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Time window for trending items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotPeriod {
    Day,
    Week,
    Month,
    Year,
}

impl HotPeriod {
    pub const ALL: [HotPeriod; 4] = [HotPeriod::Day, HotPeriod::Week, HotPeriod::Month, HotPeriod::Year];

    pub fn display_name(self) -> &'static str {
        match self {
            HotPeriod::Day => "Last 24 Hours",
            HotPeriod::Week => "Last Week",
            HotPeriod::Month => "Last Month",
            HotPeriod::Year => "Last Year",
        }
    }

    pub fn value(self) -> &'static str {
        match self {
            HotPeriod::Day => "day",
            HotPeriod::Week => "week",
            HotPeriod::Month => "month",
            HotPeriod::Year => "year",
        }
    }
}

impl fmt::Display for HotPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for HotPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        HotPeriod::ALL
            .into_iter()
            .find(|p| p.value() == s)
            .ok_or_else(|| format!("Invalid period: {}. Use day, week, month or year", s))
    }
}
