//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, Result};
use crate::event::MAX_EVENT_DURATION_MINUTES;

/// Tunables for [`Calendar`](crate::Calendar). Missing fields take their
/// defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalendarConfig {
    /// Longest event the engine accepts, in minutes.
    pub max_event_duration_minutes: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            max_event_duration_minutes: MAX_EVENT_DURATION_MINUTES,
        }
    }
}

impl CalendarConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: CalendarConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_event_duration_minutes == 0 {
            return Err(CalendarError::InvalidConfig(
                "maxEventDurationMinutes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
