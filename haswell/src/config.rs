use std::env;

use log::warn;

use crate::events::HaswellEvent;

/// Environment variable overriding the event names, comma separated, in
/// [`HaswellEvent`] order.
pub const EVENTS_ENV: &str = "MAP_HASWELL_EVENTS";

/// Configure which native events back each [`HaswellEvent`].
///
/// The defaults are the Haswell names. Other micro-architectures expose the
/// same quantities under different names, which is what the override is
/// for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HaswellConfig {
    events: [String; HaswellEvent::COUNT],
}

impl HaswellConfig {
    /// Defaults, overridden by [`EVENTS_ENV`] when it holds exactly one name
    /// per event.
    pub fn from_env() -> Self {
        match env::var(EVENTS_ENV) {
            Ok(list) if !list.trim().is_empty() => Self::default().set_events(&list).unwrap_or_else(|| {
                warn!(
                    "ignoring {}: expected {} comma separated event names, got {:?}",
                    EVENTS_ENV,
                    HaswellEvent::COUNT,
                    list
                );
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// Replace all event names from a comma separated list.
    ///
    /// Returns `None` unless the list names exactly one event per
    /// [`HaswellEvent`].
    pub fn set_events(self, list: &str) -> Option<Self> {
        let names: Vec<String> = list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let events: [String; HaswellEvent::COUNT] = names.try_into().ok()?;
        Some(Self { events })
    }

    /// Replace the name used for a single event.
    pub fn set_event(mut self, event: HaswellEvent, name: impl Into<String>) -> Self {
        self.events[event as usize] = name.into();
        self
    }

    pub fn events(&self) -> &[String; HaswellEvent::COUNT] {
        &self.events
    }
}

impl Default for HaswellConfig {
    fn default() -> Self {
        Self {
            events: HaswellEvent::DEFAULT_NAMES.map(String::from),
        }
    }
}
