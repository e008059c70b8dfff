use chrono::{DateTime, Duration, Utc};

/// Emitted when consecutive polls disagree about the subject's presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Login {
        at: DateTime<Utc>,
    },
    Logout {
        at: DateTime<Utc>,
        duration: Option<Duration>,
        unknown_start: bool,
    },
}

/// Login/logout detector over successive presence polls.
///
/// A process started mid-session cannot know the true login time: the first
/// observation then marks the open session as having an unknown start, and no
/// synthetic start time is fabricated, so the next logout reports an unknown
/// duration.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    known_online: Option<bool>,
    session_start: Option<DateTime<Utc>>,
    unknown_start: bool,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one successful poll result; returns at most one transition.
    pub fn observe(&mut self, online: bool, now: DateTime<Utc>) -> Option<Transition> {
        let previous = match self.known_online {
            Some(value) => value,
            None => {
                self.known_online = Some(online);
                if online {
                    self.unknown_start = true;
                }
                return None;
            }
        };

        if previous == online {
            return None;
        }
        self.known_online = Some(online);

        if online {
            self.session_start = Some(now);
            self.unknown_start = false;
            Some(Transition::Login { at: now })
        } else {
            Some(Transition::Logout {
                at: now,
                duration: self.session_start.take().map(|start| now - start),
                unknown_start: std::mem::take(&mut self.unknown_start),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .expect("parse")
            .with_timezone(&Utc)
    }

    #[test]
    fn unchanged_presence_emits_nothing() {
        let mut tracker = PresenceTracker::new();
        assert_eq!(tracker.observe(false, at("2026-02-14T10:00:00Z")), None);
        assert_eq!(tracker.observe(false, at("2026-02-14T10:00:03Z")), None);
        assert_eq!(tracker.observe(false, at("2026-02-14T10:00:07Z")), None);
    }

    #[test]
    fn login_then_logout_yields_exact_duration() {
        let mut tracker = PresenceTracker::new();
        assert_eq!(tracker.observe(false, at("2026-02-14T10:00:00Z")), None);
        assert_eq!(tracker.observe(false, at("2026-02-14T10:00:03Z")), None);
        assert_eq!(
            tracker.observe(true, at("2026-02-14T10:00:07Z")),
            Some(Transition::Login {
                at: at("2026-02-14T10:00:07Z")
            })
        );
        assert_eq!(
            tracker.observe(false, at("2026-02-14T10:12:41Z")),
            Some(Transition::Logout {
                at: at("2026-02-14T10:12:41Z"),
                duration: Some(Duration::seconds(754)),
                unknown_start: false,
            })
        );
    }

    #[test]
    fn first_poll_online_flags_unknown_start() {
        let mut tracker = PresenceTracker::new();
        assert_eq!(tracker.observe(true, at("2026-02-14T10:00:00Z")), None);
        assert_eq!(
            tracker.observe(false, at("2026-02-14T10:05:00Z")),
            Some(Transition::Logout {
                at: at("2026-02-14T10:05:00Z"),
                duration: None,
                unknown_start: true,
            })
        );
    }

    #[test]
    fn unknown_start_clears_after_first_logout() {
        let mut tracker = PresenceTracker::new();
        tracker.observe(true, at("2026-02-14T10:00:00Z"));
        tracker.observe(false, at("2026-02-14T10:05:00Z"));

        assert_eq!(
            tracker.observe(true, at("2026-02-14T10:06:00Z")),
            Some(Transition::Login {
                at: at("2026-02-14T10:06:00Z")
            })
        );
        assert_eq!(
            tracker.observe(false, at("2026-02-14T10:07:30Z")),
            Some(Transition::Logout {
                at: at("2026-02-14T10:07:30Z"),
                duration: Some(Duration::seconds(90)),
                unknown_start: false,
            })
        );
    }

    #[test]
    fn transition_emitted_iff_value_changed() {
        let polls = [false, false, true, true, false, true, false, false];
        let mut tracker = PresenceTracker::new();
        let mut previous: Option<bool> = None;
        for (index, online) in polls.into_iter().enumerate() {
            let now = at("2026-02-14T10:00:00Z") + Duration::seconds(index as i64 * 3);
            let transition = tracker.observe(online, now);
            match previous {
                None => assert_eq!(transition, None),
                Some(value) if value == online => assert_eq!(transition, None),
                Some(_) => assert!(transition.is_some()),
            }
            previous = Some(online);
        }
    }
}
