//! Visit event model for asynchronous visit capture.

use chrono::{DateTime, Utc};

use crate::domain::entities::NewVisit;
use crate::utils::user_agent::UserAgentLabels;

/// An in-memory representation of a visit waiting to be recorded.
///
/// Built by the redirect handler from request metadata and handed to the
/// visit worker through a bounded channel, so the redirect response never
/// waits on the analytics writes.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitEvent {
    pub url_id: i64,
    pub browser: String,
    pub device_type: String,
    pub referrer: String,
    pub ip_address: String,
    pub visited_at: DateTime<Utc>,
}

impl VisitEvent {
    /// Creates a visit event from raw request metadata, timestamped now.
    ///
    /// Missing headers produce empty strings; the user agent is classified into
    /// a browser family and a device type.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = VisitEvent::new(
    ///     42,
    ///     Some("Mozilla/5.0 (Windows NT 10.0) Chrome/120.0"),
    ///     Some("https://google.com"),
    ///     Some("192.168.1.1".to_string()),
    /// );
    /// assert_eq!(event.browser, "Chrome");
    /// ```
    pub fn new(
        url_id: i64,
        user_agent: Option<&str>,
        referrer: Option<&str>,
        ip_address: Option<String>,
    ) -> Self {
        let labels = UserAgentLabels::parse(user_agent.unwrap_or_default());

        Self {
            url_id,
            browser: labels.browser.to_string(),
            device_type: labels.device_type.to_string(),
            referrer: referrer.unwrap_or_default().to_string(),
            ip_address: ip_address.unwrap_or_default(),
            visited_at: Utc::now(),
        }
    }
}

impl From<VisitEvent> for NewVisit {
    fn from(ev: VisitEvent) -> Self {
        NewVisit {
            url_id: ev.url_id,
            browser: ev.browser,
            device_type: ev.device_type,
            referrer: ev.referrer,
            ip_address: ev.ip_address,
            visited_at: ev.visited_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_event_creation_full() {
        let event = VisitEvent::new(
            42,
            Some("Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0"),
            Some("https://google.com"),
            Some("192.168.1.1".to_string()),
        );

        assert_eq!(event.url_id, 42);
        assert_eq!(event.browser, "Firefox");
        assert_eq!(event.device_type, "Windows");
        assert_eq!(event.referrer, "https://google.com");
        assert_eq!(event.ip_address, "192.168.1.1");
    }

    #[test]
    fn test_visit_event_creation_minimal() {
        let event = VisitEvent::new(7, None, None, None);

        assert_eq!(event.url_id, 7);
        assert_eq!(event.browser, "Other");
        assert_eq!(event.device_type, "Unknown");
        assert!(event.referrer.is_empty());
        assert!(event.ip_address.is_empty());
    }

    #[test]
    fn test_into_new_visit_keeps_fields() {
        let event = VisitEvent::new(3, Some("curl/8.0"), None, Some("10.0.0.1".to_string()));
        let visited_at = event.visited_at;

        let visit: NewVisit = event.into();

        assert_eq!(visit.url_id, 3);
        assert_eq!(visit.ip_address, "10.0.0.1");
        assert_eq!(visit.visited_at, visited_at);
    }
}
