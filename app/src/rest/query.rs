/// Lookback window for history-style endpoints, bounded to [1, 720] hours.
#[derive(Debug, serde::Deserialize)]
pub struct HoursQuery {
    hours: Option<i64>,
}

impl HoursQuery {
    pub fn hours(&self) -> i64 {
        self.hours.unwrap_or(24)
    }

    pub fn is_valid(&self) -> bool {
        (1..=720).contains(&self.hours())
    }
}

/// Prediction look-ahead, bounded to [1, 24] hours.
#[derive(Debug, serde::Deserialize)]
pub struct HorizonQuery {
    hours_ahead: Option<i64>,
}

impl HorizonQuery {
    pub fn hours_ahead(&self) -> i64 {
        self.hours_ahead.unwrap_or(6)
    }

    pub fn is_valid(&self) -> bool {
        (1..=24).contains(&self.hours_ahead())
    }
}

/// Frame listing cap, bounded to [1, 1000].
#[derive(Debug, serde::Deserialize)]
pub struct LimitQuery {
    limit: Option<i64>,
}

impl LimitQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(100)
    }

    pub fn is_valid(&self) -> bool {
        (1..=1000).contains(&self.limit())
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct LikeQuery {
    message: Option<String>,
}

impl LikeQuery {
    /// Empty messages are stored as absent.
    pub fn message(&self) -> Option<String> {
        self.message.clone().filter(|m| !m.is_empty())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hours_defaults_to_a_day() {
        let query = HoursQuery { hours: None };
        assert_eq!(query.hours(), 24);
        assert!(query.is_valid());
    }

    #[test]
    fn hours_bounds_are_enforced() {
        assert!(!HoursQuery { hours: Some(0) }.is_valid());
        assert!(!HoursQuery { hours: Some(1000) }.is_valid());
        assert!(!HoursQuery { hours: Some(-5) }.is_valid());
        assert!(HoursQuery { hours: Some(1) }.is_valid());
        assert!(HoursQuery { hours: Some(720) }.is_valid());
    }

    #[test]
    fn horizon_bounds_are_enforced() {
        let query = HorizonQuery { hours_ahead: None };
        assert_eq!(query.hours_ahead(), 6);
        assert!(query.is_valid());

        assert!(!HorizonQuery {
            hours_ahead: Some(0)
        }
        .is_valid());
        assert!(!HorizonQuery {
            hours_ahead: Some(25)
        }
        .is_valid());
        assert!(HorizonQuery {
            hours_ahead: Some(24)
        }
        .is_valid());
    }

    #[test]
    fn limit_bounds_are_enforced() {
        let query = LimitQuery { limit: None };
        assert_eq!(query.limit(), 100);
        assert!(query.is_valid());

        assert!(!LimitQuery { limit: Some(0) }.is_valid());
        assert!(!LimitQuery { limit: Some(1001) }.is_valid());
    }

    #[test]
    fn empty_like_message_becomes_none() {
        let query = LikeQuery {
            message: Some("".to_owned()),
        };
        assert_eq!(query.message(), None);

        let query = LikeQuery {
            message: Some("hi".to_owned()),
        };
        assert_eq!(query.message(), Some("hi".to_owned()));

        let query = LikeQuery { message: None };
        assert_eq!(query.message(), None);
    }
}
