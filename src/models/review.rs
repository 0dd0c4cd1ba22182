use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub user_id: String,
    pub photographer_id: String,
    pub name: String,
    pub rating: f64,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Ratings are stored with one decimal place.
pub fn round_to_tenth(rating: f64) -> f64 {
    (rating * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(4.25), 4.3);
        assert_eq!(round_to_tenth(4.24), 4.2);
        assert_eq!(round_to_tenth(5.0), 5.0);
        assert_eq!(round_to_tenth(1.0), 1.0);
    }
}
