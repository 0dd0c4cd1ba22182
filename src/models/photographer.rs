use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photographer {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: String,
    pub is_active: bool,
    pub display_name: String,
    pub location: String,
    pub bio: String,
    pub genres: Vec<String>,
    pub pricing: Pricing,
    pub portfolio: Vec<PortfolioItem>,
    pub profile_pic: String,
    pub status: ProfileStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProfileStatus {
    Pending,
    Approved,
    Blocked,
}

impl ProfileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileStatus::Pending => "pending",
            ProfileStatus::Approved => "approved",
            ProfileStatus::Blocked => "blocked",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ProfileStatus::Pending),
            "approved" => Some(ProfileStatus::Approved),
            "blocked" => Some(ProfileStatus::Blocked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioItem {
    pub url: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Pricing lives in a single JSON column; `from_json` is the validating
/// gate for anything arriving from the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(default = "default_currency")]
    pub currency: String,
    pub base_rate: f64,
    #[serde(default)]
    pub packages: Packages,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Packages {
    #[serde(default)]
    pub basic: PackageOffer,
    #[serde(default)]
    pub premium: PackageOffer,
    #[serde(default)]
    pub deluxe: PackageOffer,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageOffer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
}

fn default_currency() -> String {
    "INR".to_string()
}

impl Pricing {
    pub fn new(base_rate: f64) -> Self {
        Self {
            currency: default_currency(),
            base_rate,
            packages: Packages {
                basic: PackageOffer {
                    price: None,
                    duration: None,
                    services: vec![
                        "Digital delivery".to_string(),
                        "Basic photo editing".to_string(),
                        "Up to 10 high-resolution photos".to_string(),
                        "1 outfit change allowed".to_string(),
                    ],
                },
                premium: PackageOffer {
                    price: None,
                    duration: None,
                    services: vec![
                        "Digital delivery".to_string(),
                        "Advanced photo editing".to_string(),
                        "Up to 25 high-resolution photos".to_string(),
                        "2 outfit changes allowed".to_string(),
                        "Priority delivery".to_string(),
                        "Online gallery with download options".to_string(),
                    ],
                },
                deluxe: PackageOffer {
                    price: None,
                    duration: None,
                    services: vec![
                        "Digital delivery".to_string(),
                        "Professional retouching".to_string(),
                        "Up to 50 high-resolution photos".to_string(),
                        "Unlimited outfit changes".to_string(),
                        "Printed album included".to_string(),
                        "VIP online gallery access".to_string(),
                    ],
                },
            },
        }
    }

    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        let pricing: Pricing = serde_json::from_str(s)?;
        pricing.validate()?;
        Ok(pricing)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.currency.trim().is_empty() {
            return Err(anyhow::anyhow!("currency must not be empty"));
        }
        if !self.base_rate.is_finite() || self.base_rate < 0.0 {
            return Err(anyhow::anyhow!("base_rate must be a non-negative number"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_minimal() {
        let pricing = Pricing::from_json(r#"{"base_rate": 4000}"#).unwrap();
        assert_eq!(pricing.currency, "INR");
        assert_eq!(pricing.base_rate, 4000.0);
        assert!(pricing.packages.basic.services.is_empty());
    }

    #[test]
    fn test_from_json_full() {
        let json = r#"{
            "currency": "USD",
            "base_rate": 150,
            "packages": {
                "basic": {"price": 100, "duration": "1h", "services": ["Digital delivery"]},
                "deluxe": {"price": 400}
            }
        }"#;
        let pricing = Pricing::from_json(json).unwrap();
        assert_eq!(pricing.currency, "USD");
        assert_eq!(pricing.packages.basic.price, Some(100.0));
        assert_eq!(pricing.packages.deluxe.price, Some(400.0));
        assert!(pricing.packages.premium.price.is_none());
    }

    #[test]
    fn test_from_json_rejects_negative_rate() {
        assert!(Pricing::from_json(r#"{"base_rate": -1}"#).is_err());
    }

    #[test]
    fn test_from_json_rejects_empty_currency() {
        assert!(Pricing::from_json(r#"{"currency": " ", "base_rate": 10}"#).is_err());
    }

    #[test]
    fn test_new_fills_default_packages() {
        let pricing = Pricing::new(5000.0);
        assert_eq!(pricing.packages.basic.services.len(), 4);
        assert_eq!(pricing.packages.premium.services.len(), 6);
        assert_eq!(pricing.packages.deluxe.services.len(), 6);
    }
}
