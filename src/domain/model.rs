use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One comparable parcel listing as delivered by a comparable source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ComparableObservation {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, alias = "acres", alias = "area_acres")]
    pub acre: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl ComparableObservation {
    pub fn new(address: Option<&str>, acre: Option<f64>, price: Option<f64>) -> Self {
        Self {
            address: address.map(str::to_string),
            acre,
            price,
        }
    }

    /// Price per acre, when area, price and their ratio are finite and strictly positive.
    pub fn price_per_acre(&self) -> Option<f64> {
        match (self.acre, self.price) {
            (Some(acre), Some(price))
                if acre.is_finite() && price.is_finite() && acre > 0.0 && price > 0.0 =>
            {
                Some(price / acre).filter(|ratio| ratio.is_finite())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ParcelAddress {
    #[serde(default)]
    pub street_address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zipcode: Option<String>,
}

/// The parcel being priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TargetParcel {
    #[serde(default)]
    pub address: Option<ParcelAddress>,
    #[serde(default)]
    pub market_value: Option<f64>,
    #[serde(default)]
    pub gis_area_acres: Option<f64>,
}

impl TargetParcel {
    pub fn with_area(gis_area_acres: f64) -> Self {
        Self {
            gis_area_acres: Some(gis_area_acres),
            ..Self::default()
        }
    }

    pub fn market_value(mut self, value: f64) -> Self {
        self.market_value = Some(value);
        self
    }

    pub fn address(mut self, address: ParcelAddress) -> Self {
        self.address = Some(address);
        self
    }

    /// GIS area, only when it can scale a per-acre price.
    pub fn usable_area(&self) -> Option<f64> {
        self.gis_area_acres.filter(|a| a.is_finite() && *a > 0.0)
    }

    /// Upper-cased city name used in the narrative.
    pub fn locality_label(&self) -> Option<String> {
        self.address
            .as_ref()
            .and_then(|a| a.city.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_uppercase)
    }

    pub fn pricing_context(&self) -> TargetPricingContext {
        match (self.market_value, self.usable_area()) {
            (Some(value), Some(area))
                if value.is_finite() && value > 0.0 && (value / area).is_finite() =>
            {
                TargetPricingContext::KnownCurrentValue(value / area)
            }
            _ => TargetPricingContext::Unknown,
        }
    }

    /// Stable key for a target, used for in-flight tracking and record file names.
    pub fn key(&self) -> String {
        let parts: Vec<&str> = self
            .address
            .iter()
            .flat_map(|a| {
                [
                    a.street_address.as_deref(),
                    a.city.as_deref(),
                    a.state.as_deref(),
                    a.zipcode.as_deref(),
                ]
            })
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        if parts.is_empty() {
            "unaddressed-parcel".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Whether the target's own value is known well enough to steer cluster selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetPricingContext {
    KnownCurrentValue(f64),
    Unknown,
}

impl TargetPricingContext {
    pub fn current_price_per_acre(&self) -> Option<f64> {
        match self {
            Self::KnownCurrentValue(p) => Some(*p),
            Self::Unknown => None,
        }
    }
}

/// Result of one estimation run. Never mutated after it is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    pub predicted_price: String,
    pub confidence_score: u8,
    pub reasoning: String,
}

/// Lookup parameters handed to a comparable source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparableQuery {
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub acres: f64,
}

/// What the engine persists for a priced property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub key: String,
    pub target: TargetParcel,
    pub predicted_price: String,
    pub confidence_score: String,
    pub price_reasoning: String,
    pub acre_prices: Vec<ComparableObservation>,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValuationOutcome {
    pub estimate: Estimate,
    pub record_path: String,
    pub credits_remaining: u64,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_per_acre_requires_positive_values() {
        assert_eq!(
            ComparableObservation::new(None, Some(10.0), Some(100_000.0)).price_per_acre(),
            Some(10_000.0)
        );
        assert_eq!(ComparableObservation::new(None, None, Some(1.0)).price_per_acre(), None);
        assert_eq!(ComparableObservation::new(None, Some(0.0), Some(1.0)).price_per_acre(), None);
        assert_eq!(ComparableObservation::new(None, Some(5.0), Some(0.0)).price_per_acre(), None);
        assert_eq!(ComparableObservation::new(None, Some(5.0), Some(-3.0)).price_per_acre(), None);
        assert_eq!(
            ComparableObservation::new(None, Some(f64::NAN), Some(3.0)).price_per_acre(),
            None
        );
        // finite inputs whose ratio overflows
        assert_eq!(
            ComparableObservation::new(None, Some(1e-300), Some(1e300)).price_per_acre(),
            None
        );
    }

    #[test]
    fn test_pricing_context() {
        let known = TargetParcel::with_area(10.0).market_value(1_000_000.0);
        assert_eq!(
            known.pricing_context(),
            TargetPricingContext::KnownCurrentValue(100_000.0)
        );

        let no_value = TargetParcel::with_area(10.0);
        assert_eq!(no_value.pricing_context(), TargetPricingContext::Unknown);

        let zero_area = TargetParcel::with_area(0.0).market_value(1_000_000.0);
        assert_eq!(zero_area.pricing_context(), TargetPricingContext::Unknown);

        let tiny_area = TargetParcel::with_area(1e-300).market_value(1e300);
        assert_eq!(tiny_area.pricing_context(), TargetPricingContext::Unknown);
    }

    #[test]
    fn test_locality_and_key() {
        let target = TargetParcel::with_area(3.0).address(ParcelAddress {
            street_address: Some("12 Mill Rd".to_string()),
            city: Some("Bastrop".to_string()),
            state: Some("TX".to_string()),
            zipcode: Some("78602".to_string()),
        });

        assert_eq!(target.locality_label().as_deref(), Some("BASTROP"));
        assert_eq!(target.key(), "12 Mill Rd, Bastrop, TX, 78602");
        assert_eq!(TargetParcel::default().key(), "unaddressed-parcel");
        assert_eq!(TargetParcel::default().locality_label(), None);
    }

    #[test]
    fn test_observation_deserializes_source_shape() {
        let obs: ComparableObservation =
            serde_json::from_str(r#"{"address":"Lot 4","acre":2.5,"price":50000}"#).unwrap();
        assert_eq!(obs.acre, Some(2.5));

        let partial: ComparableObservation = serde_json::from_str(r#"{"address":"Lot 5"}"#).unwrap();
        assert_eq!(partial.price_per_acre(), None);
    }
}
