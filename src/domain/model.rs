use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street1: String,
    #[serde(default)]
    pub street2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Address {
    pub fn new(
        street1: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip: impl Into<String>,
    ) -> Self {
        Self {
            street1: street1.into(),
            street2: String::new(),
            city: city.into(),
            state: state.into(),
            zip: zip.into(),
        }
    }

    pub fn with_street2(mut self, street2: impl Into<String>) -> Self {
        self.street2 = street2.into();
        self
    }
}

/// Result of address verification. `zip` is the 5-digit code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedAddress {
    pub street1: String,
    pub street2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Result of a ZIP code lookup. `zip` is formatted `ZIP5-ZIP4`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZipLookupAddress {
    pub street1: String,
    pub street2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityState {
    pub city: String,
    pub state: String,
    pub zip: String,
}

pub const DEFAULT_RATE_SERVICE: &str = "STANDARD POST";

/// Domestic rate (RateV4) query. `weight` is in ounces and parsed leniently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRequest {
    #[serde(default)]
    pub service: Option<String>,
    pub from_zip: String,
    pub to_zip: String,
    pub weight: String,
}

impl RateRequest {
    pub fn new(
        from_zip: impl Into<String>,
        to_zip: impl Into<String>,
        weight: impl Into<String>,
    ) -> Self {
        Self {
            service: None,
            from_zip: from_zip.into(),
            to_zip: to_zip.into(),
            weight: weight.into(),
        }
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    pub fn service(&self) -> &str {
        match self.service.as_deref() {
            Some(service) if !service.is_empty() => service,
            _ => DEFAULT_RATE_SERVICE,
        }
    }

    pub fn ounces(&self) -> i64 {
        parse_ounces(&self.weight)
    }
}

/// Leading-integer parse: optional sign then digits, anything else yields 0.
/// Digit runs beyond the `i64` range saturate.
pub fn parse_ounces(weight: &str) -> i64 {
    let trimmed = weight.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    rest.bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |value, digit| {
            let digit = i64::from(digit - b'0');
            if negative {
                value.saturating_mul(10).saturating_sub(digit)
            } else {
                value.saturating_mul(10).saturating_add(digit)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ounces() {
        assert_eq!(parse_ounces("20"), 20);
        assert_eq!(parse_ounces("  7"), 7);
        assert_eq!(parse_ounces("12oz"), 12);
        assert_eq!(parse_ounces("-3"), -3);
        assert_eq!(parse_ounces("abc"), 0);
        assert_eq!(parse_ounces(""), 0);
        assert_eq!(parse_ounces("3.9"), 3);
    }

    #[test]
    fn test_parse_ounces_saturates_out_of_range() {
        assert_eq!(parse_ounces("99999999999999999999"), i64::MAX);
        assert_eq!(parse_ounces("-99999999999999999999"), i64::MIN);
        assert_eq!(parse_ounces("9223372036854775807"), i64::MAX);
        assert_eq!(parse_ounces("-9223372036854775808"), i64::MIN);
    }

    #[test]
    fn test_rate_request_service_defaults() {
        let request = RateRequest::new("10001", "80202", "16");
        assert_eq!(request.service(), DEFAULT_RATE_SERVICE);

        let empty = request.clone().with_service("");
        assert_eq!(empty.service(), DEFAULT_RATE_SERVICE);

        let priority = request.with_service("PRIORITY");
        assert_eq!(priority.service(), "PRIORITY");
        assert_eq!(priority.ounces(), 16);
    }

    #[test]
    fn test_address_street2_defaults_to_empty() {
        let address: Address = serde_json::from_str(
            r#"{"street1":"1 Main St","city":"Denver","state":"CO","zip":"80202"}"#,
        )
        .unwrap();
        assert_eq!(address.street2, "");
        assert_eq!(address, Address::new("1 Main St", "Denver", "CO", "80202"));
    }
}
