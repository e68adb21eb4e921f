/// The Web Tools calls this client knows how to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Verify,
    ZipCodeLookup,
    CityStateLookup,
    RateV4,
}

impl Operation {
    /// Value of the `API` query parameter.
    pub fn api_code(&self) -> &'static str {
        match self {
            Operation::Verify => "Verify",
            Operation::ZipCodeLookup => "ZipCodeLookup",
            Operation::CityStateLookup => "CityStateLookup",
            Operation::RateV4 => "RateV4",
        }
    }

    /// Root element name of the request envelope.
    pub fn request_root(&self) -> &'static str {
        match self {
            Operation::Verify => "AddressValidateRequest",
            Operation::ZipCodeLookup => "ZipCodeLookupRequest",
            Operation::CityStateLookup => "CityStateLookupRequest",
            Operation::RateV4 => "RateV4Request",
        }
    }

    /// Keys leading from the parsed response to the result node.
    pub fn result_path(&self) -> &'static [&'static str] {
        match self {
            Operation::Verify => &["AddressValidateResponse", "Address"],
            Operation::ZipCodeLookup => &["ZipCodeLookupResponse", "Address"],
            Operation::CityStateLookup => &["CityStateLookupResponse", "ZipCode"],
            Operation::RateV4 => &["RateV4Response"],
        }
    }

    pub fn all() -> [Operation; 4] {
        [
            Operation::Verify,
            Operation::ZipCodeLookup,
            Operation::CityStateLookup,
            Operation::RateV4,
        ]
    }
}
