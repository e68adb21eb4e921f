//! Per-operation parameter trees and result reshaping.
//!
//! The service names the primary street line `Address2` and the secondary
//! (suite, apartment) line `Address1`; these functions swap them in both
//! directions so callers only ever see `street1`/`street2`.

use crate::core::envelope::Params;
use crate::core::operation::Operation;
use crate::core::xml_tree::XmlNode;
use crate::domain::model::{Address, CityState, RateRequest, VerifiedAddress, ZipLookupAddress};
use crate::utils::error::{Result, UspsError};

const RATE_PACKAGE_ID: i64 = 0;
const RATE_SIZE: &str = "REGULAR";
const SPECIAL_SERVICE_CODE: i64 = 106;

pub fn verify_params(address: &Address) -> Params {
    let fields = Params::new()
        .with("Address1", address.street2.as_str())
        .with("Address2", address.street1.as_str())
        .with("City", address.city.as_str())
        .with("State", address.state.as_str())
        .with("Zip5", address.zip.as_str())
        .with("Zip4", "");
    Params::new().with("Address", fields)
}

pub fn zip_code_lookup_params(address: &Address) -> Params {
    let fields = Params::new()
        .with("Address1", address.street2.as_str())
        .with("Address2", address.street1.as_str())
        .with("City", address.city.as_str())
        .with("State", address.state.as_str());
    Params::new().with("Address", fields)
}

pub fn city_state_lookup_params(zip: &str) -> Params {
    Params::new().with("ZipCode", Params::new().with("Zip5", zip))
}

/// Pounds is the real quotient of the ounce weight and Ounces repeats the
/// full ounce value; the service expects both fields filled this way.
pub fn rate_params(request: &RateRequest) -> Params {
    let ounces = request.ounces();
    Params::new()
        .with("ID", RATE_PACKAGE_ID)
        .with("Service", request.service())
        .with("ZipOrigination", request.from_zip.as_str())
        .with("ZipDestination", request.to_zip.as_str())
        .with("Pounds", ounces as f64 / 16.0)
        .with("Ounces", ounces)
        .with("Container", "")
        .with("Size", RATE_SIZE)
        .with(
            "SpecialServices",
            Params::new().with("SpecialService", SPECIAL_SERVICE_CODE),
        )
}

fn required(operation: Operation, node: &XmlNode, key: &str) -> Result<String> {
    node.text_at(&[key])
        .map(str::to_string)
        .ok_or_else(|| UspsError::UnexpectedShape {
            operation: operation.api_code(),
            path: operation.result_path().join("."),
            missing: key.to_string(),
        })
}

fn optional(node: &XmlNode, key: &str) -> String {
    node.text_at(&[key]).unwrap_or_default().to_string()
}

pub fn reshape_verified(node: &XmlNode) -> Result<VerifiedAddress> {
    let operation = Operation::Verify;
    Ok(VerifiedAddress {
        street1: required(operation, node, "Address2")?,
        street2: optional(node, "Address1"),
        city: required(operation, node, "City")?,
        state: required(operation, node, "State")?,
        zip: required(operation, node, "Zip5")?,
    })
}

pub fn reshape_zip_lookup(node: &XmlNode) -> Result<ZipLookupAddress> {
    let operation = Operation::ZipCodeLookup;
    let zip5 = required(operation, node, "Zip5")?;
    let zip4 = required(operation, node, "Zip4")?;
    Ok(ZipLookupAddress {
        street1: required(operation, node, "Address2")?,
        street2: optional(node, "Address1"),
        city: required(operation, node, "City")?,
        state: required(operation, node, "State")?,
        zip: format!("{}-{}", zip5, zip4),
    })
}

pub fn reshape_city_state(node: &XmlNode) -> Result<CityState> {
    let operation = Operation::CityStateLookup;
    Ok(CityState {
        city: required(operation, node, "City")?,
        state: required(operation, node, "State")?,
        zip: required(operation, node, "Zip5")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::envelope::ParamValue;
    use crate::core::xml_tree::parse;

    fn address_node(xml: &str, root: &str) -> XmlNode {
        let tree = parse(xml).unwrap();
        tree.get(root)
            .and_then(|response| response.get("Address"))
            .and_then(XmlNode::first)
            .cloned()
            .unwrap()
    }

    fn nested<'a>(params: &'a Params, name: &str) -> &'a Params {
        match params.get(name) {
            Some(ParamValue::Nested(inner)) => inner,
            other => panic!("{} is not nested: {:?}", name, other),
        }
    }

    #[test]
    fn test_verify_params_swap_street_lines() {
        let address = Address::new("6406 Ivy Ln", "Greenbelt", "MD", "20770").with_street2("Apt 2");
        let params = verify_params(&address);
        let fields = nested(&params, "Address");

        assert_eq!(
            fields.names().collect::<Vec<_>>(),
            vec!["Address1", "Address2", "City", "State", "Zip5", "Zip4"]
        );
        assert_eq!(fields.get("Address1"), Some(&ParamValue::from("Apt 2")));
        assert_eq!(fields.get("Address2"), Some(&ParamValue::from("6406 Ivy Ln")));
        assert_eq!(fields.get("Zip4"), Some(&ParamValue::from("")));
    }

    #[test]
    fn test_zip_lookup_params_have_no_zip_fields() {
        let params = zip_code_lookup_params(&Address::new("1 Main St", "Denver", "CO", "80202"));
        let fields = nested(&params, "Address");

        assert_eq!(
            fields.names().collect::<Vec<_>>(),
            vec!["Address1", "Address2", "City", "State"]
        );
        assert_eq!(fields.get("Address1"), Some(&ParamValue::from("")));
    }

    #[test]
    fn test_rate_params_weight_convention() {
        for weight in [0i64, 1, 15, 16, 20, 33, 1600] {
            let params = rate_params(&RateRequest::new("10001", "80202", weight.to_string()));
            assert_eq!(params.get("Pounds"), Some(&ParamValue::Number(weight as f64 / 16.0)));
            assert_eq!(params.get("Ounces"), Some(&ParamValue::Number(weight as f64)));
        }
    }

    #[test]
    fn test_rate_params_defaults_and_order() {
        let params = rate_params(&RateRequest::new("10001", "80202", "heavy"));

        assert_eq!(
            params.names().collect::<Vec<_>>(),
            vec![
                "ID",
                "Service",
                "ZipOrigination",
                "ZipDestination",
                "Pounds",
                "Ounces",
                "Container",
                "Size",
                "SpecialServices"
            ]
        );
        assert_eq!(params.get("Service"), Some(&ParamValue::from("STANDARD POST")));
        assert_eq!(params.get("Ounces"), Some(&ParamValue::Number(0.0)));
        assert_eq!(params.get("Size"), Some(&ParamValue::from("REGULAR")));
        assert_eq!(
            nested(&params, "SpecialServices").get("SpecialService"),
            Some(&ParamValue::Number(106.0))
        );
    }

    #[test]
    fn test_reshape_verified_without_secondary_line() {
        let node = address_node(
            "<AddressValidateResponse><Address ID=\"0\"><Address2>6406 IVY LN</Address2>\
             <City>GREENBELT</City><State>MD</State><Zip5>20770</Zip5><Zip4>1441</Zip4>\
             </Address></AddressValidateResponse>",
            "AddressValidateResponse",
        );

        let verified = reshape_verified(&node).unwrap();
        assert_eq!(
            verified,
            VerifiedAddress {
                street1: "6406 IVY LN".to_string(),
                street2: String::new(),
                city: "GREENBELT".to_string(),
                state: "MD".to_string(),
                zip: "20770".to_string(),
            }
        );
    }

    #[test]
    fn test_reshape_zip_lookup_joins_zip() {
        let node = address_node(
            "<ZipCodeLookupResponse><Address ID=\"0\"><Address1>STE 2</Address1><Address2>6406 IVY LN</Address2>\
             <City>GREENBELT</City><State>MD</State><Zip5>20770</Zip5><Zip4>1441</Zip4>\
             </Address></ZipCodeLookupResponse>",
            "ZipCodeLookupResponse",
        );

        let result = reshape_zip_lookup(&node).unwrap();
        assert_eq!(result.street1, "6406 IVY LN");
        assert_eq!(result.street2, "STE 2");
        assert_eq!(result.zip, "20770-1441");
    }

    #[test]
    fn test_reshape_reports_missing_field() {
        let node = address_node(
            "<ZipCodeLookupResponse><Address><Address2>X</Address2><City>C</City><State>S</State>\
             <Zip5>12345</Zip5></Address></ZipCodeLookupResponse>",
            "ZipCodeLookupResponse",
        );

        let err = reshape_zip_lookup(&node).unwrap_err();
        assert!(matches!(err, UspsError::UnexpectedShape { ref missing, .. } if missing == "Zip4"));
    }
}
