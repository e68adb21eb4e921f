//! Navigates a parsed response to an operation's result node and detects the
//! two `<Error>` shapes the service uses.
//!
//! A root-level `Error` (the whole call was rejected) always wins, whatever
//! path was requested. Otherwise the path is walked, and an `Error` inside the
//! reached node reports a rejection scoped to that node.

use crate::core::xml_tree::XmlNode;
use crate::utils::error::{DomainError, ErrorScope, Result, UspsError};

const ERROR_KEY: &str = "Error";
const DESCRIPTION_KEY: &str = "Description";

/// Outcome of reading a message out of an error node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorMessage {
    /// Trimmed `Description` text.
    Described(String),
    /// The error node rendered as-is, for payloads without a `Description`.
    Fallback(String),
}

impl ErrorMessage {
    /// Node-level errors arrive as a sequence, so the description is read
    /// from its first element; the fallback renders the node untouched.
    pub fn from_error_node(error: &XmlNode) -> Self {
        match error
            .first()
            .and_then(|node| node.text_at(&[DESCRIPTION_KEY]))
        {
            Some(description) => ErrorMessage::Described(description.trim().to_string()),
            None => ErrorMessage::Fallback(error.to_json_string()),
        }
    }

    pub fn into_string(self) -> String {
        match self {
            ErrorMessage::Described(message) | ErrorMessage::Fallback(message) => message,
        }
    }
}

fn domain_error(error: &XmlNode, scope: ErrorScope) -> UspsError {
    UspsError::Domain(DomainError {
        message: ErrorMessage::from_error_node(error).into_string(),
        raw: error.clone(),
        scope,
    })
}

/// Split a dotted path such as `"AddressValidateResponse.Address"` into keys.
pub fn split_path(dotted: &str) -> Vec<&str> {
    dotted.split('.').collect()
}

/// Walk `path` from `tree`, taking element 0 of every sequence met on the way.
pub fn extract<'a>(operation: &'static str, tree: &'a XmlNode, path: &[&str]) -> Result<&'a XmlNode> {
    if let Some(error) = tree.get(ERROR_KEY) {
        return Err(domain_error(error, ErrorScope::Root));
    }

    let node = path.iter().try_fold(tree, |node, key| {
        node.get(key)
            .and_then(XmlNode::first)
            .ok_or_else(|| UspsError::UnexpectedShape {
                operation,
                path: path.join("."),
                missing: (*key).to_string(),
            })
    })?;

    if let Some(error) = node.get(ERROR_KEY) {
        return Err(domain_error(error, ErrorScope::Node));
    }

    Ok(node)
}
