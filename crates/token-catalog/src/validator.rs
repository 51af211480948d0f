use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::address;
use crate::error::ValidationError;
use crate::types::{TokenEntry, TokenListDocument};

pub const MAX_LIST_NAME_LEN: usize = 30;
pub const MAX_TOKENS: usize = 10_000;
pub const MAX_SYMBOL_LEN: usize = 20;
pub const MAX_TOKEN_NAME_LEN: usize = 60;

/// Checks raw list bytes and produces a document the policy engine can accept.
pub trait ListValidator {
    fn validate(&self, raw: &[u8]) -> Result<TokenListDocument, ValidationError>;
}

/// Validator for the token-list JSON schema.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    pub max_tokens: usize,

    /// Reject mixed-case addresses whose EIP-55 checksum is wrong.
    pub verify_checksums: bool,
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self {
            max_tokens: MAX_TOKENS,
            verify_checksums: true,
        }
    }
}

impl ListValidator for SchemaValidator {
    fn validate(&self, raw: &[u8]) -> Result<TokenListDocument, ValidationError> {
        let document: TokenListDocument =
            serde_json::from_slice(raw).map_err(|e| ValidationError::Malformed(e.to_string()))?;

        let name_ok = (1..=MAX_LIST_NAME_LEN).contains(&document.name.chars().count())
            && document
                .name
                .chars()
                .all(|c| c.is_alphanumeric() || c == ' ' || c == '_');
        if !name_ok {
            return Err(ValidationError::InvalidName(document.name));
        }

        if OffsetDateTime::parse(&document.timestamp, &Rfc3339).is_err() {
            return Err(ValidationError::InvalidTimestamp(document.timestamp));
        }

        let count = document.tokens.len();
        if count == 0 || count > self.max_tokens {
            return Err(ValidationError::TokenCount {
                count,
                max: self.max_tokens,
            });
        }

        for (index, token) in document.tokens.iter().enumerate() {
            self.check_token(token)
                .map_err(|reason| ValidationError::InvalidToken { index, reason })?;
        }

        Ok(document)
    }
}

impl SchemaValidator {
    fn check_token(&self, token: &TokenEntry) -> Result<(), String> {
        if token.chain_id == 0 {
            return Err("chainId must be positive".to_string());
        }

        let parsed = if self.verify_checksums {
            address::verify_checksum(&token.address)
        } else {
            address::parse_address(&token.address)
        };
        parsed.map_err(|e| e.to_string())?;

        let symbol_len = token.symbol.chars().count();
        if !(1..=MAX_SYMBOL_LEN).contains(&symbol_len) {
            return Err(format!("symbol length {symbol_len} outside 1..={MAX_SYMBOL_LEN}"));
        }
        if !token
            .symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "+-%/$.".contains(c))
        {
            return Err(format!("invalid symbol {:?}", token.symbol));
        }

        let name_len = token.name.chars().count();
        if !(1..=MAX_TOKEN_NAME_LEN).contains(&name_len) {
            return Err(format!("name length {name_len} outside 1..={MAX_TOKEN_NAME_LEN}"));
        }

        if token.logo_uri.as_deref().is_some_and(str::is_empty) {
            return Err("empty logoURI".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Version;

    fn list_json(tokens: &str) -> String {
        format!(
            r#"{{
                "name": "Lachain Default",
                "timestamp": "2021-05-01T12:00:00.000Z",
                "version": {{ "major": 1, "minor": 0, "patch": 0 }},
                "tokens": [{tokens}]
            }}"#
        )
    }

    const UXD: &str = r#"{
        "chainId": 274,
        "address": "0xde09e74d4888bc4e65f589e8c13bce9f71ddf4c7",
        "symbol": "UXD",
        "name": "Criptodolar UXD",
        "decimals": 18
    }"#;

    #[test]
    fn test_valid_list() {
        let doc = SchemaValidator::default()
            .validate(list_json(UXD).as_bytes())
            .unwrap();
        assert_eq!(doc.version, Version::new(1, 0, 0));
        assert_eq!(doc.tokens[0].symbol, "UXD");
    }

    #[test]
    fn test_malformed_json() {
        let result = SchemaValidator::default().validate(b"<html>502</html>");
        assert!(matches!(result, Err(ValidationError::Malformed(_))));

        let missing_version = r#"{ "name": "x", "timestamp": "2021-05-01T12:00:00Z", "tokens": [] }"#;
        let result = SchemaValidator::default().validate(missing_version.as_bytes());
        assert!(matches!(result, Err(ValidationError::Malformed(_))));
    }

    #[test]
    fn test_empty_token_list_rejected() {
        let result = SchemaValidator::default().validate(list_json("").as_bytes());
        assert!(matches!(
            result,
            Err(ValidationError::TokenCount { count: 0, .. })
        ));
    }

    #[test]
    fn test_too_many_tokens_rejected() {
        let validator = SchemaValidator {
            max_tokens: 1,
            ..SchemaValidator::default()
        };
        let tokens = format!("{UXD},{UXD}");
        assert!(matches!(
            validator.validate(list_json(&tokens).as_bytes()),
            Err(ValidationError::TokenCount { count: 2, max: 1 })
        ));
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let json = list_json(UXD).replace("2021-05-01T12:00:00.000Z", "yesterday");
        assert!(matches!(
            SchemaValidator::default().validate(json.as_bytes()),
            Err(ValidationError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_bad_list_name_rejected() {
        let json = list_json(UXD).replace("Lachain Default", "Lachain <script>");
        assert!(matches!(
            SchemaValidator::default().validate(json.as_bytes()),
            Err(ValidationError::InvalidName(_))
        ));
    }

    #[test]
    fn test_bad_token_fields_report_index() {
        let bad_address = UXD.replace("0xde09e74d4888bc4e65f589e8c13bce9f71ddf4c7", "0x1234");
        let tokens = format!("{UXD},{bad_address}");
        match SchemaValidator::default().validate(list_json(&tokens).as_bytes()) {
            Err(ValidationError::InvalidToken { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected InvalidToken, got {other:?}"),
        }

        let zero_chain = UXD.replace("274", "0");
        assert!(matches!(
            SchemaValidator::default().validate(list_json(&zero_chain).as_bytes()),
            Err(ValidationError::InvalidToken { index: 0, .. })
        ));

        let long_symbol = UXD.replace("\"UXD\"", "\"UXDUXDUXDUXDUXDUXDUXD\"");
        assert!(matches!(
            SchemaValidator::default().validate(list_json(&long_symbol).as_bytes()),
            Err(ValidationError::InvalidToken { index: 0, .. })
        ));
    }

    #[test]
    fn test_symbol_character_set() {
        let underscore = UXD.replace("\"UXD\"", "\"UX_D\"");
        assert!(matches!(
            SchemaValidator::default().validate(list_json(&underscore).as_bytes()),
            Err(ValidationError::InvalidToken { index: 0, .. })
        ));

        let punctuation = UXD.replace("\"UXD\"", "\"UXD.e+%/$-1\"");
        assert!(SchemaValidator::default()
            .validate(list_json(&punctuation).as_bytes())
            .is_ok());
    }

    #[test]
    fn test_checksum_verification_toggle() {
        // valid hex, but the mixed case is not an EIP-55 checksum
        let bad_checksum = UXD.replace(
            "0xde09e74d4888bc4e65f589e8c13bce9f71ddf4c7",
            "0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        );
        let json = list_json(&bad_checksum);
        assert!(SchemaValidator::default().validate(json.as_bytes()).is_err());

        let lenient = SchemaValidator {
            verify_checksums: false,
            ..SchemaValidator::default()
        };
        assert!(lenient.validate(json.as_bytes()).is_ok());
    }
}
