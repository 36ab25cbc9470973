//! Token claims.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claim names that callers can never set through additional claims.
pub const RESERVED_CLAIMS: [&str; 7] = ["sub", "iss", "aud", "iat", "exp", "nbf", "jti"];

/// Open, string-keyed claim map used for caller-supplied claims.
pub type ClaimMap = Map<String, Value>;

/// The `aud` claim: a single audience or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    /// Whether `audience` is (one of) the token's audiences.
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::One(a) => a == audience,
            Audience::Many(list) => list.iter().any(|a| a == audience),
        }
    }
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Audience::One(a) => f.write_str(a),
            Audience::Many(list) => f.write_str(&list.join(",")),
        }
    }
}

/// Claims carried by a rolegate token.
///
/// Standard JWT names are used on the wire. Anything that is neither a
/// reserved nor a domain claim is kept in `extra` and flattened into the
/// payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (principal the token was minted for).
    pub sub: String,
    /// Issuer.
    pub iss: String,
    /// Audience.
    pub aud: Audience,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch. Absent means no expiry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Unique token id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Job role the principal acts under. Empty when the token carries none,
    /// which policy treats like any other unrecognised role.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,
    /// Principal id within the organisation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name of the principal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Additional claims.
    #[serde(flatten)]
    pub extra: ClaimMap,
}

impl Claims {
    /// Look up a claim by wire name, typed or extra.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "sub" => Some(Value::from(self.sub.clone())),
            "iss" => Some(Value::from(self.iss.clone())),
            "aud" => serde_json::to_value(&self.aud).ok(),
            "iat" => Some(Value::from(self.iat)),
            "exp" => self.exp.map(Value::from),
            "jti" => self.jti.clone().map(Value::from),
            "role" if !self.role.is_empty() => Some(Value::from(self.role.clone())),
            "id" => self.id.clone().map(Value::from),
            "name" => self.name.clone().map(Value::from),
            other => self.extra.get(other).cloned(),
        }
    }

    /// Name for display, falling back to the subject.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.sub)
    }
}

/// Render a claim value as a plain string (strings unquoted).
pub(crate) fn claim_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Claims {
        Claims {
            sub: "alice".into(),
            iss: "https://dev-issuer.com".into(),
            aud: Audience::One("rolegate:crm".into()),
            iat: 1_700_000_000,
            exp: Some(1_700_003_600),
            jti: None,
            role: "Manager".into(),
            id: Some("123".into()),
            name: Some("Alice".into()),
            extra: ClaimMap::new(),
        }
    }

    #[test]
    fn test_wire_shape_uses_jwt_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["sub"], "alice");
        assert_eq!(value["aud"], "rolegate:crm");
        assert_eq!(value["role"], "Manager");
        assert!(value.get("jti").is_none());
    }

    #[test]
    fn test_extra_claims_are_flattened() {
        let mut claims = sample();
        claims.extra.insert("department".into(), json!("Sales"));

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["department"], "Sales");

        let back: Claims = serde_json::from_value(value).unwrap();
        assert_eq!(back.extra.get("department"), Some(&json!("Sales")));
        assert_eq!(back, claims);
    }

    #[test]
    fn test_missing_role_defaults_to_empty() {
        let claims: Claims = serde_json::from_value(json!({
            "sub": "bob", "iss": "i", "aud": "a", "iat": 1
        }))
        .unwrap();
        assert!(claims.role.is_empty());
        assert!(claims.get("role").is_none());
    }

    #[test]
    fn test_audience_list() {
        let claims: Claims = serde_json::from_value(json!({
            "sub": "bob", "iss": "i", "aud": ["hr", "crm"], "iat": 1
        }))
        .unwrap();
        assert!(claims.aud.contains("crm"));
        assert!(!claims.aud.contains("projects"));
    }

    #[test]
    fn test_get_reads_typed_and_extra() {
        let mut claims = sample();
        claims.extra.insert("level".into(), json!(3));
        assert_eq!(claims.get("id"), Some(json!("123")));
        assert_eq!(claims.get("level"), Some(json!(3)));
        assert_eq!(claims.get("missing"), None);
        assert_eq!(claim_to_string(&json!("x")), "x");
        assert_eq!(claim_to_string(&json!(3)), "3");
    }
}
