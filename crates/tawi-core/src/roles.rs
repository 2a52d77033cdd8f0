//! User roles and the registration permission graph
//!
//! Each role may register accounts of the roles it points to:
//!
//! ```text
//! admin         -> admin, branchManager, dsa, retailer
//! branchManager -> dsa, retailer
//! dsa           -> retailer
//! retailer      -> (none)
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Admin,
    BranchManager,
    Dsa,
    Retailer,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::BranchManager, Role::Dsa, Role::Retailer];

    /// Outgoing edges of the permission graph.
    pub fn registrable_roles(self) -> &'static [Role] {
        match self {
            Role::Admin => &Role::ALL,
            Role::BranchManager => &[Role::Dsa, Role::Retailer],
            Role::Dsa => &[Role::Retailer],
            Role::Retailer => &[],
        }
    }

    pub fn can_register(self, target: Role) -> bool {
        self.registrable_roles().contains(&target)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::BranchManager => "branchManager",
            Role::Dsa => "dsa",
            Role::Retailer => "retailer",
        }
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "branchManager" => Ok(Role::BranchManager),
            "dsa" => Ok(Role::Dsa),
            "retailer" => Ok(Role::Retailer),
            _ => Err(anyhow::anyhow!("Invalid role: {}", s)),
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// What the session token says about the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallerRole {
    /// No session token.
    Anonymous,
    /// A token whose payload could not be decoded.
    Undecodable,
    Known(Role),
    /// A `role` claim this client does not know about.
    Unrecognised(String),
}

impl CallerRole {
    /// Read the `role` claim from a JWT payload. The signature is not checked;
    /// the server does that.
    pub fn from_token(token: Option<&str>) -> Self {
        let Some(token) = token else {
            return CallerRole::Anonymous;
        };

        let role = token
            .split('.')
            .nth(1)
            .and_then(|payload| URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok())
            .and_then(|bytes| serde_json::from_slice::<serde_json::Value>(&bytes).ok())
            .and_then(|claims| claims.get("role").and_then(|r| r.as_str()).map(String::from));

        match role {
            None => CallerRole::Undecodable,
            Some(role) => match role.parse::<Role>() {
                Ok(known) => CallerRole::Known(known),
                Err(_) => CallerRole::Unrecognised(role),
            },
        }
    }

    /// Roles offered on the registration form. Without a usable token every
    /// role is offered and the server decides.
    pub fn registrable_roles(&self) -> Vec<Role> {
        match self {
            CallerRole::Anonymous | CallerRole::Undecodable => Role::ALL.to_vec(),
            CallerRole::Known(role) => role.registrable_roles().to_vec(),
            CallerRole::Unrecognised(_) => Vec::new(),
        }
    }

    pub fn check_can_register(&self, target: Role) -> Result<(), ValidationError> {
        if self.registrable_roles().contains(&target) {
            Ok(())
        } else {
            Err(ValidationError::RoleNotPermitted(target.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with(claims: &str) -> String {
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(claims)
        )
    }

    #[test]
    fn permission_graph_edges() {
        assert_eq!(Role::Admin.registrable_roles().len(), 4);
        assert!(Role::BranchManager.can_register(Role::Dsa));
        assert!(!Role::BranchManager.can_register(Role::Admin));
        assert_eq!(Role::Dsa.registrable_roles(), &[Role::Retailer]);
        assert!(Role::Retailer.registrable_roles().is_empty());
    }

    #[test]
    fn role_round_trips_through_strings() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert!("manager".parse::<Role>().is_err());
        assert_eq!(serde_json::to_string(&Role::BranchManager).unwrap(), "\"branchManager\"");
    }

    #[test]
    fn decodes_role_claim_from_token() {
        let token = token_with(r#"{"id":"abc","role":"dsa"}"#);
        let caller = CallerRole::from_token(Some(&token));
        assert_eq!(caller, CallerRole::Known(Role::Dsa));
        assert_eq!(caller.registrable_roles(), vec![Role::Retailer]);
        assert!(caller.check_can_register(Role::Admin).is_err());
        assert!(caller.check_can_register(Role::Retailer).is_ok());
    }

    #[test]
    fn missing_or_broken_token_offers_every_role() {
        assert_eq!(CallerRole::from_token(None).registrable_roles().len(), 4);
        let broken = CallerRole::from_token(Some("not-a-jwt"));
        assert_eq!(broken, CallerRole::Undecodable);
        assert_eq!(broken.registrable_roles().len(), 4);
    }

    #[test]
    fn unknown_role_claim_offers_nothing() {
        let token = token_with(r#"{"role":"superuser"}"#);
        let caller = CallerRole::from_token(Some(&token));
        assert_eq!(caller, CallerRole::Unrecognised("superuser".to_string()));
        assert!(caller.registrable_roles().is_empty());
    }
}
