// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Role gate deciding whether a stored session token permits a navigation target
// role: session/gate
// inputs: Optional bearer token string; target path
// outputs: GateDecision {Permit | RedirectHome | Redirect-to-role-area, clear_token}
// side_effects: None; the caller applies clear_token against the session store
// invariants:
// - Pure over (token, path); token removal is the only mutation and only on decode failure
// - Claims are inspected, not authenticated; signature checks belong to the backend
// - No token redirects home without a notice; role mismatches carry a notice
// errors: Decode failures collapse to RedirectHome + clear_token, never a panic
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// Path every report operation authorizes against.
pub const ADMIN_REPORTS_PATH: &str = "/admin/reports";

/// Default landing targets per area.
pub const ADMIN_HOME: &str = "/admin/dashboard";
pub const USER_HOME: &str = "/user/services";

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Role {
  Admin,
  User,
}

impl Role {
  fn from_claim(raw: &str) -> Option<Role> {
    match raw {
      "admin" => Some(Role::Admin),
      "user" => Some(Role::User),
      _ => None,
    }
  }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Area {
  Admin,
  User,
}

impl Area {
  pub fn home(self) -> &'static str {
    match self {
      Area::Admin => ADMIN_HOME,
      Area::User => USER_HOME,
    }
  }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Access {
  /// Forward the requested content.
  Permit,
  /// Unauthenticated; back to the public home, no notice.
  RedirectHome,
  /// Authenticated but in the wrong area; carry the notice to surface.
  Redirect { area: Area, notice: String },
}

#[derive(Clone, Debug)]
pub struct GateDecision {
  pub access: Access,
  /// True only when the stored token failed to decode and must be removed.
  pub clear_token: bool,
}

/// The claim set we read out of the session token. Everything is optional:
/// the gate tolerates sparse tokens and treats unknown roles as absent.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  #[serde(default)]
  pub role: Option<String>,
  #[serde(default)]
  pub email: Option<String>,
  #[serde(default)]
  pub sub: Option<String>,
  #[serde(default)]
  pub exp: Option<i64>,
}

fn decode_claims(token: &str) -> Option<Claims> {
  // Claims inspection only. The token was issued elsewhere and every API call
  // is re-authenticated server-side, so the gate reads the payload the way
  // the portal shell does: no signature, no expiry enforcement.
  let mut validation = Validation::new(Algorithm::HS256);
  validation.insecure_disable_signature_validation();
  validation.validate_exp = false;
  validation.required_spec_claims.clear();
  validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

  decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
    .ok()
    .map(|data| data.claims)
}

fn is_admin_path(path: &str) -> bool {
  path == "/admin" || path.starts_with("/admin/")
}

/// Decide whether `target` is reachable with the stored token.
pub fn authorize(token: Option<&str>, target: &str) -> GateDecision {
  let raw = match token {
    Some(t) if !t.trim().is_empty() => t,
    _ => {
      return GateDecision { access: Access::RedirectHome, clear_token: false };
    }
  };

  let claims = match decode_claims(raw) {
    Some(c) => c,
    None => {
      return GateDecision { access: Access::RedirectHome, clear_token: true };
    }
  };

  let role = claims.role.as_deref().and_then(Role::from_claim);

  if is_admin_path(target) && role != Some(Role::Admin) {
    return GateDecision {
      access: Access::Redirect {
        area: Area::User,
        notice: "Access denied: administrator area".to_string(),
      },
      clear_token: false,
    };
  }

  if !is_admin_path(target) && role == Some(Role::Admin) {
    return GateDecision {
      access: Access::Redirect {
        area: Area::Admin,
        notice: "Administrator accounts use the admin area".to_string(),
      },
      clear_token: false,
    };
  }

  GateDecision { access: Access::Permit, clear_token: false }
}
