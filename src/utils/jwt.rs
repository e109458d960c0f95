use actix_web::HttpRequest;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::profile::Identity;

/// Session claims issued by the identity provider.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String, // User email
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub exp: usize,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Identity {
            email: claims.sub,
            full_name: claims.name,
            avatar_url: claims.avatar_url,
        }
    }
}

pub fn validate_token(token: &str, secret: &str) -> Result<Identity, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims.into())
    .map_err(|err| AppError::Unauthorized(err.to_string()))
}

pub fn bearer_token(req: &HttpRequest) -> Result<&str, AppError> {
    req.headers()
        .get("Authorization")
        .and_then(|auth| auth.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Missing token".to_string()))
}

pub fn identity_from_request(req: &HttpRequest, secret: &str) -> Result<Identity, AppError> {
    validate_token(bearer_token(req)?, secret)
}

#[cfg(test)]
pub fn generate_token(email: &str, name: Option<&str>, secret: &str) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let claims = Claims {
        sub: email.to_string(),
        name: name.map(str::to_string),
        avatar_url: None,
        exp: (chrono::Utc::now() + chrono::Duration::days(7)).timestamp() as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .expect("test token encodes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_identity_claims() {
        let token = generate_token("sara@example.com", Some("Sara Ahmed"), "secret");
        let identity = validate_token(&token, "secret").expect("token validates");
        assert_eq!(identity.email, "sara@example.com");
        assert_eq!(identity.full_name.as_deref(), Some("Sara Ahmed"));
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = generate_token("sara@example.com", None, "secret");
        assert!(matches!(
            validate_token(&token, "other"),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn only_bearer_scheme_is_accepted() {
        use actix_web::test::TestRequest;

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req).expect("bearer token"), "abc.def.ghi");

        for header in ["Basic abc.def.ghi", "Bearer ", "abc.def.ghi"] {
            let req = TestRequest::default()
                .insert_header(("Authorization", header))
                .to_http_request();
            assert!(matches!(bearer_token(&req), Err(AppError::Unauthorized(_))));
        }
    }
}
