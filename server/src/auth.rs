use std::time::Duration;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::RequestPartsExt;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use error_stack::{Report, ResultExt};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kernel::prelude::entity::OwnerUserId;
use kernel::KernelError;

use crate::config::AuthConfig;
use crate::error::ErrorStatus;
use crate::handler::AppModule;

const ALGORITHM: Algorithm = Algorithm::HS512;

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(rename = "UserId")]
    pub user_id: String,
    pub iss: String,
    pub aud: String,
    pub exp: u64,
}

/// Verifies and issues HS512 bearer tokens carrying a `UserId` claim.
pub struct JwtAuthenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
}

impl JwtAuthenticator {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        Self {
            encoding: EncodingKey::from_secret(config.signing_key.as_bytes()),
            decoding: DecodingKey::from_secret(config.signing_key.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    pub fn verify(&self, token: &str) -> error_stack::Result<OwnerUserId, KernelError> {
        let claims = jsonwebtoken::decode::<AccessClaims>(token, &self.decoding, &self.validation)
            .change_context_lazy(|| KernelError::Unauthenticated)?
            .claims;
        let id = Uuid::parse_str(&claims.user_id)
            .change_context_lazy(|| KernelError::Unauthenticated)
            .attach_printable("UserId claim is not a valid identifier")?;
        Ok(OwnerUserId::new(id))
    }

    pub fn issue(
        &self,
        owner: &OwnerUserId,
        lifetime: Duration,
    ) -> error_stack::Result<String, KernelError> {
        let claims = AccessClaims {
            user_id: owner.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: jsonwebtoken::get_current_timestamp() + lifetime.as_secs(),
        };
        jsonwebtoken::encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable("Failed to sign access token")
    }
}

/// Owner of the request, resolved from the `Authorization: Bearer` header.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated(pub OwnerUserId);

#[async_trait]
impl<D> FromRequestParts<AppModule<D>> for Authenticated
where
    D: 'static + Sync + Send,
{
    type Rejection = ErrorStatus;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppModule<D>,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|rejection| {
                Report::new(KernelError::Unauthenticated).attach_printable(rejection.to_string())
            })?;
        let owner = state.authenticator().verify(bearer.token())?;
        Ok(Self(owner))
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use jsonwebtoken::{EncodingKey, Header};
    use uuid::Uuid;

    use kernel::prelude::entity::OwnerUserId;
    use kernel::KernelError;

    use super::{AccessClaims, JwtAuthenticator, ALGORITHM};
    use crate::config::AuthConfig;

    fn config(key: &str) -> AuthConfig {
        AuthConfig {
            signing_key: key.to_string(),
            issuer: "phonebook-test".to_string(),
            audience: "phonebook-api".to_string(),
        }
    }

    fn sign(claims: &AccessClaims, key: &str) -> String {
        jsonwebtoken::encode(
            &Header::new(ALGORITHM),
            claims,
            &EncodingKey::from_secret(key.as_bytes()),
        )
        .expect("signing succeeds")
    }

    fn claims(user_id: &str, exp: u64) -> AccessClaims {
        AccessClaims {
            user_id: user_id.to_string(),
            iss: "phonebook-test".to_string(),
            aud: "phonebook-api".to_string(),
            exp,
        }
    }

    fn assert_unauthenticated(result: error_stack::Result<OwnerUserId, KernelError>) {
        let error = result.expect_err("token must be rejected");
        assert!(matches!(
            error.current_context(),
            KernelError::Unauthenticated
        ));
    }

    #[test]
    fn issued_token_verifies() -> error_stack::Result<(), KernelError> {
        let authenticator = JwtAuthenticator::new(&config("a-signing-key-for-tests"));
        let owner = OwnerUserId::new(Uuid::new_v4());
        let token = authenticator.issue(&owner, Duration::from_secs(3600))?;
        assert_eq!(authenticator.verify(&token)?, owner);
        Ok(())
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let authenticator = JwtAuthenticator::new(&config("a-signing-key-for-tests"));
        let exp = jsonwebtoken::get_current_timestamp() + 3600;
        let token = sign(&claims(&Uuid::new_v4().to_string(), exp), "another-key");
        assert_unauthenticated(authenticator.verify(&token));
    }

    #[test]
    fn expired_token_is_rejected() {
        let authenticator = JwtAuthenticator::new(&config("a-signing-key-for-tests"));
        let exp = jsonwebtoken::get_current_timestamp() - 3600;
        let token = sign(&claims(&Uuid::new_v4().to_string(), exp), "a-signing-key-for-tests");
        assert_unauthenticated(authenticator.verify(&token));
    }

    #[test]
    fn unparsable_user_id_is_rejected() {
        let authenticator = JwtAuthenticator::new(&config("a-signing-key-for-tests"));
        let exp = jsonwebtoken::get_current_timestamp() + 3600;
        let token = sign(&claims("42", exp), "a-signing-key-for-tests");
        assert_unauthenticated(authenticator.verify(&token));
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let authenticator = JwtAuthenticator::new(&config("a-signing-key-for-tests"));
        let mut other = claims(
            &Uuid::new_v4().to_string(),
            jsonwebtoken::get_current_timestamp() + 3600,
        );
        other.aud = "someone-else".to_string();
        let token = sign(&other, "a-signing-key-for-tests");
        assert_unauthenticated(authenticator.verify(&token));
    }

    #[test]
    fn garbage_is_rejected() {
        let authenticator = JwtAuthenticator::new(&config("a-signing-key-for-tests"));
        assert_unauthenticated(authenticator.verify("not.a.token"));
    }
}
