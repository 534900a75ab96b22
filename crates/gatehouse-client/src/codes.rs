//! Error codes returned by each operation.
//!
//! Every operation has its own closed set of codes. All of them share the
//! service-wide codes (`bad_json`, `project_not_found`, `bad_ip_address`,
//! `rate_limit_reached`, `internal_error`) and the client-side
//! `connection_error`, which covers every response that is neither a 200 nor
//! a well-formed 400, as well as transport failures.

use std::fmt;

use serde::de::DeserializeOwned;

/// Common behaviour of the per-operation error code enums.
pub trait ErrorCode: DeserializeOwned + Copy + fmt::Debug + fmt::Display + Send + 'static {
    /// The code used for transport and parse failures.
    const CONNECTION_ERROR: Self;

    /// Wire representation of the code.
    fn as_str(&self) -> &'static str;

    /// Check if this is the client-side `connection_error`.
    fn is_connection_error(&self) -> bool;
}

macro_rules! error_codes {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            /// The service could not parse the request body.
            #[serde(rename = "bad_json")]
            BadJson,
            /// The project identifier is unknown.
            #[serde(rename = "project_not_found")]
            ProjectNotFound,
            /// The caller's IP address was rejected.
            #[serde(rename = "bad_ip_address")]
            BadIpAddress,
            /// Too many requests.
            #[serde(rename = "rate_limit_reached")]
            RateLimitReached,
            /// The service failed internally.
            #[serde(rename = "internal_error")]
            InternalError,
            $(
                $(#[$vmeta])*
                #[serde(rename = $code)]
                $variant,
            )*
            /// The service could not be reached or answered with something unexpected.
            #[serde(rename = "connection_error", skip_deserializing)]
            ConnectionError,
        }

        impl $name {
            /// Wire representation of the code.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    Self::BadJson => "bad_json",
                    Self::ProjectNotFound => "project_not_found",
                    Self::BadIpAddress => "bad_ip_address",
                    Self::RateLimitReached => "rate_limit_reached",
                    Self::InternalError => "internal_error",
                    $( Self::$variant => $code, )*
                    Self::ConnectionError => "connection_error",
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::error::Error for $name {}

        impl ErrorCode for $name {
            const CONNECTION_ERROR: Self = Self::ConnectionError;

            fn as_str(&self) -> &'static str {
                $name::as_str(self)
            }

            fn is_connection_error(&self) -> bool {
                matches!(self, Self::ConnectionError)
            }
        }
    };
}

error_codes! {
    /// Errors from `/signin/email`.
    SigninEmailError {
        /// The email address was rejected.
        BadEmail => "bad_email",
    }
}

error_codes! {
    /// Errors from `/signin/emailverify`.
    EmailVerifyError {
        /// The email address was rejected.
        BadEmail => "bad_email",
        /// The verification code is wrong or expired.
        BadCode => "bad_code",
    }
}

error_codes! {
    /// Errors from `/signin/social`.
    SigninSocialError {
        /// The social provider is not supported.
        BadSocialType => "bad_social_type",
    }
}

error_codes! {
    /// Errors from `/signin/socialverify`.
    SocialVerifyError {
        /// The social provider is not supported.
        BadSocialType => "bad_social_type",
        /// The provider's authorization code was rejected.
        BadAuthorizationCode => "bad_authorization_code",
    }
}

error_codes! {
    /// Errors from `/session/info`.
    SessionInfoError {
        /// The session token is unknown or expired.
        BadSessionToken => "bad_session_token",
    }
}

error_codes! {
    /// Errors from `/session/refresh`.
    SessionRefreshError {
        /// The session token is unknown or expired.
        BadSessionToken => "bad_session_token",
        /// The session has no refreshes left.
        OutOfRefresh => "out_of_refresh",
    }
}

error_codes! {
    /// Errors from `/session/invalidate`.
    SessionInvalidateError {
        /// The session token is unknown or expired.
        BadSessionToken => "bad_session_token",
        /// The invalidation scope is not recognised.
        BadInvalidateType => "bad_invalidate_type",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_shared_and_specific_codes() {
        let code: SessionRefreshError = serde_json::from_str("\"out_of_refresh\"").unwrap();
        assert_eq!(code, SessionRefreshError::OutOfRefresh);

        let code: SessionRefreshError = serde_json::from_str("\"rate_limit_reached\"").unwrap();
        assert_eq!(code, SessionRefreshError::RateLimitReached);
    }

    #[test]
    fn test_rejects_codes_from_other_operations() {
        let result = serde_json::from_str::<SigninEmailError>("\"out_of_refresh\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_connection_error_is_not_accepted_from_the_wire() {
        let result = serde_json::from_str::<SessionInfoError>("\"connection_error\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_matches_wire() {
        assert_eq!(SocialVerifyError::BadAuthorizationCode.to_string(), "bad_authorization_code");
        assert_eq!(SessionInvalidateError::ConnectionError.to_string(), "connection_error");
        assert_eq!(
            serde_json::to_string(&EmailVerifyError::BadCode).unwrap(),
            "\"bad_code\""
        );
    }

    #[test]
    fn test_connection_error_constant() {
        assert!(SigninSocialError::CONNECTION_ERROR.is_connection_error());
        assert!(!SigninSocialError::BadSocialType.is_connection_error());
        assert_eq!(ErrorCode::as_str(&SigninSocialError::CONNECTION_ERROR), "connection_error");
    }
}
