//! Handoff URL construction
//!
//! The freshly issued token and the user identity travel to the web client
//! as query parameters. This is a deliberately short-lived, low-assurance
//! channel carried over from the original design (tokens show up in browser
//! history); switching to a one-time exchange code would be a behavior
//! change, not a drop-in hardening.

use crate::auth::AuthError;
use lastchart_common::api::types::UserInfo;

/// Build the destination URL `origin?token=<token>&user=<url-encoded-json>`
///
/// Refuses an empty token outright rather than producing a URL that would
/// strand the user on the client origin without a credential.
pub fn handoff_url(
    client_origin: &str,
    token: &str,
    user: &UserInfo,
) -> Result<String, AuthError> {
    if token.is_empty() {
        return Err(AuthError::EmptyToken);
    }

    let user_json =
        serde_json::to_string(user).map_err(|e| AuthError::Internal(e.to_string()))?;

    Ok(format!(
        "{}?token={}&user={}",
        client_origin,
        urlencoding::encode(token),
        urlencoding::encode(&user_json)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jo() -> UserInfo {
        UserInfo {
            id: 1,
            name: "Jo".to_string(),
            email: "jo@x.com".to_string(),
        }
    }

    #[test]
    fn url_round_trips_to_identical_tuple() {
        let url = handoff_url("http://127.0.0.1:5741", "abc123", &jo()).unwrap();

        let (base, query) = url.split_once('?').unwrap();
        assert_eq!(base, "http://127.0.0.1:5741");

        let mut token = None;
        let mut user_raw = None;
        for pair in query.split('&') {
            let (key, value) = pair.split_once('=').unwrap();
            match key {
                "token" => token = Some(urlencoding::decode(value).unwrap().into_owned()),
                "user" => user_raw = Some(urlencoding::decode(value).unwrap().into_owned()),
                other => panic!("unexpected query key {other}"),
            }
        }

        assert_eq!(token.as_deref(), Some("abc123"));
        let user: UserInfo = serde_json::from_str(&user_raw.unwrap()).unwrap();
        assert_eq!(user, jo());
    }

    #[test]
    fn empty_token_refuses_to_build_url() {
        let err = handoff_url("http://127.0.0.1:5741", "", &jo()).unwrap_err();
        assert!(matches!(err, AuthError::EmptyToken));
    }

    #[test]
    fn unsafe_user_fields_are_percent_encoded() {
        let user = UserInfo {
            id: 7,
            name: "A & B / C?".to_string(),
            email: "a+b@x.com".to_string(),
        };
        let url = handoff_url("http://127.0.0.1:5741", "tok", &user).unwrap();

        // The raw reserved characters never appear in the query value
        let query = url.split_once('?').unwrap().1;
        assert!(!query.contains('&') || query.matches('&').count() == 1);
        assert!(!query.contains(' '));

        let user_value = query.split('&').find_map(|p| p.strip_prefix("user=")).unwrap();
        let decoded = urlencoding::decode(user_value).unwrap();
        let back: UserInfo = serde_json::from_str(&decoded).unwrap();
        assert_eq!(back, user);
    }
}
