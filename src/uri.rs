use std::borrow::Cow;
use std::str::FromStr;

use crate::hotp::DIGITS;
use crate::totp::{Totp, STEP_SECONDS};
use crate::TotpError;

/// Issuer used when the caller does not name one.
pub(crate) const DEFAULT_ISSUER: &str = "Marketplace Services";

const URI_SCHEME: &str = "otpauth";
const TOTP_TYPE: &str = "totp";
const SHA1_ALGORITHM: &str = "SHA1";

const URI_SECRET_QUERY: &str = "secret";
const URI_ISSUER_QUERY: &str = "issuer";
const URI_HASH_QUERY: &str = "algorithm";
const URI_DIGITS_QUERY: &str = "digits";
const URI_PERIOD_QUERY: &str = "period";

pub(crate) fn to_uri(
    totp: &Totp,
    account: &str,
    issuer: Option<&str>,
) -> Result<String, TotpError> {
    let issuer = issuer.unwrap_or(DEFAULT_ISSUER);

    let mut uri = url::Url::parse(&format!("{URI_SCHEME}://{TOTP_TYPE}/"))
        .map_err(TotpError::UriParse)?;
    uri.set_path(&format!("{issuer}:{account}"));

    uri.query_pairs_mut()
        .append_pair(URI_SECRET_QUERY, &totp.secret)
        .append_pair(URI_ISSUER_QUERY, issuer)
        .append_pair(URI_HASH_QUERY, SHA1_ALGORITHM)
        .append_pair(URI_DIGITS_QUERY, &DIGITS.to_string())
        .append_pair(URI_PERIOD_QUERY, &STEP_SECONDS.to_string());

    Ok(uri.to_string())
}

pub(crate) fn from_uri(uri: &str) -> Result<Totp, TotpError> {
    let uri = url::Url::parse(uri).map_err(TotpError::UriParse)?;

    if uri.scheme() != URI_SCHEME {
        return Err(TotpError::InvalidUriType(uri.scheme().to_string()));
    }

    let domain = uri.domain();
    if domain.is_none() || domain.is_some_and(|d| d != TOTP_TYPE) {
        return Err(TotpError::InvalidUriType(domain.unwrap_or("None").into()));
    }

    let mut secret = "".to_string();

    for params in uri.query_pairs() {
        match params.0 {
            Cow::Borrowed(URI_SECRET_QUERY) => secret = params.1.to_string(),
            Cow::Borrowed(URI_HASH_QUERY) => {
                if !params.1.eq_ignore_ascii_case(SHA1_ALGORITHM) {
                    return Err(TotpError::UnsupportedAlgorithm(params.1.to_string()));
                }
            }
            Cow::Borrowed(URI_DIGITS_QUERY) => {
                let digits = u32::from_str(params.1.as_ref())
                    .map_err(|e| TotpError::IntegerParse(e, URI_DIGITS_QUERY.into()))?;

                if digits != DIGITS {
                    return Err(TotpError::UnsupportedDigits(digits));
                }
            }
            Cow::Borrowed(URI_PERIOD_QUERY) => {
                let period = u64::from_str(params.1.as_ref())
                    .map_err(|e| TotpError::IntegerParse(e, URI_PERIOD_QUERY.into()))?;

                if period != STEP_SECONDS {
                    return Err(TotpError::UnsupportedPeriod(period));
                }
            }
            _ => (),
        }
    }

    if secret.is_empty() {
        return Err(TotpError::UriMissingSecret);
    }

    Ok(Totp::new(secret))
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::totp::Totp;
    use crate::TotpError;

    const SECRET: &str = "HXDMVJECJJWSRB3HWIZR4IFUGFTMXBOZ";

    #[rstest]
    #[case(Some("ACME Co"),
        "otpauth://totp/ACME%20Co:john.doe@email.com?secret=HXDMVJECJJWSRB3HWIZR4IFUGFTMXBOZ&issuer=ACME+Co&algorithm=SHA1&digits=6&period=30")]
    #[case(None,
        "otpauth://totp/Marketplace%20Services:john.doe@email.com?secret=HXDMVJECJJWSRB3HWIZR4IFUGFTMXBOZ&issuer=Marketplace+Services&algorithm=SHA1&digits=6&period=30")]
    fn to_uri_test(#[case] issuer: Option<&str>, #[case] expected: &str) {
        let totp = Totp::new(SECRET.to_string());

        let generated_uri = totp.to_uri("john.doe@email.com", issuer).unwrap();

        assert_eq!(expected, generated_uri);
    }

    #[test]
    fn labels_are_percent_encoded() {
        let totp = Totp::new(SECRET.to_string());

        let generated_uri = totp.to_uri("user name?", Some("A&B Co")).unwrap();

        let parsed = url::Url::parse(&generated_uri).unwrap();
        let issuer = parsed
            .query_pairs()
            .find(|(key, _)| key == "issuer")
            .map(|(_, value)| value.to_string())
            .unwrap();

        assert_eq!("A&B Co", issuer);
        assert!(!parsed.path().contains(' '));
    }

    #[test]
    fn uri_round_trips_the_fixed_profile() {
        let totp = Totp::new(SECRET.to_string());
        let generated_uri = totp.to_uri("john.doe@email.com", None).unwrap();

        let reparsed = Totp::from_uri(&generated_uri).unwrap();
        assert_eq!(totp, reparsed);

        let parsed = url::Url::parse(&generated_uri).unwrap();
        let pairs: Vec<(Cow<str>, Cow<str>)> = parsed.query_pairs().collect();

        assert!(pairs.contains(&(Cow::from("secret"), Cow::from(SECRET))));
        assert!(pairs.contains(&(Cow::from("issuer"), Cow::from("Marketplace Services"))));
        assert!(pairs.contains(&(Cow::from("algorithm"), Cow::from("SHA1"))));
        assert!(pairs.contains(&(Cow::from("digits"), Cow::from("6"))));
        assert!(pairs.contains(&(Cow::from("period"), Cow::from("30"))));
    }

    #[test]
    fn from_uri_accepts_explicit_profile_parameters() {
        let uri = format!(
            "otpauth://totp/ACME%20Co:john.doe@email.com?secret={SECRET}&issuer=ACME+Co&algorithm=SHA1&digits=6&period=30"
        );

        let totp = Totp::from_uri(&uri).unwrap();

        assert_eq!(SECRET, totp.secret());
    }

    #[rstest]
    #[case::hotp_uri("otpauth://hotp/user?secret=ABCD&counter=0")]
    #[case::wrong_scheme("https://totp/user?secret=ABCD")]
    fn from_uri_rejects_other_uri_types(#[case] uri: &str) {
        assert!(matches!(
            Totp::from_uri(uri),
            Err(TotpError::InvalidUriType(_))
        ));
    }

    #[test]
    fn from_uri_rejects_a_missing_secret() {
        assert!(matches!(
            Totp::from_uri("otpauth://totp/user?issuer=ACME"),
            Err(TotpError::UriMissingSecret)
        ));
    }

    #[rstest]
    #[case::sha256("otpauth://totp/user?secret=ABCD&algorithm=SHA256")]
    #[case::eight_digits("otpauth://totp/user?secret=ABCD&digits=8")]
    #[case::sixty_seconds("otpauth://totp/user?secret=ABCD&period=60")]
    fn from_uri_rejects_other_profiles(#[case] uri: &str) {
        assert!(matches!(
            Totp::from_uri(uri),
            Err(TotpError::UnsupportedAlgorithm(_))
                | Err(TotpError::UnsupportedDigits(_))
                | Err(TotpError::UnsupportedPeriod(_))
        ));
    }

    #[test]
    fn from_uri_rejects_non_numeric_profile_parameters() {
        assert!(matches!(
            Totp::from_uri("otpauth://totp/user?secret=ABCD&digits=six"),
            Err(TotpError::IntegerParse(_, _))
        ));
    }
}
