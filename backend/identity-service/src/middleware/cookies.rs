//! Token cookie contract: both tokens ride as httpOnly, SameSite=Strict
//! cookies whose lifetimes match the token TTLs. `Secure` is set outside
//! development.
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::security::token::{ACCESS_TOKEN_TTL_MINUTES, REFRESH_TOKEN_TTL_DAYS};

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

fn token_cookie(
    name: &'static str,
    value: String,
    max_age: time::Duration,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(max_age)
        .build()
}

pub fn set_token_cookies(
    jar: CookieJar,
    access_token: String,
    refresh_token: String,
    secure: bool,
) -> CookieJar {
    jar.add(token_cookie(
        ACCESS_COOKIE,
        access_token,
        time::Duration::minutes(ACCESS_TOKEN_TTL_MINUTES),
        secure,
    ))
    .add(token_cookie(
        REFRESH_COOKIE,
        refresh_token,
        time::Duration::days(REFRESH_TOKEN_TTL_DAYS),
        secure,
    ))
}

pub fn clear_token_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(removal_cookie(ACCESS_COOKIE))
        .remove(removal_cookie(REFRESH_COOKIE))
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    // Removal must match the path the cookie was set with.
    Cookie::build((name, "")).path("/").build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookies_carry_the_contracted_attributes() {
        let jar = set_token_cookies(
            CookieJar::new(),
            "access".to_string(),
            "refresh".to_string(),
            true,
        );

        let access = jar.get(ACCESS_COOKIE).expect("access cookie");
        assert_eq!(access.value(), "access");
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.secure(), Some(true));
        assert_eq!(access.same_site(), Some(SameSite::Strict));
        assert_eq!(access.path(), Some("/"));
        assert_eq!(
            access.max_age(),
            Some(time::Duration::minutes(ACCESS_TOKEN_TTL_MINUTES))
        );

        let refresh = jar.get(REFRESH_COOKIE).expect("refresh cookie");
        assert_eq!(
            refresh.max_age(),
            Some(time::Duration::days(REFRESH_TOKEN_TTL_DAYS))
        );
    }

    #[test]
    fn secure_flag_follows_environment() {
        let jar = set_token_cookies(
            CookieJar::new(),
            "access".to_string(),
            "refresh".to_string(),
            false,
        );
        let access = jar.get(ACCESS_COOKIE).expect("access cookie");
        assert_ne!(access.secure(), Some(true));
    }
}
