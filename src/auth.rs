use chrono::{Duration, Utc};
use rocket::http::{Cookie, CookieJar, Status};
use rocket::request::{FromRequest, Outcome, Request};
use rocket::State;
use rusqlite::params;

use crate::db::DbPool;
use crate::models::settings::Setting;

pub const SESSION_COOKIE: &str = "driftlog_session";

/// Guard yielding the username bound to a valid session cookie.
///
/// Routes take this as `Option<SessionUser>` so pages can render their own
/// "not logged in" view and JSON endpoints can answer 401 themselves.
pub struct SessionUser(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for SessionUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let pool = match request.guard::<&State<DbPool>>().await {
            Outcome::Success(p) => p,
            _ => return Outcome::Forward(Status::Unauthorized),
        };

        let cookies = request.cookies();
        let session_id = match cookies.get_private(SESSION_COOKIE) {
            Some(c) => c.value().to_string(),
            None => return Outcome::Forward(Status::Unauthorized),
        };

        match session_username(pool, &session_id) {
            Some(username) => Outcome::Success(SessionUser(username)),
            None => {
                cookies.remove_private(Cookie::from(SESSION_COOKIE));
                Outcome::Forward(Status::Unauthorized)
            }
        }
    }
}

pub fn hash_password(password: &str) -> Result<String, String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| e.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

pub fn create_session(pool: &DbPool, username: &str) -> Result<String, String> {
    let conn = pool.get().map_err(|e| e.to_string())?;

    let expiry_hours = Setting::get_i64(pool, "session_expiry_hours").max(1);
    let session_id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().naive_utc();
    let expires = now + Duration::hours(expiry_hours);

    conn.execute(
        "INSERT INTO sessions (id, username, created_at, expires_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![session_id, username, now, expires],
    )
    .map_err(|e| e.to_string())?;

    Ok(session_id)
}

/// Username bound to a session id, if the session exists and is unexpired.
/// The username is NOT re-checked against the users table here.
pub fn session_username(pool: &DbPool, session_id: &str) -> Option<String> {
    let conn = pool.get().ok()?;
    let now = Utc::now().naive_utc();
    conn.query_row(
        "SELECT username FROM sessions WHERE id = ?1 AND expires_at > ?2",
        params![session_id, now],
        |row| row.get(0),
    )
    .ok()
}

pub fn destroy_session(pool: &DbPool, session_id: &str) -> Result<(), String> {
    let conn = pool.get().map_err(|e| e.to_string())?;
    conn.execute("DELETE FROM sessions WHERE id = ?1", params![session_id])
        .map_err(|e| e.to_string())?;
    Ok(())
}

pub fn set_session_cookie(cookies: &CookieJar<'_>, session_id: &str) {
    let mut cookie = Cookie::new(SESSION_COOKIE, session_id.to_string());
    cookie.set_http_only(true);
    cookie.set_same_site(rocket::http::SameSite::Strict);
    cookie.set_path("/");
    cookies.add_private(cookie);
}

pub fn clear_session_cookie(cookies: &CookieJar<'_>) {
    cookies.remove_private(Cookie::from(SESSION_COOKIE));
}

pub fn cleanup_expired_sessions(pool: &DbPool) -> Result<(), String> {
    let conn = pool.get().map_err(|e| e.to_string())?;
    let now = Utc::now().naive_utc();
    conn.execute("DELETE FROM sessions WHERE expires_at < ?1", params![now])
        .map_err(|e| e.to_string())?;
    Ok(())
}
