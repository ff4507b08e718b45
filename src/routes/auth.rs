use rocket::form::Form;
use rocket::http::{CookieJar, Status};
use rocket::response::Redirect;
use rocket::State;
use rocket_dyn_templates::Template;
use serde_json::json;

use crate::auth::{self, SessionUser};
use crate::db::DbPool;
use crate::models::settings::Setting;
use crate::models::user::User;

#[derive(Debug, FromForm)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, FromForm)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

// ── Register ───────────────────────────────────────────

#[get("/register")]
pub fn register_page() -> Template {
    Template::render("pages/register", json!({}))
}

#[post("/register", data = "<form>")]
pub fn register_submit(
    pool: &State<DbPool>,
    form: Form<RegisterForm>,
) -> Result<Redirect, Template> {
    let retry = |msg: &str| Template::render("pages/register", json!({ "message": msg }));

    // Taken-username check runs first, matching the form's field order
    if User::exists(pool, &form.username) {
        return Err(retry("There is already a user with that username"));
    }
    if form.username.is_empty() {
        return Err(retry("You must provide a username"));
    }
    if form.password.is_empty() {
        return Err(retry("You must provide a password"));
    }

    let hash = match auth::hash_password(&form.password) {
        Ok(h) => h,
        Err(e) => {
            log::error!("Password hashing failed: {}", e);
            return Err(retry("An error occurred. Please try again."));
        }
    };

    let picture = Setting::get_or(pool, "default_profile_picture", "/images/ProfilePicture/1.png");
    match User::create(pool, &form.username, &hash, &picture) {
        Ok(()) => Ok(Redirect::to(uri!("/login"))),
        Err(e) => {
            log::error!("Error inserting user: {}", e);
            Err(retry("An error occurred. Please try again."))
        }
    }
}

// ── Login ──────────────────────────────────────────────

#[get("/login")]
pub fn login_page(session: Option<SessionUser>) -> Template {
    if session.is_some() {
        return Template::render(
            "pages/login",
            json!({
                "message": "You are already logged in. Would you like to log out?",
                "show_login_form": false,
            }),
        );
    }
    Template::render("pages/login", json!({ "show_login_form": true }))
}

#[post("/login", data = "<form>")]
pub fn login_submit(
    pool: &State<DbPool>,
    form: Form<LoginForm>,
    cookies: &CookieJar<'_>,
) -> Result<Redirect, Template> {
    let fail =
        |msg: &str| Template::render("pages/login", json!({ "message": msg, "error": true }));

    let user = match User::find_by_username(pool, &form.username) {
        Some(u) => u,
        None => return Err(fail("User not found. Please register.")),
    };

    if !auth::verify_password(&form.password, &user.password) {
        return Err(fail("Incorrect username or password."));
    }

    match auth::create_session(pool, &user.username) {
        Ok(session_id) => {
            auth::set_session_cookie(cookies, &session_id);
            Ok(Redirect::to(uri!("/discover")))
        }
        Err(e) => {
            log::error!("Session creation failed: {}", e);
            Err(fail("An error occurred. Please try again."))
        }
    }
}

// ── Logout ─────────────────────────────────────────────

#[get("/logout")]
pub fn logout(
    pool: &State<DbPool>,
    session: Option<SessionUser>,
    cookies: &CookieJar<'_>,
) -> Result<Template, Status> {
    if session.is_none() {
        return Ok(Template::render(
            "pages/logout",
            json!({ "message": "You are not logged in. Please log in first." }),
        ));
    }

    if let Some(cookie) = cookies.get_private(auth::SESSION_COOKIE) {
        if let Err(e) = auth::destroy_session(pool, cookie.value()) {
            log::error!("Unable to destroy session: {}", e);
            return Err(Status::InternalServerError);
        }
    }
    auth::clear_session_cookie(cookies);

    Ok(Template::render(
        "pages/logout",
        json!({ "message": "Logged out Successfully" }),
    ))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        register_page,
        register_submit,
        login_page,
        login_submit,
        logout,
    ]
}
