use rocket::http::Status;
use rocket::response::Redirect;
use rocket::serde::json::Json;
use rocket::State;
use rocket_dyn_templates::Template;
use serde_json::{json, Value};

use crate::auth::SessionUser;
use crate::db::DbPool;
use crate::feed::{self, AssembleError};
use crate::models::post::Post;
use crate::models::user::User;
use crate::timefmt;

#[get("/")]
pub fn index() -> Redirect {
    Redirect::to(uri!(discover))
}

// ── Discover / Search ──────────────────────────────────

#[get("/discover")]
pub fn discover(pool: &State<DbPool>) -> Result<Template, Status> {
    match Post::list_summaries(pool) {
        Ok(posts) => Ok(Template::render("pages/discover", json!({ "posts": posts }))),
        Err(e) => {
            log::error!("Error fetching posts: {}", e);
            Err(Status::InternalServerError)
        }
    }
}

#[get("/search?<query>")]
pub fn search(pool: &State<DbPool>, query: Option<&str>) -> Result<Template, Status> {
    // Empty query is a substring of everything, so it lists all posts
    match Post::search_summaries(pool, query.unwrap_or("")) {
        Ok(posts) => Ok(Template::render("pages/discover", json!({ "posts": posts }))),
        Err(e) => {
            log::error!("Error searching for posts: {}", e);
            Err(Status::InternalServerError)
        }
    }
}

// ── Health probe ───────────────────────────────────────

#[get("/welcome")]
pub fn welcome() -> Json<Value> {
    Json(json!({ "status": "success", "message": "Welcome!" }))
}

// ── User feed ──────────────────────────────────────────

#[get("/user/<username>")]
pub fn user_page(
    pool: &State<DbPool>,
    username: &str,
    session: Option<SessionUser>,
) -> Template {
    let profile = match User::find_by_username(pool, username) {
        Some(u) => u,
        None => {
            return Template::render(
                "pages/profileerr",
                json!({ "message": "User not found.", "error": true }),
            )
        }
    };

    // No partial results: one broken post aborts the whole feed
    let tz = timefmt::display_tz(pool);
    let mut posts = Vec::new();
    for postid in Post::ids_for_user(pool, username) {
        match feed::assemble(pool, postid, tz) {
            Ok(bundle) => posts.push(bundle),
            Err(AssembleError::PostMissing) => {
                return Template::render(
                    "pages/error",
                    json!({ "message": "Error getting user posts" }),
                )
            }
            Err(AssembleError::Store(e)) => {
                log::error!("Feed assembly failed for post {}: {}", postid, e);
                return Template::render(
                    "pages/error",
                    json!({ "message": "An unexpected error has occurred" }),
                );
            }
        }
    }

    let is_self = matches!(&session, Some(SessionUser(u)) if u == &profile.username);
    Template::render(
        "pages/user",
        json!({
            "user": profile.safe_json(),
            "posts": posts,
            "is_self": is_self,
        }),
    )
}

// ── Single post ────────────────────────────────────────

#[get("/post/<id>")]
pub fn post_page(pool: &State<DbPool>, id: i64, session: Option<SessionUser>) -> Template {
    let tz = timefmt::display_tz(pool);
    let bundle = match feed::assemble(pool, id, tz) {
        Ok(b) => b,
        Err(AssembleError::PostMissing) => {
            return Template::render("pages/error", json!({ "message": "Post not found" }))
        }
        Err(AssembleError::Store(e)) => {
            log::error!("Error assembling post {}: {}", id, e);
            return Template::render("pages/error", json!({ "message": "Post not found" }));
        }
    };

    Template::render(
        "pages/post_page",
        json!({
            "post": bundle.post,
            "formatted_create_time": bundle.formatted_create_time,
            "user": bundle.author,
            "comments": bundle.comments,
            "tags": bundle.tags,
            "sections": bundle.sections,
            "is_logged_in": session.is_some(),
        }),
    )
}

// ── Upload form ────────────────────────────────────────

#[get("/upload")]
pub fn upload_page() -> Template {
    Template::render("pages/upload", json!({}))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        index,
        discover,
        search,
        welcome,
        user_page,
        post_page,
        upload_page,
    ]
}
