use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::SessionUser;
use crate::db::DbPool;
use crate::feed::CommentView;
use crate::models::comment::Comment;
use crate::models::post::Post;
use crate::timefmt;

type JsonError = status::Custom<Json<Value>>;

fn json_error(code: Status, msg: &str) -> JsonError {
    status::Custom(code, Json(json!({ "error": msg })))
}

// ── Comment submission ─────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CommentSubmit {
    #[serde(rename = "commentText")]
    pub comment_text: String,
}

/// Returns the stored comment as JSON so the page can append it without
/// a re-render.
#[post("/post/<postid>/comment", format = "json", data = "<body>")]
pub fn comment_submit(
    pool: &State<DbPool>,
    postid: i64,
    session: Option<SessionUser>,
    body: Json<CommentSubmit>,
) -> Result<Json<CommentView>, JsonError> {
    let username = match session {
        Some(SessionUser(u)) => u,
        None => return Err(json_error(Status::Unauthorized, "User not logged in")),
    };

    if body.comment_text.trim().is_empty() {
        return Err(json_error(Status::BadRequest, "Comment text cannot be empty"));
    }

    let commentid = match Comment::create(pool, postid, &username, &body.comment_text) {
        Ok(id) => id,
        Err(e) => {
            log::error!("Error posting comment: {}", e);
            return Err(json_error(
                Status::InternalServerError,
                "An error occurred while posting the comment",
            ));
        }
    };

    let tz = timefmt::display_tz(pool);
    match Comment::find_by_id(pool, commentid) {
        Some(comment) => Ok(Json(CommentView::from_comment(&comment, tz))),
        None => Err(json_error(
            Status::InternalServerError,
            "An error occurred while posting the comment",
        )),
    }
}

// ── Like increment ─────────────────────────────────────

/// Unconditional increment; any caller may like repeatedly.
#[post("/post/<id>/like")]
pub fn like_post(pool: &State<DbPool>, id: i64) -> Result<Json<Value>, JsonError> {
    match Post::increment_likes(pool, id) {
        Ok(likes) => Ok(Json(json!({ "likes": likes }))),
        Err(e) => {
            log::error!("Error updating likes: {}", e);
            Err(json_error(
                Status::InternalServerError,
                "An error occurred while liking the post",
            ))
        }
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![comment_submit, like_post]
}
