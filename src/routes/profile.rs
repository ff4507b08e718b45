use rocket::form::Form;
use rocket::response::Redirect;
use rocket::State;
use rocket_dyn_templates::Template;
use serde_json::json;

use crate::auth::SessionUser;
use crate::db::DbPool;
use crate::models::user::User;

#[derive(Debug, FromForm)]
pub struct EditProfileForm {
    pub bio: String,
    pub profilepicture: Option<String>,
}

fn not_logged_in() -> Template {
    Template::render(
        "pages/profileerr",
        json!({ "message": "You are not logged in.", "error": true }),
    )
}

/// The edit form offers five stock avatars by display name; anything
/// unrecognized falls back to the first.
pub(crate) fn picture_path(selection: Option<&str>) -> &'static str {
    match selection {
        Some("Picture 2") => "/images/ProfilePicture/2.png",
        Some("Picture 3") => "/images/ProfilePicture/3.png",
        Some("Picture 4") => "/images/ProfilePicture/4.png",
        Some("Picture 5") => "/images/ProfilePicture/5.png",
        _ => "/images/ProfilePicture/1.png",
    }
}

#[get("/profile")]
pub fn profile(session: Option<SessionUser>) -> Result<Redirect, Template> {
    match session {
        Some(SessionUser(username)) => Ok(Redirect::to(format!("/user/{}", username))),
        None => Err(not_logged_in()),
    }
}

#[get("/editprofile")]
pub fn edit_profile_page(pool: &State<DbPool>, session: Option<SessionUser>) -> Template {
    let username = match session {
        Some(SessionUser(u)) => u,
        None => return not_logged_in(),
    };

    let user = User::find_by_username(pool, &username);
    Template::render(
        "pages/editprofile",
        json!({ "user": user.map(|u| u.safe_json()) }),
    )
}

#[post("/editprofile", data = "<form>")]
pub fn edit_profile_submit(
    pool: &State<DbPool>,
    session: Option<SessionUser>,
    form: Form<EditProfileForm>,
) -> Result<Redirect, Template> {
    let username = match session {
        Some(SessionUser(u)) => u,
        None => return Err(not_logged_in()),
    };

    let picture = picture_path(form.profilepicture.as_deref());
    match User::update_profile(pool, &username, &form.bio, picture) {
        Ok(()) => Ok(Redirect::to(uri!(profile))),
        Err(e) => {
            log::error!("Error updating profile for {}: {}", username, e);
            Err(Template::render(
                "pages/profileerr",
                json!({ "message": "An unexpected error has occurred", "error": true }),
            ))
        }
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![profile, edit_profile_page, edit_profile_submit]
}
