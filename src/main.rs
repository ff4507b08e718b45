#[macro_use]
extern crate rocket;

use rocket::fs::FileServer;
use rocket_dyn_templates::Template;

mod auth;
mod boot;
mod db;
mod feed;
mod models;
mod routes;
mod timefmt;


use rocket::response::content::RawHtml;

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Page not found.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Internal server error.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    // Boot check — verify/create directories before anything touches them
    boot::run();

    let pool = db::init_pool().expect("Failed to initialize database pool");
    db::run_migrations(&pool).expect("Failed to run database migrations");
    db::seed_defaults(&pool).expect("Failed to seed default settings");

    if let Err(e) = auth::cleanup_expired_sessions(&pool) {
        log::warn!("Expired-session cleanup failed: {}", e);
    }

    rocket::build()
        .manage(pool)
        .attach(Template::fairing())
        .mount("/images", FileServer::from("website/images"))
        .mount("/resources", FileServer::from("website/resources"))
        .mount("/", routes::public::routes())
        .mount("/", routes::auth::routes())
        .mount("/", routes::profile::routes())
        .mount("/", routes::api::routes())
        .register("/", catchers![not_found, server_error])
}
