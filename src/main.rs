#[macro_use]
extern crate rocket;

pub mod auth;
pub mod error;
pub mod repository;
pub mod tasks;
pub mod util;


use rocket::fairing::AdHoc;
use rocket::figment::Figment;
use rocket::serde::json::{json, Json, Value};
use rocket::{Build, Rocket, State};

use tasks::TaskStore;

/// Liveness probe; stays outside the auth gate.
#[get("/health")]
fn health(store: &State<TaskStore>) -> Json<Value> {
    Json(json!({ "status": "ok", "tasks": store.with(|t| t.len()) }))
}

pub fn build(figment: Figment) -> Rocket<Build> {
    let rocket = rocket::custom(figment);
    let config: util::Config = rocket.figment().extract().expect("config");

    let rocket = rocket
        .mount("/", routes![health])
        .register("/", catchers![auth::unauthorized, error::fallback])
        .attach(AdHoc::config::<util::Config>())
        .manage(auth::Gate::from_config(&config));

    tasks::fuel(rocket)
}

#[launch]
fn rocket() -> _ {
    build(rocket::Config::figment())
}
