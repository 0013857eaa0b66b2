use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::{json, Json, Value};
use rocket::{Build, Rocket, State};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repository::Repository;
use crate::util::Config;

pub mod models;
pub mod store;

use models::{PublicTask, TaskDraft, TaskPatch};
use store::TaskTable;

pub type TaskStore = Repository<TaskTable>;

/// Listing an empty store answers 404, not an empty 200.
#[get("/")]
fn get_all(store: &State<TaskStore>, _user: AuthUser) -> Result<Json<Value>, ApiError> {
    let tasks: Vec<PublicTask> =
        store.with(|t| t.list_all().iter().map(PublicTask::from).collect());
    if tasks.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(json!({ "tasks": tasks })))
}

#[post("/", data = "<draft>")]
fn create_one(
    store: &State<TaskStore>,
    _user: AuthUser,
    draft: Json<TaskDraft>,
) -> Result<Custom<Json<Value>>, ApiError> {
    let task = store.with_save(|t| t.create(draft.into_inner()))?;
    Ok(Custom(
        Status::Created,
        Json(json!({ "task": PublicTask::from(&task) })),
    ))
}

#[get("/<id>")]
fn get_one(store: &State<TaskStore>, _user: AuthUser, id: i32) -> Result<Json<Value>, ApiError> {
    let task = store.with(|t| t.get(id).map(PublicTask::from))?;
    Ok(Json(json!({ "task": task })))
}

#[put("/<id>", data = "<patch>")]
fn update_one(
    store: &State<TaskStore>,
    _user: AuthUser,
    id: i32,
    patch: Json<TaskPatch>,
) -> Result<Json<Value>, ApiError> {
    let task = store.with_save(|t| t.update(id, patch.into_inner()))?;
    Ok(Json(json!({ "task": PublicTask::from(&task) })))
}

#[delete("/<id>")]
fn delete_one(store: &State<TaskStore>, _user: AuthUser, id: i32) -> Result<Json<Value>, ApiError> {
    store.with_save(|t| t.delete(id))?;
    Ok(Json(json!({ "result": true })))
}

pub fn fuel(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .mount(
            "/tasks",
            routes![get_all, create_one, get_one, update_one, delete_one],
        )
        .attach(TaskStore::adhoc(
            "tasks",
            |c: &Config| c.store_location.clone(),
            TaskTable::default(),
        ))
}
