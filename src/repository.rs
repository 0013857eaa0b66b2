use std::ops::DerefMut;
use std::sync::{Arc, Mutex};

use rocket::fairing::AdHoc;
use rocket::serde::json::serde_json;
use rocket::serde::{Deserialize, Serialize};
use std::fs;

use crate::util::read_file;

/// Mutex-guarded state of type `T`, persisted as pretty-printed JSON at a
/// configured location. Mutations go through [`with_save`] so the file on
/// disk always reflects the last completed request.
///
/// [`with_save`]: Repository::with_save
pub struct Repository<T> {
    inner: Arc<Mutex<T>>,
    location: String,
}

impl<T> Repository<T> {
    /// Fairing that reads the backing file on ignite (falling back to
    /// `default` when missing or unreadable) and manages the repository
    /// as Rocket state. `func` picks the file location out of the
    /// already-managed config `C`.
    pub fn adhoc<F, C>(name: &'static str, func: F, default: T) -> AdHoc
    where
        T: Send + Sync + for<'de> Deserialize<'de> + Serialize + 'static,
        F: Fn(&C) -> String + Send + Sync + 'static,
        C: Send + Sync + 'static,
    {
        AdHoc::on_ignite(name, |rocket| {
            Box::pin(async move {
                let location = match rocket.state::<C>() {
                    Some(config) => func(config),
                    None => return rocket,
                };
                rocket.manage(Self::init_read(location, default).await)
            })
        })
    }
}

macro_rules! get {
    ($i:expr) => {
        match ($i.lock()) {
            Err(e) => {
                eprintln!("repository mutex poisoned: {}", e);
                panic!("repository unusable");
            }
            Ok(t) => t,
        }
    };
}

impl<T> Repository<T>
where
    T: for<'de> Deserialize<'de> + Serialize,
{
    async fn init_read(location: String, default: T) -> Self {
        let inner = read_file::<T>(&location).await.unwrap_or(default);
        let out = Self {
            inner: Arc::new(Mutex::new(inner)),
            location,
        };

        out.save();

        out
    }

    fn save(&self) {
        let vec = {
            let t = get!(self.inner);
            serde_json::to_vec_pretty(&*t).ok()
        };
        let written = vec.and_then(|vec| fs::write(&self.location, &vec).ok());
        if written.is_none() {
            eprintln!("failed to persist repository to {}", self.location);
        }
    }

    pub fn with_save<F, R>(&self, func: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let out = {
            let mut t = get!(self.inner);
            func(t.deref_mut())
        };
        self.save();
        out
    }

    pub fn with<F, R>(&self, func: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut t = get!(self.inner);
        func(t.deref_mut())
    }
}
