#![doc = "The `wisecamp` library crate."]
#![doc = ""]
#![doc = "Headless client for the Wisecamp project-management API: the session store,"]
#![doc = "the route guard, the optimistic board view and the page view models. The"]
#![doc = "binary (`main.rs`) builds an `App` from the environment and starts it."]

pub mod api;
pub mod app;
pub mod board;
pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod navigation;
pub mod notify;
pub mod pages;
pub mod session;
pub mod storage;

pub use crate::app::App;
pub use crate::config::Config;
pub use crate::error::AppError;
