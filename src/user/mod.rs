//! User accounts: registration, login, and profile management.

mod db;
mod domain;
mod log_in;
mod me;
mod profile;
mod register;

pub use db::{create_user, create_user_table, get_user_by_email, get_user_by_id, update_user};
pub use domain::{NewUser, Role, User, UserID, UserProfile};
pub use log_in::log_in;
pub use me::get_me;
pub use profile::update_profile;
pub use register::register_user;
