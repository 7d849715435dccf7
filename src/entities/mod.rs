pub mod prelude;

pub mod user_account;
