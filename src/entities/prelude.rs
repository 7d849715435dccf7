pub use super::user_account::Entity as UserAccount;
