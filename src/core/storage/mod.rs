mod secrets;

pub use secrets::{SecretsStorage, EMAIL_ENV, PASSWORD_ENV};
