mod password;

pub use password::{
    compute_password_hash, register_user, validate_credentials, AuthError, Credentials,
};
