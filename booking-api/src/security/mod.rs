pub mod password;

pub use password::{
    hash_password, verify_password, MAX_HASH_COST, MIN_HASH_COST, TEST_HASH_COST,
};
