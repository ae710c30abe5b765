pub mod batch;
pub mod compare;
pub mod init;
pub mod questions;
pub mod score;
pub mod validate;
