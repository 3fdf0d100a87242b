pub mod add;
pub mod create;
pub mod del;
pub mod get;
pub mod list;
pub mod raw;
