pub mod assessment;
pub mod history;
pub mod input;
