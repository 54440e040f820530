pub mod constants;
pub mod dates;
pub mod money;
pub mod types;
pub mod validation;
pub mod views;

#[cfg(test)]
pub mod test_helpers;
