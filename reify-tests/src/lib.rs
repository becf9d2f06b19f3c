pub mod expr;
pub mod rose;

#[cfg(test)]
mod law_suite;
