pub mod journal;
pub mod plan;
pub mod relation;
pub mod run;
