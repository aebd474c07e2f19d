pub mod email;
pub mod execute;
pub mod plan;
pub mod readme;
