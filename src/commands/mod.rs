pub mod doctor;
pub mod new;
