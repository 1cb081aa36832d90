pub mod health;
pub mod lead;
pub mod track;
