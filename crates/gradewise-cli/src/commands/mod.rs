pub mod grade;
pub mod init;
pub mod override_score;
pub mod run;
pub mod validate;
