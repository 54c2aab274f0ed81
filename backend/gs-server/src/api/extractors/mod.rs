pub mod instance_token;
pub mod operator;
