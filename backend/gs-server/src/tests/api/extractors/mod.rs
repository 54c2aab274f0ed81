mod instance_token;
mod operator;
