pub mod command_accepted_response;
pub mod instance_list_response;
pub mod instance_response;
pub mod instances;
pub mod stop_instance_request;
pub mod update_check_response;
