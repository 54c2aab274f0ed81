pub mod instance_record_repository;
