pub mod manager_error;
