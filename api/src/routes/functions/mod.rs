pub mod execute_function_request;
pub mod execute_function_route;
pub mod list_functions_route;
