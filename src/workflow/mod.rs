pub mod initialize_customer;
