pub mod load_use_case;
pub mod ports;
pub mod publish_use_case;
pub mod session;
