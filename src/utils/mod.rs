pub mod btc_address_validator;
pub mod evm_address;
pub mod nonce;
pub mod sei_address_validator;

#[cfg(test)]
pub mod test_app_state;
#[cfg(test)]
pub mod test_db;
